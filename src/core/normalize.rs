//! Canonicalization of inbound lead records.
//!
//! Zapier payloads, form posts, and CSV rows arrive with inconsistent casing,
//! spacing, and phone/zip formats. Everything is normalized once at ingest so
//! the scoring pipeline can compare plain tokens.

use crate::core::qualification::qualification_score;
use crate::models::IngestLeadRequest;

/// A fully normalized inbound lead, ready to upsert as a pro record.
#[derive(Debug, Clone)]
pub struct CanonicalLead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub cities: Vec<String>,
    pub states: Vec<String>,
    pub zips: Vec<String>,
    pub counties: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub transactions: i32,
    pub volume: i64,
    pub years_experience: i32,
    pub interest_level: i32,
    pub wants: Vec<String>,
    pub qualification_score: i32,
    pub source: String,
}

/// Normalize an inbound payload into the canonical pro shape and compute its
/// qualification score. Absent numeric fields default to zero.
pub fn canonicalize_lead(req: &IngestLeadRequest) -> CanonicalLead {
    // Prefer explicit first/last; fall back to splitting a combined name.
    let (first_name, last_name) = match (&req.first_name, &req.last_name) {
        (Some(first), Some(last)) => (clean_name(first), clean_name(last)),
        (Some(first), None) => (clean_name(first), String::new()),
        (None, Some(last)) => (String::new(), clean_name(last)),
        (None, None) => split_name(req.name.as_deref().unwrap_or("")),
    };

    let transactions = req.transactions.unwrap_or(0).max(0);
    let volume = req.volume.unwrap_or(0).max(0);
    let years_experience = req.years_experience.unwrap_or(0).max(0);
    let interest_level = clamp_interest(req.interest_level.unwrap_or(0));

    CanonicalLead {
        first_name,
        last_name,
        email: normalize_email(&req.email),
        phone: normalize_phone(req.phone.as_deref().unwrap_or("")),
        cities: normalize_tokens(&req.cities, normalize_token),
        states: normalize_tokens(&req.states, normalize_state),
        zips: normalize_tokens(&req.zips, normalize_zip),
        counties: normalize_tokens(&req.counties, normalize_token),
        neighborhoods: normalize_tokens(&req.neighborhoods, normalize_token),
        latitude: req.latitude,
        longitude: req.longitude,
        transactions,
        volume,
        years_experience,
        interest_level,
        wants: normalize_tokens(&req.wants, normalize_token),
        qualification_score: qualification_score(transactions, years_experience, interest_level),
        source: req
            .source
            .as_deref()
            .map(normalize_token)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "api".to_string()),
    }
}

/// Trim and collapse inner whitespace.
pub fn clean_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a full name into (first, last) on the last space.
/// Single-token names become (token, "").
pub fn split_name(raw: &str) -> (String, String) {
    let cleaned = clean_name(raw);
    match cleaned.rsplit_once(' ') {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (cleaned, String::new()),
    }
}

/// Lowercased, trimmed email.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Digits only; an 11-digit US number loses its leading country code.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// 5-digit zip prefix; zip+4 and dashes are reduced.
pub fn normalize_zip(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(5).collect()
}

/// Uppercased state code.
pub fn normalize_state(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Lowercased, whitespace-collapsed token (cities, neighborhoods, wants).
pub fn normalize_token(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a token list: per-item normalization, empties dropped, duplicates
/// removed preserving first occurrence.
pub fn normalize_tokens(raw: &[String], f: fn(&str) -> String) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for item in raw {
        let token = f(item);
        if !token.is_empty() && !out.contains(&token) {
            out.push(token);
        }
    }
    out
}

/// Interest level is self-reported 0-10; anything outside is clamped.
pub fn clamp_interest(raw: i32) -> i32 {
    raw.clamp(0, 10)
}
