use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringPoints;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub auth: AuthSettings,
    pub twilio: TwilioSettings,
    pub zapier: ZapierSettings,
    pub matching: MatchingSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub capacity: Option<u64>,
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub webhook_secret: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TwilioSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub from_number: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ZapierSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub hook_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_floor")]
    pub floor: i32,
    #[serde(default)]
    pub points: PointsConfig,
}

/// Point values for each scoring bucket, all individually overridable
#[derive(Debug, Clone, Deserialize)]
pub struct PointsConfig {
    #[serde(default = "default_zip")]
    pub zip: i32,
    #[serde(default = "default_territory")]
    pub territory: i32,
    #[serde(default = "default_neighborhood")]
    pub neighborhood: i32,
    #[serde(default = "default_city_state")]
    pub city_state: i32,
    #[serde(default = "default_city")]
    pub city: i32,
    #[serde(default = "default_state")]
    pub state: i32,
    #[serde(default = "default_transactions")]
    pub transactions: i32,
    #[serde(default = "default_volume")]
    pub volume: i32,
    #[serde(default = "default_experience")]
    pub experience: i32,
    #[serde(default = "default_overlap_per_want")]
    pub overlap_per_want: i32,
    #[serde(default = "default_overlap_cap")]
    pub overlap_cap: i32,
    #[serde(default = "default_bonus")]
    pub bonus_interest: i32,
    #[serde(default = "default_bonus")]
    pub bonus_qualified: i32,
    #[serde(default = "default_bonus")]
    pub bonus_premium_bid: i32,
    #[serde(default = "default_premium_bid_amount")]
    pub premium_bid_amount: i64,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            zip: default_zip(),
            territory: default_territory(),
            neighborhood: default_neighborhood(),
            city_state: default_city_state(),
            city: default_city(),
            state: default_state(),
            transactions: default_transactions(),
            volume: default_volume(),
            experience: default_experience(),
            overlap_per_want: default_overlap_per_want(),
            overlap_cap: default_overlap_cap(),
            bonus_interest: default_bonus(),
            bonus_qualified: default_bonus(),
            bonus_premium_bid: default_bonus(),
            premium_bid_amount: default_premium_bid_amount(),
        }
    }
}

fn default_floor() -> i32 { 20 }
fn default_zip() -> i32 { 40 }
fn default_territory() -> i32 { 40 }
fn default_neighborhood() -> i32 { 35 }
fn default_city_state() -> i32 { 30 }
fn default_city() -> i32 { 25 }
fn default_state() -> i32 { 15 }
fn default_transactions() -> i32 { 15 }
fn default_volume() -> i32 { 10 }
fn default_experience() -> i32 { 5 }
fn default_overlap_per_want() -> i32 { 5 }
fn default_overlap_cap() -> i32 { 20 }
fn default_bonus() -> i32 { 5 }
fn default_premium_bid_amount() -> i64 { 500 }

impl ScoringSettings {
    /// Materialize the configured point values for the matcher.
    pub fn to_points(&self) -> ScoringPoints {
        ScoringPoints {
            zip: self.points.zip,
            territory: self.points.territory,
            neighborhood: self.points.neighborhood,
            city_state: self.points.city_state,
            city: self.points.city,
            state: self.points.state,
            transactions: self.points.transactions,
            volume: self.points.volume,
            experience: self.points.experience,
            overlap_per_want: self.points.overlap_per_want,
            overlap_cap: self.points.overlap_cap,
            bonus_interest: self.points.bonus_interest,
            bonus_qualified: self.points.bonus_qualified,
            bonus_premium_bid: self.points.bonus_premium_bid,
            premium_bid_amount: self.points.premium_bid_amount,
            floor: self.floor,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with OWLDOOR_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., OWLDOOR_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("OWLDOOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("OWLDOOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Bare env vars that deployment platforms set without the OWLDOOR_ prefix.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    // DATABASE_URL is what Supabase/Heroku-style platforms provide
    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(jwt_secret) = env::var("SUPABASE_JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", jwt_secret)?;
    }
    if let Ok(sid) = env::var("TWILIO_ACCOUNT_SID") {
        builder = builder.set_override("twilio.account_sid", sid)?;
    }
    if let Ok(token) = env::var("TWILIO_AUTH_TOKEN") {
        builder = builder.set_override("twilio.auth_token", token)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points() {
        let points = PointsConfig::default();
        assert_eq!(points.zip, 40);
        assert_eq!(points.territory, 40);
        assert_eq!(points.neighborhood, 35);
        assert_eq!(points.city_state, 30);
        assert_eq!(points.city, 25);
        assert_eq!(points.state, 15);
        assert_eq!(points.overlap_cap, 20);
    }

    #[test]
    fn test_to_points_carries_floor() {
        let scoring = ScoringSettings {
            floor: 25,
            points: PointsConfig::default(),
        };
        let points = scoring.to_points();
        assert_eq!(points.floor, 25);
        assert_eq!(points.zip, 40);
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }
}
