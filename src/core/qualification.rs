/// Qualification score (0-100) for an inbound lead.
///
/// Fixed bucket additions over three self-reported fields; missing fields are
/// taken as zero. The score is computed once at ingest and stored on the pro.
pub fn qualification_score(transactions: i32, years_experience: i32, interest_level: i32) -> i32 {
    let score = transaction_points(transactions)
        + experience_points(years_experience)
        + interest_points(interest_level);

    score.min(100)
}

/// Closed transactions in the last 12 months.
#[inline]
fn transaction_points(transactions: i32) -> i32 {
    if transactions >= 20 {
        40
    } else if transactions >= 10 {
        30
    } else if transactions >= 5 {
        20
    } else if transactions >= 1 {
        10
    } else {
        0
    }
}

/// Years in the business.
#[inline]
fn experience_points(years: i32) -> i32 {
    if years >= 10 {
        30
    } else if years >= 5 {
        20
    } else if years >= 2 {
        10
    } else {
        0
    }
}

/// Self-reported interest in moving, 0-10.
#[inline]
fn interest_points(interest: i32) -> i32 {
    if interest >= 8 {
        30
    } else if interest >= 5 {
        20
    } else if interest >= 3 {
        10
    } else {
        0
    }
}
