// Règles d'éligibilité: âge légal et états où le jeu est interdit

use chrono::{DateTime, Datelike, NaiveDate};

use crate::error::AppError;

pub const MINIMUM_AGE: i32 = 18;

/// États où l'inscription et la connexion sont interdites
pub const RESTRICTED_STATES: [&str; 6] = [
    "Andhra Pradesh",
    "Assam",
    "Nagaland",
    "Odisha",
    "Sikkim",
    "Telangana",
];

pub fn is_restricted_state(state: &str) -> bool {
    let state = state.trim();
    RESTRICTED_STATES
        .iter()
        .any(|restricted| restricted.eq_ignore_ascii_case(state))
}

/// Âge en années révolues, par comparaison année/mois/jour
/// (pas de calcul en jours, donc pas de souci avec les années bissextiles)
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// "YYYY-MM-DD" ou un timestamp RFC 3339 (on garde la date)
pub fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::bad_request("Invalid date of birth."))
}

pub fn ensure_state_allowed(state: &str) -> Result<(), AppError> {
    if is_restricted_state(state) {
        return Err(AppError::Forbidden(
            "Registration is not available in your state due to government regulations."
                .to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_adult(date_of_birth: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if age_on(date_of_birth, today) < MINIMUM_AGE {
        return Err(AppError::Forbidden(
            "You must be 18 years or older to register.".to_string(),
        ));
    }
    Ok(())
}
