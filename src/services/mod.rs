// Logique métier. Les routes ne font que valider, appeler un service
// et mettre en forme la réponse.

pub mod auth_service;
pub mod cricket_api;
pub mod eligibility;
pub mod match_service;
pub mod scoring;
pub mod team_rules;
pub mod team_service;
