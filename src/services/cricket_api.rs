// ============================================================================
// CLIENT API CRICKET (cricapi v1)
// ============================================================================
//
// Description:
//   Accès à l'API cricket distante: listes de matchs, infos d'un match,
//   scorecard, résumé fantasy et squads.
//
// Points d'attention:
//   - Le client est construit à partir de AppConfig puis injecté dans
//     actix via web::Data<dyn CricketDataSource> (pas d'état global)
//   - Pas de cache ni de retry: chaque appel repart vers l'API
//   - Les erreurs sont loggées avec leur cause puis réduites à un
//     message générique "Failed to fetch ..." (AppError::Upstream)
//
// ============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::cricket::{ApiEnvelope, CricketMatch, FantasyMatchPoints, SquadTeam};

/// Source des données cricket. Implémentée par CricketApiClient et par
/// une fausse source en mémoire dans les tests.
#[async_trait]
pub trait CricketDataSource: Send + Sync {
    /// Matchs en cours et à venir
    async fn current_matches(&self) -> Result<Vec<CricketMatch>, AppError>;

    async fn match_info(&self, match_id: &str) -> Result<CricketMatch, AppError>;

    /// None si l'API n'a pas (encore) de scorecard pour ce match
    async fn scorecard(&self, match_id: &str) -> Result<Option<Value>, AppError>;

    async fn fantasy_points(&self, match_id: &str) -> Result<FantasyMatchPoints, AppError>;

    async fn match_squad(&self, match_id: &str) -> Result<Vec<SquadTeam>, AppError>;

    async fn live_matches(&self) -> Result<Vec<CricketMatch>, AppError> {
        let matches = self.current_matches().await?;
        Ok(matches.into_iter().filter(CricketMatch::is_live).collect())
    }

    async fn upcoming_matches(&self) -> Result<Vec<CricketMatch>, AppError> {
        let matches = self.current_matches().await?;
        Ok(matches.into_iter().filter(CricketMatch::is_upcoming).collect())
    }

    async fn completed_matches(&self) -> Result<Vec<CricketMatch>, AppError> {
        let matches = self.current_matches().await?;
        Ok(matches.into_iter().filter(CricketMatch::is_completed).collect())
    }
}

pub struct CricketApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CricketApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        CricketApiClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.cricket_api_base_url, &config.cricket_api_key)
    }

    /// GET {base}/{endpoint}?apikey=..[&id=..] et renvoie le champ `data`
    /// de l'enveloppe (None si absent)
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        id: Option<&str>,
        what: &str,
    ) -> Result<Option<T>, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut params = vec![("apikey", self.api_key.as_str())];
        if let Some(id) = id {
            params.push(("id", id));
        }

        debug!(%endpoint, ?id, "cricket api request");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(%endpoint, error = %e, "cricket api request failed");
                upstream(what)
            })?;

        let envelope = response.json::<ApiEnvelope<T>>().await.map_err(|e| {
            error!(%endpoint, error = %e, "cricket api returned an unreadable body");
            upstream(what)
        })?;

        if envelope.data.is_none() {
            if let Some(reason) = &envelope.reason {
                debug!(%endpoint, status = ?envelope.status, %reason, "cricket api returned no data");
            }
        }

        Ok(envelope.data)
    }
}

fn upstream(what: &str) -> AppError {
    AppError::Upstream(format!("Failed to fetch {what}"))
}

#[async_trait]
impl CricketDataSource for CricketApiClient {
    async fn current_matches(&self) -> Result<Vec<CricketMatch>, AppError> {
        let matches = self
            .fetch::<Vec<CricketMatch>>("currentMatches", None, "current matches")
            .await?;
        Ok(matches.unwrap_or_default())
    }

    async fn match_info(&self, match_id: &str) -> Result<CricketMatch, AppError> {
        self.fetch("match_info", Some(match_id), "match information")
            .await?
            .ok_or_else(|| {
                error!(%match_id, "match not found upstream");
                upstream("match information")
            })
    }

    async fn scorecard(&self, match_id: &str) -> Result<Option<Value>, AppError> {
        self.fetch("match_scorecard", Some(match_id), "match scorecard")
            .await
    }

    async fn fantasy_points(&self, match_id: &str) -> Result<FantasyMatchPoints, AppError> {
        self.fetch("fantasySummary", Some(match_id), "fantasy points")
            .await?
            .ok_or_else(|| {
                error!(%match_id, "fantasy points not available");
                upstream("fantasy points")
            })
    }

    async fn match_squad(&self, match_id: &str) -> Result<Vec<SquadTeam>, AppError> {
        let squads = self
            .fetch::<Vec<SquadTeam>>("match_squad", Some(match_id), "match squad")
            .await?;
        Ok(squads.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cricket::{API_STATUS_COMPLETED, API_STATUS_LIVE, API_STATUS_NOT_STARTED};
    use crate::test_support::FakeCricketSource;

    fn fixture(id: &str, status: &str, match_status: Option<&str>) -> CricketMatch {
        CricketMatch {
            id: id.to_string(),
            status: status.to_string(),
            match_status: match_status.map(str::to_string),
            ..Default::default()
        }
    }

    fn ids(matches: &[CricketMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.id.as_str()).collect()
    }

    #[actix_web::test]
    async fn test_status_filters() {
        let source = FakeCricketSource::default().with_matches(vec![
            fixture("live", API_STATUS_LIVE, None),
            fixture("in-progress", "India need 10 runs", Some("In Progress")),
            fixture("soon", API_STATUS_NOT_STARTED, None),
            fixture("done", API_STATUS_COMPLETED, None),
        ]);

        assert_eq!(ids(&source.live_matches().await.unwrap()), vec!["live", "in-progress"]);
        assert_eq!(ids(&source.upcoming_matches().await.unwrap()), vec!["soon"]);
        assert_eq!(ids(&source.completed_matches().await.unwrap()), vec!["done"]);
    }

    #[actix_web::test]
    async fn test_unreachable_api_is_upstream_error() {
        // Port 9 (discard): connexion refusée, aucune requête réelle
        let client = CricketApiClient::new("http://127.0.0.1:9/v1/", "key");
        assert_eq!(client.base_url, "http://127.0.0.1:9/v1");

        match client.current_matches().await {
            Err(AppError::Upstream(message)) => assert_eq!(message, "Failed to fetch current matches"),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_without_data() {
        let raw = r#"{"status": "failure", "reason": "Invalid API key"}"#;
        let envelope: ApiEnvelope<Vec<CricketMatch>> = serde_json::from_str(raw).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.reason.as_deref(), Some("Invalid API key"));
    }
}
