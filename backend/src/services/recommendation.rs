//! Plant recommendations for the caller's environment

use std::sync::Arc;

use serde_json::Value;
use shared::{build_snapshot, EnvironmentSnapshot, ProviderOutcome};

use crate::error::{AppError, AppResult};
use crate::external::RecommendationProvider;
use crate::store::Store;

#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<Store>,
    provider: Arc<dyn RecommendationProvider>,
}

impl RecommendationService {
    pub fn new(store: Arc<Store>, provider: Arc<dyn RecommendationProvider>) -> Self {
        Self { store, provider }
    }

    /// Resolve the snapshot for `user_id` from the request body and their
    /// most recent stored reading, then score it.
    pub async fn snapshot(&self, user_id: i64, body: &Value) -> AppResult<EnvironmentSnapshot> {
        let stored = self
            .store
            .readings
            .latest_for_user(user_id)
            .await
            .map_err(|e| AppError::RecommendationFailed(e.to_string()))?;

        Ok(build_snapshot(body, stored.as_ref()).with_pollution_value())
    }

    /// Ask the provider for recommendations.
    ///
    /// Provider failures come back as [`ProviderOutcome::Failure`] with the
    /// fallback attached; only storage problems are errors.
    pub async fn recommend(&self, user_id: i64, body: &Value) -> AppResult<ProviderOutcome> {
        let snapshot = self.snapshot(user_id, body).await?;
        tracing::debug!(
            user = user_id,
            aqi = ?snapshot.aqi,
            pollution_value = ?snapshot.pollution_value,
            "Requesting plant recommendations"
        );

        let outcome = self.provider.recommend(&snapshot).await;
        if let ProviderOutcome::Failure(failure) = &outcome {
            tracing::warn!(
                kind = failure.kind.code(),
                status = ?failure.status,
                details = ?failure.details,
                "AI responded with error: {}",
                failure.message
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use shared::{AiErrorKind, StoredReading};
    use std::sync::Mutex;

    /// Records every snapshot it is asked about
    #[derive(Default)]
    struct RecordingProvider {
        seen: Mutex<Vec<EnvironmentSnapshot>>,
    }

    #[async_trait]
    impl RecommendationProvider for RecordingProvider {
        async fn recommend(&self, snapshot: &EnvironmentSnapshot) -> ProviderOutcome {
            self.seen.lock().unwrap().push(snapshot.clone());
            ProviderOutcome::failure(AiErrorKind::NoApiKey, "GEMINI_API_KEY not configured")
        }
    }

    #[tokio::test]
    async fn test_snapshot_uses_stored_reading_and_scores_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::in_dir(dir.path(), 2000));

        let mut reading = StoredReading::at(Utc::now());
        reading.user_id = Some(5);
        reading.aqi = Some(4.0);
        reading.city = Some("Lampang".to_string());
        store.readings.append(reading).await.unwrap();

        let provider = Arc::new(RecordingProvider::default());
        let service = RecommendationService::new(store, provider.clone());

        let outcome = service.recommend(5, &json!({"humidity": 61})).await.unwrap();
        assert_eq!(outcome.error_kind(), Some(AiErrorKind::NoApiKey));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].aqi, Some(4.0));
        assert_eq!(seen[0].humidity, Some(61.0));
        assert_eq!(seen[0].city.as_deref(), Some("Lampang"));
        assert_eq!(seen[0].pollution_value, Some(95.0));
    }

    #[tokio::test]
    async fn test_other_users_readings_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::in_dir(dir.path(), 2000));

        let mut reading = StoredReading::at(Utc::now());
        reading.user_id = Some(9);
        reading.aqi = Some(2.0);
        store.readings.append(reading).await.unwrap();

        let service = RecommendationService::new(store, Arc::new(RecordingProvider::default()));
        let snapshot = service.snapshot(5, &json!({})).await.unwrap();

        assert_eq!(snapshot.aqi, None);
        assert_eq!(snapshot.pollution_value, None);
    }

    #[tokio::test]
    async fn test_corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readings.json"), "{not json").unwrap();
        let store = Arc::new(Store::in_dir(dir.path(), 2000));

        let provider = Arc::new(RecordingProvider::default());
        let service = RecommendationService::new(store, provider.clone());

        let err = service.recommend(5, &json!({"aqi": 2})).await.unwrap_err();
        assert!(matches!(err, AppError::RecommendationFailed(_)));
        assert!(provider.seen.lock().unwrap().is_empty());
    }
}
