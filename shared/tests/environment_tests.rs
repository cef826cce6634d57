//! Environment scoring and snapshot tests
//!
//! Property-based and unit tests for:
//! - Pollution score estimation from AQI and PM2.5
//! - Snapshot field precedence (body > latest > stored)
//! - The local fallback recommendation

use chrono::Utc;
use proptest::prelude::*;
use serde_json::{json, Value};
use shared::{
    build_snapshot, estimate_pollution_score, AiErrorKind, Components, ProviderFailure,
    RecommendationResult, StoredReading,
};

fn pm25(value: f64) -> Components {
    [("pm2_5".to_string(), value)].into_iter().collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_aqi_scale() {
        let scores: Vec<_> = (1..=5)
            .map(|aqi| estimate_pollution_score(Some(aqi as f64), None))
            .collect();
        assert_eq!(
            scores,
            vec![Some(20.0), Some(45.0), Some(70.0), Some(95.0), Some(100.0)]
        );
    }

    #[test]
    fn test_pm25_bucket_edges() {
        let cases = [(0.0, 10.0), (12.0, 10.0), (35.0, 40.0), (55.0, 70.0), (56.0, 90.0)];
        for (value, expected) in cases {
            assert_eq!(
                estimate_pollution_score(None, Some(&pm25(value))),
                Some(expected),
                "pm2.5 = {}",
                value
            );
        }
    }

    #[test]
    fn test_no_inputs_no_score() {
        assert_eq!(estimate_pollution_score(None, None), None);

        let other: Components = [("co".to_string(), 250.0)].into_iter().collect();
        assert_eq!(estimate_pollution_score(None, Some(&other)), None);
    }

    #[test]
    fn test_latest_beats_stored() {
        let mut stored = StoredReading::at(Utc::now());
        stored.aqi = Some(1.0);
        stored.humidity = Some(40.0);

        let body = json!({"latest": {"aqi": 3}});
        let snapshot = build_snapshot(&body, Some(&stored)).with_pollution_value();

        assert_eq!(snapshot.aqi, Some(3.0));
        assert_eq!(snapshot.humidity, Some(40.0));
        assert_eq!(snapshot.pollution_value, Some(70.0));
    }

    #[test]
    fn test_pollution_value_from_stored_components() {
        let mut stored = StoredReading::at(Utc::now());
        stored.components = Some(pm25(40.2));

        let snapshot = build_snapshot(&Value::Null, Some(&stored)).with_pollution_value();
        assert_eq!(snapshot.aqi, None);
        assert_eq!(snapshot.pollution_value, Some(70.0));
    }

    #[test]
    fn test_fallback_is_consistent() {
        let fallback = RecommendationResult::fallback();
        assert!(fallback.is_consistent());
        assert_eq!(fallback.total_plants, 1);
        assert!(fallback.notes.is_some());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn error_kind_strategy() -> impl Strategy<Value = AiErrorKind> {
        prop_oneof![
            Just(AiErrorKind::InvalidPayload),
            Just(AiErrorKind::NoApiKey),
            Just(AiErrorKind::NoContent),
            Just(AiErrorKind::ParseFailed),
            Just(AiErrorKind::BadRequest),
            Just(AiErrorKind::AuthError),
            Just(AiErrorKind::RequestFailed),
        ]
    }

    /// Optional numeric field as it might appear in a request
    fn field_strategy() -> impl Strategy<Value = Option<u8>> {
        prop::option::of(1u8..=5)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Any finite AQI yields a score within [0, 100]
        #[test]
        fn prop_score_is_bounded(aqi in -1_000.0f64..1_000.0) {
            let score = estimate_pollution_score(Some(aqi), None).unwrap();
            prop_assert!((0.0..=100.0).contains(&score));
        }

        /// AQI takes precedence over PM2.5 whenever it is present
        #[test]
        fn prop_aqi_wins_over_pm25(aqi in 1u8..=5, pm in 0.0f64..500.0) {
            let components = pm25(pm);
            prop_assert_eq!(
                estimate_pollution_score(Some(aqi as f64), Some(&components)),
                estimate_pollution_score(Some(aqi as f64), None)
            );
        }

        /// PM2.5 scores never decrease as concentration rises
        #[test]
        fn prop_pm25_monotonic(a in 0.0f64..500.0, b in 0.0f64..500.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low_score = estimate_pollution_score(None, Some(&pm25(low))).unwrap();
            let high_score = estimate_pollution_score(None, Some(&pm25(high))).unwrap();
            prop_assert!(low_score <= high_score);
        }

        /// Each field resolves to the first source that supplies it
        #[test]
        fn prop_snapshot_precedence(
            body_aqi in field_strategy(),
            latest_aqi in field_strategy(),
            stored_aqi in field_strategy(),
        ) {
            let mut body = json!({"latest": {}});
            if let Some(v) = body_aqi {
                body["aqi"] = json!(v);
            }
            if let Some(v) = latest_aqi {
                body["latest"]["aqi"] = json!(v);
            }
            let mut stored = StoredReading::at(Utc::now());
            stored.aqi = stored_aqi.map(f64::from);

            let expected = body_aqi.or(latest_aqi).or(stored_aqi).map(f64::from);
            prop_assert_eq!(build_snapshot(&body, Some(&stored)).aqi, expected);
        }

        /// Every failure carries a structurally valid fallback
        #[test]
        fn prop_failures_carry_fallback(kind in error_kind_strategy(), message in "[a-z ]{0,40}") {
            let failure = ProviderFailure::new(kind, message);
            prop_assert!(failure.fallback.is_consistent());
            prop_assert_eq!(failure.fallback, RecommendationResult::fallback());
        }
    }
}
