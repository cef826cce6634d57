//! Stored reading handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{HistoryPage, StoredReading};

use crate::error::AppResult;
use crate::middleware::{CurrentUser, OptionalUser};
use crate::services::readings::ManualReadingInput;
use crate::services::ReadingService;
use crate::AppState;

#[derive(Serialize)]
pub struct RecordedReading {
    pub ok: bool,
    pub reading: StoredReading,
}

#[derive(Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Paging parameters; unparseable values fall back to the defaults
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub per: Option<String>,
    pub page: Option<String>,
}

impl HistoryQuery {
    pub fn page(&self) -> HistoryPage {
        let defaults = HistoryPage::default();
        let parse = |value: &Option<String>, default: usize| {
            value
                .as_deref()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        HistoryPage::new(
            parse(&self.page, defaults.page),
            parse(&self.per, defaults.per_page),
        )
    }
}

/// Record a manual sensor reading for the caller
pub async fn create_reading(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ManualReadingInput>,
) -> AppResult<Json<RecordedReading>> {
    let service = ReadingService::new(state.store.clone(), state.weather.clone());
    let reading = service.record_manual(current_user.0.user_id, input).await?;
    Ok(Json(RecordedReading { ok: true, reading }))
}

/// The caller's most recent reading
pub async fn get_latest_reading(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DataResponse<Option<StoredReading>>>> {
    let service = ReadingService::new(state.store.clone(), state.weather.clone());
    let data = service.latest(current_user.0.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// A page of readings, newest first
pub async fn get_history(
    State(state): State<AppState>,
    user: OptionalUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<StoredReading>>>> {
    let service = ReadingService::new(state.store.clone(), state.weather.clone());
    let data = service.history(user.user_id(), query.page()).await?;
    Ok(Json(DataResponse { data }))
}
