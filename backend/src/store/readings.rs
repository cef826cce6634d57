//! Reading persistence

use shared::{HistoryPage, StoredReading};

use super::{JsonFile, StoreError};

/// Append-only reading log capped at `max_readings` entries
pub struct ReadingStore {
    file: JsonFile<StoredReading>,
    max_readings: usize,
}

impl ReadingStore {
    pub fn new(file: JsonFile<StoredReading>, max_readings: usize) -> Self {
        Self { file, max_readings }
    }

    /// Append a reading, evicting the oldest beyond the cap
    pub async fn append(&self, reading: StoredReading) -> Result<(), StoreError> {
        let max = self.max_readings;
        self.file
            .update(move |readings| {
                readings.push(reading);
                if readings.len() > max {
                    let excess = readings.len() - max;
                    readings.drain(..excess);
                }
            })
            .await
    }

    /// The most recently appended reading owned by `user_id`
    pub async fn latest_for_user(&self, user_id: i64) -> Result<Option<StoredReading>, StoreError> {
        let readings = self.file.read_all().await?;
        Ok(readings.into_iter().rev().find(|r| r.belongs_to(user_id)))
    }

    /// One page of history, newest first, optionally restricted to a user
    pub async fn history(
        &self,
        user_id: Option<i64>,
        page: HistoryPage,
    ) -> Result<Vec<StoredReading>, StoreError> {
        let readings = self.file.read_all().await?;
        let mut filtered: Vec<StoredReading> = match user_id {
            Some(id) => readings.into_iter().filter(|r| r.belongs_to(id)).collect(),
            None => readings,
        };

        let window = page.window(filtered.len());
        let mut items: Vec<StoredReading> = filtered.drain(window).collect();
        items.reverse();
        Ok(items)
    }
}
