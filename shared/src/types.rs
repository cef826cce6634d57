//! Common types used across the platform

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Geographic coordinates in the `coord` shape used by OpenWeatherMap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Page of reading history, counted from the newest end
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryPage {
    pub page: usize,
    pub per_page: usize,
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl HistoryPage {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Index range of this page within `len` records stored oldest-first.
    ///
    /// Page 1 is the `per_page` most recent records; pages beyond the start
    /// of history are clipped and may be empty.
    pub fn window(&self, len: usize) -> Range<usize> {
        let page = self.page.max(1);
        let end = len.saturating_sub(self.per_page.saturating_mul(page - 1));
        let start = len.saturating_sub(self.per_page.saturating_mul(page));
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_is_most_recent() {
        let page = HistoryPage::new(1, 10);
        assert_eq!(page.window(25), 15..25);
    }

    #[test]
    fn test_last_page_is_clipped() {
        let page = HistoryPage::new(3, 10);
        assert_eq!(page.window(25), 0..5);
    }

    #[test]
    fn test_page_past_history_is_empty() {
        let page = HistoryPage::new(5, 10);
        assert!(page.window(25).is_empty());
    }

    #[test]
    fn test_page_zero_behaves_like_first_page() {
        assert_eq!(HistoryPage::new(0, 4).window(6), 2..6);
    }
}
