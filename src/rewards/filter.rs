use crate::rewards::{
    types::{Page, RewardRecord},
    window::TimeWindow,
};

/// Result of filtering one page against a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub matches: Vec<RewardRecord>,
    pub continue_paging: bool,
}

pub struct WindowFilter;

impl WindowFilter {
    /// Select the page's records inside `window` and decide whether older pages
    /// may still hold matches.
    ///
    /// Pages arrive newest first, so paging stops as soon as the oldest record
    /// on the page predates `window.start()`. An empty page means the history
    /// is exhausted.
    pub fn apply(page: &Page, window: &TimeWindow) -> FilterOutcome {
        let Some(oldest) = page.oldest() else {
            return FilterOutcome {
                matches: Vec::new(),
                continue_paging: false,
            };
        };

        let matches = page
            .records
            .iter()
            .filter(|record| window.contains(record.block_timestamp))
            .cloned()
            .collect();

        FilterOutcome {
            matches,
            continue_paging: oldest.block_timestamp >= window.start(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: i64) -> RewardRecord {
        RewardRecord {
            era: 1,
            block_timestamp: ts,
            event_index: format!("{}-1", ts),
            extrinsic_index: format!("{}-0", ts),
            amount: 1_000,
        }
    }

    fn page(timestamps: &[i64]) -> Page {
        Page::new(0, timestamps.iter().copied().map(record).collect())
    }

    fn timestamps(records: &[RewardRecord]) -> Vec<i64> {
        records.iter().map(|r| r.block_timestamp).collect()
    }

    #[test]
    fn test_empty_page_stops() {
        let window = TimeWindow::new(0, i64::MAX).unwrap();
        let outcome = WindowFilter::apply(&Page::default(), &window);

        assert!(outcome.matches.is_empty());
        assert!(!outcome.continue_paging);
    }

    #[test]
    fn test_page_newer_than_window_continues() {
        let window = TimeWindow::new(100, 200).unwrap();
        let outcome = WindowFilter::apply(&page(&[500, 400, 300]), &window);

        assert!(outcome.matches.is_empty());
        assert!(outcome.continue_paging);
    }

    #[test]
    fn test_matches_are_inclusive_and_ordered() {
        let window = TimeWindow::new(100, 200).unwrap();
        let outcome = WindowFilter::apply(&page(&[250, 200, 170, 130, 100, 99]), &window);

        assert_eq!(timestamps(&outcome.matches), vec![200, 170, 130, 100]);
        assert!(!outcome.continue_paging);
    }

    #[test]
    fn test_oldest_on_window_start_continues() {
        let window = TimeWindow::new(100, 200).unwrap();
        let outcome = WindowFilter::apply(&page(&[150, 100]), &window);

        assert_eq!(timestamps(&outcome.matches), vec![150, 100]);
        assert!(outcome.continue_paging);
    }

    #[test]
    fn test_page_older_than_window_stops() {
        let window = TimeWindow::new(100, 200).unwrap();
        let outcome = WindowFilter::apply(&page(&[90, 80]), &window);

        assert!(outcome.matches.is_empty());
        assert!(!outcome.continue_paging);
    }

    #[test]
    fn test_matches_always_within_window() {
        let window = TimeWindow::new(1_000, 2_000).unwrap();
        let all: Vec<i64> = (0..300).rev().map(|i| i * 10).collect();
        let outcome = WindowFilter::apply(&page(&all), &window);

        assert!(outcome.matches.iter().all(|r| window.contains(r.block_timestamp)));
        assert_eq!(outcome.matches.len(), 101);
        assert!(outcome
            .matches
            .windows(2)
            .all(|pair| pair[0].block_timestamp > pair[1].block_timestamp));
    }
}
