//! Audit history pagination and statistics.

use crate::models::{AuditRecord, AuditStatus};
use serde::Serialize;

/// Server-driven pagination state for the history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Pagination {
    /// Builds pagination state, clamping `page` into the valid range.
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let mut pagination = Self {
            page,
            per_page: per_page.max(1),
            total,
        };
        pagination.page = pagination.clamp(page);
        pagination
    }

    /// `ceil(total / per_page)`, never less than one page.
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        let pages = self.total.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages())
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn previous(&self) -> u32 {
        self.clamp(self.page.saturating_sub(1))
    }

    pub fn next(&self) -> u32 {
        self.clamp(self.page.saturating_add(1))
    }
}

/// Status counts over a sample of audit records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
}

impl AuditStats {
    /// Counts records by status; unrecognized statuses only count toward the total.
    pub fn from_records(records: &[AuditRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            match record.status {
                AuditStatus::Completed => stats.completed += 1,
                AuditStatus::Pending => stats.pending += 1,
                AuditStatus::Failed => stats.failed += 1,
                AuditStatus::Other(_) => {}
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str) -> AuditRecord {
        AuditRecord {
            id: "1".to_string(),
            url: "https://example.org".to_string(),
            audit_type: "full".to_string(),
            status: AuditStatus::from(status),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Pagination::new(2, 10, 15);
        assert_eq!(p.total_pages(), 2);
        assert_eq!(Pagination::new(1, 10, 20).total_pages(), 2);
        assert_eq!(Pagination::new(1, 10, 21).total_pages(), 3);
    }

    #[test]
    fn test_navigation_disabled_at_edges() {
        let last = Pagination::new(2, 10, 15);
        assert!(!last.has_next());
        assert!(last.has_previous());

        let first = Pagination::new(1, 10, 15);
        assert!(!first.has_previous());
        assert!(first.has_next());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let p = Pagination::new(1, 10, 15);
        assert_eq!(p.previous(), 1);
        assert_eq!(p.next(), 2);
        assert_eq!(Pagination::new(2, 10, 15).next(), 2);
        assert_eq!(Pagination::new(9, 10, 15).page, 2);
        assert_eq!(Pagination::new(0, 10, 15).page, 1);
    }

    #[test]
    fn test_empty_history_has_one_page() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages(), 1);
        assert!(!p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn test_zero_per_page_is_treated_as_one() {
        let p = Pagination::new(3, 0, 5);
        assert_eq!(p.per_page, 1);
        assert_eq!(p.total_pages(), 5);
        assert_eq!(p.page, 3);
    }

    #[test]
    fn test_audit_stats_counts() {
        let records = vec![
            record("completed"),
            record("completed"),
            record("pending"),
            record("failed"),
            record("running"),
        ];
        let stats = AuditStats::from_records(&records);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.failed, 1);
    }
}
