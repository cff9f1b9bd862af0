//! Read-only summaries of the ledger for the dashboard.

use crate::ledger::Activity;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainStat {
    pub domain: String,
    pub duration_secs: u64,
    /// Share of the total in tenths of a percent (0..=1000)
    pub share_permille: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityReport {
    pub total_secs: u64,
    pub site_count: usize,
    pub domains: Vec<DomainStat>,
}

impl ActivityReport {
    /// Longest-visited domains first; ties sort by name.
    pub fn from_activity(activity: &Activity) -> Self {
        let total_secs = activity.values().fold(0u64, |sum, secs| sum.saturating_add(*secs));

        let mut domains: Vec<DomainStat> = activity
            .iter()
            .map(|(domain, secs)| DomainStat {
                domain: domain.clone(),
                duration_secs: *secs,
                share_permille: share_permille(*secs, total_secs),
            })
            .collect();
        domains.sort_by(|a, b| {
            b.duration_secs
                .cmp(&a.duration_secs)
                .then_with(|| a.domain.cmp(&b.domain))
        });

        Self {
            total_secs,
            site_count: activity.len(),
            domains,
        }
    }

    /// Keep only the `limit` longest entries.
    pub fn truncate(mut self, limit: usize) -> Self {
        self.domains.truncate(limit);
        self
    }
}

fn share_permille(secs: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let scaled = u128::from(secs) * 1000 / u128::from(total);
    u64::try_from(scaled).unwrap_or(1000)
}

/// Format seconds the way the dashboard shows totals, e.g. `"2h 5m"`.
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{hours}h {minutes}m")
}

/// Format a per-mille share as a percentage with one decimal, e.g. `"42.5%"`.
pub fn format_share(share_permille: u64) -> String {
    format!("{}.{}%", share_permille / 10, share_permille % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(entries: &[(&str, u64)]) -> Activity {
        entries.iter().map(|(d, s)| ((*d).to_string(), *s)).collect()
    }

    #[test]
    fn test_empty_report() {
        let report = ActivityReport::from_activity(&Activity::new());
        assert_eq!(report.total_secs, 0);
        assert_eq!(report.site_count, 0);
        assert!(report.domains.is_empty());
    }

    #[test]
    fn test_sorted_by_time_then_name() {
        let report = ActivityReport::from_activity(&activity(&[
            ("b.example", 60),
            ("a.example", 60),
            ("c.example", 180),
        ]));

        let order: Vec<&str> = report.domains.iter().map(|d| d.domain.as_str()).collect();
        assert_eq!(order, ["c.example", "a.example", "b.example"]);
        assert_eq!(report.total_secs, 300);
        assert_eq!(report.site_count, 3);
    }

    #[test]
    fn test_shares() {
        let report =
            ActivityReport::from_activity(&activity(&[("a.example", 1), ("b.example", 2)]));
        assert_eq!(report.domains[0].share_permille, 666);
        assert_eq!(report.domains[1].share_permille, 333);
        assert_eq!(format_share(666), "66.6%");
        assert_eq!(format_share(1000), "100.0%");
    }

    #[test]
    fn test_truncate_keeps_totals() {
        let report =
            ActivityReport::from_activity(&activity(&[("a", 3), ("b", 2), ("c", 1)])).truncate(2);
        assert_eq!(report.domains.len(), 2);
        assert_eq!(report.site_count, 3);
        assert_eq!(report.total_secs, 6);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(59), "0h 0m");
        assert_eq!(format_duration(3600 + 5 * 60 + 30), "1h 5m");
        assert_eq!(format_duration(26 * 3600), "26h 0m");
    }
}
