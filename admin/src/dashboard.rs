//! Dashboard overview.

use crate::api::{DashboardStats, HttpContentApi};

/// Fetch the dashboard statistics.
///
/// A failure is logged and yields zeroed stats, so the overview always has
/// something to show.
pub async fn overview(api: &HttpContentApi) -> DashboardStats {
    match api.dashboard_stats().await {
        Ok(stats) => stats,
        Err(err) => {
            log::error!("Failed to fetch dashboard stats: {}", err);
            DashboardStats::default()
        }
    }
}

/// Plain-text rendering of the overview.
pub fn summary(stats: &DashboardStats) -> Vec<String> {
    let mut lines = vec![
        format!("News articles : {}", stats.news_count),
        format!("Open jobs     : {}", stats.jobs_count),
        format!("Team members  : {}", stats.team_count),
    ];
    if stats.recent_activity.is_empty() {
        lines.push("No recent activity".to_string());
    } else {
        lines.push("Recent activity:".to_string());
        lines.extend(
            stats
                .recent_activity
                .iter()
                .map(|a| format!("  {} - {} ({})", a.action, a.source, a.time)),
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Activity;
    use crate::config::Config;

    #[tokio::test]
    async fn test_unreachable_server_gives_zeroed_stats() {
        let config = Config::default().with_api_url("http://127.0.0.1:1/api").unwrap();
        let api = HttpContentApi::new(&config).unwrap();
        assert_eq!(overview(&api).await, DashboardStats::default());
    }

    #[test]
    fn test_summary_lines() {
        let stats = DashboardStats {
            news_count: 4,
            jobs_count: 2,
            team_count: 9,
            recent_activity: vec![Activity {
                action: "Updated".into(),
                source: "Careers".into(),
                time: "2 hours ago".into(),
            }],
        };
        let lines = summary(&stats);
        assert_eq!(lines[0], "News articles : 4");
        assert_eq!(lines[4], "  Updated - Careers (2 hours ago)");

        let empty = summary(&DashboardStats::default());
        assert_eq!(empty.last().unwrap(), "No recent activity");
    }
}
