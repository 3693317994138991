//! Study statistics shown on the dashboard.
//!
//! Weekly study time is not tracked yet; the provider trait marks the seam
//! where a real aggregation over focus sessions would plug in.

/// Supplies the "this week" figure as a display string.
pub trait StudyStatsProvider: Send + Sync {
    fn weekly_study_time(&self) -> String;
}

/// Returns a fixed figure.
#[derive(Debug, Clone)]
pub struct PlaceholderStats {
    label: String,
}

impl Default for PlaceholderStats {
    fn default() -> Self {
        Self {
            label: "5h 30m".to_string(),
        }
    }
}

impl StudyStatsProvider for PlaceholderStats {
    fn weekly_study_time(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_fixed() {
        let stats: Box<dyn StudyStatsProvider> = Box::new(PlaceholderStats::default());
        assert_eq!(stats.weekly_study_time(), "5h 30m");
        assert_eq!(stats.weekly_study_time(), "5h 30m");
    }
}
