//! Short plain-language findings drawn from a finished report.

use crate::record::Metric;
use crate::report::types::{ActivityReport, GroupSummary, MeasureReport};

fn steps_report(report: &ActivityReport) -> Option<&MeasureReport> {
    report.measures.get(Metric::TotalSteps.column())
}

fn by_mean<'a>(groups: &'a [GroupSummary], highest: bool) -> Option<&'a GroupSummary> {
    let cmp = |a: &&GroupSummary, b: &&GroupSummary| a.stats.mean.total_cmp(&b.stats.mean);
    if highest {
        groups.iter().max_by(cmp)
    } else {
        groups.iter().min_by(cmp)
    }
}

/// One sentence per finding. Findings whose inputs are missing are skipped.
pub fn highlights(report: &ActivityReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(range) = &report.date_range {
        lines.push(format!(
            "{} user-days from {} users between {} and {}.",
            report.record_count, report.user_count, range.start, range.end
        ));
    }

    if let Some(steps) = steps_report(report) {
        // A single weekday cannot be both the most and least active.
        let ranked = (steps.by_weekday.len() >= 2).then(|| {
            (
                by_mean(&steps.by_weekday, true),
                by_mean(&steps.by_weekday, false),
            )
        });
        if let Some((Some(top), Some(bottom))) = ranked {
            lines.push(format!(
                "{} is the most active weekday ({:.0} mean steps); {} the least ({:.0}).",
                top.group, top.stats.mean, bottom.group, bottom.stats.mean
            ));
        }

        if let Some(user) = by_mean(&steps.by_user, true) {
            lines.push(format!(
                "User {} averages the most steps: {:.0} over {} days.",
                user.group, user.stats.mean, user.stats.n
            ));
        }

        if let Some(trend) = &steps.trend {
            let direction = if trend.slope_per_day >= 0.0 {
                "rise"
            } else {
                "fall"
            };
            lines.push(format!(
                "Daily mean steps {} by {:.1} per day (r² = {:.2}).",
                direction,
                trend.slope_per_day.abs(),
                trend.r_squared
            ));
        }
    }

    if let Some(r) = report.steps_calories_correlation {
        lines.push(format!("Steps and calories correlate at r = {r:.2}."));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ActivityMetrics, ActivityRecord};
    use crate::report::aggregate::{ReportOptions, build_report};

    #[test]
    fn test_highlights_name_extreme_weekdays() {
        let day = |date: &str, steps: f64, calories: f64| {
            let metrics = ActivityMetrics::default()
                .with(Metric::TotalSteps, steps)
                .with(Metric::Calories, calories);
            ActivityRecord::new("1", date, metrics).unwrap()
        };
        // Sunday, Monday, Tuesday
        let records = vec![
            day("3/3/2024", 12000.0, 2400.0),
            day("3/4/2024", 3000.0, 1900.0),
            day("3/5/2024", 8000.0, 2100.0),
        ];

        let report = build_report(&records, &ReportOptions::default());

        assert!(report.highlights.iter().any(|l| l.starts_with(
            "Sunday is the most active weekday (12000 mean steps); Monday the least (3000)."
        )));
        assert!(report.highlights.iter().any(|l| l.starts_with("User 1 averages")));
        assert!(report.highlights.iter().any(|l| l.starts_with("Daily mean steps fall")));
    }

    #[test]
    fn test_highlights_skip_weekday_line_for_one_weekday() {
        let day = |date: &str, steps: f64| {
            let metrics = ActivityMetrics::default().with(Metric::TotalSteps, steps);
            ActivityRecord::new("1", date, metrics).unwrap()
        };
        // two Mondays
        let records = vec![day("3/4/2024", 3000.0), day("3/11/2024", 5000.0)];

        let report = build_report(&records, &ReportOptions::default());

        assert_eq!(report.measures["TotalSteps"].by_weekday.len(), 1);
        assert!(!report.highlights.is_empty());
        assert!(
            report
                .highlights
                .iter()
                .all(|l| !l.contains("most active weekday"))
        );
    }

    #[test]
    fn test_highlights_empty_report() {
        let report = build_report(&[], &ReportOptions::default());
        assert!(report.highlights.is_empty());
    }
}
