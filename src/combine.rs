//! Concatenation and per-key summation of activity records.
//!
//! Rows sharing a `(user id, date)` key come from repeated tracker syncs.
//! They are merged by summing every numeric column.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::quality::DataQualityWarning;
use crate::record::{ActivityKey, ActivityRecord};

/// Output of [`deduplicate`].
#[derive(Debug, Default)]
pub struct Deduplicated {
    /// One record per key, ordered by user id then date.
    pub records: Vec<ActivityRecord>,
    /// Number of keys that had more than one input row.
    pub merged_groups: usize,
    /// Disagreements found while merging.
    pub anomalies: Vec<DataQualityWarning>,
}

struct Group {
    record: ActivityRecord,
    size: usize,
    date_texts: Vec<String>,
}

/// Appends `second` after `first`.
pub fn concat(
    mut first: Vec<ActivityRecord>,
    second: Vec<ActivityRecord>,
) -> Vec<ActivityRecord> {
    first.extend(second);
    first
}

/// Rows whose key occurs more than once, in input order.
pub fn duplicates(records: &[ActivityRecord]) -> Vec<ActivityRecord> {
    let mut counts: HashMap<ActivityKey, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.key()).or_default() += 1;
    }

    records
        .iter()
        .filter(|r| counts.get(&r.key()).is_some_and(|n| *n > 1))
        .cloned()
        .collect()
}

/// Collapses rows sharing a key into one row whose metrics are the column sums.
///
/// The date text of the first row seen is kept. If the group's rows spell the
/// date differently an [`DataQualityWarning::InconsistentDateText`] is
/// recorded. A group of one passes through unchanged.
#[tracing::instrument(skip_all, fields(rows = records.len()))]
pub fn deduplicate(records: Vec<ActivityRecord>) -> Deduplicated {
    let mut groups: BTreeMap<ActivityKey, Group> = BTreeMap::new();

    for record in records {
        match groups.entry(record.key()) {
            Entry::Occupied(mut slot) => {
                let group = slot.get_mut();
                group.record.metrics.absorb(&record.metrics);
                group.size += 1;
                if !group.date_texts.contains(&record.date_text) {
                    group.date_texts.push(record.date_text);
                }
            }
            Entry::Vacant(slot) => {
                let date_texts = vec![record.date_text.clone()];
                slot.insert(Group {
                    record,
                    size: 1,
                    date_texts,
                });
            }
        }
    }

    let mut out = Deduplicated::default();

    for (key, group) in groups {
        if group.size > 1 {
            out.merged_groups += 1;
            debug!(
                user_id = %key.user_id,
                date = %key.date,
                rows = group.size,
                "Merged duplicate group"
            );
        }

        if group.date_texts.len() > 1 {
            warn!(
                user_id = %key.user_id,
                date = %key.date,
                variants = ?group.date_texts,
                "Date text differs within duplicate group"
            );
            out.anomalies.push(DataQualityWarning::InconsistentDateText {
                user_id: key.user_id,
                date: key.date,
                variants: group.date_texts,
            });
        }

        out.records.push(group.record);
    }

    info!(
        records = out.records.len(),
        merged_groups = out.merged_groups,
        "Deduplication complete"
    );
    out
}

/// Concatenates two tables and deduplicates the result.
pub fn combine(first: Vec<ActivityRecord>, second: Vec<ActivityRecord>) -> Deduplicated {
    deduplicate(concat(first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ActivityMetrics, Metric};
    use std::collections::HashSet;

    fn row(user: &str, date: &str, steps: f64, calories: f64) -> ActivityRecord {
        let metrics = ActivityMetrics::default()
            .with(Metric::TotalSteps, steps)
            .with(Metric::Calories, calories);
        ActivityRecord::new(user, date, metrics).unwrap()
    }

    fn scenario_rows() -> (ActivityRecord, ActivityRecord) {
        let a = ActivityMetrics::default()
            .with(Metric::TotalSteps, 1000.0)
            .with(Metric::VeryActiveDistance, 1.0)
            .with(Metric::ModeratelyActiveDistance, 0.5)
            .with(Metric::LightActiveDistance, 0.5)
            .with(Metric::VeryActiveMinutes, 10.0)
            .with(Metric::FairlyActiveMinutes, 5.0)
            .with(Metric::LightlyActiveMinutes, 20.0)
            .with(Metric::Calories, 200.0);
        let b = ActivityMetrics::default()
            .with(Metric::TotalSteps, 500.0)
            .with(Metric::VeryActiveDistance, 0.5)
            .with(Metric::ModeratelyActiveDistance, 0.25)
            .with(Metric::LightActiveDistance, 0.25)
            .with(Metric::VeryActiveMinutes, 5.0)
            .with(Metric::FairlyActiveMinutes, 0.0)
            .with(Metric::LightlyActiveMinutes, 10.0)
            .with(Metric::Calories, 100.0);
        (
            ActivityRecord::new("1", "3/4/2024", a).unwrap(),
            ActivityRecord::new("1", "3/4/2024", b).unwrap(),
        )
    }

    #[test]
    fn test_scenario_merge() {
        let (a, b) = scenario_rows();

        let out = combine(vec![a], vec![b]);

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.merged_groups, 1);
        let merged = &out.records[0];
        assert_eq!(merged.value(Metric::TotalSteps), Some(1500.0));
        assert_eq!(merged.value(Metric::Calories), Some(300.0));
        assert_eq!(merged.total_active_distance(), Some(3.0));
        assert_eq!(merged.total_active_minutes(), Some(50.0));
        assert_eq!(merged.weekday_name(), "Monday");
        assert!(out.anomalies.is_empty());
    }

    #[test]
    fn test_every_column_is_summed() {
        let mut a = ActivityMetrics::default();
        let mut b = ActivityMetrics::default();
        for (i, metric) in Metric::ALL.iter().enumerate() {
            a.set(*metric, Some(i as f64));
            b.set(*metric, Some(100.0 + i as f64));
        }

        let out = deduplicate(vec![
            ActivityRecord::new("9", "1/2/2024", a).unwrap(),
            ActivityRecord::new("9", "1/2/2024", b).unwrap(),
        ]);

        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(out.records[0].value(*metric), Some(100.0 + 2.0 * i as f64));
        }
    }

    #[test]
    fn test_singleton_group_passes_through() {
        let only = row("1", "3/5/2024", 42.0, 7.0);

        let out = deduplicate(vec![only.clone()]);

        assert_eq!(out.records, vec![only]);
        assert_eq!(out.merged_groups, 0);
    }

    #[test]
    fn test_keys_unique_after_dedup() {
        let rows = vec![
            row("1", "3/4/2024", 1.0, 1.0),
            row("2", "3/4/2024", 1.0, 1.0),
            row("1", "3/4/2024", 1.0, 1.0),
            row("1", "3/5/2024", 1.0, 1.0),
            row("2", "3/4/2024", 1.0, 1.0),
            row("1", "3/4/2024", 1.0, 1.0),
        ];

        let out = deduplicate(rows);

        let keys: HashSet<_> = out.records.iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), out.records.len());
        assert_eq!(out.records.len(), 3);
        assert_eq!(out.merged_groups, 2);
        assert_eq!(out.records[0].value(Metric::TotalSteps), Some(3.0));
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let rows = vec![
            row("1", "3/4/2024", 10.0, 1.0),
            row("1", "3/4/2024", 20.0, 2.0),
            row("2", "3/6/2024", 30.0, 3.0),
        ];

        let once = deduplicate(rows);
        let twice = deduplicate(once.records.clone());

        assert_eq!(twice.merged_groups, 0);
        assert_eq!(twice.records, once.records);
    }

    #[test]
    fn test_output_ordered_by_key() {
        let out = deduplicate(vec![
            row("2", "3/4/2024", 1.0, 1.0),
            row("1", "3/6/2024", 1.0, 1.0),
            row("1", "3/4/2024", 1.0, 1.0),
        ]);

        let keys: Vec<_> = out
            .records
            .iter()
            .map(|r| (r.user_id.as_str(), r.date_text.as_str()))
            .collect();
        assert_eq!(
            keys,
            [("1", "3/4/2024"), ("1", "3/6/2024"), ("2", "3/4/2024")]
        );
    }

    #[test]
    fn test_padded_and_unpadded_dates_share_key() {
        let out = deduplicate(vec![
            row("1", "3/4/2024", 1.0, 1.0),
            row("1", "03/04/2024", 2.0, 2.0),
        ]);

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].date_text, "3/4/2024");
        assert_eq!(out.anomalies.len(), 1);
        assert!(matches!(
            &out.anomalies[0],
            DataQualityWarning::InconsistentDateText { variants, .. } if variants.len() == 2
        ));
    }

    #[test]
    fn test_duplicates_view() {
        let rows = vec![
            row("1", "3/4/2024", 1.0, 1.0),
            row("2", "3/4/2024", 2.0, 2.0),
            row("1", "3/4/2024", 3.0, 3.0),
        ];

        let dupes = duplicates(&rows);

        assert_eq!(dupes.len(), 2);
        assert_eq!(dupes[0].value(Metric::TotalSteps), Some(1.0));
        assert_eq!(dupes[1].value(Metric::TotalSteps), Some(3.0));
    }

    #[test]
    fn test_duplicates_view_empty_when_unique() {
        let rows = vec![row("1", "3/4/2024", 1.0, 1.0), row("1", "3/5/2024", 1.0, 1.0)];
        assert!(duplicates(&rows).is_empty());
    }
}
