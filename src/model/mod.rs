//! Aggregation: group parsed runs by configuration key and average them.

use crate::timing::{EntryKey, LogEntry};
use anyhow::ensure;
use std::collections::BTreeMap;

/// Unweighted arithmetic means of the five timing fields for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyStats {
    pub total_s: f64,
    pub energy_s: f64,
    pub identify_s: f64,
    pub annotate_s: f64,
    pub remove_s: f64,
}

#[derive(Debug, Default)]
struct Samples {
    total: Vec<f64>,
    energy: Vec<f64>,
    identify: Vec<f64>,
    annotate: Vec<f64>,
    remove: Vec<f64>,
}

impl Samples {
    fn push(&mut self, entry: &LogEntry) {
        self.total.push(entry.total_s);
        self.energy.push(entry.energy_s);
        self.identify.push(entry.identify_s);
        self.annotate.push(entry.annotate_s);
        self.remove.push(entry.remove_s);
    }

    fn stats(&self, key: &EntryKey) -> anyhow::Result<KeyStats> {
        // Keys only exist because an entry produced them, so an empty sample
        // set means grouping broke; fail loudly rather than average nothing.
        ensure!(
            !self.total.is_empty(),
            "no samples for aggregate key {:?}",
            key
        );
        Ok(KeyStats {
            total_s: mean(&self.total),
            energy_s: mean(&self.energy),
            identify_s: mean(&self.identify),
            annotate_s: mean(&self.annotate),
            remove_s: mean(&self.remove),
        })
    }
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Group entries by (label, cpus, seam count) and average each metric
/// independently. Input order does not matter.
pub fn aggregate(entries: &[LogEntry]) -> anyhow::Result<BTreeMap<EntryKey, KeyStats>> {
    let mut groups: BTreeMap<EntryKey, Samples> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.key()).or_default().push(entry);
    }

    let mut out = BTreeMap::new();
    for (key, samples) in groups {
        let stats = samples.stats(&key)?;
        out.insert(key, stats);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(label: &str, cpus: u32, total: f64, energy: f64) -> LogEntry {
        LogEntry {
            label: label.to_string(),
            cpus,
            seam_count: 128,
            total_s: total,
            energy_s: energy,
            identify_s: 0.0,
            annotate_s: 0.0,
            remove_s: 0.0,
        }
    }

    #[test]
    fn averages_each_metric_per_key() {
        let entries = vec![
            entry("img", 4, 2.0, 1.0),
            entry("img", 4, 4.0, 3.0),
            entry("img", 8, 1.0, 0.5),
        ];
        let stats = aggregate(&entries).unwrap();
        assert_eq!(stats.len(), 2);

        let four = &stats[&EntryKey("img".to_string(), 4, 128)];
        assert_eq!(four.total_s, 3.0);
        assert_eq!(four.energy_s, 2.0);

        let eight = &stats[&EntryKey("img".to_string(), 8, 128)];
        assert_eq!(eight.total_s, 1.0);
    }

    #[test]
    fn input_order_does_not_change_results() {
        let forward = vec![
            entry("a", 1, 2.0, 0.0),
            entry("a", 1, 4.0, 0.0),
            entry("b", 2, 7.0, 1.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(aggregate(&forward).unwrap(), aggregate(&reversed).unwrap());
        assert_eq!(
            aggregate(&forward).unwrap()[&EntryKey("a".to_string(), 1, 128)].total_s,
            3.0
        );
    }

    #[test]
    fn keys_are_case_and_whitespace_sensitive() {
        let entries = vec![
            entry("img", 1, 2.0, 0.0),
            entry("Img", 1, 4.0, 0.0),
            entry("img ", 1, 6.0, 0.0),
        ];
        let stats = aggregate(&entries).unwrap();
        assert_eq!(stats.len(), 3);
    }

    #[test]
    fn no_entries_means_no_keys() {
        let stats = aggregate(&[]).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn empty_sample_set_fails_loudly() {
        let samples = Samples::default();
        let key = EntryKey("img".to_string(), 1, 128);
        assert!(samples.stats(&key).is_err());
    }
}
