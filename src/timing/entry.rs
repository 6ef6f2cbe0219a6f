//! One benchmark run as recovered from a raw capture.

/// Grouping key for aggregation: (label, worker count, seam count).
///
/// Exact-match: case- and whitespace-sensitive. Derives Ord so BTreeMap
/// iteration is already the report order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryKey(pub String, pub u32, pub u64);

/// A single parsed run. Only materialized when every required field (label,
/// cpus, seam count, total time) was found; the phase timings default to 0.0
/// when their lines are absent, which sequential variants genuinely omit.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub label: String,
    /// Worker count; >= 1 by construction.
    pub cpus: u32,
    pub seam_count: u64,
    pub total_s: f64,
    pub energy_s: f64,
    pub identify_s: f64,
    pub annotate_s: f64,
    pub remove_s: f64,
}

impl LogEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey(self.label.clone(), self.cpus, self.seam_count)
    }
}
