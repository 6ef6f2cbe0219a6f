//! Tolerant field extraction from one variant family's raw capture.
//!
//! A capture is split into sections at each occurrence of the family's
//! marker. The label is the first dashed-delimiter name found after the
//! marker prefix (the image-name line the binaries write below the family
//! marker); only when a section carries no further dashed line does the
//! marker's own embedded name serve as the label. A section missing any
//! required field is a boundary fragment and is dropped silently; missing
//! phase timings are data (0.0), not an error.

use crate::timing::entry::LogEntry;
use anyhow::{Context, ensure};
use regex::Regex;

/// Name embedded in a dashed delimiter line, e.g.
/// "--------------- test_images/720x480.png ---------------".
const LABEL_PATTERN: &str = r"-{3,}\s*(.+?)\s*-{3,}";
const CPUS_PATTERN: &str = r"CPUs: (\d+)";
const SEAMS_PATTERN: &str = r"seamCount=(\d+)";

/// Timing line shape shared by the total and every phase:
/// "<label>: <float> s" (the space before the unit is optional).
const TIMING_VALUE: &str = r": ([0-9.]+)\s*s";

const TOTAL_LABEL: &str = "Total Processing Time";

/// Optional phase timings, in entry field order.
const PHASE_LABELS: [&str; 4] = [
    "Energy Calculations",
    "Seam Identifications",
    "Seam Annotates",
    "Seam Removes",
];

struct Patterns {
    label: Regex,
    cpus: Regex,
    seams: Regex,
    total: Regex,
    phases: [Regex; 4],
}

impl Patterns {
    fn compile() -> anyhow::Result<Patterns> {
        let timing = |label: &str| -> anyhow::Result<Regex> {
            Regex::new(&format!("{}{}", regex::escape(label), TIMING_VALUE))
                .with_context(|| format!("compile timing pattern for {}", label))
        };
        Ok(Patterns {
            label: Regex::new(LABEL_PATTERN)?,
            cpus: Regex::new(CPUS_PATTERN)?,
            seams: Regex::new(SEAMS_PATTERN)?,
            total: timing(TOTAL_LABEL)?,
            phases: [
                timing(PHASE_LABELS[0])?,
                timing(PHASE_LABELS[1])?,
                timing(PHASE_LABELS[2])?,
                timing(PHASE_LABELS[3])?,
            ],
        })
    }
}

/// Parse one raw capture into the runs it records. Sections that are blank
/// or missing a required field contribute nothing.
pub fn parse_capture(text: &str, marker: &str) -> anyhow::Result<Vec<LogEntry>> {
    ensure!(!marker.is_empty(), "section marker must not be empty");
    let patterns = Patterns::compile()?;

    let mut entries = Vec::new();
    for section in sections(text, marker) {
        if section.trim().is_empty() {
            continue;
        }
        if let Some(entry) = extract_entry(section, marker, &patterns) {
            entries.push(entry);
        } else {
            log::debug!(
                "dropping capture fragment without required fields: {:?}",
                section.trim().lines().next().unwrap_or("")
            );
        }
    }
    Ok(entries)
}

/// Split `text` at every occurrence of `marker`. Each section starts at a
/// marker occurrence and runs to the next one; text before the first
/// occurrence forms a marker-less candidate that the required-field rule
/// filters out.
fn sections<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    let starts: Vec<usize> = text.match_indices(marker).map(|(i, _)| i).collect();
    if starts.is_empty() {
        return vec![text];
    }
    let mut out = Vec::with_capacity(starts.len() + 1);
    out.push(&text[..starts[0]]);
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        out.push(&text[start..end]);
    }
    out
}

/// First match of each field pattern within the section. Returns None when
/// any required field (label, cpus, seams, total) is absent or when the
/// worker count is zero; phase timings fall back to 0.0.
///
/// The label is searched for past the marker prefix, so each run keys by
/// the image-name delimiter line its binary wrote, not by the family
/// marker shared across the whole capture. Sections with no dashed line
/// beyond the marker fall back to the marker's embedded name.
fn extract_entry(section: &str, marker: &str, patterns: &Patterns) -> Option<LogEntry> {
    let body = section.strip_prefix(marker).unwrap_or(section);
    let label = first_capture(&patterns.label, body)
        .or_else(|| first_capture(&patterns.label, section))?
        .to_string();
    let cpus: u32 = first_capture(&patterns.cpus, section)?.parse().ok()?;
    let seam_count: u64 = first_capture(&patterns.seams, section)?.parse().ok()?;
    let total_s: f64 = first_capture(&patterns.total, section)?.parse().ok()?;
    if cpus < 1 {
        return None;
    }

    let mut phase = [0.0f64; 4];
    for (slot, re) in phase.iter_mut().zip(&patterns.phases) {
        if let Some(v) = first_capture(re, section).and_then(|s| s.parse().ok()) {
            *slot = v;
        }
    }

    Some(LogEntry {
        label,
        cpus,
        seam_count,
        total_s,
        energy_s: phase[0],
        identify_s: phase[1],
        annotate_s: phase[2],
        remove_s: phase[3],
    })
}

fn first_capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text).map(|c| c.get(1).unwrap().as_str())
}
