//! Deterministic text report for one variant family's averaged results.

use crate::model::KeyStats;
use crate::timing::EntryKey;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const REPORT_SUFFIX: &str = "_parsed.txt";

/// Render the averaged stats as text. Keys come out in BTreeMap order
/// (ascending by label, cpus, seam count), so identical input renders
/// byte-identically.
pub fn render_report(stats: &BTreeMap<EntryKey, KeyStats>) -> String {
    let mut out = String::new();
    for (EntryKey(label, cpus, seams), s) in stats {
        out.push_str(&format!(
            "Image: {}, CPUs: {}, Seam Count: {},\n",
            label, cpus, seams
        ));
        out.push_str(&format!("  Avg Total Time: {:.6}s\n", s.total_s));
        out.push_str(&format!("  Avg Energy Calculations: {:.6}s\n", s.energy_s));
        out.push_str(&format!("  Avg Seam Identifications: {:.6}s\n", s.identify_s));
        out.push_str(&format!("  Avg Seam Annotates: {:.6}s\n", s.annotate_s));
        out.push_str(&format!("  Avg Seam Removes: {:.6}s\n", s.remove_s));
        out.push('\n');
    }
    out
}

/// Report path for a raw capture file: `<out_dir>/<base name>_parsed.txt`.
pub fn report_path(out_dir: &Path, source: &Path) -> PathBuf {
    let base = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{}{}", base, REPORT_SUFFIX))
}

/// Write the report for one raw capture, creating `out_dir` on demand.
/// Returns the written path.
pub fn write_report_file(
    out_dir: &Path,
    source: &Path,
    stats: &BTreeMap<EntryKey, KeyStats>,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create report directory {}", out_dir.display()))?;
    let path = report_path(out_dir, source);
    fs::write(&path, render_report(stats))
        .with_context(|| format!("write report {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stats_fixture() -> BTreeMap<EntryKey, KeyStats> {
        let mut stats = BTreeMap::new();
        stats.insert(
            EntryKey("test_images/720x480.png".to_string(), 4, 128),
            KeyStats {
                total_s: 2.5,
                energy_s: 1.0,
                identify_s: 0.5,
                annotate_s: 0.25,
                remove_s: 0.25,
            },
        );
        stats.insert(
            EntryKey("test_images/720x480.png".to_string(), 2, 128),
            KeyStats {
                total_s: 4.0,
                energy_s: 0.0,
                identify_s: 0.0,
                annotate_s: 0.0,
                remove_s: 0.0,
            },
        );
        stats
    }

    #[test]
    fn renders_sorted_fixed_precision_blocks() {
        let text = render_report(&stats_fixture());
        // cpus=2 sorts before cpus=4 under the same label.
        assert_eq!(
            text,
            "Image: test_images/720x480.png, CPUs: 2, Seam Count: 128,\n\
             \x20 Avg Total Time: 4.000000s\n\
             \x20 Avg Energy Calculations: 0.000000s\n\
             \x20 Avg Seam Identifications: 0.000000s\n\
             \x20 Avg Seam Annotates: 0.000000s\n\
             \x20 Avg Seam Removes: 0.000000s\n\
             \n\
             Image: test_images/720x480.png, CPUs: 4, Seam Count: 128,\n\
             \x20 Avg Total Time: 2.500000s\n\
             \x20 Avg Energy Calculations: 1.000000s\n\
             \x20 Avg Seam Identifications: 0.500000s\n\
             \x20 Avg Seam Annotates: 0.250000s\n\
             \x20 Avg Seam Removes: 0.250000s\n\
             \n"
        );
    }

    #[test]
    fn writing_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let source = Path::new("main_run/raw/parallel_seam_carving.txt");
        let stats = stats_fixture();

        let p1 = write_report_file(dir.path(), source, &stats).unwrap();
        let first = fs::read(&p1).unwrap();
        let p2 = write_report_file(dir.path(), source, &stats).unwrap();
        let second = fs::read(&p2).unwrap();

        assert_eq!(p1, p2);
        assert_eq!(first, second);
        assert_eq!(
            p1.file_name().unwrap().to_str().unwrap(),
            "parallel_seam_carving_parsed.txt"
        );
    }

    #[test]
    fn empty_stats_render_empty_report() {
        assert_eq!(render_report(&BTreeMap::new()), "");
    }
}
