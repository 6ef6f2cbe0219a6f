//! Job dispatch: compile every required variant, then push the job matrix
//! through the scheduler one submission at a time, capturing stdout.
//!
//! Failures are isolated at both granularities. A variant that fails to
//! compile is recorded and skipped over; a job that exits non-zero (or writes
//! to stderr) is recorded and the loop continues. Nothing here retries.

pub mod scheduler;
pub mod workdir;

pub use scheduler::{CommandOutcome, build_variant, run_command, srun_args, submit_job};
pub use workdir::WorkDirGuard;

use crate::sweep::{JobDescriptor, SweepConfig};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::Path;

/// What one batch produced: per-family concatenated stdout plus the failure
/// tallies an operator inspects afterwards.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Variant stem -> concatenated captured stdout of all its jobs.
    pub captures: BTreeMap<String, String>,
    /// Variant sources whose compile step failed.
    pub failed_builds: Vec<String>,
    /// Number of jobs that failed to submit or exited non-zero.
    pub failed_jobs: usize,
}

/// Build and run the whole matrix from the project root. The working
/// directory is restored before this returns, on success and on error alike.
pub fn run_batch(
    cfg: &SweepConfig,
    jobs: &[JobDescriptor],
    root: &Path,
) -> anyhow::Result<BatchReport> {
    let _guard = WorkDirGuard::enter(root)?;
    let mut report = BatchReport::default();

    build_all(jobs, &mut report);
    run_all(cfg, jobs, &mut report)?;

    Ok(report)
}

/// Compile each distinct variant appearing in the matrix exactly once, in
/// order of first appearance.
fn build_all(jobs: &[JobDescriptor], report: &mut BatchReport) {
    let mut seen: Vec<&str> = Vec::new();
    for job in jobs {
        if seen.contains(&job.variant.as_str()) {
            continue;
        }
        seen.push(&job.variant);

        log::info!("compiling {}", job.variant);
        match build_variant(&job.variant) {
            Ok(out) if out.success() => {}
            Ok(out) => {
                log::warn!(
                    "compile of {} exited with status {}: {}",
                    job.variant,
                    out.status,
                    out.stderr.trim()
                );
                report.failed_builds.push(job.variant.clone());
            }
            Err(e) => {
                log::warn!("compile of {} could not run: {:#}", job.variant, e);
                report.failed_builds.push(job.variant.clone());
            }
        }
        // A failed build is not fatal: the variant's own jobs will fail at
        // submission and be recorded there.
    }
}

/// Submit every job synchronously, appending captured stdout to its variant
/// family's buffer.
fn run_all(
    cfg: &SweepConfig,
    jobs: &[JobDescriptor],
    report: &mut BatchReport,
) -> anyhow::Result<()> {
    for job in jobs {
        let variant = cfg
            .variant(&job.variant)
            .with_context(|| format!("descriptor references unknown variant {}", job.variant))?;

        let capture = report.captures.entry(variant.stem().to_string()).or_default();
        match submit_job(variant, job) {
            Ok(out) => {
                capture.push_str(&out.stdout);
                if !out.success() || !out.stderr.trim().is_empty() {
                    log::warn!(
                        "job for {} on {} (cpus={}) failed: status {}, stderr: {}",
                        job.variant,
                        job.input,
                        job.cpus,
                        out.status,
                        out.stderr.trim()
                    );
                    report.failed_jobs += 1;
                }
            }
            Err(e) => {
                log::warn!(
                    "job for {} on {} (cpus={}) could not be submitted: {:#}",
                    job.variant,
                    job.input,
                    job.cpus,
                    e
                );
                report.failed_jobs += 1;
            }
        }
    }
    Ok(())
}

/// Append each family's capture to `<raw_dir>/<stem>.txt`, creating the
/// directory on demand.
pub fn write_raw_captures(report: &BatchReport, raw_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(raw_dir)
        .with_context(|| format!("create raw capture directory {}", raw_dir.display()))?;
    for (stem, capture) in &report.captures {
        if capture.is_empty() {
            continue;
        }
        let path = raw_dir.join(format!("{}.txt", stem));
        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("open raw capture {}", path.display()))?;
        file.write_all(capture.as_bytes())
            .with_context(|| format!("write raw capture {}", path.display()))?;
        log::info!("captured {} bytes for {}", capture.len(), stem);
    }
    Ok(())
}
