//! External collaborators: the compile script and the SLURM `srun` client.
//!
//! Both are modeled as one synchronous call returning {exit status, captured
//! text}. No retries; callers decide what an isolated failure means.

use crate::sweep::{JobDescriptor, ProgramVariant};
use anyhow::Context;
use std::process::Command;

const COMPILE_SCRIPT: &str = "./scripts/runner_compile.sh";
const SRUN: &str = "srun";
const JOB_NAME: &str = "runner-run-seam_carving";
const JOB_LOG: &str = "logs/runner-run-seam_carving.log";
const WALL_CLOCK: &str = "60:00";
const RESERVATION: &str = "fri";

/// Result of one external invocation.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Process exit code; -1 when the process was terminated by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Run one external command to completion, capturing both output streams.
///
/// Returns Err only when the process could not be spawned at all; a non-zero
/// exit is a normal [`CommandOutcome`].
pub fn run_command(program: &str, args: &[String]) -> anyhow::Result<CommandOutcome> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("spawn {}", program))?;
    Ok(CommandOutcome {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Compile one variant via the compile script. Idempotent on the script side.
pub fn build_variant(source: &str) -> anyhow::Result<CommandOutcome> {
    run_command(COMPILE_SCRIPT, &[source.to_string()])
}

/// Submit one job to the scheduler and wait for it.
pub fn submit_job(variant: &ProgramVariant, job: &JobDescriptor) -> anyhow::Result<CommandOutcome> {
    let args = srun_args(variant, job);
    log::info!("running: {} {}", SRUN, args.join(" "));
    run_command(SRUN, &args)
}

/// The full `srun` argument list for one descriptor: fixed job-name/log/time/
/// reservation, a resource request sized from the worker count (or a fixed
/// single accelerator for GPU variants), then the binary and its positional
/// arguments.
pub fn srun_args(variant: &ProgramVariant, job: &JobDescriptor) -> Vec<String> {
    let mut args = vec![
        format!("--job-name={}", JOB_NAME),
        format!("--output={}", JOB_LOG),
    ];
    if variant.is_gpu() {
        args.push("--partition=gpu".to_string());
        args.push("--gpus=1".to_string());
    } else {
        args.push("--ntasks=1".to_string());
        args.push("--nodes=1".to_string());
        args.push(format!("--cpus-per-task={}", job.cpus));
    }
    args.push(format!("--time={}", WALL_CLOCK));
    args.push(format!("--reservation={}", RESERVATION));
    args.push(variant.binary_path());
    args.push(job.input.clone());
    args.push(job.output.clone());
    args.push(job.seam_count.to_string());
    args
}
