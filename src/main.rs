use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;

mod dispatch;
mod model;
mod render;
mod sweep;
mod timing;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "seambench")]
#[command(about = "Seam carving benchmark sweep harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated job matrix without submitting anything.
    Plan {
        /// Sweep config JSON; defaults to the built-in experiment.
        #[arg(long)]
        config: Option<String>,
    },

    /// Compile all variants and run the full sweep through the scheduler.
    Run {
        #[arg(long)]
        config: Option<String>,

        /// Project root the batch runs under (holds scripts/, bin/, images).
        #[arg(long, default_value = "..")]
        root: String,

        /// Directory receiving one raw capture file per variant family.
        #[arg(long, default_value = "main_run/raw")]
        raw_dir: String,
    },

    /// Parse raw captures and write one averaged report per family.
    Report {
        #[arg(long)]
        config: Option<String>,

        #[arg(long, default_value = "main_run/raw")]
        raw_dir: String,

        #[arg(short = 'o', long, default_value = "main_run/parsed")]
        out_dir: String,
    },
}

fn load_config(path: Option<&str>) -> Result<sweep::SweepConfig> {
    match path {
        Some(p) => sweep::SweepConfig::from_json_file(p),
        None => Ok(sweep::SweepConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Plan { config } => {
            let cfg = load_config(config.as_deref())?;
            let jobs = sweep::generate_jobs(&cfg);
            for job in &jobs {
                println!(
                    "{} cpus={} seams={} {} -> {}",
                    job.variant, job.cpus, job.seam_count, job.input, job.output
                );
            }
            println!("{} jobs", jobs.len());
        }

        Commands::Run {
            config,
            root,
            raw_dir,
        } => {
            let cfg = load_config(config.as_deref())?;
            let jobs = sweep::generate_jobs(&cfg);
            log::info!("dispatching {} jobs", jobs.len());

            let report = dispatch::run_batch(&cfg, &jobs, Path::new(&root))?;
            dispatch::write_raw_captures(&report, Path::new(&raw_dir))?;

            if !report.failed_builds.is_empty() {
                log::warn!("failed builds: {}", report.failed_builds.join(", "));
            }
            if report.failed_jobs > 0 {
                log::warn!("{} of {} jobs failed", report.failed_jobs, jobs.len());
            }
            println!(
                "ran {} jobs ({} failed), captures under {}",
                jobs.len(),
                report.failed_jobs,
                raw_dir
            );
        }

        Commands::Report {
            config,
            raw_dir,
            out_dir,
        } => {
            let cfg = load_config(config.as_deref())?;
            let raw_dir = Path::new(&raw_dir);
            let out_dir = Path::new(&out_dir);

            for variant in &cfg.variants {
                let source = raw_dir.join(format!("{}.txt", variant.stem()));
                if !source.exists() {
                    log::warn!("no raw capture at {}, skipping", source.display());
                    continue;
                }
                let text = std::fs::read_to_string(&source)
                    .with_context(|| format!("read raw capture {}", source.display()))?;

                let entries = timing::parse_capture(&text, &variant.marker)?;
                let stats = model::aggregate(&entries)?;
                let written = render::write_report_file(out_dir, &source, &stats)?;
                println!(
                    "Results saved to {} ({} configurations)",
                    written.display(),
                    stats.len()
                );
            }
        }
    }

    Ok(())
}
