//! Job matrix generation: pure enumeration of the configured axes.

use crate::sweep::config::{ImageEntry, ProgramVariant, SweepConfig};

/// One fully-specified benchmark run request. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    /// Source name of the variant to run, e.g. "parallel_seam_carving.c".
    pub variant: String,
    /// Worker count; always 1 for baseline variants.
    pub cpus: u32,
    pub input: String,
    pub output: String,
    pub seam_count: u64,
}

/// Enumerate the full job matrix: image outer, variant middle, thread count
/// inner, repeat innermost. Baseline variants contribute `runs` descriptors
/// per image at a fixed worker count of 1; parallel variants contribute
/// `runs` per thread-count value.
pub fn generate_jobs(cfg: &SweepConfig) -> Vec<JobDescriptor> {
    let mut jobs = Vec::new();
    for image in &cfg.images {
        for variant in &cfg.variants {
            if variant.is_baseline() {
                push_repeats(&mut jobs, cfg, variant, image, 1);
            } else {
                for &cpus in &cfg.thread_counts {
                    push_repeats(&mut jobs, cfg, variant, image, cpus);
                }
            }
        }
    }
    jobs
}

fn push_repeats(
    jobs: &mut Vec<JobDescriptor>,
    cfg: &SweepConfig,
    variant: &ProgramVariant,
    image: &ImageEntry,
    cpus: u32,
) {
    for _ in 0..cfg.runs {
        jobs.push(JobDescriptor {
            variant: variant.source.clone(),
            cpus,
            input: image.input.clone(),
            output: output_path(image, variant, cpus),
            seam_count: cfg.seam_count,
        });
    }
}

/// Disambiguate output filenames by variant stem, and by worker count for
/// CPU-class variants, so sweep runs never overwrite each other.
fn output_path(image: &ImageEntry, variant: &ProgramVariant, cpus: u32) -> String {
    let (stem, ext) = match image.output.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (image.output.as_str(), None),
    };
    let suffix = if variant.is_gpu() {
        format!("_{}", variant.stem())
    } else {
        format!("_{}_{}", variant.stem(), cpus)
    };
    match ext {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext),
        None => format!("{}{}", stem, suffix),
    }
}
