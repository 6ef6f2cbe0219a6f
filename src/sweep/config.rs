//! Sweep configuration (sweep.json): benchmark axes as data.
//!
//! JSON shape:
//! {
//!   "variants": [
//!     {
//!       "source": "parallel_seam_carving.c",
//!       "class": "parallel",                  // sequential | parallel | gpu
//!       "marker": "--------------- PARALLEL SEAM CARVING ---------------"
//!     },
//!     ...
//!   ],
//!   "images": [
//!     { "input": "test_images/720x480.png", "output": "output_images/720x480.png" },
//!     ...
//!   ],
//!   "thread_counts": [1, 2, 4, 8, 16, 32, 64],  // optional
//!   "runs": 1,                                   // optional
//!   "seam_count": 128                            // optional
//! }
//!
//! The built-in default reproduces the main seam-carving experiment. All
//! fields are validated before the config is handed to the generator.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::fs;

/// How a variant consumes cluster resources.
///
/// Sequential and Gpu variants ignore the thread axis (worker count is fixed
/// at 1); Parallel variants sweep it. Gpu variants are submitted with an
/// accelerator request instead of a CPU count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantClass {
    Sequential,
    Parallel,
    Gpu,
}

/// One benchmark program in the sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramVariant {
    /// Source file handed to the compile script, e.g. "seam_carving.c".
    pub source: String,

    pub class: VariantClass,

    /// Literal delimiter this variant's binary writes ahead of each run's
    /// stats block in its raw capture file.
    pub marker: String,
}

impl ProgramVariant {
    /// Source name with its extension stripped; names the compiled binary,
    /// the raw capture file, and output-image suffixes.
    pub fn stem(&self) -> &str {
        match self.source.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => &self.source,
        }
    }

    /// Where the compile script places the compiled artifact.
    pub fn binary_path(&self) -> String {
        format!("./bin/{}.out", self.stem())
    }

    /// Baseline variants contribute one worker-count value (1) to the matrix.
    pub fn is_baseline(&self) -> bool {
        matches!(self.class, VariantClass::Sequential | VariantClass::Gpu)
    }

    /// Gpu variants request an accelerator at submission instead of CPUs.
    pub fn is_gpu(&self) -> bool {
        self.class == VariantClass::Gpu
    }
}

/// One input image plus the output path its processed copies derive from.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    pub input: String,
    pub output: String,
}

/// The full set of benchmark axes. Immutable input to [`generate_jobs`].
///
/// [`generate_jobs`]: crate::sweep::generate_jobs
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    pub variants: Vec<ProgramVariant>,
    pub images: Vec<ImageEntry>,

    #[serde(default = "default_thread_counts")]
    pub thread_counts: Vec<u32>,

    /// Repeats per configuration.
    #[serde(default = "default_runs")]
    pub runs: u32,

    /// Workload parameter passed positionally to every binary.
    #[serde(default = "default_seam_count")]
    pub seam_count: u64,
}

fn default_thread_counts() -> Vec<u32> {
    vec![1, 2, 4, 8, 16, 32, 64]
}

fn default_runs() -> u32 {
    1
}

fn default_seam_count() -> u64 {
    128
}

impl SweepConfig {
    /// Load and validate a config from a JSON file.
    pub fn from_json_file(path: &str) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read sweep config {}", path))?;
        let cfg: SweepConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse sweep config {}", path))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the axes before generation: non-empty variants/images, runs >= 1,
    /// thread counts >= 1, distinct variant sources.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.variants.is_empty() {
            bail!("sweep config has no variants");
        }
        if self.images.is_empty() {
            bail!("sweep config has no images");
        }
        if self.runs < 1 {
            bail!("sweep config runs must be >= 1, got {}", self.runs);
        }
        if self.thread_counts.is_empty() {
            bail!("sweep config has no thread counts");
        }
        for &t in &self.thread_counts {
            if t < 1 {
                bail!("thread count must be >= 1, got {}", t);
            }
        }
        for (i, v) in self.variants.iter().enumerate() {
            if v.source.is_empty() {
                bail!("variant #{} has an empty source", i);
            }
            if v.marker.trim().is_empty() {
                bail!("variant {} has a blank marker", v.source);
            }
            if self.variants[..i].iter().any(|p| p.source == v.source) {
                bail!("duplicate variant source: {}", v.source);
            }
        }
        Ok(())
    }

    /// Look a variant up by its source name.
    pub fn variant(&self, source: &str) -> Option<&ProgramVariant> {
        self.variants.iter().find(|v| v.source == source)
    }
}

impl Default for SweepConfig {
    /// The original seam-carving experiment: two sequential baselines, three
    /// OpenMP variants, five image sizes, thread counts 1..64, one run each.
    fn default() -> Self {
        let variant = |source: &str, class: VariantClass, name: &str| ProgramVariant {
            source: source.to_string(),
            class,
            marker: format!("--------------- {} ---------------", name),
        };
        let image = |size: &str| ImageEntry {
            input: format!("test_images/{}.png", size),
            output: format!("output_images/{}.png", size),
        };
        SweepConfig {
            variants: vec![
                variant(
                    "seam_carving.c",
                    VariantClass::Sequential,
                    "SEAM CARVING SEQUENTIAL",
                ),
                variant(
                    "seam_carving_optimized.c",
                    VariantClass::Sequential,
                    "SEAM CARVING SEQUENTIAL OPTIMIZED",
                ),
                variant(
                    "parallel_seam_carving.c",
                    VariantClass::Parallel,
                    "PARALLEL SEAM CARVING",
                ),
                variant(
                    "parallel_seam_carving_triangles.c",
                    VariantClass::Parallel,
                    "PARALLEL SEAM CARVING TRIANGLES",
                ),
                variant(
                    "parallel_seam_carving_triangles_greedy.c",
                    VariantClass::Parallel,
                    "PARALLEL SEAM CARVING TRIANGLES GREEDY",
                ),
            ],
            images: vec![
                image("720x480"),
                image("1024x768"),
                image("1920x1200"),
                image("3840x2160"),
                image("7680x4320"),
            ],
            thread_counts: default_thread_counts(),
            runs: default_runs(),
            seam_count: default_seam_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let cfg = SweepConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.variants.len(), 5);
        assert_eq!(cfg.images.len(), 5);
        assert_eq!(cfg.thread_counts, vec![1, 2, 4, 8, 16, 32, 64]);
        assert_eq!(cfg.runs, 1);
    }

    #[test]
    fn parses_json_with_defaults() {
        let json = r#"{
            "variants": [
                { "source": "histogram_equalization.cu", "class": "gpu",
                  "marker": "--------------- HISTOGRAM EQUALIZATION ---------------" }
            ],
            "images": [
                { "input": "test_images/720x480.png", "output": "output_images/720x480.png" }
            ]
        }"#;
        let cfg: SweepConfig = serde_json::from_str(json).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.runs, 1);
        assert_eq!(cfg.seam_count, 128);
        assert_eq!(cfg.variants[0].stem(), "histogram_equalization");
        assert!(cfg.variants[0].is_baseline());
    }

    #[test]
    fn rejects_zero_runs() {
        let mut cfg = SweepConfig::default();
        cfg.runs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_sources() {
        let mut cfg = SweepConfig::default();
        let dup = cfg.variants[0].clone();
        cfg.variants.push(dup);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_thread_count() {
        let mut cfg = SweepConfig::default();
        cfg.thread_counts = vec![1, 0];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn binary_path_strips_source_extension() {
        let cfg = SweepConfig::default();
        assert_eq!(cfg.variants[0].binary_path(), "./bin/seam_carving.out");
    }
}
