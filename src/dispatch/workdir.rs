//! Scoped working-directory switch for the build+run batch.
//!
//! The compile script and the scheduler arguments are all relative to the
//! project root, so the batch runs with the process working directory moved
//! there. The previous directory is restored on every exit path, including
//! failures, by dropping the guard.

use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};

pub struct WorkDirGuard {
    prev: PathBuf,
}

impl WorkDirGuard {
    /// Switch the process working directory to `root`, remembering the
    /// current one.
    pub fn enter(root: &Path) -> anyhow::Result<Self> {
        let prev = env::current_dir().context("read current working directory")?;
        env::set_current_dir(root)
            .with_context(|| format!("enter project root {}", root.display()))?;
        Ok(WorkDirGuard { prev })
    }
}

impl Drop for WorkDirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.prev) {
            log::error!(
                "failed to restore working directory {}: {}",
                self.prev.display(),
                e
            );
        }
    }
}
