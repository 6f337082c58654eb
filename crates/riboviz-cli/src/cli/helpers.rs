use anyhow::Context;
use riboviz_core::domain::ComparatorKind;
use riboviz_core::regression::default_scratch_root;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Logs go to stderr so stdout stays free for YAML and summaries.
pub(super) fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

pub(super) fn parse_comparator_kind(value: &str) -> Result<ComparatorKind, String> {
    ComparatorKind::parse(value).ok_or_else(|| {
        let known = ComparatorKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown comparator '{}' (expected one of: {})", value, known)
    })
}

/// Scratch root for alignment comparisons.
///
/// A user-supplied directory is left in place; a generated one is removed by
/// [`ScratchDir::finish`].
pub(super) struct ScratchDir {
    path: PathBuf,
    generated: bool,
}

impl ScratchDir {
    pub(super) fn new(requested: Option<PathBuf>) -> Self {
        match requested {
            Some(path) => Self {
                path,
                generated: false,
            },
            None => Self {
                path: default_scratch_root(),
                generated: true,
            },
        }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    pub(super) fn finish(self) -> anyhow::Result<()> {
        if self.generated && self.path.exists() {
            fs::remove_dir_all(&self.path).with_context(|| {
                format!(
                    "failed to remove scratch directory '{}'",
                    self.path.display()
                )
            })?;
        }
        Ok(())
    }
}
