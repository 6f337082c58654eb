use crate::domain::{ArtifactRef, DirRole};
use std::path::{Component, Path, PathBuf};

/// Maps a configured output directory onto the expected-data tree.
///
/// The final component of `configured` is kept and re-rooted under
/// `expected_root`, so `vignette/tmp/` with root `/data/expected` becomes
/// `/data/expected/tmp`. A configured path with no normal component (empty,
/// `.` or `/`) maps to the root itself.
pub fn expected_directory(configured: &Path, expected_root: &Path) -> PathBuf {
    let last_normal = configured
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .last();

    match last_normal {
        Some(name) => expected_root.join(name),
        None => expected_root.to_path_buf(),
    }
}

/// Actual and expected locations of the three configured directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirs {
    pub index: PathBuf,
    pub tmp: PathBuf,
    pub output: PathBuf,
    pub expected_index: PathBuf,
    pub expected_tmp: PathBuf,
    pub expected_output: PathBuf,
}

impl ResolvedDirs {
    pub fn new(index: &Path, tmp: &Path, output: &Path, expected_root: &Path) -> Self {
        Self {
            index: index.to_path_buf(),
            tmp: tmp.to_path_buf(),
            output: output.to_path_buf(),
            expected_index: expected_directory(index, expected_root),
            expected_tmp: expected_directory(tmp, expected_root),
            expected_output: expected_directory(output, expected_root),
        }
    }

    pub fn actual_dir(&self, role: DirRole) -> &Path {
        match role {
            DirRole::Index => &self.index,
            DirRole::Temporary => &self.tmp,
            DirRole::Output => &self.output,
        }
    }

    pub fn expected_dir(&self, role: DirRole) -> &Path {
        match role {
            DirRole::Index => &self.expected_index,
            DirRole::Temporary => &self.expected_tmp,
            DirRole::Output => &self.expected_output,
        }
    }

    pub fn actual_path(&self, artifact: &ArtifactRef) -> PathBuf {
        join_artifact(self.actual_dir(artifact.role), artifact)
    }

    pub fn expected_path(&self, artifact: &ArtifactRef) -> PathBuf {
        join_artifact(self.expected_dir(artifact.role), artifact)
    }
}

fn join_artifact(dir: &Path, artifact: &ArtifactRef) -> PathBuf {
    match &artifact.sample {
        Some(sample) => dir.join(sample).join(&artifact.file_name),
        None => dir.join(&artifact.file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::{ResolvedDirs, expected_directory};
    use crate::domain::{ArtifactRef, DirRole};
    use std::path::{Path, PathBuf};

    #[test]
    fn expected_directory_keeps_final_component() {
        assert_eq!(
            expected_directory(Path::new("a/b/vignette/index/"), Path::new("/x/y")),
            PathBuf::from("/x/y/index")
        );
        assert_eq!(
            expected_directory(Path::new("vignette/simdata_umi_tmp"), Path::new("/x/y")),
            PathBuf::from("/x/y/simdata_umi_tmp")
        );
        assert_eq!(
            expected_directory(Path::new("./output/."), Path::new("/x/y")),
            PathBuf::from("/x/y/output")
        );
    }

    #[test]
    fn degenerate_directories_map_to_root() {
        assert_eq!(expected_directory(Path::new(""), Path::new("/x")), PathBuf::from("/x"));
        assert_eq!(expected_directory(Path::new("/"), Path::new("/x")), PathBuf::from("/x"));
    }

    #[test]
    fn artifacts_resolve_under_both_trees() {
        let dirs = ResolvedDirs::new(
            Path::new("vignette/index"),
            Path::new("vignette/tmp"),
            Path::new("vignette/output"),
            Path::new("/expected"),
        );
        let trim = ArtifactRef::per_sample(DirRole::Temporary, "WTnone", "trim.fq");
        let counts = ArtifactRef::shared(DirRole::Output, "read_counts_per_file.tsv");

        assert_eq!(dirs.actual_path(&trim), PathBuf::from("vignette/tmp/WTnone/trim.fq"));
        assert_eq!(dirs.expected_path(&trim), PathBuf::from("/expected/tmp/WTnone/trim.fq"));
        assert_eq!(
            dirs.expected_path(&counts),
            PathBuf::from("/expected/output/read_counts_per_file.tsv")
        );
    }
}
