//! Skip predicate (C7): loads a prior chunksums file and exposes
//! `contains(path) -> bool` for resumption.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::format::parse_chunksums;

/// The set of paths already recorded in a prior chunksums file. When
/// absent, nothing is skipped.
#[derive(Debug, Default)]
pub struct SkipSet {
    paths: HashSet<String>,
}

impl SkipSet {
    /// Build a [`SkipSet`] from the contents of a prior chunksums file.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let paths = parse_chunksums(&text)
            .into_iter()
            .map(|result| result.path)
            .collect();
        Ok(SkipSet { paths })
    }

    /// True if `path` is present in the prior chunksums file.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_skip_set_contains_prior_paths() {
        let dir = tempfile::tempdir().unwrap();
        let prior = dir.path().join("prior.chunksums");
        fs::write(
            &prior,
            "sum1  ./a  fck0sha2!\nsum2  ./b  fck0sha2!abcd:5\n",
        )
        .unwrap();
        let skip = SkipSet::from_file(&prior).unwrap();
        assert!(skip.contains("./a"));
        assert!(skip.contains("./b"));
        assert!(!skip.contains("./c"));
    }

    #[test]
    fn test_no_prior_file_means_no_skip() {
        let skip = SkipSet::default();
        assert!(!skip.contains("anything"));
    }
}
