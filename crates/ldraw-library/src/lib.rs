//! Part file lookup in an LDraw library.
//!
//! The library is a read-only tree with official parts under `parts/` and
//! primitives under `p/`. Part identifiers are case-insensitive in LDraw but
//! the directory entries on disk are not, so a lookup tries the identifier as
//! given, then lowercased, then uppercased, in each directory in turn.

use std::path::{Path, PathBuf};

use tracing::debug;

/// File extension of LDraw part files.
pub const PART_EXTENSION: &str = "dat";

/// Primary collection, searched first.
pub const PARTS_DIR: &str = "parts";

/// Primitives collection, searched when the part is not in `parts/`.
pub const PRIMITIVES_DIR: &str = "p";

/// Handle to an LDraw library rooted at a directory.
#[derive(Debug, Clone)]
pub struct PartLibrary {
    root: PathBuf,
}

impl PartLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library root, as passed to the renderer.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn parts_dir(&self) -> PathBuf {
        self.root.join(PARTS_DIR)
    }

    pub fn primitives_dir(&self) -> PathBuf {
        self.root.join(PRIMITIVES_DIR)
    }

    /// Every path a lookup for `part` probes, in probe order.
    pub fn candidates(&self, part: &str) -> Vec<PathBuf> {
        let names = file_name_variants(part);
        [self.parts_dir(), self.primitives_dir()]
            .iter()
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .collect()
    }

    /// Find the file for `part`. Returns `None` when no candidate exists.
    pub async fn resolve(&self, part: &str) -> Option<PathBuf> {
        for path in self.candidates(part) {
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {
                    debug!(part = %part, path = %path.display(), "Resolved part file");
                    return Some(path);
                }
                _ => continue,
            }
        }
        None
    }

    /// True when the parts directory exists and can be listed.
    pub async fn is_available(&self) -> bool {
        tokio::fs::read_dir(self.parts_dir()).await.is_ok()
    }
}

/// File names for a part identifier: verbatim, lowercase, uppercase.
///
/// Variants that collapse to the same name (digits-only identifiers, for
/// instance) are only listed once.
pub fn file_name_variants(part: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(3);
    for variant in [
        part.to_string(),
        part.to_lowercase(),
        part.to_uppercase(),
    ] {
        let name = format!("{}.{}", variant, PART_EXTENSION);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
