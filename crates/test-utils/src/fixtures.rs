//! Test fixtures: a throwaway LDraw library and fake renderer executables.
//!
//! The fake renderers are small POSIX shell scripts that honor the same
//! argument contract as the real Blender invocation:
//! `--background --python <script> -- <asset> <output> ...`. They answer
//! `--version` like Blender does so the health probe can use them too.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::paths::temp_test_dir_with_prefix;

/// SVG written by [`FakeRenderer::succeeding`].
pub const FAKE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"><path d="M0 0L64 64" stroke="currentColor"/></svg>"#;

/// Minimal LDraw part body.
pub const FAKE_PART_DAT: &str = "0 Brick  2 x  4\n0 Name: 3001.dat\n1 16 0 0 0 1 0 0 0 1 0 0 0 1 s/3001s01.dat\n";

/// Temporary LDraw library with `parts/` and `p/` directories.
pub struct LibraryFixture {
    dir: TempDir,
}

impl LibraryFixture {
    /// Empty library with both collections present.
    pub fn new() -> Self {
        let fixture = Self::without_parts_dir();
        fs::create_dir_all(fixture.root().join("parts")).expect("create parts dir");
        fs::create_dir_all(fixture.root().join("p")).expect("create p dir");
        fixture
    }

    /// Library root with no collections, for unavailable-library checks.
    pub fn without_parts_dir() -> Self {
        Self {
            dir: temp_test_dir_with_prefix("ldraw_"),
        }
    }

    /// Library with a handful of common parts already present.
    pub fn with_common_parts() -> Self {
        let fixture = Self::new();
        fixture.add_part("3001.dat");
        fixture.add_part("3626bp01.dat");
        fixture.add_primitive("4-4disc.dat");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a part file under `parts/`, creating subdirectories as needed.
    pub fn add_part(&self, file_name: &str) -> PathBuf {
        self.write("parts", file_name)
    }

    /// Write a primitive file under `p/`.
    pub fn add_primitive(&self, file_name: &str) -> PathBuf {
        self.write("p", file_name)
    }

    fn write(&self, collection: &str, file_name: &str) -> PathBuf {
        let path = self.root().join(collection).join(file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create part parent dir");
        }
        fs::write(&path, FAKE_PART_DAT).expect("write part file");
        path
    }
}

impl Default for LibraryFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A shell script standing in for the Blender executable.
///
/// Every invocation records its arguments, one per line, to
/// [`FakeRenderer::args_file`].
#[cfg(unix)]
pub struct FakeRenderer {
    dir: TempDir,
    bin: PathBuf,
}

#[cfg(unix)]
impl FakeRenderer {
    /// Writes [`FAKE_SVG`] to the output path and exits 0.
    pub fn succeeding() -> Self {
        Self::with_body(&format!("printf '%s' '{}' > \"$6\"", FAKE_SVG))
    }

    /// Prints `stderr` on the error stream and exits with `code`.
    pub fn failing(stderr: &str, code: i32) -> Self {
        Self::with_body(&format!("echo '{}' >&2\nexit {}", stderr, code))
    }

    /// Sleeps for `secs` seconds without producing output.
    pub fn hanging(secs: u64) -> Self {
        Self::with_body(&format!("exec sleep {}", secs))
    }

    /// Exits 0 without writing anything.
    pub fn silent() -> Self {
        Self::with_body("exit 0")
    }

    /// Deletes the output path and exits 0.
    pub fn deleting_output() -> Self {
        Self::with_body("rm -f \"$6\"\nexit 0")
    }

    /// Script with a custom render body. `$1`..`$4` are the Blender flags,
    /// `$5` the asset path and `$6` the output path.
    pub fn with_body(body: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = temp_test_dir_with_prefix("fake_blender_");
        let bin = dir.path().join("blender");
        let args_file = dir.path().join("args.txt");
        let script = format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--version\" ]; then\n\
             echo 'Blender 4.2.0 (fake)'\n\
             exit 0\n\
             fi\n\
             printf '%s\\n' \"$@\" > '{}'\n\
             {}\n",
            args_file.display(),
            body
        );
        fs::write(&bin, script).expect("write fake renderer");
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755))
            .expect("make fake renderer executable");
        Self { dir, bin }
    }

    /// Path to pass as the Blender binary.
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    pub fn args_file(&self) -> PathBuf {
        self.dir.path().join("args.txt")
    }

    /// Arguments of the most recent render invocation.
    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(self.args_file())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
