//! Scratch directories holding a Makefile and the files it names.
//!
//! # Examples
//!
//! ```rust
//! use test_support::Workspace;
//!
//! let work = Workspace::with_makefile("app : main.o\n\tcc -o app main.o\n")
//!     .expect("workspace");
//! work.file_at("main.o", 10).expect("dated file");
//! assert!(work.exists("main.o"));
//! ```

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::io::Write;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// A temporary directory removed when dropped.
#[derive(Debug)]
pub struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    /// Create an empty workspace.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created or its path is not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create workspace dir")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|p| anyhow::anyhow!("workspace path {} is not UTF-8", p.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Create a workspace whose `Makefile` holds `contents`.
    ///
    /// # Errors
    ///
    /// Fails when the workspace or the Makefile cannot be written.
    pub fn with_makefile(contents: &str) -> Result<Self> {
        let work = Self::new()?;
        work.write("Makefile", contents)?;
        Ok(work)
    }

    /// Root directory of the workspace.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of `name` inside the workspace.
    #[must_use]
    pub fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Whether `name` exists inside the workspace.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    /// Write `contents` to `name`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.path(name);
        fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Create `name` with a modification time `secs` after the epoch.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be created or re-dated.
    pub fn file_at(&self, name: &str, secs: u64) -> Result<Utf8PathBuf> {
        let path = self.path(name);
        let file = File::options()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {path}"))?;
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .with_context(|| format!("set mtime of {path}"))?;
        Ok(path)
    }
}

/// Write an executable script named `name` into `root` that exits with
/// `exit_code`.
///
/// # Errors
///
/// Fails when the script cannot be written or marked executable.
pub fn fake_program(root: &Utf8Path, name: &str, exit_code: i32) -> Result<Utf8PathBuf> {
    let path = root.join(name);
    let mut file = File::create(&path).with_context(|| format!("create {path}"))?;
    writeln!(file, "#!/bin/sh\nexit {exit_code}").with_context(|| format!("write {path}"))?;
    drop(file);
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)
            .with_context(|| format!("stat {path}"))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).with_context(|| format!("chmod {path}"))?;
    }
    Ok(path)
}
