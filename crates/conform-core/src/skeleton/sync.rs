//! Tree comparison and synchronization backends
//!
//! Both backends share one contract: `compare` is a dry run that itemizes
//! what `apply` would change, and `apply` only adds or updates files in the
//! package. Nothing is ever deleted from the package side.

use std::fs;
use std::path::Path;
use std::process::Command;

use conform_fs::{NormalizedPath, compute_file_checksum};

use crate::{Error, Result};

/// Compares a reference entry against a package entry and copies missing or
/// differing content across.
pub trait TreeSync {
    /// Itemize what differs, recursively and by checksum. An empty string
    /// means the package already contains the whole reference entry.
    fn compare(&self, reference: &NormalizedPath, package: &NormalizedPath) -> Result<String>;

    /// Copy every missing or differing file from `reference` into `package`.
    fn apply(&self, reference: &NormalizedPath, package: &NormalizedPath) -> Result<()>;
}

/// [`TreeSync`] backed by the `rsync` executable.
#[derive(Debug, Clone)]
pub struct RsyncTreeSync {
    program: String,
    excludes: Vec<String>,
}

impl RsyncTreeSync {
    pub fn new(excludes: Vec<String>) -> Self {
        Self {
            program: "rsync".to_string(),
            excludes,
        }
    }

    /// Use a different executable, e.g. an absolute path to `rsync`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(
        &self,
        reference: &NormalizedPath,
        package: &NormalizedPath,
        dry_run: bool,
    ) -> Command {
        let mut cmd = Command::new(&self.program);
        if dry_run {
            cmd.arg("--dry-run");
        }
        cmd.args(["--recursive", "--checksum", "--itemize-changes"]);
        for exclude in &self.excludes {
            cmd.arg(format!("--exclude={exclude}"));
        }

        // A trailing slash syncs the directory's contents rather than nesting it
        let source = if reference.is_dir() {
            reference.with_trailing_slash()
        } else {
            reference.as_str().to_string()
        };
        cmd.arg(source).arg(package.as_str());
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<String> {
        let rendered = format!("{cmd:?}");
        tracing::debug!(command = %rendered, "running tree sync");

        let output = cmd.output()?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(Error::SyncCommandFailed {
                command: rendered,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl TreeSync for RsyncTreeSync {
    fn compare(&self, reference: &NormalizedPath, package: &NormalizedPath) -> Result<String> {
        self.run(self.command(reference, package, true))
    }

    fn apply(&self, reference: &NormalizedPath, package: &NormalizedPath) -> Result<()> {
        self.run(self.command(reference, package, false)).map(drop)
    }
}

/// In-process [`TreeSync`] comparing SHA-256 checksums.
///
/// Itemizes in rsync's style: `cd+++++++++` for a directory to create,
/// `>f+++++++++` for a new file and `>fc........` for a changed one.
#[derive(Debug, Clone, Default)]
pub struct ChecksumTreeSync {
    excludes: Vec<String>,
}

impl ChecksumTreeSync {
    pub fn new(excludes: Vec<String>) -> Self {
        Self { excludes }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.excludes.iter().any(|e| name == e.as_str()))
    }

    /// Directory children in name order, minus excluded names.
    fn children(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| conform_fs::Error::io(dir, e))? {
            let entry = entry.map_err(|e| conform_fs::Error::io(dir, e))?;
            if !self.is_excluded(&entry.path()) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn same_content(reference: &Path, package: &Path) -> Result<bool> {
        if !package.is_file() {
            return Ok(false);
        }
        let expected =
            compute_file_checksum(reference).map_err(|e| conform_fs::Error::io(reference, e))?;
        let actual =
            compute_file_checksum(package).map_err(|e| conform_fs::Error::io(package, e))?;
        Ok(expected == actual)
    }

    fn itemize(
        &self,
        reference: &Path,
        package: &Path,
        relative: &str,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        if reference.is_dir() {
            if !package.is_dir() {
                let shown = if relative.is_empty() {
                    "./".to_string()
                } else {
                    format!("{relative}/")
                };
                lines.push(format!("cd+++++++++ {shown}"));
            }
            for name in self.children(reference)? {
                let child = if relative.is_empty() {
                    name.clone()
                } else {
                    format!("{relative}/{name}")
                };
                self.itemize(&reference.join(&name), &package.join(&name), &child, lines)?;
            }
        } else if !package.exists() {
            lines.push(format!(">f+++++++++ {relative}"));
        } else if !Self::same_content(reference, package)? {
            lines.push(format!(">fc........ {relative}"));
        }
        Ok(())
    }

    fn copy_tree(&self, reference: &Path, package: &Path) -> Result<()> {
        if reference.is_dir() {
            fs::create_dir_all(package).map_err(|e| conform_fs::Error::io(package, e))?;
            for name in self.children(reference)? {
                self.copy_tree(&reference.join(&name), &package.join(&name))?;
            }
        } else if !Self::same_content(reference, package)? {
            if let Some(parent) = package.parent() {
                fs::create_dir_all(parent).map_err(|e| conform_fs::Error::io(parent, e))?;
            }
            fs::copy(reference, package).map_err(|e| conform_fs::Error::io(package, e))?;
            tracing::debug!(from = %reference.display(), to = %package.display(), "copied skeleton file");
        }
        Ok(())
    }
}

impl TreeSync for ChecksumTreeSync {
    fn compare(&self, reference: &NormalizedPath, package: &NormalizedPath) -> Result<String> {
        let reference = reference.to_native();
        if self.is_excluded(&reference) {
            return Ok(String::new());
        }

        // A top-level file is reported under its own name
        let relative = if reference.is_dir() {
            String::new()
        } else {
            reference
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        let mut lines = Vec::new();
        self.itemize(&reference, &package.to_native(), &relative, &mut lines)?;
        Ok(lines.join("\n"))
    }

    fn apply(&self, reference: &NormalizedPath, package: &NormalizedPath) -> Result<()> {
        let reference = reference.to_native();
        if self.is_excluded(&reference) {
            return Ok(());
        }
        self.copy_tree(&reference, &package.to_native())
    }
}
