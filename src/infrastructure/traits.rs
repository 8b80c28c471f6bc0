//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing inventory
//! sources and commands to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::process::Output;

use crate::domain::Ipv4Range;
use crate::infrastructure::InfraResult;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments, capturing stdout and stderr.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;
}

/// Source of address ranges that are already in use.
pub trait RangeInventory: Send + Sync {
    /// Fetch the used ranges. Order is preserved, duplicates are kept.
    fn used_ranges(&self) -> InfraResult<Vec<Ipv4Range>>;

    /// Human-readable name of the source, for logs and errors.
    fn describe(&self) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Real command runner implementation.
///
/// On Windows `az` is an `az.cmd` wrapper, which `Command` cannot start
/// directly; such commands go through `cmd /C`.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        if cfg!(windows) {
            std::process::Command::new("cmd")
                .arg("/C")
                .arg(cmd)
                .args(args)
                .output()
        } else {
            std::process::Command::new(cmd).args(args).output()
        }
    }
}
