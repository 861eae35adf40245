//! # File I/O
//!
//! Project persistence and report export.
//!
//! - **Atomic writes**: content goes to a `.tmp` sibling, is synced, then renamed
//! - **File locking**: an OS lock plus a `.lock` sidecar naming the holder
//! - **Version validation**: files from a newer schema are refused
//!
//! Projects are saved as `.sgp` (ShaftGear project) files containing JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use shaftgear_core::file_io::{save_project, FileLock};
//! use shaftgear_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "26-001");
//! let path = Path::new("gearbox.sgp");
//!
//! let lock = FileLock::acquire(path, "engineer@company.com")?;
//! save_project(&project, path)?;
//! drop(lock);
//! # Ok::<(), shaftgear_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Project file extension
pub const PROJECT_EXTENSION: &str = "sgp";

/// Locks older than this are considered abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Contents of a `.lock` sidecar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Abandoned: too old, or held by a dead process on this machine
    fn is_stale(&self) -> bool {
        if (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS {
            return true;
        }
        let same_machine = hostname().is_some_and(|m| m == self.machine);
        same_machine && !process_alive(self.pid)
    }

    fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

// Without a cheap liveness probe, only the age check can expire a lock.
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Exclusive lock on a project file, released on drop.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    /// Holds the OS lock
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// # Errors
    ///
    /// `FileLocked` if a live lock exists, `FileError` if the sidecar cannot
    /// be written.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Some(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(locked(path, existing.holder(), existing.locked_at.to_rfc3339()));
            }
            tracing::info!(path = %lock_path.display(), holder = %existing.holder(), "taking over stale lock");
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", display(&lock_path), e.to_string()))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| locked(path, "another process".to_string(), "unknown".to_string()))?;

        let json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        lock_file
            .write_all(json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", display(&lock_path), e.to_string()))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "acquired project lock");
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current live lock on `path`, if any
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path)).filter(|info| !info.is_stale())
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn locked(path: &Path, locked_by: String, locked_at: String) -> CalcError {
    CalcError::FileLocked {
        path: display(path),
        locked_by,
        locked_at,
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// `project.sgp` → `project.sgp.lock`
fn lock_path_for(project_path: &Path) -> PathBuf {
    sibling_with_suffix(project_path, "lock")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut out = path.to_path_buf();
    let extension = path
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    out.set_extension(extension);
    out
}

/// Unreadable or malformed sidecars count as no lock.
fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let text = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&text).ok()
}

/// Write `contents` to `path` atomically.
///
/// The bytes go to `<path>.tmp`, are synced to disk, and the temp file is
/// renamed over `path`. The temp file is removed if the rename fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = sibling_with_suffix(path, "tmp");

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", display(&tmp_path), e.to_string()))?;
    tmp_file
        .write_all(contents)
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| CalcError::file_error("write temp file", display(&tmp_path), e.to_string()))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", display(path), e.to_string())
    })
}

/// Save a project as pretty-printed JSON with an atomic write.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(CalcError::serialization)?;
    write_atomic(path, json.as_bytes())?;
    tracing::debug!(path = %path.display(), items = project.item_count(), "saved project");
    Ok(())
}

/// Load a project and check its schema version.
///
/// # Errors
///
/// - `FileError` - the file cannot be read
/// - `SerializationError` - invalid JSON
/// - `VersionMismatch` - the file was written by an incompatible schema
/// - `InvalidInput` - the embedded settings are unusable
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents =
        fs::read_to_string(path).map_err(|e| CalcError::file_error("read", display(path), e.to_string()))?;

    let project: Project = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&project.meta.version)?;
    project.settings.validate()?;
    tracing::debug!(path = %path.display(), items = project.item_count(), "loaded project");
    Ok(project)
}

/// Load a project together with any live lock held on it.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Major versions must match; under 0.x a newer minor is refused too.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Option<(u32, u32)> {
        let mut parts = v.split('.').map(str::parse::<u32>);
        let major = parts.next()?.ok()?;
        let minor = parts.next().unwrap_or(Ok(0)).ok()?;
        Some((major, minor))
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}
