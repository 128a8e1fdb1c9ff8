//! # File I/O Module
//!
//! Reads and writes section files, settings and reports with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename so a sized section is never half-written
//! - **File locking**: Keep two runs from overwriting the same section file
//! - **Version validation**: Reject section files from an incompatible schema
//!
//! ## File Format
//!
//! Sections are JSON files (see [`crate::input`]). Lock files sit next to
//! them with a `.lock` suffix and record who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use scantling_core::file_io::{load_section, save_section, FileLock};
//! use scantling_core::settings::AnalysisSettings;
//! use std::path::Path;
//!
//! let path = Path::new("midship.json");
//! let lock = FileLock::acquire(path, "naval.architect")?;
//! let section = load_section(path, &AnalysisSettings::default())?;
//! save_section(&section, path)?;
//! drop(lock);
//! # Ok::<(), scantling_core::errors::CsrError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::errors::{CsrError, CsrResult};
use crate::input::{SectionFile, SCHEMA_VERSION};
use crate::section::ShipSection;
use crate::settings::AnalysisSettings;

/// Lock file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Holds an OS-level lock (via fs2) on the `.lock` file, which also carries
/// the [`LockInfo`] for other users to read.
pub struct FileLock {
    section_path: PathBuf,
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a section file.
    ///
    /// Fails with [`CsrError::FileLocked`] while another live process holds it.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CsrResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(CsrError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                log::warn!(
                    "taking over stale lock on {} held by {} since {}",
                    path.display(),
                    existing.user_id,
                    existing.locked_at
                );
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CsrError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CsrError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| CsrError::SerializationError {
            reason: e.to_string(),
        })?;
        lock_file
            .write_all(lock_json.as_bytes())
            .map_err(|e| CsrError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;
        lock_file
            .sync_all()
            .map_err(|e| CsrError::file_error("sync lock", lock_path.display().to_string(), e.to_string()))?;

        log::debug!("lock acquired on {}", path.display());
        Ok(FileLock {
            section_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current holder of a file's lock, if any
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    pub fn section_path(&self) -> &Path {
        &self.section_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_to_string(path: &Path, operation: &str) -> CsrResult<String> {
    fs::read_to_string(path).map_err(|e| CsrError::file_error(operation, path.display().to_string(), e.to_string()))
}

fn read_lock_info(lock_path: &Path) -> CsrResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(|e| CsrError::SerializationError { reason: e.to_string() })
}

/// A lock is stale when its process is gone or it is older than a day
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

/// Write `contents` to `path` through a synced temporary file and a rename.
fn write_atomic(path: &Path, contents: &str) -> CsrResult<()> {
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    let tmp_path = path.with_extension(extension);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CsrError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(contents.as_bytes())
        .map_err(|e| CsrError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CsrError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CsrError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Serialize any value as pretty JSON and save it atomically
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> CsrResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CsrError::SerializationError { reason: e.to_string() })?;
    write_atomic(path, &json)
}

/// Save a section with its current as-built scantlings.
pub fn save_section(section: &ShipSection, path: &Path) -> CsrResult<()> {
    let json = SectionFile::from_section(section).to_json()?;
    write_atomic(path, &json)?;
    log::info!("section saved to {}", path.display());
    Ok(())
}

/// Read and version-check a section file without building the model.
pub fn load_section_file(path: &Path) -> CsrResult<SectionFile> {
    let contents = read_to_string(path, "read")?;
    let file = SectionFile::from_json(&contents).map_err(|e| match e {
        CsrError::InputSchema { reason, .. } => CsrError::input_schema(path.display().to_string(), reason),
        other => other,
    })?;
    if let Some(version) = &file.version {
        validate_version(version)?;
    }
    Ok(file)
}

/// Load a section file and build the section model.
pub fn load_section(path: &Path, settings: &AnalysisSettings) -> CsrResult<ShipSection> {
    let section = load_section_file(path)?.to_section(settings)?;
    log::info!("section loaded from {}", path.display());
    Ok(section)
}

/// Load a section together with the lock held on it by someone else, if any.
pub fn load_section_with_lock_check(
    path: &Path,
    settings: &AnalysisSettings,
) -> CsrResult<(ShipSection, Option<LockInfo>)> {
    let section = load_section(path, settings)?;
    Ok((section, FileLock::check(path)))
}

/// Load analysis settings; keys left out take their defaults.
pub fn load_settings(path: &Path) -> CsrResult<AnalysisSettings> {
    let contents = read_to_string(path, "read")?;
    let settings: AnalysisSettings = serde_json::from_str(&contents)
        .map_err(|e| CsrError::input_schema(path.display().to_string(), e.to_string()))?;
    settings.validate()?;
    Ok(settings)
}

/// A file is readable when its major version matches and it is not newer
/// than this build's schema.
fn validate_version(file_version: &str) -> CsrResult<()> {
    let mismatch = || CsrError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let file = Version::parse(file_version.trim()).map_err(|_| mismatch())?;
    let current = Version::parse(SCHEMA_VERSION).map_err(|_| mismatch())?;
    if file.major != current.major || file.minor > current.minor {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tests::{demo_section, DEMO};
    use approx::assert_relative_eq;
    use std::env::temp_dir;

    fn temp_section_path(name: &str) -> PathBuf {
        temp_dir().join(format!("scantling_test_{}.json", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/path/to/midship.json"));
        assert_eq!(lock_path, Path::new("/path/to/midship.json.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("architect");
        assert_eq!(info.user_id, "architect");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_section_path("roundtrip");
        let section = demo_section();
        save_section(&section, &path).unwrap();

        let loaded = load_section(&path, &AnalysisSettings::default()).unwrap();
        assert_eq!(loaded.panels.len(), section.panels.len());
        assert_relative_eq!(loaded.global.n50.i_xx, section.global.n50.i_xx, max_relative = 1e-9);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_section_path("atomic");
        let tmp_path = path.with_extension("json.tmp");
        save_section(&demo_section(), &path).unwrap();
        assert!(!tmp_path.exists());
        assert!(path.exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_section_path("lock_test");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "architect").unwrap();
        assert_eq!(lock.info.user_id, "architect");
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("1.0.7").is_ok());
        assert!(validate_version("0.9.0").is_err());
        assert!(validate_version("1.1.0").is_err());
        assert!(validate_version("2.0.0").is_err());
        assert_eq!(validate_version("one").unwrap_err().error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_newer_schema_is_rejected_on_load() {
        let path = temp_section_path("newer");
        fs::write(&path, DEMO.replacen("\"1.0.0\"", "\"3.0.0\"", 1)).unwrap();
        let err = load_section_file(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = load_section_file(&temp_section_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_partial_settings_file() {
        let path = temp_section_path("settings");
        fs::write(&path, r#"{ "grid_resolution": 4, "air_pipe_height": 0.9 }"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.grid_resolution, 4);
        assert_eq!(settings.air_pipe_height, 0.9);
        assert_eq!(settings.loading_conditions.len(), 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_section_path("lock_check");
        save_section(&demo_section(), &path).unwrap();
        let (loaded, lock_info) = load_section_with_lock_check(&path, &AnalysisSettings::default()).unwrap();
        assert_eq!(loaded.blocks.len(), 3);
        assert!(lock_info.is_none());
        let _ = fs::remove_file(&path);
    }
}
