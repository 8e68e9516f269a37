//! Install and rollback of option file sets.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backup::{ADDED_LEDGER, BackupStore};
use crate::error::{FileAction, FileFailure, PatchError};
use crate::lock::with_folder_lock;
use crate::option::ModOption;
use crate::{README_FILES, REMOVABLE_ARTIFACT};

/// Direction of a patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Install,
    Rollback,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Install => write!(f, "install"),
            Mode::Rollback => write!(f, "rollback"),
        }
    }
}

/// Patch state of a game folder, derived from the backup folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchState {
    Clean,
    Patched,
}

impl fmt::Display for PatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchState::Clean => write!(f, "clean"),
            PatchState::Patched => write!(f, "patched"),
        }
    }
}

/// Outcome of a successful install or rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchReport {
    pub option: ModOption,
    pub mode: Mode,
    /// Originals moved into the backup folder.
    pub replaced: Vec<String>,
    /// Files installed where no original existed.
    pub added: Vec<String>,
    /// Originals moved back from the backup folder.
    pub restored: Vec<String>,
    /// Installed files deleted by rollback.
    pub removed: Vec<String>,
    /// True when rollback left a non-empty backup folder behind.
    pub backup_kept: bool,
}

impl PatchReport {
    fn new(option: ModOption, mode: Mode) -> Self {
        Self {
            option,
            mode,
            replaced: Vec::new(),
            added: Vec::new(),
            restored: Vec::new(),
            removed: Vec::new(),
            backup_kept: false,
        }
    }
}

impl fmt::Display for PatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Install => write!(
                f,
                "Files have been copied from {} to the game folder.",
                self.option
            ),
            Mode::Rollback if self.backup_kept => write!(
                f,
                "Files have been reverted to the original location; the bak folder still holds other files and was kept."
            ),
            Mode::Rollback => write!(
                f,
                "Files have been reverted to the original location, and the bak folder has been removed."
            ),
        }
    }
}

/// A completed install step, kept so a failed install can be undone.
#[derive(Debug)]
enum Step {
    BackedUp(String),
    Copied(String),
}

/// Applies and reverts option file sets against game folders.
#[derive(Debug, Clone)]
pub struct PatchEngine {
    options_dir: PathBuf,
}

impl PatchEngine {
    /// Creates an engine reading option folders from `options_dir`.
    pub fn new(options_dir: impl Into<PathBuf>) -> Self {
        Self {
            options_dir: options_dir.into(),
        }
    }

    pub fn options_dir(&self) -> &Path {
        &self.options_dir
    }

    /// Returns `<options_dir>/<option>`.
    pub fn option_dir(&self, option: ModOption) -> PathBuf {
        self.options_dir.join(option.as_str())
    }

    /// Returns the current patch state of `target`.
    pub fn state(&self, target: &Path) -> PatchState {
        if BackupStore::for_target(target).exists() {
            PatchState::Patched
        } else {
            PatchState::Clean
        }
    }

    pub fn install(&self, target: &Path, option: ModOption) -> Result<PatchReport, PatchError> {
        self.apply(target, option, Mode::Install)
    }

    pub fn rollback(&self, target: &Path, option: ModOption) -> Result<PatchReport, PatchError> {
        self.apply(target, option, Mode::Rollback)
    }

    /// Installs or rolls back `option` in `target`.
    ///
    /// Calls on the same folder are serialized. Install refuses a folder that
    /// already has a backup folder. A failed file step is reported as
    /// [`PatchError::PartialIo`]; install undoes its completed steps first.
    pub fn apply(
        &self,
        target: &Path,
        option: ModOption,
        mode: Mode,
    ) -> Result<PatchReport, PatchError> {
        let key = validate_target(target)?;

        with_folder_lock(&key, || {
            let files = self.option_files(option)?;
            let backup = BackupStore::for_target(target);

            let report = match mode {
                Mode::Install => install(target, &backup, &files, option)?,
                Mode::Rollback => rollback(target, &backup, &files, option)?,
            };

            tracing::info!(
                target = %target.display(),
                %option,
                %mode,
                replaced = report.replaced.len(),
                added = report.added.len(),
                restored = report.restored.len(),
                removed = report.removed.len(),
                "patch operation finished"
            );
            Ok(report)
        })
    }

    /// Lists the option's installable files as `(name, path)`, sorted by name.
    fn option_files(&self, option: ModOption) -> Result<Vec<(String, PathBuf)>, PatchError> {
        let dir = self.option_dir(option);
        let entries = fs::read_dir(&dir).map_err(|source| PatchError::MissingOptionFolder {
            path: dir.clone(),
            source,
        })?;

        let mut files: Vec<(String, PathBuf)> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path))
            })
            .filter(|(name, _)| {
                !README_FILES.contains(&name.as_str()) && name.as_str() != ADDED_LEDGER
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Checks that `target` names an existing directory and returns its
/// canonical form, used as the lock key.
fn validate_target(target: &Path) -> Result<PathBuf, PatchError> {
    let invalid = || PatchError::InvalidTarget(target.display().to_string());
    if target.as_os_str().is_empty() || !target.is_dir() {
        return Err(invalid());
    }
    fs::canonicalize(target).map_err(|_| invalid())
}

fn install(
    target: &Path,
    backup: &BackupStore,
    files: &[(String, PathBuf)],
    option: ModOption,
) -> Result<PatchReport, PatchError> {
    if backup.exists() {
        return Err(PatchError::AlreadyInstalled {
            backup: backup.path().to_path_buf(),
        });
    }
    backup.create()?;

    let mut report = PatchReport::new(option, Mode::Install);
    let mut journal = Vec::new();

    for (name, source) in files {
        if let Err(failure) = install_file(target, backup, name, source, &mut journal, &mut report)
        {
            return Err(abort_install(target, backup, journal, failure));
        }
    }

    if let Err(e) = backup.record_added(&report.added) {
        let failure = FileFailure::new("added-files ledger", FileAction::Record, e);
        return Err(abort_install(target, backup, journal, failure));
    }

    Ok(report)
}

fn install_file(
    target: &Path,
    backup: &BackupStore,
    name: &str,
    source: &Path,
    journal: &mut Vec<Step>,
    report: &mut PatchReport,
) -> Result<(), FileFailure> {
    let dest = target.join(name);

    if dest.exists() {
        fs::rename(&dest, backup.entry(name))
            .map_err(|e| FileFailure::new(name, FileAction::Backup, e))?;
        journal.push(Step::BackedUp(name.to_string()));
        report.replaced.push(name.to_string());
        tracing::debug!(file = name, "moved original to backup");
    } else {
        report.added.push(name.to_string());
    }

    // Journaled before copying: a failed copy may leave a partial file.
    journal.push(Step::Copied(name.to_string()));
    fs::copy(source, &dest).map_err(|e| FileFailure::new(name, FileAction::Copy, e))?;
    tracing::debug!(file = name, "copied option file");
    Ok(())
}

/// Undoes the journaled steps of a failed install, newest first.
fn abort_install(
    target: &Path,
    backup: &BackupStore,
    journal: Vec<Step>,
    failure: FileFailure,
) -> PatchError {
    tracing::warn!(error = %failure, "install failed, reverting completed steps");
    let mut failures = vec![failure];

    for step in journal.into_iter().rev() {
        let result = match &step {
            Step::Copied(name) => remove_if_exists(&target.join(name))
                .map(|_| ())
                .map_err(|e| FileFailure::new(name, FileAction::Delete, e)),
            Step::BackedUp(name) => fs::rename(backup.entry(name), target.join(name))
                .map_err(|e| FileFailure::new(name, FileAction::Restore, e)),
        };
        if let Err(undo_failure) = result {
            tracing::warn!(error = %undo_failure, "failed to revert install step");
            failures.push(undo_failure);
        }
    }

    let reverted = failures.len() == 1 && matches!(backup.remove_if_empty(), Ok(true));
    PatchError::PartialIo { failures, reverted }
}

fn rollback(
    target: &Path,
    backup: &BackupStore,
    files: &[(String, PathBuf)],
    option: ModOption,
) -> Result<PatchReport, PatchError> {
    let mut report = PatchReport::new(option, Mode::Rollback);
    let mut failures = Vec::new();

    let added = match backup.added() {
        Ok(added) => added,
        Err(e) => {
            failures.push(FileFailure::new("added-files ledger", FileAction::Record, e));
            Vec::new()
        }
    };

    for (name, _) in files {
        let dest = target.join(name);

        if name == REMOVABLE_ARTIFACT || added.contains(name) {
            match remove_if_exists(&dest) {
                Ok(true) => {
                    report.removed.push(name.clone());
                    tracing::debug!(file = %name, "deleted installed file");
                }
                Ok(false) => {}
                Err(e) => {
                    failures.push(FileFailure::new(name, FileAction::Delete, e));
                    continue;
                }
            }
        }

        if backup.contains(name) {
            match fs::rename(backup.entry(name), &dest) {
                Ok(()) => {
                    report.restored.push(name.clone());
                    tracing::debug!(file = %name, "restored original");
                }
                Err(e) => failures.push(FileFailure::new(name, FileAction::Restore, e)),
            }
        }
    }

    if !failures.is_empty() {
        for failure in &failures {
            tracing::warn!(error = %failure, "rollback step failed");
        }
        return Err(PatchError::PartialIo {
            failures,
            reverted: false,
        });
    }

    // Added files outside this option's set stay recorded for a later rollback.
    let remaining: Vec<String> = added
        .into_iter()
        .filter(|name| !files.iter().any(|(file, _)| file == name))
        .collect();
    if !remaining.is_empty() {
        tracing::warn!(
            files = ?remaining,
            "installed files not covered by this option, keeping them recorded"
        );
    }
    backup.record_added(&remaining)?;
    backup.remove_if_empty()?;
    report.backup_kept = backup.exists();
    Ok(report)
}

/// Deletes a file, returning whether it existed.
fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
