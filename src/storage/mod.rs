//! Persistence for the stored document.
//!
//! One JSON file holds the whole document. Every save rewrites it wholesale
//! (last full write wins) after snapshotting the previous version into the
//! backups directory, and the write itself goes through a temp file plus
//! rename so a failure never corrupts the current state.

pub mod paths;

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{config::Config, document::StoredDocument, errors::TrackerError};

pub type Result<T> = std::result::Result<T, TrackerError>;

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Owns the persisted state file and its backups.
#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
    state_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl DocumentStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = root.unwrap_or_else(paths::app_data_dir);
        paths::ensure_dir(&base)?;
        let backups_dir = paths::backups_dir_in(&base);
        paths::ensure_dir(&backups_dir)?;
        Ok(Self {
            state_file: paths::state_file_in(&base),
            backups_dir,
            root: base,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    /// Opens the store in the default application data directory.
    pub fn open_default() -> Result<Self> {
        Self::new(None, None)
    }

    /// Opens the store described by the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.data_dir.clone(), Some(config.backup_retention))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> &Path {
        &self.state_file
    }

    /// Loads the persisted document, or the initial document when nothing
    /// has been saved yet. Malformed JSON is fatal and propagates; the
    /// caller may choose to reset.
    pub fn load(&self) -> Result<StoredDocument> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoredDocument::default())
        }
    }

    /// Persists the whole document: snapshots the previous file into the
    /// backups directory, then writes atomically via a temp file.
    pub fn save(&self, document: &StoredDocument) -> Result<()> {
        if self.state_file.exists() {
            self.backup_existing_file()?;
        }
        let json = serde_json::to_string_pretty(document)?;
        let tmp = tmp_path(&self.state_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.state_file)?;
        tracing::info!(path = %self.state_file.display(), "state saved");
        Ok(())
    }

    /// Deletes the persisted state, keeping one last backup, and returns
    /// the initial document.
    pub fn reset(&self) -> Result<StoredDocument> {
        if self.state_file.exists() {
            self.backup_existing_file()?;
            fs::remove_file(&self.state_file)?;
        }
        Ok(StoredDocument::default())
    }

    /// Writes the document to an external file (the settings export).
    pub fn export_to_path(&self, document: &StoredDocument, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        write_atomic(path, &json)?;
        Ok(())
    }

    /// Reads a document from an external file (the settings import). The
    /// caller replaces the current document wholesale with the result.
    pub fn import_from_path(&self, path: &Path) -> Result<StoredDocument> {
        if !path.exists() {
            return Err(TrackerError::Storage(format!(
                "import file `{}` not found",
                path.display()
            )));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Lists backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    pub fn backup_path(&self, backup_name: &str) -> PathBuf {
        self.backups_dir.join(backup_name)
    }

    fn backup_existing_file(&self) -> Result<()> {
        paths::ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!("app-state_{}.{}", timestamp, BACKUP_EXTENSION);
        fs::copy(&self.state_file, self.backups_dir.join(backup_name))?;
        self.prune_backups()?;
        Ok(())
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for name in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_path(name));
        }
        Ok(())
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let segments: Vec<&str> = trimmed.split('_').collect();
    if segments.len() < 3 {
        return None;
    }
    let time_part = segments.last()?;
    let date_part = segments.get(segments.len() - 2)?;
    if date_part.len() != 8 || time_part.len() != 4 {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
