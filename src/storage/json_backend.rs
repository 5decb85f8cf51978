use chrono::Utc;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils,
    domain::cashbook::{Cashbook, StateDocument},
    errors::StoreError,
};

use super::{Result, StorageBackend};

const BOOK_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// File-per-book JSON storage with atomic writes and timestamped backups.
#[derive(Clone)]
pub struct JsonStorage {
    books_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = root.unwrap_or_else(utils::app_data_dir);
        ensure_dir(&app_root)?;
        let books_dir = app_root.join("books");
        let backups_dir = app_root.join("backups");
        ensure_dir(&books_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            books_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.{}", canonical_name(name), BOOK_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BOOK_EXTENSION
        );
        fs::copy(path, dir.join(backup_name))?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_dir(name).join(entry));
        }
        Ok(())
    }

    /// Backup file names for a book, newest first.
    pub fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|stem| stem.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, book: &Cashbook, name: &str) -> Result<()> {
        let path = self.book_path(name);
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        save_book_to_path(book, &path)
    }

    fn load(&self, name: &str) -> Result<Cashbook> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(StoreError::Storage(format!("book `{}` not found", name)));
        }
        load_book_from_path(&path)
    }

    fn list_books(&self) -> Result<Vec<String>> {
        if !self.books_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.books_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Writes the book atomically by staging to a temporary file first, so a
/// failed write never corrupts the previous document.
pub fn save_book_to_path(book: &Cashbook, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let document = StateDocument {
        state: book.clone(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), "saved book");
    Ok(())
}

/// Loads a book document; every date field is revived from its ISO-8601
/// string form by the typed deserialize.
pub fn load_book_from_path(path: &Path) -> Result<Cashbook> {
    let data = fs::read_to_string(path)?;
    let document: StateDocument = serde_json::from_str(&data)?;
    Ok(document.state)
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "book".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::base::{Base, BaseKind};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    fn sample_book() -> Cashbook {
        let mut book = Cashbook::new("Sample");
        book.insert_base(Base::new("Checking", BaseKind::Checking).with_balance(Decimal::ONE));
        book
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let book = sample_book();
        storage.save(&book, "household").expect("save book");
        let loaded = storage.load("household").expect("load book");
        assert_eq!(loaded.name, "Sample");
        assert_eq!(loaded.bases.len(), 1);
    }

    #[test]
    fn resaving_creates_timestamped_backups() {
        let (storage, _guard) = storage_with_temp_dir();
        let book = sample_book();
        storage.save(&book, "family").expect("first save");
        storage.save(&book, "family").expect("second save");
        let backups = storage.list_backups("family").expect("list backups");
        assert!(
            !backups.is_empty(),
            "expected at least one backup file to be created"
        );
    }

    #[test]
    fn loading_a_missing_book_fails_cleanly() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.load("nothing-here").is_err());
    }
}
