use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use tianfu_shared::constants::MAILBOX_CAPACITY;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::models::{LetterRecord, NewLetter};

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 6;

/// `<epoch millis>_<random base36 suffix>`
fn generate_id(now_millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{now_millis}_{suffix}")
}

/// Split the mailbox file into its array entries. Anything that is not a JSON
/// array yields no entries.
fn parse_entries(raw: &str, path: &Path) -> Vec<Value> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!(path = %path.display(), "Mailbox file is not a JSON array, treating as empty");
            Vec::new()
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Mailbox file is not valid JSON, treating as empty"
            );
            Vec::new()
        }
    }
}

/// Typed view of the entries. Entries that are not valid records are skipped
/// here but stay in the file.
fn decode_records(entries: Vec<Value>) -> Vec<LetterRecord> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping invalid mailbox entry");
                None
            }
        })
        .collect()
}

fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

/// The capped, file-backed list of saved letters.
///
/// New letters go to the front of the on-disk array and the array is cut to
/// `capacity` entries, so the oldest insertions fall off first. Readers get
/// the list sorted by `createdAt`, newest first.
///
/// `append` and `remove` hold `write_lock` for their whole
/// load-mutate-persist sequence. Other processes writing the same file are
/// not coordinated with.
#[derive(Debug)]
pub struct Mailbox {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl Mailbox {
    /// Open the mailbox at `path` with the default capacity, creating an empty
    /// file if none exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_capacity(path, MAILBOX_CAPACITY).await
    }

    pub async fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mailbox = Self {
            path,
            capacity,
            write_lock: Mutex::new(()),
        };
        mailbox.ensure_file().await;

        info!(path = %mailbox.path.display(), capacity, "Mailbox initialized");
        Ok(mailbox)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    async fn ensure_file(&self) {
        match fs::try_exists(&self.path).await {
            Ok(true) => {}
            Ok(false) => {
                if let Err(e) = fs::write(&self.path, "[]").await {
                    warn!(path = %self.path.display(), error = %e, "Failed to create mailbox file");
                }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to stat mailbox file");
            }
        }
    }

    /// Raw array entries in on-disk order, including ones that do not decode
    /// as records. Never fails: read and parse problems are logged and
    /// produce an empty list.
    async fn load_entries(&self) -> Vec<Value> {
        self.ensure_file().await;

        match fs::read_to_string(&self.path).await {
            Ok(raw) => parse_entries(&raw, &self.path),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read mailbox file");
                Vec::new()
            }
        }
    }

    /// All valid records in on-disk order.
    pub async fn load(&self) -> Vec<LetterRecord> {
        decode_records(self.load_entries().await)
    }

    /// All records, newest `createdAt` first.
    pub async fn list(&self) -> Vec<LetterRecord> {
        let mut records = self.load().await;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Save a letter and return its freshly assigned id.
    ///
    /// Entries already in the file are written back untouched, whether or
    /// not they decode as records.
    pub async fn append(&self, letter: NewLetter) -> Result<String> {
        if !letter.has_text() {
            return Err(StoreError::MissingText);
        }

        let _guard = self.write_lock.lock().await;
        let now = Utc::now().timestamp_millis();

        let mut entries = self.load_entries().await;
        let mut id = generate_id(now);
        while entries.iter().any(|e| entry_id(e) == Some(id.as_str())) {
            id = generate_id(now);
        }

        let record = letter
            .into_record(id.clone(), now)
            .ok_or(StoreError::MissingText)?;
        entries.insert(0, serde_json::to_value(&record)?);
        entries.truncate(self.capacity);

        self.persist(&entries).await?;

        debug!(id = %id, count = entries.len(), "Appended letter to mailbox");
        Ok(id)
    }

    /// Delete every entry with this id. Unknown ids are not an error.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load_entries().await;
        let before = entries.len();
        entries.retain(|e| entry_id(e) != Some(id));

        if entries.len() == before {
            debug!(id = %id, "No mailbox entry to remove");
            return Ok(());
        }

        self.persist(&entries).await?;

        debug!(id = %id, count = entries.len(), "Removed letter from mailbox");
        Ok(())
    }

    /// Write the full list to a sibling temp file, then rename it over the
    /// mailbox so readers never see a half-written array.
    async fn persist(&self, entries: &[Value]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.tmp_path();

        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "mailbox.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
