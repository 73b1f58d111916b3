//! On-disk store for generated images and their journal.
//!
//! Layout: image blobs and a single `metadata.json` journal share one directory. Journal
//! mutations are serialized through a writer lock; [`GeneratedImageStore::list`] takes no lock and
//! relies on journal writes being an atomic rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::journal::ImageJournal;
use super::record::{GeneratedImageRecord, NewImage};
use crate::{AdminError, Result};

pub const JOURNAL_FILE: &str = "metadata.json";

/// Journal ids further ahead of the clock than this are not timestamps this store issued and do
/// not hold back new ids.
const MAX_CLOCK_SKEW_MS: u64 = 24 * 60 * 60 * 1000;

enum JournalRead {
    Missing,
    Corrupt(String),
    Loaded(ImageJournal),
}

/// Hidden directory journal writes are staged in before being renamed into place.
pub const STAGING_DIR: &str = ".staging";

/// True for a plain file name an image may be stored under. Hidden entries, the journal and
/// quarantined journals are excluded, as is anything with path or escape characters.
pub fn is_image_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.starts_with("metadata.")
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

pub struct GeneratedImageStore {
    root: PathBuf,
    url_prefix: String,
    /// Last id handed out; held while the journal is read, modified and written.
    writer: Mutex<u64>,
}

impl GeneratedImageStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            writer: Mutex::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn journal_path(&self) -> PathBuf {
        self.root.join(JOURNAL_FILE)
    }

    /// Path of a blob, or `None` if the name is not one an image can be stored under.
    fn blob_path(&self, file_name: &str) -> Option<PathBuf> {
        is_image_file_name(file_name).then(|| self.root.join(file_name))
    }

    /// Stores `bytes` and records the image at the front of the journal.
    ///
    /// The blob is written before the journal is touched, so a failed write leaves the journal as
    /// it was. A journal write failure leaves the blob behind and is returned as an error.
    pub async fn append(&self, image: NewImage, bytes: &[u8]) -> Result<GeneratedImageRecord> {
        if bytes.is_empty() {
            return Err(AdminError::InvalidInput("image bytes are empty".into()));
        }

        let mut last_id = self.writer.lock().await;
        fs::create_dir_all(&self.root).await?;

        let current = self.read_journal().await;
        let now = Utc::now();
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let journal_floor = match &current {
            JournalRead::Loaded(journal) => {
                journal.max_sequence(now_ms.saturating_add(MAX_CLOCK_SKEW_MS)).unwrap_or(0)
            }
            _ => 0,
        };
        let floor = (*last_id).max(journal_floor);
        let id = now_ms.max(floor.saturating_add(1));

        let file_name = image.file_name(id);
        let path = self.blob_path(&file_name).ok_or_else(|| {
            AdminError::InvalidInput(format!("unusable image file name {file_name}"))
        })?;
        fs::write(&path, bytes).await?;
        *last_id = id;
        debug!(path = %path.display(), size = bytes.len(), "Wrote generated image");

        let mut journal = self.writable(current).await;

        let record = GeneratedImageRecord {
            id: id.to_string(),
            local_url: format!("{}/{}", self.url_prefix, file_name),
            file_name,
            original_url: image.original_url,
            prompt: image.prompt,
            timestamp: DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now),
        };

        let evicted = journal.prepend(record.clone());
        for old in &evicted {
            self.remove_blob(&old.file_name).await;
        }
        if !evicted.is_empty() {
            info!(count = evicted.len(), "Evicted oldest generated images");
        }

        self.save(&journal).await?;
        info!(id = %record.id, file = %record.file_name, entries = journal.len(), "Recorded generated image");
        Ok(record)
    }

    /// Journal records whose image file still exists, newest first.
    ///
    /// A missing or unreadable journal yields an empty list.
    pub async fn list(&self) -> Vec<GeneratedImageRecord> {
        let journal = match self.read_journal().await {
            JournalRead::Loaded(journal) => journal,
            JournalRead::Missing => return Vec::new(),
            JournalRead::Corrupt(reason) => {
                warn!(path = %self.journal_path().display(), %reason, "Ignoring unreadable image journal");
                return Vec::new();
            }
        };

        let mut images = Vec::with_capacity(journal.len());
        for record in journal.into_records() {
            let Some(path) = self.blob_path(&record.file_name) else {
                warn!(file = %record.file_name, "Skipping journal entry with invalid file name");
                continue;
            };
            if fs::try_exists(&path).await.unwrap_or(false) {
                images.push(record);
            } else {
                debug!(file = %record.file_name, "Skipping journal entry without image file");
            }
        }
        images
    }

    async fn read_journal(&self) -> JournalRead {
        match fs::read_to_string(self.journal_path()).await {
            Ok(raw) => match ImageJournal::from_json(&raw) {
                Ok(journal) => JournalRead::Loaded(journal),
                Err(e) => JournalRead::Corrupt(e.to_string()),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => JournalRead::Missing,
            Err(e) => JournalRead::Corrupt(e.to_string()),
        }
    }

    /// Turns a journal read into one that can be modified. An unreadable journal is moved aside so
    /// the next write does not destroy it.
    async fn writable(&self, read: JournalRead) -> ImageJournal {
        match read {
            JournalRead::Loaded(journal) => journal,
            JournalRead::Missing => ImageJournal::default(),
            JournalRead::Corrupt(reason) => {
                let quarantine = self
                    .root
                    .join(format!("metadata.corrupt-{}.json", Utc::now().timestamp_millis()));
                match fs::rename(self.journal_path(), &quarantine).await {
                    Ok(()) => warn!(%reason, moved_to = %quarantine.display(), "Quarantined unreadable image journal"),
                    Err(e) => warn!(%reason, error = %e, "Unreadable image journal will be overwritten"),
                }
                ImageJournal::default()
            }
        }
    }

    async fn save(&self, journal: &ImageJournal) -> Result<()> {
        let json = journal.to_json()?;
        let staging = self.root.join(STAGING_DIR);
        fs::create_dir_all(&staging).await?;
        let tmp = staging.join(format!("{JOURNAL_FILE}.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, json).await?;
        if let Err(e) = fs::rename(&tmp, self.journal_path()).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove_blob(&self, file_name: &str) {
        let Some(path) = self.blob_path(file_name) else {
            warn!(file = file_name, "Not deleting evicted entry with invalid file name");
            return;
        };
        match fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Deleted evicted image"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete evicted image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gallery::journal::JOURNAL_CAPACITY;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> GeneratedImageStore {
        GeneratedImageStore::new(dir.path().join("generated-images"), "/generated-images")
    }

    async fn append_n(store: &GeneratedImageStore, n: usize) -> Vec<GeneratedImageRecord> {
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let image = NewImage::jpeg(format!("https://cdn.example.com/{i}.jpg"), format!("prompt {i}"));
            out.push(store.append(image, b"\xFF\xD8jpeg").await.unwrap());
        }
        out
    }

    async fn journal_on_disk(store: &GeneratedImageStore) -> ImageJournal {
        let raw = fs::read_to_string(store.journal_path()).await.unwrap();
        ImageJournal::from_json(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_list_without_journal_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).list().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_list() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let first = append_n(&store, 1).await.remove(0);
        let second = store
            .append(NewImage::jpeg("https://cdn.example.com/b.jpg", "on linen"), b"bytes")
            .await
            .unwrap();

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].file_name, second.file_name);
        assert_eq!(listed[0].local_url, format!("/generated-images/{}", second.file_name));
        assert_eq!(listed[1], first);
        assert!(second.sequence() > first.sequence());
        assert!(store.root().join(&second.file_name).exists());
    }

    #[tokio::test]
    async fn test_empty_bytes_rejected_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let err = store.append(NewImage::jpeg("https://x", "p"), b"").await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidInput(_)));
        assert!(!store.journal_path().exists());
    }

    #[tokio::test]
    async fn test_eviction_at_capacity() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let records = append_n(&store, JOURNAL_CAPACITY + 1).await;

        let journal = journal_on_disk(&store).await;
        assert_eq!(journal.len(), JOURNAL_CAPACITY);
        assert_eq!(journal.newest(), records.last());

        let oldest = &records[0];
        assert!(!store.root().join(&oldest.file_name).exists());
        let listed = store.list().await;
        assert_eq!(listed.len(), JOURNAL_CAPACITY);
        assert!(listed.iter().all(|r| r.id != oldest.id));
        assert!(store.root().join(&records[1].file_name).exists());
    }

    #[tokio::test]
    async fn test_eviction_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let records = append_n(&store, JOURNAL_CAPACITY).await;
        fs::remove_file(store.root().join(&records[0].file_name)).await.unwrap();

        append_n(&store, 1).await;
        assert_eq!(journal_on_disk(&store).await.len(), JOURNAL_CAPACITY);
    }

    #[tokio::test]
    async fn test_list_skips_deleted_files() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let records = append_n(&store, 3).await;
        fs::remove_file(store.root().join(&records[1].file_name)).await.unwrap();

        let ids: Vec<_> = store.list().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, [records[2].id.clone(), records[0].id.clone()]);
        assert_eq!(journal_on_disk(&store).await.len(), 3);
    }

    #[tokio::test]
    async fn test_list_skips_path_escapes() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        append_n(&store, 1).await;
        let mut journal = journal_on_disk(&store).await;
        let mut hostile = journal.records()[0].clone();
        hostile.id = "9".into();
        hostile.file_name = "../secret.txt".into();
        fs::write(dir.path().join("secret.txt"), b"x").await.unwrap();
        journal.prepend(hostile);
        fs::write(store.journal_path(), journal.to_json().unwrap()).await.unwrap();

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_ne!(listed[0].file_name, "../secret.txt");
    }

    #[tokio::test]
    async fn test_corrupt_journal_is_empty_and_quarantined() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.root()).await.unwrap();
        fs::write(store.journal_path(), b"[{\"id\": truncated").await.unwrap();

        assert!(store.list().await.is_empty());

        let record = append_n(&store, 1).await.remove(0);
        assert_eq!(store.list().await, vec![record]);

        let mut quarantined = Vec::new();
        let mut entries = fs::read_dir(store.root()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("metadata.corrupt-") {
                quarantined.push(fs::read_to_string(entry.path()).await.unwrap());
            }
        }
        assert_eq!(quarantined, ["[{\"id\": truncated"]);
    }

    #[tokio::test]
    async fn test_ids_continue_after_existing_journal() {
        let dir = TempDir::new().unwrap();
        let first = append_n(&store(&dir), 1).await.remove(0);
        // Fresh store instance over the same directory, as after a restart.
        let reopened = store(&dir);
        let next = append_n(&reopened, 1).await.remove(0);
        assert!(next.sequence() > first.sequence());
        assert_ne!(next.file_name, first.file_name);
    }

    #[tokio::test]
    async fn test_implausible_journal_ids_do_not_block_appends() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let existing = append_n(&store, 1).await.remove(0);
        let mut journal = journal_on_disk(&store).await;
        let mut edited = journal.records()[0].clone();
        edited.id = u64::MAX.to_string();
        edited.file_name = "hand-edited.jpg".into();
        journal.prepend(edited);
        fs::write(store.journal_path(), journal.to_json().unwrap()).await.unwrap();

        let reopened = GeneratedImageStore::new(store.root(), "/generated-images");
        let next = append_n(&reopened, 1).await.remove(0);
        assert!(next.sequence().unwrap() > existing.sequence().unwrap());
        assert!(next.sequence().unwrap() < u64::MAX);
        assert_eq!(journal_on_disk(&reopened).await.len(), 3);
    }

    #[tokio::test]
    async fn test_unusable_file_name_leaves_journal_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        append_n(&store, 2).await;
        let before = journal_on_disk(&store).await;

        let bad = NewImage { extension: "jpg/../../escape".into(), ..NewImage::jpeg("https://x", "p") };
        let err = store.append(bad, b"bytes").await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidInput(_)), "{err}");
        assert_eq!(journal_on_disk(&store).await, before);
        assert!(!dir.path().join("escape").exists());
    }

    #[tokio::test]
    async fn test_failed_journal_write_keeps_blob_and_old_journal() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        append_n(&store, 2).await;
        let before = journal_on_disk(&store).await;
        fs::remove_dir_all(store.root().join(STAGING_DIR)).await.unwrap();
        fs::write(store.root().join(STAGING_DIR), b"not a directory").await.unwrap();

        let err = store.append(NewImage::jpeg("https://x/late.jpg", "p"), b"orphan").await.unwrap_err();
        assert!(matches!(err, AdminError::Io(_)), "{err}");
        assert_eq!(journal_on_disk(&store).await, before);

        let mut blobs = Vec::new();
        let mut entries = fs::read_dir(store.root()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("ai-generated-") {
                blobs.push(fs::read(entry.path()).await.unwrap());
            }
        }
        assert_eq!(blobs.len(), 3);
        assert!(blobs.iter().any(|b| b == b"orphan"));
    }

    #[test]
    fn test_image_file_names() {
        assert!(is_image_file_name("ai-generated-1700000000000.jpg"));
        assert!(is_image_file_name("hand_edited-2.png"));
        for name in ["", JOURNAL_FILE, "metadata.corrupt-17.json", ".staging", "../x.jpg", "a/b.jpg", "metadata%2Ejson", "a b.jpg"] {
            assert!(!is_image_file_name(name), "{name}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_serialized() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store(&dir));
        let total = JOURNAL_CAPACITY + 10;

        let handles: Vec<_> = (0..total)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .append(NewImage::jpeg(format!("https://x/{i}"), "concurrent"), b"bytes")
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let journal = journal_on_disk(&store).await;
        assert_eq!(journal.len(), total.min(JOURNAL_CAPACITY));
        assert_eq!(store.list().await.len(), total.min(JOURNAL_CAPACITY));
        let mut ids: Vec<_> = journal.records().iter().filter_map(|r| r.sequence()).collect();
        let newest_first = ids.clone();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.dedup();
        assert_eq!(ids, newest_first);
    }
}
