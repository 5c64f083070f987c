//! Flat on-disk store for uploaded files.
//!
//! Files live directly under one directory, keyed by file name. Which room a
//! file belongs to is tracked by the registry, not here.
//!
//! Concurrent access to one file name is guarded: an upload excludes every
//! other transfer of that name, while any number of downloads may share it.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tokio::fs::File;

use crate::domain::FileName;

pub struct FileStore {
    root: PathBuf,
    claims: Mutex<HashMap<FileName, Claim>>,
}

/// Who is currently using a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Claim {
    Upload,
    /// Number of downloads in flight
    Download(usize),
}

/// Marks an upload as in flight until dropped
#[derive(Debug)]
pub struct UploadGuard<'a> {
    store: &'a FileStore,
    file_name: FileName,
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.store.claims().remove(&self.file_name);
    }
}

/// Marks a download as in flight until dropped
#[derive(Debug)]
pub struct DownloadGuard<'a> {
    store: &'a FileStore,
    file_name: FileName,
}

impl Drop for DownloadGuard<'_> {
    fn drop(&mut self) {
        let mut claims = self.store.claims();
        let remaining = match claims.get_mut(&self.file_name) {
            Some(Claim::Download(readers)) => {
                *readers = readers.saturating_sub(1);
                *readers
            }
            _ => return,
        };
        if remaining == 0 {
            claims.remove(&self.file_name);
        }
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore").field("root", &self.root).finish()
    }
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            claims: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the uploads directory if it does not exist yet
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    pub fn path_of(&self, file_name: &FileName) -> PathBuf {
        self.root.join(file_name.as_str())
    }

    fn claims(&self) -> std::sync::MutexGuard<'_, HashMap<FileName, Claim>> {
        self.claims.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim a file name for upload.
    ///
    /// Returns `None` while another upload or any download of the same name
    /// is in flight.
    pub fn begin_upload(&self, file_name: &FileName) -> Option<UploadGuard<'_>> {
        let mut claims = self.claims();
        if claims.contains_key(file_name) {
            return None;
        }
        claims.insert(file_name.clone(), Claim::Upload);
        Some(UploadGuard {
            store: self,
            file_name: file_name.clone(),
        })
    }

    /// Claim a file name for download.
    ///
    /// Returns `None` while an upload of the same name is in flight.
    pub fn begin_download(&self, file_name: &FileName) -> Option<DownloadGuard<'_>> {
        let mut claims = self.claims();
        match claims
            .entry(file_name.clone())
            .or_insert(Claim::Download(0))
        {
            Claim::Upload => return None,
            Claim::Download(readers) => *readers += 1,
        }
        Some(DownloadGuard {
            store: self,
            file_name: file_name.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn is_uploading(&self, file_name: &FileName) -> bool {
        self.claims().get(file_name) == Some(&Claim::Upload)
    }

    /// Create (or truncate) the file for an upload
    pub async fn create(&self, file_name: &FileName) -> io::Result<File> {
        File::create(self.path_of(file_name)).await
    }

    /// Open a stored file for download; `None` if it is not on disk
    pub async fn open(&self, file_name: &FileName) -> io::Result<Option<File>> {
        match File::open(self.path_of(file_name)).await {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
