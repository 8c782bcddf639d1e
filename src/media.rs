// src/media.rs
use mime::Mime;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use crate::errors::ServerError;

pub const PUBLIC_PREFIX: &str = "/uploads";
const MAX_EXTENSION_LEN: usize = 10;

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredMedia {
    pub url: String,
    pub filename: String,
}

/// Upload directory. Listings only ever hold the returned URLs.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
    max_bytes: u64,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, max_bytes })
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Write `bytes` under a fresh unique name that keeps the original extension.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredMedia, ServerError> {
        if bytes.len() as u64 > self.max_bytes {
            return Err(ServerError::PayloadTooLarge(self.max_bytes));
        }

        let filename = unique_filename(original_name);

        // create_new: names are unique, never overwrite.
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.dir.join(&filename))?;
        file.write_all(bytes)?;

        info!(%filename, size = bytes.len(), "media stored");
        Ok(StoredMedia {
            url: format!("{PUBLIC_PREFIX}/{filename}"),
            filename,
        })
    }

    /// Read a stored file back, with a content type guessed from its extension.
    pub fn open(&self, filename: &str) -> Result<(Vec<u8>, Mime), ServerError> {
        if !is_safe_name(filename) {
            return Err(ServerError::not_found("File"));
        }

        let bytes = match fs::read(self.dir.join(filename)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ServerError::not_found("File"))
            }
            Err(e) => return Err(e.into()),
        };

        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        Ok((bytes, mime))
    }
}

/// `<uuid>.<ext>` where ext is the lower-cased original extension, or just
/// `<uuid>` when the original has no usable one.
pub fn unique_filename(original_name: &str) -> String {
    let base = Uuid::new_v4().to_string();

    match extension(original_name) {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

fn extension(name: &str) -> Option<String> {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let (stem, ext) = file.rsplit_once('.')?;

    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && !name.contains("..")
        && !name.starts_with('.')
}
