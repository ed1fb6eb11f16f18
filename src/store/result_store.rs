//! File-backed resolution result store
//!
//! Writes are atomic: the file is written to a sibling temp path, fsynced,
//! then renamed into place. Reads verify magic, version and checksum before
//! decoding anything.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::component::ResolutionResult;
use super::errors::{StoreError, StoreResult};
use super::format::{decode_file, encode_file, StoreHeader};
use crate::codec::{CodecLimits, CodecStats, ReasonCodec};
use crate::config::LedgerConfig;
use crate::observability::{log_event_with_fields, Event};

/// A result read back from disk
#[derive(Debug, Clone)]
pub struct LoadedResult {
    pub header: StoreHeader,
    pub result: ResolutionResult,
    /// Codec counters for the read
    pub stats: CodecStats,
}

/// Persists one [`ResolutionResult`] per file.
///
/// Owns a single codec; not for concurrent use.
pub struct ResultStore {
    path: PathBuf,
    temp_path: PathBuf,
    codec: ReasonCodec,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>, limits: CodecLimits) -> Self {
        let path = path.into();
        let mut temp: OsString = path.as_os_str().to_owned();
        temp.push(".tmp");
        Self {
            path,
            temp_path: PathBuf::from(temp),
            codec: ReasonCodec::with_limits(limits),
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(&config.store_path, config.codec_limits())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counters from the most recent write or read
    pub fn codec_stats(&self) -> CodecStats {
        self.codec.stats()
    }

    /// Atomically replace the stored result with `result`.
    pub fn write(&mut self, result: &ResolutionResult) -> StoreResult<StoreHeader> {
        let header = StoreHeader::new_now();
        let bytes = encode_file(&mut self.codec, &header, result)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::io(format!("Failed to create directory {}", parent.display()), e)
                })?;
            }
        }

        if let Err(e) = self.commit(&bytes) {
            // the target is untouched; drop the partial temp file
            let _ = fs::remove_file(&self.temp_path);
            return Err(e);
        }

        // make the rename durable
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        let components = result.len().to_string();
        let bytes_len = bytes.len().to_string();
        let store_id = header.store_id.to_string();
        let inline_texts = self.codec.stats().inline_texts.to_string();
        log_event_with_fields(
            Event::StoreWriteComplete,
            &[
                ("bytes", bytes_len.as_str()),
                ("components", components.as_str()),
                ("inline_texts", inline_texts.as_str()),
                ("store_id", store_id.as_str()),
            ],
        );
        Ok(header)
    }

    /// Write `bytes` to the temp path, fsync, then rename over the target.
    fn commit(&self, bytes: &[u8]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| {
                StoreError::io(format!("Failed to create {}", self.temp_path.display()), e)
            })?;
        file.write_all(bytes).map_err(|e| {
            StoreError::io(format!("Failed to write {}", self.temp_path.display()), e)
        })?;
        file.sync_all().map_err(|e| {
            StoreError::io(format!("Failed to fsync {}", self.temp_path.display()), e)
        })?;
        drop(file);

        fs::rename(&self.temp_path, &self.path).map_err(|e| {
            StoreError::io(format!("Failed to commit {}", self.path.display()), e)
        })
    }

    /// Read and verify the stored result.
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read, including when it does not exist
    /// - `Corrupted`, `UnsupportedVersion` or `Codec` if the contents are bad
    pub fn read(&mut self) -> StoreResult<LoadedResult> {
        let data = fs::read(&self.path)
            .map_err(|e| StoreError::io(format!("Failed to read {}", self.path.display()), e))?;
        let (header, result) = decode_file(&mut self.codec, &data)?;

        let components = result.len().to_string();
        let store_id = header.store_id.to_string();
        log_event_with_fields(
            Event::StoreLoadComplete,
            &[
                ("components", components.as_str()),
                ("store_id", store_id.as_str()),
            ],
        );
        Ok(LoadedResult {
            header,
            result,
            stats: self.codec.stats(),
        })
    }

    /// Load a cached result, treating damage as a cache miss.
    ///
    /// - No file: `Ok(None)`
    /// - Corrupted file: logged, removed, `Ok(None)`; the caller recomputes
    /// - Any other failure: `Err`
    pub fn load_cached(&mut self) -> StoreResult<Option<LoadedResult>> {
        match fs::metadata(&self.path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let path = self.path.display().to_string();
                log_event_with_fields(Event::StoreMissing, &[("path", path.as_str())]);
                return Ok(None);
            }
            Err(e) => {
                return Err(StoreError::io(
                    format!("Failed to stat {}", self.path.display()),
                    e,
                ))
            }
        }

        match self.read() {
            Ok(loaded) => Ok(Some(loaded)),
            Err(err) if err.is_corruption() => {
                let path = self.path.display().to_string();
                let message = err.to_string();
                log_event_with_fields(
                    Event::StoreCorrupted,
                    &[
                        ("code", err.code()),
                        ("message", message.as_str()),
                        ("path", path.as_str()),
                    ],
                );
                self.invalidate()?;
                log_event_with_fields(Event::StoreInvalidated, &[("path", path.as_str())]);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Remove the stored result. Missing files are not an error.
    pub fn invalidate(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(
                format!("Failed to remove {}", self.path.display()),
                e,
            )),
        }
    }
}
