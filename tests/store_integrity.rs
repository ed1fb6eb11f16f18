//! Result Store Integrity Tests
//!
//! Tests for:
//! - A written result reads back with order and primary descriptions intact
//! - Damaged files are never decoded into a result
//! - `load_cached` turns damage into a cache miss and removes the file
//! - Files from another format version are rejected, not migrated
//! - A result the reader would reject is refused at write time

use selection_ledger::codec::CodecLimits;
use selection_ledger::selection::{SelectionCause, SelectionDescription, SelectionReason};
use selection_ledger::store::{
    compute_checksum, ComponentId, ResolutionResult, ResultStore, StoreError, FORMAT_VERSION,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn store_in(dir: &TempDir) -> (ResultStore, PathBuf) {
    let path = dir.path().join("resolution.slr");
    (ResultStore::new(&path, CodecLimits::default()), path)
}

fn sample_result() -> ResolutionResult {
    let mut lib = SelectionReason::requested();
    lib.add_cause(SelectionCause::Forced, "forced to 1.2")
        .add_cause(SelectionCause::ConflictResolution, "won conflict vote");

    let mut util = SelectionReason::requested();
    util.add_cause(SelectionCause::Forced, "forced to 1.2");

    let mut substituted = SelectionReason::root();
    substituted.set_cause(SelectionCause::CompositeBuildSubstitution.into());

    [
        (ComponentId::new("org", "app", "1.0"), SelectionReason::root()),
        (ComponentId::new("org", "lib", "1.2"), lib),
        (ComponentId::new("org", "util", "1.2"), util),
        (ComponentId::new("org", "core", "dev"), substituted),
    ]
    .into_iter()
    .collect()
}

fn wide_reason(count: usize) -> SelectionReason {
    let descriptions = (0..count)
        .map(|i| SelectionDescription::with_text(SelectionCause::Forced, format!("pin {}", i)));
    SelectionReason::of(descriptions).unwrap()
}

/// Rewrite the trailing checksum so only the targeted damage remains.
fn reseal(bytes: &mut [u8]) {
    let len = bytes.len();
    let checksum = compute_checksum(&bytes[..len - 4]);
    bytes[len - 4..].copy_from_slice(&checksum.to_le_bytes());
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_written_result_reads_back_intact() {
    let dir = create_temp_dir();
    let (mut store, _) = store_in(&dir);
    let header = store.write(&sample_result()).unwrap();

    let loaded = store.read().unwrap();
    assert_eq!(loaded.header.store_id, header.store_id);
    assert_eq!(loaded.header.format_version, FORMAT_VERSION);

    let expected = sample_result();
    let ids: Vec<String> = loaded.result.iter().map(|c| c.id().to_string()).collect();
    assert_eq!(ids, ["org:app:1.0", "org:lib:1.2", "org:util:1.2", "org:core:dev"]);
    for (actual, wanted) in loaded.result.iter().zip(expected.iter()) {
        assert_eq!(actual.reason().descriptions(), wanted.reason().descriptions());
        assert_eq!(actual.reason().primary_text(), wanted.reason().primary_text());
    }

    let lib = loaded.result.get(&ComponentId::new("org", "lib", "1.2")).unwrap();
    assert!(lib.is_forced());
    assert!(!lib.is_expected());
    assert_eq!(loaded.result.unexpected().count(), 3);

    // "forced to 1.2" and "requested" are written once
    assert!(loaded.stats.dictionary_refs >= 2);
}

/// Overwriting replaces the previous file with a new store id.
#[test]
fn test_rewrite_replaces_previous_result() {
    let dir = create_temp_dir();
    let (mut store, _) = store_in(&dir);
    let first = store.write(&sample_result()).unwrap();

    let single: ResolutionResult =
        [(ComponentId::new("org", "app", "2.0"), SelectionReason::root())]
            .into_iter()
            .collect();
    let second = store.write(&single).unwrap();
    assert_ne!(first.store_id, second.store_id);

    let loaded = store.read().unwrap();
    assert_eq!(loaded.header.store_id, second.store_id);
    assert_eq!(loaded.result.len(), 1);
}

// =============================================================================
// Damage Detection
// =============================================================================

/// Any flipped byte fails the read with a corruption error.
#[test]
fn test_flipped_byte_is_detected() {
    let dir = create_temp_dir();
    let (mut store, path) = store_in(&dir);
    store.write(&sample_result()).unwrap();
    let pristine = fs::read(&path).unwrap();

    for offset in [0, 4, 10, 30, pristine.len() / 2, pristine.len() - 1] {
        let mut damaged = pristine.clone();
        damaged[offset] ^= 0xff;
        fs::write(&path, &damaged).unwrap();

        let err = store.read().unwrap_err();
        assert!(err.is_corruption(), "offset {}: {}", offset, err);
    }
}

#[test]
fn test_truncated_file_is_detected() {
    let dir = create_temp_dir();
    let (mut store, path) = store_in(&dir);
    store.write(&sample_result()).unwrap();
    let pristine = fs::read(&path).unwrap();

    for len in [0, 3, 20, pristine.len() - 5] {
        fs::write(&path, &pristine[..len]).unwrap();
        assert!(store.read().unwrap_err().is_corruption(), "length {}", len);
    }
}

/// A valid checksum over bad codec bytes still fails in the codec.
#[test]
fn test_resealed_bad_tag_is_codec_error() {
    let dir = create_temp_dir();
    let (mut store, path) = store_in(&dir);
    let single: ResolutionResult =
        [(ComponentId::new("g", "m", "1"), SelectionReason::root())]
            .into_iter()
            .collect();
    store.write(&single).unwrap();

    // header(29) + count(1) + "g"(2) + "m"(2) + "1"(2) + description count(1)
    let mut bytes = fs::read(&path).unwrap();
    let tag_offset = 29 + 1 + 2 + 2 + 2 + 1;
    assert_eq!(bytes[tag_offset], SelectionCause::Root.wire_tag());
    bytes[tag_offset] = 0x7f;
    reseal(&mut bytes);
    fs::write(&path, &bytes).unwrap();

    let err = store.read().unwrap_err();
    assert!(matches!(err, StoreError::Codec { component: 0, .. }));
    assert_eq!(err.code(), "LEDGER_STORE_CODEC");
}

#[test]
fn test_other_format_version_rejected() {
    let dir = create_temp_dir();
    let (mut store, path) = store_in(&dir);
    store.write(&sample_result()).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[4] = FORMAT_VERSION + 1;
    reseal(&mut bytes);
    fs::write(&path, &bytes).unwrap();

    let err = store.read().unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedVersion { .. }));
    assert!(err.is_corruption());
}

// =============================================================================
// Cache Semantics
// =============================================================================

#[test]
fn test_load_cached_hit_and_miss() {
    let dir = create_temp_dir();
    let (mut store, _) = store_in(&dir);
    assert!(store.load_cached().unwrap().is_none());

    store.write(&sample_result()).unwrap();
    let loaded = store.load_cached().unwrap().unwrap();
    assert_eq!(loaded.result, sample_result());
}

/// Damage is a miss: the file is removed so the caller recomputes.
#[test]
fn test_load_cached_discards_corrupted_file() {
    let dir = create_temp_dir();
    let (mut store, path) = store_in(&dir);
    store.write(&sample_result()).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x01;
    fs::write(&path, &bytes).unwrap();

    assert!(store.load_cached().unwrap().is_none());
    assert!(!path.exists());

    // recompute and cache again
    store.write(&sample_result()).unwrap();
    assert!(store.load_cached().unwrap().is_some());
}

#[test]
fn test_load_cached_discards_other_version() {
    let dir = create_temp_dir();
    let (mut store, path) = store_in(&dir);
    store.write(&sample_result()).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[4] = 0;
    reseal(&mut bytes);
    fs::write(&path, &bytes).unwrap();

    assert!(store.load_cached().unwrap().is_none());
    assert!(!path.exists());
}

// =============================================================================
// Write-Time Limits
// =============================================================================

/// Too many descriptions: the write fails and the cached file survives.
#[test]
fn test_oversized_reason_refused_and_cache_kept() {
    let dir = create_temp_dir();
    let (mut store, path) = store_in(&dir);
    let first = store.write(&sample_result()).unwrap();

    let result: ResolutionResult = [(ComponentId::new("org", "wide", "1.0"), wide_reason(65))]
        .into_iter()
        .collect();
    let err = store.write(&result).unwrap_err();
    assert_eq!(err.code(), "LEDGER_STORE_CODEC");
    assert!(!err.is_corruption());
    assert!(path.exists());

    let loaded = store.load_cached().unwrap().unwrap();
    assert_eq!(loaded.header.store_id, first.store_id);
}

/// Everything the writer accepts, the reader accepts.
#[test]
fn test_values_at_limit_round_trip() {
    let dir = create_temp_dir();
    let path = dir.path().join("resolution.slr");
    let limits = CodecLimits {
        max_descriptions_per_reason: 64,
        max_text_bytes: 16,
    };
    let mut store = ResultStore::new(&path, limits);

    let mut long_text = SelectionReason::requested();
    long_text.add_cause(SelectionCause::Forced, "x".repeat(16));
    let result: ResolutionResult = [
        (ComponentId::new("org", "wide", "1.0"), wide_reason(64)),
        (ComponentId::new("org", "long", "1.0"), long_text),
    ]
    .into_iter()
    .collect();

    store.write(&result).unwrap();
    let loaded = store.load_cached().unwrap().unwrap();
    assert_eq!(loaded.result, result);
}

/// A text one byte over the limit never reaches disk.
#[test]
fn test_oversized_text_refused() {
    let dir = create_temp_dir();
    let path = dir.path().join("resolution.slr");
    let limits = CodecLimits {
        max_descriptions_per_reason: 64,
        max_text_bytes: 16,
    };
    let mut store = ResultStore::new(&path, limits);

    let mut reason = SelectionReason::requested();
    reason.add_cause(SelectionCause::Forced, "x".repeat(17));
    let result: ResolutionResult = [(ComponentId::new("org", "lib", "1.0"), reason)]
        .into_iter()
        .collect();
    assert!(!store.write(&result).unwrap_err().is_corruption());

    let long_id: ResolutionResult =
        [(ComponentId::new("org", "m".repeat(17), "1.0"), SelectionReason::root())]
            .into_iter()
            .collect();
    assert!(!store.write(&long_id).unwrap_err().is_corruption());
    assert!(!path.exists());
}
