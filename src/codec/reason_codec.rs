//! Stateful selection-reason codec with text interning
//!
//! Wire format for one reason:
//! - Description count (small int)
//! - Per description, in insertion order:
//!   - Cause wire tag (u8)
//!   - Known flag (bool)
//!   - If known: dictionary index (small int)
//!   - Otherwise: text (string), then registered under the next index
//!
//! # Sessions
//!
//! The dictionary lives for one run of same-direction calls. The first call
//! in a new direction clears it, so encode,encode,decode,decode,encode uses
//! three independent dictionaries. A codec must never be driven from two
//! directions at once; use one instance per thread or session.

use std::io::{Read, Write};

use crate::observability::{log_event_at, Event, Logger, Severity};
use crate::selection::{SelectionCause, SelectionDescription, SelectionReason};

use super::dictionary::TextDictionary;
use super::errors::{CodecError, CodecResult};
use super::wire::{WireDecoder, WireEncoder};

/// Direction of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Encode => "encode",
            Direction::Decode => "decode",
        }
    }
}

/// Upper bounds applied while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    /// Largest description count accepted for one reason
    pub max_descriptions_per_reason: usize,
    /// Largest text length accepted, in bytes
    pub max_text_bytes: usize,
}

impl CodecLimits {
    /// Refuse a text longer than `max_text_bytes`
    pub fn check_text(&self, text: &str) -> CodecResult<()> {
        if text.len() > self.max_text_bytes {
            return Err(CodecError::LimitExceeded {
                what: "text length",
                actual: text.len(),
                limit: self.max_text_bytes,
            });
        }
        Ok(())
    }

    /// Refuse a reason that `decode` under these limits would reject
    pub fn check_reason(&self, reason: &SelectionReason) -> CodecResult<()> {
        if reason.len() > self.max_descriptions_per_reason {
            return Err(CodecError::LimitExceeded {
                what: "description count",
                actual: reason.len(),
                limit: self.max_descriptions_per_reason,
            });
        }
        reason
            .descriptions()
            .iter()
            .try_for_each(|description| self.check_text(description.text()))
    }
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_descriptions_per_reason: 64,
            max_text_bytes: 64 * 1024,
        }
    }
}

/// Counters for the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecStats {
    /// Reasons encoded or decoded
    pub reasons: u64,
    /// Descriptions encoded or decoded
    pub descriptions: u64,
    /// Texts written or read in full
    pub inline_texts: u64,
    /// Texts written or read as dictionary references
    pub dictionary_refs: u64,
    /// Bytes written or read
    pub bytes: u64,
}

/// Encoder/decoder for [`SelectionReason`] values.
///
/// Not thread-safe by contract: the dictionary belongs to one caller-managed
/// session.
#[derive(Debug)]
pub struct ReasonCodec {
    dictionary: TextDictionary,
    direction: Direction,
    limits: CodecLimits,
    stats: CodecStats,
}

impl Default for ReasonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ReasonCodec {
    /// Create a codec with default limits
    pub fn new() -> Self {
        Self::with_limits(CodecLimits::default())
    }

    pub fn with_limits(limits: CodecLimits) -> Self {
        Self {
            dictionary: TextDictionary::new(),
            // first encode starts a fresh run
            direction: Direction::Decode,
            limits,
            stats: CodecStats::default(),
        }
    }

    /// Direction of the most recent call
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of texts registered in the current run
    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    /// Counters for the current run
    pub fn stats(&self) -> CodecStats {
        self.stats
    }

    /// Start a fresh run without changing direction.
    ///
    /// Callers that frame independent streams (one file, one message) call
    /// this at each boundary so every stream is self-contained.
    pub fn reset(&mut self) {
        self.start_run(self.direction);
    }

    fn start_run(&mut self, direction: Direction) {
        if Logger::enabled(Severity::Trace) {
            let dictionary_len = self.dictionary.len().to_string();
            let reasons = self.stats.reasons.to_string();
            log_event_at(
                Severity::Trace,
                Event::CodecSessionReset,
                &[
                    ("direction", direction.as_str()),
                    ("previous_dictionary_len", dictionary_len.as_str()),
                    ("previous_reasons", reasons.as_str()),
                ],
            );
        }
        self.dictionary.clear();
        self.stats = CodecStats::default();
        self.direction = direction;
    }

    fn prepare(&mut self, direction: Direction) {
        if direction != self.direction {
            self.start_run(direction);
        }
    }

    /// Encode `reason` to `writer`.
    ///
    /// # Errors
    ///
    /// - `LimitExceeded` if `reason` would not decode under this codec's
    ///   limits; nothing is written and the run is left as it was
    /// - `Stream` for I/O failures from `writer`, returned unchanged
    pub fn encode<W: Write>(&mut self, writer: &mut W, reason: &SelectionReason) -> CodecResult<()> {
        self.limits.check_reason(reason)?;
        self.prepare(Direction::Encode);

        let mut encoder = WireEncoder::new(writer);
        let descriptions = reason.descriptions();
        encoder.write_len(descriptions.len())?;

        let mut inline_texts = 0;
        for description in descriptions {
            encoder.write_byte(description.cause().wire_tag())?;
            match self.dictionary.index_of(description.text()) {
                Some(index) => {
                    encoder.write_bool(true)?;
                    encoder.write_small_int(index)?;
                }
                None => {
                    encoder.write_bool(false)?;
                    encoder.write_string(description.text())?;
                    self.dictionary.register(description.shared_text().clone());
                    inline_texts += 1;
                }
            }
        }

        self.stats.reasons += 1;
        self.stats.descriptions += descriptions.len() as u64;
        self.stats.inline_texts += inline_texts;
        self.stats.dictionary_refs += descriptions.len() as u64 - inline_texts;
        self.stats.bytes += encoder.bytes_written();
        Ok(())
    }

    /// Decode one reason from `reader`.
    ///
    /// Descriptions come back in encoded order.
    ///
    /// # Errors
    ///
    /// - `MalformedCauseTag` for a tag outside the known set
    /// - `UnknownDictionaryReference` for an index not registered in this run
    /// - `MalformedFrame` for structurally invalid bytes or exceeded limits
    /// - `EmptyReason` for a zero description count
    /// - `Stream` for I/O failures from `reader`
    pub fn decode<R: Read>(&mut self, reader: &mut R) -> CodecResult<SelectionReason> {
        self.prepare(Direction::Decode);

        let mut decoder = WireDecoder::new(reader);
        let count = decoder.read_small_int()? as usize;
        if count == 0 {
            return Err(CodecError::EmptyReason);
        }
        if count > self.limits.max_descriptions_per_reason {
            return Err(CodecError::malformed(format!(
                "description count {} exceeds limit {}",
                count, self.limits.max_descriptions_per_reason
            )));
        }

        let mut descriptions = Vec::with_capacity(count);
        let mut inline_texts = 0;
        for _ in 0..count {
            let tag = decoder.read_byte()?;
            let cause =
                SelectionCause::from_wire_tag(tag).ok_or(CodecError::MalformedCauseTag { tag })?;

            let text = if decoder.read_bool()? {
                let index = decoder.read_small_int()?;
                self.dictionary
                    .text_at(index)
                    .cloned()
                    .ok_or(CodecError::UnknownDictionaryReference {
                        index,
                        known: self.dictionary.len(),
                    })?
            } else {
                let text: std::sync::Arc<str> =
                    decoder.read_string(self.limits.max_text_bytes)?.into();
                self.dictionary.append(text.clone());
                inline_texts += 1;
                text
            };
            descriptions.push(SelectionDescription::with_text(cause, text));
        }

        let reason = SelectionReason::of(descriptions).map_err(|_| CodecError::EmptyReason)?;

        self.stats.reasons += 1;
        self.stats.descriptions += count as u64;
        self.stats.inline_texts += inline_texts;
        self.stats.dictionary_refs += count as u64 - inline_texts;
        self.stats.bytes += decoder.bytes_read();
        Ok(reason)
    }
}
