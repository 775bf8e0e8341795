//! Prosody records and the PHO exchange format.
//!
//! A [`ProsodyRecord`] pairs one or two phonemes (two for affricates and
//! diphthongs) with a duration and a pitch envelope. [`pho`] reads and writes
//! records in the line-oriented format used by MBROLA voices.

pub mod pho;

use std::fmt;
use std::io::Write;

use crate::notation::NotationRegistry;
use crate::phoneme::PackedPhoneme;
use crate::PhoneticError;

pub use pho::{PhoReader, PhoWriter};

/// Highest envelope offset, in percent of the phoneme duration.
pub const MAX_ENVELOPE_OFFSET: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Milliseconds(pub f32);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Hertz(pub f32);

impl fmt::Display for Milliseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl fmt::Display for Hertz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}

/// Target pitch at `offset` percent through the phoneme.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvelopePoint {
    pub offset: u8,
    pub pitch: Hertz,
}

impl EnvelopePoint {
    pub fn new(offset: u8, pitch: f32) -> Self {
        Self {
            offset,
            pitch: Hertz(pitch),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProsodyRecord {
    pub phoneme1: PackedPhoneme,
    /// Second half of an affricate or diphthong.
    pub phoneme2: Option<PackedPhoneme>,
    pub duration: Milliseconds,
    pub envelope: Vec<EnvelopePoint>,
}

/// Parse an unsigned decimal number at `*pos`.
///
/// Digits are accumulated up to an optional single `.`; parsing stops at the
/// first other byte, including a second `.`, which is left unconsumed.
/// Returns 0 if no digits are present.
pub fn parse_number(input: &[u8], pos: &mut usize) -> f32 {
    let mut value = 0f64;
    let mut divisor = 1f64;
    let mut fraction = false;
    while let Some(&b) = input.get(*pos) {
        match b {
            b'0'..=b'9' => {
                value = value * 10.0 + f64::from(b - b'0');
                if fraction {
                    divisor *= 10.0;
                }
            }
            b'.' if !fraction => fraction = true,
            _ => break,
        }
        *pos += 1;
    }
    (value / divisor) as f32
}

/// Create a PHO reader for the notation registered under `name`.
pub fn create_pho_reader(
    registry: &NotationRegistry,
    name: &str,
) -> Result<PhoReader, PhoneticError> {
    Ok(PhoReader::new(registry.create(name)?))
}

/// Create a PHO writer for the notation registered under `name`.
pub fn create_pho_writer<W: Write>(
    registry: &NotationRegistry,
    name: &str,
) -> Result<PhoWriter<W>, PhoneticError> {
    Ok(PhoWriter::new(registry.create(name)?))
}
