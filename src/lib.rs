//! # pronounce-rs
//!
//! Phonetic building blocks for text-to-speech front ends.
//!
//! ## Features
//!
//! - **Phonemes**: A closed feature vocabulary, a symbolic [`Phoneme`] set and
//!   the [`PackedPhoneme`] 64-bit field layout
//! - **Notations**: IPA, explicit feature and table-driven phoneme sets,
//!   selected by name through a [`NotationRegistry`]
//! - **Pronunciation Dictionary**: Tab-separated dictionary files with nested
//!   `.import`s and say-as aliases resolved to phonemes
//! - **Prosody**: Phoneme duration and pitch envelopes, read and written as
//!   MBROLA PHO files
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! pronounce-rs = "2026.2"
//! ```
//!
//! ```rust
//! use pronounce_rs::dictionary::{Dictionary, DictionaryConfig};
//! use pronounce_rs::notation::{create_notation, format_phonemes};
//!
//! let mut dict = Dictionary::new(DictionaryConfig::from_env());
//! dict.add_entries("hello\t/həˈloʊ/\nhi\thello\n".as_bytes());
//!
//! let phonemes = dict.pronounce("hi")?;
//! let ipa = create_notation("ipa")?;
//! assert_eq!(format_phonemes(ipa.as_ref(), phonemes).as_deref(), Some("həˈloʊ"));
//! # Ok::<(), pronounce_rs::PhoneticError>(())
//! ```

pub mod dictionary;
pub mod error;
pub mod notation;
pub mod phoneme;
pub mod prosody;

pub use dictionary::{Dictionary, DictionaryConfig, Entry};
pub use error::PhoneticError;
pub use notation::{Notation, NotationRegistry, PhonemeReader, PhonemeWriter};
pub use phoneme::{Feature, PackedPhoneme, Phoneme};
pub use prosody::{PhoReader, PhoWriter, ProsodyRecord};
