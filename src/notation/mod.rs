//! Phoneme notations (phoneme sets).
//!
//! A [`Notation`] knows how to parse one phoneme out of a byte stream and how
//! to format one phoneme as text. [`PhonemeReader`] and [`PhonemeWriter`] wrap
//! a notation with the stream state, and [`NotationRegistry`] selects a
//! notation by name.
//!
//! # Built-in notations
//!
//! | Name | Example | Notes |
//! |---|---|---|
//! | `ipa` | `ˈtʰɛst` | International Phonetic Alphabet |
//! | `features` | `{vls,alv,stp}` | Explicit feature abbreviations, lossless |
//! | `arpabet` | `T EH S T` | Table-driven, no stress or diacritics |
//!
//! Further table-driven notations can be loaded from JSON with
//! [`TableNotation::load`] and registered with
//! [`NotationRegistry::register_notation`].

pub mod features;
pub mod ipa;
pub mod table;

use std::collections::HashMap;
use std::io::Write;
use std::ops::Deref;
use std::sync::Arc;

use bytes::Bytes;
use once_cell::sync::Lazy;

use crate::phoneme::Phoneme;
use crate::PhoneticError;

pub use features::FeatureNotation;
pub use ipa::IpaNotation;
pub use table::TableNotation;

/// A named textual convention for writing phonemes.
pub trait Notation: Send + Sync {
    /// Name the notation is registered under (e.g. `"ipa"`).
    fn name(&self) -> &str;

    /// Parse one phoneme starting at `*pos`.
    ///
    /// On success `*pos` is advanced past the phoneme. Returns `Ok(None)`,
    /// leaving `*pos` untouched, when no phoneme starts there. Returns an
    /// error when a phoneme starts but is malformed.
    fn parse(&self, input: &[u8], pos: &mut usize) -> Result<Option<Phoneme>, PhoneticError>;

    /// Append the text for `phoneme` to `out`.
    ///
    /// Returns `false`, leaving `out` untouched, if the notation cannot
    /// represent one of the phoneme's features.
    fn format(&self, phoneme: &Phoneme, out: &mut String) -> bool;

    /// Text written between consecutive phonemes.
    ///
    /// Notations whose symbols could run together into a different symbol
    /// return a space, which readers skip.
    fn separator(&self) -> &str {
        ""
    }
}

/// Decode the UTF-8 character at `pos`, returning it with its encoded length.
pub(crate) fn decode_char(input: &[u8], pos: usize) -> Option<(char, usize)> {
    let tail = input.get(pos..)?;
    let tail = &tail[..tail.len().min(4)];
    let valid = match std::str::from_utf8(tail) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&tail[..e.valid_up_to()]).ok()?,
    };
    valid.chars().next().map(|ch| (ch, ch.len_utf8()))
}

/// Reads a stream of phonemes written in one notation.
///
/// The current phoneme is available through [`PhonemeReader::phoneme`] or by
/// dereferencing the reader. After a format error the reader stays failed
/// until [`PhonemeReader::reset`] is called.
pub struct PhonemeReader {
    notation: Arc<dyn Notation>,
    buffer: Bytes,
    pos: usize,
    current: Phoneme,
    failed: Option<String>,
}

impl PhonemeReader {
    pub fn new(notation: Arc<dyn Notation>) -> Self {
        Self {
            notation,
            buffer: Bytes::new(),
            pos: 0,
            current: Phoneme::empty(),
            failed: None,
        }
    }

    /// Bind a new input buffer and rewind to its start.
    pub fn reset(&mut self, buffer: Bytes) {
        self.buffer = buffer;
        self.pos = 0;
        self.current = Phoneme::empty();
        self.failed = None;
    }

    /// Advance to the next phoneme.
    ///
    /// Returns `Ok(false)` at the end of the input. Whitespace between
    /// phonemes is skipped.
    pub fn read(&mut self) -> Result<bool, PhoneticError> {
        if let Some(msg) = &self.failed {
            return Err(PhoneticError::Format(msg.clone()));
        }

        while self
            .buffer
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        if self.pos >= self.buffer.len() {
            return Ok(false);
        }

        match self.notation.parse(&self.buffer, &mut self.pos) {
            Ok(Some(phoneme)) => {
                self.current = phoneme;
                Ok(true)
            }
            Ok(None) => {
                let shown = decode_char(&self.buffer, self.pos)
                    .map(|(ch, _)| ch.to_string())
                    .unwrap_or_else(|| format!("\\x{:02x}", self.buffer[self.pos]));
                let msg = format!(
                    "unrecognised {} phoneme '{shown}' at byte {}",
                    self.notation.name(),
                    self.pos
                );
                Err(self.fail(msg))
            }
            Err(PhoneticError::Format(msg)) => Err(self.fail(msg)),
            Err(e) => {
                let msg = e.to_string();
                Err(self.fail(msg))
            }
        }
    }

    /// Read all remaining phonemes.
    pub fn read_all(&mut self) -> Result<Vec<Phoneme>, PhoneticError> {
        let mut phonemes = Vec::new();
        while self.read()? {
            phonemes.push(self.current);
        }
        Ok(phonemes)
    }

    pub fn phoneme(&self) -> &Phoneme {
        &self.current
    }

    pub fn name(&self) -> &str {
        self.notation.name()
    }

    fn fail(&mut self, msg: String) -> PhoneticError {
        self.failed = Some(msg.clone());
        PhoneticError::Format(msg)
    }
}

impl Deref for PhonemeReader {
    type Target = Phoneme;

    fn deref(&self) -> &Phoneme {
        &self.current
    }
}

/// Writes phonemes to a sink in one notation.
pub struct PhonemeWriter<W> {
    notation: Arc<dyn Notation>,
    output: Option<W>,
    scratch: String,
    started: bool,
}

impl<W: Write> PhonemeWriter<W> {
    pub fn new(notation: Arc<dyn Notation>) -> Self {
        Self {
            notation,
            output: None,
            scratch: String::new(),
            started: false,
        }
    }

    /// Bind a new output sink, returning the previous one.
    pub fn reset(&mut self, output: W) -> Option<W> {
        self.started = false;
        self.output.replace(output)
    }

    /// Write one phoneme, preceded by the notation's separator unless it is
    /// the first since [`PhonemeWriter::reset`].
    ///
    /// Returns `Ok(false)` if no sink is bound or the notation cannot
    /// represent the phoneme; nothing is written in that case.
    pub fn write(&mut self, phoneme: &Phoneme) -> Result<bool, PhoneticError> {
        let Some(output) = self.output.as_mut() else {
            return Ok(false);
        };
        self.scratch.clear();
        if self.started {
            self.scratch.push_str(self.notation.separator());
        }
        if !self.notation.format(phoneme, &mut self.scratch) {
            return Ok(false);
        }
        output.write_all(self.scratch.as_bytes())?;
        self.started = true;
        Ok(true)
    }

    pub fn name(&self) -> &str {
        self.notation.name()
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.output.as_ref()
    }

    pub fn into_inner(self) -> Option<W> {
        self.output
    }
}

/// Format a phoneme sequence as one string, or `None` if any phoneme is not
/// representable in `notation`.
pub fn format_phonemes(notation: &dyn Notation, phonemes: &[Phoneme]) -> Option<String> {
    let mut out = String::new();
    for (i, phoneme) in phonemes.iter().enumerate() {
        if i > 0 {
            out.push_str(notation.separator());
        }
        if !notation.format(phoneme, &mut out) {
            return None;
        }
    }
    Some(out)
}

type Constructor = Box<dyn Fn() -> Result<Arc<dyn Notation>, PhoneticError> + Send + Sync>;

/// Maps notation names to constructors.
pub struct NotationRegistry {
    constructors: HashMap<String, Constructor>,
}

impl Default for NotationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl NotationRegistry {
    /// A registry with no notations.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A registry with the `ipa`, `features` and `arpabet` notations.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(ipa::NAME, || Ok(Arc::new(IpaNotation) as Arc<dyn Notation>));
        registry.register(features::NAME, || {
            Ok(Arc::new(FeatureNotation) as Arc<dyn Notation>)
        });
        registry.register(table::ARPABET, || {
            Ok(Arc::new(TableNotation::arpabet()?) as Arc<dyn Notation>)
        });
        registry
    }

    /// Register a constructor under `name`, replacing any existing one.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Result<Arc<dyn Notation>, PhoneticError> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    /// Register an already-built notation under its own name.
    pub fn register_notation(&mut self, notation: Arc<dyn Notation>) {
        let name = notation.name().to_string();
        self.register(name, move || Ok(Arc::clone(&notation)));
    }

    /// Create the notation registered under `name`.
    pub fn create(&self, name: &str) -> Result<Arc<dyn Notation>, PhoneticError> {
        match self.constructors.get(name) {
            Some(constructor) => {
                log::debug!("Creating phoneme set '{name}'");
                constructor()
            }
            None => {
                log::debug!("Phoneme set '{name}' is not registered");
                Err(PhoneticError::UnsupportedNotation(name.to_string()))
            }
        }
    }

    pub fn reader(&self, name: &str) -> Result<PhonemeReader, PhoneticError> {
        Ok(PhonemeReader::new(self.create(name)?))
    }

    pub fn writer<W: Write>(&self, name: &str) -> Result<PhonemeWriter<W>, PhoneticError> {
        Ok(PhonemeWriter::new(self.create(name)?))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

static BUILTINS: Lazy<NotationRegistry> = Lazy::new(NotationRegistry::with_builtins);

/// Create a built-in notation by name.
pub fn create_notation(name: &str) -> Result<Arc<dyn Notation>, PhoneticError> {
    BUILTINS.create(name)
}

/// Create a reader for a built-in notation.
pub fn create_phoneme_reader(name: &str) -> Result<PhonemeReader, PhoneticError> {
    BUILTINS.reader(name)
}

/// Create a writer for a built-in notation.
pub fn create_phoneme_writer<W: Write>(name: &str) -> Result<PhonemeWriter<W>, PhoneticError> {
    BUILTINS.writer(name)
}
