//! Pronunciation dictionary.
//!
//! Maps entry text to either a phoneme transcription or a say-as alias (text
//! to be pronounced in place of the entry). Dictionaries are loaded from
//! tab-separated files:
//!
//! ```text
//! .import	/en/common.dict
//! tomato	/təˈmɑːtəʊ/
//! 2	two
//! ```
//!
//! A definition between slashes is a transcription in the dictionary's
//! notation; anything else is a say-as alias. `.import` merges another file,
//! resolved under [`DictionaryConfig::data_dir`].

pub mod config;
pub mod resolve;
pub mod script;

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

use crate::notation::{format_phonemes, IpaNotation, Notation, PhonemeReader};
use crate::phoneme::Phoneme;
use crate::PhoneticError;

pub use config::{DictionaryConfig, DictionaryConfigBuilder, DictionaryConfigBuilderError};
pub use resolve::MAX_SAY_AS_DEPTH;
pub use script::Script;

const IMPORT_DIRECTIVE: &str = ".import";

/// Width of the entry column when writing dictionary files.
const ENTRY_COLUMN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    NoMatch,
    Phonemes,
    SayAs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Returned by [`Dictionary::lookup`] for words not in the dictionary.
    NoMatch,
    Phonemes(Vec<Phoneme>),
    SayAs { text: String, script: Script },
}

impl Entry {
    /// A say-as entry, with the script taken from the first character of `text`.
    pub fn say_as(text: impl Into<String>) -> Self {
        let text = text.into();
        let script = Script::of_text(&text);
        Entry::SayAs { text, script }
    }

    pub fn kind(&self) -> EntryType {
        match self {
            Entry::NoMatch => EntryType::NoMatch,
            Entry::Phonemes(_) => EntryType::Phonemes,
            Entry::SayAs { .. } => EntryType::SayAs,
        }
    }

    /// Script of the say-as text; `Unknown` for other entries.
    pub fn script(&self) -> Script {
        match self {
            Entry::SayAs { script, .. } => *script,
            _ => Script::Unknown,
        }
    }

    pub fn phonemes(&self) -> Option<&[Phoneme]> {
        match self {
            Entry::Phonemes(phonemes) => Some(phonemes),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Entry::SayAs { text, .. } => Some(text),
            _ => None,
        }
    }
}

static NO_MATCH: Entry = Entry::NoMatch;

pub struct Dictionary {
    entries: HashMap<String, Entry>,
    notation: Arc<dyn Notation>,
    config: DictionaryConfig,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new(DictionaryConfig::from_env())
    }
}

impl Dictionary {
    /// An empty dictionary with IPA transcriptions.
    pub fn new(config: DictionaryConfig) -> Self {
        Self::with_notation(config, Arc::new(IpaNotation))
    }

    pub fn with_notation(config: DictionaryConfig, notation: Arc<dyn Notation>) -> Self {
        Self {
            entries: HashMap::new(),
            notation,
            config,
        }
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    pub fn notation(&self) -> &dyn Notation {
        self.notation.as_ref()
    }

    /// Exact-match lookup. Misses return [`Entry::NoMatch`].
    pub fn lookup(&self, text: &str) -> &Entry {
        self.entries.get(text).unwrap_or(&NO_MATCH)
    }

    /// Insert or overwrite an entry. Adding [`Entry::NoMatch`] removes it.
    pub fn add_entry(&mut self, text: impl Into<String>, entry: Entry) {
        let text = text.into();
        match entry {
            Entry::NoMatch => {
                self.entries.remove(&text);
            }
            entry => {
                self.entries.insert(text, entry);
            }
        }
    }

    /// Parse dictionary lines and add them, returning the number of entries
    /// stored (including those from nested imports).
    ///
    /// Malformed lines and failed imports are logged and skipped.
    pub fn add_entries(&mut self, data: &[u8]) -> usize {
        let mut imports = Vec::new();
        self.parse_entries(data, &mut imports)
    }

    /// Load a dictionary file from `path` as given.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, PhoneticError> {
        let mut imports = Vec::new();
        self.load_path(path.as_ref(), &mut imports)
    }

    /// Load a dictionary file named relative to the data directory.
    pub fn import(&mut self, name: &str) -> Result<usize, PhoneticError> {
        let path = self.config.resolve(name);
        self.load_file(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .iter()
            .map(|(text, entry)| (text.as_str(), entry))
    }

    /// Entries sorted by entry text.
    pub fn sorted(&self) -> Vec<(&str, &Entry)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Write all entries in dictionary file format, sorted by entry text.
    ///
    /// Transcriptions use the dictionary's notation, so the output can be
    /// loaded back with [`Dictionary::add_entries`].
    pub fn write_entries<W: Write>(&self, out: &mut W) -> Result<(), PhoneticError> {
        for (text, entry) in self.sorted() {
            let definition = match entry {
                Entry::Phonemes(phonemes) => {
                    let transcription = format_phonemes(self.notation.as_ref(), phonemes)
                        .ok_or_else(|| {
                            PhoneticError::format(format!(
                                "'{text}' cannot be written in {}",
                                self.notation.name()
                            ))
                        })?;
                    format!("/{transcription}/")
                }
                Entry::SayAs { text, .. } => text.clone(),
                Entry::NoMatch => continue,
            };
            let padding = if text.chars().count() < ENTRY_COLUMN {
                "\t\t"
            } else {
                "\t"
            };
            writeln!(out, "{text}{padding}{definition}")?;
        }
        Ok(())
    }

    /// Add a say-as entry pointing at itself for every word found in neither
    /// `base` nor this dictionary. Returns the number of words added.
    pub fn add_unknown_words<I, S>(&mut self, base: &Dictionary, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for word in words {
            let word = word.as_ref();
            if word.is_empty()
                || base.lookup(word).kind() != EntryType::NoMatch
                || self.entries.contains_key(word)
            {
                continue;
            }
            self.add_entry(word, Entry::say_as(word));
            added += 1;
        }
        added
    }

    fn load_path(
        &mut self,
        path: &Path,
        imports: &mut Vec<PathBuf>,
    ) -> Result<usize, PhoneticError> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if imports.contains(&key) {
            log::error!("Skipping recursive import of {}", path.display());
            return Ok(0);
        }

        let data = std::fs::read(path)?;
        imports.push(key);
        let count = self.parse_entries(&data, imports);
        imports.pop();

        log::info!("Loaded {count} entries from {}", path.display());
        Ok(count)
    }

    fn parse_entries(&mut self, data: &[u8], imports: &mut Vec<PathBuf>) -> usize {
        let mut count = 0;
        for line in data.split(|&b| b == b'\n' || b == b'\r') {
            if line.iter().all(|&b| b == b'\t' || b == b' ') {
                continue;
            }
            let Ok(line) = std::str::from_utf8(line) else {
                log::warn!("Skipping dictionary line that is not valid UTF-8");
                continue;
            };
            let Some((text, definition)) = line.split_once('\t') else {
                log::warn!("Skipping dictionary line without a definition: {line:?}");
                continue;
            };
            let definition = definition.trim_matches('\t');
            if text.is_empty() || definition.is_empty() {
                log::warn!("Skipping incomplete dictionary line: {line:?}");
                continue;
            }

            if text == IMPORT_DIRECTIVE {
                let path = self.config.resolve(definition);
                match self.load_path(&path, imports) {
                    Ok(imported) => count += imported,
                    Err(e) => log::error!("Unable to import {}: {e}", path.display()),
                }
                continue;
            }
            if text.starts_with('.') {
                log::warn!("Skipping unknown dictionary directive '{text}'");
                continue;
            }

            match self.parse_definition(definition) {
                Ok(entry) => {
                    self.add_entry(text, entry);
                    count += 1;
                }
                Err(e) => log::warn!("Skipping dictionary entry '{text}': {e}"),
            }
        }
        count
    }

    fn parse_definition(&self, definition: &str) -> Result<Entry, PhoneticError> {
        let transcription = definition
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'));
        let Some(transcription) = transcription else {
            return Ok(Entry::say_as(definition));
        };

        let mut reader = PhonemeReader::new(Arc::clone(&self.notation));
        reader.reset(Bytes::copy_from_slice(transcription.as_bytes()));
        let phonemes = reader.read_all()?;
        if phonemes.is_empty() {
            return Err(PhoneticError::format("empty transcription"));
        }
        Ok(Entry::Phonemes(phonemes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::create_notation;
    use crate::phoneme::Feature::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pronounce-rs-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn dictionary_in(dir: &Path) -> Dictionary {
        Dictionary::new(DictionaryConfig::with_data_dir(dir))
    }

    #[test]
    fn lookup_miss_is_no_match() {
        let dict = dictionary_in(Path::new("/nonexistent"));
        let entry = dict.lookup("nonexistent");
        assert_eq!(entry.kind(), EntryType::NoMatch);
        assert_eq!(entry.script(), Script::Unknown);
    }

    #[test]
    fn parses_say_as_and_transcriptions() {
        init_logger();
        let mut dict = dictionary_in(Path::new("/nonexistent"));
        let data = "tomato\t/təˈmɑːtəʊ/\r\n2\ttwo\n\n\t\nπ\t\tπι\n";
        let count = dict.add_entries(data.as_bytes());
        assert_eq!(count, 3);
        assert_eq!(dict.len(), 3);

        let tomato = dict.lookup("tomato").phonemes().unwrap();
        assert_eq!(tomato.len(), 7);
        assert!(tomato[0].contains(Voiceless));
        assert!(tomato[2].contains(PrimaryStress));
        assert!(tomato[3].contains(Long));

        assert_eq!(dict.lookup("2"), &Entry::say_as("two"));
        assert_eq!(dict.lookup("2").script(), Script::Latin);
        assert_eq!(dict.lookup("π").text(), Some("πι"));
        assert_eq!(dict.lookup("π").script(), Script::Greek);
    }

    #[test]
    fn last_write_wins() {
        let mut dict = dictionary_in(Path::new("/nonexistent"));
        dict.add_entries(b"a\tfirst\na\tsecond\n");
        assert_eq!(dict.lookup("a").text(), Some("second"));
        assert_eq!(dict.len(), 1);

        dict.add_entry("a", Entry::NoMatch);
        assert!(dict.is_empty());
    }

    #[test]
    fn skips_malformed_lines() {
        init_logger();
        let mut dict = dictionary_in(Path::new("/nonexistent"));
        let count = dict.add_entries(b"no tab here\n.unknown\tx\nbad\t/#/\nok\tfine\n");
        assert_eq!(count, 1);
        assert_eq!(dict.lookup("ok").text(), Some("fine"));
        assert_eq!(dict.lookup("bad").kind(), EntryType::NoMatch);
    }

    #[test]
    fn missing_import_is_not_fatal() {
        init_logger();
        let dir = scratch_dir("missing-import");
        let mut dict = dictionary_in(&dir);
        let count = dict.add_entries(b"before\tone\n.import\t/missing.dict\nafter\ttwo\n");
        assert_eq!(count, 2);
        assert_eq!(dict.lookup("before").text(), Some("one"));
        assert_eq!(dict.lookup("after").text(), Some("two"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn imports_nested_files() {
        init_logger();
        let dir = scratch_dir("nested-import");
        std::fs::create_dir_all(dir.join("en")).unwrap();
        std::fs::write(dir.join("en/numbers.dict"), "1\tone\n2\ttwo\n").unwrap();
        let base = ".import\t/en/numbers.dict\nthe\t/ðə/\n";
        std::fs::write(dir.join("en/base.dict"), base).unwrap();
        std::fs::write(dir.join("loop.dict"), ".import\tloop.dict\nx\ty\n").unwrap();

        let mut dict = dictionary_in(&dir);
        assert_eq!(dict.import("/en/base.dict").unwrap(), 3);
        assert_eq!(dict.lookup("1").text(), Some("one"));
        assert_eq!(dict.lookup("the").kind(), EntryType::Phonemes);

        assert_eq!(dict.import("loop.dict").unwrap(), 1);
        assert!(matches!(
            dict.import("absent.dict"),
            Err(PhoneticError::Io(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn written_entries_load_back() {
        let mut dict = dictionary_in(Path::new("/nonexistent"));
        let data = "cat\t/kæt/\nDr.\tdoctor\nencyclopedia\t/ɪnˌsaɪkləˈpiːdiə/\n";
        dict.add_entries(data.as_bytes());

        let mut out = Vec::new();
        dict.write_entries(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Dr.\t\tdoctor\ncat\t\t/kæt/\nencyclopedia\t/ɪnˌsaɪkləˈpiːdiə/\n"
        );

        let mut copy = dictionary_in(Path::new("/nonexistent"));
        assert_eq!(copy.add_entries(text.as_bytes()), 3);
        assert_eq!(copy.sorted(), dict.sorted());
    }

    #[test]
    fn collects_unknown_words() {
        let mut base = dictionary_in(Path::new("/nonexistent"));
        base.add_entries(b"the\tthee\n");
        let mut new_words = dictionary_in(Path::new("/nonexistent"));
        let added = new_words.add_unknown_words(&base, ["the", "cat", "sat", "cat", ""]);
        assert_eq!(added, 2);
        assert_eq!(new_words.lookup("cat"), &Entry::say_as("cat"));
        assert_eq!(new_words.lookup("the").kind(), EntryType::NoMatch);
    }

    #[test]
    fn table_transcriptions_load_back() {
        init_logger();
        let arpabet = create_notation("arpabet").unwrap();
        let config = DictionaryConfig::with_data_dir("/nonexistent");
        let mut dict = Dictionary::with_notation(config.clone(), arpabet.clone());
        assert_eq!(dict.add_entries(b"sing\t/S IH N G/\nhat\t/HH AE T/\n"), 2);
        assert_eq!(dict.lookup("sing").phonemes().map(<[_]>::len), Some(4));

        let mut out = Vec::new();
        dict.write_entries(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "hat\t\t/HH AE T/\nsing\t\t/S IH N G/\n");

        let mut copy = Dictionary::with_notation(config, arpabet);
        assert_eq!(copy.add_entries(text.as_bytes()), 2);
        assert_eq!(copy.lookup("sing").phonemes().map(<[_]>::len), Some(4));
        assert_eq!(copy.sorted(), dict.sorted());
    }

    #[test]
    fn unknown_table_symbols_skip_the_line() {
        init_logger();
        let arpabet = create_notation("arpabet").unwrap();
        let config = DictionaryConfig::with_data_dir("/nonexistent");
        let mut dict = Dictionary::with_notation(config, arpabet);
        assert_eq!(dict.add_entries(b"house\t/HH AW S/\nhas\t/HH AE Z/\n"), 1);
        assert_eq!(dict.lookup("house").kind(), EntryType::NoMatch);
    }
}
