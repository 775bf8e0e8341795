//! Table-driven notations loaded from JSON.
//!
//! ```json
//! {
//!   "name": "arpabet",
//!   "phonemes": {
//!     "P":  ["vls", "blb", "stp"],
//!     "SH": ["vls", "pla", "sib", "frc"]
//!   }
//! }
//! ```
//!
//! Features are given by abbreviation. Parsing takes the longest matching
//! symbol; writing needs an exact feature-set match. Written phonemes are
//! separated by a space, otherwise `N G` would read back as `NG`.
//!
//! The bundled `arpabet` set only has single-segment symbols. The affricates
//! `CH` and `JH` and the diphthongs `AW`, `AY`, `EY`, `OW` and `OY` are not
//! defined; write them as two phonemes (`T SH`, `D ZH`, `AA UH` ...).

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use super::Notation;
use crate::phoneme::{Feature, Phoneme};
use crate::PhoneticError;

pub const ARPABET: &str = "arpabet";

const ARPABET_JSON: &str = include_str!("../../data/phonemesets/arpabet.json");

#[derive(Debug, Deserialize)]
struct PhonemeSetConfig {
    name: String,
    phonemes: BTreeMap<String, Vec<String>>,
}

/// A notation defined by a symbol → feature-set table.
#[derive(Debug, Clone)]
pub struct TableNotation {
    name: String,
    /// Longest symbols first.
    symbols: Vec<(String, Phoneme)>,
    by_features: HashMap<Phoneme, String>,
}

impl TableNotation {
    /// Parse a phoneme set from its JSON description.
    pub fn from_json(json: &str) -> Result<Self, PhoneticError> {
        let config: PhonemeSetConfig = serde_json::from_str(json)
            .map_err(|e| PhoneticError::Config(format!("Failed to parse JSON: {e}")))?;

        if config.name.is_empty() {
            return Err(PhoneticError::Config("'name' must not be empty".into()));
        }

        let mut symbols = Vec::with_capacity(config.phonemes.len());
        let mut by_features = HashMap::new();
        for (symbol, abbreviations) in config.phonemes {
            if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
                return Err(PhoneticError::Config(format!(
                    "Invalid symbol {symbol:?}: must be non-empty without whitespace"
                )));
            }
            let features = abbreviations
                .iter()
                .map(|a| {
                    Feature::from_abbreviation(a).ok_or_else(|| {
                        PhoneticError::Config(format!(
                            "Unknown feature {a:?} for symbol {symbol:?}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let phoneme = Phoneme::new(&features)
                .map_err(|e| PhoneticError::Config(format!("Symbol {symbol:?}: {e}")))?;

            if let Some(previous) = by_features.insert(phoneme, symbol.clone()) {
                return Err(PhoneticError::Config(format!(
                    "Symbols {previous:?} and {symbol:?} have the same features"
                )));
            }
            symbols.push((symbol, phoneme));
        }
        symbols.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Ok(Self {
            name: config.name,
            symbols,
            by_features,
        })
    }

    /// Load a phoneme set from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PhoneticError> {
        let content = std::fs::read_to_string(path)?;
        let notation = Self::from_json(&content)?;
        log::info!(
            "Loaded phoneme set '{}' ({} symbols) from {}",
            notation.name,
            notation.symbols.len(),
            path.display()
        );
        Ok(notation)
    }

    /// The bundled ARPABET phoneme set, without affricates or diphthongs.
    pub fn arpabet() -> Result<Self, PhoneticError> {
        Self::from_json(ARPABET_JSON)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Notation for TableNotation {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, input: &[u8], pos: &mut usize) -> Result<Option<Phoneme>, PhoneticError> {
        let rest = input.get(*pos..).unwrap_or_default();
        let found = self
            .symbols
            .iter()
            .find(|(symbol, _)| rest.starts_with(symbol.as_bytes()));
        Ok(found.map(|(symbol, phoneme)| {
            *pos += symbol.len();
            *phoneme
        }))
    }

    fn format(&self, phoneme: &Phoneme, out: &mut String) -> bool {
        match self.by_features.get(phoneme) {
            Some(symbol) => {
                out.push_str(symbol);
                true
            }
            None => false,
        }
    }

    fn separator(&self) -> &str {
        " "
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{format_phonemes, PhonemeReader};
    use crate::phoneme::Feature::*;
    use bytes::Bytes;
    use std::sync::Arc;

    #[test]
    fn bundled_arpabet_loads() {
        let arpabet = TableNotation::arpabet().unwrap();
        assert_eq!(arpabet.name(), "arpabet");
        assert_eq!(arpabet.len(), 33);
    }

    #[test]
    fn prefers_longest_symbol() {
        let arpabet = Arc::new(TableNotation::arpabet().unwrap());
        let mut reader = PhonemeReader::new(arpabet.clone());
        reader.reset(Bytes::from_static(b"SH IY Z"));
        let phonemes = reader.read_all().unwrap();
        assert_eq!(phonemes.len(), 3);
        assert!(phonemes[0].contains(PalatoAlveolar));
        assert_eq!(
            format_phonemes(arpabet.as_ref(), &phonemes).unwrap(),
            "SH IY Z"
        );
    }

    #[test]
    fn separates_symbols_that_would_merge() {
        let arpabet = Arc::new(TableNotation::arpabet().unwrap());
        let mut reader = PhonemeReader::new(arpabet.clone());
        for text in ["N G", "T HH", "S IH N G"] {
            reader.reset(Bytes::from_static(text.as_bytes()));
            let phonemes = reader.read_all().unwrap();
            assert_eq!(phonemes.len(), text.split(' ').count());

            let written = format_phonemes(arpabet.as_ref(), &phonemes).unwrap();
            assert_eq!(written, text);
            reader.reset(Bytes::from(written));
            assert_eq!(reader.read_all().unwrap(), phonemes);
        }

        reader.reset(Bytes::from_static(b"NG"));
        assert_eq!(reader.read_all().unwrap().len(), 1);
    }

    #[test]
    fn diphthongs_and_affricates_are_not_symbols() {
        let arpabet = Arc::new(TableNotation::arpabet().unwrap());
        let mut reader = PhonemeReader::new(arpabet);
        for text in ["AW", "AY", "EY", "OW", "OY", "CH", "JH"] {
            reader.reset(Bytes::from_static(text.as_bytes()));
            assert!(
                matches!(reader.read_all(), Err(PhoneticError::Format(_))),
                "{text}"
            );
        }

        reader.reset(Bytes::from_static(b"T SH AA UH"));
        assert_eq!(reader.read_all().unwrap().len(), 4);
    }

    #[test]
    fn writes_only_exact_matches() {
        let arpabet = TableNotation::arpabet().unwrap();
        let mut out = String::new();
        let stressed = Phoneme::new(&[Vowel, Low, Back, Unrounded, PrimaryStress]).unwrap();
        assert!(!arpabet.format(&stressed, &mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn rejects_bad_configuration() {
        let cases = [
            "not json",
            r#"{ "name": "", "phonemes": {} }"#,
            r#"{ "name": "x", "phonemes": { "": ["vls"] } }"#,
            r#"{ "name": "x", "phonemes": { "A": ["nope"] } }"#,
            r#"{ "name": "x", "phonemes": { "A": ["vwl"], "B": ["vwl"] } }"#,
        ];
        for json in cases {
            let result = TableNotation::from_json(json);
            assert!(matches!(result, Err(PhoneticError::Config(_))), "{json}");
        }
    }

    #[test]
    fn loads_from_file() {
        let dir = std::env::temp_dir().join(format!("pronounce-rs-table-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.json");
        std::fs::write(&path, r#"{ "name": "tiny", "phonemes": { "a": ["vwl"] } }"#).unwrap();

        let tiny = TableNotation::load(&path).unwrap();
        assert_eq!(tiny.name(), "tiny");
        assert!(TableNotation::load(&dir.join("missing.json")).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
