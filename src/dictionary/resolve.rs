//! Say-as resolution.

use super::{Dictionary, Entry};
use crate::phoneme::Phoneme;
use crate::PhoneticError;

/// Maximum number of say-as links followed when resolving an entry.
pub const MAX_SAY_AS_DEPTH: usize = 5;

impl Dictionary {
    /// Follow say-as links from `entry` until a transcription is found.
    ///
    /// `word` is the text `entry` was looked up under and is only used for
    /// error reporting. Fails with `NotFound` if a link points at a missing
    /// entry, and with `RecursionLimit` after [`MAX_SAY_AS_DEPTH`] links.
    pub fn resolve<'a>(
        &'a self,
        word: &str,
        entry: &'a Entry,
    ) -> Result<&'a [Phoneme], PhoneticError> {
        let mut current = entry;
        let mut target = word;
        let mut depth = 0;
        loop {
            match current {
                Entry::Phonemes(phonemes) => return Ok(phonemes),
                Entry::NoMatch => return Err(PhoneticError::NotFound(target.to_string())),
                Entry::SayAs { text, .. } => {
                    if depth == MAX_SAY_AS_DEPTH {
                        return Err(PhoneticError::RecursionLimit {
                            entry: word.to_string(),
                            depth,
                        });
                    }
                    depth += 1;
                    target = text;
                    current = self.lookup(text);
                }
            }
        }
    }

    /// Look up `word` and resolve it to phonemes.
    pub fn pronounce(&self, word: &str) -> Result<&[Phoneme], PhoneticError> {
        self.resolve(word, self.lookup(word))
    }

    /// Resolve every entry, sorted by entry text.
    ///
    /// Failures are logged and returned per entry.
    pub fn resolve_all(&self) -> Vec<(&str, Result<&[Phoneme], PhoneticError>)> {
        self.sorted()
            .into_iter()
            .map(|(word, entry)| {
                let result = self.resolve(word, entry);
                if let Err(e) = &result {
                    log::error!("Unable to pronounce '{word}': {e}");
                }
                (word, result)
            })
            .collect()
    }
}
