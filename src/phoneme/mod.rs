//! Phoneme feature model.
//!
//! A phoneme has two representations:
//!
//! - [`Phoneme`]: a set of up to [`MAX_FEATURES`] symbolic [`Feature`]s. This is
//!   what notations read and write.
//! - [`PackedPhoneme`]: a 64-bit field layout used for compact storage and for
//!   the prosody exchange format.
//!
//! The two are converted explicitly with `PackedPhoneme::from(&phoneme)` and
//! `Phoneme::try_from(packed)`.

pub mod feature;
pub mod packed;

use std::fmt;

pub use feature::Feature;
pub use packed::PackedPhoneme;

use crate::PhoneticError;

/// Maximum number of features a single phoneme can carry.
pub const MAX_FEATURES: usize = 8;

/// A phonetic segment described by a set of features.
///
/// Features are stored as a bitset over the [`Feature`] vocabulary, so two
/// phonemes built from the same features in a different order compare equal.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Phoneme {
    bits: u128,
}

impl Phoneme {
    /// A phoneme with no features.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Build a phoneme from up to eight features, in any order.
    ///
    /// Repeated features are collapsed. More than [`MAX_FEATURES`] distinct
    /// features is a format error.
    pub fn new(features: &[Feature]) -> Result<Self, PhoneticError> {
        let mut phoneme = Self::empty();
        for &f in features {
            phoneme.insert(f)?;
        }
        Ok(phoneme)
    }

    /// Build a phoneme from a static table row. Rows never exceed the capacity.
    pub(crate) fn from_table(features: &[Feature]) -> Self {
        debug_assert!(features.len() <= MAX_FEATURES);
        let bits = features.iter().fold(0u128, |acc, f| acc | f.bit());
        Self { bits }
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.bits & feature.bit() != 0
    }

    /// Add a feature. Returns `false` if it was already present or the
    /// phoneme is full.
    pub fn add(&mut self, feature: Feature) -> bool {
        if self.contains(feature) || self.len() >= MAX_FEATURES {
            return false;
        }
        self.bits |= feature.bit();
        true
    }

    /// Remove a feature. Returns `false` if it was not present.
    pub fn remove(&mut self, feature: Feature) -> bool {
        if !self.contains(feature) {
            return false;
        }
        self.bits &= !feature.bit();
        true
    }

    /// Add a feature, treating an already-present feature as success.
    pub(crate) fn insert(&mut self, feature: Feature) -> Result<(), PhoneticError> {
        if self.contains(feature) || self.add(feature) {
            Ok(())
        } else {
            Err(PhoneticError::format(format!(
                "a phoneme cannot carry more than {MAX_FEATURES} features (adding '{}')",
                feature.abbreviation()
            )))
        }
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate over the features in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        let mut remaining = self.bits;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let index = remaining.trailing_zeros();
            remaining &= remaining - 1;
            Feature::from_index(index)
        })
    }
}

impl fmt::Debug for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Phoneme{")?;
        for (i, feature) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(feature.abbreviation())?;
        }
        f.write_str("}")
    }
}
