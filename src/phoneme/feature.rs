use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::PhoneticError;

/// A single phonetic feature from the closed feature vocabulary.
///
/// The discriminant doubles as the bit index used by [`Phoneme`](super::Phoneme),
/// so variants must stay in the same order as `FEATURES` below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Feature {
    Vowel,

    // phonation
    Voiced,
    Voiceless,
    Murmured,

    // place of articulation
    Bilabial,
    LabioDental,
    Dental,
    Alveolar,
    PalatoAlveolar,
    Retroflex,
    AlveoloPalatal,
    Palatal,
    LabioPalatal,
    Velar,
    LabioVelar,
    Uvular,
    Pharyngeal,
    Epiglottal,
    Glottal,

    // manner of articulation
    Lateral,
    Sibilant,
    Plosive,
    Fricative,
    Nasal,
    Approximant,
    Trill,
    Flap,
    Click,
    Ejective,
    Implosive,

    // vowel height
    High,
    SemiHigh,
    UpperMid,
    Mid,
    LowerMid,
    SemiLow,
    Low,

    // vowel backness
    Front,
    Center,
    Back,

    // vowel rounding
    Unrounded,
    Rounded,

    // stress
    PrimaryStress,
    SecondaryStress,
    ExtraStress,

    // prosody
    SyllableBreak,
    SilentPause,
    Linking,
    FootBreak,
    IntonationBreak,

    // length
    ExtraShort,
    HalfLong,
    Long,

    // consonant release
    Aspirated,
    Unreleased,
    NasalRelease,
    LateralRelease,

    // syllabicity
    Syllabic,
    NonSyllabic,

    // co-articulation
    Velarized,
    Labialized,
    Palatalized,
    Rhoticized,
    Nasalized,
    Pharyngealized,
}

/// `(feature, abbreviation, name)` in discriminant order.
const FEATURES: [(Feature, &str, &str); Feature::COUNT] = [
    (Feature::Vowel, "vwl", "vowel"),
    (Feature::Voiced, "vcd", "voiced"),
    (Feature::Voiceless, "vls", "voiceless"),
    (Feature::Murmured, "mrm", "murmured"),
    (Feature::Bilabial, "blb", "bilabial"),
    (Feature::LabioDental, "lbd", "labio-dental"),
    (Feature::Dental, "dnt", "dental"),
    (Feature::Alveolar, "alv", "alveolar"),
    (Feature::PalatoAlveolar, "pla", "palato-alveolar"),
    (Feature::Retroflex, "rfx", "retroflex"),
    (Feature::AlveoloPalatal, "alp", "alveolo-palatal"),
    (Feature::Palatal, "pal", "palatal"),
    (Feature::LabioPalatal, "lbp", "labio-palatal"),
    (Feature::Velar, "vel", "velar"),
    (Feature::LabioVelar, "lbv", "labio-velar"),
    (Feature::Uvular, "uvl", "uvular"),
    (Feature::Pharyngeal, "phr", "pharyngeal"),
    (Feature::Epiglottal, "epg", "epiglottal"),
    (Feature::Glottal, "glt", "glottal"),
    (Feature::Lateral, "lat", "lateral"),
    (Feature::Sibilant, "sib", "sibilant"),
    (Feature::Plosive, "stp", "plosive"),
    (Feature::Fricative, "frc", "fricative"),
    (Feature::Nasal, "nas", "nasal"),
    (Feature::Approximant, "apr", "approximant"),
    (Feature::Trill, "trl", "trill"),
    (Feature::Flap, "flp", "flap"),
    (Feature::Click, "clk", "click"),
    (Feature::Ejective, "ejc", "ejective"),
    (Feature::Implosive, "imp", "implosive"),
    (Feature::High, "hgh", "high"),
    (Feature::SemiHigh, "smh", "semi-high"),
    (Feature::UpperMid, "umd", "upper-mid"),
    (Feature::Mid, "mid", "mid"),
    (Feature::LowerMid, "lmd", "lower-mid"),
    (Feature::SemiLow, "sml", "semi-low"),
    (Feature::Low, "low", "low"),
    (Feature::Front, "fnt", "front"),
    (Feature::Center, "cnt", "center"),
    (Feature::Back, "bck", "back"),
    (Feature::Unrounded, "unr", "unrounded"),
    (Feature::Rounded, "rnd", "rounded"),
    (Feature::PrimaryStress, "st1", "primary stress"),
    (Feature::SecondaryStress, "st2", "secondary stress"),
    (Feature::ExtraStress, "st3", "extra stress"),
    (Feature::SyllableBreak, "sbr", "syllable break"),
    (Feature::SilentPause, "pau", "silent pause"),
    (Feature::Linking, "lnk", "linking"),
    (Feature::FootBreak, "fbr", "foot break"),
    (Feature::IntonationBreak, "ibr", "intonation break"),
    (Feature::ExtraShort, "est", "extra short"),
    (Feature::HalfLong, "hlg", "half long"),
    (Feature::Long, "lng", "long"),
    (Feature::Aspirated, "asp", "aspirated"),
    (Feature::Unreleased, "unx", "unreleased"),
    (Feature::NasalRelease, "nzr", "nasal release"),
    (Feature::LateralRelease, "lrl", "lateral release"),
    (Feature::Syllabic, "syl", "syllabic"),
    (Feature::NonSyllabic, "nsy", "non-syllabic"),
    (Feature::Velarized, "vzd", "velarized"),
    (Feature::Labialized, "lzd", "labialized"),
    (Feature::Palatalized, "pzd", "palatalized"),
    (Feature::Rhoticized, "rzd", "rhoticized"),
    (Feature::Nasalized, "nzd", "nasalized"),
    (Feature::Pharyngealized, "fzd", "pharyngealized"),
];

static BY_ABBREVIATION: Lazy<HashMap<&'static str, Feature>> =
    Lazy::new(|| FEATURES.iter().map(|&(f, abbr, _)| (abbr, f)).collect());

impl Feature {
    /// Number of features in the vocabulary.
    pub const COUNT: usize = 65;

    /// All features, in vocabulary order.
    pub fn all() -> impl Iterator<Item = Feature> {
        FEATURES.iter().map(|&(f, _, _)| f)
    }

    /// The three-letter mnemonic used by textual notations (e.g. `"blb"`).
    pub fn abbreviation(self) -> &'static str {
        FEATURES[self as usize].1
    }

    /// Human-readable name (e.g. `"labio-dental"`).
    pub fn name(self) -> &'static str {
        FEATURES[self as usize].2
    }

    /// Look up a feature by its mnemonic abbreviation.
    pub fn from_abbreviation(abbreviation: &str) -> Option<Feature> {
        BY_ABBREVIATION.get(abbreviation).copied()
    }

    pub(crate) fn from_index(index: u32) -> Option<Feature> {
        FEATURES.get(index as usize).map(|&(f, _, _)| f)
    }

    pub(crate) fn bit(self) -> u128 {
        1u128 << (self as u8)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = PhoneticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::from_abbreviation(s)
            .or_else(|| FEATURES.iter().find(|e| e.2 == s).map(|e| e.0))
            .ok_or_else(|| PhoneticError::format(format!("unknown phoneme feature '{s}'")))
    }
}
