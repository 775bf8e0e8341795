//! International Phonetic Alphabet notation.
//!
//! A phoneme is written as optional stress marks, one base symbol, then any
//! number of diacritics and modifier letters. Affricates and diphthongs are
//! two phonemes, so tie bars are not accepted.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{decode_char, Notation};
use crate::phoneme::{Feature, Phoneme};
use crate::PhoneticError;

use Feature::*;

pub const NAME: &str = "ipa";

/// Base symbols. When two symbols share a feature set the first is the one
/// written (`ɡ` over `g`).
const BASE_SYMBOLS: &[(char, &[Feature])] = &[
    // plosives
    ('p', &[Voiceless, Bilabial, Plosive]),
    ('b', &[Voiced, Bilabial, Plosive]),
    ('t', &[Voiceless, Alveolar, Plosive]),
    ('d', &[Voiced, Alveolar, Plosive]),
    ('ʈ', &[Voiceless, Retroflex, Plosive]),
    ('ɖ', &[Voiced, Retroflex, Plosive]),
    ('c', &[Voiceless, Palatal, Plosive]),
    ('ɟ', &[Voiced, Palatal, Plosive]),
    ('k', &[Voiceless, Velar, Plosive]),
    ('ɡ', &[Voiced, Velar, Plosive]),
    ('g', &[Voiced, Velar, Plosive]),
    ('q', &[Voiceless, Uvular, Plosive]),
    ('ɢ', &[Voiced, Uvular, Plosive]),
    ('ʡ', &[Voiceless, Epiglottal, Plosive]),
    ('ʔ', &[Voiceless, Glottal, Plosive]),
    // nasals
    ('m', &[Voiced, Bilabial, Nasal]),
    ('ɱ', &[Voiced, LabioDental, Nasal]),
    ('n', &[Voiced, Alveolar, Nasal]),
    ('ɳ', &[Voiced, Retroflex, Nasal]),
    ('ɲ', &[Voiced, Palatal, Nasal]),
    ('ŋ', &[Voiced, Velar, Nasal]),
    ('ɴ', &[Voiced, Uvular, Nasal]),
    // trills and flaps
    ('ʙ', &[Voiced, Bilabial, Trill]),
    ('r', &[Voiced, Alveolar, Trill]),
    ('ʀ', &[Voiced, Uvular, Trill]),
    ('ⱱ', &[Voiced, LabioDental, Flap]),
    ('ɾ', &[Voiced, Alveolar, Flap]),
    ('ɽ', &[Voiced, Retroflex, Flap]),
    ('ɺ', &[Voiced, Alveolar, Lateral, Flap]),
    // fricatives
    ('ɸ', &[Voiceless, Bilabial, Fricative]),
    ('β', &[Voiced, Bilabial, Fricative]),
    ('f', &[Voiceless, LabioDental, Fricative]),
    ('v', &[Voiced, LabioDental, Fricative]),
    ('θ', &[Voiceless, Dental, Fricative]),
    ('ð', &[Voiced, Dental, Fricative]),
    ('s', &[Voiceless, Alveolar, Sibilant, Fricative]),
    ('z', &[Voiced, Alveolar, Sibilant, Fricative]),
    ('ʃ', &[Voiceless, PalatoAlveolar, Sibilant, Fricative]),
    ('ʒ', &[Voiced, PalatoAlveolar, Sibilant, Fricative]),
    ('ʂ', &[Voiceless, Retroflex, Sibilant, Fricative]),
    ('ʐ', &[Voiced, Retroflex, Sibilant, Fricative]),
    ('ɕ', &[Voiceless, AlveoloPalatal, Sibilant, Fricative]),
    ('ʑ', &[Voiced, AlveoloPalatal, Sibilant, Fricative]),
    ('ç', &[Voiceless, Palatal, Fricative]),
    ('ʝ', &[Voiced, Palatal, Fricative]),
    ('x', &[Voiceless, Velar, Fricative]),
    ('ɣ', &[Voiced, Velar, Fricative]),
    ('ʍ', &[Voiceless, LabioVelar, Fricative]),
    ('χ', &[Voiceless, Uvular, Fricative]),
    ('ʁ', &[Voiced, Uvular, Fricative]),
    ('ħ', &[Voiceless, Pharyngeal, Fricative]),
    ('ʕ', &[Voiced, Pharyngeal, Fricative]),
    ('ʜ', &[Voiceless, Epiglottal, Fricative]),
    ('ʢ', &[Voiced, Epiglottal, Fricative]),
    ('h', &[Voiceless, Glottal, Fricative]),
    ('ɦ', &[Voiced, Glottal, Fricative]),
    ('ɬ', &[Voiceless, Alveolar, Lateral, Fricative]),
    ('ɮ', &[Voiced, Alveolar, Lateral, Fricative]),
    // approximants
    ('ʋ', &[Voiced, LabioDental, Approximant]),
    ('ɹ', &[Voiced, Alveolar, Approximant]),
    ('ɻ', &[Voiced, Retroflex, Approximant]),
    ('j', &[Voiced, Palatal, Approximant]),
    ('ɥ', &[Voiced, LabioPalatal, Approximant]),
    ('ɰ', &[Voiced, Velar, Approximant]),
    ('w', &[Voiced, LabioVelar, Approximant]),
    ('l', &[Voiced, Alveolar, Lateral, Approximant]),
    ('ɭ', &[Voiced, Retroflex, Lateral, Approximant]),
    ('ʎ', &[Voiced, Palatal, Lateral, Approximant]),
    ('ʟ', &[Voiced, Velar, Lateral, Approximant]),
    // clicks
    ('ʘ', &[Voiceless, Bilabial, Click]),
    ('ǀ', &[Voiceless, Dental, Click]),
    ('ǃ', &[Voiceless, PalatoAlveolar, Click]),
    ('ǂ', &[Voiceless, Palatal, Click]),
    ('ǁ', &[Voiceless, Alveolar, Lateral, Click]),
    // implosives
    ('ɓ', &[Voiced, Bilabial, Implosive]),
    ('ɗ', &[Voiced, Alveolar, Implosive]),
    ('ʄ', &[Voiced, Palatal, Implosive]),
    ('ɠ', &[Voiced, Velar, Implosive]),
    ('ʛ', &[Voiced, Uvular, Implosive]),
    // vowels
    ('i', &[Vowel, High, Front, Unrounded]),
    ('y', &[Vowel, High, Front, Rounded]),
    ('ɨ', &[Vowel, High, Center, Unrounded]),
    ('ʉ', &[Vowel, High, Center, Rounded]),
    ('ɯ', &[Vowel, High, Back, Unrounded]),
    ('u', &[Vowel, High, Back, Rounded]),
    ('ɪ', &[Vowel, SemiHigh, Front, Unrounded]),
    ('ʏ', &[Vowel, SemiHigh, Front, Rounded]),
    ('ʊ', &[Vowel, SemiHigh, Back, Rounded]),
    ('e', &[Vowel, UpperMid, Front, Unrounded]),
    ('ø', &[Vowel, UpperMid, Front, Rounded]),
    ('ɘ', &[Vowel, UpperMid, Center, Unrounded]),
    ('ɵ', &[Vowel, UpperMid, Center, Rounded]),
    ('ɤ', &[Vowel, UpperMid, Back, Unrounded]),
    ('o', &[Vowel, UpperMid, Back, Rounded]),
    ('ə', &[Vowel, Mid, Center, Unrounded]),
    ('ɚ', &[Vowel, Mid, Center, Unrounded, Rhoticized]),
    ('ɛ', &[Vowel, LowerMid, Front, Unrounded]),
    ('œ', &[Vowel, LowerMid, Front, Rounded]),
    ('ɜ', &[Vowel, LowerMid, Center, Unrounded]),
    ('ɞ', &[Vowel, LowerMid, Center, Rounded]),
    ('ʌ', &[Vowel, LowerMid, Back, Unrounded]),
    ('ɔ', &[Vowel, LowerMid, Back, Rounded]),
    ('æ', &[Vowel, SemiLow, Front, Unrounded]),
    ('ɐ', &[Vowel, SemiLow, Center, Unrounded]),
    ('a', &[Vowel, Low, Front, Unrounded]),
    ('ɶ', &[Vowel, Low, Front, Rounded]),
    ('ɑ', &[Vowel, Low, Back, Unrounded]),
    ('ɒ', &[Vowel, Low, Back, Rounded]),
    // boundaries
    ('.', &[SyllableBreak]),
    ('_', &[SilentPause]),
    ('‿', &[Linking]),
    ('|', &[FootBreak]),
    ('‖', &[IntonationBreak]),
];

/// Diacritics and modifier letters, in the order they are written.
const MODIFIERS: &[(char, Feature)] = &[
    ('\u{0329}', Syllabic),
    ('\u{032F}', NonSyllabic),
    ('\u{0324}', Murmured),
    ('\u{0303}', Nasalized),
    ('\u{031A}', Unreleased),
    ('ʰ', Aspirated),
    ('ⁿ', NasalRelease),
    ('ˡ', LateralRelease),
    ('ʷ', Labialized),
    ('ʲ', Palatalized),
    ('ˠ', Velarized),
    ('ˤ', Pharyngealized),
    ('˞', Rhoticized),
    ('\u{0306}', ExtraShort),
    ('ˑ', HalfLong),
    ('ː', Long),
];

const EJECTIVE_MARK: char = 'ʼ';
const PRIMARY_STRESS_MARK: char = 'ˈ';
const SECONDARY_STRESS_MARK: char = 'ˌ';

static BY_SYMBOL: Lazy<HashMap<char, Phoneme>> = Lazy::new(|| {
    BASE_SYMBOLS
        .iter()
        .map(|&(ch, features)| (ch, Phoneme::from_table(features)))
        .collect()
});

static BY_FEATURES: Lazy<HashMap<Phoneme, char>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &(ch, features) in BASE_SYMBOLS {
        map.entry(Phoneme::from_table(features)).or_insert(ch);
    }
    map
});

fn modifier(ch: char) -> Option<Feature> {
    MODIFIERS.iter().find(|&&(m, _)| m == ch).map(|&(_, f)| f)
}

/// Turn a plosive or fricative base into its ejective.
fn make_ejective(phoneme: &mut Phoneme) -> Result<(), PhoneticError> {
    if phoneme.remove(Plosive) || phoneme.remove(Fricative) {
        phoneme.insert(Ejective)
    } else {
        Err(PhoneticError::format(format!(
            "ejective mark '{EJECTIVE_MARK}' on a phoneme that is not a plosive or fricative"
        )))
    }
}

/// Find the base symbol for `phoneme`, undoing the ejective transform if needed.
fn base_symbol(phoneme: &Phoneme) -> Option<(char, bool)> {
    if let Some(&ch) = BY_FEATURES.get(phoneme) {
        return Some((ch, false));
    }
    if !phoneme.contains(Ejective) {
        return None;
    }
    [Plosive, Fricative].into_iter().find_map(|manner| {
        let mut base = *phoneme;
        base.remove(Ejective);
        base.add(manner);
        BY_FEATURES.get(&base).map(|&ch| (ch, true))
    })
}

/// Split `phoneme` into a base symbol and as few diacritics as possible.
///
/// Symbols such as `ɚ` carry a modifier feature of their own, so smaller sets
/// of modifiers are split off before larger ones. Marks come back in
/// writing order.
fn split_diacritics(phoneme: &Phoneme) -> Option<(char, bool, Vec<char>)> {
    let present: Vec<(char, Feature)> = MODIFIERS
        .iter()
        .copied()
        .filter(|&(_, feature)| phoneme.contains(feature))
        .collect();
    let mut subsets: Vec<u32> = (0..1 << present.len()).collect();
    subsets.sort_by_key(|subset| subset.count_ones());

    subsets.into_iter().find_map(|subset| {
        let mut base = *phoneme;
        let mut marks = Vec::new();
        for (i, &(mark, feature)) in present.iter().enumerate() {
            if subset & (1 << i) != 0 {
                base.remove(feature);
                marks.push(mark);
            }
        }
        base_symbol(&base).map(|(symbol, ejective)| (symbol, ejective, marks))
    })
}

/// The International Phonetic Alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct IpaNotation;

impl Notation for IpaNotation {
    fn name(&self) -> &str {
        NAME
    }

    fn parse(&self, input: &[u8], pos: &mut usize) -> Result<Option<Phoneme>, PhoneticError> {
        let mut at = *pos;
        let mut stress = None;
        while let Some((ch, len)) = decode_char(input, at) {
            stress = match (ch, stress) {
                (PRIMARY_STRESS_MARK, None) => Some(PrimaryStress),
                (PRIMARY_STRESS_MARK, Some(PrimaryStress)) => Some(ExtraStress),
                (SECONDARY_STRESS_MARK, None) => Some(SecondaryStress),
                (PRIMARY_STRESS_MARK | SECONDARY_STRESS_MARK, Some(_)) => {
                    return Err(PhoneticError::format(format!(
                        "conflicting stress marks at byte {at}"
                    )))
                }
                _ => break,
            };
            at += len;
        }

        let base = decode_char(input, at)
            .and_then(|(ch, len)| BY_SYMBOL.get(&ch).map(|p| (*p, len)));
        let Some((mut phoneme, len)) = base else {
            if stress.is_some() {
                return Err(PhoneticError::format(format!(
                    "stress mark without a phoneme at byte {at}"
                )));
            }
            return Ok(None);
        };
        at += len;

        if let Some(stress) = stress {
            phoneme.insert(stress)?;
        }
        while let Some((ch, len)) = decode_char(input, at) {
            if ch == EJECTIVE_MARK {
                make_ejective(&mut phoneme)?;
            } else if let Some(feature) = modifier(ch) {
                phoneme.insert(feature)?;
            } else {
                break;
            }
            at += len;
        }

        *pos = at;
        Ok(Some(phoneme))
    }

    fn format(&self, phoneme: &Phoneme, out: &mut String) -> bool {
        let mut rest = *phoneme;
        let stress = if rest.remove(ExtraStress) {
            "ˈˈ"
        } else if rest.remove(PrimaryStress) {
            "ˈ"
        } else if rest.remove(SecondaryStress) {
            "ˌ"
        } else {
            ""
        };

        let Some((symbol, ejective, marks)) = split_diacritics(&rest) else {
            return false;
        };

        out.push_str(stress);
        out.push(symbol);
        if ejective {
            out.push(EJECTIVE_MARK);
        }
        out.extend(marks);
        true
    }
}
