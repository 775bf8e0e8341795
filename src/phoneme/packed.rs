//! Packed 64-bit phoneme layout.
//!
//! ```text
//! main ------------------- 00000000001FFFFF
//!   type ----------------- 000000000000000F
//!   consonants ----------- 0000000000003FF0
//!   vowels --------------- 00000000001FC000
//! diacritics ------------- 000000007FE00000
//! reserved --------------- 0FFFFFFF80000000
//! suprasegmentals -------- F000000000000000
//! ```
//!
//! The layout is a file/wire contract. Do not renumber.

use super::{Feature, Phoneme};
use crate::PhoneticError;

// fields

pub const PHONEME_TYPE: u64 = 0x0000_0000_0000_000F;
pub const PLACE_OF_ARTICULATION: u64 = 0x0000_0000_0000_00F0;
pub const MANNER_OF_ARTICULATION: u64 = 0x0000_0000_0000_0F00;
pub const VOICED: u64 = 0x0000_0000_0000_1000;
pub const LATERAL: u64 = 0x0000_0000_0000_2000;
pub const HIGH: u64 = 0x0000_0000_0000_4000;
pub const MID: u64 = 0x0000_0000_0000_8000;
pub const LOW: u64 = 0x0000_0000_0001_0000;
pub const LAX: u64 = 0x0000_0000_0002_0000;
pub const FRONT: u64 = 0x0000_0000_0004_0000;
pub const BACK: u64 = 0x0000_0000_0008_0000;
pub const ROUNDED: u64 = 0x0000_0000_0010_0000;
pub const SYLLABIC: u64 = 0x0000_0000_0020_0000;
pub const RELEASE: u64 = 0x0000_0000_00C0_0000;
pub const MURMURED: u64 = 0x0000_0000_0100_0000;
pub const VELARIZED: u64 = 0x0000_0000_0200_0000;
pub const LABIALIZED: u64 = 0x0000_0000_0400_0000;
pub const PALATALIZED: u64 = 0x0000_0000_0800_0000;
pub const RHOTICIZED: u64 = 0x0000_0000_1000_0000;
pub const NASALIZED: u64 = 0x0000_0000_2000_0000;
pub const PHARYNGEALIZED: u64 = 0x0000_0000_4000_0000;
pub const STRESS: u64 = 0x3000_0000_0000_0000;
pub const LENGTH: u64 = 0xC000_0000_0000_0000;

pub const VOWEL_HEIGHT: u64 = HIGH | MID | LOW | LAX;
pub const VOWEL_BACKNESS: u64 = FRONT | BACK;

pub const MAIN: u64 = 0x0000_0000_001F_FFFF;
pub const DIACRITICS: u64 = 0x0000_0000_7FE0_0000;
pub const SUPRASEGMENTALS: u64 = STRESS | LENGTH;

// phoneme type

pub const CONSONANT: u64 = 0x0;
pub const VOWEL: u64 = 0x1;
pub const PAUSE: u64 = 0x2;
pub const SYLLABLE_BREAK: u64 = 0x3;
pub const LINKING: u64 = 0x4;
pub const FOOT_BREAK: u64 = 0x5;
pub const INTONATION_BREAK: u64 = 0x6;

// place of articulation

pub const BILABIAL: u64 = 0x00;
pub const LABIO_DENTAL: u64 = 0x10;
pub const DENTAL: u64 = 0x20;
pub const ALVEOLAR: u64 = 0x30;
pub const PALATO_ALVEOLAR: u64 = 0x40;
pub const RETROFLEX: u64 = 0x50;
pub const ALVEOLO_PALATAL: u64 = 0x60;
pub const PALATAL: u64 = 0x70;
pub const LABIO_PALATAL: u64 = 0x80;
pub const VELAR: u64 = 0x90;
pub const LABIO_VELAR: u64 = 0xA0;
pub const UVULAR: u64 = 0xB0;
pub const PHARYNGEAL: u64 = 0xC0;
pub const EPIGLOTTAL: u64 = 0xD0;
pub const GLOTTAL: u64 = 0xE0;

// manner of articulation

pub const PLOSIVE: u64 = 0x000;
pub const FRICATIVE: u64 = 0x100;
pub const NASAL: u64 = 0x200;
pub const APPROXIMANT: u64 = 0x300;
pub const TRILL: u64 = 0x400;
pub const FLAP: u64 = 0x500;
pub const CLICK: u64 = 0x600;
pub const EJECTIVE: u64 = 0x700;
pub const IMPLOSIVE: u64 = 0x800;

// vowel height (HIGH, MID and LOW are used as-is)

pub const SEMI_HIGH: u64 = HIGH | LAX;
pub const UPPER_MID: u64 = HIGH | MID;
pub const LOWER_MID: u64 = LOW | MID;
pub const SEMI_LOW: u64 = LOW | LAX;

// vowel backness (FRONT and BACK are used as-is)

pub const CENTER: u64 = FRONT | BACK;

// release

pub const ASPIRATED: u64 = 0x0000_0000_0000_0000;
pub const UNEXPLODED: u64 = 0x0000_0000_0040_0000;
pub const NASAL_RELEASE: u64 = 0x0000_0000_0080_0000;
pub const LATERAL_RELEASE: u64 = 0x0000_0000_00C0_0000;

// stress

pub const UNSTRESSED: u64 = 0x0000_0000_0000_0000;
pub const PRIMARY_STRESS: u64 = 0x1000_0000_0000_0000;
pub const SECONDARY_STRESS: u64 = 0x2000_0000_0000_0000;
pub const EXTRA_STRESS: u64 = 0x3000_0000_0000_0000;

// length

pub const SHORT: u64 = 0x0000_0000_0000_0000;
pub const EXTRA_SHORT: u64 = 0x4000_0000_0000_0000;
pub const LONG: u64 = 0x8000_0000_0000_0000;
pub const HALF_LONG: u64 = 0xC000_0000_0000_0000;

const PLACES: [(u64, Feature); 15] = [
    (BILABIAL, Feature::Bilabial),
    (LABIO_DENTAL, Feature::LabioDental),
    (DENTAL, Feature::Dental),
    (ALVEOLAR, Feature::Alveolar),
    (PALATO_ALVEOLAR, Feature::PalatoAlveolar),
    (RETROFLEX, Feature::Retroflex),
    (ALVEOLO_PALATAL, Feature::AlveoloPalatal),
    (PALATAL, Feature::Palatal),
    (LABIO_PALATAL, Feature::LabioPalatal),
    (VELAR, Feature::Velar),
    (LABIO_VELAR, Feature::LabioVelar),
    (UVULAR, Feature::Uvular),
    (PHARYNGEAL, Feature::Pharyngeal),
    (EPIGLOTTAL, Feature::Epiglottal),
    (GLOTTAL, Feature::Glottal),
];

const MANNERS: [(u64, Feature); 9] = [
    (PLOSIVE, Feature::Plosive),
    (FRICATIVE, Feature::Fricative),
    (NASAL, Feature::Nasal),
    (APPROXIMANT, Feature::Approximant),
    (TRILL, Feature::Trill),
    (FLAP, Feature::Flap),
    (CLICK, Feature::Click),
    (EJECTIVE, Feature::Ejective),
    (IMPLOSIVE, Feature::Implosive),
];

const HEIGHTS: [(u64, Feature); 7] = [
    (HIGH, Feature::High),
    (SEMI_HIGH, Feature::SemiHigh),
    (UPPER_MID, Feature::UpperMid),
    (MID, Feature::Mid),
    (LOWER_MID, Feature::LowerMid),
    (SEMI_LOW, Feature::SemiLow),
    (LOW, Feature::Low),
];

const BACKNESS: [(u64, Feature); 3] = [
    (FRONT, Feature::Front),
    (CENTER, Feature::Center),
    (BACK, Feature::Back),
];

const BOUNDARIES: [(u64, Feature); 5] = [
    (PAUSE, Feature::SilentPause),
    (SYLLABLE_BREAK, Feature::SyllableBreak),
    (LINKING, Feature::Linking),
    (FOOT_BREAK, Feature::FootBreak),
    (INTONATION_BREAK, Feature::IntonationBreak),
];

const RELEASES: [(u64, Feature); 3] = [
    (UNEXPLODED, Feature::Unreleased),
    (NASAL_RELEASE, Feature::NasalRelease),
    (LATERAL_RELEASE, Feature::LateralRelease),
];

const CO_ARTICULATION: [(u64, Feature); 7] = [
    (MURMURED, Feature::Murmured),
    (VELARIZED, Feature::Velarized),
    (LABIALIZED, Feature::Labialized),
    (PALATALIZED, Feature::Palatalized),
    (RHOTICIZED, Feature::Rhoticized),
    (NASALIZED, Feature::Nasalized),
    (PHARYNGEALIZED, Feature::Pharyngealized),
];

const STRESSES: [(u64, Feature); 3] = [
    (PRIMARY_STRESS, Feature::PrimaryStress),
    (SECONDARY_STRESS, Feature::SecondaryStress),
    (EXTRA_STRESS, Feature::ExtraStress),
];

const LENGTHS: [(u64, Feature); 3] = [
    (EXTRA_SHORT, Feature::ExtraShort),
    (LONG, Feature::Long),
    (HALF_LONG, Feature::HalfLong),
];

/// Places where a central fricative is a sibilant.
const SIBILANT_PLACES: [u64; 4] = [ALVEOLAR, PALATO_ALVEOLAR, RETROFLEX, ALVEOLO_PALATAL];

/// A phoneme packed into a 64-bit field layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PackedPhoneme(u64);

impl PackedPhoneme {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// The bits of `mask`.
    pub const fn get(self, mask: u64) -> u64 {
        self.0 & mask
    }

    /// OR `value` into the phoneme.
    pub fn set(&mut self, value: u64) -> &mut Self {
        self.0 |= value;
        self
    }

    /// Replace the field selected by `mask` with `value`.
    ///
    /// The field is cleared first, and bits of `value` outside `mask` are
    /// discarded, so neighbouring fields are never touched.
    pub fn set_field(&mut self, value: u64, mask: u64) -> &mut Self {
        self.0 = (self.0 & !mask) | (value & mask);
        self
    }

    pub fn clear(&mut self, mask: u64) -> &mut Self {
        self.0 &= !mask;
        self
    }

    /// A copy keeping only the bits of `mask`.
    pub const fn masked(self, mask: u64) -> Self {
        Self(self.0 & mask)
    }
}

impl From<u64> for PackedPhoneme {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<PackedPhoneme> for u64 {
    fn from(phoneme: PackedPhoneme) -> Self {
        phoneme.0
    }
}

fn lookup_feature(table: &[(u64, Feature)], value: u64) -> Option<Feature> {
    table.iter().find(|&&(v, _)| v == value).map(|&(_, f)| f)
}

/// The `(value, mask)` pair a feature writes, or `None` for features with no bits.
fn encoding(feature: Feature) -> Option<(u64, u64)> {
    use Feature::*;
    let place = |v| Some((v, PLACE_OF_ARTICULATION));
    let manner = |v| Some((v, MANNER_OF_ARTICULATION));
    let height = |v| Some((v, VOWEL_HEIGHT));
    let backness = |v| Some((v, VOWEL_BACKNESS));
    let kind = |v| Some((v, PHONEME_TYPE));
    let flag = |v| Some((v, v));
    match feature {
        Vowel => kind(VOWEL),
        Voiced => flag(VOICED),
        Voiceless => None,
        Murmured => flag(MURMURED),
        Bilabial => place(BILABIAL),
        LabioDental => place(LABIO_DENTAL),
        Dental => place(DENTAL),
        Alveolar => place(ALVEOLAR),
        PalatoAlveolar => place(PALATO_ALVEOLAR),
        Retroflex => place(RETROFLEX),
        AlveoloPalatal => place(ALVEOLO_PALATAL),
        Palatal => place(PALATAL),
        LabioPalatal => place(LABIO_PALATAL),
        Velar => place(VELAR),
        LabioVelar => place(LABIO_VELAR),
        Uvular => place(UVULAR),
        Pharyngeal => place(PHARYNGEAL),
        Epiglottal => place(EPIGLOTTAL),
        Glottal => place(GLOTTAL),
        Lateral => flag(LATERAL),
        Sibilant => None,
        Plosive => manner(PLOSIVE),
        Fricative => manner(FRICATIVE),
        Nasal => manner(NASAL),
        Approximant => manner(APPROXIMANT),
        Trill => manner(TRILL),
        Flap => manner(FLAP),
        Click => manner(CLICK),
        Ejective => manner(EJECTIVE),
        Implosive => manner(IMPLOSIVE),
        High => height(HIGH),
        SemiHigh => height(SEMI_HIGH),
        UpperMid => height(UPPER_MID),
        Mid => height(MID),
        LowerMid => height(LOWER_MID),
        SemiLow => height(SEMI_LOW),
        Low => height(LOW),
        Front => backness(FRONT),
        Center => backness(CENTER),
        Back => backness(BACK),
        Unrounded => None,
        Rounded => flag(ROUNDED),
        PrimaryStress => Some((PRIMARY_STRESS, STRESS)),
        SecondaryStress => Some((SECONDARY_STRESS, STRESS)),
        ExtraStress => Some((EXTRA_STRESS, STRESS)),
        SyllableBreak => kind(SYLLABLE_BREAK),
        SilentPause => kind(PAUSE),
        Linking => kind(LINKING),
        FootBreak => kind(FOOT_BREAK),
        IntonationBreak => kind(INTONATION_BREAK),
        ExtraShort => Some((EXTRA_SHORT, LENGTH)),
        HalfLong => Some((HALF_LONG, LENGTH)),
        Long => Some((LONG, LENGTH)),
        // release value 0 doubles as "no release"
        Aspirated => None,
        Unreleased => Some((UNEXPLODED, RELEASE)),
        NasalRelease => Some((NASAL_RELEASE, RELEASE)),
        LateralRelease => Some((LATERAL_RELEASE, RELEASE)),
        Syllabic => flag(SYLLABIC),
        NonSyllabic => None,
        Velarized => flag(VELARIZED),
        Labialized => flag(LABIALIZED),
        Palatalized => flag(PALATALIZED),
        Rhoticized => flag(RHOTICIZED),
        Nasalized => flag(NASALIZED),
        Pharyngealized => flag(PHARYNGEALIZED),
    }
}

impl From<&Phoneme> for PackedPhoneme {
    /// Encode a symbolic phoneme.
    ///
    /// `voiceless` and `unrounded` are the implicit defaults. `sibilant`,
    /// `non-syllabic` and `aspirated` have no bits of their own and are dropped.
    ///
    /// Ejective is a manner value, so an ejective fricative such as `sʼ`
    /// keeps neither its fricative manner nor `sibilant`, and decodes as the
    /// ejective plosive at the same place (`tʼ`).
    fn from(phoneme: &Phoneme) -> Self {
        let mut packed = PackedPhoneme::default();
        for (value, mask) in phoneme.iter().filter_map(encoding) {
            packed.set_field(value, mask);
        }
        packed
    }
}

impl From<Phoneme> for PackedPhoneme {
    fn from(phoneme: Phoneme) -> Self {
        PackedPhoneme::from(&phoneme)
    }
}

impl TryFrom<PackedPhoneme> for Phoneme {
    type Error = PhoneticError;

    /// Decode a packed phoneme.
    ///
    /// Consonants gain `voiceless` when neither voiced nor murmured, vowels gain
    /// `unrounded` when not rounded, and central fricatives at sibilant places
    /// gain `sibilant`.
    fn try_from(packed: PackedPhoneme) -> Result<Self, Self::Error> {
        let mut phoneme = Phoneme::empty();
        match packed.get(PHONEME_TYPE) {
            CONSONANT => {
                let place = packed.get(PLACE_OF_ARTICULATION);
                let manner = packed.get(MANNER_OF_ARTICULATION);
                if packed.get(VOICED) != 0 {
                    phoneme.insert(Feature::Voiced)?;
                } else if packed.get(MURMURED) == 0 {
                    phoneme.insert(Feature::Voiceless)?;
                }
                let place_feature = lookup_feature(&PLACES, place).ok_or_else(|| {
                    PhoneticError::format(format!("unassigned place of articulation {place:#x}"))
                })?;
                phoneme.insert(place_feature)?;
                if packed.get(LATERAL) != 0 {
                    phoneme.insert(Feature::Lateral)?;
                } else if manner == FRICATIVE && SIBILANT_PLACES.contains(&place) {
                    phoneme.insert(Feature::Sibilant)?;
                }
                let manner_feature = lookup_feature(&MANNERS, manner).ok_or_else(|| {
                    PhoneticError::format(format!("unassigned manner of articulation {manner:#x}"))
                })?;
                phoneme.insert(manner_feature)?;
            }
            VOWEL => {
                phoneme.insert(Feature::Vowel)?;
                let height = packed.get(VOWEL_HEIGHT);
                if height != 0 {
                    let f = lookup_feature(&HEIGHTS, height).ok_or_else(|| {
                        PhoneticError::format(format!("unassigned vowel height {height:#x}"))
                    })?;
                    phoneme.insert(f)?;
                }
                if let Some(f) = lookup_feature(&BACKNESS, packed.get(VOWEL_BACKNESS)) {
                    phoneme.insert(f)?;
                }
                if packed.get(ROUNDED) != 0 {
                    phoneme.insert(Feature::Rounded)?;
                } else {
                    phoneme.insert(Feature::Unrounded)?;
                }
            }
            other => {
                let f = lookup_feature(&BOUNDARIES, other).ok_or_else(|| {
                    PhoneticError::format(format!("unassigned phoneme type {other:#x}"))
                })?;
                phoneme.insert(f)?;
            }
        }

        if packed.get(SYLLABIC) != 0 {
            phoneme.insert(Feature::Syllabic)?;
        }
        if let Some(f) = lookup_feature(&RELEASES, packed.get(RELEASE)) {
            phoneme.insert(f)?;
        }
        for &(bit, f) in CO_ARTICULATION.iter() {
            if packed.get(bit) != 0 {
                phoneme.insert(f)?;
            }
        }
        if let Some(f) = lookup_feature(&STRESSES, packed.get(STRESS)) {
            phoneme.insert(f)?;
        }
        if let Some(f) = lookup_feature(&LENGTHS, packed.get(LENGTH)) {
            phoneme.insert(f)?;
        }
        Ok(phoneme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Feature::*;

    /// Disjoint fields and every value each can hold.
    fn fields() -> Vec<(u64, Vec<u64>)> {
        let heights = std::iter::once(0).chain(HEIGHTS.iter().map(|h| h.0));
        let releases = [ASPIRATED, UNEXPLODED, NASAL_RELEASE, LATERAL_RELEASE];
        let stresses = [UNSTRESSED, PRIMARY_STRESS, SECONDARY_STRESS, EXTRA_STRESS];
        let mut fields = vec![
            (PHONEME_TYPE, (0..=6).collect()),
            (PLACE_OF_ARTICULATION, PLACES.iter().map(|p| p.0).collect()),
            (MANNER_OF_ARTICULATION, MANNERS.iter().map(|m| m.0).collect()),
            (VOICED, vec![0, VOICED]),
            (LATERAL, vec![0, LATERAL]),
            (VOWEL_HEIGHT, heights.collect()),
            (VOWEL_BACKNESS, vec![0, FRONT, CENTER, BACK]),
            (ROUNDED, vec![0, ROUNDED]),
            (SYLLABIC, vec![0, SYLLABIC]),
            (RELEASE, releases.to_vec()),
            (STRESS, stresses.to_vec()),
            (LENGTH, vec![SHORT, EXTRA_SHORT, LONG, HALF_LONG]),
        ];
        for &(bit, _) in CO_ARTICULATION.iter() {
            fields.push((bit, vec![0, bit]));
        }
        fields
    }

    #[test]
    fn field_masks_are_disjoint_and_match_groups() {
        let fields = fields();
        let mut union = 0u64;
        for (mask, _) in &fields {
            assert_eq!(union & mask, 0, "mask {mask:#x} overlaps another field");
            union |= mask;
        }
        assert_eq!(union, MAIN | DIACRITICS | SUPRASEGMENTALS);
    }

    #[test]
    fn setting_one_field_never_alters_another() {
        let fields = fields();
        for (mask_a, values_a) in &fields {
            for (mask_b, values_b) in &fields {
                if mask_a == mask_b {
                    continue;
                }
                for &a in values_a {
                    for &b in values_b {
                        let mut p = PackedPhoneme::new(!0);
                        p.set_field(b, *mask_b);
                        p.set_field(a, *mask_a);
                        assert_eq!(
                            p.get(*mask_b),
                            b,
                            "{mask_a:#x}={a:#x} leaked into {mask_b:#x}"
                        );
                        assert_eq!(p.get(*mask_a), a);

                        let mut q = PackedPhoneme::default();
                        q.set_field(b, *mask_b);
                        q.set_field(!0, *mask_a);
                        q.set_field(a, *mask_a);
                        assert_eq!(q.get(*mask_b), b);
                        assert_eq!(q.get(*mask_a), a);
                    }
                }
            }
        }
    }

    #[test]
    fn set_field_discards_bits_outside_mask() {
        let mut p = PackedPhoneme::default();
        p.set_field(VELAR | VOWEL, PLACE_OF_ARTICULATION);
        assert_eq!(p.value(), VELAR);
    }

    #[test]
    fn set_and_clear_flags() {
        let mut p = PackedPhoneme::new(VOWEL);
        p.set(ROUNDED).set(NASALIZED);
        assert_eq!(p.value(), VOWEL | ROUNDED | NASALIZED);
        p.clear(DIACRITICS);
        assert_eq!(p.value(), VOWEL | ROUNDED);
        assert_eq!(u64::from(p), p.value());
    }

    #[test]
    fn encodes_consonant_fields() {
        let b = Phoneme::new(&[Voiced, Bilabial, Plosive]).unwrap();
        assert_eq!(
            PackedPhoneme::from(&b).value(),
            CONSONANT | BILABIAL | PLOSIVE | VOICED
        );

        let l = Phoneme::new(&[Voiced, Alveolar, Lateral, Approximant, PrimaryStress]).unwrap();
        assert_eq!(
            PackedPhoneme::from(&l).value(),
            ALVEOLAR | APPROXIMANT | VOICED | LATERAL | PRIMARY_STRESS
        );
    }

    #[test]
    fn encodes_vowel_fields() {
        let o = Phoneme::new(&[Vowel, UpperMid, Back, Rounded, Long, Nasalized]).unwrap();
        assert_eq!(
            PackedPhoneme::from(&o).value(),
            VOWEL | UPPER_MID | BACK | ROUNDED | LONG | NASALIZED
        );
    }

    #[test]
    fn decodes_what_it_encodes() {
        let samples = [
            Phoneme::new(&[Voiceless, Alveolar, Sibilant, Fricative]).unwrap(),
            Phoneme::new(&[Voiceless, Dental, Fricative]).unwrap(),
            Phoneme::new(&[Voiced, Alveolar, Lateral, Fricative]).unwrap(),
            Phoneme::new(&[Voiced, Velar, Nasal, Syllabic]).unwrap(),
            Phoneme::new(&[Voiceless, Alveolar, Plosive, Unreleased, Labialized]).unwrap(),
            Phoneme::new(&[Murmured, Glottal, Fricative]).unwrap(),
            Phoneme::new(&[Vowel, Mid, Center, Unrounded, Rhoticized]).unwrap(),
            Phoneme::new(&[Vowel, SemiLow, Front, Unrounded, HalfLong]).unwrap(),
            Phoneme::new(&[Vowel, Low, Back, Rounded, SecondaryStress]).unwrap(),
            Phoneme::new(&[SilentPause]).unwrap(),
            Phoneme::new(&[IntonationBreak]).unwrap(),
        ];
        for p in samples {
            let packed = PackedPhoneme::from(&p);
            assert_eq!(Phoneme::try_from(packed).unwrap(), p, "{packed:?}");
        }
    }

    #[test]
    fn drops_features_without_bits() {
        let th = Phoneme::new(&[Voiceless, Alveolar, Plosive, Aspirated]).unwrap();
        let decoded = Phoneme::try_from(PackedPhoneme::from(&th)).unwrap();
        let t = Phoneme::new(&[Voiceless, Alveolar, Plosive]).unwrap();
        assert_eq!(decoded, t);
    }

    #[test]
    fn ejective_fricatives_lose_their_manner() {
        let s = Phoneme::new(&[Voiceless, Alveolar, Sibilant, Ejective]).unwrap();
        let packed = PackedPhoneme::from(&s);
        assert_eq!(packed.get(MANNER_OF_ARTICULATION), EJECTIVE);

        let t = Phoneme::new(&[Voiceless, Alveolar, Ejective]).unwrap();
        assert_eq!(Phoneme::try_from(packed).unwrap(), t);
        assert_eq!(PackedPhoneme::from(&t), packed);
    }

    #[test]
    fn rejects_unassigned_values() {
        assert!(Phoneme::try_from(PackedPhoneme::new(0x7)).is_err());
        let place_only = PackedPhoneme::new(PLACE_OF_ARTICULATION);
        assert!(Phoneme::try_from(place_only).is_err());
        assert!(Phoneme::try_from(PackedPhoneme::new(0x900)).is_err());
        assert!(Phoneme::try_from(PackedPhoneme::new(VOWEL | LAX)).is_err());
    }

    #[test]
    fn masking_keeps_selected_groups() {
        let p = PackedPhoneme::new(VOWEL | HIGH | FRONT | NASALIZED | PRIMARY_STRESS | LONG);
        assert_eq!(
            p.masked(MAIN | DIACRITICS | LENGTH).value(),
            VOWEL | HIGH | FRONT | NASALIZED | LONG
        );
    }
}
