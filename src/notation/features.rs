//! Explicit feature notation: `{vls,blb,stp}`.
//!
//! Every phoneme is representable, so this notation is lossless.

use super::Notation;
use crate::phoneme::{Feature, Phoneme};
use crate::PhoneticError;

pub const NAME: &str = "features";

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureNotation;

impl Notation for FeatureNotation {
    fn name(&self) -> &str {
        NAME
    }

    fn parse(&self, input: &[u8], pos: &mut usize) -> Result<Option<Phoneme>, PhoneticError> {
        if input.get(*pos) != Some(&b'{') {
            return Ok(None);
        }
        let start = *pos + 1;
        let end = input[start..]
            .iter()
            .position(|&b| b == b'}')
            .map(|i| start + i)
            .ok_or_else(|| {
                let at = *pos;
                PhoneticError::format(format!("missing '}}' for phoneme starting at byte {at}"))
            })?;

        let body = std::str::from_utf8(&input[start..end])
            .map_err(|e| PhoneticError::format(format!("invalid UTF-8 in phoneme: {e}")))?;
        let mut phoneme = Phoneme::empty();
        for abbreviation in body.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let feature = Feature::from_abbreviation(abbreviation).ok_or_else(|| {
                PhoneticError::format(format!("unknown feature abbreviation '{abbreviation}'"))
            })?;
            phoneme.insert(feature)?;
        }

        *pos = end + 1;
        Ok(Some(phoneme))
    }

    fn format(&self, phoneme: &Phoneme, out: &mut String) -> bool {
        out.push('{');
        for (i, feature) in phoneme.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(feature.abbreviation());
        }
        out.push('}');
        true
    }
}
