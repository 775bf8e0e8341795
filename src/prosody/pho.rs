//! MBROLA PHO files.
//!
//! ```text
//! ; phoneme duration [offset pitch]...
//! _ 50
//! h 62 0 110
//! ɛ 80 50 120 100 105
//! l 70
//! oʊ 160 0 100 100 85
//! ```
//!
//! One record per line. A second phoneme may directly follow the first, or
//! follow it after a space. The writer puts the notation's separator between
//! them, so table notations write `N G 100` rather than `NG 100`. `;` starts
//! a comment and blank lines are ignored.

use std::io::Write;
use std::ops::Deref;
use std::sync::Arc;

use bytes::Bytes;

use super::{parse_number, EnvelopePoint, Hertz, Milliseconds, ProsodyRecord, MAX_ENVELOPE_OFFSET};
use crate::notation::Notation;
use crate::phoneme::packed::{DIACRITICS, LENGTH, MAIN};
use crate::phoneme::{PackedPhoneme, Phoneme};
use crate::PhoneticError;

/// Fields of a phoneme written to PHO files. Stress is carried by the pitch
/// envelope instead.
const WRITTEN_FIELDS: u64 = MAIN | DIACRITICS | LENGTH;

fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn ends_line(b: u8) -> bool {
    matches!(b, b'\r' | b'\n' | b';')
}

fn starts_number(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.'
}

pub struct PhoReader {
    notation: Arc<dyn Notation>,
    buffer: Bytes,
    pos: usize,
    record: ProsodyRecord,
    failed: Option<String>,
}

impl PhoReader {
    /// A reader parsing phonemes with `notation`.
    pub fn new(notation: Arc<dyn Notation>) -> Self {
        Self {
            notation,
            buffer: Bytes::new(),
            pos: 0,
            record: ProsodyRecord::default(),
            failed: None,
        }
    }

    pub fn reset(&mut self, buffer: Bytes) {
        self.buffer = buffer;
        self.pos = 0;
        self.record = ProsodyRecord::default();
        self.failed = None;
    }

    /// Read the next record.
    ///
    /// Returns `Ok(false)` once the input is exhausted. After an error the
    /// reader keeps failing until [`PhoReader::reset`].
    pub fn read(&mut self) -> Result<bool, PhoneticError> {
        if let Some(msg) = &self.failed {
            return Err(PhoneticError::Format(msg.clone()));
        }
        if !self.skip_blank_lines() {
            return Ok(false);
        }
        match self.parse_record() {
            Ok(record) => {
                self.record = record;
                Ok(true)
            }
            Err(e) => {
                let detail = match e {
                    PhoneticError::Format(detail) => detail,
                    other => other.to_string(),
                };
                let msg = format!("{detail} (line {})", self.line_number());
                self.failed = Some(msg.clone());
                Err(PhoneticError::Format(msg))
            }
        }
    }

    /// Read all remaining records.
    pub fn read_all(&mut self) -> Result<Vec<ProsodyRecord>, PhoneticError> {
        let mut records = Vec::new();
        while self.read()? {
            records.push(self.record.clone());
        }
        Ok(records)
    }

    pub fn record(&self) -> &ProsodyRecord {
        &self.record
    }

    pub fn name(&self) -> &str {
        self.notation.name()
    }

    /// Skip comments and blank lines. Returns false at the end of the input.
    fn skip_blank_lines(&mut self) -> bool {
        while let Some(&b) = self.buffer.get(self.pos) {
            match b {
                b';' => {
                    while self.peek().is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                b'\r' | b'\n' => self.pos += 1,
                b if is_space(b) => self.pos += 1,
                _ => return true,
            }
        }
        false
    }

    fn peek(&self) -> Option<u8> {
        self.buffer.get(self.pos).copied()
    }

    /// True if only spaces remain before the end of the line.
    fn at_line_end(&self) -> bool {
        self.buffer[self.pos..]
            .iter()
            .find(|&&b| !is_space(b))
            .map_or(true, |&b| ends_line(b))
    }

    fn line_number(&self) -> usize {
        let end = self.pos.min(self.buffer.len());
        1 + self.buffer[..end].iter().filter(|&&b| b == b'\n').count()
    }

    fn parse_phoneme(&mut self) -> Result<PackedPhoneme, PhoneticError> {
        let at = self.pos;
        match self.notation.parse(&self.buffer, &mut self.pos)? {
            Some(phoneme) => Ok(PackedPhoneme::from(&phoneme)),
            None => Err(PhoneticError::format(format!(
                "expected a {} phoneme at byte {at}",
                self.notation.name()
            ))),
        }
    }

    fn expect_space(&mut self, what: &str) -> Result<(), PhoneticError> {
        match self.peek() {
            Some(b) if is_space(b) => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(PhoneticError::format(format!(
                "expected whitespace after the {what}"
            ))),
        }
    }

    fn parse_record(&mut self) -> Result<ProsodyRecord, PhoneticError> {
        let phoneme1 = self.parse_phoneme()?;
        let mut phoneme2 = match self.peek() {
            Some(b) if !is_space(b) && !ends_line(b) => Some(self.parse_phoneme()?),
            _ => None,
        };
        self.expect_space("phoneme")?;

        if phoneme2.is_none() && self.peek().is_some_and(|b| !starts_number(b)) {
            phoneme2 = Some(self.parse_phoneme()?);
            self.expect_space("phoneme")?;
        }

        let duration = Milliseconds(parse_number(&self.buffer, &mut self.pos));

        let mut envelope = Vec::new();
        while self.peek().is_some_and(is_space) && !self.at_line_end() {
            self.pos += 1;
            let offset = parse_number(&self.buffer, &mut self.pos);
            self.expect_space("offset")?;
            let pitch = parse_number(&self.buffer, &mut self.pos);
            if offset > f32::from(MAX_ENVELOPE_OFFSET) {
                return Err(PhoneticError::format(format!(
                    "envelope offset {offset} is more than {MAX_ENVELOPE_OFFSET}%"
                )));
            }
            envelope.push(EnvelopePoint {
                offset: offset as u8,
                pitch: Hertz(pitch),
            });
        }

        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
        match self.peek() {
            None => {}
            Some(b) if ends_line(b) => {}
            Some(b) => {
                return Err(PhoneticError::format(format!(
                    "unexpected '{}' after the pitch envelope",
                    char::from(b).escape_default()
                )))
            }
        }

        Ok(ProsodyRecord {
            phoneme1,
            phoneme2,
            duration,
            envelope,
        })
    }
}

impl Deref for PhoReader {
    type Target = ProsodyRecord;

    fn deref(&self) -> &ProsodyRecord {
        &self.record
    }
}

pub struct PhoWriter<W> {
    notation: Arc<dyn Notation>,
    output: Option<W>,
    line: String,
}

impl<W: Write> PhoWriter<W> {
    /// A writer formatting phonemes with `notation`.
    pub fn new(notation: Arc<dyn Notation>) -> Self {
        Self {
            notation,
            output: None,
            line: String::new(),
        }
    }

    /// Bind a new output sink, returning the previous one.
    pub fn reset(&mut self, output: W) -> Option<W> {
        self.output.replace(output)
    }

    /// Write one record as a line.
    ///
    /// Returns `Ok(false)`, writing nothing, when no sink is bound or a
    /// phoneme cannot be written in the notation.
    pub fn write(&mut self, record: &ProsodyRecord) -> Result<bool, PhoneticError> {
        let Some(output) = self.output.as_mut() else {
            return Ok(false);
        };

        self.line.clear();
        let phonemes = std::iter::once(record.phoneme1).chain(record.phoneme2);
        for (i, packed) in phonemes.enumerate() {
            let Ok(phoneme) = Phoneme::try_from(packed.masked(WRITTEN_FIELDS)) else {
                return Ok(false);
            };
            if i > 0 {
                self.line.push_str(self.notation.separator());
            }
            if !self.notation.format(&phoneme, &mut self.line) {
                return Ok(false);
            }
        }

        use std::fmt::Write as _;
        // Writing into a String cannot fail.
        let _ = write!(self.line, " {}", record.duration.0);
        for point in &record.envelope {
            let _ = write!(self.line, " {} {}", point.offset, point.pitch.0);
        }
        self.line.push('\n');

        output.write_all(self.line.as_bytes())?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{create_notation, IpaNotation};
    use crate::phoneme::Feature::*;

    fn reader(text: &str) -> PhoReader {
        let mut reader = PhoReader::new(Arc::new(IpaNotation));
        reader.reset(Bytes::copy_from_slice(text.as_bytes()));
        reader
    }

    fn write(records: &[ProsodyRecord]) -> String {
        let mut writer = PhoWriter::<Vec<u8>>::new(Arc::new(IpaNotation));
        writer.reset(Vec::new());
        for record in records {
            assert!(writer.write(record).unwrap());
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    fn packed(features: &[crate::phoneme::Feature]) -> PackedPhoneme {
        PackedPhoneme::from(&Phoneme::new(features).unwrap())
    }

    #[test]
    fn reads_record_with_envelope() {
        let mut pho = reader("p a 120.5 0 100.0 50 120.0 100 90.0\n");
        assert!(pho.read().unwrap());
        assert_eq!(pho.phoneme1, packed(&[Voiceless, Bilabial, Plosive]));
        assert_eq!(pho.phoneme2, Some(packed(&[Vowel, Low, Front, Unrounded])));
        assert_eq!(pho.duration, Milliseconds(120.5));
        assert_eq!(
            pho.envelope,
            vec![
                EnvelopePoint::new(0, 100.0),
                EnvelopePoint::new(50, 120.0),
                EnvelopePoint::new(100, 90.0),
            ]
        );
        assert!(!pho.read().unwrap());

        let written = write(&[pho.record().clone()]);
        assert_eq!(written, "pa 120.5 0 100 50 120 100 90\n");
        let mut again = reader(&written);
        assert!(again.read().unwrap());
        assert_eq!(again.record(), pho.record());
    }

    #[test]
    fn reads_adjacent_and_single_phonemes() {
        let mut pho = reader("tʃ 90\r\nə 40 50 110\n_ 200");
        let records = pho.read_all().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].phoneme2,
            Some(packed(&[Voiceless, PalatoAlveolar, Sibilant, Fricative]))
        );
        assert_eq!(records[1].phoneme2, None);
        assert_eq!(records[1].envelope, vec![EnvelopePoint::new(50, 110.0)]);
        assert_eq!(records[2].phoneme1, packed(&[SilentPause]));
        assert_eq!(records[2].duration, Milliseconds(200.0));
        assert!(records[2].envelope.is_empty());
    }

    #[test]
    fn comments_and_blank_lines_yield_nothing() {
        let mut pho = reader("; comment\n\n");
        assert!(!pho.read().unwrap());

        let mut pho = reader("; header\n\r\n  \na 10 ; trailing\n");
        assert_eq!(pho.read_all().unwrap().len(), 1);
    }

    #[test]
    fn missing_separators_are_format_errors() {
        let cases = [
            "a",
            "ab",
            "a b",
            "a 10 50",
            "a 10 50x100",
            "a 10 101 90",
            "a 10x",
            "# 10",
        ];
        for text in cases {
            let mut pho = reader(text);
            assert!(
                matches!(pho.read(), Err(PhoneticError::Format(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn failure_is_sticky_until_reset() {
        let mut pho = reader("a 10\nb\na 20\n");
        assert!(pho.read().unwrap());
        let err = pho.read().unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
        assert!(pho.read().is_err());

        pho.reset(Bytes::from_static(b"a 20\n"));
        assert!(pho.read().unwrap());
        assert_eq!(pho.duration, Milliseconds(20.0));
    }

    #[test]
    fn writer_masks_stress() {
        let record = ProsodyRecord {
            phoneme1: packed(&[Vowel, High, Front, Unrounded, PrimaryStress, Long]),
            phoneme2: None,
            duration: Milliseconds(80.0),
            envelope: vec![EnvelopePoint::new(0, 95.5)],
        };
        assert_eq!(write(&[record]), "iː 80 0 95.5\n");
    }

    #[test]
    fn writer_reports_unwritable_records() {
        let record = ProsodyRecord {
            phoneme1: packed(&[Voiceless, Bilabial, Click]),
            duration: Milliseconds(50.0),
            ..Default::default()
        };

        let mut unbound = PhoWriter::<Vec<u8>>::new(Arc::new(IpaNotation));
        assert!(!unbound.write(&record).unwrap());

        let mut arpabet = PhoWriter::<Vec<u8>>::new(create_notation("arpabet").unwrap());
        arpabet.reset(Vec::new());
        assert_eq!(arpabet.name(), "arpabet");
        assert!(!arpabet.write(&record).unwrap());
        assert_eq!(arpabet.get_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn converts_between_notations() {
        let mut pho = PhoReader::new(create_notation("arpabet").unwrap());
        pho.reset(Bytes::from_static(b"SH 100 0 120\nIY 150\n"));
        let mut writer = PhoWriter::<Vec<u8>>::new(create_notation("ipa").unwrap());
        writer.reset(Vec::new());
        while pho.read().unwrap() {
            assert!(writer.write(pho.record()).unwrap());
        }
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text, "ʃ 100 0 120\ni 150\n");
    }

    #[test]
    fn table_phoneme_pairs_round_trip() {
        let arpabet = create_notation("arpabet").unwrap();
        let mut pho = PhoReader::new(arpabet.clone());
        let mut writer = PhoWriter::<Vec<u8>>::new(arpabet);

        for text in ["N G 100\n", "T HH 100 0 120\n", "NG 100\n"] {
            pho.reset(Bytes::from_static(text.as_bytes()));
            let records = pho.read_all().unwrap();
            assert_eq!(records.len(), 1);

            writer.reset(Vec::new());
            assert!(writer.write(&records[0]).unwrap());
            let written = writer.get_ref().cloned().unwrap();
            assert_eq!(written, text.as_bytes());

            pho.reset(Bytes::from(written));
            assert_eq!(pho.read_all().unwrap(), records);
        }
    }

    #[test]
    fn ejective_fricatives_are_written_as_plosives() {
        let mut pho = reader("sʼ 80\n");
        let records = pho.read_all().unwrap();
        assert_eq!(
            records[0].phoneme1,
            packed(&[Voiceless, Alveolar, Ejective])
        );
        assert_eq!(write(&records), "tʼ 80\n");
    }
}
