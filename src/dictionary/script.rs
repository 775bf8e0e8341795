use std::fmt;

/// Writing system of a piece of text, identified by ISO 15924 code.
///
/// Only the scripts a pronunciation dictionary is likely to meet are
/// distinguished; everything else is [`Script::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Script {
    #[default]
    Unknown,
    Common,
    Inherited,
    Latin,
    Greek,
    Cyrillic,
    Armenian,
    Hebrew,
    Arabic,
    Devanagari,
    Bengali,
    Thai,
    Georgian,
    Hangul,
    Hiragana,
    Katakana,
    Han,
}

const RANGES: &[(u32, u32, Script)] = &[
    (0x0041, 0x005A, Script::Latin),
    (0x0061, 0x007A, Script::Latin),
    (0x0000, 0x00A9, Script::Common),
    (0x00AA, 0x00AA, Script::Latin),
    (0x00BA, 0x00BA, Script::Latin),
    (0x00D7, 0x00D7, Script::Common),
    (0x00F7, 0x00F7, Script::Common),
    (0x00AB, 0x00BF, Script::Common),
    (0x00C0, 0x02B8, Script::Latin),
    (0x02B9, 0x02FF, Script::Common),
    (0x0300, 0x036F, Script::Inherited),
    (0x0370, 0x03FF, Script::Greek),
    (0x0400, 0x052F, Script::Cyrillic),
    (0x0531, 0x058F, Script::Armenian),
    (0x0591, 0x05FF, Script::Hebrew),
    (0x0600, 0x06FF, Script::Arabic),
    (0x0750, 0x077F, Script::Arabic),
    (0x0900, 0x097F, Script::Devanagari),
    (0x0980, 0x09FF, Script::Bengali),
    (0x0E00, 0x0E7F, Script::Thai),
    (0x10A0, 0x10FF, Script::Georgian),
    (0x1100, 0x11FF, Script::Hangul),
    (0x1D00, 0x1D7F, Script::Latin),
    (0x1E00, 0x1EFF, Script::Latin),
    (0x1F00, 0x1FFF, Script::Greek),
    (0x2000, 0x2BFF, Script::Common),
    (0x3000, 0x303F, Script::Common),
    (0x3040, 0x309F, Script::Hiragana),
    (0x30A0, 0x30FF, Script::Katakana),
    (0x3400, 0x4DBF, Script::Han),
    (0x4E00, 0x9FFF, Script::Han),
    (0xAC00, 0xD7AF, Script::Hangul),
    (0xFF21, 0xFF3A, Script::Latin),
    (0xFF41, 0xFF5A, Script::Latin),
];

impl Script {
    /// Script of a single character. Earlier ranges take precedence.
    pub fn of(ch: char) -> Script {
        let cp = ch as u32;
        RANGES
            .iter()
            .find(|&&(first, last, _)| (first..=last).contains(&cp))
            .map(|&(_, _, script)| script)
            .unwrap_or(Script::Unknown)
    }

    /// Script of the first character of `text`, or `Unknown` for empty text.
    pub fn of_text(text: &str) -> Script {
        text.chars().next().map(Script::of).unwrap_or_default()
    }

    /// ISO 15924 code.
    pub fn code(self) -> &'static str {
        match self {
            Script::Unknown => "Zzzz",
            Script::Common => "Zyyy",
            Script::Inherited => "Zinh",
            Script::Latin => "Latn",
            Script::Greek => "Grek",
            Script::Cyrillic => "Cyrl",
            Script::Armenian => "Armn",
            Script::Hebrew => "Hebr",
            Script::Arabic => "Arab",
            Script::Devanagari => "Deva",
            Script::Bengali => "Beng",
            Script::Thai => "Thai",
            Script::Georgian => "Geor",
            Script::Hangul => "Hang",
            Script::Hiragana => "Hira",
            Script::Katakana => "Kana",
            Script::Han => "Hani",
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
