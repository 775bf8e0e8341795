use std::io::{BufWriter, Write};
use std::time::Instant;

use bytes::Bytes;
use pronounce_rs::{prosody, NotationRegistry};

const SAMPLE: &str = "\
; hello
_ 50
h 62 0 110
ɛ 80 50 120 100 105
l 70
o ʊ 160 0 100 100 85
_ 50
";

/// Usage: pho_convert [FILE.pho] [FROM] [TO]
///
/// Converts a PHO file between phoneme sets, writing to stdout. Without a
/// file a built-in sample is converted from `ipa` to `features`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = match args.first() {
        Some(path) => Bytes::from(std::fs::read(path)?),
        None => Bytes::from_static(SAMPLE.as_bytes()),
    };
    let from = args.get(1).map_or("ipa", String::as_str);
    let to = args.get(2).map_or("features", String::as_str);

    let registry = NotationRegistry::with_builtins();
    println!("; available phoneme sets: {:?}", registry.names());

    let mut reader = prosody::create_pho_reader(&registry, from)?;
    let mut writer = prosody::create_pho_writer(&registry, to)?;
    writer.reset(BufWriter::new(std::io::stdout().lock()));
    reader.reset(input);

    let start = Instant::now();
    let mut converted = 0;
    while reader.read()? {
        if writer.write(reader.record())? {
            converted += 1;
        } else {
            log::warn!(
                "Record {} cannot be written in {}",
                converted + 1,
                writer.name()
            );
        }
    }
    if let Some(mut output) = writer.into_inner() {
        output.flush()?;
    }

    eprintln!(
        "Converted {converted} records from {from} to {to} in {:.2?}",
        start.elapsed()
    );
    Ok(())
}
