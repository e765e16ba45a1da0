use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use chacharng::ChaCha20Rng;

use crate::config::{OutputFormat, Width};

/// Values drawn from a generator, kept in their drawn width.
#[derive(Debug, PartialEq, Eq)]
pub enum Draws {
    U32(Vec<u32>),
    U64(Vec<u64>),
    Bytes(Vec<u8>),
}

impl Draws {
    /// Draws `count` values of `width` from `rng`.
    pub fn collect(rng: &mut ChaCha20Rng, width: Width, count: usize) -> Self {
        match width {
            Width::U32 => Draws::U32((0..count).map(|_| rng.next_u32()).collect()),
            Width::U64 => Draws::U64((0..count).map(|_| rng.next_u64()).collect()),
            Width::Bytes => {
                let mut buf = vec![0u8; count];
                rng.fill_bytes(&mut buf);
                Draws::Bytes(buf)
            }
        }
    }

    /// Little-endian serialization, identical to the keystream bytes consumed.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Draws::U32(words) => words.iter().flat_map(|w| w.to_le_bytes()).collect(),
            Draws::U64(words) => words.iter().flat_map(|w| w.to_le_bytes()).collect(),
            Draws::Bytes(bytes) => bytes.clone(),
        }
    }
}

/// Writes the drawn values to stdout or a file in the specified format.
pub fn write_output(draws: &Draws, format: OutputFormat, output_file: Option<&Path>) -> io::Result<()> {
    match output_file {
        Some(path) => {
            let f = File::create(path)?;
            let mut out = BufWriter::new(f);
            format_output(draws, format, &mut out)?;
            out.flush()
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            format_output(draws, format, &mut out)?;
            out.flush()
        }
    }
}

fn format_output(draws: &Draws, format: OutputFormat, out: &mut dyn Write) -> io::Result<()> {
    match (format, draws) {
        (OutputFormat::Decimal, Draws::U32(words)) => {
            for w in words {
                writeln!(out, "{}", w)?;
            }
        }
        (OutputFormat::Decimal, Draws::U64(words)) => {
            for w in words {
                writeln!(out, "{}", w)?;
            }
        }
        (OutputFormat::Decimal, Draws::Bytes(bytes)) => {
            let parts: Vec<String> = bytes.iter().map(|b| b.to_string()).collect();
            writeln!(out, "{}", parts.join(" "))?;
        }
        (OutputFormat::Hex, Draws::U32(words)) => {
            for w in words {
                writeln!(out, "{:08x}", w)?;
            }
        }
        (OutputFormat::HexUpper, Draws::U32(words)) => {
            for w in words {
                writeln!(out, "{:08X}", w)?;
            }
        }
        (OutputFormat::Hex, Draws::U64(words)) => {
            for w in words {
                writeln!(out, "{:016x}", w)?;
            }
        }
        (OutputFormat::HexUpper, Draws::U64(words)) => {
            for w in words {
                writeln!(out, "{:016X}", w)?;
            }
        }
        (OutputFormat::Hex, Draws::Bytes(bytes)) => {
            writeln!(out, "{}", hex::encode(bytes))?;
        }
        (OutputFormat::HexUpper, Draws::Bytes(bytes)) => {
            writeln!(out, "{}", hex::encode_upper(bytes))?;
        }
        (OutputFormat::Base64, _) => {
            writeln!(out, "{}", STANDARD.encode(draws.to_le_bytes()))?;
        }
        (OutputFormat::Base64url, _) => {
            writeln!(out, "{}", URL_SAFE_NO_PAD.encode(draws.to_le_bytes()))?;
        }
        (OutputFormat::Raw, _) => {
            out.write_all(&draws.to_le_bytes())?;
        }
    }
    Ok(())
}
