use std::io::{self, Read, Write};
use std::path::Path;

use super::alphabet::{self, Alphabet};
use super::error::CodecError;
use super::wrap::LineWrapper;
use super::{base64, base85, base91, base122};
use crate::common::io::{open_noatime, read_full};

/// Default line width for encoded output.
pub const DEFAULT_WRAP: usize = 76;

/// Bytes pulled from the input per engine call. Bounds the working set.
const STREAM_CHUNK: usize = 64 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Base64,
    Base85,
    Base91,
    Base122,
}

impl Scheme {
    /// Scheme implied by an invocation name ending in 64, 85, 91 or 122.
    /// Anything else selects base91.
    pub fn from_program_name(name: &str) -> Scheme {
        if name.ends_with("122") {
            Scheme::Base122
        } else if name.ends_with("64") {
            Scheme::Base64
        } else if name.ends_with("85") {
            Scheme::Base85
        } else {
            Scheme::Base91
        }
    }

    pub fn alphabet(self) -> &'static Alphabet {
        match self {
            Scheme::Base64 => &alphabet::BASE64,
            Scheme::Base85 => &alphabet::BASE85,
            Scheme::Base91 => &alphabet::BASE91,
            Scheme::Base122 => &alphabet::BASE122,
        }
    }

    pub fn radix(self) -> usize {
        self.alphabet().radix()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

/// Per-run settings, built once by the caller and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub scheme: Scheme,
    pub mode: Mode,
    /// Columns per encoded line; 0 disables wrapping.
    pub wrap: usize,
    /// When decoding, skip bytes outside the alphabet instead of failing.
    pub ignore_garbage: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheme: Scheme::Base91,
            mode: Mode::Encode,
            wrap: DEFAULT_WRAP,
            ignore_garbage: false,
        }
    }
}

/// Whether a decoder wants more input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Logical end of data reached; the rest of the input is not consumed.
    Stop,
}

/// Encoder state for one input stream.
pub trait StreamEncoder {
    fn encode_chunk<W: Write>(
        &mut self,
        chunk: &[u8],
        out: &mut LineWrapper<W>,
    ) -> io::Result<()>;

    /// Flush the partial group held in the accumulator.
    fn finish<W: Write>(&mut self, out: &mut LineWrapper<W>) -> io::Result<()>;
}

/// Decoder state for one input stream. Decoded bytes are appended to `out`.
pub trait StreamDecoder {
    fn decode_chunk(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<Flow, CodecError>;

    fn finish(&mut self, out: &mut Vec<u8>);
}

/// Encode everything `reader` yields and write the text to `writer`.
pub fn encode_stream(
    reader: &mut impl Read,
    scheme: Scheme,
    wrap: usize,
    writer: &mut impl Write,
) -> io::Result<()> {
    match scheme {
        Scheme::Base64 => run_encoder(base64::Encoder::default(), reader, wrap, writer),
        Scheme::Base85 => run_encoder(base85::Encoder::default(), reader, wrap, writer),
        Scheme::Base91 => run_encoder(base91::Encoder::default(), reader, wrap, writer),
        Scheme::Base122 => run_encoder(base122::Encoder::default(), reader, wrap, writer),
    }
}

/// Decode everything `reader` yields and write the bytes to `writer`.
/// Bytes decoded before an invalid character are written before the error
/// is returned.
pub fn decode_stream(
    reader: &mut impl Read,
    scheme: Scheme,
    ignore_garbage: bool,
    writer: &mut impl Write,
) -> Result<(), CodecError> {
    match scheme {
        Scheme::Base64 => run_decoder(base64::Decoder::new(ignore_garbage), reader, writer),
        Scheme::Base85 => run_decoder(base85::Decoder::new(ignore_garbage), reader, writer),
        Scheme::Base91 => run_decoder(base91::Decoder::new(ignore_garbage), reader, writer),
        Scheme::Base122 => run_decoder(base122::Decoder::new(ignore_garbage), reader, writer),
    }
}

fn run_encoder<E: StreamEncoder>(
    mut encoder: E,
    reader: &mut impl Read,
    wrap: usize,
    writer: &mut impl Write,
) -> io::Result<()> {
    let mut buf = vec![0u8; STREAM_CHUNK];
    let mut out = LineWrapper::new(writer, wrap);
    let mut consumed = 0u64;

    loop {
        let n = read_full(reader, &mut buf)?;
        if n == 0 {
            break;
        }
        consumed += n as u64;
        encoder.encode_chunk(&buf[..n], &mut out)?;
    }

    encoder.finish(&mut out)?;
    out.finish()?;
    log::trace!("encoded {} input bytes", consumed);
    Ok(())
}

fn run_decoder<D: StreamDecoder>(
    mut decoder: D,
    reader: &mut impl Read,
    writer: &mut impl Write,
) -> Result<(), CodecError> {
    let mut buf = vec![0u8; STREAM_CHUNK];
    let mut decoded = Vec::with_capacity(STREAM_CHUNK);

    loop {
        let n = read_full(reader, &mut buf)?;
        if n == 0 {
            break;
        }
        let flow = decoder.decode_chunk(&buf[..n], &mut decoded);
        writer.write_all(&decoded)?;
        decoded.clear();
        if flow? == Flow::Stop {
            log::trace!("end of data marker seen, ignoring rest of input");
            break;
        }
    }

    decoder.finish(&mut decoded);
    writer.write_all(&decoded)?;
    Ok(())
}

/// Run one input stream through the configured transform.
pub fn process(
    reader: &mut impl Read,
    config: &Config,
    writer: &mut impl Write,
) -> Result<(), CodecError> {
    match config.mode {
        Mode::Encode => Ok(encode_stream(reader, config.scheme, config.wrap, writer)?),
        Mode::Decode => decode_stream(reader, config.scheme, config.ignore_garbage, writer),
    }
}

/// Process a named input: `-` is standard input, anything else a file path.
pub fn process_input(
    name: &str,
    config: &Config,
    writer: &mut impl Write,
) -> Result<(), CodecError> {
    log::debug!(
        "{:?} base{} input '{}'",
        config.mode,
        config.scheme.radix(),
        name
    );

    if name == "-" {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        return process(&mut reader, config, writer);
    }

    let mut file = open_noatime(Path::new(name)).map_err(|source| CodecError::FileOpen {
        path: name.to_string(),
        source,
    })?;
    process(&mut file, config, writer)
}

/// Process inputs one after another into the same writer, each with fresh
/// engine state. No inputs means standard input. The first error aborts the
/// remaining inputs.
pub fn process_inputs<S: AsRef<str>>(
    names: &[S],
    config: &Config,
    writer: &mut impl Write,
) -> Result<(), CodecError> {
    if names.is_empty() {
        return process_input("-", config, writer);
    }
    for name in names {
        process_input(name.as_ref(), config, writer)?;
    }
    Ok(())
}
