use std::io::{Read, Write};

use rand::Rng;

use super::error::MpregError;
use super::reader::CharReader;
use super::symbols::{Diversity, SymbolSource, Symbols, Vanilla};
use crate::common::io::{Endpoint, MAX_CHUNK_SIZE, Sink, Source, same_file};

/// Flush the sink after this many chunks, and once more at the end.
pub const FLUSH_EVERY: u64 = 256;

/// EM DASH, TWO-EM DASH, THREE-EM DASH.
#[inline]
pub fn is_dash(c: char) -> bool {
    matches!(c, '\u{2014}' | '\u{2E3A}' | '\u{2E3B}')
}

/// Which symbol source to substitute from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Reshuffled pool of pregnant emoji.
    Diversity,
    /// One fixed token for every dash.
    Vanilla(String),
}

/// Resolved settings for one run.
#[derive(Clone, Debug)]
pub struct Config {
    pub input: Endpoint,
    pub output: Endpoint,
    pub mode: Mode,
    pub chunk_size: usize,
}

/// Counters gathered over one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub chars_read: u64,
    pub replaced: u64,
    pub bytes_written: u64,
    pub chunks_written: u64,
}

/// Replaces every dash with the next token from `symbols`.
///
/// A token is spliced in whole before the next input char is pulled, and the
/// source is advanced only for dashes. Errors from upstream pass through.
pub struct Substitute<I, S> {
    inner: I,
    symbols: S,
    pending: String,
    pending_pos: usize,
    replaced: u64,
}

impl<I, S> Substitute<I, S> {
    pub fn new(inner: I, symbols: S) -> Self {
        Substitute {
            inner,
            symbols,
            pending: String::new(),
            pending_pos: 0,
            replaced: 0,
        }
    }

    /// Dashes replaced so far.
    pub fn replaced(&self) -> u64 {
        self.replaced
    }

    pub fn get_ref(&self) -> &I {
        &self.inner
    }
}

impl<I, S, E> Iterator for Substitute<I, S>
where
    I: Iterator<Item = Result<char, E>>,
    S: SymbolSource,
{
    type Item = Result<char, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(c) = self.pending[self.pending_pos..].chars().next() {
                self.pending_pos += c.len_utf8();
                return Some(Ok(c));
            }
            match self.inner.next()? {
                Ok(c) if is_dash(c) => {
                    self.replaced += 1;
                    self.pending.clear();
                    self.pending.push_str(self.symbols.next_symbol());
                    self.pending_pos = 0;
                }
                other => return Some(other),
            }
        }
    }
}

/// Packs chars into UTF-8 buffers of at least `chunk_size` bytes.
///
/// A buffer is handed out as soon as it reaches the threshold, so it
/// overshoots by at most 3 bytes. The trailing partial buffer is yielded at
/// end of input unless it is empty.
pub struct Rechunk<I> {
    inner: I,
    buf: Vec<u8>,
    chunk_size: usize,
    done: bool,
}

impl<I> Rechunk<I> {
    pub fn new(inner: I, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        Rechunk {
            inner,
            buf: Vec::with_capacity(chunk_size + 3),
            chunk_size,
            done: false,
        }
    }

    pub fn get_ref(&self) -> &I {
        &self.inner
    }
}

impl<I, E> Iterator for Rechunk<I>
where
    I: Iterator<Item = Result<char, E>>,
{
    type Item = Result<Vec<u8>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.inner.next() {
                Some(Ok(c)) => {
                    let mut utf8 = [0u8; 4];
                    self.buf
                        .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                    if self.buf.len() >= self.chunk_size {
                        let fresh = Vec::with_capacity(self.chunk_size + 3);
                        return Some(Ok(std::mem::replace(&mut self.buf, fresh)));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    self.buf.clear();
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if self.buf.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.buf)));
                }
            }
        }
    }
}

/// Writes whole chunks to the sink, flushing every `flush_every` chunks
/// and once after the last one.
///
/// Flushing drains buffering inside the sink only. `run` syncs a file sink
/// to the device once the stream is complete.
pub struct ChunkWriter<W> {
    inner: W,
    name: String,
    flush_every: u64,
    chunks: u64,
    bytes: u64,
}

impl<W: Write> ChunkWriter<W> {
    pub fn new(inner: W, name: impl Into<String>) -> Self {
        Self::with_flush_every(inner, name, FLUSH_EVERY)
    }

    pub fn with_flush_every(inner: W, name: impl Into<String>, flush_every: u64) -> Self {
        ChunkWriter {
            inner,
            name: name.into(),
            flush_every: flush_every.max(1),
            chunks: 0,
            bytes: 0,
        }
    }

    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), MpregError> {
        self.inner
            .write_all(chunk)
            .map_err(|e| MpregError::from_write(&self.name, e))?;
        self.chunks += 1;
        self.bytes += chunk.len() as u64;
        if self.chunks % self.flush_every == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), MpregError> {
        self.inner
            .flush()
            .map_err(|e| MpregError::from_write(&self.name, e))
    }

    /// Write every chunk in order, then flush. Stops at the first error.
    pub fn drain<I>(&mut self, chunks: I) -> Result<(), MpregError>
    where
        I: IntoIterator<Item = Result<Vec<u8>, MpregError>>,
    {
        for chunk in chunks {
            self.write_chunk(&chunk?)?;
        }
        self.flush()
    }

    pub fn chunks_written(&self) -> u64 {
        self.chunks
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Run the whole pipeline over already-open streams.
pub fn transform<R, S, W>(
    input: CharReader<R>,
    symbols: S,
    writer: &mut ChunkWriter<W>,
    chunk_size: usize,
) -> Result<Stats, MpregError>
where
    R: Read,
    S: SymbolSource,
    W: Write,
{
    let mut chunks = Rechunk::new(Substitute::new(input, symbols), chunk_size);
    writer.drain(&mut chunks)?;

    let substitute = chunks.get_ref();
    Ok(Stats {
        chars_read: substitute.get_ref().chars_read(),
        replaced: substitute.replaced(),
        bytes_written: writer.bytes_written(),
        chunks_written: writer.chunks_written(),
    })
}

/// Open the configured endpoints and run one pipeline to completion.
///
/// The input is opened first, so a missing input never creates or
/// truncates the output file.
pub fn run<G: Rng>(config: &Config, rng: G) -> Result<Stats, MpregError> {
    let in_name = config.input.input_name();
    let out_name = config.output.output_name();

    let source = Source::open(&config.input).map_err(|e| MpregError::from_read(&in_name, 0, e))?;

    if let (Some(a), Some(b)) = (config.input.path(), config.output.path())
        && same_file(a, b)
    {
        return Err(MpregError::from_write(
            &out_name,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "input file is output file",
            ),
        ));
    }

    let sink = Sink::create(&config.output).map_err(|e| MpregError::from_write(&out_name, e))?;

    let symbols = match &config.mode {
        Mode::Vanilla(token) => Symbols::Vanilla(Vanilla::new(token.as_str())),
        Mode::Diversity => Symbols::Diversity(Diversity::with_default_pool(rng)),
    };

    let reader = CharReader::new(source, in_name, config.chunk_size);
    let mut writer = ChunkWriter::new(sink, out_name.as_str());
    let stats = transform(reader, symbols, &mut writer, config.chunk_size)?;
    writer
        .into_inner()
        .sync_data()
        .map_err(|e| MpregError::from_write(&out_name, e))?;
    Ok(stats)
}
