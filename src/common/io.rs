use std::fs::File;
use std::io::{self, Read, Write};
#[cfg(unix)]
use std::mem::ManuallyDrop;
#[cfg(unix)]
use std::os::unix::io::FromRawFd;
use std::path::{Path, PathBuf};

/// Chunk size used when the page size cannot be determined.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Largest chunk size accepted; larger requests are clamped to this.
pub const MAX_CHUNK_SIZE: usize = 1 << 26;

/// Where bytes come from or go to: a standard stream (`-`) or a named file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Std,
    Path(PathBuf),
}

impl Endpoint {
    /// `-` selects the standard stream, anything else is a path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Endpoint::Std
        } else {
            Endpoint::Path(PathBuf::from(arg))
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Endpoint::Std => None,
            Endpoint::Path(p) => Some(p),
        }
    }

    /// Name used in diagnostics for this endpoint when used as input.
    pub fn input_name(&self) -> String {
        match self {
            Endpoint::Std => "standard input".to_string(),
            Endpoint::Path(p) => p.display().to_string(),
        }
    }

    /// Name used in diagnostics for this endpoint when used as output.
    pub fn output_name(&self) -> String {
        match self {
            Endpoint::Std => "standard output".to_string(),
            Endpoint::Path(p) => p.display().to_string(),
        }
    }
}

/// Byte source: standard input or an open file.
///
/// On Unix stdin is read through the raw fd, skipping the 8KB BufReader
/// inside `StdinLock`; the pipeline does its own chunking.
pub enum Source {
    #[cfg(unix)]
    Stdin(ManuallyDrop<File>),
    #[cfg(not(unix))]
    Stdin(io::StdinLock<'static>),
    File(File),
}

impl Source {
    pub fn open(endpoint: &Endpoint) -> io::Result<Self> {
        match endpoint {
            #[cfg(unix)]
            Endpoint::Std => Ok(Source::Stdin(unsafe {
                ManuallyDrop::new(File::from_raw_fd(0))
            })),
            #[cfg(not(unix))]
            Endpoint::Std => Ok(Source::Stdin(io::stdin().lock())),
            Endpoint::Path(p) => Ok(Source::File(File::open(p)?)),
        }
    }
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Source::Stdin(f) => (&**f).read(buf),
            #[cfg(not(unix))]
            Source::Stdin(s) => s.read(buf),
            Source::File(f) => f.read(buf),
        }
    }
}

/// Byte sink: standard output or a created/truncated file.
pub enum Sink {
    #[cfg(unix)]
    Stdout(ManuallyDrop<File>),
    #[cfg(not(unix))]
    Stdout(io::StdoutLock<'static>),
    File(File),
}

impl Sink {
    pub fn create(endpoint: &Endpoint) -> io::Result<Self> {
        match endpoint {
            #[cfg(unix)]
            Endpoint::Std => Ok(Sink::Stdout(unsafe {
                ManuallyDrop::new(File::from_raw_fd(1))
            })),
            #[cfg(not(unix))]
            Endpoint::Std => Ok(Sink::Stdout(io::stdout().lock())),
            Endpoint::Path(p) => Ok(Sink::File(File::create(p)?)),
        }
    }

    /// Push written data for a file sink down to the device.
    /// Standard output may be a pipe or tty, so it is left alone.
    pub fn sync_data(&self) -> io::Result<()> {
        match self {
            Sink::Stdout(_) => Ok(()),
            Sink::File(f) => f.sync_data(),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Sink::Stdout(f) => (&**f).write(buf),
            #[cfg(not(unix))]
            Sink::Stdout(s) => s.write(buf),
            Sink::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Sink::Stdout(f) => (&**f).flush(),
            #[cfg(not(unix))]
            Sink::Stdout(s) => s.flush(),
            Sink::File(f) => f.flush(),
        }
    }
}

/// Preferred I/O chunk size: the OS page size, or 4096 when unknown.
pub fn preferred_chunk_size() -> usize {
    #[cfg(unix)]
    {
        let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page > 0 {
            return (page as usize).min(MAX_CHUNK_SIZE);
        }
    }
    DEFAULT_CHUNK_SIZE
}

/// True when both paths name the same existing file.
/// A path that does not exist yet can't alias anything.
#[cfg(unix)]
pub fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

/// Read as many bytes as possible into buf, retrying on partial reads.
/// Only returns short at EOF, so every chunk but the last is full.
/// Fast path: regular file reads usually return the full buffer on the first call.
#[inline]
pub fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
