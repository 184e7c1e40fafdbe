mod core;
mod error;
mod reader;
mod symbols;


pub use self::core::{
    ChunkWriter, Config, FLUSH_EVERY, Mode, Rechunk, Stats, Substitute, is_dash, run, transform,
};
pub use self::error::{
    EXIT_ACCESS_DENIED, EXIT_ENCODING_ERROR, EXIT_FILE_NOT_FOUND, EXIT_READ_ERROR,
    EXIT_WRITE_ERROR, MpregError,
};
pub use self::reader::CharReader;
pub use self::symbols::{
    DIVERSITY_POOL, Diversity, SymbolSource, Symbols, VANILLA_SYMBOL, Vanilla,
};
