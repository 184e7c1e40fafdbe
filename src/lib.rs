#![allow(clippy::len_without_is_empty)]

/// Use mimalloc as the global allocator for the binary.
/// Faster than glibc malloc for the small per-chunk buffers the pipeline
/// hands from stage to stage.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod mpreg;
