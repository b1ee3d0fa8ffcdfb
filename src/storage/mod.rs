//! Storage layer for claude-migrate
//!
//! Low-level file primitives shared by the engine: atomic writes, required
//! JSON reads, and metadata helpers. Everything the engine writes goes
//! through these so a crash never leaves a half-written file behind.

pub mod file_io;

pub use file_io::{
    modified_time, read_bytes, read_json_required, remove_file_if_exists, write_atomic,
    write_json_atomic,
};
