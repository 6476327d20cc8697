//! Reconstructs the runtime address-space layout a PS-X EXE would get on
//! real hardware, so a binary-analysis host can disassemble and label the
//! program as if it were running. This crate parses the executable header,
//! derives the RAM/mirror/register-block map and places the entry symbols;
//! it contains no frontend code and performs no analysis of its own beyond a
//! one-instruction reference decode.

pub mod entry;
pub mod exe;
pub mod loader;
pub mod map;
pub mod mem;
pub mod mips;
pub mod scan;
pub mod space;

pub use binrw;
pub use loader::{LoadError, load};
