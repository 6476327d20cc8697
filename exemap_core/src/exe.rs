//! Items related to the PS-X EXE executable format.

use crate::mem::Address;
use binrw::{BinRead, io::Cursor};
use easyerr::{Error, ResultExt};
use std::ffi::{CStr, CString};

/// Size of the on-disk header. The program bytes start right after it.
pub const HEADER_SIZE: u32 = 0x800;

/// Header of a PS-X EXE. Little-endian, padded to exactly [`HEADER_SIZE`]
/// bytes on disk.
///
/// The 8-byte magic at offset 0 is the load eligibility gate: if it does not
/// match, parsing stops before any other field is read. No further
/// validation is performed, since out-of-range or zero values are legal
/// (a zero address means the section is absent).
#[derive(Debug, Clone, BinRead)]
#[br(little, magic = b"PS-X EXE")]
pub struct Header {
    #[br(pad_before = 8)]
    pub initial_pc: Address,
    pub initial_gp: u32,

    pub load_address: Address,
    pub code_size: u32,

    pub data_address: Address,
    pub data_size: u32,

    pub bss_address: Address,
    pub bss_size: u32,

    pub stack_base: u32,
    pub stack_offset: u32,

    /// ASCII region marker text, e.g. "Sony Computer Entertainment Inc.".
    /// A marker area with no terminating NUL reads as empty.
    #[br(pad_before = 20, count = 0x7B4, map = |x: Vec<u8>| CStr::from_bytes_until_nul(&x).map(|x| x.to_owned()).unwrap_or_default())]
    pub marker: CString,
}

impl Header {
    /// The default stack pointer: stack base plus stack offset.
    pub fn stack_pointer(&self) -> u32 {
        self.stack_base.wrapping_add(self.stack_offset)
    }

    /// One past the last address of the code section.
    pub fn code_end(&self) -> Address {
        self.load_address + self.code_size
    }
}

/// A PS-X EXE: the header plus the program bytes that follow it.
#[derive(Debug, Clone)]
pub struct Executable {
    pub header: Header,
    pub program: Vec<u8>,
}

impl Executable {
    /// Parses an executable image. Only the header fails closed (magic
    /// mismatch or truncation): a program stream shorter than the declared
    /// code size is read short, and the missing bytes zero-fill downstream.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(bytes);
        let header = Header::read(&mut cursor).context(ParseCtx::Format)?;

        let start = cursor.position() as usize;
        let end = start
            .saturating_add(header.code_size as usize)
            .min(bytes.len());
        let program = bytes[start..end].to_vec();
        Ok(Self { header, program })
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("not a PS-X EXE image")]
    Format { source: binrw::Error },
}
