//! Addresses, segments and region permissions of the target address space.

pub mod io;

use binrw::BinRead;

/// Size of the physical RAM. Fixed by the hardware, not by anything the
/// executable header declares.
pub const RAM_SIZE: u32 = 2 * bytesize::MIB as u32;

/// Mask applied to an address to translate it between the RAM windows.
pub const RAM_MASK: u32 = 0x00FF_FFFF;

/// A memory segment refers to a specific range of memory addresses, each with its own purpose and
/// properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Kernel User SEGment
    ///
    /// Intended to be used as user virtual memory. The target CPU has no MMU, so this is simply a
    /// mirror of the first 512MiB of KSEG0/KSEG1.
    KUSEG,
    /// Kernel SEGment 0
    ///
    /// Maps to the physical memory directly, utilizing the cache.
    KSEG0,
    /// Kernel SEGment 1
    ///
    /// Maps to the physical memory directly and does not utilize the cache.
    KSEG1,
    /// Kernel SEGment 2
    ///
    /// Memory mapped CPU control registers. Does not mirror physical memory.
    KSEG2,
}

impl Segment {
    #[inline(always)]
    pub const fn start(&self) -> Address {
        match self {
            Segment::KUSEG => Address(0x0000_0000),
            Segment::KSEG0 => Address(0x8000_0000),
            Segment::KSEG1 => Address(0xA000_0000),
            Segment::KSEG2 => Address(0xC000_0000),
        }
    }
}

/// A virtual memory address. This is a thin wrapper around a [`u32`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, BinRead)]
pub struct Address(pub u32);

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "0x{:04X}_{:04X}",
            (self.0 & 0xFFFF_0000) >> 16,
            self.0 & 0xFFFF
        )
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Address {
    /// Returns the value of this address. Equivalent to `self.0`.
    #[inline(always)]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the segment of this address.
    #[inline(always)]
    pub const fn segment(self) -> Segment {
        match self.0 {
            0x0000_0000..=0x7FFF_FFFF => Segment::KUSEG,
            0x8000_0000..=0x9FFF_FFFF => Segment::KSEG0,
            0xA000_0000..=0xBFFF_FFFF => Segment::KSEG1,
            0xC000_0000..=0xFFFF_FFFF => Segment::KSEG2,
        }
    }

    /// Translates this address into the given RAM window, keeping the low
    /// [`RAM_MASK`] bits.
    #[inline(always)]
    pub const fn rebased(self, window: Segment) -> Address {
        Address(window.start().value() | (self.0 & RAM_MASK))
    }
}

impl std::ops::Add<u32> for Address {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        Self(self.0.wrapping_add(rhs))
    }
}

impl std::ops::Add<i32> for Address {
    type Output = Self;

    fn add(self, rhs: i32) -> Self::Output {
        Self(self.0.wrapping_add_signed(rhs))
    }
}

impl std::ops::Sub<u32> for Address {
    type Output = Self;

    fn sub(self, rhs: u32) -> Self::Output {
        Self(self.0.wrapping_sub(rhs))
    }
}

impl PartialEq<u32> for Address {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

/// Access permissions of a mapped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perms {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Perms {
    /// Read/write, e.g. hardware register blocks.
    pub const RW: Self = Self {
        read: true,
        write: true,
        execute: false,
    };

    /// Read/execute, e.g. the code section.
    pub const RX: Self = Self {
        read: true,
        write: false,
        execute: true,
    };

    /// Read/write/execute, e.g. plain RAM.
    pub const RWX: Self = Self {
        read: true,
        write: true,
        execute: true,
    };
}

impl std::fmt::Display for Perms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.read { 'r' } else { '-' },
            if self.write { 'w' } else { '-' },
            if self.execute { 'x' } else { '-' },
        )
    }
}
