//! The address-space capability interface the loader drives, and an
//! in-memory implementation of it.
//!
//! A real binary-analysis host implements [`AddressSpace`] on top of its own
//! program database. [`MemSpace`] realizes the same contract in memory and
//! backs the tests and the CLI.

use crate::{
    map::{MirrorRequest, RegionRequest},
    mem::{Address, Perms},
    mips::Instruction,
};
use easyerr::Error;

#[derive(Debug, Error)]
pub enum SpaceError {
    #[error("region {name} overlaps an existing region at {base}")]
    Conflict { name: String, base: Address },
    #[error("region {name} has zero size")]
    ZeroSize { name: String },
    #[error("mirror {name} aliases unmapped base {base}")]
    UnmappedBase { name: String, base: Address },
    #[error("invalid symbol name {name:?}")]
    InvalidSymbol { name: String },
    #[error("symbol {name:?} already exists at {addr}")]
    DuplicateSymbol { name: String, addr: Address },
}

/// The capabilities the loader needs from its host: region and mirror
/// creation, byte-level views, one-instruction disassembly and symbol
/// placement.
pub trait AddressSpace {
    /// Creates a region. `bytes` backs the region's initial contents; `None`
    /// means zero-filled.
    fn create_region(&mut self, req: &RegionRequest, bytes: Option<&[u8]>)
    -> Result<(), SpaceError>;

    /// Creates a view aliasing an existing region's storage at a different
    /// address. Permissions are copied from the base region now, not
    /// re-derived later.
    fn create_mirror(&mut self, req: &MirrorRequest) -> Result<(), SpaceError>;

    /// Readable bytes from `addr` to the end of its containing region.
    /// Mirrors resolve through their base region.
    fn view(&self, addr: Address) -> Option<&[u8]>;

    /// Decodes the instruction at `addr` and returns its operand reference
    /// targets. `None` if the address cannot be decoded at all.
    fn disassemble(&self, addr: Address) -> Option<Vec<Address>>;

    fn create_label(&mut self, addr: Address, name: &str) -> Result<(), SpaceError>;

    fn create_function(&mut self, addr: Address, name: &str) -> Result<(), SpaceError>;

    fn add_entry_point(&mut self, addr: Address);

    /// Sets the default disassembly value of a CPU register.
    fn set_default_register(&mut self, reg: &str, value: u32);

    /// Cooperative cancellation, observed before every region creation and
    /// scan step. A cancelled load keeps whatever was already created.
    fn cancelled(&self) -> bool {
        false
    }
}

/// Storage of a mapped region.
#[derive(Debug, Clone)]
pub enum Backing {
    Owned(Vec<u8>),
    Mirror { of: Address },
}

/// A realized region of a [`MemSpace`].
#[derive(Debug, Clone)]
pub struct MappedRegion {
    pub name: String,
    pub base: Address,
    pub size: u32,
    pub perms: Perms,
    pub backing: Backing,
}

impl MappedRegion {
    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.base && u64::from(addr.value()) < u64::from(self.base.value()) + u64::from(self.size)
    }

    pub fn is_mirror(&self) -> bool {
        matches!(self.backing, Backing::Mirror { .. })
    }

    fn overlaps(&self, base: Address, size: u32) -> bool {
        let (a0, a1) = (u64::from(self.base.value()), u64::from(self.base.value()) + u64::from(self.size));
        let (b0, b1) = (u64::from(base.value()), u64::from(base.value()) + u64::from(size));
        a0 < b1 && b0 < a1
    }
}

/// An in-memory address space. Regions own their bytes, mirrors alias them.
#[derive(Debug, Default)]
pub struct MemSpace {
    regions: Vec<MappedRegion>,
    labels: Vec<(Address, String)>,
    functions: Vec<(Address, String)>,
    entry_points: Vec<Address>,
    registers: Vec<(String, u32)>,
    cancel: bool,
}

impl MemSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &[MappedRegion] {
        &self.regions
    }

    pub fn labels(&self) -> &[(Address, String)] {
        &self.labels
    }

    pub fn functions(&self) -> &[(Address, String)] {
        &self.functions
    }

    pub fn entry_points(&self) -> &[Address] {
        &self.entry_points
    }

    pub fn registers(&self) -> &[(String, u32)] {
        &self.registers
    }

    pub fn label_at(&self, name: &str) -> Option<Address> {
        self.labels
            .iter()
            .find(|(_, label)| label == name)
            .map(|(addr, _)| *addr)
    }

    /// Makes every subsequent cancellation check report true.
    pub fn cancel(&mut self) {
        self.cancel = true;
    }

    fn index_of(&self, addr: Address) -> Option<usize> {
        self.regions.iter().position(|region| region.contains(addr))
    }

    /// Resolves `addr` to the owning region index and the offset inside its
    /// owned storage, following at most one mirror hop.
    fn resolve(&self, addr: Address) -> Option<(usize, usize, u32)> {
        let index = self.index_of(addr)?;
        let region = &self.regions[index];
        let offset = addr.value() - region.base.value();
        let remaining = region.size - offset;

        match region.backing {
            Backing::Owned(_) => Some((index, offset as usize, remaining)),
            Backing::Mirror { of } => {
                let base_index = self.index_of(of)?;
                let base = &self.regions[base_index];
                if base.is_mirror() {
                    return None;
                }

                let base_offset = of.value() - base.base.value() + offset;
                Some((base_index, base_offset as usize, remaining))
            }
        }
    }

    /// Writes bytes at `addr`, resolving mirrors through their base. Returns
    /// `false` if the range is unmapped. Test/tooling helper, not part of the
    /// loader contract.
    pub fn write(&mut self, addr: Address, bytes: &[u8]) -> bool {
        let Some((index, offset, remaining)) = self.resolve(addr) else {
            return false;
        };
        if bytes.len() > remaining as usize {
            return false;
        }

        let Backing::Owned(data) = &mut self.regions[index].backing else {
            return false;
        };
        data[offset..offset + bytes.len()].copy_from_slice(bytes);
        true
    }
}

impl AddressSpace for MemSpace {
    fn create_region(
        &mut self,
        req: &RegionRequest,
        bytes: Option<&[u8]>,
    ) -> Result<(), SpaceError> {
        if req.size == 0 {
            return Err(SpaceError::ZeroSize {
                name: req.name.to_owned(),
            });
        }

        if let Some(existing) = self.regions.iter().find(|region| region.overlaps(req.base, req.size)) {
            return Err(SpaceError::Conflict {
                name: req.name.to_owned(),
                base: existing.base,
            });
        }

        let mut data = vec![0; req.size as usize];
        if let Some(bytes) = bytes {
            let len = bytes.len().min(data.len());
            data[..len].copy_from_slice(&bytes[..len]);
        }

        self.regions.push(MappedRegion {
            name: req.name.to_owned(),
            base: req.base,
            size: req.size,
            perms: req.perms,
            backing: Backing::Owned(data),
        });
        Ok(())
    }

    fn create_mirror(&mut self, req: &MirrorRequest) -> Result<(), SpaceError> {
        if req.size == 0 {
            return Err(SpaceError::ZeroSize {
                name: req.name.to_owned(),
            });
        }

        let base = self
            .index_of(req.mirror_of)
            .ok_or_else(|| SpaceError::UnmappedBase {
                name: req.name.to_owned(),
                base: req.mirror_of,
            })?;
        let perms = self.regions[base].perms;

        if let Some(existing) = self.regions.iter().find(|region| region.overlaps(req.base, req.size)) {
            return Err(SpaceError::Conflict {
                name: req.name.to_owned(),
                base: existing.base,
            });
        }

        self.regions.push(MappedRegion {
            name: req.name.to_owned(),
            base: req.base,
            size: req.size,
            perms,
            backing: Backing::Mirror { of: req.mirror_of },
        });
        Ok(())
    }

    fn view(&self, addr: Address) -> Option<&[u8]> {
        let (index, offset, remaining) = self.resolve(addr)?;
        let Backing::Owned(data) = &self.regions[index].backing else {
            return None;
        };

        data.get(offset..)
            .map(|slice| &slice[..slice.len().min(remaining as usize)])
    }

    fn disassemble(&self, addr: Address) -> Option<Vec<Address>> {
        let view = self.view(addr)?;
        let word = u32::from_le_bytes(view.get(..4)?.try_into().ok()?);
        Some(Instruction(word).reference_targets(addr))
    }

    fn create_label(&mut self, addr: Address, name: &str) -> Result<(), SpaceError> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(SpaceError::InvalidSymbol {
                name: name.to_owned(),
            });
        }

        if let Some(at) = self.label_at(name) {
            return Err(SpaceError::DuplicateSymbol {
                name: name.to_owned(),
                addr: at,
            });
        }

        self.labels.push((addr, name.to_owned()));
        Ok(())
    }

    fn create_function(&mut self, addr: Address, name: &str) -> Result<(), SpaceError> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(SpaceError::InvalidSymbol {
                name: name.to_owned(),
            });
        }

        self.functions.push((addr, name.to_owned()));
        Ok(())
    }

    fn add_entry_point(&mut self, addr: Address) {
        self.entry_points.push(addr);
    }

    fn set_default_register(&mut self, reg: &str, value: u32) {
        self.registers.push((reg.to_owned(), value));
    }

    fn cancelled(&self) -> bool {
        self.cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(name: &'static str, base: u32, size: u32, perms: Perms) -> RegionRequest {
        RegionRequest {
            name,
            base: Address(base),
            size,
            perms,
            source: None,
        }
    }

    #[test]
    fn overlapping_regions_conflict() {
        let mut space = MemSpace::new();
        space
            .create_region(&region("A", 0x8000_0000, 0x1000, Perms::RWX), None)
            .unwrap();

        let err = space
            .create_region(&region("B", 0x8000_0800, 0x1000, Perms::RWX), None)
            .unwrap_err();
        assert!(matches!(err, SpaceError::Conflict { .. }));
        assert_eq!(space.regions().len(), 1);
    }

    #[test]
    fn zero_sized_region_is_refused() {
        let mut space = MemSpace::new();
        let err = space
            .create_region(&region("A", 0x8000_0000, 0, Perms::RWX), None)
            .unwrap_err();
        assert!(matches!(err, SpaceError::ZeroSize { .. }));
    }

    #[test]
    fn mirror_resolves_through_base() {
        let mut space = MemSpace::new();
        space
            .create_region(&region("CODE_B", 0x8001_0000, 0x100, Perms::RX), Some(b"\xAA\xBB".as_slice()))
            .unwrap();
        space
            .create_mirror(&MirrorRequest {
                name: "CODE_C",
                base: Address(0xA001_0000),
                mirror_of: Address(0x8001_0000),
                size: 0x100,
            })
            .unwrap();

        // reads through the mirror observe the base bytes
        assert_eq!(&space.view(Address(0xA001_0000)).unwrap()[..2], b"\xAA\xBB");

        // writes through the mirror observe through the base, and vice versa
        assert!(space.write(Address(0xA001_0004), b"\xCC"));
        assert_eq!(space.view(Address(0x8001_0004)).unwrap()[0], 0xCC);

        // permissions were copied from the base at creation time
        let mirror = space.regions().iter().find(|r| r.name == "CODE_C").unwrap();
        assert!(mirror.is_mirror());
        assert_eq!(mirror.perms, Perms::RX);
    }

    #[test]
    fn mirror_of_unmapped_base_fails() {
        let mut space = MemSpace::new();
        let err = space
            .create_mirror(&MirrorRequest {
                name: "RAM_C",
                base: Address(0xA000_0000),
                mirror_of: Address(0x8000_0000),
                size: 0x100,
            })
            .unwrap_err();
        assert!(matches!(err, SpaceError::UnmappedBase { .. }));
    }

    #[test]
    fn view_stops_at_region_end() {
        let mut space = MemSpace::new();
        space
            .create_region(&region("A", 0x8000_0000, 0x10, Perms::RWX), None)
            .unwrap();

        assert_eq!(space.view(Address(0x8000_000C)).unwrap().len(), 4);
        assert!(space.view(Address(0x8000_0010)).is_none());
    }

    #[test]
    fn disassemble_reads_little_endian_words() {
        let mut space = MemSpace::new();
        // jal 0x80014000
        let word: u32 = (0x03 << 26) | ((0x8001_4000u32 >> 2) & 0x03FF_FFFF);
        space
            .create_region(&region("CODE_B", 0x8001_0000, 0x10, Perms::RX), Some(word.to_le_bytes().as_slice()))
            .unwrap();

        let targets = space.disassemble(Address(0x8001_0000)).unwrap();
        assert_eq!(targets, [Address(0x8001_4000)]);
        assert!(space.disassemble(Address(0x9999_0000)).is_none());
    }

    #[test]
    fn duplicate_labels_are_refused() {
        let mut space = MemSpace::new();
        space.create_label(Address(0x8001_0000), "main").unwrap();

        let err = space.create_label(Address(0x8002_0000), "main").unwrap_err();
        assert!(matches!(err, SpaceError::DuplicateSymbol { .. }));
        assert!(space.create_label(Address(0x8001_0000), "bad name").is_err());
    }
}
