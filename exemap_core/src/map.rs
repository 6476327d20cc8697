//! Memory-map construction: turns a parsed header into the ordered list of
//! region and mirror requests a host realizes into an address space.

use crate::{
    exe::{HEADER_SIZE, Header},
    mem::{Address, Perms, RAM_SIZE, Segment, io::Block},
};
use strum::VariantArray;

/// A request for a named, permissioned region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRequest {
    pub name: &'static str,
    pub base: Address,
    pub size: u32,
    pub perms: Perms,
    /// Offset into the original file of the bytes backing this region.
    /// `None` means zero-filled.
    pub source: Option<u64>,
}

/// A request for a view that aliases an already-created region's bytes at a
/// different address. Mirrors own no storage and copy the base region's
/// permissions at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRequest {
    pub name: &'static str,
    pub base: Address,
    /// Base address of the mirrored region. Must already exist.
    pub mirror_of: Address,
    pub size: u32,
}

/// One entry of the ordered request sequence produced by [`build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Region(RegionRequest),
    Mirror(MirrorRequest),
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Region(region) => region.name,
            Request::Mirror(mirror) => mirror.name,
        }
    }
}

/// Derives the full region/mirror request sequence for an executable header.
///
/// Pure function of the header: building twice yields identical sequences.
/// RAM is split around the code section so the code bytes are not
/// double-mapped as plain RAM, and every RAM piece is mirrored into the low
/// and uncached windows. Register blocks, the scratchpad and the data/bss
/// sections follow.
///
/// The header may legally place the code section anywhere, so a RAM piece
/// whose bounds fall outside the cached window is skipped rather than
/// wrapped.
pub fn build(header: &Header) -> Vec<Request> {
    let mut requests = Vec::new();
    let cached = Segment::KSEG0.start();

    // RAM below the code section, the code itself, RAM above it
    let below = header
        .load_address
        .value()
        .checked_sub(cached.value())
        .filter(|&size| size <= RAM_SIZE)
        .unwrap_or(0);
    let above = (cached.value() + RAM_SIZE)
        .checked_sub(header.code_end().value())
        .filter(|&size| size <= RAM_SIZE)
        .unwrap_or(0);

    push_mirrored(
        &mut requests,
        ["RAM_B", "RAM_A", "RAM_C"],
        cached,
        below,
        Perms::RWX,
        None,
    );
    push_mirrored(
        &mut requests,
        ["CODE_B", "CODE_A", "CODE_C"],
        header.load_address,
        header.code_size,
        Perms::RX,
        Some(u64::from(HEADER_SIZE)),
    );
    push_mirrored(
        &mut requests,
        ["RAM_B", "RAM_A", "RAM_C"],
        header.code_end(),
        above,
        Perms::RWX,
        None,
    );

    // data and bss exist only when the header declares them; neither is
    // mirrored
    if header.data_address != 0 {
        requests.push(Request::Region(RegionRequest {
            name: "DATA",
            base: header.data_address,
            size: header.data_size,
            perms: Perms::RWX,
            source: None,
        }));
    }

    if header.bss_address != 0 {
        requests.push(Request::Region(RegionRequest {
            name: "BSS",
            base: header.bss_address,
            size: header.bss_size,
            perms: Perms::RWX,
            source: None,
        }));
    }

    // on-chip fast RAM and the unknown block right after it
    requests.push(Request::Region(RegionRequest {
        name: "CACHE",
        base: Address(0x1F80_0000),
        size: 0x400,
        perms: Perms::RW,
        source: None,
    }));
    requests.push(Request::Region(RegionRequest {
        name: "UNK1",
        base: Address(0x1F80_0400),
        size: 0xC00,
        perms: Perms::RW,
        source: None,
    }));

    for block in Block::VARIANTS {
        requests.push(Request::Region(RegionRequest {
            name: block.name(),
            base: block.start(),
            size: block.len(),
            perms: Perms::RW,
            source: None,
        }));
    }

    requests
}

/// Pushes a RAM piece followed by its low and uncached window mirrors.
/// Zero-sized pieces are skipped entirely.
fn push_mirrored(
    requests: &mut Vec<Request>,
    [name, low_name, uncached_name]: [&'static str; 3],
    base: Address,
    size: u32,
    perms: Perms,
    source: Option<u64>,
) {
    if size == 0 {
        return;
    }

    requests.push(Request::Region(RegionRequest {
        name,
        base,
        size,
        perms,
        source,
    }));
    requests.push(Request::Mirror(MirrorRequest {
        name: low_name,
        base: base.rebased(Segment::KUSEG),
        mirror_of: base,
        size,
    }));
    requests.push(Request::Mirror(MirrorRequest {
        name: uncached_name,
        base: base.rebased(Segment::KSEG1),
        mirror_of: base,
        size,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::RAM_MASK;
    use proptest::prelude::*;
    use std::ffi::CString;

    fn header(load_address: u32, code_size: u32) -> Header {
        Header {
            initial_pc: Address(load_address),
            initial_gp: 0x8002_0000,
            load_address: Address(load_address),
            code_size,
            data_address: Address(0),
            data_size: 0,
            bss_address: Address(0),
            bss_size: 0,
            stack_base: 0x801F_F000,
            stack_offset: 0,
            marker: CString::default(),
        }
    }

    fn regions(requests: &[Request]) -> Vec<&RegionRequest> {
        requests
            .iter()
            .filter_map(|request| match request {
                Request::Region(region) => Some(region),
                Request::Mirror(_) => None,
            })
            .collect()
    }

    #[test]
    fn splits_ram_around_code() {
        let requests = build(&header(0x8001_0000, 0x800));
        let regions = regions(&requests);

        assert_eq!(regions[0].name, "RAM_B");
        assert_eq!(regions[0].base, Address(0x8000_0000));
        assert_eq!(regions[0].size, 0x1_0000);
        assert_eq!(regions[0].source, None);

        assert_eq!(regions[1].name, "CODE_B");
        assert_eq!(regions[1].base, Address(0x8001_0000));
        assert_eq!(regions[1].size, 0x800);
        assert_eq!(regions[1].perms, Perms::RX);
        assert_eq!(regions[1].source, Some(0x800));

        assert_eq!(regions[2].name, "RAM_B");
        assert_eq!(regions[2].base, Address(0x8001_0800));
        assert_eq!(regions[2].size, RAM_SIZE - 0x1_0800);
    }

    #[test]
    fn every_ram_piece_is_mirrored_into_both_windows() {
        let requests = build(&header(0x8001_0000, 0x800));

        let mut seen = Vec::new();
        for request in &requests {
            match request {
                Request::Region(region) => seen.push(region.clone()),
                Request::Mirror(mirror) => {
                    let base = seen
                        .iter()
                        .find(|region| region.base == mirror.mirror_of)
                        .expect("mirror must follow its base region");
                    assert_eq!(mirror.size, base.size);

                    let low = base.base.value() & RAM_MASK;
                    assert!(
                        mirror.base.value() == low || mirror.base.value() == (0xA000_0000 | low),
                        "unexpected mirror base {}",
                        mirror.base
                    );
                }
            }
        }

        let mirrors = requests
            .iter()
            .filter(|request| matches!(request, Request::Mirror(_)))
            .count();
        // three RAM pieces, two windows each
        assert_eq!(mirrors, 6);
    }

    #[test]
    fn code_at_ram_base_skips_empty_piece() {
        let requests = build(&header(0x8000_0000, 0x1000));
        let regions = regions(&requests);

        assert_eq!(regions[0].name, "CODE_B");
        assert!(requests.iter().all(|request| match request {
            Request::Region(region) => region.size > 0,
            Request::Mirror(mirror) => mirror.size > 0,
        }));
    }

    #[test]
    fn out_of_window_load_address_skips_ram_pieces() {
        let requests = build(&header(0x0001_0000, 0x1000));
        let regions = regions(&requests);

        assert!(regions.iter().all(|region| region.name != "RAM_B"));
        assert!(regions.iter().all(|region| region.size <= RAM_SIZE));

        let code = regions.iter().find(|region| region.name == "CODE_B").unwrap();
        assert_eq!(code.base, Address(0x0001_0000));
    }

    #[test]
    fn code_past_ram_end_skips_trailing_piece() {
        let requests = build(&header(0x801F_F000, 0x4000));
        let regions = regions(&requests);

        // the leading piece survives, the trailing one would be negative
        assert_eq!(regions[0].name, "RAM_B");
        assert_eq!(regions[0].size, 0x1F_F000);
        assert_eq!(
            regions.iter().filter(|region| region.name == "RAM_B").count(),
            1
        );
    }

    #[test]
    fn data_and_bss_exist_iff_declared() {
        let bare = build(&header(0x8001_0000, 0x800));
        assert!(bare.iter().all(|request| request.name() != "DATA"));
        assert!(bare.iter().all(|request| request.name() != "BSS"));

        let mut with_sections = header(0x8001_0000, 0x800);
        with_sections.data_address = Address(0x8003_0000);
        with_sections.data_size = 0x100;
        with_sections.bss_address = Address(0x8004_0000);
        with_sections.bss_size = 0x200;

        let requests = build(&with_sections);
        let data = regions(&requests)
            .into_iter()
            .find(|region| region.name == "DATA")
            .unwrap()
            .clone();
        assert_eq!(data.base, Address(0x8003_0000));
        assert_eq!(data.size, 0x100);
        assert_eq!(data.source, None);
        assert!(requests.iter().any(|request| request.name() == "BSS"));
    }

    #[test]
    fn register_blocks_are_rw_and_zero_filled() {
        let requests = build(&header(0x8001_0000, 0x800));
        let regions = regions(&requests);

        let mctrl1 = regions.iter().find(|region| region.name == "MCTRL1").unwrap();
        assert_eq!(mctrl1.base, Address(0x1F80_1000));
        assert_eq!(mctrl1.size, 0x24);
        assert_eq!(mctrl1.perms, Perms::RW);
        assert_eq!(mctrl1.source, None);

        let voices = regions.iter().find(|region| region.name == "SPU_VOICES").unwrap();
        assert_eq!(voices.base, Address(0x1F80_1C00));
        assert_eq!(voices.size, 24 * 0x10);

        let cache = regions.iter().find(|region| region.name == "CACHE").unwrap();
        assert_eq!(cache.base, Address(0x1F80_0000));
        assert_eq!(cache.size, 0x400);
        assert_eq!(cache.perms, Perms::RW);
    }

    proptest! {
        #[test]
        fn building_twice_is_identical(
            load in any::<u32>(),
            code_size in 0u32..0x4_0000,
            data_address in prop_oneof![Just(0u32), 0x8000_0000u32..0x8020_0000],
            bss_address in prop_oneof![Just(0u32), 0x8000_0000u32..0x8020_0000],
        ) {
            let mut header = header(load, code_size);
            header.data_address = Address(data_address);
            header.data_size = 0x100;
            header.bss_address = Address(bss_address);
            header.bss_size = 0x100;

            prop_assert_eq!(build(&header), build(&header));
        }
    }
}
