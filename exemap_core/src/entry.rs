//! Entry-point placement: the unconditional entry symbol at the initial
//! program counter, plus a best-effort signature scan for the user's `main`.

use crate::{
    exe::Header,
    mem::Address,
    scan::{self, Direction},
    space::{AddressSpace, SpaceError},
};
use log::{info, warn};

/// Opcode bytes of the compiler-generated prologue idiom that immediately
/// precedes the call into the user entry symbol.
const MAIN_SIGNATURE: [u8; 16] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x4D, 0x00, 0x00, 0x00,
];

/// Bit mask over [`MAIN_SIGNATURE`]: bytes 4..8 hold the call instruction
/// itself and are wildcards.
const MAIN_SIGNATURE_MASK: [u8; 16] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// Places the entry symbols and default register values for a freshly
/// realized address space.
///
/// The "start" function, entry-point marker and the gp/sp defaults are
/// always placed. Locating "main" is best effort: the signature is tied to
/// one toolchain's code generation, and any miss is logged and skipped, never
/// escalated.
pub fn apply(space: &mut impl AddressSpace, header: &Header) {
    if let Err(err) = place_start(space, header.initial_pc) {
        warn!("couldn't place entry symbol: {err}");
    }

    find_main(space, header);

    space.set_default_register("gp", header.initial_gp);
    space.set_default_register("sp", header.stack_pointer());
}

fn place_start(space: &mut impl AddressSpace, addr: Address) -> Result<(), SpaceError> {
    space.create_function(addr, "start")?;
    space.add_entry_point(addr);
    space.create_label(addr, "start")?;
    Ok(())
}

fn find_main(space: &mut impl AddressSpace, header: &Header) {
    if space.cancelled() {
        return;
    }

    let pc = header.initial_pc;
    let Some(code) = space.view(pc) else {
        warn!("initial pc {pc} is unmapped, skipping main search");
        return;
    };

    let Some(at) = scan::find(code, &MAIN_SIGNATURE, &MAIN_SIGNATURE_MASK, Direction::Forward)
    else {
        info!("main signature not found");
        return;
    };

    // skip the matched fixed prefix; the call instruction sits right after it
    let call = pc + (at as u32 + 4);
    let Some(targets) = space.disassemble(call) else {
        warn!("couldn't disassemble call site at {call}");
        return;
    };
    let Some(&main) = targets.first() else {
        warn!("call site at {call} has no operand reference");
        return;
    };

    match space.create_label(main, "main") {
        Ok(()) => info!("main located at {main}"),
        Err(err) => warn!("couldn't label main: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        map::RegionRequest,
        mem::Perms,
        space::MemSpace,
    };
    use std::ffi::CString;

    const PC: u32 = 0x8001_0000;

    fn header() -> Header {
        Header {
            initial_pc: Address(PC),
            initial_gp: 0x8002_0000,
            load_address: Address(PC),
            code_size: 0x1000,
            data_address: Address(0),
            data_size: 0,
            bss_address: Address(0),
            bss_size: 0,
            stack_base: 0x801F_F000,
            stack_offset: 0x100,
            marker: CString::default(),
        }
    }

    fn code_space(code: &[u8]) -> MemSpace {
        let mut space = MemSpace::new();
        space
            .create_region(
                &RegionRequest {
                    name: "CODE_B",
                    base: Address(PC),
                    size: 0x1000,
                    perms: Perms::RX,
                    source: Some(0x800),
                },
                Some(code),
            )
            .unwrap();
        space
    }

    fn signed_code(at: usize, call_word: u32) -> Vec<u8> {
        let mut code = vec![0u8; 0x1000];
        // break the all-zero runs so the signature can only match at `at`
        for chunk in code.chunks_mut(16) {
            chunk[12] = 0xEE;
        }
        code[at..at + 16].copy_from_slice(&MAIN_SIGNATURE);
        code[at + 4..at + 8].copy_from_slice(&call_word.to_le_bytes());
        code
    }

    #[test]
    fn labels_main_at_the_call_target() {
        // jal 0x80014000 at the wildcard slot
        let call = (0x03 << 26) | ((0x8001_4000u32 >> 2) & 0x03FF_FFFF);
        let mut space = code_space(&signed_code(0x40, call));

        apply(&mut space, &header());

        assert_eq!(space.label_at("main"), Some(Address(0x8001_4000)));
        assert_eq!(space.label_at("start"), Some(Address(PC)));
        assert_eq!(space.entry_points(), [Address(PC)]);
        assert!(space.functions().contains(&(Address(PC), "start".to_owned())));
        assert!(space.registers().contains(&("gp".to_owned(), 0x8002_0000)));
        assert!(space.registers().contains(&("sp".to_owned(), 0x801F_F100)));
    }

    #[test]
    fn missing_signature_skips_main_silently() {
        let mut code = vec![0u8; 0x1000];
        for chunk in code.chunks_mut(16) {
            chunk[12] = 0xEE;
        }
        let mut space = code_space(&code);

        apply(&mut space, &header());

        assert_eq!(space.label_at("main"), None);
        assert_eq!(space.label_at("start"), Some(Address(PC)));
        assert!(space.registers().contains(&("sp".to_owned(), 0x801F_F100)));
    }

    #[test]
    fn call_without_reference_skips_main() {
        // the wildcard slot holds an ALU op with no operand reference
        let addiu = 0x09u32 << 26;
        let mut space = code_space(&signed_code(0x40, addiu));

        apply(&mut space, &header());
        assert_eq!(space.label_at("main"), None);
    }

    #[test]
    fn unmapped_pc_skips_main() {
        let mut space = MemSpace::new();
        apply(&mut space, &header());

        assert_eq!(space.label_at("main"), None);
        // entry placement is independent of the scan outcome
        assert_eq!(space.entry_points(), [Address(PC)]);
    }
}
