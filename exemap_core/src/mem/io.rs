//! Catalog of the memory mapped hardware registers.
//!
//! The addresses in here are part of the hardware contract and must match the
//! real machine bit for bit.

use super::Address;
use std::borrow::Cow;
use strum::VariantArray;

/// Width of a memory mapped register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
    Dword,
}

impl Width {
    #[inline(always)]
    pub const fn bytes(self) -> u32 {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
            Width::Dword => 4,
        }
    }
}

/// A block of memory mapped registers. Each block becomes one region of the
/// reconstructed address space, sized to exactly span its register group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, VariantArray)]
pub enum Block {
    MemCtrl1,
    MemCtrl2,
    PeriphIo,
    IntCtrl,
    DmaMdecIn,
    DmaMdecOut,
    DmaGpu,
    DmaCdrom,
    DmaSpu,
    DmaPio,
    DmaOtc,
    DmaCtrl,
    TimerDotclock,
    TimerHretrace,
    TimerSysclock,
    Cdrom,
    Gpu,
    Mdec,
    SpuVoices,
    SpuCtrl,
}

#[expect(clippy::len_without_is_empty, reason = "not a collection")]
impl Block {
    pub const fn name(&self) -> &'static str {
        match self {
            Block::MemCtrl1 => "MCTRL1",
            Block::MemCtrl2 => "MCTRL2",
            Block::PeriphIo => "IO_PORTS",
            Block::IntCtrl => "INT_CTRL",
            Block::DmaMdecIn => "DMA_MDEC_IN",
            Block::DmaMdecOut => "DMA_MDEC_OUT",
            Block::DmaGpu => "DMA_GPU",
            Block::DmaCdrom => "DMA_CDROM",
            Block::DmaSpu => "DMA_SPU",
            Block::DmaPio => "DMA_PIO",
            Block::DmaOtc => "DMA_OTC",
            Block::DmaCtrl => "DMA_CTRL_INT",
            Block::TimerDotclock => "TMR_DOTCLOCK",
            Block::TimerHretrace => "TMR_HRETRACE",
            Block::TimerSysclock => "TMR_SYSCLOCK",
            Block::Cdrom => "CDROM_REGS",
            Block::Gpu => "GPU_REGS",
            Block::Mdec => "MDEC_REGS",
            Block::SpuVoices => "SPU_VOICES",
            Block::SpuCtrl => "SPU_CTRL_REGS",
        }
    }

    #[inline(always)]
    pub const fn start(&self) -> Address {
        Address(match self {
            Block::MemCtrl1 => 0x1F80_1000,
            Block::MemCtrl2 => 0x1F80_1060,
            Block::PeriphIo => 0x1F80_1040,
            Block::IntCtrl => 0x1F80_1070,
            Block::DmaMdecIn => 0x1F80_1080,
            Block::DmaMdecOut => 0x1F80_1090,
            Block::DmaGpu => 0x1F80_10A0,
            Block::DmaCdrom => 0x1F80_10B0,
            Block::DmaSpu => 0x1F80_10C0,
            Block::DmaPio => 0x1F80_10D0,
            Block::DmaOtc => 0x1F80_10E0,
            Block::DmaCtrl => 0x1F80_10F0,
            Block::TimerDotclock => 0x1F80_1100,
            Block::TimerHretrace => 0x1F80_1110,
            Block::TimerSysclock => 0x1F80_1120,
            Block::Cdrom => 0x1F80_1800,
            Block::Gpu => 0x1F80_1810,
            Block::Mdec => 0x1F80_1820,
            Block::SpuVoices => 0x1F80_1C00,
            Block::SpuCtrl => 0x1F80_1D80,
        })
    }

    /// The length of this block, in bytes.
    #[inline(always)]
    pub const fn len(&self) -> u32 {
        match self {
            Block::MemCtrl1 => 0x24,
            Block::MemCtrl2 => 0x04,
            Block::PeriphIo => 0x20,
            Block::IntCtrl => 0x06,
            Block::DmaMdecIn
            | Block::DmaMdecOut
            | Block::DmaGpu
            | Block::DmaCdrom
            | Block::DmaSpu
            | Block::DmaPio
            | Block::DmaOtc => 0x0C,
            Block::DmaCtrl => 0x08,
            Block::TimerDotclock | Block::TimerHretrace | Block::TimerSysclock => 0x10,
            Block::Cdrom => 0x04,
            Block::Gpu | Block::Mdec => 0x08,
            Block::SpuVoices => VOICE_COUNT * VOICE_STRIDE,
            Block::SpuCtrl => 0x40,
        }
    }
}

/// Descriptor of a single memory mapped register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDescriptor {
    pub label: &'static str,
    pub address: Address,
    pub width: Width,
}

/// A scalar (non-arrayed) memory mapped register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, VariantArray)]
pub enum Reg {
    // Memory Control 1
    Expansion1Base,
    Expansion2Base,
    Expansion1DelaySize,
    Expansion3DelaySize,
    BiosRom,
    SpuDelay,
    CdromDelay,
    Expansion2DelaySize,
    CommonDelay,

    // Memory Control 2
    RamSize,

    // Peripheral IO
    JoyData,
    JoyStat,
    JoyMode,
    JoyControl,
    JoyBaud,
    SioData,
    SioStat,
    SioMode,
    SioControl,
    SioMisc,
    SioBaud,

    // Interrupt
    InterruptStatus,
    InterruptMask,

    // DMA
    MdecInMadr,
    MdecInBcr,
    MdecInChcr,
    MdecOutMadr,
    MdecOutBcr,
    MdecOutChcr,
    GpuMadr,
    GpuBcr,
    GpuChcr,
    CdromMadr,
    CdromBcr,
    CdromChcr,
    SpuMadr,
    SpuBcr,
    SpuChcr,
    PioMadr,
    PioBcr,
    PioChcr,
    OtcMadr,
    OtcBcr,
    OtcChcr,
    DmaControl,
    DmaInterrupt,

    // Timers
    DotclockValue,
    DotclockMode,
    DotclockMax,
    HretraceValue,
    HretraceMode,
    HretraceMax,
    SysclockValue,
    SysclockMode,
    SysclockMax,

    // CDROM
    Cdrom0,
    Cdrom1,
    Cdrom2,
    Cdrom3,

    // GPU
    Gpu0,
    Gpu1,

    // MDEC
    Mdec0,
    Mdec1,

    // SPU Control
    MainVolumeLeft,
    MainVolumeRight,
    ReverbOutLeft,
    ReverbOutRight,
    VoiceKeyOn,
    VoiceKeyOff,
    VoiceFmMode,
    VoiceNoiseMode,
    VoiceReverbMode,
    VoiceStatus,
    Unknown1DA0,
    SramReverbAddress,
    SramInterruptAddress,
    SramTransferAddress,
    SramTransferFifo,
    SpuControl,
    SramTransferControl,
    SpuStatus,
    CdVolumeLeft,
    CdVolumeRight,
    ExternVolumeLeft,
    ExternVolumeRight,
    CurrentVolumeLeft,
    CurrentVolumeRight,
    Unknown1DBC,
}

impl Reg {
    /// Returns the label, address and width of this register.
    pub const fn descriptor(self) -> RegisterDescriptor {
        let (label, address, width) = match self {
            // Memory Control 1
            Reg::Expansion1Base => ("EXP1_BASE_ADDR", 0x1F80_1000, Width::Dword),
            Reg::Expansion2Base => ("EXP2_BASE_ADDR", 0x1F80_1004, Width::Dword),
            Reg::Expansion1DelaySize => ("EXP1_DELAY_SIZE", 0x1F80_1008, Width::Dword),
            Reg::Expansion3DelaySize => ("EXP3_DELAY_SIZE", 0x1F80_100C, Width::Dword),
            Reg::BiosRom => ("BIOS_ROM", 0x1F80_1010, Width::Dword),
            Reg::SpuDelay => ("SPU_DELAY", 0x1F80_1014, Width::Dword),
            Reg::CdromDelay => ("CDROM_DELAY", 0x1F80_1018, Width::Dword),
            Reg::Expansion2DelaySize => ("EXP2_DELAY_SIZE", 0x1F80_101C, Width::Dword),
            Reg::CommonDelay => ("COMMON_DELAY", 0x1F80_1020, Width::Dword),

            // Memory Control 2
            Reg::RamSize => ("RAM_SIZE", 0x1F80_1060, Width::Dword),

            // Peripheral IO
            Reg::JoyData => ("JOY_MCD_DATA", 0x1F80_1040, Width::Dword),
            Reg::JoyStat => ("JOY_MCD_STAT", 0x1F80_1044, Width::Dword),
            Reg::JoyMode => ("JOY_MCD_MODE", 0x1F80_1048, Width::Word),
            Reg::JoyControl => ("JOY_MCD_CTRL", 0x1F80_104A, Width::Word),
            Reg::JoyBaud => ("JOY_MCD_BAUD", 0x1F80_104E, Width::Word),
            Reg::SioData => ("SIO_DATA", 0x1F80_1050, Width::Dword),
            Reg::SioStat => ("SIO_STAT", 0x1F80_1054, Width::Dword),
            Reg::SioMode => ("SIO_MODE", 0x1F80_1058, Width::Word),
            Reg::SioControl => ("SIO_CTRL", 0x1F80_105A, Width::Word),
            Reg::SioMisc => ("SIO_MISC", 0x1F80_105C, Width::Word),
            Reg::SioBaud => ("SIO_BAUD", 0x1F80_105E, Width::Word),

            // Interrupt
            Reg::InterruptStatus => ("I_STAT", 0x1F80_1070, Width::Word),
            Reg::InterruptMask => ("I_MASK", 0x1F80_1074, Width::Word),

            // DMA
            Reg::MdecInMadr => ("DMA_MDEC_IN_MADR", 0x1F80_1080, Width::Dword),
            Reg::MdecInBcr => ("DMA_MDEC_IN_BCR", 0x1F80_1084, Width::Dword),
            Reg::MdecInChcr => ("DMA_MDEC_IN_CHCR", 0x1F80_1088, Width::Dword),
            Reg::MdecOutMadr => ("DMA_MDEC_OUT_MADR", 0x1F80_1090, Width::Dword),
            Reg::MdecOutBcr => ("DMA_MDEC_OUT_BCR", 0x1F80_1094, Width::Dword),
            Reg::MdecOutChcr => ("DMA_MDEC_OUT_CHCR", 0x1F80_1098, Width::Dword),
            Reg::GpuMadr => ("DMA_GPU_MADR", 0x1F80_10A0, Width::Dword),
            Reg::GpuBcr => ("DMA_GPU_BCR", 0x1F80_10A4, Width::Dword),
            Reg::GpuChcr => ("DMA_GPU_CHCR", 0x1F80_10A8, Width::Dword),
            Reg::CdromMadr => ("DMA_CDROM_MADR", 0x1F80_10B0, Width::Dword),
            Reg::CdromBcr => ("DMA_CDROM_BCR", 0x1F80_10B4, Width::Dword),
            Reg::CdromChcr => ("DMA_CDROM_CHCR", 0x1F80_10B8, Width::Dword),
            Reg::SpuMadr => ("DMA_SPU_MADR", 0x1F80_10C0, Width::Dword),
            Reg::SpuBcr => ("DMA_SPU_BCR", 0x1F80_10C4, Width::Dword),
            Reg::SpuChcr => ("DMA_SPU_CHCR", 0x1F80_10C8, Width::Dword),
            Reg::PioMadr => ("DMA_PIO_MADR", 0x1F80_10D0, Width::Dword),
            Reg::PioBcr => ("DMA_PIO_BCR", 0x1F80_10D4, Width::Dword),
            Reg::PioChcr => ("DMA_PIO_CHCR", 0x1F80_10D8, Width::Dword),
            Reg::OtcMadr => ("DMA_OTC_MADR", 0x1F80_10E0, Width::Dword),
            Reg::OtcBcr => ("DMA_OTC_BCR", 0x1F80_10E4, Width::Dword),
            Reg::OtcChcr => ("DMA_OTC_CHCR", 0x1F80_10E8, Width::Dword),
            Reg::DmaControl => ("DMA_DPCR", 0x1F80_10F0, Width::Dword),
            Reg::DmaInterrupt => ("DMA_DICR", 0x1F80_10F4, Width::Dword),

            // Timers
            Reg::DotclockValue => ("TMR_DOTCLOCK_VAL", 0x1F80_1100, Width::Dword),
            Reg::DotclockMode => ("TMR_DOTCLOCK_MODE", 0x1F80_1104, Width::Dword),
            Reg::DotclockMax => ("TMR_DOTCLOCK_MAX", 0x1F80_1108, Width::Dword),
            Reg::HretraceValue => ("TMR_HRETRACE_VAL", 0x1F80_1110, Width::Dword),
            Reg::HretraceMode => ("TMR_HRETRACE_MODE", 0x1F80_1114, Width::Dword),
            Reg::HretraceMax => ("TMR_HRETRACE_MAX", 0x1F80_1118, Width::Dword),
            Reg::SysclockValue => ("TMR_SYSCLOCK_VAL", 0x1F80_1120, Width::Dword),
            Reg::SysclockMode => ("TMR_SYSCLOCK_MODE", 0x1F80_1124, Width::Dword),
            Reg::SysclockMax => ("TMR_SYSCLOCK_MAX", 0x1F80_1128, Width::Dword),

            // CDROM
            Reg::Cdrom0 => ("CDROM_REG0", 0x1F80_1800, Width::Byte),
            Reg::Cdrom1 => ("CDROM_REG1", 0x1F80_1801, Width::Byte),
            Reg::Cdrom2 => ("CDROM_REG2", 0x1F80_1802, Width::Byte),
            Reg::Cdrom3 => ("CDROM_REG3", 0x1F80_1803, Width::Byte),

            // GPU
            Reg::Gpu0 => ("GPU_REG0", 0x1F80_1810, Width::Dword),
            Reg::Gpu1 => ("GPU_REG1", 0x1F80_1814, Width::Dword),

            // MDEC
            Reg::Mdec0 => ("MDEC_REG0", 0x1F80_1820, Width::Dword),
            Reg::Mdec1 => ("MDEC_REG1", 0x1F80_1824, Width::Dword),

            // SPU Control
            Reg::MainVolumeLeft => ("SPU_MAIN_VOL_L", 0x1F80_1D80, Width::Word),
            Reg::MainVolumeRight => ("SPU_MAIN_VOL_R", 0x1F80_1D82, Width::Word),
            Reg::ReverbOutLeft => ("SPU_REVERB_OUT_L", 0x1F80_1D84, Width::Word),
            Reg::ReverbOutRight => ("SPU_REVERB_OUT_R", 0x1F80_1D86, Width::Word),
            Reg::VoiceKeyOn => ("SPU_VOICE_KEY_ON", 0x1F80_1D88, Width::Dword),
            Reg::VoiceKeyOff => ("SPU_VOICE_KEY_OFF", 0x1F80_1D8C, Width::Dword),
            Reg::VoiceFmMode => ("SPU_VOICE_CHN_FM_MODE", 0x1F80_1D90, Width::Dword),
            Reg::VoiceNoiseMode => ("SPU_VOICE_CHN_NOISE_MODE", 0x1F80_1D94, Width::Dword),
            Reg::VoiceReverbMode => ("SPU_VOICE_CHN_REVERB_MODE", 0x1F80_1D98, Width::Dword),
            Reg::VoiceStatus => ("SPU_VOICE_CHN_ON_OFF_STATUS", 0x1F80_1D9C, Width::Dword),
            Reg::Unknown1DA0 => ("SPU_UNKN_1DA0", 0x1F80_1DA0, Width::Word),
            Reg::SramReverbAddress => ("SOUND_RAM_REVERB_WORK_ADDR", 0x1F80_1DA2, Width::Word),
            Reg::SramInterruptAddress => ("SOUND_RAM_IRQ_ADDR", 0x1F80_1DA4, Width::Word),
            Reg::SramTransferAddress => ("SOUND_RAM_DATA_TRANSFER_ADDR", 0x1F80_1DA6, Width::Word),
            Reg::SramTransferFifo => ("SOUND_RAM_DATA_TRANSFER_FIFO", 0x1F80_1DA8, Width::Word),
            Reg::SpuControl => ("SPU_CTRL_REG_CPUCNT", 0x1F80_1DAA, Width::Word),
            Reg::SramTransferControl => ("SOUND_RAM_DATA_TRANSFER_CTRL", 0x1F80_1DAC, Width::Word),
            Reg::SpuStatus => ("SPU_STATUS_REG_SPUSTAT", 0x1F80_1DAE, Width::Word),
            Reg::CdVolumeLeft => ("CD_VOL_L", 0x1F80_1DB0, Width::Word),
            Reg::CdVolumeRight => ("CD_VOL_R", 0x1F80_1DB2, Width::Word),
            Reg::ExternVolumeLeft => ("EXT_VOL_L", 0x1F80_1DB4, Width::Word),
            Reg::ExternVolumeRight => ("EXT_VOL_R", 0x1F80_1DB6, Width::Word),
            Reg::CurrentVolumeLeft => ("CURR_MAIN_VOL_L", 0x1F80_1DB8, Width::Word),
            Reg::CurrentVolumeRight => ("CURR_MAIN_VOL_R", 0x1F80_1DBA, Width::Word),
            Reg::Unknown1DBC => ("SPU_UNKN_1DBC", 0x1F80_1DBC, Width::Dword),
        };

        RegisterDescriptor {
            label,
            address: Address(address),
            width,
        }
    }
}

/// Base address of the voice register bank.
pub const VOICE_BASE: Address = Block::SpuVoices.start();
/// Number of voices in the sound processing unit.
pub const VOICE_COUNT: u32 = 24;
/// Bytes between consecutive voice register blocks.
pub const VOICE_STRIDE: u32 = 0x10;

/// One field of a voice register block. The bank has [`VOICE_COUNT`] blocks
/// laid out every [`VOICE_STRIDE`] bytes from [`VOICE_BASE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, VariantArray)]
pub enum VoiceReg {
    Volume,
    SampleRate,
    StartAddress,
    Adsr,
    AdsrVolume,
    RepeatAddress,
}

impl VoiceReg {
    /// Offset of this field inside its voice block.
    #[inline(always)]
    pub const fn offset(self) -> u32 {
        match self {
            VoiceReg::Volume => 0x00,
            VoiceReg::SampleRate => 0x04,
            VoiceReg::StartAddress => 0x06,
            VoiceReg::Adsr => 0x08,
            VoiceReg::AdsrVolume => 0x0C,
            VoiceReg::RepeatAddress => 0x0E,
        }
    }

    #[inline(always)]
    pub const fn width(self) -> Width {
        match self {
            VoiceReg::Volume => Width::Dword,
            _ => Width::Word,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            VoiceReg::Volume => "LEFT_RIGHT",
            VoiceReg::SampleRate => "ADPCM_SAMPLE_RATE",
            VoiceReg::StartAddress => "ADPCM_START_ADDR",
            VoiceReg::Adsr => "ADSR_ATT_DEC_SUS_REL",
            VoiceReg::AdsrVolume => "ADSR_CURR_VOLUME",
            VoiceReg::RepeatAddress => "ADPCM_REPEAT_ADDR",
        }
    }

    /// Address of this field in the given voice's block.
    pub const fn address(self, voice: u32) -> Address {
        Address(VOICE_BASE.value() + voice * VOICE_STRIDE + self.offset())
    }

    /// Label of this field in the given voice's block.
    pub fn label(self, voice: u32) -> String {
        format!("VOICE_{voice:02x}_{}", self.suffix())
    }
}

/// A register label to place in the reconstructed address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: Cow<'static, str>,
    pub address: Address,
    pub width: Width,
}

/// Yields one label per register of the catalog, voice blocks expanded, in
/// address-catalog order.
pub fn labels() -> impl Iterator<Item = Label> {
    let scalar = |reg: &Reg| {
        let descriptor = reg.descriptor();
        Label {
            name: Cow::Borrowed(descriptor.label),
            address: descriptor.address,
            width: descriptor.width,
        }
    };

    let before_voices = Reg::VARIANTS
        .iter()
        .filter(|reg| reg.descriptor().address < VOICE_BASE)
        .map(scalar);
    let voices = (0..VOICE_COUNT).flat_map(|voice| {
        VoiceReg::VARIANTS.iter().map(move |field| Label {
            name: Cow::Owned(field.label(voice)),
            address: field.address(voice),
            width: field.width(),
        })
    });
    let after_voices = Reg::VARIANTS
        .iter()
        .filter(|reg| reg.descriptor().address >= VOICE_BASE)
        .map(scalar);

    before_voices.chain(voices).chain(after_voices)
}
