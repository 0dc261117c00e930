//! ELF header parsing.

use crate::ParseError;
use solist_core::{Bitness, Endianness};

/// ELF magic bytes.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// ELF class (32-bit or 64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

impl ElfClass {
    /// Size of one section header entry.
    pub fn section_header_size(self) -> usize {
        match self {
            Self::Elf32 => 40,
            Self::Elf64 => 64,
        }
    }

    /// Size of one symbol table entry.
    pub fn symbol_entry_size(self) -> usize {
        match self {
            Self::Elf32 => 16,
            Self::Elf64 => 24,
        }
    }
}

impl From<ElfClass> for Bitness {
    fn from(class: ElfClass) -> Self {
        match class {
            ElfClass::Elf32 => Bitness::Bits32,
            ElfClass::Elf64 => Bitness::Bits64,
        }
    }
}

/// ELF file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfType {
    /// No file type.
    None,
    /// Relocatable file.
    Relocatable,
    /// Executable file.
    Executable,
    /// Shared object file.
    SharedObject,
    /// Core file.
    Core,
    /// Other type.
    Other(u16),
}

impl From<u16> for ElfType {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Relocatable,
            2 => Self::Executable,
            3 => Self::SharedObject,
            4 => Self::Core,
            other => Self::Other(other),
        }
    }
}

/// Parsed ELF header.
///
/// Only the fields needed to walk the section header table are kept, along
/// with the identification bytes that fix field widths and byte order.
#[derive(Debug, Clone)]
pub struct ElfHeader {
    /// ELF class (32 or 64 bit).
    pub class: ElfClass,
    /// Endianness.
    pub endianness: Endianness,
    /// OS/ABI identification.
    pub osabi: u8,
    /// File type.
    pub file_type: ElfType,
    /// Machine number (`e_machine`).
    pub machine: u16,
    /// Section header table file offset.
    pub e_shoff: u64,
    /// ELF header size.
    pub e_ehsize: u16,
    /// Section header table entry size.
    pub e_shentsize: u16,
    /// Section header table entry count (0 when extended numbering is used).
    pub e_shnum: u16,
    /// Section name string table index (`SHN_XINDEX` when extended).
    pub e_shstrndx: u16,
}

impl ElfHeader {
    /// Minimum size of the ELF identification bytes.
    const EI_NIDENT: usize = 16;

    /// Parse an ELF header from bytes.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::EI_NIDENT {
            return Err(ParseError::too_short(Self::EI_NIDENT, data.len()));
        }

        if data[0..4] != ELF_MAGIC {
            return Err(ParseError::invalid_magic("ELF", &data[0..4]));
        }

        let class = match data[4] {
            1 => ElfClass::Elf32,
            2 => ElfClass::Elf64,
            _ => {
                return Err(ParseError::invalid_structure(
                    "ELF header",
                    4,
                    format!("invalid ELF class: {}", data[4]),
                ))
            }
        };

        let endianness = match data[5] {
            1 => Endianness::Little,
            2 => Endianness::Big,
            _ => {
                return Err(ParseError::invalid_structure(
                    "ELF header",
                    5,
                    format!("invalid endianness: {}", data[5]),
                ))
            }
        };

        let osabi = data[7];

        match class {
            ElfClass::Elf32 => Self::parse_elf32(data, endianness, osabi),
            ElfClass::Elf64 => Self::parse_elf64(data, endianness, osabi),
        }
    }

    fn parse_elf32(data: &[u8], endianness: Endianness, osabi: u8) -> Result<Self, ParseError> {
        const ELF32_HEADER_SIZE: usize = 52;

        if data.len() < ELF32_HEADER_SIZE {
            return Err(ParseError::too_short(ELF32_HEADER_SIZE, data.len()));
        }

        let read_u16 = |offset: usize| endianness.u16([data[offset], data[offset + 1]]);
        let read_u32 = |offset: usize| {
            endianness.u32([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ])
        };

        Ok(Self {
            class: ElfClass::Elf32,
            endianness,
            osabi,
            file_type: ElfType::from(read_u16(16)),
            machine: read_u16(18),
            e_shoff: read_u32(32) as u64,
            e_ehsize: read_u16(40),
            e_shentsize: read_u16(46),
            e_shnum: read_u16(48),
            e_shstrndx: read_u16(50),
        })
    }

    fn parse_elf64(data: &[u8], endianness: Endianness, osabi: u8) -> Result<Self, ParseError> {
        const ELF64_HEADER_SIZE: usize = 64;

        if data.len() < ELF64_HEADER_SIZE {
            return Err(ParseError::too_short(ELF64_HEADER_SIZE, data.len()));
        }

        let read_u16 = |offset: usize| endianness.u16([data[offset], data[offset + 1]]);
        let read_u64 = |offset: usize| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&data[offset..offset + 8]);
            endianness.u64(bytes)
        };

        Ok(Self {
            class: ElfClass::Elf64,
            endianness,
            osabi,
            file_type: ElfType::from(read_u16(16)),
            machine: read_u16(18),
            e_shoff: read_u64(40),
            e_ehsize: read_u16(52),
            e_shentsize: read_u16(58),
            e_shnum: read_u16(60),
            e_shstrndx: read_u16(62),
        })
    }
}
