//! ELF section header parsing.

use super::header::ElfClass;
use crate::ParseError;
use solist_core::Endianness;

// Section types
pub const SHT_NULL: u32 = 0;
pub const SHT_PROGBITS: u32 = 1;
pub const SHT_SYMTAB: u32 = 2;
pub const SHT_STRTAB: u32 = 3;
pub const SHT_RELA: u32 = 4;
pub const SHT_HASH: u32 = 5;
pub const SHT_DYNAMIC: u32 = 6;
pub const SHT_NOTE: u32 = 7;
pub const SHT_NOBITS: u32 = 8;
pub const SHT_REL: u32 = 9;
pub const SHT_DYNSYM: u32 = 11;

// Special section indices
pub const SHN_UNDEF: u16 = 0;
pub const SHN_LORESERVE: u16 = 0xff00;
pub const SHN_XINDEX: u16 = 0xffff;

/// A parsed section header.
#[derive(Debug, Clone)]
pub struct SectionHeader {
    /// Section name (index into string table).
    pub sh_name: u32,
    /// Section type.
    pub sh_type: u32,
    /// Section flags.
    pub sh_flags: u64,
    /// Virtual address in memory.
    pub sh_addr: u64,
    /// Offset in file.
    pub sh_offset: u64,
    /// Size in bytes.
    pub sh_size: u64,
    /// Link to another section.
    pub sh_link: u32,
    /// Additional section info.
    pub sh_info: u32,
    /// Address alignment.
    pub sh_addralign: u64,
    /// Entry size (for tables).
    pub sh_entsize: u64,
    /// Resolved section name (set after the name table is loaded).
    name: String,
}

impl SectionHeader {
    /// Parse a section header from bytes.
    pub fn parse(data: &[u8], class: ElfClass, endianness: Endianness) -> Result<Self, ParseError> {
        match class {
            ElfClass::Elf32 => Self::parse_elf32(data, endianness),
            ElfClass::Elf64 => Self::parse_elf64(data, endianness),
        }
    }

    fn parse_elf32(data: &[u8], endianness: Endianness) -> Result<Self, ParseError> {
        const SIZE: usize = 40;
        if data.len() < SIZE {
            return Err(ParseError::too_short(SIZE, data.len()));
        }

        let read_u32 = |offset: usize| {
            endianness.u32([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ])
        };

        Ok(Self {
            sh_name: read_u32(0),
            sh_type: read_u32(4),
            sh_flags: read_u32(8) as u64,
            sh_addr: read_u32(12) as u64,
            sh_offset: read_u32(16) as u64,
            sh_size: read_u32(20) as u64,
            sh_link: read_u32(24),
            sh_info: read_u32(28),
            sh_addralign: read_u32(32) as u64,
            sh_entsize: read_u32(36) as u64,
            name: String::new(),
        })
    }

    fn parse_elf64(data: &[u8], endianness: Endianness) -> Result<Self, ParseError> {
        const SIZE: usize = 64;
        if data.len() < SIZE {
            return Err(ParseError::too_short(SIZE, data.len()));
        }

        let read_u32 = |offset: usize| {
            endianness.u32([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ])
        };
        let read_u64 = |offset: usize| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&data[offset..offset + 8]);
            endianness.u64(bytes)
        };

        Ok(Self {
            sh_name: read_u32(0),
            sh_type: read_u32(4),
            sh_flags: read_u64(8),
            sh_addr: read_u64(16),
            sh_offset: read_u64(24),
            sh_size: read_u64(32),
            sh_link: read_u32(40),
            sh_info: read_u32(44),
            sh_addralign: read_u64(48),
            sh_entsize: read_u64(56),
            name: String::new(),
        })
    }

    /// Returns the section type as a string.
    pub fn type_name(&self) -> &'static str {
        match self.sh_type {
            SHT_NULL => "NULL",
            SHT_PROGBITS => "PROGBITS",
            SHT_SYMTAB => "SYMTAB",
            SHT_STRTAB => "STRTAB",
            SHT_RELA => "RELA",
            SHT_HASH => "HASH",
            SHT_DYNAMIC => "DYNAMIC",
            SHT_NOTE => "NOTE",
            SHT_NOBITS => "NOBITS",
            SHT_REL => "REL",
            SHT_DYNSYM => "DYNSYM",
            _ => "UNKNOWN",
        }
    }

    /// Returns true for `SHT_SYMTAB` and `SHT_DYNSYM` sections.
    pub fn is_symbol_table(&self) -> bool {
        matches!(self.sh_type, SHT_SYMTAB | SHT_DYNSYM)
    }

    /// Returns true if the section occupies bytes in the file.
    pub fn has_file_data(&self) -> bool {
        self.sh_type != SHT_NOBITS
    }

    /// Section name, empty if the file has no section name table.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
