//! ELF (Executable and Linkable Format) reader.
//!
//! This module validates the ELF container, walks the section header table
//! and decodes symbol tables. Both 32-bit and 64-bit files in either byte
//! order are supported, including extended section numbering.

mod header;
mod section;
mod strtab;
mod symbol;
mod symtab;

pub use header::{ElfClass, ElfHeader, ElfType, ELF_MAGIC};
pub use section::{
    SectionHeader, SHN_LORESERVE, SHN_UNDEF, SHN_XINDEX, SHT_DYNSYM, SHT_NOBITS, SHT_NULL,
    SHT_STRTAB, SHT_SYMTAB,
};
pub use strtab::StringTable;
pub use symbol::SymbolEntry;
pub use symtab::{SymbolTable, Symbols};

use log::{debug, trace};

use crate::ParseError;
use solist_core::{Bitness, Endianness};

/// Name of the dynamic symbol table section.
pub const DYNSYM: &str = ".dynsym";
/// Name of the full symbol table section.
pub const SYMTAB: &str = ".symtab";

/// A parsed ELF file.
///
/// Holds the header and section headers; symbol tables are decoded on
/// demand from the borrowed file bytes.
#[derive(Debug)]
pub struct Elf<'a> {
    /// Raw bytes of the file.
    data: &'a [u8],
    /// Parsed ELF header.
    pub header: ElfHeader,
    /// Section headers, with names resolved.
    pub sections: Vec<SectionHeader>,
}

impl<'a> Elf<'a> {
    /// Parse an ELF file from raw bytes.
    pub fn parse(data: &'a [u8]) -> Result<Self, ParseError> {
        let header = ElfHeader::parse(data)?;

        let mut sections = Self::parse_section_headers(data, &header)?;

        let section_names = Self::section_name_table(data, &header, &sections)?;
        for section in &mut sections {
            let name = section_names.get(section.sh_name as usize)?;
            section.set_name(name.into_owned());
        }

        debug!(
            "parsed {:?} {:?} ELF ({:?}, machine {}) with {} sections",
            header.class,
            header.endianness,
            header.file_type,
            header.machine,
            sections.len()
        );
        for (index, section) in sections.iter().enumerate() {
            trace!(
                "section {}: {} {} offset={:#x} size={:#x} link={}",
                index,
                section.name(),
                section.type_name(),
                section.sh_offset,
                section.sh_size,
                section.sh_link
            );
        }

        Ok(Self {
            data,
            header,
            sections,
        })
    }

    fn parse_section_headers(
        data: &[u8],
        header: &ElfHeader,
    ) -> Result<Vec<SectionHeader>, ParseError> {
        if header.e_shoff == 0 {
            return Ok(Vec::new());
        }

        let entry_size = header.e_shentsize as usize;
        let min_size = header.class.section_header_size();
        let table_start = to_usize(header.e_shoff, "section header offset")?;

        // With extended numbering the real count lives in section 0's sh_size
        let count = if header.e_shnum == 0 {
            if entry_size < min_size {
                return Err(ParseError::InvalidValue("section header entry size too small"));
            }
            let first = data
                .get(table_start..)
                .ok_or(ParseError::too_short(table_start, data.len()))?;
            let first = SectionHeader::parse(first, header.class, header.endianness)?;
            to_usize(first.sh_size, "section count")?
        } else {
            header.e_shnum as usize
        };

        if count == 0 {
            return Ok(Vec::new());
        }
        if entry_size < min_size {
            return Err(ParseError::InvalidValue("section header entry size too small"));
        }

        let table_size = count
            .checked_mul(entry_size)
            .ok_or(ParseError::Overflow {
                context: "section header table",
            })?;
        let table_end = table_start
            .checked_add(table_size)
            .ok_or(ParseError::Overflow {
                context: "section header table",
            })?;
        if table_end > data.len() {
            return Err(ParseError::TruncatedData {
                expected: table_end,
                actual: data.len(),
                context: "section header table",
            });
        }

        let mut sections = Vec::with_capacity(count);
        let mut offset = table_start;
        for _ in 0..count {
            let section = SectionHeader::parse(
                &data[offset..offset + entry_size],
                header.class,
                header.endianness,
            )?;
            sections.push(section);
            offset += entry_size;
        }

        Ok(sections)
    }

    fn section_name_table(
        data: &'a [u8],
        header: &ElfHeader,
        sections: &[SectionHeader],
    ) -> Result<StringTable<'a>, ParseError> {
        if sections.is_empty() {
            return Ok(StringTable::empty());
        }

        let index = if header.e_shstrndx == SHN_XINDEX {
            sections[0].sh_link as usize
        } else {
            header.e_shstrndx as usize
        };
        if index == SHN_UNDEF as usize {
            return Ok(StringTable::empty());
        }

        let shstrtab = sections.get(index).ok_or(ParseError::InvalidSectionIndex {
            index,
            count: sections.len(),
        })?;
        Ok(StringTable::new(section_bytes(data, shstrtab)?))
    }

    /// Returns the raw data of the ELF file.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the byte order.
    pub fn endianness(&self) -> Endianness {
        self.header.endianness
    }

    /// Returns whether this is a 32-bit or 64-bit file.
    pub fn bitness(&self) -> Bitness {
        self.header.class.into()
    }

    /// Returns the first section with the given name.
    pub fn section_by_name(&self, name: &str) -> Option<&SectionHeader> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// Like [`Elf::section_by_name`], reporting a missing section as an error.
    pub fn find_section(&self, name: &str) -> Result<&SectionHeader, ParseError> {
        self.section_by_name(name)
            .ok_or_else(|| ParseError::SectionNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the file bytes of a section (empty for `SHT_NOBITS`).
    pub fn section_data(&self, section: &SectionHeader) -> Result<&'a [u8], ParseError> {
        section_bytes(self.data, section)
    }

    /// Pairs a symbol section with the string table named by its `sh_link`.
    pub fn symbol_table(&self, section: &SectionHeader) -> Result<SymbolTable<'a>, ParseError> {
        if !section.is_symbol_table() {
            return Err(ParseError::invalid_structure(
                "symbol table",
                section.sh_offset,
                format!("section {} has type {}", section.name(), section.type_name()),
            ));
        }

        let link = section.sh_link as usize;
        let strtab = self
            .sections
            .get(link)
            .ok_or(ParseError::InvalidSectionIndex {
                index: link,
                count: self.sections.len(),
            })?;
        if strtab.sh_type != SHT_STRTAB {
            debug!(
                "symbol table {} links to {} section {}",
                section.name(),
                strtab.type_name(),
                strtab.name()
            );
        }

        let table = SymbolTable::new(
            self.section_data(section)?,
            StringTable::new(self.section_data(strtab)?),
            self.header.class,
            self.header.endianness,
            section.sh_entsize,
            section.sh_offset,
        )?;
        debug!(
            "symbol table {} has {} entries, string table {} has {} bytes",
            section.name(),
            table.len(),
            strtab.name(),
            strtab.sh_size
        );
        Ok(table)
    }

    /// Returns the dynamic symbol table, if the file has one.
    pub fn dynamic_symbols(&self) -> Result<Option<SymbolTable<'a>>, ParseError> {
        self.section_by_name(DYNSYM)
            .map(|section| self.symbol_table(section))
            .transpose()
    }
}

fn section_bytes<'a>(data: &'a [u8], section: &SectionHeader) -> Result<&'a [u8], ParseError> {
    if !section.has_file_data() {
        return Ok(&[]);
    }

    let start = to_usize(section.sh_offset, "section offset")?;
    let size = to_usize(section.sh_size, "section size")?;
    let end = start.checked_add(size).ok_or(ParseError::Overflow {
        context: "section bounds",
    })?;
    data.get(start..end).ok_or(ParseError::TruncatedData {
        expected: end,
        actual: data.len(),
        context: "section data",
    })
}

fn to_usize(value: u64, context: &'static str) -> Result<usize, ParseError> {
    usize::try_from(value).map_err(|_| ParseError::Overflow { context })
}
