//! Exported function listing.
//!
//! Glues the reader, the symbol table decoder and the classifier together.
//! Results come back in symbol table order; sorting is left to the caller.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::elf::{Elf, DYNSYM};
use crate::ParseError;
use solist_core::{classify, ExportedFunction};

/// Lists the functions exported through the named symbol table.
///
/// A file without that section exports nothing. Any decode failure aborts
/// the whole listing.
pub fn exported_functions(
    elf: &Elf<'_>,
    section_name: &str,
) -> Result<Vec<ExportedFunction>, ParseError> {
    let section = match elf.find_section(section_name) {
        Ok(section) => section,
        Err(e) if e.is_not_found() => {
            debug!("no {} section, nothing is exported", section_name);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let table = elf.symbol_table(section)?;
    let mut exports = Vec::new();
    for symbol in &table {
        if let Some(export) = classify(&symbol?) {
            exports.push(export);
        }
    }

    debug!(
        "{} of {} {} entries are exported functions",
        exports.len(),
        table.len(),
        section_name
    );
    Ok(exports)
}

/// Lists the functions exported through `.dynsym` of an in-memory file.
pub fn list_exported_functions_from_bytes(
    data: &[u8],
) -> Result<Vec<ExportedFunction>, ParseError> {
    let elf = Elf::parse(data)?;
    exported_functions(&elf, DYNSYM)
}

/// Reads a whole stream and lists the functions exported through `.dynsym`.
pub fn list_exported_functions<R: Read + Seek>(
    reader: R,
) -> Result<Vec<ExportedFunction>, ParseError> {
    list_exported_functions_in(reader, DYNSYM)
}

/// Reads a whole stream and lists the functions exported through the named
/// symbol table.
pub fn list_exported_functions_in<R: Read + Seek>(
    mut reader: R,
    section_name: &str,
) -> Result<Vec<ExportedFunction>, ParseError> {
    reader.seek(SeekFrom::Start(0))?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    debug!("read {} bytes", data.len());

    let elf = Elf::parse(&data)?;
    exported_functions(&elf, section_name)
}
