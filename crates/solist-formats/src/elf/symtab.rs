//! Symbol table decoding.

use log::trace;

use super::header::ElfClass;
use super::strtab::StringTable;
use super::symbol::SymbolEntry;
use crate::ParseError;
use solist_core::{Endianness, Symbol};

/// A symbol table section paired with its string table.
#[derive(Debug, Clone, Copy)]
pub struct SymbolTable<'a> {
    data: &'a [u8],
    strtab: StringTable<'a>,
    class: ElfClass,
    endianness: Endianness,
    entry_size: usize,
}

impl<'a> SymbolTable<'a> {
    /// Builds a table over the raw bytes of a symbol section.
    ///
    /// `offset` is the section's file offset and only feeds error messages.
    /// `declared_entry_size` is the section's `sh_entsize`; zero means unset.
    pub fn new(
        data: &'a [u8],
        strtab: StringTable<'a>,
        class: ElfClass,
        endianness: Endianness,
        declared_entry_size: u64,
        offset: u64,
    ) -> Result<Self, ParseError> {
        let entry_size = class.symbol_entry_size();

        if declared_entry_size != 0 && declared_entry_size != entry_size as u64 {
            return Err(ParseError::invalid_structure(
                "symbol table",
                offset,
                format!(
                    "entry size {} does not match {}-byte symbols",
                    declared_entry_size, entry_size
                ),
            ));
        }

        if data.len() % entry_size != 0 {
            return Err(ParseError::invalid_structure(
                "symbol table",
                offset,
                format!(
                    "size {} is not a multiple of {}",
                    data.len(),
                    entry_size
                ),
            ));
        }

        Ok(Self {
            data,
            strtab,
            class,
            endianness,
            entry_size,
        })
    }

    /// Number of entries, including the null entry at index 0.
    pub fn len(&self) -> usize {
        self.data.len() / self.entry_size
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the raw entry at `index`.
    pub fn entry(&self, index: usize) -> Option<Result<SymbolEntry, ParseError>> {
        let start = index.checked_mul(self.entry_size)?;
        let raw = self.data.get(start..start.checked_add(self.entry_size)?)?;
        Some(SymbolEntry::parse(raw, self.class, self.endianness))
    }

    /// Iterates over the decoded symbols in table order.
    pub fn iter(&self) -> Symbols<'a> {
        Symbols {
            table: *self,
            index: 0,
        }
    }

    fn decode(&self, index: usize) -> Option<Result<Symbol, ParseError>> {
        let entry = match self.entry(index)? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(e)),
        };
        let symbol = self
            .strtab
            .get(entry.st_name as usize)
            .map(|name| entry.to_symbol(name.into_owned()));
        if let Ok(symbol) = &symbol {
            trace!(
                "symbol {}: {:?} {:?} {:?} {}",
                index,
                symbol.kind,
                symbol.binding,
                symbol.section,
                symbol.name
            );
        }
        Some(symbol)
    }
}

impl<'a> IntoIterator for &SymbolTable<'a> {
    type Item = Result<Symbol, ParseError>;
    type IntoIter = Symbols<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the symbols of a [`SymbolTable`].
///
/// Stops after the first error.
#[derive(Debug, Clone)]
pub struct Symbols<'a> {
    table: SymbolTable<'a>,
    index: usize,
}

impl Iterator for Symbols<'_> {
    type Item = Result<Symbol, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.table.decode(self.index)?;
        self.index = if item.is_ok() {
            self.index + 1
        } else {
            self.table.len()
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Symbols<'_> {}
