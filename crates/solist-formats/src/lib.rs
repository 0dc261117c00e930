//! # solist-formats
//!
//! ELF reader for solist. This crate validates the container, locates
//! sections by name, decodes symbol tables and lists the functions a
//! shared object exports.
//!
//! The reader borrows an in-memory buffer and never prints; diagnostics go
//! through the `log` facade and failures come back as [`ParseError`].

pub mod elf;
pub mod error;
pub mod exports;

pub use elf::{Elf, ElfClass, ElfType, SectionHeader, SymbolTable, DYNSYM, SYMTAB};
pub use error::{ErrorKind, ParseError};
pub use exports::{
    exported_functions, list_exported_functions, list_exported_functions_from_bytes,
    list_exported_functions_in,
};
