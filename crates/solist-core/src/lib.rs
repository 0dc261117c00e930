//! # solist-core
//!
//! Format-agnostic symbol vocabulary for solist. This crate defines the
//! decoded symbol type, its kind/binding/visibility classifications, and the
//! export classifier that decides which symbols a shared object publishes.

pub mod arch;
pub mod export;
pub mod symbol;

pub use arch::{Bitness, Endianness};
pub use export::{classify, export_order, max_name_width, sort_exports, ExportedFunction};
pub use symbol::{SectionIndex, Symbol, SymbolBinding, SymbolKind, SymbolVisibility};
