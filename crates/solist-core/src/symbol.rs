//! Decoded symbol types.

use std::fmt;

/// A symbol decoded from a binary's symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    /// Symbol name (empty for the null entry and most section symbols).
    pub name: String,
    /// Symbol value, usually a virtual address.
    pub value: u64,
    /// Size of the symbol (0 if unknown).
    pub size: u64,
    /// Symbol type.
    pub kind: SymbolKind,
    /// Symbol binding (local, global, weak).
    pub binding: SymbolBinding,
    /// Symbol visibility.
    pub visibility: SymbolVisibility,
    /// Section the symbol is defined in, passed through unresolved.
    pub section: SectionIndex,
}

impl Symbol {
    /// Returns true if this symbol is a function.
    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function)
    }

    /// Returns true if this symbol is defined in this binary rather than imported.
    pub fn is_defined(&self) -> bool {
        !self.section.is_undefined()
    }

    /// Returns true if other modules can link against this symbol.
    pub fn is_externally_visible(&self) -> bool {
        matches!(self.binding, SymbolBinding::Global | SymbolBinding::Weak)
    }
}

/// Symbol type/kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    /// No type (unspecified).
    None,
    /// Data object (variable, array, etc.).
    Object,
    /// Function or other executable code.
    Function,
    /// Section symbol.
    Section,
    /// File name symbol.
    File,
    /// Common data object.
    Common,
    /// Thread-local storage object.
    Tls,
    /// GNU indirect function (resolved at load time).
    GnuIndirect,
    /// Other/unknown type.
    Other(u8),
}

/// Symbol binding (linkage visibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SymbolBinding {
    /// Local symbol (not visible outside the defining module).
    Local,
    /// Global symbol (visible to all modules).
    Global,
    /// Weak symbol (like global but can be overridden).
    Weak,
    /// GNU unique symbol (one definition per process).
    GnuUnique,
    /// Other/unknown binding.
    Other(u8),
}

impl SymbolBinding {
    /// Sort priority of the binding: global first, weak second, anything else last.
    pub fn priority(self) -> u8 {
        match self {
            Self::Global => 0,
            Self::Weak => 1,
            Self::Local | Self::GnuUnique | Self::Other(_) => 2,
        }
    }
}

impl fmt::Display for SymbolBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("STB_LOCAL"),
            Self::Global => f.write_str("STB_GLOBAL"),
            Self::Weak => f.write_str("STB_WEAK"),
            Self::GnuUnique => f.write_str("STB_GNU_UNIQUE"),
            Self::Other(value) => write!(f, "STB_{}", value),
        }
    }
}

/// Symbol visibility (the low bits of `st_other`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolVisibility {
    Default,
    Internal,
    Hidden,
    Protected,
}

/// The section a symbol refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionIndex {
    /// Referenced but not defined here (an import).
    Undefined,
    /// Index into the section header table.
    Index(u16),
    /// A value from the reserved range (absolute, common, extended index...).
    Reserved(u16),
}

impl SectionIndex {
    /// Returns true for the undefined sentinel.
    pub fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}
