//! Export classification.
//!
//! A shared object exports a function when the symbol is a function, is
//! bound globally or weakly, and is defined in one of the object's own
//! sections. Everything else (locals, imports, data) is dropped here.

use std::cmp::Ordering;

use crate::symbol::{Symbol, SymbolBinding, SymbolKind};

/// A function exported by a binary.
///
/// Only [`classify`] builds these, so the binding is always
/// [`SymbolBinding::Global`] or [`SymbolBinding::Weak`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExportedFunction {
    name: String,
    binding: SymbolBinding,
}

impl ExportedFunction {
    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Linkage binding (global or weak).
    pub fn binding(&self) -> SymbolBinding {
        self.binding
    }

    /// Splits the export into its name and binding.
    pub fn into_parts(self) -> (String, SymbolBinding) {
        (self.name, self.binding)
    }
}

/// Returns the export for `symbol`, or `None` if it is not an exported function.
pub fn classify(symbol: &Symbol) -> Option<ExportedFunction> {
    if symbol.kind != SymbolKind::Function || !symbol.is_defined() {
        return None;
    }

    match symbol.binding {
        SymbolBinding::Global | SymbolBinding::Weak => Some(ExportedFunction {
            name: symbol.name.clone(),
            binding: symbol.binding,
        }),
        SymbolBinding::Local | SymbolBinding::GnuUnique | SymbolBinding::Other(_) => None,
    }
}

/// Display ordering: binding priority first, then case-sensitive name.
pub fn export_order(a: &ExportedFunction, b: &ExportedFunction) -> Ordering {
    a.binding
        .priority()
        .cmp(&b.binding.priority())
        .then_with(|| a.name.cmp(&b.name))
}

/// Sorts exports for display. The sort is stable, so equal entries keep scan order.
pub fn sort_exports(exports: &mut [ExportedFunction]) {
    exports.sort_by(export_order);
}

/// Width of the longest name, in characters.
pub fn max_name_width(exports: &[ExportedFunction]) -> usize {
    exports
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
}
