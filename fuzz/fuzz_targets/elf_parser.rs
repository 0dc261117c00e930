#![no_main]

use libfuzzer_sys::fuzz_target;
use solist_core::SymbolBinding;
use solist_formats::{list_exported_functions_from_bytes, Elf, DYNSYM, SYMTAB};

fuzz_target!(|data: &[u8]| {
    // Try to parse as ELF - should never panic
    if let Ok(elf) = Elf::parse(data) {
        for name in [DYNSYM, SYMTAB, ".dynstr", ".shstrtab", ".text"] {
            if let Some(section) = elf.section_by_name(name) {
                let _ = elf.section_data(section).map(|d| d.len());
                if let Ok(table) = elf.symbol_table(section) {
                    for symbol in &table {
                        let _ = symbol.map(|s| s.name.len());
                    }
                }
            }
        }
    }

    // Any listing that succeeds must honour the export filter
    if let Ok(exports) = list_exported_functions_from_bytes(data) {
        for export in exports {
            assert!(matches!(
                export.binding(),
                SymbolBinding::Global | SymbolBinding::Weak
            ));
        }
    }
});
