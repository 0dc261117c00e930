//! Output formatting for exported function lists.

use std::io::{self, Write};

use solist_core::{max_name_width, ExportedFunction};

/// Writes one aligned `Name: ... | Visibility: ...` line per function.
pub fn write_table<W: Write>(mut writer: W, exports: &[ExportedFunction]) -> io::Result<()> {
    let width = max_name_width(exports);
    for export in exports {
        writeln!(
            writer,
            "Name: {:<width$} | Visibility: {}",
            export.name(),
            export.binding(),
            width = width
        )?;
    }
    Ok(())
}

/// Writes the functions as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, exports: &[ExportedFunction]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, exports)?;
    writeln!(writer)
}
