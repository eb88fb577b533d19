//! Spreadsheet rendering.
//!
//! Every sheet becomes a self-contained text block. The first row of a sheet
//! is treated as its header; only the leading data rows are tabulated.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use tabled::{builder::Builder, settings::style::Style};
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::types::DocType;

/// Data rows tabulated per sheet.
pub const MAX_PREVIEW_ROWS: usize = 100;

/// Render every sheet of a workbook, in workbook order.
pub fn extract_spreadsheet(bytes: &[u8]) -> Result<String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| CoreError::extraction(DocType::Spreadsheet, e))?;

    let names = workbook.sheet_names().to_vec();
    debug!("Rendering {} sheets", names.len());

    let sheets: Vec<_> = names
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).map_err(|e| e.to_string());
            (name, range)
        })
        .collect();

    Ok(render_sheets(sheets))
}

/// Render sheets in order, one block each.
///
/// A sheet that failed to load becomes an error block; its neighbours are
/// rendered exactly as they would be on their own.
pub fn render_sheets<I>(sheets: I) -> String
where
    I: IntoIterator<Item = (String, std::result::Result<Range<Data>, String>)>,
{
    let sections: Vec<String> = sheets
        .into_iter()
        .map(|(name, range)| match range {
            Ok(range) => render_sheet(&name, &range),
            Err(e) => {
                warn!("Failed to read sheet '{}': {}", name, e);
                render_sheet_error(&name, &e)
            }
        })
        .collect();

    sections.join("\n")
}

/// Render a single sheet.
pub fn render_sheet(name: &str, range: &Range<Data>) -> String {
    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let data: Vec<&[Data]> = rows.collect();

    let mut out = sheet_header(name);
    out.push_str(&format!("Rows: {}, Columns: {}\n", data.len(), range.width()));
    out.push_str(&format!("Columns: {}\n", header.join(", ")));

    if header.is_empty() {
        out.push_str("(empty sheet)\n");
        return out;
    }

    let mut builder = Builder::default();
    builder.push_record(header);
    for row in data.iter().take(MAX_PREVIEW_ROWS) {
        builder.push_record(row.iter().map(cell_text));
    }
    let mut table = builder.build();
    table.with(Style::blank());
    out.push_str(&table.to_string());
    out.push('\n');

    if data.len() > MAX_PREVIEW_ROWS {
        out.push_str(&format!(
            "... and {} more rows\n",
            data.len() - MAX_PREVIEW_ROWS
        ));
    }

    out
}

/// Block emitted for a sheet that could not be read.
pub fn render_sheet_error(name: &str, message: &str) -> String {
    let mut out = sheet_header(name);
    out.push_str(&format!("[Error reading sheet: {}]\n", message));
    out
}

fn sheet_header(name: &str) -> String {
    format!("=== Sheet: {} ===\n", name)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().replace(['\n', '\r'], " "),
    }
}
