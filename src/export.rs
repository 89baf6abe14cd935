use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::data_models::KeywordRow;
use crate::error::ExportError;
use crate::platforms::PlatformRegistry;

pub const SHEET_NAME: &str = "SERP Video Visibility";

/// A typed table cell, so the workbook can keep booleans and numbers native.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Flag(bool),
    Rank(Option<usize>),
}

impl Cell {
    pub fn to_plain(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Flag(b) => b.to_string(),
            Cell::Rank(Some(r)) => r.to_string(),
            Cell::Rank(None) => String::new(),
        }
    }
}

/// Export layout shared by CSV, XLSX and the terminal table.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Keyword, then anywhere flags, top-10 flags and ranks, each in registry order.
    pub fn build(rows: &[KeywordRow], registry: &PlatformRegistry, diagnostics: bool) -> Table {
        let labels: Vec<&str> = registry.labels().collect();

        let mut headers = vec!["Keyword".to_string()];
        headers.extend(labels.iter().map(|l| format!("{l} Anywhere")));
        headers.extend(labels.iter().map(|l| format!("{l} Top 10")));
        headers.extend(labels.iter().map(|l| format!("{l} Rank")));
        if diagnostics {
            headers.push("Diagnostics".to_string());
        }

        let rows = rows
            .iter()
            .map(|row| {
                let mut cells = vec![Cell::Text(row.keyword.clone())];
                cells.extend(labels.iter().map(|l| Cell::Flag(row.anywhere(l))));
                cells.extend(labels.iter().map(|l| Cell::Flag(row.top10(l))));
                cells.extend(labels.iter().map(|l| Cell::Rank(row.rank(l))));
                if diagnostics {
                    cells.push(Cell::Text(diagnostics_text(row)));
                }
                cells
            })
            .collect();

        Table { headers, rows }
    }
}

/// `YouTube: snippet @ path | TikTok: ...` in registry order.
pub fn diagnostics_text(row: &KeywordRow) -> String {
    row.platforms
        .iter()
        .flat_map(|p| {
            p.hits
                .iter()
                .map(move |h| format!("{}: {} @ {}", p.label, h.snippet, h.path))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn write_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::to_plain))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_xlsx(table: &Table, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &bold)?;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, c, s)?;
                }
                Cell::Flag(b) => {
                    sheet.write_boolean(r, c, *b)?;
                }
                Cell::Rank(Some(rank)) => {
                    sheet.write_number(r, c, *rank as f64)?;
                }
                Cell::Rank(None) => {}
            }
        }
    }
    sheet.autofit();

    workbook.save(path)?;
    Ok(())
}

/// Picks the writer from the file extension (`.csv` or `.xlsx`).
pub fn export(table: &Table, path: &Path) -> Result<(), ExportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => write_csv(table, path),
        "xlsx" => write_xlsx(table, path),
        _ => Err(ExportError::UnknownFormat(path.display().to_string())),
    }
}
