use std::path::Path;

/// Input file kinds, recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    /// Delimited text (`.csv`, `.txt`)
    Csv,
    /// Workbooks readable by calamine (`.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods`)
    Spreadsheet,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(FileKind::Pdf),
            "csv" | "txt" => Some(FileKind::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(FileKind::Spreadsheet),
            _ => None,
        }
    }
}

/// Options for reading delimited inputs (statement exports and ledgers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field delimiter; sniffed from the first lines when `None`
    pub csv_delimiter: Option<u8>,
}
