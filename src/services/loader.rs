// src/services/loader.rs

//! Inventory spreadsheet loader.
//!
//! Finds the workbook among a fixed list of candidate locations, reads its
//! first sheet, and maps each row to an [`InventoryRecord`] by header name.
//! Further sheets are ignored.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};

use crate::error::{AppError, Result};
use crate::models::{DateValue, Field, InventoryConfig, InventoryRecord};
use crate::utils::date;

/// Ordered candidate locations for the inventory workbook.
#[derive(Debug, Clone)]
pub struct InventorySource {
    file_name: String,
    candidates: Vec<PathBuf>,
}

impl InventorySource {
    /// Candidates for a configured workbook: working directory, package
    /// directory, configured search directories, then the absolute path.
    pub fn from_config(config: &InventoryConfig) -> Self {
        let mut dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        dirs.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
        dirs.extend(config.search_dirs.iter().cloned());
        Self::search(&config.file_name, dirs)
    }

    /// Candidates for `file_name` joined onto each directory in order.
    ///
    /// An absolute `file_name` is its own only candidate.
    pub fn search(file_name: &str, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let path = PathBuf::from(file_name);
        let mut candidates = Vec::new();

        if path.is_absolute() {
            candidates.push(path);
        } else {
            for dir in dirs {
                push_unique(&mut candidates, dir.join(&path));
            }
            if let Ok(absolute) = std::path::absolute(&path) {
                push_unique(&mut candidates, absolute);
            }
        }

        Self {
            file_name: file_name.to_string(),
            candidates,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk.
    pub fn resolve(&self) -> Result<PathBuf> {
        self.candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| AppError::source_not_found(&self.file_name, self.candidates.clone()))
    }
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

/// Resolve the source and read every record from its first sheet.
pub fn load_records(source: &InventorySource) -> Result<Vec<InventoryRecord>> {
    let path = source.resolve()?;
    log::debug!("Reading inventory from {}", path.display());
    read_workbook(&path)
}

/// Read every record from the first sheet of the workbook at `path`.
pub fn read_workbook(path: &Path) -> Result<Vec<InventoryRecord>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| AppError::parse(path, e))?;

    let sheet_names = workbook.sheet_names();
    if sheet_names.len() > 1 {
        log::debug!(
            "Workbook has {} sheets; reading only '{}'",
            sheet_names.len(),
            sheet_names[0]
        );
    }

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::parse(path, "workbook contains no sheets"))?
        .map_err(|e| AppError::parse(path, e))?;

    let records = records_from_rows(range.rows());
    log::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Map sheet rows to records. The first row holds the headers.
pub fn records_from_rows<'a, I>(rows: I) -> Vec<InventoryRecord>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers = HeaderIndex::from_row(header_row);

    rows.filter(|row| !row.iter().all(is_blank))
        .map(|row| headers.record(row))
        .collect()
}

/// Column positions by header text.
struct HeaderIndex {
    columns: Vec<String>,
}

impl HeaderIndex {
    fn from_row(row: &[Data]) -> Self {
        Self {
            columns: row.iter().map(cell_text).collect(),
        }
    }

    /// First alias of `field` whose column holds a value in this row.
    fn lookup<'r>(&self, row: &'r [Data], field: Field) -> Option<&'r Data> {
        field.aliases().iter().find_map(|alias| {
            let index = self.columns.iter().position(|h| h == alias)?;
            row.get(index).filter(|cell| !is_blank(cell))
        })
    }

    fn text(&self, row: &[Data], field: Field) -> String {
        self.lookup(row, field).map(cell_text).unwrap_or_default()
    }

    fn date(&self, row: &[Data], field: Field) -> DateValue {
        self.lookup(row, field).map(cell_date).unwrap_or_default()
    }

    fn record(&self, row: &[Data]) -> InventoryRecord {
        InventoryRecord {
            product_name: self.text(row, Field::ProductName),
            brand: self.text(row, Field::Brand),
            volume: self.text(row, Field::Volume),
            batch_no: self.text(row, Field::BatchNo),
            stock_date: self.date(row, Field::StockDate),
            expiry_date: self.date(row, Field::ExpiryDate),
            storage_location: self.text(row, Field::StorageLocation),
        }
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) if dt.is_duration() => dt.as_f64().to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|dt| date::canonical(dt.date()))
            .unwrap_or_else(|| dt.as_f64().to_string()),
    }
}

fn cell_date(cell: &Data) -> DateValue {
    match cell {
        // Durations are elapsed time, not calendar days.
        Data::DateTime(dt) if dt.is_duration() => DateValue::Empty,
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|dt| DateValue::Date(dt.date()))
            .unwrap_or_default(),
        Data::Float(f) => DateValue::Serial(*f),
        Data::Int(i) => DateValue::Serial(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => DateValue::from(s.trim()),
        Data::Empty | Data::Bool(_) | Data::Error(_) | Data::DurationIso(_) => DateValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    use super::*;

    const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
    const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// Write a minimal xlsx with one worksheet per `(name, sheetData rows)`.
    /// Cell style 1 carries the built-in `mm-dd-yy` date format.
    fn write_xlsx(path: &Path, date1904: bool, sheets: &[(&str, &str)]) {
        let mut zip = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
        let options = SimpleFileOptions::default();

        let mut overrides = String::new();
        let mut entries = String::new();
        let mut rels = String::new();
        for (i, (name, _)) in sheets.iter().enumerate() {
            let n = i + 1;
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
            entries.push_str(&format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            ));
        }

        let files = [
            (
                "[Content_Types].xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>{overrides}</Types>"#
                ),
            ),
            (
                "_rels/.rels".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                ),
            ),
            (
                "xl/workbook.xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><workbookPr date1904="{}"/><sheets>{entries}</sheets></workbook>"#,
                    if date1904 { 1 } else { 0 }
                ),
            ),
            (
                "xl/_rels/workbook.xml.rels".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
                ),
            ),
            (
                "xl/styles.xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><styleSheet xmlns="{MAIN_NS}"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs></styleSheet>"#
                ),
            ),
        ];
        for (name, body) in files {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        for (i, (_, rows)) in sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                .unwrap();
            let body = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{MAIN_NS}"><sheetData>{rows}</sheetData></worksheet>"#
            );
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn text_cell(r: &str, value: &str) -> String {
        format!(r#"<c r="{r}" t="inlineStr"><is><t>{value}</t></is></c>"#)
    }

    fn date_cell(r: &str, serial: u32) -> String {
        format!(r#"<c r="{r}" s="1"><v>{serial}</v></c>"#)
    }

    fn stock_sheet() -> String {
        [
            format!(
                r#"<row r="1">{}{}</row>"#,
                text_cell("A1", "Product Name"),
                text_cell("B1", "Expiry Date")
            ),
            format!(
                r#"<row r="2">{}{}</row>"#,
                text_cell("A2", "Pilsner"),
                date_cell("B2", 45297)
            ),
            format!(
                r#"<row r="3">{}{}</row>"#,
                text_cell("A3", "Stout"),
                text_cell("B3", "2024-02-01")
            ),
        ]
        .concat()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn load(rows: &[Vec<Data>]) -> Vec<InventoryRecord> {
        records_from_rows(rows.iter().map(|r| r.as_slice()))
    }

    #[test]
    fn test_header_variants_fill_same_field() {
        for header in ["Product Name", "ProductName", "product_name"] {
            let records = load(&[vec![text(header)], vec![text("Hazy IPA")]]);
            assert_eq!(records.len(), 1, "header: {header}");
            assert_eq!(records[0].product_name, "Hazy IPA", "header: {header}");
        }
    }

    #[test]
    fn test_first_non_empty_alias_wins() {
        let records = load(&[
            vec![text("Batch No."), text("Batch Number")],
            vec![Data::Empty, text("B-7")],
            vec![text("B-1"), text("B-9")],
        ]);
        assert_eq!(records[0].batch_no, "B-7");
        assert_eq!(records[1].batch_no, "B-1");
    }

    #[test]
    fn test_missing_columns_default_to_empty() {
        let records = load(&[vec![text("Brand")], vec![text("Acme")]]);
        let record = &records[0];
        assert_eq!(record.brand, "Acme");
        assert_eq!(record.product_name, "");
        assert_eq!(record.expiry_date, DateValue::Empty);
    }

    #[test]
    fn test_cells_map_to_date_values() {
        let records = load(&[
            vec![text("Expiry Date"), text("Stock Date"), text("Volume (ml)")],
            vec![Data::Float(45297.0), text("2023-12-01"), Data::Float(330.0)],
            vec![Data::Int(45297), Data::Bool(true), Data::Int(500)],
            vec![text(" N/A "), Data::Empty, text("1 L")],
        ]);
        assert_eq!(records[0].expiry_date, DateValue::Serial(45297.0));
        assert_eq!(records[0].stock_date, DateValue::Text("2023-12-01".into()));
        assert_eq!(records[0].volume, "330");
        assert_eq!(records[1].expiry_date, DateValue::Serial(45297.0));
        assert_eq!(records[1].stock_date, DateValue::Empty);
        assert_eq!(records[2].expiry_date, DateValue::Text("N/A".into()));
        assert_eq!(records[2].volume, "1 L");
    }

    #[test]
    fn test_native_date_cells_follow_workbook_epoch() {
        let native = |value: f64, kind: ExcelDateTimeType, is_1904: bool| {
            Data::DateTime(ExcelDateTime::new(value, kind, is_1904))
        };
        let records = load(&[
            vec![text("Expiry Date"), text("Batch No")],
            vec![native(45297.0, ExcelDateTimeType::DateTime, false), text("B-1")],
            vec![native(43835.0, ExcelDateTimeType::DateTime, true), text("B-2")],
            vec![native(1.5, ExcelDateTimeType::TimeDelta, false), text("B-3")],
        ]);
        assert_eq!(records[0].expiry_date, DateValue::Date(ymd(2024, 1, 6)));
        assert_eq!(records[1].expiry_date, DateValue::Date(ymd(2024, 1, 6)));
        assert_eq!(records[2].expiry_date, DateValue::Empty);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let records = load(&[
            vec![text("Product Name")],
            vec![Data::Empty],
            vec![text("   ")],
            vec![text("Stout")],
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_name, "Stout");
    }

    #[test]
    fn test_headers_are_trimmed() {
        let records = load(&[vec![text(" Expiry Date ")], vec![text("2024-01-06")]]);
        assert_eq!(records[0].expiry_date, DateValue::Text("2024-01-06".into()));
    }

    #[test]
    fn test_empty_sheet() {
        assert!(load(&[]).is_empty());
        assert!(load(&[vec![text("Product Name")]]).is_empty());
    }

    #[test]
    fn test_search_order_and_resolve() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(second.path().join("stock.xlsx"), b"x").unwrap();

        let source = InventorySource::search(
            "stock.xlsx",
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
        );
        assert_eq!(source.candidates()[0], first.path().join("stock.xlsx"));
        assert_eq!(source.candidates()[1], second.path().join("stock.xlsx"));
        assert_eq!(source.resolve().unwrap(), second.path().join("stock.xlsx"));
    }

    #[test]
    fn test_absolute_file_name_is_only_candidate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock.xlsx");
        let source = InventorySource::search(path.to_str().unwrap(), vec![PathBuf::from("/other")]);
        assert_eq!(source.candidates(), &[path]);
    }

    #[test]
    fn test_missing_source_reports_candidates() {
        let dir = TempDir::new().unwrap();
        let source = InventorySource::search("missing.xlsx", vec![dir.path().to_path_buf()]);
        match load_records(&source) {
            Err(AppError::SourceNotFound { file, searched }) => {
                assert_eq!(file, "missing.xlsx");
                assert_eq!(searched[0], dir.path().join("missing.xlsx"));
            }
            other => panic!("expected SourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_reads_only_first_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock.xlsx");
        let archive = format!(
            r#"<row r="1">{}</row><row r="2">{}</row>"#,
            text_cell("A1", "Product Name"),
            text_cell("A2", "Old Lager")
        );
        write_xlsx(
            &path,
            false,
            &[("Stock", stock_sheet().as_str()), ("Archive", archive.as_str())],
        );

        let records = read_workbook(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_name, "Pilsner");
        assert_eq!(records[0].expiry_date, DateValue::Date(ymd(2024, 1, 6)));
        assert_eq!(records[1].product_name, "Stout");
        assert_eq!(records[1].expiry_date, DateValue::Text("2024-02-01".into()));
    }

    #[test]
    fn test_reads_1904_workbook_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock.xlsx");
        let rows = format!(
            r#"<row r="1">{}</row><row r="2">{}</row>"#,
            text_cell("A1", "Expiry Date"),
            date_cell("A2", 43835)
        );
        write_xlsx(&path, true, &[("Stock", rows.as_str())]);

        let source = InventorySource::search("stock.xlsx", vec![dir.path().to_path_buf()]);
        let records = load_records(&source).unwrap();
        assert_eq!(records[0].expiry_date, DateValue::Date(ymd(2024, 1, 6)));
    }

    #[test]
    fn test_unreadable_workbook_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock.xlsx");
        std::fs::write(&path, b"this is not a spreadsheet").unwrap();

        match read_workbook(&path) {
            Err(AppError::Parse { path: p, message }) => {
                assert_eq!(p, path);
                assert!(!message.is_empty());
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }
}
