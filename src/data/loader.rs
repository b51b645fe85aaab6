use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{
    Column, FoodItem, FoodTable, DEFAULT_EATS, DEFAULT_PRIORITY, NOT_LISTED, UNNAMED_ITEM,
};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by one row per item (the spreadsheet export)
/// * `.json` – `[{ "Food": "...", "Price": 7.49, ... }, ...]`
pub fn load_file(path: &Path) -> Result<FoodTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bytes = match ext.as_str() {
        "csv" | "json" => std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let table = if ext == "csv" {
        parse_csv(&bytes)
    } else {
        parse_json(&bytes)
    };
    table.with_context(|| format!("parsing {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse UTF-8 CSV bytes with a header row into a normalized table.
///
/// Header names are matched case-insensitively; unknown columns are
/// ignored. Short rows are tolerated and rows with every cell blank are
/// skipped.
pub fn parse_csv(bytes: &[u8]) -> Result<FoodTable, LoadError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut index: BTreeMap<Column, usize> = BTreeMap::new();
    for (i, name) in reader.headers()?.iter().enumerate() {
        if let Some(col) = Column::from_header(name) {
            // First occurrence wins on duplicated headers.
            index.entry(col).or_insert(i);
        }
    }

    let mut items = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row = sheet_row(&record, row_no);
        if record.iter().all(str::is_empty) {
            log::debug!("skipping blank CSV row {row}");
            continue;
        }
        let item = normalize_row(row, |col| {
            index.get(&col).map(|&i| record.get(i).unwrap_or(""))
        });
        items.push(item);
    }

    Ok(FoodTable::from_items(items))
}

/// Spreadsheet row number of a record: its starting line, header on line 1.
fn sheet_row(record: &csv::StringRecord, row_no: usize) -> usize {
    record
        .position()
        .map_or(row_no + 2, |pos| pos.line() as usize)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `orient='records'`):
///
/// ```json
/// [
///   { "Food": "Churro", "Price": 5.75, "Park": "Disneyland", "Priority": 1 },
///   ...
/// ]
/// ```
///
/// A column counts as present when any record carries the key; records
/// missing it see an empty cell.
pub fn parse_json(bytes: &[u8]) -> Result<FoodTable, LoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Shape("expected top-level JSON array".to_string()))?;

    let mut rows: Vec<BTreeMap<Column, String>> = Vec::with_capacity(records.len());
    let mut present: BTreeSet<Column> = BTreeSet::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Shape(format!("row {i} is not a JSON object")))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if let Some(col) = Column::from_header(key) {
                present.insert(col);
                cells.entry(col).or_insert_with(|| json_to_cell(val));
            }
        }
        rows.push(cells);
    }

    let items = rows
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            normalize_row(i + 1, |col| {
                present
                    .contains(&col)
                    .then(|| cells.get(&col).map(String::as_str).unwrap_or(""))
            })
        })
        .collect();

    Ok(FoodTable::from_items(items))
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Turn one source row into a [`FoodItem`].
///
/// `row` is the 1-based row number reported in warnings. `cell(col)` yields
/// `None` when the column is absent from the source and `Some(text)`
/// otherwise (possibly empty). Rules:
/// 1. absent Priority / Eats columns take their defaults,
/// 2. blank or non-numeric numeric cells take the column default,
/// 3. absent string columns take the display fallback,
/// 4. blank Park / Location / Food cells take the display fallback while a
///    blank Area stays blank.
pub(crate) fn normalize_row<'a, F>(row: usize, cell: F) -> FoodItem
where
    F: Fn(Column) -> Option<&'a str>,
{
    let cell = |col: Column| cell(col).map(str::trim);

    FoodItem {
        food: display_text(cell(Column::Food), UNNAMED_ITEM),
        price: coerce_price(cell(Column::Price), row),
        category: cell(Column::Category).unwrap_or("").to_string(),
        location: display_text(cell(Column::Location), NOT_LISTED),
        area: cell(Column::Area).unwrap_or(NOT_LISTED).to_string(),
        park: display_text(cell(Column::Park), NOT_LISTED),
        priority: coerce_int(cell(Column::Priority), DEFAULT_PRIORITY, row, Column::Priority),
        eats: coerce_int(cell(Column::Eats), DEFAULT_EATS, row, Column::Eats),
        tried: cell(Column::Tried).is_some_and(parse_flag),
    }
}

fn display_text(cell: Option<&str>, fallback: &str) -> String {
    match cell {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

fn coerce_int(cell: Option<&str>, default: i64, row: usize, col: Column) -> i64 {
    match cell {
        None | Some("") => default,
        Some(s) => parse_int(s).unwrap_or_else(|| {
            log::warn!("row {row}: {col} value '{s}' is not a number, using {default}");
            default
        }),
    }
}

/// Integers, or finite floats truncated toward zero (`"2.0"` → 2).
fn parse_int(s: &str) -> Option<i64> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

fn coerce_price(cell: Option<&str>, row: usize) -> f64 {
    let Some(raw) = cell.filter(|s| !s.is_empty()) else {
        return 0.0;
    };
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            log::warn!("row {row}: Price value '{raw}' is not a number, using 0.00");
            0.0
        }
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "x" | "✓" | "✔"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Food,Price,Category,Location,Area,Park,Priority";

    #[test]
    fn churro_row_gets_defaults() {
        let csv = format!("{HEADER}\nChurro,5.75,Snack,,,Disneyland,1\n");
        let table = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        let churro = &table.items[0];
        assert_eq!(churro.food, "Churro");
        assert_eq!(churro.price, 5.75);
        assert_eq!(churro.location, NOT_LISTED);
        assert_eq!(churro.area, "");
        assert_eq!(churro.priority, 1);
        assert_eq!(churro.eats, DEFAULT_EATS);
        assert!(!churro.tried);
        assert!(table.areas_for_park("Disneyland").is_empty());
    }

    #[test]
    fn non_numeric_cells_fall_back_per_cell() {
        let csv = "Food,Price,Park,Priority,Eats?\n\
                   Pickle,4.49,Disneyland,soon,\n\
                   Corn Soup,$12.99,Disneyland,2.0,0\n\
                   Macaroon,abc,Disneyland,,yes\n";
        let table = parse_csv(csv.as_bytes()).unwrap();

        let got: Vec<(i64, i64, f64)> = table
            .items
            .iter()
            .map(|it| (it.priority, it.eats, it.price))
            .collect();
        assert_eq!(
            got,
            vec![
                (DEFAULT_PRIORITY, DEFAULT_EATS, 4.49),
                (2, 0, 12.99),
                (DEFAULT_PRIORITY, DEFAULT_EATS, 0.0),
            ]
        );
    }

    #[test]
    fn absent_numeric_columns_are_injected() {
        let table = parse_csv(b"Food,Price,Park\nChurro,5.75,Disneyland\n").unwrap();
        let churro = &table.items[0];

        assert_eq!(churro.priority, DEFAULT_PRIORITY);
        assert_eq!(churro.eats, DEFAULT_EATS);
        assert!(!churro.tried);
    }

    #[test]
    fn rows_are_numbered_like_the_spreadsheet() {
        let csv = "Food,Price\nChurro,5.75\nDole Whip,6.49\nPickle,4.49\n";
        let mut reader = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
        let rows: Vec<usize> = reader
            .records()
            .enumerate()
            .map(|(row_no, rec)| sheet_row(&rec.unwrap(), row_no))
            .collect();

        // Header is line 1.
        assert_eq!(rows, vec![2, 3, 4]);
    }

    #[test]
    fn absent_string_columns_are_injected() {
        let csv = "Price,Priority\n3.50,2\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        let it = &table.items[0];

        assert_eq!(it.food, UNNAMED_ITEM);
        assert_eq!(it.location, NOT_LISTED);
        assert_eq!(it.park, NOT_LISTED);
        assert_eq!(it.area, NOT_LISTED);
        assert_eq!(it.category, "");
    }

    #[test]
    fn headers_are_trimmed_and_case_insensitive() {
        let csv = "\u{feff} food , PRICE ,park,Tried,Notes\n🍿 Popcorn Bucket,14.25,Disneyland,TRUE,refillable\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        let it = &table.items[0];

        assert_eq!(it.food, "🍿 Popcorn Bucket");
        assert_eq!(it.price, 14.25);
        assert!(it.tried);
    }

    #[test]
    fn short_and_blank_rows() {
        let csv = format!("{HEADER}\nDole Whip,6.49\n,,,,,,\n");
        let table = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.items[0].park, NOT_LISTED);
        assert_eq!(table.items[0].area, "");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let bytes = b"Food,Price\n\xff\xfe,1\n";
        assert!(matches!(parse_csv(bytes), Err(LoadError::Encoding(_))));
    }

    #[test]
    fn json_records_share_normalization() {
        let json = r#"[
            {"Food": "Mint Julep", "Price": 6.49, "Area": "New Orleans Square", "Park": "Disneyland", "Priority": 2},
            {"Food": "", "Price": "7.50", "Park": "California Adventure", "Eats?": 0},
            {"Food": "Pickle", "Price": 4.49, "Area": null, "Park": "Disneyland", "Priority": null}
        ]"#;
        let table = parse_json(json.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.items[0].priority, 2);
        assert_eq!(table.items[0].eats, DEFAULT_EATS);
        assert_eq!(table.items[1].food, UNNAMED_ITEM);
        assert_eq!(table.items[1].price, 7.5);
        assert_eq!(table.items[1].eats, 0);
        // Area is present in other records, so a missing key is a blank cell.
        assert_eq!(table.items[1].area, "");
        assert_eq!(table.items[2].area, "");
        assert_eq!(table.items[2].priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(
            parse_json(br#"{"Food": "Churro"}"#),
            Err(LoadError::Shape(_))
        ));
        assert!(matches!(parse_json(b"[1, 2]"), Err(LoadError::Shape(_))));
        assert!(matches!(parse_json(b"[{"), Err(LoadError::Json(_))));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("menu.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
