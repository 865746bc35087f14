use std::fs::File;
use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};
use log::{error, info};
use serde::Deserialize;

/// One row of the institution list.
#[derive(Debug, Deserialize, Clone)]
pub struct InputRecord {
    #[serde(
        rename = "School Name",
        alias = "school name",
        alias = "School",
        alias = "school"
    )]
    pub school: String,
}

/// Loads the institution list from CSV, or from a spreadsheet when the
/// extension says so. Unreadable rows are logged and dropped rather than
/// failing the whole load.
pub fn load_records<P: AsRef<Path>>(filename: P) -> Vec<InputRecord> {
    let path_ref = filename.as_ref();

    if !path_ref.exists() {
        error!("Input file {:?} does not exist.", path_ref);
        return Vec::new();
    }

    let is_excel = path_ref
        .extension()
        .map_or(false, |ext| ext == "xlsx" || ext == "xls");

    if is_excel {
        return load_excel(path_ref);
    }

    load_csv(path_ref)
}

fn load_csv(path: &Path) -> Vec<InputRecord> {
    let mut records = Vec::new();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            error!("Could not open CSV file: {}", e);
            return records;
        }
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    for result in rdr.deserialize() {
        match result {
            Ok(record) => {
                let record: InputRecord = record;
                if !record.school.is_empty() {
                    records.push(record);
                }
            }
            Err(e) => {
                error!("Error parsing CSV record: {}", e);
            }
        }
    }
    info!("Loaded {} schools from CSV {:?}", records.len(), path);
    records
}

fn load_excel(path: &Path) -> Vec<InputRecord> {
    let mut records = Vec::new();
    let mut excel: Xlsx<_> = match open_workbook(path) {
        Ok(wb) => wb,
        Err(e) => {
            error!("Could not open Excel file: {}", e);
            return records;
        }
    };

    let worksheets = excel.worksheets();
    if let Some((_name, range)) = worksheets.first() {
        let mut school_idx = None;

        for (row_idx, row) in range.rows().enumerate() {
            if row_idx == 0 {
                for (col_idx, cell) in row.iter().enumerate() {
                    let header = cell.to_string().to_lowercase();
                    if header.contains("school") {
                        school_idx = Some(col_idx);
                    }
                }

                if school_idx.is_none() {
                    error!("Excel header missing 'School Name' column");
                    return records;
                }
                continue;
            }

            let school = school_idx
                .and_then(|i| row.get(i))
                .map(|c| c.to_string().trim().to_string())
                .unwrap_or_default();

            if !school.is_empty() {
                records.push(InputRecord { school });
            }
        }
    }

    info!("Loaded {} schools from Excel {:?}", records.len(), path);
    records
}
