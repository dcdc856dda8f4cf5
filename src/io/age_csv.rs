use anyhow::Context;
use tracing::debug;

use crate::error::Error;
use crate::io::column_code::ColumnCode;

/// Default location of the population-by-age extract.
pub const DEFAULT_AGE_CSV: &str = "/data/ons/UK_population.csv";

/// A population count for one sex and single year of age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeCount {
    pub code: ColumnCode,
    pub count: u64,
}

/// Read the per-age population counts from the first data row of a CSV
/// whose headers look like `f_98_<age>` / `m_98_<age>`.
///
/// Other columns are ignored, as are cells that do not begin with a digit.
/// The first row must have exactly as many fields as the header. Rows
/// after the first are never read. A header with no data row yields
/// an empty list.
pub fn read_age_counts<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<AgeCount>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV header")?.clone();
    anyhow::ensure!(!headers.is_empty(), "population CSV has no header row");

    let mut record = csv::StringRecord::new();
    if !rdr.read_record(&mut record).context("Failed to read first CSV row")? {
        return Ok(Vec::new());
    }
    anyhow::ensure!(
        record.len() == headers.len(),
        "first row has {} fields but the header has {}",
        record.len(),
        headers.len()
    );

    let mut counts = Vec::new();
    for (column, value) in headers.iter().zip(record.iter()) {
        let Some(code) = ColumnCode::parse(column) else { continue };
        if let Some(count) = parse_count(column, value)? {
            debug!(column, count, "matched population column");
            counts.push(AgeCount { code, count });
        }
    }
    Ok(counts)
}

pub fn load_age_counts_csv(path: impl AsRef<std::path::Path>) -> anyhow::Result<Vec<AgeCount>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open population CSV: {}", path.display()))?;
    read_age_counts(file).with_context(|| format!("Failed to parse population CSV: {}", path.display()))
}

/// `None` when the cell doesn't start with a digit.
fn parse_count(column: &str, value: &str) -> Result<Option<u64>, Error> {
    if !value.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(None);
    }
    let digits = value.trim_end();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedCount { column: column.to_string(), value: value.to_string() });
    }
    // all digits, so the only way to fail is a value past u64::MAX
    digits
        .parse::<u64>()
        .map(Some)
        .map_err(|_| Error::CountOverflow(format!("column {:?}", column)))
}
