use crate::errors::{AppError, ResultExt};
use crate::models::{ClientRecord, EnrichedRecord, RecordTable, LATITUDE, LONGITUDE};
use std::io::{Read, Write};
use std::path::Path;

/// Load the roster from a CSV file with a header row.
///
/// Short rows are tolerated; cells past the end of a row are simply absent.
/// `limit` caps how many data rows are read.
pub fn load_records(path: &Path, limit: Option<usize>) -> Result<RecordTable, AppError> {
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::InputError(e.to_string()))
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let table =
        read_records(file, limit).with_context(|| format!("Failed to read {}", path.display()))?;

    tracing::info!(
        "Loaded {} rows from {}",
        table.records.len(),
        path.display()
    );
    Ok(table)
}

pub fn read_records<R: Read>(reader: R, limit: Option<usize>) -> Result<RecordTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        if limit.is_some_and(|max| records.len() >= max) {
            break;
        }
        let row = row?;
        let record: ClientRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        records.push(record);
    }

    Ok(RecordTable { headers, records })
}

/// Column order for the enriched table: input headers, then latitude and longitude.
pub fn output_headers(input_headers: &[String]) -> Vec<String> {
    let mut headers: Vec<String> = input_headers
        .iter()
        .filter(|h| !is_coordinate_column(h))
        .cloned()
        .collect();
    headers.push(LATITUDE.to_string());
    headers.push(LONGITUDE.to_string());
    headers
}

/// Write accepted rows to `path`. The header row is written even when there are no rows.
pub fn write_records(
    path: &Path,
    input_headers: &[String],
    rows: &[EnrichedRecord],
) -> Result<(), AppError> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_to(file, input_headers, rows)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Saved {} valid rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_to<W: Write>(
    writer: W,
    input_headers: &[String],
    rows: &[EnrichedRecord],
) -> Result<(), AppError> {
    let headers = output_headers(input_headers);
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(&headers).map_err(output_error)?;

    // Input positions of the carried-over columns, so repeated names keep their own cells.
    let carried: Vec<(usize, &str)> = input_headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !is_coordinate_column(name))
        .map(|(index, name)| (index, name.as_str()))
        .collect();

    for enriched in rows {
        let latitude = enriched.latitude.to_string();
        let longitude = enriched.longitude.to_string();
        let cells = carried
            .iter()
            .map(|(index, name)| enriched.record.value_at(*index, name).unwrap_or(""))
            .chain([latitude.as_str(), longitude.as_str()]);
        writer.write_record(cells).map_err(output_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn is_coordinate_column(name: &str) -> bool {
    name == LATITUDE || name == LONGITUDE
}

fn output_error(err: csv::Error) -> AppError {
    AppError::OutputError(err.to_string())
}
