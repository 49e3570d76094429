use crate::errors::{AppError, AppResult};
use crate::models::{AttendanceRow, ExportResponse};
use crate::record::display_or_missing;
use std::path::Path;

pub const TODAY_HEADERS: [&str; 5] = ["ID", "Name", "Status", "In", "Out"];
pub const TODAY_FILE_NAME: &str = "attendance-today.csv";

/// Renders a table with every field quoted and rows joined by `\n`, without
/// a trailing newline.
pub fn csv_string(headers: &[&str], rows: &[Vec<String>]) -> AppResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| AppError::Io(error.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|error| AppError::Internal(error.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

pub fn today_row(row: &AttendanceRow) -> Vec<String> {
    vec![
        row.id.clone(),
        row.name.clone(),
        row.status.to_string(),
        display_or_missing(row.in_time),
        display_or_missing(row.out_time),
    ]
}

/// Writes a CSV file into `dir`, creating it if needed. The file stem is
/// sanitized and the extension forced to `.csv`.
pub fn export_csv(dir: &Path, file_name: &str, headers: &[&str], rows: &[Vec<String>]) -> AppResult<ExportResponse> {
    std::fs::create_dir_all(dir)?;

    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
    let output_path = dir.join(format!("{}.csv", sanitize_filename_component(stem)));
    if !output_path.starts_with(dir) {
        return Err(AppError::Io("Resolved export path escaped export directory".to_string()));
    }

    let contents = csv_string(headers, rows)?;
    std::fs::write(&output_path, contents)?;
    tracing::info!(path = %output_path.display(), rows = rows.len(), "csv exported");
    Ok(ExportResponse {
        path: output_path.to_string_lossy().to_string(),
    })
}

fn sanitize_filename_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    let candidate: String = out.trim_matches('_').chars().take(120).collect();
    if candidate.is_empty() {
        "export".to_string()
    } else {
        candidate
    }
}
