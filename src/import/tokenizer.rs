use std::collections::HashMap;

use crate::error::ImportError;

/// One data line, keyed by header name. Missing trailing fields map to
/// empty strings; every value is whitespace-trimmed.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Tokenize raw CSV text (uploaded file or pasted content). The first
/// non-empty line supplies the header names; quoted fields, doubled-quote
/// escapes and embedded commas are honored. Empty lines are discarded.
pub fn tokenize(text: &str) -> Result<CsvDocument, ImportError> {
    let clean = text.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(clean.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<RawRow> = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| ImportError::MalformedInput(e.to_string()))?;

        // Whitespace-only lines survive the csv reader as a single empty field.
        if record.len() <= 1 && record.get(0).unwrap_or("").is_empty() {
            continue;
        }

        if headers.is_empty() {
            headers = record.iter().map(|h| h.to_string()).collect();
            continue;
        }

        let mut row = RawRow::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            row.insert(name.clone(), record.get(i).unwrap_or("").to_string());
        }
        rows.push(row);
    }

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::MalformedInput(
            "could not parse a header row".to_string(),
        ));
    }

    Ok(CsvDocument { headers, rows })
}
