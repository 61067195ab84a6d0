use std::io::Read;

/// Export as read from disk: trimmed headers and one string per cell.
#[derive(Debug)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl RawTable {
    pub(crate) fn column<'a>(&'a self, index: usize) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.iter().map(move |row| row[index].as_str())
    }
}

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let mut row: Vec<String> = record
            .iter()
            .take(headers.len())
            .map(str::to_string)
            .collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}
