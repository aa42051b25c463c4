use crate::utils::*;
use rayon::prelude::*;
use std::io::Read;
use std::path::Path;
pub mod chart;
pub mod dashboard;
pub mod pond_dash;
pub mod pond_plot;
pub mod utils;

// constants
pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
pub const DATE_COLUMN: &str = "Date";
pub const POND_COLUMN: &str = "PondLevel";
pub const RAIN_COLUMN: &str = "Rain";
pub const DEFAULT_CSV: &str = "FarmData.csv";
pub const DEFAULT_HTML: &str = "graph.html";
pub const DEFAULT_IP: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_ASSETS: &str = "assets";
pub const DEFAULT_WINDOW_DAYS: i64 = 30;
pub const MAX_WINDOW_DAYS: i64 = 36_500;
pub const DEFAULT_RADIO_VALUE: &str = "Secondary";

/// The readings table, as read from the csv.
/// Columns are kept exactly as found in the header,
/// the required ones are only looked up when the chart is built.
#[derive(Debug, Clone)]
pub struct ReadingTable {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl ReadingTable {
    /// Read the table from a csv file with a header row.
    /// No schema validation beyond what the csv parser enforces,
    /// i.e., all rows must have as many fields as the header.
    pub fn from_csv<P>(fin: P) -> Result<ReadingTable, PondError>
    where
        P: AsRef<Path>,
    {
        let fin = fin.as_ref();
        if !fin.is_file() {
            return Err(PondError::FileNotFound(fin.to_path_buf()));
        }
        let file = std::fs::File::open(fin)?;
        let table = ReadingTable::from_reader(file)?;
        log::info!(
            "loaded {} rows and {} columns from {}",
            table.len(),
            table.headers.len(),
            fin.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<ReadingTable, PondError> {
        let mut reader = csv::Reader::from_reader(rdr);
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_owned()).collect();
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(ReadingTable { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Raw cells of the named column.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, PondError> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PondError::MissingColumn(name.to_owned()))?;
        Ok(self
            .records
            .iter()
            .map(|r| r.get(idx).unwrap_or(""))
            .collect())
    }

    /// Cells of the named column parsed as f64, NAN where missing or invalid.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, PondError> {
        let cells = self.column(name)?;
        Ok(cells.par_iter().map(|c| parse_cell(c)).collect())
    }
}

/// The three series plotted on the dashboard.
/// Dates are kept as written in the csv, plotly parses them.
#[derive(Debug, Clone, PartialEq)]
pub struct PondSeries {
    pub date: Vec<String>,
    pub pond_level: Vec<f64>,
    pub rain: Vec<f64>,
}

impl PondSeries {
    pub fn from_table(table: &ReadingTable) -> Result<PondSeries, PondError> {
        let date = table
            .column(DATE_COLUMN)?
            .into_iter()
            .map(|d| d.trim().to_owned())
            .collect();
        let pond_level = table.numeric_column(POND_COLUMN)?;
        let rain = table.numeric_column(RAIN_COLUMN)?;
        Ok(PondSeries {
            date,
            pond_level,
            rain,
        })
    }
}
