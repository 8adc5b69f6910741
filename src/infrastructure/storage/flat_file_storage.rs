//! Flat-file persistence for the market store

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::market_store::MarketStore;
use super::record_parser::{self, COMPETITORS_HEADER, HISTORY_HEADER, PRODUCTS_HEADER, SALES_HEADER};
use crate::domain::ports::{CatalogProvider, HistorySink};
use crate::shared::errors::StoreError;

pub const PRODUCTS_FILE: &str = "products.csv";
pub const SALES_FILE: &str = "sales.csv";
pub const COMPETITORS_FILE: &str = "competitors.csv";
pub const HISTORY_FILE: &str = "price_history.csv";

/// Counts of what a load kept and skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub products: usize,
    pub sales: usize,
    pub quotes: usize,
    pub history: usize,
    pub skipped: usize,
}

/// Reads and writes the four store files of a data directory
pub struct FlatFileStorage {
    data_dir: PathBuf,
}

impl FlatFileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every file; missing files count as empty, malformed lines are skipped
    pub fn load(&self) -> Result<(MarketStore, LoadSummary), StoreError> {
        let mut store = MarketStore::new();
        let mut summary = LoadSummary::default();

        for line in self.read_records(PRODUCTS_FILE, &mut summary)? {
            match record_parser::parse_product(&line.text) {
                Ok(product) => match store.add_product(product) {
                    Ok(_) => summary.products += 1,
                    Err(err) => summary.skip(PRODUCTS_FILE, line.number, &err.to_string()),
                },
                Err(err) => summary.skip(PRODUCTS_FILE, line.number, &err.to_string()),
            }
        }

        for line in self.read_records(SALES_FILE, &mut summary)? {
            match record_parser::parse_sale(&line.text) {
                Ok(sale) => {
                    store.restore_sale(sale);
                    summary.sales += 1;
                }
                Err(err) => summary.skip(SALES_FILE, line.number, &err.to_string()),
            }
        }

        for line in self.read_records(COMPETITORS_FILE, &mut summary)? {
            match record_parser::parse_quote(&line.text) {
                Ok(quote) => {
                    store.add_quote(quote);
                    summary.quotes += 1;
                }
                Err(err) => summary.skip(COMPETITORS_FILE, line.number, &err.to_string()),
            }
        }

        for line in self.read_records(HISTORY_FILE, &mut summary)? {
            match record_parser::parse_history(&line.text) {
                Ok(entry) => {
                    store.restore_history(entry);
                    summary.history += 1;
                }
                Err(err) => summary.skip(HISTORY_FILE, line.number, &err.to_string()),
            }
        }

        info!(
            "Loaded {} products, {} sales, {} competitor quotes, {} history entries from {} ({} skipped)",
            summary.products,
            summary.sales,
            summary.quotes,
            summary.history,
            self.data_dir.display(),
            summary.skipped
        );
        Ok((store, summary))
    }

    /// Write every file, replacing previous contents
    pub fn save(&self, store: &MarketStore) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Io {
            path: self.data_dir.display().to_string(),
            source,
        })?;

        self.write_records(
            PRODUCTS_FILE,
            PRODUCTS_HEADER,
            store.get_all().iter().map(record_parser::format_product),
        )?;
        self.write_records(
            SALES_FILE,
            SALES_HEADER,
            store.sales().iter().map(record_parser::format_sale),
        )?;
        self.write_records(
            COMPETITORS_FILE,
            COMPETITORS_HEADER,
            store.quotes().iter().map(record_parser::format_quote),
        )?;
        self.write_records(
            HISTORY_FILE,
            HISTORY_HEADER,
            store.history().iter().map(record_parser::format_history),
        )?;

        info!("Saved store to {}", self.data_dir.display());
        Ok(())
    }

    /// Lines after the header; lines that are not valid UTF-8 are skipped here
    fn read_records(&self, file: &str, summary: &mut LoadSummary) -> Result<Vec<RecordLine>, StoreError> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read(&path).map_err(|source| io_error(&path, source))?;

        let mut records = Vec::new();
        for (index, bytes) in content.split(|b| *b == b'\n').enumerate().skip(1) {
            let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
            match std::str::from_utf8(bytes) {
                Ok(text) if text.trim().is_empty() => {}
                Ok(text) => records.push(RecordLine {
                    number: index + 1,
                    text: text.to_string(),
                }),
                Err(err) => summary.skip(file, index + 1, &format!("not valid UTF-8: {}", err)),
            }
        }
        Ok(records)
    }

    fn write_records<I>(&self, file: &str, header: &str, lines: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = String>,
    {
        let path = self.data_dir.join(file);
        let handle = fs::File::create(&path).map_err(|source| io_error(&path, source))?;
        let mut writer = BufWriter::new(handle);

        writeln!(writer, "{}", header).map_err(|source| io_error(&path, source))?;
        for line in lines {
            writeln!(writer, "{}", line).map_err(|source| io_error(&path, source))?;
        }
        writer.flush().map_err(|source| io_error(&path, source))
    }
}

struct RecordLine {
    number: usize,
    text: String,
}

impl LoadSummary {
    fn skip(&mut self, file: &str, line: usize, reason: &str) {
        warn!("Skipping {}:{}: {}", file, line, reason);
        self.skipped += 1;
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
