//! Load mortgage definitions from CSV
//!
//! Expected columns: `Label,Amount,Duration,Periods,Rates`. Periods and
//! rates are `;`-separated lists; an empty duration means 360 months.

use csv::Reader;
use std::path::Path;

use crate::amortization::{MortgageTerms, DEFAULT_DURATION_MONTHS};
use crate::error::{MortgageError, Result};

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Amount")]
    amount: u64,
    #[serde(rename = "Duration")]
    duration: Option<u32>,
    #[serde(rename = "Periods")]
    periods: String,
    #[serde(rename = "Rates")]
    rates: String,
}

impl CsvRow {
    fn to_terms(self) -> Result<MortgageTerms> {
        let periods = parse_list::<u32>(&self.periods, &self.label, "period")?;
        let rates = parse_list::<f64>(&self.rates, &self.label, "rate")?;

        Ok(MortgageTerms::new(periods, rates, self.amount)
            .with_duration(self.duration.unwrap_or(DEFAULT_DURATION_MONTHS))
            .with_label(self.label))
    }
}

fn parse_list<T: std::str::FromStr>(field: &str, label: &str, what: &str) -> Result<Vec<T>> {
    field
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| MortgageError::Parse(format!("{}: invalid {} '{}'", label, what, s)))
        })
        .collect()
}

/// Load all mortgage definitions from a CSV file
pub fn load_terms<P: AsRef<Path>>(path: P) -> Result<Vec<MortgageTerms>> {
    let reader = Reader::from_path(path)?;
    read_terms(reader)
}

/// Load mortgage definitions from any reader
pub fn load_terms_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<MortgageTerms>> {
    read_terms(Reader::from_reader(reader))
}

fn read_terms<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<MortgageTerms>> {
    let mut terms = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        terms.push(row.to_terms()?);
    }
    log::debug!("loaded {} mortgage definitions", terms.len());
    Ok(terms)
}
