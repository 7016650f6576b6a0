use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, StampcalError};
use crate::image::{Image, Provenance};

/// One raw catalog row: column name to cell text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogRow {
    /// 0-based position of the row in its source table.
    pub index: usize,
    fields: HashMap<String, String>,
}

impl CatalogRow {
    pub fn new(index: usize, fields: HashMap<String, String>) -> Self {
        Self { index, fields }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<K, V>(index: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();
        Self { index, fields }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl ToString) {
        self.fields.insert(column.into(), value.to_string());
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        self.fields.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn get_str(&self, column: &str) -> Result<&str> {
        self.fields
            .get(column)
            .map(|s| s.trim())
            .ok_or_else(|| StampcalError::MissingField(column.to_string()))
    }

    /// Present and non-blank, otherwise `None`.
    pub fn get_opt_str(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn get_f64(&self, column: &str) -> Result<f64> {
        let raw = self.get_str(column)?;
        let value: f64 = raw
            .parse()
            .map_err(|_| StampcalError::malformed(column, format!("not a number: {raw:?}")))?;
        if !value.is_finite() {
            return Err(StampcalError::malformed(column, format!("non-finite value {raw}")));
        }
        Ok(value)
    }

    /// Accepts `1/0`, `true/false` and `t/f` in any case.
    pub fn get_bool(&self, column: &str) -> Result<bool> {
        let raw = self.get_str(column)?;
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "t" => Ok(true),
            "0" | "false" | "f" => Ok(false),
            _ => Err(StampcalError::malformed(column, format!("not a boolean: {raw:?}"))),
        }
    }

    /// `run`/`camcol`/`field` columns rounded to integers.
    pub fn provenance(&self) -> Result<Provenance> {
        Ok(Provenance {
            run: self.get_f64("run")?.round() as i64,
            camcol: self.get_f64("camcol")?.round() as i64,
            field: self.get_f64("field")?.round() as i64,
        })
    }
}

/// A table of named columns, one row per candidate source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawCatalog {
    pub columns: Vec<String>,
    pub rows: Vec<CatalogRow>,
}

impl RawCatalog {
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let reader = csv::Reader::from_path(path)?;
        let catalog = Self::from_csv(reader)?;
        info!(
            path = %path.display(),
            rows = catalog.len(),
            "Loaded raw catalog"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let rows = reader
            .records()
            .enumerate()
            .map(|(index, record)| {
                let record = record?;
                let fields = columns
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                Ok(CatalogRow::new(index, fields))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only rows cut from the same exposure as one of `images`.
    ///
    /// Row indices are preserved so errors still point at the source table.
    pub fn matching_provenance(&self, images: &[Image]) -> Result<RawCatalog> {
        let wanted: Vec<Provenance> = images.iter().map(|img| img.provenance).collect();
        let mut rows = Vec::new();
        for row in &self.rows {
            let provenance = row.provenance().map_err(|e| e.in_row(row.index))?;
            if wanted.contains(&provenance) {
                rows.push(row.clone());
            }
        }
        debug!(
            kept = rows.len(),
            total = self.rows.len(),
            "Filtered catalog by provenance"
        );
        Ok(RawCatalog {
            columns: self.columns.clone(),
            rows,
        })
    }
}

/// Read `cat-<stamp_id>.csv` from `dir`.
pub fn load_catalog(dir: &Path, stamp_id: &str) -> Result<RawCatalog> {
    RawCatalog::from_csv_path(&dir.join(format!("cat-{stamp_id}.csv")))
}
