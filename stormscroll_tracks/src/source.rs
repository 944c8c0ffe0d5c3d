// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::Cell;
use core::fmt;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;

use crate::HeatRecord;

/// Why a single table could not be loaded.
#[derive(Debug)]
pub enum TableError {
    /// The source has no table under this key.
    NotFound {
        /// Table key.
        key: String,
    },
    /// Reading the table failed.
    Io {
        /// Table key.
        key: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The table was read but is not a list of heat records.
    Parse {
        /// Table key.
        key: String,
        /// Underlying error.
        source: serde_json::Error,
    },
}

impl TableError {
    /// Key of the table that failed.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key } | Self::Io { key, .. } | Self::Parse { key, .. } => key,
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { key } => write!(f, "table `{key}` not found"),
            Self::Io { key, source } => write!(f, "failed to read table `{key}`: {source}"),
            Self::Parse { key, source } => write!(f, "failed to parse table `{key}`: {source}"),
        }
    }
}

impl core::error::Error for TableError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Fetches heat tables by key.
///
/// Loads run on the host's executor; nothing here spawns or blocks on a
/// runtime.
#[allow(
    async_fn_in_trait,
    reason = "sources are driven on a single-threaded executor and need no Send bound"
)]
pub trait TableSource {
    /// Loads and parses the table stored under `key`.
    async fn load_table(&self, key: &str) -> Result<Vec<HeatRecord>, TableError>;
}

impl<S: TableSource + ?Sized> TableSource for &S {
    async fn load_table(&self, key: &str) -> Result<Vec<HeatRecord>, TableError> {
        (**self).load_table(key).await
    }
}

#[derive(Clone, Debug)]
enum Table {
    Rows(Vec<HeatRecord>),
    Json(String),
}

/// An in-memory source, for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryTableSource {
    tables: HashMap<String, Table>,
    loads: Cell<usize>,
}

impl MemoryTableSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores parsed rows under `key`.
    pub fn insert(&mut self, key: impl Into<String>, rows: Vec<HeatRecord>) {
        self.tables.insert(key.into(), Table::Rows(rows));
    }

    /// Stores raw JSON under `key`; it is parsed on every load.
    pub fn insert_json(&mut self, key: impl Into<String>, json: impl Into<String>) {
        self.tables.insert(key.into(), Table::Json(json.into()));
    }

    /// Removes the table under `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.tables.remove(key).is_some()
    }

    /// Number of `load_table` calls so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

impl TableSource for MemoryTableSource {
    async fn load_table(&self, key: &str) -> Result<Vec<HeatRecord>, TableError> {
        self.loads.set(self.loads.get() + 1);
        match self.tables.get(key) {
            None => Err(TableError::NotFound { key: key.to_owned() }),
            Some(Table::Rows(rows)) => Ok(rows.clone()),
            Some(Table::Json(json)) => serde_json::from_str(json).map_err(|source| TableError::Parse {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

/// Reads `<dir>/<key>.json` files holding arrays of heat records.
#[derive(Clone, Debug)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    /// Creates a source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the table `key` is read from.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl TableSource for JsonDirSource {
    async fn load_table(&self, key: &str) -> Result<Vec<HeatRecord>, TableError> {
        let path = self.path_for(key);
        let bytes = std::fs::read(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => TableError::NotFound { key: key.to_owned() },
            _ => TableError::Io {
                key: key.to_owned(),
                source,
            },
        })?;
        serde_json::from_slice(&bytes).map_err(|source| TableError::Parse {
            key: key.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use pollster::block_on;

    use super::{JsonDirSource, MemoryTableSource, TableError, TableSource};
    use crate::HeatRecord;

    #[test]
    fn memory_source_serves_rows_and_counts_loads() {
        let mut src = MemoryTableSource::new();
        src.insert("ida_a", vec![HeatRecord::new(-90.0, 29.0, 240.0)]);
        src.insert_json("ida_b", "[{\"lon\":1,\"lat\":2,\"CMI\":3}]");
        src.insert_json("ida_c", "{not json");

        assert_eq!(block_on(src.load_table("ida_a")).unwrap().len(), 1);
        assert_eq!(
            block_on(src.load_table("ida_b")).unwrap(),
            [HeatRecord::new(1.0, 2.0, 3.0)]
        );
        assert!(matches!(
            block_on(src.load_table("ida_c")),
            Err(TableError::Parse { .. })
        ));
        let missing = block_on(src.load_table("ida_d")).unwrap_err();
        assert_eq!(missing.key(), "ida_d");
        assert_eq!(missing.to_string(), "table `ida_d` not found");
        assert_eq!(src.load_count(), 4);
    }

    #[test]
    fn json_dir_source_reports_missing_files_as_not_found() {
        let dir = std::env::temp_dir().join(format!("stormscroll-tracks-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("ian_x.json"), "[{\"lon\":-82,\"lat\":26,\"CMI\":210}]").unwrap();

        let src = JsonDirSource::new(&dir);
        let rows = block_on(src.load_table("ian_x")).unwrap();
        assert_eq!(rows, [HeatRecord::new(-82.0, 26.0, 210.0)]);
        assert!(matches!(
            block_on(src.load_table("ian_missing")),
            Err(TableError::NotFound { .. })
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
