//! Where new constituents and the constituent table go.
//!
//! The engine hands every new constituent to a [`ConstituentSink`] as soon
//! as it is registered, followed by a fresh snapshot of the report. Sinks
//! treat the report as an opaque record.

use std::fs;
use std::path::PathBuf;

use mtx::{format_matrix, Matrix};
use tracing::debug;

use crate::error::{ChopError, Result};
use crate::report::ChopReport;

/// Receiver of constituent generators and table snapshots.
pub trait ConstituentSink {
    /// Store the canonical generators of constituent `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ChopError::Persist`] if the write fails.
    fn write_constituent(&mut self, name: &str, gens: &[Matrix]) -> Result<()>;

    /// Store the current constituent table.
    ///
    /// # Errors
    ///
    /// Returns [`ChopError::Persist`] if the write fails.
    fn write_table(&mut self, report: &ChopReport) -> Result<()>;
}

/// Keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// `(name, generators)` in registration order.
    pub constituents: Vec<(String, Vec<Matrix>)>,
    /// Latest table snapshot.
    pub table: Option<ChopReport>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generators stored under `name`.
    pub fn generators(&self, name: &str) -> Option<&[Matrix]> {
        self.constituents
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, g)| g.as_slice())
    }
}

impl ConstituentSink for MemorySink {
    fn write_constituent(&mut self, name: &str, gens: &[Matrix]) -> Result<()> {
        self.constituents.push((name.to_string(), gens.to_vec()));
        Ok(())
    }

    fn write_table(&mut self, report: &ChopReport) -> Result<()> {
        self.table = Some(report.clone());
        Ok(())
    }
}

/// Writes `<dir>/<module><constituent>.<i>` text matrices and
/// `<dir>/<module>.cfinfo.json`.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    module: String,
}

impl FileSink {
    /// Sink for module `module` writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>, module: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            module: module.into(),
        }
    }

    /// Path of generator `index` (1-based) of constituent `name`.
    pub fn generator_path(&self, name: &str, index: usize) -> PathBuf {
        self.dir.join(format!("{}{}.{}", self.module, name, index))
    }

    /// Path of the table file.
    pub fn table_path(&self) -> PathBuf {
        self.dir.join(format!("{}.cfinfo.json", self.module))
    }
}

impl ConstituentSink for FileSink {
    fn write_constituent(&mut self, name: &str, gens: &[Matrix]) -> Result<()> {
        for (i, g) in gens.iter().enumerate() {
            let path = self.generator_path(name, i + 1);
            fs::write(&path, format_matrix(g))
                .map_err(|e| ChopError::Persist(format!("{}: {e}", path.display())))?;
            debug!(path = %path.display(), "wrote generator");
        }
        Ok(())
    }

    fn write_table(&mut self, report: &ChopReport) -> Result<()> {
        let path = self.table_path();
        let json = report
            .to_json()
            .map_err(|e| ChopError::Persist(format!("{}: {e}", path.display())))?;
        fs::write(&path, json)
            .map_err(|e| ChopError::Persist(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_paths() {
        let s = FileSink::new("/tmp/out", "m11");
        assert_eq!(s.generator_path("10a", 2), PathBuf::from("/tmp/out/m1110a.2"));
        assert_eq!(s.table_path(), PathBuf::from("/tmp/out/m11.cfinfo.json"));
    }

    #[test]
    fn memory_sink_keeps_order() {
        let f = std::sync::Arc::new(mtx::Field::new(3).unwrap());
        let mut s = MemorySink::new();
        s.write_constituent("1a", &[Matrix::identity(f.clone(), 1)])
            .unwrap();
        s.write_constituent("2a", &[Matrix::identity(f, 2)]).unwrap();
        assert_eq!(s.constituents[1].0, "2a");
        assert_eq!(s.generators("1a").unwrap()[0].rows(), 1);
        assert!(s.generators("3a").is_none());
    }
}
