//! Cache of term-set sizes keyed by `(n, L)`.
//!
//! Generating a term set is the expensive part of provisioning. The sizes
//! it produces are all a deployment needs in order to budget auxiliary
//! states, so the table keeps only [`TermSetSummary`] values and can be
//! persisted with [`WriterTo`]/[`ReaderFrom`].
//!
//! Wire format, little-endian:
//!
//! ```text
//! table   := count:u64 summary*        (sorted by (qubits, depth))
//! summary := qubits:u64 depth:u64 size:u64{depth} total:u64
//! ```

use std::{
    collections::hash_map::Entry,
    io::{Error as IoError, ErrorKind, Read, Result as IoResult, Write},
};

use auxqhe_utils::{Map, ReaderFrom, WriterTo};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::{
    config::GeneratorConfig,
    error::Result,
    term_set::{TermSet, TermSetSummary},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TermSetTable {
    entries: Map<(usize, usize), TermSetSummary>,
    config: GeneratorConfig,
}

impl TermSetTable {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            entries: Map::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn get(&self, qubits: usize, depth: usize) -> Option<&TermSetSummary> {
        self.entries.get(&(qubits, depth))
    }

    pub fn insert(&mut self, summary: TermSetSummary) -> Option<TermSetSummary> {
        self.entries.insert((summary.qubits, summary.depth), summary)
    }

    /// Cached summary for `(qubits, depth)`, generating the term set on a
    /// miss. Generation errors are returned and nothing is cached.
    pub fn get_or_generate(&mut self, qubits: usize, depth: usize) -> Result<&TermSetSummary> {
        match self.entries.0.entry((qubits, depth)) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let summary: TermSetSummary = TermSet::generate_with(&self.config, qubits, depth)?.summary();
                debug!(qubits, depth, total = summary.total_auxiliary_states, "term-set table miss");
                Ok(e.insert(summary))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summaries ordered by `(qubits, depth)`.
    pub fn summaries(&self) -> Vec<&TermSetSummary> {
        let mut all: Vec<&TermSetSummary> = self.entries.iter().map(|(_, s)| s).collect();
        all.sort_by_key(|s| (s.qubits, s.depth));
        all
    }
}

fn invalid(msg: String) -> IoError {
    IoError::new(ErrorKind::InvalidData, msg)
}

impl WriterTo for TermSetSummary {
    fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_u64::<LittleEndian>(self.qubits as u64)?;
        writer.write_u64::<LittleEndian>(self.depth as u64)?;
        for &size in &self.layer_sizes {
            writer.write_u64::<LittleEndian>(size)?;
        }
        writer.write_u64::<LittleEndian>(self.total_auxiliary_states)?;
        Ok(())
    }
}

impl ReaderFrom for TermSetSummary {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> IoResult<()> {
        let qubits: usize = reader.read_u64::<LittleEndian>()? as usize;
        let depth: usize = reader.read_u64::<LittleEndian>()? as usize;
        let mut layer_sizes: Vec<u64> = Vec::new();
        for _ in 0..depth {
            layer_sizes.push(reader.read_u64::<LittleEndian>()?);
        }
        let total: u64 = reader.read_u64::<LittleEndian>()?;

        let expected: Option<u64> = layer_sizes
            .iter()
            .try_fold(0u64, |acc, &s| acc.checked_add(s))
            .and_then(|sum| sum.checked_mul(qubits as u64));
        if expected != Some(total) {
            return Err(invalid(format!(
                "summary for n={} L={} records {} auxiliary states, layer sizes imply {:?}",
                qubits, depth, total, expected
            )));
        }

        self.qubits = qubits;
        self.depth = depth;
        self.layer_sizes = layer_sizes;
        self.total_auxiliary_states = total;
        Ok(())
    }
}

impl WriterTo for TermSetTable {
    fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        let summaries: Vec<&TermSetSummary> = self.summaries();
        writer.write_u64::<LittleEndian>(summaries.len() as u64)?;
        for s in summaries {
            s.write_to(writer)?;
        }
        Ok(())
    }
}

/// Reads entries into the table, keeping its current config. Entries with
/// a key already present are overwritten.
impl ReaderFrom for TermSetTable {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> IoResult<()> {
        let count: u64 = reader.read_u64::<LittleEndian>()?;
        let mut entries: Map<(usize, usize), TermSetSummary> = Map::new();
        for _ in 0..count {
            let mut s: TermSetSummary = TermSetSummary::default();
            s.read_from(reader)?;
            entries.insert((s.qubits, s.depth), s);
        }
        entries.0.into_iter().for_each(|(k, s)| {
            self.entries.insert(k, s);
        });
        Ok(())
    }
}
