//! Reading the two JSON datasets into record sequences.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use memmap2::Mmap;
use serde_json::Value;
use simi_types::LexicalRecord;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_FORWARD_SOURCE: &str = "quechua_espanol.json";
pub const DEFAULT_REVERSE_SOURCE: &str = "espanol_quechua.json";

/// Strategy for reading a dataset file before decoding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file and decode straight from the mapping.
    #[default]
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

impl LoadMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Some(LoadMode::Mmap),
            "owned" => Some(LoadMode::Owned),
            _ => None,
        }
    }
}

/// Where the two datasets live and how to read them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DictionarySources {
    /// Quechua → Spanish records.
    pub forward: PathBuf,
    /// Spanish → Quechua records.
    pub reverse: PathBuf,
    pub mode: LoadMode,
}

impl DictionarySources {
    pub fn new(forward: impl Into<PathBuf>, reverse: impl Into<PathBuf>) -> Self {
        Self {
            forward: forward.into(),
            reverse: reverse.into(),
            mode: LoadMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for DictionarySources {
    fn default() -> Self {
        Self::new(DEFAULT_FORWARD_SOURCE, DEFAULT_REVERSE_SOURCE)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// The file is missing or could not be read.
    #[error("dictionary source unavailable: {}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file exists but is not a JSON array of record objects.
    #[error("dictionary source {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    pub fn path(&self) -> &Path {
        match self {
            SourceError::Unavailable { path, .. } | SourceError::Malformed { path, .. } => path,
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Decode one dataset file into its ordered record sequence.
pub fn load_records(
    path: impl AsRef<Path>,
    mode: LoadMode,
) -> Result<Vec<LexicalRecord>, SourceError> {
    let path = path.as_ref();
    let buffer = read_source(path, mode).map_err(|source| SourceError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(buffer.as_slice(), path)
}

/// Decode an in-memory JSON array of records; `origin` only labels errors.
///
/// A key repeated within one record object keeps its first position and takes
/// its last value.
pub fn parse_records(bytes: &[u8], origin: &Path) -> Result<Vec<LexicalRecord>, SourceError> {
    let malformed = |source: serde_json::Error| SourceError::Malformed {
        path: origin.to_path_buf(),
        source,
    };
    let objects: Vec<IndexMap<String, Value>> =
        serde_json::from_slice(bytes).map_err(malformed)?;
    objects
        .into_iter()
        .map(|object| serde_json::from_value(Value::Object(object.into_iter().collect())))
        .collect::<Result<_, _>>()
        .map_err(malformed)
}

/// Like [`load_records`], but a failing source degrades to an empty sequence.
pub fn load_or_empty(path: impl AsRef<Path>, mode: LoadMode) -> Vec<LexicalRecord> {
    let path = path.as_ref();
    match load_records(path, mode) {
        Ok(records) => {
            info!("loaded {} records from {}", records.len(), path.display());
            records
        }
        Err(err) => {
            warn!("{err}; continuing with an empty sequence");
            Vec::new()
        }
    }
}

fn read_source(path: &Path, mode: LoadMode) -> io::Result<Buffer> {
    let mut file = File::open(path)?;
    // Zero-length files cannot be mapped.
    let empty = file.metadata()?.len() == 0;
    match mode {
        LoadMode::Mmap if !empty => unsafe { Mmap::map(&file) }.map(Buffer::Mmap),
        _ => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            Ok(Buffer::Owned(buf))
        }
    }
}
