//! Index and query the Quechua↔Spanish dictionary datasets in memory.
//!
//! A [`Dictionary`] owns two ordered record sequences, one per translation
//! direction, and builds its lookup structures exactly once at construction.
//! Every query afterwards is a pure read, so a `Dictionary` can be shared
//! across threads behind an `Arc` without locking. To reflect new data, build
//! a new instance.
//!
//! Missing or undecodable sources do not abort construction: the affected
//! direction is loaded as empty and a warning is logged, so queries against it
//! simply return nothing.
//!
//! # Example
//! ```no_run
//! use simi_db::{Dictionary, DictionarySources};
//!
//! let dict = Dictionary::open(&DictionarySources::default());
//! for entry in dict.lookup_forward("achupalla") {
//!     println!("{:?}", entry.definition_text());
//! }
//! for line in dict.dialect_variants("achupalla") {
//!     println!("{line}");
//! }
//! ```
//!
//! For a runnable demo, see `cargo run -p simi-db --example stats -- <qe.json> <eq.json>`.

pub mod index;
pub mod loader;
pub mod variants;

use std::path::Path;

use indexmap::IndexSet;
use simi_types::{Counts, Direction, LexicalRecord, Statistics};

pub use index::{Indexes, normalize_lemma};
pub use loader::{
    DEFAULT_FORWARD_SOURCE, DEFAULT_REVERSE_SOURCE, DictionarySources, LoadMode, SourceError,
    load_or_empty, load_records, parse_records,
};
pub use variants::flatten_variants;

/// Both dataset directions plus the indexes built over them.
pub struct Dictionary {
    qe: Vec<LexicalRecord>,
    eq: Vec<LexicalRecord>,
    indexes: Indexes,
}

impl Dictionary {
    /// Build from already-decoded record sequences.
    pub fn from_records(qe: Vec<LexicalRecord>, eq: Vec<LexicalRecord>) -> Self {
        let indexes = Indexes::build(&qe, &eq);
        Self { qe, eq, indexes }
    }

    /// Load both sources, substituting an empty sequence for any that fails.
    pub fn open(sources: &DictionarySources) -> Self {
        let qe = load_or_empty(&sources.forward, sources.mode);
        let eq = load_or_empty(&sources.reverse, sources.mode);
        Self::from_records(qe, eq)
    }

    /// Memory-map and load the two sources.
    pub fn load(forward: impl AsRef<Path>, reverse: impl AsRef<Path>) -> Self {
        Self::open(&DictionarySources::new(forward.as_ref(), reverse.as_ref()))
    }

    /// Entries whose Quechua headword matches `lemma`, ignoring case.
    pub fn lookup_forward(&self, lemma: &str) -> Vec<&LexicalRecord> {
        resolve(&self.qe, self.indexes.forward(lemma))
    }

    /// Entries whose Spanish headword matches `lemma`, ignoring case.
    pub fn lookup_reverse(&self, lemma: &str) -> Vec<&LexicalRecord> {
        resolve(&self.eq, self.indexes.reverse(lemma))
    }

    pub fn lookup(&self, direction: Direction, lemma: &str) -> Vec<&LexicalRecord> {
        match direction {
            Direction::Forward => self.lookup_forward(lemma),
            Direction::Reverse => self.lookup_reverse(lemma),
        }
    }

    /// Forward entries tagged with the grammatical category `label` (exact match).
    pub fn by_category(&self, label: &str) -> Vec<&LexicalRecord> {
        resolve(&self.qe, self.indexes.category(label))
    }

    /// Forward entries tagged with the semantic field `label` (exact match).
    pub fn by_field(&self, label: &str) -> Vec<&LexicalRecord> {
        resolve(&self.qe, self.indexes.field(label))
    }

    /// Case-insensitive substring search over definitions and synonyms.
    ///
    /// Forward records come first, then reverse, each in dataset order. A
    /// record is returned once even when several of its fields match.
    pub fn full_text_search(&self, query: &str) -> Vec<&LexicalRecord> {
        let needle = query.to_lowercase();
        self.qe
            .iter()
            .chain(&self.eq)
            .filter(|record| matches_text(record, &needle))
            .collect()
    }

    /// Flattened dialectal variants for `lemma` in both directions.
    ///
    /// Lines from forward entries precede those from reverse entries; repeats
    /// are dropped, keeping the first occurrence.
    pub fn dialect_variants(&self, lemma: &str) -> Vec<String> {
        let mut lines = IndexSet::new();
        for record in self
            .lookup_forward(lemma)
            .into_iter()
            .chain(self.lookup_reverse(lemma))
        {
            if let Some(node) = &record.dialect_variants {
                lines.extend(flatten_variants(node));
            }
        }
        lines.into_iter().collect()
    }

    pub fn category_labels(&self) -> Vec<String> {
        self.indexes.category_labels().map(str::to_string).collect()
    }

    pub fn field_labels(&self) -> Vec<String> {
        self.indexes.field_labels().map(str::to_string).collect()
    }

    /// Distinct case-folded headwords of one direction, in first-seen order.
    pub fn lemmas(&self, direction: Direction) -> Vec<&str> {
        match direction {
            Direction::Forward => self.indexes.forward_lemmas().collect(),
            Direction::Reverse => self.indexes.reverse_lemmas().collect(),
        }
    }

    /// Raw record sequence for a direction, including entries without a lemma.
    pub fn records(&self, direction: Direction) -> &[LexicalRecord] {
        match direction {
            Direction::Forward => &self.qe,
            Direction::Reverse => &self.eq,
        }
    }

    pub fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    pub fn counts(&self) -> Counts {
        Counts::new(self.qe.len(), self.eq.len())
    }

    pub fn statistics(&self) -> Statistics {
        let all = || self.qe.iter().chain(&self.eq);
        let variant_entries = all()
            .filter_map(|r| r.dialect_variants.as_ref())
            .map(|v| v.leaf_count())
            .sum();
        let synonym_entries = all().map(|r| r.synonym_list().len()).sum();
        let categories = self.category_labels();
        let fields = self.field_labels();

        Statistics {
            counts: self.counts(),
            category_count: categories.len(),
            field_count: fields.len(),
            variant_entries,
            synonym_entries,
            categories,
            fields,
        }
    }
}

fn resolve<'a>(records: &'a [LexicalRecord], postings: &[usize]) -> Vec<&'a LexicalRecord> {
    postings.iter().filter_map(|&pos| records.get(pos)).collect()
}

fn matches_text(record: &LexicalRecord, needle: &str) -> bool {
    if let Some(definition) = record.definition_text()
        && definition.to_lowercase().contains(needle)
    {
        return true;
    }
    record
        .synonym_list()
        .iter()
        .any(|synonym| synonym.to_lowercase().contains(needle))
}
