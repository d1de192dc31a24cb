//! One-shot construction of the lemma, category and field indexes.

use indexmap::IndexMap;
use simi_types::LexicalRecord;
use tracing::info;

/// Bucket of record positions within one direction's raw sequence.
pub type Postings = Vec<usize>;

/// Derived lookup structures, keyed in first-insertion order.
///
/// Buckets hold positions into the sequence the index was built from:
/// `forward`, `category` and `field` point into the Quechua → Spanish records,
/// `reverse` into the Spanish → Quechua records.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Indexes {
    forward: IndexMap<String, Postings>,
    reverse: IndexMap<String, Postings>,
    category: IndexMap<String, Postings>,
    field: IndexMap<String, Postings>,
}

impl Indexes {
    /// Build all four indexes in a single pass over each sequence.
    ///
    /// Records without a lemma are skipped entirely. Category and field
    /// buckets are only populated from the forward sequence.
    pub fn build(qe: &[LexicalRecord], eq: &[LexicalRecord]) -> Self {
        let mut indexes = Self::default();

        for (pos, record) in qe.iter().enumerate() {
            let lemma = normalize_lemma(record.lemma_text());
            if lemma.is_empty() {
                continue;
            }
            indexes.forward.entry(lemma).or_default().push(pos);

            for label in record.categories() {
                push_label(&mut indexes.category, label, pos);
            }
            for label in record.semantic_fields() {
                push_label(&mut indexes.field, label, pos);
            }
        }

        for (pos, record) in eq.iter().enumerate() {
            let lemma = normalize_lemma(record.lemma_text());
            if !lemma.is_empty() {
                indexes.reverse.entry(lemma).or_default().push(pos);
            }
        }

        info!(
            "indexed {} forward lemmas, {} reverse lemmas, {} categories, {} fields",
            indexes.forward.len(),
            indexes.reverse.len(),
            indexes.category.len(),
            indexes.field.len()
        );
        indexes
    }

    pub fn forward(&self, lemma: &str) -> &[usize] {
        bucket(&self.forward, &normalize_lemma(lemma))
    }

    pub fn reverse(&self, lemma: &str) -> &[usize] {
        bucket(&self.reverse, &normalize_lemma(lemma))
    }

    /// Exact, case-sensitive category match.
    pub fn category(&self, label: &str) -> &[usize] {
        bucket(&self.category, label)
    }

    /// Exact, case-sensitive semantic-field match.
    pub fn field(&self, label: &str) -> &[usize] {
        bucket(&self.field, label)
    }

    pub fn forward_lemmas(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.forward.keys().map(String::as_str)
    }

    pub fn reverse_lemmas(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.reverse.keys().map(String::as_str)
    }

    pub fn category_labels(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.category.keys().map(String::as_str)
    }

    pub fn field_labels(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.field.keys().map(String::as_str)
    }
}

fn push_label(index: &mut IndexMap<String, Postings>, label: &str, pos: usize) {
    match index.get_mut(label) {
        Some(bucket) => bucket.push(pos),
        None => {
            index.insert(label.to_string(), vec![pos]);
        }
    }
}

fn bucket<'a>(index: &'a IndexMap<String, Postings>, key: &str) -> &'a [usize] {
    index.get(key).map(Vec::as_slice).unwrap_or(&[])
}

/// Case-fold a lemma into its index key.
pub fn normalize_lemma(text: &str) -> String {
    text.to_lowercase()
}
