use std::collections::HashMap;

use crate::corpus::Corpus;

/// Bidirectional mapping between article identifiers and corpus row positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierIndex {
    positions: HashMap<String, usize>,
    identifiers: Vec<String>,
}

impl IdentifierIndex {
    #[inline]
    pub fn from_corpus(corpus: &Corpus) -> Self {
        Self::from_ids(corpus.ids())
    }

    /// Build from identifiers in row order. A repeated identifier keeps its
    /// first position.
    #[inline]
    pub fn from_ids<'a, I: IntoIterator<Item = &'a str>>(ids: I) -> Self {
        let identifiers: Vec<String> = ids.into_iter().map(ToString::to_string).collect();
        let mut positions = HashMap::with_capacity(identifiers.len());
        for (position, id) in identifiers.iter().enumerate() {
            positions.entry(id.clone()).or_insert(position);
        }

        Self {
            positions,
            identifiers,
        }
    }

    #[inline]
    pub fn position_of(&self, identifier: &str) -> Option<usize> {
        self.positions.get(identifier).copied()
    }

    #[inline]
    pub fn identifier_at(&self, position: usize) -> Option<&str> {
        self.identifiers.get(position).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, identifier: &str) -> bool {
        self.positions.contains_key(identifier)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    #[inline]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }
}
