use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::ResourceIdentifier;
use crate::vocab;

/// An RDF term: the subject or object position of a [`Triple`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "termType", rename_all = "camelCase")]
pub enum Term {
    NamedNode {
        value: String,
    },
    BlankNode {
        value: String,
    },
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl Term {
    pub fn named(iri: impl Into<String>) -> Self {
        Self::NamedNode { value: iri.into() }
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Self::BlankNode {
            value: label.into(),
        }
    }

    /// A plain (xsd:string) literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// The lexical value regardless of term kind.
    pub fn value(&self) -> &str {
        match self {
            Self::NamedNode { value } | Self::BlankNode { value } | Self::Literal { value, .. } => {
                value
            }
        }
    }

    pub fn is_named(&self, iri: &str) -> bool {
        matches!(self, Self::NamedNode { value } if value == iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedNode { value } => write!(f, "<{value}>"),
            Self::BlankNode { value } => write!(f, "_:{value}"),
            Self::Literal {
                value,
                datatype: Some(dt),
                ..
            } => write!(f, "{value:?}^^<{dt}>"),
            Self::Literal {
                value,
                language: Some(lang),
                ..
            } => write!(f, "{value:?}@{lang}"),
            Self::Literal { value, .. } => write!(f, "{value:?}"),
        }
    }
}

/// A (subject, predicate, object) metadata statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// Request-scoped collection of triples describing one resource.
///
/// Accessors (`get`, `set`, `remove_all`, ...) operate on triples whose
/// subject is the resource itself; triples about other subjects (blank
/// nodes, related resources) are carried along untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSet {
    identifier: ResourceIdentifier,
    triples: Vec<Triple>,
}

impl MetadataSet {
    pub fn new(identifier: ResourceIdentifier) -> Self {
        Self {
            identifier,
            triples: Vec::new(),
        }
    }

    /// Build a set from decoded triples, dropping exact duplicates.
    pub fn from_triples(
        identifier: ResourceIdentifier,
        triples: impl IntoIterator<Item = Triple>,
    ) -> Self {
        let mut set = Self::new(identifier);
        set.extend(triples);
        set
    }

    pub fn identifier(&self) -> &ResourceIdentifier {
        &self.identifier
    }

    /// The subject term standing for the described resource.
    pub fn subject(&self) -> Term {
        Term::named(self.identifier.as_str())
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn into_triples(self) -> Vec<Triple> {
        self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Add `predicate object` about the resource. Duplicates are ignored.
    pub fn add(&mut self, predicate: &str, object: Term) -> &mut Self {
        let triple = Triple::new(self.subject(), predicate, object);
        self.push(triple);
        self
    }

    /// Replace every value of `predicate` with `object`.
    pub fn set(&mut self, predicate: &str, object: Term) -> &mut Self {
        self.remove_all(predicate);
        self.add(predicate, object)
    }

    /// Merge arbitrary triples, dropping exact duplicates.
    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) {
        for triple in triples {
            self.push(triple);
        }
    }

    /// Remove one `predicate object` statement. Returns `true` if it existed.
    pub fn remove(&mut self, predicate: &str, object: &Term) -> bool {
        let subject = self.subject();
        let before = self.triples.len();
        self.triples
            .retain(|t| !(t.subject == subject && t.predicate == predicate && &t.object == object));
        self.triples.len() != before
    }

    /// Remove every value of `predicate`. Returns how many were removed.
    pub fn remove_all(&mut self, predicate: &str) -> usize {
        let subject = self.subject();
        let before = self.triples.len();
        self.triples
            .retain(|t| !(t.subject == subject && t.predicate == predicate));
        before - self.triples.len()
    }

    /// Keep only the triples for which `keep` returns `true`.
    pub fn retain(&mut self, keep: impl FnMut(&Triple) -> bool) {
        self.triples.retain(keep);
    }

    /// First value of `predicate` about the resource.
    pub fn get(&self, predicate: &str) -> Option<&Term> {
        let subject = self.identifier.as_str();
        self.triples
            .iter()
            .find(|t| t.subject.is_named(subject) && t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn get_all<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        let subject = self.identifier.as_str();
        self.triples
            .iter()
            .filter(move |t| t.subject.is_named(subject) && t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn has(&self, predicate: &str, object: &Term) -> bool {
        self.get_all(predicate).any(|o| o == object)
    }

    /// The explicit content type carried under the reserved predicate.
    pub fn content_type(&self) -> Option<&str> {
        self.get(vocab::CONTENT_TYPE).map(Term::value)
    }

    /// Set or clear the explicit content type.
    pub fn set_content_type(&mut self, content_type: Option<&str>) -> &mut Self {
        match content_type {
            Some(ct) => self.set(vocab::CONTENT_TYPE, Term::literal(ct)),
            None => {
                self.remove_all(vocab::CONTENT_TYPE);
                self
            }
        }
    }

    fn push(&mut self, triple: Triple) {
        if !self.triples.contains(&triple) {
            self.triples.push(triple);
        }
    }
}
