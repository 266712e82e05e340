//! Street name normalization and name-set keys
//!
//! Ramps and split roadbeds are often named after the mainline with a
//! directional or bound suffix ("BROADWAY NB", "FDR DRIVE EXIT"). Collapsing
//! those suffixes to a single `DIR` token lets name-sets from both sides of a
//! divided road compare equal.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

const DIRECTIONAL_TOKEN: &str = "DIR";

const DIRECTIONAL_WORDS: &[&str] = &[
    "WEST",
    "EAST",
    "SOUTH",
    "NORTH",
    "EXIT",
    "ENTRANCE",
    "APPROACH",
    "NORTHBOUND",
    "NB",
    "SOUTHBOUND",
    "SB",
    "EASTBOUND",
    "EB",
    "WESTBOUND",
    "WB",
];

/// Names whose directional word is part of the street's actual name
pub const DIRECTIONAL_EXCEPTIONS: &[&str] = &[
    "WEST STREET",
    "SOUTH STREET",
    "NORTH STREET",
    "EAST STREET",
    "WEST AVENUE",
    "SOUTH AVENUE",
    "NORTH AVENUE",
    "EAST AVENUE",
    "WEST BOULEVARD",
    "SOUTH BOULEVARD",
    "NORTH BOULEVARD",
    "EAST BOULEVARD",
    "WEST LOOP",
    "SOUTH LOOP",
    "NORTH LOOP",
    "EAST LOOP",
    "WEST DRIVE",
    "SOUTH DRIVE",
    "NORTH DRIVE",
    "EAST DRIVE",
    "WEST ROAD",
    "SOUTH ROAD",
    "NORTH ROAD",
    "EAST ROAD",
    "JUNIPER BOULEVARD NORTH",
    "JUNIPER BOULEVARD SOUTH",
    "PROSPECT PARK WEST",
    "AVENUE N",
    "AVENUE S",
    "AVENUE E",
    "AVENUE W",
];

/// Replaces directional words after the first token with `DIR`.
///
/// The leading token is never touched ("WEST 225 STREET" is a name, not a
/// direction), and names listed in [`DIRECTIONAL_EXCEPTIONS`] or in
/// `extra_exceptions` are returned unchanged.
pub fn normalize_street_name<'a>(name: &'a str, extra_exceptions: &[String]) -> Cow<'a, str> {
    let trimmed = name.trim();
    if DIRECTIONAL_EXCEPTIONS.contains(&trimmed)
        || extra_exceptions.iter().any(|exception| exception == trimmed)
    {
        return Cow::Borrowed(trimmed);
    }

    let mut tokens = trimmed.split_whitespace();
    let Some(first) = tokens.next() else {
        return Cow::Borrowed(trimmed);
    };
    let rest: Vec<&str> = tokens.collect();
    if !rest.iter().any(|token| DIRECTIONAL_WORDS.contains(token)) {
        return Cow::Borrowed(trimmed);
    }

    let mut normalized = String::with_capacity(trimmed.len());
    normalized.push_str(first);
    for token in rest {
        normalized.push(' ');
        if DIRECTIONAL_WORDS.contains(&token) {
            normalized.push_str(DIRECTIONAL_TOKEN);
        } else {
            normalized.push_str(token);
        }
    }
    Cow::Owned(normalized)
}

/// Sorted, de-duplicated set of street names used as a cluster key.
///
/// Ordering is lexicographic over the sorted names, so keys sort the same way
/// on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameSetKey(Vec<String>);

impl NameSetKey {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self(names.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .is_ok()
    }

    /// True when every name of `self` is in `other` and `other` has more
    pub fn is_strict_subset_of(&self, other: &Self) -> bool {
        self.len() < other.len() && self.0.iter().all(|name| other.contains(name))
    }
}

impl fmt::Display for NameSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
