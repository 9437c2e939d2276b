//! Remote tag references.
//!
//! Records reference tags by the integer identity the remote service
//! assigned, while users declare them by label. The lookup here is built
//! from the tag list a transport collaborator fetched; resolving happens
//! purely in memory.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use snafu::{OptionExt, Snafu};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("tag label {label:?} does not exist on the remote service"))]
    UnknownLabel { label: String },
}

/// One tag as the remote service reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

/// Label-to-identity lookup over the remote tag list.
#[derive(Clone, Debug, Default)]
pub struct TagLookup {
    by_label: BTreeMap<String, i64>,
}

impl TagLookup {
    pub fn new(tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            by_label: tags.into_iter().map(|tag| (tag.label, tag.id)).collect(),
        }
    }

    pub fn id_of(&self, label: &str) -> Result<i64> {
        self.by_label
            .get(label)
            .copied()
            .context(UnknownLabelSnafu { label })
    }

    /// Resolves declared labels into the integer tag set records carry.
    /// Duplicate labels collapse into one reference.
    pub fn resolve<I, S>(&self, labels: I) -> Result<BTreeSet<i64>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.id_of(label.as_ref()))
            .collect()
    }
}
