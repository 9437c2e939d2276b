//! Field schemas and the per-implementation registry.
//!
//! Every supported implementation is described by one static
//! [`ImplementationSpec`]: its identity constants and the ordered list of
//! dynamic fields it understands. Adding an implementation is a data change
//! in the catalog, never new conversion code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use snafu::{Snafu, ensure};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("implementation {implementation:?} is not registered"))]
    UnknownImplementation { implementation: String },

    #[snafu(display("implementation {implementation:?} is registered twice"))]
    DuplicateImplementation { implementation: &'static str },

    #[snafu(display(
        "field {field:?} appears twice in the schema of implementation {implementation:?}"
    ))]
    DuplicateField {
        implementation: &'static str,
        field: &'static str,
    },
}

/// The primitive kind of one dynamic field.
///
/// The variant set is closed on purpose: when the remote protocol grows a new
/// kind, every `match` over [`FieldKind`] stops compiling until the new kind
/// is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Bool,
    Int64,
    Float64,
    String,
    StringSet,
    IntSet,
}

/// One entry in an implementation's ordered field schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name of the field, e.g. `"apiKey"`.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Sensitive fields (credentials) are never logged and never compared
    /// for drift; the remote value is taken verbatim on read.
    pub sensitive: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            sensitive: false,
        }
    }

    pub const fn sensitive(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            sensitive: true,
        }
    }
}

/// The configurable families of the remote service. Each family carries its
/// own set of first-class attributes outside the dynamic field list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Family {
    Indexer,
    Notification,
    Metadata,
}

/// Download protocol marker carried by indexer implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    Usenet,
    Torrent,
}

/// Registry entry for one concrete implementation.
///
/// `implementation` and `config_contract` are the constants the remote
/// service uses to dispatch the field list; they are stamped onto outbound
/// payloads by the projection layer and never taken from caller input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImplementationSpec {
    pub implementation: &'static str,
    pub config_contract: &'static str,
    pub protocol: Option<Protocol>,
    pub family: Family,
    /// The ordered field schema. Wire output follows this order exactly.
    pub fields: &'static [FieldSpec],
}

impl ImplementationSpec {
    /// Looks up a single field spec by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Read-only map from implementation identifier to its schema.
///
/// Built once at process start; afterwards only shared reads happen, so a
/// `&Registry` can be handed to any number of concurrent projector calls
/// without locking.
#[derive(Debug, Default)]
pub struct Registry {
    implementations: BTreeMap<&'static str, ImplementationSpec>,
}

impl Registry {
    /// Builds a registry, rejecting duplicate implementation identifiers and
    /// duplicate field names within one schema.
    pub fn new(entries: impl IntoIterator<Item = ImplementationSpec>) -> Result<Self> {
        let mut implementations = BTreeMap::new();

        for entry in entries {
            for (index, field) in entry.fields.iter().enumerate() {
                ensure!(
                    entry.fields[..index].iter().all(|f| f.name != field.name),
                    DuplicateFieldSnafu {
                        implementation: entry.implementation,
                        field: field.name,
                    }
                );
            }
            ensure!(
                implementations
                    .insert(entry.implementation, entry)
                    .is_none(),
                DuplicateImplementationSnafu {
                    implementation: entry.implementation,
                }
            );
        }

        Ok(Self { implementations })
    }

    /// Resolves the schema of one implementation.
    pub fn spec_for(&self, implementation: &str) -> Result<&ImplementationSpec> {
        self.implementations
            .get(implementation)
            .ok_or_else(|| UnknownImplementationSnafu { implementation }.build())
    }

    /// Iterates over all registered schemas, in identifier order.
    pub fn implementations(&self) -> impl Iterator<Item = &ImplementationSpec> {
        self.implementations.values()
    }
}
