//! Projection between typed records and the dynamic wire shape.

use std::collections::BTreeMap;

use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::trace;

use crate::{
    codec,
    record::{
        FamilyAttributes, IndexerAttributes, MetadataAttributes, NotificationAttributes, Record,
    },
    schema::{self, Family, Registry},
    set,
    value::FieldValue,
    wire::ResourcePayload,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("failed to resolve implementation schema"))]
    UnknownImplementation { source: schema::Error },

    #[snafu(display("failed to convert dynamic field list of {implementation:?}"))]
    KindMismatch {
        source: codec::Error,
        implementation: String,
    },

    #[snafu(display(
        "required attribute {attribute:?} is missing from the {implementation:?} response"
    ))]
    MissingField {
        implementation: String,
        attribute: &'static str,
    },

    #[snafu(display(
        "record for {implementation:?} carries {found} attributes, its schema declares {expected}"
    ))]
    FamilyMismatch {
        implementation: String,
        expected: Family,
        found: Family,
    },
}

/// Converts [`Record`]s to and from the dynamic field-list wire shape.
///
/// Holds an immutable registry handle; the projector itself is stateless, so
/// one instance can serve any number of concurrent calls.
#[derive(Clone, Copy, Debug)]
pub struct Projector<'a> {
    registry: &'a Registry,
}

impl<'a> Projector<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Encodes a record into the outbound wire payload.
    ///
    /// Exactly one dynamic field is emitted per schema entry, in schema
    /// order, on every call; record fields unknown to the schema are dropped
    /// so stale values can never leak back to the remote service. The
    /// implementation identifier, config contract and protocol are stamped
    /// from the registry, never taken from the record, which keeps a record
    /// from impersonating a different implementation.
    pub fn project(&self, record: &Record) -> Result<ResourcePayload> {
        let spec = self
            .registry
            .spec_for(&record.implementation)
            .context(UnknownImplementationSnafu)?;
        ensure!(
            record.attributes.family() == spec.family,
            FamilyMismatchSnafu {
                implementation: record.implementation.as_str(),
                expected: spec.family,
                found: record.attributes.family(),
            }
        );

        let mut fields = Vec::with_capacity(spec.fields.len());
        for field_spec in spec.fields {
            // Unset schema fields are sent as explicit zero values, never
            // omitted.
            let value = record
                .fields
                .get(field_spec.name)
                .cloned()
                .unwrap_or_else(|| FieldValue::zero(field_spec.kind));
            let field = codec::encode(field_spec, &value).context(KindMismatchSnafu {
                implementation: record.implementation.as_str(),
            })?;
            fields.push(field);
        }

        let mut payload = ResourcePayload {
            id: record.id,
            name: Some(record.name.clone()),
            implementation: Some(spec.implementation.to_owned()),
            config_contract: Some(spec.config_contract.to_owned()),
            protocol: spec.protocol,
            tags: record.tags.iter().copied().collect(),
            fields,
            ..ResourcePayload::default()
        };
        write_attributes(&record.attributes, &mut payload);

        trace!(
            implementation = spec.implementation,
            name = %record.name,
            fields = payload.fields.len(),
            "projected record"
        );
        Ok(payload)
    }

    /// Decodes a wire payload back into a typed record.
    ///
    /// Incoming fields unknown to the schema are ignored for forward
    /// compatibility. `name` is required; the remote identity is taken as-is
    /// (use [`Self::unproject_existing`] on the read path, where a missing
    /// identity indicates a remote contract change).
    pub fn unproject(&self, implementation: &str, payload: &ResourcePayload) -> Result<Record> {
        self.unproject_inner(implementation, payload, false)
    }

    /// Like [`Self::unproject`], but fails with [`Error::MissingField`] when
    /// the response carries no identity.
    pub fn unproject_existing(
        &self,
        implementation: &str,
        payload: &ResourcePayload,
    ) -> Result<Record> {
        self.unproject_inner(implementation, payload, true)
    }

    fn unproject_inner(
        &self,
        implementation: &str,
        payload: &ResourcePayload,
        require_id: bool,
    ) -> Result<Record> {
        let spec = self
            .registry
            .spec_for(implementation)
            .context(UnknownImplementationSnafu)?;

        let name = payload.name.clone().context(MissingFieldSnafu {
            implementation,
            attribute: "name",
        })?;
        let id = if require_id {
            Some(payload.id.context(MissingFieldSnafu {
                implementation,
                attribute: "id",
            })?)
        } else {
            payload.id
        };

        let mut fields = BTreeMap::new();
        for wire_field in &payload.fields {
            let Some(field_spec) = spec.field(&wire_field.name) else {
                trace!(
                    implementation,
                    field = %wire_field.name,
                    "ignoring field unknown to the local schema"
                );
                continue;
            };
            let value =
                codec::decode(wire_field, field_spec.kind).context(KindMismatchSnafu {
                    implementation,
                })?;
            fields.insert(field_spec.name.to_owned(), value);
        }

        trace!(
            implementation,
            name = %name,
            fields = fields.len(),
            "unprojected payload"
        );
        Ok(Record {
            implementation: spec.implementation.to_owned(),
            id,
            name,
            tags: set::normalize(payload.tags.iter().copied()),
            attributes: read_attributes(spec.family, payload),
            fields,
        })
    }
}

fn write_attributes(attributes: &FamilyAttributes, payload: &mut ResourcePayload) {
    match attributes {
        FamilyAttributes::Indexer(attrs) => {
            payload.enable_automatic_search = Some(attrs.enable_automatic_search);
            payload.enable_interactive_search = Some(attrs.enable_interactive_search);
            payload.enable_rss = Some(attrs.enable_rss);
            payload.priority = Some(attrs.priority);
            payload.download_client_id = Some(attrs.download_client_id);
        }
        FamilyAttributes::Notification(attrs) => {
            payload.on_grab = Some(attrs.on_grab);
            payload.on_download = Some(attrs.on_download);
            payload.on_upgrade = Some(attrs.on_upgrade);
            payload.on_import_complete = Some(attrs.on_import_complete);
            payload.on_series_add = Some(attrs.on_series_add);
            payload.on_series_delete = Some(attrs.on_series_delete);
            payload.on_episode_file_delete = Some(attrs.on_episode_file_delete);
            payload.on_episode_file_delete_for_upgrade =
                Some(attrs.on_episode_file_delete_for_upgrade);
            payload.on_health_issue = Some(attrs.on_health_issue);
            payload.on_health_restored = Some(attrs.on_health_restored);
            payload.on_manual_interaction_required = Some(attrs.on_manual_interaction_required);
            payload.on_application_update = Some(attrs.on_application_update);
            payload.include_health_warnings = Some(attrs.include_health_warnings);
        }
        FamilyAttributes::Metadata(attrs) => {
            payload.enable = Some(attrs.enable);
        }
    }
}

fn read_attributes(family: Family, payload: &ResourcePayload) -> FamilyAttributes {
    match family {
        Family::Indexer => FamilyAttributes::Indexer(IndexerAttributes {
            enable_automatic_search: payload.enable_automatic_search.unwrap_or_default(),
            enable_interactive_search: payload.enable_interactive_search.unwrap_or_default(),
            enable_rss: payload.enable_rss.unwrap_or_default(),
            priority: payload.priority.unwrap_or_default(),
            download_client_id: payload.download_client_id.unwrap_or_default(),
        }),
        Family::Notification => FamilyAttributes::Notification(NotificationAttributes {
            on_grab: payload.on_grab.unwrap_or_default(),
            on_download: payload.on_download.unwrap_or_default(),
            on_upgrade: payload.on_upgrade.unwrap_or_default(),
            on_import_complete: payload.on_import_complete.unwrap_or_default(),
            on_series_add: payload.on_series_add.unwrap_or_default(),
            on_series_delete: payload.on_series_delete.unwrap_or_default(),
            on_episode_file_delete: payload.on_episode_file_delete.unwrap_or_default(),
            on_episode_file_delete_for_upgrade: payload
                .on_episode_file_delete_for_upgrade
                .unwrap_or_default(),
            on_health_issue: payload.on_health_issue.unwrap_or_default(),
            on_health_restored: payload.on_health_restored.unwrap_or_default(),
            on_manual_interaction_required: payload
                .on_manual_interaction_required
                .unwrap_or_default(),
            on_application_update: payload.on_application_update.unwrap_or_default(),
            include_health_warnings: payload.include_health_warnings.unwrap_or_default(),
        }),
        Family::Metadata => FamilyAttributes::Metadata(MetadataAttributes {
            enable: payload.enable.unwrap_or_default(),
        }),
    }
}
