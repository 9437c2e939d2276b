//! The typed configuration record and its declared-plan mirror.
//!
//! [`Record`] is the fully resolved form: every attribute and every schema
//! field holds a concrete value. [`RecordPlan`] mirrors it with a tri-state
//! [`PlanValue`] per entry, so "the user never mentioned this" and "the user
//! explicitly wants the zero value" stay distinguishable until the merge in
//! [`crate::reconcile`] resolves them.

use std::collections::{BTreeMap, BTreeSet};

use crate::{schema::Family, set, value::FieldValue};

/// A fully resolved configuration record.
///
/// This is the engine's unit of state: what the declared plan resolves to on
/// the way out, and what a remote response decodes to on the way in. The
/// engine holds nothing between calls; records are plain values owned by the
/// caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Registry identifier, e.g. `"Sendgrid"`.
    pub implementation: String,
    /// Remote-assigned identity; `None` before the first create.
    pub id: Option<i64>,
    pub name: String,
    /// Integer references into the remote tag list, see [`crate::tag`].
    pub tags: BTreeSet<i64>,
    pub attributes: FamilyAttributes,
    /// Values of the dynamic fields, keyed by wire name. Emission order is
    /// dictated by the registry schema, not by this map.
    pub fields: BTreeMap<String, FieldValue>,
}

/// First-class attributes a record carries outside the dynamic field list,
/// per family.
#[derive(Clone, Debug, PartialEq)]
pub enum FamilyAttributes {
    Indexer(IndexerAttributes),
    Notification(NotificationAttributes),
    Metadata(MetadataAttributes),
}

impl FamilyAttributes {
    pub fn family(&self) -> Family {
        match self {
            Self::Indexer(_) => Family::Indexer,
            Self::Notification(_) => Family::Notification,
            Self::Metadata(_) => Family::Metadata,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexerAttributes {
    pub enable_automatic_search: bool,
    pub enable_interactive_search: bool,
    pub enable_rss: bool,
    pub priority: i64,
    pub download_client_id: i64,
}

/// The notification trigger set of the remote service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationAttributes {
    pub on_grab: bool,
    pub on_download: bool,
    pub on_upgrade: bool,
    pub on_import_complete: bool,
    pub on_series_add: bool,
    pub on_series_delete: bool,
    pub on_episode_file_delete: bool,
    pub on_episode_file_delete_for_upgrade: bool,
    pub on_health_issue: bool,
    pub on_health_restored: bool,
    pub on_manual_interaction_required: bool,
    pub on_application_update: bool,
    pub include_health_warnings: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataAttributes {
    pub enable: bool,
}

/// Tri-state for a single plan entry.
///
/// The distinction between "left unspecified" and "explicitly zero" is what
/// keeps a no-op plan from resetting remote state: unspecified entries fall
/// back to the prior persisted value, explicit zeroes really mean zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanValue<T> {
    /// The user declared this value; it always wins outbound.
    Declared(T),
    /// The user left this entry unspecified; keep whatever the remote
    /// service currently has.
    UseRemote,
    /// The user explicitly wants the zero value.
    ExplicitZero,
}

// Not derived: the derive would bound `T: Default`, but the default plan
// entry never holds a value.
impl<T> Default for PlanValue<T> {
    fn default() -> Self {
        Self::UseRemote
    }
}

impl<T> PlanValue<T> {
    /// Resolves the entry against the prior persisted value, producing the
    /// zero value with `zero` where needed.
    pub fn resolve_with(&self, prior: Option<&T>, zero: impl FnOnce() -> T) -> T
    where
        T: Clone,
    {
        match self {
            Self::Declared(value) => value.clone(),
            Self::UseRemote => prior.cloned().unwrap_or_else(zero),
            Self::ExplicitZero => zero(),
        }
    }

    /// [`Self::resolve_with`] for types whose zero value is their
    /// [`Default`].
    pub fn resolve(&self, prior: Option<&T>) -> T
    where
        T: Clone + Default,
    {
        self.resolve_with(prior, T::default)
    }

    pub fn as_declared(&self) -> Option<&T> {
        match self {
            Self::Declared(value) => Some(value),
            Self::UseRemote | Self::ExplicitZero => None,
        }
    }
}

impl<T> From<Option<T>> for PlanValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::UseRemote, Self::Declared)
    }
}

/// The user-declared desired configuration of one record, prior to
/// reconciliation with remote state.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordPlan {
    pub implementation: String,
    /// Required in every declaration; there is no remote fallback for it.
    pub name: String,
    pub tags: PlanValue<BTreeSet<i64>>,
    pub attributes: FamilyAttributesPlan,
    /// Declared dynamic fields, keyed by wire name. Fields absent from this
    /// map behave like [`PlanValue::UseRemote`].
    pub fields: BTreeMap<String, PlanValue<FieldValue>>,
}

impl RecordPlan {
    pub fn new(
        implementation: impl Into<String>,
        name: impl Into<String>,
        attributes: FamilyAttributesPlan,
    ) -> Self {
        Self {
            implementation: implementation.into(),
            name: name.into(),
            tags: PlanValue::UseRemote,
            attributes,
            fields: BTreeMap::new(),
        }
    }

    /// Declares one dynamic field explicitly.
    pub fn declare(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields
            .insert(field.into(), PlanValue::Declared(value.into()));
        self
    }

    /// Declares the tag set explicitly.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = i64>) -> Self {
        self.tags = PlanValue::Declared(set::normalize(tags));
        self
    }
}

/// Tri-state mirror of [`FamilyAttributes`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FamilyAttributesPlan {
    Indexer(IndexerAttributesPlan),
    Notification(NotificationAttributesPlan),
    Metadata(MetadataAttributesPlan),
}

impl FamilyAttributesPlan {
    pub fn family(&self) -> Family {
        match self {
            Self::Indexer(_) => Family::Indexer,
            Self::Notification(_) => Family::Notification,
            Self::Metadata(_) => Family::Metadata,
        }
    }

    /// Resolves against the prior attributes. A prior value of a different
    /// family cannot happen through the engine's own cycle and is treated as
    /// absent.
    pub fn resolve(&self, prior: Option<&FamilyAttributes>) -> FamilyAttributes {
        match self {
            Self::Indexer(plan) => {
                let prior = match prior {
                    Some(FamilyAttributes::Indexer(attrs)) => Some(attrs),
                    _ => None,
                };
                FamilyAttributes::Indexer(plan.resolve(prior))
            }
            Self::Notification(plan) => {
                let prior = match prior {
                    Some(FamilyAttributes::Notification(attrs)) => Some(attrs),
                    _ => None,
                };
                FamilyAttributes::Notification(plan.resolve(prior))
            }
            Self::Metadata(plan) => {
                let prior = match prior {
                    Some(FamilyAttributes::Metadata(attrs)) => Some(attrs),
                    _ => None,
                };
                FamilyAttributes::Metadata(plan.resolve(prior))
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexerAttributesPlan {
    pub enable_automatic_search: PlanValue<bool>,
    pub enable_interactive_search: PlanValue<bool>,
    pub enable_rss: PlanValue<bool>,
    pub priority: PlanValue<i64>,
    pub download_client_id: PlanValue<i64>,
}

impl IndexerAttributesPlan {
    fn resolve(&self, prior: Option<&IndexerAttributes>) -> IndexerAttributes {
        IndexerAttributes {
            enable_automatic_search: self
                .enable_automatic_search
                .resolve(prior.map(|a| &a.enable_automatic_search)),
            enable_interactive_search: self
                .enable_interactive_search
                .resolve(prior.map(|a| &a.enable_interactive_search)),
            enable_rss: self.enable_rss.resolve(prior.map(|a| &a.enable_rss)),
            priority: self.priority.resolve(prior.map(|a| &a.priority)),
            download_client_id: self
                .download_client_id
                .resolve(prior.map(|a| &a.download_client_id)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationAttributesPlan {
    pub on_grab: PlanValue<bool>,
    pub on_download: PlanValue<bool>,
    pub on_upgrade: PlanValue<bool>,
    pub on_import_complete: PlanValue<bool>,
    pub on_series_add: PlanValue<bool>,
    pub on_series_delete: PlanValue<bool>,
    pub on_episode_file_delete: PlanValue<bool>,
    pub on_episode_file_delete_for_upgrade: PlanValue<bool>,
    pub on_health_issue: PlanValue<bool>,
    pub on_health_restored: PlanValue<bool>,
    pub on_manual_interaction_required: PlanValue<bool>,
    pub on_application_update: PlanValue<bool>,
    pub include_health_warnings: PlanValue<bool>,
}

impl NotificationAttributesPlan {
    fn resolve(&self, prior: Option<&NotificationAttributes>) -> NotificationAttributes {
        NotificationAttributes {
            on_grab: self.on_grab.resolve(prior.map(|a| &a.on_grab)),
            on_download: self.on_download.resolve(prior.map(|a| &a.on_download)),
            on_upgrade: self.on_upgrade.resolve(prior.map(|a| &a.on_upgrade)),
            on_import_complete: self
                .on_import_complete
                .resolve(prior.map(|a| &a.on_import_complete)),
            on_series_add: self.on_series_add.resolve(prior.map(|a| &a.on_series_add)),
            on_series_delete: self
                .on_series_delete
                .resolve(prior.map(|a| &a.on_series_delete)),
            on_episode_file_delete: self
                .on_episode_file_delete
                .resolve(prior.map(|a| &a.on_episode_file_delete)),
            on_episode_file_delete_for_upgrade: self
                .on_episode_file_delete_for_upgrade
                .resolve(prior.map(|a| &a.on_episode_file_delete_for_upgrade)),
            on_health_issue: self
                .on_health_issue
                .resolve(prior.map(|a| &a.on_health_issue)),
            on_health_restored: self
                .on_health_restored
                .resolve(prior.map(|a| &a.on_health_restored)),
            on_manual_interaction_required: self
                .on_manual_interaction_required
                .resolve(prior.map(|a| &a.on_manual_interaction_required)),
            on_application_update: self
                .on_application_update
                .resolve(prior.map(|a| &a.on_application_update)),
            include_health_warnings: self
                .include_health_warnings
                .resolve(prior.map(|a| &a.include_health_warnings)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataAttributesPlan {
    pub enable: PlanValue<bool>,
}

impl MetadataAttributesPlan {
    fn resolve(&self, prior: Option<&MetadataAttributes>) -> MetadataAttributes {
        MetadataAttributes {
            enable: self.enable.resolve(prior.map(|a| &a.enable)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_value_wins_over_prior() {
        let plan = PlanValue::Declared(7);
        assert_eq!(plan.resolve(Some(&5)), 7);
        assert_eq!(plan.resolve(None), 7);
    }

    #[test]
    fn unspecified_value_keeps_prior_or_falls_back_to_zero() {
        let plan: PlanValue<i64> = PlanValue::UseRemote;
        assert_eq!(plan.resolve(Some(&5)), 5);
        assert_eq!(plan.resolve(None), 0);
    }

    #[test]
    fn explicit_zero_overrides_prior() {
        let plan: PlanValue<bool> = PlanValue::ExplicitZero;
        assert!(!plan.resolve(Some(&true)));
    }

    #[test]
    fn attribute_plan_resolution_is_per_leaf() {
        let plan = IndexerAttributesPlan {
            enable_rss: PlanValue::Declared(true),
            priority: PlanValue::ExplicitZero,
            ..IndexerAttributesPlan::default()
        };
        let prior = IndexerAttributes {
            enable_rss: false,
            enable_automatic_search: true,
            priority: 25,
            ..IndexerAttributes::default()
        };

        let resolved = FamilyAttributesPlan::Indexer(plan)
            .resolve(Some(&FamilyAttributes::Indexer(prior)));
        assert_eq!(
            resolved,
            FamilyAttributes::Indexer(IndexerAttributes {
                enable_rss: true,
                enable_automatic_search: true,
                priority: 0,
                ..IndexerAttributes::default()
            })
        );
    }

    #[test]
    fn foreign_family_prior_is_ignored() {
        let plan = FamilyAttributesPlan::Metadata(MetadataAttributesPlan::default());
        let prior = FamilyAttributes::Indexer(IndexerAttributes::default());
        assert_eq!(
            plan.resolve(Some(&prior)),
            FamilyAttributes::Metadata(MetadataAttributes::default())
        );
    }
}
