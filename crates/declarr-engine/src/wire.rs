//! Wire types exchanged with the remote service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Protocol;

/// One `{name, value}` entry of the dynamic field list.
///
/// `value` may be absent: the remote service omits fields it considers to be
/// at their default. The engine itself always sends explicit values, so
/// "configured to the default" and "not sent" stay distinguishable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl DynamicField {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    /// A field that is present on the wire but carries no value.
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// Request/response body for one configurable record.
///
/// Mirrors the remote REST resource shape: common attributes first-class,
/// implementation-specific settings in the ordered `fields` list. Every
/// attribute is optional on the wire; which ones are required is decided
/// during unprojection. The family-specific attribute slots (indexer search
/// toggles, notification triggers, the metadata enable flag) share one
/// payload type because the remote API serializes all families through the
/// same shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_contract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    pub tags: Vec<i64>,
    pub fields: Vec<DynamicField>,

    // Indexer attributes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_automatic_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_interactive_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_rss: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_client_id: Option<i64>,

    // Notification triggers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_grab: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_download: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_import_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_series_add: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_series_delete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_episode_file_delete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_episode_file_delete_for_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_health_issue: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_health_restored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_manual_interaction_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_application_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_health_warnings: Option<bool>,

    // Metadata attributes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
}
