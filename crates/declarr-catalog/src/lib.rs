//! Built-in implementation schemas.
//!
//! Every supported implementation is one static table here. The engine never
//! changes when an implementation is added or when a field schema evolves;
//! each field has exactly one declared origin, so a value can never be
//! populated from the wrong source attribute.

use std::sync::LazyLock;

use declarr_engine::schema::{
    Family, FieldKind, FieldSpec, ImplementationSpec, Protocol, Registry,
};

/// Newznab usenet indexer.
pub const NEWZNAB: ImplementationSpec = ImplementationSpec {
    implementation: "Newznab",
    config_contract: "NewznabSettings",
    protocol: Some(Protocol::Usenet),
    family: Family::Indexer,
    fields: &[
        FieldSpec::new("additionalParameters", FieldKind::String),
        FieldSpec::sensitive("apiKey", FieldKind::String),
        FieldSpec::new("apiPath", FieldKind::String),
        FieldSpec::new("baseUrl", FieldKind::String),
        FieldSpec::new("animeStandardFormatSearch", FieldKind::Bool),
        FieldSpec::new("categories", FieldKind::IntSet),
        FieldSpec::new("animeCategories", FieldKind::IntSet),
    ],
};

/// Torrentleech torrent indexer.
pub const TORRENTLEECH: ImplementationSpec = ImplementationSpec {
    implementation: "Torrentleech",
    config_contract: "TorrentleechSettings",
    protocol: Some(Protocol::Torrent),
    family: Family::Indexer,
    fields: &[
        FieldSpec::sensitive("apiKey", FieldKind::String),
        FieldSpec::new("baseUrl", FieldKind::String),
        FieldSpec::new("minimumSeeders", FieldKind::Int64),
        FieldSpec::new("seasonPackSeedTime", FieldKind::Int64),
        FieldSpec::new("seedTime", FieldKind::Int64),
        FieldSpec::new("seedRatio", FieldKind::Float64),
    ],
};

/// Sendgrid email notification channel.
pub const SENDGRID: ImplementationSpec = ImplementationSpec {
    implementation: "Sendgrid",
    config_contract: "SendgridSettings",
    protocol: None,
    family: Family::Notification,
    fields: &[
        FieldSpec::sensitive("apiKey", FieldKind::String),
        FieldSpec::new("from", FieldKind::String),
        FieldSpec::new("recipients", FieldKind::StringSet),
    ],
};

/// Kodi/XBMC metadata publisher.
pub const XBMC_METADATA: ImplementationSpec = ImplementationSpec {
    implementation: "XbmcMetadata",
    config_contract: "XbmcMetadataSettings",
    protocol: None,
    family: Family::Metadata,
    fields: &[
        FieldSpec::new("seriesMetadata", FieldKind::Bool),
        FieldSpec::new("seriesMetadataUrl", FieldKind::Bool),
        FieldSpec::new("seriesImages", FieldKind::Bool),
        FieldSpec::new("seasonImages", FieldKind::Bool),
        FieldSpec::new("episodeImages", FieldKind::Bool),
        FieldSpec::new("episodeMetadata", FieldKind::Bool),
    ],
};

/// All implementations shipped with this crate.
pub const BUILTIN: &[ImplementationSpec] = &[NEWZNAB, TORRENTLEECH, SENDGRID, XBMC_METADATA];

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    Registry::new(BUILTIN.iter().copied()).expect("builtin implementation tables are consistent")
});

/// The read-only registry snapshot over all built-in implementations.
///
/// Built once on first use; afterwards only shared reads happen, so the
/// handle can serve any number of concurrent projector calls.
pub fn builtin() -> &'static Registry {
    &REGISTRY
}
