//! Plan/state merge and the per-record lifecycle.
//!
//! Two merges happen per call cycle. Outbound, the declared plan is resolved
//! against the last persisted state so entries the user never specified keep
//! their remote value. Inbound, the remote response becomes the new
//! persisted state, because the remote service is the authority on computed
//! and defaulted values.

use std::collections::BTreeMap;

use snafu::{Snafu, ensure};
use tracing::debug;

use crate::{
    record::{PlanValue, Record, RecordPlan},
    schema::{FieldKind, ImplementationSpec},
    value::FieldValue,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display(
        "field {field:?} of {implementation:?} declares a {found} value, its schema says {expected}"
    ))]
    KindMismatch {
        implementation: String,
        field: &'static str,
        expected: FieldKind,
        found: FieldKind,
    },

    #[snafu(display(
        "plan for {plan:?} was reconciled against the schema of {implementation:?}"
    ))]
    ImplementationMismatch {
        plan: String,
        implementation: &'static str,
    },
}

/// Produces the outbound request record from the declared plan and the prior
/// persisted state.
///
/// Declared entries always win. Entries the user left unspecified keep the
/// prior persisted value when one exists and only fall back to the kind's
/// zero value on first create; a no-op plan therefore never changes remote
/// state. Iteration is driven by the schema, so fields absent from the plan
/// map are still carried over, and plan entries the schema does not know are
/// dropped, mirroring the no-leak rule of projection.
pub fn outbound(
    prior: Option<&Record>,
    plan: &RecordPlan,
    spec: &ImplementationSpec,
) -> Result<Record> {
    ensure!(
        plan.implementation == spec.implementation,
        ImplementationMismatchSnafu {
            plan: plan.implementation.as_str(),
            implementation: spec.implementation,
        }
    );

    let mut fields = BTreeMap::new();
    for field_spec in spec.fields {
        let planned = plan.fields.get(field_spec.name);
        if let Some(value) = planned.and_then(PlanValue::as_declared) {
            ensure!(
                value.kind() == field_spec.kind,
                KindMismatchSnafu {
                    implementation: plan.implementation.as_str(),
                    field: field_spec.name,
                    expected: field_spec.kind,
                    found: value.kind(),
                }
            );
        }

        let prior_value = prior.and_then(|record| record.fields.get(field_spec.name));
        let value = planned
            .cloned()
            .unwrap_or_default()
            .resolve_with(prior_value, || FieldValue::zero(field_spec.kind));
        fields.insert(field_spec.name.to_owned(), value);
    }

    let record = Record {
        implementation: spec.implementation.to_owned(),
        // identity is assigned by the remote service; keep what the prior
        // state knows
        id: prior.and_then(|record| record.id),
        name: plan.name.clone(),
        tags: plan.tags.resolve(prior.map(|record| &record.tags)),
        attributes: plan
            .attributes
            .resolve(prior.map(|record| &record.attributes)),
        fields,
    };
    debug!(
        implementation = spec.implementation,
        name = %record.name,
        create = prior.is_none(),
        "reconciled outbound record"
    );
    Ok(record)
}

/// Adopts the remote response as the value to persist after a successful
/// write.
///
/// Everything present in the response overwrites the sent copy, including
/// values the remote service computed or defaulted, so persisted state
/// reflects authoritative truth rather than what the user typed. Sensitive
/// fields arrive verbatim (the remote service may mask them) and are not
/// compared for drift. Schema fields the response omitted keep the value
/// that was sent.
pub fn inbound(sent: &Record, mut response: Record, spec: &ImplementationSpec) -> Record {
    for field_spec in spec.fields {
        if !response.fields.contains_key(field_spec.name) {
            if let Some(value) = sent.fields.get(field_spec.name) {
                response
                    .fields
                    .insert(field_spec.name.to_owned(), value.clone());
            }
        }
    }
    if response.id.is_none() {
        response.id = sent.id;
    }

    debug!(
        implementation = spec.implementation,
        name = %response.name,
        id = response.id,
        "adopted remote response as persisted state"
    );
    response
}

/// Per-record lifecycle across one call cycle.
///
/// A transport failure returns the record to [`Lifecycle::Declared`]: no
/// partial write is assumed, and the engine never retries (retrying is the
/// transport collaborator's concern).
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Lifecycle {
    /// Nothing is known about the remote side yet.
    Unknown,
    /// The plan is resolved but nothing has been sent.
    Declared,
    /// The outbound request was handed to the transport.
    Sent,
    /// The remote service acknowledged the record.
    Confirmed,
    /// The remote service acknowledged the deletion.
    Absent,
}

/// Observable outcomes that drive lifecycle transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleEvent {
    /// The outbound request was handed to the transport.
    Submitted,
    /// The remote service acknowledged a create or update.
    Written,
    /// The remote service acknowledged a delete.
    Deleted,
    /// The transport reported a failure.
    TransportFailed,
    /// An existing identity was read successfully.
    Observed,
}

impl Lifecycle {
    /// Applies one cycle event. Events that do not apply to the current
    /// state leave it unchanged.
    pub fn advance(self, event: CycleEvent) -> Self {
        match (self, event) {
            (Self::Declared, CycleEvent::Submitted) => Self::Sent,
            (Self::Sent, CycleEvent::Written) => Self::Confirmed,
            (Self::Sent, CycleEvent::Deleted) => Self::Absent,
            (Self::Sent, CycleEvent::TransportFailed) => Self::Declared,
            (Self::Unknown, CycleEvent::Observed) => Self::Confirmed,
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::rstest;

    use super::*;
    use crate::{
        record::{FamilyAttributes, FamilyAttributesPlan, MetadataAttributes, MetadataAttributesPlan},
        schema::{Family, FieldSpec},
        set,
    };

    const FILEBOT: ImplementationSpec = ImplementationSpec {
        implementation: "Filebot",
        config_contract: "FilebotSettings",
        protocol: None,
        family: Family::Metadata,
        fields: &[
            FieldSpec::new("x", FieldKind::Int64),
            FieldSpec::new("y", FieldKind::String),
        ],
    };

    fn state() -> Record {
        Record {
            implementation: "Filebot".to_owned(),
            id: Some(9),
            name: "fb".to_owned(),
            tags: set::normalize([1, 2]),
            attributes: FamilyAttributes::Metadata(MetadataAttributes { enable: true }),
            fields: BTreeMap::from([
                ("x".to_owned(), FieldValue::Int(5)),
                ("y".to_owned(), FieldValue::from("a")),
            ]),
        }
    }

    fn empty_plan() -> RecordPlan {
        RecordPlan::new(
            "Filebot",
            "fb",
            FamilyAttributesPlan::Metadata(MetadataAttributesPlan::default()),
        )
    }

    #[test]
    fn noop_plan_preserves_remote_state() {
        let state = state();
        let reconciled = outbound(Some(&state), &empty_plan(), &FILEBOT).unwrap();
        assert_eq!(reconciled, state);
    }

    #[test]
    fn partial_plan_preserves_unspecified_fields() {
        let state = state();
        let plan = empty_plan().declare("x", 7_i64);

        let reconciled = outbound(Some(&state), &plan, &FILEBOT).unwrap();
        assert_eq!(reconciled.fields["x"], FieldValue::Int(7));
        assert_eq!(reconciled.fields["y"], FieldValue::from("a"));
        assert_eq!(reconciled.tags, state.tags);
        assert_eq!(reconciled.id, Some(9));
    }

    #[test]
    fn explicit_zero_resets_a_field() {
        let state = state();
        let mut plan = empty_plan();
        plan.fields.insert("y".to_owned(), PlanValue::ExplicitZero);

        let reconciled = outbound(Some(&state), &plan, &FILEBOT).unwrap();
        assert_eq!(reconciled.fields["y"], FieldValue::String(String::new()));
        assert_eq!(reconciled.fields["x"], FieldValue::Int(5));
    }

    #[test]
    fn first_create_fills_unspecified_fields_with_zero() {
        let plan = empty_plan().declare("x", 7_i64);
        let reconciled = outbound(None, &plan, &FILEBOT).unwrap();
        assert_eq!(reconciled.id, None);
        assert_eq!(reconciled.fields["x"], FieldValue::Int(7));
        assert_eq!(reconciled.fields["y"], FieldValue::String(String::new()));
    }

    #[test]
    fn plan_fields_unknown_to_the_schema_are_dropped() {
        let plan = empty_plan().declare("z", true);
        let reconciled = outbound(None, &plan, &FILEBOT).unwrap();
        assert!(!reconciled.fields.contains_key("z"));
    }

    #[test]
    fn declared_value_of_the_wrong_kind_is_rejected() {
        let plan = empty_plan().declare("x", "seven");
        let err = outbound(Some(&state()), &plan, &FILEBOT).unwrap_err();
        assert_eq!(
            err,
            Error::KindMismatch {
                implementation: "Filebot".to_owned(),
                field: "x",
                expected: FieldKind::Int64,
                found: FieldKind::String,
            }
        );
    }

    #[test]
    fn plan_for_another_implementation_is_rejected() {
        let mut plan = empty_plan();
        plan.implementation = "Kodi".to_owned();
        let err = outbound(None, &plan, &FILEBOT).unwrap_err();
        assert_eq!(
            err,
            Error::ImplementationMismatch {
                plan: "Kodi".to_owned(),
                implementation: "Filebot",
            }
        );
    }

    #[test]
    fn inbound_response_overwrites_sent_values() {
        let sent = state();
        let mut response = state();
        response.id = Some(42);
        response
            .fields
            .insert("x".to_owned(), FieldValue::Int(99));

        let persisted = inbound(&sent, response.clone(), &FILEBOT);
        assert_eq!(persisted, response);
    }

    #[test]
    fn inbound_keeps_sent_values_for_omitted_fields() {
        let sent = state();
        let mut response = state();
        response.fields.remove("y");
        response.id = None;

        let persisted = inbound(&sent, response, &FILEBOT);
        assert_eq!(persisted.fields["y"], FieldValue::from("a"));
        assert_eq!(persisted.id, Some(9));
    }

    #[rstest]
    #[case(Lifecycle::Declared, CycleEvent::Submitted, Lifecycle::Sent)]
    #[case(Lifecycle::Sent, CycleEvent::Written, Lifecycle::Confirmed)]
    #[case(Lifecycle::Sent, CycleEvent::Deleted, Lifecycle::Absent)]
    #[case(Lifecycle::Sent, CycleEvent::TransportFailed, Lifecycle::Declared)]
    #[case(Lifecycle::Unknown, CycleEvent::Observed, Lifecycle::Confirmed)]
    #[case(Lifecycle::Confirmed, CycleEvent::Written, Lifecycle::Confirmed)]
    #[case(Lifecycle::Declared, CycleEvent::Written, Lifecycle::Declared)]
    fn lifecycle_transitions(
        #[case] from: Lifecycle,
        #[case] event: CycleEvent,
        #[case] to: Lifecycle,
    ) {
        assert_eq!(from.advance(event), to);
    }
}
