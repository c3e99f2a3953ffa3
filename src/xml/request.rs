//! Request documents: written by the client, read by the emulator.

use super::shapes::{
    namespace, ChangeBatchXml, ChangeResourceRecordSetsRequestXml, ChangeXml,
    CreateHealthCheckRequestXml, CreateHostedZoneRequestXml, HealthCheckConfigXml,
    HostedZoneConfigXml, ResourceRecordSetXml,
};
use super::{from_document, non_empty, required, to_document, XmlError};
use crate::model::{Change, ChangeAction, ChangeBatch, HealthCheckConfig, HostedZoneConfig};

const CREATE_HOSTED_ZONE_REQUEST: &str = "CreateHostedZoneRequest";
const CHANGE_RESOURCE_RECORD_SETS_REQUEST: &str = "ChangeResourceRecordSetsRequest";
const CREATE_HEALTH_CHECK_REQUEST: &str = "CreateHealthCheckRequest";

/// Parameters of `CreateHostedZone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateHostedZoneInput {
    /// Zone name.
    pub name: String,
    /// Idempotency token.
    pub caller_reference: String,
    /// Optional zone settings.
    pub config: HostedZoneConfig,
}

/// Parameters of `CreateHealthCheck`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateHealthCheckInput {
    /// Idempotency token.
    pub caller_reference: String,
    /// Check configuration.
    pub config: HealthCheckConfig,
}

/// Writes a `CreateHostedZoneRequest` document.
pub fn render_create_hosted_zone_request(input: &CreateHostedZoneInput) -> Result<String, XmlError> {
    let doc = CreateHostedZoneRequestXml {
        xmlns: namespace(),
        name: input.name.clone(),
        caller_reference: input.caller_reference.clone(),
        hosted_zone_config: Some(HostedZoneConfigXml::from(&input.config)),
    };
    to_document(CREATE_HOSTED_ZONE_REQUEST, &doc)
}

/// Reads a `CreateHostedZoneRequest` document.
pub fn parse_create_hosted_zone_request(xml: &str) -> Result<CreateHostedZoneInput, XmlError> {
    let doc: CreateHostedZoneRequestXml = from_document(xml, CREATE_HOSTED_ZONE_REQUEST)?;
    Ok(CreateHostedZoneInput {
        name: required(&doc.name, "Name")?.to_string(),
        caller_reference: required(&doc.caller_reference, "CallerReference")?.to_string(),
        config: doc.hosted_zone_config.map(Into::into).unwrap_or_default(),
    })
}

/// Writes a `ChangeResourceRecordSetsRequest` document.
pub fn render_change_batch_request(batch: &ChangeBatch) -> Result<String, XmlError> {
    let doc = ChangeResourceRecordSetsRequestXml {
        xmlns: namespace(),
        change_batch: ChangeBatchXml {
            comment: batch.comment.clone(),
            changes: super::shapes::ChangesXml {
                change: batch
                    .changes
                    .iter()
                    .map(|change| ChangeXml {
                        action: change.action.as_str().to_string(),
                        resource_record_set: ResourceRecordSetXml::from(&change.record_set),
                    })
                    .collect(),
            },
        },
    };
    to_document(CHANGE_RESOURCE_RECORD_SETS_REQUEST, &doc)
}

/// Reads a `ChangeResourceRecordSetsRequest` document.
///
/// An empty change list is returned as-is; rejecting it is the backend's job.
pub fn parse_change_batch_request(xml: &str) -> Result<ChangeBatch, XmlError> {
    let doc: ChangeResourceRecordSetsRequestXml =
        from_document(xml, CHANGE_RESOURCE_RECORD_SETS_REQUEST)?;

    let changes = doc
        .change_batch
        .changes
        .change
        .into_iter()
        .map(|change| {
            let action = ChangeAction::from_str(&change.action).ok_or_else(|| {
                XmlError::InvalidValue {
                    element: "Action",
                    value: change.action.clone(),
                }
            })?;
            Ok(Change::new(action, change.resource_record_set.try_into()?))
        })
        .collect::<Result<Vec<_>, XmlError>>()?;

    Ok(ChangeBatch {
        comment: non_empty(doc.change_batch.comment),
        changes,
    })
}

/// Writes a `CreateHealthCheckRequest` document.
pub fn render_create_health_check_request(
    input: &CreateHealthCheckInput,
) -> Result<String, XmlError> {
    let doc = CreateHealthCheckRequestXml {
        xmlns: namespace(),
        caller_reference: input.caller_reference.clone(),
        health_check_config: HealthCheckConfigXml::from(&input.config),
    };
    to_document(CREATE_HEALTH_CHECK_REQUEST, &doc)
}

/// Reads a `CreateHealthCheckRequest` document.
pub fn parse_create_health_check_request(xml: &str) -> Result<CreateHealthCheckInput, XmlError> {
    let doc: CreateHealthCheckRequestXml = from_document(xml, CREATE_HEALTH_CHECK_REQUEST)?;
    Ok(CreateHealthCheckInput {
        caller_reference: required(&doc.caller_reference, "CallerReference")?.to_string(),
        config: doc.health_check_config.try_into()?,
    })
}
