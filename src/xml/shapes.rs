//! Serde shapes of Route53 XML elements and documents.
//!
//! Field order follows the API schema, which is the order quick-xml writes
//! them in. Every shape defaults missing elements so that validation happens
//! in the conversion functions, where the error can name the element.

use serde::{Deserialize, Serialize};

use super::{non_empty, required, XmlError};
use crate::model::{
    AliasTarget, ChangeInfo, ChangeStatus, DelegationSet, HealthCheck, HealthCheckConfig,
    HostedZone, HostedZoneConfig, ResourceRecordSet, ROUTE53_XMLNS,
};
use crate::types::{RecordType, Ttl};

// =============================================================================
// Shared elements
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct HostedZoneConfigXml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub private_zone: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct HostedZoneXml {
    pub id: String,
    pub name: String,
    pub caller_reference: String,
    pub config: HostedZoneConfigXml,
    pub resource_record_set_count: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HostedZonesXml {
    #[serde(rename = "HostedZone")]
    pub hosted_zone: Vec<HostedZoneXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct NameServersXml {
    #[serde(rename = "NameServer")]
    pub name_server: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct DelegationSetXml {
    pub name_servers: NameServersXml,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct ChangeInfoXml {
    pub id: String,
    pub status: String,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ResourceRecordXml {
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ResourceRecordsXml {
    #[serde(rename = "ResourceRecord")]
    pub resource_record: Vec<ResourceRecordXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AliasTargetXml {
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    #[serde(rename = "EvaluateTargetHealth")]
    pub evaluate_target_health: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct ResourceRecordSetXml {
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_records: Option<ResourceRecordsXml>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTargetXml>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ResourceRecordSetsXml {
    #[serde(rename = "ResourceRecordSet")]
    pub resource_record_set: Vec<ResourceRecordSetXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct ChangeXml {
    pub action: String,
    pub resource_record_set: ResourceRecordSetXml,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ChangesXml {
    #[serde(rename = "Change")]
    pub change: Vec<ChangeXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct ChangeBatchXml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub changes: ChangesXml,
}

/// Numeric fields are kept as text so that a bad number is reported
/// against its element instead of failing the whole document.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HealthCheckConfigXml {
    #[serde(rename = "IPAddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(rename = "Port", skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(rename = "Type")]
    pub check_type: String,
    #[serde(rename = "ResourcePath", skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,
    #[serde(
        rename = "FullyQualifiedDomainName",
        skip_serializing_if = "Option::is_none"
    )]
    pub fully_qualified_domain_name: Option<String>,
    #[serde(rename = "SearchString", skip_serializing_if = "Option::is_none")]
    pub search_string: Option<String>,
    #[serde(rename = "RequestInterval", skip_serializing_if = "Option::is_none")]
    pub request_interval: Option<String>,
    #[serde(rename = "FailureThreshold", skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct HealthCheckXml {
    pub id: String,
    pub caller_reference: String,
    pub health_check_config: HealthCheckConfigXml,
    pub health_check_version: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HealthChecksXml {
    #[serde(rename = "HealthCheck")]
    pub health_check: Vec<HealthCheckXml>,
}

// =============================================================================
// Request documents
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "CreateHostedZoneRequest", rename_all = "PascalCase")]
pub(crate) struct CreateHostedZoneRequestXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub name: String,
    pub caller_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosted_zone_config: Option<HostedZoneConfigXml>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(
    default,
    rename = "ChangeResourceRecordSetsRequest",
    rename_all = "PascalCase"
)]
pub(crate) struct ChangeResourceRecordSetsRequestXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub change_batch: ChangeBatchXml,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "CreateHealthCheckRequest", rename_all = "PascalCase")]
pub(crate) struct CreateHealthCheckRequestXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub caller_reference: String,
    pub health_check_config: HealthCheckConfigXml,
}

// =============================================================================
// Response documents
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "CreateHostedZoneResponse", rename_all = "PascalCase")]
pub(crate) struct CreateHostedZoneResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub hosted_zone: HostedZoneXml,
    pub change_info: ChangeInfoXml,
    pub delegation_set: DelegationSetXml,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "GetHostedZoneResponse", rename_all = "PascalCase")]
pub(crate) struct GetHostedZoneResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub hosted_zone: HostedZoneXml,
    pub delegation_set: DelegationSetXml,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "ListHostedZonesResponse", rename_all = "PascalCase")]
pub(crate) struct ListHostedZonesResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub hosted_zones: HostedZonesXml,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    pub is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    pub max_items: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "ListHostedZonesByNameResponse")]
pub(crate) struct ListHostedZonesByNameResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "HostedZones")]
    pub hosted_zones: HostedZonesXml,
    #[serde(rename = "DNSName", skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    #[serde(rename = "HostedZoneId", skip_serializing_if = "Option::is_none")]
    pub hosted_zone_id: Option<String>,
    #[serde(rename = "IsTruncated")]
    pub is_truncated: bool,
    #[serde(rename = "NextDNSName", skip_serializing_if = "Option::is_none")]
    pub next_dns_name: Option<String>,
    #[serde(rename = "NextHostedZoneId", skip_serializing_if = "Option::is_none")]
    pub next_hosted_zone_id: Option<String>,
    #[serde(rename = "MaxItems")]
    pub max_items: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "GetHostedZoneCountResponse", rename_all = "PascalCase")]
pub(crate) struct GetHostedZoneCountResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub hosted_zone_count: u64,
}

/// Shared by the responses that carry nothing but a change info.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct ChangeInfoResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub change_info: ChangeInfoXml,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(
    default,
    rename = "ListResourceRecordSetsResponse",
    rename_all = "PascalCase"
)]
pub(crate) struct ListResourceRecordSetsResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub resource_record_sets: ResourceRecordSetsXml,
    pub is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_record_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_record_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_record_identifier: Option<String>,
    pub max_items: usize,
}

/// Shared by `CreateHealthCheckResponse` and `GetHealthCheckResponse`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct HealthCheckResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub health_check: HealthCheckXml,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "ListHealthChecksResponse", rename_all = "PascalCase")]
pub(crate) struct ListHealthChecksResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub health_checks: HealthChecksXml,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    pub is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    pub max_items: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "DeleteHealthCheckResponse")]
pub(crate) struct DeleteHealthCheckResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct ErrorXml {
    #[serde(rename = "Type")]
    pub error_type: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename = "ErrorResponse", rename_all = "PascalCase")]
pub(crate) struct ErrorResponseXml {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub error: ErrorXml,
    pub request_id: String,
}

/// Builds the namespace attribute value for a new document.
pub(crate) fn namespace() -> String {
    ROUTE53_XMLNS.to_string()
}

// =============================================================================
// Conversions between shapes and the model
// =============================================================================

fn parse_number<T: std::str::FromStr>(
    value: Option<String>,
    element: &'static str,
) -> Result<Option<T>, XmlError> {
    match non_empty(value) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| XmlError::InvalidValue { element, value: v }),
        None => Ok(None),
    }
}

impl From<&HostedZoneConfig> for HostedZoneConfigXml {
    fn from(config: &HostedZoneConfig) -> Self {
        Self {
            comment: config.comment.clone(),
            private_zone: config.private_zone,
        }
    }
}

impl From<HostedZoneConfigXml> for HostedZoneConfig {
    fn from(xml: HostedZoneConfigXml) -> Self {
        Self {
            comment: non_empty(xml.comment),
            private_zone: xml.private_zone,
        }
    }
}

impl From<&HostedZone> for HostedZoneXml {
    fn from(zone: &HostedZone) -> Self {
        Self {
            id: zone.path_id(),
            name: zone.name.clone(),
            caller_reference: zone.caller_reference.clone(),
            config: HostedZoneConfigXml::from(&zone.config),
            resource_record_set_count: zone.resource_record_set_count,
        }
    }
}

impl TryFrom<HostedZoneXml> for HostedZone {
    type Error = XmlError;

    fn try_from(xml: HostedZoneXml) -> Result<Self, Self::Error> {
        let id = required(&xml.id, "Id")?;
        Ok(Self {
            id: crate::model::strip_zone_id_prefix(id).to_string(),
            name: required(&xml.name, "Name")?.to_string(),
            caller_reference: xml.caller_reference.trim().to_string(),
            config: xml.config.into(),
            resource_record_set_count: xml.resource_record_set_count,
        })
    }
}

impl From<&DelegationSet> for DelegationSetXml {
    fn from(set: &DelegationSet) -> Self {
        Self {
            name_servers: NameServersXml {
                name_server: set.name_servers.clone(),
            },
        }
    }
}

impl From<DelegationSetXml> for DelegationSet {
    fn from(xml: DelegationSetXml) -> Self {
        Self {
            name_servers: xml
                .name_servers
                .name_server
                .into_iter()
                .map(|ns| ns.trim().to_string())
                .filter(|ns| !ns.is_empty())
                .collect(),
        }
    }
}

impl From<&ChangeInfo> for ChangeInfoXml {
    fn from(info: &ChangeInfo) -> Self {
        Self {
            id: info.path_id(),
            status: info.status.as_str().to_string(),
            submitted_at: info.submitted_at.clone(),
            comment: info.comment.clone(),
        }
    }
}

impl TryFrom<ChangeInfoXml> for ChangeInfo {
    type Error = XmlError;

    fn try_from(xml: ChangeInfoXml) -> Result<Self, Self::Error> {
        let id = required(&xml.id, "Id")?;
        let status = ChangeStatus::from_str(&xml.status).ok_or_else(|| XmlError::InvalidValue {
            element: "Status",
            value: xml.status.clone(),
        })?;
        Ok(Self {
            id: crate::model::strip_change_id_prefix(id).to_string(),
            status,
            submitted_at: xml.submitted_at.trim().to_string(),
            comment: non_empty(xml.comment),
        })
    }
}

impl From<&ResourceRecordSet> for ResourceRecordSetXml {
    fn from(rrset: &ResourceRecordSet) -> Self {
        let resource_records = if rrset.resource_records.is_empty() {
            None
        } else {
            Some(ResourceRecordsXml {
                resource_record: rrset
                    .resource_records
                    .iter()
                    .map(|value| ResourceRecordXml {
                        value: value.clone(),
                    })
                    .collect(),
            })
        };

        Self {
            name: rrset.name.clone(),
            record_type: rrset.record_type.as_str().to_string(),
            set_identifier: rrset.set_identifier.clone(),
            weight: rrset.weight.map(|w| w.to_string()),
            region: rrset.region.clone(),
            failover: rrset.failover.clone(),
            ttl: rrset.ttl.map(|t| t.to_string()),
            resource_records,
            alias_target: rrset.alias_target.as_ref().map(|alias| AliasTargetXml {
                hosted_zone_id: alias.hosted_zone_id.clone(),
                dns_name: alias.dns_name.clone(),
                evaluate_target_health: alias.evaluate_target_health,
            }),
            health_check_id: rrset.health_check_id.clone(),
        }
    }
}

impl TryFrom<ResourceRecordSetXml> for ResourceRecordSet {
    type Error = XmlError;

    fn try_from(xml: ResourceRecordSetXml) -> Result<Self, Self::Error> {
        let name = required(&xml.name, "Name")?.to_string();
        let type_str = required(&xml.record_type, "Type")?;
        let record_type = RecordType::from_str(type_str).ok_or_else(|| XmlError::InvalidValue {
            element: "Type",
            value: type_str.to_string(),
        })?;

        let ttl = match non_empty(xml.ttl) {
            Some(v) => Some(
                Ttl::parse(&v)
                    .ok_or(XmlError::InvalidValue {
                        element: "TTL",
                        value: v,
                    })?
                    .as_secs(),
            ),
            None => None,
        };

        let resource_records = xml
            .resource_records
            .map(|records| {
                records
                    .resource_record
                    .into_iter()
                    .map(|r| r.value.trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let alias_target = match xml.alias_target {
            Some(alias) => Some(AliasTarget {
                hosted_zone_id: required(&alias.hosted_zone_id, "HostedZoneId")?.to_string(),
                dns_name: required(&alias.dns_name, "DNSName")?.to_string(),
                evaluate_target_health: alias.evaluate_target_health,
            }),
            None => None,
        };

        Ok(Self {
            name,
            record_type,
            set_identifier: non_empty(xml.set_identifier),
            weight: parse_number(xml.weight, "Weight")?,
            region: non_empty(xml.region),
            failover: non_empty(xml.failover),
            ttl,
            resource_records,
            health_check_id: non_empty(xml.health_check_id),
            alias_target,
        })
    }
}

impl From<&HealthCheckConfig> for HealthCheckConfigXml {
    fn from(config: &HealthCheckConfig) -> Self {
        Self {
            ip_address: config.ip_address.clone(),
            port: config.port.map(|p| p.to_string()),
            check_type: config.check_type.clone(),
            resource_path: config.resource_path.clone(),
            fully_qualified_domain_name: config.fully_qualified_domain_name.clone(),
            search_string: config.search_string.clone(),
            request_interval: config.request_interval.map(|i| i.to_string()),
            failure_threshold: config.failure_threshold.map(|t| t.to_string()),
        }
    }
}

impl TryFrom<HealthCheckConfigXml> for HealthCheckConfig {
    type Error = XmlError;

    fn try_from(xml: HealthCheckConfigXml) -> Result<Self, Self::Error> {
        Ok(Self {
            ip_address: non_empty(xml.ip_address),
            port: parse_number(xml.port, "Port")?,
            check_type: required(&xml.check_type, "Type")?.to_string(),
            resource_path: non_empty(xml.resource_path),
            fully_qualified_domain_name: non_empty(xml.fully_qualified_domain_name),
            search_string: non_empty(xml.search_string),
            request_interval: parse_number(xml.request_interval, "RequestInterval")?,
            failure_threshold: parse_number(xml.failure_threshold, "FailureThreshold")?,
        })
    }
}

impl From<&HealthCheck> for HealthCheckXml {
    fn from(check: &HealthCheck) -> Self {
        Self {
            id: check.id.clone(),
            caller_reference: check.caller_reference.clone(),
            health_check_config: HealthCheckConfigXml::from(&check.config),
            health_check_version: check.version,
        }
    }
}

impl TryFrom<HealthCheckXml> for HealthCheck {
    type Error = XmlError;

    fn try_from(xml: HealthCheckXml) -> Result<Self, Self::Error> {
        Ok(Self {
            id: required(&xml.id, "Id")?.to_string(),
            caller_reference: xml.caller_reference.trim().to_string(),
            config: xml.health_check_config.try_into()?,
            version: xml.health_check_version,
        })
    }
}
