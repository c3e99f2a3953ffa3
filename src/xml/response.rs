//! Response documents: written by the emulator, read by the client.

use super::shapes::{
    namespace, ChangeInfoResponseXml, ChangeInfoXml, CreateHostedZoneResponseXml,
    DeleteHealthCheckResponseXml, DelegationSetXml, ErrorResponseXml, ErrorXml,
    GetHostedZoneCountResponseXml, GetHostedZoneResponseXml, HealthCheckResponseXml,
    HealthCheckXml, HealthChecksXml, HostedZoneXml, HostedZonesXml,
    ListHealthChecksResponseXml, ListHostedZonesByNameResponseXml, ListHostedZonesResponseXml,
    ListResourceRecordSetsResponseXml, ResourceRecordSetXml, ResourceRecordSetsXml,
};
use super::{from_document, non_empty, to_document, XmlError};
use crate::model::{
    ChangeInfo, CreatedHostedZone, HealthCheck, HostedZone, HostedZoneDetails, Page,
    RecordSetPage, ZonesByNamePage,
};
use crate::types::RecordType;

/// An error document as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDocument {
    /// `Sender` or `Receiver`.
    pub error_type: String,
    /// Error code, e.g. `NoSuchHostedZone`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Request id.
    pub request_id: String,
}

fn zones_xml(zones: &[HostedZone]) -> HostedZonesXml {
    HostedZonesXml {
        hosted_zone: zones.iter().map(HostedZoneXml::from).collect(),
    }
}

fn zones_from_xml(xml: HostedZonesXml) -> Result<Vec<HostedZone>, XmlError> {
    xml.hosted_zone.into_iter().map(TryInto::try_into).collect()
}

fn change_info_document(root: &str, info: &ChangeInfo) -> Result<String, XmlError> {
    let doc = ChangeInfoResponseXml {
        xmlns: namespace(),
        change_info: ChangeInfoXml::from(info),
    };
    to_document(root, &doc)
}

fn change_info_from_document(xml: &str, root: &'static str) -> Result<ChangeInfo, XmlError> {
    let doc: ChangeInfoResponseXml = from_document(xml, root)?;
    doc.change_info.try_into()
}

// =============================================================================
// Hosted zones
// =============================================================================

/// Writes a `CreateHostedZoneResponse`.
pub fn render_create_hosted_zone_response(created: &CreatedHostedZone) -> Result<String, XmlError> {
    let doc = CreateHostedZoneResponseXml {
        xmlns: namespace(),
        hosted_zone: HostedZoneXml::from(&created.hosted_zone),
        change_info: ChangeInfoXml::from(&created.change_info),
        delegation_set: DelegationSetXml::from(&created.delegation_set),
    };
    to_document("CreateHostedZoneResponse", &doc)
}

/// Reads a `CreateHostedZoneResponse`.
pub fn parse_create_hosted_zone_response(xml: &str) -> Result<CreatedHostedZone, XmlError> {
    let doc: CreateHostedZoneResponseXml = from_document(xml, "CreateHostedZoneResponse")?;
    Ok(CreatedHostedZone {
        hosted_zone: doc.hosted_zone.try_into()?,
        change_info: doc.change_info.try_into()?,
        delegation_set: doc.delegation_set.into(),
    })
}

/// Writes a `GetHostedZoneResponse`.
pub fn render_get_hosted_zone_response(details: &HostedZoneDetails) -> Result<String, XmlError> {
    let doc = GetHostedZoneResponseXml {
        xmlns: namespace(),
        hosted_zone: HostedZoneXml::from(&details.hosted_zone),
        delegation_set: DelegationSetXml::from(&details.delegation_set),
    };
    to_document("GetHostedZoneResponse", &doc)
}

/// Reads a `GetHostedZoneResponse`.
pub fn parse_get_hosted_zone_response(xml: &str) -> Result<HostedZoneDetails, XmlError> {
    let doc: GetHostedZoneResponseXml = from_document(xml, "GetHostedZoneResponse")?;
    Ok(HostedZoneDetails {
        hosted_zone: doc.hosted_zone.try_into()?,
        delegation_set: doc.delegation_set.into(),
    })
}

/// Writes a `ListHostedZonesResponse`.
pub fn render_list_hosted_zones_response(page: &Page<HostedZone>) -> Result<String, XmlError> {
    let doc = ListHostedZonesResponseXml {
        xmlns: namespace(),
        hosted_zones: zones_xml(&page.items),
        marker: page.marker.clone(),
        is_truncated: page.is_truncated,
        next_marker: page.next_marker.clone(),
        max_items: page.max_items,
    };
    to_document("ListHostedZonesResponse", &doc)
}

/// Reads a `ListHostedZonesResponse`.
pub fn parse_list_hosted_zones_response(xml: &str) -> Result<Page<HostedZone>, XmlError> {
    let doc: ListHostedZonesResponseXml = from_document(xml, "ListHostedZonesResponse")?;
    Ok(Page {
        items: zones_from_xml(doc.hosted_zones)?,
        marker: non_empty(doc.marker),
        is_truncated: doc.is_truncated,
        next_marker: non_empty(doc.next_marker),
        max_items: doc.max_items,
    })
}

/// Writes a `ListHostedZonesByNameResponse`.
pub fn render_list_hosted_zones_by_name_response(
    page: &ZonesByNamePage,
) -> Result<String, XmlError> {
    let doc = ListHostedZonesByNameResponseXml {
        xmlns: namespace(),
        hosted_zones: zones_xml(&page.hosted_zones),
        dns_name: page.dns_name.clone(),
        hosted_zone_id: page.hosted_zone_id.clone(),
        is_truncated: page.is_truncated,
        next_dns_name: page.next_dns_name.clone(),
        next_hosted_zone_id: page.next_hosted_zone_id.clone(),
        max_items: page.max_items,
    };
    to_document("ListHostedZonesByNameResponse", &doc)
}

/// Reads a `ListHostedZonesByNameResponse`.
pub fn parse_list_hosted_zones_by_name_response(xml: &str) -> Result<ZonesByNamePage, XmlError> {
    let doc: ListHostedZonesByNameResponseXml =
        from_document(xml, "ListHostedZonesByNameResponse")?;
    Ok(ZonesByNamePage {
        hosted_zones: zones_from_xml(doc.hosted_zones)?,
        dns_name: non_empty(doc.dns_name),
        hosted_zone_id: non_empty(doc.hosted_zone_id),
        is_truncated: doc.is_truncated,
        next_dns_name: non_empty(doc.next_dns_name),
        next_hosted_zone_id: non_empty(doc.next_hosted_zone_id),
        max_items: doc.max_items,
    })
}

/// Writes a `GetHostedZoneCountResponse`.
pub fn render_get_hosted_zone_count_response(count: u64) -> Result<String, XmlError> {
    let doc = GetHostedZoneCountResponseXml {
        xmlns: namespace(),
        hosted_zone_count: count,
    };
    to_document("GetHostedZoneCountResponse", &doc)
}

/// Reads a `GetHostedZoneCountResponse`.
pub fn parse_get_hosted_zone_count_response(xml: &str) -> Result<u64, XmlError> {
    let doc: GetHostedZoneCountResponseXml = from_document(xml, "GetHostedZoneCountResponse")?;
    Ok(doc.hosted_zone_count)
}

/// Writes a `DeleteHostedZoneResponse`.
pub fn render_delete_hosted_zone_response(info: &ChangeInfo) -> Result<String, XmlError> {
    change_info_document("DeleteHostedZoneResponse", info)
}

/// Reads a `DeleteHostedZoneResponse`.
pub fn parse_delete_hosted_zone_response(xml: &str) -> Result<ChangeInfo, XmlError> {
    change_info_from_document(xml, "DeleteHostedZoneResponse")
}

// =============================================================================
// Record sets and changes
// =============================================================================

/// Writes a `ChangeResourceRecordSetsResponse`.
pub fn render_change_resource_record_sets_response(info: &ChangeInfo) -> Result<String, XmlError> {
    change_info_document("ChangeResourceRecordSetsResponse", info)
}

/// Reads a `ChangeResourceRecordSetsResponse`.
pub fn parse_change_resource_record_sets_response(xml: &str) -> Result<ChangeInfo, XmlError> {
    change_info_from_document(xml, "ChangeResourceRecordSetsResponse")
}

/// Writes a `GetChangeResponse`.
pub fn render_get_change_response(info: &ChangeInfo) -> Result<String, XmlError> {
    change_info_document("GetChangeResponse", info)
}

/// Reads a `GetChangeResponse`.
pub fn parse_get_change_response(xml: &str) -> Result<ChangeInfo, XmlError> {
    change_info_from_document(xml, "GetChangeResponse")
}

/// Writes a `ListResourceRecordSetsResponse`.
pub fn render_list_resource_record_sets_response(page: &RecordSetPage) -> Result<String, XmlError> {
    let doc = ListResourceRecordSetsResponseXml {
        xmlns: namespace(),
        resource_record_sets: ResourceRecordSetsXml {
            resource_record_set: page
                .record_sets
                .iter()
                .map(ResourceRecordSetXml::from)
                .collect(),
        },
        is_truncated: page.is_truncated,
        next_record_name: page.next_record_name.clone(),
        next_record_type: page.next_record_type.map(|t| t.as_str().to_string()),
        next_record_identifier: page.next_record_identifier.clone(),
        max_items: page.max_items,
    };
    to_document("ListResourceRecordSetsResponse", &doc)
}

/// Reads a `ListResourceRecordSetsResponse`.
pub fn parse_list_resource_record_sets_response(xml: &str) -> Result<RecordSetPage, XmlError> {
    let doc: ListResourceRecordSetsResponseXml =
        from_document(xml, "ListResourceRecordSetsResponse")?;

    let next_record_type = match non_empty(doc.next_record_type) {
        Some(t) => Some(
            RecordType::from_str(&t).ok_or(XmlError::InvalidValue {
                element: "NextRecordType",
                value: t,
            })?,
        ),
        None => None,
    };

    Ok(RecordSetPage {
        record_sets: doc
            .resource_record_sets
            .resource_record_set
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?,
        is_truncated: doc.is_truncated,
        next_record_name: non_empty(doc.next_record_name),
        next_record_type,
        next_record_identifier: non_empty(doc.next_record_identifier),
        max_items: doc.max_items,
    })
}

// =============================================================================
// Health checks
// =============================================================================

/// Writes a `CreateHealthCheckResponse`.
pub fn render_create_health_check_response(check: &HealthCheck) -> Result<String, XmlError> {
    let doc = HealthCheckResponseXml {
        xmlns: namespace(),
        health_check: HealthCheckXml::from(check),
    };
    to_document("CreateHealthCheckResponse", &doc)
}

/// Reads a `CreateHealthCheckResponse`.
pub fn parse_create_health_check_response(xml: &str) -> Result<HealthCheck, XmlError> {
    let doc: HealthCheckResponseXml = from_document(xml, "CreateHealthCheckResponse")?;
    doc.health_check.try_into()
}

/// Writes a `GetHealthCheckResponse`.
pub fn render_get_health_check_response(check: &HealthCheck) -> Result<String, XmlError> {
    let doc = HealthCheckResponseXml {
        xmlns: namespace(),
        health_check: HealthCheckXml::from(check),
    };
    to_document("GetHealthCheckResponse", &doc)
}

/// Reads a `GetHealthCheckResponse`.
pub fn parse_get_health_check_response(xml: &str) -> Result<HealthCheck, XmlError> {
    let doc: HealthCheckResponseXml = from_document(xml, "GetHealthCheckResponse")?;
    doc.health_check.try_into()
}

/// Writes a `ListHealthChecksResponse`.
pub fn render_list_health_checks_response(page: &Page<HealthCheck>) -> Result<String, XmlError> {
    let doc = ListHealthChecksResponseXml {
        xmlns: namespace(),
        health_checks: HealthChecksXml {
            health_check: page.items.iter().map(HealthCheckXml::from).collect(),
        },
        marker: page.marker.clone(),
        is_truncated: page.is_truncated,
        next_marker: page.next_marker.clone(),
        max_items: page.max_items,
    };
    to_document("ListHealthChecksResponse", &doc)
}

/// Reads a `ListHealthChecksResponse`.
pub fn parse_list_health_checks_response(xml: &str) -> Result<Page<HealthCheck>, XmlError> {
    let doc: ListHealthChecksResponseXml = from_document(xml, "ListHealthChecksResponse")?;
    Ok(Page {
        items: doc
            .health_checks
            .health_check
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?,
        marker: non_empty(doc.marker),
        is_truncated: doc.is_truncated,
        next_marker: non_empty(doc.next_marker),
        max_items: doc.max_items,
    })
}

/// Writes a `DeleteHealthCheckResponse`.
pub fn render_delete_health_check_response() -> Result<String, XmlError> {
    let doc = DeleteHealthCheckResponseXml { xmlns: namespace() };
    to_document("DeleteHealthCheckResponse", &doc)
}

// =============================================================================
// Errors
// =============================================================================

/// Writes an `ErrorResponse`.
pub fn render_error_response(error: &ErrorDocument) -> Result<String, XmlError> {
    let doc = ErrorResponseXml {
        xmlns: namespace(),
        error: ErrorXml {
            error_type: error.error_type.clone(),
            code: error.code.clone(),
            message: error.message.clone(),
        },
        request_id: error.request_id.clone(),
    };
    to_document("ErrorResponse", &doc)
}

/// Reads an `ErrorResponse`.
pub fn parse_error_response(xml: &str) -> Result<ErrorDocument, XmlError> {
    let doc: ErrorResponseXml = from_document(xml, "ErrorResponse")?;
    Ok(ErrorDocument {
        error_type: doc.error.error_type.trim().to_string(),
        code: doc.error.code.trim().to_string(),
        message: doc.error.message.trim().to_string(),
        request_id: doc.request_id.trim().to_string(),
    })
}
