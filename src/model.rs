//! Route53 resource model shared by the emulator backend, the XML codec and
//! the client.
//!
//! Numeric fields that the API transports as strings (TTL, weight, port,
//! request interval, ...) are kept as integers here and formatted back to
//! decimal strings by the codec.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{normalize_name, RecordType};

/// XML namespace of the 2013-04-01 Route53 API.
pub const ROUTE53_XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

/// API version prefix used in every request path.
pub const API_VERSION: &str = "2013-04-01";

const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";
const CHANGE_PREFIX: &str = "/change/";
const HEALTH_CHECK_PREFIX: &str = "/healthcheck/";

/// Strips a leading `/hostedzone/` from a zone id, if present.
pub fn strip_zone_id_prefix(id: &str) -> &str {
    id.strip_prefix(HOSTED_ZONE_PREFIX).unwrap_or(id)
}

/// Strips a leading `/change/` from a change id, if present.
pub fn strip_change_id_prefix(id: &str) -> &str {
    id.strip_prefix(CHANGE_PREFIX).unwrap_or(id)
}

/// Strips a leading `/healthcheck/` from a health check id, if present.
pub fn strip_health_check_id_prefix(id: &str) -> &str {
    id.strip_prefix(HEALTH_CHECK_PREFIX).unwrap_or(id)
}

/// Optional settings attached to a hosted zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZoneConfig {
    /// Free-form comment.
    pub comment: Option<String>,
    /// Whether the zone is private (VPC-associated).
    pub private_zone: bool,
}

/// A hosted zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    /// Bare zone id (e.g. `Z1D633PJN98FT9`), without the `/hostedzone/` prefix.
    pub id: String,
    /// Zone name as submitted at creation.
    pub name: String,
    /// Caller-supplied idempotency token.
    pub caller_reference: String,
    /// Zone settings.
    pub config: HostedZoneConfig,
    /// Number of record sets in the zone.
    pub resource_record_set_count: u64,
}

impl HostedZone {
    /// Returns the id in API form: `/hostedzone/<id>`.
    pub fn path_id(&self) -> String {
        format!("{}{}", HOSTED_ZONE_PREFIX, self.id)
    }

    /// Returns the zone ARN.
    pub fn arn(&self) -> String {
        format!("arn:aws:route53:::hostedzone/{}", self.id)
    }
}

/// Name servers assigned to a hosted zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationSet {
    /// Fully qualified name server host names.
    pub name_servers: Vec<String>,
}

/// Result of `CreateHostedZone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedHostedZone {
    /// The new zone.
    pub hosted_zone: HostedZone,
    /// Change that created it.
    pub change_info: ChangeInfo,
    /// Name servers assigned to it.
    pub delegation_set: DelegationSet,
}

/// Result of `GetHostedZone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZoneDetails {
    /// The zone.
    pub hosted_zone: HostedZone,
    /// Name servers assigned to it.
    pub delegation_set: DelegationSet,
}

/// Alias target of an alias record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    /// Hosted zone id of the target.
    pub hosted_zone_id: String,
    /// DNS name of the target.
    pub dns_name: String,
    /// Whether the target's health is evaluated.
    pub evaluate_target_health: bool,
}

/// A resource record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecordSet {
    /// Owner name, as submitted.
    pub name: String,
    /// Record type.
    pub record_type: RecordType,
    /// Distinguishes record sets sharing a name and type (weighted, latency, failover).
    pub set_identifier: Option<String>,
    /// Weight for weighted routing.
    pub weight: Option<u64>,
    /// Region for latency routing.
    pub region: Option<String>,
    /// `PRIMARY` or `SECONDARY` for failover routing.
    pub failover: Option<String>,
    /// TTL in seconds; absent on alias record sets.
    pub ttl: Option<u32>,
    /// Record values.
    pub resource_records: Vec<String>,
    /// Associated health check id.
    pub health_check_id: Option<String>,
    /// Alias target, for alias record sets.
    pub alias_target: Option<AliasTarget>,
}

impl ResourceRecordSet {
    /// Creates a simple (non-routed) record set.
    pub fn new(name: impl Into<String>, record_type: RecordType, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type,
            set_identifier: None,
            weight: None,
            region: None,
            failover: None,
            ttl: Some(ttl),
            resource_records: Vec::new(),
            health_check_id: None,
            alias_target: None,
        }
    }

    /// Adds a value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.resource_records.push(value.into());
        self
    }

    /// Sets the set identifier.
    pub fn with_set_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.set_identifier = Some(identifier.into());
        self
    }

    /// Sets the routing weight.
    pub fn with_weight(mut self, weight: u64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Associates a health check.
    pub fn with_health_check(mut self, health_check_id: impl Into<String>) -> Self {
        self.health_check_id = Some(health_check_id.into());
        self
    }

    /// Identity of the record set within its zone.
    pub fn key(&self) -> RecordSetKey {
        RecordSetKey {
            name: normalize_name(&self.name),
            record_type: self.record_type,
            set_identifier: self.set_identifier.clone(),
        }
    }
}

/// Identity of a record set: normalized name, type and set identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordSetKey {
    /// Normalized owner name.
    pub name: String,
    /// Record type.
    pub record_type: RecordType,
    /// Set identifier, if any.
    pub set_identifier: Option<String>,
}

impl fmt::Display for RecordSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.set_identifier {
            Some(id) => write!(f, "{} {} ({})", self.name, self.record_type, id),
            None => write!(f, "{} {}", self.name, self.record_type),
        }
    }
}

/// Action of a single change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeAction {
    /// Create a record set that must not exist yet.
    Create,
    /// Delete an existing record set.
    Delete,
    /// Create or replace a record set.
    Upsert,
}

impl ChangeAction {
    /// Parses the wire form (`CREATE`, `DELETE`, `UPSERT`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "CREATE" => Some(Self::Create),
            "DELETE" => Some(Self::Delete),
            "UPSERT" => Some(Self::Upsert),
            _ => None,
        }
    }

    /// Returns the wire form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Upsert => "UPSERT",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One change of a change batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// What to do.
    pub action: ChangeAction,
    /// The record set to act on.
    pub record_set: ResourceRecordSet,
}

impl Change {
    /// Creates a change.
    pub fn new(action: ChangeAction, record_set: ResourceRecordSet) -> Self {
        Self { action, record_set }
    }
}

/// An ordered list of changes applied atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Optional comment, echoed in the change info.
    pub comment: Option<String>,
    /// Changes, applied in order.
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Appends a change.
    pub fn add(mut self, action: ChangeAction, record_set: ResourceRecordSet) -> Self {
        self.changes.push(Change::new(action, record_set));
        self
    }
}

/// Propagation status of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// Not yet propagated.
    Pending,
    /// Propagated to all name servers.
    InSync,
}

impl ChangeStatus {
    /// Parses the wire form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "PENDING" => Some(Self::Pending),
            "INSYNC" => Some(Self::InSync),
            _ => None,
        }
    }

    /// Returns the wire form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InSync => "INSYNC",
        }
    }
}

/// Status record of a submitted change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    /// Bare change id, without the `/change/` prefix.
    pub id: String,
    /// Propagation status.
    pub status: ChangeStatus,
    /// Submission time, RFC 3339 in UTC.
    pub submitted_at: String,
    /// Comment from the change batch.
    pub comment: Option<String>,
}

impl ChangeInfo {
    /// Returns the id in API form: `/change/<id>`.
    pub fn path_id(&self) -> String {
        format!("{}{}", CHANGE_PREFIX, self.id)
    }
}

/// Health check configuration.
///
/// Everything except the type is optional on the wire; which fields matter
/// depends on the type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    /// Endpoint IP address.
    pub ip_address: Option<String>,
    /// Endpoint port.
    pub port: Option<u16>,
    /// Check type: `HTTP`, `HTTPS`, `HTTP_STR_MATCH`, `HTTPS_STR_MATCH`, `TCP`, ...
    pub check_type: String,
    /// Path requested by HTTP(S) checks.
    pub resource_path: Option<String>,
    /// Host name of the endpoint.
    pub fully_qualified_domain_name: Option<String>,
    /// String searched for by `*_STR_MATCH` checks.
    pub search_string: Option<String>,
    /// Seconds between checks (10 or 30).
    pub request_interval: Option<u32>,
    /// Consecutive failures before the endpoint is unhealthy.
    pub failure_threshold: Option<u32>,
}

impl HealthCheckConfig {
    /// Creates an HTTP check against `ip_address:port`.
    pub fn http(ip_address: impl Into<String>, port: u16, resource_path: impl Into<String>) -> Self {
        Self {
            ip_address: Some(ip_address.into()),
            port: Some(port),
            check_type: "HTTP".to_string(),
            resource_path: Some(resource_path.into()),
            ..Default::default()
        }
    }
}

/// A health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Health check id (a UUID).
    pub id: String,
    /// Caller-supplied idempotency token.
    pub caller_reference: String,
    /// Configuration.
    pub config: HealthCheckConfig,
    /// Version, starting at 1.
    pub version: u64,
}

/// A page of a list operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Marker that was requested, echoed back.
    pub marker: Option<String>,
    /// Whether more items follow.
    pub is_truncated: bool,
    /// Marker of the next page, when truncated.
    pub next_marker: Option<String>,
    /// Page size limit that was applied.
    pub max_items: usize,
}

/// A page of `ListHostedZonesByName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonesByNamePage {
    /// Zones in this page.
    pub hosted_zones: Vec<HostedZone>,
    /// Requested start name.
    pub dns_name: Option<String>,
    /// Requested start zone id.
    pub hosted_zone_id: Option<String>,
    /// Whether more zones follow.
    pub is_truncated: bool,
    /// Name of the first zone of the next page.
    pub next_dns_name: Option<String>,
    /// Id of the first zone of the next page.
    pub next_hosted_zone_id: Option<String>,
    /// Page size limit that was applied.
    pub max_items: usize,
}

/// Filter and paging parameters of `ListResourceRecordSets`.
///
/// Filters are exact matches on the normalized name, the type and the set
/// identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSetQuery {
    /// Only record sets with this name.
    pub name: Option<String>,
    /// Only record sets of this type.
    pub record_type: Option<RecordType>,
    /// Only record sets with this set identifier.
    pub identifier: Option<String>,
    /// Page size limit.
    pub max_items: Option<usize>,
}

impl RecordSetQuery {
    /// Matches every record set.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to a type.
    pub fn with_type(mut self, record_type: RecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }

    /// Restricts to a name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if the record set passes every filter.
    pub fn matches(&self, record_set: &ResourceRecordSet) -> bool {
        if let Some(name) = &self.name {
            if normalize_name(name) != normalize_name(&record_set.name) {
                return false;
            }
        }
        if let Some(record_type) = self.record_type {
            if record_type != record_set.record_type {
                return false;
            }
        }
        if let Some(identifier) = &self.identifier {
            if record_set.set_identifier.as_deref() != Some(identifier.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Result of `ListResourceRecordSets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSetPage {
    /// Matching record sets, in zone order.
    pub record_sets: Vec<ResourceRecordSet>,
    /// Whether more matching record sets follow.
    pub is_truncated: bool,
    /// Name of the next record set, when truncated.
    pub next_record_name: Option<String>,
    /// Type of the next record set, when truncated.
    pub next_record_type: Option<RecordType>,
    /// Set identifier of the next record set, when truncated.
    pub next_record_identifier: Option<String>,
    /// Page size limit that was applied.
    pub max_items: usize,
}
