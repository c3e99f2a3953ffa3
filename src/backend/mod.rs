//! In-memory Route53 store.
//!
//! [`Route53Backend`] holds every hosted zone, record set, change and health
//! check of one emulator instance and executes the API operations against
//! them. It is synchronous and knows nothing about HTTP; the server wraps it
//! in a mutex and the tests drive it directly.
//!
//! Zones, record sets and health checks are kept in creation order, which is
//! the order they are listed in. Every change is reported `INSYNC` as soon as
//! it is applied.

mod error;

pub use error::BackendError;

use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::{
    strip_change_id_prefix, strip_health_check_id_prefix, strip_zone_id_prefix, Change,
    ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus, CreatedHostedZone, DelegationSet,
    HealthCheck, HealthCheckConfig, HostedZone, HostedZoneConfig, HostedZoneDetails, Page,
    RecordSetPage, RecordSetQuery, ResourceRecordSet, ZonesByNamePage,
};
use crate::types::{is_within_zone, reversed_label_key, DomainName, RecordType, MAX_TTL};

/// Result type of every backend operation.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Default page size of the zone and health check listings.
pub const DEFAULT_MAX_ITEMS: usize = 100;

/// Default page size of `ListResourceRecordSets`.
pub const RECORD_SET_MAX_ITEMS: usize = 300;

/// Name servers handed out when none are configured.
pub const DEFAULT_NAME_SERVERS: [&str; 4] = [
    "ns-2048.awsdns-64.com",
    "ns-2049.awsdns-65.net",
    "ns-2050.awsdns-66.org",
    "ns-2051.awsdns-67.co.uk",
];

const HEALTH_CHECK_TYPES: &[&str] = &[
    "HTTP",
    "HTTPS",
    "HTTP_STR_MATCH",
    "HTTPS_STR_MATCH",
    "TCP",
    "CALCULATED",
    "CLOUDWATCH_METRIC",
    "RECOVERY_CONTROL",
];

/// Backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Delegation set returned for every zone.
    pub name_servers: Vec<String>,
    /// Page size used when a listing doesn't ask for one.
    pub default_max_items: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            name_servers: DEFAULT_NAME_SERVERS.iter().map(|ns| ns.to_string()).collect(),
            default_max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

/// A zone with its record sets, as exposed by [`Route53Backend::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneSnapshot {
    pub hosted_zone: HostedZone,
    pub record_sets: Vec<ResourceRecordSet>,
}

/// Serializable view of the whole backend state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendSnapshot {
    pub hosted_zones: Vec<ZoneSnapshot>,
    pub health_checks: Vec<HealthCheck>,
    pub change_count: usize,
}

#[derive(Debug, Clone)]
struct ZoneEntry {
    zone: HostedZone,
    record_sets: Vec<ResourceRecordSet>,
}

/// The in-memory Route53 store.
#[derive(Debug, Default)]
pub struct Route53Backend {
    config: BackendConfig,
    zones: Vec<ZoneEntry>,
    changes: HashMap<String, ChangeInfo>,
    health_checks: Vec<HealthCheck>,
}

/// Generates an id of the form `<prefix>` followed by 13 upper-case
/// alphanumerics, like `Z1D633PJN98FT9`.
fn generate_id(prefix: char) -> String {
    let random: String = Uuid::new_v4()
        .simple()
        .to_string()
        .to_ascii_uppercase()
        .chars()
        .take(13)
        .collect();
    format!("{}{}", prefix, random)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn page_size(max_items: Option<usize>, default: usize) -> Result<usize> {
    match max_items {
        None => Ok(default),
        Some(0) => Err(BackendError::InvalidInput(
            "MaxItems must be greater than 0".to_string(),
        )),
        Some(n) => Ok(n),
    }
}

fn caller_reference_or_random(caller_reference: &str) -> String {
    let trimmed = caller_reference.trim();
    if trimmed.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        trimmed.to_string()
    }
}

impl Route53Backend {
    /// Creates an empty backend with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty backend.
    pub fn with_config(config: BackendConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Drops all zones, record sets, changes and health checks.
    pub fn reset(&mut self) {
        info!(
            zones = self.zones.len(),
            health_checks = self.health_checks.len(),
            "resetting backend"
        );
        self.zones.clear();
        self.changes.clear();
        self.health_checks.clear();
    }

    /// Returns a copy of the whole state.
    pub fn snapshot(&self) -> BackendSnapshot {
        BackendSnapshot {
            hosted_zones: self
                .zones
                .iter()
                .map(|entry| ZoneSnapshot {
                    hosted_zone: entry.zone.clone(),
                    record_sets: entry.record_sets.clone(),
                })
                .collect(),
            health_checks: self.health_checks.clone(),
            change_count: self.changes.len(),
        }
    }

    fn delegation_set(&self) -> DelegationSet {
        DelegationSet {
            name_servers: self.config.name_servers.clone(),
        }
    }

    fn record_change(&mut self, comment: Option<String>) -> ChangeInfo {
        let info = ChangeInfo {
            id: generate_id('C'),
            status: ChangeStatus::InSync,
            submitted_at: now(),
            comment,
        };
        self.changes.insert(info.id.clone(), info.clone());
        info
    }

    fn zone_index(&self, zone_id: &str) -> Result<usize> {
        let zone_id = strip_zone_id_prefix(zone_id.trim());
        self.zones
            .iter()
            .position(|entry| entry.zone.id == zone_id)
            .ok_or_else(|| BackendError::NoSuchHostedZone(zone_id.to_string()))
    }

    // =========================================================================
    // Hosted zones
    // =========================================================================

    /// Creates a hosted zone.
    ///
    /// The name is stored as submitted; no SOA or NS record sets are created.
    /// An empty caller reference is replaced with a random one.
    pub fn create_hosted_zone(
        &mut self,
        name: &str,
        caller_reference: &str,
        config: HostedZoneConfig,
    ) -> Result<CreatedHostedZone> {
        let name = name.trim();
        if !DomainName::from_dotted(name).is_some_and(|domain| !domain.is_root()) {
            warn!(name, "rejecting hosted zone with invalid name");
            return Err(BackendError::InvalidDomainName(name.to_string()));
        }

        let caller_reference = caller_reference_or_random(caller_reference);
        if self
            .zones
            .iter()
            .any(|entry| entry.zone.caller_reference == caller_reference)
        {
            warn!(%caller_reference, "hosted zone caller reference reused");
            return Err(BackendError::HostedZoneAlreadyExists(caller_reference));
        }

        let comment = config.comment.clone();
        let zone = HostedZone {
            id: generate_id('Z'),
            name: name.to_string(),
            caller_reference,
            config,
            resource_record_set_count: 0,
        };
        info!(zone_id = %zone.id, name = %zone.name, "created hosted zone");

        self.zones.push(ZoneEntry {
            zone: zone.clone(),
            record_sets: Vec::new(),
        });
        let change_info = self.record_change(comment);

        Ok(CreatedHostedZone {
            hosted_zone: zone,
            change_info,
            delegation_set: self.delegation_set(),
        })
    }

    /// Lists hosted zones in creation order, starting at the zone whose id is
    /// `marker`.
    pub fn list_hosted_zones(
        &self,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> Result<Page<HostedZone>> {
        let limit = page_size(max_items, self.config.default_max_items)?;
        let marker = marker.map(|m| strip_zone_id_prefix(m.trim()).to_string());

        let start = match &marker {
            Some(m) => self
                .zones
                .iter()
                .position(|entry| &entry.zone.id == m)
                .ok_or_else(|| BackendError::InvalidInput(format!("Invalid marker: {}", m)))?,
            None => 0,
        };

        let items: Vec<HostedZone> = self.zones[start..]
            .iter()
            .take(limit)
            .map(|entry| entry.zone.clone())
            .collect();
        let next = self.zones.get(start + items.len());
        debug!(count = items.len(), "listed hosted zones");

        Ok(Page {
            items,
            marker,
            is_truncated: next.is_some(),
            next_marker: next.map(|entry| entry.zone.id.clone()),
            max_items: limit,
        })
    }

    /// Lists hosted zones ordered by reversed-label name, then id, starting
    /// at `(dns_name, hosted_zone_id)`.
    pub fn list_hosted_zones_by_name(
        &self,
        dns_name: Option<&str>,
        hosted_zone_id: Option<&str>,
        max_items: Option<usize>,
    ) -> Result<ZonesByNamePage> {
        if hosted_zone_id.is_some() && dns_name.is_none() {
            return Err(BackendError::InvalidInput(
                "HostedZoneId can only be given together with DNSName".to_string(),
            ));
        }
        let limit = page_size(max_items, self.config.default_max_items)?;
        let hosted_zone_id = hosted_zone_id.map(|id| strip_zone_id_prefix(id.trim()).to_string());

        let mut sorted: Vec<(Vec<String>, &HostedZone)> = self
            .zones
            .iter()
            .map(|entry| (reversed_label_key(&entry.zone.name), &entry.zone))
            .collect();
        sorted.sort_by(|a, b| (&a.0, &a.1.id).cmp(&(&b.0, &b.1.id)));

        let start = match dns_name {
            Some(name) => {
                let key = reversed_label_key(name);
                let id = hosted_zone_id.as_deref().unwrap_or("");
                sorted
                    .iter()
                    .position(|(zone_key, zone)| {
                        (zone_key.as_slice(), zone.id.as_str()) >= (key.as_slice(), id)
                    })
                    .unwrap_or(sorted.len())
            }
            None => 0,
        };

        let hosted_zones: Vec<HostedZone> = sorted[start..]
            .iter()
            .take(limit)
            .map(|(_, zone)| (*zone).clone())
            .collect();
        let next = sorted.get(start + hosted_zones.len()).map(|(_, zone)| *zone);

        Ok(ZonesByNamePage {
            hosted_zones,
            dns_name: dns_name.map(str::to_string),
            hosted_zone_id,
            is_truncated: next.is_some(),
            next_dns_name: next.map(|zone| zone.name.clone()),
            next_hosted_zone_id: next.map(|zone| zone.id.clone()),
            max_items: limit,
        })
    }

    /// Returns one hosted zone with its delegation set.
    pub fn get_hosted_zone(&self, zone_id: &str) -> Result<HostedZoneDetails> {
        let index = self.zone_index(zone_id)?;
        Ok(HostedZoneDetails {
            hosted_zone: self.zones[index].zone.clone(),
            delegation_set: self.delegation_set(),
        })
    }

    /// Returns the number of hosted zones.
    pub fn get_hosted_zone_count(&self) -> u64 {
        self.zones.len() as u64
    }

    /// Deletes a hosted zone. The zone must not contain record sets.
    pub fn delete_hosted_zone(&mut self, zone_id: &str) -> Result<ChangeInfo> {
        let index = self.zone_index(zone_id)?;
        if !self.zones[index].record_sets.is_empty() {
            let id = self.zones[index].zone.id.clone();
            warn!(zone_id = %id, "refusing to delete non-empty hosted zone");
            return Err(BackendError::HostedZoneNotEmpty(id));
        }

        let entry = self.zones.remove(index);
        info!(zone_id = %entry.zone.id, name = %entry.zone.name, "deleted hosted zone");
        Ok(self.record_change(None))
    }

    // =========================================================================
    // Record sets
    // =========================================================================

    /// Applies a change batch to a zone.
    ///
    /// Changes are applied in order to a copy of the zone's record sets; the
    /// zone is only updated when every change succeeds.
    pub fn change_resource_record_sets(
        &mut self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo> {
        let index = self.zone_index(zone_id)?;
        if batch.changes.is_empty() {
            return Err(BackendError::InvalidInput(
                "ChangeBatch must contain at least one change".to_string(),
            ));
        }

        let zone_name = self.zones[index].zone.name.clone();
        let mut staged = self.zones[index].record_sets.clone();
        for change in &batch.changes {
            if let Err(err) = self.apply_change(&zone_name, &mut staged, change) {
                warn!(
                    zone = %zone_name,
                    action = %change.action,
                    record_set = %change.record_set.key(),
                    error = %err,
                    "rejected change batch"
                );
                return Err(err);
            }
        }

        let entry = &mut self.zones[index];
        entry.record_sets = staged;
        entry.zone.resource_record_set_count = entry.record_sets.len() as u64;
        info!(
            zone_id = %entry.zone.id,
            changes = batch.changes.len(),
            record_sets = entry.record_sets.len(),
            "applied change batch"
        );

        Ok(self.record_change(batch.comment.clone()))
    }

    fn apply_change(
        &self,
        zone_name: &str,
        staged: &mut Vec<ResourceRecordSet>,
        change: &Change,
    ) -> Result<()> {
        let record_set = &change.record_set;
        if DomainName::from_dotted(&record_set.name).is_none() {
            return Err(BackendError::InvalidChangeBatch(format!(
                "RRSet with DNS name {} is not a valid domain name",
                record_set.name
            )));
        }
        if !is_within_zone(&record_set.name, zone_name) {
            return Err(BackendError::InvalidChangeBatch(format!(
                "RRSet with DNS name {} is not permitted in zone {}",
                record_set.name, zone_name
            )));
        }

        let key = record_set.key();
        let position = staged.iter().position(|existing| existing.key() == key);

        match change.action {
            ChangeAction::Create => {
                if position.is_some() {
                    return Err(BackendError::InvalidChangeBatch(format!(
                        "Tried to create resource record set [{}] but it already exists",
                        key
                    )));
                }
                self.validate_record_set(record_set)?;
                staged.push(record_set.clone());
            }
            ChangeAction::Upsert => {
                self.validate_record_set(record_set)?;
                match position {
                    Some(i) => staged[i] = record_set.clone(),
                    None => staged.push(record_set.clone()),
                }
            }
            // Values are not compared: the identity alone selects the set.
            ChangeAction::Delete => match position {
                Some(i) => {
                    staged.remove(i);
                }
                None => {
                    return Err(BackendError::InvalidChangeBatch(format!(
                        "Tried to delete resource record set [{}] but it was not found",
                        key
                    )));
                }
            },
        }

        Ok(())
    }

    fn validate_record_set(&self, record_set: &ResourceRecordSet) -> Result<()> {
        match (&record_set.alias_target, record_set.resource_records.is_empty()) {
            (Some(_), false) => {
                return Err(BackendError::InvalidInput(format!(
                    "Resource record set {} must not contain both ResourceRecords and AliasTarget",
                    record_set.key()
                )));
            }
            (None, true) => {
                return Err(BackendError::InvalidInput(format!(
                    "Resource record set {} must contain ResourceRecords or AliasTarget",
                    record_set.key()
                )));
            }
            _ => {}
        }

        match record_set.ttl {
            None if record_set.alias_target.is_none() => {
                return Err(BackendError::InvalidInput(format!(
                    "TTL is required for resource record set {}",
                    record_set.key()
                )));
            }
            Some(ttl) if ttl > MAX_TTL => {
                return Err(BackendError::InvalidInput(format!(
                    "TTL {} is out of range",
                    ttl
                )));
            }
            _ => {}
        }

        if record_set.weight.is_some() && record_set.set_identifier.is_none() {
            return Err(BackendError::InvalidInput(format!(
                "Weighted resource record set {} requires a SetIdentifier",
                record_set.key()
            )));
        }

        if record_set.record_type == RecordType::CNAME && record_set.resource_records.len() > 1 {
            return Err(BackendError::InvalidChangeBatch(format!(
                "RRSet of type CNAME with DNS name {} cannot contain more than one value",
                record_set.name
            )));
        }

        for value in &record_set.resource_records {
            let valid = match record_set.record_type {
                RecordType::A => value.parse::<Ipv4Addr>().is_ok(),
                RecordType::AAAA => value.parse::<Ipv6Addr>().is_ok(),
                _ => !value.trim().is_empty(),
            };
            if !valid {
                return Err(BackendError::InvalidChangeBatch(format!(
                    "Invalid Resource Record: value '{}' is not valid for type {}",
                    value, record_set.record_type
                )));
            }
        }

        if let Some(health_check_id) = &record_set.health_check_id {
            if !self.health_checks.iter().any(|c| &c.id == health_check_id) {
                return Err(BackendError::NoSuchHealthCheck(health_check_id.clone()));
            }
        }

        Ok(())
    }

    /// Lists the record sets of a zone that match `query`, in zone order.
    pub fn list_resource_record_sets(
        &self,
        zone_id: &str,
        query: &RecordSetQuery,
    ) -> Result<RecordSetPage> {
        let index = self.zone_index(zone_id)?;
        let limit = page_size(query.max_items, RECORD_SET_MAX_ITEMS)?;

        let mut matching = self.zones[index]
            .record_sets
            .iter()
            .filter(|record_set| query.matches(record_set));
        let record_sets: Vec<ResourceRecordSet> =
            matching.by_ref().take(limit).cloned().collect();
        let next = matching.next();
        debug!(
            zone_id = %self.zones[index].zone.id,
            count = record_sets.len(),
            "listed resource record sets"
        );

        Ok(RecordSetPage {
            record_sets,
            is_truncated: next.is_some(),
            next_record_name: next.map(|r| r.name.clone()),
            next_record_type: next.map(|r| r.record_type),
            next_record_identifier: next.and_then(|r| r.set_identifier.clone()),
            max_items: limit,
        })
    }

    /// Returns the status of a submitted change.
    pub fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let change_id = strip_change_id_prefix(change_id.trim());
        self.changes
            .get(change_id)
            .cloned()
            .ok_or_else(|| BackendError::NoSuchChange(change_id.to_string()))
    }

    // =========================================================================
    // Health checks
    // =========================================================================

    /// Creates a health check.
    ///
    /// Reusing a caller reference with the same configuration returns the
    /// existing check; with a different configuration it is an error.
    pub fn create_health_check(
        &mut self,
        caller_reference: &str,
        config: HealthCheckConfig,
    ) -> Result<HealthCheck> {
        validate_health_check_config(&config)?;

        let caller_reference = caller_reference_or_random(caller_reference);
        if let Some(existing) = self
            .health_checks
            .iter()
            .find(|c| c.caller_reference == caller_reference)
        {
            if existing.config == config {
                debug!(health_check_id = %existing.id, "health check request replayed");
                return Ok(existing.clone());
            }
            warn!(%caller_reference, "health check caller reference reused");
            return Err(BackendError::HealthCheckAlreadyExists(caller_reference));
        }

        let check = HealthCheck {
            id: Uuid::new_v4().to_string(),
            caller_reference,
            config,
            version: 1,
        };
        info!(
            health_check_id = %check.id,
            check_type = %check.config.check_type,
            "created health check"
        );
        self.health_checks.push(check.clone());
        Ok(check)
    }

    /// Lists health checks in creation order, starting at the check whose id
    /// is `marker`.
    pub fn list_health_checks(
        &self,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> Result<Page<HealthCheck>> {
        let limit = page_size(max_items, self.config.default_max_items)?;
        let marker = marker.map(|m| strip_health_check_id_prefix(m.trim()).to_string());

        let start = match &marker {
            Some(m) => self
                .health_checks
                .iter()
                .position(|c| &c.id == m)
                .ok_or_else(|| BackendError::InvalidInput(format!("Invalid marker: {}", m)))?,
            None => 0,
        };

        let items: Vec<HealthCheck> = self.health_checks[start..]
            .iter()
            .take(limit)
            .cloned()
            .collect();
        let next = self.health_checks.get(start + items.len());

        Ok(Page {
            items,
            marker,
            is_truncated: next.is_some(),
            next_marker: next.map(|c| c.id.clone()),
            max_items: limit,
        })
    }

    /// Returns one health check.
    pub fn get_health_check(&self, health_check_id: &str) -> Result<HealthCheck> {
        let id = strip_health_check_id_prefix(health_check_id.trim());
        self.health_checks
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NoSuchHealthCheck(id.to_string()))
    }

    /// Deletes a health check that no record set refers to.
    pub fn delete_health_check(&mut self, health_check_id: &str) -> Result<()> {
        let id = strip_health_check_id_prefix(health_check_id.trim()).to_string();
        let index = self
            .health_checks
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| BackendError::NoSuchHealthCheck(id.clone()))?;

        let in_use = self.zones.iter().any(|entry| {
            entry
                .record_sets
                .iter()
                .any(|r| r.health_check_id.as_deref() == Some(id.as_str()))
        });
        if in_use {
            warn!(health_check_id = %id, "refusing to delete health check in use");
            return Err(BackendError::HealthCheckInUse(id));
        }

        self.health_checks.remove(index);
        info!(health_check_id = %id, "deleted health check");
        Ok(())
    }
}

fn validate_health_check_config(config: &HealthCheckConfig) -> Result<()> {
    let check_type = config.check_type.as_str();
    if check_type.is_empty() {
        return Err(BackendError::InvalidInput(
            "HealthCheckConfig must specify a Type".to_string(),
        ));
    }
    if !HEALTH_CHECK_TYPES.contains(&check_type) {
        return Err(BackendError::InvalidInput(format!(
            "Invalid health check type: {}",
            check_type
        )));
    }

    let needs_endpoint = matches!(
        check_type,
        "HTTP" | "HTTPS" | "HTTP_STR_MATCH" | "HTTPS_STR_MATCH" | "TCP"
    );
    if needs_endpoint
        && config.ip_address.is_none()
        && config.fully_qualified_domain_name.is_none()
    {
        return Err(BackendError::InvalidInput(format!(
            "A {} health check needs an IPAddress or a FullyQualifiedDomainName",
            check_type
        )));
    }
    if check_type.ends_with("_STR_MATCH") && config.search_string.is_none() {
        return Err(BackendError::InvalidInput(format!(
            "A {} health check needs a SearchString",
            check_type
        )));
    }
    if config.port == Some(0) {
        return Err(BackendError::InvalidInput("Port must be between 1 and 65535".to_string()));
    }
    if let Some(interval) = config.request_interval {
        if interval != 10 && interval != 30 {
            return Err(BackendError::InvalidInput(format!(
                "RequestInterval must be 10 or 30, got {}",
                interval
            )));
        }
    }
    if let Some(threshold) = config.failure_threshold {
        if !(1..=10).contains(&threshold) {
            return Err(BackendError::InvalidInput(format!(
                "FailureThreshold must be between 1 and 10, got {}",
                threshold
            )));
        }
    }
    Ok(())
}
