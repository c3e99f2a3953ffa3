//! Route53 provider implementation.
//!
//! Works against the public Route53 endpoint shape, and in particular
//! against the dnsmock emulator. Requests are not signed.
//!
//! # Example
//!
//! ```no_run
//! use dnsmock::route53::Route53Provider;
//! use dnsmock::{Provider, Zone};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let provider = Route53Provider::with_base_url("http://127.0.0.1:4580")?;
//!
//! for zone in provider.list_zones().await? {
//!     println!("Zone: {} (ID: {})", zone.domain(), zone.id());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Records
//!
//! Route53 stores record *sets*: one name and type, many values. Each value
//! is exposed as its own [`Record`] whose id is
//! `name|TYPE|set_identifier|value`. Creating a record adds a value to the
//! simple record set of that name and type, creating the set if needed;
//! deleting one removes the value, and the set with its last value.
//!
//! TXT values are quoted on the way out and unquoted on the way in.

pub mod api;

use std::error::Error as StdErr;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

pub use api::{ApiError, Client, Route53Error};

use crate::backend::RECORD_SET_MAX_ITEMS;
use crate::model::{
    ChangeAction, ChangeBatch, HealthCheck, HealthCheckConfig, HostedZone, HostedZoneConfig,
    RecordSetQuery, ResourceRecordSet,
};
use crate::types::RecordType;
use crate::{
    CreateRecord, CreateRecordError, CreateZone, CreateZoneError, DeleteRecord,
    DeleteRecordError, DeleteZone, DeleteZoneError, HttpClientConfig, Provider, Record,
    RecordData, RetrieveRecordError, RetrieveZoneError, Zone,
};

/// Route53 DNS provider.
#[derive(Clone)]
pub struct Route53Provider {
    api_client: Arc<Client>,
}

/// A hosted zone.
pub struct Route53Zone {
    api_client: Arc<Client>,
    repr: HostedZone,
}

impl Route53Zone {
    /// Returns the hosted zone as reported by the API.
    pub fn hosted_zone(&self) -> &HostedZone {
        &self.repr
    }
}

fn is_unauthorized(err: &Route53Error) -> bool {
    matches!(err.status(), Some(401 | 403))
}

fn is_not_found(err: &Route53Error) -> bool {
    err.status() == Some(404)
}

fn is_invalid_record(err: &Route53Error) -> bool {
    matches!(
        err.code(),
        Some("InvalidChangeBatch" | "InvalidInput" | "NoSuchHealthCheck")
    )
}

/// Resolves a host relative to `domain`: `@` or empty is the apex, a
/// trailing dot marks a fully qualified name.
fn qualify_host(host: &str, domain: &str) -> String {
    let host = host.trim();
    if host.is_empty() || host == "@" {
        domain.to_string()
    } else if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{}.{}", host, domain)
    }
}

fn wire_value(data: &RecordData) -> String {
    match data {
        RecordData::TXT(text) if !(text.len() >= 2 && text.starts_with('"') && text.ends_with('"')) => {
            format!("\"{}\"", text.replace('"', "\\\""))
        }
        _ => data.get_value(),
    }
}

fn record_data(record_type: RecordType, value: &str) -> RecordData {
    match record_type {
        RecordType::TXT
            if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') =>
        {
            RecordData::TXT(value[1..value.len() - 1].replace("\\\"", "\""))
        }
        _ => RecordData::from_raw(record_type.as_str(), value),
    }
}

/// Escapes `%` and `|` so a name or set identifier fits in one id field.
fn escape_id_field(field: &str) -> String {
    field.replace('%', "%25").replace('|', "%7C")
}

fn unescape_id_field(field: &str) -> Option<String> {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match (chars.next()?, chars.next()?) {
            ('2', '5') => out.push('%'),
            ('7', 'C' | 'c') => out.push('|'),
            _ => return None,
        }
    }
    Some(out)
}

fn record_id(record_set: &ResourceRecordSet, value: &str) -> String {
    format!(
        "{}|{}|{}|{}",
        escape_id_field(&record_set.name),
        record_set.record_type,
        escape_id_field(record_set.set_identifier.as_deref().unwrap_or("")),
        value
    )
}

/// Identity of one value of one record set, as encoded in a record id.
#[derive(Debug, PartialEq, Eq)]
struct RecordRef {
    name: String,
    record_type: RecordType,
    set_identifier: Option<String>,
    value: String,
}

fn parse_record_id(id: &str) -> Option<RecordRef> {
    let mut parts = id.splitn(4, '|');
    let name = parts.next()?;
    let record_type = RecordType::from_str(parts.next()?)?;
    let set_identifier = unescape_id_field(parts.next()?)?;
    let value = parts.next()?;
    let name = unescape_id_field(name)?;

    if name.is_empty() || value.is_empty() {
        return None;
    }

    Some(RecordRef {
        name,
        record_type,
        set_identifier: (!set_identifier.is_empty()).then_some(set_identifier),
        value: value.to_string(),
    })
}

fn records_of(record_set: &ResourceRecordSet) -> impl Iterator<Item = Record> + '_ {
    record_set.resource_records.iter().map(move |value| Record {
        id: record_id(record_set, value),
        host: record_set.name.clone(),
        data: record_data(record_set.record_type, value),
        ttl: record_set.ttl.map(u64::from).unwrap_or(0),
    })
}

impl Route53Provider {
    /// Creates a provider for the public Route53 endpoint.
    pub fn new() -> Result<Self, Box<dyn StdErr + Send + Sync>> {
        let api_client = Client::new()?;
        Ok(Self {
            api_client: Arc::new(api_client),
        })
    }

    /// Creates a provider for another endpoint, such as a running emulator.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dnsmock::route53::Route53Provider;
    ///
    /// let provider = Route53Provider::with_base_url("http://127.0.0.1:4580").unwrap();
    /// ```
    pub fn with_base_url(base_url: &str) -> Result<Self, Box<dyn StdErr + Send + Sync>> {
        let api_client = Client::with_base_url(base_url)?;
        Ok(Self {
            api_client: Arc::new(api_client),
        })
    }

    /// Creates a provider with custom HTTP client configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dnsmock::route53::Route53Provider;
    /// use dnsmock::HttpClientConfig;
    ///
    /// let config = HttpClientConfig::new()
    ///     .local_address("127.0.0.1".parse().unwrap());
    /// let provider = Route53Provider::with_config("http://127.0.0.1:4580", config).unwrap();
    /// ```
    pub fn with_config(
        base_url: &str,
        config: HttpClientConfig,
    ) -> Result<Self, Box<dyn StdErr + Send + Sync>> {
        let api_client = Client::with_config(base_url, config)?;
        Ok(Self {
            api_client: Arc::new(api_client),
        })
    }

    /// The underlying API client.
    pub fn client(&self) -> &Client {
        &self.api_client
    }

    fn zone(&self, repr: HostedZone) -> Route53Zone {
        Route53Zone {
            api_client: self.api_client.clone(),
            repr,
        }
    }

    /// Creates a health check under a fresh caller reference.
    pub async fn create_health_check(
        &self,
        config: HealthCheckConfig,
    ) -> Result<HealthCheck, Route53Error> {
        self.api_client
            .create_health_check(&Uuid::new_v4().to_string(), config)
            .await
    }

    /// Lists all health checks.
    pub async fn list_health_checks(&self) -> Result<Vec<HealthCheck>, Route53Error> {
        self.api_client.list_health_checks().await
    }

    /// Deletes a health check.
    pub async fn delete_health_check(&self, health_check_id: &str) -> Result<(), Route53Error> {
        self.api_client.delete_health_check(health_check_id).await
    }
}

impl Provider for Route53Provider {
    type Zone = Route53Zone;
    type CustomRetrieveError = Route53Error;

    async fn get_zone(
        &self,
        zone_id: &str,
    ) -> Result<Self::Zone, RetrieveZoneError<Self::CustomRetrieveError>> {
        let details = self
            .api_client
            .get_hosted_zone(zone_id)
            .await
            .map_err(|err| {
                if is_not_found(&err) {
                    RetrieveZoneError::NotFound
                } else if is_unauthorized(&err) {
                    RetrieveZoneError::Unauthorized
                } else {
                    RetrieveZoneError::Custom(err)
                }
            })?;

        Ok(self.zone(details.hosted_zone))
    }

    async fn list_zones(
        &self,
    ) -> Result<Vec<Self::Zone>, RetrieveZoneError<Self::CustomRetrieveError>> {
        let zones = self.api_client.list_hosted_zones().await.map_err(|err| {
            if is_unauthorized(&err) {
                RetrieveZoneError::Unauthorized
            } else {
                RetrieveZoneError::Custom(err)
            }
        })?;

        Ok(zones.into_iter().map(|zone| self.zone(zone)).collect())
    }
}

impl CreateZone for Route53Provider {
    type CustomCreateError = Route53Error;

    async fn create_zone(
        &self,
        domain: &str,
    ) -> Result<Self::Zone, CreateZoneError<Self::CustomCreateError>> {
        let created = self
            .api_client
            .create_hosted_zone(
                domain,
                &Uuid::new_v4().to_string(),
                HostedZoneConfig::default(),
            )
            .await
            .map_err(|err| {
                if is_unauthorized(&err) {
                    CreateZoneError::Unauthorized
                } else if err.code() == Some("InvalidDomainName") {
                    CreateZoneError::InvalidDomainName
                } else {
                    CreateZoneError::Custom(err)
                }
            })?;

        Ok(self.zone(created.hosted_zone))
    }
}

impl DeleteZone for Route53Provider {
    type CustomDeleteError = Route53Error;

    async fn delete_zone(
        &self,
        zone_id: &str,
    ) -> Result<(), DeleteZoneError<Self::CustomDeleteError>> {
        self.api_client
            .delete_hosted_zone(zone_id)
            .await
            .map_err(|err| {
                if is_not_found(&err) {
                    DeleteZoneError::NotFound
                } else if is_unauthorized(&err) {
                    DeleteZoneError::Unauthorized
                } else {
                    DeleteZoneError::Custom(err)
                }
            })?;

        Ok(())
    }
}

impl Route53Zone {
    /// Fetches record sets matching `query`, capped at one full page.
    async fn record_sets(&self, query: RecordSetQuery) -> Result<Vec<ResourceRecordSet>, Route53Error> {
        let query = RecordSetQuery {
            max_items: query.max_items.or(Some(RECORD_SET_MAX_ITEMS)),
            ..query
        };
        let page = self
            .api_client
            .list_resource_record_sets(&self.repr.id, &query)
            .await?;
        if page.is_truncated {
            warn!(
                zone_id = %self.repr.id,
                max_items = page.max_items,
                "record set listing truncated"
            );
        }
        Ok(page.record_sets)
    }

    /// Finds the record set with exactly this identity.
    async fn find_record_set(
        &self,
        name: &str,
        record_type: RecordType,
        set_identifier: Option<&str>,
    ) -> Result<Option<ResourceRecordSet>, Route53Error> {
        let query = RecordSetQuery {
            identifier: set_identifier.map(str::to_string),
            ..RecordSetQuery::all().with_name(name).with_type(record_type)
        };
        Ok(self
            .record_sets(query)
            .await?
            .into_iter()
            .find(|set| set.set_identifier.as_deref() == set_identifier))
    }
}

impl Zone for Route53Zone {
    type CustomRetrieveError = Route53Error;

    fn id(&self) -> &str {
        &self.repr.id
    }

    fn domain(&self) -> &str {
        &self.repr.name
    }

    async fn list_records(
        &self,
    ) -> Result<Vec<Record>, RetrieveRecordError<Self::CustomRetrieveError>> {
        let record_sets = self
            .record_sets(RecordSetQuery::all())
            .await
            .map_err(|err| {
                if is_unauthorized(&err) {
                    RetrieveRecordError::Unauthorized
                } else {
                    RetrieveRecordError::Custom(err)
                }
            })?;

        Ok(record_sets.iter().flat_map(records_of).collect())
    }

    async fn get_record(
        &self,
        record_id: &str,
    ) -> Result<Record, RetrieveRecordError<Self::CustomRetrieveError>> {
        let record_ref = parse_record_id(record_id).ok_or(RetrieveRecordError::NotFound)?;

        let record_set = self
            .find_record_set(
                &record_ref.name,
                record_ref.record_type,
                record_ref.set_identifier.as_deref(),
            )
            .await
            .map_err(|err| {
                if is_unauthorized(&err) {
                    RetrieveRecordError::Unauthorized
                } else {
                    RetrieveRecordError::Custom(err)
                }
            })?
            .ok_or(RetrieveRecordError::NotFound)?;

        let record = records_of(&record_set)
            .find(|record| record.id == record_id)
            .ok_or(RetrieveRecordError::NotFound);
        record
    }
}

impl CreateRecord for Route53Zone {
    type CustomCreateError = Route53Error;

    async fn create_record(
        &self,
        host: &str,
        data: &RecordData,
        ttl: u64,
    ) -> Result<Record, CreateRecordError<Self::CustomCreateError>> {
        let record_type =
            RecordType::from_str(data.get_type()).ok_or(CreateRecordError::UnsupportedType)?;
        let ttl = u32::try_from(ttl).map_err(|_| CreateRecordError::InvalidRecord)?;
        let name = qualify_host(host, &self.repr.name);
        let value = wire_value(data);

        let map_err = |err: Route53Error| {
            if is_unauthorized(&err) {
                CreateRecordError::Unauthorized
            } else if is_invalid_record(&err) {
                CreateRecordError::InvalidRecord
            } else {
                CreateRecordError::Custom(err)
            }
        };

        let existing = self
            .find_record_set(&name, record_type, None)
            .await
            .map_err(map_err)?;

        let (action, record_set) = match existing {
            Some(mut set) => {
                if set.resource_records.contains(&value) {
                    return Err(CreateRecordError::InvalidRecord);
                }
                set.resource_records.push(value.clone());
                set.ttl = Some(ttl);
                (ChangeAction::Upsert, set)
            }
            None => (
                ChangeAction::Create,
                ResourceRecordSet::new(name, record_type, ttl).with_value(value.clone()),
            ),
        };

        debug!(
            zone_id = %self.repr.id,
            name = %record_set.name,
            record_type = %record_type,
            action = %action,
            "creating record"
        );
        self.api_client
            .change_resource_record_sets(
                &self.repr.id,
                &ChangeBatch::new().add(action, record_set.clone()),
            )
            .await
            .map_err(map_err)?;

        Ok(Record {
            id: record_id(&record_set, &value),
            host: record_set.name,
            data: record_data(record_type, &value),
            ttl: u64::from(ttl),
        })
    }
}

impl DeleteRecord for Route53Zone {
    type CustomDeleteError = Route53Error;

    async fn delete_record(
        &self,
        record_id: &str,
    ) -> Result<(), DeleteRecordError<Self::CustomDeleteError>> {
        let record_ref = parse_record_id(record_id).ok_or(DeleteRecordError::NotFound)?;

        let map_err = |err: Route53Error| {
            if is_not_found(&err) {
                DeleteRecordError::NotFound
            } else if is_unauthorized(&err) {
                DeleteRecordError::Unauthorized
            } else {
                DeleteRecordError::Custom(err)
            }
        };

        let record_set = self
            .find_record_set(
                &record_ref.name,
                record_ref.record_type,
                record_ref.set_identifier.as_deref(),
            )
            .await
            .map_err(map_err)?
            .filter(|set| set.resource_records.contains(&record_ref.value))
            .ok_or(DeleteRecordError::NotFound)?;

        let change = if record_set.resource_records.len() == 1 {
            (ChangeAction::Delete, record_set)
        } else {
            let mut remaining = record_set;
            remaining.resource_records.retain(|v| v != &record_ref.value);
            (ChangeAction::Upsert, remaining)
        };

        self.api_client
            .change_resource_record_sets(&self.repr.id, &ChangeBatch::new().add(change.0, change.1))
            .await
            .map_err(map_err)?;

        Ok(())
    }
}
