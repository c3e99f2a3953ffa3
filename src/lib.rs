//! In-memory emulation of the Amazon Route53 control-plane API.
//!
//! The crate has three layers:
//!
//! - a core that is always compiled: DNS value [`types`], the Route53
//!   resource [`model`], its [`xml`] codec and [`backend::Route53Backend`],
//!   the in-memory store that executes every operation;
//! - a `server` feature exposing the backend over the Route53 REST paths
//!   with axum, plus [`config`] and [`logging`] for the `dnsmock` binary;
//! - a `client` feature with a reqwest-based Route53 client and
//!   [`route53::Route53Provider`], which implements the provider-agnostic
//!   traits defined here.
//!
//! # Example
//!
//! ```no_run
//! use dnsmock::config::EmulatorConfig;
//! use dnsmock::route53::Route53Provider;
//! use dnsmock::server::EmulatorServer;
//! use dnsmock::{CreateRecord, CreateZone, RecordData, Zone};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let server = EmulatorServer::spawn(EmulatorConfig::ephemeral()).await?;
//! let provider = Route53Provider::with_base_url(&server.base_url())?;
//!
//! let zone = provider.create_zone("example.com").await?;
//! zone.create_record("www", &RecordData::A("1.2.3.4".parse()?), 300)
//!     .await?;
//!
//! for record in zone.list_records().await? {
//!     println!("{} {} {}", record.host, record.data.get_type(), record.data.get_value());
//! }
//! server.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![allow(async_fn_in_trait)]

use std::error::Error as StdErr;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

pub mod backend;
pub mod model;
pub mod types;
pub mod xml;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod logging;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub mod route53;

/// HTTP client settings shared by API clients.
///
/// # Example
///
/// ```
/// use std::net::{IpAddr, Ipv4Addr};
/// use std::time::Duration;
/// use dnsmock::HttpClientConfig;
///
/// let config = HttpClientConfig::new()
///     .local_address(IpAddr::V4(Ipv4Addr::LOCALHOST))
///     .timeout(Duration::from_secs(10));
/// assert_eq!(config.timeout, Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Local address outgoing connections bind to.
    pub local_address: Option<IpAddr>,
    /// Network interface outgoing connections bind to (Linux, macOS and a
    /// few others only).
    pub interface: Option<String>,
    /// Total request timeout. Clients default to 30 seconds.
    pub timeout: Option<Duration>,
}

impl HttpClientConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds outgoing connections to a local address.
    pub fn local_address(mut self, addr: IpAddr) -> Self {
        self.local_address = Some(addr);
        self
    }

    /// Binds outgoing connections to a network interface.
    pub fn interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A DNS record as seen through the provider traits.
///
/// One `Record` carries one value; record sets with several values are
/// exposed as several records sharing a host and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Provider-specific record id.
    pub id: String,
    /// Owner name.
    pub host: String,
    /// Typed record value.
    pub data: RecordData,
    /// TTL in seconds.
    pub ttl: u64,
}

/// Typed record data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(String),
    MX { priority: u16, mail_server: String },
    NS(String),
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    TXT(String),
    /// Any other type, value kept verbatim.
    Other { typ: String, value: String },
}

impl RecordData {
    /// Parses a presentation-format value of the given type.
    ///
    /// Values that don't parse as their type fall back to [`RecordData::Other`].
    pub fn from_raw(typ: &str, value: &str) -> RecordData {
        let other = || RecordData::Other {
            typ: typ.to_string(),
            value: value.to_string(),
        };

        match typ {
            "A" => value.parse().map(RecordData::A).unwrap_or_else(|_| other()),
            "AAAA" => value
                .parse()
                .map(RecordData::AAAA)
                .unwrap_or_else(|_| other()),
            "CNAME" => RecordData::CNAME(value.to_string()),
            "NS" => RecordData::NS(value.to_string()),
            "TXT" => RecordData::TXT(value.to_string()),
            "MX" => {
                let mut parts = value.splitn(2, ' ');
                match (
                    parts.next().and_then(|p| p.parse().ok()),
                    parts.next(),
                ) {
                    (Some(priority), Some(server)) => RecordData::MX {
                        priority,
                        mail_server: server.to_string(),
                    },
                    _ => other(),
                }
            }
            "SRV" => {
                let parts: Vec<&str> = value.splitn(4, ' ').collect();
                match parts.as_slice() {
                    [priority, weight, port, target] => {
                        match (priority.parse(), weight.parse(), port.parse()) {
                            (Ok(priority), Ok(weight), Ok(port)) => RecordData::SRV {
                                priority,
                                weight,
                                port,
                                target: target.to_string(),
                            },
                            _ => other(),
                        }
                    }
                    _ => other(),
                }
            }
            _ => other(),
        }
    }

    /// Returns the record type.
    pub fn get_type(&self) -> &str {
        match self {
            RecordData::A(_) => "A",
            RecordData::AAAA(_) => "AAAA",
            RecordData::CNAME(_) => "CNAME",
            RecordData::MX { .. } => "MX",
            RecordData::NS(_) => "NS",
            RecordData::SRV { .. } => "SRV",
            RecordData::TXT(_) => "TXT",
            RecordData::Other { typ, .. } => typ,
        }
    }

    /// Returns the full presentation-format value (`10 mail.example.com`
    /// for MX).
    pub fn get_value(&self) -> String {
        match self {
            RecordData::A(addr) => addr.to_string(),
            RecordData::AAAA(addr) => addr.to_string(),
            RecordData::CNAME(target) | RecordData::NS(target) => target.clone(),
            RecordData::MX {
                priority,
                mail_server,
            } => format!("{} {}", priority, mail_server),
            RecordData::SRV {
                priority,
                weight,
                port,
                target,
            } => format!("{} {} {} {}", priority, weight, port, target),
            RecordData::TXT(text) => text.clone(),
            RecordData::Other { value, .. } => value.clone(),
        }
    }

    /// Returns the value for APIs that carry the MX priority in a separate
    /// field: the mail server alone for MX, [`RecordData::get_value`]
    /// otherwise.
    pub fn get_api_value(&self) -> String {
        match self {
            RecordData::MX { mail_server, .. } => mail_server.clone(),
            _ => self.get_value(),
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.get_type(), self.get_value())
    }
}

/// A DNS provider: something that owns zones.
pub trait Provider {
    type Zone: Zone;
    type CustomRetrieveError: StdErr;

    /// Fetches one zone by id.
    async fn get_zone(
        &self,
        zone_id: &str,
    ) -> Result<Self::Zone, RetrieveZoneError<Self::CustomRetrieveError>>;

    /// Lists every zone.
    async fn list_zones(
        &self,
    ) -> Result<Vec<Self::Zone>, RetrieveZoneError<Self::CustomRetrieveError>>;
}

/// A provider that can create zones.
pub trait CreateZone: Provider {
    type CustomCreateError: StdErr;

    async fn create_zone(
        &self,
        domain: &str,
    ) -> Result<Self::Zone, CreateZoneError<Self::CustomCreateError>>;
}

/// A provider that can delete zones.
pub trait DeleteZone: Provider {
    type CustomDeleteError: StdErr;

    async fn delete_zone(&self, zone_id: &str)
        -> Result<(), DeleteZoneError<Self::CustomDeleteError>>;
}

/// A zone: something that owns records.
pub trait Zone {
    type CustomRetrieveError: StdErr;

    fn id(&self) -> &str;

    fn domain(&self) -> &str;

    async fn list_records(
        &self,
    ) -> Result<Vec<Record>, RetrieveRecordError<Self::CustomRetrieveError>>;

    /// Fetches one record by id. The default scans [`Zone::list_records`].
    async fn get_record(
        &self,
        record_id: &str,
    ) -> Result<Record, RetrieveRecordError<Self::CustomRetrieveError>> {
        self.list_records()
            .await?
            .into_iter()
            .find(|record| record.id == record_id)
            .ok_or(RetrieveRecordError::NotFound)
    }
}

/// A zone that can create records.
pub trait CreateRecord: Zone {
    type CustomCreateError: StdErr;

    /// Creates a record. `host` is relative to the zone (`@` or empty for
    /// the apex) or fully qualified with a trailing dot.
    async fn create_record(
        &self,
        host: &str,
        data: &RecordData,
        ttl: u64,
    ) -> Result<Record, CreateRecordError<Self::CustomCreateError>>;
}

/// A zone that can delete records.
pub trait DeleteRecord: Zone {
    type CustomDeleteError: StdErr;

    async fn delete_record(
        &self,
        record_id: &str,
    ) -> Result<(), DeleteRecordError<Self::CustomDeleteError>>;
}

/// Error retrieving zones.
#[derive(Debug, thiserror::Error)]
pub enum RetrieveZoneError<T> {
    #[error("unauthorized")]
    Unauthorized,
    #[error("zone not found")]
    NotFound,
    #[error(transparent)]
    Custom(#[from] T),
}

/// Error retrieving records.
#[derive(Debug, thiserror::Error)]
pub enum RetrieveRecordError<T> {
    #[error("unauthorized")]
    Unauthorized,
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Custom(#[from] T),
}

/// Error creating a zone.
#[derive(Debug, thiserror::Error)]
pub enum CreateZoneError<T> {
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid domain name")]
    InvalidDomainName,
    #[error(transparent)]
    Custom(#[from] T),
}

/// Error deleting a zone.
#[derive(Debug, thiserror::Error)]
pub enum DeleteZoneError<T> {
    #[error("unauthorized")]
    Unauthorized,
    #[error("zone not found")]
    NotFound,
    #[error(transparent)]
    Custom(#[from] T),
}

/// Error creating a record.
#[derive(Debug, thiserror::Error)]
pub enum CreateRecordError<T> {
    #[error("unauthorized")]
    Unauthorized,
    #[error("record type not supported by the provider")]
    UnsupportedType,
    #[error("invalid record")]
    InvalidRecord,
    #[error(transparent)]
    Custom(#[from] T),
}

/// Error deleting a record.
#[derive(Debug, thiserror::Error)]
pub enum DeleteRecordError<T> {
    #[error("unauthorized")]
    Unauthorized,
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Custom(#[from] T),
}
