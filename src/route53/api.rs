//! Low-level Route53 API client.
//!
//! Speaks the REST/XML protocol of API version `2013-04-01`. Requests are
//! not signed, so the client is meant for the emulator and for endpoints
//! that don't enforce SigV4.
//!
//! # API Reference
//!
//! - [Route53 API](https://docs.aws.amazon.com/Route53/latest/APIReference/API_Operations_Amazon_Route_53.html)

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use thiserror::Error;
use tracing::debug;

use crate::model::{
    strip_change_id_prefix, strip_health_check_id_prefix, strip_zone_id_prefix, ChangeBatch,
    ChangeInfo, CreatedHostedZone, HealthCheck, HealthCheckConfig, HostedZone, HostedZoneConfig,
    HostedZoneDetails, Page, RecordSetPage, RecordSetQuery, ZonesByNamePage, API_VERSION,
};
use crate::xml::{self, CreateHealthCheckInput, CreateHostedZoneInput, XmlError};
use crate::HttpClientConfig;

/// The public Route53 endpoint.
pub const ROUTE53_API_URL: &str = "https://route53.amazonaws.com";

/// Errors that may occur when talking to a Route53 endpoint.
#[derive(Debug, Error)]
pub enum Route53Error {
    /// The endpoint answered with an error document.
    #[error("API error: {0}")]
    Api(ApiError),

    /// An HTTP request error occurred.
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A response body could not be read.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<XmlError> for Route53Error {
    fn from(err: XmlError) -> Self {
        Route53Error::Parse(err.to_string())
    }
}

impl Route53Error {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Route53Error::Api(err) => Some(err.status),
            Route53Error::Request(err) => err.status().map(|s| s.as_u16()),
            Route53Error::Parse(_) => None,
        }
    }

    /// Route53 error code of an API error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Route53Error::Api(err) => Some(&err.code),
            _ => None,
        }
    }
}

/// An error document returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status.
    pub status: u16,
    /// Error code, e.g. `NoSuchHostedZone`.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl ApiError {
    /// Builds the error from a failed response. Bodies that are not
    /// `ErrorResponse` documents are kept verbatim as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        match xml::parse_error_response(body) {
            Ok(doc) if !doc.code.is_empty() => Self {
                status,
                code: doc.code,
                message: doc.message,
            },
            _ => Self {
                status,
                code: format!("HTTP{}", status),
                message: body.trim().to_string(),
            },
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

/// URL-encodes a query parameter value.
fn url_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                encoded.push_str(&format!("{:02X}", byte));
            }
        }
    }
    encoded
}

fn build_query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, url_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Route53 API client.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for the public Route53 endpoint.
    pub fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::with_config(ROUTE53_API_URL, HttpClientConfig::default())
    }

    /// Creates a client for another endpoint, such as a local emulator.
    pub fn with_base_url(base_url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::with_config(base_url, HttpClientConfig::default())
    }

    /// Creates a client with custom HTTP settings.
    pub fn with_config(
        base_url: &str,
        config: HttpClientConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("dnsmock/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout.unwrap_or(std::time::Duration::from_secs(30)));

        if let Some(addr) = config.local_address {
            builder = builder.local_address(addr);
        }

        #[cfg(any(
            target_os = "android",
            target_os = "fuchsia",
            target_os = "linux",
            target_os = "macos",
            target_os = "ios",
            target_os = "tvos",
            target_os = "watchos",
            target_os = "illumos",
            target_os = "solaris",
        ))]
        if let Some(ref iface) = config.interface {
            builder = builder.interface(iface);
        }

        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}{}", self.base_url, API_VERSION, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&build_query_string(query));
        }
        url
    }

    /// Sends a request and returns the body of a successful response.
    async fn request(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<String, Route53Error> {
        debug!(method = %method, url = %url, "sending Route53 request");
        let mut request = self.http_client.request(method, &url);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("text/xml"))
                .body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Route53Error::Api(ApiError::from_response(
                status.as_u16(),
                &text,
            )));
        }

        Ok(text)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, Route53Error> {
        self.request(Method::GET, self.url(path, query), None).await
    }

    async fn post(&self, path: &str, body: String) -> Result<String, Route53Error> {
        self.request(Method::POST, self.url(path, &[]), Some(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<String, Route53Error> {
        self.request(Method::DELETE, self.url(path, &[]), None).await
    }

    // =========================================================================
    // Hosted zones
    // =========================================================================

    /// Creates a hosted zone.
    pub async fn create_hosted_zone(
        &self,
        name: &str,
        caller_reference: &str,
        config: HostedZoneConfig,
    ) -> Result<CreatedHostedZone, Route53Error> {
        let body = xml::render_create_hosted_zone_request(&CreateHostedZoneInput {
            name: name.to_string(),
            caller_reference: caller_reference.to_string(),
            config,
        })?;
        let text = self.post("/hostedzone", body).await?;
        Ok(xml::parse_create_hosted_zone_response(&text)?)
    }

    /// Gets a hosted zone and its name servers.
    pub async fn get_hosted_zone(&self, zone_id: &str) -> Result<HostedZoneDetails, Route53Error> {
        let path = format!("/hostedzone/{}", strip_zone_id_prefix(zone_id));
        let text = self.get(&path, &[]).await?;
        Ok(xml::parse_get_hosted_zone_response(&text)?)
    }

    /// Gets one page of hosted zones.
    pub async fn list_hosted_zones_page(
        &self,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> Result<Page<HostedZone>, Route53Error> {
        let mut query = Vec::new();
        if let Some(marker) = marker {
            query.push(("marker", marker.to_string()));
        }
        if let Some(max_items) = max_items {
            query.push(("maxitems", max_items.to_string()));
        }
        let text = self.get("/hostedzone", &query).await?;
        Ok(xml::parse_list_hosted_zones_response(&text)?)
    }

    /// Lists all hosted zones, following pagination.
    pub async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>, Route53Error> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.list_hosted_zones_page(marker.as_deref(), None).await?;
            zones.extend(page.items);
            match page.next_marker {
                Some(next) if page.is_truncated => marker = Some(next),
                _ => break,
            }
        }

        Ok(zones)
    }

    /// Gets one page of hosted zones ordered by name.
    pub async fn list_hosted_zones_by_name(
        &self,
        dns_name: Option<&str>,
        hosted_zone_id: Option<&str>,
        max_items: Option<usize>,
    ) -> Result<ZonesByNamePage, Route53Error> {
        let mut query = Vec::new();
        if let Some(dns_name) = dns_name {
            query.push(("dnsname", dns_name.to_string()));
        }
        if let Some(zone_id) = hosted_zone_id {
            query.push(("hostedzoneid", strip_zone_id_prefix(zone_id).to_string()));
        }
        if let Some(max_items) = max_items {
            query.push(("maxitems", max_items.to_string()));
        }
        let text = self.get("/hostedzonesbyname", &query).await?;
        Ok(xml::parse_list_hosted_zones_by_name_response(&text)?)
    }

    /// Returns the number of hosted zones.
    pub async fn get_hosted_zone_count(&self) -> Result<u64, Route53Error> {
        let text = self.get("/hostedzonecount", &[]).await?;
        Ok(xml::parse_get_hosted_zone_count_response(&text)?)
    }

    /// Deletes an empty hosted zone.
    pub async fn delete_hosted_zone(&self, zone_id: &str) -> Result<ChangeInfo, Route53Error> {
        let path = format!("/hostedzone/{}", strip_zone_id_prefix(zone_id));
        let text = self.delete(&path).await?;
        Ok(xml::parse_delete_hosted_zone_response(&text)?)
    }

    // =========================================================================
    // Record sets and changes
    // =========================================================================

    /// Submits a change batch.
    pub async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo, Route53Error> {
        let path = format!("/hostedzone/{}/rrset", strip_zone_id_prefix(zone_id));
        let body = xml::render_change_batch_request(batch)?;
        let text = self.post(&path, body).await?;
        Ok(xml::parse_change_resource_record_sets_response(&text)?)
    }

    /// Lists the record sets of a zone matching `query`.
    ///
    /// Filters are exact matches, so a truncated page has no continuation;
    /// raise `query.max_items` to see more.
    pub async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        query: &RecordSetQuery,
    ) -> Result<RecordSetPage, Route53Error> {
        let path = format!("/hostedzone/{}/rrset", strip_zone_id_prefix(zone_id));
        let mut params = Vec::new();
        if let Some(name) = &query.name {
            params.push(("name", name.clone()));
        }
        if let Some(record_type) = query.record_type {
            params.push(("type", record_type.as_str().to_string()));
        }
        if let Some(identifier) = &query.identifier {
            params.push(("identifier", identifier.clone()));
        }
        if let Some(max_items) = query.max_items {
            params.push(("maxitems", max_items.to_string()));
        }
        let text = self.get(&path, &params).await?;
        Ok(xml::parse_list_resource_record_sets_response(&text)?)
    }

    /// Gets the status of a change.
    pub async fn get_change(&self, change_id: &str) -> Result<ChangeInfo, Route53Error> {
        let path = format!("/change/{}", strip_change_id_prefix(change_id));
        let text = self.get(&path, &[]).await?;
        Ok(xml::parse_get_change_response(&text)?)
    }

    // =========================================================================
    // Health checks
    // =========================================================================

    /// Creates a health check.
    pub async fn create_health_check(
        &self,
        caller_reference: &str,
        config: HealthCheckConfig,
    ) -> Result<HealthCheck, Route53Error> {
        let body = xml::render_create_health_check_request(&CreateHealthCheckInput {
            caller_reference: caller_reference.to_string(),
            config,
        })?;
        let text = self.post("/healthcheck", body).await?;
        Ok(xml::parse_create_health_check_response(&text)?)
    }

    /// Gets a health check.
    pub async fn get_health_check(&self, health_check_id: &str) -> Result<HealthCheck, Route53Error> {
        let path = format!(
            "/healthcheck/{}",
            strip_health_check_id_prefix(health_check_id)
        );
        let text = self.get(&path, &[]).await?;
        Ok(xml::parse_get_health_check_response(&text)?)
    }

    /// Gets one page of health checks.
    pub async fn list_health_checks_page(
        &self,
        marker: Option<&str>,
        max_items: Option<usize>,
    ) -> Result<Page<HealthCheck>, Route53Error> {
        let mut query = Vec::new();
        if let Some(marker) = marker {
            query.push(("marker", marker.to_string()));
        }
        if let Some(max_items) = max_items {
            query.push(("maxitems", max_items.to_string()));
        }
        let text = self.get("/healthcheck", &query).await?;
        Ok(xml::parse_list_health_checks_response(&text)?)
    }

    /// Lists all health checks, following pagination.
    pub async fn list_health_checks(&self) -> Result<Vec<HealthCheck>, Route53Error> {
        let mut checks = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.list_health_checks_page(marker.as_deref(), None).await?;
            checks.extend(page.items);
            match page.next_marker {
                Some(next) if page.is_truncated => marker = Some(next),
                _ => break,
            }
        }

        Ok(checks)
    }

    /// Deletes a health check.
    pub async fn delete_health_check(&self, health_check_id: &str) -> Result<(), Route53Error> {
        let path = format!(
            "/healthcheck/{}",
            strip_health_check_id_prefix(health_check_id)
        );
        self.delete(&path).await?;
        Ok(())
    }

    // =========================================================================
    // Emulator control
    // =========================================================================

    /// Drops all state of a dnsmock emulator. Not part of Route53.
    pub async fn reset_emulator(&self) -> Result<(), Route53Error> {
        let url = format!("{}/_dnsmock/reset", self.base_url);
        self.request(Method::POST, url, None).await?;
        Ok(())
    }
}
