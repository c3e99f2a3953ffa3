//! Route53 REST handlers.
//!
//! Every handler parses its input, runs one backend operation under the
//! state lock and renders the response document after the lock is released.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::model::{RecordSetQuery, API_VERSION};
use crate::types::RecordType;
use crate::xml;

type HandlerResult = Result<Response, ApiError>;

/// Paging parameters of `ListHostedZones` and `ListHealthChecks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub marker: Option<String>,
    pub maxitems: Option<String>,
}

/// Parameters of `ListHostedZonesByName`.
#[derive(Debug, Default, Deserialize)]
pub struct ByNameParams {
    pub dnsname: Option<String>,
    pub hostedzoneid: Option<String>,
    pub maxitems: Option<String>,
}

/// Parameters of `ListResourceRecordSets`.
#[derive(Debug, Default, Deserialize)]
pub struct RecordSetParams {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub identifier: Option<String>,
    pub maxitems: Option<String>,
}

fn xml_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/xml"))],
        body,
    )
        .into_response()
}

fn created(location: String, body: String) -> HandlerResult {
    let mut response = xml_response(StatusCode::CREATED, body);
    let value = HeaderValue::from_str(&location)
        .map_err(|_| ApiError::Internal(format!("invalid Location header: {}", location)))?;
    response.headers_mut().insert(header::LOCATION, value);
    Ok(response)
}

fn body_str(body: &Bytes) -> Result<&str, ApiError> {
    std::str::from_utf8(body)
        .map_err(|_| ApiError::InvalidInput("request body is not valid UTF-8".to_string()))
}

fn parse_max_items(value: Option<&str>) -> Result<Option<usize>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| ApiError::InvalidInput(format!("Invalid value for maxitems: {}", v))),
        None => Ok(None),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Hosted zones
// =============================================================================

pub async fn create_hosted_zone(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let body = body?;
    let input = xml::parse_create_hosted_zone_request(body_str(&body)?)?;
    let result = state.with_backend(|backend| {
        backend.create_hosted_zone(&input.name, &input.caller_reference, input.config.clone())
    })?;

    let location = format!("/{}/hostedzone/{}", API_VERSION, result.hosted_zone.id);
    created(location, xml::render_create_hosted_zone_response(&result)?)
}

pub async fn list_hosted_zones(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> HandlerResult {
    let Query(params) = params?;
    let max_items = parse_max_items(params.maxitems.as_deref())?;
    let marker = non_empty(params.marker.as_deref());
    let page = state.with_backend(|backend| backend.list_hosted_zones(marker, max_items))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_list_hosted_zones_response(&page)?,
    ))
}

pub async fn list_hosted_zones_by_name(
    State(state): State<AppState>,
    params: Result<Query<ByNameParams>, QueryRejection>,
) -> HandlerResult {
    let Query(params) = params?;
    let max_items = parse_max_items(params.maxitems.as_deref())?;
    let dns_name = non_empty(params.dnsname.as_deref());
    let hosted_zone_id = non_empty(params.hostedzoneid.as_deref());
    let page = state.with_backend(|backend| {
        backend.list_hosted_zones_by_name(dns_name, hosted_zone_id, max_items)
    })?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_list_hosted_zones_by_name_response(&page)?,
    ))
}

pub async fn get_hosted_zone_count(State(state): State<AppState>) -> HandlerResult {
    let count = state.with_backend(|backend| Ok(backend.get_hosted_zone_count()))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_get_hosted_zone_count_response(count)?,
    ))
}

pub async fn get_hosted_zone(
    State(state): State<AppState>,
    zone_id: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let Path(zone_id) = zone_id?;
    let details = state.with_backend(|backend| backend.get_hosted_zone(&zone_id))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_get_hosted_zone_response(&details)?,
    ))
}

pub async fn delete_hosted_zone(
    State(state): State<AppState>,
    zone_id: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let Path(zone_id) = zone_id?;
    let info = state.with_backend(|backend| backend.delete_hosted_zone(&zone_id))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_delete_hosted_zone_response(&info)?,
    ))
}

// =============================================================================
// Record sets and changes
// =============================================================================

pub async fn change_resource_record_sets(
    State(state): State<AppState>,
    zone_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let Path(zone_id) = zone_id?;
    let body = body?;
    let batch = xml::parse_change_batch_request(body_str(&body)?)?;
    debug!(zone_id = %zone_id, changes = batch.changes.len(), "change batch received");
    let info =
        state.with_backend(|backend| backend.change_resource_record_sets(&zone_id, &batch))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_change_resource_record_sets_response(&info)?,
    ))
}

pub async fn list_resource_record_sets(
    State(state): State<AppState>,
    zone_id: Result<Path<String>, PathRejection>,
    params: Result<Query<RecordSetParams>, QueryRejection>,
) -> HandlerResult {
    let Path(zone_id) = zone_id?;
    let Query(params) = params?;
    let record_type = match non_empty(params.record_type.as_deref()) {
        Some(t) => Some(
            RecordType::from_str(t)
                .ok_or_else(|| ApiError::InvalidInput(format!("Invalid type: {}", t)))?,
        ),
        None => None,
    };
    let query = RecordSetQuery {
        name: non_empty(params.name.as_deref()).map(str::to_string),
        record_type,
        identifier: non_empty(params.identifier.as_deref()).map(str::to_string),
        max_items: parse_max_items(params.maxitems.as_deref())?,
    };

    let page = state.with_backend(|backend| backend.list_resource_record_sets(&zone_id, &query))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_list_resource_record_sets_response(&page)?,
    ))
}

pub async fn get_change(
    State(state): State<AppState>,
    change_id: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let Path(change_id) = change_id?;
    let info = state.with_backend(|backend| backend.get_change(&change_id))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_get_change_response(&info)?,
    ))
}

// =============================================================================
// Health checks
// =============================================================================

pub async fn create_health_check(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let body = body?;
    let input = xml::parse_create_health_check_request(body_str(&body)?)?;
    let check = state.with_backend(|backend| {
        backend.create_health_check(&input.caller_reference, input.config.clone())
    })?;

    let location = format!("/{}/healthcheck/{}", API_VERSION, check.id);
    created(location, xml::render_create_health_check_response(&check)?)
}

pub async fn list_health_checks(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> HandlerResult {
    let Query(params) = params?;
    let max_items = parse_max_items(params.maxitems.as_deref())?;
    let marker = non_empty(params.marker.as_deref());
    let page = state.with_backend(|backend| backend.list_health_checks(marker, max_items))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_list_health_checks_response(&page)?,
    ))
}

pub async fn get_health_check(
    State(state): State<AppState>,
    health_check_id: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let Path(health_check_id) = health_check_id?;
    let check = state.with_backend(|backend| backend.get_health_check(&health_check_id))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_get_health_check_response(&check)?,
    ))
}

pub async fn delete_health_check(
    State(state): State<AppState>,
    health_check_id: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let Path(health_check_id) = health_check_id?;
    state.with_backend(|backend| backend.delete_health_check(&health_check_id))?;
    Ok(xml_response(
        StatusCode::OK,
        xml::render_delete_health_check_response()?,
    ))
}

// =============================================================================
// Emulator control
// =============================================================================

pub async fn reset(State(state): State<AppState>) -> HandlerResult {
    state.with_backend(|backend| {
        backend.reset();
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn snapshot(State(state): State<AppState>) -> HandlerResult {
    let snapshot = state.with_backend(|backend| Ok(backend.snapshot()))?;
    Ok(Json(snapshot).into_response())
}

pub async fn unknown_operation(method: Method, uri: Uri) -> ApiError {
    ApiError::UnknownOperation {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
