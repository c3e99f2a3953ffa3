//! Wire-level behaviour seen by a plain HTTP client.

use crate::common::constants::XMLNS;
use crate::common::emulator::{client_for, spawn_emulator};

use dnsmock::model::HostedZoneConfig;

fn extract<'a>(body: &'a str, element: &str) -> Option<&'a str> {
    let open = format!("<{}>", element);
    let close = format!("</{}>", element);
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(&body[start..end])
}

#[tokio::test]
async fn test_error_document_carries_request_id() {
    let emulator = spawn_emulator().await;
    let http = reqwest::Client::new();

    let response = http
        .get(format!("{}/2013-04-01/hostedzone/abcd", emulator.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let header = response
        .headers()
        .get("x-amzn-requestid")
        .expect("missing request id header")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(header.len(), 36);

    let body = response.text().await.unwrap();
    assert!(body.contains(XMLNS));
    assert_eq!(extract(&body, "Code"), Some("NoSuchHostedZone"));
    assert_eq!(extract(&body, "Type"), Some("Sender"));
    assert_eq!(extract(&body, "RequestId"), Some(header.as_str()));
}

#[tokio::test]
async fn test_successful_response_has_request_id() {
    let emulator = spawn_emulator().await;
    let http = reqwest::Client::new();

    let first = http
        .get(format!("{}/2013-04-01/hostedzonecount", emulator.base_url()))
        .send()
        .await
        .unwrap();
    let second = http
        .get(format!("{}/2013-04-01/hostedzonecount", emulator.base_url()))
        .send()
        .await
        .unwrap();
    assert!(first.status().is_success());

    let id = |r: &reqwest::Response| r.headers().get("x-amzn-requestid").cloned();
    assert!(id(&first).is_some());
    assert_ne!(id(&first), id(&second));

    let body = first.text().await.unwrap();
    assert_eq!(extract(&body, "HostedZoneCount"), Some("0"));
}

#[tokio::test]
async fn test_create_returns_location() {
    let emulator = spawn_emulator().await;
    let http = reqwest::Client::new();

    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><CreateHostedZoneRequest xmlns="{XMLNS}"><Name>example.com</Name><CallerReference>raw-1</CallerReference></CreateHostedZoneRequest>"#
    );
    let response = http
        .post(format!("{}/2013-04-01/hostedzone", emulator.base_url()))
        .header("content-type", "text/xml")
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("missing Location header");
    let text = response.text().await.unwrap();
    let id = extract(&text, "Id").expect("missing zone id");
    assert!(id.starts_with("/hostedzone/Z"));
    assert_eq!(location, format!("/2013-04-01{}", id));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let emulator = spawn_emulator().await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{}/2013-04-01/hostedzone", emulator.base_url()))
        .body("this is not xml")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body = response.text().await.unwrap();
    assert!(extract(&body, "Code").is_some());
    assert!(extract(&body, "Message").is_some());
}

#[tokio::test]
async fn test_invalid_max_items() {
    let emulator = spawn_emulator().await;
    let http = reqwest::Client::new();

    for maxitems in ["0", "many"] {
        let response = http
            .get(format!(
                "{}/2013-04-01/hostedzone?maxitems={}",
                emulator.base_url(),
                maxitems
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "maxitems={}", maxitems);
        let body = response.text().await.unwrap();
        assert_eq!(extract(&body, "Code"), Some("InvalidInput"));
    }
}

#[tokio::test]
async fn test_rejected_query_string_is_error_document() {
    let emulator = spawn_emulator().await;
    let http = reqwest::Client::new();

    // A repeated parameter fails to deserialize before the handler runs.
    let response = http
        .get(format!(
            "{}/2013-04-01/healthcheck?maxitems=1&maxitems=2",
            emulator.base_url()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let header = response
        .headers()
        .get("x-amzn-requestid")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("missing request id header");
    let body = response.text().await.unwrap();
    assert!(body.contains(XMLNS));
    assert_eq!(extract(&body, "Code"), Some("InvalidInput"));
    assert_eq!(extract(&body, "RequestId"), Some(header.as_str()));
}

#[tokio::test]
async fn test_unknown_operation() {
    let emulator = spawn_emulator().await;
    let http = reqwest::Client::new();

    let response = http
        .get(format!("{}/2013-04-01/trafficpolicies", emulator.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert!(response.headers().contains_key("x-amzn-requestid"));
    let body = response.text().await.unwrap();
    assert_eq!(extract(&body, "Code"), Some("UnknownOperation"));
}

#[tokio::test]
async fn test_state_and_reset() {
    let emulator = spawn_emulator().await;
    let client = client_for(&emulator);
    let http = reqwest::Client::new();

    client
        .create_hosted_zone("example.com", "ref", HostedZoneConfig::default())
        .await
        .unwrap();

    let state_url = format!("{}/_dnsmock/state", emulator.base_url());
    let text = http
        .get(&state_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let state: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(state["hosted_zones"].as_array().map(Vec::len), Some(1));
    assert_eq!(state["hosted_zones"][0]["hosted_zone"]["name"], "example.com");
    assert_eq!(state["health_checks"].as_array().map(Vec::len), Some(0));
    assert_eq!(state["change_count"], 1);

    let response = http
        .post(format!("{}/_dnsmock/reset", emulator.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let text = http
        .get(&state_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let state: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(state["hosted_zones"].as_array().map(Vec::len), Some(0));
    assert_eq!(state["change_count"], 0);
    assert_eq!(client.get_hosted_zone_count().await.unwrap(), 0);
}
