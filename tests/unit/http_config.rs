//! Tests for HttpClientConfig network binding functionality.

use std::net::{IpAddr, Ipv4Addr};

use dnsmock::route53::{Client, Route53Error, Route53Provider};
use dnsmock::{HttpClientConfig, Provider, RetrieveZoneError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::route53::mock_list_hosted_zones;

#[tokio::test]
async fn test_local_address_binding_to_localhost_works() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(mock_list_hosted_zones(&[("Z1", "example.com")], None)),
        )
        .mount(&server)
        .await;

    // Connecting to localhost from localhost must work
    let config = HttpClientConfig::new().local_address(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
    assert_eq!(config.local_address, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));

    let provider = Route53Provider::with_config(&server.uri(), config)
        .expect("Provider creation with localhost binding should succeed");
    let zones = provider.list_zones().await.expect("Failed to list zones");
    assert_eq!(zones.len(), 1);
}

#[tokio::test]
async fn test_local_address_binding_to_unavailable_ip_fails_on_connect() {
    let server = MockServer::start().await;

    // 192.0.2.1 is from TEST-NET-1 (RFC 5737) and should not be assigned to any interface
    let config = HttpClientConfig::new().local_address(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));

    // Binding happens on connect, not on client creation
    let client = Client::with_config(&server.uri(), config)
        .expect("Client creation should succeed even with unavailable IP");

    let err = client.list_hosted_zones().await.unwrap_err();
    assert!(matches!(err, Route53Error::Request(_)));

    let provider = Route53Provider::with_config(
        &server.uri(),
        HttpClientConfig::new().local_address(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))),
    )
    .unwrap();
    assert!(matches!(
        provider.list_zones().await,
        Err(RetrieveZoneError::Custom(Route53Error::Request(_)))
    ));
}

#[tokio::test]
async fn test_timeout_configuration() {
    let config = HttpClientConfig::new().timeout(std::time::Duration::from_secs(5));

    assert_eq!(config.timeout, Some(std::time::Duration::from_secs(5)));

    let result = Route53Provider::with_config("http://127.0.0.1:4580", config);
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_short_timeout_expires() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(mock_list_hosted_zones(&[], None))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = HttpClientConfig::new().timeout(std::time::Duration::from_millis(50));
    let client = Client::with_config(&server.uri(), config).unwrap();

    match client.list_hosted_zones().await {
        Err(Route53Error::Request(err)) => assert!(err.is_timeout()),
        other => panic!("expected a timeout, got {:?}", other),
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "android",
    target_os = "fuchsia",
))]
#[tokio::test]
async fn test_interface_binding_config() {
    // Actual binding would require a valid interface name
    let config = HttpClientConfig::new().interface("lo");

    assert_eq!(config.interface, Some("lo".to_string()));

    // Interface binding is validated on connect
    let result = Route53Provider::with_config("http://127.0.0.1:4580", config);
    assert!(result.is_ok());
}
