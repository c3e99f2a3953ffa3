//! Mock-based tests for the Route53 provider.
//!
//! # Coverage
//!
//! - Zone operations (list with pagination, get, create, delete)
//! - Record operations (list, create as CREATE or UPSERT, delete)
//! - Error handling (404, 403, InvalidChangeBatch, non-XML bodies)

use crate::common::constants::{ZONE_ID_1, ZONE_ID_2};
use crate::common::route53::*;
use crate::common::setup_mock_server;

use dnsmock::route53::{Route53Error, Route53Provider};
use dnsmock::{
    CreateRecord, CreateRecordError, CreateZone, CreateZoneError, DeleteRecord,
    DeleteRecordError, DeleteZone, DeleteZoneError, Provider, RecordData, RetrieveZoneError, Zone,
};
use std::net::Ipv4Addr;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> Route53Provider {
    Route53Provider::with_base_url(&server.uri()).expect("Failed to create provider")
}

async fn mount_zone(server: &MockServer, id: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/2013-04-01/hostedzone/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_get_hosted_zone(id, name)))
        .mount(server)
        .await;
}

// =============================================================================
// Zone Tests
// =============================================================================

#[tokio::test]
async fn test_list_zones_follows_markers() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .and(query_param("marker", ZONE_ID_2))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(mock_list_hosted_zones(&[(ZONE_ID_2, "example.org")], None)),
        )
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_list_hosted_zones(
            &[(ZONE_ID_1, "example.com")],
            Some(ZONE_ID_2),
        )))
        .with_priority(2)
        .mount(&server)
        .await;

    let zones = provider(&server)
        .list_zones()
        .await
        .expect("Failed to list zones");
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].id(), ZONE_ID_1);
    assert_eq!(zones[0].domain(), "example.com");
    assert_eq!(zones[1].domain(), "example.org");
}

#[tokio::test]
async fn test_get_zone_strips_id_prefix() {
    let server = setup_mock_server().await;
    mount_zone(&server, ZONE_ID_1, "example.com").await;

    let zone = provider(&server)
        .get_zone(&format!("/hostedzone/{}", ZONE_ID_1))
        .await
        .expect("Failed to get zone");
    assert_eq!(zone.id(), ZONE_ID_1);
    assert_eq!(zone.domain(), "example.com");
}

#[tokio::test]
async fn test_get_zone_not_found() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone/abcd"))
        .respond_with(ResponseTemplate::new(404).set_body_string(mock_error(
            "NoSuchHostedZone",
            "No hosted zone found with ID: abcd",
        )))
        .mount(&server)
        .await;

    let result = provider(&server).get_zone("abcd").await;
    assert!(matches!(result, Err(RetrieveZoneError::NotFound)));
}

#[tokio::test]
async fn test_unauthorized() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .respond_with(ResponseTemplate::new(403).set_body_string(mock_error(
            "InvalidClientTokenId",
            "The security token included in the request is invalid.",
        )))
        .mount(&server)
        .await;

    let result = provider(&server).list_zones().await;
    assert!(matches!(result, Err(RetrieveZoneError::Unauthorized)));
}

#[tokio::test]
async fn test_server_error_without_xml_body() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    match provider(&server).list_zones().await {
        Err(RetrieveZoneError::Custom(Route53Error::Api(err))) => {
            assert_eq!(err.status, 500);
            assert_eq!(err.code, "HTTP500");
            assert_eq!(err.message, "upstream exploded");
        }
        _ => panic!("expected a custom API error"),
    }
}

#[tokio::test]
async fn test_create_zone_sends_request_document() {
    let server = setup_mock_server().await;

    let created = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<CreateHostedZoneResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/"><HostedZone><Id>/hostedzone/{ZONE_ID_1}</Id><Name>example.com</Name><CallerReference>x</CallerReference><Config><PrivateZone>false</PrivateZone></Config><ResourceRecordSetCount>0</ResourceRecordSetCount></HostedZone><ChangeInfo><Id>/change/C1</Id><Status>INSYNC</Status><SubmittedAt>2026-01-01T00:00:00.000Z</SubmittedAt></ChangeInfo><DelegationSet><NameServers><NameServer>ns-2048.awsdns-64.com</NameServer></NameServers></DelegationSet></CreateHostedZoneResponse>"#
    );

    Mock::given(method("POST"))
        .and(path("/2013-04-01/hostedzone"))
        .and(body_string_contains("<CreateHostedZoneRequest"))
        .and(body_string_contains("<Name>example.com</Name>"))
        .and(body_string_contains("<CallerReference>"))
        .respond_with(ResponseTemplate::new(201).set_body_string(created))
        .expect(1)
        .mount(&server)
        .await;

    let zone = provider(&server)
        .create_zone("example.com")
        .await
        .expect("Failed to create zone");
    assert_eq!(zone.id(), ZONE_ID_1);
    assert_eq!(zone.hosted_zone().caller_reference, "x");
}

#[tokio::test]
async fn test_create_zone_invalid_domain() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/2013-04-01/hostedzone"))
        .respond_with(ResponseTemplate::new(400).set_body_string(mock_error(
            "InvalidDomainName",
            "Invalid domain name: a..b",
        )))
        .mount(&server)
        .await;

    let result = provider(&server).create_zone("a..b").await;
    assert!(matches!(result, Err(CreateZoneError::InvalidDomainName)));
}

#[tokio::test]
async fn test_delete_zone_errors() {
    let server = setup_mock_server().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/2013-04-01/hostedzone/{}", ZONE_ID_1)))
        .respond_with(ResponseTemplate::new(400).set_body_string(mock_error(
            "HostedZoneNotEmpty",
            "The hosted zone contains resource record sets",
        )))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/2013-04-01/hostedzone/{}", ZONE_ID_2)))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(mock_error("NoSuchHostedZone", "No hosted zone")),
        )
        .mount(&server)
        .await;

    let provider = provider(&server);
    match provider.delete_zone(ZONE_ID_1).await {
        Err(DeleteZoneError::Custom(err)) => {
            assert_eq!(err.code(), Some("HostedZoneNotEmpty"));
            assert_eq!(err.status(), Some(400));
        }
        _ => panic!("expected HostedZoneNotEmpty"),
    }
    assert!(matches!(
        provider.delete_zone(ZONE_ID_2).await,
        Err(DeleteZoneError::NotFound)
    ));
}

// =============================================================================
// Record Tests
// =============================================================================

#[tokio::test]
async fn test_list_records_one_per_value() {
    let server = setup_mock_server().await;
    mount_zone(&server, ZONE_ID_1, "example.com").await;

    Mock::given(method("GET"))
        .and(path(format!("/2013-04-01/hostedzone/{}/rrset", ZONE_ID_1)))
        .and(query_param("maxitems", "300"))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_list_rrsets(vec![
            ("example.com", "A", 300, vec!["1.1.1.1", "2.2.2.2"]),
            ("example.com", "MX", 3600, vec!["10 mail.example.com"]),
            ("example.com", "TXT", 60, vec!["\"v=spf1 -all\""]),
        ])))
        .mount(&server)
        .await;

    let zone = provider(&server).get_zone(ZONE_ID_1).await.unwrap();
    let records = zone.list_records().await.expect("Failed to list records");

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].id, "example.com|A||1.1.1.1");
    assert_eq!(records[1].data, RecordData::A(Ipv4Addr::new(2, 2, 2, 2)));
    assert_eq!(
        records[2].data,
        RecordData::MX {
            priority: 10,
            mail_server: "mail.example.com".to_string()
        }
    );
    assert_eq!(records[2].ttl, 3600);
    assert_eq!(records[3].data, RecordData::TXT("v=spf1 -all".to_string()));
}

#[tokio::test]
async fn test_create_record_appends_with_upsert() {
    let server = setup_mock_server().await;
    mount_zone(&server, ZONE_ID_1, "example.com").await;

    Mock::given(method("GET"))
        .and(path(format!("/2013-04-01/hostedzone/{}/rrset", ZONE_ID_1)))
        .and(query_param("name", "www.example.com"))
        .and(query_param("type", "A"))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_list_rrsets(vec![(
            "www.example.com",
            "A",
            300,
            vec!["1.1.1.1"],
        )])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/2013-04-01/hostedzone/{}/rrset", ZONE_ID_1)))
        .and(body_string_contains("<Action>UPSERT</Action>"))
        .and(body_string_contains("<Value>1.1.1.1</Value>"))
        .and(body_string_contains("<Value>2.2.2.2</Value>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_change_info("C1")))
        .expect(1)
        .mount(&server)
        .await;

    let zone = provider(&server).get_zone(ZONE_ID_1).await.unwrap();
    let record = zone
        .create_record("www", &RecordData::A(Ipv4Addr::new(2, 2, 2, 2)), 300)
        .await
        .expect("Failed to create record");
    assert_eq!(record.id, "www.example.com|A||2.2.2.2");
    assert_eq!(record.host, "www.example.com");
}

#[tokio::test]
async fn test_create_record_rejected_batch() {
    let server = setup_mock_server().await;
    mount_zone(&server, ZONE_ID_1, "example.com").await;

    Mock::given(method("GET"))
        .and(path(format!("/2013-04-01/hostedzone/{}/rrset", ZONE_ID_1)))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_list_rrsets(vec![])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/2013-04-01/hostedzone/{}/rrset", ZONE_ID_1)))
        .and(body_string_contains("<Action>CREATE</Action>"))
        .respond_with(ResponseTemplate::new(400).set_body_string(mock_error(
            "InvalidChangeBatch",
            "RRSet of type CNAME with DNS name alias.example.com is not permitted",
        )))
        .mount(&server)
        .await;

    let zone = provider(&server).get_zone(ZONE_ID_1).await.unwrap();
    let result = zone
        .create_record(
            "alias",
            &RecordData::CNAME("target.example.net".to_string()),
            300,
        )
        .await;
    assert!(matches!(result, Err(CreateRecordError::InvalidRecord)));

    let result = zone
        .create_record(
            "x",
            &RecordData::Other {
                typ: "HINFO".to_string(),
                value: "cpu os".to_string(),
            },
            300,
        )
        .await;
    assert!(matches!(result, Err(CreateRecordError::UnsupportedType)));
}

#[tokio::test]
async fn test_delete_last_value_deletes_set() {
    let server = setup_mock_server().await;
    mount_zone(&server, ZONE_ID_1, "example.com").await;

    Mock::given(method("GET"))
        .and(path(format!("/2013-04-01/hostedzone/{}/rrset", ZONE_ID_1)))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_list_rrsets(vec![(
            "www.example.com",
            "A",
            300,
            vec!["1.1.1.1"],
        )])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/2013-04-01/hostedzone/{}/rrset", ZONE_ID_1)))
        .and(body_string_contains("<Action>DELETE</Action>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(mock_change_info("C2")))
        .expect(1)
        .mount(&server)
        .await;

    let zone = provider(&server).get_zone(ZONE_ID_1).await.unwrap();
    zone.delete_record("www.example.com|A||1.1.1.1")
        .await
        .expect("Failed to delete record");

    let result = zone.delete_record("www.example.com|A||9.9.9.9").await;
    assert!(matches!(result, Err(DeleteRecordError::NotFound)));

    let result = zone.delete_record("not-a-record-id").await;
    assert!(matches!(result, Err(DeleteRecordError::NotFound)));
}
