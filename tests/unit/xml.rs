//! Tests for the Route53 XML codec.
//!
//! Documents written by one side must read back on the other: requests are
//! rendered by the client and parsed by the emulator, responses the other way
//! round.

use dnsmock::model::{
    AliasTarget, ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus, HealthCheck,
    HealthCheckConfig, HostedZoneConfig, RecordSetPage, ResourceRecordSet,
};
use dnsmock::types::RecordType;
use dnsmock::xml::{self, CreateHealthCheckInput, CreateHostedZoneInput, ErrorDocument, XmlError};

#[test]
fn test_change_batch_request_reads_back() {
    let batch = ChangeBatch {
        comment: Some("weighted rollout".to_string()),
        ..ChangeBatch::new()
    }
    .add(
        ChangeAction::Delete,
        ResourceRecordSet::new("foo.bar.testdns.aws.com", RecordType::A, 600),
    )
    .add(
        ChangeAction::Create,
        ResourceRecordSet::new("cname.my_zone", RecordType::CNAME, 60)
            .with_value("example.com")
            .with_set_identifier("test1")
            .with_weight(90)
            .with_health_check("9f1f0e4c-7c51-4a0f-9a4f-0d5f3b0c2a11"),
    )
    .add(
        ChangeAction::Upsert,
        ResourceRecordSet {
            ttl: None,
            alias_target: Some(AliasTarget {
                hosted_zone_id: "Z2FDTNDATAQYW2".to_string(),
                dns_name: "d111111abcdef8.cloudfront.net".to_string(),
                evaluate_target_health: false,
            }),
            ..ResourceRecordSet::new("www.testdns.aws.com", RecordType::A, 0)
        },
    );

    let document = xml::render_change_batch_request(&batch).unwrap();
    assert!(document.starts_with("<?xml"));
    assert!(document.contains("<Action>UPSERT</Action>"));

    let parsed = xml::parse_change_batch_request(&document).unwrap();
    assert_eq!(parsed, batch);
}

#[test]
fn test_create_requests_read_back() {
    let zone = CreateHostedZoneInput {
        name: "testdns.aws.com".to_string(),
        caller_reference: "ref-1".to_string(),
        config: HostedZoneConfig {
            comment: Some("test zone".to_string()),
            private_zone: false,
        },
    };
    let document = xml::render_create_hosted_zone_request(&zone).unwrap();
    assert_eq!(xml::parse_create_hosted_zone_request(&document).unwrap(), zone);

    let check = CreateHealthCheckInput {
        caller_reference: "ref-2".to_string(),
        config: HealthCheckConfig {
            fully_qualified_domain_name: Some("example.com".to_string()),
            search_string: Some("a good response".to_string()),
            request_interval: Some(10),
            failure_threshold: Some(2),
            ..HealthCheckConfig::http("10.0.0.25", 80, "/")
        },
    };
    let document = xml::render_create_health_check_request(&check).unwrap();
    // Numbers travel as text.
    assert!(document.contains("<Port>80</Port>"));
    assert!(document.contains("<RequestInterval>10</RequestInterval>"));
    assert_eq!(xml::parse_create_health_check_request(&document).unwrap(), check);
}

#[test]
fn test_responses_read_back() {
    let info = ChangeInfo {
        id: "C2682N5HXP0BZ4".to_string(),
        status: ChangeStatus::InSync,
        submitted_at: "2026-01-01T00:00:00.000Z".to_string(),
        comment: None,
    };
    let document = xml::render_get_change_response(&info).unwrap();
    assert!(document.contains("<Id>/change/C2682N5HXP0BZ4</Id>"));
    assert_eq!(xml::parse_get_change_response(&document).unwrap(), info);

    let page = RecordSetPage {
        record_sets: vec![
            ResourceRecordSet::new("foo.bar.testdns.aws.com", RecordType::A, 600)
                .with_value("1.2.3.4")
                .with_value("5.6.7.8"),
        ],
        is_truncated: true,
        next_record_name: Some("zzz.testdns.aws.com".to_string()),
        next_record_type: Some(RecordType::TXT),
        next_record_identifier: None,
        max_items: 1,
    };
    let document = xml::render_list_resource_record_sets_response(&page).unwrap();
    assert_eq!(
        xml::parse_list_resource_record_sets_response(&document).unwrap(),
        page
    );

    let check = HealthCheck {
        id: "9f1f0e4c-7c51-4a0f-9a4f-0d5f3b0c2a11".to_string(),
        caller_reference: "ref".to_string(),
        config: HealthCheckConfig::http("10.0.0.25", 80, "/"),
        version: 1,
    };
    let document = xml::render_create_health_check_response(&check).unwrap();
    assert_eq!(xml::parse_create_health_check_response(&document).unwrap(), check);
}

#[test]
fn test_error_document_reads_back() {
    let error = ErrorDocument {
        error_type: "Sender".to_string(),
        code: "NoSuchHostedZone".to_string(),
        message: "No hosted zone found with ID: abcd".to_string(),
        request_id: "5e1f8a1c-2b8f-4a47-9d2e-4c1d8f7f0e11".to_string(),
    };
    let document = xml::render_error_response(&error).unwrap();
    assert_eq!(xml::parse_error_response(&document).unwrap(), error);
}

#[test]
fn test_wrong_root_is_rejected() {
    let document = r#"<?xml version="1.0"?><CreateHostedZoneRequest><Name>a.com</Name></CreateHostedZoneRequest>"#;
    let err = xml::parse_change_batch_request(document).unwrap_err();
    assert!(matches!(
        err,
        XmlError::UnexpectedRoot {
            expected: "ChangeResourceRecordSetsRequest",
            ..
        }
    ));
}

#[test]
fn test_invalid_values_name_their_element() {
    let document = r#"<ChangeResourceRecordSetsRequest><ChangeBatch><Changes><Change><Action>REPLACE</Action><ResourceRecordSet><Name>a.com</Name><Type>A</Type><TTL>60</TTL></ResourceRecordSet></Change></Changes></ChangeBatch></ChangeResourceRecordSetsRequest>"#;
    assert!(matches!(
        xml::parse_change_batch_request(document),
        Err(XmlError::InvalidValue {
            element: "Action",
            ..
        })
    ));

    let document = r#"<ChangeResourceRecordSetsRequest><ChangeBatch><Changes><Change><Action>CREATE</Action><ResourceRecordSet><Name>a.com</Name><Type>A</Type><TTL>soon</TTL></ResourceRecordSet></Change></Changes></ChangeBatch></ChangeResourceRecordSetsRequest>"#;
    assert!(matches!(
        xml::parse_change_batch_request(document),
        Err(XmlError::InvalidValue { element: "TTL", .. })
    ));

    let document = r#"<CreateHealthCheckRequest><CallerReference>r</CallerReference><HealthCheckConfig><Type>HTTP</Type><Port>eighty</Port></HealthCheckConfig></CreateHealthCheckRequest>"#;
    assert!(matches!(
        xml::parse_create_health_check_request(document),
        Err(XmlError::InvalidValue {
            element: "Port",
            ..
        })
    ));
}

#[test]
fn test_missing_required_elements() {
    let document = r#"<CreateHostedZoneRequest><CallerReference>r</CallerReference></CreateHostedZoneRequest>"#;
    assert!(matches!(
        xml::parse_create_hosted_zone_request(document),
        Err(XmlError::MissingElement("Name"))
    ));
}
