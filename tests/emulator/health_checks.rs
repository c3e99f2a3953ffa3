//! Health checks and their association with record sets.

use crate::common::emulator::{a_record, client_for, http_check, provider_for, spawn_emulator};

use dnsmock::model::{
    ChangeAction, ChangeBatch, HealthCheckConfig, HostedZoneConfig, RecordSetQuery,
};

fn str_match_check() -> HealthCheckConfig {
    HealthCheckConfig {
        port: Some(80),
        check_type: "HTTP_STR_MATCH".to_string(),
        resource_path: Some("/".to_string()),
        fully_qualified_domain_name: Some("example.com".to_string()),
        search_string: Some("a good response".to_string()),
        request_interval: Some(10),
        failure_threshold: Some(2),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_and_list_health_check() {
    let emulator = spawn_emulator().await;
    let client = client_for(&emulator);

    let check = client
        .create_health_check("check-1", str_match_check())
        .await
        .expect("Failed to create health check");
    assert_eq!(check.id.len(), 36);
    assert_eq!(check.version, 1);

    let checks = client.list_health_checks().await.unwrap();
    assert_eq!(checks.len(), 1);
    let listed = &checks[0];
    assert_eq!(listed.id, check.id);
    assert_eq!(listed.caller_reference, "check-1");
    assert_eq!(listed.config.check_type, "HTTP_STR_MATCH");
    assert_eq!(listed.config.fully_qualified_domain_name.as_deref(), Some("example.com"));
    assert_eq!(listed.config.search_string.as_deref(), Some("a good response"));
    assert_eq!(listed.config.request_interval, Some(10));
    assert_eq!(listed.config.failure_threshold, Some(2));
    assert_eq!(listed.config.port, Some(80));
    assert!(listed.config.ip_address.is_none());

    let fetched = client.get_health_check(&check.id).await.unwrap();
    assert_eq!(&fetched, listed);
}

#[tokio::test]
async fn test_delete_health_check() {
    let emulator = spawn_emulator().await;
    let client = client_for(&emulator);

    let check = client
        .create_health_check("check-1", str_match_check())
        .await
        .unwrap();
    assert_eq!(client.list_health_checks().await.unwrap().len(), 1);

    client.delete_health_check(&check.id).await.unwrap();
    assert!(client.list_health_checks().await.unwrap().is_empty());

    let err = client.delete_health_check(&check.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.code(), Some("NoSuchHealthCheck"));
}

#[tokio::test]
async fn test_caller_reference_replay() {
    let emulator = spawn_emulator().await;
    let client = client_for(&emulator);

    let first = client.create_health_check("ref", http_check()).await.unwrap();
    let replayed = client.create_health_check("ref", http_check()).await.unwrap();
    assert_eq!(first.id, replayed.id);

    let err = client
        .create_health_check("ref", str_match_check())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.code(), Some("HealthCheckAlreadyExists"));
    assert_eq!(client.list_health_checks().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_health_check_config() {
    let emulator = spawn_emulator().await;
    let client = client_for(&emulator);

    let config = HealthCheckConfig {
        request_interval: Some(15),
        ..http_check()
    };
    let err = client.create_health_check("ref", config).await.unwrap_err();
    assert_eq!(err.code(), Some("InvalidInput"));

    let config = HealthCheckConfig {
        search_string: None,
        ..str_match_check()
    };
    let err = client.create_health_check("ref", config).await.unwrap_err();
    assert_eq!(err.code(), Some("InvalidInput"));
}

#[tokio::test]
async fn test_health_check_associated_with_record_set() {
    let emulator = spawn_emulator().await;
    let client = client_for(&emulator);
    let provider = provider_for(&emulator);

    let check = provider
        .create_health_check(HealthCheckConfig {
            request_interval: Some(10),
            failure_threshold: Some(3),
            ..HealthCheckConfig::http("10.0.0.4", 80, "/")
        })
        .await
        .unwrap();
    assert_eq!(check.config.ip_address.as_deref(), Some("10.0.0.4"));
    assert_eq!(check.config.failure_threshold, Some(3));

    let zone_id = client
        .create_hosted_zone("my_zone", "zone-ref", HostedZoneConfig::default())
        .await
        .unwrap()
        .hosted_zone
        .id;
    let record_set = a_record("my_fake_ec2.my_zone.", "10.0.0.4")
        .with_set_identifier("ec2")
        .with_weight(1)
        .with_health_check(check.id.clone());
    client
        .change_resource_record_sets(
            &zone_id,
            &ChangeBatch::new().add(ChangeAction::Create, record_set.clone()),
        )
        .await
        .unwrap();

    let page = client
        .list_resource_record_sets(&zone_id, &RecordSetQuery::all())
        .await
        .unwrap();
    assert_eq!(page.record_sets.len(), 1);
    assert_eq!(page.record_sets[0].health_check_id.as_deref(), Some(check.id.as_str()));

    let err = provider.delete_health_check(&check.id).await.unwrap_err();
    assert_eq!(err.code(), Some("HealthCheckInUse"));

    client
        .change_resource_record_sets(
            &zone_id,
            &ChangeBatch::new().add(ChangeAction::Delete, record_set),
        )
        .await
        .unwrap();
    provider.delete_health_check(&check.id).await.unwrap();
    assert!(provider.list_health_checks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_health_check_on_record_set() {
    let emulator = spawn_emulator().await;
    let client = client_for(&emulator);

    let zone_id = client
        .create_hosted_zone("my_zone", "zone-ref", HostedZoneConfig::default())
        .await
        .unwrap()
        .hosted_zone
        .id;
    let record_set = a_record("www.my_zone", "10.0.0.4")
        .with_health_check("8f0a3c5e-0000-4000-8000-000000000000");
    let err = client
        .change_resource_record_sets(
            &zone_id,
            &ChangeBatch::new().add(ChangeAction::Create, record_set),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("NoSuchHealthCheck"));
}
