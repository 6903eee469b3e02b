//! Cloudflare provider against a mock API server

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use dns_rotation_provider::{
    CloudflareProvider, ProviderError, RecordChange, RecordType, ZoneProvider,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONE: &str = "zone-1";

fn ok(result: Value, page: u32, total_pages: u32, total_count: u32) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "result": result,
        "result_info": {
            "page": page,
            "per_page": 100,
            "total_count": total_count,
            "total_pages": total_pages
        }
    }))
}

fn ok_single(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "result": result
    }))
}

fn record(id: &str, name: &str, content: &str, ttl: u32) -> Value {
    json!({ "id": id, "type": "A", "name": name, "content": content, "ttl": ttl })
}

fn provider(server: &MockServer) -> CloudflareProvider {
    CloudflareProvider::new("test-token".to_string()).with_base_url(server.uri())
}

async fn mount_hk_records(server: &MockServer, records: Value) {
    let count = records.as_array().map_or(0, Vec::len) as u32;
    Mock::given(method("GET"))
        .and(path(format!("/zones/{ZONE}/dns_records")))
        .and(query_param("type", "A"))
        .and(query_param("name", "hk.example.com"))
        .respond_with(ok(records, 1, 1, count))
        .mount(server)
        .await;
}

#[tokio::test]
async fn lists_zones_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("page", "1"))
        .respond_with(ok(json!([{ "id": "z1", "name": "example.com" }]), 1, 2, 2))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("page", "2"))
        .respond_with(ok(json!([{ "id": "z2", "name": "example.org" }]), 2, 2, 2))
        .expect(1)
        .mount(&server)
        .await;

    let zones = provider(&server).list_hosted_zones().await.unwrap();

    let names: Vec<_> = zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, ["example.com", "example.org"]);
}

#[tokio::test]
async fn record_sets_are_grouped_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/zones/{ZONE}/dns_records")))
        .respond_with(ok(
            json!([
                record("r1", "hk.example.com", "4.3.2.1", 30),
                record("r2", "la.example.com", "2.4.6.8", 30),
                record("r3", "hk.example.com", "1.2.3.4", 30),
            ]),
            1,
            1,
            3,
        ))
        .mount(&server)
        .await;

    let sets = provider(&server)
        .list_resource_record_sets(ZONE)
        .await
        .unwrap();

    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].name, "hk.example.com");
    assert_eq!(sets[0].record_type, RecordType::A);
    assert_eq!(sets[0].values, ["4.3.2.1", "1.2.3.4"]);
}

#[tokio::test]
async fn upsert_creates_missing_and_deletes_stale_values() {
    let server = MockServer::start().await;
    mount_hk_records(
        &server,
        json!([
            record("r1", "hk.example.com", "4.3.2.1", 30),
            record("r2", "hk.example.com", "9.9.9.9", 30),
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(format!("/zones/{ZONE}/dns_records")))
        .and(body_partial_json(json!({
            "type": "A",
            "name": "hk.example.com",
            "content": "1.2.3.4",
            "ttl": 30,
            "comment": "add hk-2 -> 1.2.3.4, 4.3.2.1"
        })))
        .respond_with(ok_single(record("r3", "hk.example.com", "1.2.3.4", 30)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/zones/{ZONE}/dns_records/r2")))
        .respond_with(ok_single(json!({ "id": "r2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ok_single(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let change = RecordChange::upsert_a(
        "hk.example.com.",
        30,
        vec!["1.2.3.4".to_string(), "4.3.2.1".to_string()],
    )
    .with_comment("add hk-2 -> 1.2.3.4, 4.3.2.1");

    provider(&server)
        .change_resource_record_sets(ZONE, &change)
        .await
        .unwrap();
}

#[tokio::test]
async fn upsert_patches_ttl_of_kept_values() {
    let server = MockServer::start().await;
    mount_hk_records(&server, json!([record("r1", "hk.example.com", "4.3.2.1", 300)])).await;
    Mock::given(method("PATCH"))
        .and(path(format!("/zones/{ZONE}/dns_records/r1")))
        .and(body_partial_json(json!({ "ttl": 30 })))
        .respond_with(ok_single(record("r1", "hk.example.com", "4.3.2.1", 30)))
        .expect(1)
        .mount(&server)
        .await;

    let change = RecordChange::upsert_a("hk.example.com", 30, vec!["4.3.2.1".to_string()]);
    provider(&server)
        .change_resource_record_sets(ZONE, &change)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_of_unpublished_value_sends_no_delete() {
    let server = MockServer::start().await;
    mount_hk_records(&server, json!([record("r1", "hk.example.com", "4.3.2.1", 30)])).await;
    Mock::given(method("DELETE"))
        .respond_with(ok_single(json!({ "id": "r1" })))
        .expect(0)
        .mount(&server)
        .await;

    let change = RecordChange::delete_a(
        "hk.example.com",
        30,
        vec!["4.3.2.1".to_string(), "1.2.3.4".to_string()],
    );
    let err = provider(&server)
        .change_resource_record_sets(ZONE, &change)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RecordNotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn delete_removes_each_value() {
    let server = MockServer::start().await;
    mount_hk_records(&server, json!([record("r1", "hk.example.com", "4.3.2.1", 30)])).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/zones/{ZONE}/dns_records/r1")))
        .respond_with(ok_single(json!({ "id": "r1" })))
        .expect(1)
        .mount(&server)
        .await;

    let change = RecordChange::delete_a("hk.example.com", 30, vec!["4.3.2.1".to_string()]);
    provider(&server)
        .change_resource_record_sets(ZONE, &change)
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_upsert_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok(json!([]), 1, 1, 0))
        .expect(0)
        .mount(&server)
        .await;

    let change = RecordChange::upsert_a("hk.example.com", 30, Vec::new());
    let err = provider(&server)
        .change_resource_record_sets(ZONE, &change)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidParameter { .. }));
}

#[tokio::test]
async fn authentication_error_maps_to_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 10000, "message": "Authentication error" }],
            "result": null
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .list_hosted_zones()
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidCredentials { .. }), "{err:?}");
    assert!(err.is_expected());
}

#[tokio::test]
async fn zone_listing_is_retried_after_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .up_to_n_times(1)
        .expect(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ok(json!([{ "id": "z1", "name": "example.com" }]), 1, 1, 1))
        .expect(1)
        .with_priority(2)
        .mount(&server)
        .await;

    let zones = provider(&server).list_hosted_zones().await.unwrap();

    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].name, "example.com");
}

#[tokio::test]
async fn failed_create_is_sent_once_and_returned() {
    let server = MockServer::start().await;
    mount_hk_records(&server, json!([record("r1", "hk.example.com", "4.3.2.1", 30)])).await;
    Mock::given(method("POST"))
        .and(path(format!("/zones/{ZONE}/dns_records")))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let change = RecordChange::upsert_a(
        "hk.example.com",
        30,
        vec!["4.3.2.1".to_string(), "1.2.3.4".to_string()],
    );
    let err = provider(&server)
        .change_resource_record_sets(ZONE, &change)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError { .. }), "{err:?}");
    assert!(err.to_string().contains("HTTP 503"), "{err}");
}

#[tokio::test]
async fn failed_delete_is_sent_once_and_returned() {
    let server = MockServer::start().await;
    mount_hk_records(&server, json!([record("r1", "hk.example.com", "4.3.2.1", 30)])).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/zones/{ZONE}/dns_records/r1")))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let change = RecordChange::delete_a("hk.example.com", 30, vec!["4.3.2.1".to_string()]);
    let err = provider(&server)
        .change_resource_record_sets(ZONE, &change)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError { .. }), "{err:?}");
    assert!(err.is_retryable());
}
