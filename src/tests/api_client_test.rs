use serde_json::json;

use crate::api_client::{call_driver, PlatformApi};
use crate::errors::PuterError;
use crate::models::{App, MkdirRequest, APPS_INTERFACE};
use crate::tests::test_utils::TestServer;

#[tokio::test]
async fn test_driver_envelope_with_not_found_status_decodes_to_not_found() {
    let server = TestServer::new(&[(
        "/drivers/call",
        404,
        r#"{"success":false,"error":{"code":"entity_not_found","message":"Entity not found: ghost"}}"#,
    )])
    .await
    .unwrap();
    let api = server.client(Some("secret"));

    let err = call_driver::<App>(&api, APPS_INTERFACE, "read", json!({ "id": { "name": "ghost" } }))
        .await
        .unwrap_err();

    assert!(err.is_not_found());

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].header("authorization"), Some("Bearer secret"));
    let sent: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent["interface"], "puter-apps");
    assert_eq!(sent["method"], "read");
    assert_eq!(sent["args"]["id"]["name"], "ghost");
}

#[tokio::test]
async fn test_driver_envelope_with_client_error_decodes_to_api_error() {
    let server = TestServer::new(&[(
        "/drivers/call",
        400,
        r#"{"success":false,"error":{"code":"forbidden","message":"Permission denied"}}"#,
    )])
    .await
    .unwrap();
    let api = server.client(Some("secret"));

    let err = call_driver::<App>(&api, APPS_INTERFACE, "delete", json!({ "id": { "name": "notes" } }))
        .await
        .unwrap_err();

    match err {
        PuterError::Api { code, message } => {
            assert_eq!(code, "forbidden");
            assert_eq!(message, "Permission denied");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_auth_failure_body_keeps_http_status() {
    let server = TestServer::new(&[(
        "/drivers/call",
        401,
        r#"{"message":"Authentication failed","code":"token_auth_failed"}"#,
    )])
    .await
    .unwrap();
    let api = server.client(Some("expired"));

    let err = api
        .driver_call(APPS_INTERFACE, "select", json!({ "predicate": ["user-can-edit"] }))
        .await
        .unwrap_err();

    match err {
        PuterError::Http { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("token_auth_failed"));
        }
        other => panic!("expected http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_text_error_body_keeps_http_status() {
    let server = TestServer::new(&[("/drivers/call", 502, "Bad Gateway")])
        .await
        .unwrap();
    let api = server.client(None);

    let err = api
        .driver_call(APPS_INTERFACE, "select", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, PuterError::Http { status: 502, .. }));
}

#[tokio::test]
async fn test_delete_site_with_empty_body_is_empty_object() {
    let server = TestServer::new(&[("/delete-site", 200, "")]).await.unwrap();
    let api = server.client(Some("secret"));

    let body = api.delete_site("subdomainObj-1234").await.unwrap();

    assert_eq!(body, json!({}));
    let requests = server.requests();
    let sent: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent, json!({ "site_uuid": "subdomainObj-1234" }));
}

#[tokio::test]
async fn test_delete_site_error_status_is_http_error() {
    let server = TestServer::new(&[("/delete-site", 500, "internal error")])
        .await
        .unwrap();
    let api = server.client(Some("secret"));

    let err = api.delete_site("subdomainObj-1234").await.unwrap_err();

    assert!(matches!(err, PuterError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_mkdir_decodes_directory_entry() {
    let server = TestServer::new(&[(
        "/mkdir",
        200,
        r#"{"uid":"dir-9","name":"app-1f2e","path":"/alice/AppData/app-1/app-1f2e","is_dir":true}"#,
    )])
    .await
    .unwrap();
    let api = server.client(Some("secret"));

    let entry = api
        .mkdir(&MkdirRequest {
            parent: "/alice/AppData/app-1".to_string(),
            path: "app-1f2e".to_string(),
            overwrite: false,
            dedupe_name: true,
            create_missing_parents: true,
        })
        .await
        .unwrap();

    assert_eq!(entry.uid.as_deref(), Some("dir-9"));
    assert_eq!(entry.name, "app-1f2e");
    assert_eq!(entry.path.as_deref(), Some("/alice/AppData/app-1/app-1f2e"));

    let requests = server.requests();
    assert_eq!(requests[0].path, "/mkdir");
    let sent: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent["parent"], "/alice/AppData/app-1");
    assert_eq!(sent["create_missing_parents"], true);
    assert_eq!(sent["overwrite"], false);
}

#[tokio::test]
async fn test_whoami_unknown_route_is_http_error() {
    let server = TestServer::new(&[]).await.unwrap();
    let api = server.client(Some("secret"));

    let err = api.whoami().await.unwrap_err();

    assert!(matches!(err, PuterError::Http { status: 404, .. }));
    assert_eq!(server.requests()[0].method, "GET");
}
