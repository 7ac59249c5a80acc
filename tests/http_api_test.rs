use anyhow::Result;
use contact_import::core::ContactApi;
use contact_import::{ContactRecord, HttpContactApi, ImportError};
use httpmock::prelude::*;
use serde_json::json;

fn contact(phone: &str, name: &str, tags: &[&str]) -> ContactRecord {
    ContactRecord {
        phone: phone.to_string(),
        name: name.to_string(),
        email: String::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_import_sends_bearer_token_and_reads_envelope() -> Result<()> {
    let server = MockServer::start();
    let import_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/contacts/import")
            .header("Authorization", "Bearer secret-token")
            .json_body(json!({
                "contacts": [
                    {"phone": "111", "name": "A", "email": "", "tags": ["vip"]},
                    {"phone": "222", "name": "B", "email": "", "tags": []}
                ]
            }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "success": true,
                "data": {"imported": 1, "errors": [{"phone": "222", "error": "duplicate"}]}
            }));
    });

    let api = HttpContactApi::new(server.url("/api"), Some("secret-token".to_string()));
    let result = api
        .import_contacts(&[contact("111", "A", &["vip"]), contact("222", "B", &[])])
        .await?;

    import_mock.assert();
    assert_eq!(result.imported, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0]["error"], "duplicate");
    Ok(())
}

#[tokio::test]
async fn test_error_body_becomes_message() {
    let server = MockServer::start();
    let import_mock = server.mock(|when, then| {
        when.method(POST).path("/api/contacts/import");
        then.status(400)
            .header("Content-Type", "application/json")
            .json_body(json!({"success": false, "error": "Contact limit reached"}));
    });

    let api = HttpContactApi::new(server.url("/api"), None);
    let err = api
        .import_contacts(&[contact("111", "A", &[])])
        .await
        .unwrap_err();

    import_mock.assert();
    match err {
        ImportError::BackendError { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Contact limit reached");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_without_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/contacts/import");
        then.status(502);
    });

    let api = HttpContactApi::new(server.url("/api"), None);
    let err = api.import_contacts(&[contact("1", "", &[])]).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(err, ImportError::BackendError { status: 502, .. }));
}

#[tokio::test]
async fn test_unauthorized_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/contacts/export");
        then.status(401)
            .json_body(json!({"error": "Invalid token"}));
    });

    let api = HttpContactApi::new(server.url("/api"), Some("expired".to_string()));
    let err = api.export_contacts().await.unwrap_err();
    assert!(matches!(err, ImportError::Unauthorized));
}

#[tokio::test]
async fn test_export_requests_json_format() -> Result<()> {
    let server = MockServer::start();
    let export_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/contacts/export")
            .query_param("format", "json");
        then.status(200).json_body(json!({
            "data": [
                {"name": "John Doe", "phone": "919876543210", "email": "john@example.com", "tags": ["vip"]},
                {"phone": "918765432109"}
            ]
        }));
    });

    let api = HttpContactApi::new(server.url("/api/"), None);
    let contacts = api.export_contacts().await?;

    export_mock.assert();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].name.as_deref(), Some("John Doe"));
    assert!(contacts[1].name.is_none());
    assert!(contacts[1].tags.is_empty());
    Ok(())
}
