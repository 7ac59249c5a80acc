use anyhow::Result;
use contact_import::core::export::{export_contacts, import_manual, write_sample, SAMPLE_CSV};
use contact_import::{
    ContactField, HttpContactApi, ImportError, ImportSession, ImportState, LocalStorage,
};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn storage_in(dir: &TempDir) -> LocalStorage {
    LocalStorage::new(dir.path().to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_end_to_end_csv_import() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("contacts.csv"),
        "Full Name,Mobile Number,E-mail,Tags\n\
         \"Doe, John\",(987) 654-3210,john@example.com,vip;gold;vip\n\
         Jane,,jane@example.com,lead\n\
         \n\
         Bob,917 654 321098,,\n",
    )?;

    let server = MockServer::start();
    let import_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/contacts/import")
            .json_body(json!({
                "contacts": [
                    {"phone": "9876543210", "name": "Doe, John", "email": "john@example.com", "tags": ["vip", "gold"]},
                    {"phone": "917654321098", "name": "Bob", "email": "", "tags": []}
                ]
            }));
        then.status(200)
            .json_body(json!({"data": {"imported": 2, "errors": []}}));
    });

    let api = HttpContactApi::new(server.url("/api"), None);
    let mut session = ImportSession::new(api);

    let upload = session
        .load_file(&storage_in(&temp_dir), "contacts.csv")
        .await?;
    assert_eq!(upload.data_rows, 3);
    assert_eq!(upload.preview.len(), 3);

    let mapping = *session.mapping().unwrap();
    assert_eq!(mapping.name, Some(0));
    assert_eq!(mapping.phone, Some(1));
    assert_eq!(mapping.email, Some(2));
    assert_eq!(mapping.tags, Some(3));

    session.proceed_to_preview()?;
    let summary = session.submit().await?;

    import_mock.assert_hits(1);
    assert_eq!(summary.submitted, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.source_name, "contacts.csv");
    assert!(matches!(session.state(), ImportState::Done(_)));
    Ok(())
}

#[tokio::test]
async fn test_minimal_file_imports_two_contacts_in_one_call() -> Result<()> {
    let server = MockServer::start();
    let import_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/contacts/import")
            .json_body(json!({
                "contacts": [
                    {"phone": "111", "name": "A", "email": "", "tags": []},
                    {"phone": "222", "name": "B", "email": "", "tags": []}
                ]
            }));
        then.status(200)
            .json_body(json!({"data": {"imported": 2, "errors": []}}));
    });

    let mut session = ImportSession::new(HttpContactApi::new(server.base_url(), None));
    session.load_text("pasted", "Name,Phone\nA,111\nB,222")?;
    session.proceed_to_preview()?;
    session.submit().await?;

    import_mock.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_non_csv_file_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("contacts.txt"), "Name,Phone\nA,1\n")?;

    let mut session = ImportSession::new(HttpContactApi::new("http://localhost:5001/api", None));
    let err = session
        .load_file(&storage_in(&temp_dir), "contacts.txt")
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::UnsupportedFile { .. }));
    assert_eq!(session.state(), &ImportState::Upload);
    Ok(())
}

#[tokio::test]
async fn test_short_files_never_reach_mapping() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("empty.csv"), "")?;
    std::fs::write(temp_dir.path().join("header.csv"), "Name,Phone\n\n")?;
    let storage = storage_in(&temp_dir);

    let mut session = ImportSession::new(HttpContactApi::new("http://localhost:5001/api", None));
    for file in ["empty.csv", "header.csv"] {
        let err = session.load_file(&storage, file).await.unwrap_err();
        assert!(matches!(err, ImportError::InsufficientRows { .. }), "{file}");
        assert_eq!(session.state(), &ImportState::Upload);
    }
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_keeps_preview_for_retry() -> Result<()> {
    let server = MockServer::start();
    let mut failing = server.mock(|when, then| {
        when.method(POST).path("/contacts/import");
        then.status(500).json_body(json!({"error": "Database unavailable"}));
    });

    let mut session = ImportSession::new(HttpContactApi::new(server.base_url(), None));
    session.load_text("pasted", "Phone,Label\n111,a\n222,b")?;
    session.proceed_to_preview()?;

    let err = session.submit().await.unwrap_err();
    assert_eq!(err.user_friendly_message(), "Database unavailable");
    assert_eq!(session.state().name(), "preview");
    failing.assert_hits(1);
    failing.delete();

    let ok = server.mock(|when, then| {
        when.method(POST).path("/contacts/import");
        then.status(200)
            .json_body(json!({"data": {"imported": 2, "errors": []}}));
    });
    let summary = session.submit().await?;
    assert_eq!(summary.imported, 2);
    ok.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_remapping_after_going_back() -> Result<()> {
    let server = MockServer::start();
    let import_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/contacts/import")
            .json_body(json!({
                "contacts": [{"phone": "555", "name": "", "email": "", "tags": []}]
            }));
        then.status(200)
            .json_body(json!({"data": {"imported": 1, "errors": []}}));
    });

    let mut session = ImportSession::new(HttpContactApi::new(server.base_url(), None));
    session.load_text("pasted", "Name,Cell\nA,555")?;
    assert_eq!(session.mapping().unwrap().phone, None);

    session.map_column(ContactField::Phone, "Cell")?;
    session.proceed_to_preview()?;
    session.back()?;
    session.set_column(ContactField::Name, None)?;
    session.proceed_to_preview()?;
    session.submit().await?;

    import_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_manual_import_posts_pasted_lines() -> Result<()> {
    let server = MockServer::start();
    let import_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/contacts/import")
            .json_body(json!({
                "contacts": [
                    {"phone": "919876543210", "name": "John", "email": "john@example.com", "tags": []}
                ]
            }));
        then.status(200)
            .json_body(json!({"data": {"imported": 1}}));
    });

    let api = HttpContactApi::new(server.base_url(), None);
    let result = import_manual(&api, "919876543210,John,john@example.com\n,Nobody\n").await?;

    import_mock.assert();
    assert_eq!(result.imported, 1);

    let err = import_manual(&api, "\n\n").await.unwrap_err();
    assert!(matches!(err, ImportError::NoValidContacts));
    Ok(())
}

#[tokio::test]
async fn test_export_writes_dated_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/contacts/export");
        then.status(200).json_body(json!({
            "data": [{"name": "John", "phone": "111", "email": "", "tags": ["a", "b"]}]
        }));
    });

    let api = HttpContactApi::new(server.base_url(), None);
    let filename = export_contacts(&api, &storage_in(&temp_dir)).await?;

    assert!(filename.starts_with("contacts_"));
    assert!(filename.ends_with(".csv"));
    let content = std::fs::read_to_string(temp_dir.path().join(&filename))?;
    assert_eq!(
        content,
        "Name,Phone,Email,Tags\n\"John\",\"111\",\"\",\"a;b\"\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_sample_file_round_trips_through_import() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = storage_in(&temp_dir);
    write_sample(&storage, "contacts_sample.csv").await?;

    let written = std::fs::read_to_string(temp_dir.path().join("contacts_sample.csv"))?;
    assert_eq!(written, SAMPLE_CSV);

    let mut session = ImportSession::new(HttpContactApi::new("http://localhost:5001/api", None));
    session.load_file(&storage, "contacts_sample.csv").await?;
    session.proceed_to_preview()?;
    let (contacts, skipped) = session.pending_contacts()?;
    assert_eq!(contacts.len(), 3);
    assert_eq!(skipped, 0);
    assert_eq!(contacts[0].tags, vec!["customer", "vip"]);
    Ok(())
}
