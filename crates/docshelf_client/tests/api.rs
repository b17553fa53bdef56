use std::time::Duration;

use docshelf_client::{ClientSettings, DocStore, FailureKind, ReqwestDocStore, UploadFile};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> ReqwestDocStore {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    ReqwestDocStore::new(settings).expect("client")
}

#[tokio::test]
async fn registry_decodes_tag_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/registry"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"tags":["invoices","notes"]}"#))
        .mount(&server)
        .await;

    let tags = store_for(&server).registry().await.expect("registry ok");
    assert_eq!(tags, vec!["invoices".to_string(), "notes".to_string()]);
}

#[tokio::test]
async fn list_docs_passes_filter_and_decodes_records() {
    let server = MockServer::start().await;
    let body = r#"[
        {"id":"7","title":"Report","filename":"report.pdf","ext":".pdf","size":2048,
         "updated_at":1700000000,"tags":"invoices","sha256":"ab","created_at":1700000000},
        {"id":"8","title":"Memo","filename":"memo.txt","ext":".txt","size":512,
         "updated_at":1700000001,"tags":""}
    ]"#;
    Mock::given(method("GET"))
        .and(path("/api/docs"))
        .and(query_param("tag", "invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let docs = store_for(&server)
        .list_docs("invoices")
        .await
        .expect("docs ok");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id, "7");
    assert_eq!(docs[0].tags, "invoices");
    assert_eq!(docs[1].size, 512);
    assert_eq!(docs[1].tags, "");
}

#[tokio::test]
async fn non_success_status_carries_body_text_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/registry"))
        .respond_with(ResponseTemplate::new(403).set_body_string("LAN only"))
        .mount(&server)
        .await;

    let err = store_for(&server).registry().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
    assert_eq!(err.message, "LAN only");
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/delete/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store_for(&server).delete_doc("9").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.message, "404 Not Found");
}

#[tokio::test]
async fn add_tag_posts_form_encoded_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/registry/add"))
        .and(body_string_contains("name=invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server).add_tag("invoices").await.expect("add ok");
}

#[tokio::test]
async fn assign_tag_sends_sentinel_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/doc/7/tag"))
        .and(body_string_contains("tag=All"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server).assign_tag("7", "All").await.expect("assign ok");
}

#[tokio::test]
async fn upload_posts_all_files_in_one_multipart_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true,"items":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let files = vec![
        UploadFile {
            name: "a.pdf".to_string(),
            bytes: b"pdf-bytes".to_vec(),
        },
        UploadFile {
            name: "b.md".to_string(),
            bytes: b"# md".to_vec(),
        },
    ];
    store_for(&server).upload(files).await.expect("upload ok");

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("a.pdf"));
    assert!(body.contains("b.md"));
    let content_type = requests[0]
        .headers
        .get("content-type")
        .expect("content type")
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn reindex_decodes_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reindex"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true,"count":5}"#))
        .mount(&server)
        .await;

    let count = store_for(&server).reindex().await.expect("reindex ok");
    assert_eq!(count, 5);
}

#[tokio::test]
async fn backup_returns_raw_bytes() {
    let server = MockServer::start().await;
    let payload: &[u8] = b"\x1f\x8b archive bytes";
    Mock::given(method("GET"))
        .and(path("/api/backup"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(payload.to_vec(), "application/gzip"),
        )
        .mount(&server)
        .await;

    let bytes = store_for(&server).backup().await.expect("backup ok");
    assert_eq!(bytes.as_ref(), payload);
}

#[tokio::test]
async fn restore_posts_single_file_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/restore"))
        .and(body_string_contains("docs_backup.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let file = UploadFile {
        name: "docs_backup.tar.gz".to_string(),
        bytes: b"archive".to_vec(),
    };
    store_for(&server).restore(file).await.expect("restore ok");
}

#[tokio::test]
async fn decode_failure_is_reported_as_such() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/registry"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = store_for(&server).registry().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn configured_timeout_is_honoured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/docs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::default()
    };
    let store = ReqwestDocStore::new(settings).expect("client");
    let err = store.list_docs("All").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}
