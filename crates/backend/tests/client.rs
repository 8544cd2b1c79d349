use backend::{decode_text_stream, BackendClient, ChatApi, ChatError, FileUpload};
use futures::StreamExt;
use serde_json::json;
use shared::settings::ClientSettings;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BackendClient {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    BackendClient::new(&settings).unwrap()
}

#[tokio::test]
async fn login_posts_form_and_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = client_for(&server)
        .exchange_credentials("alice", "s3cret")
        .await
        .unwrap();
    assert_eq!(token, "tok-123");
}

#[tokio::test]
async fn login_failure_surfaces_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .exchange_credentials("alice", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Login(_)));
    assert_eq!(err.to_string(), "Incorrect username or password");
}

#[tokio::test]
async fn login_failure_without_detail_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .exchange_credentials("alice", "pw")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Login failed");
}

#[tokio::test]
async fn login_success_without_token_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .exchange_credentials("alice", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Decode(_)));
}

#[tokio::test]
async fn upload_sends_file_role_and_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_string_contains("name=\"role\""))
        .and(body_string_contains("filename=\"report.pdf\""))
        .and(body_string_contains("%PDF-1.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": "File saved successfully",
            "file_path": "./uploads//report.pdf",
            "role": "user"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client_for(&server)
        .upload(
            FileUpload {
                file_name: "report.pdf".into(),
                bytes: b"%PDF-1.4 body".to_vec(),
            },
            Some("tok-123"),
        )
        .await
        .unwrap();
    assert_eq!(receipt.role.as_deref(), Some("user"));
    assert_eq!(receipt.info.as_deref(), Some("File saved successfully"));
}

#[tokio::test]
async fn upload_401_with_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload(
            FileUpload {
                file_name: "a.txt".into(),
                bytes: b"x".to_vec(),
            },
            Some("stale"),
        )
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn upload_server_error_is_upload_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "No file uploaded"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload(
            FileUpload {
                file_name: "a.txt".into(),
                bytes: Vec::new(),
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Upload { status: 400 }));
    assert_eq!(err.to_string(), "File upload failed");
}

#[tokio::test]
async fn chat_streams_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_string_contains("name=\"message\""))
        .and(body_string_contains("who is on leave today?"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string("Nobody is on leave today. ✅"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .chat("who is on leave today?", Some("tok-123"))
        .await
        .unwrap();
    let text: String = decode_text_stream(reply.body)
        .map(|fragment| fragment.unwrap())
        .collect::<Vec<_>>()
        .await
        .concat();
    assert_eq!(text, "Nobody is on leave today. ✅");
}

#[tokio::test]
async fn chat_without_token_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "hi"})))
        .mount(&server)
        .await;

    let reply = client_for(&server).chat("hello", None).await.unwrap();
    let body = reply.collect().await.unwrap();
    assert_eq!(body, br#"{"result":"hi"}"#.to_vec());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn chat_401_without_token_is_plain_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).chat("hello", None).await.unwrap_err();
    assert!(matches!(err, ChatError::Chat { status: 401 }));
}

#[tokio::test]
async fn chat_server_error_is_chat_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "Token limit has reached its max limit"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).chat("hello", Some("tok")).await.unwrap_err();
    assert!(matches!(err, ChatError::Chat { status: 403 }));
}
