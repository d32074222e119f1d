#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use backoffice_api::{ApiClient, CreateUserDto, Error, ListQuery, Resource, Sort, UpdatePostDto};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn ok<T: serde::Serialize>(data: T) -> serde_json::Value {
    json!({ "code": 2000, "message": "ok", "data": data })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": 1,
            "token": "tok-123",
            "username": "admin",
            "nickname": "Admin",
        }))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/1"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": 1,
            "username": "admin",
            "nickname": "Admin",
        }))))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "secret".to_string().into();
    let resp = client.login("admin", &secret).await.unwrap();
    assert_eq!(resp.data.unwrap().nickname, "Admin");
    assert!(client.has_token());

    let user = client.get_user(1).await.unwrap().into_data().unwrap();
    assert_eq!(user.username, "admin");
}

#[tokio::test]
async fn test_login_failure_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "code": 4001, "message": "wrong password" })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "nope".to_string().into();
    let result = client.login("admin", &secret).await;

    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "wrong password"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_unauthorized_response_is_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/roles"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_roles(&ListQuery::new()).await.unwrap_err();
    assert!(err.is_auth_expired(), "got: {err:?}");
}

// ── Lists ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sends_query_pairs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(query_param("sort", "id:desc"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .and(query_param("nickname", "ali"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 2000,
            "message": "ok",
            "data": [
                { "id": 6, "username": "alice", "nickname": "ali" },
                { "id": 7, "username": "alina", "nickname": "ali" }
            ],
            "total": 7
        })))
        .mount(&server)
        .await;

    let query = ListQuery::new()
        .sort(Sort::default())
        .page(2, 5)
        .filter("nickname", "ali");
    let page = client.get_users(&query).await.unwrap();

    assert_eq!(page.total, 7);
    let names: Vec<_> = page.data.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "alina"]);
}

#[tokio::test]
async fn test_menu_tree_flag() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/menus"))
        .and(query_param("tree", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 2000,
            "message": "ok",
            "data": [{
                "id": 1, "name": "System", "code": "sys", "path": "/system",
                "icon": "gear", "type": 1, "parentId": 0,
                "children": [{
                    "id": 2, "name": "Users", "code": "users", "path": "/system/users",
                    "icon": "user", "type": 2, "parentId": 1
                }]
            }],
            "total": 1
        })))
        .mount(&server)
        .await;

    let menus = client.get_menus(&ListQuery::new(), true).await.unwrap();
    assert_eq!(menus.data.len(), 1);
    assert_eq!(menus.data[0].children[0].code, "users");
}

#[tokio::test]
async fn test_invalid_page_never_reaches_the_server() {
    let (server, client) = setup().await;

    let err = client
        .get_posts(&ListQuery::new().page(0, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery { field: "page", .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_user_returns_new_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .and(body_json(json!({ "username": "bob", "nickname": "Bob" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(42)))
        .mount(&server)
        .await;

    let dto = CreateUserDto {
        username: "bob".into(),
        password: None,
        nickname: "Bob".into(),
        description: None,
        avatar: None,
        role_ids: None,
    };
    let resp = client.add_user(&dto).await.unwrap();
    assert_eq!(resp.data, Some(42));
}

#[tokio::test]
async fn test_patch_sends_only_set_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/posts/3"))
        .and(body_json(json!({ "title": "Renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .mount(&server)
        .await;

    let dto = UpdatePostDto {
        title: Some("Renamed".into()),
        ..UpdatePostDto::default()
    };
    let ack = client.set_post(3, &dto).await.unwrap();
    assert_eq!(ack.code, 2000);
}

#[tokio::test]
async fn test_error_message_falls_back_to_transport_reason() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/categories/9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = client.del_category(9).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.display_message(), "Not Found");
}

#[tokio::test]
async fn test_envelope_message_wins_over_transport_reason() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/roles"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "code": 4220, "message": "slug taken" })),
        )
        .mount(&server)
        .await;

    let err = client
        .create_record(Resource::Role, &json!({ "name": "Admin", "slug": "admin" }))
        .await
        .unwrap_err();
    match err {
        Error::Api { status, code, message } => {
            assert_eq!(status, 422);
            assert_eq!(code, Some(4220));
            assert_eq!(message, "slug taken");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Files ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_file_is_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": 5, "name": "a.txt", "size": 5, "mimetype": "text/plain",
            "path": "/uploads/a.txt", "hash": "abc", "extension": "txt"
        }))))
        .mount(&server)
        .await;

    let upload = client
        .upload_file("a.txt", b"hello".to_vec(), Some("text/plain"))
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(upload.hash, "abc");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
}

#[tokio::test]
async fn test_download_post_template_returns_raw_bytes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/template.xlsx"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x50, 0x4b, 0x03, 0x04]))
        .mount(&server)
        .await;

    let bytes = client.download_post_template().await.unwrap();
    assert_eq!(&bytes[..], &[0x50, 0x4b, 0x03, 0x04]);
}

// ── Generic records ─────────────────────────────────────────────────

#[tokio::test]
async fn test_generic_list_records_keeps_raw_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/logs/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 2000,
            "message": "ok",
            "data": [{ "id": 1, "nickname": "ali", "status": true, "ip": "10.0.0.1" }],
            "total": 1
        })))
        .mount(&server)
        .await;

    let page = client
        .list_records(Resource::LoginLog, &ListQuery::new())
        .await
        .unwrap();
    assert_eq!(page.data[0]["ip"], "10.0.0.1");
}
