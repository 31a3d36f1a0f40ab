//! Integration coverage for the Connect adapter.
//!
//! The real [`ConnectGalleryClient`] talks over a socket to an in-process
//! Actix stub that records every call and answers with canned bodies.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use camino::Utf8PathBuf;
use client::domain::ports::{AuthApi, ImageApi, UserApi};
use client::domain::{
    AuthContext, ErrorCode, ImageId, ImageUpload, LoginCredentials, ProfileUpdate, UserId,
};
use client::outbound::connect::{ConnectGalleryClient, ConnectTransport};
use client::outbound::storage::FileStorage;
use pagination::PageRequest;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct RecordedCall {
    procedure: String,
    content_type: Option<String>,
    protocol_version: Option<String>,
    user_id: Option<String>,
    body: Value,
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: u16,
    content_type: &'static str,
    body: String,
}

#[derive(Clone, Default)]
struct StubBackend {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    responses: Arc<Mutex<HashMap<String, CannedResponse>>>,
}

impl StubBackend {
    fn respond_json(&self, procedure: &str, status: u16, body: &Value) -> &Self {
        self.responses.lock().expect("responses lock").insert(
            procedure.to_owned(),
            CannedResponse {
                status,
                content_type: "application/json",
                body: body.to_string(),
            },
        );
        self
    }

    fn respond_text(&self, procedure: &str, status: u16, body: &str) -> &Self {
        self.responses.lock().expect("responses lock").insert(
            procedure.to_owned(),
            CannedResponse {
                status,
                content_type: "text/plain",
                body: body.to_owned(),
            },
        );
        self
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn only_call(&self) -> RecordedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().expect("one call")
    }
}

fn header(request: &HttpRequest, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

async fn handle(
    path: web::Path<(String, String)>,
    request: HttpRequest,
    body: web::Bytes,
    stub: web::Data<StubBackend>,
) -> HttpResponse {
    let (service, method) = path.into_inner();
    let procedure = format!("{service}/{method}");
    stub.calls.lock().expect("calls lock").push(RecordedCall {
        procedure: procedure.clone(),
        content_type: header(&request, "content-type"),
        protocol_version: header(&request, "connect-protocol-version"),
        user_id: header(&request, "x-user-id"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let canned = stub
        .responses
        .lock()
        .expect("responses lock")
        .get(&procedure)
        .cloned();
    match canned {
        Some(canned) => HttpResponse::build(
            StatusCode::from_u16(canned.status).expect("valid status"),
        )
        .content_type(canned.content_type)
        .body(canned.body),
        None => HttpResponse::NotFound().json(json!({
            "code": "unimplemented",
            "message": format!("{procedure} is not implemented"),
        })),
    }
}

async fn spawn_stub(stub: StubBackend) -> (String, ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    let data = web::Data::new(stub);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/{service}/{method}", web::post().to(handle))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .expect("listen")
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle)
}

fn client_for(base_url: &str) -> ConnectGalleryClient {
    ConnectGalleryClient::new(ConnectTransport::new(base_url, None).expect("transport"))
}

fn identity() -> UserId {
    UserId::new("u-1").expect("user id")
}

#[actix_web::test]
async fn login_sends_connect_headers_and_returns_a_session() {
    let stub = StubBackend::default();
    stub.respond_json(
        "users.v1.AuthService/Login",
        200,
        &json!({
            "userId": "u-1",
            "displayName": "Ada",
            "email": "ada@example.com",
            "sessionToken": "tok-1",
        }),
    );
    let (base_url, server) = spawn_stub(stub.clone()).await;

    let credentials = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("valid");
    let session = client_for(&base_url)
        .login(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(session.token().as_ref(), "tok-1");
    assert_eq!(session.user().id().as_ref(), "u-1");
    assert_eq!(session.user().display_name(), "Ada");

    let call = stub.only_call();
    assert_eq!(call.procedure, "users.v1.AuthService/Login");
    assert_eq!(call.content_type.as_deref(), Some("application/json"));
    assert_eq!(call.protocol_version.as_deref(), Some("1"));
    assert!(call.user_id.is_none());
    assert_eq!(
        call.body,
        json!({ "email": "ada@example.com", "password": "pw" })
    );
    server.stop(true).await;
}

#[actix_web::test]
async fn connect_errors_keep_the_server_message() {
    let stub = StubBackend::default();
    stub.respond_json(
        "users.v1.AuthService/Login",
        401,
        &json!({ "code": "unauthenticated", "message": "invalid credentials" }),
    );
    let (base_url, server) = spawn_stub(stub).await;

    let credentials = LoginCredentials::try_from_parts("ada@example.com", "nope").expect("valid");
    let err = client_for(&base_url)
        .login(&credentials)
        .await
        .expect_err("login fails");

    assert_eq!(err.code(), ErrorCode::Unauthenticated);
    assert_eq!(err.message(), "invalid credentials");
    server.stop(true).await;
}

#[actix_web::test]
async fn non_connect_error_bodies_map_from_the_status() {
    let stub = StubBackend::default();
    stub.respond_text("users.v1.UserService/GetUser", 503, "upstream   down");
    let (base_url, server) = spawn_stub(stub).await;

    let err = client_for(&base_url)
        .get_user(&identity())
        .await
        .expect_err("lookup fails");

    assert_eq!(err.code(), ErrorCode::Unavailable);
    assert_eq!(err.message(), "status 503: upstream down");
    server.stop(true).await;
}

#[actix_web::test]
async fn unreachable_backend_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    let err = client_for(&format!("http://{addr}"))
        .list_images(PageRequest::first())
        .await
        .expect_err("nothing listens");
    assert_eq!(err.code(), ErrorCode::Unavailable);
}

#[actix_web::test]
async fn authenticated_calls_carry_the_user_id() {
    let stub = StubBackend::default();
    stub.respond_json(
        "users.v1.ImageService/DeleteImage",
        200,
        &json!({ "success": true }),
    )
    .respond_json(
        "users.v1.UserService/UpdateUser",
        200,
        &json!({ "userId": "u-1", "displayName": "Countess", "email": "ada@example.com" }),
    );
    let (base_url, server) = spawn_stub(stub.clone()).await;
    let client = client_for(&base_url);

    client
        .delete_image(&identity(), &ImageId::new("img-1").expect("image id"))
        .await
        .expect("delete succeeds");
    let update = ProfileUpdate::try_from_parts("pw", "Countess", "", "").expect("valid update");
    let user = client
        .update_user(&identity(), &update)
        .await
        .expect("update succeeds");
    assert_eq!(user.display_name(), "Countess");

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.user_id.as_deref() == Some("u-1")));
    assert_eq!(calls[0].body, json!({ "id": "img-1" }));
    assert_eq!(
        calls[1].body,
        json!({ "currentPassword": "pw", "newDisplayName": "Countess" })
    );
    server.stop(true).await;
}

#[actix_web::test]
async fn list_images_decodes_base64_thumbnails() {
    let stub = StubBackend::default();
    stub.respond_json(
        "users.v1.ImageService/ListImages",
        200,
        &json!({
            "images": [{
                "id": "img-1",
                "ownerId": "u-1",
                "ownerDisplayName": "Ada",
                "filename": "cat.jpg",
                "createdAt": "2024-03-01T12:00:00Z",
                "thumbnail": "/9j/",
            }],
            "total": 3,
        }),
    );
    let (base_url, server) = spawn_stub(stub.clone()).await;

    let page = client_for(&base_url)
        .list_images(PageRequest::first())
        .await
        .expect("list succeeds");

    assert_eq!(page.total(), 3);
    let image = page.items().first().expect("one image");
    assert_eq!(image.display_title(), "cat.jpg");
    assert_eq!(image.thumbnail, vec![0xFF, 0xD8, 0xFF]);

    let call = stub.only_call();
    assert!(call.user_id.is_none());
    assert_eq!(call.body, json!({ "limit": 50, "offset": 0 }));
    server.stop(true).await;
}

#[actix_web::test]
async fn upload_encodes_the_image_as_base64() {
    let stub = StubBackend::default();
    stub.respond_json(
        "users.v1.ImageService/UploadImage",
        200,
        &json!({ "imageId": "img-9" }),
    );
    let (base_url, server) = spawn_stub(stub.clone()).await;

    let upload = ImageUpload::try_new(
        "cat.jpg".to_owned(),
        Some("image/jpeg"),
        vec![0xFF, 0xD8, 0xFF],
        "Cat".to_owned(),
        String::new(),
    )
    .expect("valid upload");
    let image_id = client_for(&base_url)
        .upload_image(&identity(), &upload)
        .await
        .expect("upload succeeds");

    assert_eq!(image_id.as_ref(), "img-9");
    let call = stub.only_call();
    assert_eq!(call.user_id.as_deref(), Some("u-1"));
    assert_eq!(
        call.body,
        json!({
            "filename": "cat.jpg",
            "contentType": "image/jpeg",
            "data": "/9j/",
            "title": "Cat",
            "description": "",
        })
    );
    server.stop(true).await;
}

#[actix_web::test]
async fn session_survives_a_reload_from_disk() {
    let stub = StubBackend::default();
    stub.respond_json(
        "users.v1.AuthService/Login",
        200,
        &json!({
            "userId": "u-1",
            "displayName": "Ada",
            "email": "ada@example.com",
            "sessionToken": "tok-1",
        }),
    );
    let (base_url, server) = spawn_stub(stub).await;
    let tmp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().join("session")).expect("utf-8 path");

    let credentials = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("valid");
    let session = client_for(&base_url)
        .login(&credentials)
        .await
        .expect("login succeeds");
    let mut auth = AuthContext::new(Arc::new(FileStorage::open(&root).expect("open storage")));
    auth.login(session).expect("persist session");

    let reloaded =
        AuthContext::rehydrate(Arc::new(FileStorage::open(&root).expect("reopen storage")))
            .expect("rehydrate");
    assert_eq!(reloaded.session(), auth.session());

    let mut reloaded = reloaded;
    reloaded.logout().expect("logout");
    let after_logout =
        AuthContext::rehydrate(Arc::new(FileStorage::open(&root).expect("reopen storage")))
            .expect("rehydrate");
    assert!(!after_logout.is_authenticated());
    server.stop(true).await;
}
