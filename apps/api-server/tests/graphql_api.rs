//! HTTP-level behaviour of the GraphQL, upload, static image and health
//! endpoints over in-memory storage.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use argon2::Params;
use feed_core::ports::TokenService;
use feed_infra::{Argon2PasswordService, JwtConfig, JwtTokenService, LocalImageStore};
use serde_json::{Value, json};
use tempfile::TempDir;

use api_server::config::IMAGE_ROUTE;
use api_server::handlers::configure_routes;
use api_server::state::{AppState, Repositories};

const MAX_UPLOAD_BYTES: usize = 64 * 1024;
const BOUNDARY: &str = "feed-test-boundary";

const CREATE_USER: &str = r#"
    mutation($email: String!, $name: String!, $password: String!) {
        createUser(userInput: {email: $email, name: $name, password: $password}) {
            _id email name status
        }
    }"#;

const LOGIN: &str = r#"
    query($email: String!, $password: String!) {
        login(email: $email, password: $password) { token userId }
    }"#;

const CREATE_POST: &str = r#"
    mutation($title: String!, $content: String!, $imageUrl: String) {
        createPost(postInput: {title: $title, content: $content, imageUrl: $imageUrl}) {
            _id title content imageUrl createdAt creator { _id name }
        }
    }"#;

const UPDATE_POST: &str = r#"
    mutation($id: ID!, $title: String!, $content: String!) {
        updatePost(id: $id, postInput: {title: $title, content: $content}) {
            _id title content
        }
    }"#;

const LIST_POSTS: &str = r#"
    query($page: Int) {
        posts(page: $page) { totalPosts posts { _id title creator { email } } }
    }"#;

fn test_state(dir: &TempDir) -> AppState {
    AppState::build(
        Repositories::in_memory(),
        Arc::new(LocalImageStore::new(dir.path(), IMAGE_ROUTE)),
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "graphql-api-test".to_string(),
            ..JwtConfig::default()
        })),
        Arc::new(Argon2PasswordService::with_params(
            Params::new(8, 1, 1, None).unwrap(),
        )),
        None,
        MAX_UPLOAD_BYTES,
    )
}

macro_rules! app {
    ($state:expr, $dir:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(|cfg| configure_routes(cfg, $dir.path())),
        )
        .await
    };
}

fn gql(token: Option<&str>, query: &str, variables: Value) -> test::TestRequest {
    let req = test::TestRequest::post()
        .uri("/graphql")
        .set_json(json!({ "query": query, "variables": variables }));
    match token {
        Some(token) => req.insert_header((header::AUTHORIZATION, format!("Bearer {token}"))),
        None => req,
    }
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn upload(token: Option<&str>, parts: &[Part<'_>]) -> test::TestRequest {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let req = test::TestRequest::put()
        .uri("/upload-image")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body);
    match token {
        Some(token) => req.insert_header((header::AUTHORIZATION, format!("Bearer {token}"))),
        None => req,
    }
}

fn png(name: &str) -> Part<'_> {
    Part::File {
        name: "image",
        file_name: name,
        content_type: "image/png",
        bytes: b"\x89PNG\r\n\x1a\nfake",
    }
}

fn first_error(body: &Value) -> &Value {
    &body["errors"][0]
}

#[actix_web::test]
async fn test_end_to_end_feed() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);

    for (email, name) in [("a@x.com", "A"), ("b@x.com", "B")] {
        let body: Value = test::call_and_read_body_json(
            &app,
            gql(
                None,
                CREATE_USER,
                json!({"email": email, "name": name, "password": "secret"}),
            )
            .to_request(),
        )
        .await;
        assert_eq!(body["data"]["createUser"]["email"], email);
        assert_eq!(body["data"]["createUser"]["status"], "I am new!");
    }

    let mut tokens = Vec::new();
    for email in ["a@x.com", "b@x.com"] {
        let body: Value = test::call_and_read_body_json(
            &app,
            gql(None, LOGIN, json!({"email": email, "password": "secret"})).to_request(),
        )
        .await;
        let token = body["data"]["login"]["token"].as_str().unwrap().to_string();
        assert!(body["data"]["login"]["userId"].is_string());
        tokens.push(token);
    }
    let (token_a, token_b) = (tokens[0].as_str(), tokens[1].as_str());

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            Some(token_a),
            CREATE_POST,
            json!({"title": "Hello World!", "content": "This is content"}),
        )
        .to_request(),
    )
    .await;
    let post = &body["data"]["createPost"];
    assert_eq!(post["creator"]["name"], "A");
    assert!(post["imageUrl"].is_null());
    assert!(post["createdAt"].as_str().unwrap().ends_with('Z'));
    let post_id = post["_id"].as_str().unwrap().to_string();

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(Some(token_a), LIST_POSTS, json!({"page": 1})).to_request(),
    )
    .await;
    assert_eq!(body["data"]["posts"]["totalPosts"], 1);
    let posts = body["data"]["posts"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["_id"], post_id.as_str());
    assert_eq!(posts[0]["creator"]["email"], "a@x.com");

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            Some(token_a),
            UPDATE_POST,
            json!({"id": post_id, "title": "Hello again", "content": "Fresh content"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["data"]["updatePost"]["title"], "Hello again");

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            Some(token_b),
            UPDATE_POST,
            json!({"id": post_id, "title": "Hijacked!", "content": "Not my post"}),
        )
        .to_request(),
    )
    .await;
    let error = first_error(&body);
    assert_eq!(error["status"], 403);
    assert_eq!(error["message"], "Not authorized to access this post");
    assert_eq!(error["path"][0], "updatePost");
}

#[actix_web::test]
async fn test_error_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);

    // Validation failures list every invalid field.
    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            None,
            CREATE_USER,
            json!({"email": "nope", "name": "N", "password": "123"}),
        )
        .to_request(),
    )
    .await;
    let error = first_error(&body);
    assert_eq!(error["message"], "Invalid input");
    assert_eq!(error["status"], 422);
    let fields: Vec<&str> = error["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["email", "password"]);

    // Anonymous callers are rejected.
    let body: Value = test::call_and_read_body_json(
        &app,
        gql(None, LIST_POSTS, json!({})).to_request(),
    )
    .await;
    assert_eq!(first_error(&body)["status"], 401);
    assert_eq!(first_error(&body)["message"], "Not authenticated");

    // A forged token is treated as anonymous, not as a server error.
    let body: Value = test::call_and_read_body_json(
        &app,
        gql(Some("forged.token.value"), LIST_POSTS, json!({})).to_request(),
    )
    .await;
    assert_eq!(first_error(&body)["status"], 401);

    // Unknown credentials.
    let body: Value = test::call_and_read_body_json(
        &app,
        gql(None, LOGIN, json!({"email": "ghost@x.com", "password": "secret"})).to_request(),
    )
    .await;
    assert_eq!(first_error(&body)["status"], 401);
    assert_eq!(first_error(&body)["message"], "User not found");

    // Schema errors carry the default status.
    let body: Value = test::call_and_read_body_json(
        &app,
        gql(None, "{ doesNotExist }", json!({})).to_request(),
    )
    .await;
    assert_eq!(first_error(&body)["status"], 500);
    assert!(body["data"].is_null());
}

#[actix_web::test]
async fn test_missing_post_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);

    test::call_service(
        &app,
        gql(
            None,
            CREATE_USER,
            json!({"email": "a@x.com", "name": "A", "password": "secret"}),
        )
        .to_request(),
    )
    .await;
    let login = state.users.login("a@x.com", "secret").await.unwrap();

    for id in ["not-an-id", "6f9619ff-8b86-d011-b42d-00c04fc964ff"] {
        let body: Value = test::call_and_read_body_json(
            &app,
            gql(
                Some(&login.token),
                "query($id: ID!) { post(id: $id) { _id } }",
                json!({"id": id}),
            )
            .to_request(),
        )
        .await;
        assert_eq!(first_error(&body)["status"], 404);
        assert_eq!(first_error(&body)["message"], "Could not find post");
    }
}

#[actix_web::test]
async fn test_status_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);

    test::call_service(
        &app,
        gql(
            None,
            CREATE_USER,
            json!({"email": "a@x.com", "name": "A", "password": "secret"}),
        )
        .to_request(),
    )
    .await;
    let token = state.users.login("a@x.com", "secret").await.unwrap().token;

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            Some(&token),
            r#"mutation { updateStatus(status: "Busy writing") { message } }"#,
            json!({}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["data"]["updateStatus"]["message"], "Busy writing");

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(Some(&token), "{ userStatus { message } }", json!({})).to_request(),
    )
    .await;
    assert_eq!(body["data"]["userStatus"]["message"], "Busy writing");

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            Some(&token),
            CREATE_POST,
            json!({"title": "Short lived", "content": "Gone soon enough"}),
        )
        .to_request(),
    )
    .await;
    let post_id = body["data"]["createPost"]["_id"].as_str().unwrap().to_string();

    let delete = "mutation($id: ID!) { deletePost(id: $id) { message } }";
    let body: Value = test::call_and_read_body_json(
        &app,
        gql(None, delete, json!({"id": post_id})).to_request(),
    )
    .await;
    assert_eq!(first_error(&body)["status"], 401);

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(Some(&token), delete, json!({"id": post_id})).to_request(),
    )
    .await;
    assert_eq!(body["data"]["deletePost"]["message"], "Post deleted");

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(Some(&token), LIST_POSTS, json!({})).to_request(),
    )
    .await;
    assert_eq!(body["data"]["posts"]["totalPosts"], 0);
}

#[actix_web::test]
async fn test_upload_requires_auth() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);

    let resp = test::call_service(&app, upload(None, &[png("cat.png")]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Not authenticated", "status": 401}));
}

#[actix_web::test]
async fn test_upload_replace_and_serve() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);
    let token = state
        .tokens
        .generate_token(uuid::Uuid::new_v4(), "a@x.com")
        .unwrap();

    let resp = test::call_service(
        &app,
        upload(Some(&token), &[png("first cat.png")]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "File uploaded");
    let first = body["filePath"].as_str().unwrap().to_string();
    assert!(first.starts_with("images/"));
    assert!(first.ends_with("first_cat.png"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri(&format!("/{first}")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        upload(
            Some(&token),
            &[Part::Text("oldPath", &first), png("second.png")],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let stored: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].ends_with("second.png"));
}

#[actix_web::test]
async fn test_upload_rejections() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);
    let token = state
        .tokens
        .generate_token(uuid::Uuid::new_v4(), "a@x.com")
        .unwrap();

    let gif = Part::File {
        name: "image",
        file_name: "anim.gif",
        content_type: "image/gif",
        bytes: b"GIF89a",
    };
    let resp = test::call_service(&app, upload(Some(&token), &[gif]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unsupported image type");

    let huge = vec![0u8; MAX_UPLOAD_BYTES + 1];
    let big = Part::File {
        name: "image",
        file_name: "big.png",
        content_type: "image/png",
        bytes: &huge,
    };
    let resp = test::call_service(&app, upload(Some(&token), &[big]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let resp = test::call_service(
        &app,
        upload(Some(&token), &[Part::Text("oldPath", "images/none.png")]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "No file uploaded"}));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[actix_web::test]
async fn test_upload_without_multipart_body_has_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);
    let token = state
        .tokens
        .generate_token(uuid::Uuid::new_v4(), "a@x.com")
        .unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/upload-image")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"oldPath": "images/a.png"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "No file uploaded"}));

    // Authentication is still checked first.
    let resp = test::call_service(
        &app,
        test::TestRequest::put().uri("/upload-image").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_health_and_graphiql() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let app = app!(state, dir);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/health").to_request(),
    )
    .await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in-memory");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/graphql").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&html).to_lowercase().contains("graphiql"));
}
