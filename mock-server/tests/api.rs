use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::app;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if body.is_some() {
        builder = builder.header(http::header::CONTENT_TYPE, "application/json");
    }
    builder.body(body.unwrap_or_default().to_string()).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> axum::response::Response {
    app.clone()
        .oneshot(request(method, uri, token, body))
        .await
        .unwrap()
}

const REGISTER_BODY: &str =
    r#"{"nome":"Ana","email":"ana@example.com","senha":"s3cret","confirmaSenha":"s3cret"}"#;
const LOGIN_BODY: &str = r#"{"email":"ana@example.com","senha":"s3cret"}"#;

async fn register_and_login(app: &Router) -> String {
    let resp = send(app, "POST", "/usuario", None, Some(REGISTER_BODY)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(app, "POST", "/auth/login", None, Some(LOGIN_BODY)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

// --- auth ---

#[tokio::test]
async fn register_returns_profile_without_password() {
    let app = app();
    let resp = send(&app, "POST", "/usuario", None, Some(REGISTER_BODY)).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: serde_json::Value = body_json(resp).await;
    assert_eq!(user["nome"], "Ana");
    assert_eq!(user["ativo"], true);
    assert!(user.get("senha").is_none());
}

#[tokio::test]
async fn register_duplicate_email_returns_400() {
    let app = app();
    send(&app, "POST", "/usuario", None, Some(REGISTER_BODY)).await;
    let resp = send(&app, "POST", "/usuario", None, Some(REGISTER_BODY)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_password_mismatch_returns_400() {
    let app = app();
    let body = r#"{"nome":"Ana","email":"ana@example.com","senha":"a","confirmaSenha":"b"}"#;
    let resp = send(&app, "POST", "/usuario", None, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_wrong_password_returns_401() {
    let app = app();
    send(&app, "POST", "/usuario", None, Some(REGISTER_BODY)).await;
    let body = r#"{"email":"ana@example.com","senha":"wrong"}"#;
    let resp = send(&app, "POST", "/auth/login", None, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_without_token_returns_401() {
    let app = app();
    let resp = send(&app, "GET", "/usuario/me", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_with_unknown_token_returns_401() {
    let app = app();
    let resp = send(&app, "GET", "/tarefas/paginado", Some("bogus"), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let app = app();
    let token = register_and_login(&app).await;

    let resp = send(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", "/usuario/me", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- user ---

#[tokio::test]
async fn profile_round_trip() {
    let app = app();
    let token = register_and_login(&app).await;

    let resp = send(&app, "GET", "/usuario/me", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user: serde_json::Value = body_json(resp).await;
    assert_eq!(user["email"], "ana@example.com");

    let resp = send(
        &app,
        "PUT",
        "/usuario/me",
        Some(&token),
        Some(r#"{"nome":"Ana Clara"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user: serde_json::Value = body_json(resp).await;
    assert_eq!(user["nome"], "Ana Clara");
    assert_eq!(user["email"], "ana@example.com");
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let app = app();
    let token = register_and_login(&app).await;

    let body = r#"{"senhaAtual":"wrong","novaSenha":"new","confirmaSenha":"new"}"#;
    let resp = send(&app, "PUT", "/usuario/me/alterar-senha", Some(&token), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = r#"{"senhaAtual":"s3cret","novaSenha":"new","confirmaSenha":"new"}"#;
    let resp = send(&app, "PUT", "/usuario/me/alterar-senha", Some(&token), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body = r#"{"email":"ana@example.com","senha":"new"}"#;
    let resp = send(&app, "POST", "/auth/login", None, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn deactivation_revokes_access_and_login() {
    let app = app();
    let token = register_and_login(&app).await;

    let resp = send(&app, "DELETE", "/usuario/me", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", "/usuario/me", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(&app, "POST", "/auth/login", None, Some(LOGIN_BODY)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- tasks ---

const TASK_BODY: &str = r#"{"titulo":"Pay rent","statusId":1,"prioridadeId":2}"#;

async fn create_task(app: &Router, token: &str, body: &str) -> i64 {
    let resp = send(app, "POST", "/tarefas", Some(token), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let task: serde_json::Value = body_json(resp).await;
    task["id"].as_i64().unwrap()
}

#[tokio::test]
async fn task_crud_lifecycle() {
    let app = app();
    let token = register_and_login(&app).await;
    let id = create_task(&app, &token, TASK_BODY).await;

    let resp = send(&app, "GET", &format!("/tarefas/{id}"), Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let task: serde_json::Value = body_json(resp).await;
    assert_eq!(task["titulo"], "Pay rent");
    assert_eq!(task["statusTexto"], "Pendente");

    let resp = send(
        &app,
        "PUT",
        &format!("/tarefas/{id}"),
        Some(&token),
        Some(r#"{"statusId":2}"#),
    )
    .await;
    let task: serde_json::Value = body_json(resp).await;
    assert_eq!(task["statusTexto"], "Em andamento");

    let resp = send(&app, "DELETE", &format!("/tarefas/deletar/{id}"), Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", &format!("/tarefas/{id}"), Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pagination_counts_pages() {
    let app = app();
    let token = register_and_login(&app).await;
    for i in 0..5 {
        let body = format!(r#"{{"titulo":"Task {i}","statusId":1,"prioridadeId":1}}"#);
        create_task(&app, &token, &body).await;
    }

    let resp = send(&app, "GET", "/tarefas/paginado?page=1&size=2", Some(&token), None).await;
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["totalItems"], 5);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["currentPage"], 1);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn complete_and_reopen_set_completion_date() {
    let app = app();
    let token = register_and_login(&app).await;
    let id = create_task(&app, &token, TASK_BODY).await;

    let resp = send(&app, "PATCH", &format!("/tarefas/concluir/{id}"), Some(&token), None).await;
    let task: serde_json::Value = body_json(resp).await;
    assert_eq!(task["statusTexto"], "Concluída");
    assert!(task["dataConclusao"].is_string());

    let resp = send(&app, "PATCH", &format!("/tarefas/reabrir/{id}"), Some(&token), None).await;
    let task: serde_json::Value = body_json(resp).await;
    assert_eq!(task["statusTexto"], "Pendente");
    assert!(task["dataConclusao"].is_null());
}

#[tokio::test]
async fn archive_moves_between_listings() {
    let app = app();
    let token = register_and_login(&app).await;
    let id = create_task(&app, &token, TASK_BODY).await;

    let resp = send(&app, "DELETE", &format!("/tarefas/arquivar/{id}"), Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", "/tarefas/paginado", Some(&token), None).await;
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["totalItems"], 0);

    let resp = send(&app, "GET", "/tarefas/arquivadas", Some(&token), None).await;
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["totalItems"], 1);

    let resp = send(&app, "PATCH", &format!("/tarefas/restaurar/{id}"), Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, "GET", "/tarefas/paginado", Some(&token), None).await;
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["totalItems"], 1);
}

#[tokio::test]
async fn bulk_complete_applies_to_all_ids() {
    let app = app();
    let token = register_and_login(&app).await;
    let a = create_task(&app, &token, TASK_BODY).await;
    let b = create_task(&app, &token, TASK_BODY).await;

    let body = format!(r#"{{"tarefasId":[{a},{b}]}}"#);
    let resp = send(&app, "PATCH", "/tarefas/concluir", Some(&token), Some(&body)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", "/tarefas/estatisticas", Some(&token), None).await;
    let stats: serde_json::Value = body_json(resp).await;
    assert_eq!(stats["concluidas"], 2);
}

#[tokio::test]
async fn bulk_delete_takes_body_on_delete() {
    let app = app();
    let token = register_and_login(&app).await;
    let a = create_task(&app, &token, TASK_BODY).await;
    let b = create_task(&app, &token, TASK_BODY).await;

    let body = format!(r#"{{"tarefasId":[{a},{b}]}}"#);
    let resp = send(&app, "DELETE", "/tarefas/deletar/multiplas", Some(&token), Some(&body)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", "/tarefas/paginado", Some(&token), None).await;
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["totalItems"], 0);
}

#[tokio::test]
async fn filter_and_search_narrow_results() {
    let app = app();
    let token = register_and_login(&app).await;
    create_task(&app, &token, r#"{"titulo":"Pay rent","statusId":1,"prioridadeId":1}"#).await;
    create_task(&app, &token, r#"{"titulo":"Walk the dog","statusId":2,"prioridadeId":3}"#).await;

    let resp = send(&app, "GET", "/tarefas/filtrar?statusId=2", Some(&token), None).await;
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["items"][0]["titulo"], "Walk the dog");

    let resp = send(
        &app,
        "GET",
        "/tarefas/filtrar/palavra?palavraChave=rent",
        Some(&token),
        None,
    )
    .await;
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["items"][0]["titulo"], "Pay rent");
}

#[tokio::test]
async fn tasks_are_scoped_to_their_owner() {
    let app = app();
    let token = register_and_login(&app).await;
    let id = create_task(&app, &token, TASK_BODY).await;

    let other = r#"{"nome":"Bia","email":"bia@example.com","senha":"x","confirmaSenha":"x"}"#;
    send(&app, "POST", "/usuario", None, Some(other)).await;
    let resp = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(r#"{"email":"bia@example.com","senha":"x"}"#),
    )
    .await;
    let body: serde_json::Value = body_json(resp).await;
    let other_token = body["token"].as_str().unwrap().to_string();

    let resp = send(&app, "GET", &format!("/tarefas/{id}"), Some(&other_token), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- categories ---

#[tokio::test]
async fn category_crud_and_task_linkage() {
    let app = app();
    let token = register_and_login(&app).await;

    let resp = send(&app, "POST", "/categorias", Some(&token), Some(r#"{"nome":"Home"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let category: serde_json::Value = body_json(resp).await;
    let category_id = category["id"].as_i64().unwrap();

    let body = format!(
        r#"{{"titulo":"Clean up","statusId":1,"prioridadeId":1,"categoriaId":{category_id}}}"#
    );
    let task_id = create_task(&app, &token, &body).await;

    let resp = send(&app, "GET", &format!("/tarefas/{task_id}"), Some(&token), None).await;
    let task: serde_json::Value = body_json(resp).await;
    assert_eq!(task["categoriaNome"], "Home");

    let resp = send(
        &app,
        "PUT",
        &format!("/categorias/{category_id}"),
        Some(&token),
        Some(r#"{"nome":"Chores"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, "GET", &format!("/tarefas/{task_id}"), Some(&token), None).await;
    let task: serde_json::Value = body_json(resp).await;
    assert_eq!(task["categoriaNome"], "Chores");

    let resp = send(
        &app,
        "DELETE",
        &format!("/categorias/{category_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", &format!("/tarefas/{task_id}"), Some(&token), None).await;
    let task: serde_json::Value = body_json(resp).await;
    assert!(task["categoriaId"].is_null());

    let resp = send(&app, "GET", "/categorias", Some(&token), None).await;
    let categories: serde_json::Value = body_json(resp).await;
    assert!(categories.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_category_returns_404() {
    let app = app();
    let token = register_and_login(&app).await;
    let resp = send(&app, "DELETE", "/categorias/999", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
