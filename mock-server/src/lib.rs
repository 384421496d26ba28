use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const CREATED_AT: &str = "2024-01-01T00:00:00Z";
const COMPLETED_AT: &str = "2024-06-01T12:00:00Z";

const STATUS_PENDING: i64 = 1;
const STATUS_IN_PROGRESS: i64 = 2;
const STATUS_COMPLETED: i64 = 3;

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: i64,
    pub nome: String,
    pub email: String,
    #[serde(skip)]
    pub senha: String,
    #[serde(rename = "dataCriacao")]
    pub data_criacao: String,
    pub ativo: bool,
    pub roles: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Task {
    pub id: i64,
    pub titulo: String,
    pub descricao: Option<String>,
    #[serde(rename = "statusId")]
    pub status_id: i64,
    #[serde(rename = "statusTexto")]
    pub status_texto: String,
    #[serde(rename = "prioridadeId")]
    pub prioridade_id: i64,
    pub prazo: Option<String>,
    #[serde(rename = "dataConclusao")]
    pub data_conclusao: Option<String>,
    #[serde(rename = "categoriaId")]
    pub categoria_id: Option<i64>,
    #[serde(rename = "categoriaNome")]
    pub categoria_nome: Option<String>,
    #[serde(skip)]
    pub arquivada: bool,
    #[serde(skip)]
    pub owner: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Category {
    pub id: i64,
    pub nome: String,
    #[serde(skip)]
    pub owner: i64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
    #[serde(rename = "confirmaSenha")]
    pub confirma_senha: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "senhaAtual")]
    pub senha_atual: String,
    #[serde(rename = "novaSenha")]
    pub nova_senha: String,
    #[serde(rename = "confirmaSenha")]
    pub confirma_senha: String,
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub titulo: String,
    pub descricao: Option<String>,
    #[serde(rename = "statusId")]
    pub status_id: i64,
    #[serde(rename = "prioridadeId")]
    pub prioridade_id: i64,
    pub prazo: Option<String>,
    #[serde(rename = "categoriaId")]
    pub categoria_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    #[serde(rename = "statusId")]
    pub status_id: Option<i64>,
    #[serde(rename = "prioridadeId")]
    pub prioridade_id: Option<i64>,
    pub prazo: Option<String>,
    #[serde(rename = "categoriaId")]
    pub categoria_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct BulkRequest {
    #[serde(rename = "tarefasId")]
    pub tarefas_id: Vec<i64>,
}

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub nome: String,
}

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    10
}

#[derive(Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
    #[serde(rename = "statusId")]
    pub status_id: Option<i64>,
    #[serde(rename = "prioridadeId")]
    pub prioridade_id: Option<i64>,
    #[serde(rename = "categoriaId")]
    pub categoria_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(rename = "palavraChave")]
    pub palavra_chave: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

#[derive(Serialize)]
pub struct Page {
    pub items: Vec<Task>,
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    #[serde(rename = "totalItems")]
    pub total_items: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

#[derive(Serialize)]
pub struct Stats {
    pub total: u64,
    pub concluidas: u64,
    #[serde(rename = "emAndamento")]
    pub em_andamento: u64,
    #[serde(rename = "comPrazo")]
    pub com_prazo: u64,
}

#[derive(Default)]
pub struct AppState {
    users: Vec<User>,
    tokens: HashMap<String, i64>,
    tasks: HashMap<i64, Task>,
    categories: HashMap<i64, Category>,
    next_id: i64,
}

impl AppState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<AppState>>;

/// The authenticated user's id, resolved from the bearer token. Protected
/// handlers reject missing or unknown tokens with 401.
pub struct AuthUser(pub i64);

impl FromRequestParts<Db> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &Db) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(StatusCode::UNAUTHORIZED)?;
        let state = state.read().await;
        state
            .tokens
            .get(&token)
            .copied()
            .map(AuthUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(AppState::default()));
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/usuario", post(register))
        .route(
            "/usuario/me",
            get(profile).put(update_profile).delete(deactivate),
        )
        .route("/usuario/me/alterar-senha", put(change_password))
        .route("/tarefas", post(create_task))
        .route("/tarefas/paginado", get(list_tasks))
        .route("/tarefas/arquivadas", get(archived_tasks))
        .route("/tarefas/filtrar", get(filter_tasks))
        .route("/tarefas/filtrar/palavra", get(search_tasks))
        .route("/tarefas/estatisticas", get(stats))
        .route("/tarefas/{id}", get(get_task).put(update_task))
        .route("/tarefas/concluir/{id}", patch(complete_task))
        .route("/tarefas/concluir", patch(complete_many))
        .route("/tarefas/reabrir/{id}", patch(reopen_task))
        .route("/tarefas/reabrir", patch(reopen_many))
        .route("/tarefas/arquivar/{id}", delete(archive_task))
        .route("/tarefas/arquivar", patch(archive_many))
        .route("/tarefas/restaurar/{id}", patch(restore_task))
        .route("/tarefas/restaurar", patch(restore_many))
        .route("/tarefas/deletar/{id}", delete(delete_task))
        .route("/tarefas/deletar/multiplas", delete(delete_many))
        .route("/categorias", get(list_categories).post(create_category))
        .route("/categorias/{id}", put(update_category).delete(delete_category))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- auth ---

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    let mut state = db.write().await;
    let user_id = state
        .users
        .iter()
        .find(|u| u.email == input.email && u.senha == input.senha && u.ativo)
        .map(|u| u.id)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), user_id);
    Ok(Json(LoginResponse { token }))
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        db.write().await.tokens.remove(&token);
    }
    StatusCode::NO_CONTENT
}

// --- user ---

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    if input.nome.trim().is_empty()
        || input.email.trim().is_empty()
        || input.senha.is_empty()
        || input.senha != input.confirma_senha
    {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut state = db.write().await;
    if state.users.iter().any(|u| u.email == input.email) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = state.next_id();
    let user = User {
        id,
        nome: input.nome,
        email: input.email,
        senha: input.senha,
        data_criacao: CREATED_AT.to_string(),
        ativo: true,
        roles: vec!["USER".to_string()],
    };
    state.users.push(user.clone());
    Ok((StatusCode::CREATED, Json(user)))
}

async fn profile(State(db): State<Db>, AuthUser(user_id): AuthUser) -> Result<Json<User>, StatusCode> {
    let state = db.read().await;
    state
        .users
        .iter()
        .find(|u| u.id == user_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_profile(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<UpdateUserRequest>,
) -> Result<Json<User>, StatusCode> {
    let mut state = db.write().await;
    let user = state
        .users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(nome) = input.nome {
        user.nome = nome;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    Ok(Json(user.clone()))
}

async fn change_password(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> Result<StatusCode, StatusCode> {
    if input.nova_senha.is_empty() || input.nova_senha != input.confirma_senha {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut state = db.write().await;
    let user = state
        .users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if user.senha != input.senha_atual {
        return Err(StatusCode::BAD_REQUEST);
    }
    user.senha = input.nova_senha;
    Ok(StatusCode::NO_CONTENT)
}

async fn deactivate(State(db): State<Db>, AuthUser(user_id): AuthUser) -> StatusCode {
    let mut state = db.write().await;
    if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
        user.ativo = false;
    }
    state.tokens.retain(|_, id| *id != user_id);
    StatusCode::NO_CONTENT
}

// --- tasks ---

fn status_texto(status_id: i64) -> String {
    match status_id {
        STATUS_PENDING => "Pendente",
        STATUS_IN_PROGRESS => "Em andamento",
        STATUS_COMPLETED => "Concluída",
        _ => "Desconhecido",
    }
    .to_string()
}

fn paginate(mut tasks: Vec<Task>, page: u32, size: u32) -> Page {
    tasks.sort_by_key(|t| t.id);
    let size = size.max(1);
    let total_items = tasks.len() as u64;
    let total_pages = total_items.div_ceil(u64::from(size)) as u32;
    let items = tasks
        .into_iter()
        .skip(page as usize * size as usize)
        .take(size as usize)
        .collect();
    Page {
        items,
        current_page: page,
        total_items,
        total_pages,
    }
}

async fn create_task(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), StatusCode> {
    if input.titulo.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut state = db.write().await;
    let categoria_nome = input
        .categoria_id
        .and_then(|id| state.categories.get(&id).map(|c| c.nome.clone()));
    let id = state.next_id();
    let task = Task {
        id,
        titulo: input.titulo,
        descricao: input.descricao,
        status_id: input.status_id,
        status_texto: status_texto(input.status_id),
        prioridade_id: input.prioridade_id,
        prazo: input.prazo,
        data_conclusao: None,
        categoria_id: input.categoria_id,
        categoria_nome,
        arquivada: false,
        owner: user_id,
    };
    state.tasks.insert(id, task.clone());
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Task>, StatusCode> {
    let state = db.read().await;
    state
        .tasks
        .get(&id)
        .filter(|t| t.owner == user_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_task(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, StatusCode> {
    let mut state = db.write().await;
    let categoria_nome = input
        .categoria_id
        .and_then(|cid| state.categories.get(&cid).map(|c| c.nome.clone()));
    let task = state
        .tasks
        .get_mut(&id)
        .filter(|t| t.owner == user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(titulo) = input.titulo {
        task.titulo = titulo;
    }
    if let Some(descricao) = input.descricao {
        task.descricao = Some(descricao);
    }
    if let Some(status_id) = input.status_id {
        task.status_id = status_id;
        task.status_texto = status_texto(status_id);
    }
    if let Some(prioridade_id) = input.prioridade_id {
        task.prioridade_id = prioridade_id;
    }
    if let Some(prazo) = input.prazo {
        task.prazo = Some(prazo);
    }
    if let Some(categoria_id) = input.categoria_id {
        task.categoria_id = Some(categoria_id);
        task.categoria_nome = categoria_nome;
    }
    Ok(Json(task.clone()))
}

async fn list_tasks(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<PageParams>,
) -> Json<Page> {
    let state = db.read().await;
    let tasks: Vec<Task> = state
        .tasks
        .values()
        .filter(|t| t.owner == user_id && !t.arquivada)
        .cloned()
        .collect();
    Json(paginate(tasks, params.page, params.size))
}

async fn archived_tasks(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<PageParams>,
) -> Json<Page> {
    let state = db.read().await;
    let tasks: Vec<Task> = state
        .tasks
        .values()
        .filter(|t| t.owner == user_id && t.arquivada)
        .cloned()
        .collect();
    Json(paginate(tasks, params.page, params.size))
}

async fn filter_tasks(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<FilterParams>,
) -> Json<Page> {
    let state = db.read().await;
    let tasks: Vec<Task> = state
        .tasks
        .values()
        .filter(|t| t.owner == user_id && !t.arquivada)
        .filter(|t| params.status_id.is_none_or(|s| t.status_id == s))
        .filter(|t| params.prioridade_id.is_none_or(|p| t.prioridade_id == p))
        .filter(|t| params.categoria_id.is_none_or(|c| t.categoria_id == Some(c)))
        .cloned()
        .collect();
    Json(paginate(tasks, params.page, params.size))
}

async fn search_tasks(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<SearchParams>,
) -> Json<Page> {
    let needle = params.palavra_chave.to_lowercase();
    let state = db.read().await;
    let tasks: Vec<Task> = state
        .tasks
        .values()
        .filter(|t| t.owner == user_id && !t.arquivada)
        .filter(|t| {
            t.titulo.to_lowercase().contains(&needle)
                || t.descricao
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(paginate(tasks, params.page, params.size))
}

async fn stats(State(db): State<Db>, AuthUser(user_id): AuthUser) -> Json<Stats> {
    let state = db.read().await;
    let active: Vec<&Task> = state
        .tasks
        .values()
        .filter(|t| t.owner == user_id && !t.arquivada)
        .collect();
    Json(Stats {
        total: active.len() as u64,
        concluidas: active.iter().filter(|t| t.status_id == STATUS_COMPLETED).count() as u64,
        em_andamento: active
            .iter()
            .filter(|t| t.status_id == STATUS_IN_PROGRESS)
            .count() as u64,
        com_prazo: active.iter().filter(|t| t.prazo.is_some()).count() as u64,
    })
}

fn transition(task: &mut Task, status_id: i64) {
    task.status_id = status_id;
    task.status_texto = status_texto(status_id);
    task.data_conclusao = if status_id == STATUS_COMPLETED {
        Some(COMPLETED_AT.to_string())
    } else {
        None
    };
}

async fn complete_task(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Task>, StatusCode> {
    let mut state = db.write().await;
    let task = state
        .tasks
        .get_mut(&id)
        .filter(|t| t.owner == user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    transition(task, STATUS_COMPLETED);
    Ok(Json(task.clone()))
}

async fn reopen_task(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Task>, StatusCode> {
    let mut state = db.write().await;
    let task = state
        .tasks
        .get_mut(&id)
        .filter(|t| t.owner == user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    transition(task, STATUS_PENDING);
    Ok(Json(task.clone()))
}

async fn archive_task(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    let task = state
        .tasks
        .get_mut(&id)
        .filter(|t| t.owner == user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    task.arquivada = true;
    Ok(StatusCode::NO_CONTENT)
}

async fn restore_task(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Task>, StatusCode> {
    let mut state = db.write().await;
    let task = state
        .tasks
        .get_mut(&id)
        .filter(|t| t.owner == user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    task.arquivada = false;
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    if !state.tasks.get(&id).is_some_and(|t| t.owner == user_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    state.tasks.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_many(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<BulkRequest>,
) -> StatusCode {
    let mut state = db.write().await;
    for id in input.tarefas_id {
        if let Some(task) = state.tasks.get_mut(&id).filter(|t| t.owner == user_id) {
            transition(task, STATUS_COMPLETED);
        }
    }
    StatusCode::NO_CONTENT
}

async fn reopen_many(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<BulkRequest>,
) -> StatusCode {
    let mut state = db.write().await;
    for id in input.tarefas_id {
        if let Some(task) = state.tasks.get_mut(&id).filter(|t| t.owner == user_id) {
            transition(task, STATUS_PENDING);
        }
    }
    StatusCode::NO_CONTENT
}

async fn archive_many(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<BulkRequest>,
) -> StatusCode {
    let mut state = db.write().await;
    for id in input.tarefas_id {
        if let Some(task) = state.tasks.get_mut(&id).filter(|t| t.owner == user_id) {
            task.arquivada = true;
        }
    }
    StatusCode::NO_CONTENT
}

async fn restore_many(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<BulkRequest>,
) -> StatusCode {
    let mut state = db.write().await;
    for id in input.tarefas_id {
        if let Some(task) = state.tasks.get_mut(&id).filter(|t| t.owner == user_id) {
            task.arquivada = false;
        }
    }
    StatusCode::NO_CONTENT
}

async fn delete_many(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<BulkRequest>,
) -> StatusCode {
    let mut state = db.write().await;
    for id in input.tarefas_id {
        if state.tasks.get(&id).is_some_and(|t| t.owner == user_id) {
            state.tasks.remove(&id);
        }
    }
    StatusCode::NO_CONTENT
}

// --- categories ---

async fn list_categories(State(db): State<Db>, AuthUser(user_id): AuthUser) -> Json<Vec<Category>> {
    let state = db.read().await;
    let mut categories: Vec<Category> = state
        .categories
        .values()
        .filter(|c| c.owner == user_id)
        .cloned()
        .collect();
    categories.sort_by_key(|c| c.id);
    Json(categories)
}

async fn create_category(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), StatusCode> {
    if input.nome.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut state = db.write().await;
    let id = state.next_id();
    let category = Category {
        id,
        nome: input.nome,
        owner: user_id,
    };
    state.categories.insert(id, category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<CategoryRequest>,
) -> Result<Json<Category>, StatusCode> {
    let mut state = db.write().await;
    let category = state
        .categories
        .get_mut(&id)
        .filter(|c| c.owner == user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    category.nome = input.nome.clone();
    let updated = category.clone();
    for task in state.tasks.values_mut() {
        if task.categoria_id == Some(id) {
            task.categoria_nome = Some(input.nome.clone());
        }
    }
    Ok(Json(updated))
}

async fn delete_category(
    State(db): State<Db>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    if !state
        .categories
        .get(&id)
        .is_some_and(|c| c.owner == user_id)
    {
        return Err(StatusCode::NOT_FOUND);
    }
    state.categories.remove(&id);
    for task in state.tasks.values_mut() {
        if task.categoria_id == Some(id) {
            task.categoria_id = None;
            task.categoria_nome = None;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
