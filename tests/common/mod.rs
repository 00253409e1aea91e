//! In-process mock of the Leterago backend
//!
//! Speaks the `{ success, message, data }` envelope over real HTTP on an
//! ephemeral port so the client is exercised end to end.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use uuid::Uuid;

use leterago_dashboard::{ApiClient, AuthContext, ClientConfig};

pub const EMAIL: &str = "ana@leterago.com";
pub const PASSWORD: &str = "secreto";

#[derive(Default)]
pub struct MockState {
    requests: AtomicUsize,
    tokens: Mutex<HashSet<String>>,
    normativas: Mutex<Vec<Value>>,
    anexos: Mutex<Vec<Value>>,
}

impl MockState {
    fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn issue_token(&self) -> String {
        let token = format!("tok-{}", Uuid::new_v4());
        self.tokens.lock().insert(token.clone());
        token
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map_or(false, |token| self.tokens.lock().contains(token))
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve mock") });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self, auth: AuthContext) -> ApiClient {
        ApiClient::new(&ClientConfig::new(self.base_url()), auth).expect("client")
    }

    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Invalidate every issued token (server-side expiry)
    pub fn revoke_all(&self) {
        self.state.tokens.lock().clear();
    }

    pub fn seed_normativa(&self, name: &str, category: &str, expires_at: &str) -> String {
        let record = normativa_record(&json!({
            "nombre": name,
            "categoria": category,
            "descripcion": "Registro sembrado para pruebas",
            "ubicacion": "SharePoint",
            "fechaVencimiento": expires_at,
        }));
        let id = record["_id"].as_str().unwrap_or_default().to_string();
        self.state.normativas.lock().push(record);
        id
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/validate-token", post(validate_token))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/normativas", get(list_normativas).post(create_normativa))
        .route("/normativas/health", get(health))
        .route(
            "/normativas/:id",
            get(get_normativa).put(update_normativa).delete(delete_normativa),
        )
        .route("/anexos", get(list_anexos).post(create_anexo))
        .route("/anexos/health", get(health))
        .route("/anexos/advanced-search", post(advanced_search))
        .route("/anexos/admin/import", post(import_anexos))
        .route("/anexos/admin/verify-integrity", get(verify_integrity))
        .route("/broken", get(broken))
        .route("/no-message", get(no_message))
        .with_state(state)
}

// ============================================================================
// RESPONSES
// ============================================================================

fn ok(message: &str, data: Value) -> Response {
    Json(json!({ "success": true, "message": message, "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn user() -> Value {
    json!({
        "_id": "u-1",
        "username": "ana",
        "email": EMAIL,
        "role": "admin",
    })
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn normativa_record(body: &Value) -> Value {
    json!({
        "_id": Uuid::new_v4().to_string(),
        "nombre": body["nombre"],
        "categoria": body["categoria"],
        "descripcion": body["descripcion"],
        "ubicacion": body["ubicacion"],
        "fechaVencimiento": body["fechaVencimiento"],
        "createdBy": { "_id": "u-1", "username": "ana", "email": EMAIL },
        "createdAt": now(),
        "updatedAt": now(),
    })
}

// ============================================================================
// HANDLERS
// ============================================================================

async fn health(State(state): State<Arc<MockState>>) -> Response {
    state.hit();
    Json(json!({ "success": true, "message": "OK" })).into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.hit();
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        let token = state.issue_token();
        ok("Login exitoso", json!({ "token": token, "user": user() }))
    } else {
        fail(StatusCode::UNAUTHORIZED, "Credenciales inválidas")
    }
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.tokens.lock().remove(token);
    }
    ok("Logout exitoso", Value::Null)
}

async fn validate_token(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Token inválido");
    }
    ok("Token válido", json!({ "user": user() }))
}

async fn refresh_token(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Token inválido");
    }
    ok("Token renovado", json!({ "token": state.issue_token() }))
}

async fn list_normativas(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let records = state.normativas.lock().clone();
    let total = records.len();
    Json(json!({
        "success": true,
        "message": "Normativas obtenidas",
        "data": records,
        "pagination": { "page": 1, "limit": 10, "total": total, "pages": 1 },
    }))
    .into_response()
}

async fn create_normativa(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let mut records = state.normativas.lock();
    let name = body["nombre"].as_str().unwrap_or_default().to_lowercase();
    let duplicate = records.iter().any(|n| {
        n["categoria"] == body["categoria"]
            && n["nombre"].as_str().map_or(false, |s| s.to_lowercase() == name)
    });
    if duplicate {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "success": false,
                "message": "Ya existe una normativa con ese nombre en la categoría",
                "errors": ["nombre duplicado"],
            })),
        )
            .into_response();
    }
    let record = normativa_record(&body);
    records.push(record.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Normativa creada", "data": { "normativa": record } })),
    )
        .into_response()
}

async fn get_normativa(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let found = state
        .normativas
        .lock()
        .iter()
        .find(|n| n["_id"] == id.as_str())
        .cloned();
    match found {
        Some(record) => ok("Normativa obtenida", json!({ "normativa": record })),
        None => fail(StatusCode::NOT_FOUND, "Normativa no encontrada"),
    }
}

async fn update_normativa(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let mut records = state.normativas.lock();
    let Some(record) = records.iter_mut().find(|n| n["_id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Normativa no encontrada");
    };
    if let (Some(target), Some(changes)) = (record.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
        target.insert("updatedAt".to_string(), Value::String(now()));
    }
    ok("Normativa actualizada", json!({ "normativa": record.clone() }))
}

async fn delete_normativa(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let mut records = state.normativas.lock();
    let before = records.len();
    records.retain(|n| n["_id"] != id.as_str());
    if records.len() == before {
        return fail(StatusCode::NOT_FOUND, "Normativa no encontrada");
    }
    ok("Normativa eliminada", Value::Null)
}

async fn list_anexos(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let records = state.anexos.lock().clone();
    ok("Anexos obtenidos", Value::Array(records))
}

async fn create_anexo(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let record = anexo_record(&body);
    state.anexos.lock().push(record.clone());
    ok("Control creado", json!({ "anexo": record }))
}

fn anexo_record(body: &Value) -> Value {
    json!({
        "_id": Uuid::new_v4().to_string(),
        "nombreControl": body["nombreControl"],
        "categoria": body["categoria"],
        "descripcion": body["descripcion"],
        "ubicacion": body["ubicacion"],
        "observaciones": body.get("observaciones").cloned().unwrap_or(Value::Null),
        "createdBy": { "_id": "u-1", "username": "ana", "email": EMAIL },
        "createdAt": now(),
        "updatedAt": now(),
    })
}

async fn advanced_search(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let term = body["search"].as_str().unwrap_or_default().to_lowercase();
    let found: Vec<Value> = state
        .anexos
        .lock()
        .iter()
        .filter(|a| {
            ["nombreControl", "descripcion"].iter().any(|field| {
                a[*field].as_str().map_or(false, |s| s.to_lowercase().contains(&term))
            })
        })
        .filter(|a| body.get("categoria").map_or(true, |c| a["categoria"] == *c))
        .cloned()
        .collect();
    let total = found.len();
    ok(
        "Búsqueda completada",
        json!({ "anexos": found, "total": total, "searchParams": body }),
    )
}

async fn import_anexos(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let rows = body["anexos"].as_array().cloned().unwrap_or_default();
    if rows.is_empty() {
        // 200 with success=false, as the backend answers an empty import
        return Json(json!({
            "success": false,
            "message": "No se proporcionaron anexos para importar",
        }))
        .into_response();
    }
    let created: Vec<Value> = rows.iter().map(anexo_record).collect();
    state.anexos.lock().extend(created.iter().cloned());
    ok(
        "Importación completada",
        json!({
            "result": {
                "total": rows.len(),
                "exitosos": created.len(),
                "fallidos": 0,
                "errores": [],
                "anexosCreados": created,
            }
        }),
    )
}

async fn verify_integrity(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "");
    }
    let total = state.anexos.lock().len();
    ok(
        "Verificación completada",
        json!({ "integrity": { "totalAnexos": total, "problemas": [] } }),
    )
}

async fn broken(State(state): State<Arc<MockState>>) -> Response {
    state.hit();
    (StatusCode::OK, "<html>maintenance</html>").into_response()
}

async fn no_message(State(state): State<Arc<MockState>>) -> Response {
    state.hit();
    Json(json!({ "success": true, "data": [] })).into_response()
}
