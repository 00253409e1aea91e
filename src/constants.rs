//! Central Configuration Constants
//!
//! Single source of truth for defaults shared by the client, the forms
//! and the matrix views. Category lists must match the backend exactly.

/// Default backend URL
///
/// Fallback when `API_BASE_URL` is not set.
/// For development: http://localhost:3000
pub const DEFAULT_API_URL: &str = "https://leteragoback.onrender.com";

/// Default request timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Session file name inside the local data directory
pub const SESSION_FILE_NAME: &str = "session.json";

/// Directory (under the platform data dir) holding client state
pub const APP_DATA_DIR: &str = "leterago-normativas";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Leterago - Normativas SOA";

// ============================================
// Session storage keys
// ============================================

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "auth_token";

/// Key holding the serialized user
pub const USER_KEY: &str = "user_data";

// ============================================
// Categories (ordered, order is the display order)
// ============================================

pub const NORMATIVAS_CATEGORIES: [&str; 7] = [
    "Organización y Contexto",
    "Liderazgo",
    "Planificación",
    "Soporte",
    "Operación",
    "Evaluación del Desempeño",
    "Mejora",
];

pub const ANEXOS_SOA_CATEGORIES: [&str; 4] = [
    "Controles Organizacionales",
    "Controles de Personas",
    "Controles Físicos",
    "Controles Tecnológicos",
];

// ============================================
// Expiration thresholds (days)
// ============================================

/// Up to this many days left a document is critical
pub const CRITICAL_DAYS: i64 = 7;

/// Up to this many days left a document is upcoming
pub const UPCOMING_DAYS: i64 = 30;

// ============================================
// Compliance progress thresholds (percent)
// ============================================

pub const PROGRESS_EXCELLENT: u32 = 90;
pub const PROGRESS_GOOD: u32 = 70;
pub const PROGRESS_WARNING: u32 = 50;

// ============================================
// User-facing messages
// ============================================

pub const MSG_GENERIC: &str = "Ha ocurrido un error inesperado";
pub const MSG_NETWORK: &str = "Error de conexión. Verifica tu conexión a internet.";
pub const MSG_UNAUTHORIZED: &str = "No tienes permisos para realizar esta acción";
pub const MSG_SESSION_EXPIRED: &str = "Tu sesión ha expirado. Inicia sesión nuevamente.";
pub const MSG_NOT_FOUND: &str = "El elemento solicitado no fue encontrado";
pub const MSG_VALIDATION: &str = "Por favor verifica los datos ingresados";
pub const MSG_SERVER: &str = "Error del servidor";
pub const MSG_MALFORMED: &str = "Respuesta inesperada del servidor";

/// Get backend URL from environment or use default
pub fn get_api_url() -> String {
    std::env::var("API_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get request timeout from environment or use default
pub fn get_timeout_ms() -> u64 {
    std::env::var("API_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS)
}
