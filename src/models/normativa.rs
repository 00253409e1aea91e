//! Normativa (compliance document) model

use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, NaiveDate, Utc};

use super::{civil_date, CreatedBy};
use crate::constants::NORMATIVAS_CATEGORIES;
use crate::logic::dates::{days_until, Clock};
use crate::logic::matrix::Categorized;
use crate::logic::status::{ExpirationStatus, StatusInfo};
use crate::logic::validation::normativa_category;

/// Fixed normativa categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormativaCategory {
    OrganizacionContexto,
    Liderazgo,
    Planificacion,
    Soporte,
    Operacion,
    EvaluacionDesempeno,
    Mejora,
}

impl NormativaCategory {
    pub const ALL: [NormativaCategory; 7] = [
        Self::OrganizacionContexto,
        Self::Liderazgo,
        Self::Planificacion,
        Self::Soporte,
        Self::Operacion,
        Self::EvaluacionDesempeno,
        Self::Mejora,
    ];

    pub fn label(&self) -> &'static str {
        NORMATIVAS_CATEGORIES[self.index()]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::OrganizacionContexto => 0,
            Self::Liderazgo => 1,
            Self::Planificacion => 2,
            Self::Soporte => 3,
            Self::Operacion => 4,
            Self::EvaluacionDesempeno => 5,
            Self::Mejora => 6,
        }
    }

    /// Exact match against the backend labels
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn labels() -> &'static [&'static str] {
        &NORMATIVAS_CATEGORIES
    }
}

impl std::fmt::Display for NormativaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normativa {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Raw label; may fall outside the enumeration
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ubicacion")]
    pub location: String,
    #[serde(rename = "fechaVencimiento", with = "civil_date")]
    pub expires_at: NaiveDate,
    #[serde(rename = "createdBy")]
    pub created_by: CreatedBy,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Normativa {
    pub fn category_kind(&self) -> Option<NormativaCategory> {
        NormativaCategory::from_label(&self.category)
    }

    pub fn days_remaining(&self, clock: &dyn Clock) -> i64 {
        days_until(self.expires_at, clock.now())
    }

    /// Expiration status relative to the clock's "now"
    pub fn status_at(&self, clock: &dyn Clock) -> StatusInfo {
        let days_remaining = self.days_remaining(clock);
        StatusInfo {
            status: ExpirationStatus::classify(days_remaining),
            days_remaining,
        }
    }
}

impl Categorized for Normativa {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> [&str; 2] {
        [&self.name, &self.description]
    }
}

/// Body of `POST /normativas`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNormativa {
    #[serde(rename = "nombre")]
    #[validate(length(min = 3, max = 200, message = "El nombre debe tener entre 3 y 200 caracteres"))]
    pub name: String,
    #[serde(rename = "categoria")]
    #[validate(custom(function = "normativa_category"))]
    pub category: String,
    #[serde(rename = "descripcion")]
    #[validate(length(min = 10, max = 1000, message = "La descripción debe tener entre 10 y 1000 caracteres"))]
    pub description: String,
    #[serde(rename = "ubicacion")]
    #[validate(length(min = 1, max = 500, message = "La ubicación es requerida (máximo 500 caracteres)"))]
    pub location: String,
    /// Checked against "today" separately, see `validation::validate_create_normativa`
    #[serde(rename = "fechaVencimiento")]
    pub expires_at: Option<NaiveDate>,
}

/// Body of `PUT /normativas/:id`; only present fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateNormativa {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 200, message = "El nombre debe tener entre 3 y 200 caracteres"))]
    pub name: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "normativa_category"))]
    pub category: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, max = 1000, message = "La descripción debe tener entre 10 y 1000 caracteres"))]
    pub description: Option<String>,
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 500, message = "La ubicación es requerida (máximo 500 caracteres)"))]
    pub location: Option<String>,
    #[serde(rename = "fechaVencimiento", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
}

/// Query filters for the list endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormativaFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "fechaVencimientoDesde", skip_serializing_if = "Option::is_none")]
    pub expires_from: Option<NaiveDate>,
    #[serde(rename = "fechaVencimientoHasta", skip_serializing_if = "Option::is_none")]
    pub expires_to: Option<NaiveDate>,
    #[serde(rename = "vencidas", skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    #[serde(rename = "proximasAVencer", skip_serializing_if = "Option::is_none")]
    pub expiring_within: Option<u32>,
    #[serde(rename = "createdBy", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

// ============================================================================
// SERVER PAYLOADS
// ============================================================================

/// `{ normativa }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormativaPayload {
    pub normativa: Normativa,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "cantidad")]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringCounts {
    #[serde(rename = "en7Dias")]
    pub within_7_days: u64,
    #[serde(rename = "en15Dias")]
    pub within_15_days: u64,
    #[serde(rename = "en30Dias")]
    pub within_30_days: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormativaStats {
    pub total: u64,
    #[serde(rename = "porCategoria")]
    pub by_category: Vec<CategoryCount>,
    #[serde(rename = "vencidas")]
    pub expired: u64,
    #[serde(rename = "proximasAVencer")]
    pub expiring: ExpiringCounts,
    #[serde(rename = "creadasEsteAno")]
    pub created_this_year: u64,
    #[serde(rename = "actualizadasEsteAno")]
    pub updated_this_year: u64,
}

/// `{ stats }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormativaStatsPayload {
    pub stats: NormativaStats,
}

/// `GET /normativas/:id/expiration-check`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationCheck {
    #[serde(rename = "isExpired")]
    pub is_expired: bool,
    #[serde(rename = "daysUntilExpiration")]
    pub days_until_expiration: i64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormativaBucket {
    pub count: u64,
    pub normativas: Vec<Normativa>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringBuckets {
    #[serde(rename = "en7Dias")]
    pub within_7_days: NormativaBucket,
    #[serde(rename = "en15Dias")]
    pub within_15_days: NormativaBucket,
    #[serde(rename = "en30Dias")]
    pub within_30_days: NormativaBucket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criticality {
    #[serde(rename = "alta")]
    pub high: u64,
    #[serde(rename = "media")]
    pub medium: u64,
    #[serde(rename = "baja")]
    pub low: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationSummaryBlock {
    #[serde(rename = "totalVencidas")]
    pub total_expired: u64,
    #[serde(rename = "totalProximasAVencer")]
    pub total_expiring: u64,
    #[serde(rename = "criticidad")]
    pub criticality: Criticality,
}

/// Server-side expiration report (`ReporteVencimientos`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationReport {
    #[serde(rename = "vencidas")]
    pub expired: NormativaBucket,
    #[serde(rename = "proximasAVencer")]
    pub expiring: ExpiringBuckets,
    #[serde(rename = "resumen")]
    pub summary: ExpirationSummaryBlock,
}

/// `{ report }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationReportPayload {
    pub report: ExpirationReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormativasGroup {
    #[serde(rename = "categoria")]
    pub category: String,
    pub normativas: Vec<Normativa>,
    pub count: u64,
}

/// `GET /normativas/grouped-by-category`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormativasGrouped {
    pub groups: Vec<NormativasGroup>,
    #[serde(rename = "totalCategories")]
    pub total_categories: u64,
}

/// `GET /normativas/admin/export`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormativasExport {
    pub normativas: Vec<Normativa>,
    pub total: u64,
    #[serde(rename = "fechaExportacion")]
    pub exported_at: DateTime<Utc>,
}

/// `GET /normativas/dashboard`; the backend does not pin its inner shape,
/// only that it is a JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormativasDashboardPayload {
    pub dashboard: serde_json::Map<String, serde_json::Value>,
}
