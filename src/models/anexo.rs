//! Anexo SOA (security control) model

use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};

use super::CreatedBy;
use crate::constants::ANEXOS_SOA_CATEGORIES;
use crate::logic::matrix::Categorized;
use crate::logic::progress::ComplianceProgress;
use crate::logic::validation::anexo_category;

/// Fixed SOA control categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnexoCategory {
    Organizacionales,
    Personas,
    Fisicos,
    Tecnologicos,
}

impl AnexoCategory {
    pub const ALL: [AnexoCategory; 4] = [
        Self::Organizacionales,
        Self::Personas,
        Self::Fisicos,
        Self::Tecnologicos,
    ];

    pub fn label(&self) -> &'static str {
        ANEXOS_SOA_CATEGORIES[self.index()]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Organizacionales => 0,
            Self::Personas => 1,
            Self::Fisicos => 2,
            Self::Tecnologicos => 3,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn labels() -> &'static [&'static str] {
        &ANEXOS_SOA_CATEGORIES
    }
}

impl std::fmt::Display for AnexoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anexo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombreControl")]
    pub control_name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ubicacion")]
    pub location: String,
    #[serde(rename = "observaciones", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "createdBy")]
    pub created_by: CreatedBy,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Anexo {
    pub fn category_kind(&self) -> Option<AnexoCategory> {
        AnexoCategory::from_label(&self.category)
    }
}

impl Categorized for Anexo {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> [&str; 2] {
        [&self.control_name, &self.description]
    }
}

/// Body of `POST /anexos`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAnexo {
    #[serde(rename = "nombreControl")]
    #[validate(length(min = 3, max = 200, message = "El nombre del control debe tener entre 3 y 200 caracteres"))]
    pub control_name: String,
    #[serde(rename = "categoria")]
    #[validate(custom(function = "anexo_category"))]
    pub category: String,
    #[serde(rename = "descripcion")]
    #[validate(length(min = 10, max = 2000, message = "La descripción debe tener entre 10 y 2000 caracteres"))]
    pub description: String,
    #[serde(rename = "ubicacion")]
    #[validate(length(min = 1, max = 500, message = "La ubicación es requerida (máximo 500 caracteres)"))]
    pub location: String,
    #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Las observaciones no pueden tener más de 1000 caracteres"))]
    pub notes: Option<String>,
}

/// Body of `PUT /anexos/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAnexo {
    #[serde(rename = "nombreControl", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 200, message = "El nombre del control debe tener entre 3 y 200 caracteres"))]
    pub control_name: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "anexo_category"))]
    pub category: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, max = 2000, message = "La descripción debe tener entre 10 y 2000 caracteres"))]
    pub description: Option<String>,
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 500, message = "La ubicación es requerida (máximo 500 caracteres)"))]
    pub location: Option<String>,
    #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Las observaciones no pueden tener más de 1000 caracteres"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnexoFilters {
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
    #[serde(rename = "dateFrom", skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(rename = "dateTo", skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(rename = "createdBy", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

// ============================================================================
// SERVER PAYLOADS
// ============================================================================

/// `{ anexo }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnexoPayload {
    pub anexo: Anexo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryShare {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "cantidad")]
    pub count: u64,
    #[serde(rename = "porcentaje")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCount {
    #[serde(rename = "usuario")]
    pub user: String,
    #[serde(rename = "cantidad")]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnexoStats {
    pub total: u64,
    #[serde(rename = "porCategoria")]
    pub by_category: Vec<CategoryShare>,
    #[serde(rename = "creadasEsteAno")]
    pub created_this_year: u64,
    #[serde(rename = "actualizadasEsteAno")]
    pub updated_this_year: u64,
    #[serde(rename = "controlesPorUsuario")]
    pub by_user: Vec<UserCount>,
}

/// `{ stats }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnexoStatsPayload {
    pub stats: AnexoStats,
}

/// One row of the server-built control matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMatrixRow {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "controles")]
    pub controls: Vec<Anexo>,
    #[serde(rename = "totalControles")]
    pub total_controls: u64,
}

/// `GET /anexos/matrix`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMatrixPayload {
    pub matrix: Vec<ControlMatrixRow>,
    #[serde(rename = "totalControles")]
    pub total_controls: u64,
    #[serde(rename = "totalCategorias")]
    pub total_categories: u64,
    #[serde(rename = "fechaConsulta", default, skip_serializing_if = "Option::is_none")]
    pub queried_at: Option<DateTime<Utc>>,
}

impl ControlMatrixPayload {
    /// Flatten back to a record list (row order, then row-internal order)
    pub fn into_records(self) -> Vec<Anexo> {
        self.matrix.into_iter().flat_map(|row| row.controls).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceCoverage {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "controlesExistentes")]
    pub existing: u64,
    #[serde(rename = "controlesRecomendados")]
    pub recommended: u64,
    #[serde(rename = "cobertura")]
    pub coverage: f64,
    #[serde(rename = "controlesFaltantes", default)]
    pub missing: Vec<String>,
}

impl ComplianceCoverage {
    /// Client-side progress level for this category
    pub fn progress(&self) -> ComplianceProgress {
        ComplianceProgress::compute(self.existing, self.recommended)
    }
}

/// `{ coverage }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveragePayload {
    pub coverage: Vec<ComplianceCoverage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    #[serde(rename = "puntuacionGeneral")]
    pub overall_score: f64,
    #[serde(rename = "controlesImplementados")]
    pub implemented: u64,
    #[serde(rename = "controlesRecomendados")]
    pub recommended: u64,
    #[serde(rename = "brechasCriticas")]
    pub critical_gaps: u64,
}

impl ExecutiveSummary {
    pub fn progress(&self) -> ComplianceProgress {
        ComplianceProgress::compute(self.implemented, self.recommended)
    }
}

/// `GET /anexos/compliance/report`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoaComplianceReport {
    #[serde(rename = "resumenEjecutivo")]
    pub summary: ExecutiveSummary,
    #[serde(rename = "detallesPorCategoria")]
    pub by_category: Vec<ComplianceCoverage>,
    #[serde(rename = "estadisticas")]
    pub stats: AnexoStats,
    #[serde(rename = "matrizControles")]
    pub matrix: Vec<ControlMatrixRow>,
    #[serde(rename = "recomendaciones")]
    pub recommendations: Vec<String>,
    #[serde(rename = "fechaReporte")]
    pub reported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReportPayload {
    pub report: SoaComplianceReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(rename = "totalControles")]
    pub total_controls: u64,
    #[serde(rename = "totalPosibles")]
    pub total_possible: u64,
    #[serde(rename = "cumplimientoPromedio")]
    pub average_compliance: f64,
    #[serde(rename = "brechasIdentificadas")]
    pub gaps: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(rename = "porCategoria")]
    pub by_category: Vec<CategoryShare>,
    #[serde(rename = "porUsuario")]
    pub by_user: Vec<UserCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageCell {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "cobertura")]
    pub coverage: f64,
    #[serde(rename = "controlesExistentes")]
    pub existing: u64,
    #[serde(rename = "controlesRecomendados")]
    pub recommended: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowCoverage {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "cobertura")]
    pub coverage: f64,
    #[serde(rename = "controlesFaltantes")]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyCategory {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "controlesExistentes")]
    pub existing: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardAlerts {
    #[serde(rename = "categoriasBajaCobertura")]
    pub low_coverage: Vec<LowCoverage>,
    #[serde(rename = "categoriasSinControles")]
    pub without_controls: Vec<EmptyCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trends {
    #[serde(rename = "creadasEsteAno")]
    pub created_this_year: u64,
    #[serde(rename = "actualizadasEsteAno")]
    pub updated_this_year: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnexosDashboard {
    #[serde(rename = "resumen")]
    pub summary: DashboardSummary,
    #[serde(rename = "distribucion")]
    pub distribution: Distribution,
    #[serde(rename = "cobertura")]
    pub coverage: Vec<CoverageCell>,
    #[serde(rename = "alertas")]
    pub alerts: DashboardAlerts,
    #[serde(rename = "tendencias")]
    pub trends: Trends,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnexosDashboardPayload {
    pub dashboard: AnexosDashboard,
}

/// `POST /anexos/validate-control`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlValidation {
    pub valid: bool,
    pub exists: bool,
    #[serde(rename = "nombreControl")]
    pub control_name: String,
    #[serde(rename = "categoria")]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnexosGroup {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "controles")]
    pub controls: Vec<Anexo>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnexosGrouped {
    pub groups: Vec<AnexosGroup>,
    #[serde(rename = "totalCategories")]
    pub total_categories: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnexosExport {
    pub anexos: Vec<Anexo>,
    pub total: u64,
    #[serde(rename = "fechaExportacion")]
    pub exported_at: DateTime<Utc>,
}

/// `POST /anexos/advanced-search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedSearchResult {
    pub anexos: Vec<Anexo>,
    pub total: u64,
    /// Criteria as the server understood them
    #[serde(rename = "searchParams", default)]
    pub search_params: serde_json::Value,
}

/// Outcome of a bulk import; rows fail independently
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub total: u64,
    #[serde(rename = "exitosos")]
    pub succeeded: u64,
    #[serde(rename = "fallidos")]
    pub failed: u64,
    #[serde(rename = "errores", default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(rename = "anexosCreados", default)]
    pub created: Vec<Anexo>,
}

/// `{ result }` of `POST /anexos/admin/import`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPayload {
    pub result: ImportResult,
}

/// `{ integrity }` of `GET /anexos/admin/verify-integrity`; free-form report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityPayload {
    pub integrity: serde_json::Value,
}
