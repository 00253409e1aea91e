//! Anexos SOA Service - `/anexos` endpoints

use super::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::logic::validation::{validate_create_anexo, validate_update_anexo, FormErrors};
use crate::models::{
    AdvancedSearchResult, Anexo, AnexoFilters, AnexoPayload, AnexoStats, AnexoStatsPayload,
    AnexosDashboard, AnexosDashboardPayload, AnexosExport, AnexosGrouped, ComplianceCoverage,
    ComplianceReportPayload, ControlMatrixPayload, ControlValidation, CoveragePayload,
    CreateAnexo, ImportPayload, ImportResult, IntegrityPayload, Page, SoaComplianceReport,
    UpdateAnexo,
};

const BASE: &str = "anexos";

#[derive(Debug, Clone)]
pub struct AnexosService {
    client: ApiClient,
}

impl AnexosService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    pub async fn list(&self, filters: &AnexoFilters) -> ApiResult<Page<Anexo>> {
        let response = self.client.get_with(&[BASE], filters).await?;
        Page::from_response(response)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Anexo> {
        let payload: AnexoPayload = self.client.get(&[BASE, id]).await?.into_data()?;
        Ok(payload.anexo)
    }

    pub async fn create(&self, form: &CreateAnexo) -> ApiResult<Anexo> {
        validate_create_anexo(form).map_err(ApiError::InvalidInput)?;

        let payload: AnexoPayload = self.client.post(&[BASE], form).await?.into_data()?;
        tracing::info!("Control created: {} ({})", payload.anexo.control_name, payload.anexo.id);
        Ok(payload.anexo)
    }

    pub async fn update(&self, id: &str, form: &UpdateAnexo) -> ApiResult<Anexo> {
        validate_update_anexo(form).map_err(ApiError::InvalidInput)?;

        let payload: AnexoPayload = self.client.put(&[BASE, id], form).await?.into_data()?;
        tracing::info!("Control updated: {}", id);
        Ok(payload.anexo)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&[BASE, id]).await?;
        tracing::info!("Control deleted: {}", id);
        Ok(())
    }

    pub async fn duplicate(&self, id: &str, overrides: &UpdateAnexo) -> ApiResult<Anexo> {
        validate_update_anexo(overrides).map_err(ApiError::InvalidInput)?;

        let payload: AnexoPayload = self
            .client
            .post(&[BASE, id, "clone"], overrides)
            .await?
            .into_data()?;
        Ok(payload.anexo)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub async fn search(&self, term: &str, filters: &AnexoFilters) -> ApiResult<Page<Anexo>> {
        let filters = AnexoFilters {
            search: Some(term.to_string()),
            ..filters.clone()
        };
        let response = self.client.get_with(&[BASE, "search"], &filters).await?;
        Page::from_response(response)
    }

    pub async fn by_category(&self, category: &str, filters: &AnexoFilters) -> ApiResult<Page<Anexo>> {
        let filters = AnexoFilters {
            category: None,
            ..filters.clone()
        };
        let response = self
            .client
            .get_with(&[BASE, "categoria", category], &filters)
            .await?;
        Page::from_response(response)
    }

    pub async fn mine(&self, filters: &AnexoFilters) -> ApiResult<Page<Anexo>> {
        let response = self
            .client
            .get_with(&[BASE, "user", "my-anexos"], filters)
            .await?;
        Page::from_response(response)
    }

    /// Server-side search over the full filter set
    pub async fn advanced_search(&self, criteria: &AnexoFilters) -> ApiResult<AdvancedSearchResult> {
        self.client
            .post(&[BASE, "advanced-search"], criteria)
            .await?
            .into_data()
    }

    /// Whether a control name is free within a category
    pub async fn validate_control(&self, control_name: &str, category: &str) -> ApiResult<ControlValidation> {
        let body = serde_json::json!({
            "nombreControl": control_name,
            "categoria": category,
        });
        self.client
            .post(&[BASE, "validate-control"], &body)
            .await?
            .into_data()
    }

    // ========================================================================
    // REPORTS
    // ========================================================================

    pub async fn stats(&self) -> ApiResult<AnexoStats> {
        let payload: AnexoStatsPayload = self.client.get(&[BASE, "stats"]).await?.into_data()?;
        Ok(payload.stats)
    }

    /// Server-built control matrix
    pub async fn matrix(&self) -> ApiResult<ControlMatrixPayload> {
        self.client.get(&[BASE, "matrix"]).await?.into_data()
    }

    pub async fn coverage(&self) -> ApiResult<Vec<ComplianceCoverage>> {
        let payload: CoveragePayload = self
            .client
            .get(&[BASE, "compliance", "coverage"])
            .await?
            .into_data()?;
        Ok(payload.coverage)
    }

    pub async fn compliance_report(&self) -> ApiResult<SoaComplianceReport> {
        let payload: ComplianceReportPayload = self
            .client
            .get(&[BASE, "compliance", "report"])
            .await?
            .into_data()?;
        Ok(payload.report)
    }

    pub async fn grouped_by_category(&self) -> ApiResult<AnexosGrouped> {
        self.client
            .get(&[BASE, "grouped-by-category"])
            .await?
            .into_data()
    }

    /// Admin only. Every row is validated before anything is sent; field
    /// names in the errors are prefixed with the row, e.g. `anexos[2].category`.
    pub async fn import(&self, forms: &[CreateAnexo]) -> ApiResult<ImportResult> {
        let mut errors = FormErrors::default();
        for (index, form) in forms.iter().enumerate() {
            if let Err(row_errors) = validate_create_anexo(form) {
                for error in row_errors.errors {
                    errors.push(&format!("anexos[{}].{}", index, error.field), error.message);
                }
            }
        }
        if !errors.is_empty() {
            return Err(ApiError::InvalidInput(errors));
        }

        let body = serde_json::json!({ "anexos": forms });
        let payload: ImportPayload = self
            .client
            .post(&[BASE, "admin", "import"], &body)
            .await?
            .into_data()?;
        tracing::info!(
            "Import finished: {} ok, {} failed of {}",
            payload.result.succeeded,
            payload.result.failed,
            payload.result.total
        );
        Ok(payload.result)
    }

    /// Admin only
    pub async fn verify_integrity(&self) -> ApiResult<serde_json::Value> {
        let payload: IntegrityPayload = self
            .client
            .get(&[BASE, "admin", "verify-integrity"])
            .await?
            .into_data()?;
        Ok(payload.integrity)
    }

    /// `GET /anexos/health`
    pub async fn health(&self) -> bool {
        self.client.probe(&[BASE, "health"]).await
    }

    /// Admin only
    pub async fn export(&self, filters: &AnexoFilters) -> ApiResult<AnexosExport> {
        self.client
            .get_with(&[BASE, "admin", "export"], filters)
            .await?
            .into_data()
    }

    pub async fn dashboard(&self) -> ApiResult<AnexosDashboard> {
        let payload: AnexosDashboardPayload = self.client.get(&[BASE, "dashboard"]).await?.into_data()?;
        Ok(payload.dashboard)
    }
}
