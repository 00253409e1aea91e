//! Normativas Service - `/normativas` endpoints

use std::sync::Arc;

use serde_json::{Map, Value};

use super::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::logic::dates::{Clock, SystemClock};
use crate::logic::validation::{validate_create_normativa, validate_update_normativa};
use crate::models::{
    CreateNormativa, ExpirationCheck, ExpirationReport, ExpirationReportPayload, Normativa,
    NormativaFilters, NormativaPayload, NormativaStats, NormativaStatsPayload,
    NormativasDashboardPayload, NormativasExport, NormativasGrouped, Page, UpdateNormativa,
};

const BASE: &str = "normativas";

#[derive(Clone)]
pub struct NormativasService {
    client: ApiClient,
    clock: Arc<dyn Clock>,
}

impl NormativasService {
    pub fn new(client: ApiClient) -> Self {
        Self::with_clock(client, Arc::new(SystemClock))
    }

    /// Clock used for the "expiration must be after today" check
    pub fn with_clock(client: ApiClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    pub async fn list(&self, filters: &NormativaFilters) -> ApiResult<Page<Normativa>> {
        let response = self.client.get_with(&[BASE], filters).await?;
        Page::from_response(response)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Normativa> {
        let payload: NormativaPayload = self.client.get(&[BASE, id]).await?.into_data()?;
        Ok(payload.normativa)
    }

    pub async fn create(&self, form: &CreateNormativa) -> ApiResult<Normativa> {
        validate_create_normativa(form, self.clock.today()).map_err(ApiError::InvalidInput)?;

        let payload: NormativaPayload = self.client.post(&[BASE], form).await?.into_data()?;
        tracing::info!("Normativa created: {} ({})", payload.normativa.name, payload.normativa.id);
        Ok(payload.normativa)
    }

    pub async fn update(&self, id: &str, form: &UpdateNormativa) -> ApiResult<Normativa> {
        validate_update_normativa(form, self.clock.today()).map_err(ApiError::InvalidInput)?;

        let payload: NormativaPayload = self.client.put(&[BASE, id], form).await?.into_data()?;
        tracing::info!("Normativa updated: {}", id);
        Ok(payload.normativa)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&[BASE, id]).await?;
        tracing::info!("Normativa deleted: {}", id);
        Ok(())
    }

    /// Copy of an existing normativa; present fields override the original
    pub async fn duplicate(&self, id: &str, overrides: &UpdateNormativa) -> ApiResult<Normativa> {
        validate_update_normativa(overrides, self.clock.today()).map_err(ApiError::InvalidInput)?;

        let payload: NormativaPayload = self
            .client
            .post(&[BASE, id, "clone"], overrides)
            .await?
            .into_data()?;
        Ok(payload.normativa)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub async fn search(&self, term: &str, filters: &NormativaFilters) -> ApiResult<Page<Normativa>> {
        let filters = NormativaFilters {
            search: Some(term.to_string()),
            ..filters.clone()
        };
        let response = self.client.get_with(&[BASE, "search"], &filters).await?;
        Page::from_response(response)
    }

    pub async fn by_category(&self, category: &str, filters: &NormativaFilters) -> ApiResult<Page<Normativa>> {
        let filters = NormativaFilters {
            category: None,
            ..filters.clone()
        };
        let response = self
            .client
            .get_with(&[BASE, "categoria", category], &filters)
            .await?;
        Page::from_response(response)
    }

    /// Records created by the signed-in user
    pub async fn mine(&self, filters: &NormativaFilters) -> ApiResult<Page<Normativa>> {
        let response = self
            .client
            .get_with(&[BASE, "user", "my-normativas"], filters)
            .await?;
        Page::from_response(response)
    }

    pub async fn expiring_soon(&self, days: u32) -> ApiResult<Vec<Normativa>> {
        self.client
            .get_with(&[BASE, "expiring-soon"], &[("days", days)])
            .await?
            .into_data()
    }

    pub async fn expired(&self) -> ApiResult<Vec<Normativa>> {
        self.client.get(&[BASE, "expired"]).await?.into_data()
    }

    pub async fn check_expiration(&self, id: &str) -> ApiResult<ExpirationCheck> {
        self.client
            .get(&[BASE, id, "expiration-check"])
            .await?
            .into_data()
    }

    /// True when no normativa in `category` already has this name
    /// (case-insensitive)
    pub async fn is_name_available(&self, name: &str, category: &str) -> ApiResult<bool> {
        let filters = NormativaFilters {
            category: Some(category.to_string()),
            ..Default::default()
        };
        let page = self.search(name, &filters).await?;
        let wanted = name.trim().to_lowercase();
        Ok(!page
            .items
            .iter()
            .any(|n| n.category == category && n.name.trim().to_lowercase() == wanted))
    }

    // ========================================================================
    // REPORTS
    // ========================================================================

    pub async fn stats(&self) -> ApiResult<NormativaStats> {
        let payload: NormativaStatsPayload = self.client.get(&[BASE, "stats"]).await?.into_data()?;
        Ok(payload.stats)
    }

    pub async fn expiration_report(&self) -> ApiResult<ExpirationReport> {
        let payload: ExpirationReportPayload = self
            .client
            .get(&[BASE, "expiration-report"])
            .await?
            .into_data()?;
        Ok(payload.report)
    }

    pub async fn grouped_by_category(&self) -> ApiResult<NormativasGrouped> {
        self.client
            .get(&[BASE, "grouped-by-category"])
            .await?
            .into_data()
    }

    /// Admin only
    pub async fn export(&self, filters: &NormativaFilters) -> ApiResult<NormativasExport> {
        self.client
            .get_with(&[BASE, "admin", "export"], filters)
            .await?
            .into_data()
    }

    /// `GET /normativas/health`
    pub async fn health(&self) -> bool {
        self.client.probe(&[BASE, "health"]).await
    }

    pub async fn dashboard(&self) -> ApiResult<Map<String, Value>> {
        let payload: NormativasDashboardPayload = self.client.get(&[BASE, "dashboard"]).await?.into_data()?;
        Ok(payload.dashboard)
    }
}

impl std::fmt::Debug for NormativasService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormativasService")
            .field("client", &self.client)
            .field("today", &self.clock.today())
            .finish()
    }
}
