//! Leterago dashboard CLI
//!
//! Signs in (or restores the stored session), loads normativas and
//! anexos SOA and prints both category matrices.
//!
//! Usage: `leterago-dashboard [logout | <search term>]`

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leterago_dashboard::constants::{self, ANEXOS_SOA_CATEGORIES, NORMATIVAS_CATEGORIES};
use leterago_dashboard::logic::{ExpirationSummary, MatrixFilter, SystemClock};
use leterago_dashboard::models::{Anexo, AnexoFilters, LoginCredentials, Normativa, NormativaFilters};
use leterago_dashboard::{
    AnexosService, ApiClient, AuthContext, AuthService, Config, FileSessionStore, ListView, LoadState,
    NormativasService,
};

/// Large enough to fetch every record in one page
const PAGE_LIMIT: u32 = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging (LOG_FORMAT=json for structured output)
    let json_logs = std::env::var("LOG_FORMAT").map_or(false, |f| f == "json");
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "leterago_dashboard=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // Load configuration
    let config = Config::from_env();

    tracing::info!("{} v{} starting...", constants::APP_NAME, constants::APP_VERSION);
    tracing::info!("API: {}", config.api_base_url);
    tracing::info!("Environment: {}", config.environment);

    let store = Arc::new(FileSessionStore::new(&config.session_file));
    let auth = AuthContext::new(store);
    let client = ApiClient::new(&config.client(), auth).context("Failed to create API client")?;
    let auth_service = AuthService::new(client.clone());

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("logout") {
        auth_service.restore_session().await?;
        auth_service.logout().await?;
        println!("Sesión cerrada");
        return Ok(());
    }

    if !client.health_check().await {
        tracing::warn!("Backend health check failed, continuing anyway");
    }

    // Session
    let user = match auth_service.restore_session().await? {
        Some(user) => user,
        None => {
            let (Some(email), Some(password)) = (config.email.clone(), config.password.clone()) else {
                bail!("No stored session; set DASHBOARD_EMAIL and DASHBOARD_PASSWORD to sign in");
            };
            auth_service
                .login(&LoginCredentials::new(email, password))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))
                .context("Login failed")?
        }
    };
    println!("Usuario: {} <{}> [{}]", user.username, user.email, user.role.as_str());

    let filter = match arg {
        Some(term) => MatrixFilter::new().with_search(term),
        None => MatrixFilter::new(),
    };

    show_normativas(&NormativasService::new(client.clone()), &filter).await;
    show_anexos(&AnexosService::new(client), &filter).await;

    Ok(())
}

async fn show_normativas(service: &NormativasService, filter: &MatrixFilter) {
    let mut view: ListView<Normativa> = ListView::new();
    let ticket = view.begin_load();
    let filters = NormativaFilters {
        limit: Some(PAGE_LIMIT),
        ..Default::default()
    };
    let result = service.list(&filters).await.map(|page| page.items);
    view.finish(ticket, result);

    if let LoadState::Failed(message) = view.state() {
        println!("\nNormativas: {}", message);
        return;
    }

    let clock = SystemClock;
    let summary = ExpirationSummary::from_records(view.records(), &clock);
    println!(
        "\n== Normativas ({}) | vencidas {} | críticas {} | próximas {} | vigentes {}",
        summary.total, summary.expired, summary.critical, summary.upcoming, summary.current
    );

    let matrix = view.matrix(&NORMATIVAS_CATEGORIES, filter);
    for group in matrix.visible_groups() {
        println!("\n[{}] ({})", group.category, group.count);
        if group.shows_empty_state() {
            println!("  (sin normativas)");
        }
        for normativa in &group.records {
            let status = normativa.status_at(&clock);
            println!(
                "  - {} | vence {} | {} ({})",
                normativa.name,
                normativa.expires_at.format("%d/%m/%Y"),
                status.describe(),
                status.status.priority().label()
            );
        }
    }
    if !matrix.uncategorized.is_empty() {
        println!("\n{} normativa(s) con categoría desconocida", matrix.uncategorized.len());
    }
}

async fn show_anexos(service: &AnexosService, filter: &MatrixFilter) {
    let mut view: ListView<Anexo> = ListView::new();
    let ticket = view.begin_load();
    let filters = AnexoFilters {
        limit: Some(PAGE_LIMIT),
        ..Default::default()
    };
    let result = service.list(&filters).await.map(|page| page.items);
    view.finish(ticket, result);

    if let LoadState::Failed(message) = view.state() {
        println!("\nAnexos SOA: {}", message);
        return;
    }

    println!("\n== Anexos SOA ({})", view.len());
    let matrix = view.matrix(&ANEXOS_SOA_CATEGORIES, filter);
    for group in matrix.visible_groups() {
        println!("\n[{}] ({})", group.category, group.count);
        if group.shows_empty_state() {
            println!("  (sin controles)");
        }
        for anexo in &group.records {
            println!("  - {} | {}", anexo.control_name, anexo.location);
        }
    }

    match service.coverage().await {
        Ok(coverage) => {
            println!("\nCobertura:");
            for cell in coverage {
                let progress = cell.progress();
                println!(
                    "  {}: {}/{} ({}%, {})",
                    cell.category,
                    cell.existing,
                    cell.recommended,
                    progress.percentage,
                    progress.level.as_str()
                );
            }
        }
        Err(e) => tracing::warn!("Coverage unavailable: {}", e),
    }
}
