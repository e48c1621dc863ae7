use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{error, info};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::runner::Orchestrator;
use crate::scenario::Scenario;

/// Server configuration
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInfo {
    pub slug: &'static str,
    pub name: &'static str,
    pub expected_status: u16,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build API router
pub fn api_router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/api/tests", get(list_scenarios))
        .route("/api/tests/:slug", get(run_scenario))
        .layer(CorsLayer::permissive())
        .with_state(orchestrator)
}

async fn list_scenarios() -> Json<Vec<ScenarioInfo>> {
    let scenarios = Scenario::ALL
        .into_iter()
        .map(|scenario| ScenarioInfo {
            slug: scenario.slug(),
            name: scenario.display_name(),
            expected_status: scenario.expected_status(),
        })
        .collect();
    Json(scenarios)
}

async fn run_scenario(
    State(orchestrator): State<Arc<Orchestrator>>,
    Path(slug): Path<String>,
) -> Response {
    let scenario = match slug.parse::<Scenario>() {
        Ok(scenario) => scenario,
        Err(error) => {
            return (StatusCode::NOT_FOUND, Json(ErrorResponse { error })).into_response()
        }
    };

    // Detached so a client disconnect cannot cut the run off between the
    // remote call and the session update
    let run = tokio::spawn(async move { orchestrator.run(scenario).await });
    match run.await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => {
            error!("Scenario {} aborted: {}", scenario, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Scenario {} aborted", scenario),
                }),
            )
                .into_response()
        }
    }
}

/// HTTP front for the orchestrator
pub struct ProbeServer {
    config: ServerConfig,
    orchestrator: Arc<Orchestrator>,
}

impl ProbeServer {
    pub fn new(config: ServerConfig, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    /// Serve until the process is interrupted
    pub async fn start(&self) -> Result<()> {
        let app = api_router(self.orchestrator.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Test endpoints listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;

        Ok(())
    }
}
