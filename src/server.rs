// File: ./src/server.rs
//! HTTP endpoint that renders the task file as a calendar on every GET.
use crate::clock::Clock;
use crate::config::Config;
use crate::model::TaskParser;
use crate::model::adapter::to_ics_string;
use crate::source::read_tasks;
use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::path::PathBuf;
use std::sync::Arc;

pub const CONTENT_TYPE: &str = "text/calendar";

/// Shared state passed to the handlers.
#[derive(Debug)]
pub struct ServerState<C: Clock> {
    pub infile: Option<PathBuf>,
    pub parser: TaskParser<C>,
}

impl<C: Clock> ServerState<C> {
    pub fn new(infile: Option<PathBuf>, parser: TaskParser<C>) -> Self {
        Self { infile, parser }
    }

    /// Reads the task file and renders it. No file configured means an empty calendar.
    pub async fn render(&self) -> Result<String> {
        let tasks = match &self.infile {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read '{}'", path.display()))?;
                read_tasks(&self.parser, text.as_bytes())?
            }
            None => Vec::new(),
        };
        Ok(to_ics_string(&tasks))
    }
}

/// Every path serves the same calendar.
pub fn build_router<C: Clock + 'static>(state: ServerState<C>) -> Router {
    Router::new()
        .route("/", get(serve_calendar::<C>))
        .route("/{*path}", get(serve_calendar::<C>))
        .with_state(Arc::new(state))
}

async fn serve_calendar<C: Clock + 'static>(State(state): State<Arc<ServerState<C>>>) -> Response {
    match state.render().await {
        Ok(ics) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], ics).into_response(),
        Err(e) => {
            log::error!("Failed to build calendar: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to build calendar\n").into_response()
        }
    }
}

pub async fn serve<C: Clock + 'static>(config: &Config, parser: TaskParser<C>) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local_addr = listener.local_addr()?;

    log::info!("serving at {}", local_addr);

    let router = build_router(ServerState::new(config.infile.clone(), parser));
    axum::serve(listener, router)
        .await
        .context("HTTP server stopped")?;
    Ok(())
}
