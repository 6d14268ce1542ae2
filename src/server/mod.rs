//! HTTP front end: routing, shared state and the serve loop.

pub mod handlers;
pub mod pages;

use crate::core::store::CourseStore;
use crate::utils::error::{CatalogError, Result};
use crate::utils::monitor::ActivityMonitor;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CourseStore>,
    pub monitor: Arc<ActivityMonitor>,
}

impl AppState {
    pub fn new(store: CourseStore) -> Self {
        Self {
            store: Arc::new(store),
            monitor: Arc::new(ActivityMonitor::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Danger,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Danger => "danger",
            NoticeLevel::Error => "error",
        }
    }

    /// 未知的等級一律視為 success
    pub fn parse_or_success(value: &str) -> NoticeLevel {
        match value {
            "danger" => NoticeLevel::Danger,
            "error" => NoticeLevel::Error,
            _ => NoticeLevel::Success,
        }
    }
}

/// 重新導向後顯示一次的訊息
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
    /// Kept as text so a hand-edited level never rejects the page.
    pub level: Option<String>,
}

impl NoticeQuery {
    pub fn as_notice(&self) -> Option<(&str, NoticeLevel)> {
        self.notice
            .as_deref()
            .map(|message| {
                let level = self
                    .level
                    .as_deref()
                    .map_or(NoticeLevel::Success, NoticeLevel::parse_or_success);
                (message, level)
            })
    }
}

/// Builds the catalog location carrying a notice in its query string.
pub fn catalog_url_with_notice(message: &str, level: NoticeLevel) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("notice", message)
        .append_pair("level", level.as_str())
        .finish();
    format!("/catalog?{}", query)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/catalog", get(handlers::course_catalog))
        .route(
            "/add_course",
            get(handlers::add_course_form).post(handlers::add_course),
        )
        .route("/course/:code", get(handlers::course_details))
        .route("/delete_course/:code", post(handlers::delete_course))
        .route("/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Binds the listener and serves until ctrl-c.
pub async fn serve(state: AppState, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| CatalogError::ServerError {
            message: format!("Failed to bind {}: {}", bind_address, e),
        })?;

    tracing::info!("🚀 Course catalog listening on http://{}", bind_address);

    let monitor = state.monitor.clone();
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CatalogError::ServerError {
            message: e.to_string(),
        })?;

    monitor.log_stats("Shutdown");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
