pub mod handlers;

use crate::config::ServerConfig;
use crate::service::{LookupService, UpsertService};
use crate::storage::import::import_school_list_file;
use crate::storage::repository::SheetRepository;
use crate::storage::{ensure_workbook, establish_connection, SqliteWorkbook, Workbook};
use anyhow::Context;
use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<LookupService>,
    pub upsert: Arc<UpsertService>,
}

impl AppState {
    pub fn new(workbook: Arc<dyn Workbook>, lock_timeout: Duration) -> Self {
        Self {
            lookup: Arc::new(LookupService::new(workbook.clone())),
            upsert: Arc::new(UpsertService::new(workbook, lock_timeout)),
        }
    }
}

pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(handlers::get_entry).post(handlers::post_entry))
        .layer(cors)
        .with_state(state)
}

/// `school-entry serve`
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let db = establish_connection(&config.database_url)
        .await
        .with_context(|| format!("无法连接数据库 {}", config.database_url))?;
    ensure_workbook(&db).await.context("初始化表失败")?;
    let db = Arc::new(db);
    info!("sheets: {:?}", SheetRepository::list_sheets(&db).await?);

    let workbook: Arc<dyn Workbook> = Arc::new(SqliteWorkbook::new(db));

    if let Some(ref path) = config.school_list_csv {
        match import_school_list_file(workbook.as_ref(), path).await {
            Ok(n) => info!("✓ 已从 {} 导入 {} 所学校", path, n),
            Err(e) => warn!("⚠ 导入学校名单失败: {}", e),
        }
    }

    let app = configure_routes(AppState::new(workbook, config.lock_timeout));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("无法监听 {}", config.bind_addr))?;
    info!("school-entry 服务已启动: http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
