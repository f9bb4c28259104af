use crate::app_state::AppEvent;
use crate::session::EntrySession;
use log::{error, info};
use tokio::sync::mpsc;

pub async fn run(udise: &str, session: &EntrySession, evt_tx: mpsc::UnboundedSender<AppEvent>) {
    let _ = evt_tx.send(AppEvent::Log(format!("正在查询 UDISE: {}...", udise)));

    match session.fetch_school_details(udise).await {
        Ok(details) => {
            info!("lookup {} -> {}", udise, details.name);
            let _ = evt_tx.send(AppEvent::Log(format!("✓ 已找到学校: {}", details.name)));
            let _ = evt_tx.send(AppEvent::SchoolLoaded(details));
        }
        Err(e) => {
            error!("lookup {} failed: {}", udise, e);
            let _ = evt_tx.send(AppEvent::Log(format!("✗ 查询失败: {}", e)));
            let _ = evt_tx.send(AppEvent::LookupFailed(e));
        }
    }
}
