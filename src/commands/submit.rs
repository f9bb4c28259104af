use crate::app_state::AppEvent;
use crate::school::SubmitPayload;
use crate::session::EntrySession;
use log::{error, info};
use tokio::sync::mpsc;

pub async fn run(
    payload: &SubmitPayload,
    session: &EntrySession,
    evt_tx: mpsc::UnboundedSender<AppEvent>,
) {
    let _ = evt_tx.send(AppEvent::Log(format!(
        "正在提交 {} ({} 个年级)...",
        payload.udise,
        payload.class_data.len()
    )));

    match session.submit_school_data(payload).await {
        Ok(message) => {
            info!("submit {} -> {}", payload.udise, message);
            let _ = evt_tx.send(AppEvent::Log(format!("✓ {}", message)));
            let _ = evt_tx.send(AppEvent::Submitted(message));
        }
        Err(e) => {
            error!("submit {} failed: {}", payload.udise, e);
            let hint = if e.is_retryable() { "，可重试" } else { "" };
            let _ = evt_tx.send(AppEvent::Log(format!("✗ 提交失败: {}{}", e, hint)));
            let _ = evt_tx.send(AppEvent::SubmitFailed(e));
        }
    }
}
