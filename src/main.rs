mod app_state;
mod commands;
mod config;
mod error;
mod school;
mod server;
mod service;
mod session;
mod storage;
mod ui;

use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use session::EntrySession;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::app_state::{App, AppEvent};
use crate::commands::AppCommand;
use crate::config::{ClientConfig, ServerConfig};
use crate::ui::draw;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv::dotenv();

    match std::env::args().nth(1).as_deref() {
        Some("serve") => {
            env_logger::Builder::from_default_env()
                .filter_level(log::LevelFilter::Warn)
                .filter_module("school_entry", log::LevelFilter::Info)
                .filter_module("sqlx", log::LevelFilter::Error)
                .filter_module("sea_orm", log::LevelFilter::Error)
                .init();
            if let Err(e) = &env_loaded {
                log::warn!("⚠ 未加载 .env: {}", e);
            }
            server::run(ServerConfig::from_env()?).await
        }
        Some(other) if other != "client" => {
            anyhow::bail!("未知子命令: {} (可用: serve | client)", other)
        }
        _ => {
            let mut startup_info = Vec::new();
            match env_loaded {
                Ok(path) => startup_info.push(format!("✓ 找到 .env 文件: {}", path.display())),
                Err(_) => startup_info.push("⚠ 未找到 .env 文件，从系统环境变量读取".to_string()),
            }
            run_client(startup_info).await?;
            Ok(())
        }
    }
}

async fn run_client(mut startup_info: Vec<String>) -> io::Result<()> {
    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let log_dir = std::path::PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join(format!("client-{}.log", ts)))?;
    // TUI 占用终端，日志只写文件
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn)
        .filter_module("school_entry", log::LevelFilter::Info)
        .init();

    let config = ClientConfig::from_env();
    match config.ensure_configured() {
        Ok(url) => startup_info.push(format!("✓ 录入端点: {}", url)),
        Err(e) => startup_info.push(format!("✗ {}", e)),
    }

    let session = EntrySession::new(config.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let session = Arc::new(session);

    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();

    // 后台 Actor：每个命令起一个任务，UI 不阻塞
    let session_bg = Arc::clone(&session);
    let evt_tx_bg = evt_tx.clone();
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                AppCommand::Lookup { udise } => {
                    let sess = session_bg.clone();
                    let tx = evt_tx_bg.clone();
                    tokio::spawn(async move {
                        crate::commands::lookup::run(&udise, &sess, tx).await;
                    });
                }
                AppCommand::Submit { payload } => {
                    let sess = session_bg.clone();
                    let tx = evt_tx_bg.clone();
                    tokio::spawn(async move {
                        crate::commands::submit::run(&payload, &sess, tx).await;
                    });
                }
                AppCommand::Quit => break,
            }
        }
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, startup_info, cmd_tx, evt_rx);
    let rx = app.evt_rx.take();
    let res = match rx {
        Some(rx) => run_app_loop(&mut terminal, &mut app, rx).await,
        None => Ok(()),
    };
    let _ = app.cmd_tx.send(AppCommand::Quit);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        while let Ok(event) = evt_rx.try_recv() {
            app.apply_event(event);
        }
        app.tick(Instant::now());

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key_event(key.code) {
                    return Ok(());
                }
            }
        }
    }
}
