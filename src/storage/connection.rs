use crate::school::rows::{
    data_header, school_list_header, status_header, DATA_SHEET, SCHOOL_LIST_SHEET, STATUS_SHEET,
};
use crate::storage::entity::{sheet, sheet_row};
use crate::storage::repository::SheetRepository;
use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::time::Duration;

pub async fn establish_connection(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let in_memory = db_url.contains(":memory:");
    let mut opt = ConnectOptions::new(db_url.to_owned());
    if in_memory {
        // 内存库每个连接各自独立，只能用一个连接且不能回收
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(10)
            .min_connections(2)
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8));
    }
    opt.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Info);

    let db = Database::connect(opt).await?;

    if !in_memory {
        // 启用 WAL 模式
        let _ = sea_orm::ConnectionTrait::execute(
            &db,
            sea_orm::Statement::from_string(
                sea_orm::DatabaseBackend::Sqlite,
                "PRAGMA journal_mode=WAL;".to_string(),
            ),
        )
        .await?;
    }

    // 创建表（如果不存在）
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let stmt = builder.build(
        schema
            .create_table_from_entity(sheet::Entity)
            .if_not_exists(),
    );
    db.execute(stmt).await?;

    let stmt = builder.build(
        schema
            .create_table_from_entity(sheet_row::Entity)
            .if_not_exists(),
    );
    db.execute(stmt).await?;

    // 唯一索引：同一张表里行号不重复
    let _ = sea_orm::ConnectionTrait::execute(
        &db,
        sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Sqlite,
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_sheet_rows_unique ON sheet_rows(sheet_name, row_index);".to_string(),
        ),
    )
    .await?;

    info!("Database connection established and sheet tables initialized.");

    Ok(db)
}

/// 确保 SchoolList / Data / Status 三张表都存在
pub async fn ensure_workbook(db: &DatabaseConnection) -> Result<(), DbErr> {
    SheetRepository::ensure_sheet(db, SCHOOL_LIST_SHEET, school_list_header()).await?;
    SheetRepository::ensure_sheet(db, DATA_SHEET, data_header()).await?;
    SheetRepository::ensure_sheet(db, STATUS_SHEET, status_header()).await?;
    Ok(())
}
