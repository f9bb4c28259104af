use crate::storage::entity::sheet::{self, ActiveModel as SheetActiveModel, Entity as Sheet};
use crate::storage::entity::sheet_row::{
    self, ActiveModel as SheetRowActiveModel, Entity as SheetRow,
};
use crate::storage::sheet::Row;
use chrono::Utc;
use log::info;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

pub struct SheetRepository;

impl SheetRepository {
    pub async fn exists(db: &DatabaseConnection, name: &str) -> Result<bool, DbErr> {
        Ok(Sheet::find_by_id(name.to_string()).one(db).await?.is_some())
    }

    /// 表不存在时创建并写入表头，返回是否新建
    pub async fn ensure_sheet(
        db: &DatabaseConnection,
        name: &str,
        header: Row,
    ) -> Result<bool, DbErr> {
        if Self::exists(db, name).await? {
            return Ok(false);
        }

        let now = Utc::now().timestamp();
        let txn = db.begin().await?;
        SheetActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;
        SheetRowActiveModel {
            sheet_name: Set(name.to_string()),
            row_index: Set(0),
            cells_json: Set(encode_row(&header)?),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!("已创建表 {}", name);
        Ok(true)
    }

    pub async fn load_rows(db: &DatabaseConnection, name: &str) -> Result<Vec<Row>, DbErr> {
        let models = SheetRow::find()
            .filter(sheet_row::Column::SheetName.eq(name.to_string()))
            .order_by_asc(sheet_row::Column::RowIndex)
            .all(db)
            .await?;
        models.iter().map(|m| decode_row(&m.cells_json)).collect()
    }

    /// 覆盖指定行；行不存在时报错
    pub async fn write_row(
        db: &DatabaseConnection,
        name: &str,
        index: usize,
        row: &Row,
    ) -> Result<(), DbErr> {
        let now = Utc::now().timestamp();
        let res = SheetRow::update_many()
            .col_expr(sheet_row::Column::CellsJson, Expr::value(encode_row(row)?))
            .col_expr(sheet_row::Column::UpdatedAt, Expr::value(now))
            .filter(sheet_row::Column::SheetName.eq(name.to_string()))
            .filter(sheet_row::Column::RowIndex.eq(index as i32))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!(
                "row {} in sheet '{}'",
                index, name
            )));
        }
        Ok(())
    }

    /// 追加到末尾，行号 = 当前行数
    pub async fn append_row(db: &DatabaseConnection, name: &str, row: &Row) -> Result<(), DbErr> {
        let now = Utc::now().timestamp();
        let txn = db.begin().await?;
        let count = SheetRow::find()
            .filter(sheet_row::Column::SheetName.eq(name.to_string()))
            .count(&txn)
            .await?;
        SheetRowActiveModel {
            sheet_name: Set(name.to_string()),
            row_index: Set(count as i32),
            cells_json: Set(encode_row(row)?),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn list_sheets(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
        let models = Sheet::find()
            .order_by_asc(sheet::Column::Name)
            .all(db)
            .await?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }
}

fn encode_row(row: &Row) -> Result<String, DbErr> {
    serde_json::to_string(row).map_err(|e| DbErr::Custom(e.to_string()))
}

fn decode_row(raw: &str) -> Result<Row, DbErr> {
    serde_json::from_str(raw).map_err(|e| DbErr::Custom(e.to_string()))
}
