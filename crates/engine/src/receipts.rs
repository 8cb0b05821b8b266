//! The module contains the `Receipt` type, a document attached to an expense.
//!
//! Receipts are written by the upload path and are read-only here. A receipt
//! is reachable only through the `(user, expense)` pair that owns it.
use sea_orm::{FromQueryResult, entity::prelude::*};

/// The stored document: display name, content type and raw payload.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct Receipt {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub expense_id: i64,
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
