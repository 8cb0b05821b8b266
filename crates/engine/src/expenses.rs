//! The module contains the `expenses` entity.
//!
//! An expense is a positive amount spent by one user. It is the source of the
//! observations fed to [`crate::metrics`] and the owner of at most one receipt.
use sea_orm::entity::prelude::*;

use crate::metrics::{Observation, PeriodKey};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub amount_minor: i64,
    pub category: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_one = "super::receipts::Entity")]
    Receipts,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for Observation {
    fn from(model: &Model) -> Self {
        Observation::new(model.amount_minor, Some(PeriodKey::of(&model.occurred_at)))
    }
}
