use sea_orm::{entity::prelude::*, sea_query::OnConflict, ConnectionTrait, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Longest key the `lode_entry.key` column accepts.
pub const MAX_KEY_LEN: usize = 512;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lode_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_key(key: &str) -> Result<(), errors::ModelError> {
    if key.is_empty() {
        return Err(errors::ModelError::Validation("key required".into()));
    }
    if key.chars().count() > MAX_KEY_LEN {
        return Err(errors::ModelError::Validation(format!("key longer than {MAX_KEY_LEN} characters")));
    }
    Ok(())
}

pub async fn find<C: ConnectionTrait>(db: &C, key: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(key.to_string()).one(db).await?)
}

/// Insert or overwrite the value stored under `key`.
pub async fn upsert<C: ConnectionTrait>(db: &C, key: &str, value: &str) -> Result<(), errors::ModelError> {
    validate_key(key)?;
    let am = ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        updated_at: Set(Utc::now().into()),
    };
    Entity::insert(am)
        .on_conflict(
            OnConflict::column(Column::Key)
                .update_columns([Column::Value, Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}
