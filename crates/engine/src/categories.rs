//! Campaign categories.
//!
//! Categories carry presentation tokens (icon, colours) next to the unique
//! name. A fixed set is seeded when the store is empty at boot.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub icon_name: String,
    pub background_color: String,
    pub text_color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub icon_name: String,
    pub background_color: String,
    pub text_color: String,
}

impl NewCategory {
    fn new(name: &str, icon_name: &str, background_color: &str, text_color: &str) -> Self {
        Self {
            name: name.to_string(),
            icon_name: icon_name.to_string(),
            background_color: background_color.to_string(),
            text_color: text_color.to_string(),
        }
    }
}

/// The seed set applied to an empty store.
pub fn default_categories() -> Vec<NewCategory> {
    vec![
        NewCategory::new("Education", "graduation-cap", "bg-primary-100", "text-primary-500"),
        NewCategory::new("Healthcare", "heart", "bg-green-100", "text-green-500"),
        NewCategory::new("Community", "users", "bg-blue-100", "text-blue-500"),
        NewCategory::new("Disaster Relief", "gift", "bg-yellow-100", "text-yellow-500"),
        NewCategory::new("Arts & Culture", "paint-brush", "bg-purple-100", "text-purple-500"),
        NewCategory::new("Animal Welfare", "heart", "bg-pink-100", "text-pink-500"),
    ]
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub icon_name: String,
    pub background_color: String,
    pub text_color: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            icon_name: model.icon_name,
            background_color: model.background_color,
            text_color: model.text_color,
            created_at: model.created_at,
        }
    }
}

impl NewCategory {
    pub(crate) fn into_active_model(self, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(self.name),
            icon_name: ActiveValue::Set(self.icon_name),
            background_color: ActiveValue::Set(self.background_color),
            text_color: ActiveValue::Set(self.text_color),
            created_at: ActiveValue::Set(created_at),
        }
    }
}
