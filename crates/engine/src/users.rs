//! User entity and domain type.
//!
//! `donation_count` and `total_donated` are aggregates maintained solely by
//! the donation recording path; no public operation sets them directly.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROLE: &str = "donor";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub donation_count: i32,
    pub total_donated: f64,
    pub created_at: DateTime<Utc>,
}

/// Fields a client supplies at registration. Aggregates start at zero.
#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

/// Partial profile update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl UserUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.avatar_url.is_none() && self.bio.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub donation_count: i32,
    #[sea_orm(column_type = "Double")]
    pub total_donated: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::donations::Entity")]
    Donations,
    #[sea_orm(has_many = "super::campaigns::Entity")]
    Campaigns,
}

impl Related<super::donations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donations.def()
    }
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaigns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password: model.password,
            email: model.email,
            full_name: model.full_name,
            avatar_url: model.avatar_url,
            bio: model.bio,
            role: model.role,
            donation_count: model.donation_count,
            total_donated: model.total_donated,
            created_at: model.created_at,
        }
    }
}

impl NewUser {
    /// Builds the insertable row; the id is assigned by the store.
    pub(crate) fn into_active_model(self, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set(self.username),
            password: ActiveValue::Set(self.password),
            email: ActiveValue::Set(self.email),
            full_name: ActiveValue::Set(self.full_name),
            avatar_url: ActiveValue::Set(self.avatar_url),
            bio: ActiveValue::Set(self.bio),
            role: ActiveValue::Set(self.role.unwrap_or_else(|| DEFAULT_ROLE.to_string())),
            donation_count: ActiveValue::Set(0),
            total_donated: ActiveValue::Set(0.0),
            created_at: ActiveValue::Set(created_at),
        }
    }
}
