//! Campaign entity and domain type.
//!
//! `raised_amount` is monotonically non-decreasing: it starts at zero and
//! only grows through the donation recording path. There is no donation
//! deletion, so no decrease case exists.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub goal: f64,
    pub raised_amount: f64,
    pub creator_id: i32,
    pub is_active: bool,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields a creator supplies; `raised_amount` always starts at zero.
#[derive(Clone, Debug, Deserialize)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub goal: f64,
    pub creator_id: i32,
    pub is_active: Option<bool>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial campaign update. `None` leaves the field untouched;
/// `raised_amount` is deliberately absent.
#[derive(Clone, Debug, Default)]
pub struct CampaignUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub goal: Option<f64>,
    pub is_active: Option<bool>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CampaignUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.goal.is_none()
            && self.is_active.is_none()
            && self.end_date.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub goal: f64,
    #[sea_orm(column_type = "Double")]
    pub raised_amount: f64,
    pub creator_id: i32,
    pub is_active: bool,
    pub end_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::donations::Entity")]
    Donations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::donations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Campaign {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            image_url: model.image_url,
            goal: model.goal,
            raised_amount: model.raised_amount,
            creator_id: model.creator_id,
            is_active: model.is_active,
            end_date: model.end_date,
            created_at: model.created_at,
        }
    }
}

impl NewCampaign {
    pub(crate) fn into_active_model(self, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(self.description),
            category: ActiveValue::Set(self.category),
            image_url: ActiveValue::Set(self.image_url),
            goal: ActiveValue::Set(self.goal),
            raised_amount: ActiveValue::Set(0.0),
            creator_id: ActiveValue::Set(self.creator_id),
            is_active: ActiveValue::Set(self.is_active.unwrap_or(true)),
            end_date: ActiveValue::Set(self.end_date),
            created_at: ActiveValue::Set(created_at),
        }
    }
}
