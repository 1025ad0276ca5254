//! Donation entity and domain type.
//!
//! A donation is immutable once recorded. It is the join point driving both
//! aggregates: the campaign's raised amount and the donor's lifetime stats.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: i32,
    pub amount: f64,
    pub campaign_id: i32,
    pub donor_id: i32,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewDonation {
    pub amount: f64,
    pub campaign_id: i32,
    pub donor_id: i32,
    pub message: Option<String>,
    pub is_anonymous: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub campaign_id: i32,
    pub donor_id: i32,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id"
    )]
    Campaign,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DonorId",
        to = "super::users::Column::Id"
    )]
    Donor,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Donation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount,
            campaign_id: model.campaign_id,
            donor_id: model.donor_id,
            message: model.message,
            is_anonymous: model.is_anonymous,
            created_at: model.created_at,
        }
    }
}

impl NewDonation {
    pub(crate) fn into_active_model(self, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            amount: ActiveValue::Set(self.amount),
            campaign_id: ActiveValue::Set(self.campaign_id),
            donor_id: ActiveValue::Set(self.donor_id),
            message: ActiveValue::Set(self.message),
            is_anonymous: ActiveValue::Set(self.is_anonymous.unwrap_or(false)),
            created_at: ActiveValue::Set(created_at),
        }
    }
}
