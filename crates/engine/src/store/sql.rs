//! sea-orm backed store.
//!
//! The donation path runs inside a database transaction and applies both
//! aggregate updates as in-database increments, so two concurrent donations
//! to the same campaign serialize on the row instead of racing a
//! read-then-write.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Statement, TransactionTrait,
};

use crate::{
    Campaign, CampaignUpdate, Category, Donation, EngineError, NewCampaign, NewCategory,
    NewDonation, NewUser, ResultEngine, User, UserUpdate, campaigns, categories, donations, users,
};

use super::Store;

#[derive(Clone, Debug)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for SqlStore {
    async fn user(&self, id: i32) -> ResultEngine<Option<User>> {
        Ok(users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::from))
    }

    async fn user_by_username(&self, username: &str) -> ResultEngine<Option<User>> {
        Ok(users::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(users::Column::Username)))
                    .eq(username.to_lowercase()),
            )
            .one(&self.db)
            .await?
            .map(User::from))
    }

    async fn create_user(&self, new: NewUser) -> ResultEngine<User> {
        // Pre-checks give callers a clean ExistingKey instead of a raw
        // unique-index violation; the indexes still back this up.
        if self.user_by_username(&new.username).await?.is_some() {
            return Err(EngineError::ExistingKey(new.username));
        }
        let email_taken = users::Entity::find()
            .filter(users::Column::Email.eq(new.email.clone()))
            .one(&self.db)
            .await?
            .is_some();
        if email_taken {
            return Err(EngineError::ExistingKey(new.email));
        }

        let model = new.into_active_model(Utc::now()).insert(&self.db).await?;
        Ok(model.into())
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> ResultEngine<Option<User>> {
        if update.is_empty() {
            return self.user(id).await;
        }

        let active = users::ActiveModel {
            id: ActiveValue::Set(id),
            full_name: update
                .full_name
                .map_or(ActiveValue::NotSet, ActiveValue::Set),
            avatar_url: update
                .avatar_url
                .map_or(ActiveValue::NotSet, |v| ActiveValue::Set(Some(v))),
            bio: update
                .bio
                .map_or(ActiveValue::NotSet, |v| ActiveValue::Set(Some(v))),
            ..Default::default()
        };
        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn campaign(&self, id: i32) -> ResultEngine<Option<Campaign>> {
        Ok(campaigns::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Campaign::from))
    }

    async fn campaigns(&self) -> ResultEngine<Vec<Campaign>> {
        Ok(campaigns::Entity::find()
            .order_by_asc(campaigns::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Campaign::from)
            .collect())
    }

    async fn campaigns_by_category(&self, category: &str) -> ResultEngine<Vec<Campaign>> {
        Ok(campaigns::Entity::find()
            .filter(campaigns::Column::Category.eq(category))
            .order_by_asc(campaigns::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Campaign::from)
            .collect())
    }

    async fn campaigns_by_creator(&self, creator_id: i32) -> ResultEngine<Vec<Campaign>> {
        Ok(campaigns::Entity::find()
            .filter(campaigns::Column::CreatorId.eq(creator_id))
            .order_by_asc(campaigns::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Campaign::from)
            .collect())
    }

    async fn create_campaign(&self, new: NewCampaign) -> ResultEngine<Campaign> {
        let model = new.into_active_model(Utc::now()).insert(&self.db).await?;
        Ok(model.into())
    }

    async fn update_campaign(
        &self,
        id: i32,
        update: CampaignUpdate,
    ) -> ResultEngine<Option<Campaign>> {
        if update.is_empty() {
            return self.campaign(id).await;
        }

        let active = campaigns::ActiveModel {
            id: ActiveValue::Set(id),
            title: update.title.map_or(ActiveValue::NotSet, ActiveValue::Set),
            description: update
                .description
                .map_or(ActiveValue::NotSet, ActiveValue::Set),
            category: update
                .category
                .map_or(ActiveValue::NotSet, ActiveValue::Set),
            image_url: update
                .image_url
                .map_or(ActiveValue::NotSet, |v| ActiveValue::Set(Some(v))),
            goal: update.goal.map_or(ActiveValue::NotSet, ActiveValue::Set),
            is_active: update
                .is_active
                .map_or(ActiveValue::NotSet, ActiveValue::Set),
            end_date: update
                .end_date
                .map_or(ActiveValue::NotSet, |v| ActiveValue::Set(Some(v))),
            ..Default::default()
        };
        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_campaign(&self, id: i32) -> ResultEngine<bool> {
        let result = campaigns::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn donation(&self, id: i32) -> ResultEngine<Option<Donation>> {
        Ok(donations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Donation::from))
    }

    async fn donations_by_campaign(&self, campaign_id: i32) -> ResultEngine<Vec<Donation>> {
        Ok(donations::Entity::find()
            .filter(donations::Column::CampaignId.eq(campaign_id))
            .order_by_asc(donations::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Donation::from)
            .collect())
    }

    async fn donations_by_user(&self, donor_id: i32) -> ResultEngine<Vec<Donation>> {
        Ok(donations::Entity::find()
            .filter(donations::Column::DonorId.eq(donor_id))
            .order_by_asc(donations::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Donation::from)
            .collect())
    }

    async fn record_donation(&self, new: NewDonation) -> ResultEngine<Donation> {
        let amount = new.amount;
        let campaign_id = new.campaign_id;
        let donor_id = new.donor_id;
        let backend = self.db.get_database_backend();

        let db_tx = self.db.begin().await?;

        let model = new.into_active_model(Utc::now()).insert(&db_tx).await?;

        let campaign_update = db_tx
            .execute(Statement::from_sql_and_values(
                backend,
                "UPDATE campaigns SET raised_amount = raised_amount + ? WHERE id = ?",
                [amount.into(), campaign_id.into()],
            ))
            .await?;
        if campaign_update.rows_affected() == 0 {
            // Dropping the transaction rolls the donation insert back.
            return Err(EngineError::KeyNotFound("campaign".to_string()));
        }

        let user_update = db_tx
            .execute(Statement::from_sql_and_values(
                backend,
                "UPDATE users SET donation_count = donation_count + 1, \
                 total_donated = total_donated + ? WHERE id = ?",
                [amount.into(), donor_id.into()],
            ))
            .await?;
        if user_update.rows_affected() == 0 {
            return Err(EngineError::KeyNotFound("user".to_string()));
        }

        db_tx.commit().await?;
        Ok(model.into())
    }

    async fn category(&self, id: i32) -> ResultEngine<Option<Category>> {
        Ok(categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Category::from))
    }

    async fn category_by_name(&self, name: &str) -> ResultEngine<Option<Category>> {
        Ok(categories::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(categories::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await?
            .map(Category::from))
    }

    async fn categories(&self) -> ResultEngine<Vec<Category>> {
        Ok(categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Category::from)
            .collect())
    }

    async fn create_category(&self, new: NewCategory) -> ResultEngine<Category> {
        if self.category_by_name(&new.name).await?.is_some() {
            return Err(EngineError::ExistingKey(new.name));
        }
        let model = new.into_active_model(Utc::now()).insert(&self.db).await?;
        Ok(model.into())
    }
}
