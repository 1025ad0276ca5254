//! Crowdfunding domain core.
//!
//! The [`Engine`] validates requests and enforces ownership, then delegates
//! persistence to a [`Store`] backend (map-backed or sea-orm). The donation
//! path is the one multi-entity invariant: recording a donation must bump
//! the campaign's raised amount and the donor's lifetime stats atomically.

use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use campaigns::{Campaign, CampaignUpdate, NewCampaign};
pub use categories::{Category, NewCategory, default_categories};
pub use donations::{Donation, NewDonation};
pub use error::EngineError;
pub use query::{CampaignStats, SortKey};
pub use store::{MemStore, SqlStore, Store};
pub use users::{NewUser, User, UserUpdate};

pub mod campaigns;
pub mod categories;
pub mod donations;
mod error;
pub mod query;
pub mod store;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;

pub struct Engine {
    store: Arc<dyn Store>,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn store(&self) -> Arc<dyn Store> {
        Arc::clone(&self.store)
    }

    // ── Users ───────────────────────────────────────────────────────────

    /// Registers a new user. Usernames and emails are unique; the store
    /// rejects duplicates with `ExistingKey`.
    pub async fn register(&self, new: NewUser) -> ResultEngine<User> {
        if new.username.trim().is_empty() {
            return Err(EngineError::Validation("username is required".to_string()));
        }
        if new.password.is_empty() {
            return Err(EngineError::Validation("password is required".to_string()));
        }
        if new.email.trim().is_empty() {
            return Err(EngineError::Validation("email is required".to_string()));
        }
        if new.full_name.trim().is_empty() {
            return Err(EngineError::Validation("full name is required".to_string()));
        }
        self.store.create_user(new).await
    }

    /// Plain credential comparison; hashing is a collaborator concern.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let user = self.store.user_by_username(username).await?;
        Ok(user.filter(|user| user.password == password))
    }

    pub async fn user(&self, id: i32) -> ResultEngine<User> {
        self.store
            .user(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))
    }

    pub async fn update_profile(&self, id: i32, update: UserUpdate) -> ResultEngine<User> {
        self.store
            .update_user(id, update)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))
    }

    // ── Campaigns ───────────────────────────────────────────────────────

    pub async fn campaigns(&self) -> ResultEngine<Vec<Campaign>> {
        self.store.campaigns().await
    }

    pub async fn campaign(&self, id: i32) -> ResultEngine<Campaign> {
        self.store
            .campaign(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("campaign".to_string()))
    }

    pub async fn campaigns_by_category(&self, category: &str) -> ResultEngine<Vec<Campaign>> {
        self.store.campaigns_by_category(category).await
    }

    pub async fn campaigns_by_creator(&self, creator_id: i32) -> ResultEngine<Vec<Campaign>> {
        self.store.campaigns_by_creator(creator_id).await
    }

    pub async fn create_campaign(&self, new: NewCampaign) -> ResultEngine<Campaign> {
        if new.title.trim().is_empty() {
            return Err(EngineError::Validation("title is required".to_string()));
        }
        if new.description.trim().is_empty() {
            return Err(EngineError::Validation(
                "description is required".to_string(),
            ));
        }
        if !(new.goal > 0.0) {
            return Err(EngineError::Validation("goal must be > 0".to_string()));
        }
        self.store.create_campaign(new).await
    }

    /// Applies a partial update. Only the creator may edit.
    pub async fn update_campaign(
        &self,
        id: i32,
        update: CampaignUpdate,
        user_id: i32,
    ) -> ResultEngine<Campaign> {
        let campaign = self.campaign(id).await?;
        if campaign.creator_id != user_id {
            return Err(EngineError::Forbidden(
                "only the creator may update this campaign".to_string(),
            ));
        }
        if let Some(goal) = update.goal {
            if !(goal > 0.0) {
                return Err(EngineError::Validation("goal must be > 0".to_string()));
            }
        }
        self.store
            .update_campaign(id, update)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("campaign".to_string()))
    }

    /// Deletes a campaign. Only the creator may delete.
    pub async fn delete_campaign(&self, id: i32, user_id: i32) -> ResultEngine<()> {
        let campaign = self.campaign(id).await?;
        if campaign.creator_id != user_id {
            return Err(EngineError::Forbidden(
                "only the creator may delete this campaign".to_string(),
            ));
        }
        self.store.delete_campaign(id).await?;
        Ok(())
    }

    // ── Donations ───────────────────────────────────────────────────────

    /// Records a donation after validating the request: positive amount,
    /// existing active campaign, existing donor. The store then persists
    /// the donation and both aggregate updates as one atomic unit.
    pub async fn donate(&self, new: NewDonation) -> ResultEngine<Donation> {
        if !(new.amount > 0.0) {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        let campaign = self.campaign(new.campaign_id).await?;
        if !campaign.is_active {
            return Err(EngineError::InvalidState(
                "campaign is not active".to_string(),
            ));
        }
        self.user(new.donor_id).await?;

        self.store.record_donation(new).await
    }

    pub async fn donation(&self, id: i32) -> ResultEngine<Donation> {
        self.store
            .donation(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("donation".to_string()))
    }

    pub async fn donations_by_campaign(&self, campaign_id: i32) -> ResultEngine<Vec<Donation>> {
        self.store.donations_by_campaign(campaign_id).await
    }

    pub async fn donations_by_user(&self, donor_id: i32) -> ResultEngine<Vec<Donation>> {
        self.store.donations_by_user(donor_id).await
    }

    /// Derived numbers for one campaign: progress, days left, donor counts.
    pub async fn campaign_stats(&self, id: i32, now: DateTime<Utc>) -> ResultEngine<CampaignStats> {
        let campaign = self.campaign(id).await?;
        let donations = self.store.donations_by_campaign(id).await?;
        Ok(CampaignStats {
            progress_percent: query::progress_percent(campaign.raised_amount, campaign.goal),
            days_left: query::days_left(campaign.end_date, now),
            donation_count: donations.len(),
            unique_donor_count: query::unique_donors(&donations),
        })
    }

    // ── Categories ──────────────────────────────────────────────────────

    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        self.store.categories().await
    }

    pub async fn create_category(&self, new: NewCategory) -> ResultEngine<Category> {
        if new.name.trim().is_empty() {
            return Err(EngineError::Validation("name is required".to_string()));
        }
        self.store.create_category(new).await
    }

    async fn seed_categories(&self) -> ResultEngine<()> {
        if !self.store.categories().await?.is_empty() {
            return Ok(());
        }
        tracing::info!("seeding default categories");
        for category in default_categories() {
            self.store.create_category(category).await?;
        }
        Ok(())
    }
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn Store>>,
}

impl EngineBuilder {
    /// Pass the storage backend.
    pub fn store(mut self, store: Arc<dyn Store>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`, seeding the default categories when the store
    /// has none.
    pub async fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Validation("store is required".to_string()))?;
        let engine = Engine { store };
        engine.seed_categories().await?;
        Ok(engine)
    }
}
