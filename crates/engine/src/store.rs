//! Storage contract shared by the in-memory and sea-orm backends.
//!
//! Both implementations must satisfy the same invariants: read-after-write
//! visibility, unique username/email/category name, and an atomic
//! [`record_donation`] so concurrent donations never lose an increment.
//!
//! [`record_donation`]: Store::record_donation

use async_trait::async_trait;

use crate::{
    Campaign, CampaignUpdate, Category, Donation, NewCampaign, NewCategory, NewDonation, NewUser,
    ResultEngine, User, UserUpdate,
};

pub mod memory;
pub mod sql;

pub use memory::MemStore;
pub use sql::SqlStore;

#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn user(&self, id: i32) -> ResultEngine<Option<User>>;
    /// Lookup by username, compared case-insensitively.
    async fn user_by_username(&self, username: &str) -> ResultEngine<Option<User>>;
    /// Inserts a user. Fails with `ExistingKey` on a duplicate username
    /// (case-insensitive) or email.
    async fn create_user(&self, new: NewUser) -> ResultEngine<User>;
    async fn update_user(&self, id: i32, update: UserUpdate) -> ResultEngine<Option<User>>;

    // Campaigns
    async fn campaign(&self, id: i32) -> ResultEngine<Option<Campaign>>;
    async fn campaigns(&self) -> ResultEngine<Vec<Campaign>>;
    async fn campaigns_by_category(&self, category: &str) -> ResultEngine<Vec<Campaign>>;
    async fn campaigns_by_creator(&self, creator_id: i32) -> ResultEngine<Vec<Campaign>>;
    async fn create_campaign(&self, new: NewCampaign) -> ResultEngine<Campaign>;
    async fn update_campaign(
        &self,
        id: i32,
        update: CampaignUpdate,
    ) -> ResultEngine<Option<Campaign>>;
    async fn delete_campaign(&self, id: i32) -> ResultEngine<bool>;

    // Donations
    async fn donation(&self, id: i32) -> ResultEngine<Option<Donation>>;
    async fn donations_by_campaign(&self, campaign_id: i32) -> ResultEngine<Vec<Donation>>;
    async fn donations_by_user(&self, donor_id: i32) -> ResultEngine<Vec<Donation>>;
    /// Persists the donation and applies both aggregate updates (campaign
    /// `raised_amount`, donor `donation_count`/`total_donated`) as one
    /// atomic unit. A failed aggregate update leaves no donation row behind.
    async fn record_donation(&self, new: NewDonation) -> ResultEngine<Donation>;

    // Categories
    async fn category(&self, id: i32) -> ResultEngine<Option<Category>>;
    /// Lookup by name, compared case-insensitively.
    async fn category_by_name(&self, name: &str) -> ResultEngine<Option<Category>>;
    async fn categories(&self) -> ResultEngine<Vec<Category>>;
    async fn create_category(&self, new: NewCategory) -> ResultEngine<Category>;
}
