//! Map-backed store.
//!
//! All state lives behind a single mutex, so every operation, including the
//! whole donation critical section, is serialized. Ids come from per-entity
//! counters inside the same locked state; `BTreeMap` iteration then matches
//! insertion order, which the query engine relies on for stable ties.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    Campaign, CampaignUpdate, Category, Donation, EngineError, NewCampaign, NewCategory,
    NewDonation, NewUser, ResultEngine, User, UserUpdate, users,
};

use super::Store;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i32, User>,
    campaigns: BTreeMap<i32, Campaign>,
    donations: BTreeMap<i32, Donation>,
    categories: BTreeMap<i32, Category>,
    next_user_id: i32,
    next_campaign_id: i32,
    next_donation_id: i32,
    next_category_id: i32,
}

#[derive(Debug)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_user_id: 1,
                next_campaign_id: 1,
                next_donation_id: 1,
                next_category_id: 1,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> ResultEngine<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| EngineError::InvalidState("store mutex poisoned".to_string()))
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn user(&self, id: i32) -> ResultEngine<Option<User>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> ResultEngine<Option<User>> {
        let wanted = username.to_lowercase();
        Ok(self
            .lock()?
            .users
            .values()
            .find(|user| user.username.to_lowercase() == wanted)
            .cloned())
    }

    async fn create_user(&self, new: NewUser) -> ResultEngine<User> {
        let mut inner = self.lock()?;

        let username = new.username.to_lowercase();
        if inner
            .users
            .values()
            .any(|user| user.username.to_lowercase() == username)
        {
            return Err(EngineError::ExistingKey(new.username));
        }
        if inner.users.values().any(|user| user.email == new.email) {
            return Err(EngineError::ExistingKey(new.email));
        }

        let id = inner.next_user_id;
        inner.next_user_id += 1;
        let user = User {
            id,
            username: new.username,
            password: new.password,
            email: new.email,
            full_name: new.full_name,
            avatar_url: new.avatar_url,
            bio: new.bio,
            role: new.role.unwrap_or_else(|| users::DEFAULT_ROLE.to_string()),
            donation_count: 0,
            total_donated: 0.0,
            created_at: Utc::now(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> ResultEngine<Option<User>> {
        let mut inner = self.lock()?;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }
        Ok(Some(user.clone()))
    }

    async fn campaign(&self, id: i32) -> ResultEngine<Option<Campaign>> {
        Ok(self.lock()?.campaigns.get(&id).cloned())
    }

    async fn campaigns(&self) -> ResultEngine<Vec<Campaign>> {
        Ok(self.lock()?.campaigns.values().cloned().collect())
    }

    async fn campaigns_by_category(&self, category: &str) -> ResultEngine<Vec<Campaign>> {
        Ok(self
            .lock()?
            .campaigns
            .values()
            .filter(|campaign| campaign.category == category)
            .cloned()
            .collect())
    }

    async fn campaigns_by_creator(&self, creator_id: i32) -> ResultEngine<Vec<Campaign>> {
        Ok(self
            .lock()?
            .campaigns
            .values()
            .filter(|campaign| campaign.creator_id == creator_id)
            .cloned()
            .collect())
    }

    async fn create_campaign(&self, new: NewCampaign) -> ResultEngine<Campaign> {
        let mut inner = self.lock()?;
        let id = inner.next_campaign_id;
        inner.next_campaign_id += 1;
        let campaign = Campaign {
            id,
            title: new.title,
            description: new.description,
            category: new.category,
            image_url: new.image_url,
            goal: new.goal,
            raised_amount: 0.0,
            creator_id: new.creator_id,
            is_active: new.is_active.unwrap_or(true),
            end_date: new.end_date,
            created_at: Utc::now(),
        };
        inner.campaigns.insert(id, campaign.clone());
        Ok(campaign)
    }

    async fn update_campaign(
        &self,
        id: i32,
        update: CampaignUpdate,
    ) -> ResultEngine<Option<Campaign>> {
        let mut inner = self.lock()?;
        let Some(campaign) = inner.campaigns.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            campaign.title = title;
        }
        if let Some(description) = update.description {
            campaign.description = description;
        }
        if let Some(category) = update.category {
            campaign.category = category;
        }
        if let Some(image_url) = update.image_url {
            campaign.image_url = Some(image_url);
        }
        if let Some(goal) = update.goal {
            campaign.goal = goal;
        }
        if let Some(is_active) = update.is_active {
            campaign.is_active = is_active;
        }
        if let Some(end_date) = update.end_date {
            campaign.end_date = Some(end_date);
        }
        Ok(Some(campaign.clone()))
    }

    async fn delete_campaign(&self, id: i32) -> ResultEngine<bool> {
        Ok(self.lock()?.campaigns.remove(&id).is_some())
    }

    async fn donation(&self, id: i32) -> ResultEngine<Option<Donation>> {
        Ok(self.lock()?.donations.get(&id).cloned())
    }

    async fn donations_by_campaign(&self, campaign_id: i32) -> ResultEngine<Vec<Donation>> {
        Ok(self
            .lock()?
            .donations
            .values()
            .filter(|donation| donation.campaign_id == campaign_id)
            .cloned()
            .collect())
    }

    async fn donations_by_user(&self, donor_id: i32) -> ResultEngine<Vec<Donation>> {
        Ok(self
            .lock()?
            .donations
            .values()
            .filter(|donation| donation.donor_id == donor_id)
            .cloned()
            .collect())
    }

    async fn record_donation(&self, new: NewDonation) -> ResultEngine<Donation> {
        let mut inner = self.lock()?;

        // Both targets are checked before anything is written, so a missing
        // record never leaves a dangling donation row.
        if !inner.campaigns.contains_key(&new.campaign_id) {
            return Err(EngineError::KeyNotFound("campaign".to_string()));
        }
        if !inner.users.contains_key(&new.donor_id) {
            return Err(EngineError::KeyNotFound("user".to_string()));
        }

        let id = inner.next_donation_id;
        inner.next_donation_id += 1;
        let donation = Donation {
            id,
            amount: new.amount,
            campaign_id: new.campaign_id,
            donor_id: new.donor_id,
            message: new.message,
            is_anonymous: new.is_anonymous.unwrap_or(false),
            created_at: Utc::now(),
        };
        inner.donations.insert(id, donation.clone());

        if let Some(campaign) = inner.campaigns.get_mut(&donation.campaign_id) {
            campaign.raised_amount += donation.amount;
        }
        if let Some(user) = inner.users.get_mut(&donation.donor_id) {
            user.donation_count += 1;
            user.total_donated += donation.amount;
        }

        Ok(donation)
    }

    async fn category(&self, id: i32) -> ResultEngine<Option<Category>> {
        Ok(self.lock()?.categories.get(&id).cloned())
    }

    async fn category_by_name(&self, name: &str) -> ResultEngine<Option<Category>> {
        let wanted = name.to_lowercase();
        Ok(self
            .lock()?
            .categories
            .values()
            .find(|category| category.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn categories(&self) -> ResultEngine<Vec<Category>> {
        Ok(self.lock()?.categories.values().cloned().collect())
    }

    async fn create_category(&self, new: NewCategory) -> ResultEngine<Category> {
        let mut inner = self.lock()?;
        let name = new.name.to_lowercase();
        if inner
            .categories
            .values()
            .any(|category| category.name.to_lowercase() == name)
        {
            return Err(EngineError::ExistingKey(new.name));
        }

        let id = inner.next_category_id;
        inner.next_category_id += 1;
        let category = Category {
            id,
            name: new.name,
            icon_name: new.icon_name,
            background_color: new.background_color,
            text_color: new.text_color,
            created_at: Utc::now(),
        };
        inner.categories.insert(id, category.clone());
        Ok(category)
    }
}
