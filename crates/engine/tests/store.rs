//! Store invariants, run against both backends.
//!
//! Every test exercises the map-backed store and the sea-orm store through
//! the same `Engine`, so a behavior divergence between backends fails here.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Database;

use engine::{
    Engine, EngineError, MemStore, NewCampaign, NewDonation, NewUser, SqlStore, Store,
};
use migration::MigratorTrait;

async fn mem_engine() -> Engine {
    Engine::builder()
        .store(Arc::new(MemStore::new()))
        .build()
        .await
        .unwrap()
}

async fn sql_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .store(Arc::new(SqlStore::new(db)))
        .build()
        .await
        .unwrap()
}

async fn engines() -> Vec<Engine> {
    vec![mem_engine().await, sql_engine().await]
}

fn user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "secret".to_string(),
        email: format!("{username}@example.com"),
        full_name: format!("{username} Example"),
        avatar_url: None,
        bio: None,
        role: None,
    }
}

fn campaign(title: &str, creator_id: i32, goal: f64) -> NewCampaign {
    NewCampaign {
        title: title.to_string(),
        description: format!("{title} description"),
        category: "Community".to_string(),
        image_url: None,
        goal,
        creator_id,
        is_active: None,
        end_date: None,
    }
}

fn donation(campaign_id: i32, donor_id: i32, amount: f64) -> NewDonation {
    NewDonation {
        amount,
        campaign_id,
        donor_id,
        message: None,
        is_anonymous: None,
    }
}

#[tokio::test]
async fn register_defaults_and_read_back() {
    for engine in engines().await {
        let created = engine.register(user("alice")).await.unwrap();
        assert_eq!(created.role, "donor");
        assert_eq!(created.donation_count, 0);
        assert_eq!(created.total_donated, 0.0);

        let fetched = engine.user(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.email, "alice@example.com");
    }
}

#[tokio::test]
async fn duplicate_username_is_rejected_case_insensitively() {
    for engine in engines().await {
        engine.register(user("alice")).await.unwrap();

        let mut dup = user("ALICE");
        dup.email = "other@example.com".to_string();
        let err = engine.register(dup).await.unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)));
    }
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    for engine in engines().await {
        engine.register(user("alice")).await.unwrap();

        let mut dup = user("bob");
        dup.email = "alice@example.com".to_string();
        let err = engine.register(dup).await.unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)));
    }
}

#[tokio::test]
async fn authenticate_checks_password() {
    for engine in engines().await {
        engine.register(user("alice")).await.unwrap();

        assert!(engine.authenticate("alice", "secret").await.unwrap().is_some());
        assert!(engine.authenticate("alice", "wrong").await.unwrap().is_none());
        assert!(engine.authenticate("nobody", "secret").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn donation_updates_campaign_and_donor_aggregates() {
    for engine in engines().await {
        let creator = engine.register(user("creator")).await.unwrap();
        let donor = engine.register(user("donor")).await.unwrap();
        let campaign = engine
            .create_campaign(campaign("Clean Water", creator.id, 1000.0))
            .await
            .unwrap();

        let recorded = engine
            .donate(donation(campaign.id, donor.id, 50.0))
            .await
            .unwrap();
        assert_eq!(recorded.amount, 50.0);
        assert!(!recorded.is_anonymous);

        let campaign = engine.campaign(campaign.id).await.unwrap();
        assert_eq!(campaign.raised_amount, 50.0);

        let donor = engine.user(donor.id).await.unwrap();
        assert_eq!(donor.donation_count, 1);
        assert_eq!(donor.total_donated, 50.0);

        let by_campaign = engine.donations_by_campaign(campaign.id).await.unwrap();
        assert_eq!(by_campaign.len(), 1);
        let by_user = engine.donations_by_user(donor.id).await.unwrap();
        assert_eq!(by_user.len(), 1);
        assert_eq!(by_user[0].id, recorded.id);
    }
}

#[tokio::test]
async fn concurrent_donations_keep_aggregates_consistent() {
    for engine in engines().await {
        let engine = Arc::new(engine);
        let creator = engine.register(user("creator")).await.unwrap();
        let donor = engine.register(user("donor")).await.unwrap();
        let campaign = engine
            .create_campaign(campaign("Marathon", creator.id, 1000.0))
            .await
            .unwrap();

        let (a, b, c) = tokio::join!(
            engine.donate(donation(campaign.id, donor.id, 100.0)),
            engine.donate(donation(campaign.id, donor.id, 10.0)),
            engine.donate(donation(campaign.id, donor.id, 10.0)),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let campaign = engine.campaign(campaign.id).await.unwrap();
        assert_eq!(campaign.raised_amount, 120.0);

        let donor = engine.user(donor.id).await.unwrap();
        assert_eq!(donor.donation_count, 3);
        assert_eq!(donor.total_donated, 120.0);
    }
}

#[tokio::test]
async fn donation_requires_positive_amount() {
    for engine in engines().await {
        let creator = engine.register(user("creator")).await.unwrap();
        let campaign = engine
            .create_campaign(campaign("Books", creator.id, 100.0))
            .await
            .unwrap();

        for amount in [0.0, -5.0] {
            let err = engine
                .donate(donation(campaign.id, creator.id, amount))
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)));
        }
    }
}

#[tokio::test]
async fn donation_to_inactive_campaign_is_rejected() {
    for engine in engines().await {
        let creator = engine.register(user("creator")).await.unwrap();
        let mut new = campaign("Closed", creator.id, 100.0);
        new.is_active = Some(false);
        let campaign = engine.create_campaign(new).await.unwrap();

        let err = engine
            .donate(donation(campaign.id, creator.id, 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        // Nothing was recorded.
        assert!(engine.donations_by_campaign(campaign.id).await.unwrap().is_empty());
        let creator = engine.user(creator.id).await.unwrap();
        assert_eq!(creator.donation_count, 0);
    }
}

#[tokio::test]
async fn donation_to_unknown_campaign_is_rejected() {
    for engine in engines().await {
        let donor = engine.register(user("donor")).await.unwrap();
        let err = engine.donate(donation(999, donor.id, 10.0)).await.unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
    }
}

#[tokio::test]
async fn only_creator_may_update_or_delete() {
    for engine in engines().await {
        let creator = engine.register(user("creator")).await.unwrap();
        let other = engine.register(user("other")).await.unwrap();
        let campaign = engine
            .create_campaign(campaign("Garden", creator.id, 100.0))
            .await
            .unwrap();

        let update = engine::CampaignUpdate {
            title: Some("Community Garden".to_string()),
            ..Default::default()
        };
        let err = engine
            .update_campaign(campaign.id, update.clone(), other.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));

        let err = engine.delete_campaign(campaign.id, other.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));

        let updated = engine
            .update_campaign(campaign.id, update, creator.id)
            .await
            .unwrap();
        assert_eq!(updated.title, "Community Garden");
        assert_eq!(updated.goal, 100.0);

        engine.delete_campaign(campaign.id, creator.id).await.unwrap();
        let err = engine.campaign(campaign.id).await.unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
    }
}

#[tokio::test]
async fn campaign_listings_filter_by_category_and_creator() {
    for engine in engines().await {
        let alice = engine.register(user("alice")).await.unwrap();
        let bob = engine.register(user("bob")).await.unwrap();

        engine
            .create_campaign(campaign("A", alice.id, 100.0))
            .await
            .unwrap();
        let mut edu = campaign("B", bob.id, 100.0);
        edu.category = "Education".to_string();
        engine.create_campaign(edu).await.unwrap();

        let community = engine.campaigns_by_category("Community").await.unwrap();
        assert_eq!(community.len(), 1);
        assert_eq!(community[0].title, "A");

        let bobs = engine.campaigns_by_creator(bob.id).await.unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].title, "B");

        assert_eq!(engine.campaigns().await.unwrap().len(), 2);
    }
}

#[tokio::test]
async fn default_categories_are_seeded_once() {
    for engine in engines().await {
        let categories = engine.categories().await.unwrap();
        assert_eq!(categories.len(), 6);
        assert!(categories.iter().any(|c| c.name == "Education"));
        assert!(categories.iter().any(|c| c.name == "Animal Welfare"));

        // Rebuilding over the same store must not duplicate the seeds.
        let store: Arc<dyn Store> = engine.store();
        let engine = Engine::builder().store(store).build().await.unwrap();
        assert_eq!(engine.categories().await.unwrap().len(), 6);
    }
}

#[tokio::test]
async fn profile_update_is_partial() {
    for engine in engines().await {
        let created = engine.register(user("alice")).await.unwrap();

        let updated = engine
            .update_profile(
                created.id,
                engine::UserUpdate {
                    full_name: Some("Alice Cooper".to_string()),
                    avatar_url: None,
                    bio: Some("Raising funds since 2026".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Alice Cooper");
        assert_eq!(updated.bio.as_deref(), Some("Raising funds since 2026"));
        assert_eq!(updated.avatar_url, None);
        assert_eq!(updated.username, "alice");

        // An empty update is a no-op, not an error.
        let unchanged = engine
            .update_profile(created.id, engine::UserUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged.full_name, "Alice Cooper");

        let err = engine
            .update_profile(999, engine::UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
    }
}

#[tokio::test]
async fn donation_and_category_lookups() {
    for engine in engines().await {
        let creator = engine.register(user("creator")).await.unwrap();
        let funded = engine
            .create_campaign(campaign("Well", creator.id, 100.0))
            .await
            .unwrap();
        let recorded = engine
            .donate(donation(funded.id, creator.id, 10.0))
            .await
            .unwrap();

        let fetched = engine.donation(recorded.id).await.unwrap();
        assert_eq!(fetched.amount, 10.0);
        assert_eq!(fetched.campaign_id, funded.id);

        let err = engine.donation(999).await.unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));

        let store = engine.store();
        let education = store
            .category_by_name("eDuCaTiOn")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(education.name, "Education");
        let by_id = store.category(education.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Education");
        assert!(store.category_by_name("Gaming").await.unwrap().is_none());
        assert!(store.category(999).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn store_updates_of_missing_rows_return_none() {
    for engine in engines().await {
        let store = engine.store();

        let update = engine::CampaignUpdate {
            title: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update_campaign(999, update).await.unwrap(), None);

        let update = engine::UserUpdate {
            bio: Some("ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update_user(999, update).await.unwrap(), None);
    }
}

#[tokio::test]
async fn campaign_stats_reflect_donations() {
    for engine in engines().await {
        let creator = engine.register(user("creator")).await.unwrap();
        let donor_a = engine.register(user("first")).await.unwrap();
        let donor_b = engine.register(user("second")).await.unwrap();
        let campaign = engine
            .create_campaign(campaign("Well", creator.id, 1000.0))
            .await
            .unwrap();

        engine.donate(donation(campaign.id, donor_a.id, 30.0)).await.unwrap();
        engine.donate(donation(campaign.id, donor_a.id, 10.0)).await.unwrap();
        engine.donate(donation(campaign.id, donor_b.id, 10.0)).await.unwrap();

        let stats = engine.campaign_stats(campaign.id, Utc::now()).await.unwrap();
        assert_eq!(stats.progress_percent, 5.0);
        assert_eq!(stats.days_left, None);
        assert_eq!(stats.donation_count, 3);
        assert_eq!(stats.unique_donor_count, 2);
    }
}
