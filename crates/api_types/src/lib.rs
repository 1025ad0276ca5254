//! Wire types for the HTTP API.
//!
//! All payloads serialize as camelCase JSON. User views never carry the
//! password field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Register {
        pub username: String,
        pub password: String,
        pub email: String,
        pub full_name: String,
        pub avatar_url: Option<String>,
        pub bio: Option<String>,
        pub role: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    /// Public projection of a user; the password never leaves the server.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: i32,
        pub username: String,
        pub email: String,
        pub full_name: String,
        pub avatar_url: Option<String>,
        pub bio: Option<String>,
        pub role: String,
        pub donation_count: i32,
        pub total_donated: f64,
        pub created_at: DateTime<Utc>,
    }

    /// Returned by register and login: the bearer token plus the user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: String,
        pub user: UserView,
    }
}

pub mod campaign {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignNew {
        pub title: String,
        pub description: String,
        pub category: String,
        pub image_url: Option<String>,
        pub goal: f64,
        pub is_active: Option<bool>,
        pub end_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignUpdate {
        pub title: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub image_url: Option<String>,
        pub goal: Option<f64>,
        pub is_active: Option<bool>,
        pub end_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignView {
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

    /// Optional list controls; absent params mean "all, newest first".
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CampaignListParams {
        pub category: Option<String>,
        pub search: Option<String>,
        /// One of newest | oldest | most-funded | least-funded |
        /// target-amount | progress.
        pub sort: Option<String>,
    }

    /// Derived values for one campaign, computed on demand.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CampaignStatsView {
        pub progress_percent: f64,
        /// `None` when the campaign has no deadline.
        pub days_left: Option<i64>,
        pub donation_count: usize,
        pub unique_donor_count: usize,
    }
}

pub mod donation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DonationNew {
        pub amount: f64,
        pub campaign_id: i32,
        pub message: Option<String>,
        pub is_anonymous: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DonationView {
        pub id: i32,
        pub amount: f64,
        pub campaign_id: i32,
        pub donor_id: i32,
        pub message: Option<String>,
        pub is_anonymous: bool,
        pub created_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
        pub icon_name: String,
        pub background_color: String,
        pub text_color: String,
        pub created_at: DateTime<Utc>,
    }
}
