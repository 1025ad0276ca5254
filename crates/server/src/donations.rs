//! Donation API endpoints

use api_types::donation::{DonationNew, DonationView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Donation, EngineError, NewDonation};

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
};

pub(crate) fn view(donation: Donation) -> DonationView {
    DonationView {
        id: donation.id,
        amount: donation.amount,
        campaign_id: donation.campaign_id,
        donor_id: donation.donor_id,
        message: donation.message,
        is_anonymous: donation.is_anonymous,
        created_at: donation.created_at,
    }
}

/// Handle requests for recording a donation
///
/// The donor is always the session user; the body cannot donate on another
/// account's behalf.
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<DonationNew>,
) -> Result<(StatusCode, Json<DonationView>), ServerError> {
    let donation = state
        .engine
        .donate(NewDonation {
            amount: payload.amount,
            campaign_id: payload.campaign_id,
            donor_id: user.id,
            message: payload.message,
            is_anonymous: payload.is_anonymous,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(donation))))
}

/// Handle requests for a campaign's donations
pub async fn list_by_campaign(
    State(state): State<ServerState>,
    Path(campaign_id): Path<i32>,
) -> Result<Json<Vec<DonationView>>, ServerError> {
    let donations = state.engine.donations_by_campaign(campaign_id).await?;
    Ok(Json(donations.into_iter().map(view).collect()))
}

/// Handle requests for a user's donation history (self only)
pub async fn list_by_user(
    CurrentUser(user): CurrentUser,
    State(state): State<ServerState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<DonationView>>, ServerError> {
    if user.id != user_id {
        return Err(EngineError::Forbidden(
            "may only view your own donations".to_string(),
        )
        .into());
    }

    let donations = state.engine.donations_by_user(user_id).await?;
    Ok(Json(donations.into_iter().map(view).collect()))
}
