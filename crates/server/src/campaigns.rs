//! Campaign API endpoints

use api_types::campaign::{
    CampaignListParams, CampaignNew, CampaignStatsView, CampaignUpdate, CampaignView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Campaign, NewCampaign, SortKey, query::CampaignFilter};

use crate::{
    Message, ServerError,
    server::{CurrentUser, ServerState},
};

pub(crate) fn view(campaign: Campaign) -> CampaignView {
    CampaignView {
        id: campaign.id,
        title: campaign.title,
        description: campaign.description,
        category: campaign.category,
        image_url: campaign.image_url,
        goal: campaign.goal,
        raised_amount: campaign.raised_amount,
        creator_id: campaign.creator_id,
        is_active: campaign.is_active,
        end_date: campaign.end_date,
        created_at: campaign.created_at,
    }
}

/// Handle requests for browsing campaigns
///
/// Filtering and ordering run in the engine's query module over the full
/// collection; absent params mean "everything, newest first".
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<CampaignListParams>,
) -> Result<Json<Vec<CampaignView>>, ServerError> {
    let sort = match params.sort.as_deref() {
        Some(raw) => SortKey::try_from(raw)?,
        None => SortKey::Newest,
    };
    let filter = CampaignFilter {
        category: params.category,
        search: params.search,
    };

    let campaigns = state.engine.campaigns().await?;
    let campaigns = engine::query::filter_and_sort(&campaigns, &filter, sort);

    Ok(Json(campaigns.into_iter().map(view).collect()))
}

/// Handle requests for one campaign
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<CampaignView>, ServerError> {
    let campaign = state.engine.campaign(id).await?;
    Ok(Json(view(campaign)))
}

/// Handle requests for a campaign's derived numbers
pub async fn stats(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<CampaignStatsView>, ServerError> {
    let stats = state.engine.campaign_stats(id, Utc::now()).await?;

    Ok(Json(CampaignStatsView {
        progress_percent: stats.progress_percent,
        days_left: stats.days_left,
        donation_count: stats.donation_count,
        unique_donor_count: stats.unique_donor_count,
    }))
}

/// Handle requests for campaigns in one category
pub async fn list_by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<CampaignView>>, ServerError> {
    let campaigns = state.engine.campaigns_by_category(&category).await?;
    Ok(Json(campaigns.into_iter().map(view).collect()))
}

/// Handle requests for campaigns by one creator
pub async fn list_by_creator(
    State(state): State<ServerState>,
    Path(creator_id): Path<i32>,
) -> Result<Json<Vec<CampaignView>>, ServerError> {
    let campaigns = state.engine.campaigns_by_creator(creator_id).await?;
    Ok(Json(campaigns.into_iter().map(view).collect()))
}

/// Handle requests for creating a campaign
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<CampaignNew>,
) -> Result<(StatusCode, Json<CampaignView>), ServerError> {
    let campaign = state
        .engine
        .create_campaign(NewCampaign {
            title: payload.title,
            description: payload.description,
            category: payload.category,
            image_url: payload.image_url,
            goal: payload.goal,
            creator_id: user.id,
            is_active: payload.is_active,
            end_date: payload.end_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(campaign))))
}

/// Handle requests for editing a campaign (creator only)
pub async fn update(
    CurrentUser(user): CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<CampaignUpdate>,
) -> Result<Json<CampaignView>, ServerError> {
    let campaign = state
        .engine
        .update_campaign(
            id,
            engine::CampaignUpdate {
                title: payload.title,
                description: payload.description,
                category: payload.category,
                image_url: payload.image_url,
                goal: payload.goal,
                is_active: payload.is_active,
                end_date: payload.end_date,
            },
            user.id,
        )
        .await?;

    Ok(Json(view(campaign)))
}

/// Handle requests for deleting a campaign (creator only)
pub async fn delete(
    CurrentUser(user): CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_campaign(id, user.id).await?;

    Ok(Json(Message {
        message: "Campaign deleted successfully".to_string(),
    }))
}
