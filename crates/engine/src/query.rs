//! Campaign browsing: filter, sort, derived values, paging window.
//!
//! Everything here is pure over campaign/donation slices; the store is not
//! consulted. Sorts are stable, so campaigns that compare equal keep the
//! order of the input collection.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Campaign, Donation, EngineError};

/// How many campaigns each "load more" step reveals.
pub const PAGE_SIZE: usize = 6;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CampaignFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl CampaignFilter {
    /// A campaign passes when the category matches (or the filter is
    /// absent/"all") and the search query is a case-insensitive substring of
    /// the title or description (or empty).
    pub fn matches(&self, campaign: &Campaign) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some("") | Some("all") => true,
            Some(category) => campaign.category == category,
        };
        let search_ok = match self.search.as_deref() {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                campaign.title.to_lowercase().contains(&query)
                    || campaign.description.to_lowercase().contains(&query)
            }
        };
        category_ok && search_ok
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    MostFunded,
    LeastFunded,
    TargetAmount,
    Progress,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::MostFunded => "most-funded",
            Self::LeastFunded => "least-funded",
            Self::TargetAmount => "target-amount",
            Self::Progress => "progress",
        }
    }
}

impl TryFrom<&str> for SortKey {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "most-funded" => Ok(Self::MostFunded),
            "least-funded" => Ok(Self::LeastFunded),
            "target-amount" => Ok(Self::TargetAmount),
            "progress" => Ok(Self::Progress),
            other => Err(EngineError::Validation(format!(
                "invalid sort key: {other}"
            ))),
        }
    }
}

fn funded_ratio(campaign: &Campaign) -> f64 {
    if campaign.goal <= 0.0 {
        0.0
    } else {
        campaign.raised_amount / campaign.goal
    }
}

/// Applies the filter predicate and the sort key, keeping input order for
/// ties (`sort_by` is stable).
pub fn filter_and_sort(
    campaigns: &[Campaign],
    filter: &CampaignFilter,
    sort: SortKey,
) -> Vec<Campaign> {
    let mut out: Vec<Campaign> = campaigns
        .iter()
        .filter(|campaign| filter.matches(campaign))
        .cloned()
        .collect();

    match sort {
        SortKey::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::MostFunded => out.sort_by(|a, b| b.raised_amount.total_cmp(&a.raised_amount)),
        SortKey::LeastFunded => out.sort_by(|a, b| a.raised_amount.total_cmp(&b.raised_amount)),
        SortKey::TargetAmount => out.sort_by(|a, b| b.goal.total_cmp(&a.goal)),
        SortKey::Progress => out.sort_by(|a, b| funded_ratio(b).total_cmp(&funded_ratio(a))),
    }
    out
}

/// Funding progress as a percentage clamped to `[0, 100]`.
///
/// A non-positive goal is defined as progress 0, never a division error.
pub fn progress_percent(raised: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        0.0
    } else {
        (raised / goal * 100.0).clamp(0.0, 100.0)
    }
}

/// Whole days until the end date, rounded up and clamped to zero.
/// `None` when the campaign has no deadline.
pub fn days_left(end_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    end_date.map(|end| {
        let seconds = (end - now).num_seconds();
        if seconds <= 0 {
            0
        } else {
            (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
        }
    })
}

/// Number of distinct donors among a campaign's donations.
pub fn unique_donors(donations: &[Donation]) -> usize {
    donations
        .iter()
        .map(|donation| donation.donor_id)
        .collect::<HashSet<_>>()
        .len()
}

/// Derived, on-demand numbers for one campaign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CampaignStats {
    pub progress_percent: f64,
    pub days_left: Option<i64>,
    pub donation_count: usize,
    pub unique_donor_count: usize,
}

/// View state for a browse page: filter, sort, and a visible window that
/// grows by [`PAGE_SIZE`] per request.
///
/// Changing the category or search resets the window to the first page;
/// changing the sort does not.
#[derive(Clone, Debug)]
pub struct Browser {
    filter: CampaignFilter,
    sort: SortKey,
    visible: usize,
}

impl Browser {
    pub fn new() -> Self {
        Self {
            filter: CampaignFilter::default(),
            sort: SortKey::Newest,
            visible: PAGE_SIZE,
        }
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.filter.category = Some(category.into());
        self.visible = PAGE_SIZE;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = Some(search.into());
        self.visible = PAGE_SIZE;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn load_more(&mut self) {
        self.visible += PAGE_SIZE;
    }

    pub fn visible(&self, campaigns: &[Campaign]) -> Vec<Campaign> {
        let mut out = filter_and_sort(campaigns, &self.filter, self.sort);
        out.truncate(self.visible);
        out
    }

    pub fn has_more(&self, campaigns: &[Campaign]) -> bool {
        filter_and_sort(campaigns, &self.filter, self.sort).len() > self.visible
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn campaign(id: i32, title: &str, category: &str, raised: f64, goal: f64) -> Campaign {
        Campaign {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            category: category.to_string(),
            image_url: None,
            goal,
            raised_amount: raised,
            creator_id: 1,
            is_active: true,
            end_date: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(id as i64),
        }
    }

    #[test]
    fn filter_by_category_and_search() {
        let campaigns = vec![
            campaign(1, "New park benches", "Education", 0.0, 100.0),
            campaign(2, "School park trip", "Education", 0.0, 100.0),
            campaign(3, "Park cleanup", "Community", 0.0, 100.0),
            campaign(4, "Textbooks", "Education", 0.0, 100.0),
        ];
        let filter = CampaignFilter {
            category: Some("Education".to_string()),
            search: Some("PARK".to_string()),
        };
        let out = filter_and_sort(&campaigns, &filter, SortKey::Oldest);
        let ids: Vec<i32> = out.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn category_all_matches_everything() {
        let campaigns = vec![
            campaign(1, "A", "Education", 0.0, 100.0),
            campaign(2, "B", "Community", 0.0, 100.0),
        ];
        let filter = CampaignFilter {
            category: Some("all".to_string()),
            search: None,
        };
        assert_eq!(filter_and_sort(&campaigns, &filter, SortKey::Oldest).len(), 2);
    }

    #[test]
    fn most_funded_orders_descending() {
        let campaigns = vec![
            campaign(1, "A", "Community", 50.0, 100.0),
            campaign(2, "B", "Community", 200.0, 100.0),
            campaign(3, "C", "Community", 10.0, 100.0),
        ];
        let out = filter_and_sort(&campaigns, &CampaignFilter::default(), SortKey::MostFunded);
        let raised: Vec<f64> = out.iter().map(|c| c.raised_amount).collect();
        assert_eq!(raised, vec![200.0, 50.0, 10.0]);
    }

    #[test]
    fn progress_orders_by_ratio() {
        let campaigns = vec![
            campaign(1, "A", "Community", 50.0, 100.0),
            campaign(2, "B", "Community", 90.0, 100.0),
            campaign(3, "C", "Community", 10.0, 100.0),
        ];
        let out = filter_and_sort(&campaigns, &CampaignFilter::default(), SortKey::Progress);
        let ids: Vec<i32> = out.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn progress_sort_ranks_zero_goal_last() {
        let campaigns = vec![
            campaign(1, "A", "Community", 50.0, 0.0),
            campaign(2, "B", "Community", 10.0, 100.0),
        ];
        let out = filter_and_sort(&campaigns, &CampaignFilter::default(), SortKey::Progress);
        let ids: Vec<i32> = out.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn sort_ties_keep_input_order() {
        let campaigns = vec![
            campaign(7, "A", "Community", 100.0, 500.0),
            campaign(3, "B", "Community", 100.0, 500.0),
            campaign(9, "C", "Community", 100.0, 500.0),
        ];
        let out = filter_and_sort(&campaigns, &CampaignFilter::default(), SortKey::MostFunded);
        let ids: Vec<i32> = out.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 3, 9]);
    }

    #[test]
    fn newest_orders_by_created_at_descending() {
        let campaigns = vec![
            campaign(1, "A", "Community", 0.0, 100.0),
            campaign(3, "C", "Community", 0.0, 100.0),
            campaign(2, "B", "Community", 0.0, 100.0),
        ];
        let out = filter_and_sort(&campaigns, &CampaignFilter::default(), SortKey::Newest);
        let ids: Vec<i32> = out.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn progress_percent_clamps_and_handles_zero_goal() {
        assert_eq!(progress_percent(50.0, 100.0), 50.0);
        assert_eq!(progress_percent(250.0, 100.0), 100.0);
        assert_eq!(progress_percent(50.0, 0.0), 0.0);
        assert_eq!(progress_percent(50.0, -10.0), 0.0);
    }

    #[test]
    fn days_left_rounds_up_and_clamps() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(days_left(None, now), None);
        assert_eq!(
            days_left(Some(now + chrono::Duration::hours(1)), now),
            Some(1)
        );
        assert_eq!(
            days_left(Some(now + chrono::Duration::days(3)), now),
            Some(3)
        );
        assert_eq!(
            days_left(Some(now - chrono::Duration::days(2)), now),
            Some(0)
        );
    }

    #[test]
    fn unique_donors_counts_distinct_ids() {
        let donation = |id, donor_id| Donation {
            id,
            amount: 10.0,
            campaign_id: 1,
            donor_id,
            message: None,
            is_anonymous: false,
            created_at: Utc::now(),
        };
        let donations = vec![donation(1, 5), donation(2, 5), donation(3, 8)];
        assert_eq!(unique_donors(&donations), 2);
    }

    #[test]
    fn sort_key_parses_kebab_case() {
        assert_eq!(SortKey::try_from("most-funded").unwrap(), SortKey::MostFunded);
        assert_eq!(SortKey::try_from("target-amount").unwrap(), SortKey::TargetAmount);
        assert!(SortKey::try_from("bogus").is_err());
    }

    #[test]
    fn browser_window_grows_and_resets() {
        let campaigns: Vec<Campaign> = (1..=14)
            .map(|id| campaign(id, &format!("C{id}"), "Community", 0.0, 100.0))
            .collect();

        let mut browser = Browser::new();
        assert_eq!(browser.visible(&campaigns).len(), PAGE_SIZE);
        assert!(browser.has_more(&campaigns));

        browser.load_more();
        assert_eq!(browser.visible(&campaigns).len(), 2 * PAGE_SIZE);

        // Sort changes keep the window.
        browser.set_sort(SortKey::MostFunded);
        assert_eq!(browser.visible(&campaigns).len(), 2 * PAGE_SIZE);

        // Search changes reset it.
        browser.set_search("C1");
        assert_eq!(browser.visible(&campaigns).len(), PAGE_SIZE);

        browser.set_category("Community");
        browser.set_search("");
        browser.load_more();
        browser.load_more();
        assert_eq!(browser.visible(&campaigns).len(), 14);
        assert!(!browser.has_more(&campaigns));
    }
}
