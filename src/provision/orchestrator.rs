//! Dependency-ordered orchestration of a provisioning run.
//!
//! Stages run strictly sequentially: organizations first, then profiles,
//! advertisers, and affiliates (each gated on organizations), then
//! campaigns (gated on advertisers), then analytics records. An item whose
//! parent never resolved is recorded as precondition-failed and skipped —
//! its creation endpoint is never called — but no failure ever aborts a
//! stage or the run, so the final ledger always reflects every attempted
//! entity.

use serde_json::json;
use tracing::{info, warn};

use crate::api::types::EntityId;
use crate::api::{paths, ApiClient};
use crate::error::OperationError;

use super::ledger::{Category, Ledger, OpResult};
use super::ops::{self, EntityPlan};
use super::seed::{AdvertiserSeed, AffiliateSeed, CampaignSeed, OrganizationSeed, SeedData};

pub struct Orchestrator<'a> {
    api: &'a ApiClient,
    seed: &'a SeedData,
}

impl<'a> Orchestrator<'a> {
    pub fn new(api: &'a ApiClient, seed: &'a SeedData) -> Self {
        Self { api, seed }
    }

    /// Run every stage in dependency order and return the ledger. Always
    /// runs to completion; partial failures are recorded, not escalated.
    pub async fn run(&self) -> Ledger {
        let mut ledger = Ledger::new();
        self.organizations(&mut ledger).await;
        self.profiles(&mut ledger).await;
        self.advertisers(&mut ledger).await;
        self.affiliates(&mut ledger).await;
        self.campaigns(&mut ledger).await;
        self.analytics(&mut ledger).await;
        info!(
            entries = ledger.entries().len(),
            failures = ledger.failures().count(),
            "provisioning run completed"
        );
        ledger
    }

    async fn organizations(&self, ledger: &mut Ledger) {
        info!(count = self.seed.organizations.len(), "stage: organizations");
        for org in &self.seed.organizations {
            let result = ops::ensure(self.api, &organization_plan(org)).await;
            log_item(Category::Organizations, &org.name, &result);
            ledger.record(Category::Organizations, &org.name, result);
        }
    }

    async fn profiles(&self, ledger: &mut Ledger) {
        info!(count = self.seed.profiles.len(), "stage: profiles");
        for profile in &self.seed.profiles {
            let Some(org_id) =
                ledger.resolved_id(Category::Organizations, &profile.organization)
            else {
                let result = precondition_failed("organization", &profile.organization);
                log_item(Category::Profiles, &profile.email, &result);
                ledger.record(Category::Profiles, &profile.email, result);
                continue;
            };

            let payload = json!({
                "id": profile.id,
                "email": profile.email,
                "first_name": profile.first_name,
                "last_name": profile.last_name,
                "role_id": profile.role_id,
                "organization_id": org_id,
            });
            let result = ops::upsert(
                self.api,
                paths::PROFILES_UPSERT,
                &payload,
                EntityId::from(profile.id),
            )
            .await;
            log_item(Category::Profiles, &profile.email, &result);
            ledger.record(Category::Profiles, &profile.email, result);
        }
    }

    async fn advertisers(&self, ledger: &mut Ledger) {
        info!(count = self.seed.advertisers.len(), "stage: advertisers");
        for advertiser in &self.seed.advertisers {
            let Some(org_id) =
                ledger.resolved_id(Category::Organizations, &advertiser.organization)
            else {
                let result = precondition_failed("organization", &advertiser.organization);
                log_item(Category::Advertisers, &advertiser.name, &result);
                ledger.record(Category::Advertisers, &advertiser.name, result);
                continue;
            };

            let plan = advertiser_plan(advertiser, org_id);
            let result = ops::ensure(self.api, &plan).await;
            log_item(Category::Advertisers, &advertiser.name, &result);
            ledger.record(Category::Advertisers, &advertiser.name, result);
        }
    }

    async fn affiliates(&self, ledger: &mut Ledger) {
        info!(count = self.seed.affiliates.len(), "stage: affiliates");
        for affiliate in &self.seed.affiliates {
            let Some(org_id) =
                ledger.resolved_id(Category::Organizations, &affiliate.organization)
            else {
                let result = precondition_failed("organization", &affiliate.organization);
                log_item(Category::Affiliates, &affiliate.name, &result);
                ledger.record(Category::Affiliates, &affiliate.name, result);
                continue;
            };

            let plan = affiliate_plan(affiliate, org_id);
            let result = ops::ensure(self.api, &plan).await;
            log_item(Category::Affiliates, &affiliate.name, &result);
            ledger.record(Category::Affiliates, &affiliate.name, result);
        }
    }

    async fn campaigns(&self, ledger: &mut Ledger) {
        info!(count = self.seed.campaigns.len(), "stage: campaigns");
        for campaign in &self.seed.campaigns {
            let Some(advertiser_id) =
                ledger.resolved_id(Category::Advertisers, &campaign.advertiser)
            else {
                let result = precondition_failed("advertiser", &campaign.advertiser);
                log_item(Category::Campaigns, &campaign.name, &result);
                ledger.record(Category::Campaigns, &campaign.name, result);
                continue;
            };

            // The campaign also carries its organization reference, found
            // through the advertiser's own seed entry.
            let advertiser_seed = self.seed.advertiser_seed(&campaign.advertiser);
            let org_name = advertiser_seed
                .map(|a| a.organization.as_str())
                .unwrap_or(&campaign.advertiser);
            let org_id = advertiser_seed
                .and_then(|a| ledger.resolved_id(Category::Organizations, &a.organization));
            let Some(org_id) = org_id else {
                let result = precondition_failed("organization", org_name);
                log_item(Category::Campaigns, &campaign.name, &result);
                ledger.record(Category::Campaigns, &campaign.name, result);
                continue;
            };

            let plan = campaign_plan(campaign, advertiser_id, org_id);
            let result = ops::ensure(self.api, &plan).await;
            log_item(Category::Campaigns, &campaign.name, &result);
            ledger.record(Category::Campaigns, &campaign.name, result);
        }
    }

    async fn analytics(&self, ledger: &mut Ledger) {
        info!(count = self.seed.analytics.len(), "stage: analytics");
        for record in &self.seed.analytics {
            let result =
                ops::submit_record(self.api, record.scope.endpoint(), &record.metrics).await;
            log_item(Category::Analytics, &record.key(), &result);
            ledger.record(Category::Analytics, record.key(), result);
        }
    }
}

fn precondition_failed(parent_kind: &'static str, parent_name: &str) -> OpResult {
    OpResult::failed(OperationError::PreconditionFailed {
        parent_kind,
        parent_name: parent_name.to_string(),
    })
}

fn log_item(category: Category, key: &str, result: &OpResult) {
    match &result.error {
        None => info!(
            category = category.title(),
            key,
            outcome = result.outcome.label(),
            id = ?result.id,
            "entity resolved"
        ),
        Some(error) => warn!(
            category = category.title(),
            key,
            kind = error.kind(),
            error = %error,
            "entity failed"
        ),
    }
}


fn organization_plan(org: &OrganizationSeed) -> EntityPlan {
    EntityPlan {
        list_path: paths::ORGANIZATIONS.into(),
        wrapper: "organizations",
        create_path: paths::ORGANIZATIONS.into(),
        payload: json!({ "name": org.name, "type": org.org_type }),
        id_field: "organization_id",
        identity: vec![("name", json!(org.name))],
        consistency: vec![("type", json!(org.org_type))],
    }
}

fn advertiser_plan(advertiser: &AdvertiserSeed, org_id: &EntityId) -> EntityPlan {
    let mut payload = json!({
        "name": advertiser.name,
        "organization_id": org_id,
        "contact_email": advertiser.contact_email,
        "status": "active",
    });
    if let Some(billing) = &advertiser.billing_details {
        payload["billing_details"] = billing.clone();
    }
    EntityPlan {
        list_path: paths::ADVERTISERS.into(),
        wrapper: "advertisers",
        create_path: paths::ADVERTISERS.into(),
        payload,
        id_field: "advertiser_id",
        identity: vec![
            ("name", json!(advertiser.name)),
            ("organization_id", json!(org_id)),
        ],
        consistency: vec![],
    }
}

fn affiliate_plan(affiliate: &AffiliateSeed, org_id: &EntityId) -> EntityPlan {
    let mut payload = json!({
        "name": affiliate.name,
        "organization_id": org_id,
        "contact_email": affiliate.contact_email,
        "status": "active",
    });
    if let Some(payment) = &affiliate.payment_details {
        payload["payment_details"] = payment.clone();
    }
    EntityPlan {
        list_path: paths::AFFILIATES.into(),
        wrapper: "affiliates",
        create_path: paths::AFFILIATES.into(),
        payload,
        id_field: "affiliate_id",
        identity: vec![
            ("name", json!(affiliate.name)),
            ("organization_id", json!(org_id)),
        ],
        consistency: vec![],
    }
}

fn campaign_plan(campaign: &CampaignSeed, advertiser_id: &EntityId, org_id: &EntityId) -> EntityPlan {
    let mut payload = json!({
        "name": campaign.name,
        "advertiser_id": advertiser_id,
        "organization_id": org_id,
        "payout_type": campaign.payout_type,
        "payout_amount": campaign.payout_amount,
        "revenue_type": campaign.revenue_type,
        "revenue_amount": campaign.revenue_amount,
        "currency_id": campaign.currency_id,
        "status": "active",
        "visibility": campaign.visibility,
    });
    if let Some(url) = &campaign.destination_url {
        payload["destination_url"] = json!(url);
    }
    if let Some(start) = campaign.start_date {
        payload["start_date"] = json!(start);
    }
    if let Some(end) = campaign.end_date {
        payload["end_date"] = json!(end);
    }
    EntityPlan {
        list_path: paths::CAMPAIGNS.into(),
        wrapper: "campaigns",
        create_path: paths::CAMPAIGNS.into(),
        payload,
        id_field: "campaign_id",
        identity: vec![
            ("name", json!(campaign.name)),
            ("advertiser_id", json!(advertiser_id)),
        ],
        consistency: vec![],
    }
}
