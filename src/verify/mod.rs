//! Read-only verification of previously provisioned entities.
//!
//! Re-queries the API with the same client contract the provisioner uses
//! and cross-checks expected attributes. Issues no mutations; the exit
//! code decision (zero only when every check passes) belongs to the CLI.

use serde_json::Value;
use tracing::info;

use crate::api::types::{Advertiser, Affiliate, AutocompleteResult, Campaign, Organization};
use crate::api::{paths, ApiClient};
use crate::provision::SeedData;

/// One verification check and its outcome.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.passed)
}

pub struct Verifier<'a> {
    api: &'a ApiClient,
    expected: &'a SeedData,
}

impl<'a> Verifier<'a> {
    pub fn new(api: &'a ApiClient, expected: &'a SeedData) -> Self {
        Self { api, expected }
    }

    /// Run every check. Like provisioning, verification never stops at the
    /// first problem; the full picture comes back in one pass.
    pub async fn run(&self) -> Vec<CheckResult> {
        let mut results = Vec::new();

        let healthy = self.api.health().await;
        results.push(if healthy {
            CheckResult::pass("api health", "API is responding")
        } else {
            CheckResult::fail("api health", "health endpoint did not answer")
        });
        if !healthy {
            // Without a live API every later check would fail with noise.
            return results;
        }

        let organizations = self.organizations(&mut results).await;
        let advertisers = self.advertisers(&mut results, &organizations).await;
        self.affiliates(&mut results, &organizations).await;
        self.campaigns(&mut results, &advertisers).await;
        self.autocomplete(&mut results).await;

        info!(
            checks = results.len(),
            failed = results.iter().filter(|r| !r.passed).count(),
            "verification completed"
        );
        results
    }

    async fn organizations(&self, results: &mut Vec<CheckResult>) -> Vec<Organization> {
        let Some(listed) = self.api.list(paths::ORGANIZATIONS, "organizations").await else {
            results.push(CheckResult::fail(
                "organizations",
                "failed to list organizations",
            ));
            return Vec::new();
        };
        let organizations: Vec<Organization> = deserialize_all(listed);

        for expected in &self.expected.organizations {
            let name = format!("organization {}", expected.name);
            match organizations.iter().find(|o| o.name == expected.name) {
                Some(org) if org.org_type == expected.org_type => {
                    results.push(CheckResult::pass(
                        name,
                        format!("found with id {} and type {}", org.organization_id, org.org_type),
                    ));
                }
                Some(org) => {
                    results.push(CheckResult::fail(
                        name,
                        format!("type mismatch: {} != {}", org.org_type, expected.org_type),
                    ));
                }
                None => results.push(CheckResult::fail(name, "not found")),
            }
        }
        organizations
    }

    async fn advertisers(
        &self,
        results: &mut Vec<CheckResult>,
        organizations: &[Organization],
    ) -> Vec<Advertiser> {
        let Some(listed) = self.api.list(paths::ADVERTISERS, "advertisers").await else {
            results.push(CheckResult::fail("advertisers", "failed to list advertisers"));
            return Vec::new();
        };
        let advertisers: Vec<Advertiser> = deserialize_all(listed);

        for expected in &self.expected.advertisers {
            let name = format!("advertiser {}", expected.name);
            let Some(org) = organizations.iter().find(|o| o.name == expected.organization)
            else {
                results.push(CheckResult::fail(
                    name,
                    format!("parent organization {} not found", expected.organization),
                ));
                continue;
            };
            match advertisers
                .iter()
                .find(|a| a.name == expected.name && a.organization_id == org.organization_id)
            {
                Some(adv) => results.push(CheckResult::pass(
                    name,
                    format!("found with id {} under {}", adv.advertiser_id, org.name),
                )),
                None => results.push(CheckResult::fail(name, "not found in organization scope")),
            }
        }
        advertisers
    }

    async fn affiliates(&self, results: &mut Vec<CheckResult>, organizations: &[Organization]) {
        let Some(listed) = self.api.list(paths::AFFILIATES, "affiliates").await else {
            results.push(CheckResult::fail("affiliates", "failed to list affiliates"));
            return;
        };
        let affiliates: Vec<Affiliate> = deserialize_all(listed);

        for expected in &self.expected.affiliates {
            let name = format!("affiliate {}", expected.name);
            let Some(org) = organizations.iter().find(|o| o.name == expected.organization)
            else {
                results.push(CheckResult::fail(
                    name,
                    format!("parent organization {} not found", expected.organization),
                ));
                continue;
            };
            match affiliates
                .iter()
                .find(|a| a.name == expected.name && a.organization_id == org.organization_id)
            {
                Some(aff) => results.push(CheckResult::pass(
                    name,
                    format!("found with id {} under {}", aff.affiliate_id, org.name),
                )),
                None => results.push(CheckResult::fail(name, "not found in organization scope")),
            }
        }
    }

    async fn campaigns(&self, results: &mut Vec<CheckResult>, advertisers: &[Advertiser]) {
        let Some(listed) = self.api.list(paths::CAMPAIGNS, "campaigns").await else {
            results.push(CheckResult::fail("campaigns", "failed to list campaigns"));
            return;
        };
        let campaigns: Vec<Campaign> = deserialize_all(listed);

        for expected in &self.expected.campaigns {
            let name = format!("campaign {}", expected.name);
            let Some(advertiser) = advertisers.iter().find(|a| a.name == expected.advertiser)
            else {
                results.push(CheckResult::fail(
                    name,
                    format!("parent advertiser {} not found", expected.advertiser),
                ));
                continue;
            };
            match campaigns
                .iter()
                .find(|c| c.name == expected.name && c.advertiser_id == advertiser.advertiser_id)
            {
                Some(campaign) => results.push(CheckResult::pass(
                    name,
                    format!(
                        "found with id {} under {}",
                        campaign.campaign_id, advertiser.name
                    ),
                )),
                None => results.push(CheckResult::fail(name, "not found in advertiser scope")),
            }
        }
    }

    /// Each seeded analytics record must come back from the autocomplete
    /// search for a prefix of its domain, scoped to its own collection.
    async fn autocomplete(&self, results: &mut Vec<CheckResult>) {
        for record in &self.expected.analytics {
            let query: String = record.domain.chars().take(3).collect();
            let kind = record.scope.prefix();
            let name = format!("autocomplete {query} ({kind})");
            let path = format!(
                "{}?q={}&type={}&limit=10",
                paths::ANALYTICS_AUTOCOMPLETE,
                query.to_lowercase(),
                kind
            );

            let Some(listed) = self.api.list(&path, "data").await else {
                results.push(CheckResult::fail(name, "search failed"));
                continue;
            };
            let matches: Vec<AutocompleteResult> = deserialize_all(listed);
            if matches
                .iter()
                .any(|m| m.name.eq_ignore_ascii_case(&record.domain))
            {
                results.push(CheckResult::pass(
                    name,
                    format!("found {} in results", record.domain),
                ));
            } else {
                results.push(CheckResult::fail(
                    name,
                    format!("{} not found in results", record.domain),
                ));
            }
        }
    }
}

/// Deserialize what fits and skip what does not; verification reports
/// missing entities rather than choking on unrelated rows.
fn deserialize_all<T: serde::de::DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}
