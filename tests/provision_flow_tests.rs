//! End-to-end provisioning flows against the in-memory fake API.

use rust_decimal_macros::dec;
use serde_json::json;
use seedctl::api::paths;
use seedctl::api::types::OrgType;
use seedctl::provision::ops::{self, EntityPlan};
use seedctl::provision::seed::{AdvertiserSeed, CampaignSeed, OrganizationSeed};
use seedctl::provision::{Category, Ledger, Orchestrator, Outcome, RunReport, SeedData};
use seedctl::testkit::{CreateScript, FakeApi};

fn org(name: &str, org_type: OrgType) -> OrganizationSeed {
    OrganizationSeed {
        name: name.into(),
        org_type,
        description: String::new(),
    }
}

fn advertiser(name: &str, organization: &str) -> AdvertiserSeed {
    AdvertiserSeed {
        name: name.into(),
        organization: organization.into(),
        contact_email: format!("ads@{}.test", organization.to_lowercase()),
        billing_details: None,
    }
}

fn campaign(name: &str, advertiser: &str) -> CampaignSeed {
    CampaignSeed {
        name: name.into(),
        advertiser: advertiser.into(),
        payout_type: "cpa".into(),
        payout_amount: dec!(10.00),
        revenue_type: "rpa".into(),
        revenue_amount: dec!(20.00),
        currency_id: "USD".into(),
        visibility: "public".into(),
        destination_url: None,
        start_date: None,
        end_date: None,
    }
}

fn acme_seed() -> SeedData {
    SeedData {
        organizations: vec![org("Acme", OrgType::Advertiser)],
        advertisers: vec![advertiser("Acme Global", "Acme")],
        campaigns: vec![campaign("Acme Launch", "Acme Global")],
        ..SeedData::default()
    }
}

async fn run(fake: &FakeApi, seed: &SeedData) -> Ledger {
    let api = fake.client();
    Orchestrator::new(&api, seed).run().await
}

#[tokio::test]
async fn first_run_creates_every_builtin_entity() {
    let fake = FakeApi::new();
    let seed = SeedData::builtin();
    let ledger = run(&fake, &seed).await;

    assert!(ledger.is_clean(), "failures: {:?}", ledger.failures().collect::<Vec<_>>());
    for entry in ledger.entries() {
        assert_eq!(
            entry.outcome,
            Outcome::Created,
            "{} should be created on an empty store",
            entry.key
        );
    }
    assert_eq!(fake.stored(paths::ORGANIZATIONS), seed.organizations.len());
    assert_eq!(fake.stored(paths::ADVERTISERS), seed.advertisers.len());
    assert_eq!(fake.stored(paths::CAMPAIGNS), seed.campaigns.len());
}

#[tokio::test]
async fn second_run_is_idempotent_with_identical_ids() {
    let fake = FakeApi::new();
    let seed = SeedData::builtin();

    let first = run(&fake, &seed).await;
    let second = run(&fake, &seed).await;

    assert!(second.is_clean());
    for entry in second.entries() {
        assert_ne!(
            entry.outcome,
            Outcome::Created,
            "{} must not be created again",
            entry.key
        );
        match entry.category {
            Category::Profiles => assert_eq!(entry.outcome, Outcome::Updated),
            _ => assert_eq!(entry.outcome, Outcome::AlreadyExists, "{}", entry.key),
        }
    }

    for entry in first.entries() {
        if entry.category == Category::Analytics {
            // no identifier comes back for analytics records
            continue;
        }
        assert_eq!(
            second.resolved_id(entry.category, &entry.key),
            entry.id.as_ref(),
            "id drifted for {}",
            entry.key
        );
    }

    // no duplicates were stored
    assert_eq!(fake.stored(paths::ORGANIZATIONS), seed.organizations.len());
    assert_eq!(fake.stored(paths::AFFILIATES), seed.affiliates.len());
}

#[tokio::test]
async fn creation_race_recovers_to_already_exists() {
    let fake = FakeApi::new();
    let seed = SeedData {
        organizations: vec![org("Acme", OrgType::Advertiser)],
        ..SeedData::default()
    };
    fake.script_create(paths::ORGANIZATIONS, CreateScript::RaceConflict);

    let ledger = run(&fake, &seed).await;
    let entry = ledger.get(Category::Organizations, "Acme").expect("entry");

    assert_eq!(entry.outcome, Outcome::AlreadyExists);
    let concurrent_id = fake.entity_id(paths::ORGANIZATIONS, "Acme").expect("stored");
    assert_eq!(
        ledger.resolved_id(Category::Organizations, "Acme"),
        Some(&seedctl::api::types::EntityId::Number(concurrent_id))
    );
}

#[tokio::test]
async fn phantom_conflict_fails_after_recheck() {
    let fake = FakeApi::new();
    let seed = SeedData {
        organizations: vec![org("Acme", OrgType::Advertiser)],
        ..SeedData::default()
    };
    fake.script_create(paths::ORGANIZATIONS, CreateScript::PhantomConflict);

    let ledger = run(&fake, &seed).await;
    let entry = ledger.get(Category::Organizations, "Acme").expect("entry");

    assert_eq!(entry.outcome, Outcome::Failed);
    let error = entry.error.as_ref().expect("error detail").to_string();
    assert!(error.contains("recheck"), "{error}");
}

#[tokio::test]
async fn failed_parent_gates_children_without_write_calls() {
    let fake = FakeApi::new();
    fake.script_create(
        paths::ORGANIZATIONS,
        CreateScript::Reject {
            status: 500,
            message: "database exploded".into(),
        },
    );

    let ledger = run(&fake, &acme_seed()).await;

    let org_entry = ledger.get(Category::Organizations, "Acme").expect("org");
    assert_eq!(org_entry.outcome, Outcome::Failed);

    let adv_entry = ledger
        .get(Category::Advertisers, "Acme Global")
        .expect("advertiser");
    assert_eq!(adv_entry.outcome, Outcome::Failed);
    assert_eq!(
        adv_entry.error.as_ref().map(|e| e.kind()),
        Some("precondition_failed")
    );

    let campaign_entry = ledger.get(Category::Campaigns, "Acme Launch").expect("campaign");
    assert_eq!(
        campaign_entry.error.as_ref().map(|e| e.kind()),
        Some("precondition_failed")
    );

    // gated items never reach their creation endpoints
    assert_eq!(fake.write_calls(paths::ADVERTISERS), 0);
    assert_eq!(fake.write_calls(paths::CAMPAIGNS), 0);
}

#[tokio::test]
async fn one_failure_does_not_abort_the_stage_or_the_run() {
    let fake = FakeApi::new();
    let seed = SeedData {
        organizations: vec![
            org("Broken", OrgType::Advertiser),
            org("Working", OrgType::Advertiser),
        ],
        advertisers: vec![advertiser("Working Ads", "Working")],
        ..SeedData::default()
    };
    fake.script_create(
        paths::ORGANIZATIONS,
        CreateScript::Reject {
            status: 500,
            message: "boom".into(),
        },
    );

    let ledger = run(&fake, &seed).await;

    assert_eq!(
        ledger.get(Category::Organizations, "Broken").map(|e| e.outcome),
        Some(Outcome::Failed)
    );
    assert_eq!(
        ledger.get(Category::Organizations, "Working").map(|e| e.outcome),
        Some(Outcome::Created)
    );
    assert_eq!(
        ledger.get(Category::Advertisers, "Working Ads").map(|e| e.outcome),
        Some(Outcome::Created)
    );

    let report = RunReport::from_ledger(&ledger);
    assert!(!report.success());
    assert_eq!(report.failures().len(), 1);
}

#[tokio::test]
async fn same_name_under_two_scopes_creates_both() {
    let fake = FakeApi::new();
    let seed = SeedData {
        organizations: vec![
            org("Acme", OrgType::Advertiser),
            org("Globex", OrgType::Advertiser),
        ],
        advertisers: vec![
            advertiser("Shared Media", "Acme"),
            advertiser("Shared Media", "Globex"),
        ],
        ..SeedData::default()
    };

    let ledger = run(&fake, &seed).await;

    let outcomes: Vec<Outcome> = ledger
        .in_category(Category::Advertisers)
        .map(|e| e.outcome)
        .collect();
    assert_eq!(outcomes, vec![Outcome::Created, Outcome::Created]);
    assert_eq!(fake.stored(paths::ADVERTISERS), 2);
}

#[tokio::test]
async fn same_name_in_same_scope_resolves_to_existing() {
    let fake = FakeApi::new();
    let api = fake.client();

    let plan = EntityPlan {
        list_path: paths::ADVERTISERS.into(),
        wrapper: "advertisers",
        create_path: paths::ADVERTISERS.into(),
        payload: json!({ "name": "Shared Media", "organization_id": 1 }),
        id_field: "advertiser_id",
        identity: vec![("name", json!("Shared Media")), ("organization_id", json!(1))],
        consistency: vec![],
    };

    let first = ops::ensure(&api, &plan).await;
    let second = ops::ensure(&api, &plan).await;

    assert_eq!(first.outcome, Outcome::Created);
    assert_eq!(second.outcome, Outcome::AlreadyExists);
    assert_eq!(first.id, second.id);
    assert_eq!(fake.stored(paths::ADVERTISERS), 1);
}

#[tokio::test]
async fn organization_type_mismatch_is_a_conflict_not_a_create() {
    let fake = FakeApi::new();
    let first_seed = SeedData {
        organizations: vec![org("Acme", OrgType::Advertiser)],
        ..SeedData::default()
    };
    run(&fake, &first_seed).await;

    let conflicting = SeedData {
        organizations: vec![org("Acme", OrgType::Affiliate)],
        ..SeedData::default()
    };
    let ledger = run(&fake, &conflicting).await;

    let entry = ledger.get(Category::Organizations, "Acme").expect("entry");
    assert_eq!(entry.outcome, Outcome::Failed);
    assert_eq!(entry.error.as_ref().map(|e| e.kind()), Some("conflict"));
    // the mismatched entity is never mutated and nothing new is created
    assert_eq!(fake.stored(paths::ORGANIZATIONS), 1);
    assert_eq!(fake.write_calls(paths::ORGANIZATIONS), 1);
}

#[tokio::test]
async fn acme_hierarchy_threads_parent_ids() {
    let fake = FakeApi::new();
    let seed = acme_seed();

    let first = run(&fake, &seed).await;
    assert!(first.is_clean());

    let org_id = fake.entity_id(paths::ORGANIZATIONS, "Acme").expect("org id");
    let advertiser = fake.entity(paths::ADVERTISERS, "Acme Global").expect("advertiser");
    assert_eq!(advertiser["organization_id"], json!(org_id));

    let advertiser_id = fake
        .entity_id(paths::ADVERTISERS, "Acme Global")
        .expect("advertiser id");
    let stored_campaign = fake.entity(paths::CAMPAIGNS, "Acme Launch").expect("campaign");
    assert_eq!(stored_campaign["advertiser_id"], json!(advertiser_id));
    assert_eq!(stored_campaign["organization_id"], json!(org_id));

    let second = run(&fake, &seed).await;
    for entry in second.entries() {
        assert_eq!(entry.outcome, Outcome::AlreadyExists, "{}", entry.key);
        assert_eq!(
            entry.id.as_ref(),
            first.resolved_id(entry.category, &entry.key),
            "id drifted for {}",
            entry.key
        );
    }
}

#[tokio::test]
async fn campaign_money_fields_are_sent_as_json_numbers() {
    let fake = FakeApi::new();
    let ledger = run(&fake, &acme_seed()).await;
    assert!(ledger.is_clean());

    // The backend binds payout and revenue amounts as floats; a stringly
    // encoded decimal would be rejected before any handler logic runs.
    let stored = fake.entity(paths::CAMPAIGNS, "Acme Launch").expect("campaign");
    assert!(
        stored["payout_amount"].is_number(),
        "payout_amount sent as {:?}",
        stored["payout_amount"]
    );
    assert!(
        stored["revenue_amount"].is_number(),
        "revenue_amount sent as {:?}",
        stored["revenue_amount"]
    );
    assert_eq!(stored["payout_amount"], json!(10.0));
    assert_eq!(stored["revenue_amount"], json!(20.0));
}

#[tokio::test]
async fn analytics_duplicate_maps_to_already_exists_without_recheck() {
    let fake = FakeApi::new();
    let seed = SeedData::builtin();
    run(&fake, &seed).await;

    let writes_before = fake.write_calls(paths::ANALYTICS_ADVERTISERS);
    let ledger = run(&fake, &seed).await;

    for entry in ledger.in_category(Category::Analytics) {
        assert_eq!(entry.outcome, Outcome::AlreadyExists, "{}", entry.key);
    }
    // exactly one more write per advertiser record, no probe traffic
    assert_eq!(
        fake.write_calls(paths::ANALYTICS_ADVERTISERS),
        writes_before + 2
    );
}
