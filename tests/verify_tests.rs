//! Verification checks against the in-memory fake API.

use seedctl::provision::{Orchestrator, SeedData};
use seedctl::testkit::FakeApi;
use seedctl::verify::{all_passed, Verifier};

async fn provision(fake: &FakeApi, seed: &SeedData) {
    let api = fake.client();
    let ledger = Orchestrator::new(&api, seed).run().await;
    assert!(ledger.is_clean(), "fixture provisioning must succeed");
}

#[tokio::test]
async fn all_checks_pass_after_a_clean_run() {
    let fake = FakeApi::new();
    let seed = SeedData::builtin();
    provision(&fake, &seed).await;

    let api = fake.client();
    let results = Verifier::new(&api, &seed).run().await;

    assert!(
        all_passed(&results),
        "failed checks: {:?}",
        results.iter().filter(|r| !r.passed).collect::<Vec<_>>()
    );
    // health, 4 orgs, 2 advertisers, 1 affiliate, 2 campaigns,
    // 3 autocomplete searches
    assert_eq!(results.len(), 13);
}

#[tokio::test]
async fn autocomplete_finds_each_seeded_domain() {
    let fake = FakeApi::new();
    let seed = SeedData::builtin();
    provision(&fake, &seed).await;

    let api = fake.client();
    let results = Verifier::new(&api, &seed).run().await;

    for (query, kind) in [("adi", "advertiser"), ("dys", "advertiser"), ("lem", "publisher")] {
        let check = results
            .iter()
            .find(|r| r.name == format!("autocomplete {query} ({kind})"))
            .expect("check present");
        assert!(check.passed, "{}: {}", check.name, check.detail);
    }
}

#[tokio::test]
async fn autocomplete_reports_a_missing_record() {
    let fake = FakeApi::new();
    let mut partial = SeedData::builtin();
    partial.analytics.retain(|r| r.domain != "dyson.com");
    provision(&fake, &partial).await;

    let api = fake.client();
    let results = Verifier::new(&api, &SeedData::builtin()).run().await;

    let dyson = results
        .iter()
        .find(|r| r.name == "autocomplete dys (advertiser)")
        .expect("check present");
    assert!(!dyson.passed);
    assert!(dyson.detail.contains("not found"), "{}", dyson.detail);
}

#[tokio::test]
async fn missing_entities_are_reported_individually() {
    let fake = FakeApi::new();
    let mut partial = SeedData::builtin();
    partial.campaigns.clear();
    provision(&fake, &partial).await;

    let api = fake.client();
    let expected = SeedData::builtin();
    let results = Verifier::new(&api, &expected).run().await;

    assert!(!all_passed(&results));
    let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();
    assert_eq!(failed.len(), expected.campaigns.len());
    for check in &failed {
        assert!(check.name.starts_with("campaign "), "{}", check.name);
        assert!(check.detail.contains("not found"), "{}", check.detail);
    }
}

#[tokio::test]
async fn organization_type_mismatch_fails_the_check() {
    let fake = FakeApi::new();
    let mut drifted = SeedData::builtin();
    for org in &mut drifted.organizations {
        if org.name == "Adidas" {
            org.org_type = seedctl::api::types::OrgType::Affiliate;
        }
    }
    provision(&fake, &drifted).await;

    let api = fake.client();
    let results = Verifier::new(&api, &SeedData::builtin()).run().await;

    let adidas = results
        .iter()
        .find(|r| r.name == "organization Adidas")
        .expect("check present");
    assert!(!adidas.passed);
    assert!(adidas.detail.contains("type mismatch"), "{}", adidas.detail);
}

#[tokio::test]
async fn advertiser_scope_requires_the_right_parent() {
    let fake = FakeApi::new();
    let mut moved = SeedData::builtin();
    for advertiser in &mut moved.advertisers {
        if advertiser.name == "Dyson Ltd" {
            advertiser.organization = "Adidas".into();
        }
    }
    provision(&fake, &moved).await;

    let api = fake.client();
    let results = Verifier::new(&api, &SeedData::builtin()).run().await;

    let dyson = results
        .iter()
        .find(|r| r.name == "advertiser Dyson Ltd")
        .expect("check present");
    assert!(!dyson.passed, "{}", dyson.detail);
}

#[tokio::test]
async fn unhealthy_api_short_circuits_to_a_single_failure() {
    let fake = FakeApi::new();
    fake.set_healthy(false);

    let api = fake.client();
    let expected = SeedData::builtin();
    let results = Verifier::new(&api, &expected).run().await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "api health");
    assert!(!results[0].passed);
}
