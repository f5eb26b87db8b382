//! Seed plans: the static lists of entities a provisioning run works from.
//!
//! [`SeedData::builtin`] is the canonical test-account dataset; the plain
//! constructors exist so tests and future callers can assemble smaller
//! custom plans.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::{uuid, Uuid};

use crate::api::paths;
use crate::api::types::OrgType;

#[derive(Debug, Clone)]
pub struct OrganizationSeed {
    pub name: String,
    pub org_type: OrgType,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ProfileSeed {
    /// External subject id, pre-assigned and stable across runs.
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
    /// Name of the organization this profile belongs to.
    pub organization: String,
}

#[derive(Debug, Clone)]
pub struct AdvertiserSeed {
    pub name: String,
    pub organization: String,
    pub contact_email: String,
    pub billing_details: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct AffiliateSeed {
    pub name: String,
    pub organization: String,
    pub contact_email: String,
    pub payment_details: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct CampaignSeed {
    pub name: String,
    /// Name of the advertiser this campaign runs under.
    pub advertiser: String,
    pub payout_type: String,
    pub payout_amount: Decimal,
    pub revenue_type: String,
    pub revenue_amount: Decimal,
    pub currency_id: String,
    pub visibility: String,
    pub destination_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Which analytics collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsScope {
    Advertiser,
    Publisher,
}

impl AnalyticsScope {
    pub fn endpoint(self) -> &'static str {
        match self {
            AnalyticsScope::Advertiser => paths::ANALYTICS_ADVERTISERS,
            AnalyticsScope::Publisher => paths::ANALYTICS_AFFILIATES,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            AnalyticsScope::Advertiser => "advertiser",
            AnalyticsScope::Publisher => "publisher",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsSeed {
    pub scope: AnalyticsScope,
    pub domain: String,
    pub metrics: Value,
}

impl AnalyticsSeed {
    /// Ledger identifier; the server assigns no id for analytics records.
    pub fn key(&self) -> String {
        format!("{}_{}", self.scope.prefix(), self.domain)
    }
}

/// A full provisioning plan, stage by stage.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub organizations: Vec<OrganizationSeed>,
    pub profiles: Vec<ProfileSeed>,
    pub advertisers: Vec<AdvertiserSeed>,
    pub affiliates: Vec<AffiliateSeed>,
    pub campaigns: Vec<CampaignSeed>,
    pub analytics: Vec<AnalyticsSeed>,
}

impl SeedData {
    /// The built-in test-account dataset: a platform owner, two advertiser
    /// brands, one publisher, and the profiles, campaigns, and analytics
    /// records hanging off them.
    pub fn builtin() -> Self {
        Self {
            organizations: vec![
                OrganizationSeed {
                    name: "UpsailAI".into(),
                    org_type: OrgType::PlatformOwner,
                    description: "Platform administration organization".into(),
                },
                OrganizationSeed {
                    name: "Adidas".into(),
                    org_type: OrgType::Advertiser,
                    description: "Global sportswear brand".into(),
                },
                OrganizationSeed {
                    name: "Dyson".into(),
                    org_type: OrgType::Advertiser,
                    description: "Home appliance technology company".into(),
                },
                OrganizationSeed {
                    name: "Le Monde".into(),
                    org_type: OrgType::Affiliate,
                    description: "French news publisher".into(),
                },
            ],
            profiles: vec![
                ProfileSeed {
                    id: uuid!("550e8400-e29b-41d4-a716-446655440000"),
                    email: "admin@upsailai.com".into(),
                    first_name: "Admin".into(),
                    last_name: "User".into(),
                    role_id: 1,
                    organization: "UpsailAI".into(),
                },
                ProfileSeed {
                    id: uuid!("a654ad6a-83c7-44c5-9f34-d2d5adb2f8a0"),
                    email: "rolinko@adidas.com".into(),
                    first_name: "Roland".into(),
                    last_name: "Adidas".into(),
                    role_id: 1000,
                    organization: "Adidas".into(),
                },
                ProfileSeed {
                    id: uuid!("71ae7a37-92e5-4693-91e1-f5a1464b7414"),
                    email: "rolinko@dyson.com".into(),
                    first_name: "Roland".into(),
                    last_name: "Dyson".into(),
                    role_id: 1000,
                    organization: "Dyson".into(),
                },
                ProfileSeed {
                    id: uuid!("268826c9-d59d-4b40-9558-4ce5f7bf7534"),
                    email: "rolinko@lemonde.fr".into(),
                    first_name: "Roland".into(),
                    last_name: "LeMonde".into(),
                    role_id: 1001,
                    organization: "Le Monde".into(),
                },
            ],
            advertisers: vec![
                AdvertiserSeed {
                    name: "Adidas Global".into(),
                    organization: "Adidas".into(),
                    contact_email: "rolinko@adidas.com".into(),
                    billing_details: Some(json!({
                        "company_name": "Adidas AG",
                        "address": {
                            "street": "Adi-Dassler-Strasse 1",
                            "city": "Herzogenaurach",
                            "postal_code": "91074",
                            "country": "Germany"
                        },
                        "tax_id": "DE123456789",
                        "billing_email": "billing@adidas.com"
                    })),
                },
                AdvertiserSeed {
                    name: "Dyson Ltd".into(),
                    organization: "Dyson".into(),
                    contact_email: "rolinko@dyson.com".into(),
                    billing_details: Some(json!({
                        "company_name": "Dyson Ltd",
                        "address": {
                            "street": "Tetbury Hill",
                            "city": "Malmesbury",
                            "postal_code": "SN16 0RP",
                            "country": "United Kingdom"
                        },
                        "tax_id": "GB123456789",
                        "billing_email": "billing@dyson.com"
                    })),
                },
            ],
            affiliates: vec![AffiliateSeed {
                name: "Le Monde".into(),
                organization: "Le Monde".into(),
                contact_email: "rolinko@lemonde.fr".into(),
                payment_details: Some(json!({
                    "preferred_method": "bank_transfer",
                    "bank_details": {
                        "account_holder": "Le Monde SA",
                        "iban": "FR1420041010050500013M02606",
                        "bic": "PSSTFRPPPAR",
                        "bank_name": "BNP Paribas"
                    },
                    "tax_id": "FR12345678901",
                    "minimum_payout": 100.00,
                    "currency": "EUR"
                })),
            }],
            campaigns: vec![
                CampaignSeed {
                    name: "Adidas Summer Collection 2025".into(),
                    advertiser: "Adidas Global".into(),
                    payout_type: "cpa".into(),
                    payout_amount: dec!(15.00),
                    revenue_type: "rpa".into(),
                    revenue_amount: dec!(25.00),
                    currency_id: "USD".into(),
                    visibility: "public".into(),
                    destination_url: Some("https://adidas.com/summer-2025".into()),
                    start_date: NaiveDate::from_ymd_opt(2025, 6, 1),
                    end_date: NaiveDate::from_ymd_opt(2025, 8, 31),
                },
                CampaignSeed {
                    name: "Dyson V15 Detect Launch".into(),
                    advertiser: "Dyson Ltd".into(),
                    payout_type: "cpa".into(),
                    payout_amount: dec!(50.00),
                    revenue_type: "rpa".into(),
                    revenue_amount: dec!(80.00),
                    currency_id: "USD".into(),
                    visibility: "require_approval".into(),
                    destination_url: Some("https://dyson.com/v15".into()),
                    start_date: NaiveDate::from_ymd_opt(2025, 5, 15),
                    end_date: None,
                },
            ],
            analytics: vec![
                AnalyticsSeed {
                    scope: AnalyticsScope::Advertiser,
                    domain: "adidas.com".into(),
                    metrics: json!({
                        "domain": "adidas.com",
                        "affiliate_networks": ["Impact", "CJ Affiliate", "ShareASale", "Awin"],
                        "keywords": ["sportswear", "sneakers", "athletic", "running"],
                        "verticals": ["Sports/Athletic Wear", "Fashion/Footwear"],
                        "social_media_presence": {
                            "facebook": "https://facebook.com/adidas",
                            "instagram": "https://instagram.com/adidas"
                        }
                    }),
                },
                AnalyticsSeed {
                    scope: AnalyticsScope::Advertiser,
                    domain: "dyson.com".into(),
                    metrics: json!({
                        "domain": "dyson.com",
                        "affiliate_networks": ["Impact", "CJ Affiliate", "Awin"],
                        "keywords": ["vacuum", "air purifier", "hair dryer", "cordless"],
                        "verticals": ["Home/Electricals", "Home/Appliances"],
                        "social_media_presence": {
                            "facebook": "https://facebook.com/dyson",
                            "youtube": "https://youtube.com/dyson"
                        }
                    }),
                },
                AnalyticsSeed {
                    scope: AnalyticsScope::Publisher,
                    domain: "lemonde.fr".into(),
                    metrics: json!({
                        "domain": "lemonde.fr",
                        "affiliate_networks": ["Affilae", "Awin", "Effiliation", "Impact"],
                        "keywords": ["panier", "magasin", "stock", "smartphone"],
                        "traffic_score": 9250.75,
                        "relevance": 85.5,
                        "partners": ["dyson.fr", "adidas.fr", "fnac.com", "decathlon.fr"]
                    }),
                },
            ],
        }
    }

    /// Look up the seed entry for an advertiser by name. Campaigns use this
    /// to find which organization their advertiser belongs to.
    pub fn advertiser_seed(&self, name: &str) -> Option<&AdvertiserSeed> {
        self.advertisers.iter().find(|a| a.name == name)
    }
}
