//! Remote platform API: transport client and wire types.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiResponse, HttpTransport, Transport};

/// Endpoint surface consumed by the seeding and verification commands.
pub mod paths {
    pub const HEALTH: &str = "/health";
    pub const ORGANIZATIONS: &str = "/api/v1/organizations";
    pub const PROFILES_UPSERT: &str = "/api/v1/profiles/upsert";
    pub const ADVERTISERS: &str = "/api/v1/advertisers";
    pub const AFFILIATES: &str = "/api/v1/affiliates";
    pub const CAMPAIGNS: &str = "/api/v1/campaigns";
    pub const ANALYTICS_ADVERTISERS: &str = "/api/v1/analytics/advertisers";
    pub const ANALYTICS_AFFILIATES: &str = "/api/v1/analytics/affiliates";
    pub const ANALYTICS_AUTOCOMPLETE: &str = "/api/v1/analytics/autocomplete";
}
