//! Vendor listing model for funeral-service providers.

use serde::{Deserialize, Deserializer, Serialize};

use super::null_as_default;

/// Service categories a vendor can list under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VendorCategory {
    #[serde(rename = "Funeral Home")]
    FuneralHome,
    Crematorium,
    Florist,
    #[serde(rename = "Grief Counselor")]
    GriefCounselor,
    #[serde(rename = "Estate Lawyer")]
    EstateLawyer,
    #[serde(rename = "Memorial Products")]
    MemorialProducts,
    #[serde(rename = "Event Venue")]
    EventVenue,
    Catering,
    Transportation,
}

impl VendorCategory {
    pub const ALL: [VendorCategory; 9] = [
        VendorCategory::FuneralHome,
        VendorCategory::Crematorium,
        VendorCategory::Florist,
        VendorCategory::GriefCounselor,
        VendorCategory::EstateLawyer,
        VendorCategory::MemorialProducts,
        VendorCategory::EventVenue,
        VendorCategory::Catering,
        VendorCategory::Transportation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VendorCategory::FuneralHome => "Funeral Home",
            VendorCategory::Crematorium => "Crematorium",
            VendorCategory::Florist => "Florist",
            VendorCategory::GriefCounselor => "Grief Counselor",
            VendorCategory::EstateLawyer => "Estate Lawyer",
            VendorCategory::MemorialProducts => "Memorial Products",
            VendorCategory::EventVenue => "Event Venue",
            VendorCategory::Catering => "Catering",
            VendorCategory::Transportation => "Transportation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A vendor's service listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VendorListing {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub category: VendorCategory,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active", deserialize_with = "null_as_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}

fn null_as_active<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_active))
}
