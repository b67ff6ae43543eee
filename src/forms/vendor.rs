//! Vendor listing drafts.

use serde::Deserialize;

use super::require;
use crate::db::VendorRepository;
use crate::errors::AppError;
use crate::models::{VendorCategory, VendorListing};

/// Check a listing before it is saved.
pub fn validate_listing(listing: &VendorListing) -> Result<(), AppError> {
    require(&listing.title, "Title is required.")?;
    require(&listing.location, "Location is required.")?;
    Ok(())
}

/// Editable vendor listing form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorListingDraft {
    pub title: String,
    /// Category display name as selected in the form.
    pub category: String,
    pub location: String,
    pub description: String,
    pub active: bool,
}

impl Default for VendorListingDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: String::new(),
            location: String::new(),
            description: String::new(),
            active: true,
        }
    }
}

impl VendorListingDraft {
    /// Draft hydrated from a stored listing.
    pub fn from_listing(listing: &VendorListing) -> Self {
        Self {
            title: listing.title.clone(),
            category: listing.category.as_str().to_string(),
            location: listing.location.clone(),
            description: listing.description.clone().unwrap_or_default(),
            active: listing.active,
        }
    }

    /// Validate and return the selected category.
    pub fn validate(&self) -> Result<VendorCategory, AppError> {
        require(&self.title, "Title is required.")?;
        let category = VendorCategory::parse(self.category.trim())
            .ok_or_else(|| AppError::Validation("Select a category.".to_string()))?;
        require(&self.location, "Location is required.")?;
        Ok(category)
    }

    /// Store the draft as a new listing.
    pub async fn submit_create(
        self,
        repo: &VendorRepository,
        acting_user: Option<&str>,
    ) -> Result<VendorListing, AppError> {
        let mut listing = self.into_listing(String::new())?;
        listing.description = listing.description.filter(|d| !d.is_empty());
        Ok(repo.create(listing, acting_user).await)
    }

    /// Store the draft over the listing with `id`.
    pub async fn submit_update(
        self,
        repo: &VendorRepository,
        id: &str,
    ) -> Result<VendorListing, AppError> {
        if repo.get_by_id(id).await.is_none() {
            return Err(AppError::NotFound(format!("Vendor listing {} not found", id)));
        }
        let listing = self.into_listing(id.to_string())?;
        repo.save(listing).await
    }

    fn into_listing(self, id: String) -> Result<VendorListing, AppError> {
        let category = self.validate()?;

        Ok(VendorListing {
            id,
            title: self.title.trim().to_string(),
            category,
            location: self.location.trim().to_string(),
            description: Some(self.description.trim().to_string()),
            active: self.active,
            created_by: None,
            created_at: None,
            updated_at: None,
        })
    }
}
