//! Tribute drafts and the RSVP form.

use serde_json::{Map, Value};

use super::{parse_date, require};
use crate::db::TributeRepository;
use crate::errors::AppError;
use crate::models::{FuneralDetails, Tribute};

/// Editable text fields of a tribute draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TributeField {
    Name,
    BirthDate,
    DeathDate,
    Bio,
    Story,
    ObituaryText,
    Quote,
    CandleMessage,
    PhotoUrl,
    FuneralDateTime,
    FuneralLocation,
    FuneralRsvpLink,
    FuneralNotes,
}

/// Check a tribute before it is saved.
pub fn validate_tribute(tribute: &Tribute) -> Result<(), AppError> {
    require(&tribute.name, "Name is required.")?;

    let birth = parse_date("Birth date", tribute.birth_date.as_deref())?;
    let death = parse_date("Death date", tribute.death_date.as_deref())?;
    if let (Some(birth), Some(death)) = (birth, death) {
        if death < birth {
            return Err(AppError::Validation(
                "Death date cannot be before birth date.".to_string(),
            ));
        }
    }

    for (index, tag) in tribute.tags.iter().enumerate() {
        if tribute.tags[..index].contains(tag) {
            return Err(AppError::Validation(format!("Duplicate tag \"{}\".", tag)));
        }
    }

    Ok(())
}

/// Transient editable state for creating or editing a tribute.
#[derive(Debug, Clone)]
pub struct TributeDraft {
    original: Option<Tribute>,
    form: Tribute,
}

impl TributeDraft {
    /// Empty draft for the create flow.
    pub fn blank() -> Self {
        Self {
            original: None,
            form: Tribute {
                funeral_details: Some(FuneralDetails::default()),
                ..Default::default()
            },
        }
    }

    /// Draft from a request body; a missing `id` is fine since create assigns one.
    pub fn from_payload(mut payload: Map<String, Value>) -> Result<Self, AppError> {
        payload
            .entry("id")
            .or_insert_with(|| Value::String(String::new()));
        let form = serde_json::from_value(Value::Object(payload))?;
        Ok(Self {
            original: None,
            form,
        })
    }

    /// Draft for editing `tribute`, which only its owner may do.
    pub fn edit(tribute: Tribute, acting_user: Option<&str>) -> Result<Self, AppError> {
        let user = acting_user
            .ok_or_else(|| AppError::Unauthorized("Sign in to edit this tribute.".to_string()))?;
        if !tribute.is_owned_by(user) {
            return Err(AppError::Forbidden(
                "Only the creator can edit this tribute.".to_string(),
            ));
        }

        Ok(Self {
            original: Some(tribute.clone()),
            form: tribute,
        })
    }

    pub fn form(&self) -> &Tribute {
        &self.form
    }

    /// Whether the form differs from the record it was hydrated from.
    pub fn is_dirty(&self) -> bool {
        match &self.original {
            Some(original) => original != &self.form,
            None => self.form != Self::blank().form,
        }
    }

    pub fn set(&mut self, field: TributeField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TributeField::Name => self.form.name = value,
            TributeField::BirthDate => self.form.birth_date = Some(value),
            TributeField::DeathDate => self.form.death_date = Some(value),
            TributeField::Bio => self.form.bio = Some(value),
            TributeField::Story => self.form.story = Some(value),
            TributeField::ObituaryText => self.form.obituary_text = Some(value),
            TributeField::Quote => self.form.quote = Some(value),
            TributeField::CandleMessage => self.form.candle_message = Some(value),
            TributeField::PhotoUrl => self.form.photo_url = Some(value),
            TributeField::FuneralDateTime => self.funeral_details().date_time = Some(value),
            TributeField::FuneralLocation => self.funeral_details().location = Some(value),
            TributeField::FuneralRsvpLink => self.funeral_details().rsvp_link = Some(value),
            TributeField::FuneralNotes => self.funeral_details().notes = Some(value),
        }
    }

    pub fn set_rsvp_enabled(&mut self, enabled: bool) {
        self.funeral_details().rsvp_enabled = enabled;
    }

    /// Append a tag, rejecting blanks and duplicates.
    pub fn add_tag(&mut self, tag: &str) -> Result<(), AppError> {
        let tag = tag.trim();
        require(tag, "Tag cannot be empty.")?;
        if self.form.tags.iter().any(|t| t == tag) {
            return Err(AppError::Validation(format!("Duplicate tag \"{}\".", tag)));
        }
        self.form.tags.push(tag.to_string());
        Ok(())
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.form.tags.retain(|t| t != tag);
    }

    /// Discard edits, returning to the stored record.
    pub fn cancel(&mut self) {
        self.form = match &self.original {
            Some(original) => original.clone(),
            None => Self::blank().form,
        };
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_tribute(&self.form)
    }

    /// Store the draft as a new tribute owned by `acting_user`.
    pub async fn submit_create(
        self,
        repo: &TributeRepository,
        acting_user: Option<&str>,
    ) -> Result<Tribute, AppError> {
        let user = acting_user
            .ok_or_else(|| AppError::Unauthorized("Sign in to create a tribute.".to_string()))?;
        self.validate()?;

        let mut form = self.form;
        form.created_by = Some(user.to_string());
        Ok(repo.create(form, Some(user)).await)
    }

    /// Store the edited draft over its original record.
    pub async fn submit_edit(self, repo: &TributeRepository) -> Result<Tribute, AppError> {
        if self.original.is_none() {
            return Err(AppError::BadRequest(
                "Draft was not opened for editing.".to_string(),
            ));
        }
        self.validate()?;
        repo.replace(self.form).await
    }

    fn funeral_details(&mut self) -> &mut FuneralDetails {
        self.form.funeral_details.get_or_insert_with(Default::default)
    }
}

/// Visitor RSVP submission.
#[derive(Debug, Clone)]
pub struct RsvpForm {
    pub name: String,
    pub attending: bool,
}

impl RsvpForm {
    pub fn new(name: impl Into<String>, attending: bool) -> Self {
        Self {
            name: name.into(),
            attending,
        }
    }

    /// The trimmed attendee name.
    pub fn validated_name(&self) -> Result<&str, AppError> {
        let name = self.name.trim();
        require(name, "Please enter your name before submitting.")?;
        Ok(name)
    }

    /// Record the RSVP on `tribute_id` if that tribute accepts RSVPs.
    pub async fn submit(
        &self,
        repo: &TributeRepository,
        tribute_id: &str,
    ) -> Result<Tribute, AppError> {
        let name = self.validated_name()?;
        let not_found = || AppError::NotFound(format!("Tribute {} not found", tribute_id));

        let tribute = repo.get_by_id(tribute_id).await.ok_or_else(not_found)?;
        if !tribute.rsvp_enabled() {
            return Err(AppError::Validation(
                "RSVPs are not enabled for this tribute.".to_string(),
            ));
        }

        repo.add_rsvp(tribute_id, name, self.attending)
            .await
            .ok_or_else(not_found)
    }
}
