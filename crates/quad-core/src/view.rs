//! The profile view — the transient, filtered aggregate returned to callers.
//!
//! A view is built fresh per request by copying fields from the person
//! record (plus viewer-specific computed fields) and withholding whatever
//! the viewer's gates do not allow. It is never cached and never persisted;
//! the record is the source of truth.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authority::CompanyProfile;

// ─── Derived property keys ───────────────────────────────────────────────────

/// Whether the owner's birth year may be displayed.
pub const PROP_BIRTH_YEAR_VISIBLE: &str = "birthYearVisible";
/// Whether the owner accepts connection-confirmation emails.
pub const PROP_EMAIL_CONFIRM_ENABLED: &str = "emailConfirmEnabled";
/// Whether the owner accepts connection-request emails.
pub const PROP_EMAIL_REQUEST_ENABLED: &str = "emailRequestEnabled";

// ─── View ────────────────────────────────────────────────────────────────────

/// A filtered, request-scoped profile aggregate.
///
/// Invariant: a field is populated only when the corresponding category gate
/// evaluated true for the (viewer, target) pair, or the viewer is the target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileView {
  pub user_uuid:    Option<Uuid>,
  pub display_name: Option<String>,

  // ── Basic ───────────────────────────────────────────────────────────────
  pub nickname:      Option<String>,
  pub date_of_birth: Option<NaiveDate>,

  // ── Contact ─────────────────────────────────────────────────────────────
  pub email:        Option<String>,
  pub homepage:     Option<String>,
  pub work_phone:   Option<String>,
  pub home_phone:   Option<String>,
  pub mobile_phone: Option<String>,
  pub facsimile:    Option<String>,

  // ── Staff ───────────────────────────────────────────────────────────────
  pub department:             Option<String>,
  pub position:               Option<String>,
  pub school:                 Option<String>,
  pub room:                   Option<String>,
  pub staff_profile:          Option<String>,
  pub academic_profile_url:   Option<String>,
  pub university_profile_url: Option<String>,
  pub publications:           Option<String>,

  // ── Student ─────────────────────────────────────────────────────────────
  pub course:   Option<String>,
  pub subjects: Option<String>,

  // ── Personal ────────────────────────────────────────────────────────────
  pub favourite_books:    Option<String>,
  pub favourite_tv_shows: Option<String>,
  pub favourite_movies:   Option<String>,
  pub favourite_quotes:   Option<String>,
  pub other_information:  Option<String>,

  // ── Social networking (coupled to the personal gate) ────────────────────
  pub facebook_username: Option<String>,
  pub linkedin_username: Option<String>,
  pub myspace_username:  Option<String>,
  pub skype_username:    Option<String>,
  pub twitter_username:  Option<String>,

  // ── Business ────────────────────────────────────────────────────────────
  pub business_biography: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub company_profiles:   Vec<CompanyProfile>,

  // ── Status ──────────────────────────────────────────────────────────────
  pub status_message:        Option<String>,
  pub status_date:           Option<DateTime<Utc>>,
  pub status_date_formatted: Option<String>,

  // ── Computed (always attached where the view carries images) ────────────
  pub image_url:       Option<String>,
  pub image_thumb_url: Option<String>,

  /// Derived properties (birth-year visibility, email notification flags).
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: BTreeMap<String, String>,
}

impl ProfileView {
  /// Set a derived property.
  pub fn set_property(&mut self, key: &str, value: impl ToString) {
    self.properties.insert(key.to_string(), value.to_string());
  }

  /// Read a derived property.
  pub fn property(&self, key: &str) -> Option<&str> {
    self.properties.get(key).map(String::as_str)
  }
}
