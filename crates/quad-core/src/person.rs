//! The directory-backed person record.
//!
//! This is the source of truth for a user's profile attributes. The profile
//! layer only reads and writes it through [`DirectoryStore`], never directly.
//!
//! [`DirectoryStore`]: crate::directory::DirectoryStore

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's stored profile attributes, grouped by visibility category.
///
/// Every attribute is optional; a fresh record carries nothing but the owner
/// uuid. The account email is deliberately absent — it belongs to the
/// directory account, not the person record, and is fetched separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonRecord {
  /// Defaults to the nil uuid in seed data; backends stamp the real owner.
  #[serde(default)]
  pub user_uuid: Uuid,

  // ── Basic ───────────────────────────────────────────────────────────────
  pub nickname:      Option<String>,
  pub date_of_birth: Option<NaiveDate>,

  // ── Contact ─────────────────────────────────────────────────────────────
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

  // ── Business ────────────────────────────────────────────────────────────
  pub business_biography: Option<String>,
}

impl PersonRecord {
  /// A fresh, empty record owned by `user_uuid`.
  pub fn new(user_uuid: Uuid) -> Self {
    Self { user_uuid, ..Self::default() }
  }
}
