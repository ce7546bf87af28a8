//! Privacy and preference records.
//!
//! These are per-user settings resolved from the profile authority. The
//! assembler never interprets the levels itself — it passes the record to
//! the authority's visibility predicates and acts on the booleans.

use serde::{Deserialize, Serialize};

/// Who may see a category of profile information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
  /// Any authenticated viewer.
  #[default]
  Everyone,
  /// Only viewers with a reciprocal connection to the owner.
  Connections,
  /// Nobody but the owner.
  OnlyMe,
}

/// Per-user category visibility settings.
///
/// The default record is fully open with the birth year shown, matching the
/// platform's out-of-the-box behaviour for users who never touched their
/// privacy page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacySettings {
  pub basic_info:    PrivacyLevel,
  pub contact_info:  PrivacyLevel,
  pub staff_info:    PrivacyLevel,
  pub student_info:  PrivacyLevel,
  pub personal_info: PrivacyLevel,
  pub business_info: PrivacyLevel,
  pub my_status:     PrivacyLevel,
  pub my_friends:    PrivacyLevel,
  /// Whether the year component of the date of birth may be shown.
  pub show_birth_year: bool,
}

impl Default for PrivacySettings {
  fn default() -> Self {
    Self {
      basic_info:      PrivacyLevel::Everyone,
      contact_info:    PrivacyLevel::Everyone,
      staff_info:      PrivacyLevel::Everyone,
      student_info:    PrivacyLevel::Everyone,
      personal_info:   PrivacyLevel::Everyone,
      business_info:   PrivacyLevel::Everyone,
      my_status:       PrivacyLevel::Everyone,
      my_friends:      PrivacyLevel::Everyone,
      show_birth_year: true,
    }
  }
}

/// Per-user notification preferences surfaced as derived view properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSettings {
  pub confirm_email_enabled: bool,
  pub request_email_enabled: bool,
}

impl Default for PreferenceSettings {
  fn default() -> Self {
    Self { confirm_email_enabled: true, request_email_enabled: true }
  }
}
