//! JSON seed format for the dev server.
//!
//! A seed file declares directory accounts (with optional credentials for
//! the portal's Basic auth), their person records and authority-owned
//! settings, and reciprocal connections by alias:
//!
//! ```json
//! {
//!   "users": [
//!     {
//!       "eid": "asmith",
//!       "display_name": "Alice Smith",
//!       "email": "asmith@campus.example.edu",
//!       "password_hash": "$argon2id$v=19$…",
//!       "person": { "nickname": "Al" },
//!       "privacy": { "contact_info": "connections" }
//!     }
//!   ],
//!   "connections": [["asmith", "bjones"]]
//! }
//! ```

use std::path::Path;

use quad_core::{
  authority::{CompanyProfile, ProfileStatus, SocialNetworkingInfo},
  person::PersonRecord,
  privacy::{PreferenceSettings, PrivacySettings},
};
use serde::Deserialize;

use crate::Result;

/// One seeded user: a directory account plus optional profile data.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
  pub eid:          String,
  pub display_name: String,
  #[serde(default)]
  pub email:         Option<String>,
  /// Argon2 PHC string consumed by the portal's auth layer; users without
  /// one cannot sign in but still have viewable profiles.
  #[serde(default)]
  pub password_hash: Option<String>,
  #[serde(default)]
  pub person:      Option<PersonRecord>,
  #[serde(default)]
  pub privacy:     Option<PrivacySettings>,
  #[serde(default)]
  pub preferences: Option<PreferenceSettings>,
  #[serde(default)]
  pub status:      Option<ProfileStatus>,
  #[serde(default)]
  pub social:      Option<SocialNetworkingInfo>,
  #[serde(default)]
  pub company_profiles: Vec<CompanyProfile>,
}

/// A parsed seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
  #[serde(default)]
  pub users: Vec<SeedUser>,
  /// Reciprocal connections, each entry a pair of aliases.
  #[serde(default)]
  pub connections: Vec<[String; 2]>,
}

impl Seed {
  /// Read and parse a seed file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
  }
}
