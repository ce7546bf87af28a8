//! The `ProfileAuthority` trait and the records it serves.
//!
//! The authority owns everything the directory does not: privacy and
//! preference settings, connection state, status updates, social-networking
//! handles, and company profiles. Its visibility predicates are the gates
//! the assembler consults — their policy internals are opaque to this crate.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::privacy::{PreferenceSettings, PrivacySettings};

// ─── Authority-owned records ─────────────────────────────────────────────────

/// A short user-set status line with the moment it was posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStatus {
  pub message:    String,
  pub date_added: DateTime<Utc>,
}

/// The five supported social-networking handles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialNetworkingInfo {
  pub facebook_username: Option<String>,
  pub linkedin_username: Option<String>,
  pub myspace_username:  Option<String>,
  pub skype_username:    Option<String>,
  pub twitter_username:  Option<String>,
}

/// One business the user is associated with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
  pub company_name: Option<String>,
  pub description:  Option<String>,
  pub web_address:  Option<String>,
}

/// One entry of a user's connection list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
  pub user_uuid:    Uuid,
  pub display_name: String,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the authorization / privacy component.
///
/// The seven category predicates plus `friends_list_visible` answer for a
/// `(target, privacy record, viewer, friend flag)` tuple; the assembler
/// resolves the privacy record and friend flag once per request and feeds
/// them back in. Self-views never reach the predicates.
pub trait ProfileAuthority: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Settings ──────────────────────────────────────────────────────────

  /// The target's privacy record, or the platform default if unset.
  fn privacy_settings(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<PrivacySettings, Self::Error>> + Send + '_;

  /// The target's preference record, or the platform default if unset.
  fn preference_settings(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<PreferenceSettings, Self::Error>> + Send + '_;

  /// The precomputed friend flag: a reciprocal connection between the two.
  fn is_connected(
    &self,
    user_uuid: Uuid,
    other_uuid: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Visibility predicates ─────────────────────────────────────────────

  fn basic_info_visible<'a>(
    &'a self,
    target: Uuid,
    privacy: &'a PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn contact_info_visible<'a>(
    &'a self,
    target: Uuid,
    privacy: &'a PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn staff_info_visible<'a>(
    &'a self,
    target: Uuid,
    privacy: &'a PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn student_info_visible<'a>(
    &'a self,
    target: Uuid,
    privacy: &'a PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn personal_info_visible<'a>(
    &'a self,
    target: Uuid,
    privacy: &'a PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn business_info_visible<'a>(
    &'a self,
    target: Uuid,
    privacy: &'a PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn status_visible<'a>(
    &'a self,
    target: Uuid,
    privacy: &'a PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn friends_list_visible<'a>(
    &'a self,
    target: Uuid,
    privacy: &'a PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Data fetches ──────────────────────────────────────────────────────

  /// The target's current status, if any.
  fn status(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<Option<ProfileStatus>, Self::Error>> + Send + '_;

  /// The target's social-networking handles, if any were recorded.
  fn social_networking(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<Option<SocialNetworkingInfo>, Self::Error>> + Send + '_;

  /// The target's connection list.
  fn connections(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<Vec<Connection>, Self::Error>> + Send + '_;

  /// The target's company profiles.
  fn company_profiles(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<Vec<CompanyProfile>, Self::Error>> + Send + '_;
}
