//! The `DirectoryStore` trait.
//!
//! The trait is implemented by directory backends (e.g. `quad-store-mem`).
//! Higher layers (`quad-profile`, `quad-portal`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::person::PersonRecord;

/// Abstraction over the campus user directory.
///
/// Identifier resolution is the only place aliases appear: every other
/// method takes the canonical uuid. Absent users and absent records are
/// soft outcomes (`None`), never errors.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identity ──────────────────────────────────────────────────────────

  /// Resolve a user-supplied identifier — a canonical uuid in text form or
  /// a human-friendly alias — to the canonical uuid. `None` if unknown.
  fn resolve_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + 'a;

  /// Whether a directory account exists for `user_uuid`.
  fn user_exists(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The account display name, if the account exists.
  fn display_name(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// The account email address, if the account has one.
  fn email(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  // ── Person records ────────────────────────────────────────────────────

  /// Fetch the stored person record. `None` if the user has never had one.
  fn person(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<Option<PersonRecord>, Self::Error>> + Send + '_;

  /// Create a fresh, empty person record for `user_uuid`.
  ///
  /// `None` means the backend could not instantiate one at all — callers
  /// escalate that to a hard failure since no write can proceed.
  fn create_person(
    &self,
    user_uuid: Uuid,
  ) -> impl Future<Output = Result<Option<PersonRecord>, Self::Error>> + Send + '_;

  /// Persist an updated person record. `false` when the update did not
  /// succeed; last writer wins, no read-modify-write coordination here.
  fn update_person<'a>(
    &'a self,
    record: &'a PersonRecord,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
