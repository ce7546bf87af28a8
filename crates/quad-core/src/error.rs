//! Error types for `quad-core`.

use thiserror::Error;
use uuid::Uuid;

/// Hard failures of the profile layer.
///
/// Soft anomalies are deliberately NOT represented here: an unresolvable
/// target identifier is `Ok(None)` and a failed persistence attempt is
/// `Ok(false)` at the operation level, so profile pages can degrade to
/// partial renders instead of erroring out.
#[derive(Debug, Error)]
pub enum Error {
  /// A viewer-scoped operation was invoked without an authenticated viewer.
  #[error("must be signed in")]
  Unauthenticated,

  /// A write was attempted against somebody else's profile.
  #[error("viewer {0} may not edit this profile")]
  NotProfileOwner(Uuid),

  /// The directory could not instantiate a backing person record; no
  /// further write can proceed.
  #[error("could not create a person record for {0}")]
  RecordCreation(Uuid),

  #[error("directory error: {0}")]
  Directory(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("profile authority error: {0}")]
  Authority(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a directory-store failure.
  pub fn directory<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Directory(Box::new(e))
  }

  /// Wrap a profile-authority failure.
  pub fn authority<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Authority(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
