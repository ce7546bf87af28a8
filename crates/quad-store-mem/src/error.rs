//! Error types for `quad-store-mem`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A panic while holding the table lock left it poisoned.
  #[error("store lock poisoned")]
  Poisoned,

  #[error("seed references unknown user {0:?}")]
  UnknownSeedUser(String),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("seed parse error: {0}")]
  Parse(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
