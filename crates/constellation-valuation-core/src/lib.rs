pub mod error;
pub mod scenario;
pub mod types;
pub mod valuation;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "analysis")]
pub mod analysis;

#[cfg(feature = "persistence")]
pub mod persistence;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use error::EngineError;
pub use types::*;

/// Standard result type for all valuation engine operations
pub type EngineResult<T> = Result<T, EngineError>;
