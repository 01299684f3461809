//! # Verda Footprint Estimator
//!
//! Pure estimation of a user's weekly carbon footprint from self-reported
//! activity, plus human-readable equivalents for the chat narrative.
//!
//! ## Design Goals
//!
//! - **Deterministic**: same activity and factors always produce the same
//!   result
//! - **Pure**: no I/O, no clocks, no shared state
//! - **Serializable**: all public types derive serde for hosts that want to
//!   ship results over a wire
//!
//! ## Example
//!
//! ```
//! use verda_footprint::{estimate, ActivityInput};
//!
//! let activity = ActivityInput {
//!     car_km: 100.0,
//!     ..ActivityInput::default()
//! };
//! let footprint = estimate(&activity);
//! assert!((footprint.total_kg - 230.0).abs() < 1e-9);
//! assert_eq!(footprint.trees, 11);
//! ```

mod activity;
mod estimate;
mod factors;

pub use activity::ActivityInput;
pub use estimate::{estimate, estimate_with, FootprintResult};
pub use factors::EmissionsFactors;
