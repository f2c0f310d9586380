//! Request payloads and read-time derived values
//!
//! Create payloads take every field as optional: a missing required
//! column is left for the store to reject. Patch payloads distinguish an
//! absent key from an explicit `null`.

pub mod derived;
pub mod offer;
pub mod order;
pub mod patch;
pub mod user;
pub mod validation;

pub use derived::{contact_line, date_frame, full_name};
pub use offer::{NewOffer, OfferPatch};
pub use order::{NewOrder, OrderPatch};
pub use user::{NewUser, UserPatch};
pub use validation::ValidationError;
