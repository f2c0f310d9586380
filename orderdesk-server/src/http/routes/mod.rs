//! Route handlers organized by resource

pub mod health;
pub mod offers;
pub mod orders;
pub mod users;
