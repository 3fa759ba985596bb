//! Route handlers organized by resource

pub mod health;
pub mod schedule;
pub mod stats;
pub mod stores;
