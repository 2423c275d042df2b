//! Core data models for the league points manager.

mod group;
mod ids;
mod ranked;
mod team;

pub use group::*;
pub use ids::*;
pub use ranked::*;
pub use team::*;
