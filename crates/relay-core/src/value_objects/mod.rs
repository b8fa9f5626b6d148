//! Value objects used across the workspace.

mod ids;

pub use ids::{RoomId, UserId};
