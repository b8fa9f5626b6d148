//! Room membership
//!
//! Rooms exist only while someone is in them; the index creates an entry on
//! first join and drops it when the last member leaves.

mod index;

pub use index::RoomIndex;
