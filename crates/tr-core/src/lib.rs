//! `tr-core`: foundational types for the taxi route planner.
//!
//! This crate is a dependency of every other `tr-*` crate.  It has no `tr-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `EdgeId`                                     |
//! | [`geo`]      | `Position`, `heading_delta_deg`                        |
//! | [`waypoint`] | `Waypoint`: sampled road position + lane metadata     |
//! | [`key`]      | `NodeKey`, `KeyResolution`: quantized node identity   |
//! | [`error`]    | `TrError`, `TrResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod key;
pub mod waypoint;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TrError, TrResult};
pub use geo::{Position, heading_delta_deg};
pub use ids::{EdgeId, NodeId};
pub use key::{KeyResolution, NodeKey};
pub use waypoint::Waypoint;
