//! `tr-graph`: waypoint graph construction and spatial lookup.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`link`]    | `RoadLink`, `LinkKind`, `LaneChange`: connectivity facts     |
//! | [`config`]  | `GraphConfig`: sampling spacing and key resolution           |
//! | [`builder`] | `GraphBuilder`: dedup, edge rules, CSR assembly              |
//! | [`graph`]   | `WaypointGraph` (CSR + R-tree), `BuildStats`                  |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on config and link types.  |

pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod link;


pub use builder::GraphBuilder;
pub use config::GraphConfig;
pub use error::{GraphError, GraphResult};
pub use graph::{BuildStats, WaypointGraph};
pub use link::{LaneChange, LaneType, LinkKind, RoadLink, Side};
