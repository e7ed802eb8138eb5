//! `tr-route`: shortest-path and k-shortest-route planning.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`cost`]     | `CostModel` (distance/delay blend), `EdgeCosts`              |
//! | [`overlay`]  | `ExclusionSet`: per-search removed edges                    |
//! | [`route`]    | `Route`, `RouteCandidate`                                    |
//! | [`dijkstra`] | Single-source search with early exit                         |
//! | [`yen`]      | `k_shortest_routes`: loopless alternatives                  |
//! | [`planner`]  | `Planner` trait, `YenPlanner`, `PlannerConfig`, `plan_batch` |
//! | [`deadline`] | `Deadline`: optional wall-clock budget per query            |
//! | [`error`]    | `PlanError`, `PlanResult<T>`                                 |
//!
//! # Immutability
//!
//! Every query reads the shared [`WaypointGraph`](tr_graph::WaypointGraph)
//! and the delay source without mutating either.  Edges removed during a
//! k-shortest search live in a private [`ExclusionSet`], so any number of
//! queries can run concurrently on one graph.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `plan_batch` runs requests on Rayon's thread pool.      |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `PlannerConfig`.   |

pub mod cost;
pub mod deadline;
pub mod dijkstra;
pub mod error;
pub mod overlay;
pub mod planner;
pub mod route;
pub mod yen;

#[cfg(test)]
mod tests;

pub use cost::{CostModel, EdgeCosts};
pub use deadline::Deadline;
pub use error::{PlanError, PlanResult};
pub use overlay::ExclusionSet;
pub use planner::{PlanRequest, Planner, PlannerConfig, YenPlanner, plan_batch};
pub use route::{Route, RouteCandidate};
