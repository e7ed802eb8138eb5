//! `tr-eta`: everything between a planned route and the ETA model.
//!
//! The regression model itself lives outside this workspace.  This crate
//! turns candidate routes into fixed-order [`FeatureVector`]s, defines the
//! [`EtaEstimator`] seam the model plugs into, picks the fastest candidate,
//! and logs how each ride's prediction compared with reality.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`vector`]      | `FeatureVector`, `FEATURE_NAMES`                          |
//! | [`environment`] | `Environment`, `Weather`, `WeatherCode`                   |
//! | [`extract`]     | `extract_features`: route + graph + delays → vector      |
//! | [`eta`]         | `EtaEstimator` trait, `FreeFlowEstimator`, route choice   |
//! | [`evaluation`]  | `RideEvaluation`, append-only CSV `EvaluationLog`         |
//! | [`error`]       | `EtaError`, `EtaResult<T>`                                |

pub mod environment;
pub mod error;
pub mod eta;
pub mod evaluation;
pub mod extract;
pub mod vector;


pub use environment::{Environment, Weather, WeatherCode};
pub use error::{EtaError, EtaResult};
pub use eta::{EtaEstimator, FreeFlowEstimator, RouteChoice, select_best_route};
pub use evaluation::{EvaluationLog, RideEvaluation};
pub use extract::{TRAFFIC_LIGHT_RADIUS_M, TURN_THRESHOLD_DEG, extract_features};
pub use vector::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
