//! Malaria Risk Core - feature assembly, models, scoring and sessions
//!
//! Raw survey fields go through the feature assembler into the column order
//! the trained model expects, get scored by a `RiskModel`, and are bucketed
//! into a risk tier with a recommendation. Dashboard sessions keep their own
//! prediction history.

pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod scoring;
pub mod session;
pub mod dashboard;

pub use config::{ConfigPaths, ScoringConfig};
pub use error::{ConfigError, ScoringError, ScoringResult};
pub use features::{ColumnSpec, FeatureVector, FieldMap, RawInput};
pub use model::{LoadedModel, ModelCache, ModelRegistry, RiskModel};
pub use scoring::{PredictionResult, RiskTier, ScoreOutput};
pub use session::{DashboardSession, SessionStore};
pub use dashboard::Dashboard;
