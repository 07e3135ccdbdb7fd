pub mod engine;
pub mod fallback;
pub mod live;
pub mod local;
pub mod normalize;
pub mod refine;

pub use crate::domain::model::{LiveLookup, Property};
pub use crate::domain::ports::{SourceAttempt, SourceConfig};
pub use crate::utils::error::Result;
