pub mod config;
pub mod display;
pub mod engine;
pub mod run;
pub mod sequence;

pub use config::RunConfig;
pub use display::{NullDisplay, StimulusDisplay};
pub use engine::{Engine, RunReport};
pub use run::{EngineState, RunHandle};
pub use sequence::{Sequence, SequenceGenerator};
