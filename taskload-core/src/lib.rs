pub mod key;
pub mod level;
pub mod record;
pub mod rules;
pub mod trial;

pub use key::{KeyCode, KeyEvent};
pub use level::{Level, ParseLevelError};
pub use record::TrialRecord;
pub use rules::Action;
pub use trial::{Outcome, Trial};
