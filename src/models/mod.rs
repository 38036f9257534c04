mod outcome;
mod session;

pub use outcome::{worst_state, CheckResult, Metric, Outcome, State};
pub use session::{ParsedSection, SessionFields, SessionId, SessionState};
