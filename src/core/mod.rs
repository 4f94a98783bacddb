// Console logic exports
pub mod format;
pub mod labels;
pub mod score;
pub mod selection;
pub mod state;

pub use score::{format_score, score_color, score_level};
pub use selection::MaleSelection;
pub use state::{ConsoleState, LoadKind, MatchingStage, Notice, NoticeLevel, Tab, Ticket, WorkflowError};
