mod notice;
mod state;

pub use notice::{DEFAULT_DISPLAY, Notice, Status};
pub use state::{Event, StateMachine, Transition};
