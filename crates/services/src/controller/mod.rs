mod phase;
pub mod runtime;
mod session;
mod view;

pub use phase::{ActiveSession, Completion, Controls, Phase, PhaseKind, SubmitTrigger};
pub use runtime::{ControllerHandle, spawn};
pub use session::{Command, ControllerOptions, SessionController};
pub use view::{Notice, NoticeLevel, Screen};
