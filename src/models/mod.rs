pub mod event;
pub mod signals;
pub mod tab;

pub use event::BrowserEvent;
pub use signals::{IdleState, MediaState, SystemSignals};
pub use tab::{Tab, TabStatus};
