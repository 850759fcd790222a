//! Application state layer for faro.
//!
//! This module groups the stateful pieces driven by the event loop:
//! - [engine]: the [BrowserEngine] command dispatcher and its clipboard.
//! - [session]: per-tab state and the [SessionManager].
//! - [history]: back/forward navigation history.
//!
//! The engine is the only entry point the terminal loop talks to.

pub mod engine;
pub mod history;
pub mod session;

pub use engine::{BrowserEngine, Clipboard, ClipboardOp, Command, CommandResult};
pub use history::NavigationHistory;
pub use session::{Session, SessionManager};
