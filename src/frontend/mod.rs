pub mod tui;

pub use tui::{enter_terminal, leave_terminal, setup_panic_handler, TerminalDisplay, TerminalKeySource};
