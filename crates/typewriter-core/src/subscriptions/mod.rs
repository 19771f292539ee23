//! Built-in subscription sources.
//!
//! - **Terminal events** ([`terminal_events`], [`TerminalEvents`]): keys,
//!   mouse, resize, focus and paste.
//! - **Timers** ([`Every`]): repeating ticks.

mod terminal;
mod timer;

pub use terminal::*;
pub use timer::*;
