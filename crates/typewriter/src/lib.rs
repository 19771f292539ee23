//! **typewriter**: text that types itself out, for [`ratatui`] apps.
//!
//! Umbrella crate: one dependency gives you the runtime and the widgets.
//!
//! * Everything from [`typewriter_core`] sits at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Subscription`], [`run`], ...).
//! * [`widgets`] re-exports [`typewriter_widgets`] ([`TypingText`](widgets::TypingText)
//!   and [`Cursor`](widgets::Cursor)).
//! * [`ratatui`], [`crossterm`] and [`tokio`] are re-exported so apps don't
//!   need to pin their own versions.
//!
//! # Quick start
//!
//! ```ignore
//! use std::time::Duration;
//! use typewriter::widgets::typing_text::{self, TypingText};
//! use typewriter::{Command, Component, Model, Subscription};
//! use typewriter::ratatui::Frame;
//!
//! struct Hello {
//!     greeting: TypingText,
//! }
//!
//! enum Msg {
//!     Greeting(typing_text::Message),
//! }
//!
//! impl Model for Hello {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let greeting = TypingText::new("hello", "Hello, World!")
//!             .with_typing_speed(Duration::from_millis(80))
//!             .with_cursor(true);
//!         (Hello { greeting }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Greeting(m) => self.greeting.update(m).map(Msg::Greeting),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         self.greeting.view(frame, frame.area());
//!     }
//!
//!     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
//!         self.greeting
//!             .subscriptions()
//!             .into_iter()
//!             .map(|s| s.map(Msg::Greeting))
//!             .collect()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     typewriter::run::<Hello>(()).await.unwrap();
//! }
//! ```

pub use typewriter_core::*;
pub mod widgets {
    pub use typewriter_widgets::*;
}

pub use crossterm;
pub use ratatui;
pub use tokio;
