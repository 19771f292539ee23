//! Widgets for **typewriter**.
//!
//! [`TypingText`] implements [`typewriter_core::Component`], so it embeds in
//! any [`typewriter_core::Model`] and renders into whatever
//! [`ratatui::layout::Rect`] the parent hands it.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`typing_text`] | Text revealed character by character, with an optional blinking cursor |
//! | [`cursor`] | Blinking cursor glyph used by `typing_text` |

pub mod cursor;
pub mod typing_text;

pub use cursor::Cursor;
pub use typing_text::TypingText;
