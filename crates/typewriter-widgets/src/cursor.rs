//! Blinking cursor glyph.

use ratatui::style::Style;
use ratatui::text::Span;
use std::time::Duration;
use typewriter_core::{subscribe, Every, Subscription};

/// Blink cadence used when none is configured.
pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Glyph used when none is configured.
pub const DEFAULT_GLYPH: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Flip visibility.
    BlinkTick,
}

/// A single-character cursor that blinks.
///
/// Starts dark: the first blink tick lights it, the next one puts it out
/// again. Its blink timer is identified by the `id` given to
/// [`Cursor::new`] alone, so the timer keeps its phase no matter what the
/// surrounding widget does.
///
/// The cursor is a building block for other widgets rather than a
/// [`Component`](typewriter_core::Component) of its own: the owner renders
/// [`span`](Cursor::span) wherever the glyph belongs and forwards
/// [`subscription`](Cursor::subscription) and [`update`](Cursor::update).
pub struct Cursor {
    visible: bool,
    blink_interval: Duration,
    style: Style,
    glyph: char,
    id: &'static str,
}

impl Cursor {
    /// A `|` cursor toggling every 500ms.
    pub fn new(id: &'static str) -> Self {
        Self {
            visible: false,
            blink_interval: DEFAULT_BLINK_INTERVAL,
            style: Style::default(),
            glyph: DEFAULT_GLYPH,
            id,
        }
    }

    /// Time between visibility flips. Zero keeps the cursor lit.
    pub fn with_blink_interval(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    /// Put the cursor out, as if freshly created.
    pub fn reset(&mut self) {
        self.visible = false;
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn blink_interval(&self) -> Duration {
        self.blink_interval
    }

    /// Whether the glyph should be drawn right now.
    pub fn is_visible(&self) -> bool {
        self.visible || !self.blinks()
    }

    /// The styled glyph, or `None` while it is blinked off.
    pub fn span(&self) -> Option<Span<'static>> {
        self.is_visible()
            .then(|| Span::styled(self.glyph.to_string(), self.style))
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::BlinkTick => {
                if self.blinks() {
                    self.visible = !self.visible;
                }
            }
        }
    }

    /// The blink timer, or `None` when the cursor does not blink.
    pub fn subscription(&self) -> Option<Subscription<Message>> {
        self.blinks().then(|| {
            subscribe(Every::new(self.blink_interval, self.id)).map(|_| Message::BlinkTick)
        })
    }

    fn blinks(&self) -> bool {
        !self.blink_interval.is_zero()
    }
}
