//! Text that types itself out one character at a time.
//!
//! [`TypingText`] runs two independent timed loops:
//!
//! * the **reveal loop** shows one more character of the text per typing
//!   interval until the whole text is visible, then stops;
//! * the **blink loop** (only with [`with_cursor`](TypingText::with_cursor))
//!   toggles a trailing cursor glyph every 500ms for as long as the widget
//!   is alive.
//!
//! Replacing the text with [`set_text`](TypingText::set_text) throws the
//! current reveal run away and types the new text from the start. The blink
//! loop is not touched.
//!
//! ```rust,ignore
//! let intro = TypingText::new("intro", "Hello, World!")
//!     .with_typing_speed(Duration::from_millis(80))
//!     .with_cursor(true);
//! ```

use crate::cursor::{self, Cursor};
use futures::stream::BoxStream;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;
use std::time::{Duration, Instant};
use typewriter_core::{
    subscribe, Command, Component, Every, Subscription, SubscriptionId, SubscriptionSource,
};

/// Delay between two revealed characters when none is configured.
pub const DEFAULT_TYPING_SPEED: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Reveal the next character of run `generation`.
    Reveal { generation: u64 },
    /// Forwarded to the blink loop.
    Cursor(cursor::Message),
    /// Run `generation` just revealed its last character.
    ///
    /// Emitted by [`TypingText::update`] as a [`Command::message`] so a parent
    /// can react to it; the widget itself ignores it.
    Completed { generation: u64 },
}

/// A text widget with a typewriter animation and an optional blinking cursor.
pub struct TypingText {
    text: String,
    /// Number of `char`s currently shown.
    revealed: usize,
    /// `self.text.chars().count()`, cached.
    len: usize,
    typing_speed: Duration,
    with_cursor: bool,
    cursor: Cursor,
    style: Style,
    generation: u64,
    id: &'static str,
}

impl TypingText {
    /// Start typing `text` from an empty display.
    ///
    /// Defaults: 100ms per character, no cursor. `id` names the widget's
    /// timers and must be unique among the timers of one program.
    pub fn new(id: &'static str, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            len: text.chars().count(),
            text,
            revealed: 0,
            typing_speed: DEFAULT_TYPING_SPEED,
            with_cursor: false,
            cursor: Cursor::new(id),
            style: Style::default(),
            generation: 0,
            id,
        }
    }

    /// Delay between characters. Zero shows the whole text immediately.
    pub fn with_typing_speed(mut self, speed: Duration) -> Self {
        self.typing_speed = speed;
        self
    }

    /// Show a blinking cursor after the text.
    pub fn with_cursor(mut self, enabled: bool) -> Self {
        self.set_cursor(enabled);
        self
    }

    /// Blink cadence of the cursor (default 500ms).
    pub fn with_blink_interval(mut self, interval: Duration) -> Self {
        self.cursor = self.cursor.with_blink_interval(interval);
        self
    }

    /// Cursor glyph (default `|`).
    pub fn with_cursor_glyph(mut self, glyph: char) -> Self {
        self.cursor = self.cursor.with_glyph(glyph);
        self
    }

    pub fn with_cursor_style(mut self, style: Style) -> Self {
        self.cursor = self.cursor.with_style(style);
        self
    }

    /// Style of the typed text.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Replace the text and restart typing from an empty display.
    ///
    /// Setting the text it already has does nothing.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.len = text.chars().count();
        self.text = text;
        self.revealed = 0;
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(
            id = self.id,
            generation = self.generation,
            chars = self.len,
            "restarting reveal"
        );
    }

    /// Turn the cursor on or off without touching the reveal run.
    ///
    /// A cursor that is turned on starts dark and lights on its first blink
    /// tick, one blink interval later.
    pub fn set_cursor(&mut self, enabled: bool) {
        if enabled == self.with_cursor {
            return;
        }
        self.with_cursor = enabled;
        self.cursor.reset();
        tracing::debug!(id = self.id, enabled, "cursor toggled");
    }

    pub fn has_cursor(&self) -> bool {
        self.with_cursor
    }

    /// The full target text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters currently shown.
    pub fn revealed(&self) -> usize {
        if self.typing_speed.is_zero() {
            self.len
        } else {
            self.revealed
        }
    }

    /// The part of the text currently shown. Always a prefix of
    /// [`text`](TypingText::text), cut on a `char` boundary.
    pub fn visible_text(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.revealed())
            .map_or(self.text.len(), |(i, _)| i);
        &self.text[..end]
    }

    /// Whether the whole text is shown.
    pub fn is_complete(&self) -> bool {
        self.revealed() >= self.len
    }

    /// Whether the cursor glyph is drawn right now.
    pub fn cursor_visible(&self) -> bool {
        self.with_cursor && self.cursor.is_visible()
    }

    /// Counter of the current reveal run; bumped by every real text change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn typing_speed(&self) -> Duration {
        self.typing_speed
    }

    /// What the widget displays right now, cursor glyph included.
    pub fn rendered(&self) -> String {
        let mut out = self.visible_text().to_owned();
        if self.cursor_visible() {
            out.push(self.cursor.glyph());
        }
        out
    }

    fn reveal(&mut self, generation: u64) -> Command<Message> {
        if generation != self.generation || self.is_complete() {
            tracing::trace!(id = self.id, generation, "dropping stale reveal tick");
            return Command::none();
        }
        self.revealed += 1;
        if self.is_complete() {
            tracing::debug!(id = self.id, generation, "reveal complete");
            Command::message(Message::Completed { generation })
        } else {
            Command::none()
        }
    }
}

impl Component for TypingText {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Reveal { generation } => self.reveal(generation),
            Message::Cursor(m) => {
                if self.with_cursor {
                    self.cursor.update(m);
                }
                Command::none()
            }
            Message::Completed { .. } => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut lines: Vec<Line> = self
            .visible_text()
            .split('\n')
            .map(|line| Line::from(Span::styled(line, self.style)))
            .collect();
        if let (Some(glyph), Some(last)) = (
            self.with_cursor.then(|| self.cursor.span()).flatten(),
            lines.last_mut(),
        ) {
            last.push_span(glyph);
        }

        let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        let mut subs = Vec::new();

        if !self.is_complete() {
            let generation = self.generation;
            let timer = RevealTimer {
                interval: self.typing_speed,
                id: self.id,
                generation,
            };
            subs.push(subscribe(timer).map(move |_| Message::Reveal { generation }));
        }

        if self.with_cursor {
            subs.extend(self.cursor.subscription().map(|sub| sub.map(Message::Cursor)));
        }

        subs
    }
}

/// Ticks once per typing interval for a single reveal run.
///
/// Its identity is `(id, generation)` under its own type, so a text change
/// aborts the old run's timer and it can never be mistaken for the cursor's
/// blink timer.
struct RevealTimer {
    interval: Duration,
    id: &'static str,
    generation: u64,
}

impl SubscriptionSource for RevealTimer {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str_key::<Self>(self.id, self.generation)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        Every::new(self.interval, self.id).stream()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typewriter_core::testing::TestProgram;
    use typewriter_core::Model;

    fn tick(t: &mut TypingText) -> Command<Message> {
        let generation = t.generation();
        t.update(Message::Reveal { generation })
    }

    fn cursor_id() -> SubscriptionId {
        Every::new(cursor::DEFAULT_BLINK_INTERVAL, "typing").id()
    }

    fn blink(t: &mut TypingText) {
        t.update(Message::Cursor(cursor::Message::BlinkTick));
    }

    fn ids(t: &TypingText) -> Vec<SubscriptionId> {
        t.subscriptions().iter().map(|s| s.id().clone()).collect()
    }

    #[test]
    fn defaults() {
        let t = TypingText::new("typing", "Hi");
        assert_eq!(t.typing_speed(), Duration::from_millis(100));
        assert_eq!(t.visible_text(), "");
        assert_eq!(t.rendered(), "");
        assert!(!t.cursor_visible());
        assert!(!t.has_cursor());
        assert!(!t.is_complete());
    }

    #[test]
    fn cursor_starts_dark_and_first_blink_lights_it() {
        let mut t = TypingText::new("typing", "").with_cursor(true);
        assert_eq!(t.rendered(), "");
        blink(&mut t);
        assert_eq!(t.rendered(), "|");
        blink(&mut t);
        assert_eq!(t.rendered(), "");
    }

    #[test]
    fn each_tick_reveals_one_more_char() {
        let text = "typing";
        let mut t = TypingText::new("typing", text);
        for n in 1..=text.len() {
            tick(&mut t);
            assert_eq!(t.revealed(), n);
            assert_eq!(t.visible_text(), &text[..n]);
        }
        assert!(t.is_complete());
        assert_eq!(t.visible_text(), text);
    }

    #[test]
    fn last_char_emits_completed() {
        let mut t = TypingText::new("typing", "ab");
        assert!(tick(&mut t).is_none());
        let done = tick(&mut t).into_message();
        assert_eq!(done, Some(Message::Completed { generation: 0 }));
        // Further ticks are ignored.
        assert!(tick(&mut t).is_none());
        assert_eq!(t.visible_text(), "ab");
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut t = TypingText::new("typing", "first");
        tick(&mut t);
        t.set_text("second");
        t.update(Message::Reveal { generation: 0 });
        assert_eq!(t.visible_text(), "");
        tick(&mut t);
        assert_eq!(t.visible_text(), "s");
    }

    #[test]
    fn set_text_restarts_run() {
        let mut t = TypingText::new("typing", "Hello");
        tick(&mut t);
        tick(&mut t);
        t.set_text("World");
        assert_eq!(t.generation(), 1);
        assert_eq!(t.text(), "World");
        assert_eq!(t.visible_text(), "");
        assert!(!t.is_complete());
    }

    #[test]
    fn same_text_does_not_restart() {
        let mut t = TypingText::new("typing", "Hello");
        tick(&mut t);
        t.set_text("Hello");
        assert_eq!(t.generation(), 0);
        assert_eq!(t.visible_text(), "H");
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundaries() {
        let mut t = TypingText::new("typing", "héllo ✓");
        let mut seen = Vec::new();
        while !t.is_complete() {
            tick(&mut t);
            seen.push(t.visible_text().to_owned());
        }
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[1], "hé");
        assert_eq!(seen[6], "héllo ✓");
    }

    #[test]
    fn empty_text_is_complete_without_ticks() {
        let t = TypingText::new("typing", "");
        assert!(t.is_complete());
        assert!(t.subscriptions().is_empty());
    }

    #[test]
    fn zero_speed_shows_everything_at_once() {
        let t = TypingText::new("typing", "instant").with_typing_speed(Duration::ZERO);
        assert_eq!(t.visible_text(), "instant");
        assert!(t.is_complete());
        assert!(t.subscriptions().is_empty());
    }

    #[test]
    fn cursor_disabled_never_shows_glyph() {
        let mut t = TypingText::new("typing", "ab");
        for _ in 0..5 {
            blink(&mut t);
            tick(&mut t);
            assert!(!t.rendered().contains('|'));
        }
        assert_eq!(t.subscriptions().len(), 0);
    }

    #[test]
    fn cursor_blinks_independently_of_reveal() {
        let mut t = TypingText::new("typing", "ab").with_cursor(true);
        assert_eq!(t.rendered(), "");
        tick(&mut t);
        assert_eq!(t.rendered(), "a");
        blink(&mut t);
        assert_eq!(t.rendered(), "a|");
        tick(&mut t);
        assert_eq!(t.rendered(), "ab|");
        blink(&mut t);
        assert_eq!(t.rendered(), "ab");
    }

    #[test]
    fn set_cursor_keeps_reveal_progress() {
        let mut t = TypingText::new("typing", "abc");
        tick(&mut t);
        t.set_cursor(true);
        assert!(t.has_cursor());
        assert_eq!(t.visible_text(), "a");
        assert_eq!(t.generation(), 0);

        blink(&mut t);
        assert_eq!(t.rendered(), "a|");
        t.set_cursor(false);
        assert_eq!(t.rendered(), "a");
        t.set_cursor(true);
        assert_eq!(t.rendered(), "a");
    }

    #[test]
    fn reveal_timer_identity_follows_generation() {
        let mut t = TypingText::new("typing", "abc").with_cursor(true);
        let before = ids(&t);
        t.set_text("xyz");
        let after = ids(&t);

        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 2);
        assert_ne!(before[0], after[0]);
        assert_eq!(before[1], cursor_id());
        assert_eq!(after[1], cursor_id());
    }

    #[test]
    fn complete_widget_keeps_only_cursor_timer() {
        let mut t = TypingText::new("typing", "a").with_cursor(true);
        tick(&mut t);
        assert_eq!(ids(&t), vec![cursor_id()]);
    }

    #[test]
    fn reveal_timer_never_collides_with_cursor() {
        let mut t = TypingText::new("typing", "abc").with_cursor(true);
        t.generation = u64::MAX;
        let reveal = t.subscriptions()[0].id().clone();
        assert_ne!(reveal, cursor_id());
        t.generation = 0;
        assert_ne!(t.subscriptions()[0].id(), &cursor_id());

        t.set_text("xyz");
        assert_ne!(ids(&t)[0], reveal);
    }

    // --- Driven through the runtime harness ---

    struct Screen {
        typing: Option<TypingText>,
        completed: Vec<u64>,
    }

    #[derive(Debug)]
    enum Msg {
        Typing(Message),
        SetText(&'static str),
        SetCursor(bool),
        Remove,
    }

    struct Flags {
        text: &'static str,
        speed: Duration,
        cursor: bool,
    }

    impl Flags {
        fn new(text: &'static str) -> Self {
            Self {
                text,
                speed: DEFAULT_TYPING_SPEED,
                cursor: false,
            }
        }

        fn cursor(mut self) -> Self {
            self.cursor = true;
            self
        }
    }

    impl Model for Screen {
        type Message = Msg;
        type Flags = Flags;

        fn init(flags: Flags) -> (Self, Command<Msg>) {
            let typing = TypingText::new("typing", flags.text)
                .with_typing_speed(flags.speed)
                .with_cursor(flags.cursor);
            let screen = Screen {
                typing: Some(typing),
                completed: Vec::new(),
            };
            (screen, Command::none())
        }

        fn update(&mut self, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Typing(Message::Completed { generation }) => {
                    self.completed.push(generation);
                    Command::none()
                }
                Msg::Typing(m) => match self.typing.as_mut() {
                    Some(typing) => typing.update(m).map(Msg::Typing),
                    None => Command::none(),
                },
                Msg::SetText(text) => {
                    if let Some(typing) = self.typing.as_mut() {
                        typing.set_text(text);
                    }
                    Command::none()
                }
                Msg::SetCursor(enabled) => {
                    if let Some(typing) = self.typing.as_mut() {
                        typing.set_cursor(enabled);
                    }
                    Command::none()
                }
                Msg::Remove => {
                    self.typing = None;
                    Command::none()
                }
            }
        }

        fn view(&self, frame: &mut Frame) {
            if let Some(typing) = &self.typing {
                typing.view(frame, frame.area());
            }
        }

        fn subscriptions(&self) -> Vec<Subscription<Msg>> {
            self.typing
                .iter()
                .flat_map(|typing| typing.subscriptions())
                .map(|sub| sub.map(Msg::Typing))
                .collect()
        }
    }

    fn shown(prog: &TestProgram<Screen>) -> String {
        prog.model()
            .typing
            .as_ref()
            .map(TypingText::rendered)
            .unwrap_or_default()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn types_hi_at_100ms_per_char() {
        let mut prog = TestProgram::<Screen>::new(Flags::new("Hi"));

        prog.advance(ms(50)).await;
        assert_eq!(shown(&prog), "");
        prog.advance(ms(100)).await; // t = 150
        assert_eq!(shown(&prog), "H");
        prog.advance(ms(100)).await; // t = 250
        assert_eq!(shown(&prog), "Hi");
        assert_eq!(prog.model().completed, vec![0]);

        prog.advance(ms(1_000)).await;
        assert_eq!(shown(&prog), "Hi");
        assert_eq!(prog.active_subscriptions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn prefix_grows_by_one_per_interval() {
        let text = "abcdef";
        let mut prog = TestProgram::<Screen>::new(Flags::new(text));
        prog.advance(ms(50)).await;
        for n in 1..=text.len() {
            prog.advance(ms(100)).await;
            assert_eq!(shown(&prog), &text[..n]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn changing_text_mid_run_restarts() {
        let mut prog = TestProgram::<Screen>::new(Flags::new("Hello"));
        prog.advance(ms(250)).await;
        assert_eq!(shown(&prog), "He");

        prog.send(Msg::SetText("World"));
        assert_eq!(shown(&prog), "");

        prog.advance(ms(150)).await;
        assert_eq!(shown(&prog), "W");
        prog.advance(ms(1_000)).await;
        assert_eq!(shown(&prog), "World");
        assert_eq!(prog.model().completed, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_with_cursor_only_blinks() {
        let mut prog = TestProgram::<Screen>::new(Flags::new("").cursor());
        let mut seen = vec![shown(&prog)];
        prog.advance(ms(250)).await;
        seen.push(shown(&prog));
        for _ in 0..3 {
            prog.advance(ms(500)).await; // t = 750, 1250, 1750
            seen.push(shown(&prog));
        }
        assert_eq!(seen, vec!["", "", "|", "", "|"]);
        assert_eq!(prog.active_subscriptions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn text_change_keeps_blink_phase() {
        let mut prog = TestProgram::<Screen>::new(Flags::new("abcdefghij").cursor());
        prog.advance(ms(700)).await;
        assert!(prog.model().typing.as_ref().is_some_and(TypingText::cursor_visible));
        assert!(prog.is_subscribed(&cursor_id()));

        prog.send(Msg::SetText("xyz"));
        // The original blink timer fires again at t = 1000.
        prog.advance(ms(400)).await;
        assert!(prog.is_subscribed(&cursor_id()));
        assert!(!prog.model().typing.as_ref().is_some_and(TypingText::cursor_visible));
    }

    #[tokio::test(start_paused = true)]
    async fn cursor_can_be_toggled_mid_run() {
        let mut prog = TestProgram::<Screen>::new(Flags::new("abcdefghij"));
        prog.advance(ms(350)).await;
        assert_eq!(shown(&prog), "abc");
        assert!(!prog.is_subscribed(&cursor_id()));

        prog.send(Msg::SetCursor(true));
        assert_eq!(shown(&prog), "abc");
        prog.advance(ms(10)).await;
        assert!(prog.is_subscribed(&cursor_id()));
        assert_eq!(prog.active_subscriptions(), 2);

        // Lit one blink interval after being turned on.
        prog.advance(ms(500)).await; // t = 860
        assert_eq!(shown(&prog), "abcdefgh|");
        assert_eq!(prog.model().typing.as_ref().map(TypingText::generation), Some(0));

        prog.send(Msg::SetCursor(false));
        prog.advance(ms(10)).await;
        assert!(!prog.is_subscribed(&cursor_id()));
        assert_eq!(prog.active_subscriptions(), 1);

        prog.advance(ms(200)).await; // t = 1070
        assert_eq!(shown(&prog), "abcdefghij");
    }

    #[tokio::test(start_paused = true)]
    async fn removing_the_widget_cancels_both_loops() {
        let mut prog = TestProgram::<Screen>::new(Flags::new("long enough text").cursor());
        prog.advance(ms(250)).await;
        assert_eq!(prog.active_subscriptions(), 2);

        prog.send(Msg::Remove);
        prog.advance(ms(10)).await;
        assert_eq!(prog.active_subscriptions(), 0);

        prog.advance(ms(2_000)).await;
        assert_eq!(shown(&prog), "");
    }

    #[test]
    fn view_appends_cursor_to_last_line() {
        let mut prog = TestProgram::<Screen>::new(Flags::new("one\ntwo").cursor());
        for _ in 0..7 {
            prog.send(Msg::Typing(Message::Reveal { generation: 0 }));
        }
        prog.send(Msg::Typing(Message::Cursor(cursor::Message::BlinkTick)));
        let out = prog.render_string(10, 2);
        let rows: Vec<&str> = out.lines().map(str::trim_end).collect();
        assert_eq!(rows, vec!["one", "two|"]);
    }

    #[test]
    fn view_without_cursor_renders_prefix() {
        let mut prog = TestProgram::<Screen>::new(Flags::new("Hello"));
        prog.send(Msg::Typing(Message::Reveal { generation: 0 }));
        prog.send(Msg::Typing(Message::Reveal { generation: 0 }));
        assert_eq!(prog.render_string(10, 1).trim_end(), "He");
    }
}
