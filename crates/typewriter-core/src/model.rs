use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait.
///
/// A program is a loop of **init -> view -> (event -> update -> view)***:
///
/// 1. [`init`](Model::init) builds the starting state and may return a
///    [`Command`] to kick off work.
/// 2. [`view`](Model::view) draws the state to a ratatui [`Frame`].
/// 3. Events reach the model as messages, from [`Subscription`]s or from
///    finished [`Command`]s.
/// 4. [`update`](Model::update) applies each message and may return a
///    further [`Command`].
///
/// # Example
///
/// ```rust,ignore
/// use typewriter_core::{Command, Component, Model, Subscription};
/// use typewriter_widgets::typing_text::{self, TypingText};
/// use ratatui::Frame;
///
/// struct Intro {
///     line: TypingText,
/// }
///
/// enum Msg {
///     Line(typing_text::Message),
/// }
///
/// impl Model for Intro {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) {
///         (Intro { line: TypingText::new("intro", "Hello, World!") }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Line(m) => self.line.update(m).map(Msg::Line),
///         }
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         self.line.view(frame, frame.area());
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///         self.line
///             .subscriptions()
///             .into_iter()
///             .map(|s| s.map(Msg::Line))
///             .collect()
///     }
/// }
/// ```
pub trait Model: Sized + Send + 'static {
    /// Every event that can change the state.
    type Message: Send + 'static;

    /// Startup data passed to [`Model::init`]. Use `()` when there is none.
    type Flags: Send + 'static;

    /// Create the initial state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Apply a message and return any follow-up side effect.
    ///
    /// After `update` returns the runtime re-collects
    /// [`subscriptions`](Model::subscriptions) and schedules a redraw.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Draw the current state. Must not mutate anything.
    fn view(&self, frame: &mut Frame);

    /// Subscriptions that should be running for the current state.
    ///
    /// The runtime diffs the returned list by [`SubscriptionId`](crate::SubscriptionId)
    /// against what is already running: new identities are started,
    /// identities that disappeared are aborted, unchanged ones keep running
    /// untouched.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
