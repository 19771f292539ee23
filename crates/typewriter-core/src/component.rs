use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable piece of UI that renders into an area chosen by its parent.
///
/// `Component` mirrors [`Model`](crate::Model) without `init`: the parent
/// constructs it directly, routes messages to it, and decides which
/// [`Rect`] it draws into.
///
/// The parent owns the component's lifetime. While the component is held
/// and its [`subscriptions`](Component::subscriptions) are forwarded, its
/// timers run; once the parent drops it, those subscriptions vanish from
/// the parent's list and the runtime aborts them.
///
/// # Composition
///
/// Wrap the component's message in a parent variant and lift commands and
/// subscriptions with `map`:
///
/// ```rust,ignore
/// fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///     match msg {
///         AppMsg::Greeting(m) => self.greeting.update(m).map(AppMsg::Greeting),
///     }
/// }
///
/// fn subscriptions(&self) -> Vec<Subscription<AppMsg>> {
///     self.greeting
///         .subscriptions()
///         .into_iter()
///         .map(|s| s.map(AppMsg::Greeting))
///         .collect()
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's own message type.
    type Message: Send + 'static;

    /// Apply a message. Works exactly like [`Model::update`](crate::Model::update).
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations must stay inside it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Subscriptions this component needs right now.
    ///
    /// The parent collects these and returns them, mapped, from its own
    /// [`Model::subscriptions`](crate::Model::subscriptions).
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
