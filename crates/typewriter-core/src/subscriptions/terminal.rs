use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId, SubscriptionSource};
use crossterm::event::EventStream;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Every terminal event crossterm reports.
///
/// When stdin is piped, crossterm falls back to `/dev/tty`, so key events
/// still arrive from the user's terminal.
pub struct TerminalEvents;

impl SubscriptionSource for TerminalEvents {
    type Output = TerminalEvent;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<Self>()
    }

    fn stream(self) -> BoxStream<'static, TerminalEvent> {
        Box::pin(EventStream::new().filter_map(|result| async move {
            result.ok().map(TerminalEvent::from)
        }))
    }
}

/// Terminal events filtered and mapped into the model's messages.
///
/// `map` returns `None` to drop an event.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) if key.code == KeyCode::Char('q') => Some(Msg::Quit),
///         _ => None,
///     })]
/// }
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    // The EventStream is created inside the task. Building it eagerly on
    // every subscriptions() call would poke crossterm's global reader and
    // steal events from the stream that is already running.
    Subscription {
        id: SubscriptionId::of::<TerminalEvents>(),
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            tokio::spawn(async move {
                let mut events = EventStream::new();
                while let Some(result) = events.next().await {
                    let Some(msg) = result.ok().and_then(|event| map(TerminalEvent::from(event)))
                    else {
                        continue;
                    };
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            })
            .abort_handle()
        }),
    }
}
