use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;

/// A repeating timer.
///
/// The first tick arrives one full `interval` after the subscription starts,
/// then once per `interval`. Late ticks are delayed rather than burst, so a
/// stalled event loop never replays a backlog.
///
/// Identity is the name alone, not the interval.
///
/// # Panics
///
/// The stream panics if `interval` is zero. Callers with user-supplied
/// intervals should filter that case out before subscribing.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use typewriter_core::{subscribe, Every};
///
/// let sub = subscribe(Every::new(Duration::from_millis(500), "blink"))
///     .map(|_| Msg::Blink);
/// ```
pub struct Every {
    /// Time between ticks.
    pub interval: Duration,
    /// Name distinguishing this timer from others.
    pub id: &'static str,
}

impl Every {
    /// A repeating timer named `id`.
    pub fn new(interval: Duration, id: &'static str) -> Self {
        Self { interval, id }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<Self>(self.id)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let start = tokio::time::Instant::now() + self.interval;
        let mut interval = tokio::time::interval_at(start, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Box::pin(IntervalStream::new(interval).map(|tick| tick.into_std()))
    }
}
