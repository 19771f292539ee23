use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

type Spawner<Msg> = Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>;

/// A long-lived event source owned by the runtime.
///
/// Models never start or stop subscriptions themselves. They return the set
/// they want from [`Model::subscriptions`](crate::Model::subscriptions) and
/// the runtime reconciles that set by [`SubscriptionId`] after every
/// update.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Spawner<Msg>,
}

/// Identity used to diff subscriptions between update cycles.
///
/// Two subscriptions with equal IDs are considered the same running source:
/// the second one is discarded and the first keeps running. Folding state
/// into the ID (a run counter, say) is therefore how a model asks for a
/// source to be restarted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// An ID from a type and a numeric discriminant.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// An ID for a singleton source of type `T`.
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }

    /// An ID from a type and a string name.
    pub fn with_str<T: 'static>(s: &str) -> Self {
        Self::with_str_key::<T>(s, 0)
    }

    /// An ID from a type, a string name, and a numeric key.
    pub fn with_str_key<T: 'static>(s: &str, key: u64) -> Self {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        key.hash(&mut hasher);
        Self::new::<T>(hasher.finish())
    }
}

/// Something that can produce a stream of values for a [`Subscription`].
pub trait SubscriptionSource: Send + 'static {
    /// Values emitted by the stream.
    type Output: Send + 'static;

    /// Identity of this source instance.
    fn id(&self) -> SubscriptionId;

    /// Build the stream. Called once, when the runtime first starts the
    /// subscription; the stream is dropped when the subscription is removed.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Turn a [`SubscriptionSource`] into a [`Subscription`].
pub fn subscribe<S>(source: S) -> Subscription<S::Output>
where
    S: SubscriptionSource,
{
    let id = source.id();
    Subscription {
        id,
        spawn: Box::new(move |tx| forward(source.stream(), tx)),
    }
}

/// Drive `stream` on its own task, pushing every item into `tx` until either
/// side goes away.
fn forward<Msg: Send + 'static>(
    mut stream: BoxStream<'static, Msg>,
    tx: mpsc::UnboundedSender<Msg>,
) -> AbortHandle {
    tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            if tx.send(msg).is_err() {
                break;
            }
        }
    })
    .abort_handle()
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Build a subscription directly from a stream.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            spawn: Box::new(move |tx| forward(stream, tx)),
        }
    }

    /// The identity the runtime diffs on.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Lift the message type, keeping the identity unchanged.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        Subscription {
            id: self.id,
            spawn: Box::new(move |outer_tx: mpsc::UnboundedSender<NewMsg>| {
                let (inner_tx, mut inner_rx) = mpsc::unbounded_channel::<Msg>();
                let abort = (self.spawn)(inner_tx);

                // Ends on its own once the source task is aborted and
                // `inner_tx` is dropped.
                tokio::spawn(async move {
                    while let Some(msg) = inner_rx.recv().await {
                        if outer_tx.send(f(msg)).is_err() {
                            break;
                        }
                    }
                });

                abort
            }),
        }
    }
}

/// Running subscriptions, keyed by identity.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Make the running set match `wanted`.
    ///
    /// Must be called from within a tokio runtime when `wanted` contains
    /// identities that are not running yet.
    pub fn reconcile(&mut self, wanted: Vec<Subscription<Msg>>) {
        let mut wanted: HashMap<SubscriptionId, Subscription<Msg>> =
            wanted.into_iter().map(|sub| (sub.id.clone(), sub)).collect();

        self.active.retain(|id, handle| {
            let keep = wanted.contains_key(id);
            if !keep {
                tracing::trace!(?id, "stopping subscription");
                handle.abort();
            }
            keep
        });

        for (id, sub) in wanted.drain() {
            if !self.active.contains_key(&id) {
                tracing::trace!(?id, "starting subscription");
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort everything.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn contains(&self, id: &SubscriptionId) -> bool {
        self.active.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(id: SubscriptionId) -> Subscription<i32> {
        Subscription::from_stream(id, Box::pin(futures::stream::pending()))
    }

    #[test]
    fn ids_compare_by_type() {
        assert_eq!(SubscriptionId::of::<String>(), SubscriptionId::of::<String>());
        assert_ne!(SubscriptionId::of::<String>(), SubscriptionId::of::<i32>());
    }

    #[test]
    fn ids_compare_by_discriminant() {
        assert_ne!(
            SubscriptionId::new::<String>(1),
            SubscriptionId::new::<String>(2)
        );
    }

    #[test]
    fn string_ids_hash_name_and_key() {
        let a = SubscriptionId::with_str::<String>("a");
        assert_eq!(a, SubscriptionId::with_str::<String>("a"));
        assert_ne!(a, SubscriptionId::with_str::<String>("b"));
        assert_eq!(a, SubscriptionId::with_str_key::<String>("a", 0));
        assert_ne!(a, SubscriptionId::with_str_key::<String>("a", 1));
    }

    #[test]
    fn map_keeps_identity() {
        let id = SubscriptionId::new::<String>(9);
        let sub = pending(id.clone()).map(|n| n + 1);
        assert_eq!(sub.id(), &id);
    }

    #[tokio::test]
    async fn reconcile_starts_new_and_keeps_existing() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        let id = SubscriptionId::of::<String>();

        manager.reconcile(vec![pending(id.clone())]);
        assert_eq!(manager.len(), 1);

        manager.reconcile(vec![pending(id.clone())]);
        assert_eq!(manager.len(), 1);
        assert!(manager.contains(&id));
    }

    #[tokio::test]
    async fn reconcile_stops_removed() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![pending(SubscriptionId::new::<String>(1))]);
        manager.reconcile(vec![pending(SubscriptionId::new::<String>(2))]);
        assert_eq!(manager.len(), 1);
        assert!(manager.contains(&SubscriptionId::new::<String>(2)));

        manager.reconcile(vec![]);
        assert_eq!(manager.len(), 0);
    }

    #[tokio::test]
    async fn shutdown_aborts_all() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        manager.reconcile(vec![
            pending(SubscriptionId::new::<String>(1)),
            pending(SubscriptionId::new::<String>(2)),
        ]);
        assert_eq!(manager.len(), 2);

        manager.shutdown();
        assert_eq!(manager.len(), 0);
    }

    #[tokio::test]
    async fn forwarded_stream_reaches_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        let stream = futures::stream::iter(vec![1, 2, 3]);
        manager.reconcile(vec![
            Subscription::from_stream(SubscriptionId::of::<u8>(), Box::pin(stream)).map(|n| n * 2),
        ]);

        let mut got = Vec::new();
        for _ in 0..3 {
            got.push(rx.recv().await.expect("message"));
        }
        assert_eq!(got, vec![2, 4, 6]);
    }
}
