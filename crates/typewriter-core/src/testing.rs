use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::subscription::{SubscriptionId, SubscriptionManager};
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use std::time::Duration;
use tokio::sync::mpsc;

/// Headless harness that drives a [`Model`] without a terminal.
///
/// Two ways to move the model forward:
///
/// * **Synchronously**: [`send`](TestProgram::send) runs one update;
///   [`Command::message`]s it returns are queued and flushed by
///   [`drain_messages`](TestProgram::drain_messages). No runtime needed.
/// * **On a clock**: [`advance`](TestProgram::advance) starts the model's
///   subscriptions and feeds their messages through `update` until the
///   given amount of time has passed. Use it under
///   `#[tokio::test(start_paused = true)]` so timers run on virtual time.
///
/// Async [`Command::perform`] / [`Command::tick`] work is never executed.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test(start_paused = true)]
/// async fn types_hi() {
///     let mut prog = TestProgram::<Intro>::new("Hi");
///     prog.advance(Duration::from_millis(150)).await;
///     assert!(prog.render_string(10, 1).starts_with("H "));
/// }
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending: Vec<M::Message>,
    quit: bool,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
}

impl<M: Model> TestProgram<M> {
    /// Call [`Model::init`] and queue any immediate messages it returned.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let mut program = Self {
            model,
            pending: Vec::new(),
            quit: false,
            msg_rx,
            subscriptions: SubscriptionManager::new(msg_tx),
        };
        program.collect(init_cmd);
        program
    }

    /// Run one update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process queued immediate messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending.is_empty() {
            let batch: Vec<_> = self.pending.drain(..).collect();
            for msg in batch {
                self.send(msg);
            }
        }
    }

    /// Let `duration` of (ideally virtual) time pass with subscriptions live.
    ///
    /// Subscriptions are reconciled before waiting and after every message,
    /// exactly as the real runtime does, so timers restart or stop when the
    /// model's subscription set changes.
    pub async fn advance(&mut self, duration: Duration) {
        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);

        self.drain_messages();
        self.reconcile();

        loop {
            tokio::select! {
                biased;

                Some(msg) = self.msg_rx.recv() => {
                    self.send(msg);
                    self.drain_messages();
                    self.reconcile();
                }

                _ = &mut deadline => break,
            }
        }
    }

    /// Drop every running subscription, as if the program exited.
    pub fn stop(&mut self) {
        self.subscriptions.shutdown();
    }

    /// Number of subscriptions currently running.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether a subscription with this identity is currently running.
    pub fn is_subscribed(&self, id: &SubscriptionId) -> bool {
        self.subscriptions.contains(id)
    }

    /// Whether any update so far returned [`Command::quit`].
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access for arranging state outside the update cycle.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render into an in-memory buffer of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("test backend");
        terminal
            .draw(|frame| self.model.view(frame))
            .expect("draw to test backend");
        terminal.backend().buffer().clone()
    }

    /// Render and flatten the buffer into rows joined by `\n`.
    ///
    /// Rows keep their trailing padding, so compare with `starts_with` or
    /// `trim_end` rather than exact equality.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn reconcile(&mut self) {
        let wanted = self.model.subscriptions();
        self.subscriptions.reconcile(wanted);
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None | CommandInner::Future(_) => {}
            CommandInner::Action(Action::Message(msg)) => self.pending.push(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

impl<M: Model> Drop for TestProgram<M> {
    fn drop(&mut self) {
        self.subscriptions.shutdown();
    }
}
