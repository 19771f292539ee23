//! Runtime that hosts the **typewriter** widgets.
//!
//! Applications follow the Elm architecture: state lives in a [`Model`],
//! changes only inside [`Model::update`], and everything time- or
//! IO-driven is pushed to the edges as [`Command`]s and [`Subscription`]s.
//! Timed animation falls out of this naturally: a widget that wants to
//! change every 100ms returns an [`Every`] subscription, and the runtime
//! starts, keeps or aborts it by comparing [`SubscriptionId`]s after every
//! update.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application (init / update / view / subscriptions) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | One-off side effect returned from `init` or `update` |
//! | [`Subscription`] | Long-lived event source, diffed by identity |
//! | [`Program`] | Drives a [`Model`] on a real terminal |
//! | [`TestProgram`](testing::TestProgram) | Headless harness with virtual-time support |
//!
//! Logging goes through [`tracing`]; nothing is emitted unless the
//! application installs a subscriber.

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{OutputTarget, Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{terminal_events, Every};

/// Run a model with default options until it quits.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run a model with custom options until it quits.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
