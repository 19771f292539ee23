use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor, execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::sync::Once;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Where the UI is drawn.
///
/// Rendering to [`Stderr`](OutputTarget::Stderr) keeps stdout free for
/// piping data out of the program.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
}

enum Output {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Output {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Output::Stdout(stdout()),
            OutputTarget::Stderr => Output::Stderr(stderr()),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Stderr(w) => w.flush(),
        }
    }
}

/// Errors raised while setting up, drawing to, or restoring the terminal.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Runtime configuration for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// let options = ProgramOptions {
///     fps: 30,
///     title: Some("intro".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Redraw rate cap, clamped to 1..=120 (default: 60).
    pub fps: u32,
    /// Draw on the alternate screen (default: true).
    pub alt_screen: bool,
    /// Terminal window title.
    pub title: Option<String>,
    /// Restore the terminal from a panic hook (default: true).
    pub catch_panics: bool,
    /// Quit on ctrl-c delivered as a signal (default: true).
    pub handle_signals: bool,
    /// Output stream (default: stdout).
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
            output: OutputTarget::default(),
        }
    }
}

/// Drives a [`Model`] against a real terminal.
///
/// The loop runs until the model returns [`Command::quit`] or ctrl-c
/// arrives as a signal. Redraws are coalesced to at most `fps` per second.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<Intro>::new(())?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Output>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
}

impl<M: Model> Program<M> {
    /// A program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// A program with custom options.
    ///
    /// Puts the terminal into raw mode, so this must run inside a tokio
    /// runtime and the returned program should be [`run`](Program::run).
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let terminal = init_terminal(&options)?;

        let mut program = Self {
            model,
            terminal,
            subscriptions: SubscriptionManager::new(msg_tx.clone()),
            msg_tx,
            msg_rx,
            options,
            needs_redraw: true,
            should_quit: false,
        };

        tracing::debug!(fps = program.options.fps, "program initialized");
        program.execute_command(init_cmd);
        program.reconcile();

        Ok(program)
    }

    /// Run until quit and return the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;

        tracing::debug!("shutting down");
        self.subscriptions.shutdown();
        restore_terminal(self.options.alt_screen, self.options.output)?;

        result.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frames = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let handle_signals = self.options.handle_signals;

        loop {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    tracing::debug!("received ctrl-c");
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);

                    // Drain whatever else is already queued, within a small
                    // time and count budget, before the next redraw.
                    let deadline = Instant::now() + Duration::from_micros(100);
                    let mut drained = 0u32;
                    while Instant::now() < deadline && drained < 100 {
                        let Ok(msg) = self.msg_rx.try_recv() else {
                            break;
                        };
                        self.process_message(msg);
                        drained += 1;
                    }

                    if self.should_quit {
                        return Ok(());
                    }
                }

                _ = frames.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);
        self.reconcile();
        self.needs_redraw = true;
    }

    fn reconcile(&mut self) {
        let wanted = self.model.subscriptions();
        self.subscriptions.reconcile(wanted);
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                tracing::debug!("quit requested");
                self.should_quit = true;
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(fut.await);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| self.model.view(frame))?;
        Ok(())
    }
}

fn init_terminal(
    options: &ProgramOptions,
) -> Result<Terminal<CrosstermBackend<Output>>, ProgramError> {
    if options.catch_panics {
        // Installed once per process so repeated programs don't stack hooks.
        static HOOK: Once = Once::new();
        let alt_screen = options.alt_screen;
        let output = options.output;
        HOOK.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal(alt_screen, output);
                previous(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = Output::new(options.output);
    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if let Some(title) = &options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    Ok(Terminal::new(CrosstermBackend::new(writer))?)
}

/// Best-effort: every step runs even if an earlier one failed, and only the
/// raw-mode error is reported.
fn restore_terminal(alt_screen: bool, output: OutputTarget) -> Result<(), io::Error> {
    let raw = disable_raw_mode();
    let mut writer = Output::new(output);
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}
