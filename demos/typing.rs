//! # Typing Demo
//!
//! Types a sequence of phrases, one character at a time:
//! - Embedding [`TypingText`] in a [`Model`] and forwarding its messages and
//!   subscriptions
//! - Restarting the animation by changing the text (`n`)
//! - Reacting to the widget's `Completed` message
//! - Logging to a file with `tracing` while the TUI owns the screen
//!
//! Run with: `cargo run --example typing -- --cursor --speed-ms 60`
//!
//! Log with: `cargo run --example typing -- --log-file typing.log`
//! (`TYPEWRITER_LOG=trace` overrides `--log-level`).
//!
//! Draw on stderr and capture the summary line:
//! `cargo run --example typing -- --stderr > summary.txt`

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use typewriter::crossterm::event::{KeyCode, KeyModifiers};
use typewriter::ratatui::layout::{Constraint, Layout};
use typewriter::ratatui::style::{Color, Modifier, Style};
use typewriter::ratatui::text::{Line, Span};
use typewriter::ratatui::widgets::{Block, Borders, Paragraph};
use typewriter::ratatui::Frame;
use typewriter::widgets::typing_text::{self, TypingText};
use typewriter::{
    terminal_events, Command, Component, Model, OutputTarget, ProgramOptions, Subscription,
    TerminalEvent,
};

const DEFAULT_PHRASES: &[&str] = &[
    "Hello, World!",
    "Welcome aboard. Let's get you set up.",
    "Once upon a time, in a terminal far, far away...",
];

#[derive(Debug, Parser)]
#[command(name = "typing", about = "Character-by-character typing text demo")]
struct Cli {
    /// Phrase to type. Repeat to cycle through several with `n`.
    #[arg(short, long = "text")]
    texts: Vec<String>,

    /// Milliseconds between revealed characters.
    #[arg(short, long, default_value_t = 100)]
    speed_ms: u64,

    /// Start with the cursor on. `c` toggles it while running.
    #[arg(short, long)]
    cursor: bool,

    /// Milliseconds between cursor blinks.
    #[arg(long, default_value_t = 500)]
    blink_ms: u64,

    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when TYPEWRITER_LOG is unset.
    #[arg(long, default_value = "debug")]
    log_level: String,

    /// Draw the UI on stderr, leaving stdout for the summary.
    #[arg(long)]
    stderr: bool,
}

struct Demo {
    phrases: Vec<String>,
    current: usize,
    typing: TypingText,
    finished: usize,
}

#[derive(Debug)]
enum Msg {
    Typing(typing_text::Message),
    Next,
    ToggleCursor,
    Quit,
}

impl Model for Demo {
    type Message = Msg;
    type Flags = Cli;

    fn init(cli: Cli) -> (Self, Command<Msg>) {
        let phrases = if cli.texts.is_empty() {
            DEFAULT_PHRASES.iter().map(|s| s.to_string()).collect()
        } else {
            cli.texts
        };

        let typing = TypingText::new("demo", phrases[0].clone())
            .with_typing_speed(Duration::from_millis(cli.speed_ms))
            .with_cursor(cli.cursor)
            .with_blink_interval(Duration::from_millis(cli.blink_ms))
            .with_style(Style::default().fg(Color::White))
            .with_cursor_style(Style::default().fg(Color::Cyan));

        let demo = Demo {
            phrases,
            current: 0,
            typing,
            finished: 0,
        };
        (demo, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Typing(typing_text::Message::Completed { generation }) => {
                tracing::info!(generation, "phrase finished");
                self.finished += 1;
                Command::none()
            }
            Msg::Typing(m) => self.typing.update(m).map(Msg::Typing),
            Msg::Next => {
                self.current = (self.current + 1) % self.phrases.len();
                self.typing.set_text(self.phrases[self.current].clone());
                Command::none()
            }
            Msg::ToggleCursor => {
                let enabled = !self.typing.has_cursor();
                self.typing.set_cursor(enabled);
                Command::none()
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [_, mid, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .areas(frame.area());
        let [_, column, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Percentage(60),
            Constraint::Fill(1),
        ])
        .areas(mid);

        let title = format!(" {}/{} ", self.current + 1, self.phrases.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        let inner = block.inner(column);
        frame.render_widget(block, column);

        let [text_area, _, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.typing.view(frame, text_area);

        let status = if self.typing.is_complete() {
            Span::styled("done", Style::default().fg(Color::Green))
        } else {
            Span::styled("typing", Style::default().fg(Color::Yellow))
        };
        let key = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let help = Line::from(vec![
            status,
            Span::raw(format!("  ({} finished)  ", self.finished)),
            Span::styled("n", key),
            Span::raw(" next  "),
            Span::styled("c", key),
            Span::raw(" cursor  "),
            Span::styled("q", key),
            Span::raw(" quit"),
        ]);
        frame.render_widget(Paragraph::new(help), help_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs: Vec<Subscription<Msg>> = self
            .typing
            .subscriptions()
            .into_iter()
            .map(|s| s.map(Msg::Typing))
            .collect();
        subs.push(terminal_events(|ev| match ev {
            TerminalEvent::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Msg::Quit)
                }
                KeyCode::Char('n') | KeyCode::Enter => Some(Msg::Next),
                KeyCode::Char('c') => Some(Msg::ToggleCursor),
                _ => None,
            },
            _ => None,
        }));
        subs
    }
}

/// File logging, if asked for. The guard must outlive the program so
/// buffered lines get flushed.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let Some(path) = &cli.log_file else {
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_env("TYPEWRITER_LOG")
        .or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry().with(filter).with(layer).init();
    Ok(Some(guard))
}

#[typewriter::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli)?;

    let output = if cli.stderr {
        OutputTarget::Stderr
    } else {
        OutputTarget::Stdout
    };
    let options = ProgramOptions {
        title: Some("typewriter".into()),
        output,
        ..ProgramOptions::default()
    };
    let demo = typewriter::run_with::<Demo>(cli, options).await?;
    println!("Finished {} phrase(s).", demo.finished);
    Ok(())
}
