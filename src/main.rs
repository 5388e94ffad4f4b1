pub mod ui;

use clap::Parser;
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};

use typr::clock::{SystemClock, TickGate, TickSource, TICK_INTERVAL};
use typr::config::{ConfigStore, FileConfigStore, TimeLimit};
use typr::corpus::Corpus;
use typr::engine::Engine;
use typr::runtime::{AppEvent, CrosstermEventSource, EventSource, Runner};
use typr::session::Status;
use typr::sink::{QueueSink, SessionEvent};

/// terminal typing trainer with live wpm/accuracy and progress charting
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing trainer. Type the displayed passage against the clock; live WPM, accuracy, and error counts update as you go, and a progress chart tracks your completed sessions."
)]
pub struct Cli {
    /// session length in seconds
    #[clap(short = 's', long, value_enum)]
    secs: Option<TimeLimit>,

    /// custom passage to type instead of the built-in bank
    #[clap(short = 'p', long)]
    passage: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

type ProdEngine = Engine<SystemClock, TickGate, QueueSink, StdRng>;

#[derive(Debug)]
pub struct App {
    pub engine: ProdEngine,
    pub events: QueueSink,
    pub state: AppState,
    /// Raw input buffer owned by the presentation layer; the engine only
    /// ever sees buffer-changed events.
    pub buffer: String,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        Self::build(cli, &FileConfigStore::new())
    }

    pub fn build(cli: &Cli, store: &dyn ConfigStore) -> Result<Self, Box<dyn Error>> {
        let mut config = store.load();
        if let Some(secs) = cli.secs {
            config.time_limit = secs;
            // remember the chosen preset for next time; best effort
            let _ = store.save(&config);
        }

        let corpus = match &cli.passage {
            Some(p) => Corpus::new("custom", vec![p.clone()])?,
            None => Corpus::builtin(),
        };

        let events = QueueSink::new();
        let engine = Engine::new(
            corpus,
            config.time_limit,
            SystemClock,
            TickGate::new(),
            events.clone(),
            StdRng::from_entropy(),
        );

        Ok(Self {
            engine,
            events,
            state: AppState::Typing,
            buffer: String::new(),
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.error(clap::error::ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(&cli)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), TICK_INTERVAL);
    let result = run_app(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| draw(app, f))?;

        match runner.step() {
            AppEvent::Tick => {
                // ticks only reach the session while the gate is armed
                if app.engine.ticks().is_armed() {
                    app.engine.tick();
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    return Ok(());
                }

                match app.state {
                    AppState::Typing => match key.code {
                        KeyCode::Esc => {
                            if app.engine.status() == Status::Running {
                                // cancel the session, back to idle
                                app.buffer.clear();
                                app.engine.reset();
                            } else {
                                return Ok(());
                            }
                        }
                        KeyCode::Enter => {
                            if app.engine.status() != Status::Running {
                                app.buffer.clear();
                                app.engine.start();
                            }
                        }
                        KeyCode::Backspace => {
                            // suppressed: mistakes stay on the board
                        }
                        KeyCode::Char(c) => {
                            if app.engine.status() == Status::Running {
                                app.buffer.push(c);
                                let raw = app.buffer.clone();
                                app.engine.on_input(&raw);
                            } else if c == 'n' {
                                app.buffer.clear();
                                app.engine.reset();
                            }
                        }
                        _ => {}
                    },
                    AppState::Results => match key.code {
                        KeyCode::Esc => return Ok(()),
                        KeyCode::Char('r') => {
                            app.buffer.clear();
                            app.engine.restart();
                            app.state = AppState::Typing;
                        }
                        KeyCode::Char('n') => {
                            app.buffer.clear();
                            app.engine.reset();
                            app.state = AppState::Typing;
                        }
                        _ => {}
                    },
                }
            }
        }

        for event in app.events.drain() {
            if matches!(event, SessionEvent::Finished(_)) {
                app.state = AppState::Results;
            }
        }
    }
}

fn draw(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use tempfile::tempdir;
    use typr::config::Config;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    fn test_app(cli: &Cli) -> App {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        App::build(cli, &store).unwrap()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = cli(&["typr"]);
        assert_eq!(cli.secs, None);
        assert_eq!(cli.passage, None);
    }

    #[test]
    fn test_cli_secs_presets() {
        let cli15 = cli(&["typr", "-s", "15"]);
        assert_eq!(cli15.secs, Some(TimeLimit::Secs15));

        let cli120 = cli(&["typr", "--secs", "120"]);
        assert_eq!(cli120.secs, Some(TimeLimit::Secs120));
    }

    #[test]
    fn test_cli_rejects_non_preset_secs() {
        let result = Cli::try_parse_from(["typr", "-s", "45"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_custom_passage() {
        let cli = cli(&["typr", "-p", "hello world"]);
        assert_eq!(cli.passage, Some("hello world".to_string()));
    }

    #[test]
    fn test_app_defaults_to_sixty_seconds() {
        let app = test_app(&cli(&["typr"]));
        assert_eq!(app.engine.time_limit(), TimeLimit::Secs60);
        assert_eq!(app.state, AppState::Typing);
    }

    #[test]
    fn test_app_uses_custom_passage() {
        let app = test_app(&cli(&["typr", "-p", "custom text"]));
        assert_eq!(app.engine.session().reference_text, "custom text");
    }

    #[test]
    fn test_app_builtin_corpus_selects_a_passage() {
        let app = test_app(&cli(&["typr"]));
        assert!(!app.engine.session().reference_text.is_empty());
    }

    #[test]
    fn test_chosen_preset_is_remembered() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));

        let _ = App::build(&cli(&["typr", "-s", "30"]), &store).unwrap();
        assert_eq!(store.load().time_limit, TimeLimit::Secs30);

        // next launch without -s picks up the remembered preset
        let app = App::build(&cli(&["typr"]), &store).unwrap();
        assert_eq!(app.engine.time_limit(), TimeLimit::Secs30);
    }

    #[test]
    fn test_cli_preset_overrides_saved_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        store
            .save(&Config {
                time_limit: TimeLimit::Secs120,
            })
            .unwrap();

        let app = App::build(&cli(&["typr", "-s", "15"]), &store).unwrap();
        assert_eq!(app.engine.time_limit(), TimeLimit::Secs15);
    }

    #[test]
    fn test_finished_event_moves_app_to_results() {
        let mut app = test_app(&cli(&["typr", "-p", "hi"]));

        app.engine.start();
        app.engine.on_input("h");
        app.engine.finish();

        let saw_finished = app
            .events
            .drain()
            .iter()
            .any(|e| matches!(e, SessionEvent::Finished(_)));
        assert!(saw_finished);
    }

    #[test]
    fn test_draw_typing_state() {
        let mut app = test_app(&cli(&["typr", "-p", "test passage"]));

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("test"));
    }

    #[test]
    fn test_draw_running_state_shows_stats() {
        let mut app = test_app(&cli(&["typr", "-p", "test passage"]));
        app.engine.start();
        app.engine.on_input("te");

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("wpm"));
    }

    #[test]
    fn test_draw_results_state() {
        let mut app = test_app(&cli(&["typr", "-p", "hi"]));
        app.engine.start();
        app.engine.on_input("hi");
        app.engine.finish();
        app.state = AppState::Results;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("wpm"));
        assert!(content.contains("(r)etry"));
    }

    #[test]
    fn test_session_cycle_through_app() {
        let mut app = test_app(&cli(&["typr", "-p", "hello"]));

        app.engine.start();
        assert_eq!(app.engine.status(), Status::Running);

        for raw in ["h", "he", "hel", "hell", "hello"] {
            app.engine.on_input(raw);
        }
        assert_eq!(app.engine.session().correct_keystrokes, 5);

        app.engine.finish();
        assert_eq!(app.engine.status(), Status::Finished);
        assert_eq!(app.engine.history().len(), 1);

        // 'n' flow: back to a fresh idle session
        app.engine.reset();
        assert_eq!(app.engine.status(), Status::Idle);
        assert_eq!(app.engine.session().total_keystrokes, 0);
    }
}
