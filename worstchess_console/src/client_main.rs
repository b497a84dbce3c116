use std::fmt;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::style::{self, Stylize};
use crossterm::{cursor, event as term_event, execute, terminal};
use instant::Instant;
use log::{info, warn};
use scopeguard::defer;
use tungstenite::protocol;

use worstchess::client::{ClientState, NotableEvent, OutgoingRequest};
use worstchess::clock::ClockSide;
use worstchess::config::{ClientConfig, UiVariant};
use worstchess::event::{
    ClientEvent, MAX_ENGINE_TIME_SECS, MAX_SEARCH_DEPTH, ServerEvent, StatusSnapshot,
};
use worstchess::force::Force;
use worstchess::input::{InputOutcome, InputState};

use crate::commands::{ConsoleCommand, parse_command};
use crate::network;
use crate::tui;


const TICK_PERIOD: Duration = Duration::from_millis(100);
const HISTORY_ROWS: usize = 8;

pub struct ConsoleConfig {
    pub server_address: String,
    pub status_url: String,
    pub client: ClientConfig,
}

enum IncomingEvent {
    Network(ServerEvent),
    Disconnected(String),
    Status(Result<StatusSnapshot, String>),
    Terminal(term_event::Event),
    Tick,
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(
            stdout,
            style::Print(line),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            cursor::MoveToNextLine(1),
            cursor::Hide
        )?;
    }
    Ok(())
}

fn render(
    stdout: &mut io::Stdout, app_start_time: Instant, client_state: &ClientState,
    keyboard_input: &str, command_error: &Option<String>,
) -> io::Result<()> {
    let now = Instant::now();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    let view = client_state.board_view();
    let bottom = view.orientation.bottom_force();
    let top = bottom.opponent();

    let clock_line = |force: Force| {
        let clock = client_state.clock();
        let player = client_state.player_force();
        let side = if player == Some(force) { ClockSide::Player } else { ClockSide::Opponent };
        let active = client_state.cache().active_force() == force;
        format!("{} {}", force.title(), tui::render_clock(clock, side, active))
    };
    let has_clock = client_state.ui_variant().has_clock() && client_state.player_force().is_some();
    if has_clock {
        writeln_raw(stdout, clock_line(top))?;
    }
    if client_state.ui_variant() == UiVariant::Full {
        writeln_raw(stdout, tui::render_captured(&view.captured, top))?;
    }
    writeln_raw(stdout, tui::render_grid(&view))?;
    if client_state.ui_variant() == UiVariant::Full {
        writeln_raw(stdout, tui::render_captured(&view.captured, bottom))?;
    }
    if has_clock {
        writeln_raw(stdout, clock_line(bottom))?;
    }
    writeln_raw(stdout, "")?;
    writeln_raw(stdout, view.status.as_str().with(style::Color::Magenta))?;
    if let InputState::AwaitingPromotion { .. } = client_state.input_state() {
        writeln_raw(stdout, "Promote to: /q /r /b /n (or /cancel)".with(style::Color::Yellow))?;
    }
    if client_state.ui_variant().has_history() {
        writeln_raw(stdout, "")?;
        writeln_raw(stdout, tui::render_history(client_state.history(), HISTORY_ROWS))?;
    }
    let settings = format!(
        "depth: {}  engine time: {}",
        client_state.search_depth().map_or("?".to_owned(), |d| format!("{d}/{MAX_SEARCH_DEPTH}")),
        client_state
            .engine_time_secs()
            .map_or("?".to_owned(), |t| format!("{t}s/{MAX_ENGINE_TIME_SECS}s")),
    );
    writeln_raw(stdout, settings.with(style::Color::DarkGrey))?;
    writeln_raw(stdout, "")?;

    // Simulate cursor: real cursor blinking is broken with Show/Hide.
    let show_cursor = now.duration_since(app_start_time).as_millis() % 1000 >= 500;
    let cursor = if show_cursor { '▂' } else { ' ' };
    let input_with_cursor = format!("{keyboard_input}{cursor}");
    let highlight_input = client_state.cache().is_player_turn() && !client_state.is_game_over();
    let input_style = if highlight_input { style::Color::White } else { style::Color::DarkGrey };
    writeln_raw(stdout, input_with_cursor.with(input_style))?;
    if let Some(err) = command_error {
        writeln_raw(stdout, err.as_str().with(style::Color::Red))?;
    }
    execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    Ok(())
}

// Returns `false` if the user asked to quit.
fn execute_command(
    client_state: &mut ClientState, input: &str, command_error: &mut Option<String>,
) -> bool {
    let command = match parse_command(input) {
        Ok(command) => command,
        Err(err) => {
            *command_error = Some(err);
            return true;
        }
    };
    *command_error = None;
    let outcome = match command {
        ConsoleCommand::Square(coord) => client_state.click(coord),
        ConsoleCommand::SelectColor(force) => {
            client_state.select_color(force, Instant::now());
            InputOutcome::Noop
        }
        ConsoleCommand::Action(action) => {
            client_state.game_action(action);
            InputOutcome::Noop
        }
        ConsoleCommand::Depth(depth) => {
            client_state.set_depth(depth);
            InputOutcome::Noop
        }
        ConsoleCommand::EngineTime(secs) => {
            client_state.set_engine_time(secs);
            InputOutcome::Noop
        }
        ConsoleCommand::Promote(kind) => client_state.choose_promotion(kind),
        ConsoleCommand::Cancel => client_state.dismiss_promotion(),
        ConsoleCommand::Quit => return false,
    };
    if let InputOutcome::DragRefused(block) = outcome {
        *command_error = Some(format!("Cannot move now: {block:?}"));
    }
    true
}

pub fn run(config: ConsoleConfig) -> anyhow::Result<()> {
    let mut socket_in = network::connect(&config.server_address)?;
    let mut socket_out = network::clone_websocket(&socket_in, protocol::Role::Client)
        .context("Cannot clone socket")?;
    let status_url = config.status_url;
    let http = reqwest::blocking::Client::new();

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    };
    let app_start_time = Instant::now();

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx.clone();
    let tx_tick = tx.clone();
    let tx_status = tx;
    thread::spawn(move || {
        loop {
            match network::read_obj::<ServerEvent, _>(&mut socket_in) {
                Ok(ev) => {
                    if tx_net.send(IncomingEvent::Network(ev)).is_err() {
                        return;
                    }
                }
                Err(network::CommunicationError::Serde(err)) => {
                    warn!("Dropping unparsable server event: {err}");
                }
                Err(err) => {
                    let _ = tx_net.send(IncomingEvent::Disconnected(format!("{err:?}")));
                    return;
                }
            }
        }
    });
    thread::spawn(move || {
        while let Ok(ev) = term_event::read() {
            if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                return;
            }
        }
    });
    thread::spawn(move || {
        loop {
            thread::sleep(TICK_PERIOD);
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                return;
            }
        }
    });

    let (requests_tx, requests_rx) = mpsc::channel();
    thread::spawn(move || {
        for request in requests_rx {
            match request {
                OutgoingRequest::Emit(event) => {
                    if let Err(err) = network::write_obj::<ClientEvent, _>(&mut socket_out, &event)
                    {
                        warn!("Cannot send {event:?}: {err:?}");
                    }
                }
                OutgoingRequest::FetchStatus => {
                    let status = network::fetch_status(&http, &status_url);
                    if tx_status.send(IncomingEvent::Status(status)).is_err() {
                        return;
                    }
                }
            }
        }
    });

    let mut client_state = ClientState::new(config.client, requests_tx);
    let mut keyboard_input = String::new();
    let mut command_error = None;
    client_state.sync();
    for event in rx {
        let mut notable = NotableEvent::None;
        match event {
            IncomingEvent::Network(event) => match client_state.process_server_event(event) {
                Ok(ev) => notable = ev,
                Err(err) => info!("{err:?}"),
            },
            IncomingEvent::Disconnected(reason) => {
                // The alternate screen is gone by the time the error is printed.
                return Err(anyhow::anyhow!("Connection lost: {reason}"));
            }
            IncomingEvent::Status(Ok(status)) => client_state.apply_status(status),
            IncomingEvent::Status(Err(err)) => client_state.status_fetch_failed(&err),
            IncomingEvent::Terminal(term_event::Event::Key(event))
                if event.kind == term_event::KeyEventKind::Press =>
            {
                match event.code {
                    term_event::KeyCode::Char('c')
                        if event.modifiers.contains(term_event::KeyModifiers::CONTROL) =>
                    {
                        return Ok(());
                    }
                    term_event::KeyCode::Char(ch) => keyboard_input.push(ch),
                    term_event::KeyCode::Backspace => {
                        keyboard_input.pop();
                    }
                    term_event::KeyCode::Esc => {
                        client_state.dismiss_promotion();
                        keyboard_input.clear();
                    }
                    term_event::KeyCode::Enter => {
                        let keep_going =
                            execute_command(&mut client_state, &keyboard_input, &mut command_error);
                        keyboard_input.clear();
                        if !keep_going {
                            return Ok(());
                        }
                    }
                    _ => {}
                }
            }
            IncomingEvent::Terminal(term_event::Event::Resize(..)) => {
                execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
            }
            IncomingEvent::Terminal(_) | IncomingEvent::Tick => {}
        }
        let tick_event = client_state.refresh(Instant::now());
        if tick_event != NotableEvent::None {
            notable = tick_event;
        }
        match notable {
            NotableEvent::BoardReset => {
                execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
            }
            NotableEvent::GameOver => {
                info!("Game over: {}", client_state.board_view().status);
            }
            NotableEvent::None
            | NotableEvent::MoveAccepted
            | NotableEvent::EngineMoved
            | NotableEvent::SettingsUpdated => {}
        }
        // Always repaint: the input line and the cursor are not part of the client state.
        client_state.take_render_request();
        render(&mut stdout, app_start_time, &client_state, &keyboard_input, &command_error)?;
    }
    Err(anyhow::anyhow!("Unexpected end of events stream"))
}
