//! Runtime: event loop and input routing for the TUI.
//!
//! - Owns the terminal lifecycle (alternate screen, raw mode, mouse capture).
//! - A dedicated input task polls crossterm and forwards events over a channel.
//! - API calls finish through a `FuturesUnordered` of join handles polled in
//!   the same `select!` as input and ticks.
//! - Ticking is fast (100 ms) while requests run or a notification is
//!   showing, and slow (5 s) when idle.
use std::{
    io::Stdout,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use mcpdash_types::{Effect, ExecOutcome, Msg};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::{
    app::App,
    cmd,
    ui::{components::component::Component, main_component::MainView},
};

/// Spawn the input task. It polls with a short timeout so it never blocks
/// the runtime for long, and throttles mouse-move events to one per 16 ms.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    tokio::task::spawn_blocking(move || {
        let sixteen_ms = Duration::from_millis(16);
        let mut last_mouse_move = Instant::now();
        loop {
            match event::poll(sixteen_ms) {
                Ok(true) => {}
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                    continue;
                }
                Err(err) => {
                    warn!("Failed to poll events: {}", err);
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < sixteen_ms {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if let Err(err) = sender.blocking_send(event) {
                        debug!("input receiver dropped: {}", err);
                        break;
                    }
                }
                Err(err) => {
                    warn!("Failed to read event: {}", err);
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.update(app, &Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Apply navigation effects in place and return everything else.
fn handle_navigation_effects(app: &mut App, main_view: &mut MainView, effects: Vec<Effect>) -> Vec<Effect> {
    let mut remaining = Vec::with_capacity(effects.len());
    for effect in effects {
        match effect {
            Effect::SwitchTo(route) => main_view.set_current_route(app, route),
            Effect::ShowModal(modal) => main_view.set_open_modal_kind(app, Some(modal)),
            Effect::CloseModal => main_view.set_open_modal_kind(app, None),
            Effect::Quit => {
                app.navigate(&Effect::Quit);
            }
            other => remaining.push(other),
        }
    }
    remaining
}

/// Drain `effects` until nothing is left: navigation first, then messages
/// fed back into the view, then commands. Spawned calls land in `pending`.
pub(crate) fn process_effects(
    app: &mut App,
    main_view: &mut MainView,
    mut effects: Vec<Effect>,
    pending: &mut FuturesUnordered<JoinHandle<ExecOutcome>>,
) {
    while !effects.is_empty() {
        let remaining = handle_navigation_effects(app, main_view, std::mem::take(&mut effects));
        let mut commands = Vec::with_capacity(remaining.len());
        for effect in remaining {
            match effect {
                Effect::SendMsg(msg) => effects.extend(main_view.update(app, &msg)),
                other => commands.push(other),
            }
        }
        if commands.is_empty() {
            continue;
        }
        let batch = cmd::run_from_effects(app, commands);
        if !batch.pending.is_empty() {
            if !app.executing {
                app.throbber_idx = 0;
            }
            app.executing = true;
            pending.extend(batch.pending);
        }
        for outcome in batch.immediate {
            effects.extend(main_view.update(app, &Msg::ExecCompleted(Box::new(outcome))));
        }
    }
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop, and restores the terminal on exit.
pub async fn run_app(mut app: App) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    main_view.content_view.init()?;
    let mut terminal = setup_terminal()?;

    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();
    let startup = app.on_start();
    process_effects(&mut app, &mut main_view, startup, &mut pending_execs);

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    terminal.draw(|frame| main_view.render(frame, frame.area(), &mut app))?;

    let result = loop {
        let needs_animation = app.executing || app.notification.is_some();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut effects = Vec::new();
        let mut needs_render = tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    break Ok(());
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break Ok(());
                }
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                true
            }

            _ = ticker.tick() => {
                effects.extend(main_view.update(&mut app, &Msg::Tick));
                needs_animation
            }

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| ExecOutcome::Log(format!("Execution task failed: {error}")));
                effects.extend(main_view.update(&mut app, &Msg::ExecCompleted(Box::new(outcome))));
                app.executing = !pending_execs.is_empty();
                true
            }

            _ = signal::ctrl_c() => { break Ok(()); }
        };

        if !effects.is_empty() {
            process_effects(&mut app, &mut main_view, effects, &mut pending_execs);
            needs_render = true;
        }
        if app.should_quit {
            break Ok(());
        }
        if needs_render && let Err(err) = terminal.draw(|frame| main_view.render(frame, frame.area(), &mut app)) {
            break Err(err.into());
        }
    };

    cleanup_terminal(&mut terminal)?;
    result
}
