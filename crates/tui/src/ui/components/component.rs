//! Component system for the console.
//!
//! Components are self-contained UI elements: they own local UI behavior,
//! read and mutate [`App`] through its methods, render into a provided `Rect`,
//! and report side effects back as [`Effect`]s rather than performing them.
//!
//! Lifecycle:
//! 1. `init()` once when the component is created
//! 2. `handle_key_events()` / `handle_mouse_events()` for input
//! 3. `update()` for application messages
//! 4. `render()` every frame the runtime marks dirty

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use mcpdash_types::{Effect, Msg};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

pub(crate) trait Component {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events. Components hit-test against the areas they
    /// recorded during the last render.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Update internal state based on an application message.
    fn update(&mut self, _app: &mut App, _msg: &Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area. State changes belong in
    /// the event handlers; rendering only records layout for hit tests.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the footer while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }

    /// Split `area` into the regions this component draws into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}
