//! Ratatui-based figure viewer.
//!
//! `show` takes over the terminal, draws every panel of a `Figure` side by side
//! and blocks until the user closes the view.
//!
//! Keys:
//! - `q` / `Esc`: close
//! - `←` / `→` / `Tab`: select panel
//! - `z`: toggle between all panels and the selected panel only

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::error::AppError;
use crate::plot::Figure;

mod plotters_chart;

use plotters_chart::PanelChart;

/// Show a figure until the user closes it.
///
/// `notes` are printed under the chart (e.g. fitted slopes).
pub fn show(figure: &Figure, notes: &[String]) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::Render(format!("Failed to initialize terminal: {e}")))?;

    let mut viewer = Viewer {
        figure,
        notes,
        selected: 0,
        zoomed: false,
    };
    viewer.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::Render(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::Render(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct Viewer<'a> {
    figure: &'a Figure,
    notes: &'a [String],
    selected: usize,
    zoomed: bool,
}

impl Viewer<'_> {
    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::Render(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::Render(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::Render(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the viewer should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let n = self.figure.panels.len().max(1);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Tab => self.selected = (self.selected + 1) % n,
            KeyCode::Left | KeyCode::BackTab => self.selected = (self.selected + n - 1) % n,
            KeyCode::Char('z') => self.zoomed = !self.zoomed,
            _ => {}
        }
        false
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let notes_height = (self.notes.len() as u16).min(6) + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(notes_height),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let title = if self.figure.title.is_empty() {
            "lab".to_string()
        } else {
            self.figure.title.clone()
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))),
            chunks[0],
        );

        self.draw_panels(frame, chunks[1]);

        let notes: Vec<Line> = self.notes.iter().map(|n| Line::from(n.as_str())).collect();
        frame.render_widget(
            Paragraph::new(notes).block(Block::default().borders(Borders::ALL).title("Fits")),
            chunks[2],
        );

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "q/Esc close | ←/→ select panel | z zoom",
                Style::default().fg(Color::DarkGray),
            ))),
            chunks[3],
        );
    }

    fn draw_panels(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let panels = &self.figure.panels;
        let visible: Vec<usize> = if self.zoomed {
            vec![self.selected.min(panels.len().saturating_sub(1))]
        } else {
            (0..panels.len()).collect()
        };
        if visible.is_empty() || panels.is_empty() {
            return;
        }

        let n = visible.len() as u32;
        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..n).map(|_| Constraint::Ratio(1, n)).collect::<Vec<_>>())
            .split(area);

        for (slot, &idx) in areas.iter().zip(&visible) {
            let panel = &panels[idx];
            let border = if idx == self.selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(panel.title.clone());
            let inner = block.inner(*slot);
            frame.render_widget(block, *slot);
            frame.render_widget(PanelChart { panel }, inner);
        }
    }
}
