//! Ratatui-based terminal UI.
//!
//! Loads the same inputs as `spm overlay`, then lets the user walk the loaded
//! molecules and edit each one's fit parameters; every applied edit
//! re-synthesizes and redraws the overlay. Parameters live per molecule;
//! editing one never touches another's trace.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, LoadedSession};
use crate::cli::OverlayArgs;
use crate::domain::{FitParams, LinewidthUnit};
use crate::error::AppError;
use crate::overlay::Overlay;
use crate::physics::frequency_offset_to_velocity;
use crate::synth;

mod plotters_chart;

use plotters_chart::{ChartTrace, OverlayChart};

/// Trace colors, reused cyclically past the palette length. The observation
/// itself is always white.
const PALETTE: [RGBColor; 6] = [
    RGBColor(0, 255, 255), // cyan
    RGBColor(0, 255, 0),   // green
    RGBColor(255, 255, 0), // yellow
    RGBColor(255, 0, 255), // magenta
    RGBColor(255, 128, 0), // orange
    RGBColor(255, 0, 0),   // red
];

/// Editable parameter fields, in display order.
const FIELD_MOLECULE: usize = 0;
const FIELD_DENSITY: usize = 1;
const FIELD_TEMPERATURE: usize = 2;
const FIELD_LINEWIDTH: usize = 3;
const FIELD_OFFSET: usize = 4;
const FIELD_COUNT: usize = 5;

/// Start the TUI.
pub fn run(args: OverlayArgs) -> Result<(), AppError> {
    let config = crate::app::overlay_config_from_args(&args);
    // Load before touching the terminal so input errors print normally.
    let session = pipeline::load_session(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

struct App {
    session: LoadedSession,
    overlay: Overlay,
    selected_molecule: usize,
    selected_field: usize,
    editing: bool,
    input: String,
    status: String,
    /// Step used by ←/→ on the offset field, sized to the loaded band.
    offset_step: f64,
}

impl App {
    fn new(session: LoadedSession) -> Self {
        let overlay = pipeline::reassemble(&session);
        let offset_step = session
            .observed
            .frequency_span()
            .map(|(lo, hi)| ((hi - lo) / 200.0).max(0.01))
            .unwrap_or(1.0);
        let status = format!(
            "Loaded {} molecule(s) on {} grid points.",
            session.entries.len(),
            session.observed.len()
        );

        Self {
            session,
            overlay,
            selected_molecule: 0,
            selected_field: FIELD_MOLECULE,
            editing: false,
            input: String::new(),
            status,
            offset_step,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_value_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field != FIELD_MOLECULE && !self.session.entries.is_empty() {
                    self.editing = true;
                    self.input.clear();
                    self.status =
                        "Editing value. Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('r') => {
                if let Some(entry) = self.session.entries.get_mut(self.selected_molecule) {
                    entry.params = synth::default_params(&entry.catalog.transitions);
                    let molecule = entry.catalog.molecule.clone();
                    self.recompute();
                    self.status = format!("Reset parameters for {molecule}.");
                }
            }
            _ => {}
        }

        false
    }

    fn handle_value_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.apply_value_input();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E') {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_value_input(&mut self) {
        let trimmed = self.input.trim();
        let value = match trimmed.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                self.status = format!("Not a number: '{trimmed}'");
                return;
            }
        };

        let field = self.selected_field;
        self.update_selected_params(|params| match field {
            FIELD_DENSITY => params.column_density = value,
            FIELD_TEMPERATURE => params.temperature = value,
            FIELD_LINEWIDTH => params.linewidth = value,
            FIELD_OFFSET => params.frequency_offset = value,
            _ => {}
        });
    }

    fn adjust_field(&mut self, delta: i32) {
        if self.selected_field == FIELD_MOLECULE {
            let n = self.session.entries.len();
            if n == 0 {
                return;
            }
            self.selected_molecule = if delta >= 0 {
                (self.selected_molecule + 1) % n
            } else {
                (self.selected_molecule + n - 1) % n
            };
            let molecule = &self.session.entries[self.selected_molecule].catalog.molecule;
            self.status = format!("Editing {molecule}.");
            return;
        }

        let field = self.selected_field;
        let offset_step = self.offset_step;
        let up = delta >= 0;
        self.update_selected_params(|params| match field {
            // Column densities move in decades; a factor step is the natural
            // knob. Temperature and width get gentler multiplicative steps.
            FIELD_DENSITY => params.column_density *= if up { 2.0 } else { 0.5 },
            FIELD_TEMPERATURE => params.temperature *= if up { 1.25 } else { 0.8 },
            FIELD_LINEWIDTH => params.linewidth *= if up { 1.25 } else { 0.8 },
            FIELD_OFFSET => {
                params.frequency_offset += if up { offset_step } else { -offset_step }
            }
            _ => {}
        });
    }

    /// Apply a mutation to the selected molecule's parameters, keeping the
    /// previous values when validation rejects the result. The parameter set
    /// is replaced as a whole unit, never left half-edited.
    fn update_selected_params(&mut self, mutate: impl FnOnce(&mut FitParams)) {
        let Some(entry) = self.session.entries.get_mut(self.selected_molecule) else {
            self.status = "No catalogs loaded.".to_string();
            return;
        };

        let previous = entry.params;
        let mut candidate = previous;
        mutate(&mut candidate);

        match candidate.validate() {
            Ok(()) => {
                entry.params = candidate;
                let molecule = entry.catalog.molecule.clone();
                self.recompute();
                self.status = format!("{molecule}: {}", describe_params(&candidate));
            }
            Err(e) => {
                entry.params = previous;
                self.status = format!("Rejected: {e}");
            }
        }
    }

    fn recompute(&mut self) {
        self.overlay = pipeline::reassemble(&self.session);
        if !self.overlay.skipped.is_empty() {
            let names: Vec<&str> = self
                .overlay
                .skipped
                .iter()
                .map(|s| s.molecule.as_str())
                .collect();
            self.status = format!("Skipped traces: {}", names.join(", "));
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("spm", Style::default().fg(Color::Cyan)),
            Span::raw(" - molecular line overlay"),
        ]));

        let freq = self
            .session
            .observed
            .frequency_span()
            .map(|(lo, hi)| format!("[{lo:.1}, {hi:.1}] MHz"))
            .unwrap_or_else(|| "-".to_string());

        lines.push(Line::from(Span::styled(
            format!(
                "spectrum: {} | n={} | freq={freq} | molecules: {}",
                self.session.observed.label,
                self.session.observed.len(),
                self.session.entries.len(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Overlay").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((x_bounds, y_bounds)) = chart_bounds(&self.overlay) else {
            let msg = Paragraph::new("Nothing to plot.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let mut traces = Vec::with_capacity(1 + self.overlay.synthetic.len());
        traces.push(ChartTrace {
            values: &self.overlay.observed.values,
            color: plotters::style::WHITE,
        });
        for (i, series) in self.overlay.synthetic.iter().enumerate() {
            traces.push(ChartTrace {
                values: &series.values,
                color: PALETTE[i % PALETTE.len()],
            });
        }

        let widget = OverlayChart {
            frequency: &self.overlay.frequency,
            traces: &traces,
            x_bounds,
            y_bounds,
            x_label: "frequency (MHz)",
            y_label: "flux".to_string(),
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };

        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = match self.session.entries.get(self.selected_molecule) {
            Some(entry) => {
                let params = &entry.params;
                let unit = match params.linewidth_unit {
                    LinewidthUnit::KmPerS => "km/s",
                    LinewidthUnit::Mhz => "MHz",
                };
                let velocity = self
                    .session
                    .observed
                    .frequency_span()
                    .map(|(lo, hi)| {
                        frequency_offset_to_velocity(0.5 * (lo + hi), params.frequency_offset)
                    })
                    .unwrap_or(0.0);

                vec![
                    ListItem::new(format!(
                        "Molecule: {} ({}/{})",
                        entry.catalog.molecule,
                        self.selected_molecule + 1,
                        self.session.entries.len()
                    )),
                    ListItem::new(format!("Column density: {:.3e} cm^-2", params.column_density)),
                    ListItem::new(format!("Temperature: {:.2} K", params.temperature)),
                    ListItem::new(format!("Linewidth: {:.3} {unit}", params.linewidth)),
                    ListItem::new(format!(
                        "Offset: {:+.3} MHz ({velocity:+.2} km/s)",
                        params.frequency_offset
                    )),
                ]
            }
            None => vec![ListItem::new("No catalogs loaded.")],
        };

        let list = List::new(items)
            .block(Block::default().title("Parameters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing {
            let hint = Paragraph::new(format!("new value: {}_", self.input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter type value  r reset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line)
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn describe_params(params: &FitParams) -> String {
    format!(
        "N={:.2e} T={:.1}K w={:.3} dv={:+.2}MHz",
        params.column_density, params.temperature, params.linewidth, params.frequency_offset
    )
}

/// X/Y bounds across the observation and every synthetic trace, padded.
fn chart_bounds(overlay: &Overlay) -> Option<([f64; 2], [f64; 2])> {
    let (x0, x1) = match (overlay.frequency.first(), overlay.frequency.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
        _ => return None,
    };

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &v in overlay
        .observed
        .values
        .iter()
        .chain(overlay.synthetic.iter().flat_map(|s| s.values.iter()))
    {
        y_min = y_min.min(v);
        y_max = y_max.max(v);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    Some(([x0, x1], [y_min - pad, y_max + pad]))
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.2}")
}
