//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing frequency, view, prediction
//! type, and the plotted variables/models, then renders the composed charts:
//! a 2-column grid in the time-series view, one shared overlay chart in the
//! regression view. Every key press recomposes the affected charts through
//! the same pipeline the one-shot CLI commands use.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, Session, ViewOutput};
use crate::chart::{date_to_x, ChartSpec};
use crate::cli::SelectArgs;
use crate::data::DataTable;
use crate::domain::{DashConfig, ViewMode};
use crate::error::AppError;
use crate::select::{self, Choice, SelectionState};

mod plotters_chart;

use plotters_chart::{trace_color, DashPlottersChart};

/// Start the TUI.
///
/// The initial dataset is loaded before the alternate screen is entered, so
/// startup failures (missing file, malformed CSV, registry drift) print as
/// normal errors instead of flashing through a broken terminal.
pub fn run(args: SelectArgs) -> Result<(), AppError> {
    let mut app = App::new(args)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!(
                "Failed to enter alternate screen: {e}"
            )));
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
    session: Session,
    table: Arc<DataTable>,
    state: SelectionState,
    /// Checkbox rows of the active view, in dataset order.
    choices: Vec<Choice>,
    output: ViewOutput,
    cursor: usize,
    status: String,
}

impl App {
    fn new(args: SelectArgs) -> Result<Self, AppError> {
        let config = DashConfig::from_env(args.data_dir.clone());
        let mut session = Session::new(config);
        let table = session.load(args.freq)?;
        let state = pipeline::selection_from_args(&table, &args)?;

        let choices = choices_for(&table, &state);
        let output = pipeline::compose_view(&table, &state)?;
        let status = match table.date_range() {
            Some((first, last)) => {
                format!("Loaded {} rows ({first} to {last}).", table.len())
            }
            None => "Loaded empty dataset.".to_string(),
        };

        Ok(Self {
            session,
            table,
            state,
            choices,
            output,
            cursor: 0,
            status,
        })
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
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
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

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.cursor + 1 < self.choices.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle_hovered()?,
            KeyCode::Char('f') => self.switch_frequency()?,
            KeyCode::Char('v') => {
                self.state.set_view(self.state.view.toggled());
                self.cursor = 0;
                self.recompose()?;
                self.status = format!("View: {}.", self.state.view.display_name());
            }
            KeyCode::Char('p') => {
                if self.state.view == ViewMode::RegressionResults {
                    let prediction = self.state.prediction.toggled();
                    self.state.set_prediction(prediction, &self.table);
                    self.cursor = 0;
                    self.recompose()?;
                    self.status = format!("Prediction type: {}.", prediction.display_name());
                } else {
                    self.status =
                        "Prediction type applies to the Regression results view.".to_string();
                }
            }
            KeyCode::Char('a') => {
                match self.state.view {
                    ViewMode::TimeSeries => self.state.select_all_variables(&self.table),
                    ViewMode::RegressionResults => self.state.select_all_models(&self.table),
                }
                self.recompose()?;
                self.status = "Selected all.".to_string();
            }
            KeyCode::Char('n') => {
                match self.state.view {
                    ViewMode::TimeSeries => self.state.clear_variables(),
                    ViewMode::RegressionResults => self.state.clear_models(),
                }
                self.recompose()?;
                self.status = "Cleared selection.".to_string();
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }

        Ok(false)
    }

    fn toggle_hovered(&mut self) -> Result<(), AppError> {
        let Some(choice) = self.choices.get(self.cursor) else {
            return Ok(());
        };
        let id = choice.id.clone();
        let label = choice.label.trim_end().to_string();

        match self.state.view {
            ViewMode::TimeSeries => self.state.toggle_variable(&id),
            ViewMode::RegressionResults => self.state.toggle_model(&id),
        }
        self.recompose()?;

        self.status = if self.checked(&id) {
            format!("Checked {label}.")
        } else {
            format!("Unchecked {label}.")
        };
        Ok(())
    }

    /// Switch to the other dataset. A failed load keeps the current dataset
    /// and reports in the status line; the cache retries the path next time.
    fn switch_frequency(&mut self) -> Result<(), AppError> {
        let frequency = self.state.frequency.toggled();
        match self.session.load(frequency) {
            Ok(table) => {
                self.table = table;
                self.state.set_frequency(frequency, &self.table);
                self.cursor = 0;
                self.recompose()?;
                self.status = format!(
                    "Frequency: {} ({} rows).",
                    frequency.display_name(),
                    self.table.len()
                );
            }
            Err(err) => {
                self.status = format!("Load failed: {err}");
            }
        }
        Ok(())
    }

    fn export(&mut self) {
        if let ViewOutput::Empty { prompt } = &self.output {
            self.status = prompt.to_string();
            return;
        }
        let prediction = match self.state.view {
            ViewMode::TimeSeries => None,
            ViewMode::RegressionResults => Some(self.state.prediction),
        };
        let charts: Vec<ChartSpec> = self.output.charts().into_iter().cloned().collect();
        let out = PathBuf::from("charts.json");
        match crate::io::write_charts_json(
            &out,
            self.state.frequency,
            self.state.view,
            prediction,
            &charts,
        ) {
            Ok(()) => {
                self.status = format!("Exported {} chart(s) to '{}'.", charts.len(), out.display());
            }
            Err(err) => {
                self.status = format!("Export failed: {err}");
            }
        }
    }

    /// Rebuild the choice list and the composed charts after any mutation.
    fn recompose(&mut self) -> Result<(), AppError> {
        self.choices = choices_for(&self.table, &self.state);
        if self.cursor >= self.choices.len() {
            self.cursor = self.choices.len().saturating_sub(1);
        }
        self.output = pipeline::compose_view(&self.table, &self.state)?;
        Ok(())
    }

    fn checked(&self, id: &str) -> bool {
        match self.state.view {
            ViewMode::TimeSeries => self.state.variables.iter().any(|v| v == id),
            ViewMode::RegressionResults => self.state.models.iter().any(|m| m == id),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("rdash", Style::default().fg(Color::Cyan)),
            Span::raw(" — RYAAY price & TripAdvisor signal dashboard"),
        ]));

        let dates = match self.table.date_range() {
            Some((first, last)) => format!("[{first}, {last}]"),
            None => "-".to_string(),
        };
        let mut info = format!(
            "freq: {} | view: {} | n={} | dates={dates}",
            self.state.frequency.display_name(),
            self.state.view.display_name(),
            self.table.len(),
        );
        if self.state.view == ViewMode::RegressionResults {
            info.push_str(&format!(" | pred: {}", self.state.prediction.display_name()));
        }
        lines.push(Line::from(Span::styled(
            info,
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(42), Constraint::Min(0)])
            .split(area);

        self.draw_settings(frame, chunks[0]);
        self.draw_charts(frame, chunks[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match self.state.view {
            ViewMode::TimeSeries => "Variables",
            ViewMode::RegressionResults => "Models",
        };

        let items: Vec<ListItem> = self
            .choices
            .iter()
            .map(|choice| {
                let mark = if self.checked(&choice.id) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {}", choice.label.trim_end()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.choices.is_empty() {
            state.select(Some(self.cursor));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match &self.output {
            ViewOutput::Empty { prompt } => {
                let block = Block::default().title("Charts").borders(Borders::ALL);
                let inner = block.inner(area);
                frame.render_widget(block, area);
                let msg = Paragraph::new(*prompt).style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, inner);
            }
            ViewOutput::Overlay(spec) => {
                draw_chart_cell(frame, area, spec);
            }
            ViewOutput::Grid(grid) => {
                let rows = grid.row_count() as u32;
                let row_constraints: Vec<Constraint> =
                    (0..rows).map(|_| Constraint::Ratio(1, rows)).collect();
                let row_areas = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints(row_constraints)
                    .split(area);

                for (row, charts) in grid.rows().enumerate() {
                    let cells = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .split(row_areas[row]);
                    // A partial last row leaves its right cell blank.
                    for (cell, spec) in cells.iter().zip(charts) {
                        draw_chart_cell(frame, *cell, spec);
                    }
                }
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ move  Space toggle  f freq  v view  p pred  a all  n none  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn choices_for(table: &DataTable, state: &SelectionState) -> Vec<Choice> {
    // Ingest already validated every selectable column against the
    // registries, so label resolution cannot fail on a loaded table.
    let result = match state.view {
        ViewMode::TimeSeries => select::variable_choices(table),
        ViewMode::RegressionResults => select::model_choices(table, state.prediction),
    };
    result.unwrap_or_default()
}

fn draw_chart_cell(frame: &mut ratatui::Frame<'_>, area: Rect, spec: &ChartSpec) {
    let block = Block::default()
        .title(spec.title.clone())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let mut chart_area = inner;
    if spec.show_legend() && inner.height > 1 {
        frame.render_widget(
            Paragraph::new(legend_line(spec)),
            Rect {
                x: inner.x,
                y: inner.y,
                width: inner.width,
                height: 1,
            },
        );
        chart_area = Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: inner.height - 1,
        };
    }

    let Some((x_bounds, y_bounds)) = chart_bounds(spec) else {
        let msg = Paragraph::new("No finite observations to plot.")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, chart_area);
        return;
    };

    let widget = DashPlottersChart {
        spec,
        x_bounds,
        y_bounds,
    };
    frame.render_widget(widget, chart_area);
}

/// Plot bounds of a spec, padded so single points and flat series stay
/// visible. `None` when no trace has a finite value.
fn chart_bounds(spec: &ChartSpec) -> Option<([f64; 2], [f64; 2])> {
    let (first, last) = spec.x_range()?;
    let (y_min, y_max) = spec.y_range()?;

    let mut x0 = date_to_x(first);
    let mut x1 = date_to_x(last);
    if x1 <= x0 {
        x0 -= 1.0;
        x1 += 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    Some(([x0, x1], [y_min - pad, y_max + pad]))
}

/// One-line legend matching the widget's trace colors.
fn legend_line(spec: &ChartSpec) -> Line<'_> {
    let count = spec.traces.len();
    let mut spans = Vec::with_capacity(count * 2);
    for (index, trace) in spec.traces.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let (r, g, b) = trace_color(index, count);
        spans.push(Span::styled(
            format!("── {}", trace.name.trim_end()),
            Style::default().fg(Color::Rgb(r, g, b)),
        ));
    }
    Line::from(spans)
}
