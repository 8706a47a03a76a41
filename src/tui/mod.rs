//! Ratatui-based terminal UI.
//!
//! Two screens: the catalog (header stats, search/filter/sort controls and
//! the product list) and the product detail (info panel plus price chart).
//! Fetches are blocking; each one is queued as a pending step so the screen
//! is redrawn (showing the loading state) before the fetch starts.

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
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::catalog::{CatalogState, GridView, LoadStatus, ProductCard, render_grid};
use crate::data::DataSource;
use crate::detail::{ChartSeries, DetailPhase, DetailState, DetailView, TrendIcon};
use crate::domain::Trend;
use crate::error::AppError;
use crate::nav::Route;
use crate::report::format::{format_amount, format_date, format_price, truncate};

mod plotters_chart;

use plotters_chart::PriceChart;

/// Start the TUI on `initial`.
pub fn run(source: &dyn DataSource, initial: Route) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(source, initial);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Catalog,
    Detail,
}

/// Blocking work queued until the current frame has been drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    LoadCatalog,
    ResolveProduct,
    LoadChart,
}

struct App<'a> {
    source: &'a dyn DataSource,
    screen: Screen,
    catalog: Option<CatalogState>,
    selected: usize,
    editing_search: bool,
    search_input: String,
    detail: Option<DetailState>,
    cursor: usize,
    pending: Option<Pending>,
    status: String,
}

impl<'a> App<'a> {
    fn new(source: &'a dyn DataSource, initial: Route) -> Self {
        let mut app = Self {
            source,
            screen: Screen::Catalog,
            catalog: None,
            selected: 0,
            editing_search: false,
            search_input: String::new(),
            detail: None,
            cursor: 0,
            pending: None,
            status: format!("Data: {}", source.describe()),
        };
        app.navigate(initial);
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            // The loading frame is on screen; run the queued fetch now.
            if self.pending.is_some() {
                self.run_pending();
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
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

    fn navigate(&mut self, route: Route) {
        match route {
            Route::Catalog => {
                self.screen = Screen::Catalog;
                self.detail = None;
                if self.catalog.is_none() {
                    self.pending = Some(Pending::LoadCatalog);
                }
            }
            Route::Product(name) => {
                tracing::info!(product = %name, "opening product");
                self.screen = Screen::Detail;
                self.detail = Some(DetailState::loading(name));
                self.cursor = 0;
                self.pending = Some(Pending::ResolveProduct);
            }
        }
    }

    /// Run one queued step; may queue the next one.
    fn run_pending(&mut self) {
        let Some(step) = self.pending.take() else {
            return;
        };

        match step {
            Pending::LoadCatalog => {
                let mut state = CatalogState::load(self.source);
                state.apply_filters(Some(self.search_input.as_str()));
                self.catalog = Some(state);
                self.selected = 0;
            }
            Pending::ResolveProduct => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                detail.resolve(self.source);
                match detail.phase {
                    DetailPhase::ProductResolved => self.pending = Some(Pending::LoadChart),
                    DetailPhase::ProductNotFound => {
                        self.status = format!("Product not found: {}", detail.name);
                        self.navigate(Route::Catalog);
                    }
                    _ => {}
                }
            }
            Pending::LoadChart => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.load_chart(self.source);
                    self.cursor = detail.chart.as_ref().map(|c| c.len().saturating_sub(1)).unwrap_or(0);
                }
            }
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.pending.is_some() {
            return code == KeyCode::Char('q');
        }
        match self.screen {
            Screen::Catalog if self.editing_search => {
                self.handle_search_edit(code);
                false
            }
            Screen::Catalog => self.handle_catalog_key(code),
            Screen::Detail => self.handle_detail_key(code),
        }
    }

    fn handle_catalog_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => {
                self.editing_search = true;
                self.status = "Type to search. Enter to keep, Esc to clear.".to_string();
            }
            KeyCode::Esc => self.set_search(String::new()),
            KeyCode::Char('t') => {
                if let Some(catalog) = self.catalog.as_mut() {
                    let next = Trend::next_filter(catalog.criteria().trend);
                    catalog.set_trend(next);
                    self.selected = 0;
                    self.status = format!(
                        "trend: {}",
                        next.map(Trend::display_name).unwrap_or("all")
                    );
                }
            }
            KeyCode::Char('s') => {
                if let Some(catalog) = self.catalog.as_mut() {
                    let next = catalog.criteria().sort.next();
                    catalog.set_sort(next);
                    self.selected = 0;
                    self.status = format!("sort: {}", next.display_name());
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                let len = self.catalog.as_ref().map(|c| c.filtered().len()).unwrap_or(0);
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                let target = self
                    .catalog
                    .as_ref()
                    .and_then(|c| c.filtered().get(self.selected))
                    .map(|p| Route::Product(p.name.clone()));
                if let Some(route) = target {
                    self.navigate(route);
                }
            }
            KeyCode::Char('r') => {
                let mut rng = rand::thread_rng();
                let target = self
                    .catalog
                    .as_ref()
                    .and_then(|c| c.random_product(&mut rng))
                    .map(|p| Route::Product(p.name.clone()));
                match target {
                    Some(route) => self.navigate(route),
                    None => self.status = "No products to pick from.".to_string(),
                }
            }
            KeyCode::Char('R') => {
                self.catalog = None;
                self.pending = Some(Pending::LoadCatalog);
                self.status = "Reloading...".to_string();
            }
            _ => {}
        }
        false
    }

    fn handle_search_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                self.editing_search = false;
                self.status = self.results_status();
            }
            KeyCode::Esc => {
                self.editing_search = false;
                self.set_search(String::new());
            }
            KeyCode::Backspace => {
                let mut input = self.search_input.clone();
                input.pop();
                self.set_search(input);
            }
            KeyCode::Char(c) => {
                let mut input = self.search_input.clone();
                input.push(c);
                self.set_search(input);
            }
            _ => {}
        }
    }

    /// Every edit re-filters immediately.
    fn set_search(&mut self, input: String) {
        self.search_input = input;
        if let Some(catalog) = self.catalog.as_mut() {
            catalog.apply_filters(Some(self.search_input.as_str()));
        }
        self.selected = 0;
        self.status = self.results_status();
    }

    fn results_status(&self) -> String {
        self.catalog
            .as_ref()
            .map(CatalogState::results_line)
            .unwrap_or_default()
    }

    fn handle_detail_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Backspace => self.navigate(Route::Catalog),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                let len = self.chart().map(ChartSeries::len).unwrap_or(0);
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            _ => {}
        }
        false
    }

    fn chart(&self) -> Option<&ChartSeries> {
        self.detail.as_ref().and_then(|d| d.chart.as_ref())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        match self.screen {
            Screen::Catalog => {
                self.draw_catalog_header(frame, chunks[0]);
                self.draw_catalog_body(frame, chunks[1]);
            }
            Screen::Detail => {
                self.draw_detail_header(frame, chunks[0]);
                self.draw_detail_body(frame, chunks[1]);
            }
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_catalog_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("precios", Style::default().fg(Color::Cyan)),
            Span::raw(" - product catalog"),
        ]));

        let Some(catalog) = &self.catalog else {
            lines.push(Line::from(Span::styled(
                "Loading catalog...",
                Style::default().fg(Color::Yellow),
            )));
            let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
            frame.render_widget(p, area);
            return;
        };

        let summary = catalog.summary();
        let stats = catalog.quick_stats();
        lines.push(Line::from(Span::styled(
            format!(
                "products: {} | updated: {} | rising: {} | falling: {} | stable: {} | avg: {}",
                summary.total_products,
                format_date(summary.last_updated.as_deref()),
                stats.rising,
                stats.falling,
                stats.stable,
                format_price(Some(stats.mean_price)),
            ),
            Style::default().fg(Color::Gray),
        )));

        let criteria = catalog.criteria();
        let search_style = if self.editing_search {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if self.editing_search { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::raw("search: "),
            Span::styled(format!("[{}{cursor}]", self.search_input), search_style),
            Span::raw(format!(
                "  trend: {}  sort: {}",
                criteria.trend.map(Trend::display_name).unwrap_or("all"),
                criteria.sort.display_name()
            )),
        ]));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_catalog_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(catalog) = &self.catalog else {
            let block = Block::default().title("Products").borders(Borders::ALL);
            let msg = Paragraph::new("Loading...").style(Style::default().fg(Color::Yellow)).block(block);
            frame.render_widget(msg, area);
            return;
        };

        let title = catalog.results_line();
        let block = Block::default().title(title).borders(Borders::ALL);

        if let LoadStatus::Failed(message) = catalog.status() {
            let msg = Paragraph::new(format!("{message}\n\nPress R to reload."))
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let cards = match render_grid(catalog) {
            GridView::Empty => {
                let msg = Paragraph::new("No products match the current search.")
                    .style(Style::default().fg(Color::Yellow))
                    .block(block);
                frame.render_widget(msg, area);
                return;
            }
            GridView::Cards(cards) => cards,
        };

        let name_width = usize::from(area.width.saturating_sub(40)).max(12);
        let items: Vec<ListItem> = cards.iter().map(|card| card_item(card, name_width)).collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected.min(cards.len().saturating_sub(1))));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_detail_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(detail) = &self.detail else {
            return;
        };

        let mut lines: Vec<Line> = Vec::new();
        let (breadcrumb, title) = match (&detail.view, detail.phase) {
            (_, DetailPhase::LoadFailed) => (
                "Catalog".to_string(),
                Span::styled(
                    detail.error.clone().unwrap_or_default(),
                    Style::default().fg(Color::Red),
                ),
            ),
            (Some(view), _) => (
                view.breadcrumb.clone(),
                Span::styled(view.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ),
            (None, _) => (
                "Catalog".to_string(),
                Span::styled("Loading...", Style::default().fg(Color::Yellow)),
            ),
        };
        lines.push(Line::from(Span::styled(breadcrumb, Style::default().fg(Color::Gray))));
        lines.push(Line::from(title));
        if let Some(view) = &detail.view {
            lines.push(Line::from(vec![
                Span::raw(format!("{}  ", view.current_price)),
                trend_span(view),
            ]));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_detail_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(area);

        self.draw_info(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_info(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Product").borders(Borders::ALL);
        let Some(view) = self.detail.as_ref().and_then(|d| d.view.as_ref()) else {
            frame.render_widget(block, area);
            return;
        };

        let lines = vec![
            Line::from(format!("Current: {}", view.current_price)),
            Line::from(vec![Span::raw("Trend:   "), trend_span(view)]),
            Line::from(format!("Min:     {}", view.min_price)),
            Line::from(format!("Max:     {}", view.max_price)),
            Line::from(format!("Range:   {}", view.price_range)),
            Line::from(format!("Average: {}", view.avg_price)),
            Line::from(format!("Records: {}", view.record_count)),
            Line::from(""),
            Line::from(Span::styled(view.last_update.clone(), Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }).block(block);
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Price history").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(detail) = &self.detail else {
            return;
        };

        let message = match detail.phase {
            DetailPhase::Loading | DetailPhase::ProductResolved => {
                Some(("Loading price history...", Color::Yellow))
            }
            DetailPhase::ChartError | DetailPhase::LoadFailed => detail
                .error
                .as_deref()
                .map(|e| (e, Color::Red)),
            DetailPhase::ProductNotFound | DetailPhase::ChartReady => None,
        };
        if let Some((text, color)) = message {
            let p = Paragraph::new(text)
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true });
            frame.render_widget(p, inner);
            return;
        }

        let Some(series) = &detail.chart else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let tooltip = series.tooltip(self.cursor).unwrap_or_default();
        frame.render_widget(
            Paragraph::new(tooltip).style(Style::default().fg(Color::Yellow)),
            chunks[0],
        );

        let widget = PriceChart::new(series, Some(self.cursor));
        let x_bounds = widget.x_bounds();
        let y_bounds = widget.y_bounds;
        let (chart_rect, insets) = chart_layout(chunks[1]);
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, chunks[1], chart_rect, insets, series, x_bounds, y_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.screen {
            Screen::Catalog if self.editing_search => "type to search  Enter keep  Esc clear",
            Screen::Catalog => "/ search  t trend  s sort  ↑/↓ select  Enter open  r random  R reload  q quit",
            Screen::Detail => "←/→ price point  Esc back  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn trend_color(kind: Trend) -> Color {
    // Rising prices are bad news for shoppers.
    match kind {
        Trend::Rising => Color::Red,
        Trend::Falling => Color::Green,
        Trend::Stable => Color::Gray,
    }
}

fn trend_span(view: &DetailView) -> Span<'static> {
    let (icon, color) = match view.trend_icon {
        TrendIcon::UpRed => ("▲", Color::Red),
        TrendIcon::DownGreen => ("▼", Color::Green),
        TrendIcon::Neutral => ("■", Color::Gray),
    };
    Span::styled(format!("{icon} {}", view.trend_value), Style::default().fg(color))
}

fn card_item(card: &ProductCard, name_width: usize) -> ListItem<'static> {
    let line = Line::from(vec![
        Span::raw(format!(
            "{:<name_width$} ",
            truncate(&card.name, name_width)
        )),
        Span::styled(format!("{:>12} ", card.price), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("{:>12} ", card.date), Style::default().fg(Color::Gray)),
        Span::styled(format!("{:>7}", card.trend), Style::default().fg(trend_color(card.trend_kind))),
    ]);
    ListItem::new(line)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 12,
        right: 2,
        top: 0,
        bottom: 1,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Observation indices to label on the x axis: evenly spread, ends included.
fn x_tick_indices(len: usize, max_ticks: usize) -> Vec<usize> {
    if len == 0 || max_ticks == 0 {
        return Vec::new();
    }
    let ticks = max_ticks.min(len);
    if ticks == 1 {
        return vec![0];
    }
    let mut out: Vec<usize> = (0..ticks)
        .map(|i| ((i as f64 / (ticks as f64 - 1.0)) * (len as f64 - 1.0)).round() as usize)
        .collect();
    out.dedup();
    out
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    series: &ChartSeries,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let style = Style::default().fg(Color::Gray);
    let span = (x_bounds[1] - x_bounds[0]).max(1.0);

    for idx in x_tick_indices(series.len(), 5) {
        let Some(label) = series.labels.get(idx) else {
            continue;
        };
        let u = (idx as f64 - x_bounds[0]) / span;
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label_len = label.chars().count() as u16;
        let start = x
            .saturating_sub(label_len / 2)
            .min((chart.x + chart.width).saturating_sub(label_len));
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.as_str()).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let ticks = 5usize;
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format_amount(y_val.round());
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }
}
