//! Two-panel terminal chart: adjusted close on top, RSI below.

use std::io;

use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEventKind},
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph},
};
use tracing::debug;

use crate::{CombinedSeries, Price, Timestamp, error::Result};

const BACKGROUND: Color = Color::Rgb(0x11, 0x11, 0x11);
const FOREGROUND: Color = Color::Rgb(0xcc, 0xcc, 0xcc);
/// Light gray, for both the price and the RSI line.
const SERIES_LINE: Color = Color::Rgb(0xd3, 0xd3, 0xd3);

pub const RED: Color = Color::Rgb(0xff, 0x00, 0x00);
pub const AMBER: Color = Color::Rgb(0xff, 0xaa, 0x00);
pub const GREEN: Color = Color::Rgb(0x00, 0xff, 0x00);
pub const GRAY: Color = Color::Rgb(0xcc, 0xcc, 0xcc);

/// Horizontal guides drawn across the RSI panel.
pub const REFERENCE_LEVELS: [(Price, Color); 8] = [
    (0.0, RED),
    (10.0, AMBER),
    (20.0, GREEN),
    (30.0, GRAY),
    (70.0, GRAY),
    (80.0, GREEN),
    (90.0, AMBER),
    (100.0, RED),
];

pub const RSI_BOUNDS: [f64; 2] = [0.0, 100.0];

const EMPTY_NOTE: &str = "Not enough data to plot.";
const DATE_LABEL: &str = "%Y-%m-%d";
const HALF_DAY_SECS: f64 = 43_200.0;

/// Displays a [`CombinedSeries`].
#[cfg_attr(test, mockall::automock)]
pub trait Renderer {
    /// Shows `combined` labelled with `ticker`.
    ///
    /// # Errors
    ///
    /// [`Error::Render`](crate::Error::Render) when the output device fails.
    fn render(&self, combined: &CombinedSeries, ticker: &str) -> Result<()>;
}

/// Everything needed to draw the chart, computed up front from the series.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartView {
    pub price_title: String,
    pub rsi_title: String,
    pub price: Vec<(f64, f64)>,
    pub rsi: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub price_bounds: [f64; 2],
    pub x_labels: [String; 2],
}

impl ChartView {
    #[must_use]
    pub fn new(combined: &CombinedSeries, ticker: &str) -> Self {
        let price = combined
            .iter()
            .map(|p| (x_coord(p.date), p.adj_close))
            .collect();
        let rsi = combined.iter().map(|p| (x_coord(p.date), p.rsi)).collect();

        let (x_bounds, x_labels) = match combined.date_range() {
            Some((first, last)) => (
                pad([x_coord(first), x_coord(last)], HALF_DAY_SECS),
                [date_label(first), date_label(last)],
            ),
            None => ([0.0, 1.0], [String::new(), String::new()]),
        };

        let price_bounds = combined.price_range().map_or([0.0, 1.0], |(lo, hi)| {
            let span = if hi > lo { hi - lo } else { lo.abs().max(1.0) };
            pad([lo, hi], span * 0.05)
        });

        Self {
            price_title: format!("{} Adjusted Close Price", ticker.to_uppercase()),
            rsi_title: "RSI Value".to_string(),
            price,
            rsi,
            x_bounds,
            price_bounds,
            x_labels,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    /// Two-point segments spanning the x axis, one per reference level.
    #[must_use]
    pub fn reference_lines(&self) -> Vec<([(f64, f64); 2], Color)> {
        let [x0, x1] = self.x_bounds;
        REFERENCE_LEVELS
            .iter()
            .map(|&(level, color)| ([(x0, level), (x1, level)], color))
            .collect()
    }

    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(
            Block::new().style(Style::new().bg(BACKGROUND).fg(FOREGROUND)),
            frame.area(),
        );

        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(frame.area());

        if self.is_empty() {
            Self::draw_note(frame, top, &self.price_title);
            Self::draw_note(frame, bottom, &self.rsi_title);
            return;
        }

        self.draw_price(frame, top);
        self.draw_rsi(frame, bottom);
    }

    fn draw_price(&self, frame: &mut Frame, area: Rect) {
        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::new().fg(SERIES_LINE))
            .data(&self.price);

        let [lo, hi] = self.price_bounds;
        let chart = Chart::new(vec![dataset])
            .block(panel(&self.price_title))
            .x_axis(self.x_axis())
            .y_axis(
                Axis::default()
                    .title("Price")
                    .bounds(self.price_bounds)
                    .labels([format!("{lo:.2}"), format!("{hi:.2}")]),
            );

        frame.render_widget(chart, area);
    }

    fn draw_rsi(&self, frame: &mut Frame, area: Rect) {
        let guides = self.reference_lines();

        let mut datasets: Vec<Dataset> = guides
            .iter()
            .map(|(segment, color)| {
                Dataset::default()
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Line)
                    .style(Style::new().fg(*color))
                    .data(segment)
            })
            .collect();
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::new().fg(SERIES_LINE))
                .data(&self.rsi),
        );

        let chart = Chart::new(datasets)
            .block(panel(&self.rsi_title))
            .x_axis(self.x_axis())
            .y_axis(
                Axis::default()
                    .title("RSI")
                    .bounds(RSI_BOUNDS)
                    .labels(["0", "50", "100"]),
            );

        frame.render_widget(chart, area);
    }

    fn draw_note(frame: &mut Frame, area: Rect, title: &str) {
        frame.render_widget(Paragraph::new(EMPTY_NOTE).block(panel(title)), area);
    }

    fn x_axis(&self) -> Axis<'_> {
        Axis::default()
            .title("Date")
            .bounds(self.x_bounds)
            .labels(self.x_labels.iter().map(String::as_str))
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::bordered()
        .title(title)
        .style(Style::new().bg(BACKGROUND).fg(FOREGROUND))
}

#[allow(clippy::cast_precision_loss)]
fn x_coord(date: Timestamp) -> f64 {
    date.timestamp() as f64
}

fn date_label(date: Timestamp) -> String {
    date.format(DATE_LABEL).to_string()
}

/// Widens `[lo, hi]` by `margin` on each side.
fn pad([lo, hi]: [f64; 2], margin: f64) -> [f64; 2] {
    [lo - margin, hi + margin]
}

/// Runs `body` on the terminal returned by `init`, then calls `restore`.
///
/// `restore` runs on every path, including a failed `init`, which may have
/// left raw mode enabled.
fn with_terminal<T>(
    init: impl FnOnce() -> io::Result<T>,
    body: impl FnOnce(&mut T) -> io::Result<()>,
    restore: impl FnOnce(),
) -> io::Result<()> {
    let result = init().and_then(|mut terminal| body(&mut terminal));
    restore();
    result
}

/// Interactive full-screen chart. Blocks until `q` or `Esc` is pressed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalChart;

impl TerminalChart {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn event_loop(terminal: &mut DefaultTerminal, view: &ChartView) -> io::Result<()> {
        loop {
            terminal.draw(|frame| view.draw(frame))?;

            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(());
            }
        }
    }
}

impl Renderer for TerminalChart {
    fn render(&self, combined: &CombinedSeries, ticker: &str) -> Result<()> {
        let view = ChartView::new(combined, ticker);
        debug!(points = combined.len(), "drawing chart");

        Ok(with_terminal(
            ratatui::try_init,
            |terminal| Self::event_loop(terminal, &view),
            ratatui::restore,
        )?)
    }
}
