//! TUI Dashboard using ratatui.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use insight_core::types::{MetricKind, Signal};
use insight_report::{format_change, format_value, AnalysisReport, NO_VALUE};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Tabs},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use crate::charts::{axis_bounds, date_labels, points, value_labels};

/// Dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Valuation,
    Technicals,
    Signals,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Valuation, Tab::Technicals, Tab::Signals];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Valuation => "Valuation",
            Tab::Technicals => "Technicals",
            Tab::Signals => "Signals",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Interactive view over a finished analysis.
pub struct Dashboard<'a> {
    report: &'a AnalysisReport,
    tab: Tab,
    refresh_ms: u64,
}

impl<'a> Dashboard<'a> {
    /// Create a new dashboard.
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self {
            report,
            tab: Tab::default(),
            refresh_ms: 250,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Apply a key press. Returns `true` when the dashboard should close.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.tab = self.tab.previous()
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.tab = Tab::ALL[index];
            }
            _ => {}
        }
        false
    }

    /// Run the dashboard until the user quits.
    pub fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            if event::poll(Duration::from_millis(self.refresh_ms))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code) {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn ui(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(10),   // Page
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        self.render_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Overview => self.render_overview(frame, chunks[1]),
            Tab::Valuation => self.render_valuation(frame, chunks[1]),
            Tab::Technicals => self.render_technicals(frame, chunks[1]),
            Tab::Signals => self.render_signals(frame, chunks[1]),
        }

        let help = Paragraph::new(Line::from(
            "Tab/←/→ switch page | 1-4 jump | q quit",
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut title = format!(" {} ", self.report.ticker);
        if self.report.synthetic_prices {
            title.push_str("(synthetic data) ");
        }
        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(tabs, area);
    }

    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(8)])
            .split(area);

        let overview = &self.report.overview;
        let cards = [
            ("Latest Close", overview.latest_close, false),
            ("1M Change", overview.change_1m_pct, true),
            ("3M Change", overview.change_3m_pct, true),
            ("Period Change", overview.change_total_pct, true),
        ];
        let card_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25); 4])
            .split(chunks[0]);
        for ((label, value, is_change), card_area) in cards.iter().zip(card_areas.iter()) {
            render_card(frame, *card_area, label, *value, *is_change);
        }

        let closes = points(&self.report.prices.closes());
        let datasets = vec![Dataset::default()
            .name("Close")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&closes)];
        let bounds = axis_bounds(&[&closes[..]]);
        frame.render_widget(self.chart("Price", datasets, bounds), chunks[1]);
    }

    fn render_valuation(&self, frame: &mut Frame, area: Rect) {
        let metrics = &self.report.metrics;
        let header_cells = ["Metric", "Value", "Source"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let rows = MetricKind::ALL.iter().map(|kind| {
            let source = match metrics.get(*kind) {
                None => NO_VALUE,
                Some(_) if metrics.is_synthetic(*kind) => "synthetic",
                Some(_) => "fetched",
            };
            let source_color = if source == "synthetic" {
                Color::Yellow
            } else {
                Color::Reset
            };
            Row::new(vec![
                Cell::from(kind.label()),
                Cell::from(metrics.display(*kind)),
                Cell::from(source).style(Style::default().fg(source_color)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Valuation"));

        frame.render_widget(table, area);
    }

    fn render_technicals(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let indicators = &self.report.indicators;

        let dif = points(&indicators.difs());
        let dea = points(&indicators.deas());
        let hist = points(&indicators.macds());
        let bounds = axis_bounds(&[&dif[..], &dea[..], &hist[..]]);
        let macd = vec![
            Dataset::default()
                .name("MACD")
                .marker(symbols::Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(Color::DarkGray))
                .data(&hist),
            line_dataset("DIF", Color::Yellow, &dif),
            line_dataset("DEA", Color::Magenta, &dea),
        ];
        frame.render_widget(self.chart("MACD (12, 26, 9)", macd, bounds), chunks[0]);

        let k = points(&indicators.ks());
        let d = points(&indicators.ds());
        let j = points(&indicators.js());
        let bounds = axis_bounds(&[&k[..], &d[..], &j[..]]);
        let kdj = vec![
            line_dataset("K", Color::Yellow, &k),
            line_dataset("D", Color::Cyan, &d),
            line_dataset("J", Color::Magenta, &j),
        ];
        frame.render_widget(self.chart("KDJ (9, 3, 3)", kdj, bounds), chunks[1]);
    }

    fn render_signals(&self, frame: &mut Frame, area: Rect) {
        let report = self.report;
        let mut heading = vec![Span::raw("Signals: ")];
        heading.extend(signal_spans(&report.signals));

        let mut lines = vec![Line::from(heading), Line::from("")];

        if let Some(row) = report.indicators.last() {
            lines.push(Line::from(format!(
                "DIF {}  DEA {}  MACD {}",
                format_value(row.dif),
                format_value(row.dea),
                format_value(row.macd)
            )));
            lines.push(Line::from(format!(
                "K {}  D {}  J {}",
                format_value(row.k),
                format_value(row.d),
                format_value(row.j)
            )));
        }
        if report.synthetic_prices {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Price history is synthetic: the data source was unavailable.",
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Generated {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Signals"));
        frame.render_widget(paragraph, area);
    }

    fn chart<'d>(&self, title: &'d str, datasets: Vec<Dataset<'d>>, bounds: [f64; 2]) -> Chart<'d> {
        let dates = self.report.prices.dates();
        let x_max = dates.len().saturating_sub(1).max(1) as f64;

        Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title(title))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, x_max])
                    .labels(date_labels(&dates)),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(bounds)
                    .labels(value_labels(bounds)),
            )
    }
}

fn line_dataset<'d>(name: &'d str, color: Color, data: &'d [(f64, f64)]) -> Dataset<'d> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

fn render_card(frame: &mut Frame, area: Rect, label: &str, value: Option<f64>, is_change: bool) {
    let (text, color) = match value {
        None => (NO_VALUE.to_string(), Color::Reset),
        Some(v) if is_change => (
            format_change(value),
            if v >= 0.0 { Color::Green } else { Color::Red },
        ),
        Some(_) => (format_value(value), Color::White),
    };
    let card = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(label.to_string()));
    frame.render_widget(card, area);
}

/// One span per signal, each colored by its own direction.
fn signal_spans(signals: &[Signal]) -> Vec<Span<'static>> {
    if signals.is_empty() {
        return vec![Span::raw(Signal::NONE_TEXT)];
    }
    let mut spans = Vec::with_capacity(signals.len() * 2);
    for (i, signal) in signals.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(", "));
        }
        let color = if signal.is_bullish() { Color::Green } else { Color::Red };
        spans.push(Span::styled(
            signal.text(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    spans
}
