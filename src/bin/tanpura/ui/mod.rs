//! TUI for tanpura.
//!
//! A status bar, one row per string with its volume and pluck flash, and a
//! spectrum pane fed from the output tap.

mod strings;
pub mod spectrum;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};

use super::app::App;

pub fn render(frame: &mut Frame, app: &App, spectrum: &[u64]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(6),    // Strings
            Constraint::Length(8), // Spectrum
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status(frame, chunks[0], app);
    strings::render_strings(frame, chunks[1], app);
    render_spectrum(frame, chunks[2], spectrum);

    let help = Paragraph::new(
        " q quit | space play/stop | 1-4/enter pluck | up/down select | left/right volume \
         | +/- tempo | [/] delay | ,/. master | e/E echo | k/K key | o octave",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

fn render_status(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let block = Block::default().title(" tanpura ").borders(Borders::ALL);

    let play_span = if app.config.is_playing {
        Span::styled("▶ Playing  ", Style::default().fg(Color::Green))
    } else {
        Span::styled("■ Stopped  ", Style::default().fg(Color::Yellow))
    };

    let mut spans = vec![
        play_span,
        Span::styled(
            format!("Key: {}{}  ", app.key.name(), app.octave),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Tempo: {:.0} cpm  ", app.config.tempo),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Delay: {:.0} ms  ", app.config.pluck_delay_ms),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Master: {:.0}%  ", app.config.master_volume * 100.0),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Echo: {:.0}%  ", app.config.echo_level * 100.0),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1} kHz", app.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_spectrum(frame: &mut Frame, area: ratatui::layout::Rect, spectrum: &[u64]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let sparkline = Sparkline::default()
        .block(block)
        .style(Style::default().fg(Color::Green))
        .max(100)
        .data(spectrum);

    frame.render_widget(sparkline, area);
}
