//! String rows: volume gauge plus a pluck flash that fades out.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use tanpura_dsp::tuning::PLUCK_ORDER;

use super::super::app::App;

const FLASH_WIDTH: usize = 8;

pub fn render_strings(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Strings ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(inner);

    for (index, string) in PLUCK_ORDER.iter().enumerate() {
        if index >= rows.len() {
            break;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Min(10),
                Constraint::Length(FLASH_WIDTH as u16 + 2),
            ])
            .split(rows[index]);

        let selected = index == app.selected;
        let label_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if selected { ">" } else { " " };
        frame.render_widget(
            Paragraph::new(format!("{marker} {}", string.label())).style(label_style),
            columns[0],
        );

        let volume = app.config.strings[index].volume;
        let gauge = Gauge::default()
            .ratio(volume as f64)
            .label(format!("{:.0}%", volume * 100.0))
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray));
        frame.render_widget(gauge, columns[1]);

        let flash_cells = (app.meters[index] * FLASH_WIDTH as f32).round() as usize;
        let flash = "█".repeat(flash_cells.min(FLASH_WIDTH));
        frame.render_widget(
            Paragraph::new(format!(" {flash}")).style(Style::default().fg(Color::Yellow)),
            columns[2],
        );
    }
}
