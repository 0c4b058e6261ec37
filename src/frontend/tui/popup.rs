//! Overlay rendering: help, host prompt and card prompt.

use crate::data::{format_menus, Menu};
use crate::frontend::prompt::{CardPrompt, HostPrompt, Overlay};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// A `width` x `height` rect centered in `area`, clipped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render(frame: &mut Frame, area: Rect, overlay: &Overlay, menus: &[Menu]) {
    match overlay {
        Overlay::None => {}
        Overlay::Help => render_help(frame, area, menus),
        Overlay::Host(prompt) => render_host(frame, area, prompt),
        Overlay::Card(prompt) => render_card(frame, area, prompt),
    }
}

fn render_help(frame: &mut Frame, area: Rect, menus: &[Menu]) {
    let lines: Vec<Line> = format_menus(menus).into_iter().map(Line::from).collect();
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(20) as u16 + 4;
    let height = lines.len() as u16 + 2;

    let rect = centered_rect(width, height, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (any key closes) "),
        ),
        rect,
    );
}

fn render_host(frame: &mut Frame, area: Rect, prompt: &HostPrompt) {
    let rect = centered_rect(40, 3, area);
    frame.render_widget(Clear, rect);

    let block = Block::default().borders(Borders::ALL).title(" Connect to ");
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    frame.render_widget(&prompt.textarea, inner);
}

fn render_card(frame: &mut Frame, area: Rect, prompt: &CardPrompt) {
    let rect = centered_rect(24, prompt.choices.len() as u16 + 2, area);
    frame.render_widget(Clear, rect);

    let rows = rect.height.saturating_sub(2) as usize;
    let offset = (prompt.selected + 1).saturating_sub(rows.max(1));

    let lines: Vec<Line> = prompt
        .choices
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(idx, label)| {
            let text = if label.is_empty() { "(none)" } else { label.as_str() };
            let style = if idx == prompt.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::styled(format!(" {} ", text), style)
        })
        .collect();

    let title = format!(" {} ", prompt.kind.title());
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(40, 10, area), Rect::new(20, 7, 40, 10));

        // Larger than the screen is clipped
        assert_eq!(centered_rect(100, 30, area), area);
    }
}
