pub mod goal_editor;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::{
    app::App,
    celebration::ConfettiBurst,
    prefs::KeyValueStore,
    view::{ButtonKind, ScreenView},
};

const PLAY_COLOR: Color = Color::Rgb(0x6C, 0xE1, 0x6E);
const STOP_COLOR: Color = Color::Rgb(0xFF, 0x69, 0x69);

const BUTTON_WIDTH: u16 = 18;
const BUTTON_HEIGHT: u16 = 9;
const EDITOR_HEIGHT: u16 = 5;

const PLAY_GLYPH: [&str; 7] = [
    "  ██      ",
    "  ████    ",
    "  ██████  ",
    "  ████████",
    "  ██████  ",
    "  ████    ",
    "  ██      ",
];

const STOP_GLYPH: [&str; 7] = [
    "          ",
    " ████████ ",
    " ████████ ",
    " ████████ ",
    " ████████ ",
    " ████████ ",
    "          ",
];

impl<S: KeyValueStore> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view();
        render_screen(&view, area, buf);

        // Render celebration on top of everything else
        if self.notifier.confetti.is_active {
            render_confetti(&self.notifier.confetti, area, buf);
        }
    }
}

/// Horizontally centred slice of `area`
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

pub fn render_screen(view: &ScreenView, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1),             // music toggle
            Constraint::Min(0),                // spacer
            Constraint::Length(BUTTON_HEIGHT), // start/stop
            Constraint::Length(1),             // elapsed
            Constraint::Length(1),             // started on
            Constraint::Length(1),             // padding
            Constraint::Length(1),             // goal summary
            Constraint::Length(EDITOR_HEIGHT), // goal editor or its button
            Constraint::Min(0),                // spacer
            Constraint::Length(1),             // key legend
        ])
        .split(area);

    // music toggle, top-left
    let (music_text, music_style) = if view.music_enabled {
        ("♪ music on", Style::default().fg(Color::Cyan))
    } else {
        ("♪ music off", dim_style)
    };
    Paragraph::new(Line::from(vec![
        Span::styled("[m] ", dim_style),
        Span::styled(music_text, music_style),
    ]))
    .alignment(Alignment::Left)
    .render(chunks[0], buf);

    render_button(view.button, centered(chunks[2], BUTTON_WIDTH), buf);

    if let Some(elapsed) = &view.elapsed {
        let style = if view.goal_reached {
            bold_style.fg(PLAY_COLOR)
        } else {
            bold_style
        };
        Paragraph::new(Span::styled(elapsed.clone(), style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }

    if let Some(started_on) = &view.started_on {
        Paragraph::new(Span::styled(started_on.clone(), dim_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    if let Some(summary) = &view.goal_summary {
        Paragraph::new(Span::styled(summary.clone(), bold_style.fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    match &view.editor {
        Some(editor) => {
            goal_editor::GoalEditorWidget::new(editor)
                .render(centered(chunks[7], goal_editor::EDITOR_WIDTH), buf);
        }
        None => {
            let change = Paragraph::new(Line::from(vec![
                Span::styled("[g] ", dim_style),
                Span::styled("Change Goal Time", bold_style),
            ]))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            );
            let slot = Rect {
                height: 3.min(chunks[7].height),
                ..centered(chunks[7], 26)
            };
            change.render(slot, buf);
        }
    }

    let legend = if view.editor.is_some() {
        "(↑/↓) adjust (←/→) field (0-9) type (f) clock (enter) confirm (esc) cancel"
    } else {
        "(space) start/stop (g) goal (m) music (q) quit"
    };
    Paragraph::new(Span::styled(legend, italic_style.patch(dim_style)))
        .alignment(Alignment::Center)
        .render(chunks[9], buf);
}

fn render_button(kind: ButtonKind, area: Rect, buf: &mut Buffer) {
    let (glyph, color) = match kind {
        ButtonKind::Play => (PLAY_GLYPH, PLAY_COLOR),
        ButtonKind::Stop => (STOP_GLYPH, STOP_COLOR),
    };
    let lines = glyph
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(color))))
        .collect::<Vec<Line>>();

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .title(Line::from(format!(" {} ", kind.label())).centered()),
        )
        .render(area, buf);
}

/// Render confetti particles on top of the screen
pub fn render_confetti(confetti: &ConfettiBurst, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &confetti.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];
            let freshness = particle.freshness();
            let style = if freshness > 0.7 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else if freshness > 0.3 {
                Style::default().fg(color)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}
