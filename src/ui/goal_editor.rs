use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::goal::{GoalEditor, GoalField};

pub const EDITOR_WIDTH: u16 = 30;

/// Inline hour/minute input box
pub struct GoalEditorWidget<'a> {
    editor: &'a GoalEditor,
}

impl<'a> GoalEditorWidget<'a> {
    pub fn new(editor: &'a GoalEditor) -> Self {
        Self { editor }
    }

    fn field_style(&self, field: GoalField) -> Style {
        let base = Style::default().add_modifier(Modifier::BOLD);
        if self.editor.focus == field {
            base.fg(Color::Black).bg(Color::Yellow)
        } else {
            base
        }
    }
}

impl Widget for GoalEditorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let time = Line::from(vec![
            Span::styled(
                format!(" {:02} ", self.editor.hours),
                self.field_style(GoalField::Hours),
            ),
            Span::raw(" : "),
            Span::styled(
                format!(" {:02} ", self.editor.minutes),
                self.field_style(GoalField::Minutes),
            ),
        ]);
        let units = Line::from(Span::styled("hours     minutes", dim_style));
        let clock = Line::from(Span::styled(
            if self.editor.clock_24h {
                "24-hour clock"
            } else {
                "12-hour clock"
            },
            dim_style,
        ));

        Paragraph::new(vec![time, units, clock])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(Line::from(" Goal Time ").centered()),
            )
            .render(area, buf);
    }
}
