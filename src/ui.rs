use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, SuggestionAction};
use crate::conversation::Author;
use crate::forms::{FieldKind, FormKind, IntakeForm, HEALTH_QUESTIONS_PROMPT};

const ASSISTANT_NAME: &str = "MindMate";

const DISCLAIMER: &str = "Disclaimer: This AI assistant provides support and guidance but is not a substitute for professional medical advice, diagnosis, or treatment.";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, chat_area, suggestions_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_transcript(app, frame, chat_area);
    render_suggestions(frame, suggestions_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.active_form.is_some() {
        render_form_popup(app, frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" MindMate AI Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            "Soulklinic • 24/7 Mental Health Support ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let disclaimer = Line::from(Span::styled(
        format!(" {}", DISCLAIMER),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM),
    ));

    frame.render_widget(Paragraph::new(vec![title, disclaimer]), area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");

    // Store dimensions for mouse hit-testing and scroll calculations
    // (inner size minus borders).
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();
    for message in app.conversation.messages() {
        let (name, name_color) = match message.author {
            Author::User => ("You", Color::Cyan),
            Author::Assistant => (ASSISTANT_NAME, Color::Yellow),
        };
        lines.push(Line::from(vec![
            Span::styled(
                name,
                Style::default().fg(name_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · {}", message.timestamp.format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        for line in message.text.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }

    if app.conversation.is_composing() {
        lines.push(Line::from(Span::styled(
            ASSISTANT_NAME,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Typing{}", dots),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let transcript = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(transcript, area);
}

fn render_suggestions(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(Color::Gray);

    let mut spans: Vec<Span> = Vec::new();
    for action in SuggestionAction::all() {
        spans.push(Span::styled(format!(" {} ", action.key_hint()), key_style));
        spans.push(Span::styled(format!(" {}  ", action.label()), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing && app.active_form.is_none();
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message ");

    // Horizontal scroll keeps the cursor visible in a single-line input.
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll_offset = if inner_width == 0 {
        0
    } else if app.cursor >= inner_width {
        app.cursor - inner_width + 1
    } else {
        0
    };

    let input = if app.input.is_empty() {
        Paragraph::new("Share what's on your mind...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
    } else {
        let visible_text: String = app
            .input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text)
            .style(Style::default().fg(Color::Cyan))
            .block(block)
    };

    frame.render_widget(input, area);

    if editing {
        let cursor_x = (app.cursor - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints: Vec<Span> = if app.active_form.is_some() {
        vec![
            Span::styled(" Tab/↑↓ ", key_style),
            Span::styled(" field ", label_style),
            Span::styled(" ←/→ ", key_style),
            Span::styled(" option ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" submit ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" cancel ", label_style),
        ]
    } else {
        match app.input_mode {
            InputMode::Editing => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" browse ", label_style),
                Span::styled(" F2-F4 ", key_style),
                Span::styled(" shortcuts ", label_style),
                Span::styled(" Ctrl-C ", key_style),
                Span::styled(" quit ", label_style),
            ],
            InputMode::Normal => vec![
                Span::styled(" j/k ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" g/G ", key_style),
                Span::styled(" top/bottom ", label_style),
                Span::styled(" 1-3 ", key_style),
                Span::styled(" shortcuts ", label_style),
                Span::styled(" i ", key_style),
                Span::styled(" write ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ],
        }
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

/// Greedy word wrap so popup line indexes stay exact for scroll math.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() || wrapped.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

fn render_form_popup(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(form) = app.active_form.as_ref() else {
        return;
    };

    let popup_width = 72.min(area.width.saturating_sub(4));
    let content_width = popup_width.saturating_sub(4) as usize;

    let (lines, focus_end, cursor) = form_lines(form, content_width);

    // Borders plus one line reserved for the validation error; never taller
    // than the terminal allows.
    let needed_height = lines.len() as u16 + 3;
    let popup_height = needed_height.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", form.title));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let visible_height = inner.height.saturating_sub(1) as usize;

    // Keep the focused field inside the window.
    let total = lines.len();
    let scroll = if total <= visible_height || focus_end < visible_height {
        0
    } else {
        (focus_end + 1 - visible_height).min(total - visible_height)
    };

    let window: Vec<Line> = lines
        .into_iter()
        .skip(scroll)
        .take(visible_height)
        .collect();
    let fields_area = Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), visible_height as u16);
    frame.render_widget(Paragraph::new(Text::from(window)), fields_area);

    // Cursor on the focused text field, when its value line is in view.
    if let Some((cursor_line, cursor_col)) = cursor {
        if cursor_line >= scroll && cursor_line < scroll + visible_height {
            let cursor_x = (cursor_col as u16).min(fields_area.width.saturating_sub(1));
            frame.set_cursor_position((
                fields_area.x + cursor_x,
                fields_area.y + (cursor_line - scroll) as u16,
            ));
        }
    }

    if let Some(error) = &form.error {
        let error_area = Rect::new(inner.x + 1, inner.y + inner.height.saturating_sub(1), inner.width.saturating_sub(2), 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            error_area,
        );
    }
}

/// Build the popup body. Returns the lines, the index of the focused
/// field's last line, and the cursor position for a focused text field.
fn form_lines(
    form: &IntakeForm,
    width: usize,
) -> (Vec<Line<'static>>, usize, Option<(usize, usize)>) {
    let mut lines: Vec<Line> = Vec::new();
    let mut focus_end = 0;
    let mut cursor = None;

    for (i, field) in form.fields.iter().enumerate() {
        // The health questions are prefaced by the two-week prompt.
        if form.kind == FormKind::Questionnaire && field.key == "question1" {
            for chunk in wrap_text(HEALTH_QUESTIONS_PROMPT, width) {
                lines.push(Line::from(Span::styled(
                    chunk,
                    Style::default().fg(Color::Magenta),
                )));
            }
            lines.push(Line::default());
        }

        let focused = i == form.focus;
        let marker = if focused { "> " } else { "  " };
        let required = if field.required { " *" } else { "" };
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        for (j, chunk) in wrap_text(&format!("{}{}", field.label, required), width.saturating_sub(2))
            .into_iter()
            .enumerate()
        {
            let prefix = if j == 0 { marker } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{}{}", prefix, chunk),
                label_style,
            )));
        }

        match field.kind {
            FieldKind::Text => {
                if focused {
                    cursor = Some((lines.len(), 4 + field.value.chars().count()));
                }
                let value_style = if field.value.is_empty() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                lines.push(Line::from(Span::styled(
                    format!("    {}", field.display_value()),
                    value_style,
                )));
            }
            FieldKind::Choice(options) => {
                let mut spans = vec![Span::raw("    ")];
                for (j, option) in options.iter().enumerate() {
                    if j > 0 {
                        spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
                    }
                    let style = if option.value == field.value {
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    spans.push(Span::styled(option.label.to_string(), style));
                }
                lines.push(Line::from(spans));
            }
        }

        if focused {
            focus_end = lines.len().saturating_sub(1);
        }
        lines.push(Line::default());
    }

    (lines, focus_end, cursor)
}
