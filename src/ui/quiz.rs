use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::engine::AttemptState;
use crate::models::OptionAppearance;

pub fn render(frame: &mut Frame, area: Rect, state: &AttemptState) {
    let Some(question) = state.current_question() else {
        render_empty(frame, area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], state);
    render_question_text(frame, chunks[1], &question.text);
    render_feedback(frame, chunks[2], state);
    render_options(frame, chunks[3], state);
    render_controls(frame, chunks[4]);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(area);

    let content = vec![
        Line::from(Span::styled(
            "No questions available.",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from("q quit".fg(Color::DarkGray)),
    ];
    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

fn render_progress(frame: &mut Frame, area: Rect, state: &AttemptState) {
    let progress = format!("{}/{}", state.current_index() + 1, state.total_questions());
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, state: &AttemptState) {
    let line = match state.is_correct() {
        Some(true) => Line::from(Span::styled(
            "Correct!",
            Style::default().fg(Color::Green).bold(),
        )),
        Some(false) => Line::from(Span::styled(
            "Incorrect",
            Style::default().fg(Color::Red).bold(),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_options(frame: &mut Frame, area: Rect, state: &AttemptState) {
    let Some(question) = state.current_question() else {
        return;
    };

    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);
    for (index, option) in question.options.iter().enumerate() {
        lines.push(option_line(state, index, option));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn option_line<'a>(state: &AttemptState, index: usize, option: &'a str) -> Line<'a> {
    let label = format!("{}. ", index + 1);

    match state.option_appearance(index) {
        OptionAppearance::Selectable => Line::from(vec![
            Span::styled(format!("   {}", label), Style::default().fg(Color::Gray)),
            Span::styled(option, Style::default().fg(Color::Gray)),
        ]),
        OptionAppearance::RevealedCorrect => {
            let style = Style::default().fg(Color::Green).bold();
            Line::from(vec![
                Span::styled(" ✓ ", style),
                Span::styled(label, style),
                Span::styled(option, style),
            ])
        }
        OptionAppearance::RevealedIncorrectChosen => {
            let style = Style::default().fg(Color::Red);
            Line::from(vec![
                Span::styled(" ✗ ", style),
                Span::styled(label, style),
                Span::styled(option, style),
            ])
        }
        // Hidden during feedback.
        OptionAppearance::RevealedOther => Line::from(""),
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("1-9 answer  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
