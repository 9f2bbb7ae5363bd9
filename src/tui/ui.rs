use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::theme;
use crate::session::{FeedbackTone, Phase};

/// Labels for the six trust buttons, in rating order 0-5.
const CHOICE_LABELS: [&str; 6] = ["0% Trust", "20%", "40%", "60%", "80%", "100% Trust"];

/// Create a styled block with rounded corners
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(theme::BORDER_TYPE)
}

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Instructions
            Constraint::Length(3), // Trust prompt
            Constraint::Length(6), // Center: id entry / processing / feedback
            Constraint::Length(5), // Choice buttons
            Constraint::Length(3), // Trials-remaining bar
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_instructions(frame, app, chunks[0]);
    draw_prompt(frame, app, chunks[1]);
    draw_center(frame, app, chunks[2]);
    draw_choices(frame, app, chunks[3]);
    draw_remaining(frame, app, chunks[4]);
    draw_status_bar(frame, app, chunks[5]);

    if app.show_acknowledgment {
        draw_acknowledgment(frame);
    }
}

fn draw_instructions(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(app.instructions.as_str())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(styled_block("Instructions"));
    frame.render_widget(paragraph, area);
}

fn draw_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let Some(difficulty) = app.prompt else {
        return;
    };

    let line = Line::from(vec![
        Span::raw("How much do you trust the robotic arm to successfully complete a "),
        Span::styled(
            difficulty.label(),
            Style::default()
                .fg(theme::difficulty_color(difficulty))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" obstacle course?"),
    ]);
    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_center(frame: &mut Frame, app: &App, area: Rect) {
    match app.phase() {
        Phase::AwaitingParticipantId => draw_id_entry(frame, app, area),
        _ => {
            if let Some(value) = app.processing {
                draw_processing(frame, value, area);
            } else if let Some((text, tone)) = app.feedback {
                draw_feedback(frame, text, tone, area);
            }
        }
    }
}

fn draw_id_entry(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from("Enter Participant Number:"),
        Line::from(Span::styled(
            format!("{}_", app.input),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(error) = &app.input_error {
        // First line of the error only; guidance lines don't fit here.
        let brief = error.lines().next().unwrap_or_default().to_owned();
        lines.push(Line::from(Span::styled(
            brief,
            Style::default().fg(ratatui::style::Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(styled_block("Participant"));
    frame.render_widget(paragraph, area);
}

fn draw_processing(frame: &mut Frame, value: u16, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(3)])
        .split(area);

    let caption = Paragraph::new(Span::styled(
        "Checking results...",
        Style::default()
            .fg(theme::PROCESSING_TEXT)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(caption, rows[0]);

    let gauge = Gauge::default()
        .block(styled_block(""))
        .gauge_style(Style::default().fg(theme::PROCESSING_BAR))
        .percent(value.min(100));
    frame.render_widget(gauge, rows[1]);
}

fn draw_feedback(frame: &mut Frame, text: &str, tone: FeedbackTone, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(theme::tone_color(tone))
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn draw_choices(frame: &mut Frame, app: &App, area: Rect) {
    if app.phase() == Phase::AwaitingParticipantId {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 6); 6])
        .split(area);

    for (i, (label, column)) in CHOICE_LABELS.iter().zip(columns.iter()).enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let option = i as u8;
        let is_selected = app.selected_choice == Some(option);

        let style = if is_selected {
            Style::default()
                .bg(theme::SELECTED_BG)
                .fg(theme::SELECTED_FG)
                .add_modifier(Modifier::BOLD)
        } else if app.choices_enabled {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::DISABLED)
        };

        let key_hint = format!("[{}]", i + 1);
        let paragraph = Paragraph::new(Line::from(*label))
            .style(style)
            .alignment(Alignment::Center)
            .block(styled_block(&key_hint));
        frame.render_widget(paragraph, *column);
    }
}

fn draw_remaining(frame: &mut Frame, app: &App, area: Rect) {
    if app.total == 0 {
        return;
    }

    #[allow(clippy::cast_precision_loss)]
    let ratio = (app.consumed as f64 / app.total as f64).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(styled_block("Progress"))
        .gauge_style(Style::default().fg(theme::REMAINING_BAR))
        .ratio(ratio)
        .label(format!("Trial {} of {}", app.consumed, app.total));
    frame.render_widget(gauge, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match app.phase() {
        Phase::AwaitingParticipantId => "Type the participant number, Enter to begin | Esc quit",
        Phase::AwaitingChoice => "Press 1-6 to rate your trust | Esc quit",
        Phase::Processing | Phase::ShowingFeedback => "Please wait...",
        Phase::Acknowledging => "Enter to continue",
        Phase::Finished => "Saving...",
    };
    let paragraph = Paragraph::new(hint).style(Style::default().fg(theme::DISABLED));
    frame.render_widget(paragraph, area);
}

fn draw_acknowledgment(frame: &mut Frame) {
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from("You have completed this task."),
        Line::from("Please let the researcher know you are ready for next steps."),
        Line::from(""),
        Line::from(Span::styled(
            "(Enter to continue)",
            Style::default().fg(theme::DISABLED),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(styled_block("Thank you!"));
    frame.render_widget(paragraph, area);
}

/// Center a `percent_x` by `percent_y` rectangle inside `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
