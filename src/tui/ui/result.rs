//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Outcome, PredictionResult};
use crate::tui::styles::MedicalTheme;

/// Result screen state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResultState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Prediction finished
    Complete { result: PredictionResult },
    /// Pipeline failed after the form was accepted
    Error { message: String },
}

/// Render the prediction result
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Idle => render_idle(f, chunks[1]),
        ResultState::Complete { result } => render_prediction(f, chunks[1], result),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }
    render_result_footer(f, chunks[2]);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Hasil Prediksi", MedicalTheme::title()),
        Span::styled(" │ Random Forest Classifier", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(Line::from(Span::styled(
        "Belum ada prediksi",
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_prediction(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let outcome = result.outcome();
    let style = MedicalTheme::outcome(outcome);

    let block = Block::default()
        .title(Span::styled(" Prediction Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(style);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Message
            Constraint::Length(4), // Probability
            Constraint::Length(2), // Confidence
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let icon = match outcome {
        Outcome::Positive => "!",
        Outcome::Negative => "OK",
    };

    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{icon} {}", result.message()),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            outcome.description(),
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Probabilitas Penyakit Jantung ",
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(style)
        .ratio(result.probability.clamp(0.0, 1.0))
        .label(format!("{:.2}", result.probability));
    f.render_widget(gauge, chunks[1]);

    let confidence = Paragraph::new(Line::from(vec![
        Span::styled("Confidence: ", MedicalTheme::text_secondary()),
        Span::styled(
            format!("{:.1}%", result.confidence() * 100.0),
            MedicalTheme::text(),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(confidence, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("New Prediction ", MedicalTheme::key_desc()),
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
