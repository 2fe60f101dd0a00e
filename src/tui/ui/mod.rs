//! UI module: View components for the TUI.

pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

/// Caption shown under every screen.
pub const MODEL_CAPTION: &str =
    "Model ini menggunakan Random Forest Classifier yang telah dilatih pada data penyakit jantung.";

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(MODEL_CAPTION, MedicalTheme::text_muted())]),
        Line::from(vec![Span::styled(
            "DISCLAIMER: Hasil ini bersifat indikatif dan tidak menggantikan evaluasi medis profesional.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
