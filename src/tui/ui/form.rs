//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    bounds, Category, ChestPainType, ExerciseAngina, PatientRecord, RestingEcg, Sex, StSlope,
};
use crate::tui::styles::MedicalTheme;

/// Longest text a numeric field accepts.
const MAX_INPUT_LEN: usize = 6;

// Numeric field positions, in dataset column order.
const AGE: usize = 0;
const RESTING_BP: usize = 3;
const CHOLESTEROL: usize = 4;
const MAX_HR: usize = 7;
const OLDPEAK: usize = 9;

/// Value of a selector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Sex(Sex),
    ChestPain(ChestPainType),
    FastingBs(bool),
    RestingEcg(RestingEcg),
    ExerciseAngina(ExerciseAngina),
    StSlope(StSlope),
}

impl Choice {
    fn next(self) -> Self {
        match self {
            Self::Sex(v) => Self::Sex(v.next()),
            Self::ChestPain(v) => Self::ChestPain(v.next()),
            Self::FastingBs(v) => Self::FastingBs(!v),
            Self::RestingEcg(v) => Self::RestingEcg(v.next()),
            Self::ExerciseAngina(v) => Self::ExerciseAngina(v.next()),
            Self::StSlope(v) => Self::StSlope(v.next()),
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Sex(v) => Self::Sex(v.prev()),
            Self::ChestPain(v) => Self::ChestPain(v.prev()),
            Self::FastingBs(v) => Self::FastingBs(!v),
            Self::RestingEcg(v) => Self::RestingEcg(v.prev()),
            Self::ExerciseAngina(v) => Self::ExerciseAngina(v.prev()),
            Self::StSlope(v) => Self::StSlope(v.prev()),
        }
    }

    /// Label shown in the field box.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sex(v) => v.form_label(),
            Self::ChestPain(v) => v.label(),
            Self::FastingBs(true) => "1",
            Self::FastingBs(false) => "0",
            Self::RestingEcg(v) => v.label(),
            Self::ExerciseAngina(v) => v.label(),
            Self::StSlope(v) => v.label(),
        }
    }

    /// Every value this field can take, in form order.
    fn options(self) -> Vec<Self> {
        fn all<C: Category>(wrap: fn(C) -> Choice) -> Vec<Choice> {
            C::OPTIONS.iter().map(|option| wrap(*option)).collect()
        }

        match self {
            Self::Sex(_) => all(Choice::Sex),
            Self::ChestPain(_) => all(Choice::ChestPain),
            Self::FastingBs(_) => vec![Self::FastingBs(false), Self::FastingBs(true)],
            Self::RestingEcg(_) => all(Choice::RestingEcg),
            Self::ExerciseAngina(_) => all(Choice::ExerciseAngina),
            Self::StSlope(_) => all(Choice::StSlope),
        }
    }

    fn same_field(self, other: Self) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }

    /// Store this value in its column of `record`.
    fn apply(self, record: &mut PatientRecord) {
        match self {
            Self::Sex(v) => record.sex = v,
            Self::ChestPain(v) => record.chest_pain_type = v,
            Self::FastingBs(v) => record.fasting_bs = v,
            Self::RestingEcg(v) => record.resting_ecg = v,
            Self::ExerciseAngina(v) => record.exercise_angina = v,
            Self::StSlope(v) => record.st_slope = v,
        }
    }
}

/// How a field takes input.
#[derive(Debug, Clone)]
pub enum FieldInput {
    /// Typed number with bounds; `decimal` allows one `.`
    Number {
        value: String,
        default: &'static str,
        min: f64,
        max: f64,
        decimal: bool,
    },
    /// Fixed options cycled with ←/→
    Choice { value: Choice, default: Choice },
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub input: FieldInput,
}

impl FormField {
    fn integer(
        label: &'static str,
        default: &'static str,
        range: std::ops::RangeInclusive<u32>,
    ) -> Self {
        Self {
            label,
            input: FieldInput::Number {
                value: default.to_string(),
                default,
                min: f64::from(*range.start()),
                max: f64::from(*range.end()),
                decimal: false,
            },
        }
    }

    fn choice(label: &'static str, default: Choice) -> Self {
        Self {
            label,
            input: FieldInput::Choice {
                value: default,
                default,
            },
        }
    }

    /// Text shown in the field box.
    #[must_use]
    pub fn display_value(&self) -> String {
        match &self.input {
            FieldInput::Number { value, .. } => value.clone(),
            FieldInput::Choice { value, .. } => format!("◀ {} ▶", value.label()),
        }
    }

    /// Range or option hint.
    #[must_use]
    pub fn hint(&self) -> String {
        match &self.input {
            FieldInput::Number {
                min, max, decimal, ..
            } => {
                if *decimal {
                    format!("{min:.1}-{max:.1}, step 0.1")
                } else {
                    format!("{min}-{max}")
                }
            }
            FieldInput::Choice { value, .. } => value
                .options()
                .into_iter()
                .map(Choice::label)
                .collect::<Vec<_>>()
                .join(" / "),
        }
    }

    fn reset(&mut self) {
        match &mut self.input {
            FieldInput::Number { value, default, .. } => {
                value.zeroize();
                value.push_str(default);
            }
            FieldInput::Choice { value, default } => *value = *default,
        }
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::integer("Usia (tahun)", "40", bounds::AGE),
                FormField::choice("Jenis Kelamin", Choice::Sex(Sex::OPTIONS[0])),
                FormField::choice(
                    "Tipe Nyeri Dada",
                    Choice::ChestPain(ChestPainType::OPTIONS[0]),
                ),
                FormField::integer("Tekanan Darah Istirahat (mm Hg)", "120", bounds::RESTING_BP),
                FormField::integer("Kolesterol (mg/dl)", "200", bounds::CHOLESTEROL),
                FormField::choice("Fasting Blood Sugar > 120 mg/dl", Choice::FastingBs(false)),
                FormField::choice("Hasil ECG", Choice::RestingEcg(RestingEcg::OPTIONS[0])),
                FormField::integer("Denyut Jantung Maksimum", "150", bounds::MAX_HR),
                FormField::choice(
                    "Exercise Angina",
                    Choice::ExerciseAngina(ExerciseAngina::OPTIONS[0]),
                ),
                FormField {
                    label: "Oldpeak (ST depression)",
                    input: FieldInput::Number {
                        value: "0.0".to_string(),
                        default: "0.0",
                        min: *bounds::OLDPEAK.start(),
                        max: *bounds::OLDPEAK.end(),
                        decimal: true,
                    },
                },
                FormField::choice("ST Slope", Choice::StSlope(StSlope::OPTIONS[0])),
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl PatientFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Cycle the current choice field forward.
    pub fn next_option(&mut self) {
        if let FieldInput::Choice { value, .. } = &mut self.fields[self.selected_field].input {
            *value = value.next();
            self.error_message = None;
        }
    }

    /// Cycle the current choice field backward.
    pub fn prev_option(&mut self) {
        if let FieldInput::Choice { value, .. } = &mut self.fields[self.selected_field].input {
            *value = value.prev();
            self.error_message = None;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        if let FieldInput::Number { value, decimal, .. } =
            &mut self.fields[self.selected_field].input
        {
            let accepted = c.is_ascii_digit() || (*decimal && c == '.' && !value.contains('.'));
            if accepted && value.len() < MAX_INPUT_LEN {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let FieldInput::Number { value, .. } = &mut self.fields[self.selected_field].input {
            value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        if let FieldInput::Number { value, .. } = &mut self.fields[self.selected_field].input {
            value.zeroize();
        }
    }

    /// Wipe typed values and return every field to its default.
    ///
    /// Called right after a submission so the previous patient's values do
    /// not carry into the next one.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.reset();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    fn number(&self, idx: usize) -> Result<f64, String> {
        let field = &self.fields[idx];
        let FieldInput::Number {
            value, min, max, ..
        } = &field.input
        else {
            return Err(format!("{}: not a numeric field", field.label));
        };

        if value.is_empty() {
            return Err(format!("{}: value required", field.label));
        }
        let parsed: f64 = value
            .parse()
            .map_err(|_| format!("{}: Invalid number", field.label))?;
        if parsed < *min || parsed > *max {
            return Err(format!(
                "{}: Value must be between {} and {}",
                field.label, min, max
            ));
        }
        Ok(parsed)
    }

    fn integer(&self, idx: usize) -> Result<u32, String> {
        // Integer fields never accept '.', so the parsed value is whole.
        self.number(idx).map(|v| v as u32)
    }

    fn set_choice(&mut self, choice: Choice) {
        for field in self.fields.iter_mut() {
            if let FieldInput::Choice { value, .. } = &mut field.input {
                if value.same_field(choice) {
                    *value = choice;
                }
            }
        }
    }

    /// Validate and convert to a PatientRecord
    pub fn to_patient_record(&self) -> Result<PatientRecord, String> {
        let mut record = PatientRecord {
            age: self.integer(AGE)?,
            resting_bp: self.integer(RESTING_BP)?,
            cholesterol: self.integer(CHOLESTEROL)?,
            max_hr: self.integer(MAX_HR)?,
            oldpeak: self.number(OLDPEAK)?,
            ..PatientRecord::default()
        };
        for field in &self.fields {
            if let FieldInput::Choice { value, .. } = &field.input {
                value.apply(&mut record);
            }
        }

        record.validate().map_err(|errors| errors.join(", "))?;
        Ok(record)
    }

    /// Load sample data (typical high-risk presentation)
    pub fn load_sample_data(&mut self) {
        let numbers = [
            (AGE, "63"),
            (RESTING_BP, "145"),
            (CHOLESTEROL, "233"),
            (MAX_HR, "150"),
            (OLDPEAK, "2.3"),
        ];
        for (idx, sample) in numbers {
            if let FieldInput::Number { value, .. } = &mut self.fields[idx].input {
                value.zeroize();
                value.push_str(sample);
            }
        }

        for choice in [
            Choice::Sex(Sex::Male),
            Choice::ChestPain(ChestPainType::Asy),
            Choice::FastingBs(true),
            Choice::RestingEcg(RestingEcg::Normal),
            Choice::ExerciseAngina(ExerciseAngina::No),
            Choice::StSlope(StSlope::Flat),
        ] {
            self.set_choice(choice);
        }
        self.error_message = None;
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState, model_line: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], model_line);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, model_line: &str) {
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" ", MedicalTheme::text()),
            Span::styled("Prediksi Penyakit Jantung", MedicalTheme::title()),
            Span::styled(
                " │ Masukkan data pasien untuk memprediksi kemungkinan penyakit jantung",
                MedicalTheme::text_secondary(),
            ),
        ]),
        Line::from(Span::styled(format!(" {model_line}"), MedicalTheme::text_muted())),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = field.display_value();
        let mut spans = vec![Span::raw(" ")];
        if value.is_empty() {
            spans.push(Span::styled(field.hint(), MedicalTheme::text_muted()));
        } else {
            spans.push(Span::styled(value, MedicalTheme::text()));
            if matches!(field.input, FieldInput::Number { .. }) {
                spans.push(Span::styled(
                    format!("  ({})", field.hint()),
                    MedicalTheme::text_muted(),
                ));
            }
        }
        if is_selected {
            spans.push(Span::styled("▌", MedicalTheme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Choose ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Prediksi Sekarang ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
