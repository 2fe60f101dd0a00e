//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation between the form and the result
//! - Input event handling
//! - Synchronous prediction on submit

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::forest::RandomForest;
use crate::adapters::scaler::FittedScaler;
use crate::adapters::ModelArtifacts;
use crate::application::PredictionService;
use crate::config::AppConfig;

use super::ui::{
    form::{render_patient_form, PatientFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Loaded model summary shown in the form header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub trees: usize,
    pub scaler_kind: &'static str,
    pub fingerprint: String,
    pub encoder_warnings: usize,
}

impl ModelInfo {
    #[must_use]
    pub fn from_artifacts(artifacts: &ModelArtifacts) -> Self {
        Self {
            trees: artifacts.classifier.n_estimators(),
            scaler_kind: artifacts.scaler.kind(),
            fingerprint: artifacts.fingerprints.short_model().to_string(),
            encoder_warnings: artifacts.encoder_warnings.len(),
        }
    }

    fn summary(&self) -> String {
        let mut line = format!(
            "Model: {} trees │ scaler: {} │ sha256: {}",
            self.trees, self.scaler_kind, self.fingerprint
        );
        if self.encoder_warnings > 0 {
            line.push_str(&format!(
                " │ {} encoder warning(s), see log",
                self.encoder_warnings
            ));
        }
        line
    }
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Prediction pipeline over the loaded artifacts
    service: PredictionService<FittedScaler, RandomForest>,

    /// Model summary for the header
    model_info: ModelInfo,

    /// Patient form state
    form_state: PatientFormState,

    /// Result state
    result_state: ResultState,
}

impl App {
    /// Load the artifacts named by `config` and build the application.
    ///
    /// Nothing is drawn until every artifact has loaded.
    ///
    /// # Errors
    /// Returns error if any artifact is missing or unusable.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let artifacts = ModelArtifacts::load(&config.model_dir, config.load_options())
            .with_context(|| {
                format!(
                    "File model, scaler, atau encoder tidak ditemukan atau tidak valid di {}",
                    config.model_dir.display()
                )
            })?;

        let model_info = ModelInfo::from_artifacts(&artifacts);
        let service = PredictionService::from_artifacts(artifacts);

        Ok(Self::with_dependencies(service, model_info))
    }

    /// Create application with injected dependencies.
    ///
    /// Lets `main.rs` or tests construct the service externally.
    #[must_use]
    pub fn with_dependencies(
        service: PredictionService<FittedScaler, RandomForest>,
        model_info: ModelInfo,
    ) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            service,
            model_info,
            form_state: PatientFormState::default(),
            result_state: ResultState::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let model_line = self.model_info.summary();

        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Form => {
                        render_patient_form(f, chunks[0], &self.form_state, &model_line);
                    }
                    Screen::Result => render_result(f, chunks[0], &self.result_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
            }
            KeyCode::Left => {
                self.form_state.prev_option();
            }
            KeyCode::Right => {
                self.form_state.next_option();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.form_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.form_state.delete_char();
            }
            KeyCode::Delete => {
                self.form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form_state = PatientFormState::default();
                self.result_state = ResultState::Idle;
                self.screen = Screen::Form;
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let record = match self.form_state.to_patient_record() {
            Ok(record) => record,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        tracing::debug!("Form submitted");
        self.result_state = match self.service.predict(&record) {
            Ok(prediction) => ResultState::Complete {
                result: prediction.result,
            },
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                ResultState::Error {
                    message: e.to_string(),
                }
            }
        };
        self.screen = Screen::Result;

        // Clear typed values from the UI immediately.
        self.form_state.clear_sensitive();
    }
}
