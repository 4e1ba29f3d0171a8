use crossterm::event::KeyCode;
use ml_core::{DataSource, IrisPredictor, Mode};
use ratatui::{widgets::Block, Frame};

use crate::state::{
    input::{Editor, Field, Inputs},
    model::ModelSummary,
    session::SessionState,
};
use crate::ui::{layout, theme::Theme, widgets};

use super::Action;

const SEPAL_FIELDS: [Field; 2] = [Field::SepalLength, Field::SepalWidth];
const PETAL_FIELDS: [Field; 2] = [Field::PetalLength, Field::PetalWidth];

/// Step of the arrow keys, in tenths.
const FINE_STEP: i32 = 1;
/// Step of PageUp / PageDown, in tenths.
const COARSE_STEP: i32 = 10;

/// The interactive form: four measurements, a mode, and the latest prediction.
pub struct PredictState {
    inputs: Inputs,
    mode: Mode,
    selected: Field,
    editor: Option<Editor>,
    hint: Option<String>,
    source: DataSource,
    summary: ModelSummary,
    session: SessionState,
}

impl PredictState {
    /// Creates the form with default inputs and runs the first prediction.
    pub fn new(source: DataSource, predictor: IrisPredictor) -> Self {
        let summary = ModelSummary::new(&source, &predictor);
        let mut state = Self {
            inputs: Inputs::default(),
            mode: Mode::default(),
            selected: Field::SepalLength,
            editor: None,
            hint: None,
            source,
            summary,
            session: SessionState::new(predictor),
        };
        state.session.refresh(&state.inputs, state.mode);
        state
    }
}

pub fn handle_key(state: &mut PredictState, key: KeyCode) -> Action {
    let action = if state.editor.is_some() {
        handle_editing(state, key);
        Action::None
    } else {
        handle_browsing(state, key)
    };

    state.session.refresh(&state.inputs, state.mode);
    action
}

fn handle_browsing(state: &mut PredictState, key: KeyCode) -> Action {
    state.hint = None;

    match key {
        KeyCode::Up | KeyCode::Char('k') => state.selected = state.selected.prev(),
        KeyCode::Down | KeyCode::Char('j') => state.selected = state.selected.next(),
        KeyCode::Left | KeyCode::Char('-') => state.inputs.step(state.selected, -FINE_STEP),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
            state.inputs.step(state.selected, FINE_STEP)
        }
        KeyCode::PageUp => state.inputs.step(state.selected, COARSE_STEP),
        KeyCode::PageDown => state.inputs.step(state.selected, -COARSE_STEP),
        KeyCode::Enter => state.editor = Some(Editor::default()),
        KeyCode::Tab | KeyCode::Char('m') => state.mode = state.mode.toggle(),
        KeyCode::Char('r') => state.inputs.reset(),
        KeyCode::Char('o') => open_source(&state.source),
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        _ => {}
    }

    Action::None
}

fn handle_editing(state: &mut PredictState, key: KeyCode) {
    let Some(editor) = state.editor.as_mut() else {
        return;
    };

    match key {
        KeyCode::Char(c) => editor.push(c),
        KeyCode::Backspace => editor.pop(),
        KeyCode::Esc => state.editor = None,
        KeyCode::Enter => {
            match editor.parse() {
                Ok(value) => state.inputs.set(state.selected, value),
                Err(hint) => {
                    state.hint = Some(format!(
                        "{hint}; keeping {:.1}",
                        state.inputs.get(state.selected)
                    ));
                }
            }
            state.editor = None;
        }
        _ => {}
    }
}

fn open_source(source: &DataSource) {
    let target = source.to_string();
    match open::that(&target) {
        Ok(()) => log::info!("opened {target}"),
        Err(e) => log::warn!("cannot open {target}: {e}"),
    }
}

pub fn draw(f: &mut Frame, state: &PredictState) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let show_details = state.mode == Mode::LogisticRegression;

    let (header_area, body_area, hints_area) = layout::vertical(area);
    let (main_area, sidebar_area) = layout::body(body_area);
    let (inputs_area, mode_area, result_area, details_area) =
        layout::main(main_area, show_details);
    let (sepal_area, petal_area) = layout::inputs(inputs_area);

    f.render_widget(widgets::header(), header_area);

    let editor = state.editor.as_ref();
    f.render_widget(
        widgets::input_column("Sepal", &SEPAL_FIELDS, &state.inputs, state.selected, editor),
        sepal_area,
    );
    f.render_widget(
        widgets::input_column("Petal", &PETAL_FIELDS, &state.inputs, state.selected, editor),
        petal_area,
    );

    f.render_widget(widgets::mode_selector(state.mode), mode_area);
    f.render_widget(
        widgets::result(state.session.outcome(), &state.summary, state.hint.as_deref()),
        result_area,
    );

    if let Some(details) = details_area {
        let (proba_area, coef_area) = layout::details(details);
        if let Some(probs) = state
            .session
            .prediction()
            .and_then(|p| p.probabilities.as_deref())
        {
            f.render_widget(widgets::probabilities(probs), proba_area);
        }
        f.render_widget(widgets::coefficients(&state.summary), coef_area);
    }

    f.render_widget(widgets::sidebar(&state.summary, state.mode), sidebar_area);

    let hints: &[(&str, &str)] = if state.editor.is_some() {
        &[("0-9 .", "type"), ("enter", "commit"), ("esc", "cancel")]
    } else {
        &[
            ("↑↓", "select"),
            ("←→", "±0.1"),
            ("pgup/pgdn", "±1.0"),
            ("enter", "type"),
            ("tab", "model"),
            ("r", "reset"),
            ("o", "source"),
            ("q", "quit"),
        ]
    };
    f.render_widget(widgets::hints(hints), hints_area);
}
