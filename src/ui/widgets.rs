use ml_core::{capitalize, Mode, Prediction, FEATURE_NAMES};
use ratatui::{
    layout::{Alignment, Constraint},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::state::{
    input::{Editor, Field, Inputs},
    model::{ConfidenceLevel, ModelSummary},
    session::Outcome,
};

use super::theme::Theme;

pub const TITLE: &str = "Iris Flower Species Prediction";
pub const DESCRIPTION: &str = "This application uses a Linear Regression or a Logistic Regression \
     model to predict the species of an Iris flower based on its dimensions.";
pub const LOAD_WARNING: &str = "Dataset failed to load. Please check the data source.";

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(format!(" {title} "))
        .title_style(Theme::title())
}

pub fn header<'a>() -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(TITLE, Theme::title())),
        Line::from(Span::styled(DESCRIPTION, Theme::dim())),
    ])
    .block(Block::default().borders(Borders::BOTTOM).border_style(Theme::border()))
    .wrap(Wrap { trim: true })
}

/// One column of measurement fields.
///
/// # Args
/// * `editor` - Text being typed into `selected`, if any.
pub fn input_column<'a>(
    title: &'a str,
    fields: &[Field],
    inputs: &Inputs,
    selected: Field,
    editor: Option<&Editor>,
) -> Paragraph<'a> {
    let focused = fields.contains(&selected);

    let lines = fields
        .iter()
        .map(|&field| {
            let is_selected = field == selected;
            let (prefix, style) = if is_selected {
                ("▶ ", Theme::selected())
            } else {
                ("  ", Theme::dim())
            };

            let value = match editor {
                Some(ed) if is_selected => Span::styled(format!("{}█", ed.text()), Theme::key()),
                _ => Span::styled(format!("{:.1}", inputs.get(field)), Theme::text()),
            };

            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{:<20}", field.label()), style),
                value,
            ])
        })
        .collect::<Vec<_>>();

    let border = if focused {
        Theme::border_focus()
    } else {
        Theme::border()
    };

    Paragraph::new(lines).block(panel(title).border_style(border))
}

pub fn mode_selector<'a>(mode: Mode) -> Paragraph<'a> {
    let spans = Mode::ALL
        .iter()
        .flat_map(|&m| {
            let (marker, style) = if m == mode {
                ("(•) ", Theme::selected())
            } else {
                ("( ) ", Theme::dim())
            };
            [
                Span::styled(marker, style),
                Span::styled(m.name(), style),
                Span::raw("    "),
            ]
        })
        .collect::<Vec<_>>();

    Paragraph::new(Line::from(spans)).block(panel("Model"))
}

/// Result panel. A failed prediction renders an empty panel.
pub fn result<'a>(outcome: &Outcome, summary: &ModelSummary, hint: Option<&'a str>) -> Paragraph<'a> {
    let mut lines = match outcome {
        Outcome::Fresh(p) => prediction_lines(p, summary),
        Outcome::Stale => vec![Line::from(Span::styled(
            "Adjust the measurements to get a prediction.",
            Theme::muted(),
        ))],
        Outcome::Failed => Vec::new(),
    };

    if let Some(hint) = hint {
        lines.push(Line::from(Span::styled(hint, Theme::warn())));
    }

    Paragraph::new(lines)
        .block(panel("Prediction"))
        .wrap(Wrap { trim: true })
}

fn prediction_lines<'a>(p: &Prediction, summary: &ModelSummary) -> Vec<Line<'a>> {
    let percent = p.confidence_percent();
    let level = ConfidenceLevel::from_percent(percent);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Predicted species: ", Theme::dim()),
            Span::styled(p.display_species(), Theme::title()),
        ]),
        Line::from(vec![
            Span::styled("Confidence: ", Theme::dim()),
            Span::styled(format!("{percent:.2}%"), Theme::confidence(level)),
        ]),
    ];

    if let Some(iterations) = p.iterations {
        let status = if summary.logistic_converged {
            format!("Converged in {iterations} iterations")
        } else {
            format!("Stopped after {iterations} iterations without converging")
        };
        lines.push(Line::from(Span::styled(status, Theme::dim())));
    }

    lines
}

/// Per-class probability table of a logistic prediction.
pub fn probabilities<'a>(probabilities: &[(String, f64)]) -> Table<'a> {
    let header = Row::new(vec!["species", "probability"]).style(Theme::title());

    let rows = probabilities.iter().map(|(class, p)| {
        let level = ConfidenceLevel::from_percent(p * 100.0);
        Row::new(vec![
            Cell::from(capitalize(class)),
            Cell::from(format!("{:.2}%", p * 100.0)).style(Theme::confidence(level)),
        ])
    });

    Table::new(rows, [Constraint::Min(12), Constraint::Length(12)])
        .header(header)
        .block(panel("Probabilities"))
}

/// Fitted logistic coefficients, one row per class.
pub fn coefficients<'a>(summary: &ModelSummary) -> Table<'a> {
    let header = Row::new(
        std::iter::once("species")
            .chain(FEATURE_NAMES)
            .chain(std::iter::once("intercept"))
            .collect::<Vec<_>>(),
    )
    .style(Theme::title());

    let rows = summary.coefficients.iter().map(|row| {
        Row::new(
            std::iter::once(Cell::from(capitalize(&row.class)))
                .chain(row.weights.iter().map(|w| Cell::from(format!("{w:+.3}"))))
                .chain(std::iter::once(Cell::from(format!("{:+.3}", row.intercept))))
                .collect::<Vec<_>>(),
        )
    });

    Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(13),
            Constraint::Length(12),
            Constraint::Length(13),
            Constraint::Length(12),
            Constraint::Min(9),
        ],
    )
    .header(header)
    .block(panel("Coefficients"))
}

/// "Supervised learning model" sidebar.
pub fn sidebar<'a>(summary: &ModelSummary, mode: Mode) -> Paragraph<'a> {
    let solver = if summary.logistic_converged {
        format!("L-BFGS, converged in {} iterations", summary.logistic_iterations)
    } else {
        format!("L-BFGS, stopped at {} iterations", summary.logistic_iterations)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Algorithm: ", Theme::dim()),
            Span::styled(mode.name(), Theme::title()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Dataset", Theme::title())),
        Line::from(Span::styled(summary.source.clone(), Theme::muted())),
        Line::from(format!(
            "{} samples, {} classes",
            summary.samples,
            summary.classes.len()
        )),
        Line::from(Span::styled(
            summary
                .classes
                .iter()
                .map(|c| capitalize(c))
                .collect::<Vec<_>>()
                .join(", "),
            Theme::dim(),
        )),
        Line::from(""),
        Line::from(Span::styled("Training accuracy", Theme::title())),
        Line::from(format!(
            "{}: {:.2}%",
            Mode::LinearRegression.name(),
            summary.linear_accuracy * 100.0
        )),
        Line::from(format!(
            "{}: {:.2}%",
            Mode::LogisticRegression.name(),
            summary.logistic_accuracy * 100.0
        )),
        Line::from(format!("Regressor R²: {:.4}", summary.linear_r_squared)),
        Line::from(""),
        Line::from(Span::styled(solver, Theme::dim())),
    ];

    Paragraph::new(lines)
        .block(panel("Supervised learning model"))
        .wrap(Wrap { trim: false })
}

/// Single-line key legend.
pub fn hints<'a>(hints: &[(&'a str, &'a str)]) -> Paragraph<'a> {
    let spans = hints
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(*key, Theme::key()),
                Span::styled(format!(" {action}   "), Theme::muted()),
            ]
        })
        .collect::<Vec<_>>();

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

pub fn loading<'a>(source: &str) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(TITLE, Theme::title())),
        Line::from(""),
        Line::from(Span::styled(format!("Loading dataset from {source}"), Theme::dim())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
}

/// Replaces the whole interactive surface when the dataset is unusable.
pub fn load_failure<'a>(error: &str) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(format!("Error loading dataset: {error}"), Theme::error())),
        Line::from(""),
        Line::from(Span::styled(LOAD_WARNING, Theme::warn())),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::error())
            .title(" Dataset ")
            .title_style(Theme::error()),
    )
    .wrap(Wrap { trim: true })
}
