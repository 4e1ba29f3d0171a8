use ml_core::{DataSource, IrisPredictor, Mode};

/// Colour bucket of a confidence percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    /// 80% and above.
    High,
    /// From 50% up to, not including, 80%.
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            Self::High
        } else if percent >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Per-class row of the coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientRow {
    pub class: String,
    pub weights: [f64; 4],
    pub intercept: f64,
}

/// What the sidebar knows about the fitted models. Built once after fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub source: String,
    pub samples: usize,
    pub classes: Vec<String>,
    pub linear_accuracy: f64,
    pub linear_r_squared: f64,
    pub logistic_accuracy: f64,
    pub logistic_iterations: usize,
    pub logistic_converged: bool,
    pub coefficients: Vec<CoefficientRow>,
}

impl ModelSummary {
    pub fn new(source: &DataSource, predictor: &IrisPredictor) -> Self {
        let logistic = predictor.logistic();
        let coefficients = predictor
            .classes()
            .iter()
            .zip(logistic.coefficients().rows())
            .zip(logistic.intercepts().iter())
            .map(|((class, row), &intercept)| {
                let mut weights = [0.0; 4];
                for (w, v) in weights.iter_mut().zip(row.iter()) {
                    *w = *v;
                }
                CoefficientRow {
                    class: class.clone(),
                    weights,
                    intercept,
                }
            })
            .collect();

        Self {
            source: source.to_string(),
            samples: predictor.samples(),
            classes: predictor.classes().to_vec(),
            linear_accuracy: predictor.training_accuracy(Mode::LinearRegression),
            linear_r_squared: predictor.linear_r_squared(),
            logistic_accuracy: predictor.training_accuracy(Mode::LogisticRegression),
            logistic_iterations: logistic.stats().iterations(),
            logistic_converged: logistic.stats().converged(),
            coefficients,
        }
    }
}
