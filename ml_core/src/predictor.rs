use std::fmt;

use ndarray::{Array1, ArrayView1};

use crate::{
    logistic::argmax, IrisDataset, LabelEncoder, LinearRegression, LogisticParams,
    LogisticRegression, Measurements, MlError,
};

/// The two ways a species can be predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Least squares on the encoded labels, rounded to the nearest class.
    #[default]
    LinearRegression,
    /// Softmax classifier with per-class probabilities.
    LogisticRegression,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::LinearRegression, Mode::LogisticRegression];

    /// Label shown in the mode selector.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::LinearRegression => "Linear Regression",
            Mode::LogisticRegression => "Logistic Regression",
        }
    }

    /// The other mode.
    pub fn toggle(self) -> Self {
        match self {
            Mode::LinearRegression => Mode::LogisticRegression,
            Mode::LogisticRegression => Mode::LinearRegression,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Species label exactly as it appears in the dataset.
    pub species: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Per-class probabilities in class order; only set by the logistic model.
    pub probabilities: Option<Vec<(String, f64)>>,
    /// Solver iterations; only set by the logistic model.
    pub iterations: Option<usize>,
}

impl Prediction {
    /// Species name with the first letter upper-cased and the rest lower-cased.
    pub fn display_species(&self) -> String {
        capitalize(&self.species)
    }

    /// Confidence as a percentage.
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Both models fit once on the iris table, plus the encoder they share.
#[derive(Debug, Clone)]
pub struct IrisPredictor {
    encoder: LabelEncoder,
    linear: LinearRegression,
    logistic: LogisticRegression,
    samples: usize,
    linear_r_squared: f64,
    linear_accuracy: f64,
    logistic_accuracy: f64,
}

impl IrisPredictor {
    /// Encodes the species column and fits both models on the full table.
    ///
    /// # Errors
    /// Returns `MlError` if either model cannot be fit (e.g. a single class,
    /// or linearly dependent features).
    pub fn fit(dataset: &IrisDataset, params: &LogisticParams) -> Result<Self, MlError> {
        let encoder = LabelEncoder::fit(dataset.species())?;
        let labels = encoder.transform_all(dataset.species())?;
        let x = dataset.features();
        let targets: Array1<f64> = labels.iter().map(|&c| c as f64).collect();

        let linear = LinearRegression::fit(x.view(), targets.view())?;
        let linear_r_squared = linear.r_squared(x.view(), targets.view())?;
        log::info!(
            "linear regression fit on {} samples (r² {:.4})",
            dataset.len(),
            linear_r_squared
        );

        let logistic = LogisticRegression::fit(x.view(), &labels, encoder.len(), params)?;

        let mut linear_hits = 0usize;
        let mut logistic_hits = 0usize;
        for (row, &label) in x.rows().into_iter().zip(&labels) {
            let raw = linear.predict(row)?;
            if raw.round_ties_even() == label as f64 {
                linear_hits += 1;
            }
            if logistic.predict(row)? == label {
                logistic_hits += 1;
            }
        }

        let n = dataset.len() as f64;
        let predictor = Self {
            encoder,
            linear,
            logistic,
            samples: dataset.len(),
            linear_r_squared,
            linear_accuracy: linear_hits as f64 / n,
            logistic_accuracy: logistic_hits as f64 / n,
        };

        log::info!(
            "training accuracy: linear {:.3}, logistic {:.3}",
            predictor.linear_accuracy,
            predictor.logistic_accuracy
        );

        Ok(predictor)
    }

    /// Predicts the species of `measurements` with the model selected by `mode`.
    ///
    /// # Errors
    /// Returns `MlError::InvalidInput` for non-finite measurements and
    /// `MlError::UnknownLabel` when the rounded regression output is not a class.
    pub fn predict(&self, mode: Mode, measurements: &Measurements) -> Result<Prediction, MlError> {
        let features = measurements.features();
        if features.iter().any(|v| !v.is_finite()) {
            return Err(MlError::InvalidInput("measurements must be finite"));
        }

        let prediction = match mode {
            Mode::LinearRegression => self.predict_linear(features.view())?,
            Mode::LogisticRegression => self.predict_logistic(features.view())?,
        };

        log::debug!(
            "{mode} predicted {} ({:.1}%) for {:?}",
            prediction.species,
            prediction.confidence_percent(),
            measurements.to_array()
        );

        Ok(prediction)
    }

    fn predict_linear(&self, features: ArrayView1<f64>) -> Result<Prediction, MlError> {
        let raw = self.linear.predict(features)?;
        let rounded = raw.round_ties_even();
        // saturating cast: anything far off lands outside the class range
        let species = self.encoder.inverse(rounded as i64)?;

        Ok(Prediction {
            species: species.to_string(),
            confidence: 1.0 - (raw - rounded).abs(),
            probabilities: None,
            iterations: None,
        })
    }

    fn predict_logistic(&self, features: ArrayView1<f64>) -> Result<Prediction, MlError> {
        let probs = self.logistic.predict_proba(features)?;
        let best = argmax(probs.view());
        let species = self.encoder.inverse(best as i64)?;

        let probabilities = self
            .encoder
            .classes()
            .iter()
            .cloned()
            .zip(probs.iter().copied())
            .collect();

        Ok(Prediction {
            species: species.to_string(),
            confidence: probs[best],
            probabilities: Some(probabilities),
            iterations: Some(self.logistic.stats().iterations()),
        })
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Class labels in encoded order.
    pub fn classes(&self) -> &[String] {
        self.encoder.classes()
    }

    pub fn linear(&self) -> &LinearRegression {
        &self.linear
    }

    pub fn logistic(&self) -> &LogisticRegression {
        &self.logistic
    }

    /// Number of samples both models were fit on.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn linear_r_squared(&self) -> f64 {
        self.linear_r_squared
    }

    /// Share of training rows whose species the model recovers, per mode.
    pub fn training_accuracy(&self, mode: Mode) -> f64 {
        match mode {
            Mode::LinearRegression => self.linear_accuracy,
            Mode::LogisticRegression => self.logistic_accuracy,
        }
    }
}
