use ml_core::{IrisPredictor, Mode, Prediction};

use super::input::Inputs;

/// Result slot of the current session.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing predicted yet for the current inputs.
    Stale,
    Fresh(Prediction),
    /// The last prediction failed; nothing is shown.
    Failed,
}

/// Caches the last `(inputs, mode)` pair and its prediction.
///
/// Prediction only runs when the pair changes, so redrawing or pressing a key
/// that changes nothing does not hit the models again.
#[derive(Debug)]
pub struct SessionState {
    predictor: IrisPredictor,
    key: Option<(Inputs, Mode)>,
    outcome: Outcome,
    runs: usize,
}

impl SessionState {
    /// Creates a new `SessionState` in the stale state.
    ///
    /// # Args
    /// * `predictor` - The models fit at startup.
    pub fn new(predictor: IrisPredictor) -> Self {
        Self {
            predictor,
            key: None,
            outcome: Outcome::Stale,
            runs: 0,
        }
    }

    /// Re-runs the selected model if `(inputs, mode)` differs from the cached pair.
    ///
    /// # Returns
    /// `true` if a prediction was attempted.
    pub fn refresh(&mut self, inputs: &Inputs, mode: Mode) -> bool {
        let key = (*inputs, mode);
        if self.key == Some(key) {
            return false;
        }

        self.key = Some(key);
        self.runs += 1;
        log::debug!("prediction run #{} ({mode})", self.runs);

        self.outcome = match self.predictor.predict(mode, &inputs.measurements()) {
            Ok(prediction) => Outcome::Fresh(prediction),
            Err(e) => {
                log::warn!(
                    "{mode} prediction failed for {:?}: {e}",
                    inputs.measurements().to_array()
                );
                Outcome::Failed
            }
        };

        true
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Prediction for the cached pair, if the last run succeeded.
    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.outcome {
            Outcome::Fresh(p) => Some(p),
            _ => None,
        }
    }

    /// Number of predictions attempted so far.
    #[cfg(test)]
    pub fn runs(&self) -> usize {
        self.runs
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use ml_core::{IrisDataset, LogisticParams, Measurements, Sample};

    use super::*;
    use crate::state::input::Field;

    const TOY: [([f64; 4], &str); 12] = [
        ([5.0, 3.4, 1.5, 0.2], "setosa"),
        ([4.8, 3.1, 1.4, 0.1], "setosa"),
        ([5.3, 3.7, 1.6, 0.3], "setosa"),
        ([4.6, 3.2, 1.2, 0.2], "setosa"),
        ([6.0, 2.8, 4.4, 1.3], "versicolor"),
        ([5.7, 2.6, 4.0, 1.2], "versicolor"),
        ([6.3, 2.9, 4.7, 1.5], "versicolor"),
        ([5.5, 2.5, 4.1, 1.3], "versicolor"),
        ([6.7, 3.0, 5.8, 2.2], "virginica"),
        ([7.1, 3.1, 6.1, 2.0], "virginica"),
        ([6.4, 2.8, 5.5, 2.1], "virginica"),
        ([6.9, 3.2, 5.9, 2.3], "virginica"),
    ];

    /// Both models fit on a small, well separated sample of the iris table.
    pub(crate) fn toy_predictor() -> IrisPredictor {
        let samples = TOY
            .iter()
            .map(|(m, s)| Sample {
                measurements: Measurements::from(*m),
                species: s.to_string(),
            })
            .collect();
        let dataset = IrisDataset::from_samples(samples).unwrap();
        IrisPredictor::fit(&dataset, &LogisticParams::default()).unwrap()
    }

    #[test]
    fn starts_stale() {
        let session = SessionState::new(toy_predictor());
        assert_eq!(session.outcome(), &Outcome::Stale);
        assert_eq!(session.runs(), 0);
    }

    #[test]
    fn unchanged_pass_does_not_predict_again() {
        let mut session = SessionState::new(toy_predictor());
        let inputs = Inputs::default();

        assert!(session.refresh(&inputs, Mode::LinearRegression));
        assert!(!session.refresh(&inputs, Mode::LinearRegression));
        assert_eq!(session.runs(), 1);
        assert!(session.prediction().is_some());
    }

    #[test]
    fn changing_any_input_triggers_prediction() {
        let mut session = SessionState::new(toy_predictor());
        let mut inputs = Inputs::default();
        session.refresh(&inputs, Mode::LogisticRegression);

        for field in Field::ALL {
            inputs.step(field, 1);
            assert!(session.refresh(&inputs, Mode::LogisticRegression), "{field:?}");
        }
        assert_eq!(session.runs(), 5);
    }

    #[test]
    fn switching_mode_reruns_with_the_other_model() {
        let mut session = SessionState::new(toy_predictor());
        let inputs = Inputs::default();

        session.refresh(&inputs, Mode::LinearRegression);
        assert!(session.prediction().unwrap().probabilities.is_none());

        assert!(session.refresh(&inputs, Mode::LogisticRegression));
        assert!(session.prediction().unwrap().probabilities.is_some());
    }

    #[test]
    fn failure_clears_the_result_and_recovers() {
        let mut session = SessionState::new(toy_predictor());
        let mut far = Inputs::default();
        far.set(Field::SepalLength, 0.0);
        far.set(Field::SepalWidth, 0.0);
        far.set(Field::PetalLength, 10.0);
        far.set(Field::PetalWidth, 10.0);

        session.refresh(&Inputs::default(), Mode::LinearRegression);
        assert!(session.prediction().is_some());

        assert!(session.refresh(&far, Mode::LinearRegression));
        assert_eq!(session.outcome(), &Outcome::Failed);
        assert!(session.prediction().is_none());

        session.refresh(&far, Mode::LogisticRegression);
        assert!(matches!(session.outcome(), Outcome::Fresh(_)));
    }
}
