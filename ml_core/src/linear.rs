use linfa::prelude::*;
use linfa_linear::{FittedLinearRegression, LinearRegression as Ols};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::MlError;

/// Ordinary least squares with an intercept, fit by `linfa-linear`.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    fitted: FittedLinearRegression<f64>,
}

impl LinearRegression {
    /// Fits the model on `x` (one row per sample) against `y`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` and `y` disagree on the number of samples,
    /// `MlError::InvalidInput` if there are no samples, and `MlError::Linear` if the
    /// least-squares problem cannot be solved.
    pub fn fit(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Self, MlError> {
        if x.nrows() != y.len() {
            return Err(MlError::ShapeMismatch {
                what: "targets",
                got: y.len(),
                expected: x.nrows(),
            });
        }
        if x.nrows() == 0 {
            return Err(MlError::InvalidInput("cannot fit on an empty dataset"));
        }

        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let fitted = Ols::new().with_intercept(true).fit(&dataset)?;

        Ok(Self { fitted })
    }

    pub fn coefficients(&self) -> ArrayView1<f64> {
        self.fitted.params().view()
    }

    pub fn intercept(&self) -> f64 {
        self.fitted.intercept()
    }

    /// Continuous output for a single feature row.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong number of features.
    pub fn predict(&self, x: ArrayView1<f64>) -> Result<f64, MlError> {
        let row = x.insert_axis(Axis(0));
        let out = self.predict_all(row)?;
        Ok(out[0])
    }

    /// Continuous outputs, one per row of `x`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong number of features.
    pub fn predict_all(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, MlError> {
        let expected = self.fitted.params().len();
        if x.ncols() != expected {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got: x.ncols(),
                expected,
            });
        }

        let out: Array1<f64> = self.fitted.predict(&x);
        Ok(out)
    }

    /// Coefficient of determination on `(x, y)`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` on mismatched inputs.
    pub fn r_squared(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<f64, MlError> {
        if x.nrows() != y.len() {
            return Err(MlError::ShapeMismatch {
                what: "targets",
                got: y.len(),
                expected: x.nrows(),
            });
        }

        let predicted = self.predict_all(x)?;
        let y_mean = y.mean().unwrap_or_default();
        let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
        let ss_res: f64 = y
            .iter()
            .zip(predicted.iter())
            .map(|(target, p)| (target - p).powi(2))
            .sum();

        Ok(if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::*;

    #[test]
    fn recovers_exact_plane() {
        // y = 1 + 2a - 3b
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [2.0, 3.0], [5.0, 1.0]];
        let y = x.map_axis(Axis(1), |r| 1.0 + 2.0 * r[0] - 3.0 * r[1]);

        let model = LinearRegression::fit(x.view(), y.view()).unwrap();
        assert!((model.intercept() - 1.0).abs() < 1e-8);
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-8);
        assert!((model.coefficients()[1] + 3.0).abs() < 1e-8);
        assert!((model.r_squared(x.view(), y.view()).unwrap() - 1.0).abs() < 1e-10);

        let p = model.predict(array![10.0, 10.0].view()).unwrap();
        assert!((p - -9.0).abs() < 1e-7);
    }

    #[test]
    fn batch_and_single_row_agree() {
        let x = array![[1.0, 0.5], [2.0, 1.5], [3.0, 1.0], [4.0, 3.0], [5.0, 2.0]];
        let y = array![1.2, 2.9, 3.1, 5.2, 5.8];
        let model = LinearRegression::fit(x.view(), y.view()).unwrap();

        let all = model.predict_all(x.view()).unwrap();
        for (row, expected) in x.rows().into_iter().zip(all.iter()) {
            assert!((model.predict(row).unwrap() - expected).abs() < 1e-12);
        }
        let r2 = model.r_squared(x.view(), y.view()).unwrap();
        assert!(r2 > 0.9 && r2 <= 1.0, "{r2}");
    }

    #[test]
    fn mismatched_targets_are_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        assert!(matches!(
            LinearRegression::fit(x.view(), y.view()),
            Err(MlError::ShapeMismatch { what: "targets", .. })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            LinearRegression::fit(x.view(), y.view()),
            Err(MlError::InvalidInput(_))
        ));
    }

    #[test]
    fn predict_checks_feature_count() {
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![0.0, 1.0, 2.0];
        let model = LinearRegression::fit(x.view(), y.view()).unwrap();
        assert!(matches!(
            model.predict(array![1.0, 2.0].view()),
            Err(MlError::ShapeMismatch { what: "features", .. })
        ));
    }
}
