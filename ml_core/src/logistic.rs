use argmin::{
    core::{CostFunction, Executor, Gradient, State, TerminationReason},
    solver::{linesearch::MoreThuenteLineSearch, quasinewton::LBFGS},
};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

use crate::{FitStats, MlError};

/// Number of correction pairs kept by L-BFGS.
const LBFGS_MEMORY: usize = 10;

type Lbfgs = LBFGS<MoreThuenteLineSearch<Array1<f64>, Array1<f64>, f64>, Array1<f64>, Array1<f64>, f64>;

/// Hyperparameters of [`LogisticRegression`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    /// Inverse of the L2 regularization strength. Smaller is stronger.
    pub c: f64,
    /// Iteration cap of the solver.
    pub max_iter: usize,
    /// Gradient tolerance at which the solver stops.
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 500,
            tol: 1e-4,
        }
    }
}

impl LogisticParams {
    fn validate(&self) -> Result<(), MlError> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(MlError::InvalidInput("c must be a positive number"));
        }
        if self.max_iter == 0 {
            return Err(MlError::InvalidInput("max_iter must be at least 1"));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(MlError::InvalidInput("tol must be a positive number"));
        }
        Ok(())
    }
}

/// Mean cross-entropy plus `||W||² / (2·c·n)` over a flat parameter vector.
///
/// The vector holds the `k × d` coefficients row by row, then the `k` intercepts.
struct CrossEntropy<'a> {
    x: ArrayView2<'a, f64>,
    y: &'a [usize],
    one_hot: Array2<f64>,
    classes: usize,
    reg: f64,
}

impl<'a> CrossEntropy<'a> {
    fn new(x: ArrayView2<'a, f64>, y: &'a [usize], classes: usize, c: f64) -> Self {
        let n = x.nrows();
        let mut one_hot = Array2::<f64>::zeros((n, classes));
        for (i, &class) in y.iter().enumerate() {
            one_hot[[i, class]] = 1.0;
        }

        Self {
            x,
            y,
            one_hot,
            classes,
            reg: 1.0 / (c * n as f64),
        }
    }

    fn evaluate(&self, theta: &Array1<f64>) -> (f64, Array1<f64>) {
        let (w, b) = unpack(theta, self.classes, self.x.ncols());
        let inv_n = 1.0 / self.x.nrows() as f64;

        let logits = self.x.dot(&w.t()) + &b;
        let mut probs = Array2::<f64>::zeros(logits.raw_dim());
        let mut loss = 0.0;

        for ((z, mut p), &target) in logits.rows().into_iter().zip(probs.rows_mut()).zip(self.y) {
            let lse = log_sum_exp(z);
            loss -= z[target] - lse;
            Zip::from(&mut p).and(&z).for_each(|p, &z| *p = (z - lse).exp());
        }

        let residual = (probs - &self.one_hot) * inv_n;
        let grad_w = residual.t().dot(&self.x) + &w * self.reg;
        let grad_b = residual.sum_axis(Axis(0));

        let value = loss * inv_n + 0.5 * self.reg * w.iter().map(|v| v * v).sum::<f64>();
        let grad = grad_w.iter().chain(grad_b.iter()).copied().collect();

        (value, grad)
    }
}

/// Splits a flat parameter vector into `k × d` coefficients and `k` intercepts.
fn unpack(theta: &Array1<f64>, k: usize, d: usize) -> (Array2<f64>, Array1<f64>) {
    let w = Array2::from_shape_fn((k, d), |(c, j)| theta[c * d + j]);
    let b = theta.slice(s![k * d..]).to_owned();
    (w, b)
}

impl CostFunction for CrossEntropy<'_> {
    type Param = Array1<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.evaluate(theta).0)
    }
}

impl Gradient for CrossEntropy<'_> {
    type Param = Array1<f64>;
    type Gradient = Array1<f64>;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        Ok(self.evaluate(theta).1)
    }
}

/// Multinomial logistic regression with an L2 penalty on the coefficients.
///
/// Minimizes the mean cross-entropy plus `||W||² / (2·c·n)` with `argmin`'s L-BFGS;
/// intercepts are not penalized.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// One row per class.
    coefficients: Array2<f64>,
    intercepts: Array1<f64>,
    stats: FitStats,
}

impl LogisticRegression {
    /// Fits the model on `x` (one row per sample) against class indices `y`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` and `y` disagree on the number of samples,
    /// `MlError::InvalidInput` for empty data, fewer than two classes, a class index
    /// out of range, or invalid `params`, and `MlError::Solver` if L-BFGS aborts.
    pub fn fit<'a>(
        x: ArrayView2<'a, f64>,
        y: &'a [usize],
        n_classes: usize,
        params: &LogisticParams,
    ) -> Result<Self, MlError> {
        params.validate()?;

        let (n, d) = x.dim();
        if y.len() != n {
            return Err(MlError::ShapeMismatch {
                what: "targets",
                got: y.len(),
                expected: n,
            });
        }
        if n == 0 {
            return Err(MlError::InvalidInput("cannot fit on an empty dataset"));
        }
        if n_classes < 2 {
            return Err(MlError::InvalidInput("need at least two classes"));
        }
        if y.iter().any(|&c| c >= n_classes) {
            return Err(MlError::InvalidInput("class index out of range"));
        }

        let problem = CrossEntropy::new(x, y, n_classes, params.c);
        let init = Array1::<f64>::zeros(n_classes * d + n_classes);

        let linesearch: MoreThuenteLineSearch<Array1<f64>, Array1<f64>, f64> =
            MoreThuenteLineSearch::new();
        let solver: Lbfgs = LBFGS::new(linesearch, LBFGS_MEMORY).with_tolerance_grad(params.tol)?;

        let result = Executor::new(problem, solver)
            .configure(|state| state.param(init).max_iters(params.max_iter as u64))
            .run()?;

        let state = result.state();
        let iterations = state.get_iter() as usize;
        let converged = matches!(
            state.get_termination_reason(),
            Some(TerminationReason::SolverConverged)
        );
        let theta = state
            .get_best_param()
            .cloned()
            .ok_or_else(|| MlError::Solver("no parameters after the last iteration".to_string()))?;

        if converged {
            log::info!(
                "logistic regression converged after {iterations} iterations (loss {:.6})",
                state.get_best_cost()
            );
        } else {
            log::warn!(
                "logistic regression stopped after {iterations} iterations without converging (loss {:.6})",
                state.get_best_cost()
            );
        }

        let (coefficients, intercepts) = unpack(&theta, n_classes, d);

        Ok(Self {
            coefficients,
            intercepts,
            stats: FitStats::new(iterations, converged),
        })
    }

    /// Coefficients, one row per class.
    pub fn coefficients(&self) -> ArrayView2<f64> {
        self.coefficients.view()
    }

    pub fn intercepts(&self) -> ArrayView1<f64> {
        self.intercepts.view()
    }

    pub fn stats(&self) -> FitStats {
        self.stats
    }

    pub fn n_classes(&self) -> usize {
        self.intercepts.len()
    }

    /// Softmax probabilities over all classes for a single feature row.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong number of features.
    pub fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, MlError> {
        if x.len() != self.coefficients.ncols() {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got: x.len(),
                expected: self.coefficients.ncols(),
            });
        }

        let logits = self.coefficients.dot(&x) + &self.intercepts;
        let lse = log_sum_exp(logits.view());
        Ok(logits.mapv(|z| (z - lse).exp()))
    }

    /// Most probable class for a single feature row.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong number of features.
    pub fn predict(&self, x: ArrayView1<f64>) -> Result<usize, MlError> {
        let probs = self.predict_proba(x)?;
        Ok(argmax(probs.view()))
    }
}

/// Index of the largest entry; the first one wins ties.
pub(crate) fn argmax(v: ArrayView1<f64>) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, max), (i, &p)| {
            if p > max { (i, p) } else { (best, max) }
        })
        .0
}

fn log_sum_exp(z: ArrayView1<f64>) -> f64 {
    let max = z.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    if !max.is_finite() {
        return max;
    }
    max + z.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn blobs() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.0, 0.0],
            [0.5, 0.2],
            [0.2, 0.6],
            [5.0, 0.0],
            [5.5, 0.4],
            [4.8, 0.3],
            [0.0, 5.0],
            [0.3, 5.6],
            [0.6, 4.7],
        ];
        let y = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
        (x, y)
    }

    #[test]
    fn separates_three_blobs() {
        let (x, y) = blobs();
        let model = LogisticRegression::fit(x.view(), &y, 3, &LogisticParams::default()).unwrap();

        for (row, &target) in x.rows().into_iter().zip(&y) {
            assert_eq!(model.predict(row).unwrap(), target);
        }
        assert_eq!(model.n_classes(), 3);
        assert_eq!(model.coefficients().dim(), (3, 2));
        assert!(model.stats().converged());
        assert!(model.stats().iterations() > 0);
    }

    #[test]
    fn converged_fit_sits_at_a_stationary_point() {
        let (x, y) = blobs();
        let params = LogisticParams::default();
        let model = LogisticRegression::fit(x.view(), &y, 3, &params).unwrap();

        let theta = model
            .coefficients()
            .iter()
            .chain(model.intercepts().iter())
            .copied()
            .collect::<Array1<f64>>();
        let (_, grad) = CrossEntropy::new(x.view(), &y, 3, params.c).evaluate(&theta);
        let norm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
        assert!(norm < 1e-3, "{norm}");
    }

    #[test]
    fn probabilities_are_a_distribution() {
        let (x, y) = blobs();
        let model = LogisticRegression::fit(x.view(), &y, 3, &LogisticParams::default()).unwrap();

        for point in [array![2.5, 2.5], array![100.0, -40.0], array![0.0, 0.0]] {
            let p = model.predict_proba(point.view()).unwrap();
            assert!((p.sum() - 1.0).abs() < 1e-9, "{p}");
            assert!(p.iter().all(|v| (0.0..=1.0).contains(v)), "{p}");
        }
    }

    #[test]
    fn stronger_penalty_shrinks_coefficients() {
        let (x, y) = blobs();
        let loose = LogisticRegression::fit(x.view(), &y, 3, &LogisticParams::default()).unwrap();
        let tight = LogisticRegression::fit(
            x.view(),
            &y,
            3,
            &LogisticParams {
                c: 0.01,
                ..Default::default()
            },
        )
        .unwrap();

        let norm = |m: &LogisticRegression| m.coefficients().iter().map(|v| v * v).sum::<f64>();
        assert!(norm(&tight) < norm(&loose));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let (x, y) = blobs();
        let params = LogisticParams {
            max_iter: 2,
            tol: 1e-12,
            ..Default::default()
        };
        let model = LogisticRegression::fit(x.view(), &y, 3, &params).unwrap();

        assert!(!model.stats().converged());
        assert_eq!(model.stats().iterations(), 2);
    }

    #[test]
    fn rejects_bad_inputs() {
        let (x, y) = blobs();
        let params = LogisticParams::default();

        assert!(LogisticRegression::fit(x.view(), &y[..4], 3, &params).is_err());
        assert!(LogisticRegression::fit(x.view(), &y, 1, &params).is_err());
        assert!(LogisticRegression::fit(x.view(), &y, 2, &params).is_err());

        let bad_c = LogisticParams { c: 0.0, ..params };
        assert!(LogisticRegression::fit(x.view(), &y, 3, &bad_c).is_err());
    }

    #[test]
    fn predict_checks_feature_count() {
        let (x, y) = blobs();
        let model = LogisticRegression::fit(x.view(), &y, 3, &LogisticParams::default()).unwrap();
        assert!(model.predict_proba(array![1.0].view()).is_err());
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(array![0.2, 0.4, 0.4].view()), 1);
        assert_eq!(argmax(array![0.9, 0.05, 0.05].view()), 0);
    }

    #[test]
    fn log_sum_exp_is_stable_for_large_logits() {
        let v = log_sum_exp(array![1000.0, 1000.0].view());
        assert!((v - (1000.0 + 2.0_f64.ln())).abs() < 1e-9);
    }
}
