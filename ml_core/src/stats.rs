/// Statistics produced by an iterative fit.
///
/// This type keeps fields private to allow evolving the internal counters
/// without breaking the public API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitStats {
    iterations: usize,
    converged: bool,
}

impl FitStats {
    /// Creates a new `FitStats`.
    ///
    /// # Args
    /// * `iterations` - Number of iterations the solver ran.
    /// * `converged` - Whether the stopping tolerance was reached before the iteration cap.
    ///
    /// # Returns
    /// A `FitStats` instance containing the provided counters.
    ///
    /// # Panics
    /// Never panics.
    pub fn new(iterations: usize, converged: bool) -> Self {
        Self { iterations, converged }
    }

    /// Returns the number of iterations run by the solver.
    ///
    /// # Panics
    /// Never panics.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns `true` if the solver stopped on the gradient tolerance.
    ///
    /// # Panics
    /// Never panics.
    pub fn converged(&self) -> bool {
        self.converged
    }
}
