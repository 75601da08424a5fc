use std::collections::BTreeMap;

use serde::Serialize;

/// Estimator state for one request category.
#[derive(Debug, Clone, Copy)]
struct CategoryState {
    estimator: f64,
    abs_error_sum: f64,
    observations: u64,
}

/// Per-category entry of the prediction-error report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryError {
    pub observations: u64,
    /// Mean absolute prediction error, the seeded first observation
    /// (zero by construction) included
    pub mean_abs_error: f64,
    /// Estimator value after the final observation
    pub estimator: f64,
}

/// Exponentially weighted moving-average service-time predictor, keyed
/// by operation label.
///
/// The first observation of a key seeds its estimator, so the recorded
/// prediction error for it is zero; each later observation accumulates
/// `|estimator − x|` before the estimator moves to
/// `α·x + (1−α)·estimator`. State lives for one run and is owned by
/// that run's collector, never shared across runs.
#[derive(Debug, Clone)]
pub struct ServiceTimePredictor {
    alpha: f64,
    categories: BTreeMap<String, CategoryState>,
}

impl ServiceTimePredictor {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            categories: BTreeMap::new(),
        }
    }

    /// Feed one measured service time for `category`.
    pub fn observe(&mut self, category: &str, value: f64) {
        match self.categories.get_mut(category) {
            Some(state) => {
                let error = (state.estimator - value).abs();
                state.abs_error_sum += error;
                state.observations += 1;
                state.estimator =
                    self.alpha * value + (1.0 - self.alpha) * state.estimator;
            }
            None => {
                self.categories.insert(
                    category.to_owned(),
                    CategoryState {
                        estimator: value,
                        abs_error_sum: 0.0,
                        observations: 1,
                    },
                );
            }
        }
    }

    /// Prediction-error summary per category, in stable key order.
    pub fn report(&self) -> BTreeMap<String, CategoryError> {
        self.categories
            .iter()
            .map(|(key, state)| {
                (
                    key.clone(),
                    CategoryError {
                        observations: state.observations,
                        mean_abs_error: state.abs_error_sum
                            / state.observations as f64,
                        estimator: state.estimator,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_first_observation_has_zero_error() {
        let mut predictor = ServiceTimePredictor::new(0.7);
        predictor.observe("OP", 10.0);

        let report = predictor.report();
        let entry = &report["OP"];
        assert_eq!(entry.observations, 1);
        assert_eq!(entry.mean_abs_error, 0.0);
        assert_eq!(entry.estimator, 10.0);
    }

    #[test]
    fn tracks_error_and_estimator_over_a_known_sequence() {
        // Observations [10, 20, 15] at α = 0.7: errors [0, 10, 2],
        // mean 4.0, final estimator 15.6.
        let mut predictor = ServiceTimePredictor::new(0.7);
        for value in [10.0, 20.0, 15.0] {
            predictor.observe("IMG_BLUR", value);
        }

        let report = predictor.report();
        let entry = &report["IMG_BLUR"];
        assert_eq!(entry.observations, 3);
        assert!((entry.mean_abs_error - 4.0).abs() < 1e-9);
        assert!((entry.estimator - 15.6).abs() < 1e-9);
    }

    #[test]
    fn categories_do_not_bleed_into_each_other() {
        let mut predictor = ServiceTimePredictor::new(0.5);
        predictor.observe("A", 1.0);
        predictor.observe("B", 100.0);
        predictor.observe("A", 3.0);

        let report = predictor.report();
        assert_eq!(report["A"].observations, 2);
        assert_eq!(report["B"].observations, 1);
        assert!((report["A"].estimator - 2.0).abs() < 1e-12);
        assert_eq!(report["B"].estimator, 100.0);
    }
}
