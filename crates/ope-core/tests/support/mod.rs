//! Shared mock policies and dataset builders for integration tests.
#![allow(dead_code)]

use ope_core::{LoggedData, Policy};
use ope_math::Matrix;

/// Predicts a fixed action sequence positionally, ignoring covariates.
pub struct FixedPolicy {
    pub actions: Vec<usize>,
}

impl Policy for FixedPolicy {
    fn predict(&self, x: &Matrix) -> Vec<usize> {
        self.actions[..x.rows()].to_vec()
    }

    fn fit(&mut self, _x: &Matrix, _actions: &[usize], _rewards: &[f64]) {}
}

/// Predicts the row's first covariate as the arm index. Rows whose
/// covariate encodes the logged action always match.
pub struct FeaturePolicy;

impl Policy for FeaturePolicy {
    fn predict(&self, x: &Matrix) -> Vec<usize> {
        (0..x.rows()).map(|i| x.get(i, 0) as usize).collect()
    }

    fn fit(&mut self, _x: &Matrix, _actions: &[usize], _rewards: &[f64]) {}
}

/// Dataset whose single covariate column encodes the logged action, so
/// `FeaturePolicy` matches every row.
pub fn matching_data(actions: &[usize], rewards: &[f64]) -> LoggedData {
    let rows: Vec<Vec<f64>> = actions.iter().map(|&a| vec![a as f64]).collect();
    LoggedData::new(
        Matrix::from_rows(&rows).unwrap(),
        actions.to_vec(),
        rewards.to_vec(),
    )
    .unwrap()
}

/// Dataset with an uninformative covariate column.
pub fn plain_data(actions: &[usize], rewards: &[f64]) -> LoggedData {
    let rows: Vec<Vec<f64>> = (0..actions.len()).map(|i| vec![i as f64]).collect();
    LoggedData::new(
        Matrix::from_rows(&rows).unwrap(),
        actions.to_vec(),
        rewards.to_vec(),
    )
    .unwrap()
}
