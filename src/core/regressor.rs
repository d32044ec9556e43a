//! Serialized regressor formats read from `final_model.json`.
//!
//! Two families are supported: a linear model and an ensemble of binary
//! regression trees (boosted or bagged). Trees use the `x <= threshold`
//! goes-left convention of the exporting library.

use crate::domain::ports::Regressor;
use crate::utils::error::{PriceError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorModel {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Boosting: leaf values are added up.
    #[default]
    Sum,
    /// Bagging (random forest): leaf values are averaged.
    Mean,
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl RegressorModel {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Structural checks against the expected input width. Runs once at load.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        match self {
            RegressorModel::Linear(model) => {
                if model.coefficients.len() != n_features {
                    return Err(PriceError::SchemaMismatch {
                        message: format!(
                            "linear model has {} coefficients but {} feature columns",
                            model.coefficients.len(),
                            n_features
                        ),
                    });
                }
                if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite())
                {
                    return Err(PriceError::inference("linear model has non-finite weights"));
                }
                Ok(())
            }
            RegressorModel::TreeEnsemble(ensemble) => {
                if ensemble.trees.is_empty() && ensemble.aggregation == Aggregation::Mean {
                    return Err(PriceError::inference(
                        "mean-aggregated ensemble has no trees",
                    ));
                }
                for (tree_idx, tree) in ensemble.trees.iter().enumerate() {
                    tree.validate(n_features).map_err(|message| {
                        PriceError::inference(format!("tree {}: {}", tree_idx, message))
                    })?;
                }
                Ok(())
            }
        }
    }
}

impl DecisionTree {
    /// Children must sit after their parent, so traversal always terminates.
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = *node
            {
                if feature >= n_features {
                    return Err(format!(
                        "node {} splits on feature {} but only {} columns exist",
                        idx, feature, n_features
                    ));
                }
                if threshold.is_nan() {
                    return Err(format!("node {} has a NaN threshold", idx));
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child {}", idx, child));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).copied().ok_or_else(|| {
                        PriceError::inference(format!("feature index {} out of range", feature))
                    })?;
                    idx = if x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(PriceError::inference(format!(
                        "tree node {} does not exist",
                        idx
                    )))
                }
            }
        }
    }
}

impl Regressor for RegressorModel {
    fn n_features(&self) -> Option<usize> {
        match self {
            RegressorModel::Linear(model) => Some(model.coefficients.len()),
            // 樹模型未記錄輸入寬度，只能檢查特徵索引上限
            RegressorModel::TreeEnsemble(_) => None,
        }
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        match self {
            RegressorModel::Linear(model) => {
                if features.len() != model.coefficients.len() {
                    return Err(PriceError::inference(format!(
                        "expected {} features, got {}",
                        model.coefficients.len(),
                        features.len()
                    )));
                }
                Ok(model.intercept
                    + model
                        .coefficients
                        .iter()
                        .zip(features)
                        .map(|(w, x)| w * x)
                        .sum::<f64>())
            }
            RegressorModel::TreeEnsemble(ensemble) => {
                let mut total = 0.0;
                for tree in &ensemble.trees {
                    total += tree.predict(features)?;
                }
                let combined = match ensemble.aggregation {
                    Aggregation::Sum => total,
                    Aggregation::Mean => total / ensemble.trees.len() as f64,
                };
                Ok(ensemble.base_score + ensemble.learning_rate * combined)
            }
        }
    }
}
