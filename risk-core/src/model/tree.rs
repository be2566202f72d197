//! Tree ensembles (random forest / gradient boosting)
//!
//! Trees are flat node arrays. Internal nodes route `x <= threshold` to the
//! left child. Children always sit after their parent, which `validate`
//! enforces so evaluation cannot loop.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ScoringError, ScoringResult};
use super::{check_width, normalize, sigmoid, RiskModel};

/// A decision tree node (internal or leaf)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Feature index to compare (internal nodes)
    #[serde(default)]
    pub feature: usize,
    /// Split threshold (internal nodes)
    #[serde(default)]
    pub threshold: f32,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    /// Leaf value (None for internal nodes)
    #[serde(default)]
    pub value: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// How leaf values combine into a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Leaves are probabilities; average them
    Mean,
    /// Leaves are margins; `sigmoid(base_score + sum)`
    Boosted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f32,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trees.is_empty() {
            return Err(ConfigError::Invalid("tree ensemble has no trees".to_string()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ConfigError::Invalid(format!("tree {} has no nodes", t)));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                if node.value.is_some() {
                    continue;
                }
                let children_ok = node.left > i
                    && node.right > i
                    && node.left < tree.nodes.len()
                    && node.right < tree.nodes.len();
                if !children_ok {
                    return Err(ConfigError::Invalid(format!(
                        "tree {} node {} has invalid children ({}, {})",
                        t, i, node.left, node.right
                    )));
                }
                if node.feature >= self.n_features {
                    return Err(ConfigError::Invalid(format!(
                        "tree {} node {} splits on feature {} of {}",
                        t, i, node.feature, self.n_features
                    )));
                }
            }
        }
        Ok(())
    }

    fn eval_tree(tree: &Tree, features: &[f32]) -> ScoringResult<f32> {
        let mut idx = 0usize;
        loop {
            let node = tree
                .nodes
                .get(idx)
                .ok_or_else(|| {
                    ScoringError::ModelInvocation(format!("node {} out of range", idx))
                })?;

            if let Some(value) = node.value {
                return Ok(value);
            }

            let x = features.get(node.feature).copied().ok_or_else(|| {
                ScoringError::ModelInvocation(format!("feature {} out of range", node.feature))
            })?;

            idx = if x <= node.threshold { node.left } else { node.right };
        }
    }
}

impl RiskModel for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict_proba(&self, features: &[f32]) -> ScoringResult<[f32; 2]> {
        check_width(self.input_width(), features)?;

        let mut sum = 0.0f32;
        for tree in &self.trees {
            sum += Self::eval_tree(tree, features)?;
        }

        let p = match self.aggregation {
            Aggregation::Mean => (sum / self.trees.len() as f32).clamp(0.0, 1.0),
            Aggregation::Boosted => sigmoid(self.base_score + sum),
        };
        Ok([1.0 - p, p])
    }

    /// Split counts per feature, normalized
    fn feature_importances(&self) -> Option<Vec<f32>> {
        let mut counts = vec![0.0f32; self.n_features];
        for node in self.trees.iter().flat_map(|t| t.nodes.iter()) {
            if node.value.is_none() {
                if let Some(c) = counts.get_mut(node.feature) {
                    *c += 1.0;
                }
            }
        }
        Some(normalize(counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(feature: usize, threshold: f32, left: usize, right: usize) -> Node {
        Node { feature, threshold, left, right, value: None }
    }

    fn leaf(value: f32) -> Node {
        Node { feature: 0, threshold: 0.0, left: 0, right: 0, value: Some(value) }
    }

    fn forest() -> TreeEnsemble {
        TreeEnsemble {
            n_features: 2,
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            trees: vec![
                Tree { nodes: vec![split(0, 0.5, 1, 2), leaf(0.2), leaf(0.8)] },
                Tree { nodes: vec![split(1, 10.0, 1, 2), leaf(0.0), leaf(1.0)] },
            ],
        }
    }

    #[test]
    fn test_forest_mean() {
        let model = forest();
        model.validate().unwrap();

        let p = model.predict_proba(&[0.0, 0.0]).unwrap();
        assert!((p[1] - 0.1).abs() < 1e-6);

        // threshold is inclusive on the left
        let p = model.predict_proba(&[0.5, 10.0]).unwrap();
        assert!((p[1] - 0.1).abs() < 1e-6);

        let p = model.predict_proba(&[1.0, 11.0]).unwrap();
        assert!((p[1] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_boosted_sigmoid() {
        let model = TreeEnsemble {
            n_features: 1,
            aggregation: Aggregation::Boosted,
            base_score: 0.0,
            trees: vec![Tree { nodes: vec![split(0, 0.0, 1, 2), leaf(-1.0), leaf(1.0)] }],
        };
        let low = model.predict_proba(&[-1.0]).unwrap()[1];
        let high = model.predict_proba(&[1.0]).unwrap()[1];
        assert!((low - sigmoid(-1.0)).abs() < 1e-6);
        assert!((high - sigmoid(1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_backward_child_rejected() {
        let model = TreeEnsemble {
            n_features: 1,
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            trees: vec![Tree { nodes: vec![leaf(0.1), split(0, 0.0, 0, 0)] }],
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_split_feature_out_of_range_rejected() {
        let model = TreeEnsemble {
            n_features: 1,
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            trees: vec![Tree { nodes: vec![split(4, 0.0, 1, 2), leaf(0.0), leaf(1.0)] }],
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_split_count_importances() {
        let importances = forest().feature_importances().unwrap();
        assert_eq!(importances, vec![0.5, 0.5]);
    }
}
