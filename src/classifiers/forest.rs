//! Decision tree and random forest
//!
//! Trees are stored the way the training library exports them: parallel
//! node arrays where a leaf has child index `-1` on both sides.

use super::check_metadata;
use crate::classifier::{check_input, Classifier, Prediction};
use crate::error::PredictError;
use crate::record::FEATURE_COUNT;
use serde::Deserialize;

const LEAF: i64 = -1;

#[derive(Debug, Deserialize)]
pub struct TreeNodes {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    /// Per-node class weights (sample counts or fractions)
    value: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionTreeArtifact {
    #[serde(flatten)]
    nodes: TreeNodes,
    #[serde(default)]
    classes: Option<Vec<i64>>,
    #[serde(default)]
    n_features_in: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RandomForestArtifact {
    trees: Vec<TreeNodes>,
    #[serde(default)]
    classes: Option<Vec<i64>>,
    #[serde(default)]
    n_features_in: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Normalized class probabilities
        proba: [f64; 2],
    },
}

/// Single fitted decision tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl TryFrom<TreeNodes> for DecisionTree {
    type Error = PredictError;

    fn try_from(raw: TreeNodes) -> Result<Self, Self::Error> {
        let n = raw.children_left.len();
        if n == 0 {
            return Err(PredictError::ArtifactError("tree has no nodes".to_string()));
        }
        if [
            raw.children_right.len(),
            raw.feature.len(),
            raw.threshold.len(),
            raw.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err(PredictError::ArtifactError(
                "tree node arrays differ in length".to_string(),
            ));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (raw.children_left[i], raw.children_right[i]);

            let node = if left == LEAF && right == LEAF {
                Node::Leaf {
                    proba: leaf_proba(i, &raw.value[i])?,
                }
            } else {
                // Children always follow their parent, which also rules out cycles
                let child = |c: i64| -> Result<usize, PredictError> {
                    usize::try_from(c)
                        .ok()
                        .filter(|c| *c > i && *c < n)
                        .ok_or_else(|| {
                            PredictError::ArtifactError(format!(
                                "node {} has invalid child index {}",
                                i, c
                            ))
                        })
                };
                let feature = usize::try_from(raw.feature[i])
                    .ok()
                    .filter(|f| *f < FEATURE_COUNT)
                    .ok_or_else(|| {
                        PredictError::ArtifactError(format!(
                            "node {} splits on invalid feature {}",
                            i, raw.feature[i]
                        ))
                    })?;
                if raw.threshold[i].is_nan() {
                    return Err(PredictError::ArtifactError(format!(
                        "node {} has NaN threshold",
                        i
                    )));
                }

                Node::Split {
                    feature,
                    threshold: raw.threshold[i],
                    left: child(left)?,
                    right: child(right)?,
                }
            };
            nodes.push(node);
        }

        Ok(Self { nodes })
    }
}

impl TryFrom<DecisionTreeArtifact> for DecisionTree {
    type Error = PredictError;

    fn try_from(artifact: DecisionTreeArtifact) -> Result<Self, Self::Error> {
        check_metadata(artifact.classes.as_deref(), artifact.n_features_in)?;
        Self::try_from(artifact.nodes)
    }
}

fn leaf_proba(node: usize, weights: &[f64]) -> Result<[f64; 2], PredictError> {
    let invalid = || {
        PredictError::ArtifactError(format!(
            "leaf {} must hold two non-negative class weights",
            node
        ))
    };

    let [absent, present]: [f64; 2] = weights.try_into().map_err(|_| invalid())?;
    let total = absent + present;
    if !(absent >= 0.0 && present >= 0.0 && total > 0.0 && total.is_finite()) {
        return Err(invalid());
    }
    Ok([absent / total, present / total])
}

impl DecisionTree {
    fn predict_proba(&self, features: &[f64]) -> [f64; 2] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Trees are fitted on f32 inputs, so compare at that precision
                    let x = features[*feature] as f32 as f64;
                    index = if x <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &'static str {
        "decision_tree"
    }

    fn description(&self) -> &'static str {
        "Single decision tree"
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, PredictError> {
        check_input(self, features)?;
        Ok(from_proba(self.predict_proba(features)))
    }
}

/// Ensemble of decision trees with averaged class probabilities
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl TryFrom<RandomForestArtifact> for RandomForest {
    type Error = PredictError;

    fn try_from(artifact: RandomForestArtifact) -> Result<Self, Self::Error> {
        check_metadata(artifact.classes.as_deref(), artifact.n_features_in)?;
        if artifact.trees.is_empty() {
            return Err(PredictError::ArtifactError(
                "forest has no trees".to_string(),
            ));
        }

        let trees = artifact
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, nodes)| {
                DecisionTree::try_from(nodes).map_err(|e| e.context(format_args!("tree {}", i)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { trees })
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn description(&self) -> &'static str {
        "Random forest averaging per-tree class probabilities"
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, PredictError> {
        check_input(self, features)?;

        let mut sum = [0.0; 2];
        for tree in &self.trees {
            let proba = tree.predict_proba(features);
            sum[0] += proba[0];
            sum[1] += proba[1];
        }
        let n = self.trees.len() as f64;
        Ok(from_proba([sum[0] / n, sum[1] / n]))
    }
}

/// Argmax with ties going to the first class
fn from_proba(proba: [f64; 2]) -> Prediction {
    Prediction {
        label: u8::from(proba[1] > proba[0]),
        probability: Some(proba[1]),
    }
}
