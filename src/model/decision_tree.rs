//! Regression tree evaluation over flat node arrays

use crate::error::{PredictorError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Child index marking a leaf
pub const TREE_LEAF: i64 = -1;

/// Feature and threshold recorded on leaves
pub const TREE_UNDEFINED: i64 = -2;

/// Node arrays of a fitted tree, one entry per node, node 0 the root.
///
/// Split nodes send samples with `x[feature] <= threshold` to
/// `children_left` and the rest to `children_right`. `value` holds the
/// node's mean target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        value: f64,
    },
}

/// A fitted regression tree, one estimator of the forest.
///
/// Every child index is higher than its parent's, so a walk from the root
/// ends on a leaf after at most one step per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeArrays", into = "TreeArrays")]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl TryFrom<TreeArrays> for DecisionTree {
    type Error = PredictorError;

    fn try_from(arrays: TreeArrays) -> Result<Self> {
        let n_nodes = arrays.value.len();
        if n_nodes == 0 {
            return Err(PredictorError::InvalidArtifact("tree has no nodes".to_string()));
        }

        for (name, len) in [
            ("children_left", arrays.children_left.len()),
            ("children_right", arrays.children_right.len()),
            ("feature", arrays.feature.len()),
            ("threshold", arrays.threshold.len()),
        ] {
            if len != n_nodes {
                return Err(PredictorError::ShapeError {
                    expected: format!("{} = {}", name, n_nodes),
                    actual: format!("{} = {}", name, len),
                });
            }
        }

        let child = |node: usize, raw: i64| -> Result<usize> {
            usize::try_from(raw)
                .ok()
                .filter(|&idx| idx > node && idx < n_nodes)
                .ok_or_else(|| {
                    PredictorError::InvalidArtifact(format!(
                        "node {} has invalid child {}",
                        node, raw
                    ))
                })
        };

        let nodes = (0..n_nodes)
            .map(|i| {
                let (left, right) = (arrays.children_left[i], arrays.children_right[i]);
                let value = arrays.value[i];
                if left == TREE_LEAF && right == TREE_LEAF {
                    return Ok(Node::Leaf { value });
                }

                let feature = usize::try_from(arrays.feature[i]).map_err(|_| {
                    PredictorError::InvalidArtifact(format!(
                        "split node {} reads feature {}",
                        i, arrays.feature[i]
                    ))
                })?;

                Ok(Node::Split {
                    feature,
                    threshold: arrays.threshold[i],
                    left: child(i, left)?,
                    right: child(i, right)?,
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { nodes })
    }
}

impl From<DecisionTree> for TreeArrays {
    fn from(tree: DecisionTree) -> Self {
        let n_nodes = tree.nodes.len();
        let mut arrays = TreeArrays {
            children_left: Vec::with_capacity(n_nodes),
            children_right: Vec::with_capacity(n_nodes),
            feature: Vec::with_capacity(n_nodes),
            threshold: Vec::with_capacity(n_nodes),
            value: Vec::with_capacity(n_nodes),
        };

        for node in tree.nodes {
            let (left, right, feature, threshold, value) = match node {
                Node::Leaf { value } => {
                    (TREE_LEAF, TREE_LEAF, TREE_UNDEFINED, TREE_UNDEFINED as f64, value)
                }
                Node::Split { feature, threshold, left, right, value } => {
                    (left as i64, right as i64, feature as i64, threshold, value)
                }
            };
            arrays.children_left.push(left);
            arrays.children_right.push(right);
            arrays.feature.push(feature);
            arrays.threshold.push(threshold);
            arrays.value.push(value);
        }

        arrays
    }
}

impl DecisionTree {
    /// Predict a single sample
    pub fn predict_sample(&self, sample: ArrayView1<f64>) -> Result<f64> {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return Ok(value),
                Node::Split { feature, threshold, left, right, .. } => {
                    let x = sample.get(feature).ok_or_else(|| PredictorError::ShapeError {
                        expected: format!("at least {} features", feature + 1),
                        actual: format!("{} features", sample.len()),
                    })?;
                    idx = if *x <= threshold { left } else { right };
                }
            }
        }
    }

    /// Get tree depth, counting the root as level 1
    pub fn get_depth(&self) -> usize {
        // Children follow their parent, so one forward pass sees every
        // parent's depth before its children.
        let mut depth = vec![0usize; self.nodes.len()];
        depth[0] = 1;
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = *node {
                if depth[idx] > 0 {
                    depth[left] = depth[idx] + 1;
                    depth[right] = depth[idx] + 1;
                }
            }
        }
        depth.into_iter().max().unwrap_or(0)
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Highest feature index any split reads, if the tree has splits
    pub fn max_feature_index(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .max()
    }
}

/// Small hand-built trees for unit tests
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Single-leaf tree
    pub fn leaf(value: f64) -> DecisionTree {
        DecisionTree::try_from(TreeArrays {
            children_left: vec![TREE_LEAF],
            children_right: vec![TREE_LEAF],
            feature: vec![TREE_UNDEFINED],
            threshold: vec![TREE_UNDEFINED as f64],
            value: vec![value],
        })
        .unwrap()
    }

    /// One split on `feature` at `threshold`
    pub fn stump(feature: i64, threshold: f64, left: f64, right: f64) -> DecisionTree {
        DecisionTree::try_from(TreeArrays {
            children_left: vec![1, TREE_LEAF, TREE_LEAF],
            children_right: vec![2, TREE_LEAF, TREE_LEAF],
            feature: vec![feature, TREE_UNDEFINED, TREE_UNDEFINED],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![(left + right) / 2.0, left, right],
        })
        .unwrap()
    }
}
