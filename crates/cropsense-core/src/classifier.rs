//! # Classifier Module
//!
//! Predictive functions from an encoded stage to a disease indicator vector.
//!
//! The stage code is the only input feature, so every model here is a
//! function `usize -> Vec<u8>` whose output is aligned with the bundle's
//! [`LabelDecoder`](crate::LabelDecoder) classes.
//!
//! Trees use a struct-of-arrays layout with nodes in pre-order: children
//! always have a larger index than their parent, which rules out cycles.

use crate::error::BundleError;
use serde::{Deserialize, Serialize};

// =============================================================================
// CLASSIFIER TRAIT
// =============================================================================

/// A multi-label classifier over encoded stages.
pub trait Classifier {
    /// Width of every indicator vector this classifier emits.
    fn n_outputs(&self) -> usize;

    /// Predict the indicator vector for an encoded stage.
    fn predict(&self, code: usize) -> Result<Vec<u8>, BundleError>;

    /// Check internal consistency.
    fn validate(&self) -> Result<(), BundleError>;
}

// =============================================================================
// LOOKUP TABLE
// =============================================================================

/// One precomputed indicator row per encoded stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable {
    pub rows: Vec<Vec<u8>>,
}

impl LookupTable {
    #[must_use]
    pub fn new(rows: Vec<Vec<u8>>) -> Self {
        Self { rows }
    }

    /// Number of stage rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Classifier for LookupTable {
    fn n_outputs(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    fn predict(&self, code: usize) -> Result<Vec<u8>, BundleError> {
        self.rows
            .get(code)
            .cloned()
            .ok_or(BundleError::CodeOutOfRange(code))
    }

    fn validate(&self) -> Result<(), BundleError> {
        let expected = self.n_outputs();
        for (row, values) in self.rows.iter().enumerate() {
            if values.len() != expected {
                return Err(BundleError::RaggedTable {
                    row,
                    width: values.len(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// DECISION TREE
// =============================================================================

/// Single-feature binary decision tree.
///
/// A sample goes left when `code <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Left child index (ignored for leaves).
    pub left_children: Vec<u32>,
    /// Right child index (ignored for leaves).
    pub right_children: Vec<u32>,
    /// Split threshold (ignored for leaves).
    pub thresholds: Vec<f64>,
    /// Whether each node is a leaf.
    pub is_leaf: Vec<bool>,
    /// Indicator vector per node (empty for internal nodes).
    pub leaf_values: Vec<Vec<u8>>,
}

impl DecisionTree {
    /// A tree with a single leaf that always predicts `value`.
    #[must_use]
    pub fn leaf(value: Vec<u8>) -> Self {
        Self {
            left_children: vec![0],
            right_children: vec![0],
            thresholds: vec![0.0],
            is_leaf: vec![true],
            leaf_values: vec![value],
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    fn first_leaf(&self) -> Option<usize> {
        self.is_leaf.iter().position(|leaf| *leaf)
    }
}

impl Classifier for DecisionTree {
    fn n_outputs(&self) -> usize {
        self.first_leaf()
            .and_then(|idx| self.leaf_values.get(idx))
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn predict(&self, code: usize) -> Result<Vec<u8>, BundleError> {
        let feature = code as f64;
        let mut node = 0usize;
        // Children are strictly greater than their parent, so this is bounded.
        for _ in 0..self.num_nodes() {
            let bad_node = move || BundleError::InvalidTree(format!("dangling node {node}"));
            if *self.is_leaf.get(node).ok_or_else(bad_node)? {
                return self.leaf_values.get(node).cloned().ok_or_else(bad_node);
            }
            let threshold = *self.thresholds.get(node).ok_or_else(bad_node)?;
            let children = if feature <= threshold {
                &self.left_children
            } else {
                &self.right_children
            };
            node = *children.get(node).ok_or_else(bad_node)? as usize;
        }
        Err(BundleError::InvalidTree(format!(
            "no leaf reached for code {code}"
        )))
    }

    fn validate(&self) -> Result<(), BundleError> {
        let n = self.num_nodes();
        if n == 0 {
            return Err(BundleError::InvalidTree("tree has no nodes".into()));
        }
        if self.left_children.len() != n
            || self.right_children.len() != n
            || self.thresholds.len() != n
            || self.leaf_values.len() != n
        {
            return Err(BundleError::InvalidTree(format!(
                "node arrays disagree on length (expected {n})"
            )));
        }

        let width = self.n_outputs();
        for node in 0..n {
            if self.is_leaf[node] {
                if self.leaf_values[node].len() != width {
                    return Err(BundleError::InvalidTree(format!(
                        "leaf {node} has width {}, expected {width}",
                        self.leaf_values[node].len()
                    )));
                }
                continue;
            }
            for child in [self.left_children[node], self.right_children[node]] {
                let child = child as usize;
                if child <= node || child >= n {
                    return Err(BundleError::InvalidTree(format!(
                        "node {node} has invalid child {child}"
                    )));
                }
            }
            if self.thresholds[node].is_nan() {
                return Err(BundleError::InvalidTree(format!(
                    "node {node} has NaN threshold"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// FOREST
// =============================================================================

/// Majority vote over decision trees, per output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    pub trees: Vec<DecisionTree>,
}

impl Forest {
    #[must_use]
    pub fn new(trees: Vec<DecisionTree>) -> Self {
        Self { trees }
    }
}

impl Classifier for Forest {
    fn n_outputs(&self) -> usize {
        self.trees.first().map(|t| t.n_outputs()).unwrap_or(0)
    }

    fn predict(&self, code: usize) -> Result<Vec<u8>, BundleError> {
        let mut votes = vec![0usize; self.n_outputs()];
        for tree in &self.trees {
            let indicator = tree.predict(code)?;
            for (count, bit) in votes.iter_mut().zip(&indicator) {
                if *bit != 0 {
                    *count = count.saturating_add(1);
                }
            }
        }

        let total = self.trees.len();
        Ok(votes
            .into_iter()
            .map(|count| u8::from(count.saturating_mul(2) > total))
            .collect())
    }

    fn validate(&self) -> Result<(), BundleError> {
        if self.trees.is_empty() {
            return Err(BundleError::InvalidTree("forest has no trees".into()));
        }
        let width = self.n_outputs();
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate()?;
            if tree.n_outputs() != width {
                return Err(BundleError::InvalidTree(format!(
                    "tree {idx} has width {}, expected {width}",
                    tree.n_outputs()
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// CLASSIFIER MODEL
// =============================================================================

/// The classifier kinds a bundle may carry.
///
/// Externally tagged so the same schema works for JSON and postcard:
/// `{"table": {"rows": [[1, 0], [0, 1]]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierModel {
    Table(LookupTable),
    Tree(DecisionTree),
    Forest(Forest),
}

impl ClassifierModel {
    /// Short kind name for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierModel::Table(_) => "table",
            ClassifierModel::Tree(_) => "tree",
            ClassifierModel::Forest(_) => "forest",
        }
    }
}

impl Classifier for ClassifierModel {
    fn n_outputs(&self) -> usize {
        match self {
            ClassifierModel::Table(m) => m.n_outputs(),
            ClassifierModel::Tree(m) => m.n_outputs(),
            ClassifierModel::Forest(m) => m.n_outputs(),
        }
    }

    fn predict(&self, code: usize) -> Result<Vec<u8>, BundleError> {
        match self {
            ClassifierModel::Table(m) => m.predict(code),
            ClassifierModel::Tree(m) => m.predict(code),
            ClassifierModel::Forest(m) => m.predict(code),
        }
    }

    fn validate(&self) -> Result<(), BundleError> {
        match self {
            ClassifierModel::Table(m) => m.validate(),
            ClassifierModel::Tree(m) => m.validate(),
            ClassifierModel::Forest(m) => m.validate(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
