//! Classifier and label encoder artifacts.
//!
//! The fertilizer model is consumed as an opaque function from a feature
//! vector to a class index ([`Classifier`]); a [`LabelEncoder`] maps the
//! index to a fertilizer name.
//!
//! The bundled artifact format is a JSON tree ensemble:
//!
//! ```text
//! {
//!   "n_classes": 7,
//!   "trees": [
//!     { "nodes": [
//!         { "split": { "feature": 5, "threshold": 20.5, "left": 1, "right": 2 } },
//!         { "leaf":  { "class": 6 } },
//!         { "leaf":  { "class": 2 } }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A sample goes left when `x[feature] <= threshold`. Children must appear
//! after their parent, which rules out cycles. Each tree votes once; the
//! class with the most votes wins and ties go to the lowest index.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::features::FEATURE_COUNT;

/// Errors raised while running a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The classifier rejected or failed on its input.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The classifier produced an index the encoder does not know.
    #[error("unknown class index {index} (encoder has {classes} classes)")]
    UnknownClass { index: usize, classes: usize },
}

/// An opaque fitted classifier.
pub trait Classifier: Send + Sync {
    /// Predicts a class index for one sample.
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<usize, ModelError>;
}

/// A single decision tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: usize,
    },
}

/// A binary decision tree stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walks from the root to a leaf.
    ///
    /// Every step must move to a higher node index, so a malformed tree
    /// ends in an error instead of looping.
    fn leaf_for(&self, features: &[f64; FEATURE_COUNT]) -> Result<usize, ModelError> {
        let mut index = 0;
        loop {
            let node = self.nodes.get(index).ok_or_else(|| {
                ModelError::Inference(format!(
                    "node {} missing from tree of {} nodes",
                    index,
                    self.nodes.len()
                ))
            })?;

            match *node {
                Node::Leaf { class } => return Ok(class),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(feature).ok_or_else(|| {
                        ModelError::Inference(format!(
                            "node {} splits on unknown feature {}",
                            index, feature
                        ))
                    })?;
                    let next = if *value <= threshold { left } else { right };
                    if next <= index {
                        return Err(ModelError::Inference(format!(
                            "node {} points back to node {}",
                            index, next
                        )));
                    }
                    index = next;
                }
            }
        }
    }
}

/// A majority-vote ensemble of decision trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_classes: usize,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Checks the structural invariants `predict` relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_classes == 0 {
            return Err("n_classes must be positive".to_string());
        }
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {} has no nodes", t));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match *node {
                    Node::Leaf { class } if class >= self.n_classes => {
                        return Err(format!(
                            "tree {} node {}: class {} out of range",
                            t, n, class
                        ));
                    }
                    Node::Split { feature, .. } if feature >= FEATURE_COUNT => {
                        return Err(format!(
                            "tree {} node {}: feature {} out of range",
                            t, n, feature
                        ));
                    }
                    Node::Split { threshold, .. } if threshold.is_nan() => {
                        return Err(format!("tree {} node {}: threshold is NaN", t, n));
                    }
                    Node::Split { left, right, .. }
                        if left <= n
                            || right <= n
                            || left >= tree.nodes.len()
                            || right >= tree.nodes.len() =>
                    {
                        return Err(format!(
                            "tree {} node {}: children ({}, {}) must follow the node \
                             and stay within {} nodes",
                            t,
                            n,
                            left,
                            right,
                            tree.nodes.len()
                        ));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

impl Classifier for TreeEnsemble {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<usize, ModelError> {
        if let Some(i) = features.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::Inference(format!(
                "feature {} is not finite",
                i
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Inference("ensemble has no trees".to_string()));
        }

        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let class = tree.leaf_for(features)?;
            let slot = votes.get_mut(class).ok_or_else(|| {
                ModelError::Inference(format!("tree voted for unknown class {}", class))
            })?;
            *slot += 1;
        }

        // max_by_key keeps the last maximum; reverse to prefer the lowest index
        votes
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, count)| **count)
            .map(|(class, _)| class)
            .ok_or_else(|| ModelError::Inference("ensemble has no classes".to_string()))
    }
}

/// Maps class indices to fertilizer names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Returns the label for a class index.
    pub fn decode(&self, index: usize) -> Result<&str, ModelError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(ModelError::UnknownClass {
                index,
                classes: self.classes.len(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
