//! ID3 tree induction over mixed discrete/continuous attributes
//!
//! Splits are chosen by information gain. Discrete attributes branch per
//! observed value and are consumed along the path; continuous attributes
//! split on a midpoint threshold and remain available further down, so
//! one numeric attribute can cut a path several times.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::dataset::{ensure_width, Attributes, Label, Row};
use crate::rule::{Premise, Rule};
use crate::value::{AttrKind, Op, Value};
use crate::LearnError;

/// A trained tree; internal nodes carry the split statistics feature
/// attribution reads back
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf(Label),
    /// Binary threshold split on a continuous attribute
    Continuous {
        attribute: usize,
        threshold: f64,
        gain: f64,
        n_samples: usize,
        at_least: Box<TreeNode>,
        below: Box<TreeNode>,
    },
    /// One branch per observed value of a discrete attribute
    Discrete {
        attribute: usize,
        gain: f64,
        n_samples: usize,
        branches: Vec<(Value, TreeNode)>,
    },
}

/// Information-gain decision tree classifier
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Id3Tree {
    attributes: Attributes,
    default: Label,
    root: Option<TreeNode>,
    n_train: usize,
}

impl Id3Tree {
    pub fn new(attributes: Attributes, default: Label) -> Self {
        Self {
            attributes,
            default,
            root: None,
            n_train: 0,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Induce the tree from labeled rows
    pub fn train(&mut self, rows: &[Row]) {
        let refs: Vec<&Row> = rows.iter().collect();
        let active: Vec<usize> = (0..self.attributes.len()).collect();
        self.root = Some(self.build(&refs, &active));
        self.n_train = rows.len();
    }

    /// Walk the tree; a leaf answers with full confidence, an unseen
    /// discrete value falls back to the default class
    pub fn predict(&self, values: &[Value]) -> Result<(Label, f64), LearnError> {
        let root = self.root.as_ref().ok_or(LearnError::UntrainedModel)?;
        ensure_width(&self.attributes, values)?;
        Ok(walk(root, values, self.default))
    }

    /// Convert the tree into one rule per leaf, in depth-first order
    pub fn build_rules(&self) -> Result<Vec<Rule>, LearnError> {
        let root = self.root.as_ref().ok_or(LearnError::UntrainedModel)?;
        let mut rules = Vec::new();
        collect_rules(root, &mut Vec::new(), &mut rules);
        Ok(rules)
    }

    /// Gain-weighted attribute importance.
    ///
    /// Each internal node contributes `gain * n_samples / n_train` to its
    /// attribute. With `normalize` the scores are scaled to sum to 1
    /// unless every score is zero.
    pub fn importance(&self, normalize: bool) -> Result<Vec<f64>, LearnError> {
        let root = self.root.as_ref().ok_or(LearnError::UntrainedModel)?;
        let mut scores = vec![0.0; self.attributes.len()];
        if self.n_train > 0 {
            accumulate_importance(root, self.n_train as f64, &mut scores);
        }
        if normalize {
            let total: f64 = scores.iter().sum();
            if total > 0.0 {
                for score in &mut scores {
                    *score /= total;
                }
            }
        }
        Ok(scores)
    }

    /// Recursive ID3:
    /// empty partition -> default, homogeneous -> that label, otherwise
    /// split on the highest-gain attribute and recurse
    fn build(&self, rows: &[&Row], active: &[usize]) -> TreeNode {
        if rows.is_empty() {
            return TreeNode::Leaf(self.default);
        }
        let first = rows[0].label;
        if rows.iter().all(|row| row.label == first) {
            return TreeNode::Leaf(first);
        }
        if active.is_empty() {
            return TreeNode::Leaf(majority_label(rows, self.default));
        }

        // Highest gain wins; exact ties keep the earlier attribute
        let mut best_attr = active[0];
        let mut best_gain = f64::NEG_INFINITY;
        let mut best_threshold = None;
        for &attr in active {
            let (gain, threshold) = self.score(rows, attr);
            if gain > best_gain {
                best_attr = attr;
                best_gain = gain;
                best_threshold = threshold;
            }
        }

        match self.attributes.kind(best_attr) {
            AttrKind::Continuous => {
                let Some(threshold) = best_threshold else {
                    // No usable threshold anywhere: settle on the majority
                    return TreeNode::Leaf(majority_label(rows, self.default));
                };
                let (at_least, below): (Vec<&Row>, Vec<&Row>) = rows
                    .iter()
                    .copied()
                    .partition(|row| row.values[best_attr].as_f64() >= threshold);
                TreeNode::Continuous {
                    attribute: best_attr,
                    threshold,
                    gain: best_gain,
                    n_samples: rows.len(),
                    at_least: Box::new(self.build(&at_least, active)),
                    below: Box::new(self.build(&below, active)),
                }
            }
            AttrKind::Discrete => {
                let remaining: Vec<usize> =
                    active.iter().copied().filter(|&a| a != best_attr).collect();
                let branches = partition_discrete(rows, best_attr)
                    .into_iter()
                    .map(|(value, group)| (value, self.build(&group, &remaining)))
                    .collect();
                TreeNode::Discrete {
                    attribute: best_attr,
                    gain: best_gain,
                    n_samples: rows.len(),
                    branches,
                }
            }
        }
    }

    /// Fitness of one candidate split, dispatched on the attribute kind
    fn score(&self, rows: &[&Row], attribute: usize) -> (f64, Option<f64>) {
        match self.attributes.kind(attribute) {
            AttrKind::Discrete => (gain_discrete(rows, attribute), None),
            AttrKind::Continuous => gain_continuous(rows, attribute),
        }
    }
}

/// Shannon entropy (base 2) of the label multiset
fn entropy(rows: &[&Row]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let mut counts: FxHashMap<Label, usize> = FxHashMap::default();
    for row in rows {
        *counts.entry(row.label).or_insert(0) += 1;
    }
    let total = rows.len() as f64;
    -counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            p * p.log2()
        })
        .sum::<f64>()
}

/// Information gain of branching per observed value
fn gain_discrete(rows: &[&Row], attribute: usize) -> f64 {
    let base = entropy(rows);
    let total = rows.len() as f64;
    let remainder: f64 = partition_discrete(rows, attribute)
        .iter()
        .map(|(_, group)| group.len() as f64 / total * entropy(group))
        .sum();
    base - remainder
}

/// Best midpoint-threshold gain for a continuous attribute.
///
/// Returns `(-1, None)` when only one distinct value exists, so the
/// attribute can never win the split.
fn gain_continuous(rows: &[&Row], attribute: usize) -> (f64, Option<f64>) {
    let mut values: Vec<f64> = rows
        .iter()
        .map(|row| row.values[attribute].as_f64())
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    if values.len() <= 1 {
        return (-1.0, None);
    }

    let base = entropy(rows);
    let total = rows.len() as f64;
    let mut best_gain = -1.0;
    let mut best_threshold = None;

    for pair in values.windows(2) {
        let threshold = (pair[0] + pair[1]) / 2.0;
        let (at_least, below): (Vec<&Row>, Vec<&Row>) = rows
            .iter()
            .copied()
            .partition(|row| row.values[attribute].as_f64() >= threshold);
        let gain = base
            - at_least.len() as f64 / total * entropy(&at_least)
            - below.len() as f64 / total * entropy(&below);
        if gain > best_gain {
            best_gain = gain;
            best_threshold = Some(threshold);
        }
    }
    (best_gain, best_threshold)
}

/// Group rows by their value of a discrete attribute, in first-seen order
fn partition_discrete<'a>(rows: &[&'a Row], attribute: usize) -> Vec<(Value, Vec<&'a Row>)> {
    let mut groups: Vec<(Value, Vec<&Row>)> = Vec::new();
    for &row in rows {
        let value = row.values[attribute];
        match groups.iter_mut().find(|(key, _)| *key == value) {
            Some((_, group)) => group.push(row),
            None => groups.push((value, vec![row])),
        }
    }
    groups
}

/// Most frequent label; ties go to the smaller label
fn majority_label(rows: &[&Row], default: Label) -> Label {
    let mut counts: FxHashMap<Label, usize> = FxHashMap::default();
    for row in rows {
        *counts.entry(row.label).or_insert(0) += 1;
    }
    let mut entries: Vec<(Label, usize)> = counts.into_iter().collect();
    entries.sort_unstable_by_key(|&(label, _)| label);

    let mut best = default;
    let mut best_count = 0;
    for (label, count) in entries {
        if count > best_count {
            best = label;
            best_count = count;
        }
    }
    best
}

fn walk(node: &TreeNode, values: &[Value], default: Label) -> (Label, f64) {
    match node {
        TreeNode::Leaf(label) => (*label, 1.0),
        TreeNode::Continuous {
            attribute,
            threshold,
            at_least,
            below,
            ..
        } => {
            if values[*attribute].as_f64() >= *threshold {
                walk(at_least, values, default)
            } else {
                walk(below, values, default)
            }
        }
        TreeNode::Discrete {
            attribute, branches, ..
        } => match branches.iter().find(|(v, _)| *v == values[*attribute]) {
            Some((_, subtree)) => walk(subtree, values, default),
            None => (default, 0.0),
        },
    }
}

/// Depth-first traversal emitting one rule per leaf
fn collect_rules(node: &TreeNode, premises: &mut Vec<Premise>, rules: &mut Vec<Rule>) {
    match node {
        TreeNode::Leaf(label) => rules.push(Rule::new(premises.clone(), *label)),
        TreeNode::Continuous {
            attribute,
            threshold,
            at_least,
            below,
            ..
        } => {
            premises.push(Premise::new(*attribute, Op::Ge, Value::Continuous(*threshold)));
            collect_rules(at_least, premises, rules);
            premises.pop();

            premises.push(Premise::new(*attribute, Op::Lt, Value::Continuous(*threshold)));
            collect_rules(below, premises, rules);
            premises.pop();
        }
        TreeNode::Discrete {
            attribute, branches, ..
        } => {
            for (value, subtree) in branches {
                premises.push(Premise::new(*attribute, Op::Eq, *value));
                collect_rules(subtree, premises, rules);
                premises.pop();
            }
        }
    }
}

fn accumulate_importance(node: &TreeNode, n_train: f64, scores: &mut [f64]) {
    match node {
        TreeNode::Leaf(_) => {}
        TreeNode::Continuous {
            attribute,
            gain,
            n_samples,
            at_least,
            below,
            ..
        } => {
            scores[*attribute] += gain * *n_samples as f64 / n_train;
            accumulate_importance(at_least, n_train, scores);
            accumulate_importance(below, n_train, scores);
        }
        TreeNode::Discrete {
            attribute,
            gain,
            n_samples,
            branches,
        } => {
            scores[*attribute] += gain * *n_samples as f64 / n_train;
            for (_, subtree) in branches {
                accumulate_importance(subtree, n_train, scores);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discrete_rows(data: &[(&[i64], Label)]) -> Vec<Row> {
        data.iter()
            .map(|(values, label)| {
                Row::new(values.iter().map(|&v| Value::Discrete(v)).collect(), *label)
            })
            .collect()
    }

    fn xor_tree() -> Id3Tree {
        let attrs = Attributes::uniform(
            vec!["a".to_string(), "b".to_string()],
            AttrKind::Discrete,
        );
        let mut tree = Id3Tree::new(attrs, 0);
        tree.train(&discrete_rows(&[
            (&[0, 0], 0),
            (&[0, 1], 1),
            (&[1, 0], 1),
            (&[1, 1], 0),
        ]));
        tree
    }

    #[test]
    fn test_entropy_values() {
        let pure = discrete_rows(&[(&[0], 1), (&[0], 1)]);
        let refs: Vec<&Row> = pure.iter().collect();
        assert_eq!(entropy(&refs), 0.0);

        let even = discrete_rows(&[(&[0], 0), (&[0], 1)]);
        let refs: Vec<&Row> = even.iter().collect();
        assert!((entropy(&refs) - 1.0).abs() < 1e-12);

        assert_eq!(entropy(&[]), 0.0);
    }

    #[test]
    fn test_gain_of_perfect_discrete_split() {
        let rows = discrete_rows(&[(&[0], 0), (&[0], 0), (&[1], 1), (&[1], 1)]);
        let refs: Vec<&Row> = rows.iter().collect();
        assert!((gain_discrete(&refs, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_continuous_gain_picks_midpoint() {
        let rows: Vec<Row> = [(1.0, 0), (2.0, 0), (3.0, 1), (4.0, 1)]
            .iter()
            .map(|&(v, label)| Row::new(vec![Value::Continuous(v)], label))
            .collect();
        let refs: Vec<&Row> = rows.iter().collect();

        let (gain, threshold) = gain_continuous(&refs, 0);
        assert!((gain - 1.0).abs() < 1e-12);
        assert_eq!(threshold, Some(2.5));
    }

    #[test]
    fn test_continuous_single_value_is_never_selectable() {
        let rows: Vec<Row> = (0..4)
            .map(|i| Row::new(vec![Value::Continuous(7.0)], i % 2))
            .collect();
        let refs: Vec<&Row> = rows.iter().collect();
        assert_eq!(gain_continuous(&refs, 0), (-1.0, None));
    }

    #[test]
    fn test_learns_xor_exactly() {
        let tree = xor_tree();
        for (values, label) in [
            ([0, 0], 0),
            ([0, 1], 1),
            ([1, 0], 1),
            ([1, 1], 0),
        ] {
            let row: Vec<Value> = values.iter().map(|&v| Value::Discrete(v)).collect();
            assert_eq!(tree.predict(&row).unwrap(), (label, 1.0));
        }
    }

    #[test]
    fn test_xor_rules_have_both_premises() {
        let rules = xor_tree().build_rules().unwrap();
        assert_eq!(rules.len(), 4);
        assert!(rules.iter().all(|rule| rule.premises.len() == 2));
    }

    #[test]
    fn test_importance_normalizes_to_one() {
        let importance = xor_tree().importance(true).unwrap();
        let total: f64 = importance.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        // The root split on `a` has zero gain; everything lands on `b`
        assert!(importance[1] > importance[0]);
    }

    #[test]
    fn test_homogeneous_data_collapses_to_leaf() {
        let attrs = Attributes::uniform(vec!["a".to_string()], AttrKind::Discrete);
        let mut tree = Id3Tree::new(attrs, 0);
        tree.train(&discrete_rows(&[(&[0], 5), (&[1], 5), (&[0], 5)]));

        assert_eq!(tree.predict(&[Value::Discrete(7)]).unwrap(), (5, 1.0));
    }

    #[test]
    fn test_unseen_discrete_value_falls_back_to_default() {
        let attrs = Attributes::uniform(vec!["a".to_string()], AttrKind::Discrete);
        let mut tree = Id3Tree::new(attrs, 9);
        tree.train(&discrete_rows(&[(&[0], 0), (&[1], 1)]));

        assert_eq!(tree.predict(&[Value::Discrete(2)]).unwrap(), (9, 0.0));
    }

    #[test]
    fn test_mixed_schema_prefers_informative_attribute() {
        // A constant continuous attribute first, a separating discrete one
        // second: the split must land on the second
        let attrs = Attributes::new(
            vec!["noise".to_string(), "signal".to_string()],
            vec![AttrKind::Continuous, AttrKind::Discrete],
        );
        let rows: Vec<Row> = [(0i64, 0i64), (0, 0), (1, 1), (1, 1)]
            .iter()
            .map(|&(signal, label)| {
                Row::new(
                    vec![Value::Continuous(3.0), Value::Discrete(signal)],
                    label,
                )
            })
            .collect();

        let mut tree = Id3Tree::new(attrs, 0);
        tree.train(&rows);

        let importance = tree.importance(true).unwrap();
        assert_eq!(importance[0], 0.0);
        assert!((importance[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_untrained_tree_refuses_queries() {
        let tree = Id3Tree::new(Attributes::board(), 3);
        assert_eq!(
            tree.predict(&[Value::Discrete(0)]),
            Err(LearnError::UntrainedModel)
        );
        assert_eq!(tree.build_rules().err(), Some(LearnError::UntrainedModel));
        assert_eq!(tree.importance(true).err(), Some(LearnError::UntrainedModel));
    }

    #[test]
    fn test_wrong_row_width_is_rejected() {
        let tree = xor_tree();
        assert_eq!(
            tree.predict(&[Value::Discrete(0)]),
            Err(LearnError::RowWidth { expected: 2, got: 1 })
        );
    }
}
