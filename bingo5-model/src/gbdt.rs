use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Classifieur binaire par gradient boosting : arbres de régression ajustés
/// sur les gradients de la perte logistique, sortie en probabilité.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gbdt {
    pub base_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf { value: f64 },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct GbdtParams {
    pub n_rounds: usize,
    pub max_depth: usize,
    pub learning_rate: f64,
    pub seed: u64,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self { n_rounds: 30, max_depth: 3, learning_rate: 0.1, seed: 42 }
    }
}

pub fn fit(features: &[Vec<f64>], labels: &[f64], params: &GbdtParams) -> Gbdt {
    // Score initial : log-odds du taux de base, borné pour éviter log(0)
    let n = labels.len().max(1) as f64;
    let rate = (labels.iter().sum::<f64>() / n).clamp(1e-6, 1.0 - 1e-6);
    let base_score = (rate / (1.0 - rate)).ln();

    let mut gbdt = Gbdt {
        base_score,
        learning_rate: params.learning_rate,
        trees: Vec::with_capacity(params.n_rounds),
    };
    if features.is_empty() {
        return gbdt;
    }

    let n_features = features[0].len();
    let features_per_split = ((n_features as f64).sqrt().ceil() as usize).max(1);

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut scores = vec![base_score; labels.len()];
    let refs: Vec<&Vec<f64>> = features.iter().collect();

    for _ in 0..params.n_rounds {
        let gradients: Vec<f64> = scores
            .iter()
            .zip(labels)
            .map(|(&s, &y)| y - sigmoid(s))
            .collect();
        let hessians: Vec<f64> = scores
            .iter()
            .map(|&s| {
                let p = sigmoid(s);
                (p * (1.0 - p)).max(1e-6)
            })
            .collect();

        let tree = build_tree(&refs, &gradients, &hessians, params.max_depth, features_per_split, &mut rng);

        for (i, feat) in features.iter().enumerate() {
            scores[i] += params.learning_rate * predict_tree(&tree, feat);
        }
        gbdt.trees.push(tree);
    }

    gbdt
}

impl Gbdt {
    /// Probabilité que le label vaille 1 pour ce vecteur de features.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        let mut score = self.base_score;
        for tree in &self.trees {
            score += self.learning_rate * predict_tree(tree, features);
        }
        sigmoid(score)
    }
}

fn build_tree(
    features: &[&Vec<f64>],
    gradients: &[f64],
    hessians: &[f64],
    max_depth: usize,
    features_per_split: usize,
    rng: &mut StdRng,
) -> TreeNode {
    if max_depth == 0 || gradients.len() < 4 {
        return leaf(gradients, hessians);
    }

    // Gradients quasi constants : rien à découper
    let first = gradients[0];
    if gradients.iter().all(|&g| (g - first).abs() < 1e-10) {
        return leaf(gradients, hessians);
    }

    let n_features = features[0].len();
    let mut feature_indices: Vec<usize> = (0..n_features).collect();
    feature_indices.shuffle(rng);
    feature_indices.truncate(features_per_split);

    let mut best_sse = f64::MAX;
    let mut best_feature = 0;
    let mut best_threshold = 0.0;

    for &feat_idx in &feature_indices {
        let mut values: Vec<f64> = features.iter().map(|f| f[feat_idx]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();

        if values.len() < 2 {
            continue;
        }

        // Seuils entre valeurs consécutives (échantillonnés pour la performance)
        let step = (values.len() / 10).max(1);
        for i in (0..values.len() - 1).step_by(step) {
            let threshold = (values[i] + values[i + 1]) / 2.0;
            let sse = split_sse(features, gradients, feat_idx, threshold);

            if sse < best_sse {
                best_sse = sse;
                best_feature = feat_idx;
                best_threshold = threshold;
            }
        }
    }

    if best_sse >= total_sse(gradients) {
        return leaf(gradients, hessians);
    }

    let mut left_features = Vec::new();
    let mut left_gradients = Vec::new();
    let mut left_hessians = Vec::new();
    let mut right_features = Vec::new();
    let mut right_gradients = Vec::new();
    let mut right_hessians = Vec::new();

    for (i, feat) in features.iter().enumerate() {
        if feat[best_feature] <= best_threshold {
            left_features.push(*feat);
            left_gradients.push(gradients[i]);
            left_hessians.push(hessians[i]);
        } else {
            right_features.push(*feat);
            right_gradients.push(gradients[i]);
            right_hessians.push(hessians[i]);
        }
    }

    if left_features.is_empty() || right_features.is_empty() {
        return leaf(gradients, hessians);
    }

    TreeNode::Split {
        feature_idx: best_feature,
        threshold: best_threshold,
        left: Box::new(build_tree(&left_features, &left_gradients, &left_hessians, max_depth - 1, features_per_split, rng)),
        right: Box::new(build_tree(&right_features, &right_gradients, &right_hessians, max_depth - 1, features_per_split, rng)),
    }
}

fn leaf(gradients: &[f64], hessians: &[f64]) -> TreeNode {
    TreeNode::Leaf { value: leaf_value(gradients, hessians) }
}

// Pas de Newton : somme des gradients sur somme des hessiennes, régularisé.
fn leaf_value(gradients: &[f64], hessians: &[f64]) -> f64 {
    let g: f64 = gradients.iter().sum();
    let h: f64 = hessians.iter().sum();
    (g / (h + 1.0)).clamp(-4.0, 4.0)
}

fn total_sse(gradients: &[f64]) -> f64 {
    if gradients.is_empty() {
        return 0.0;
    }
    let mean = gradients.iter().sum::<f64>() / gradients.len() as f64;
    gradients.iter().map(|g| (g - mean).powi(2)).sum()
}

fn split_sse(features: &[&Vec<f64>], gradients: &[f64], feature_idx: usize, threshold: f64) -> f64 {
    let mut left = Vec::new();
    let mut right = Vec::new();

    for (i, feat) in features.iter().enumerate() {
        if feat[feature_idx] <= threshold {
            left.push(gradients[i]);
        } else {
            right.push(gradients[i]);
        }
    }

    if left.is_empty() || right.is_empty() {
        return f64::MAX;
    }

    total_sse(&left) + total_sse(&right)
}

fn predict_tree(node: &TreeNode, features: &[f64]) -> f64 {
    match node {
        TreeNode::Leaf { value } => *value,
        TreeNode::Split { feature_idx, threshold, left, right } => {
            if features[*feature_idx] <= *threshold {
                predict_tree(left, features)
            } else {
                predict_tree(right, features)
            }
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold_dataset() -> (Vec<Vec<f64>>, Vec<f64>) {
        let features: Vec<Vec<f64>> = (0..200).map(|i| vec![i as f64 / 200.0]).collect();
        let labels: Vec<f64> = features
            .iter()
            .map(|f| if f[0] > 0.5 { 1.0 } else { 0.0 })
            .collect();
        (features, labels)
    }

    #[test]
    fn test_gbdt_learns_threshold() {
        let (features, labels) = threshold_dataset();
        let model = fit(&features, &labels, &GbdtParams { n_rounds: 20, max_depth: 2, ..GbdtParams::default() });

        assert!(model.predict_proba(&[0.9]) > 0.7, "proba haute attendue : {}", model.predict_proba(&[0.9]));
        assert!(model.predict_proba(&[0.1]) < 0.3, "proba basse attendue : {}", model.predict_proba(&[0.1]));
    }

    #[test]
    fn test_gbdt_proba_in_unit_interval() {
        let (features, labels) = threshold_dataset();
        let model = fit(&features, &labels, &GbdtParams::default());

        for x in [-10.0, 0.0, 0.5, 1.0, 10.0] {
            let p = model.predict_proba(&[x]);
            assert!(p > 0.0 && p < 1.0, "proba hors (0,1) : {}", p);
        }
    }

    #[test]
    fn test_gbdt_constant_labels() {
        let features: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64]).collect();
        let labels = vec![0.0; 50];
        let model = fit(&features, &labels, &GbdtParams::default());
        assert!(model.predict_proba(&[25.0]) < 0.05);

        let labels = vec![1.0; 50];
        let model = fit(&features, &labels, &GbdtParams::default());
        assert!(model.predict_proba(&[25.0]) > 0.95);
    }

    #[test]
    fn test_gbdt_deterministic_for_seed() {
        let (features, labels) = threshold_dataset();
        let a = fit(&features, &labels, &GbdtParams { seed: 7, ..GbdtParams::default() });
        let b = fit(&features, &labels, &GbdtParams { seed: 7, ..GbdtParams::default() });

        for x in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(a.predict_proba(&[x]), b.predict_proba(&[x]));
        }
    }

    #[test]
    fn test_gbdt_empty_training_set() {
        let model = fit(&[], &[], &GbdtParams::default());
        assert!(model.trees.is_empty());
        let p = model.predict_proba(&[1.0]);
        assert!(p > 0.0 && p < 1.0);
    }
}
