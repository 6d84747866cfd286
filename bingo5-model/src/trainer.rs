use serde::{Deserialize, Serialize};

use bingo5_db::models::Draw;

use crate::encoding::{encode_window, multi_hot_label, FEATURE_WIDTH, WINDOW};
use crate::error::ModelError;
use crate::gbdt::{self, Gbdt, GbdtParams};

/// Modèle du prochain tirage : un classifieur binaire par numéro (un contre
/// tous, 40 au total). La largeur de features et la fenêtre sont persistées
/// avec les arbres et vérifiées au chargement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextDrawModel {
    pub feature_width: usize,
    pub window: usize,
    pub classifiers: Vec<Gbdt>,
}

#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    pub n_rounds: usize,
    pub max_depth: usize,
    pub learning_rate: f64,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self { n_rounds: 30, max_depth: 3, learning_rate: 0.1, seed: 42 }
    }
}

/// Construit les paires supervisées par fenêtre glissante. draws[0] = le plus
/// récent ; pour chaque cible t, la fenêtre est constituée des WINDOW tirages
/// strictement après t (plus anciens), le label est le tirage t lui-même.
pub fn build_training_pairs(draws: &[Draw]) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), ModelError> {
    if draws.len() <= WINDOW {
        return Err(ModelError::InsufficientTrainingData {
            required: WINDOW + 1,
            available: draws.len(),
        });
    }

    let mut features = Vec::with_capacity(draws.len() - WINDOW);
    let mut labels = Vec::with_capacity(draws.len() - WINDOW);

    for t in 0..draws.len() - WINDOW {
        features.push(encode_window(&draws[t + 1..t + 1 + WINDOW])?);
        labels.push(multi_hot_label(&draws[t])?);
    }

    Ok((features, labels))
}

pub fn train(draws: &[Draw], config: &TrainConfig) -> Result<NextDrawModel, ModelError> {
    train_with_progress(draws, config, |_| {})
}

/// Entraîne les 40 classifieurs ; `on_classifier` est appelé après chacun
/// (1..=40), ce qui permet à l'appelant d'afficher une progression.
pub fn train_with_progress<F>(
    draws: &[Draw],
    config: &TrainConfig,
    mut on_classifier: F,
) -> Result<NextDrawModel, ModelError>
where
    F: FnMut(usize),
{
    let (features, labels) = build_training_pairs(draws)?;

    let mut classifiers = Vec::with_capacity(FEATURE_WIDTH);
    for number_idx in 0..FEATURE_WIDTH {
        let binary_labels: Vec<f64> = labels.iter().map(|l| l[number_idx]).collect();
        let params = GbdtParams {
            n_rounds: config.n_rounds,
            max_depth: config.max_depth,
            learning_rate: config.learning_rate,
            // un seed distinct et reproductible par numéro
            seed: config.seed.wrapping_add(number_idx as u64),
        };
        classifiers.push(gbdt::fit(&features, &binary_labels, &params));
        on_classifier(number_idx + 1);
    }

    Ok(NextDrawModel {
        feature_width: FEATURE_WIDTH,
        window: WINDOW,
        classifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_draws;

    fn quick_config() -> TrainConfig {
        TrainConfig { n_rounds: 5, max_depth: 2, ..TrainConfig::default() }
    }

    #[test]
    fn test_training_pairs_count_and_shape() {
        let draws = make_test_draws(15);
        let (features, labels) = build_training_pairs(&draws).unwrap();
        assert_eq!(features.len(), 5);
        assert_eq!(labels.len(), 5);
        for f in &features {
            assert_eq!(f.len(), FEATURE_WIDTH);
            assert_eq!(f.iter().sum::<f64>(), 80.0);
        }
        for l in &labels {
            assert_eq!(l.iter().sum::<f64>(), 8.0);
        }
    }

    #[test]
    fn test_training_pairs_use_shared_encoder() {
        let draws = make_test_draws(15);
        let (features, _) = build_training_pairs(&draws).unwrap();
        // la première paire encode la fenêtre qui suit la cible la plus récente
        assert_eq!(features[0], encode_window(&draws[1..11]).unwrap());
        assert_eq!(features[4], encode_window(&draws[5..15]).unwrap());
    }

    #[test]
    fn test_train_insufficient_data() {
        let draws = make_test_draws(10);
        match train(&draws, &quick_config()) {
            Err(ModelError::InsufficientTrainingData { required, available }) => {
                assert_eq!(required, WINDOW + 1);
                assert_eq!(available, 10);
            }
            _ => panic!("attendu InsufficientTrainingData"),
        }
    }

    #[test]
    fn test_train_produces_full_model() {
        let draws = make_test_draws(25);
        let model = train(&draws, &quick_config()).unwrap();
        assert_eq!(model.feature_width, FEATURE_WIDTH);
        assert_eq!(model.window, WINDOW);
        assert_eq!(model.classifiers.len(), 40);
    }

    #[test]
    fn test_train_progress_callback() {
        let draws = make_test_draws(25);
        let mut ticks = Vec::new();
        train_with_progress(&draws, &quick_config(), |done| ticks.push(done)).unwrap();
        assert_eq!(ticks.len(), 40);
        assert_eq!(ticks[0], 1);
        assert_eq!(*ticks.last().unwrap(), 40);
    }
}
