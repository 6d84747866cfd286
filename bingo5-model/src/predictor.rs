use bingo5_db::models::{Draw, PICK_COUNT};

use crate::encoding::encode_window;
use crate::error::ModelError;
use crate::trainer::NextDrawModel;

/// Résultat d'une prédiction : la grille retenue et la distribution complète
/// des probabilités par numéro (indice i = numéro i+1).
#[derive(Debug, Clone)]
pub struct Prediction {
    pub numbers: [u8; PICK_COUNT],
    pub probabilities: Vec<f64>,
}

/// Fonction pure de (modèle, fenêtre) : encode la fenêtre avec l'encodeur
/// partagé, vérifie la forme attendue par le modèle, interroge les 40
/// classifieurs puis retient les 8 numéros les mieux classés.
pub fn predict(model: &NextDrawModel, draws: &[Draw]) -> Result<Prediction, ModelError> {
    let features = encode_window(draws)?;
    if features.len() != model.feature_width {
        return Err(ModelError::ModelShapeMismatch {
            expected: model.feature_width,
            actual: features.len(),
        });
    }

    let probabilities: Vec<f64> = model
        .classifiers
        .iter()
        .map(|c| c.predict_proba(&features))
        .collect();

    let top = select_top_k(&probabilities, PICK_COUNT);
    let mut numbers = [0u8; PICK_COUNT];
    numbers.copy_from_slice(&top);

    Ok(Prediction { numbers, probabilities })
}

/// Variante multi-hot : seuil à 0.5 sur chaque classifieur, puis repli sur le
/// classement par probabilité si le compte n'est pas exactement 8.
pub fn predict_multi_hot(model: &NextDrawModel, draws: &[Draw]) -> Result<Vec<u8>, ModelError> {
    let prediction = predict(model, draws)?;
    let labels: Vec<f64> = prediction
        .probabilities
        .iter()
        .map(|&p| if p >= 0.5 { 1.0 } else { 0.0 })
        .collect();
    from_multi_hot(&labels, Some(&prediction.probabilities), PICK_COUNT)
}

/// Les k meilleurs numéros par probabilité décroissante, égalités départagées
/// par numéro croissant ; résultat trié croissant. Déterministe : deux appels
/// sur la même distribution rendent exactement la même grille.
pub fn select_top_k(probs: &[f64], k: usize) -> Vec<u8> {
    let mut indices: Vec<usize> = (0..probs.len()).collect();
    indices.sort_by(|&a, &b| {
        probs[b]
            .partial_cmp(&probs[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut selected: Vec<u8> = indices.iter().take(k).map(|&i| (i + 1) as u8).collect();
    selected.sort();
    selected
}

/// Sortie multi-hot directe : les positions prédites positives. Si leur compte
/// diffère de k, repli sur le classement quand les probabilités sont
/// disponibles, sinon la prédiction est ambiguë.
pub fn from_multi_hot(labels: &[f64], probs: Option<&[f64]>, k: usize) -> Result<Vec<u8>, ModelError> {
    let positives: Vec<u8> = labels
        .iter()
        .enumerate()
        .filter(|(_, &v)| v >= 0.5)
        .map(|(i, _)| (i + 1) as u8)
        .collect();

    if positives.len() == k {
        return Ok(positives);
    }

    match probs {
        Some(p) => Ok(select_top_k(p, k)),
        None => Err(ModelError::AmbiguousPrediction {
            count: positives.len(),
            expected: k,
        }),
    }
}
