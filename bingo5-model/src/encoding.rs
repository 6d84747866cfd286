use bingo5_db::models::{Draw, POOL_SIZE};

use crate::error::ModelError;

/// Largeur de la fenêtre d'encodage : les WINDOW tirages les plus récents.
pub const WINDOW: usize = 10;
/// Largeur fixe du vecteur de features : une entrée par numéro du vivier.
pub const FEATURE_WIDTH: usize = POOL_SIZE;

/// Encode les WINDOW tirages les plus récents en un vecteur de comptes de
/// largeur 40 : l'entrée i vaut le nombre d'apparitions du numéro i+1 dans la
/// fenêtre. draws[0] = le plus récent. Entraînement et prédiction passent
/// tous les deux par cette fonction, et uniquement par elle.
pub fn encode_window(draws: &[Draw]) -> Result<Vec<f64>, ModelError> {
    if draws.len() < WINDOW {
        return Err(ModelError::InsufficientHistory {
            required: WINDOW,
            available: draws.len(),
        });
    }

    let mut vector = vec![0.0f64; FEATURE_WIDTH];
    for draw in &draws[..WINDOW] {
        check_draw(draw)?;
        for &n in &draw.numbers {
            vector[(n - 1) as usize] += 1.0;
        }
    }
    Ok(vector)
}

/// Vecteur multi-hot du tirage : exactement 8 entrées à 1.0 sur 40.
pub fn multi_hot_label(draw: &Draw) -> Result<Vec<f64>, ModelError> {
    check_draw(draw)?;
    let mut label = vec![0.0f64; FEATURE_WIDTH];
    for &n in &draw.numbers {
        label[(n - 1) as usize] = 1.0;
    }
    Ok(label)
}

pub(crate) fn check_draw(draw: &Draw) -> Result<(), ModelError> {
    for &n in &draw.numbers {
        if n < 1 || n > POOL_SIZE as u8 {
            return Err(ModelError::MalformedDraw {
                draw_id: draw.draw_id.clone(),
                reason: format!("numéro {} hors limites (1-{})", n, POOL_SIZE),
            });
        }
    }
    for i in 0..draw.numbers.len() {
        for j in (i + 1)..draw.numbers.len() {
            if draw.numbers[i] == draw.numbers[j] {
                return Err(ModelError::MalformedDraw {
                    draw_id: draw.draw_id.clone(),
                    reason: format!("numéro en double : {}", draw.numbers[i]),
                });
            }
        }
    }
    Ok(())
}
