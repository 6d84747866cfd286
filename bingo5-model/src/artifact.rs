use std::path::Path;

use anyhow::{Context, Result};

use crate::encoding::FEATURE_WIDTH;
use crate::error::ModelError;
use crate::trainer::NextDrawModel;

pub fn save_model(model: &NextDrawModel, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
        }
    }
    let json = serde_json::to_string(model)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire l'artefact {:?}", path))?;
    Ok(())
}

/// Charge l'artefact en lecture seule et vérifie le contrat de forme : la
/// largeur de features enregistrée doit correspondre à celle de l'encodeur.
pub fn load_model(path: &Path) -> Result<NextDrawModel, ModelError> {
    if !path.exists() {
        return Err(ModelError::ModelNotFound { path: path.to_path_buf() });
    }

    let json = std::fs::read_to_string(path)
        .map_err(|e| ModelError::CorruptArtifact { reason: e.to_string() })?;
    let model: NextDrawModel = serde_json::from_str(&json)
        .map_err(|e| ModelError::CorruptArtifact { reason: e.to_string() })?;

    if model.feature_width != FEATURE_WIDTH {
        return Err(ModelError::ModelShapeMismatch {
            expected: model.feature_width,
            actual: FEATURE_WIDTH,
        });
    }
    if model.classifiers.len() != model.feature_width {
        return Err(ModelError::CorruptArtifact {
            reason: format!(
                "{} classifieurs pour une largeur de {}",
                model.classifiers.len(),
                model.feature_width
            ),
        });
    }

    Ok(model)
}
