use std::path::PathBuf;
use thiserror::Error;

/// Conditions d'échec du pipeline de prédiction. Toutes sont récupérables au
/// niveau de la requête : l'appelant affiche un message et continue.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Historique insuffisant : {required} tirages requis, {available} disponibles")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Tirage {draw_id} invalide : {reason}")]
    MalformedDraw { draw_id: String, reason: String },

    #[error("Données d'entraînement insuffisantes : au moins {required} tirages requis, {available} disponibles")]
    InsufficientTrainingData { required: usize, available: usize },

    #[error("Modèle introuvable : {}", .path.display())]
    ModelNotFound { path: PathBuf },

    #[error("Artefact de modèle illisible : {reason}")]
    CorruptArtifact { reason: String },

    #[error("Largeur de features incompatible : le modèle attend {expected}, obtenu {actual}")]
    ModelShapeMismatch { expected: usize, actual: usize },

    #[error("Prédiction ambiguë : {count} numéros prédits positifs au lieu de {expected}")]
    AmbiguousPrediction { count: usize, expected: usize },
}
