mod display;
mod import;
mod interactive;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bingo5_db::db::{count_draws, db_path, fetch_last_draws, insert_draw, migrate, open_db};
use bingo5_db::models::{validate_draw, Draw, PICK_COUNT, POOL_SIZE};
use bingo5_db::rusqlite::Connection;
use bingo5_model::artifact::{load_model, save_model};
use bingo5_model::error::ModelError;
use bingo5_model::heuristics::{
    balanced, consecutive_biased, date_seed, frequency_based, unseen_based, weighted_sample,
};
use bingo5_model::predictor::predict;
use bingo5_model::stats::{compute_stats, consecutive_incidence, frequency_ranking, unseen_numbers};
use bingo5_model::trainer::{train_with_progress, TrainConfig};

use crate::display::{
    display_draws, display_frequency_chart, display_import_summary, display_probabilities,
    display_stats, display_suggestions,
};

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum, Default)]
pub enum SuggestMode {
    /// Tirage parmi les numéros les plus fréquents
    #[default]
    Frequents,
    /// Numéros jamais sortis
    Inedits,
    /// Paire de numéros consécutifs forcée
    Consecutifs,
    /// Mélange numéros fréquents + aléatoire
    Equilibre,
    /// Modèle entraîné (gradient boosting)
    Modele,
}

fn mode_label(mode: SuggestMode) -> &'static str {
    match mode {
        SuggestMode::Frequents => "numéros fréquents",
        SuggestMode::Inedits => "numéros inédits",
        SuggestMode::Consecutifs => "paire consécutive",
        SuggestMode::Equilibre => "équilibré",
        SuggestMode::Modele => "modèle",
    }
}

#[derive(Parser)]
#[command(name = "bingo5", about = "Analyseur de tirages Bingo5 et générateur de grilles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "data/date_bingo5.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Statistiques d'apparition (fréquences, retards, numéros jamais sortis)
    Stats {
        /// Fenêtre d'analyse (défaut : tout l'historique)
        #[arg(short, long)]
        window: Option<u32>,
    },

    /// Entraîner le modèle du prochain tirage et sauvegarder l'artefact
    Train {
        /// Fichier de sortie de l'artefact
        #[arg(short, long, default_value = "model/bingo5_model.json")]
        output: PathBuf,

        /// Itérations de boosting par numéro
        #[arg(long, default_value = "30")]
        rounds: usize,

        /// Profondeur maximale des arbres
        #[arg(long, default_value = "3")]
        depth: usize,

        /// Taux d'apprentissage
        #[arg(long, default_value = "0.1")]
        learning_rate: f64,

        /// Seed d'entraînement
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Générer des grilles recommandées
    Suggest {
        /// Logique de génération
        #[arg(short, long, default_value = "frequents")]
        mode: SuggestMode,

        /// Nombre de grilles
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Seed pour la reproductibilité (défaut : date du jour YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,

        /// Artefact du modèle entraîné (mode modele)
        #[arg(long, default_value = "model/bingo5_model.json")]
        model: PathBuf,

        /// Taille du vivier des plus fréquents (mode frequents)
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Ajouter un tirage manuellement
    Add,

    /// Mode interactif (REPL)
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Train { output, rounds, depth, learning_rate, seed } => {
            cmd_train(&conn, &output, rounds, depth, learning_rate, seed)
        }
        Command::Suggest { mode, count, seed, model, top } => {
            cmd_suggest(&conn, mode, count, seed, &model, top)
        }
        Command::Add => cmd_add(&conn),
        Command::Interactive => interactive::run_interactive(&conn),
    }
}

pub(crate) fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

pub(crate) fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : bingo5 import");
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

pub(crate) fn cmd_stats(conn: &Connection, window: Option<u32>) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : bingo5 import");
    }
    let effective_window = window.unwrap_or(n).min(n);
    let draws = fetch_last_draws(conn, effective_window)?;

    let stats = compute_stats(&draws);
    let unseen = unseen_numbers(&stats);
    let incidence = consecutive_incidence(&draws);

    display_stats(&stats, &unseen, incidence, draws.len());
    display_frequency_chart(&stats);
    Ok(())
}

pub(crate) fn cmd_train(
    conn: &Connection,
    output: &Path,
    rounds: usize,
    depth: usize,
    learning_rate: f64,
    seed: u64,
) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : bingo5 import");
    }
    let draws = fetch_last_draws(conn, n)?;
    let config = TrainConfig { n_rounds: rounds, max_depth: depth, learning_rate, seed };

    println!("Entraînement de {} classifieurs sur {} tirages...", POOL_SIZE, draws.len());

    let pb = ProgressBar::new(POOL_SIZE as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("=> "));

    let model = train_with_progress(&draws, &config, |done| {
        pb.set_position(done as u64);
        pb.set_message(format!("numéro {}", done));
    })?;
    pb.finish_with_message("Entraînement terminé");

    save_model(&model, output)?;
    println!("Modèle sauvegardé dans : {}", output.display());
    Ok(())
}

pub(crate) fn cmd_suggest(
    conn: &Connection,
    mode: SuggestMode,
    count: usize,
    seed: Option<u64>,
    model_path: &Path,
    top: usize,
) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : bingo5 import");
    }
    let draws = fetch_last_draws(conn, n)?;

    let effective_seed = seed.unwrap_or_else(|| {
        let ds = date_seed();
        println!("(Seed du jour : {ds})");
        ds
    });
    let mut rng = StdRng::seed_from_u64(effective_seed);

    if mode == SuggestMode::Modele {
        return suggest_from_model(&draws, count, model_path, &mut rng);
    }

    let stats = compute_stats(&draws);
    let grids: Vec<[u8; PICK_COUNT]> = match mode {
        SuggestMode::Frequents => {
            let ranking = frequency_ranking(&stats);
            (0..count).map(|_| frequency_based(&ranking, top, &mut rng)).collect()
        }
        SuggestMode::Inedits => {
            let unseen = unseen_numbers(&stats);
            (0..count).map(|_| unseen_based(&unseen, &mut rng)).collect()
        }
        SuggestMode::Consecutifs => (0..count).map(|_| consecutive_biased(&mut rng)).collect(),
        SuggestMode::Equilibre => {
            let ranking = frequency_ranking(&stats);
            (0..count).map(|_| balanced(&ranking, &mut rng)).collect()
        }
        SuggestMode::Modele => unreachable!(),
    };

    display_suggestions(mode_label(mode), &grids);
    Ok(())
}

fn suggest_from_model(draws: &[Draw], count: usize, model_path: &Path, rng: &mut StdRng) -> Result<()> {
    let model = match load_model(model_path) {
        Ok(model) => model,
        Err(e @ ModelError::ModelNotFound { .. }) => {
            println!("{e}");
            println!("Lancez d'abord : bingo5 train. Les autres modes restent disponibles.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let prediction = predict(&model, draws)?;
    display_probabilities(&prediction.probabilities);

    // Première grille : le top 8 déterministe du modèle. Les suivantes sont
    // tirées sans remise, pondérées par la distribution prédite.
    let mut grids = vec![prediction.numbers];
    for _ in 1..count {
        grids.push(weighted_sample(&prediction.probabilities, rng)?);
    }

    display_suggestions(mode_label(SuggestMode::Modele), &grids);
    Ok(())
}

pub(crate) fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let draw_id = prompt("Identifiant du tirage (ex: 0815) : ")?;
    let raw_date = prompt("Date (AAAA/MM/JJ) : ")?;

    let date_parts: Vec<&str> = raw_date.split('/').collect();
    if date_parts.len() != 3 {
        bail!("Format de date invalide");
    }
    let date = format!("{}-{:0>2}-{:0>2}", date_parts[0], date_parts[1], date_parts[2]);

    let numbers = prompt_numbers()?;
    validate_draw(&numbers)?;

    let draw = Draw { draw_id, date, numbers };

    println!("\nTirage à insérer :");
    display_draws(&[draw.clone()]);

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

pub(crate) fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

pub(crate) fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

pub(crate) fn prompt_numbers() -> Result<[u8; PICK_COUNT]> {
    loop {
        let input = prompt("8 numéros (séparés par des espaces, 1-40) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == PICK_COUNT => {
                let mut arr = [0u8; PICK_COUNT];
                arr.copy_from_slice(&v);
                if validate_draw(&arr).is_ok() {
                    return Ok(arr);
                }
                println!("Numéros invalides (1-40, pas de doublons). Réessayez.");
            }
            _ => println!("Entrez exactement 8 numéros. Réessayez."),
        }
    }
}
