use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;

use bingo5_db::rusqlite::Connection;

use crate::SuggestMode;
use crate::{prompt, prompt_with_default};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Suggest,
    Stats,
    Train,
    History,
    Add,
    Import,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "suggerer" | "suggérer" | "suggest" | "sug" => Some(InteractiveCommand::Suggest),
        "2" | "stats" | "statistiques" | "st" => Some(InteractiveCommand::Stats),
        "3" | "entrainer" | "entraîner" | "train" => Some(InteractiveCommand::Train),
        "4" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "5" | "ajouter" | "add" => Some(InteractiveCommand::Add),
        "6" | "importer" | "import" | "imp" => Some(InteractiveCommand::Import),
        "7" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Mode interactif ──");
    println!("  1. suggerer   Générer des grilles recommandées");
    println!("  2. stats      Statistiques d'apparition");
    println!("  3. entrainer  Entraîner le modèle");
    println!("  4. historique Derniers tirages");
    println!("  5. ajouter    Ajouter un tirage");
    println!("  6. importer   Importer un CSV");
    println!("  7. quitter    Quitter");
    println!();
}

fn cmd_suggest_interactive(conn: &Connection) -> Result<()> {
    let mode_str = prompt_with_default(
        "Mode (frequents/inedits/consecutifs/equilibre/modele)",
        "frequents",
    )?;
    let mode = SuggestMode::from_str(&mode_str, true)
        .map_err(|e| anyhow::anyhow!("Mode invalide : {e}"))?;

    let count_str = prompt_with_default("Nombre de grilles", "5")?;
    let count: usize = count_str.parse().context("Nombre invalide")?;

    let seed_str = prompt_with_default("Seed (vide = date du jour)", "")?;
    let seed: Option<u64> = if seed_str.is_empty() {
        None
    } else {
        Some(seed_str.parse().context("Seed invalide")?)
    };

    super::cmd_suggest(conn, mode, count, seed, &PathBuf::from("model/bingo5_model.json"), 20)
}

fn cmd_stats_interactive(conn: &Connection) -> Result<()> {
    let window_str = prompt_with_default("Fenêtre d'analyse (vide = tout)", "")?;
    let window: Option<u32> = if window_str.is_empty() {
        None
    } else {
        Some(window_str.parse().context("Fenêtre invalide")?)
    };
    super::cmd_stats(conn, window)
}

fn cmd_train_interactive(conn: &Connection) -> Result<()> {
    let output = prompt_with_default("Fichier de sortie", "model/bingo5_model.json")?;
    let rounds_str = prompt_with_default("Itérations de boosting", "30")?;
    let rounds: usize = rounds_str.parse().context("Nombre invalide")?;
    super::cmd_train(conn, &PathBuf::from(output), rounds, 3, 0.1, 42)
}

fn cmd_history_interactive(conn: &Connection) -> Result<()> {
    let n_str = prompt_with_default("Nombre de tirages", "10")?;
    let n: u32 = n_str.parse().context("Nombre invalide")?;
    super::cmd_list(conn, n)
}

fn cmd_import_interactive(conn: &Connection) -> Result<()> {
    let file = prompt_with_default("Fichier CSV", "data/date_bingo5.csv")?;
    super::cmd_import(conn, &PathBuf::from(file))
}

pub fn run_interactive(conn: &Connection) -> Result<()> {
    println!("Bienvenue dans le mode interactif de bingo5 !");

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Suggest) => {
                if let Err(e) = cmd_suggest_interactive(conn) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Stats) => {
                if let Err(e) = cmd_stats_interactive(conn) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Train) => {
                if let Err(e) = cmd_train_interactive(conn) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::History) => {
                if let Err(e) = cmd_history_interactive(conn) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Add) => {
                if let Err(e) = super::cmd_add(conn) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Import) => {
                if let Err(e) = cmd_import_interactive(conn) {
                    println!("Erreur: {e:#}");
                }
            }
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-7) ou un nom de commande.", input);
            }
        }
    }

    Ok(())
}
