use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::Plot;

use bingo5_db::models::{Draw, NumberStats, PICK_COUNT, POOL_SIZE};

use crate::import::ImportResult;

pub fn display_draws(draws: &[Draw]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéros"]);

    for draw in draws {
        let mut sorted = draw.numbers;
        sorted.sort();
        let numbers_str = sorted
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        table.add_row(vec![&draw.draw_id, &draw.date, &numbers_str]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé : {} lignes lues", result.total_records);
    println!("  insérées        : {}", result.inserted);
    println!("  doublons ignorés : {}", result.skipped);
    println!("  erreurs          : {}", result.errors);
}

pub fn display_stats(stats: &[NumberStats], unseen: &[u8], consecutive: usize, n_draws: usize) {
    println!("\n== Statistiques d'apparition ({} tirages) ==\n", n_draws);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", "Retard"]);

    let mut sorted: Vec<&NumberStats> = stats.iter().collect();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        table.add_row(vec![
            format!("{:2}", stat.number),
            format!("{}", stat.frequency),
            format!("{}", stat.gap),
        ]);
    }
    println!("{table}");

    if unseen.is_empty() {
        println!("\nNuméros jamais sortis : aucun");
    } else {
        let unseen_str = unseen
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join("  ");
        println!("\nNuméros jamais sortis : {}", unseen_str);
    }

    println!(
        "Tirages avec au moins une paire consécutive : {}/{}",
        consecutive, n_draws
    );
}

pub fn display_frequency_chart(stats: &[NumberStats]) {
    println!("\n== Fréquences par numéro ==\n");

    let points: Vec<(f32, f32)> = stats
        .iter()
        .map(|s| (s.number as f32, s.frequency as f32))
        .collect();

    let max_freq = stats.iter().map(|s| s.frequency).max().unwrap_or(0) as f32;

    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 1.0, POOL_SIZE as f32, 0.0, max_freq + 1.0);
    println!("{}", chart.lineplot(&shape));
}

pub fn display_probabilities(probs: &[f64]) {
    let top_n = 15;
    println!("\n── Top {} numéros (modèle) ──", top_n);

    let mut indices: Vec<usize> = (0..probs.len()).collect();
    indices.sort_by(|&a, &b| {
        probs[b]
            .partial_cmp(&probs[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Probabilité", ""]);

    let max_prob = indices.first().map(|&i| probs[i]).unwrap_or(0.0).max(1e-12);
    for &idx in indices.iter().take(top_n) {
        let bar = "█".repeat((probs[idx] / max_prob * 20.0).round() as usize);
        table.add_row(vec![
            format!("{:2}", idx + 1),
            format!("{:.4}", probs[idx]),
            bar,
        ]);
    }
    println!("{table}");
}

pub fn display_suggestions(label: &str, grids: &[[u8; PICK_COUNT]]) {
    println!("\n== Grilles recommandées ({}) ==\n", label);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros"]);

    for (i, grid) in grids.iter().enumerate() {
        let numbers_str = grid
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        if i == 0 {
            table.add_row(vec![
                Cell::new(format!("{}", i + 1)).fg(Color::Green),
                Cell::new(&numbers_str).fg(Color::Green),
            ]);
        } else {
            table.add_row(vec![
                Cell::new(format!("{}", i + 1)),
                Cell::new(&numbers_str),
            ]);
        }
    }
    println!("{table}");
}
