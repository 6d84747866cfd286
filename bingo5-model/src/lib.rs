pub mod artifact;
pub mod encoding;
pub mod error;
pub mod gbdt;
pub mod heuristics;
pub mod predictor;
pub mod stats;
pub mod trainer;

use bingo5_db::models::{Draw, PICK_COUNT};

/// Tirages synthétiques pour les tests : 5 motifs cycliques qui couvrent
/// ensemble les 40 numéros. L'indice 0 est traité comme le plus récent.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 5) as u8;
            let mut numbers = [0u8; PICK_COUNT];
            for (j, slot) in numbers.iter_mut().enumerate() {
                *slot = base * PICK_COUNT as u8 + j as u8 + 1;
            }
            Draw {
                draw_id: format!("{:04}", n - i),
                date: format!("2025-{:02}-{:02}", 12 - (i / 28) % 12, 28 - (i % 28)),
                numbers,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo5_db::models::validate_draw;

    #[test]
    fn test_make_test_draws_valid() {
        for draw in make_test_draws(20) {
            assert!(validate_draw(&draw.numbers).is_ok());
        }
    }

    #[test]
    fn test_make_test_draws_covers_pool() {
        let mut seen = [false; 40];
        for draw in make_test_draws(5) {
            for &n in &draw.numbers {
                seen[(n - 1) as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
