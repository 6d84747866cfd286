use anyhow::Result;
use chrono::Datelike;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;

use bingo5_db::models::{PICK_COUNT, POOL_SIZE};

/// Génère un seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// 8 numéros tirés uniformément, sans remise, parmi les top_n plus fréquents.
/// Si le classement compte moins de 8 numéros, complète uniformément parmi
/// les numéros restants.
pub fn frequency_based(ranking: &[u8], top_n: usize, rng: &mut StdRng) -> [u8; PICK_COUNT] {
    let n = top_n.max(PICK_COUNT).min(ranking.len());
    let mut numbers = sample_from(&ranking[..n], PICK_COUNT, rng);
    fill_uniform(&mut numbers, rng);
    numbers.sort();
    to_array(&numbers)
}

/// Mode numéros jamais sortis : 8 parmi eux s'ils sont assez nombreux, sinon
/// tous les inédits complétés uniformément parmi les numéros déjà vus.
pub fn unseen_based(unseen: &[u8], rng: &mut StdRng) -> [u8; PICK_COUNT] {
    let mut numbers = if unseen.len() >= PICK_COUNT {
        sample_from(unseen, PICK_COUNT, rng)
    } else {
        unseen.to_vec()
    };
    fill_uniform(&mut numbers, rng);
    numbers.sort();
    to_array(&numbers)
}

/// Paire consécutive forcée : une base b dans [1, 39], {b, b+1} imposés, le
/// reste tiré uniformément parmi les 38 autres numéros.
pub fn consecutive_biased(rng: &mut StdRng) -> [u8; PICK_COUNT] {
    let base = rng.random_range(1..POOL_SIZE as u8);
    let mut numbers = vec![base, base + 1];
    fill_uniform(&mut numbers, rng);
    numbers.sort();
    to_array(&numbers)
}

/// Mode équilibré : 4 numéros parmi les 25 plus fréquents, 4 au hasard parmi
/// tous les autres.
pub fn balanced(ranking: &[u8], rng: &mut StdRng) -> [u8; PICK_COUNT] {
    let n = 25.min(ranking.len());
    let mut numbers = sample_from(&ranking[..n], PICK_COUNT / 2, rng);
    fill_uniform(&mut numbers, rng);
    numbers.sort();
    to_array(&numbers)
}

/// Tire une grille pondérée par une distribution de probabilités par numéro,
/// sans remise (indice i = numéro i+1).
pub fn weighted_sample(probs: &[f64], rng: &mut StdRng) -> Result<[u8; PICK_COUNT]> {
    let mut available: Vec<(u8, f64)> = probs
        .iter()
        .enumerate()
        .map(|(i, &p)| ((i + 1) as u8, p.max(1e-12)))
        .collect();
    let mut selected = Vec::with_capacity(PICK_COUNT);

    for _ in 0..PICK_COUNT {
        let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&weights)?;
        let idx = dist.sample(rng);

        let (number, _) = available.remove(idx);
        selected.push(number);
    }

    selected.sort();
    Ok(to_array(&selected))
}

// Tirage uniforme sans remise : mélange puis tronque.
fn sample_from(pool: &[u8], count: usize, rng: &mut StdRng) -> Vec<u8> {
    let mut pool = pool.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

// Complète jusqu'à 8 numéros, uniformément parmi ceux pas encore retenus.
fn fill_uniform(numbers: &mut Vec<u8>, rng: &mut StdRng) {
    if numbers.len() >= PICK_COUNT {
        return;
    }
    let rest: Vec<u8> = (1..=POOL_SIZE as u8).filter(|n| !numbers.contains(n)).collect();
    let fill = sample_from(&rest, PICK_COUNT - numbers.len(), rng);
    numbers.extend(fill);
}

fn to_array(numbers: &[u8]) -> [u8; PICK_COUNT] {
    let mut arr = [0u8; PICK_COUNT];
    arr.copy_from_slice(numbers);
    arr
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn assert_valid_grid(numbers: &[u8; PICK_COUNT]) {
        for w in numbers.windows(2) {
            assert!(w[0] < w[1], "grille non triée ou doublon : {:?}", numbers);
        }
        assert!(numbers.iter().all(|&n| (1..=40).contains(&n)), "hors limites : {:?}", numbers);
    }

    fn full_ranking() -> Vec<u8> {
        (1..=POOL_SIZE as u8).collect()
    }

    #[test]
    fn test_all_modes_produce_valid_grids() {
        let ranking = full_ranking();
        let unseen: Vec<u8> = (1..=12).collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_valid_grid(&frequency_based(&ranking, 20, &mut rng));
            assert_valid_grid(&unseen_based(&unseen, &mut rng));
            assert_valid_grid(&consecutive_biased(&mut rng));
            assert_valid_grid(&balanced(&ranking, &mut rng));
        }
    }

    #[test]
    fn test_frequency_stays_in_top_pool() {
        let ranking = full_ranking();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let grid = frequency_based(&ranking, 20, &mut rng);
            assert!(grid.iter().all(|&n| n <= 20), "hors du vivier des 20 premiers : {:?}", grid);
        }
    }

    #[test]
    fn test_unseen_strict_subset_when_enough() {
        let unseen: Vec<u8> = (5..=20).collect();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let grid = unseen_based(&unseen, &mut rng);
            assert!(grid.iter().all(|n| unseen.contains(n)), "numéro déjà vu dans {:?}", grid);
        }
    }

    #[test]
    fn test_unseen_fills_from_seen() {
        let unseen = vec![7, 13, 31];
        let mut rng = StdRng::seed_from_u64(42);
        let grid = unseen_based(&unseen, &mut rng);
        assert_valid_grid(&grid);
        for n in &unseen {
            assert!(grid.contains(n), "inédit {} absent de {:?}", n, grid);
        }
    }

    #[test]
    fn test_consecutive_always_has_adjacent_pair() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = consecutive_biased(&mut rng);
            assert!(
                grid.windows(2).any(|w| w[1] - w[0] == 1),
                "pas de paire consécutive dans {:?}",
                grid
            );
        }
    }

    #[test]
    fn test_same_seed_same_grids() {
        let ranking = full_ranking();

        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);

        assert_eq!(frequency_based(&ranking, 20, &mut rng_a), frequency_based(&ranking, 20, &mut rng_b));
        assert_eq!(consecutive_biased(&mut rng_a), consecutive_biased(&mut rng_b));
        assert_eq!(balanced(&ranking, &mut rng_a), balanced(&ranking, &mut rng_b));
    }

    #[test]
    fn test_weighted_sample_follows_distribution() {
        // probabilités écrasantes sur les numéros 1 à 8
        let mut probs = vec![1e-9; POOL_SIZE];
        for i in 0..8 {
            probs[i] = 1.0;
        }
        let mut rng = StdRng::seed_from_u64(42);
        let grid = weighted_sample(&probs, &mut rng).unwrap();
        assert_eq!(grid, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_weighted_sample_valid_grid() {
        let probs: Vec<f64> = (0..POOL_SIZE).map(|i| (i + 1) as f64).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let grid = weighted_sample(&probs, &mut rng).unwrap();
        assert_valid_grid(&grid);
    }

    #[test]
    fn test_date_seed_format() {
        let seed = date_seed();
        let s = seed.to_string();
        assert_eq!(s.len(), 8, "seed devrait avoir 8 chiffres: {s}");
    }
}
