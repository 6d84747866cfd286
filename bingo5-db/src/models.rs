use anyhow::{bail, Result};

/// Taille du vivier : les numéros vont de 1 à 40.
pub const POOL_SIZE: usize = 40;
/// Nombre de numéros tirés par tirage.
pub const PICK_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub draw_id: String,
    pub date: String,
    pub numbers: [u8; PICK_COUNT],
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}

pub fn validate_draw(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > POOL_SIZE as u8 {
            bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7, 8]).is_ok());
        assert!(validate_draw(&[33, 34, 35, 36, 37, 38, 39, 40]).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6, 7, 8]).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7, 41]).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6, 7, 8]).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 40, 40]).is_err());
    }
}
