use anyhow::{bail, Context, Result};
use bingo5_db::rusqlite::Connection;
use std::path::Path;

use bingo5_db::db::insert_draw;
use bingo5_db::models::{validate_draw, Draw, PICK_COUNT};

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let draw_id = get(0)?;

    let raw_date = get(1)?;
    let date = parse_date(&raw_date)?;

    let mut numbers = [0u8; PICK_COUNT];
    for (i, slot) in numbers.iter_mut().enumerate() {
        *slot = get_u8(2 + i)?;
    }
    validate_draw(&numbers)?;

    Ok(Draw { draw_id, date, numbers })
}

fn parse_date(raw: &str) -> Result<String> {
    if raw.contains('-') {
        return Ok(raw.to_string());
    }
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        bail!("Format de date invalide: '{}'", raw);
    }
    Ok(format!("{}-{:0>2}-{:0>2}", parts[0], parts[1], parts[2]))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => {
                match parse_record(&record) {
                    Ok(draw) => {
                        match insert_draw(&tx, &draw) {
                            Ok(true) => result.inserted += 1,
                            Ok(false) => result.skipped += 1,
                            Err(e) => {
                                eprintln!("Erreur insertion tirage {}: {}", result.total_records, e);
                                result.errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025/06/17").unwrap(), "2025-06-17");
        assert_eq!(parse_date("2025/6/3").unwrap(), "2025-06-03");
        assert_eq!(parse_date("2025-06-17").unwrap(), "2025-06-17");
        assert!(parse_date("17 juin 2025").is_err());
    }

    #[test]
    fn test_parse_record_ok() {
        let record = csv::StringRecord::from(vec![
            "0815", "2025/06/17", "3", "7", "12", "19", "24", "28", "33", "40",
        ]);
        let draw = parse_record(&record).unwrap();
        assert_eq!(draw.draw_id, "0815");
        assert_eq!(draw.date, "2025-06-17");
        assert_eq!(draw.numbers, [3, 7, 12, 19, 24, 28, 33, 40]);
    }

    #[test]
    fn test_parse_record_rejects_invalid_draw() {
        let record = csv::StringRecord::from(vec![
            "0815", "2025/06/17", "3", "3", "12", "19", "24", "28", "33", "40",
        ]);
        assert!(parse_record(&record).is_err());

        let record = csv::StringRecord::from(vec![
            "0815", "2025/06/17", "3", "7", "12", "19", "24", "28", "33", "41",
        ]);
        assert!(parse_record(&record).is_err());
    }

    #[test]
    fn test_parse_record_missing_field() {
        let record = csv::StringRecord::from(vec!["0815", "2025/06/17", "3", "7"]);
        assert!(parse_record(&record).is_err());
    }
}
