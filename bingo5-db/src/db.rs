use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_id   TEXT PRIMARY KEY,
    date      TEXT NOT NULL,
    number_1  INTEGER NOT NULL,
    number_2  INTEGER NOT NULL,
    number_3  INTEGER NOT NULL,
    number_4  INTEGER NOT NULL,
    number_5  INTEGER NOT NULL,
    number_6  INTEGER NOT NULL,
    number_7  INTEGER NOT NULL,
    number_8  INTEGER NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("bingo5.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_id, date, number_1, number_2, number_3, number_4, number_5, number_6, number_7, number_8)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            draw.draw_id,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.numbers[6],
            draw.numbers[7],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

/// Tirages les plus récents en premier : l'indice 0 est toujours le dernier
/// tirage connu, convention partagée par tous les consommateurs.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT draw_id, date, number_1, number_2, number_3, number_4, number_5, number_6, number_7, number_8
         FROM draws ORDER BY date DESC, draw_id DESC LIMIT ?1"
    )?;
    let draws = stmt.query_map([limit], |row| {
        Ok(Draw {
            draw_id: row.get(0)?,
            date: row.get(1)?,
            numbers: [
                row.get::<_, u8>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, u8>(5)?,
                row.get::<_, u8>(6)?,
                row.get::<_, u8>(7)?,
                row.get::<_, u8>(8)?,
                row.get::<_, u8>(9)?,
            ],
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(id: &str, date: &str) -> Draw {
        Draw {
            draw_id: id.to_string(),
            date: date.to_string(),
            numbers: [1, 5, 12, 18, 23, 29, 34, 40],
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw("0001", "2025-01-06")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw("0001", "2025-01-06")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw("0001", "2025-01-06")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order_most_recent_first() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("0001", "2025-01-06")).unwrap();
        insert_draw(&conn, &test_draw("0002", "2025-01-20")).unwrap();
        insert_draw(&conn, &test_draw("0003", "2025-01-13")).unwrap();

        let draws = fetch_last_draws(&conn, 10).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].date, "2025-01-20");
        assert_eq!(draws[1].date, "2025-01-13");
        assert_eq!(draws[2].date, "2025-01-06");
    }

    #[test]
    fn test_fetch_limit() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        for i in 0..5 {
            insert_draw(&conn, &test_draw(&format!("{:04}", i), &format!("2025-02-{:02}", i + 1))).unwrap();
        }
        let draws = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].date, "2025-02-05");
    }
}
