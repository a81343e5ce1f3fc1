use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bookmarks (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            url        TEXT UNIQUE,
            title      TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )?;
    Ok(())
}

/// Add the `skills` column to databases created before it existed.
pub fn ensure_skills_column(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(bookmarks)")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    if !columns.iter().any(|c| c == "skills") {
        conn.execute("ALTER TABLE bookmarks ADD COLUMN skills TEXT", [])?;
    }
    Ok(())
}

/// Store a bookmark; returns 0 when the URL is already saved. A missing
/// title is stored as NULL.
pub fn insert_bookmark(conn: &Connection, url: &str, title: Option<&str>) -> Result<usize> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO bookmarks (url, title) VALUES (?1, ?2)",
        rusqlite::params![url, title],
    )?;
    Ok(n)
}

pub fn fetch_job_urls(conn: &Connection, limit: Option<usize>) -> Result<Vec<String>> {
    let sql = match limit {
        Some(n) => format!(
            "SELECT url FROM bookmarks WHERE url IS NOT NULL ORDER BY id LIMIT {}",
            n
        ),
        None => "SELECT url FROM bookmarks WHERE url IS NOT NULL ORDER BY id".to_string(),
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(rows)
}

/// Write skills as a comma-joined string onto the row with this URL.
pub fn save_skills(conn: &Connection, url: &str, skills: &BTreeSet<String>) -> Result<usize> {
    let joined = skills.iter().map(String::as_str).collect::<Vec<_>>().join(",");
    let n = conn.execute(
        "UPDATE bookmarks SET skills = ?1 WHERE url = ?2",
        rusqlite::params![joined, url],
    )?;
    Ok(n)
}

/// Stored skills per URL, lowercased. Rows without skills are left out.
pub fn fetch_job_skills(conn: &Connection) -> Result<BTreeMap<String, BTreeSet<String>>> {
    let mut stmt = conn.prepare("SELECT url, skills FROM bookmarks WHERE url IS NOT NULL")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = BTreeMap::new();
    for (url, skills) in rows {
        let Some(skills) = skills.filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        let set: BTreeSet<String> = skills
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        out.insert(url, set);
    }
    Ok(out)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = connect(&dir.path().join("bookmarks.db")).unwrap();
        init_schema(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn skills_column_is_added_once() {
        let (_dir, conn) = open();
        ensure_skills_column(&conn).unwrap();
        ensure_skills_column(&conn).unwrap();
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('bookmarks') WHERE name = 'skills'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn urls_in_insertion_order() {
        let (_dir, conn) = open();
        assert_eq!(insert_bookmark(&conn, "https://a", Some("A")).unwrap(), 1);
        assert_eq!(insert_bookmark(&conn, "https://b", None).unwrap(), 1);
        assert_eq!(insert_bookmark(&conn, "https://a", None).unwrap(), 0);

        let title: Option<String> = conn
            .query_row("SELECT title FROM bookmarks WHERE url = 'https://b'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(title, None);

        assert_eq!(fetch_job_urls(&conn, None).unwrap(), vec!["https://a", "https://b"]);
        assert_eq!(fetch_job_urls(&conn, Some(1)).unwrap(), vec!["https://a"]);
    }

    #[test]
    fn skills_round_trip() {
        let (_dir, conn) = open();
        ensure_skills_column(&conn).unwrap();
        insert_bookmark(&conn, "https://a", None).unwrap();
        insert_bookmark(&conn, "https://b", None).unwrap();

        let skills: BTreeSet<String> = ["marketing", "data"].iter().map(|s| s.to_string()).collect();
        assert_eq!(save_skills(&conn, "https://a", &skills).unwrap(), 1);
        assert_eq!(save_skills(&conn, "https://missing", &skills).unwrap(), 0);

        let stored: String = conn
            .query_row("SELECT skills FROM bookmarks WHERE url = 'https://a'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stored, "data,marketing");

        let all = fetch_job_skills(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["https://a"], skills);
    }
}
