use std::io::{self, BufRead, Write};

use sqlx::{sqlite::SqliteRow, Column, Executor, Row, SqlitePool};

use crate::startup::Application;

/// Renders one column as text, trying the storage classes SQLite can hold.
fn cell(row: &SqliteRow, index: usize) -> String {
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map_or_else(|| "NULL".to_string(), |v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value.map_or_else(|| "NULL".to_string(), |v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.unwrap_or_else(|| "NULL".to_string());
    }
    match row.try_get::<Option<Vec<u8>>, _>(index) {
        Ok(Some(bytes)) => format!("<{} bytes>", bytes.len()),
        _ => "NULL".to_string(),
    }
}

/// Runs one statement and returns printable output lines.
pub async fn execute_statement(pool: &SqlitePool, sql: &str) -> Result<Vec<String>, sqlx::Error> {
    let rows = pool.fetch_all(sql).await?;

    let Some(first) = rows.first() else {
        return Ok(vec!["(no rows)".to_string()]);
    };

    let header = first.columns().iter().map(|c| c.name().to_string()).collect::<Vec<_>>().join(" | ");
    let mut lines = vec![header];
    for row in &rows {
        lines.push((0..row.len()).map(|i| cell(row, i)).collect::<Vec<_>>().join(" | "));
    }
    lines.push(format!("({} rows)", rows.len()));
    Ok(lines)
}

/// Reads statements from stdin until `.quit` or end of input.
pub async fn run(app: &Application) -> anyhow::Result<()> {
    println!("🐚 SQL shell on {} ({} profile)", app.config().database.url, app.config().env);
    println!("💡 One statement per line. Type .quit to leave.");

    let stdin = io::stdin();
    loop {
        print!("sql> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let sql = line.trim();
        match sql {
            "" => continue,
            ".quit" | ".exit" => break,
            _ => match execute_statement(&app.state.pool, sql).await {
                Ok(lines) => lines.iter().for_each(|l| println!("{l}")),
                Err(e) => eprintln!("❌ {e}"),
            },
        }
    }
    Ok(())
}
