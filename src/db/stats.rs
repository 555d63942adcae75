use crate::db::queries::count_rows;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use std::fs;

pub fn print_db_info(conn: &Connection, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) COLLECTION SIZES
    //
    let users = count_rows(conn, "users")?;
    let workouts = count_rows(conn, "workouts")?;
    let templates = count_rows(conn, "templates")?;
    println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, users, RESET);
    println!("{}• Workouts:{} {}{}{}", CYAN, RESET, GREEN, workouts, RESET);
    println!("{}• Templates:{} {}{}{}", CYAN, RESET, GREEN, templates, RESET);

    let ongoing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE ongoing_workout IS NOT NULL AND ongoing_workout != 'null'",
        [],
        |row| row.get(0),
    )?;
    println!("{}• Unfinished workouts:{} {}", CYAN, RESET, ongoing);

    //
    // 3) WORKOUT RANGE
    //
    let first: Option<String> = conn
        .query_row(
            "SELECT COALESCE(timestamp, date) AS t FROM workouts ORDER BY t ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last: Option<String> = conn
        .query_row(
            "SELECT COALESCE(timestamp, date) AS t FROM workouts ORDER BY t DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let none = format!("{GREY}--{RESET}");
    println!("{}• Workouts logged:{}", CYAN, RESET);
    println!("    from: {}", first.unwrap_or_else(|| none.clone()));
    println!("    to:   {}", last.unwrap_or(none));

    if users > 0 {
        println!(
            "{}• Average workouts/user:{} {:.2}",
            CYAN,
            RESET,
            workouts as f64 / users as f64
        );
    }

    println!();
    Ok(())
}
