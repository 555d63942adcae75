//! Row mapping and statements for the document tables.
//! Nested values (friend lists, exercises, snapshots) are stored as JSON text.

use crate::models::snapshot::OngoingWorkoutSnapshot;
use crate::models::template::WorkoutTemplate;
use crate::models::user::UserDoc;
use crate::models::workout::{Exercise, NewWorkout, WorkoutDoc};
use crate::models::{TemplateId, UserId, WorkoutId};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub fn format_instant(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn json_column<T: DeserializeOwned>(row: &Row, idx: &str) -> Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn instant_column(row: &Row, idx: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
    })
    .transpose()
}

// ---------------------------
// users
// ---------------------------

const USER_COLUMNS: &str = "id, email, friends, custom_exercises, ongoing_workout, created_at";

pub fn map_user(row: &Row) -> Result<UserDoc> {
    let ongoing: Option<String> = row.get("ongoing_workout")?;
    // A JSON `null` and a SQL NULL both mean "no workout in flight".
    let ongoing_workout = match ongoing {
        Some(raw) => serde_json::from_str::<Option<OngoingWorkoutSnapshot>>(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
        None => None,
    };

    Ok(UserDoc {
        id: UserId(row.get("id")?),
        email: row.get("email")?,
        friends: json_column(row, "friends")?,
        custom_exercises: json_column(row, "custom_exercises")?,
        ongoing_workout,
        created_at: instant_column(row, "created_at")?.unwrap_or_default(),
    })
}

pub fn load_user(conn: &Connection, id: &UserId) -> Result<Option<UserDoc>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    conn.query_row(&sql, [id.as_str()], map_user).optional()
}

pub fn load_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserDoc>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 ORDER BY created_at LIMIT 1");
    conn.query_row(&sql, [email], map_user).optional()
}

pub fn insert_user(conn: &Connection, user: &UserDoc) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, friends, custom_exercises, ongoing_workout, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id.as_str(),
            user.email,
            to_json(&user.friends)?,
            to_json(&user.custom_exercises)?,
            user.ongoing_workout.as_ref().map(to_json).transpose()?,
            format_instant(&user.created_at),
        ],
    )?;
    Ok(())
}

/// Write back every mutable field of a user document.
pub fn update_user(conn: &Connection, user: &UserDoc) -> Result<()> {
    conn.execute(
        "UPDATE users
         SET email = ?1, friends = ?2, custom_exercises = ?3, ongoing_workout = ?4
         WHERE id = ?5",
        params![
            user.email,
            to_json(&user.friends)?,
            to_json(&user.custom_exercises)?,
            user.ongoing_workout.as_ref().map(to_json).transpose()?,
            user.id.as_str(),
        ],
    )?;
    Ok(())
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
}

// ---------------------------
// templates
// ---------------------------

fn map_template(row: &Row) -> Result<WorkoutTemplate> {
    Ok(WorkoutTemplate {
        id: TemplateId(row.get("id")?),
        name: row.get("name")?,
        exercises: json_column(row, "exercises")?,
    })
}

pub fn insert_template(
    conn: &Connection,
    owner: &UserId,
    template: &WorkoutTemplate,
) -> Result<()> {
    conn.execute(
        "INSERT INTO templates (id, user_id, name, exercises, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            template.id.as_str(),
            owner.as_str(),
            template.name,
            to_json(&template.exercises)?,
            format_instant(&Utc::now()),
        ],
    )?;
    Ok(())
}

pub fn load_templates(conn: &Connection, owner: &UserId) -> Result<Vec<WorkoutTemplate>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, exercises FROM templates
         WHERE user_id = ?1
         ORDER BY created_at ASC, rowid ASC",
    )?;
    let rows = stmt.query_map([owner.as_str()], map_template)?;
    rows.collect()
}

pub fn delete_template(conn: &Connection, owner: &UserId, id: &TemplateId) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM templates WHERE id = ?1 AND user_id = ?2",
        [id.as_str(), owner.as_str()],
    )?;
    Ok(n > 0)
}

// ---------------------------
// workouts
// ---------------------------

const WORKOUT_COLUMNS: &str = "id, user_id, user_email, exercises, duration, timestamp, date";

pub fn map_workout(row: &Row) -> Result<WorkoutDoc> {
    let exercises: Vec<Exercise> = json_column(row, "exercises")?;
    let duration: i64 = row.get("duration")?;
    Ok(WorkoutDoc {
        id: WorkoutId(row.get("id")?),
        user_id: UserId(row.get("user_id")?),
        user_email: row.get("user_email")?,
        exercises,
        duration: duration.max(0) as u64,
        timestamp: instant_column(row, "timestamp")?,
        date: row.get("date")?,
    })
}

/// Insert with a store-assigned id and timestamp.
pub fn insert_workout(conn: &Connection, workout: &NewWorkout) -> Result<WorkoutDoc> {
    let doc = WorkoutDoc {
        id: WorkoutId::generate(),
        user_id: workout.user_id.clone(),
        user_email: workout.user_email.clone(),
        exercises: workout.exercises.clone(),
        duration: workout.duration,
        timestamp: Some(Utc::now()),
        date: workout.date.clone(),
    };
    insert_workout_doc(conn, &doc)?;
    Ok(doc)
}

/// Insert a document exactly as given (imports, fixtures).
pub fn insert_workout_doc(conn: &Connection, doc: &WorkoutDoc) -> Result<()> {
    conn.execute(
        "INSERT INTO workouts (id, user_id, user_email, exercises, duration, timestamp, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            doc.id.as_str(),
            doc.user_id.as_str(),
            doc.user_email,
            to_json(&doc.exercises)?,
            doc.duration as i64,
            doc.timestamp.as_ref().map(format_instant),
            doc.date,
        ],
    )?;
    Ok(())
}

/// Global recency window: newest first, documents without a server
/// timestamp last.
pub fn load_recent_workouts(conn: &Connection, limit: usize) -> Result<Vec<WorkoutDoc>> {
    let sql = format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts
         ORDER BY timestamp IS NULL, timestamp DESC, rowid DESC
         LIMIT ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([limit as i64], map_workout)?;
    rows.collect()
}

pub fn load_workouts_by_owner(conn: &Connection, owner: &UserId) -> Result<Vec<WorkoutDoc>> {
    let sql = format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts
         WHERE user_id = ?1
         ORDER BY COALESCE(timestamp, date) DESC, rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([owner.as_str()], map_workout)?;
    rows.collect()
}

pub fn load_workout(conn: &Connection, id: &WorkoutId) -> Result<Option<WorkoutDoc>> {
    let sql = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1");
    conn.query_row(&sql, [id.as_str()], map_workout).optional()
}

pub fn delete_workout(conn: &Connection, id: &WorkoutId) -> Result<bool> {
    let n = conn.execute("DELETE FROM workouts WHERE id = ?1", [id.as_str()])?;
    Ok(n > 0)
}

// ---------------------------
// identity
// ---------------------------

/// Stored credentials for one account.
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
}

pub fn load_account_by_email(conn: &Connection, email: &str) -> Result<Option<AccountRow>> {
    conn.query_row(
        "SELECT id, email, password_hash FROM accounts WHERE email = ?1",
        [email],
        |row| {
            Ok(AccountRow {
                id: UserId(row.get(0)?),
                email: row.get(1)?,
                password_hash: row.get(2)?,
            })
        },
    )
    .optional()
}

pub fn insert_account(conn: &Connection, account: &AccountRow) -> Result<()> {
    conn.execute(
        "INSERT INTO accounts (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            account.id.as_str(),
            account.email,
            account.password_hash,
            format_instant(&Utc::now()),
        ],
    )?;
    Ok(())
}

pub fn load_auth_state(conn: &Connection) -> Result<Option<(UserId, String)>> {
    conn.query_row(
        "SELECT user_id, email FROM auth_state WHERE slot = 1",
        [],
        |row| Ok((UserId(row.get(0)?), row.get(1)?)),
    )
    .optional()
}

pub fn save_auth_state(conn: &Connection, state: Option<(&UserId, &str)>) -> Result<()> {
    match state {
        Some((id, email)) => {
            conn.execute(
                "INSERT INTO auth_state (slot, user_id, email, signed_in_at)
                 VALUES (1, ?1, ?2, ?3)
                 ON CONFLICT(slot) DO UPDATE SET
                    user_id = excluded.user_id,
                    email = excluded.email,
                    signed_in_at = excluded.signed_in_at",
                params![id.as_str(), email, format_instant(&Utc::now())],
            )?;
        }
        None => {
            conn.execute("DELETE FROM auth_state WHERE slot = 1", [])?;
        }
    }
    Ok(())
}
