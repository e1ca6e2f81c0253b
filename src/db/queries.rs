use crate::errors::{AppError, AppResult};
use crate::models::credential::Credential;
use crate::models::fill_job::DeferredFillJob;
use crate::models::policy::{FillOptions, FillPolicy};
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Result, Row, params};

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_timestamp(idx: usize, s: Option<String>) -> Result<Option<DateTime<Local>>> {
    match s {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Local)))
            .map_err(|_| conversion_error(idx, AppError::InvalidDate(s.clone()))),
    }
}

pub fn map_fill_row(row: &Row) -> Result<DeferredFillJob> {
    let date_str: String = row.get("target_date")?;
    let target_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(date_str.clone())))?;

    let policy_str: String = row.get("policy")?;
    let policy = FillPolicy::from_db_str(&policy_str)
        .ok_or_else(|| conversion_error(0, AppError::InvalidPolicy(policy_str.clone())))?;

    let expires_at = parse_timestamp(0, row.get("expires_at")?)?;
    let created_at = parse_timestamp(0, row.get("created_at")?)?.unwrap_or_else(Local::now);

    Ok(DeferredFillJob {
        id: row.get("id")?,
        credential: Credential {
            user_id: row.get("user_id")?,
            token: row.get("token")?,
            expires_at,
            upstream_user_id: row.get("upstream_id")?,
        },
        target_date,
        policy,
        options: FillOptions {
            start_early: row.get::<_, i32>("start_early")? == 1,
        },
        created_at,
    })
}

/// Insert a pending fill. A second job for the same user violates the
/// UNIQUE constraint and becomes `AlreadyScheduled`.
pub fn insert_pending_fill(conn: &Connection, job: &DeferredFillJob) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO pending_fills (user_id, token, expires_at, upstream_id, target_date, policy, start_early, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            job.credential.user_id,
            job.credential.token,
            job.credential.expires_at.map(|d| d.to_rfc3339()),
            job.credential.upstream_user_id,
            job.date_str(),
            job.policy.to_db_str(),
            if job.options.start_early { 1 } else { 0 },
            job.created_at.to_rfc3339(),
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(AppError::AlreadyScheduled(job.credential.user_id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn load_pending_fills(conn: &Connection) -> AppResult<Vec<DeferredFillJob>> {
    let mut stmt = conn.prepare("SELECT * FROM pending_fills ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_fill_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn clear_pending_fills(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM pending_fills", [])?)
}

/// Delete the given jobs only; rows inserted meanwhile are left alone.
pub fn delete_pending_fills(conn: &Connection, ids: &[i64]) -> AppResult<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut deleted = 0;
    {
        let mut stmt = tx.prepare_cached("DELETE FROM pending_fills WHERE id = ?1")?;
        for id in ids {
            deleted += stmt.execute([id])?;
        }
    }
    tx.commit()?;
    Ok(deleted)
}

pub fn find_credential(conn: &Connection, user_id: &str) -> AppResult<Option<Credential>> {
    let row = conn
        .query_row(
            "SELECT user_id, token, expires_at, upstream_user_id FROM credentials WHERE user_id = ?1",
            [user_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()?;

    match row {
        None => Ok(None),
        Some((user_id, token, expires_at, upstream_user_id)) => Ok(Some(Credential {
            user_id,
            token,
            expires_at: parse_timestamp(2, expires_at)?,
            upstream_user_id,
        })),
    }
}

pub fn upsert_credential(conn: &Connection, cred: &Credential) -> AppResult<()> {
    conn.execute(
        "INSERT INTO credentials (user_id, token, expires_at, upstream_user_id, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id) DO UPDATE SET
             token = excluded.token,
             expires_at = excluded.expires_at,
             upstream_user_id = excluded.upstream_user_id,
             updated_at = excluded.updated_at",
        params![
            cred.user_id,
            cred.token,
            cred.expires_at.map(|d| d.to_rfc3339()),
            cred.upstream_user_id,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}
