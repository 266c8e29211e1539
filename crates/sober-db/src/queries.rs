use rusqlite::{OptionalExtension, Row, params};

use crate::models::{AccountRow, NewAccount, NewNote, NewOnboardingEntry};
use crate::{Database, DbError};

const ACCOUNT_COLUMNS: &str = "id, username, email, password, created_at";

impl Database {
    // -- Accounts --

    pub fn create_account(&self, account: &NewAccount) -> Result<AccountRow, DbError> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO users (username, email, password, created_at)
                     VALUES (?1, ?2, ?3, ?4)
                     RETURNING {ACCOUNT_COLUMNS}"
                ),
                params![
                    account.username,
                    account.email,
                    account.password_hash,
                    account.created_at
                ],
                account_from_row,
            )?;
            Ok(row)
        })
    }

    /// Returns `DbError::NotFound` when no account uses this email.
    pub fn find_account_by_email(&self, email: &str) -> Result<AccountRow, DbError> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = ?1"),
                [email],
                account_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn find_account_by_id(&self, id: i64) -> Result<Option<AccountRow>, DbError> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ?1"),
                    [id],
                    account_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Onboarding --

    pub fn create_onboarding_entry(&self, entry: &NewOnboardingEntry) -> Result<i64, DbError> {
        self.with_conn_mut(|conn| {
            let id = conn.query_row(
                "INSERT INTO onboarding (user_id, reason, sober_date, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
                params![entry.user_id, entry.reason, entry.sober_date, entry.created_at],
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }

    // -- Notes --

    pub fn create_note(&self, note: &NewNote) -> Result<i64, DbError> {
        self.with_conn_mut(|conn| {
            let id = conn.query_row(
                "INSERT INTO notes (user_id, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
                params![note.user_id, note.content, note.created_at, note.updated_at],
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}
