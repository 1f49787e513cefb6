// Rental API
// Copyright 2024 The Rental API Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Generic abstraction to access different database systems.
//!
//! The facilities in this module provide an abstraction over different database systems such as
//! MySQL and SQLite.  The MySQL backend is for production use and the SQLite backend is primarily
//! intended to support unit tests.
//!
//! Gateways do not own a schema: they run ad-hoc queries whose result columns are not known at
//! compile time.  For this reason, rows are surfaced as `Record`s, which are JSON objects that
//! keep the column order reported by the database.

use async_trait::async_trait;
use time::{Date, OffsetDateTime, Time, UtcOffset};

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Database errors.  Any unexpected errors that come from the database are classified as
/// `BackendError`, but errors we know about have more specific types.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DbError {
    /// Catch-all error type for unexpected database errors.
    #[error("{0}")]
    BackendError(String),

    /// Indicates a failure processing the data that already exists in the database.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Indicates that a requested entry does not exist.
    #[error("Entity not found")]
    NotFound,

    /// Indicates that the database is not available (maybe because of too many active concurrent
    /// connections).
    #[error("Unavailable")]
    Unavailable,
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// A single row returned by a query, keyed by column name in result order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A database executor that can talk to multiple database implementations.
///
/// This type provides a generic mechanism to access a typed connection to a database, which is
/// needed by sqlx to offer type safety guarantees.  Users of this type are forced to destructure
/// it and issue different calls for each database, which is also where per-dialect SQL lives.
pub enum Executor {
    /// A MySQL connection checked out of the pool.
    #[cfg(feature = "mysql")]
    Mysql(mysql::MysqlExecutor),

    /// A SQLite connection checked out of the pool.
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteExecutor),
}

/// Abstraction over the database connection.
#[async_trait]
pub trait Db {
    /// Obtains an executor for direct access to the pool.
    ///
    /// This would be better called `executor` but this method is used so frequently that it makes
    /// call sites too verbose.
    async fn ex(&self) -> DbResult<Executor>;

    /// Closes the pool and waits for all checked out connections to be returned.
    async fn close(&self);
}

/// Formats a timestamp as an ISO-8601 string in UTC with millisecond precision, such as
/// `2006-02-15T04:34:33.000Z`.
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    let ts = ts.to_offset(UtcOffset::UTC);
    format!(
        "{}T{}.{:03}Z",
        format_date(ts.date()),
        format_time(ts.time()),
        ts.millisecond()
    )
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// Formats a time of day as `HH:MM:SS`, dropping any sub-second precision.
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(
            "2006-02-15T04:34:33.000Z",
            format_timestamp(datetime!(2006-02-15 04:34:33 UTC))
        );
    }

    #[test]
    fn test_format_timestamp_millis_and_offset() {
        assert_eq!(
            "2005-05-24T20:53:30.123Z",
            format_timestamp(datetime!(2005-05-24 22:53:30.123456 +02:00))
        );
    }

    #[test]
    fn test_format_date_pads() {
        assert_eq!("2006-02-05", format_date(date!(2006-02-05)));
    }

    #[test]
    fn test_format_time_drops_fraction() {
        assert_eq!("07:08:09", format_time(time!(07:08:09.999)));
    }
}
