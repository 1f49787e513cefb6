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

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbResult, Executor, Record};
use async_trait::async_trait;
use log::warn;
use serde_json::Value;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        sqlx::Error::Database(e) => DbError::BackendError(e.message().to_owned()),
        e => DbError::BackendError(e.to_string()),
    }
}

/// Creates a new connection pool against `conn_str`.
pub async fn connect(conn_str: &str) -> DbResult<SqliteDb> {
    let pool = SqlitePool::connect(conn_str).await.map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A connection to SQLite checked out of the pool.
pub type SqliteExecutor = PoolConnection<Sqlite>;

/// A database instance backed by an SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent requests can
    /// use concurrently.
    pool: SqlitePool,
}

impl SqliteDb {
    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<SqliteExecutor> {
        self.pool.acquire().await.map_err(map_sqlx_error)
    }
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        let ex = self.typed_ex().await?;
        Ok(Executor::Sqlite(ex))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema, which may contain any number of
/// statements.
pub async fn run_schema(e: &mut SqliteExecutor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(&mut **e).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Converts a SQLite `row` of unknown shape into a `Record`.
///
/// SQLite is dynamically typed, so the conversion looks at the storage class of every value
/// instead of at the declared type of its column.
pub fn record_from_row(row: &SqliteRow) -> DbResult<Record> {
    let mut record = Record::with_capacity(row.columns().len());
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i).map_err(map_sqlx_error)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            let storage = raw.type_info().name().to_owned();
            match storage.as_str() {
                "INTEGER" => {
                    Value::from(row.try_get_unchecked::<i64, _>(i).map_err(map_sqlx_error)?)
                }
                "REAL" => Value::from(row.try_get_unchecked::<f64, _>(i).map_err(map_sqlx_error)?),
                "BLOB" => {
                    Value::from(row.try_get_unchecked::<Vec<u8>, _>(i).map_err(map_sqlx_error)?)
                }
                _ => Value::from(row.try_get_unchecked::<String, _>(i).map_err(map_sqlx_error)?),
            }
        };
        record.insert(column.name().to_owned(), value);
    }
    Ok(record)
}

/// Test utilities for the SQLite connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Initializes the test database.
    pub async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        connect(":memory:").await.unwrap()
    }
}
