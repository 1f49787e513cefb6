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

//! Common utilities to interact with a MySQL database.

use crate::db::{
    Db, DbError, DbResult, Executor, Record, format_date, format_time, format_timestamp,
};
use crate::env::{get_optional_var, get_required_var};
use async_trait::async_trait;
use derivative::Derivative;
use log::warn;
use serde_json::Value;
use sqlx::mysql::{
    MySql, MySqlConnectOptions, MySqlDatabaseError, MySqlPool, MySqlPoolOptions, MySqlRow,
    MySqlSslMode,
};
use sqlx::pool::PoolConnection;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::time::Duration;
use time::{Date, PrimitiveDateTime, Time};

/// Default value for the `port` configuration property.
const DEFAULT_PORT: u16 = 3306;

/// Default value for the `max_connections` configuration property.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// MySQL error number reported when the server refuses new connections.
const ER_CON_COUNT_ERROR: u16 = 1040;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::Database(e) => match e.try_downcast_ref::<MySqlDatabaseError>() {
            Some(e) if e.number() == ER_CON_COUNT_ERROR => DbError::Unavailable,
            _ => DbError::BackendError(e.message().to_owned()),
        },
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Options to establish a connection to a MySQL database.
#[derive(Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct MysqlOptions {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to (typically 3306).
    pub port: u16,

    /// Database name to connect to.
    pub database: String,

    /// Username to establish the connection with.
    pub username: String,

    /// Password to establish the connection with.
    #[derivative(Debug = "ignore")]
    pub password: String,

    /// Whether to require TLS and verify the server's certificate and host name.
    pub tls: bool,

    /// Minimum number of connections to keep open against the database.
    pub min_connections: Option<u32>,

    /// Maximum number of connections to allow against the database.
    pub max_connections: u32,
}

impl MysqlOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_HOST`, `<prefix>_PORT`, `<prefix>_NAME`,
    /// `<prefix>_USER`, `<prefix>_PASSWORD`, `<prefix>_SSL`, `<prefix>_MIN_CONNECTIONS` and
    /// `<prefix>_MAX_CONNECTIONS`.  TLS is only enabled when `<prefix>_SSL` is exactly `true`.
    pub fn from_env(prefix: &str) -> Result<MysqlOptions, String> {
        Ok(MysqlOptions {
            host: get_required_var::<String>(prefix, "HOST")?,
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
            database: get_required_var::<String>(prefix, "NAME")?,
            username: get_required_var::<String>(prefix, "USER")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            tls: get_optional_var::<String>(prefix, "SSL")?.as_deref() == Some("true"),
            min_connections: get_optional_var::<u32>(prefix, "MIN_CONNECTIONS")?,
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        })
    }
}

/// A connection to MySQL checked out of the pool.
pub type MysqlExecutor = PoolConnection<MySql>;

/// Shareable connection pool to a MySQL database.
pub struct MysqlDb {
    /// Shared MySQL connection pool.  This is a cloneable type that all concurrent requests can
    /// use concurrently.
    pool: MySqlPool,
}

impl Drop for MysqlDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

impl MysqlDb {
    /// Creates a new connection pool based on a set of options.
    ///
    /// Note that this does *not* establish any connection: they are opened on demand, so an
    /// unreachable server only shows up once the first query is issued.
    pub fn connect(opts: MysqlOptions) -> DbResult<Self> {
        let mut pool_options = MySqlPoolOptions::new().max_connections(opts.max_connections);
        if let Some(min_connections) = opts.min_connections {
            pool_options = pool_options.min_connections(min_connections);
        }
        pool_options = pool_options.acquire_timeout(Duration::from_secs(10));

        let ssl_mode = if opts.tls { MySqlSslMode::VerifyIdentity } else { MySqlSslMode::Disabled };
        let options = MySqlConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .database(&opts.database)
            .username(&opts.username)
            .password(&opts.password)
            .ssl_mode(ssl_mode);

        let pool = pool_options.connect_lazy_with(options);
        Ok(Self { pool })
    }

    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<MysqlExecutor> {
        self.pool.acquire().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl Db for MysqlDb {
    async fn ex(&self) -> DbResult<Executor> {
        let ex = self.typed_ex().await?;
        Ok(Executor::Mysql(ex))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Converts the value at column `i` of `row`, whose type is named `type_name`, into JSON.
///
/// Decoding is unchecked because the conversions below are deliberately lax (e.g. any signed
/// integer width into an `i64`), and the binary protocol encodes each value with its own length.
fn decode_value(row: &MySqlRow, i: usize, type_name: &str) -> DbResult<Value> {
    let value = match type_name {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get_unchecked::<i64, _>(i).map_err(map_sqlx_error)?)
        }

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "YEAR" => {
            Value::from(row.try_get_unchecked::<u64, _>(i).map_err(map_sqlx_error)?)
        }

        "FLOAT" => {
            Value::from(f64::from(row.try_get_unchecked::<f32, _>(i).map_err(map_sqlx_error)?))
        }
        "DOUBLE" => Value::from(row.try_get_unchecked::<f64, _>(i).map_err(map_sqlx_error)?),

        "DATETIME" | "TIMESTAMP" => {
            let ts: PrimitiveDateTime = row.try_get_unchecked(i).map_err(map_sqlx_error)?;
            Value::from(format_timestamp(ts.assume_utc()))
        }
        "DATE" => {
            let date: Date = row.try_get_unchecked(i).map_err(map_sqlx_error)?;
            Value::from(format_date(date))
        }
        "TIME" => {
            let time: Time = row.try_get_unchecked(i).map_err(map_sqlx_error)?;
            Value::from(format_time(time))
        }

        "JSON" => {
            let raw: String = row.try_get_unchecked(i).map_err(map_sqlx_error)?;
            serde_json::from_str(&raw).map_err(|e| DbError::DataIntegrityError(e.to_string()))?
        }

        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "GEOMETRY"
        | "BIT" => {
            let bytes: Vec<u8> = row.try_get_unchecked(i).map_err(map_sqlx_error)?;
            Value::from(bytes)
        }

        // DECIMAL travels as text to avoid losing precision; ENUM, SET and the character types
        // are plain strings.
        _ => Value::from(row.try_get_unchecked::<String, _>(i).map_err(map_sqlx_error)?),
    };
    Ok(value)
}

/// Converts a MySQL `row` of unknown shape into a `Record`.
pub fn record_from_row(row: &MySqlRow) -> DbResult<Record> {
    let mut record = Record::with_capacity(row.columns().len());
    for (i, column) in row.columns().iter().enumerate() {
        let is_null = row.try_get_raw(i).map_err(map_sqlx_error)?.is_null();
        let value =
            if is_null { Value::Null } else { decode_value(row, i, column.type_info().name())? };
        record.insert(column.name().to_owned(), value);
    }
    Ok(record)
}

/// Test utilities for the MySQL connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Creates a new connection to the test database configured via `MYSQL_TEST_*` variables.
    ///
    /// Given that this is for testing purposes only, any errors will panic.
    pub fn setup() -> MysqlDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let mut opts = MysqlOptions::from_env("MYSQL_TEST").unwrap();
        opts.max_connections = 1;
        MysqlDb::connect(opts).unwrap()
    }
}
