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

//! Database abstraction in terms of the operations needed by the server.
//!
//! Every query is parameterized and returns rows as `Record`s so that the column names and
//! values chosen by the database flow through to clients untouched.

use crate::model::{EntityId, Table};
use rental_api_core::db::mysql;
#[cfg(test)]
use rental_api_core::db::sqlite;
use rental_api_core::db::{DbError, DbResult, Executor, Record};
use serde_json::Value;
use sqlx::Row;

/// Initializes the test database schema and contents.
#[cfg(test)]
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Runs the `query_str` query with positional string `params` and returns all rows.
async fn fetch_records(
    ex: &mut Executor,
    query_str: &str,
    params: &[&str],
) -> DbResult<Vec<Record>> {
    match ex {
        Executor::Mysql(ex) => {
            let mut query = sqlx::query(query_str);
            for param in params {
                query = query.bind(*param);
            }
            let rows = query.fetch_all(&mut **ex).await.map_err(mysql::map_sqlx_error)?;
            rows.iter().map(mysql::record_from_row).collect()
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let mut query = sqlx::query(query_str);
            for param in params {
                query = query.bind(*param);
            }
            let rows = query.fetch_all(&mut **ex).await.map_err(sqlite::map_sqlx_error)?;
            rows.iter().map(sqlite::record_from_row).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the names of the columns of `table` in declaration order.
pub(crate) async fn get_columns(ex: &mut Executor, table: Table) -> DbResult<Vec<String>> {
    match ex {
        Executor::Mysql(ex) => {
            let query_str = "
                SELECT COLUMN_NAME AS Field
                FROM information_schema.columns
                WHERE table_schema = DATABASE() AND table_name = ?
                ORDER BY ordinal_position";
            let rows = sqlx::query(query_str)
                .bind(table.name())
                .fetch_all(&mut **ex)
                .await
                .map_err(mysql::map_sqlx_error)?;
            let mut columns = Vec::with_capacity(rows.len());
            for row in rows {
                columns.push(
                    row.try_get_unchecked::<String, _>("Field").map_err(mysql::map_sqlx_error)?,
                );
            }
            Ok(columns)
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT name AS Field FROM pragma_table_info(?) ORDER BY cid";
            let rows = sqlx::query(query_str)
                .bind(table.name())
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let mut columns = Vec::with_capacity(rows.len());
            for row in rows {
                columns.push(row.try_get::<String, _>("Field").map_err(sqlite::map_sqlx_error)?);
            }
            Ok(columns)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all films whose title contains `text`, ignoring case.
pub(crate) async fn search_films(ex: &mut Executor, text: &str) -> DbResult<Vec<Record>> {
    let pattern = format!("%{}%", text.to_lowercase());
    fetch_records(ex, "SELECT * FROM film WHERE LOWER(title) LIKE ?", &[pattern.as_str()]).await
}

/// Gets the actor rows matching `id`.
pub(crate) async fn get_actor(ex: &mut Executor, id: &EntityId) -> DbResult<Vec<Record>> {
    fetch_records(ex, "SELECT * FROM actor WHERE actor_id = ?", &[id.as_ref()]).await
}

/// Gets the film rows matching `id`.
pub(crate) async fn get_film(ex: &mut Executor, id: &EntityId) -> DbResult<Vec<Record>> {
    fetch_records(ex, "SELECT * FROM film WHERE film_id = ?", &[id.as_ref()]).await
}

/// Gets the store rows matching `id`.
pub(crate) async fn get_store(ex: &mut Executor, id: &EntityId) -> DbResult<Vec<Record>> {
    fetch_records(ex, "SELECT * FROM store WHERE store_id = ?", &[id.as_ref()]).await
}

/// Gets the customer rows matching `id`.
pub(crate) async fn get_customer(ex: &mut Executor, id: &EntityId) -> DbResult<Vec<Record>> {
    fetch_records(ex, "SELECT * FROM customer WHERE customer_id = ?", &[id.as_ref()]).await
}

/// Gets all films in which the actor `id` appears.
pub(crate) async fn get_actor_films(ex: &mut Executor, id: &EntityId) -> DbResult<Vec<Record>> {
    let query_str = "
        SELECT film.*
        FROM film
        INNER JOIN film_actor ON film.film_id = film_actor.film_id
        WHERE film_actor.actor_id = ?";
    fetch_records(ex, query_str, &[id.as_ref()]).await
}

/// Gets all actors that appear in the film `id`.
pub(crate) async fn get_film_actors(ex: &mut Executor, id: &EntityId) -> DbResult<Vec<Record>> {
    let query_str = "
        SELECT actor.*
        FROM actor
        INNER JOIN film_actor ON actor.actor_id = film_actor.actor_id
        WHERE film_actor.film_id = ?";
    fetch_records(ex, query_str, &[id.as_ref()]).await
}

/// Gets the denormalized details of the film `id`.
pub(crate) async fn get_film_details(ex: &mut Executor, id: &EntityId) -> DbResult<Vec<Record>> {
    fetch_records(ex, "SELECT * FROM film_list WHERE FID = ?", &[id.as_ref()]).await
}

/// Gets the denormalized details of the customer `id`.
pub(crate) async fn get_customer_details(
    ex: &mut Executor,
    id: &EntityId,
) -> DbResult<Vec<Record>> {
    fetch_records(ex, "SELECT * FROM customer_list WHERE ID = ?", &[id.as_ref()]).await
}

/// Gets the denormalized details of the actor `id`.
pub(crate) async fn get_actor_details(ex: &mut Executor, id: &EntityId) -> DbResult<Vec<Record>> {
    fetch_records(ex, "SELECT * FROM actor_info WHERE actor_id = ?", &[id.as_ref()]).await
}

/// Gets the identifiers of the copies of `film_id` that are currently available at `store_id`.
pub(crate) async fn get_inventory_in_stock(
    ex: &mut Executor,
    film_id: &EntityId,
    store_id: &EntityId,
) -> DbResult<Vec<Value>> {
    let query_str = match &*ex {
        // Only the first result set of the procedure carries rows: the count is stored in the
        // output variable.
        Executor::Mysql(_) => "CALL film_in_stock(?, ?, @film_count)",

        #[cfg(test)]
        Executor::Sqlite(_) => {
            "
            SELECT inventory_id
            FROM inventory
            WHERE film_id = ? AND store_id = ?
                AND NOT EXISTS (
                    SELECT 1 FROM rental
                    WHERE rental.inventory_id = inventory.inventory_id
                        AND rental.return_date IS NULL)
            ORDER BY inventory_id"
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    let records = fetch_records(ex, query_str, &[film_id.as_ref(), store_id.as_ref()]).await?;

    let mut ids = Vec::with_capacity(records.len());
    for mut record in records {
        match record.remove("inventory_id") {
            Some(id) => ids.push(id),
            None => {
                return Err(DbError::DataIntegrityError(
                    "Stock check did not return inventory_id".to_owned(),
                ));
            }
        }
    }
    Ok(ids)
}
