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

//! Operations against the relational rental database.

use crate::db;
use crate::driver::Driver;
use crate::model::{EntityId, Table};
use rental_api_core::db::Record;
use rental_api_core::driver::{DriverError, DriverResult};
use serde_json::Value;

/// Fails with `NotFound(message)` if `rows` is empty; returns `rows` otherwise.
fn non_empty<T>(rows: Vec<T>, message: &str) -> DriverResult<Vec<T>> {
    if rows.is_empty() {
        return Err(DriverError::NotFound(message.to_owned()));
    }
    Ok(rows)
}

/// Returns the first of `rows` or fails with `NotFound(message)` if there is none.
fn first(rows: Vec<Record>, message: &str) -> DriverResult<Record> {
    match rows.into_iter().next() {
        Some(row) => Ok(row),
        None => Err(DriverError::NotFound(message.to_owned())),
    }
}

impl Driver {
    /// Gets the column names of `table`.
    pub(crate) async fn get_columns(self, table: Table) -> DriverResult<Vec<String>> {
        let mut ex = self.db.ex().await?;
        Ok(db::get_columns(&mut ex, table).await?)
    }

    /// Gets all films whose title contains `text`, ignoring case.  Finding nothing is not an
    /// error.
    pub(crate) async fn search_films(self, text: &str) -> DriverResult<Vec<Record>> {
        let mut ex = self.db.ex().await?;
        Ok(db::search_films(&mut ex, text).await?)
    }

    /// Gets the actor `id`.
    pub(crate) async fn get_actor(self, id: EntityId) -> DriverResult<Vec<Record>> {
        let mut ex = self.db.ex().await?;
        non_empty(db::get_actor(&mut ex, &id).await?, "Actor not found")
    }

    /// Gets the film `id`.
    pub(crate) async fn get_film(self, id: EntityId) -> DriverResult<Vec<Record>> {
        let mut ex = self.db.ex().await?;
        non_empty(db::get_film(&mut ex, &id).await?, "Film not found")
    }

    /// Gets the store `id`.
    pub(crate) async fn get_store(self, id: EntityId) -> DriverResult<Vec<Record>> {
        let mut ex = self.db.ex().await?;
        non_empty(db::get_store(&mut ex, &id).await?, "Store not found")
    }

    /// Gets the customer `id`.
    pub(crate) async fn get_customer(self, id: EntityId) -> DriverResult<Vec<Record>> {
        let mut ex = self.db.ex().await?;
        non_empty(db::get_customer(&mut ex, &id).await?, "Customer not found")
    }

    /// Gets the films in which the actor `id` appears.
    pub(crate) async fn get_actor_films(self, id: EntityId) -> DriverResult<Vec<Record>> {
        let mut ex = self.db.ex().await?;
        non_empty(db::get_actor_films(&mut ex, &id).await?, "No films found for this actor")
    }

    /// Gets the actors that appear in the film `id`.
    pub(crate) async fn get_film_actors(self, id: EntityId) -> DriverResult<Vec<Record>> {
        let mut ex = self.db.ex().await?;
        non_empty(db::get_film_actors(&mut ex, &id).await?, "No actors found for this film")
    }

    /// Gets the denormalized details of the film `id`.
    pub(crate) async fn get_film_details(self, id: EntityId) -> DriverResult<Record> {
        let mut ex = self.db.ex().await?;
        first(db::get_film_details(&mut ex, &id).await?, "Film not found in film_list")
    }

    /// Gets the denormalized details of the customer `id`.
    pub(crate) async fn get_customer_details(self, id: EntityId) -> DriverResult<Record> {
        let mut ex = self.db.ex().await?;
        first(
            db::get_customer_details(&mut ex, &id).await?,
            "Customer not found in customer_list",
        )
    }

    /// Gets the denormalized details of the actor `id`.
    pub(crate) async fn get_actor_details(self, id: EntityId) -> DriverResult<Record> {
        let mut ex = self.db.ex().await?;
        first(db::get_actor_details(&mut ex, &id).await?, "Actor not found in actor_info")
    }

    /// Gets the identifiers of the copies of `film_id` available at `store_id`.
    pub(crate) async fn get_inventory_in_stock(
        self,
        film_id: EntityId,
        store_id: EntityId,
    ) -> DriverResult<Vec<Value>> {
        let mut ex = self.db.ex().await?;
        non_empty(
            db::get_inventory_in_stock(&mut ex, &film_id, &store_id).await?,
            "No inventory found for the specified film and store",
        )
    }
}
