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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::Document;
use axum::Router;
use rental_api_core::db::Record;
use rental_api_core::rest::{RestError, RestResult};
use serde::Serialize;
use serde_json::Value;

mod actor_detail_get;
mod actor_films_get;
mod actor_get;
mod actors_get;
mod color_delete;
mod color_get;
mod color_put;
mod colors_get;
mod colors_post;
mod customer_detail_get;
mod customer_get;
mod customers_get;
mod film_actors_get;
mod film_detail_get;
mod film_get;
mod films_get;
mod inventory_in_stock_get;
mod movies_get;
mod root_get;
mod store_get;
mod stores_get;
#[cfg(test)]
mod testutils;

/// Value of the `status` field in successful responses.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
#[serde(rename_all = "lowercase")]
pub(crate) enum Status {
    /// The request succeeded.
    Success,
}

/// Response for APIs that list the columns of a table.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct ColumnsResponse {
    /// Outcome of the request.
    pub(crate) status: Status,

    /// Names of the columns in declaration order.
    pub(crate) columns: Vec<String>,
}

/// Response for APIs that fetch entities by their primary key.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct ResultResponse {
    /// Outcome of the request.
    pub(crate) status: Status,

    /// Matching rows as returned by the database.
    pub(crate) result: Vec<Record>,
}

/// Parses a request `body` into a JSON object, failing with a backend error described by
/// `context` if that is not possible.
pub(crate) fn parse_document(body: &[u8], context: &'static str) -> RestResult<Document> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(doc)) => Ok(doc),
        Ok(_) => Err(RestError::BackendError {
            context,
            details: "Request body must be a JSON object".to_owned(),
        }),
        Err(e) => Err(RestError::BackendError { context, details: e.to_string() }),
    }
}

/// Raw query string parameters in the order they were given.
pub(crate) type QueryPairs = Vec<(String, String)>;

/// Returns the first value given to the `key` query parameter, ignoring any repetitions.
pub(crate) fn first_param(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    let api = Router::new()
        .route("/actors", get(actors_get::handler))
        .route("/actors/:id", get(actor_get::handler))
        .route("/actors/:id/detail", get(actor_detail_get::handler))
        .route("/actors/:id/films", get(actor_films_get::handler))
        .route("/colors", get(colors_get::handler).post(colors_post::handler))
        .route(
            "/colors/:id",
            get(color_get::handler).put(color_put::handler).delete(color_delete::handler),
        )
        .route("/customers", get(customers_get::handler))
        .route("/customers/:id", get(customer_get::handler))
        .route("/customers/:id/detail", get(customer_detail_get::handler))
        .route("/films", get(films_get::handler))
        .route("/films/:id", get(film_get::handler))
        .route("/films/:id/actors", get(film_actors_get::handler))
        .route("/films/:id/detail", get(film_detail_get::handler))
        .route("/inventory-in-stock/:film_id/:store_id", get(inventory_in_stock_get::handler))
        .route("/movies", get(movies_get::handler))
        .route("/stores", get(stores_get::handler))
        .route("/stores/:id", get(store_get::handler))
        .with_state(driver);
    Router::new().route("/", get(root_get::handler)).nest("/api/v1", api)
}
