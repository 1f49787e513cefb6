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

//! API to search films by title or to list the columns of the film table.

use crate::driver::Driver;
use crate::model::Table;
use crate::rest::{ColumnsResponse, QueryPairs, Status, first_param};
use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use rental_api_core::db::Record;
use rental_api_core::rest::{RestResult, ResultExt};
use serde::Serialize;

/// Context reported when the database fails.
const CONTEXT: &str = "Error querying the database";

/// Message returned by this API when searching.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct SearchResponse {
    /// Outcome of the request.
    status: Status,

    /// Films whose title matches the query.
    results: Vec<Record>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Query(pairs): Query<QueryPairs>,
) -> RestResult<Response> {
    match first_param(&pairs, "query").filter(|text| !text.is_empty()) {
        Some(text) => {
            let results = driver.search_films(&text).await.context(CONTEXT)?;
            Ok(Json(SearchResponse { status: Status::Success, results }).into_response())
        }
        None => {
            let columns = driver.get_columns(Table::Film).await.context(CONTEXT)?;
            Ok(Json(ColumnsResponse { status: Status::Success, columns }).into_response())
        }
    }
}
