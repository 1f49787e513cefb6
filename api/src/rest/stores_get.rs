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

//! API to list the columns of the store table.

use crate::driver::Driver;
use crate::model::Table;
use crate::rest::Status;
use axum::Json;
use axum::extract::State;
use rental_api_core::rest::{RestResult, ResultExt};
use serde::Serialize;

/// Message returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct StoreColumnsResponse {
    /// Outcome of the request.
    status: Status,

    /// Names of the columns in declaration order.
    #[serde(rename = "columnNames")]
    column_names: Vec<String>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
) -> RestResult<Json<StoreColumnsResponse>> {
    let column_names =
        driver.get_columns(Table::Store).await.context("Error connecting to the database")?;
    Ok(Json(StoreColumnsResponse { status: Status::Success, column_names }))
}
