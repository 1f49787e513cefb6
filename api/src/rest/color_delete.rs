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

//! API to delete a color.

use crate::driver::Driver;
use crate::model::DocumentId;
use axum::Json;
use axum::extract::{Path, State};
use rental_api_core::rest::{RestResult, ResultExt};
use serde::Serialize;

/// Message returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct ColorDeletedResponse {
    /// Human-readable description of the outcome.
    message: String,

    /// Identifier of the deleted color, as given in the request.
    #[serde(rename = "deletedId")]
    deleted_id: String,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<DocumentId>,
) -> RestResult<Json<ColorDeletedResponse>> {
    let deleted_id = id.to_string();
    driver.delete_color(id).await.context("Error deleting data from the database")?;
    Ok(Json(ColorDeletedResponse { message: "Color deleted successfully".to_owned(), deleted_id }))
}
