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

//! API to create a new color.

use crate::docs::ID_FIELD;
use crate::driver::Driver;
use crate::model::Document;
use crate::rest::parse_document;
use axum::body::Bytes;
use axum::extract::State;
use axum::{Json, http};
use rental_api_core::rest::{RestResult, ResultExt};
use serde::Serialize;
use serde_json::Value;

/// Context reported when the creation fails.
const CONTEXT: &str = "Error inserting data into the database";

/// Message returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct ColorCreatedResponse {
    /// Human-readable description of the outcome.
    message: String,

    /// Identifier assigned to the new color.
    #[serde(rename = "insertedId")]
    inserted_id: Value,

    /// The color as stored, including its identifier.
    color: Document,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    body: Bytes,
) -> RestResult<(http::StatusCode, Json<ColorCreatedResponse>)> {
    let color = parse_document(&body, CONTEXT)?;
    let color = driver.create_color(color).await.context(CONTEXT)?;
    let inserted_id = color.get(ID_FIELD).cloned().unwrap_or(Value::Null);
    let response =
        ColorCreatedResponse { message: "Color added successfully".to_owned(), inserted_id, color };
    Ok((http::StatusCode::CREATED, Json(response)))
}
