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

//! API to update the fields of a color.

use crate::driver::Driver;
use crate::model::{Document, DocumentId};
use crate::rest::parse_document;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use rental_api_core::rest::{RestResult, ResultExt};
use serde::Serialize;

/// Context reported when the update fails.
const CONTEXT: &str = "Error updating data in the database";

/// Message returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct ColorUpdatedResponse {
    /// Human-readable description of the outcome.
    message: String,

    /// The fields that were set, as given in the request.
    #[serde(rename = "updatedColor")]
    updated_color: Document,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<DocumentId>,
    body: Bytes,
) -> RestResult<Json<ColorUpdatedResponse>> {
    let fields = parse_document(&body, CONTEXT)?;
    let updated_color = driver.update_color(id, fields).await.context(CONTEXT)?;
    Ok(Json(ColorUpdatedResponse {
        message: "Color updated successfully".to_owned(),
        updated_color,
    }))
}
