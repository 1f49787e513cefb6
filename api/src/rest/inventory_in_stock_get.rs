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

//! API to get the copies of a film that are available at a store.

use crate::driver::Driver;
use crate::model::EntityId;
use crate::rest::Status;
use axum::Json;
use axum::extract::{Path, State};
use rental_api_core::rest::{RestResult, ResultExt};
use serde::Serialize;
use serde_json::Value;

/// Message returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct InventoryResponse {
    /// Outcome of the request.
    status: Status,

    /// Identifiers of the inventory items that are in stock.
    inventory_ids: Vec<Value>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path((film_id, store_id)): Path<(EntityId, EntityId)>,
) -> RestResult<Json<InventoryResponse>> {
    let inventory_ids = driver
        .get_inventory_in_stock(film_id, store_id)
        .await
        .context("Error executing stored procedure")?;
    Ok(Json(InventoryResponse { status: Status::Success, inventory_ids }))
}
