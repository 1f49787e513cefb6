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

//! API to get the denormalized details of a actor.

use crate::driver::Driver;
use crate::model::EntityId;
use crate::rest::Status;
use axum::Json;
use axum::extract::{Path, State};
use rental_api_core::db::Record;
use rental_api_core::rest::{RestResult, ResultExt};
use serde::Serialize;

/// Message returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct ActorDetailsResponse {
    /// Outcome of the request.
    status: Status,

    /// The actor's row in the `actor_info` view.
    actor_details: Record,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<EntityId>,
) -> RestResult<Json<ActorDetailsResponse>> {
    let actor_details = driver.get_actor_details(id).await.context("Error querying the database")?;
    Ok(Json(ActorDetailsResponse { status: Status::Success, actor_details }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use rental_api_core::rest::testutils::*;
    use serde_json::json;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/api/v1/actors/{}/detail", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route("2"))
            .send_empty()
            .await
            .expect_json::<ActorDetailsResponse>()
            .await;
        assert_eq!(Status::Success, response.status);
        assert_eq!(json!(2), response.actor_details["actor_id"]);
        assert_eq!(json!("NICK"), response.actor_details["first_name"]);
        let film_info = response.actor_details["film_info"].as_str().unwrap();
        assert!(film_info.contains("ACADEMY DINOSAUR"));
        assert!(film_info.contains("MATRIX SNOWMAN"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("999"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Actor not found in actor_info$")
            .await;
    }

    #[tokio::test]
    async fn test_backend_error() {
        let context = TestContext::setup().await;
        context.break_database().await;

        OneShotBuilder::new(context.app(), route("2"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("^Error querying the database$")
            .await;
    }
}
