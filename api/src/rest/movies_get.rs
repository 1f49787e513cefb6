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

//! API to look up movies in the catalog.

use crate::driver::Driver;
use crate::model::{Document, MovieFilter};
use crate::rest::{QueryPairs, first_param};
use axum::Json;
use axum::extract::{Query, State};
use rental_api_core::rest::{RestResult, ResultExt};

/// Query parameters accepted by this API.
#[derive(Default)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct MoviesQuery {
    /// Genre that the movies must have.
    genre: Option<String>,

    /// Release year of the movies.  Only the leading integer is considered.
    year: Option<String>,

    /// Director that the movies must have.
    director: Option<String>,
}

impl MoviesQuery {
    /// Collects the parameters from the raw query `pairs`.  Repeated keys keep their first value.
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            genre: first_param(pairs, "genre"),
            year: first_param(pairs, "year"),
            director: first_param(pairs, "director"),
        }
    }
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Query(pairs): Query<QueryPairs>,
) -> RestResult<Json<Vec<Document>>> {
    let params = MoviesQuery::from_pairs(&pairs);
    let filter = MovieFilter::new(params.genre, params.year, params.director);
    let movies = driver.find_movies(filter).await.context("Error querying the database")?;
    Ok(Json(movies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use rental_api_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/v1/movies".to_owned())
    }

    fn titles(movies: &[Document]) -> Vec<&str> {
        movies.iter().map(|m| m["title"].as_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_no_filters_limits_results() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<Document>>()
            .await;
        assert_eq!(10, response.len());
        assert!(response.iter().all(|m| m["_id"].is_string()));
    }

    #[tokio::test]
    async fn test_genre_and_year() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(MoviesQuery {
                genre: Some("Comedy".to_owned()),
                year: Some("1995".to_owned()),
                ..Default::default()
            })
            .send_empty()
            .await
            .expect_json::<Vec<Document>>()
            .await;
        assert_eq!(
            vec!["Toy Story", "Sabrina", "Clueless", "Four Rooms", "Grumpier Old Men"],
            titles(&response)
        );
        for movie in &response {
            assert_eq!(1995, movie["year"]);
        }
    }

    #[tokio::test]
    async fn test_director_membership() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(MoviesQuery {
                director: Some("Quentin Tarantino".to_owned()),
                ..Default::default()
            })
            .send_empty()
            .await
            .expect_json::<Vec<Document>>()
            .await;
        assert_eq!(vec!["Four Rooms"], titles(&response));
    }

    #[tokio::test]
    async fn test_year_with_trailing_garbage() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(MoviesQuery { year: Some("1977abc".to_owned()), ..Default::default() })
            .send_empty()
            .await
            .expect_json::<Vec<Document>>()
            .await;
        assert_eq!(vec!["Annie Hall"], titles(&response));
    }

    #[tokio::test]
    async fn test_repeated_year_uses_first_value() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(vec![("year", "1977"), ("year", "1995")])
            .send_empty()
            .await
            .expect_json::<Vec<Document>>()
            .await;
        assert_eq!(vec!["Annie Hall"], titles(&response));
    }

    #[tokio::test]
    async fn test_unparseable_year_matches_nothing() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(MoviesQuery { year: Some("abc".to_owned()), ..Default::default() })
            .send_empty()
            .await
            .expect_json::<Vec<Document>>()
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_no_matches_is_ok() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(MoviesQuery { genre: Some("Western".to_owned()), ..Default::default() })
            .send_empty()
            .await
            .expect_json::<Vec<Document>>()
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_backend_error() {
        let context = TestContext::setup().await;
        context.break_documents();

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("^Error querying the database$")
            .await;
    }

    #[tokio::test]
    async fn test_unavailable() {
        let context = TestContext::setup_without_documents().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::SERVICE_UNAVAILABLE)
            .expect_error("^Document store is not available$")
            .await;
    }
}
