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

//! Operations against the movies catalog.

use crate::driver::Driver;
use crate::model::{Document, MovieFilter};
use rental_api_core::driver::DriverResult;

/// Maximum number of movies returned by a single lookup.
const MAX_MOVIES: i64 = 10;

impl Driver {
    /// Gets up to `MAX_MOVIES` movies that match `filter`.
    pub(crate) async fn find_movies(self, filter: MovieFilter) -> DriverResult<Vec<Document>> {
        let docs = self.docs()?;
        Ok(docs.find_movies(&filter, MAX_MOVIES).await?)
    }
}
