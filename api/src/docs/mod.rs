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

//! Document store abstraction in terms of the operations needed by the server.

use crate::model::{Document, DocumentId, MovieFilter};
use async_trait::async_trait;
use rental_api_core::db::DbResult;

#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod mongo;

/// Name of the field that holds the identifier of a document.
pub(crate) const ID_FIELD: &str = "_id";

/// Operations to interact with the movies catalog and the colors collection.
///
/// Documents are schemaless JSON objects.  Identifiers are rendered as strings when documents
/// are returned.
#[async_trait]
pub(crate) trait DocumentStore {
    /// Returns up to `limit` movies that match `filter`.
    async fn find_movies(&self, filter: &MovieFilter, limit: i64) -> DbResult<Vec<Document>>;

    /// Returns all colors.
    async fn list_colors(&self) -> DbResult<Vec<Document>>;

    /// Stores a new `color` and returns it as stored, which includes its identifier.
    async fn insert_color(&self, color: Document) -> DbResult<Document>;

    /// Returns the color identified by `id`, or `NotFound`.
    async fn get_color(&self, id: &DocumentId) -> DbResult<Document>;

    /// Sets the given `fields` on the color identified by `id`, leaving any others untouched.
    /// Returns `NotFound` if no color has this `id`.
    async fn update_color(&self, id: &DocumentId, fields: Document) -> DbResult<()>;

    /// Deletes the color identified by `id`.  Returns `NotFound` if no color has this `id`.
    async fn delete_color(&self, id: &DocumentId) -> DbResult<()>;
}
