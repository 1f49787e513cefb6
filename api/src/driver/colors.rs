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

//! Operations against the colors collection.

use crate::driver::Driver;
use crate::model::{Document, DocumentId};
use rental_api_core::db::DbError;
use rental_api_core::driver::{DriverError, DriverResult};

/// Message reported when a color does not exist.
const COLOR_NOT_FOUND: &str = "Color not found";

/// Converts a document store error into a driver error, naming the color on `NotFound`.
fn map_color_error(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound(COLOR_NOT_FOUND.to_owned()),
        e => DriverError::from(e),
    }
}

impl Driver {
    /// Gets all colors.
    pub(crate) async fn list_colors(self) -> DriverResult<Vec<Document>> {
        let docs = self.docs()?;
        Ok(docs.list_colors().await?)
    }

    /// Stores a new `color` and returns it as stored, including its new identifier.
    pub(crate) async fn create_color(self, color: Document) -> DriverResult<Document> {
        let docs = self.docs()?;
        Ok(docs.insert_color(color).await?)
    }

    /// Gets the color `id`.
    pub(crate) async fn get_color(self, id: DocumentId) -> DriverResult<Document> {
        let docs = self.docs()?;
        docs.get_color(&id).await.map_err(map_color_error)
    }

    /// Sets `fields` on the color `id` and returns the fields that were applied.
    pub(crate) async fn update_color(
        self,
        id: DocumentId,
        fields: Document,
    ) -> DriverResult<Document> {
        let docs = self.docs()?;
        docs.update_color(&id, fields.clone()).await.map_err(map_color_error)?;
        Ok(fields)
    }

    /// Deletes the color `id`.
    pub(crate) async fn delete_color(self, id: DocumentId) -> DriverResult<()> {
        let docs = self.docs()?;
        docs.delete_color(&id).await.map_err(map_color_error)
    }
}
