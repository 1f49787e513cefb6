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

//! Business logic for the service.

use crate::docs::DocumentStore;
use rental_api_core::db::Db;
use rental_api_core::driver::{DriverError, DriverResult};
use std::sync::Arc;

mod colors;
mod movies;
mod rentals;
#[cfg(test)]
pub(crate) mod testutils;

/// Message reported when an operation needs the document store but it could not be reached
/// during startup.
const DOCUMENTS_UNAVAILABLE: &str = "Document store is not available";

/// Business logic.
///
/// Every public operation talks to the backends at most once per call, so the operations
/// consume the driver to make it clear that each request gets its own clone.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The relational database with the rental data.
    db: Arc<dyn Db + Send + Sync>,

    /// The document store with the movies and colors, if it was reachable during startup.
    docs: Option<Arc<dyn DocumentStore + Send + Sync>>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(
        db: Arc<dyn Db + Send + Sync>,
        docs: Option<Arc<dyn DocumentStore + Send + Sync>>,
    ) -> Self {
        Self { db, docs }
    }

    /// Returns the document store or fails if it is not available.
    fn docs(&self) -> DriverResult<&(dyn DocumentStore + Send + Sync)> {
        match self.docs.as_ref() {
            Some(docs) => Ok(docs.as_ref()),
            None => Err(DriverError::Unavailable(DOCUMENTS_UNAVAILABLE.to_owned())),
        }
    }
}
