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

//! Test utilities for the business layer.

use crate::db;
use crate::docs::memory::{MemoryDocumentStore, sample_movies};
use crate::docs::{DocumentStore, ID_FIELD};
use crate::driver::Driver;
use crate::model::{Document, DocumentId};
use rental_api_core::db::Db;
use rental_api_core::db::sqlite::{self, SqliteDb};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The relational database, seeded with the test schema.
    db: Arc<SqliteDb>,

    /// The document store, if the test runs with one.
    docs: Option<Arc<MemoryDocumentStore>>,

    /// The driver under test, wired to the backends above.
    driver: Driver,
}

impl TestContext {
    /// Initializes the test context with a relational database and, if `with_docs` is true, a
    /// document store.
    async fn setup_with(with_docs: bool) -> Self {
        let db = Arc::new(sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();

        let docs = if with_docs {
            Some(Arc::new(MemoryDocumentStore::new(sample_movies())))
        } else {
            None
        };

        let driver = Driver::new(
            db.clone(),
            docs.clone().map(|d| d as Arc<dyn DocumentStore + Send + Sync>),
        );
        Self { db, docs, driver }
    }

    /// Initializes the test context with all backends available.
    pub(crate) async fn setup() -> Self {
        Self::setup_with(true).await
    }

    /// Initializes the test context as if the document store was unreachable during startup.
    pub(crate) async fn setup_without_documents() -> Self {
        Self::setup_with(false).await
    }

    /// Returns a driver to run a single operation.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Makes all future relational queries fail.
    pub(crate) async fn break_database(&self) {
        self.db.close().await;
    }

    /// Returns the document store, which must have been configured.
    fn docs(&self) -> &MemoryDocumentStore {
        self.docs.as_ref().expect("Test context has no document store")
    }

    /// Makes all future document store operations fail.
    pub(crate) fn break_documents(&self) {
        self.docs().break_backend();
    }

    /// Stores `color` bypassing the driver and returns its identifier.
    pub(crate) async fn insert_color(&self, color: Document) -> DocumentId {
        let stored = self.docs().insert_color(color).await.unwrap();
        DocumentId::from(stored[ID_FIELD].as_str().unwrap())
    }

    /// Returns all stored colors bypassing the driver.
    pub(crate) async fn colors(&self) -> Vec<Document> {
        self.docs().colors().await
    }
}
