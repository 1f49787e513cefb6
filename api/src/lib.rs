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

//! REST gateway over the rental database and the movies and colors document store.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::{error, info};
use rental_api_core::db::Db;
use rental_api_core::db::mysql::{MysqlDb, MysqlOptions};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub(crate) mod db;
pub(crate) mod docs;
use docs::DocumentStore;
use docs::mongo::MongoDocumentStore;
pub use docs::mongo::MongoOptions;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;
use rest::app;

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutting down");
}

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// The document store is contacted before accepting any request.  If it cannot be reached, the
/// server still starts but the APIs that need it report that they are unavailable.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db_opts: MysqlOptions,
    docs_opts: MongoOptions,
) -> Result<(), Box<dyn Error>> {
    let db = Arc::new(MysqlDb::connect(db_opts)?);

    let docs: Option<Arc<dyn DocumentStore + Send + Sync>> =
        match MongoDocumentStore::connect(docs_opts).await {
            Ok(docs) => Some(Arc::new(docs)),
            Err(e) => {
                error!("Error connecting to MongoDB: {}", e);
                None
            }
        };

    let driver = Driver::new(db.clone(), docs);
    let app = app(driver);

    let bind_addr = bind_addr.into();
    let result = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => {
            info!("Server is running on {}", bind_addr);
            axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await
        }
        Err(e) => Err(e),
    };

    db.close().await;
    Ok(result?)
}
