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

//! Implementation of the document store using MongoDB.

use crate::docs::{DocumentStore, ID_FIELD};
use crate::model::{Document, DocumentId, MovieFilter, YearFilter};
use async_trait::async_trait;
use derivative::Derivative;
use futures::TryStreamExt;
use log::info;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, doc};
use mongodb::{Client, Collection};
use rental_api_core::db::{DbError, DbResult, format_timestamp};
use rental_api_core::env::{get_optional_var, get_required_var};
use serde_json::Value;
use time::OffsetDateTime;

/// Default value for the `movies_database` configuration property.
const DEFAULT_MOVIES_DATABASE: &str = "sample_mflix";

/// Default value for the `colors_database` configuration property.
const DEFAULT_COLORS_DATABASE: &str = "cs480-project2";

/// Name of the collection that holds the movies catalog.
const MOVIES_COLLECTION: &str = "movies";

/// Name of the collection that holds the colors.
const COLORS_COLLECTION: &str = "colors";

/// Takes a raw MongoDB error `e` and converts it to our generic error type.
fn map_mongo_error(e: mongodb::error::Error) -> DbError {
    DbError::BackendError(e.to_string())
}

/// Options to establish a connection to a MongoDB deployment.
#[derive(Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct MongoOptions {
    /// Connection string for the deployment, which may carry credentials.
    #[derivative(Debug = "ignore")]
    pub uri: String,

    /// Name of the database that holds the movies catalog.
    pub movies_database: String,

    /// Name of the database that holds the colors.
    pub colors_database: String,
}

impl MongoOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_URI`, `<prefix>_MOVIES_DATABASE` and
    /// `<prefix>_COLORS_DATABASE`.
    pub fn from_env(prefix: &str) -> Result<MongoOptions, String> {
        Ok(MongoOptions {
            uri: get_required_var::<String>(prefix, "URI")?,
            movies_database: get_optional_var::<String>(prefix, "MOVIES_DATABASE")?
                .unwrap_or_else(|| DEFAULT_MOVIES_DATABASE.to_owned()),
            colors_database: get_optional_var::<String>(prefix, "COLORS_DATABASE")?
                .unwrap_or_else(|| DEFAULT_COLORS_DATABASE.to_owned()),
        })
    }
}

/// Converts a BSON `value` into JSON.  Object identifiers become their hex representation and
/// dates become ISO 8601 strings.
fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::from(oid.to_hex()),
        Bson::DateTime(dt) => {
            let nanos = i128::from(dt.timestamp_millis()) * 1_000_000;
            match OffsetDateTime::from_unix_timestamp_nanos(nanos) {
                Ok(ts) => Value::from(format_timestamp(ts)),
                Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
            }
        }
        Bson::Document(doc) => Value::Object(document_to_json(doc)),
        Bson::Array(values) => Value::Array(values.into_iter().map(bson_to_json).collect()),
        value => value.into_relaxed_extjson(),
    }
}

/// Converts a BSON `doc` into a JSON document, preserving the order of its fields.
fn document_to_json(doc: bson::Document) -> Document {
    doc.into_iter().map(|(key, value)| (key, bson_to_json(value))).collect()
}

/// Converts a JSON `doc` into BSON.
fn document_from_json(doc: &Document) -> DbResult<bson::Document> {
    bson::to_document(doc).map_err(|e| DbError::BackendError(e.to_string()))
}

/// Parses the textual `id` of a document into an object identifier.
fn parse_id(id: &DocumentId) -> DbResult<ObjectId> {
    ObjectId::parse_str(id.as_ref()).map_err(|e| DbError::BackendError(e.to_string()))
}

/// Builds the query to look up movies that match `filter`.
fn movies_query(filter: &MovieFilter) -> bson::Document {
    let mut query = bson::Document::new();
    if let Some(genre) = filter.genre.as_ref() {
        query.insert("genres", doc! { "$in": [genre.as_str()] });
    }
    if let Some(year) = filter.year {
        let year = match year {
            YearFilter::Is(year) => Bson::Int64(year),
            YearFilter::Unparseable => Bson::Double(f64::NAN),
        };
        query.insert("year", year);
    }
    if let Some(director) = filter.director.as_ref() {
        query.insert("directors", doc! { "$in": [director.as_str()] });
    }
    query
}

/// Document store backed by a MongoDB deployment.
pub(crate) struct MongoDocumentStore {
    /// Collection that holds the movies catalog.
    movies: Collection<bson::Document>,

    /// Collection that holds the colors.
    colors: Collection<bson::Document>,
}

impl MongoDocumentStore {
    /// Connects to the deployment described by `opts` and verifies that it answers requests.
    pub(crate) async fn connect(opts: MongoOptions) -> DbResult<Self> {
        let client = Client::with_uri_str(&opts.uri).await.map_err(map_mongo_error)?;
        client.database("admin").run_command(doc! { "ping": 1 }).await.map_err(map_mongo_error)?;
        info!("Connected to MongoDB");

        let movies = client.database(&opts.movies_database).collection(MOVIES_COLLECTION);
        let colors = client.database(&opts.colors_database).collection(COLORS_COLLECTION);
        Ok(Self { movies, colors })
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn find_movies(&self, filter: &MovieFilter, limit: i64) -> DbResult<Vec<Document>> {
        let cursor =
            self.movies.find(movies_query(filter)).limit(limit).await.map_err(map_mongo_error)?;
        let movies: Vec<bson::Document> = cursor.try_collect().await.map_err(map_mongo_error)?;
        Ok(movies.into_iter().map(document_to_json).collect())
    }

    async fn list_colors(&self) -> DbResult<Vec<Document>> {
        let cursor = self.colors.find(doc! {}).await.map_err(map_mongo_error)?;
        let colors: Vec<bson::Document> = cursor.try_collect().await.map_err(map_mongo_error)?;
        Ok(colors.into_iter().map(document_to_json).collect())
    }

    async fn insert_color(&self, color: Document) -> DbResult<Document> {
        let mut color = document_from_json(&color)?;
        if !color.contains_key(ID_FIELD) {
            color.insert(ID_FIELD, ObjectId::new());
        }
        self.colors.insert_one(&color).await.map_err(map_mongo_error)?;
        Ok(document_to_json(color))
    }

    async fn get_color(&self, id: &DocumentId) -> DbResult<Document> {
        let oid = parse_id(id)?;
        match self.colors.find_one(doc! { "_id": oid }).await.map_err(map_mongo_error)? {
            Some(color) => Ok(document_to_json(color)),
            None => Err(DbError::NotFound),
        }
    }

    async fn update_color(&self, id: &DocumentId, fields: Document) -> DbResult<()> {
        let oid = parse_id(id)?;
        let fields = document_from_json(&fields)?;
        let result = self
            .colors
            .update_one(doc! { "_id": oid }, doc! { "$set": fields })
            .await
            .map_err(map_mongo_error)?;
        if result.matched_count == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete_color(&self, id: &DocumentId) -> DbResult<()> {
        let oid = parse_id(id)?;
        let result =
            self.colors.delete_one(doc! { "_id": oid }).await.map_err(map_mongo_error)?;
        if result.deleted_count == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
