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

//! In-memory implementation of the document store for testing purposes.

use crate::docs::{DocumentStore, ID_FIELD};
use crate::model::{Document, DocumentId, MovieFilter, YearFilter};
use async_trait::async_trait;
use futures::lock::Mutex;
use rental_api_core::db::{DbError, DbResult};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Checks if `field` in `doc` is `value` or an array that contains `value`.
fn has_member(doc: &Document, field: &str, value: &str) -> bool {
    match doc.get(field) {
        Some(Value::Array(values)) => values.iter().any(|v| v.as_str() == Some(value)),
        Some(Value::String(s)) => s == value,
        _ => false,
    }
}

/// Checks if `movie` matches all criteria in `filter`.
fn matches(movie: &Document, filter: &MovieFilter) -> bool {
    if let Some(genre) = filter.genre.as_ref() {
        if !has_member(movie, "genres", genre) {
            return false;
        }
    }
    match filter.year {
        Some(YearFilter::Is(year)) => {
            if movie.get("year").and_then(Value::as_i64) != Some(year) {
                return false;
            }
        }
        Some(YearFilter::Unparseable) => return false,
        None => (),
    }
    if let Some(director) = filter.director.as_ref() {
        if !has_member(movie, "directors", director) {
            return false;
        }
    }
    true
}

/// Returns a small catalog of movies with the same shape as the ones in the real catalog.
pub(crate) fn sample_movies() -> Vec<Document> {
    let raw = [
        ("Toy Story", 1995, &["Animation", "Comedy"][..], &["John Lasseter"][..]),
        ("Heat", 1995, &["Crime", "Drama"][..], &["Michael Mann"][..]),
        ("Casino", 1995, &["Crime", "Drama"][..], &["Martin Scorsese"][..]),
        ("Jumanji", 1995, &["Adventure", "Family"][..], &["Joe Johnston"][..]),
        ("Sabrina", 1995, &["Comedy", "Romance"][..], &["Sydney Pollack"][..]),
        ("Clueless", 1995, &["Comedy"][..], &["Amy Heckerling"][..]),
        ("Braveheart", 1995, &["Drama", "War"][..], &["Mel Gibson"][..]),
        ("Se7en", 1995, &["Crime", "Mystery"][..], &["David Fincher"][..]),
        ("Apollo 13", 1995, &["Drama"][..], &["Ron Howard"][..]),
        (
            "Four Rooms",
            1995,
            &["Comedy"][..],
            &["Allison Anders", "Alexandre Rockwell", "Robert Rodriguez", "Quentin Tarantino"][..],
        ),
        ("Grumpier Old Men", 1995, &["Comedy", "Romance"][..], &["Howard Deutch"][..]),
        ("Annie Hall", 1977, &["Comedy", "Romance"][..], &["Woody Allen"][..]),
    ];
    raw.iter()
        .enumerate()
        .map(|(i, (title, year, genres, directors))| {
            let mut movie = Document::new();
            movie.insert(ID_FIELD.to_owned(), Value::from(format!("{:024x}", 0xf000 + i)));
            movie.insert("title".to_owned(), Value::from(*title));
            movie.insert("year".to_owned(), Value::from(*year));
            movie.insert("genres".to_owned(), Value::from(genres.to_vec()));
            movie.insert("directors".to_owned(), Value::from(directors.to_vec()));
            movie
        })
        .collect()
}

/// Document store that keeps all documents in memory.
///
/// Identifiers are validated with the same rules as MongoDB object identifiers so that malformed
/// identifiers surface as backend errors.
#[derive(Default)]
pub(crate) struct MemoryDocumentStore {
    /// The movies catalog, which is read-only.
    movies: Vec<Document>,

    /// The colors, in insertion order.
    colors: Mutex<Vec<Document>>,

    /// Counter to generate identifiers for new colors.
    last_id: AtomicU64,

    /// Whether all operations should fail as if the backend was unreachable.
    broken: AtomicBool,
}

impl MemoryDocumentStore {
    /// Creates a new store with a fixed catalog of `movies` and no colors.
    pub(crate) fn new(movies: Vec<Document>) -> Self {
        Self { movies, ..Default::default() }
    }

    /// Makes all future operations fail.
    pub(crate) fn break_backend(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    /// Returns an error if the store has been broken.
    fn check_available(&self) -> DbResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(DbError::BackendError("Connection refused".to_owned()));
        }
        Ok(())
    }

    /// Validates the format of `id` and returns it in the canonical lowercase form.
    fn parse_id(id: &DocumentId) -> DbResult<String> {
        let id: &str = id.as_ref();
        if id.len() != 24 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DbError::BackendError(format!(
                "Invalid object id '{}': must be a 24 character hex string",
                id
            )));
        }
        Ok(id.to_ascii_lowercase())
    }

    /// Returns a copy of all stored colors.
    pub(crate) async fn colors(&self) -> Vec<Document> {
        self.colors.lock().await.clone()
    }
}

/// Returns true if `color` is identified by `id`.
fn has_id(color: &Document, id: &str) -> bool {
    color.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_movies(&self, filter: &MovieFilter, limit: i64) -> DbResult<Vec<Document>> {
        self.check_available()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.movies.iter().filter(|m| matches(m, filter)).take(limit).cloned().collect())
    }

    async fn list_colors(&self) -> DbResult<Vec<Document>> {
        self.check_available()?;
        Ok(self.colors.lock().await.clone())
    }

    async fn insert_color(&self, mut color: Document) -> DbResult<Document> {
        self.check_available()?;
        if !color.contains_key(ID_FIELD) {
            let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
            color.insert(ID_FIELD.to_owned(), Value::from(format!("{:024x}", id)));
        }
        let mut colors = self.colors.lock().await;
        if colors.iter().any(|c| c.get(ID_FIELD) == color.get(ID_FIELD)) {
            return Err(DbError::BackendError("Duplicate key error on _id".to_owned()));
        }
        colors.push(color.clone());
        Ok(color)
    }

    async fn get_color(&self, id: &DocumentId) -> DbResult<Document> {
        self.check_available()?;
        let id = Self::parse_id(id)?;
        let colors = self.colors.lock().await;
        match colors.iter().find(|c| has_id(c, &id)) {
            Some(color) => Ok(color.clone()),
            None => Err(DbError::NotFound),
        }
    }

    async fn update_color(&self, id: &DocumentId, fields: Document) -> DbResult<()> {
        self.check_available()?;
        let id = Self::parse_id(id)?;
        let mut colors = self.colors.lock().await;
        match colors.iter_mut().find(|c| has_id(c, &id)) {
            Some(color) => {
                if fields.contains_key(ID_FIELD) {
                    return Err(DbError::BackendError(
                        "Performing an update on the path '_id' would modify the immutable field \
                         '_id'"
                            .to_owned(),
                    ));
                }
                for (key, value) in fields {
                    color.insert(key, value);
                }
                Ok(())
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn delete_color(&self, id: &DocumentId) -> DbResult<()> {
        self.check_available()?;
        let id = Self::parse_id(id)?;
        let mut colors = self.colors.lock().await;
        let before = colors.len();
        colors.retain(|c| !has_id(c, &id));
        if colors.len() == before {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn movie(title: &str, year: i64, genres: &[&str], directors: &[&str]) -> Document {
        json!({"title": title, "year": year, "genres": genres, "directors": directors})
            .as_object()
            .unwrap()
            .clone()
    }

    fn titles(movies: &[Document]) -> Vec<&str> {
        movies.iter().map(|m| m["title"].as_str().unwrap()).collect()
    }

    fn store() -> MemoryDocumentStore {
        MemoryDocumentStore::new(vec![
            movie("Toy Story", 1995, &["Animation", "Comedy"], &["John Lasseter"]),
            movie("Heat", 1995, &["Crime"], &["Michael Mann"]),
            movie("Annie Hall", 1977, &["Comedy", "Romance"], &["Woody Allen"]),
        ])
    }

    #[tokio::test]
    async fn test_find_movies_membership_and_year() {
        let store = store();

        let filter = MovieFilter::new(Some("Comedy".to_owned()), None, None);
        assert_eq!(
            vec!["Toy Story", "Annie Hall"],
            titles(&store.find_movies(&filter, 10).await.unwrap())
        );

        let filter = MovieFilter::new(Some("Comedy".to_owned()), Some("1995".to_owned()), None);
        assert_eq!(vec!["Toy Story"], titles(&store.find_movies(&filter, 10).await.unwrap()));

        let filter = MovieFilter::new(None, None, Some("Woody Allen".to_owned()));
        assert_eq!(vec!["Annie Hall"], titles(&store.find_movies(&filter, 10).await.unwrap()));

        let filter = MovieFilter::new(None, Some("abc".to_owned()), None);
        assert!(store.find_movies(&filter, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_movies_limit() {
        let store = store();
        assert_eq!(2, store.find_movies(&MovieFilter::default(), 2).await.unwrap().len());
    }

    #[tokio::test]
    async fn test_colors_lifecycle() {
        let store = MemoryDocumentStore::default();

        let stored = store.insert_color(json!({"name": "red"}).as_object().unwrap().clone()).await;
        let stored = stored.unwrap();
        let raw_id = stored[ID_FIELD].as_str().unwrap().to_owned();
        assert_eq!(24, raw_id.len());
        let id = DocumentId::from(raw_id.as_str());
        assert_eq!(vec![stored.clone()], store.list_colors().await.unwrap());

        store.update_color(&id, json!({"hex": "#f00"}).as_object().unwrap().clone()).await.unwrap();
        assert_eq!(
            json!({"name": "red", "_id": raw_id, "hex": "#f00"}),
            Value::Object(store.get_color(&id).await.unwrap())
        );

        store.delete_color(&id).await.unwrap();
        assert_eq!(DbError::NotFound, store.get_color(&id).await.unwrap_err());
        assert_eq!(DbError::NotFound, store.delete_color(&id).await.unwrap_err());
        assert_eq!(
            DbError::NotFound,
            store.update_color(&id, Document::new()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_ids_ignore_case() {
        let store = MemoryDocumentStore::default();

        let stored = store.insert_color(json!({"name": "red"}).as_object().unwrap().clone()).await;
        let raw_id = stored.unwrap()[ID_FIELD].as_str().unwrap().to_ascii_uppercase();
        let id = DocumentId::from(raw_id.as_str());

        assert_eq!(json!("red"), store.get_color(&id).await.unwrap()["name"]);
        store.update_color(&id, json!({"hex": "#f00"}).as_object().unwrap().clone()).await.unwrap();
        store.delete_color(&id).await.unwrap();
        assert!(store.list_colors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_id_is_immutable() {
        let store = MemoryDocumentStore::default();

        let stored = store.insert_color(json!({"name": "red"}).as_object().unwrap().clone()).await;
        let stored = stored.unwrap();
        let raw_id = stored[ID_FIELD].as_str().unwrap().to_owned();
        let id = DocumentId::from(raw_id.as_str());

        let fields = json!({"_id": raw_id, "name": "blue"}).as_object().unwrap().clone();
        match store.update_color(&id, fields).await {
            Err(DbError::BackendError(e)) => assert!(e.contains("immutable field '_id'")),
            e => panic!("Must have failed with a BackendError but got: {:?}", e),
        }
        assert_eq!(vec![stored], store.list_colors().await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let store = MemoryDocumentStore::default();
        match store.get_color(&DocumentId::from("xyz")).await {
            Err(DbError::BackendError(e)) => assert!(e.contains("24 character hex")),
            e => panic!("Must have failed with a BackendError but got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_broken_backend() {
        let store = store();
        store.break_backend();
        match store.list_colors().await {
            Err(DbError::BackendError(_)) => (),
            e => panic!("Must have failed with a BackendError but got: {:?}", e),
        }
        match store.find_movies(&MovieFilter::default(), 10).await {
            Err(DbError::BackendError(_)) => (),
            e => panic!("Must have failed with a BackendError but got: {:?}", e),
        }
    }
}
