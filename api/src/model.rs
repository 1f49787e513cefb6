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

//! High-level data types.

use derive_more::{AsRef, Display};
use serde::Deserialize;

/// A document as exchanged with the document store, keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Identifier of a relational entity as given in a request path.
///
/// Identifiers are opaque: they are bound as-is into parameterized queries and it is up to the
/// database to decide whether they match anything.
#[derive(AsRef, Clone, Deserialize)]
#[as_ref(str)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[serde(transparent)]
pub(crate) struct EntityId(String);

#[cfg(test)]
impl From<&'static str> for EntityId {
    fn from(raw: &'static str) -> Self {
        Self(raw.to_owned())
    }
}

/// Identifier of a document as given in a request path.
///
/// No validation happens here: the document store rejects malformed identifiers as a backend
/// error when it tries to use them.
#[derive(AsRef, Clone, Deserialize, Display)]
#[as_ref(str)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[serde(transparent)]
pub(crate) struct DocumentId(String);

#[cfg(test)]
impl From<&str> for DocumentId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Tables of the rental schema whose columns can be listed.
#[derive(Clone, Copy)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) enum Table {
    /// The `actor` table.
    Actor,

    /// The `customer` table.
    Customer,

    /// The `film` table.
    Film,

    /// The `store` table.
    Store,
}

impl Table {
    /// Returns the name of the table in the schema.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Table::Actor => "actor",
            Table::Customer => "customer",
            Table::Film => "film",
            Table::Store => "store",
        }
    }
}

/// Year requested when filtering movies.
#[derive(Clone, Copy)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) enum YearFilter {
    /// Only movies released in this year.
    Is(i64),

    /// The year could not be parsed so no movie can match it.
    Unparseable,
}

impl YearFilter {
    /// Parses a year from the leading integer in `raw`, ignoring any trailing garbage, so that
    /// `"1995abc"` means 1995.
    pub(crate) fn parse(raw: &str) -> Self {
        let raw = raw.trim_start();
        let (sign, digits) = match raw.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
        match digits[..end].parse::<i64>() {
            Ok(year) => YearFilter::Is(sign * year),
            Err(_) => YearFilter::Unparseable,
        }
    }
}

/// Criteria to look up movies.  Absent criteria match everything.
#[derive(Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct MovieFilter {
    /// Genre that must appear in the movie's `genres`.
    pub(crate) genre: Option<String>,

    /// Release year of the movie.
    pub(crate) year: Option<YearFilter>,

    /// Director that must appear in the movie's `directors`.
    pub(crate) director: Option<String>,
}

impl MovieFilter {
    /// Builds a filter from raw query parameters.  Empty parameters are treated as absent.
    pub(crate) fn new(
        genre: Option<String>,
        year: Option<String>,
        director: Option<String>,
    ) -> Self {
        let genre = genre.filter(|s| !s.is_empty());
        let year = year.filter(|s| !s.is_empty()).map(|s| YearFilter::parse(&s));
        let director = director.filter(|s| !s.is_empty());
        Self { genre, year, director }
    }
}
