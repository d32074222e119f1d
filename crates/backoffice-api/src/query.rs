// List query parameters shared by every paged endpoint.
//
// `sort` follows `key:dir[,key:dir]*`, `page` starts at 1, and
// `createdFrom` is a `YYYY-MM-DD HH:MM:SS` timestamp. Resource-specific
// filters (e.g. `nickname`, `tree`) ride along as extra pairs.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::Error;

const CREATED_FROM_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sort direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Validated sort expression, e.g. `id:desc,createdAt:asc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort(Vec<(String, String)>);

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

impl Sort {
    /// Sort by a single key.
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self(vec![(key.into(), direction.to_string())])
    }

    /// Append another key.
    pub fn then(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.0.push((key.into(), direction.to_string()));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, d)| (k.as_str(), d.as_str()))
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::by("id", SortDirection::Desc)
    }
}

impl FromStr for Sort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidQuery {
            field: "sort",
            reason: format!("expected key:dir[,key:dir]*, got '{s}'"),
        };
        let mut pairs = Vec::new();
        for part in s.split(',') {
            let (key, dir) = part.split_once(':').ok_or_else(invalid)?;
            if !is_word(key) || !is_word(dir) {
                return Err(invalid());
            }
            pairs.push((key.to_owned(), dir.to_owned()));
        }
        Ok(Self(pairs))
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, dir)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}:{dir}")?;
        }
        Ok(())
    }
}

/// Query for a paged list endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub sort: Option<Sort>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub created_from: Option<NaiveDateTime>,
    /// Resource-specific filters, sent verbatim as query pairs.
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn created_from(mut self, at: NaiveDateTime) -> Self {
        self.created_from = Some(at);
        self
    }

    /// Add a resource-specific filter (`nickname`, `tree`, ...).
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Add filters from a JSON object, skipping `null` and empty-string
    /// values.
    ///
    /// Strings are sent as-is; every other scalar is sent in its JSON form.
    /// Arrays are sent as repeated pairs.
    pub fn extend_filters<'a>(mut self, filters: impl IntoIterator<Item = (&'a String, &'a Value)>) -> Self {
        for (key, value) in filters {
            match value {
                Value::Null => {}
                Value::String(s) if s.is_empty() => {}
                Value::String(s) => self.filters.push((key.clone(), s.clone())),
                Value::Array(items) => {
                    for item in items.iter().filter(|v| !v.is_null() && v.as_str() != Some("")) {
                        let rendered = item.as_str().map_or_else(|| item.to_string(), str::to_owned);
                        self.filters.push((key.clone(), rendered));
                    }
                }
                other => self.filters.push((key.clone(), other.to_string())),
            }
        }
        self
    }

    /// Validate and flatten into `(key, value)` query pairs.
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>, Error> {
        let mut pairs = Vec::new();
        if let Some(ref sort) = self.sort {
            pairs.push(("sort".to_owned(), sort.to_string()));
        }
        if let Some(page) = self.page {
            if page < 1 {
                return Err(Error::InvalidQuery {
                    field: "page",
                    reason: "page numbers start at 1".into(),
                });
            }
            pairs.push(("page".to_owned(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_owned(), size.to_string()));
        }
        if let Some(at) = self.created_from {
            pairs.push((
                "createdFrom".to_owned(),
                at.format(CREATED_FROM_FORMAT).to_string(),
            ));
        }
        pairs.extend(self.filters.iter().cloned());
        Ok(pairs)
    }
}

/// Parse a `createdFrom` timestamp in the backend's format.
pub fn parse_created_from(s: &str) -> Result<NaiveDateTime, Error> {
    NaiveDateTime::parse_from_str(s, CREATED_FROM_FORMAT).map_err(|e| Error::InvalidQuery {
        field: "createdFrom",
        reason: format!("expected YYYY-MM-DD HH:MM:SS: {e}"),
    })
}
