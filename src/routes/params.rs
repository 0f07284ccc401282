use axum::{
    extract::{FromRequestParts, Query, rejection::QueryRejection},
    http::request::Parts,
};

/// A raw query-string value before any coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    /// The key was repeated, or written as `key[]`.
    List(Vec<String>),
}

impl QueryValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryValue::Text(value) => Some(value),
            QueryValue::List(_) => None,
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Text(first) => {
                *self = QueryValue::List(vec![std::mem::take(first), value]);
            }
            QueryValue::List(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

/// Untyped listing parameters, as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub limit: Option<QueryValue>,
    pub page: Option<QueryValue>,
    pub category: Option<QueryValue>,
    pub stock: Option<QueryValue>,
    pub sort: Option<QueryValue>,
}

impl ListingQuery {
    /// Groups decoded `key=value` pairs by key. Unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let (name, is_list) = match key.strip_suffix("[]") {
                Some(name) => (name, true),
                None => (key.as_str(), false),
            };
            let slot = match name {
                "limit" => &mut query.limit,
                "page" => &mut query.page,
                "category" => &mut query.category,
                "stock" => &mut query.stock,
                "sort" => &mut query.sort,
                _ => continue,
            };
            if let Some(existing) = slot.as_mut() {
                existing.push(value);
            } else if is_list {
                *slot = Some(QueryValue::List(vec![value]));
            } else {
                *slot = Some(QueryValue::Text(value));
            }
        }
        query
    }
}

impl<S> FromRequestParts<S> for ListingQuery
where
    S: Send + Sync,
{
    type Rejection = QueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;
        Ok(Self::from_pairs(pairs))
    }
}
