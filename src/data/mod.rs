//! Query model for Harvey API requests
//!
//! A search call is described by a [`ResourceQuery`]: an ordered list of
//! wire-level parameter names and [`QueryValue`]s. The same query drives both
//! the outgoing URL and the cache key, so two calls that send the same
//! request always share a cache entry.

pub mod filters;
pub mod resource;
pub mod schema;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::HarveyError;

pub use filters::*;
pub use resource::ResourceKind;
pub use schema::{operations, schema, OperationSchema, ParamKind, ParamSpec};

/// Results per page when the caller does not ask for anything else
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size
pub const PER_PAGE_PARAM: &str = "itemsPerPage";

/// Query parameter that switches pagination off when `false`
pub const PAGINATION_PARAM: &str = "pagination";

/// A single search argument value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl QueryValue {
    /// Null, empty strings and empty lists carry no filter
    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::Null => true,
            QueryValue::Str(s) => s.is_empty(),
            QueryValue::List(items) => items.is_empty(),
            QueryValue::Bool(_) | QueryValue::Int(_) => false,
        }
    }

    /// URL query pairs for this value; lists expand to repeated `name[]` pairs
    fn push_pairs(&self, name: &str, pairs: &mut Vec<(String, String)>) {
        match self {
            QueryValue::Null => {}
            QueryValue::Bool(b) => pairs.push((name.to_string(), b.to_string())),
            QueryValue::Int(i) => pairs.push((name.to_string(), i.to_string())),
            QueryValue::Str(s) => pairs.push((name.to_string(), s.clone())),
            QueryValue::List(items) => {
                let list_name = format!("{}[]", name);
                pairs.extend(items.iter().map(|item| (list_name.clone(), item.clone())));
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::List(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Null, Into::into)
    }
}

/// Page selection for search calls
///
/// A `per_page` of 0 disables pagination altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: u32,
    /// Records per page; 0 turns pagination off
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Selects `page` with `per_page` records per page
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Requests every matching record in one response
    pub fn disabled() -> Self {
        Self { page: 1, per_page: 0 }
    }

    /// Whether every record is requested at once
    pub fn is_disabled(&self) -> bool {
        self.per_page == 0
    }
}

/// Ordered mapping from wire parameter name to value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    params: Vec<(String, QueryValue)>,
}

impl ResourceQuery {
    /// Empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Zips the operation's declared parameter names with positional arguments
    ///
    /// Fewer arguments than declared is fine: the missing trailing parameters
    /// are simply absent.
    pub fn from_args(schema: &OperationSchema, args: Vec<QueryValue>) -> Result<Self, HarveyError> {
        let specs = schema.resolve(args.len())?;
        let params = specs
            .iter()
            .zip(args)
            .map(|(spec, value)| (spec.wire.to_string(), value))
            .collect();
        Ok(Self { params })
    }

    /// Builds the normalized, paginated query a search call sends
    pub fn for_search(
        schema: &OperationSchema,
        args: Vec<QueryValue>,
        pagination: Pagination,
    ) -> Result<Self, HarveyError> {
        Ok(Self::from_args(schema, args)?
            .normalized()
            .with_pagination(pagination))
    }

    /// Sets `name`, replacing any existing value in place
    pub fn set(&mut self, name: &str, value: impl Into<QueryValue>) {
        let value = value.into();
        match self.params.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((name.to_string(), value)),
        }
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, name: &str, value: impl Into<QueryValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Value stored under wire name `name`
    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Number of parameters, empty ones included until normalized
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Drops every parameter that carries no filter (null, `""`, `[]`)
    pub fn normalized(mut self) -> Self {
        self.params.retain(|(_, value)| !value.is_empty());
        self
    }

    /// Appends the page parameters, or `pagination=false` when disabled
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        if pagination.is_disabled() {
            self.set(PAGINATION_PARAM, false);
        } else {
            self.set(PAGE_PARAM, pagination.page);
            self.set(PER_PAGE_PARAM, pagination.per_page);
        }
        self
    }

    /// Sorted view used for key derivation
    pub fn canonical(&self) -> BTreeMap<&str, &QueryValue> {
        self.iter().collect()
    }

    /// URL query pairs in insertion order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.params.len());
        for (name, value) in &self.params {
            value.push_pairs(name, &mut pairs);
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_value_emptiness() {
        assert!(QueryValue::Null.is_empty());
        assert!(QueryValue::from("").is_empty());
        assert!(QueryValue::from(Vec::<String>::new()).is_empty());
        assert!(!QueryValue::from(0i64).is_empty());
        assert!(!QueryValue::from(false).is_empty());
        assert!(!QueryValue::from("x").is_empty());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(QueryValue::from(None::<String>), QueryValue::Null);
        assert_eq!(QueryValue::from(Some(5i64)), QueryValue::Int(5));
    }

    #[test]
    fn test_query_value_serializes_untagged() {
        let list = QueryValue::List(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);
        assert_eq!(serde_json::to_string(&QueryValue::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&QueryValue::Int(3)).unwrap(), "3");
    }

    #[test]
    fn test_from_args_uses_wire_names_in_declaration_order() {
        let query = ResourceQuery::from_args(
            &SchoolFilter::SCHEMA,
            vec!["Gymnazium".into(), QueryValue::Null, QueryValue::Null, 4i64.into()],
        )
        .unwrap();

        let names: Vec<&str> = query.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "eduid", "kodfak", "schoolType.id"]);
    }

    #[test]
    fn test_from_args_rejects_extra_arguments() {
        let args = vec![QueryValue::Null; SchoolTypeFilter::SCHEMA.params.len() + 1];
        let err = ResourceQuery::from_args(&SchoolTypeFilter::SCHEMA, args).unwrap_err();
        assert!(matches!(err, HarveyError::TooManyArguments { .. }));
    }

    #[test]
    fn test_normalized_drops_empty_values() {
        let query = ResourceQuery::new()
            .with("title", "")
            .with("code", "0110")
            .with("revisions", Vec::<String>::new())
            .with("level", QueryValue::Null)
            .normalized();

        assert_eq!(query.len(), 1);
        assert_eq!(query.get("code"), Some(&QueryValue::from("0110")));
    }

    #[test]
    fn test_pagination_parameters() {
        let query = ResourceQuery::new().with_pagination(Pagination::new(2, 30));
        assert_eq!(query.get(PAGE_PARAM), Some(&QueryValue::Int(2)));
        assert_eq!(query.get(PER_PAGE_PARAM), Some(&QueryValue::Int(30)));
        assert!(query.get(PAGINATION_PARAM).is_none());
    }

    #[test]
    fn test_disabled_pagination_sends_flag_only() {
        let query = ResourceQuery::new().with_pagination(Pagination::disabled());
        assert_eq!(query.get(PAGINATION_PARAM), Some(&QueryValue::Bool(false)));
        assert!(query.get(PAGE_PARAM).is_none());
        assert!(query.get(PER_PAGE_PARAM).is_none());
        assert_eq!(
            query.to_pairs(),
            vec![("pagination".to_string(), "false".to_string())]
        );
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut query = ResourceQuery::new().with("a", 1i64).with("b", 2i64);
        query.set("a", 3i64);
        let pairs = query.to_pairs();
        assert_eq!(pairs[0], ("a".to_string(), "3".to_string()));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_list_values_expand_to_bracketed_pairs() {
        let query = ResourceQuery::new().with(
            "revisions",
            vec!["3".to_string(), "4".to_string()],
        );
        assert_eq!(
            query.to_pairs(),
            vec![
                ("revisions[]".to_string(), "3".to_string()),
                ("revisions[]".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn test_canonical_is_sorted() {
        let query = ResourceQuery::new().with("z", 1i64).with("a", 2i64);
        let keys: Vec<&str> = query.canonical().into_keys().collect();
        assert_eq!(keys, vec!["a", "z"]);
    }
}
