//! Free-text search composed from two filtered searches
//!
//! A query that looks like a classification code (1-7 digits) is answered by
//! a single exact-code search. Anything else runs a title search and an
//! alternate-title search, merges both result lists, drops duplicate records
//! and sorts the rest by a field.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::HarveyClient;
use crate::data::{IscoFilter, OperationSchema, Pagination, QueryValue};
use crate::error::HarveyError;

/// Page size used to fetch "everything" for each half of a merged search
pub const FULLTEXT_PAGE_SIZE: u32 = 10_000;

/// Which parameters of an operation the compositor filters on
#[derive(Debug, Clone, Copy)]
pub struct FulltextSpec {
    /// Search operation both halves run against
    pub schema: &'static OperationSchema,
    /// Parameter set for exact-code queries
    pub code_param: &'static str,
    /// Parameter set for the title half
    pub title_param: &'static str,
    /// Parameter set for the alternate-title half
    pub alternate_title_param: &'static str,
}

/// Fulltext over ISCO occupations
pub const ISCO_FULLTEXT: FulltextSpec = FulltextSpec {
    schema: &IscoFilter::SCHEMA,
    code_param: "code",
    title_param: "title",
    alternate_title_param: "alternative_title",
};

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{1,7}$").expect("code pattern is valid"))
}

/// Whether `query` is searched as an exact classification code
pub fn is_code_query(query: &str) -> bool {
    code_pattern().is_match(query)
}

impl HarveyClient {
    /// Free-text search over the operation described by `spec`
    ///
    /// Empty queries and searches without hits yield an empty list.
    pub async fn fulltext(
        &self,
        spec: &FulltextSpec,
        query: &str,
        sort_by: &str,
    ) -> Result<Vec<Value>, HarveyError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if is_code_query(query) {
            debug!(query, "fulltext exact code search");
            let args = spec.schema.args_with(spec.code_param, query.into())?;
            let response = self
                .search_with_schema(spec.schema, args, self.page(1))
                .await?;
            return Ok(extract_records(response));
        }

        debug!(query, sort_by, "fulltext title search");
        let everything = Pagination::new(1, FULLTEXT_PAGE_SIZE);
        let by_title = spec.schema.args_with(spec.title_param, query.into())?;
        let by_alternate = spec
            .schema
            .args_with(spec.alternate_title_param, QueryValue::from(query))?;

        let (titles, alternates) = futures::try_join!(
            self.search_with_schema(spec.schema, by_title, everything),
            self.search_with_schema(spec.schema, by_alternate, everything),
        )?;

        let mut records = merge_unique([extract_records(titles), extract_records(alternates)]);
        sort_by_field(&mut records, sort_by);
        Ok(records)
    }

    /// ISCO fulltext sorted by title
    pub async fn fulltext_isco(&self, query: &str) -> Result<Vec<Value>, HarveyError> {
        self.fulltext(&ISCO_FULLTEXT, query, "title").await
    }
}

/// Record list of a search response
///
/// Accepts a bare array or a paginated object (`hydra:member`, `member`,
/// `items` or `data`). Any other shape has no records.
pub fn extract_records(response: Value) -> Vec<Value> {
    match response {
        Value::Array(records) => records,
        Value::Object(mut object) => ["hydra:member", "member", "items", "data"]
            .iter()
            .find_map(|field| match object.remove(*field) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Concatenates record lists, keeping the first of identical records
pub fn merge_unique<I>(lists: I) -> Vec<Value>
where
    I: IntoIterator<Item = Vec<Value>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for record in lists.into_iter().flatten() {
        if seen.insert(record.to_string()) {
            merged.push(record);
        }
    }
    merged
}

/// Stable ascending sort on `field`
///
/// Numbers sort before strings; records without a comparable value go last.
pub fn sort_by_field(records: &mut [Value], field: &str) {
    records.sort_by(|a, b| compare_field(a.get(field), b.get(field)));
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.total_cmp(&b)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Number(_)) => 0,
        Some(Value::String(_)) => 1,
        _ => 2,
    }
}
