//! Lookup and search façade over the Harvey API
//!
//! Every operation follows the same path: derive a cache key, return the
//! cached body if fresh, otherwise fetch it, store it and decode it. Results
//! are opaque JSON passed through unmodified.

mod fetcher;
pub mod fulltext;

use std::fmt::Display;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::cache::{build_key, record_key, CacheBackend, MemoryCache, ResultCache};
use crate::config::ClientConfig;
use crate::data::schema::ISCO_ESCO_SCHEMA;
use crate::data::*;
use crate::error::HarveyError;

pub use fetcher::Fetcher;
pub use fulltext::{FulltextSpec, FULLTEXT_PAGE_SIZE, ISCO_FULLTEXT};

/// Client for the Harvey classification API
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Debug, Clone)]
pub struct HarveyClient {
    fetcher: Fetcher,
    cache: ResultCache,
    per_page: u32,
}

impl HarveyClient {
    /// Creates a client that caches responses in `backend` for the configured TTL
    pub fn new(config: ClientConfig, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            fetcher: Fetcher::new(&config),
            cache: ResultCache::new(backend, config.cache_ttl_secs),
            per_page: config.per_page,
        }
    }

    /// Creates a client backed by a fresh in-process cache
    pub fn with_memory_cache(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(MemoryCache::new()))
    }

    /// Configured default page size
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Pagination for `page` with the configured page size
    ///
    /// This is the default to pass to the typed `search_*` methods;
    /// [`Pagination::default`] always uses 15 per page.
    pub fn page(&self, page: u32) -> Pagination {
        Pagination::new(page, self.per_page)
    }

    /// Fetches a single record by identifier
    pub async fn get(&self, kind: ResourceKind, id: impl Display) -> Result<Value, HarveyError> {
        let id = id.to_string();
        let key = record_key(kind.path(), &id);

        let segments = [kind.path(), id.as_str()];
        let body = self
            .cache
            .get_or_compute(&key, || self.fetcher.fetch(&segments, None, None))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Runs a search by operation name with positional arguments
    ///
    /// `search-isco-esco` takes its codes as one list (or a single code) and
    /// is not paginated; `pagination` is ignored for it.
    pub async fn search(
        &self,
        operation: &str,
        args: Vec<QueryValue>,
        pagination: Pagination,
    ) -> Result<Value, HarveyError> {
        let op = schema(operation)?;
        if op.name == ISCO_ESCO_SCHEMA.name {
            let codes = isco_esco_codes(args)?;
            return self.search_isco_esco(&codes).await;
        }
        self.search_with_schema(op, args, pagination).await
    }

    /// Cached search against one declared operation
    pub async fn search_with_schema(
        &self,
        op: &OperationSchema,
        args: Vec<QueryValue>,
        pagination: Pagination,
    ) -> Result<Value, HarveyError> {
        let mut query = ResourceQuery::for_search(op, args, pagination)?;
        if op.name == IscoFilter::SCHEMA.name {
            self.apply_default_revision(&mut query).await?;
        }

        let key = build_key(op.name, &query)?;
        let segments = [op.resource];
        let body = self
            .cache
            .get_or_compute(&key, || self.fetcher.fetch(&segments, Some(&query), None))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Id of the newest ISCO revision, if any exists
    ///
    /// Always asks the API; the answer is not cached.
    pub async fn latest_isco_revision(&self) -> Result<Option<String>, HarveyError> {
        let filter = IscoRevisionFilter {
            order_id: Some("desc".to_string()),
        };
        let query = ResourceQuery::for_search(
            &IscoRevisionFilter::SCHEMA,
            filter.into_args(),
            Pagination::new(1, 1),
        )?;
        let body = self
            .fetcher
            .fetch(&[IscoRevisionFilter::SCHEMA.resource], Some(&query), None)
            .await?;
        let response: Value = serde_json::from_str(&body)?;

        let revision = fulltext::extract_records(response)
            .into_iter()
            .next()
            .and_then(|record| match record.get("id") {
                Some(Value::String(id)) => Some(id.clone()),
                Some(Value::Number(id)) => Some(id.to_string()),
                _ => None,
            });
        debug!(?revision, "resolved latest ISCO revision");
        Ok(revision)
    }

    async fn apply_default_revision(&self, query: &mut ResourceQuery) -> Result<(), HarveyError> {
        let wire = IscoFilter::SCHEMA.param("revisions")?.wire;
        if query.get(wire).is_some() {
            return Ok(());
        }
        if let Some(revision) = self.latest_isco_revision().await? {
            query.set(wire, vec![revision]);
        }
        Ok(())
    }

    /// Bulk ISCO/ESCO lookup for a list of ISCO codes
    ///
    /// The codes travel as a JSON body on the GET request.
    pub async fn search_isco_esco<S: AsRef<str>>(&self, codes: &[S]) -> Result<Value, HarveyError> {
        let codes: Vec<String> = codes.iter().map(|c| c.as_ref().to_string()).collect();
        let query = ResourceQuery::from_args(&ISCO_ESCO_SCHEMA, vec![QueryValue::List(codes.clone())])?;
        let key = build_key(ISCO_ESCO_SCHEMA.name, &query)?;
        let body = json!({ "codes": codes });

        let raw = self
            .cache
            .get_or_compute(&key, || {
                self.fetcher
                    .fetch(&[ISCO_ESCO_SCHEMA.resource], None, Some(&body))
            })
            .await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Codes argument of a positional `search-isco-esco` call
fn isco_esco_codes(args: Vec<QueryValue>) -> Result<Vec<String>, HarveyError> {
    ISCO_ESCO_SCHEMA.resolve(args.len())?;
    match args.into_iter().next() {
        None | Some(QueryValue::Null) => Ok(Vec::new()),
        Some(QueryValue::List(codes)) => Ok(codes),
        Some(QueryValue::Str(code)) => Ok(vec![code]),
        Some(other) => Err(HarveyError::InvalidArgument {
            parameter: ISCO_ESCO_SCHEMA.params[0].name.to_string(),
            value: serde_json::to_string(&other)?,
        }),
    }
}

macro_rules! resource_methods {
    ($( $get:ident, $search:ident => $kind:ident, $filter:ident; )*) => {
        impl HarveyClient {
            $(
                #[doc = concat!("Fetches one `", stringify!($kind), "` record by identifier")]
                pub async fn $get(&self, id: impl Display) -> Result<Value, HarveyError> {
                    self.get(ResourceKind::$kind, id).await
                }

                #[doc = concat!("Searches `", stringify!($kind), "` records")]
                pub async fn $search(
                    &self,
                    filter: $filter,
                    pagination: Pagination,
                ) -> Result<Value, HarveyError> {
                    self.search_with_schema(&$filter::SCHEMA, filter.into_args(), pagination)
                        .await
                }
            )*
        }
    };
}

resource_methods! {
    get_isco, search_isco => Isco, IscoFilter;
    get_isco_work_area, search_isco_work_areas => IscoWorkArea, IscoWorkAreaFilter;
    get_isco_revision, search_isco_revisions => IscoRevision, IscoRevisionFilter;
    get_esco_skill, search_esco_skills => EscoSkill, EscoSkillFilter;
    get_isced, search_isced => Isced, IscedFilter;
    get_sknace, search_sknace => Sknace, SknaceFilter;
    get_kov, search_kov => Kov, KovFilter;
    get_kov_school, search_kov_schools => KovSchool, KovSchoolFilter;
    get_school, search_schools => School, SchoolFilter;
    get_school_type, search_school_types => SchoolType, SchoolTypeFilter;
    get_education_level, search_education_levels => EducationLevel, EducationLevelFilter;
    get_education_form, search_education_forms => EducationForm, EducationFormFilter;
    get_region, search_regions => Region, RegionFilter;
    get_district, search_districts => District, DistrictFilter;
    get_municipality, search_municipalities => Municipality, MunicipalityFilter;
    get_country, search_countries => Country, CountryFilter;
    get_organization, search_organizations => Organization, OrganizationFilter;
    get_position, search_positions => Position, PositionFilter;
    get_position_group, search_position_groups => PositionGroup, PositionGroupFilter;
}

impl HarveyClient {
    /// Fetches one ISCO/ESCO mapping record by identifier
    pub async fn get_isco_esco(&self, id: impl Display) -> Result<Value, HarveyError> {
        self.get(ResourceKind::IscoEsco, id).await
    }
}
