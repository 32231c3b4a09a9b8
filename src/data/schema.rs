//! Declared parameter schemas for search operations
//!
//! Each search operation has a static, ordered list of parameters. A call may
//! pass any prefix of that list; [`OperationSchema::resolve`] returns the
//! names belonging to the arguments actually supplied.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::HarveyError;

use super::filters::*;
use super::QueryValue;

/// Value shape a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Integer,
    List,
    Flag,
}

impl ParamKind {
    /// Converts a textual argument (e.g. from the command line)
    ///
    /// `-` stands for "not supplied". Lists are comma separated.
    pub fn parse(self, parameter: &str, raw: &str) -> Result<QueryValue, HarveyError> {
        if raw == "-" {
            return Ok(QueryValue::Null);
        }
        let invalid = || HarveyError::InvalidArgument {
            parameter: parameter.to_string(),
            value: raw.to_string(),
        };
        match self {
            ParamKind::Text => Ok(QueryValue::Str(raw.to_string())),
            ParamKind::Integer => raw.parse().map(QueryValue::Int).map_err(|_| invalid()),
            ParamKind::Flag => raw.parse().map(QueryValue::Bool).map_err(|_| invalid()),
            ParamKind::List => Ok(QueryValue::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }
}

/// Maps a filter field type to its [`ParamKind`]
pub trait ParamType {
    const KIND: ParamKind;
}

impl ParamType for Option<String> {
    const KIND: ParamKind = ParamKind::Text;
}

impl ParamType for Option<i64> {
    const KIND: ParamKind = ParamKind::Integer;
}

impl ParamType for Vec<String> {
    const KIND: ParamKind = ParamKind::List;
}

impl ParamType for Option<bool> {
    const KIND: ParamKind = ParamKind::Flag;
}

/// One declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Name on the Rust side (filter field)
    pub name: &'static str,
    /// Name in the query string, e.g. `region.id`
    pub wire: &'static str,
    pub kind: ParamKind,
}

/// Ordered parameter list of one search operation
#[derive(Debug, PartialEq, Eq)]
pub struct OperationSchema {
    pub name: &'static str,
    /// Path segment below `/api/`
    pub resource: &'static str,
    pub params: &'static [ParamSpec],
}

impl OperationSchema {
    /// Declared parameters for a call that supplied `supplied` arguments
    pub fn resolve(&self, supplied: usize) -> Result<&'static [ParamSpec], HarveyError> {
        self.params
            .get(..supplied)
            .ok_or_else(|| HarveyError::TooManyArguments {
                operation: self.name.to_string(),
                declared: self.params.len(),
                supplied,
            })
    }

    /// Index of parameter `name` in positional order
    pub fn position(&self, name: &str) -> Result<usize, HarveyError> {
        self.params
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| HarveyError::UnknownParameter {
                operation: self.name.to_string(),
                parameter: name.to_string(),
            })
    }

    /// Declaration of parameter `name`
    pub fn param(&self, name: &str) -> Result<&'static ParamSpec, HarveyError> {
        let index = self.position(name)?;
        Ok(&self.params[index])
    }

    /// Shortest positional argument list that sets only `name`
    pub fn args_with(&self, name: &str, value: QueryValue) -> Result<Vec<QueryValue>, HarveyError> {
        let index = self.position(name)?;
        let mut args = vec![QueryValue::Null; index];
        args.push(value);
        Ok(args)
    }

    /// Parses textual positional arguments according to the declared kinds
    pub fn parse_args<S: AsRef<str>>(&self, raw: &[S]) -> Result<Vec<QueryValue>, HarveyError> {
        self.resolve(raw.len())?
            .iter()
            .zip(raw)
            .map(|(spec, value)| spec.kind.parse(spec.name, value.as_ref()))
            .collect()
    }
}

/// Schema of the bulk ISCO/ESCO lookup, whose codes travel in the request body
pub const ISCO_ESCO_SCHEMA: OperationSchema = OperationSchema {
    name: "search-isco-esco",
    resource: "isco-esco",
    params: &[ParamSpec {
        name: "codes",
        wire: "codes",
        kind: ParamKind::List,
    }],
};

static OPERATIONS: [OperationSchema; 20] = [
    IscoFilter::SCHEMA,
    ISCO_ESCO_SCHEMA,
    IscoWorkAreaFilter::SCHEMA,
    IscoRevisionFilter::SCHEMA,
    EscoSkillFilter::SCHEMA,
    IscedFilter::SCHEMA,
    SknaceFilter::SCHEMA,
    KovFilter::SCHEMA,
    KovSchoolFilter::SCHEMA,
    SchoolFilter::SCHEMA,
    SchoolTypeFilter::SCHEMA,
    EducationLevelFilter::SCHEMA,
    EducationFormFilter::SCHEMA,
    RegionFilter::SCHEMA,
    DistrictFilter::SCHEMA,
    MunicipalityFilter::SCHEMA,
    CountryFilter::SCHEMA,
    OrganizationFilter::SCHEMA,
    PositionFilter::SCHEMA,
    PositionGroupFilter::SCHEMA,
];

/// All declared search operations
pub fn operations() -> &'static [OperationSchema] {
    &OPERATIONS
}

/// Looks up an operation schema by name
pub fn schema(name: &str) -> Result<&'static OperationSchema, HarveyError> {
    static INDEX: OnceLock<HashMap<&'static str, &'static OperationSchema>> = OnceLock::new();
    INDEX
        .get_or_init(|| OPERATIONS.iter().map(|op| (op.name, op)).collect())
        .get(name)
        .copied()
        .ok_or_else(|| HarveyError::UnknownOperation(name.to_string()))
}
