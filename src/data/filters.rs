//! Typed search filters, one per search operation
//!
//! Field order is the declared parameter order. Leaving a field at its
//! default is the same as not passing it at all.

use super::schema::{OperationSchema, ParamSpec, ParamType};
use super::QueryValue;

macro_rules! search_filter {
    (
        $(#[$meta:meta])*
        $filter:ident => $operation:literal on $resource:literal {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty => $wire:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $filter {
            $( $(#[$field_meta])* pub $field: $ty, )*
        }

        impl $filter {
            pub const SCHEMA: OperationSchema = OperationSchema {
                name: $operation,
                resource: $resource,
                params: &[
                    $( ParamSpec {
                        name: stringify!($field),
                        wire: $wire,
                        kind: <$ty as ParamType>::KIND,
                    }, )*
                ],
            };

            /// Positional arguments in declaration order
            pub fn into_args(self) -> Vec<QueryValue> {
                vec![ $( QueryValue::from(self.$field) ),* ]
            }
        }
    };
}

search_filter! {
    /// ISCO occupation search
    IscoFilter => "search-isco" on "isco" {
        title: Option<String> => "title",
        level: Option<i64> => "level",
        code: Option<String> => "code",
        /// Revision ids; the newest revision is used when left empty
        revisions: Vec<String> => "revisions",
        work_area: Option<i64> => "workArea.id",
        alternative_title: Option<String> => "alternativeTitles.title",
        parent_code: Option<String> => "parent.code",
    }
}

search_filter! {
    IscoWorkAreaFilter => "search-isco-work-area" on "isco-work-area" {
        title: Option<String> => "title",
    }
}

search_filter! {
    /// Used to find the newest ISCO revision
    IscoRevisionFilter => "search-isco-revision" on "isco-revision" {
        order_id: Option<String> => "order[id]",
    }
}

search_filter! {
    EscoSkillFilter => "search-esco-skill" on "esco-skill" {
        title: Option<String> => "title",
        isco_code: Option<String> => "isco.code",
    }
}

search_filter! {
    IscedFilter => "search-isced" on "isced" {
        title: Option<String> => "title",
        code: Option<String> => "code",
    }
}

search_filter! {
    SknaceFilter => "search-sknace" on "sknace" {
        title: Option<String> => "title",
        code: Option<String> => "code",
    }
}

search_filter! {
    KovFilter => "search-kov" on "kov" {
        title: Option<String> => "title",
        code: Option<String> => "code",
        isced_code: Option<String> => "isced.code",
    }
}

search_filter! {
    KovSchoolFilter => "search-kov-school" on "kov-school" {
        school: Option<i64> => "school.id",
        kov_code: Option<String> => "kov.code",
        education_form: Option<i64> => "educationForm.id",
    }
}

search_filter! {
    SchoolFilter => "search-school" on "school" {
        name: Option<String> => "name",
        eduid: Option<String> => "eduid",
        kodfak: Option<String> => "kodfak",
        school_type: Option<i64> => "schoolType.id",
        region: Option<i64> => "region.id",
    }
}

search_filter! {
    SchoolTypeFilter => "search-school-type" on "school-type" {
        title: Option<String> => "title",
    }
}

search_filter! {
    EducationLevelFilter => "search-education-level" on "education-level" {
        title: Option<String> => "title",
    }
}

search_filter! {
    EducationFormFilter => "search-education-form" on "education-form" {
        title: Option<String> => "title",
    }
}

search_filter! {
    RegionFilter => "search-region" on "region" {
        title: Option<String> => "title",
        code: Option<String> => "code",
    }
}

search_filter! {
    DistrictFilter => "search-district" on "district" {
        title: Option<String> => "title",
        code: Option<String> => "code",
        region: Option<i64> => "region.id",
    }
}

search_filter! {
    MunicipalityFilter => "search-municipality" on "municipality" {
        title: Option<String> => "title",
        code: Option<String> => "code",
        district: Option<i64> => "district.id",
    }
}

search_filter! {
    CountryFilter => "search-country" on "country" {
        title: Option<String> => "title",
        code: Option<String> => "code",
    }
}

search_filter! {
    OrganizationFilter => "search-organization" on "organization" {
        name: Option<String> => "name",
        ico: Option<String> => "ico",
        municipality: Option<i64> => "municipality.id",
        active: Option<bool> => "active",
    }
}

search_filter! {
    PositionFilter => "search-position" on "position" {
        title: Option<String> => "title",
        isco_code: Option<String> => "isco.code",
        position_group: Option<i64> => "positionGroup.id",
    }
}

search_filter! {
    PositionGroupFilter => "search-position-group" on "position-group" {
        title: Option<String> => "title",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ParamKind;

    #[test]
    fn test_schema_mirrors_field_order() {
        let names: Vec<&str> = IscoFilter::SCHEMA.params.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "title",
                "level",
                "code",
                "revisions",
                "work_area",
                "alternative_title",
                "parent_code"
            ]
        );
    }

    #[test]
    fn test_kinds_follow_field_types() {
        let kinds: Vec<ParamKind> = OrganizationFilter::SCHEMA.params.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![ParamKind::Text, ParamKind::Text, ParamKind::Integer, ParamKind::Flag]
        );
        assert_eq!(IscoFilter::SCHEMA.param("revisions").unwrap().kind, ParamKind::List);
    }

    #[test]
    fn test_into_args_has_one_value_per_parameter() {
        let filter = SchoolFilter {
            name: Some("Gymnazium".to_string()),
            region: Some(3),
            ..Default::default()
        };
        let args = filter.into_args();
        assert_eq!(args.len(), SchoolFilter::SCHEMA.params.len());
        assert_eq!(args[0], QueryValue::from("Gymnazium"));
        assert_eq!(args[4], QueryValue::Int(3));
        assert!(args[1..4].iter().all(QueryValue::is_empty));
    }

    #[test]
    fn test_default_filter_is_all_empty() {
        assert!(IscoFilter::default().into_args().iter().all(QueryValue::is_empty));
    }
}
