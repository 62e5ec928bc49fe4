//! Tests for query module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use test_case::test_case;

// ============================================================================
// FilterEntry Tests
// ============================================================================

#[test_case(FilterKind::Empty, "empty")]
#[test_case(FilterKind::NotEmpty, "nempty")]
#[test_case(FilterKind::Equals, "eq")]
#[test_case(FilterKind::NotEquals, "neq")]
#[test_case(FilterKind::All, "all")]
#[test_case(FilterKind::Any, "any")]
#[test_case(FilterKind::Contains, "contains")]
#[test_case(FilterKind::GreaterThan, "gt")]
#[test_case(FilterKind::GreaterThanOrEqual, "gte")]
#[test_case(FilterKind::LessThan, "lt")]
#[test_case(FilterKind::LessThanOrEqual, "lte")]
#[test_case(FilterKind::In, "in")]
#[test_case(FilterKind::NotIn, "nin")]
#[test_case(FilterKind::Range, "range")]
fn test_filter_operator(kind: FilterKind, expected: &str) {
    assert_eq!(kind.operator(), expected);
}

#[test_case(FilterKind::Empty, &["x"] ; "empty with a value")]
#[test_case(FilterKind::Equals, &[] ; "equals without value")]
#[test_case(FilterKind::Equals, &["a", "b"] ; "equals with two values")]
#[test_case(FilterKind::In, &[] ; "in without values")]
#[test_case(FilterKind::Range, &["1"] ; "range with one bound")]
#[test_case(FilterKind::Range, &["1", "2", "3"] ; "range with three bounds")]
#[test_case(FilterKind::Range, &["low", "2"] ; "range with non numeric bound")]
fn test_filter_entry_rejects_wrong_arity(kind: FilterKind, values: &[&str]) {
    let values = values.iter().map(ToString::to_string).collect();
    let result = FilterEntry::new("elements.field", kind, values);
    assert!(matches!(result, Err(Error::BuilderConstraint { .. })));
}

#[test]
fn test_filter_entry_accessors() {
    let entry = FilterEntry::new(
        "elements.tags",
        FilterKind::Any,
        vec!["a".to_string(), "b".to_string()],
    )
    .unwrap();

    assert_eq!(entry.field(), "elements.tags");
    assert_eq!(entry.kind(), FilterKind::Any);
    assert_eq!(entry.values(), ["a", "b"]);
    assert_eq!(entry.key(), "elements.tags[any]");
}

#[test]
fn test_filter_segment_encodes_each_value() {
    let entry = FilterEntry::new(
        "elements.title",
        FilterKind::In,
        vec!["a b".to_string(), "c,d".to_string(), "e&f".to_string()],
    )
    .unwrap();

    // commas inside a value are encoded, the separator is not
    assert_eq!(entry.to_segment(), "elements.title[in]=a+b,c%2Cd,e%26f");
}

// ============================================================================
// ParameterEntry Tests
// ============================================================================

#[test]
fn test_parameter_segments() {
    assert_eq!(ParameterEntry::Limit(10).to_segment(), "limit=10");
    assert_eq!(ParameterEntry::Skip(0).to_segment(), "skip=0");
    assert_eq!(
        ParameterEntry::Order {
            field: "system.name".to_string(),
            order: SortOrder::Asc,
        }
        .to_segment(),
        "order=system.name[asc]"
    );
    assert_eq!(
        ParameterEntry::IncludeTotalCount.to_segment(),
        "includeTotalCount=true"
    );
    assert_eq!(ParameterEntry::Depth(2).to_segment(), "depth=2");
    assert_eq!(
        ParameterEntry::Elements(vec!["title".to_string(), "summary".to_string()]).to_segment(),
        "elements=title,summary"
    );
    assert_eq!(
        ParameterEntry::Language("es-ES".to_string()).to_segment(),
        "language=es-ES"
    );
}

#[test]
fn test_sort_order_default_and_display() {
    assert_eq!(SortOrder::default(), SortOrder::Asc);
    assert_eq!(SortOrder::Desc.to_string(), "desc");
}

// ============================================================================
// QueryBuilder Tests
// ============================================================================

#[test]
fn test_builder_preserves_call_order() {
    let builder = QueryBuilder::new()
        .limit_parameter(5)
        .equals_filter("system.type", "movie")
        .empty_filter("elements.director")
        .in_filter("elements.genre", ["drama", "comedy"])
        .unwrap()
        .order_by_descending("elements.released")
        .skip_parameter(10)
        .not_empty_filter("elements.poster")
        .range_filter("elements.length", 90.0, 120.5)
        .unwrap();

    assert_eq!(
        builder.query_segments(),
        vec![
            "limit=5",
            "system.type[eq]=movie",
            "elements.director[empty]",
            "elements.genre[in]=drama,comedy",
            "order=elements.released[desc]",
            "skip=10",
            "elements.poster[nempty]",
            "elements.length[range]=90,120.5",
        ]
    );
}

#[test]
fn test_builder_serializes_as_concatenation_of_entries() {
    let builder = QueryBuilder::new()
        .not_equals_filter("system.codename", "hidden")
        .all_filter("elements.tags", ["x"])
        .unwrap()
        .contains_filter("elements.actors", ["Jane", "John"])
        .unwrap()
        .not_in_filter("system.language", ["de"])
        .unwrap()
        .greater_than_filter("elements.rating", "3")
        .less_than_or_equal_filter("elements.rating", "5");

    let expected: Vec<String> = builder
        .spec()
        .entries()
        .iter()
        .map(QueryEntry::to_segment)
        .collect();
    assert_eq!(builder.query_segments(), expected);
    assert_eq!(builder.query_string(), expected.join("&"));
}

#[test]
fn test_builder_comparison_filters() {
    let builder = QueryBuilder::new()
        .greater_than_filter("elements.a", "1")
        .greater_than_or_equal_filter("elements.b", "2")
        .less_than_filter("elements.c", "3")
        .less_than_or_equal_filter("elements.d", "4");

    assert_eq!(
        builder.query_string(),
        "elements.a[gt]=1&elements.b[gte]=2&elements.c[lt]=3&elements.d[lte]=4"
    );
}

#[test]
fn test_builder_keeps_duplicate_orders() {
    let builder = QueryBuilder::new()
        .order_by_ascending("system.name")
        .order_parameter("system.name", SortOrder::Desc);

    assert_eq!(
        builder.query_segments(),
        vec!["order=system.name[asc]", "order=system.name[desc]"]
    );
}

#[test]
fn test_builder_empty_set_fails_at_call() {
    let empty: [&str; 0] = [];

    let err = QueryBuilder::new().any_filter("elements.tags", empty).unwrap_err();
    assert!(matches!(err, Error::BuilderConstraint { ref field, .. } if field == "elements.tags"));

    assert!(QueryBuilder::new().all_filter("f", empty).is_err());
    assert!(QueryBuilder::new().contains_filter("f", empty).is_err());
    assert!(QueryBuilder::new().in_filter("f", empty).is_err());
    assert!(QueryBuilder::new().not_in_filter("f", empty).is_err());
    assert!(QueryBuilder::new().elements_parameter(empty).is_err());
}

#[test]
fn test_builder_range_rejects_reversed_bounds() {
    let err = QueryBuilder::new()
        .range_filter("elements.price", 10.0, 2.0)
        .unwrap_err();
    assert!(matches!(err, Error::BuilderConstraint { .. }));

    assert!(QueryBuilder::new()
        .range_filter("elements.price", f64::NAN, 2.0)
        .is_err());
}

#[test]
fn test_builder_range_accepts_ordered_bounds() {
    let builder = QueryBuilder::new()
        .range_filter("elements.price", 2.0, 10.0)
        .unwrap();
    assert_eq!(builder.query_string(), "elements.price[range]=2,10");

    let builder = QueryBuilder::new()
        .range_filter("elements.price", 4.0, 4.0)
        .unwrap();
    assert_eq!(builder.query_string(), "elements.price[range]=4,4");
}

#[test]
fn test_builder_supplementary_parameters() {
    let builder = QueryBuilder::new()
        .include_total_count_parameter()
        .depth_parameter(1)
        .language_parameter("en-US")
        .elements_parameter(["title", "url_slug"])
        .unwrap();

    assert_eq!(
        builder.query_string(),
        "includeTotalCount=true&depth=1&language=en-US&elements=title,url_slug"
    );
}

#[test]
fn test_elements_parameter_encodes_each_field() {
    let builder = QueryBuilder::new()
        .elements_parameter(["title & teaser", "a=b", "url_slug"])
        .unwrap()
        .limit_parameter(3);

    assert_eq!(
        builder.query_string(),
        "elements=title+%26+teaser,a%3Db,url_slug&limit=3"
    );
}

// ============================================================================
// Header Tests
// ============================================================================

#[test]
fn test_continuation_token_replaces_previous() {
    let builder = QueryBuilder::new()
        .with_continuation_token("a")
        .with_continuation_token("b");

    let tokens: Vec<_> = builder
        .headers()
        .iter()
        .filter(|h| h.name == CONTINUATION_TOKEN_HEADER)
        .collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, "b");
}

#[test]
fn test_continuation_token_keeps_other_headers() {
    let builder = QueryBuilder::new()
        .with_header("X-Custom", "1")
        .with_continuation_token("first")
        .with_headers([CustomHeader::new("X-Other", "2")])
        .with_continuation_token("second");

    assert_eq!(
        builder.headers(),
        [
            CustomHeader::new("X-Custom", "1"),
            CustomHeader::new("X-Other", "2"),
            CustomHeader::continuation_token("second"),
        ]
    );
}

#[test]
fn test_continuation_token_replaces_differently_cased_header() {
    let builder = QueryBuilder::new()
        .with_header("x-continuation", "old")
        .with_continuation_token("new");

    assert_eq!(builder.headers(), [CustomHeader::continuation_token("new")]);
}

#[test]
fn test_continuation_token_does_not_touch_entries() {
    let base = QueryBuilder::new().limit_parameter(3);
    let with_token = base.clone().with_continuation_token("t");

    assert_eq!(base.spec(), with_token.spec());
    assert!(base.headers().is_empty());
}

#[test]
fn test_build_returns_spec_and_headers() {
    let (spec, headers) = QueryBuilder::new()
        .limit_parameter(1)
        .with_continuation_token("t")
        .build();

    assert_eq!(spec.len(), 1);
    assert!(!spec.is_empty());
    assert_eq!(headers.len(), 1);
    assert!(headers[0].is_continuation_token());
}

#[test]
fn test_empty_query_string() {
    assert_eq!(QueryBuilder::new().query_string(), "");
    assert!(QuerySpec::new().segments().is_empty());
}
