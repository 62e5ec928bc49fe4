//! Query module
//!
//! Supports: equality, comparison, set-membership and range filters plus
//! limit, skip, order and projection parameters.
//!
//! # Overview
//!
//! A [`QueryBuilder`] accumulates entries in call order and serializes them
//! to query-string segments, one segment per entry:
//!
//! | Entry | Segment |
//! |-------|---------|
//! | `empty_filter("elements.title")` | `elements.title[empty]` |
//! | `equals_filter("system.type", "movie")` | `system.type[eq]=movie` |
//! | `in_filter("elements.tags", ["a b", "c"])` | `elements.tags[in]=a+b,c` |
//! | `range_filter("elements.price", 2.0, 10.5)` | `elements.price[range]=2,10.5` |
//! | `limit_parameter(10)` | `limit=10` |
//! | `order_by_descending("system.name")` | `order=system.name[desc]` |
//!
//! Values are form-urlencoded one by one and joined with a literal comma.
//! Field names are written as given.

mod builder;
mod types;

pub use builder::QueryBuilder;
pub use types::{
    Arity, CustomHeader, FilterEntry, FilterKind, ParameterEntry, QueryEntry, QuerySpec,
    SortOrder, CONTINUATION_TOKEN_HEADER, VALUE_SEPARATOR,
};

#[cfg(test)]
mod tests;
