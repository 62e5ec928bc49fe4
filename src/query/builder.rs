//! Fluent query builder
//!
//! Every filter and parameter method appends exactly one entry and hands the
//! builder back, so calls chain in the order the query string will be
//! written. Methods that can violate an entry invariant return
//! `Result<Self>` and fail at the call.

use super::types::{CustomHeader, FilterEntry, FilterKind, ParameterEntry, QuerySpec, SortOrder};
use crate::error::{Error, Result};

/// Builder for listing queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    spec: QuerySpec,
    headers: Vec<CustomHeader>,
}

impl QueryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    fn filter(
        mut self,
        field: impl Into<String>,
        kind: FilterKind,
        values: Vec<String>,
    ) -> Result<Self> {
        self.spec.push(FilterEntry::new(field, kind, values)?);
        Ok(self)
    }

    fn scalar(
        mut self,
        field: impl Into<String>,
        kind: FilterKind,
        value: impl Into<String>,
    ) -> Self {
        self.spec.push(FilterEntry::new_unchecked(
            field.into(),
            kind,
            vec![value.into()],
        ));
        self
    }

    fn parameter(mut self, parameter: ParameterEntry) -> Self {
        self.spec.push(parameter);
        self
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Field has no value
    #[must_use]
    pub fn empty_filter(self, field: impl Into<String>) -> Self {
        self.valueless(field, FilterKind::Empty)
    }

    /// Field has a value
    #[must_use]
    pub fn not_empty_filter(self, field: impl Into<String>) -> Self {
        self.valueless(field, FilterKind::NotEmpty)
    }

    fn valueless(mut self, field: impl Into<String>, kind: FilterKind) -> Self {
        self.spec
            .push(FilterEntry::new_unchecked(field.into(), kind, Vec::new()));
        self
    }

    /// Field equals `value`, e.g. `equals_filter("elements.movie", "Kingsman")`
    #[must_use]
    pub fn equals_filter(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.scalar(field, FilterKind::Equals, value)
    }

    /// Field does not equal `value`
    #[must_use]
    pub fn not_equals_filter(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.scalar(field, FilterKind::NotEquals, value)
    }

    /// Field contains all of `values`
    pub fn all_filter<I, S>(self, field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(field, FilterKind::All, collect(values))
    }

    /// Field contains at least one of `values`
    pub fn any_filter<I, S>(self, field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(field, FilterKind::Any, collect(values))
    }

    /// Field contains `values`
    pub fn contains_filter<I, S>(self, field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(field, FilterKind::Contains, collect(values))
    }

    /// Field value is one of `values`
    pub fn in_filter<I, S>(self, field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(field, FilterKind::In, collect(values))
    }

    /// Field value is none of `values`
    pub fn not_in_filter<I, S>(self, field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(field, FilterKind::NotIn, collect(values))
    }

    #[must_use]
    pub fn greater_than_filter(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.scalar(field, FilterKind::GreaterThan, value)
    }

    #[must_use]
    pub fn greater_than_or_equal_filter(
        self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.scalar(field, FilterKind::GreaterThanOrEqual, value)
    }

    #[must_use]
    pub fn less_than_filter(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.scalar(field, FilterKind::LessThan, value)
    }

    #[must_use]
    pub fn less_than_or_equal_filter(
        self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.scalar(field, FilterKind::LessThanOrEqual, value)
    }

    /// Field value lies within `lower..=higher`
    ///
    /// Bounds given in the wrong order are rejected, never swapped.
    pub fn range_filter(self, field: impl Into<String>, lower: f64, higher: f64) -> Result<Self> {
        self.filter(
            field,
            FilterKind::Range,
            vec![lower.to_string(), higher.to_string()],
        )
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Limit the number of items per page
    #[must_use]
    pub fn limit_parameter(self, limit: u32) -> Self {
        self.parameter(ParameterEntry::Limit(limit))
    }

    /// Skip the first `skip` items
    #[must_use]
    pub fn skip_parameter(self, skip: u32) -> Self {
        self.parameter(ParameterEntry::Skip(skip))
    }

    /// Order by `field` in the given direction
    #[must_use]
    pub fn order_parameter(self, field: impl Into<String>, order: SortOrder) -> Self {
        self.parameter(ParameterEntry::Order {
            field: field.into(),
            order,
        })
    }

    #[must_use]
    pub fn order_by_ascending(self, field: impl Into<String>) -> Self {
        self.order_parameter(field, SortOrder::Asc)
    }

    #[must_use]
    pub fn order_by_descending(self, field: impl Into<String>) -> Self {
        self.order_parameter(field, SortOrder::Desc)
    }

    /// Include the total item count in the pagination metadata
    #[must_use]
    pub fn include_total_count_parameter(self) -> Self {
        self.parameter(ParameterEntry::IncludeTotalCount)
    }

    /// Depth of linked items to resolve
    #[must_use]
    pub fn depth_parameter(self, depth: u32) -> Self {
        self.parameter(ParameterEntry::Depth(depth))
    }

    /// Language variant to return
    #[must_use]
    pub fn language_parameter(self, language: impl Into<String>) -> Self {
        self.parameter(ParameterEntry::Language(language.into()))
    }

    /// Only return the listed elements
    pub fn elements_parameter<I, S>(self, elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements = collect(elements);
        if elements.is_empty() {
            return Err(Error::builder_constraint(
                "elements",
                "elements parameter requires at least one element",
            ));
        }
        Ok(self.parameter(ParameterEntry::Elements(elements)))
    }

    // ========================================================================
    // Headers
    // ========================================================================

    /// Add a request header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(CustomHeader::new(name, value));
        self
    }

    /// Add several request headers
    #[must_use]
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = CustomHeader>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the continuation token header, replacing any previous token
    #[must_use]
    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.headers.retain(|h| !h.is_continuation_token());
        self.headers.push(CustomHeader::continuation_token(token));
        self
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Entries accumulated so far
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Headers accumulated so far
    pub fn headers(&self) -> &[CustomHeader] {
        &self.headers
    }

    /// Serialized segments in call order
    pub fn query_segments(&self) -> Vec<String> {
        self.spec.segments()
    }

    /// Serialized query string (without the leading `?`)
    pub fn query_string(&self) -> String {
        self.spec.to_query_string()
    }

    /// Consume the builder and return the entries and headers
    pub fn build(self) -> (QuerySpec, Vec<CustomHeader>) {
        (self.spec, self.headers)
    }
}

fn collect<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
