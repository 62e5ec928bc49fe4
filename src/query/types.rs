//! Query entry types
//!
//! Filters and parameters are tagged values; serialization matches on the
//! kind.

use crate::error::{Error, Result};
use std::fmt;

/// Request header that carries the continuation token of feed-style listings
pub const CONTINUATION_TOKEN_HEADER: &str = "X-Continuation";

/// Separator between the values of a set-valued filter
pub const VALUE_SEPARATOR: char = ',';

// ============================================================================
// Filters
// ============================================================================

/// Kind of constraint a filter applies to its field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Empty,
    NotEmpty,
    Equals,
    NotEquals,
    All,
    Any,
    Contains,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    Range,
}

/// Number of values a filter kind accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No values at all
    None,
    /// Exactly one value
    Single,
    /// One or more values
    Set,
    /// Exactly two values: lower and higher bound
    Pair,
}

impl FilterKind {
    /// Operator token appended to the field name (`field[op]`)
    pub fn operator(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::NotEmpty => "nempty",
            Self::Equals => "eq",
            Self::NotEquals => "neq",
            Self::All => "all",
            Self::Any => "any",
            Self::Contains => "contains",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "gte",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "lte",
            Self::In => "in",
            Self::NotIn => "nin",
            Self::Range => "range",
        }
    }

    /// Expected number of values
    pub fn arity(self) -> Arity {
        match self {
            Self::Empty | Self::NotEmpty => Arity::None,
            Self::Equals
            | Self::NotEquals
            | Self::GreaterThan
            | Self::GreaterThanOrEqual
            | Self::LessThan
            | Self::LessThanOrEqual => Arity::Single,
            Self::All | Self::Any | Self::Contains | Self::In | Self::NotIn => Arity::Set,
            Self::Range => Arity::Pair,
        }
    }
}

/// One constraint on one field
///
/// Outside this crate the only way to obtain a `FilterEntry` is
/// [`FilterEntry::new`], so the value count always matches the kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    field: String,
    kind: FilterKind,
    values: Vec<String>,
}

impl FilterEntry {
    /// Create a filter, checking the value count against the kind
    ///
    /// Range filters additionally require both bounds to be numbers with
    /// `lower <= higher`.
    pub fn new(field: impl Into<String>, kind: FilterKind, values: Vec<String>) -> Result<Self> {
        let field = field.into();

        match kind.arity() {
            Arity::None if !values.is_empty() => {
                return Err(Error::builder_constraint(
                    field,
                    format!("{kind:?} filter takes no values, got {}", values.len()),
                ));
            }
            Arity::Single if values.len() != 1 => {
                return Err(Error::builder_constraint(
                    field,
                    format!("{kind:?} filter takes exactly one value, got {}", values.len()),
                ));
            }
            Arity::Set if values.is_empty() => {
                return Err(Error::builder_constraint(
                    field,
                    format!("{kind:?} filter requires at least one value"),
                ));
            }
            Arity::Pair => check_range(&field, &values)?,
            _ => {}
        }

        Ok(Self {
            field,
            kind,
            values,
        })
    }

    /// Build an entry whose value count is already known to fit the kind
    pub(crate) fn new_unchecked(field: String, kind: FilterKind, values: Vec<String>) -> Self {
        debug_assert!(match kind.arity() {
            Arity::None => values.is_empty(),
            Arity::Single => values.len() == 1,
            Arity::Set => !values.is_empty(),
            Arity::Pair => values.len() == 2,
        });
        Self {
            field,
            kind,
            values,
        }
    }

    /// Target field or element path
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Filter kind
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Filter values in insertion order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Query-string key, e.g. `elements.price[range]`
    pub fn key(&self) -> String {
        format!("{}[{}]", self.field, self.kind.operator())
    }

    /// Serialize to a single query-string segment
    ///
    /// Value-less filters render as the bare key. Otherwise each value is
    /// form-urlencoded and the results are joined with a literal comma.
    pub fn to_segment(&self) -> String {
        if self.values.is_empty() {
            return self.key();
        }
        format!("{}={}", self.key(), join_encoded(&self.values))
    }
}

fn check_range(field: &str, values: &[String]) -> Result<()> {
    let [lower, higher] = values else {
        return Err(Error::builder_constraint(
            field,
            format!("Range filter takes exactly two values, got {}", values.len()),
        ));
    };

    let parse = |value: &str| {
        value.parse::<f64>().map_err(|_| {
            Error::builder_constraint(field, format!("range bound '{value}' is not a number"))
        })
    };
    let (low, high) = (parse(lower)?, parse(higher)?);

    if low.is_nan() || high.is_nan() || low > high {
        return Err(Error::builder_constraint(
            field,
            format!("lower bound {lower} is greater than higher bound {higher}"),
        ));
    }
    Ok(())
}

// ============================================================================
// Parameters
// ============================================================================

/// Sort direction for order parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Ascending order (smallest first)
    #[default]
    Asc,
    /// Descending order (largest first)
    Desc,
}

impl SortOrder {
    /// Token used in the order parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-filter query directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterEntry {
    /// Maximum number of items per page
    Limit(u32),
    /// Number of items to skip
    Skip(u32),
    /// Sort by a field
    Order { field: String, order: SortOrder },
    /// Ask the server to include the total item count in pagination data
    IncludeTotalCount,
    /// Depth of linked items to include
    Depth(u32),
    /// Restrict returned elements to the given fields
    Elements(Vec<String>),
    /// Language variant to return
    Language(String),
}

impl ParameterEntry {
    /// Serialize to a single query-string segment
    pub fn to_segment(&self) -> String {
        match self {
            Self::Limit(count) => format!("limit={count}"),
            Self::Skip(count) => format!("skip={count}"),
            Self::Order { field, order } => format!("order={field}[{order}]"),
            Self::IncludeTotalCount => "includeTotalCount=true".to_string(),
            Self::Depth(depth) => format!("depth={depth}"),
            Self::Elements(fields) => format!("elements={}", join_encoded(fields)),
            Self::Language(code) => format!("language={}", encode(code)),
        }
    }
}

// ============================================================================
// Query Spec
// ============================================================================

/// Either a filter or a parameter
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEntry {
    Filter(FilterEntry),
    Parameter(ParameterEntry),
}

impl QueryEntry {
    /// Serialize to a single query-string segment
    pub fn to_segment(&self) -> String {
        match self {
            Self::Filter(filter) => filter.to_segment(),
            Self::Parameter(parameter) => parameter.to_segment(),
        }
    }
}

impl From<FilterEntry> for QueryEntry {
    fn from(filter: FilterEntry) -> Self {
        Self::Filter(filter)
    }
}

impl From<ParameterEntry> for QueryEntry {
    fn from(parameter: ParameterEntry) -> Self {
        Self::Parameter(parameter)
    }
}

/// Ordered list of query entries
///
/// Segment order always equals insertion order, so the resulting URL is
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    entries: Vec<QueryEntry>,
}

impl QuerySpec {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: impl Into<QueryEntry>) {
        self.entries.push(entry.into());
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[QueryEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One segment per entry, in insertion order
    pub fn segments(&self) -> Vec<String> {
        self.entries.iter().map(QueryEntry::to_segment).collect()
    }

    /// Segments joined with `&`
    pub fn to_query_string(&self) -> String {
        self.segments().join("&")
    }
}

// ============================================================================
// Headers
// ============================================================================

/// Extra request header attached to a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomHeader {
    pub name: String,
    pub value: String,
}

impl CustomHeader {
    /// Create a header
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Header carrying a continuation token
    pub fn continuation_token(token: impl Into<String>) -> Self {
        Self::new(CONTINUATION_TOKEN_HEADER, token)
    }

    /// Whether this is the reserved continuation-token header
    pub fn is_continuation_token(&self) -> bool {
        self.name.eq_ignore_ascii_case(CONTINUATION_TOKEN_HEADER)
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn join_encoded(values: &[String]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(VALUE_SEPARATOR);
        }
        out.push_str(&encode(value));
    }
    out
}
