//! Tag filter to query translation
//!
//! Within one filter every constraint must hold; across filters at least one
//! filter must hold. Filters without effective constraints are dropped first,
//! so an empty filter never widens an OR into "match everything".

use memdex::MemoryFilter;

use crate::dsl::{BoolQuery, Query};

/// Field prefix of tag values in indexed documents
pub const TAG_FIELD_PREFIX: &str = "tag_";

/// Sub-field analysed with the keyword-tokenize + lowercase analyzer
const WHOLE_VALUE_SUBFIELD: &str = "na";

/// Build the query matching any of `filters`
pub fn translate_filters(filters: &[MemoryFilter]) -> Query {
    let mut effective: Vec<Query> = filters
        .iter()
        .filter(|f| !f.is_empty())
        .map(translate_filter)
        .collect();

    match effective.len() {
        0 => Query::MatchAll,
        1 => effective.remove(0),
        _ => Query::any_of(effective),
    }
}

/// Build the query for a single filter
fn translate_filter(filter: &MemoryFilter) -> Query {
    let mut positives: Vec<Query> = filter.tags().map(|(k, v)| tag_match(k, v)).collect();
    let negatives: Vec<Query> = filter.not_tags().map(|(k, v)| tag_match(k, v)).collect();

    match (positives.len(), negatives.len()) {
        (0, 0) => Query::MatchAll,
        (1, 0) => positives.remove(0),
        (0, _) => Query::none_of(negatives),
        _ => Query::Bool(BoolQuery {
            must: positives,
            must_not: negatives,
            ..Default::default()
        }),
    }
}

/// Case-insensitive whole-value match on a tag
fn tag_match(key: &str, value: &str) -> Query {
    Query::matches(format!("{TAG_FIELD_PREFIX}{key}.{WHOLE_VALUE_SUBFIELD}"), value)
}
