//! Typed subset of the Elasticsearch query DSL

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// A query tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    MatchAll,
    /// Analyzed match of `query` against `field`
    Match { field: String, query: String },
    /// Exact, non-analyzed match
    Term { field: String, value: String },
    MultiMatch { query: String, fields: Vec<String> },
    Bool(BoolQuery),
    Knn(KnnQuery),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<Query>,
    pub should: Vec<Query>,
    pub must_not: Vec<Query>,
    pub minimum_should_match: Option<u32>,
}

/// Approximate nearest neighbour search over a dense vector field
#[derive(Debug, Clone, PartialEq)]
pub struct KnnQuery {
    pub field: String,
    pub query_vector: Vec<f32>,
    pub num_candidates: usize,
    /// Pre-filter applied to the candidate set
    pub filter: Option<Box<Query>>,
}

impl Query {
    pub fn matches(field: impl Into<String>, query: impl Into<String>) -> Self {
        Query::Match {
            field: field.into(),
            query: query.into(),
        }
    }

    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Every clause must match
    pub fn all_of(must: Vec<Query>) -> Self {
        Query::Bool(BoolQuery {
            must,
            ..Default::default()
        })
    }

    /// At least one clause must match
    pub fn any_of(should: Vec<Query>) -> Self {
        Query::Bool(BoolQuery {
            should,
            minimum_should_match: Some(1),
            ..Default::default()
        })
    }

    pub fn none_of(must_not: Vec<Query>) -> Self {
        Query::Bool(BoolQuery {
            must_not,
            ..Default::default()
        })
    }

    /// kNN query; a match-all filter is dropped since it restricts nothing
    pub fn knn(field: impl Into<String>, query_vector: Vec<f32>, num_candidates: usize, filter: Query) -> Self {
        let filter = match filter {
            Query::MatchAll => None,
            other => Some(Box::new(other)),
        };
        Query::Knn(KnnQuery {
            field: field.into(),
            query_vector,
            num_candidates,
            filter,
        })
    }

    /// Wire representation
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Match { field, query } => json!({ "match": { field: { "query": query } } }),
            Query::Term { field, value } => json!({ "term": { field: { "value": value } } }),
            Query::MultiMatch { query, fields } => {
                json!({ "multi_match": { "query": query, "fields": fields } })
            }
            Query::Bool(b) => {
                let mut body = Map::new();
                for (name, clauses) in [("must", &b.must), ("should", &b.should), ("must_not", &b.must_not)] {
                    if !clauses.is_empty() {
                        body.insert(name.to_string(), Value::Array(clauses.iter().map(Query::to_json).collect()));
                    }
                }
                if let Some(minimum) = b.minimum_should_match {
                    body.insert("minimum_should_match".to_string(), json!(minimum));
                }
                json!({ "bool": body })
            }
            Query::Knn(k) => {
                let mut body = Map::new();
                body.insert("field".to_string(), json!(k.field));
                body.insert("query_vector".to_string(), json!(k.query_vector));
                body.insert("num_candidates".to_string(), json!(k.num_candidates));
                if let Some(filter) = &k.filter {
                    body.insert("filter".to_string(), filter.to_json());
                }
                json!({ "knn": body })
            }
        }
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
