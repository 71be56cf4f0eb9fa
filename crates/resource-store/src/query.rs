//! Query parameters for remote reads.

use std::collections::BTreeMap;

/// `filter[...]`, `page[limit]` and `include` for a `find`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: BTreeMap<String, String>,
    pub page_limit: Option<usize>,
    pub include: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.page_limit = Some(limit);
        self
    }

    pub fn include<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Query string pairs in JSON:API bracket notation.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filter
            .iter()
            .map(|(field, value)| (format!("filter[{field}]"), value.clone()))
            .collect();
        if let Some(limit) = self.page_limit {
            pairs.push(("page[limit]".into(), limit.to_string()));
        }
        if !self.include.is_empty() {
            pairs.push(("include".into(), self.include.join(",")));
        }
        pairs
    }
}
