//! Query builder for the OpenAlex `/works` listing endpoint.

use serde_json::{Map, Value};

use crate::client::ClientError;

/// Which field a search term applies to.
///
/// `Default` searches title, abstract, and fulltext together. `DisplayName`
/// is an alias for the title search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Default,
    Title,
    Abstract,
    Fulltext,
    TitleAndAbstract,
    DisplayName,
}

impl SearchField {
    /// Parse a user-supplied search field name. Unknown names are a
    /// validation error, never a silent fallback.
    pub fn parse(name: &str) -> Result<Self, ClientError> {
        match name {
            "default" => Ok(Self::Default),
            "title" => Ok(Self::Title),
            "abstract" => Ok(Self::Abstract),
            "fulltext" => Ok(Self::Fulltext),
            "title_and_abstract" => Ok(Self::TitleAndAbstract),
            "display_name" => Ok(Self::DisplayName),
            other => Err(ClientError::InvalidRequest(format!(
                "Invalid search_field: {other}"
            ))),
        }
    }

    /// Filter key for field-scoped search, or `None` for default search.
    fn filter_key(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Title | Self::DisplayName => Some("title.search"),
            Self::Abstract => Some("abstract.search"),
            Self::Fulltext => Some("fulltext.search"),
            Self::TitleAndAbstract => Some("title_and_abstract.search"),
        }
    }
}

/// A filtered, sorted, optionally projected query against `/works`.
///
/// Filter values compose OR with `|` and negation with `!` per the OpenAlex
/// filter syntax; nested JSON-object values flatten to dotted keys.
#[derive(Debug, Clone, Default)]
pub struct WorksQuery {
    search: Option<String>,
    filters: Vec<(String, String)>,
    sort: Vec<(String, String)>,
    select: Option<Vec<String>>,
}

impl WorksQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a search term against the given field.
    pub fn search(mut self, term: &str, field: SearchField) -> Self {
        match field.filter_key() {
            None => self.search = Some(term.to_string()),
            Some(key) => self.filters.push((key.to_string(), term.to_string())),
        }
        self
    }

    /// Add a single `key:value` filter.
    pub fn filter(mut self, key: &str, value: &str) -> Self {
        self.filters.push((key.to_string(), value.to_string()));
        self
    }

    /// Add caller-supplied filters from a JSON mapping. Array values join
    /// with `|` (OR); object values flatten into dotted keys.
    pub fn filters(mut self, filters: &Map<String, Value>) -> Self {
        for (key, value) in filters {
            self.push_filter_value(key, value);
        }
        self
    }

    fn push_filter_value(&mut self, key: &str, value: &Value) {
        match value {
            Value::Object(nested) => {
                for (subkey, subvalue) in nested {
                    self.push_filter_value(&format!("{key}.{subkey}"), subvalue);
                }
            }
            other => self.filters.push((key.to_string(), scalar_string(other))),
        }
    }

    /// Add sort criteria from a JSON mapping of field to direction.
    pub fn sort(mut self, sort: &Map<String, Value>) -> Self {
        for (field, direction) in sort {
            self.sort.push((field.clone(), scalar_string(direction)));
        }
        self
    }

    /// Push field selection down to the API.
    pub fn select(mut self, fields: &[String]) -> Self {
        self.select = Some(fields.to_vec());
        self
    }

    /// Render the query into URL parameters (without pagination).
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(ref search) = self.search {
            params.push(("search".to_string(), search.clone()));
        }

        if !self.filters.is_empty() {
            let filter = self
                .filters
                .iter()
                .map(|(key, value)| format!("{key}:{value}"))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("filter".to_string(), filter));
        }

        if !self.sort.is_empty() {
            let sort = self
                .sort
                .iter()
                .map(|(field, direction)| format!("{field}:{direction}"))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("sort".to_string(), sort));
        }

        if let Some(ref select) = self.select {
            params.push(("select".to_string(), select.join(",")));
        }

        params
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(scalar_string)
            .collect::<Vec<_>>()
            .join("|"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_field_parse() {
        assert_eq!(SearchField::parse("default").unwrap(), SearchField::Default);
        assert_eq!(
            SearchField::parse("title_and_abstract").unwrap(),
            SearchField::TitleAndAbstract
        );
        assert!(matches!(
            SearchField::parse("bogus"),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_default_search_uses_search_param() {
        let params = WorksQuery::new()
            .search("machine learning", SearchField::Default)
            .to_params();
        assert_eq!(
            params,
            vec![("search".to_string(), "machine learning".to_string())]
        );
    }

    #[test]
    fn test_field_search_becomes_search_filter() {
        let params = WorksQuery::new()
            .search("attention", SearchField::Title)
            .to_params();
        assert_eq!(
            params,
            vec![("filter".to_string(), "title.search:attention".to_string())]
        );
    }

    #[test]
    fn test_display_name_aliases_title() {
        let params = WorksQuery::new()
            .search("attention", SearchField::DisplayName)
            .to_params();
        assert_eq!(
            params,
            vec![("filter".to_string(), "title.search:attention".to_string())]
        );
    }

    #[test]
    fn test_filters_compose_with_commas() {
        let filters = json!({
            "publication_year": 2020,
            "is_oa": true
        });
        let params = WorksQuery::new()
            .filters(filters.as_object().unwrap())
            .to_params();
        assert_eq!(
            params,
            vec![(
                "filter".to_string(),
                "is_oa:true,publication_year:2020".to_string()
            )]
        );
    }

    #[test]
    fn test_filter_array_value_joins_with_pipe() {
        let filters = json!({"type": ["article", "preprint"]});
        let params = WorksQuery::new()
            .filters(filters.as_object().unwrap())
            .to_params();
        assert_eq!(
            params,
            vec![("filter".to_string(), "type:article|preprint".to_string())]
        );
    }

    #[test]
    fn test_nested_filter_object_flattens_to_dotted_key() {
        let filters = json!({"ids": {"openalex": "W1|W2"}});
        let params = WorksQuery::new()
            .filters(filters.as_object().unwrap())
            .to_params();
        assert_eq!(
            params,
            vec![("filter".to_string(), "ids.openalex:W1|W2".to_string())]
        );
    }

    #[test]
    fn test_sort_and_select() {
        let sort = json!({"cited_by_count": "desc"});
        let params = WorksQuery::new()
            .sort(sort.as_object().unwrap())
            .select(&["id".to_string(), "title".to_string()])
            .to_params();
        assert_eq!(
            params,
            vec![
                ("sort".to_string(), "cited_by_count:desc".to_string()),
                ("select".to_string(), "id,title".to_string()),
            ]
        );
    }
}
