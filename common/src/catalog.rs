//! Remote catalog abstraction
//!
//! The fuzzy lookup and the classifier only need four read-only queries from
//! the distributor catalog. They are expressed as a trait so the pipeline can
//! run against the live API, against a canned catalog in tests, or with no
//! catalog at all.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One product as reported by the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Distributor symbol
    pub symbol: String,
    /// Manufacturer's own symbol
    #[serde(default)]
    pub original_symbol: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub description: String,
    /// Distributor category name
    #[serde(default)]
    pub category: String,
}

impl CatalogProduct {
    pub fn new(symbol: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            category: category.into(),
            ..Default::default()
        }
    }
}

/// Result of a free-text search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total number of hits reported by the catalog
    pub total: u32,
    pub matches: Vec<CatalogProduct>,
}

impl SearchResponse {
    pub fn single(product: CatalogProduct) -> Self {
        Self {
            total: 1,
            matches: vec![product],
        }
    }
}

/// Similarity grade attached to an autocomplete suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchQuality {
    Exact,
    Similar,
    Other,
}

impl MatchQuality {
    pub fn from_api(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "EXACT" => MatchQuality::Exact,
            "SIMILAR" => MatchQuality::Similar,
            _ => MatchQuality::Other,
        }
    }

    pub fn is_close(self) -> bool {
        matches!(self, MatchQuality::Exact | MatchQuality::Similar)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteMatch {
    pub symbol: String,
    pub quality: MatchQuality,
}

impl AutocompleteMatch {
    pub fn new(symbol: impl Into<String>, quality: MatchQuality) -> Self {
        Self {
            symbol: symbol.into(),
            quality,
        }
    }
}

/// Technical parameter of a product (`Resistance: 10kΩ`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductParameter {
    pub name: String,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API returned status {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Read-only access to the distributor catalog
///
/// Every call may fail; callers log the failure and move on to their next
/// candidate. Implementations must not retry on their own.
pub trait CatalogAccessor {
    /// Free-text search
    fn search(&self, query: &str) -> Result<SearchResponse, CatalogError>;

    /// Symbol suggestions for a phrase
    fn autocomplete(&self, phrase: &str) -> Result<Vec<AutocompleteMatch>, CatalogError>;

    /// Products by exact distributor symbol
    fn get_exact(&self, symbols: &[&str]) -> Result<Vec<CatalogProduct>, CatalogError>;

    /// Technical parameters of one product
    fn parameters(&self, _symbol: &str) -> Result<Vec<ProductParameter>, CatalogError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// Canned catalog that records every query
    #[derive(Default)]
    pub(crate) struct StubCatalog {
        autocomplete: HashMap<String, Vec<AutocompleteMatch>>,
        search: HashMap<String, SearchResponse>,
        exact: HashMap<String, CatalogProduct>,
        parameters: HashMap<String, Vec<ProductParameter>>,
        failing: HashSet<String>,
        calls: RefCell<Vec<String>>,
    }

    impl StubCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_autocomplete(mut self, phrase: &str, symbol: &str, quality: MatchQuality) -> Self {
            self.autocomplete
                .entry(phrase.to_string())
                .or_default()
                .push(AutocompleteMatch::new(symbol, quality));
            self
        }

        pub fn with_search(mut self, query: &str, product: CatalogProduct) -> Self {
            self.search
                .insert(query.to_string(), SearchResponse::single(product));
            self
        }

        pub fn with_exact(mut self, product: CatalogProduct) -> Self {
            self.exact.insert(product.symbol.clone(), product);
            self
        }

        pub fn with_parameter(mut self, symbol: &str, name: &str, value: &str) -> Self {
            self.parameters
                .entry(symbol.to_string())
                .or_default()
                .push(ProductParameter {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            self
        }

        /// Every call with this query fails with a transport error
        pub fn failing_on(mut self, query: &str) -> Self {
            self.failing.insert(query.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn record(&self, op: &str, query: &str) -> Result<(), CatalogError> {
            self.calls.borrow_mut().push(format!("{}:{}", op, query));
            if self.failing.contains(query) {
                return Err(CatalogError::Transport("connection reset".to_string()));
            }
            Ok(())
        }
    }

    impl CatalogAccessor for StubCatalog {
        fn search(&self, query: &str) -> Result<SearchResponse, CatalogError> {
            self.record("search", query)?;
            Ok(self.search.get(query).cloned().unwrap_or_default())
        }

        fn autocomplete(&self, phrase: &str) -> Result<Vec<AutocompleteMatch>, CatalogError> {
            self.record("autocomplete", phrase)?;
            Ok(self.autocomplete.get(phrase).cloned().unwrap_or_default())
        }

        fn get_exact(&self, symbols: &[&str]) -> Result<Vec<CatalogProduct>, CatalogError> {
            let mut found = Vec::new();
            for symbol in symbols {
                self.record("exact", symbol)?;
                if let Some(product) = self.exact.get(*symbol) {
                    found.push(product.clone());
                }
            }
            Ok(found)
        }

        fn parameters(&self, symbol: &str) -> Result<Vec<ProductParameter>, CatalogError> {
            self.record("parameters", symbol)?;
            Ok(self.parameters.get(symbol).cloned().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_quality_from_api() {
        assert_eq!(MatchQuality::from_api("EXACT"), MatchQuality::Exact);
        assert_eq!(MatchQuality::from_api("similar"), MatchQuality::Similar);
        assert_eq!(MatchQuality::from_api("PARTIAL"), MatchQuality::Other);
        assert!(MatchQuality::Similar.is_close());
        assert!(!MatchQuality::Other.is_close());
    }

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Status {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 403: forbidden");
        assert_eq!(
            CatalogError::Api("E_INPUT_PARAMS_VALIDATION_ERROR".to_string()).to_string(),
            "API returned status E_INPUT_PARAMS_VALIDATION_ERROR"
        );
    }

    struct SearchOnly;

    impl CatalogAccessor for SearchOnly {
        fn search(&self, _query: &str) -> Result<SearchResponse, CatalogError> {
            Ok(SearchResponse::default())
        }
        fn autocomplete(&self, _phrase: &str) -> Result<Vec<AutocompleteMatch>, CatalogError> {
            Ok(Vec::new())
        }
        fn get_exact(&self, _symbols: &[&str]) -> Result<Vec<CatalogProduct>, CatalogError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_parameters_default_is_empty() {
        assert!(SearchOnly.parameters("1N4007").unwrap().is_empty());
    }
}
