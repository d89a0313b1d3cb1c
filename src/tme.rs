//! TME catalog client
//!
//! Signed POST requests against `https://api.tme.eu/{action}.json`.
//!
//! Signing:
//! 1. parameters sorted by name, list parameters expanded as `Key[i]`
//! 2. names and values percent-encoded, joined as a query string
//! 3. base string `POST&{enc(uri)}&{enc(query)}`
//! 4. HMAC-SHA1 with the application secret, Base64

use crate::config::{Config, Credentials};
use crate::error::{BomError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bom_scanner_common::{
    AutocompleteMatch, CatalogAccessor, CatalogError, CatalogProduct, MatchQuality,
    ProductParameter, SearchResponse,
};
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha1::Sha1;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

type HmacSha1 = Hmac<Sha1>;

pub const API_BASE: &str = "https://api.tme.eu";

/// Request parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

/// Flatten parameters into form pairs, sorted by name, lists in index order
pub fn expand_params(params: &BTreeMap<String, ParamValue>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        if key == "ApiSignature" {
            continue;
        }
        match value {
            ParamValue::Single(v) => pairs.push((key.clone(), v.clone())),
            ParamValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    pairs.push((format!("{}[{}]", key, i), item.clone()));
                }
            }
        }
    }
    pairs
}

/// Signature base string of a POST request
pub fn signature_base(uri: &str, pairs: &[(String, String)]) -> String {
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "POST&{}&{}",
        urlencoding::encode(uri),
        urlencoding::encode(&query)
    )
}

/// Base64 HMAC-SHA1 of the base string
pub fn sign(secret: &str, base: &str) -> String {
    // HMAC accepts keys of any length
    let mut mac = match HmacSha1::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(base.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Data", default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct ApiProduct {
    symbol: Option<String>,
    original_symbol: Option<String>,
    producer: Option<String>,
    description: Option<String>,
    category: Option<String>,
}

impl From<ApiProduct> for CatalogProduct {
    fn from(p: ApiProduct) -> Self {
        CatalogProduct {
            symbol: p.symbol.unwrap_or_default(),
            original_symbol: p.original_symbol.unwrap_or_default(),
            producer: p.producer.unwrap_or_default(),
            description: p.description.unwrap_or_default(),
            category: p.category.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct SearchData {
    amount: Option<u32>,
    product_list: Vec<ApiProduct>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct ProductsData {
    product_list: Vec<ApiProduct>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct AutocompleteData {
    result: Vec<AutocompleteEntry>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct AutocompleteEntry {
    product: ApiProduct,
    match_data: MatchData,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct MatchData {
    similarity: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct ParametersData {
    product_list: Vec<ParameterProduct>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct ParameterProduct {
    parameter_list: Vec<ApiParameter>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct ApiParameter {
    parameter_name: Option<String>,
    parameter_value: Option<String>,
}

/// Unwrap the `{Status, Data}` envelope and decode `Data`
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: &str) -> std::result::Result<T, CatalogError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| CatalogError::Malformed(e.to_string()))?;
    if envelope.status != "OK" {
        return Err(CatalogError::Api(envelope.status));
    }
    serde_json::from_value(envelope.data).map_err(|e| CatalogError::Malformed(e.to_string()))
}

/// TME API client
pub struct TmeClient {
    http: reqwest::blocking::Client,
    base_url: String,
    credentials: Credentials,
    country: String,
    language: String,
}

impl TmeClient {
    pub fn new(credentials: Credentials, config: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BomError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: API_BASE.to_string(),
            credentials,
            country: config.country.clone(),
            language: config.language.clone(),
        })
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        mut params: BTreeMap<String, ParamValue>,
    ) -> std::result::Result<T, CatalogError> {
        params.insert("Token".into(), self.credentials.token.as_str().into());
        params.insert("Country".into(), self.country.as_str().into());
        params.insert("Language".into(), self.language.as_str().into());

        let uri = format!("{}/{}.json", self.base_url, action);
        let mut form = expand_params(&params);
        let signature = sign(&self.credentials.secret, &signature_base(&uri, &form));
        form.push(("ApiSignature".to_string(), signature));

        debug!(action = %action, "TME request");
        let response = self
            .http
            .post(&uri)
            .form(&form)
            .send()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        decode_envelope(&body)
    }
}

impl CatalogAccessor for TmeClient {
    fn search(&self, query: &str) -> std::result::Result<SearchResponse, CatalogError> {
        let mut params: BTreeMap<String, ParamValue> = BTreeMap::new();
        params.insert("SearchPlain".to_string(), query.into());
        params.insert("SearchPage".to_string(), "1".into());

        let data: SearchData = self.call("Products/Search", params)?;
        let matches: Vec<CatalogProduct> = data.product_list.into_iter().map(Into::into).collect();
        Ok(SearchResponse {
            total: data.amount.unwrap_or(matches.len() as u32),
            matches,
        })
    }

    fn autocomplete(&self, phrase: &str) -> std::result::Result<Vec<AutocompleteMatch>, CatalogError> {
        let mut params: BTreeMap<String, ParamValue> = BTreeMap::new();
        params.insert("Phrase".to_string(), phrase.into());

        let data: AutocompleteData = self.call("Products/Autocomplete", params)?;
        Ok(data
            .result
            .into_iter()
            .map(|entry| AutocompleteMatch {
                symbol: entry.product.symbol.unwrap_or_default(),
                quality: MatchQuality::from_api(&entry.match_data.similarity.unwrap_or_default()),
            })
            .collect())
    }

    fn get_exact(&self, symbols: &[&str]) -> std::result::Result<Vec<CatalogProduct>, CatalogError> {
        let mut params: BTreeMap<String, ParamValue> = BTreeMap::new();
        params.insert(
            "SymbolList".to_string(),
            ParamValue::List(symbols.iter().map(|s| s.to_string()).collect()),
        );

        let data: ProductsData = self.call("Products/GetProducts", params)?;
        Ok(data.product_list.into_iter().map(Into::into).collect())
    }

    fn parameters(&self, symbol: &str) -> std::result::Result<Vec<ProductParameter>, CatalogError> {
        let mut params: BTreeMap<String, ParamValue> = BTreeMap::new();
        params.insert(
            "SymbolList".to_string(),
            ParamValue::List(vec![symbol.to_string()]),
        );

        let data: ParametersData = self.call("Products/GetParameters", params)?;
        Ok(data
            .product_list
            .into_iter()
            .next()
            .map(|p| p.parameter_list)
            .unwrap_or_default()
            .into_iter()
            .map(|p| ProductParameter {
                name: p.parameter_name.unwrap_or_default(),
                value: p.parameter_value.unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> BTreeMap<String, ParamValue> {
        let mut params: BTreeMap<String, ParamValue> = BTreeMap::new();
        params.insert("Token".to_string(), "abc123".into());
        params.insert("Country".to_string(), "CZ".into());
        params.insert("Language".to_string(), "EN".into());
        params.insert(
            "SymbolList".to_string(),
            ParamValue::List(vec!["1N4007-DC".into(), "DR384/2.2X6".into()]),
        );
        params
    }

    #[test]
    fn test_expand_params_sorted_with_indices() {
        let pairs = expand_params(&sample_params());
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Country", "Language", "SymbolList[0]", "SymbolList[1]", "Token"]
        );
    }

    #[test]
    fn test_expand_params_skips_signature() {
        let mut params = sample_params();
        params.insert("ApiSignature".to_string(), "x".into());
        assert!(expand_params(&params).iter().all(|(k, _)| k != "ApiSignature"));
    }

    #[test]
    fn test_signature_base() {
        let pairs = expand_params(&sample_params());
        let base = signature_base("https://api.tme.eu/Products/GetProducts.json", &pairs);
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.tme.eu%2FProducts%2FGetProducts.json&Country%3DCZ%26Language%3DEN%26SymbolList%255B0%255D%3D1N4007-DC%26SymbolList%255B1%255D%3DDR384%252F2.2X6%26Token%3Dabc123"
        );
    }

    #[test]
    fn test_sign_known_vector() {
        let pairs = expand_params(&sample_params());
        let base = signature_base("https://api.tme.eu/Products/GetProducts.json", &pairs);
        assert_eq!(sign("secret", &base), "U1B9r9MZSf2Ut4XiZ7Jhuc3/C8E=");
    }

    #[test]
    fn test_decode_search_envelope() {
        let body = r#"{"Status":"OK","Data":{"Amount":2,"ProductList":[
            {"Symbol":"1N4007-DC","OriginalSymbol":"1N4007","Producer":"DC COMPONENTS",
             "Description":"Diode: rectifying; THT; 1kV; 1A","Category":"THT universal diodes"},
            {"Symbol":"1N4007-E3","OriginalSymbol":null,"Producer":"VISHAY"}]}}"#;
        let data: SearchData = decode_envelope(body).unwrap();
        assert_eq!(data.amount, Some(2));
        let products: Vec<CatalogProduct> = data.product_list.into_iter().map(Into::into).collect();
        assert_eq!(products[0].symbol, "1N4007-DC");
        assert_eq!(products[0].category, "THT universal diodes");
        assert_eq!(products[1].original_symbol, "");
    }

    #[test]
    fn test_decode_autocomplete_envelope() {
        let body = r#"{"Status":"OK","Data":{"Result":[
            {"Product":{"Symbol":"DR384/2.2X6"},"MatchData":{"Similarity":"EXACT"}}]}}"#;
        let data: AutocompleteData = decode_envelope(body).unwrap();
        assert_eq!(data.result.len(), 1);
        assert_eq!(data.result[0].product.symbol.as_deref(), Some("DR384/2.2X6"));
        assert_eq!(data.result[0].match_data.similarity.as_deref(), Some("EXACT"));
    }

    #[test]
    fn test_decode_error_status() {
        let err = decode_envelope::<SearchData>(r#"{"Status":"E_INVALID_SIGNATURE"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Api(ref s) if s == "E_INVALID_SIGNATURE"));

        let err = decode_envelope::<SearchData>("<html>").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let credentials = Credentials {
            token: "t".into(),
            secret: "s".into(),
        };
        let config = Config {
            timeout_seconds: 2,
            ..Default::default()
        };
        let client = TmeClient::new(credentials, &config)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let err = client.search("1N4007").unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }
}
