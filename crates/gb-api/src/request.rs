//! GraphQL request and response envelopes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A query or mutation document with its variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    /// The document text.
    pub query: &'static str,
    /// Variables object; `null` when the document takes none.
    pub variables: Value,
}

impl GraphqlRequest {
    /// Creates a request for `query` with `variables`.
    #[inline]
    #[must_use]
    pub fn new(query: &'static str, variables: Value) -> Self {
        Self { query, variables }
    }

    /// Returns the operation name declared in the document, for logging.
    ///
    /// # Examples
    ///
    /// ```
    /// use gb_api::GraphqlRequest;
    ///
    /// let request = GraphqlRequest::new("query Dashboard($first: Int!) { viewer { id } }", serde_json::Value::Null);
    /// assert_eq!(request.operation_name(), "Dashboard");
    ///
    /// let anonymous = GraphqlRequest::new("{ viewer { id } }", serde_json::Value::Null);
    /// assert_eq!(anonymous.operation_name(), "anonymous");
    /// ```
    #[must_use]
    pub fn operation_name(&self) -> &'static str {
        let query = self.query.trim_start();
        let rest = query
            .strip_prefix("query")
            .or_else(|| query.strip_prefix("mutation"));
        rest.and_then(|rest| {
            let rest = rest.trim_start();
            let end = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            (end > 0).then(|| &rest[..end])
        })
        .unwrap_or("anonymous")
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable message.
    pub message: String,
    /// Response path the error applies to.
    #[serde(default)]
    pub path: Vec<Value>,
    /// GitHub's error type, e.g. `NOT_FOUND` or `FORBIDDEN`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// The `{ data?, errors? }` envelope every GraphQL call returns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphqlResponse {
    /// Result data, possibly partial.
    #[serde(default)]
    pub data: Option<Value>,
    /// Errors; empty on full success.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// Wraps successful data.
    #[must_use]
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Wraps a single error with no data.
    #[must_use]
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![GraphqlError {
                message: message.into(),
                path: Vec::new(),
                kind: None,
            }],
        }
    }

    /// Decodes `data` into `T`.
    ///
    /// Any entry in `errors` fails the whole response, even when partial
    /// `data` came with it.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let data = self.into_data()?;
        Ok(serde_json::from_value(data)?)
    }

    /// Decodes the object found by walking `path` from `data`.
    ///
    /// Used for mutation payloads such as `createIssue.issue`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gb_api::GraphqlResponse;
    /// use serde_json::json;
    ///
    /// let response = GraphqlResponse::from_data(json!({ "closeIssue": { "issue": { "id": "I_1" } } }));
    /// let id: String = response.clone().into_payload(&["closeIssue", "issue", "id"]).unwrap();
    /// assert_eq!(id, "I_1");
    ///
    /// assert!(response.into_payload::<String>(&["closeIssue", "missing"]).is_err());
    /// ```
    pub fn into_payload<T: DeserializeOwned>(self, path: &[&str]) -> Result<T, ApiError> {
        let mut value = self.into_data()?;
        for key in path {
            value = match value {
                Value::Object(mut map) => map.remove(*key).unwrap_or(Value::Null),
                _ => Value::Null,
            };
            if value.is_null() {
                return Err(ApiError::missing(path.join(".")));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    fn into_data(self) -> Result<Value, ApiError> {
        if !self.errors.is_empty() {
            return Err(ApiError::Graphql(self.errors));
        }
        match self.data {
            Some(Value::Null) | None => Err(ApiError::missing("data")),
            Some(data) => Ok(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_errors_win_over_partial_data() {
        let response: GraphqlResponse = serde_json::from_value(json!({
            "data": { "viewer": { "id": "U_1" } },
            "errors": [{ "message": "Resource not accessible", "type": "FORBIDDEN" }]
        }))
        .unwrap();

        let err = response.into_result::<Value>().unwrap_err();
        assert!(
            matches!(
                &err,
                ApiError::Graphql(errors)
                    if errors.len() == 1 && errors[0].kind.as_deref() == Some("FORBIDDEN")
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_null_data_is_missing() {
        let response: GraphqlResponse = serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(matches!(
            response.into_result::<Value>(),
            Err(ApiError::MissingData(_))
        ));
    }

    #[test]
    fn test_into_result_decodes() {
        #[derive(Deserialize)]
        struct Viewer {
            login: String,
        }
        #[derive(Deserialize)]
        struct Data {
            viewer: Viewer,
        }

        let response = GraphqlResponse::from_data(json!({ "viewer": { "login": "octocat" } }));
        let data: Data = response.into_result().unwrap();
        assert_eq!(data.viewer.login, "octocat");
    }

    #[test]
    fn test_payload_null_field_is_missing() {
        let response = GraphqlResponse::from_data(json!({ "createIssue": null }));
        let err = response
            .into_payload::<Value>(&["createIssue", "issue"])
            .unwrap_err();
        assert_eq!(err.to_string(), "GraphQL response is missing createIssue.issue");
    }

    #[test]
    fn test_request_serializes_query_and_variables() {
        let request = GraphqlRequest::new("mutation CloseIssue { x }", json!({ "id": "I_1" }));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["query"], "mutation CloseIssue { x }");
        assert_eq!(body["variables"]["id"], "I_1");
        assert_eq!(request.operation_name(), "CloseIssue");
    }
}
