//! HTTP request/response value objects
//!
//! The request is read from CGI-style variables (`REQUEST_METHOD`,
//! `REQUEST_URI`, `QUERY_STRING`, `CONTENT_TYPE`, `HTTP_*`).

use std::collections::BTreeMap;

use http::{Method, StatusCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub uri: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    /// Header names lower-cased with `-` separators, e.g. `accept-language`
    pub headers: BTreeMap<String, String>,
}

impl Request {
    /// Build from environment variables; `None` without a request method.
    pub fn from_vars<I>(vars: I) -> Option<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: BTreeMap<String, String> = vars.into_iter().collect();
        let method = vars
            .get("REQUEST_METHOD")
            .filter(|m| !m.is_empty())
            .and_then(|m| Method::from_bytes(m.to_ascii_uppercase().as_bytes()).ok())?;

        let query = vars.get("QUERY_STRING").filter(|q| !q.is_empty()).cloned();
        let uri = vars.get("REQUEST_URI").cloned().unwrap_or_else(|| {
            let path = vars.get("PATH_INFO").cloned().unwrap_or_else(|| "/".into());
            match &query {
                Some(q) => format!("{path}?{q}"),
                None => path,
            }
        });
        let path = uri.split('?').next().unwrap_or("/").to_string();

        let headers = vars
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix("HTTP_")
                    .map(|name| (name.to_ascii_lowercase().replace('_', "-"), v.clone()))
            })
            .collect();

        Some(Self {
            method,
            uri,
            path,
            query,
            content_type: vars.get("CONTENT_TYPE").cloned(),
            headers,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

pub struct Response;

impl Response {
    /// A registered status code with a canonical reason phrase.
    pub fn is_valid_status(code: i32) -> bool {
        u16::try_from(code)
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .and_then(|s| s.canonical_reason())
            .is_some()
    }

    /// `HTTP/1.1 404 Not Found`; unregistered codes carry no reason phrase.
    pub fn status_line(code: i32) -> String {
        format!("HTTP/1.1 {}", Self::status_text(code))
    }

    /// CGI `Status` header, `Status: 404 Not Found`.
    pub fn status_header(code: i32) -> String {
        format!("Status: {}", Self::status_text(code))
    }

    fn status_text(code: i32) -> String {
        let reason = u16::try_from(code)
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default();
        format!("{code} {reason}").trim_end().to_string()
    }
}
