//! Request trace identifiers.
//!
//! Honours an incoming W3C `traceparent` or `x-trace-id`/`x-request-id` pair so
//! a caller's ids show up in our logs, and mints fresh ones otherwise.

use actix_web::HttpRequest;
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const W3C_TRACEPARENT_HEADER: &str = "traceparent";

#[derive(Debug, Clone, PartialEq)]
pub struct TraceContext {
    /// Id shared by every span of one logical request chain
    pub trace_id: String,
    /// Id of the span opened for this request
    pub span_id: String,
    /// Span id of the caller, when propagated
    pub parent_span_id: Option<String>,
    pub request_id: String,
}

impl TraceContext {
    /// Extract trace context from HTTP request headers
    pub fn from_request(req: &HttpRequest) -> Self {
        let headers = req.headers();

        if let Some(ctx) = headers
            .get(W3C_TRACEPARENT_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(Self::parse_traceparent)
        {
            return ctx;
        }

        let trace_id = headers
            .get(TRACE_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| trace_id.clone());

        Self {
            trace_id,
            span_id: generate_span_id(),
            parent_span_id: None,
            request_id,
        }
    }

    /// Format: version-trace_id-parent_id-flags (e.g., "00-xxx-yyy-01")
    fn parse_traceparent(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split('-').collect();
        if parts.len() < 3 || parts[1].is_empty() {
            return None;
        }

        Some(Self {
            trace_id: parts[1].to_string(),
            span_id: generate_span_id(),
            parent_span_id: Some(parts[2].to_string()),
            request_id: parts[1].to_string(),
        })
    }
}

fn generate_span_id() -> String {
    Uuid::new_v4().simple().to_string()[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_fresh_ids_without_headers() {
        let ctx = TraceContext::from_request(&TestRequest::default().to_http_request());
        assert!(!ctx.trace_id.is_empty());
        assert_eq!(ctx.request_id, ctx.trace_id);
        assert_eq!(ctx.span_id.len(), 16);
        assert!(ctx.parent_span_id.is_none());
    }

    #[test]
    fn test_parse_traceparent() {
        let ctx = TraceContext::parse_traceparent("00-abc123-def456-01").unwrap();
        assert_eq!(ctx.trace_id, "abc123");
        assert_eq!(ctx.parent_span_id, Some("def456".to_string()));
    }

    #[test]
    fn test_from_request_headers() {
        let req = TestRequest::default()
            .insert_header((TRACE_ID_HEADER, "trace-1"))
            .insert_header((REQUEST_ID_HEADER, "req-1"))
            .to_http_request();

        let ctx = TraceContext::from_request(&req);
        assert_eq!(ctx.trace_id, "trace-1");
        assert_eq!(ctx.request_id, "req-1");
    }
}
