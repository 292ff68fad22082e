//! W3C trace parent extraction.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

/// Read a caller's trace context, or `None` when the headers carry no valid parent.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    // Extract onto an empty context so a missing header never adopts the current span.
    let context = global::get_text_map_propagator(|propagator| {
        propagator.extract_with_context(&Context::new(), &Headers(headers))
    });

    let valid = context.span().span_context().is_valid();

    valid.then_some(context)
}

struct Headers<'a>(&'a HeaderMap);

impl Extractor for Headers<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::header::HeaderValue;

    use super::*;

    #[test]
    fn requests_without_trace_headers_have_no_parent() {
        assert!(
            extract_parent_context(&HeaderMap::new()).is_none(),
            "expected no parent without a traceparent header"
        );
    }

    #[test]
    fn extractor_lists_and_reads_headers() {
        let mut headers = HeaderMap::new();

        headers.insert("traceparent", HeaderValue::from_static("00-abc-def-01"));

        let extractor = Headers(&headers);

        assert_eq!(extractor.get("traceparent"), Some("00-abc-def-01"));
        assert_eq!(extractor.keys(), vec!["traceparent"]);
    }
}
