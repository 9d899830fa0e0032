use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use std::convert::Infallible;

/// Which representation the caller asked for.
///
/// HTML wins only when `Accept` lists `text/html` with a higher quality than
/// `application/json`, or the same quality and earlier position. Browsers
/// send `text/html`; API clients (curl, fetch with JSON) do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut html: Option<(f32, usize)> = None;
        let mut json: Option<(f32, usize)> = None;

        let ranges = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .enumerate();
        for (pos, range) in ranges {
            let mut params = range.split(';');
            let media = params.next().unwrap_or("").trim().to_ascii_lowercase();
            let q = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            let slot = match media.as_str() {
                "text/html" => &mut html,
                "application/json" => &mut json,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some((q, pos));
            }
        }

        match (html, json) {
            (Some((hq, _)), _) if hq <= 0.0 => ResponseFormat::Json,
            (Some(_), None) => ResponseFormat::Html,
            (Some((hq, hpos)), Some((jq, jpos))) if hq > jq || (hq == jq && hpos < jpos) => {
                ResponseFormat::Html
            }
            _ => ResponseFormat::Json,
        }
    }
}

impl<S> FromRequestParts<S> for ResponseFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn browser_accept_header_selects_html() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        assert_eq!(ResponseFormat::from_headers(&headers), ResponseFormat::Html);
    }

    #[test]
    fn higher_quality_json_beats_listed_html() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/html;q=0.1"),
        );
        assert_eq!(ResponseFormat::from_headers(&headers), ResponseFormat::Json);
    }

    #[test]
    fn equal_quality_prefers_first_listed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html, application/json"),
        );
        assert_eq!(ResponseFormat::from_headers(&headers), ResponseFormat::Html);

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/html"),
        );
        assert_eq!(ResponseFormat::from_headers(&headers), ResponseFormat::Json);
    }

    #[test]
    fn html_with_zero_quality_is_refused() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html;q=0, */*"));
        assert_eq!(ResponseFormat::from_headers(&headers), ResponseFormat::Json);
    }

    #[test]
    fn missing_or_wildcard_accept_selects_json() {
        assert_eq!(ResponseFormat::from_headers(&HeaderMap::new()), ResponseFormat::Json);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        assert_eq!(ResponseFormat::from_headers(&headers), ResponseFormat::Json);
    }
}
