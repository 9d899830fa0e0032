//! Server-rendered HTML pages.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::db::GeneratedPassword;
use crate::error::PassforgeError;
use crate::server::router::GeneratorSettings;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
nav a { margin-right: 1rem; }
form label { display: block; margin: .5rem 0; }
.password { font-family: ui-monospace, monospace; font-size: 1.4rem; background: #f3f3f3; padding: .6rem; word-break: break-all; }
.error { background: #fdecea; color: #8a1c12; padding: .6rem; border-radius: 4px; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: .35rem .5rem; border-bottom: 1px solid #ddd; }
td.value { font-family: ui-monospace, monospace; word-break: break-all; }
"#;

/// Renders a `PassforgeError` as an HTML page with the matching status.
pub struct HtmlError(pub PassforgeError);

impl From<PassforgeError> for HtmlError {
    fn from(e: PassforgeError) -> Self {
        HtmlError(e)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let (_, message) = self.0.public_parts();
        (status, Html(error_page(status, &message))).into_response()
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · Passforge</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href="/">Generate</a><a href="/passwords">History</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn index_page(settings: GeneratorSettings) -> String {
    let body = format!(
        r#"<form method="post" action="/generate">
<label>Website / service <input type="text" name="website"></label>
<label>Username <input type="text" name="username"></label>
<label>Length <input type="number" name="length" value="{default}" min="{min}" max="{max}"></label>
<label><input type="checkbox" name="lowercase" checked> Lowercase (a-z)</label>
<label><input type="checkbox" name="uppercase" checked> Uppercase (A-Z)</label>
<label><input type="checkbox" name="digits" checked> Digits (0-9)</label>
<label><input type="checkbox" name="symbols"> Symbols</label>
<label><input type="checkbox" name="require_each_class"> At least one of each selected class</label>
<button type="submit">Generate</button>
</form>"#,
        default = settings.default_length,
        min = settings.bounds.min,
        max = settings.bounds.max,
    );
    layout("Password generator", &body)
}

pub fn result_page(entry: &GeneratedPassword) -> String {
    let mut body = format!(
        r#"<p class="password">{}</p>
<dl>"#,
        escape(&entry.value)
    );
    if let Some(website) = &entry.website {
        body.push_str(&format!("<dt>Website</dt><dd>{}</dd>", escape(website)));
    }
    if let Some(username) = &entry.username {
        body.push_str(&format!("<dt>Username</dt><dd>{}</dd>", escape(username)));
    }
    if let Some(policy) = &entry.policy {
        body.push_str(&format!("<dt>Policy</dt><dd>{}</dd>", escape(&policy.to_string())));
    }
    body.push_str(&format!(
        "<dt>Created</dt><dd>{}</dd></dl>\n<p><a href=\"/\">Generate another</a></p>",
        entry.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    layout("Your new password", &body)
}

pub fn history_page(entries: &[GeneratedPassword], total: i64) -> String {
    if entries.is_empty() {
        return layout(
            "Stored passwords",
            r#"<p>No passwords stored yet. <a href="/">Generate one</a>.</p>"#,
        );
    }
    let mut body = format!(
        "<p>{} stored, newest first.</p>\n<table>\n<tr><th>#</th><th>Password</th><th>Website</th><th>Username</th><th>Policy</th><th>Created</th></tr>\n",
        total
    );
    for e in entries {
        body.push_str(&format!(
            "<tr><td>{}</td><td class=\"value\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            e.id,
            escape(&e.value),
            escape(e.website.as_deref().unwrap_or("")),
            escape(e.username.as_deref().unwrap_or("")),
            escape(&e.policy.map(|p| p.to_string()).unwrap_or_default()),
            e.created_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    body.push_str("</table>");
    layout("Stored passwords", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<p class="error">{}</p>
<p><a href="/">Back to the generator</a></p>"#,
        escape(message)
    );
    layout(
        &format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error")
        ),
        &body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(value: &str) -> GeneratedPassword {
        GeneratedPassword {
            id: 7,
            value: value.to_string(),
            created_at: Utc::now(),
            policy: None,
            website: Some("<script>".to_string()),
            username: None,
        }
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn history_escapes_stored_values() {
        let html = history_page(&[entry("a<b>&c")], 1);
        assert!(html.contains("a&lt;b&gt;&amp;c"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_history_links_back_to_form() {
        let html = history_page(&[], 0);
        assert!(html.contains("No passwords stored yet"));
    }

    #[test]
    fn index_form_reflects_length_settings() {
        let html = index_page(GeneratorSettings::default());
        assert!(html.contains(r#"value="12" min="1" max="128""#));
        assert!(html.contains(r#"action="/generate""#));
    }

    #[test]
    fn error_page_shows_status_and_message() {
        let html = error_page(StatusCode::BAD_REQUEST, "length must be positive");
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("length must be positive"));
    }
}
