use axum::{
    Form, Json,
    extract::{FromRequest, Query, Request},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::PassforgeError;
use crate::generator::PolicyInput;
use crate::server::middleware::negotiate::ResponseFormat;
use crate::server::views::HtmlError;

/// Parameters of a generation request, from a JSON body, an HTML form, or the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateForm {
    #[serde(flatten)]
    pub policy: PolicyInput,
    pub website: Option<String>,
    pub username: Option<String>,
}

/// Parses the parameters according to `Content-Type` and records the negotiated
/// response format, so that body errors are reported in that format too.
pub struct GenerateRequest(pub GenerateForm, pub ResponseFormat);

impl<S> FromRequest<S> for GenerateRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let format = ResponseFormat::from_headers(req.headers());
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.to_ascii_lowercase());

        let parsed = match content_type {
            Some(ct) if ct.starts_with("application/json") => {
                Json::<GenerateForm>::from_request(req, &())
                    .await
                    .map(|Json(body)| body)
                    .map_err(|rejection| rejection.body_text())
            }
            Some(_) => Form::<GenerateForm>::from_request(req, &())
                .await
                .map(|Form(body)| body)
                .map_err(|rejection| rejection.body_text()),
            // No body to speak of: parameters travel in the query string.
            None => Query::<GenerateForm>::try_from_uri(req.uri())
                .map(|Query(params)| params)
                .map_err(|rejection| rejection.body_text()),
        };

        match parsed {
            Ok(form) => Ok(GenerateRequest(form, format)),
            Err(reason) => {
                let err = PassforgeError::invalid(format!("malformed request parameters: {reason}"));
                Err(match format {
                    ResponseFormat::Html => HtmlError(err).into_response(),
                    ResponseFormat::Json => err.into_response(),
                })
            }
        }
    }
}

/// Same as `GenerateRequest` but always answers in JSON.
pub struct ApiGenerateRequest(pub GenerateForm);

impl<S> FromRequest<S> for ApiGenerateRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        req.headers_mut().remove(header::ACCEPT);
        let GenerateRequest(form, _) = GenerateRequest::from_request(req, state).await?;
        Ok(ApiGenerateRequest(form))
    }
}
