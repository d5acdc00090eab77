//! Response types

use crate::request::RequestOrigin;
use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::alb::AlbTargetGroupResponse;
use aws_lambda_events::event::apigw::{ApiGatewayProxyResponse, ApiGatewayV2httpResponse};
use http::{
    header::{
        HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        CONTENT_TYPE, SET_COOKIE,
    },
    Response, StatusCode,
};
use quiz_lead::LeadId;
use serde::Serialize;
use serde_json::json;

/// Representation of Lambda response
#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum LambdaResponse {
    /// API Gateway HTTP API response
    ApiGatewayV2(ApiGatewayV2httpResponse),
    /// API Gateway REST API response
    ApiGatewayV1(ApiGatewayProxyResponse),
    /// ALB target group response
    Alb(AlbTargetGroupResponse),
}

impl LambdaResponse {
    /// Shape `value` the way `request_origin` expects its responses
    pub fn from_response<T>(request_origin: &RequestOrigin, value: Response<T>) -> Self
    where
        T: Into<Body>,
    {
        let (parts, bod) = value.into_parts();
        let (is_base64_encoded, body) = match bod.into() {
            Body::Empty => (false, None),
            b @ Body::Text(_) => (false, Some(b)),
            b @ Body::Binary(_) => (true, Some(b)),
        };

        let mut headers = parts.headers;
        let status_code = parts.status.as_u16();

        match request_origin {
            RequestOrigin::ApiGatewayV2 => {
                // ApiGatewayV2 expects the set-cookies headers to be in the "cookies" attribute,
                // so remove them from the headers.
                let cookies = headers
                    .get_all(SET_COOKIE)
                    .iter()
                    .cloned()
                    .map(|v| v.to_str().ok().unwrap_or_default().to_string())
                    .collect();
                headers.remove(SET_COOKIE);

                LambdaResponse::ApiGatewayV2(ApiGatewayV2httpResponse {
                    body,
                    status_code: status_code as i64,
                    is_base64_encoded: Some(is_base64_encoded),
                    cookies,
                    headers: headers.clone(),
                    multi_value_headers: headers,
                })
            }
            RequestOrigin::ApiGatewayV1 => LambdaResponse::ApiGatewayV1(ApiGatewayProxyResponse {
                body,
                status_code: status_code as i64,
                is_base64_encoded: Some(is_base64_encoded),
                headers: headers.clone(),
                multi_value_headers: headers,
            }),
            RequestOrigin::Alb => LambdaResponse::Alb(AlbTargetGroupResponse {
                body,
                status_code: status_code as i64,
                is_base64_encoded,
                headers: headers.clone(),
                multi_value_headers: headers,
                status_description: Some(format!(
                    "{} {}",
                    status_code,
                    parts.status.canonical_reason().unwrap_or_default()
                )),
            }),
        }
    }
}

/// A conversion of self into a `Response<Body>`.
///
/// Implementations for `Response<B> where B: Into<Body>`,
/// `()` (empty body) and `serde_json::Value` are provided.
pub trait IntoResponse {
    /// Return a translation of `self` into a `Response<Body>`
    fn into_response(self) -> Response<Body>;
}

impl<B> IntoResponse for Response<B>
where
    B: Into<Body>,
{
    fn into_response(self) -> Response<Body> {
        let (parts, body) = self.into_parts();
        Response::from_parts(parts, body.into())
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Response<Body> {
        Response::new(Body::Empty)
    }
}

impl IntoResponse for serde_json::Value {
    fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.to_string()));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

/// Set `status` and the cross-origin headers the quiz page needs
pub fn cors<R: IntoResponse>(status: StatusCode, value: R) -> Response<Body> {
    let mut response = value.into_response();
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    response
}

/// Answer to a CORS preflight: `200` with no body
pub fn preflight() -> Response<Body> {
    cors(StatusCode::OK, ())
}

/// `200` for a captured lead
pub fn lead_captured(lead_id: &LeadId) -> Response<Body> {
    cors(
        StatusCode::OK,
        json!({
            "success": true,
            "message": "Lead captured successfully",
            "leadId": lead_id,
        }),
    )
}

/// `400` for a submission lacking a required field
pub fn missing_fields() -> Response<Body> {
    cors(StatusCode::BAD_REQUEST, json!({ "error": "Missing required fields" }))
}

/// `500` for any failure the caller cannot act on
pub fn internal_error() -> Response<Body> {
    cors(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "error": "Internal server error",
            "message": "Failed to process quiz submission",
        }),
    )
}
