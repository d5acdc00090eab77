//! ALB and API Gateway request adaptations
//!
//! The quiz form can be fronted by an API Gateway REST API, an API Gateway
//! HTTP API or an Application Load Balancer. Each delivers a differently
//! shaped event; all of them become an `http::Request<Body>` here.

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::alb::AlbTargetGroupRequest;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayV2httpRequest};
use http::header::HeaderName;
use serde::Deserialize;
use serde_json::error::Error as JsonError;
use std::mem;
use tracing::error;

/// Internal representation of a Lambda http event from
/// ALB, API Gateway REST and HTTP API proxy event perspectives
///
/// The order of the variants is notable. Serde will try to deserialize in this order.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum LambdaRequest {
    /// API Gateway REST API proxy event
    ApiGatewayV1(ApiGatewayProxyRequest),
    /// API Gateway HTTP API event
    ApiGatewayV2(ApiGatewayV2httpRequest),
    /// ALB target group event
    Alb(AlbTargetGroupRequest),
}

impl LambdaRequest {
    /// Return the `RequestOrigin` of the request, so that the response can be
    /// shaped the way that origin expects.
    pub fn request_origin(&self) -> RequestOrigin {
        match self {
            LambdaRequest::ApiGatewayV1 { .. } => RequestOrigin::ApiGatewayV1,
            LambdaRequest::ApiGatewayV2 { .. } => RequestOrigin::ApiGatewayV2,
            LambdaRequest::Alb { .. } => RequestOrigin::Alb,
        }
    }
}

/// Represents the origin from which the lambda was requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// API Gateway proxy request origin
    ApiGatewayV1,
    /// API Gateway v2 request origin
    ApiGatewayV2,
    /// ALB request origin
    Alb,
}

/// Converts LambdaRequest types into `http::Request<Body>` types
impl From<LambdaRequest> for http::Request<Body> {
    fn from(value: LambdaRequest) -> Self {
        match value {
            LambdaRequest::ApiGatewayV2(ag) => into_api_gateway_v2_request(ag),
            LambdaRequest::ApiGatewayV1(ag) => into_proxy_request(ag),
            LambdaRequest::Alb(alb) => into_alb_request(alb),
        }
    }
}

fn scheme(headers: &http::HeaderMap) -> &str {
    headers
        .get(x_forwarded_proto())
        .and_then(|s| s.to_str().ok())
        .unwrap_or("https")
}

fn host(headers: &http::HeaderMap) -> Option<&str> {
    headers.get(http::header::HOST).and_then(|s| s.to_str().ok())
}

fn body(raw: Option<&str>, base64: bool) -> Body {
    raw.map_or_else(Body::default, |b| Body::from_maybe_encoded(base64, b))
}

// The builder has no batch header setter, so headers and method are swapped
// in afterwards. An unparseable uri is logged and left empty.
fn assemble(
    builder: http::request::Builder,
    body: Body,
    headers: http::HeaderMap,
    method: http::Method,
) -> http::Request<Body> {
    let mut req = match builder.body(()) {
        Ok(req) => req.map(|()| body),
        Err(err) => {
            error!(error = %err, "could not build request uri from event");
            http::Request::new(body)
        }
    };
    let _ = mem::replace(req.headers_mut(), headers);
    let _ = mem::replace(req.method_mut(), method);
    req
}

pub(crate) fn into_api_gateway_v2_request(ag: ApiGatewayV2httpRequest) -> http::Request<Body> {
    let http_method = ag.request_context.http.method.clone();
    let authority = host(&ag.headers)
        .or_else(|| ag.request_context.domain_name.as_deref())
        .unwrap_or("localhost");
    let mut url = format!(
        "{}://{}{}",
        scheme(&ag.headers),
        authority,
        ag.raw_path.as_deref().unwrap_or_default()
    );
    if let Some(query) = ag.raw_query_string.as_deref().filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    let builder = http::Request::builder().uri(url);

    let body = body(ag.body.as_deref(), ag.is_base64_encoded);
    assemble(builder, body, ag.headers, http_method)
}

pub(crate) fn into_proxy_request(ag: ApiGatewayProxyRequest) -> http::Request<Body> {
    let http_method = ag.http_method;
    let builder = http::Request::builder().uri(format!(
        "{}://{}{}",
        scheme(&ag.headers),
        host(&ag.headers).unwrap_or("localhost"),
        ag.path.unwrap_or_default()
    ));

    // merge headers into multi_value_headers and make
    // multi-value_headers our canonical source of request headers
    let mut headers = ag.multi_value_headers;
    headers.extend(ag.headers);

    let body = body(ag.body.as_deref(), ag.is_base64_encoded.unwrap_or_default());
    assemble(builder, body, headers, http_method)
}

pub(crate) fn into_alb_request(alb: AlbTargetGroupRequest) -> http::Request<Body> {
    let http_method = alb.http_method;
    let builder = http::Request::builder().uri(format!(
        "{}://{}{}",
        scheme(&alb.headers),
        host(&alb.headers).unwrap_or("localhost"),
        alb.path.unwrap_or_default()
    ));

    let mut headers = alb.multi_value_headers;
    headers.extend(alb.headers);

    let body = body(alb.body.as_deref(), alb.is_base64_encoded);
    assemble(builder, body, headers, http_method)
}

/// Deserializes a `Request` from a string of JSON text.
pub fn from_str(s: &str) -> Result<http::Request<Body>, JsonError> {
    serde_json::from_str(s).map(LambdaRequest::into)
}

fn x_forwarded_proto() -> HeaderName {
    HeaderName::from_static("x-forwarded-proto")
}
