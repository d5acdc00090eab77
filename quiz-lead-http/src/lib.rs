#![deny(missing_docs)]

//! Lambda HTTP front end for quiz lead capture.
//!
//! Events from API Gateway (REST or HTTP API) and ALB are adapted into
//! `http::Request`s, handled by [`QuizHandler`], and the resulting
//! `http::Response` is shaped back into the event source's response format.
//!
//! ```rust,no_run
//! use quiz_lead::{Config, SesSender};
//! use quiz_lead_http::{LambdaRequest, LambdaResponse, QuizHandler};
//! use std::sync::Arc;
//!
//! # async fn example(event: LambdaRequest) -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let handler = QuizHandler::new(&config, Arc::new(SesSender::from_config(&config).await));
//! let origin = event.request_origin();
//! let response = LambdaResponse::from_response(&origin, handler.handle(event.into()).await);
//! # Ok(())
//! # }
//! ```

pub use aws_lambda_events::encodings::Body;
pub use http::{self, Request, Response};

pub mod handler;
pub mod request;
pub mod response;

pub use crate::{
    handler::QuizHandler,
    request::{LambdaRequest, RequestOrigin},
    response::{IntoResponse, LambdaResponse},
};
