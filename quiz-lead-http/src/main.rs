use lamedh_runtime::{handler_fn, run, Context, Error};
use quiz_lead::{Config, SesSender};
use quiz_lead_http::{LambdaRequest, LambdaResponse, QuizHandler};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = Config::load()?;
    info!(from = %config.from_email, admin = %config.admin_email, region = %config.region, "starting submit-quiz");

    // one SES client for the lifetime of the process
    let sender = SesSender::from_config(&config).await;
    let handler = Arc::new(QuizHandler::new(&config, Arc::new(sender)));

    run(handler_fn(move |event: LambdaRequest, context: Context| {
        let handler = Arc::clone(&handler);
        async move {
            let origin = event.request_origin();
            let response = handler
                .handle(event.into())
                .instrument(info_span!("invocation", request_id = %context.request_id))
                .await;
            Ok::<_, Error>(LambdaResponse::from_response(&origin, response))
        }
    }))
    .await
}
