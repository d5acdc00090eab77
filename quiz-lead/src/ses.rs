//! Amazon SES backed [`EmailSender`]

use crate::{
    config::Config,
    dispatch::{EmailSender, OutboundEmail, SendFuture},
    error::DispatchError,
};
use aws_config::BehaviorVersion;
use aws_sdk_sesv2::{
    config::Region,
    error::DisplayErrorContext,
    types::{Body, Content, Destination, EmailContent, Message},
    Client,
};
use tracing::debug;

const CHARSET: &str = "UTF-8";

/// Sends email through the SES v2 `SendEmail` API
#[derive(Debug, Clone)]
pub struct SesSender {
    client: Client,
}

impl SesSender {
    /// Wrap an existing SES client
    pub fn new(client: Client) -> Self {
        SesSender { client }
    }

    /// Build a client for the configured region using the default
    /// credential provider chain
    pub async fn from_config(config: &Config) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        debug!(region = %config.region, "created SES client");
        SesSender::new(Client::new(&shared))
    }
}

fn content(data: &str) -> Result<Content, DispatchError> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|err| DispatchError::Build(err.to_string()))
}

fn message(email: &OutboundEmail) -> Result<Message, DispatchError> {
    let mut body = Body::builder().text(content(&email.text)?);
    if let Some(html) = &email.html {
        body = body.html(content(html)?);
    }
    Ok(Message::builder()
        .subject(content(&email.subject)?)
        .body(body.build())
        .build())
}

impl EmailSender for SesSender {
    fn send<'a>(&'a self, email: &'a OutboundEmail) -> SendFuture<'a> {
        Box::pin(async move {
            let destination = Destination::builder()
                .set_to_addresses(Some(email.to.clone()))
                .build();
            let output = self
                .client
                .send_email()
                .from_email_address(&email.from)
                .destination(destination)
                .content(EmailContent::builder().simple(message(email)?).build())
                .send()
                .await
                .map_err(|err| DispatchError::Rejected(DisplayErrorContext(&err).to_string()))?;
            debug!(message_id = ?output.message_id(), "SES accepted message");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_text_only_and_multipart_messages() {
        let mut email = OutboundEmail {
            from: "noreply@yourdomain.com".into(),
            to: vec!["sam@x.com".into()],
            subject: "Hello".into(),
            html: None,
            text: "plain".into(),
        };

        assert!(message(&email).is_ok());

        email.html = Some("<p>plain</p>".into());
        assert!(message(&email).is_ok());
    }
}
