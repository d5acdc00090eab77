//! Isolated delivery of the two lead notifications

use crate::{error::DispatchError, render::RenderedEmail};
use std::{fmt, future::Future, pin::Pin, sync::Arc, time::Duration};
use tracing::{error, info};

/// The future returned by [`EmailSender::send`]
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>>;

/// A transactional email capability.
///
/// One instance is created at process start and shared by every invocation.
pub trait EmailSender: Send + Sync {
    /// Send `email`, resolving once the service has accepted or refused it
    fn send<'a>(&'a self, email: &'a OutboundEmail) -> SendFuture<'a>;
}

/// A rendered, addressed message
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    /// Sender address
    pub from: String,
    /// Recipient addresses
    pub to: Vec<String>,
    /// Subject line
    pub subject: String,
    /// HTML body, if any
    pub html: Option<String>,
    /// Plain-text body
    pub text: String,
}

impl RenderedEmail {
    /// Address this message from `from` to a single recipient
    pub fn addressed(self, from: impl Into<String>, to: impl Into<String>) -> OutboundEmail {
        OutboundEmail {
            from: from.into(),
            to: vec![to.into()],
            subject: self.subject,
            html: self.html,
            text: self.text,
        }
    }
}

/// Who a notification is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The quiz submitter
    User,
    /// The site administrator
    Admin,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::User => f.write_str("user confirmation"),
            Audience::Admin => f.write_str("admin notification"),
        }
    }
}

/// Outcome of one dispatch, after any failure has been logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The email service accepted the message
    Sent,
    /// The send failed or timed out
    Failed,
}

/// Sends notifications through an [`EmailSender`], bounding each send by a
/// timeout and absorbing failures.
#[derive(Clone)]
pub struct Dispatcher {
    sender: Arc<dyn EmailSender>,
    timeout: Duration,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").field("timeout", &self.timeout).finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher over `sender`
    pub fn new(sender: Arc<dyn EmailSender>, timeout: Duration) -> Self {
        Dispatcher { sender, timeout }
    }

    /// Send one notification. Never fails: errors are logged and reported
    /// as [`Delivery::Failed`].
    pub async fn dispatch(&self, audience: Audience, email: &OutboundEmail) -> Delivery {
        let result = match tokio::time::timeout(self.timeout, self.sender.send(email)).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout(self.timeout)),
        };
        match result {
            Ok(()) => {
                info!(%audience, recipients = ?email.to, "email sent");
                Delivery::Sent
            }
            Err(err) => {
                error!(%audience, recipients = ?email.to, error = %err, "failed to send email");
                Delivery::Failed
            }
        }
    }

    /// Send the user confirmation and the admin alert concurrently and wait
    /// for both. Neither outcome affects the other.
    pub async fn dispatch_pair(&self, user: &OutboundEmail, admin: &OutboundEmail) -> (Delivery, Delivery) {
        tokio::join!(
            self.dispatch(Audience::User, user),
            self.dispatch(Audience::Admin, admin)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FlakySender {
        attempts: Mutex<Vec<String>>,
        failing: Option<&'static str>,
        hanging: Option<&'static str>,
    }

    impl EmailSender for FlakySender {
        fn send<'a>(&'a self, email: &'a OutboundEmail) -> SendFuture<'a> {
            Box::pin(async move {
                let to = email.to.join(",");
                self.attempts.lock().unwrap().push(to.clone());
                if self.hanging == Some(to.as_str()) {
                    std::future::pending::<()>().await;
                }
                if self.failing == Some(to.as_str()) {
                    return Err(DispatchError::Rejected("MessageRejected".into()));
                }
                Ok(())
            })
        }
    }

    fn email(to: &str) -> OutboundEmail {
        RenderedEmail {
            subject: "subject".into(),
            html: None,
            text: "body".into(),
        }
        .addressed("noreply@yourdomain.com", to)
    }

    #[test]
    fn addressed_keeps_rendered_parts() {
        let email = RenderedEmail {
            subject: "Hello".into(),
            html: Some("<p>hi</p>".into()),
            text: "hi".into(),
        }
        .addressed("from@x.com", "to@x.com");
        assert_eq!(email.from, "from@x.com");
        assert_eq!(email.to, vec!["to@x.com".to_string()]);
        assert_eq!(email.subject, "Hello");
        assert_eq!(email.html.as_deref(), Some("<p>hi</p>"));
        assert_eq!(email.text, "hi");
    }

    #[tokio::test]
    async fn admin_failure_does_not_block_user() {
        let sender = Arc::new(FlakySender {
            failing: Some("admin@x.com"),
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(sender.clone(), Duration::from_secs(5));

        let outcome = dispatcher
            .dispatch_pair(&email("user@x.com"), &email("admin@x.com"))
            .await;

        assert_eq!(outcome, (Delivery::Sent, Delivery::Failed));
        let mut attempts = sender.attempts.lock().unwrap().clone();
        attempts.sort();
        assert_eq!(attempts, vec!["admin@x.com", "user@x.com"]);
    }

    #[tokio::test]
    async fn user_failure_does_not_block_admin() {
        let sender = Arc::new(FlakySender {
            failing: Some("user@x.com"),
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(sender.clone(), Duration::from_secs(5));

        let outcome = dispatcher
            .dispatch_pair(&email("user@x.com"), &email("admin@x.com"))
            .await;

        assert_eq!(outcome, (Delivery::Failed, Delivery::Sent));
        assert_eq!(sender.attempts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn timeout_counts_as_failed_delivery() {
        let sender = Arc::new(FlakySender {
            hanging: Some("admin@x.com"),
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(sender, Duration::from_millis(50));

        let outcome = dispatcher
            .dispatch_pair(&email("user@x.com"), &email("admin@x.com"))
            .await;

        assert_eq!(outcome, (Delivery::Sent, Delivery::Failed));
    }
}
