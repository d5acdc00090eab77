#![deny(missing_docs)]

//! Lead capture for the IELTS study-plan quiz.
//!
//! A quiz submission flows through a short pipeline:
//!
//! 1. [`QuizSubmission`] is parsed and checked for its required fields,
//! 2. a [`LeadRecord`] is stamped with the capture instant,
//! 3. [`NormalizedContent`] translates answer codes into display labels,
//! 4. a [`Renderer`] produces the user confirmation and the admin alert,
//! 5. a [`Dispatcher`] sends both through an injected [`EmailSender`].
//!
//! Each delivery is isolated: a failed send is logged where it happens and
//! never affects the other message or the caller's response.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod lead;
pub mod normalize;
pub mod render;
pub mod ses;

pub use crate::{
    config::Config,
    dispatch::{Audience, Delivery, Dispatcher, EmailSender, OutboundEmail, SendFuture},
    error::{ConfigError, DispatchError, SubmissionError},
    lead::{Answers, LeadId, LeadRecord, QuizSubmission, ValidSubmission},
    normalize::NormalizedContent,
    render::{Notifications, RenderedEmail, Renderer},
    ses::SesSender,
};
