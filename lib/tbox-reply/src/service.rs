//! Tower integration.
//!
//! [`HandlerService`] lets a tower-based transport deliver completions to a
//! response handler like to any other service. Handling is synchronous, so
//! the returned future is always ready.
//!
//! # Example
//!
//! ```ignore
//! use tbox_reply::{HandlerLayer, ReportHandler, TracingSink};
//! use tower::ServiceExt;
//!
//! let service = HandlerLayer::new().layer(ReportHandler::new(TracingSink::new()));
//! service.oneshot(outcome).await?;
//! ```

use std::convert::Infallible;
use std::future::{Ready, ready};
use std::task::{Context, Poll};

use bytes::Bytes;
use tbox_reply_core::TransportOutcome;
use tbox_reply_core::wire::ObjectsList;
use tower::{Layer, Service};

use crate::ResponseHandler;

/// Layer that turns a response handler into a [`HandlerService`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerLayer {
    _private: (),
}

impl HandlerLayer {
    /// Create a new handler layer.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl<H> Layer<H> for HandlerLayer {
    type Service = HandlerService<H>;

    fn layer(&self, handler: H) -> Self::Service {
        HandlerService::new(handler)
    }
}

/// Service delivering transport outcomes to a response handler.
#[derive(Debug, Clone)]
pub struct HandlerService<H> {
    handler: H,
}

impl<H> HandlerService<H> {
    /// Create a new service wrapping the given handler.
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Get a reference to the inner handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Consume the service and return the inner handler.
    #[must_use]
    pub fn into_inner(self) -> H {
        self.handler
    }
}

impl<H: ResponseHandler> Service<TransportOutcome<Bytes>> for HandlerService<H> {
    type Response = ();
    type Error = Infallible;
    type Future = Ready<Result<(), Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, outcome: TransportOutcome<Bytes>) -> Self::Future {
        self.handler.handle_bytes(outcome);
        ready(Ok(()))
    }
}

impl<H: ResponseHandler> Service<TransportOutcome<ObjectsList>> for HandlerService<H> {
    type Response = ();
    type Error = Infallible;
    type Future = Ready<Result<(), Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, outcome: TransportOutcome<ObjectsList>) -> Self::Future {
        self.handler.handle(outcome);
        ready(Ok(()))
    }
}
