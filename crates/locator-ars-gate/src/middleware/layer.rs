//! Require-action middleware layer.

use crate::gate::Gate;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use locator_ars_common_log::{DefaultLogger, Logger};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Layer that checks one action before every request reaches the route.
pub struct RequireActionLayer<L: Logger = DefaultLogger> {
    gate: Gate<L>,
    action: Arc<str>,
}

impl<L: Logger> RequireActionLayer<L> {
    pub fn new(gate: Gate<L>, action: impl Into<String>) -> Self {
        Self {
            gate,
            action: Arc::from(action.into()),
        }
    }

    /// Action this layer requires.
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl<L: Logger> Clone for RequireActionLayer<L> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            action: self.action.clone(),
        }
    }
}

impl<S, L: Logger> Layer<S> for RequireActionLayer<L> {
    type Service = RequireActionMiddleware<S, L>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireActionMiddleware {
            inner,
            gate: self.gate.clone(),
            action: self.action.clone(),
        }
    }
}

pub struct RequireActionMiddleware<S, L: Logger = DefaultLogger> {
    inner: S,
    gate: Gate<L>,
    action: Arc<str>,
}

impl<S: Clone, L: Logger> Clone for RequireActionMiddleware<S, L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            gate: self.gate.clone(),
            action: self.action.clone(),
        }
    }
}

impl<S, L> Service<Request<Body>> for RequireActionMiddleware<S, L>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    L: Logger + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let action = self.action.clone();
        // The clone may not be ready; keep the one poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match gate.enforce(&action, req.headers()).await {
                Ok(_) => inner.call(req).await,
                Err(rejection) => Ok(rejection.into_response()),
            }
        })
    }
}
