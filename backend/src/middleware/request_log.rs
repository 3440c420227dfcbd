//! Request logging middleware.
//!
//! Logs every inbound request once on arrival and, when the handler failed,
//! the resulting status and error message once on the way out. Client errors
//! log at `warn`, server errors at `error`.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

use crate::domain::TraceId;

/// Middleware logging request lines and handler failures.
///
/// Wrap it inside [`Trace`](crate::Trace) so log lines carry the trace id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_api::{RequestLog, Trace};
///
/// let app = App::new().wrap(RequestLog).wrap(Trace);
/// ```
#[derive(Clone)]
pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestLog`].
pub struct RequestLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().clone();
        let path = req.path().to_owned();
        let fut = self.service.call(req);
        Box::pin(async move {
            // The trace scope wraps polling, not `call`, so read it here.
            let trace_id = TraceId::current().map(|id| id.to_string());
            info!(%method, %path, trace_id = trace_id.as_deref(), "request received");

            let res = fut.await?;
            if let Some(err) = res.response().error() {
                let status = res.status();
                let trace_id = trace_id.as_deref();
                if status.is_server_error() {
                    error!(%method, %path, status = status.as_u16(), error = %err, trace_id, "request failed");
                } else {
                    warn!(%method, %path, status = status.as_u16(), error = %err, trace_id, "request rejected");
                }
            }
            Ok(res)
        })
    }
}
