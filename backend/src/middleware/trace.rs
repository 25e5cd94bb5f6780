//! Request middleware: trace identifier and access log.
//!
//! Each incoming request receives a UUID [`TraceId`] stored in task-local
//! storage for correlation across logs and error responses. When the inner
//! service finishes, exactly one access line is emitted:
//!
//! ```text
//! POST /users → 201 (3.41ms)
//! ```
//!
//! The line is logged whether the inner service produced a response or an
//! error, so failed requests are never silent.

use std::fmt;
use std::future::Future;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::{Method, StatusCode};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Render the human-readable access line.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use actix_web::http::{Method, StatusCode};
/// use roster::middleware::trace::access_line;
///
/// let line = access_line(&Method::GET, "/", StatusCode::OK, Duration::from_micros(1_250));
/// assert_eq!(line.to_string(), "GET / → 200 (1.25ms)");
/// ```
pub fn access_line<'a>(
    method: &'a Method,
    path: &'a str,
    status: StatusCode,
    elapsed: Duration,
) -> AccessLine<'a> {
    AccessLine {
        method,
        path,
        status,
        elapsed,
    }
}

/// Displayable access line returned by [`access_line`].
#[derive(Debug, Clone, Copy)]
pub struct AccessLine<'a> {
    method: &'a Method,
    path: &'a str,
    status: StatusCode,
    elapsed: Duration,
}

impl AccessLine<'_> {
    fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }
}

impl fmt::Display for AccessLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → {} ({:.2}ms)",
            self.method,
            self.path,
            self.status.as_u16(),
            self.elapsed_ms()
        )
    }
}

fn log_access(line: AccessLine<'_>, trace_id: TraceId) {
    info!(
        method = %line.method,
        path = line.path,
        status = line.status.as_u16(),
        elapsed_ms = line.elapsed_ms(),
        trace_id = %trace_id,
        "{line}"
    );
}

/// Middleware attaching a request-scoped trace identifier, adding a
/// `trace-id` header to every response and logging one access line.
///
/// Handlers can read the trace ID via [`TraceId::current`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use roster::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
///
/// Applications should not use this type directly.
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
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
        let trace_id = TraceId::generate();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();
        Box::pin(TraceId::scope(
            trace_id,
            traced_call(self.service.call(req), trace_id, method, path, started),
        ))
    }
}

fn traced_call<F, B>(
    fut: F,
    trace_id: TraceId,
    method: Method,
    path: String,
    started: Instant,
) -> impl Future<Output = Result<ServiceResponse<B>, Error>>
where
    F: Future<Output = Result<ServiceResponse<B>, Error>>,
{
    async move {
        match fut.await {
            Ok(mut res) => {
                insert_trace_header(&mut res, trace_id);
                log_access(
                    access_line(&method, &path, res.status(), started.elapsed()),
                    trace_id,
                );
                Ok(res)
            }
            Err(err) => {
                let status = err.as_response_error().status_code();
                log_access(
                    access_line(&method, &path, status, started.elapsed()),
                    trace_id,
                );
                Err(err)
            }
        }
    }
}

fn insert_trace_header<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.response_mut()
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => {
            error!(
                %error,
                trace_id = %trace_id,
                "failed to encode trace identifier header"
            );
        }
    }
}
