//! HTTP Middleware
//!
//! 请求日志中间件：记录耗时，4xx/5xx 记入错误日志

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 委托引擎的端点会阻塞到引擎返回为止，超过该耗时的请求单独记一条
const SLOW_REQUEST_MS: u128 = 10_000;

/// 请求日志中间件
///
/// 业务错误统一走 errno（HTTP 始终 200），在 ApiError::into_response()
/// 中记录；这里只管传输层面的 4xx/5xx 和请求耗时。
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    } else if elapsed_ms >= SLOW_REQUEST_MS {
        tracing::info!(
            method = %method,
            uri = %uri,
            elapsed_ms,
            "Slow request"
        );
    }

    response
}
