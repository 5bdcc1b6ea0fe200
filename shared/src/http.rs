use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder;
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn run_http_service<S, E>(host: &str, port: u16, service: S) -> Result<(), E>
where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: From<std::io::Error> + std::error::Error + Send + Sync + 'static,
{
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    tracing::info!(host, port, "listening");
    let service_arc = Arc::new(service);

    loop {
        let (stream, _peer_addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = service_arc.clone();

        // Hand the connection to hyper; auto-detect h1/h2 on this socket
        tokio::spawn(async move {
            let _ = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await;
        });
    }
}

/// Build a structured `{"status": "error", "msg": ...}` response.
///
/// Callers that have no message to attach get the status code's canonical
/// reason as the message instead.
pub fn make_error_response<E>(
    status_code: StatusCode,
    msg: Option<&str>,
) -> Response<BoxBody<Bytes, E>> {
    let msg = msg
        .or(status_code.canonical_reason())
        .unwrap_or("an error occurred");
    let body = serde_json::json!({
        "status": "error",
        "msg": msg,
    });

    // Serializing a two-key object of strings cannot fail
    let bytes = serde_json::to_vec(&body).unwrap_or_default();

    let mut response = Response::new(
        Full::new(Bytes::from(bytes))
            .map_err(|e| match e {})
            .boxed(),
    );
    *response.status_mut() = status_code;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

/// Build a 200 response with a JSON body.
pub fn make_json_response<E>(body: &serde_json::Value) -> Response<BoxBody<Bytes, E>> {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    let mut response = Response::new(
        Full::new(Bytes::from(bytes))
            .map_err(|e| match e {})
            .boxed(),
    );
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    async fn body_json(
        response: Response<BoxBody<Bytes, Infallible>>,
    ) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_with_message() {
        let response: Response<BoxBody<Bytes, Infallible>> =
            make_error_response(StatusCode::NOT_FOUND, Some("/nope not found"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["msg"], "/nope not found");
    }

    #[tokio::test]
    async fn test_error_response_falls_back_to_canonical_reason() {
        let response: Response<BoxBody<Bytes, Infallible>> =
            make_error_response(StatusCode::INTERNAL_SERVER_ERROR, None);
        let body = body_json(response).await;
        assert_eq!(body["msg"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_json_response() {
        let response: Response<BoxBody<Bytes, Infallible>> =
            make_json_response(&serde_json::json!({"status": "ok"}));
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }
}
