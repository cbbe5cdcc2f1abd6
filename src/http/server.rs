//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the dispatch handler
//! - Wire up middleware (CORS headers, request ID, tracing, timeout, body limit)
//! - Bind server to listener
//! - Dispatch requests to the flag endpoints

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header::InvalidHeaderName, HeaderName, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::flags::FlagStore;
use crate::http::error::AppError;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::cors_layers;
use crate::observability::metrics;
use crate::routing::{Endpoint, Router as FlagRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FlagStore>,
    pub router: Arc<FlagRouter>,
    pub client_ip_header: HeaderName,
    pub max_body_size: usize,
}

/// HTTP server for the flag service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the given store.
    pub fn new(config: ServiceConfig, store: Arc<dyn FlagStore>) -> Result<Self, InvalidHeaderName> {
        let state = AppState {
            store,
            router: Arc::new(FlagRouter::flag_routes()),
            client_ip_header: HeaderName::from_bytes(config.client_ip.header.as_bytes())?,
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The request timeout, when enabled, wraps the routes directly so that
    /// the body limit and CORS layers still see its 408.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let [allow_origin, allow_methods, allow_headers] = cors_layers();

        let middleware = ServiceBuilder::new()
            .layer(allow_origin)
            .layer(allow_methods)
            .layer(allow_headers)
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id(req.headers()),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size));

        let mut router = Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state);

        if let Some(timeout) = config.timeouts.request_timeout() {
            router = router.layer(TimeoutLayer::new(timeout));
        }

        router.layer(middleware)
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main handler. Matches the endpoint and runs it.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let endpoint = state.router.match_request(&request);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        endpoint = %endpoint,
        "Dispatching request"
    );

    let result = match endpoint {
        Endpoint::Preflight => Ok(handlers::preflight()),
        Endpoint::CountFlags => handlers::count_flags(&state).await,
        Endpoint::ListFlags => handlers::list_flags(&state, request.uri()).await,
        Endpoint::SubmitFlag => handlers::submit_flag(&state, request).await,
        Endpoint::MethodNotAllowed => Err(AppError::MethodNotAllowed),
    };

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            if let AppError::Store(ref e) = err {
                tracing::error!(request_id = %request_id, endpoint = %endpoint, error = %e, "Request failed");
            }
            err.into_response()
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        endpoint.name(),
        start_time,
    );
    response
}
