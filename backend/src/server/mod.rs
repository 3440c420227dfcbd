//! Server construction and middleware wiring.

mod config;

pub use config::{AppConfig, ConfigError};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::fallback::invalid_route;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::inbound::http::validation::json_config;
use crate::outbound::persistence::ConnectionEvent;
use crate::{RequestLog, Trace};

/// Shared state handed to every worker's application.
#[derive(Clone)]
pub struct AppDependencies {
    pub http_state: web::Data<HttpState>,
    pub health_state: web::Data<HealthState>,
}

/// Assemble the application: state, middleware, routes and the catch-all.
///
/// `RequestLog` is wrapped inside `Trace` so log lines see the request's
/// trace identifier.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        health_state,
    } = deps;

    let app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .app_data(json_config())
        .wrap(RequestLog)
        .wrap(Trace)
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app.default_service(web::to(invalid_route))
}

/// Construct an Actix HTTP server bound to `host:port`.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(deps: AppDependencies, host: &str, port: u16) -> std::io::Result<Server> {
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind((host, port))?
        .run();
    Ok(server)
}

/// Log store connection events and mirror them into readiness until the
/// channel closes.
pub async fn track_connection(
    mut events: broadcast::Receiver<ConnectionEvent>,
    health_state: web::Data<HealthState>,
) {
    loop {
        match events.recv().await {
            Ok(ConnectionEvent::Connected) => {
                info!("connected to user store");
                health_state.mark_ready();
            }
            Ok(ConnectionEvent::Error { message }) => {
                error!(%message, "user store connection error");
                health_state.mark_not_ready();
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "connection event subscriber lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn track_connection_mirrors_events_into_readiness() {
        let (tx, rx) = broadcast::channel(4);
        let health = web::Data::new(HealthState::new());

        tx.send(ConnectionEvent::Connected).expect("receiver alive");
        tx.send(ConnectionEvent::Error {
            message: "server closed the connection".to_owned(),
        })
        .expect("receiver alive");
        drop(tx);
        track_connection(rx, health.clone()).await;
        assert!(!health.is_ready());
    }

    #[rstest]
    #[tokio::test]
    async fn track_connection_marks_ready_on_connect() {
        let (tx, rx) = broadcast::channel(4);
        let health = web::Data::new(HealthState::new());

        tx.send(ConnectionEvent::Connected).expect("receiver alive");
        drop(tx);
        track_connection(rx, health.clone()).await;
        assert!(health.is_ready());
    }
}
