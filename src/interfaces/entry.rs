//! Ways into the application. The listener serves the actix app over a socket;
//! the other adapters convert their native request into a
//! [`SiteRequest`](crate::dispatcher::SiteRequest) and call the same app in process.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::NormalizePath,
    web, App, Error,
};
use async_trait::async_trait;
use tracing_actix_web::TracingLogger;

use crate::{
    errors::StartupError,
    middlewares::{auth::AuthMiddleware, security::SecurityMiddleware},
    routes::configure_routes,
    startup::Application,
    AppState,
};

pub mod environ;
pub mod invocation;
pub mod listener;
pub mod service;

pub use environ::call_environ;
pub use invocation::{call_event, InvocationContext, InvocationEntry};
pub use listener::ListenerEntry;
pub use service::SiteService;

#[async_trait(?Send)]
pub trait EntryPoint {
    async fn run(self, app: Application) -> Result<(), StartupError>;
}

/// Routes and middleware shared by every entry point.
pub fn site_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .configure(configure_routes)
        .wrap(AuthMiddleware)
        .wrap(SecurityMiddleware)
        .wrap(NormalizePath::trim())
        .wrap(TracingLogger::default())
}
