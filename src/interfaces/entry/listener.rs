use std::net::TcpListener;

use actix_web::{dev::Server, HttpServer};
use async_trait::async_trait;

use super::{site_app, EntryPoint};
use crate::{errors::StartupError, graceful_shutdown::shutdown_signal, startup::Application};

/// Long-running HTTP server on a bound socket.
pub struct ListenerEntry {
    listener: TcpListener,
}

impl ListenerEntry {
    pub fn new(listener: TcpListener) -> Self {
        ListenerEntry { listener }
    }

    pub fn bind(address: &str) -> Result<Self, StartupError> {
        let listener = TcpListener::bind(address)?;
        Ok(ListenerEntry { listener })
    }

    pub fn port(&self) -> Result<u16, StartupError> {
        Ok(self.listener.local_addr()?.port())
    }
}

/// Builds the actix server without running it.
pub fn serve(listener: TcpListener, app: &Application) -> Result<Server, StartupError> {
    let state = app.state.clone();
    let workers = app.config().server.worker_count();

    let server = HttpServer::new(move || site_app(state.clone()))
    .workers(workers)
    .listen(listener)?
    .run();

    Ok(server)
}

#[async_trait(?Send)]
impl EntryPoint for ListenerEntry {
    async fn run(self, app: Application) -> Result<(), StartupError> {
        let address = self.listener.local_addr()?;
        let server = serve(self.listener, &app)?;
        let handle = server.handle();

        tracing::info!(
            "🚀 Starting portfolio site v{} on http://{}",
            env!("CARGO_PKG_VERSION"),
            address
        );

        tokio::select! {
            res = server => res?,
            _ = shutdown_signal() => {
                handle.stop(true).await;
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}
