//! End-to-end test support for the Satwa storefront.
//!
//! [`TestServer`] runs the real axum app on an ephemeral `127.0.0.1` port so
//! tests can drive it with `reqwest` and the production checkout client.
//!
//! ```rust,ignore
//! let server = TestServer::start().await?;
//! let products: Vec<Product> = reqwest::get(server.url("/api/products")).await?.json().await?;
//! ```

use std::net::SocketAddr;

use axum::Router;
use satwa_core::{Product, ProductId};
use satwa_storefront::catalog::Catalog;
use satwa_storefront::config::StorefrontConfig;
use satwa_storefront::routes;
use satwa_storefront::state::AppState;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Boxed error for test helpers.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A router served on `127.0.0.1:0`. Aborted on drop.
pub struct TestServer {
    addr: SocketAddr,
    state: Option<AppState>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// The storefront API with default configuration and the seed catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the catalog fails to load or the port cannot be bound.
    pub async fn start() -> TestResult<Self> {
        let config = StorefrontConfig::from_lookup(|_| None)?;
        let state = AppState::new(config, Catalog::seed()?);
        let mut server = Self::serve(routes::router(state.clone())).await?;
        server.state = Some(state);
        Ok(server)
    }

    /// Serve an arbitrary router, e.g. a misbehaving Order Service.
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound.
    pub async fn serve(router: Router) -> TestResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(Self {
            addr,
            state: None,
            task,
        })
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Absolute URL for `path` (which starts with `/`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Order Service base URL (`http://addr/api/`).
    ///
    /// # Errors
    ///
    /// Never fails for a socket address; typed for `?` at call sites.
    pub fn api_base(&self) -> TestResult<Url> {
        Ok(Url::parse(&self.url("/api/"))?)
    }

    /// Shared state of a server started with [`TestServer::start`].
    #[must_use]
    pub const fn state(&self) -> Option<&AppState> {
        self.state.as_ref()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A seed catalog product.
///
/// # Errors
///
/// Returns error if the id is not in the seed catalog.
pub fn seed_product(id: i32) -> TestResult<Product> {
    Catalog::seed()?
        .product(ProductId::new(id))
        .cloned()
        .ok_or_else(|| format!("no seed product {id}").into())
}

/// An address nothing is listening on.
///
/// # Errors
///
/// Returns error if a probe port cannot be bound.
pub async fn closed_port() -> TestResult<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}
