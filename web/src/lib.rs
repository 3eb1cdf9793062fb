//! Petstore Web - server-rendered front end for a pet-store REST API
//!
//! Every page is backed by the upstream API through
//! [`petstore_core::PetGateway`]; this crate keeps no data of its own.
//!
//! # Pages
//!
//! - `GET /` - pets filtered by `status`, sortable by `sort` and `dir`
//! - `GET /pets/create`, `POST /pets` - add a pet
//! - `GET /pets/{id}` - details and photo upload form
//! - `GET /pets/{id}/edit`, `PUT|POST /pets/{id}` - edit a pet
//! - `DELETE /pets/{id}`, `POST /pets/{id}/delete` - delete a pet
//! - `POST /pets/{id}/photo` - upload a photo (multipart)
//! - `GET /health` - health check
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use petstore_web::WebConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WebConfig::load()?;
//!     petstore_web::start_server(config).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;
pub mod views;

pub use config::WebConfig;
pub use error::{WebError, WebResult};
pub use server::{build_router, start_server};
pub use state::AppState;
