//! Products Domain
//!
//! Catalog of named products with a quantity and a price, stored in PostgreSQL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, Admin guard on writes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Conversions │  ← ProductRequest → Product → ProductView
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Business rules (trait + PostgreSQL / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← Sea-ORM `products` table
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, PgProductRepository};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/catalog").await?;
//! let router = handlers::router(PgProductRepository::new(db));
//! # Ok(())
//! # }
//! ```

pub mod conversions;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod postgres;
pub mod repository;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use logging::{ErrorLogger, TracingErrorLogger};
pub use models::{Product, ProductPredicate, ProductRequest, ProductView, ResponseEnvelope};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
