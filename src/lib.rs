//! # LessonStore - Cached Assessment and Outcome Queries
//!
//! Read-heavy lesson data (assessments, learning outcomes, teacher usage
//! reports) served from MySQL through a lazily refreshed shared cache,
//! built on Clean Architecture principles.
//!
//! ## Architecture Layers
//!
//! - **SQL**: Parameterized fragment templates and batch inserts
//! - **Domain**: Core entities, value objects and domain errors
//! - **Application**: Use cases, ports, query conditions and the lazy-refresh cache
//! - **Infrastructure**: MySQL repositories, Redis and in-process cache adapters
//! - **API**: HTTP handlers and middleware
//!
//! ## Key Features
//!
//! - Query conditions that render to parameterized SQL, never interpolated values
//! - Stale-while-revalidate caching with a distributed lock per request
//! - Bounded background refresh pool with graceful shutdown
//!
//! ## Example Usage
//!
//! ```no_run
//! use lesson_store::{application::builder::ApplicationBuilder, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let (state, refresh_pool) = ApplicationBuilder::new(config)
//!     .with_database()
//!     .await?
//!     .with_cache()?
//!     .with_infrastructure()?
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod sql;

pub use api::errors as api_errors;
pub use application::{cache, conditions, dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
