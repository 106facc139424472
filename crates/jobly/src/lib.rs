//! # jobly
//!
//! Job listing data access for PostgreSQL.
//!
//! ## Features
//!
//! - **Parameter-safe dynamic SQL**: optional search criteria and sparse patches
//!   become `$1, $2, ...` placeholders with a parallel value list, never inline values
//! - **Explicit ordering**: patches are ordered field lists, so placeholder
//!   numbering is deterministic
//! - **Typed not-found**: missing rows surface as [`StoreError::NotFound`], separate
//!   from driver errors, which pass through untouched
//! - **Transaction-friendly**: pass a transaction anywhere a [`GenericClient`] is expected
//! - **SQL logging**: wrap any client in [`TracingClient`] to log statements via `tracing`
//!
//! ## Example
//!
//! ```ignore
//! use jobly::{DbConfig, JobFilter, JobRepository, JobUpdate, NewJob};
//!
//! let pool = jobly::create_pool_from_config(&DbConfig::from_env()?)?;
//! let client = jobly::TracingClient::new(pool.get().await?);
//!
//! let job = JobRepository::create(&client, &NewJob::new("Dev", "acme").salary(100000)).await?;
//!
//! let listings = JobRepository::find_all(
//!     &client,
//!     &JobFilter::new().min_salary(90000).has_equity(true),
//! )
//! .await?;
//!
//! JobRepository::update(&client, job.id, &JobUpdate::new().title("Senior Dev")).await?;
//! let detail = JobRepository::get(&client, job.id).await?;
//! JobRepository::remove(&client, job.id).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod monitor;
pub mod patch;
pub mod repository;
pub mod row;
pub mod value;

pub use client::GenericClient;
pub use config::DbConfig;
pub use error::{StoreError, StoreResult};
pub use filter::{JobFilter, WhereBuilder, WhereClause, build_where};
pub use model::{Company, Job, JobDetail, JobListing, JobUpdate, NewJob};
pub use monitor::{QueryType, TracingClient};
pub use patch::{Patch, SetClause, TranslationTable, sql_for_partial_update};
pub use repository::JobRepository;
pub use row::{FromRow, RowExt};
pub use value::SqlValue;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_config, create_pool_with_config};
