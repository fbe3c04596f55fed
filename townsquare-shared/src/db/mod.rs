/// Database layer for Townsquare
///
/// This module provides the SQLite connection pool and migration runner.
/// Models live in the `models` module at crate root level.
///
/// # Example
///
/// ```no_run
/// use townsquare_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite:townsquare.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
