use derive_new::new;
use serde::Deserialize;
use snafu::{Location, ResultExt as _, Snafu};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use url::Url;

use crate::Located;

/// Helper trait for executing arbitrary SurrealQL queries.
pub mod query;

/// Append-only storage of endpoint hits.
pub mod hits;

pub use hits::{HitStore, HitStoreError};
pub use query::{Bindings, Sql};

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

const SETUP: &str = include_str!("../../schema.surrealql");

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DatabaseError {
    #[snafu(display("cannot connect to the database `{url}` at {location}: {source}"))]
    DatabaseConnection {
        url: Url,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to sign in as `{username}` at {location}: {source}"))]
    SignIn {
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to apply the database schema at {location}: {source}"))]
    Setup {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to query the database at {location}: {source}"))]
    DatabaseQuery {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to deserialize the database response at {location}: {source}"))]
    DatabaseDeserialize {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to parse the database response at {location}: response is empty"))]
    EmptyQuery {
        #[snafu(implicit)]
        location: Location,
    },
}

impl Located for DatabaseError {
    fn location(&self) -> Location {
        match self {
            DatabaseError::DatabaseConnection { location, .. }
            | DatabaseError::SignIn { location, .. }
            | DatabaseError::Setup { location, .. }
            | DatabaseError::DatabaseQuery { location, .. }
            | DatabaseError::DatabaseDeserialize { location, .. }
            | DatabaseError::EmptyQuery { location, .. } => *location,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "surreal_url", default = "default_url")]
    pub url: Url,
    #[serde(rename = "surreal_ns", default = "default_name")]
    pub namespace: String,
    #[serde(rename = "surreal_db", default = "default_name")]
    pub database: String,
    #[serde(flatten)]
    pub credentials: Option<DatabaseCredentials>,
}

impl DatabaseConfig {
    /// An isolated in-process database, mostly useful for tests.
    pub fn memory() -> Self {
        Self {
            url: default_url(),
            namespace: default_name(),
            database: default_name(),
            credentials: None,
        }
    }
}

fn default_url() -> Url {
    Url::parse("mem://").expect("`mem://` is a valid url")
}

fn default_name() -> String {
    "stats".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseCredentials {
    #[serde(rename = "surreal_user")]
    pub username: String,
    #[serde(rename = "surreal_pass")]
    pub password: String,
}

impl DatabaseCredentials {
    fn auth(&self) -> auth::Root<'_> {
        auth::Root {
            username: &self.username,
            password: &self.password,
        }
    }
}

/// Represents a database wrapper.
///
/// Cloning is cheap, every clone talks to the same connection.
#[derive(Debug, Clone, new)]
pub struct Database {
    database: Surreal<Any>,
}

impl Database {
    /// Connect to the database described by `config`, sign in when credentials are given,
    /// then make sure the schema exists.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), stats_server::database::DatabaseError> {
    /// use stats_server::database::{Database, DatabaseConfig};
    ///
    /// let db = Database::connect(&DatabaseConfig::memory()).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip_all, fields(url = %config.url))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let database = surrealdb::engine::any::connect(config.url.as_str())
            .await
            .context(DatabaseConnectionSnafu {
                url: config.url.clone(),
            })?;

        if let Some(credentials) = &config.credentials {
            database
                .signin(credentials.auth())
                .await
                .context(SignInSnafu {
                    username: credentials.username.clone(),
                })?;
        }

        database
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .context(DatabaseConnectionSnafu {
                url: config.url.clone(),
            })?;

        database
            .query(SETUP)
            .await
            .and_then(|response| response.check())
            .context(SetupSnafu)?;

        tracing::info!(
            namespace = %config.namespace,
            database = %config.database,
            "connected to the database"
        );

        Ok(Database::new(database))
    }
}

impl std::ops::Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}
