use serde::de::DeserializeOwned;
use snafu::{OptionExt as _, ResultExt as _};
use surrealdb::opt::QueryResult;

use super::*;

/// An extension trait that allows you to execute raw SQL queries. Parameters can be bound using the [Bindings::bind] method which takes any serializable data structure.
///
/// # Example
/// ```no_run
/// # use stats_server::database::{Database, Sql};
/// # async fn run(database: Database) -> Result<(), stats_server::database::DatabaseError> {
/// let apps: Vec<String> = database.sql("SELECT VALUE app FROM hits WHERE uri = $uri")
///     .bind(("uri", "/events"))
///     .fetch_first()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub trait Sql<'a> {
    fn sql(&'a self, query: &str) -> Bindings<'a>;
}

impl<'a> Sql<'a> for Database {
    fn sql(&'a self, query: &str) -> Bindings<'a> {
        Bindings::new(self.database.query(query))
    }
}

#[derive(Debug, new)]
pub struct Bindings<'a> {
    query: surrealdb::method::Query<'a, Any>,
}

impl Bindings<'_> {
    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        let query = self.query;
        self.query = query.bind(params);
        self
    }

    /// Execute the query and return a [surrealdb::Response] which is SurrealDB's way to represent a list of statements returned from the database.
    pub async fn execute(self) -> Result<surrealdb::Response> {
        let response = self.query.await.context(DatabaseQuerySnafu)?;
        tracing::trace!(?response, "executed query");
        Ok(response)
    }

    /// Execute the query and deserialize the result of the first statement.
    pub async fn fetch_first<T: DeserializeOwned>(self) -> Result<T>
    where
        usize: QueryResult<T>,
    {
        self.fetch_at(0).await
    }

    /// Execute the query and deserialize the result of the statement at `index`.
    /// Earlier statements are only run for their side effects, their errors still fail the call.
    pub async fn fetch_at<T: DeserializeOwned>(self, index: usize) -> Result<T>
    where
        usize: QueryResult<T>,
    {
        let mut statements = self.execute().await?;
        for i in 0..index {
            statements
                .take::<surrealdb::sql::Value>(i)
                .context(DatabaseQuerySnafu)?;
        }

        statements.take::<T>(index).context(DatabaseDeserializeSnafu)
    }

    /// Like [Bindings::fetch_at] but the statement must produce exactly one row.
    pub async fn fetch_one_at<T: DeserializeOwned>(self, index: usize) -> Result<T>
    where
        usize: QueryResult<Option<T>>,
    {
        self.fetch_at::<Option<T>>(index)
            .await?
            .context(EmptyQuerySnafu)
    }
}
