use crate::{Result, TestInfraError};
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use typed_builder::TypedBuilder;

const IMAGE: &str = "postgres";
const READY_MESSAGE: &str = "database system is ready to accept connections";
const PORT: u16 = 5432;

/// Credentials and image tag of the throwaway server. One value is used
/// as database, user and password.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PostgresConfig {
    #[builder(default = "16-alpine".to_string())]
    tag: String,
    #[builder(default = "shortlink".to_string())]
    name: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A PostgreSQL server living as long as this value.
pub struct PostgresServer {
    container: ContainerAsync<GenericImage>,
    name: String,
}

impl PostgresServer {
    pub async fn start(config: PostgresConfig) -> Result<Self> {
        // The entrypoint reports readiness twice: the init server on stderr,
        // then the real server on stdout.
        let container = GenericImage::new(IMAGE, config.tag.as_str())
            .with_exposed_port(PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr(READY_MESSAGE))
            .with_wait_for(WaitFor::message_on_stdout(READY_MESSAGE))
            .with_env_var("POSTGRES_DB", config.name.as_str())
            .with_env_var("POSTGRES_USER", config.name.as_str())
            .with_env_var("POSTGRES_PASSWORD", config.name.as_str())
            .start()
            .await
            .map_err(|source| TestInfraError::Start {
                image: format!("{IMAGE}:{}", config.tag),
                source,
            })?;

        Ok(Self {
            container,
            name: config.name,
        })
    }

    /// Connection string reachable from the test process.
    pub async fn url(&self) -> Result<String> {
        let address = |source| TestInfraError::Address {
            image: IMAGE.to_string(),
            source,
        };
        let host = self.container.get_host().await.map_err(address)?;
        let port = self
            .container
            .get_host_port_ipv4(PORT)
            .await
            .map_err(address)?;

        let name = &self.name;
        Ok(format!("postgres://{name}:{name}@{host}:{port}/{name}"))
    }
}
