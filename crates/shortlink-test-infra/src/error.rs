use testcontainers::TestcontainersError;
use thiserror::Error;

/// Failures while bringing up or addressing a test container.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to start {image} container")]
    Start {
        image: String,
        #[source]
        source: TestcontainersError,
    },
    #[error("failed to resolve the mapped address of {image} container")]
    Address {
        image: String,
        #[source]
        source: TestcontainersError,
    },
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
