use crate::cli::Environment;
use tracing_subscriber::EnvFilter;

impl Environment {
    /// Log level used when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> &'static str {
        match self {
            Environment::Local | Environment::Dev => "debug",
            Environment::Prod => "info",
        }
    }
}

/// Installs the global subscriber: human-readable text for `local`,
/// JSON lines for `dev` and `prod`. Logs go to stderr so command output on
/// stdout stays machine-readable.
pub fn init(environment: Environment) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.default_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match environment {
        Environment::Local => builder.try_init(),
        Environment::Dev | Environment::Prod => builder.json().try_init(),
    };

    installed.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}
