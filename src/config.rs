use thiserror::Error;

/// A custom error describing the error cases for configuration validation.
///
/// These are the only fatal errors in the program: a configuration that does
/// not validate stops the startup, nothing else does.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No repository was given.
    #[error("repository not provided")]
    MissingRepositoryUrl,
    /// The repository is not a GitHub repository URL.
    #[error("repository {0:?} does not match the https://github.com/<owner>/<name> format")]
    MalformedRepositoryUrl(String),
    /// No branch was given.
    #[error("branch not provided")]
    MissingBranch,
    /// No start command was given.
    #[error("start command not provided")]
    MissingStartCommand,
}

/// The validated configuration the reconciler runs on.
///
/// Built once at startup and owned by the reconciler afterwards; nothing in
/// the program reads configuration from anywhere else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The tracked repository in canonical `https://github.com/<owner>/<name>` form.
    pub repository_url: String,
    /// The tracked branch.
    pub branch: String,
    /// The command line that starts the application inside the checkout.
    pub start_command: String,
}

impl Config {
    /// Validate raw configuration values into a canonical configuration.
    pub fn new(
        repository_url: Option<&str>,
        branch: &str,
        start_command: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let repository_url = repository_url.ok_or(ConfigError::MissingRepositoryUrl)?;
        let repository_url = canonical_repository_url(repository_url)?;

        if branch.trim().is_empty() {
            return Err(ConfigError::MissingBranch);
        }

        let start_command = start_command.ok_or(ConfigError::MissingStartCommand)?;
        if start_command.trim().is_empty() {
            return Err(ConfigError::MissingStartCommand);
        }

        Ok(Config {
            repository_url,
            branch: branch.to_string(),
            start_command: start_command.to_string(),
        })
    }
}

/// Normalize a GitHub repository URL to its canonical
/// `https://github.com/<owner>/<name>` form.
///
/// Trailing slashes and path segments after the repository name (e.g.
/// `/tree/main`) are dropped. Normalizing an already canonical URL returns
/// it unchanged.
pub fn canonical_repository_url(url: &str) -> Result<String, ConfigError> {
    let malformed = || ConfigError::MalformedRepositoryUrl(url.to_string());

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(malformed)?;
    let scheme = &url[..url.len() - rest.len()];

    let mut segments = rest.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("github.com"), Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
            Ok(format!("{scheme}github.com/{owner}/{name}"))
        }
        _ => Err(malformed()),
    }
}
