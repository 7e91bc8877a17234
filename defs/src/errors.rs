use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeploymentError {
    #[error("Deployment {0} was not found")]
    NotFound(String),

    #[error("Credentials payload failed schema validation: {0}")]
    InvalidCredentials(String),

    #[error("Deployment has no credentials recorded for provider {0}")]
    NoCredentialsForProvider(String),

    #[error("No credential type is registered for provider {0}")]
    UnknownCredentialType(String),

    #[error("Other error occurred: {0}")]
    Other(#[from] anyhow::Error),
}
