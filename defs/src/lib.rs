mod credential;
mod deployment;
mod errors;
mod resource;
mod store;

pub use credential::{Credential, CredentialGroup, Credentials};
pub use deployment::{DeployStatus, DeploymentData, DeploymentFilter, DeploymentUpdate};
pub use errors::DeploymentError;
pub use resource::{ResourceCreate, ResourceData, ResourceFilter};
pub use store::RecordStore;
