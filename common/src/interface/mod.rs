mod credentials;
mod deployment;
mod memory_store;

pub use credentials::{
    CredentialConstructor, CredentialRegistry, GenericCredential, LEGACY_PROVIDER,
};
pub use deployment::{Deployment, ResolvedCredentials};
pub use memory_store::MemoryStore;
