pub mod interface;

pub use interface::{
    CredentialConstructor, CredentialRegistry, Deployment, GenericCredential, MemoryStore,
    ResolvedCredentials, LEGACY_PROVIDER,
};
