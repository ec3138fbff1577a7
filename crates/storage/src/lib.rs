mod client;
mod connector;
mod errors;
mod memory;
mod request;
mod url;

#[cfg(feature = "gcs")]
mod gcs;

pub use client::{connect, AclRule, StorageClient, StoredObject, PUBLIC_READ};
pub use connector::{BucketConnector, LifecycleState};
pub use errors::*;
pub use memory::InMemoryClient;
pub use request::UploadRequest;
pub use url::public_url;

#[cfg(feature = "gcs")]
pub use gcs::GcsClient;
