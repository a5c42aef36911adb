pub mod backend;

pub use backend::{BackendClient, ClientError, RawResponse, Relayed, UploadedFile};
