//! Domain types shared by every adapter.

mod credentials;

pub use credentials::{Credentials, CredentialsError, CredentialsFile};
