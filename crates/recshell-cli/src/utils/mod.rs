pub mod input;

pub use input::{collect_credentials, collect_credentials_with, prompt_secret, prompt_string};
