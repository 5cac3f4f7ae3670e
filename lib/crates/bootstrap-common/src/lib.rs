pub mod bundle;
pub mod types;

pub use bundle::BundleCredentials;
pub use types::*;
