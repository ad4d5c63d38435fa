pub mod encoding;
pub mod fingerprint;
pub mod resolver;
pub mod selector;
pub mod session;
pub mod source;
pub mod store;
