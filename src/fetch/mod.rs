pub(crate) mod cache;
pub(crate) mod error;
pub(crate) mod pipeline;
pub(crate) mod transport;
