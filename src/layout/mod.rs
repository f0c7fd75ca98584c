pub(crate) mod engine;
pub(crate) mod placeholder;
pub(crate) mod primitive;
