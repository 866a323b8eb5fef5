pub(crate) mod context;
pub(crate) mod hints;
pub(crate) mod mask;
pub(crate) mod pending;
pub(crate) mod source;
