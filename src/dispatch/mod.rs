pub(crate) mod deferred;
pub(crate) mod direct;
pub(crate) mod op;
pub(crate) mod ops;
pub(crate) mod table;
