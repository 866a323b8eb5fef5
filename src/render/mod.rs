pub(crate) mod backend;
pub(crate) mod coverage;
pub(crate) mod cpu;
pub(crate) mod deferred;
