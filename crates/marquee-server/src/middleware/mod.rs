pub(crate) mod cors;
pub(crate) mod request_tracing;
