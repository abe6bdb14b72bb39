pub(crate) mod blocking;
pub(crate) mod fake;
