pub(crate) mod server_runtime_app;
