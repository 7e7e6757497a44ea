// Library entrypoint for the binaries and integration tests.
pub mod api;
pub mod config;
pub mod docx;
pub mod populate;
pub mod records;
pub mod shutdown;
pub mod state;

#[doc(hidden)]
pub mod test_support;
