//! Integration tests for tabvault-remote
//!
//! Uses wiremock to simulate the gist APIs and a WebDAV endpoint and
//! verifies end-to-end behavior of the adapters, including the error
//! mapping the sync orchestrator relies on.

mod common;

mod test_gist;
mod test_webdav;
