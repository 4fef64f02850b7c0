//! Integration test crate for the mixnet data plane.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end flows across multiple workspace crates, over
//! real `127.0.0.1:0` TCP sockets.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p mixnet-integration-tests
//! ```
