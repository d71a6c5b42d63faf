//! SSH integration tests
//!
//! Dial and key tests run against local listeners and fixture keys. Exec
//! tests run against an in-process server with scripted replies. None of
//! these need an external SSH server. The live tests need a reachable server
//! that accepts a key; they are skipped unless it is configured.
//!
//! ## Running the live tests
//!
//! ```bash
//! SSH_WAITER_TEST_HOST=127.0.0.1:2222 \
//! SSH_WAITER_TEST_USER=testuser \
//! SSH_WAITER_TEST_KEY=~/.ssh/id_ed25519 \
//!     cargo test --test ssh_integration
//! ```

#[macro_use]
pub mod fixtures;

mod dial_tests;
mod live_tests;
