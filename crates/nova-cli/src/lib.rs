//! Library wrapper around the `nova` CLI implementation.
//!
//! `cargo test -p nova-cli --lib` typechecks the CLI without building the
//! binary test suite, so the binary crate root (`main.rs`) is compiled as a
//! module here. `fn main()` is just another function in that position.

#[allow(dead_code)]
#[path = "main.rs"]
mod main_bin;
