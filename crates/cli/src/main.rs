//! Command-line entry point for `artisync`.
//!
//! All work happens in the library so it can be tested without a process.

fn main() -> anyhow::Result<()> {
    artisync::run()
}
