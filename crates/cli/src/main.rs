//! Command-line entry point for the `upskill` binary.
//!
//! All functionality lives in the library crate; this file only delegates.

fn main() -> anyhow::Result<()> {
    upskill::run()
}
