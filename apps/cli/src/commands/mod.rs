//! CLI subcommands

pub mod build;
pub mod list;
pub mod pin;
pub mod resolve;

/// Print a serializable value as pretty JSON on stdout
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
