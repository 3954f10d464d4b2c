//! Command-line interface for `vault-config`.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands, KvVersionArg, TargetArgs};

/// Report a command failure and exit with status 1
///
/// In JSON mode the error and its cause chain are printed to stdout as a
/// JSON object so that scripted callers can parse them.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
