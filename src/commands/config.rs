//! Configuration commands.
//!
//! - `config show`: Display the effective configuration
//! - `config path`: Print where the config file is read from

use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use super::print_json;
use crate::config::Config;
use crate::error::Result;

const REDACTED: &str = "[REDACTED]";

/// Show current configuration, with the API token redacted
pub fn cmd_config_show(config: &Config, output_json: bool) -> Result<()> {
    if output_json {
        return print_json(&json!({
            "api": {
                "base_url": config.api_base_url(),
                "token": config.api.token.as_ref().map(|_| REDACTED),
                "timeout_secs": config.api.timeout_secs,
            },
            "page_size": config.page_size,
            "sla": config.sla,
            "config_file": Config::config_path().to_string_lossy(),
        }));
    }

    print!("{}", render_config(config));
    Ok(())
}

/// Print the config file path
pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path().display());
    Ok(())
}

fn render_config(config: &Config) -> String {
    let key = |k: &str| k.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string();

    let mut out = format!(
        "{}\n\n",
        "Configuration:".if_supports_color(Stream::Stdout, |t| t.bold())
    );
    out.push_str(&format!("{}:\n", key("api")));
    out.push_str(&format!(
        "  base_url: {}\n",
        config.api_base_url().unwrap_or("not configured")
    ));
    out.push_str(&format!(
        "  token: {}\n",
        if config.api.token.is_some() {
            REDACTED
        } else {
            "not set"
        }
    ));
    out.push_str(&format!("  timeout_secs: {}\n", config.api.timeout_secs));
    out.push_str(&format!("{}: {}\n", key("page_size"), config.page_size));
    out.push_str(&format!("{}:\n", key("sla")));
    out.push_str(&format!(
        "  warning_threshold: {}\n",
        config.sla.warning_threshold
    ));
    out.push_str(&format!(
        "  critical_threshold: {}\n",
        config.sla.critical_threshold
    ));
    out.push_str(&format!(
        "\n{}: {}\n",
        key("config_file"),
        Config::config_path().display()
    ));
    out
}
