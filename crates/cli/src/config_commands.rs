use std::path::Path;

use anyhow::Result;

use bilingo_config::{BilingoConfig, Secrets, Severity, secrets};

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub fn check(config: &BilingoConfig, explicit_path: Option<&Path>) -> Result<()> {
    match explicit_path
        .map(Path::to_path_buf)
        .or_else(bilingo_config::find_config_file)
    {
        Some(path) => eprintln!("Checking {}\n", path.display()),
        None => eprintln!("No config file found; checking defaults.\n"),
    }

    let result = bilingo_config::validate(config);
    for d in &result.diagnostics {
        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Info => CYAN,
        };
        eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
    }

    eprintln!("\n{BOLD}secrets{RESET}");
    let missing = secrets::missing_from_env();
    match Secrets::from_env() {
        Ok(s) => {
            for (name, value) in [
                (secrets::LINE_CHANNEL_ACCESS_TOKEN, &s.line_channel_access_token),
                (secrets::LINE_CHANNEL_SECRET, &s.line_channel_secret),
                (secrets::GEMINI_API_KEY, &s.gemini_api_key),
            ] {
                eprintln!("  {GREEN}set{RESET} {name} = {}", Secrets::preview(value));
            }
        },
        Err(_) => {
            for name in &missing {
                eprintln!("  {BOLD}{RED}error{RESET} {name} is not set");
            }
        },
    }

    eprintln!("\n{BOLD}effective config{RESET}");
    eprintln!("{}", toml::to_string_pretty(config)?);

    let errors = result.count(Severity::Error) + missing.len();
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}
