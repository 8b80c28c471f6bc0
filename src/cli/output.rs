//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::config::OutputFormat;
use crate::domain::Plan;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Render a plan as Bicep parameter assignments.
pub fn render_bicep(plan: &Plan) -> String {
    let mut out = String::from("# Bicep parameter values\n");
    for (name, cidr) in plan.parameters() {
        out.push_str(&format!("{name}: {cidr}\n"));
    }
    out
}

/// Render a plan as a pretty-printed JSON object.
pub fn render_json(plan: &Plan) -> serde_json::Result<String> {
    serde_json::to_string_pretty(plan)
}

/// Render a plan in the requested format, without a trailing newline.
pub fn render_plan(plan: &Plan, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Bicep => Ok(render_bicep(plan).trim_end().to_string()),
        OutputFormat::Json => render_json(plan),
    }
}
