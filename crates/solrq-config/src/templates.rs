//! Starter configurations written by `solrq init`.
//!
//! Each template is kept as a valid TOML file and handed out with every setting commented, so
//! a fresh `.solrq.toml` changes nothing until the user opts in.

/// Project configuration template.
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template.
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the project template with all settings commented out.
pub fn local_template() -> String {
    disable_settings(LOCAL_TEMPLATE)
}

/// Returns the global template with all settings commented out.
pub fn global_template() -> String {
    disable_settings(GLOBAL_TEMPLATE)
}

/// Prefixes every setting and table header with `# `.
///
/// Blank lines and existing comments pass through untouched.
fn disable_settings(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}
