//! Configuration templates for `sift init`.
//!
//! Templates are stored as valid TOML files and returned as commented-out
//! example configurations.

/// Default local configuration template (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template (valid TOML).
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the local configuration template as a commented-out example.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Returns the global configuration template as a commented-out example.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Converts a valid TOML template into a commented-out example config.
///
/// Lines that are already comments are preserved as-is. Non-comment, non-empty
/// lines get a "# " prefix. Empty lines are preserved.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}
