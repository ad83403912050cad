//! ANSI color codes for transcript printing.
//!
//! One-shot output only; no terminal capability detection. Colors match the
//! role scheme used throughout: system red, user blue, assistant green.

use crate::core::message::Role;

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const BLUE: &str = "\x1b[34m";
pub const RESET: &str = "\x1b[0m";

/// Color code for a role's transcript label.
pub fn role_color(role: Role) -> &'static str {
    match role {
        Role::System => RED,
        Role::User => BLUE,
        Role::Assistant => GREEN,
    }
}

/// Render a `[role]` label with its color applied.
pub fn role_label(role: Role) -> String {
    format!("{}[{}]{}", role_color(role), role.as_str(), RESET)
}
