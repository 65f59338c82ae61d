//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::db::User;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Build the user listing table
pub fn user_table(users: &[User]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
        ]);

    for user in users {
        let role_color = if user.is_admin() {
            Color::Yellow
        } else {
            Color::White
        };

        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.name),
            Cell::new(&user.email),
            Cell::new(&user.role).fg(role_color),
        ]);
    }

    table
}

/// Print a table of users
pub fn print_user_table(users: &[User]) {
    if users.is_empty() {
        info("No users found. Register one in the web UI or run 'taskr create-admin'");
        return;
    }

    println!("{}", user_table(users));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_table_lists_every_user() {
        let users = vec![
            User {
                id: 1,
                name: "Superman".to_string(),
                email: "admin@realpython.com".to_string(),
                password: "hash".to_string(),
                role: "admin".to_string(),
            },
            User {
                id: 2,
                name: "Michael".to_string(),
                email: "michael@realpython.com".to_string(),
                password: "hash".to_string(),
                role: "user".to_string(),
            },
        ];

        let rendered = user_table(&users).to_string();
        assert!(rendered.contains("Superman"));
        assert!(rendered.contains("michael@realpython.com"));
        assert!(!rendered.contains("hash"));
    }
}
