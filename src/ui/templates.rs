//! HTML page rendering

use minijinja::Environment;
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::error::Result;

/// Page templates compiled into the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateAssets;

/// Template environment loading pages from the embedded assets.
/// `.html` templates are auto-escaped.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_loader(|name| {
            Ok(TemplateAssets::get(name)
                .map(|file| String::from_utf8_lossy(&file.data).into_owned()))
        });
        Self { env }
    }

    /// Render a page template with the given context
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }

    /// Names of all embedded templates
    pub fn names() -> Vec<String> {
        TemplateAssets::iter().map(|name| name.into_owned()).collect()
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_pages_are_embedded() {
        let names = Templates::names();
        for page in ["_base.html", "login.html", "register.html", "tasks.html"] {
            assert!(names.iter().any(|n| n == page), "missing {}", page);
        }
    }

    #[test]
    fn test_login_page_renders() {
        let templates = Templates::new();
        let html = templates
            .render("login.html", context! { form => context! { name => "" } })
            .unwrap();
        assert!(html.contains("Please sign in to access your task list"));
    }

    #[test]
    fn test_user_input_is_escaped() {
        let templates = Templates::new();
        let html = templates
            .render(
                "login.html",
                context! { form => context! { name => "<script>alert(1)</script>" } },
            )
            .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let templates = Templates::new();
        assert!(templates.render("nope.html", context! {}).is_err());
    }
}
