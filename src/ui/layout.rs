use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::io;
use std::path::Path;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder pattern"));

/// Navbar entry for the page being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Profile,
    Login,
}

impl NavLink {
    const ALL: [NavLink; 2] = [NavLink::Profile, NavLink::Login];

    fn placeholder(self) -> &'static str {
        match self {
            NavLink::Profile => "active_profile",
            NavLink::Login => "active_login",
        }
    }
}

pub fn load_template(dir: &str, name: &str) -> io::Result<String> {
    fs::read_to_string(Path::new(dir).join(name)).map_err(|e| {
        tracing::error!("Failed to read template {}: {}", name, e);
        e
    })
}

/// Substitutes `{{name}}` placeholders in one pass. Inserted values are never
/// scanned again, so user text that looks like a placeholder stays literal.
/// Unknown placeholders are left in place.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match values.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Marks the current page's navbar link as active and clears the others.
pub fn mark_active(navbar: &str, active: NavLink) -> String {
    let classes: Vec<(&str, &str)> = NavLink::ALL
        .iter()
        .map(|link| (link.placeholder(), if *link == active { "active" } else { "" }))
        .collect();
    fill_template(navbar, &classes)
}

/// Wraps page content with the navbar and footer partials.
pub fn render_page(
    templates_dir: &str,
    title: &str,
    active: NavLink,
    content: &str,
    toasts: &str,
) -> io::Result<String> {
    let layout = load_template(templates_dir, "layout.html")?;
    let navbar = load_template(templates_dir, "partials/navbar.html")?;
    let footer = load_template(templates_dir, "partials/footer.html")?;

    let title = html_escape::encode_text(title);
    let navbar = mark_active(&navbar, active);
    Ok(fill_template(
        &layout,
        &[
            ("title", &title),
            ("navbar", &navbar),
            ("footer", &footer),
            ("content", content),
            ("toasts", toasts),
        ],
    ))
}
