//! Route path helpers: template combination, token substitution, normalization

use crate::naming::replace_ignore_ascii_case;

/// Normalize a route path
///
/// Exactly one leading `/`, runs of `/` collapsed, no trailing `/` unless the
/// path is the root.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

/// Whether a method template ignores the controller prefix
pub fn is_absolute_template(template: &str) -> bool {
    template.starts_with('/') || template.starts_with("~/")
}

/// Combine a controller prefix with a method template
pub fn combine_template(prefix: &str, template: &str) -> String {
    let template = template.trim();
    let prefix = prefix.trim();

    if is_absolute_template(template) {
        return template.trim_start_matches('~').to_string();
    }
    if template.is_empty() {
        return prefix.to_string();
    }
    if prefix.is_empty() {
        return template.to_string();
    }
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        template.trim_start_matches('/')
    )
}

/// Values substituted for route tokens
#[derive(Debug, Clone, Copy)]
pub struct RouteTokens<'a> {
    pub controller: &'a str,
    pub action: &'a str,
    /// `None` leaves `[area]` in place
    pub area: Option<&'a str>,
}

impl RouteTokens<'_> {
    pub fn substitute(&self, template: &str) -> String {
        let mut path = replace_ignore_ascii_case(template, "[controller]", self.controller);
        path = replace_ignore_ascii_case(&path, "[action]", self.action);
        if let Some(area) = self.area {
            path = replace_ignore_ascii_case(&path, "[area]", area);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("api//stock/"), "/api/stock");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("  /api/contacts  "), "/api/contacts");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_combine_template() {
        assert_eq!(combine_template("api/stock", "adjust"), "api/stock/adjust");
        assert_eq!(combine_template("api/stock/", "/adjust"), "/adjust");
        assert_eq!(combine_template("api/stock", "~/health"), "/health");
        assert_eq!(combine_template("api/stock", ""), "api/stock");
        assert_eq!(combine_template("", "adjust"), "adjust");
        assert_eq!(combine_template("", ""), "");
    }

    #[test]
    fn test_substitute_tokens() {
        let tokens = RouteTokens {
            controller: "Stock",
            action: "Adjust",
            area: None,
        };
        assert_eq!(
            tokens.substitute("[area]/api/[Controller]/[ACTION]"),
            "[area]/api/Stock/Adjust"
        );

        let with_area = RouteTokens {
            area: Some("Admin"),
            ..tokens
        };
        assert_eq!(with_area.substitute("[area]/[controller]"), "Admin/Stock");
    }
}
