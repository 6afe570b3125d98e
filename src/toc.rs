//! GitHub-flavored markdown anchor/slug generation.

/// Generate a table-of-contents link to a heading on the same page.
pub fn render_toc_link(text: &str) -> String {
    format!("[{}](#{})", text, github_slug(text))
}

/// Generate a TOC list item.
pub fn render_toc_item(title: &str) -> String {
    format!("* {}", render_toc_link(title))
}

/// GitHub heading anchor slug generation.
///
/// - lowercase
/// - remove all chars that aren't alphanumeric, space, underscore, or hyphen
/// - replace spaces with hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_simple() {
        assert_eq!(github_slug("hello world"), "hello-world");
    }

    #[test]
    fn slug_with_dots() {
        assert_eq!(github_slug("Sys.Extended.UI"), "sysextendedui");
    }

    #[test]
    fn slug_keeps_underscores_and_hyphens() {
        assert_eq!(github_slug("get_Width"), "get_width");
        assert_eq!(github_slug("drop-down"), "drop-down");
    }

    #[test]
    fn slug_uppercase() {
        assert_eq!(github_slug("Hello World"), "hello-world");
    }

    #[test]
    fn toc_item() {
        assert_eq!(render_toc_item("SliderExtender"), "* [SliderExtender](#sliderextender)");
    }
}
