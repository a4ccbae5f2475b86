//! Markdown preview rendering, sanitized for display.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Render article markdown into sanitized HTML.
pub fn markdown_to_html(content: &str) -> String {
    render(content, None)
}

/// Same as [`markdown_to_html`], but relative image links (bare uploaded
/// image names) are resolved against `image_base`.
pub fn markdown_to_html_with_images(content: &str, image_base: &str) -> String {
    render(content, Some(image_base))
}

/// Resolve an uploaded image reference into a URL.
///
/// Absolute URLs, root-relative paths and data URIs pass through untouched.
pub fn resolve_image_url(reference: &str, image_base: &str) -> String {
    if is_absolute_reference(reference) {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        image_base.trim_end_matches('/'),
        reference.trim_start_matches("./")
    )
}

fn render(content: &str, image_base: Option<&str>) -> String {
    if content.trim().is_empty() {
        return String::new();
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(content, options).map(|event| match (event, image_base) {
        (
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }),
            Some(base),
        ) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::from(resolve_image_url(&dest_url, base)),
            title,
            id,
        }),
        (event, _) => event,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    ammonia::clean(&html_output)
}

fn is_absolute_reference(reference: &str) -> bool {
    let lowered = reference.to_ascii_lowercase();
    lowered.starts_with("http://")
        || lowered.starts_with("https://")
        || lowered.starts_with("data:")
        || lowered.starts_with("//")
        || lowered.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_gfm_and_strips_scripts() {
        let html = markdown_to_html("# Title\n\n~~old~~ new\n\n<script>alert(1)</script>");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<del>old</del>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn blank_content_renders_nothing() {
        assert_eq!(markdown_to_html("  \n "), "");
    }

    #[test]
    fn relative_images_resolve_against_base() {
        let html = markdown_to_html_with_images(
            "![cover](cover.png) ![remote](https://cdn.example.com/a.png)",
            "https://img.example.com/uploads/",
        );
        assert!(html.contains("https://img.example.com/uploads/cover.png"));
        assert!(html.contains("https://cdn.example.com/a.png"));
    }

    #[test]
    fn image_references() {
        assert_eq!(resolve_image_url("a.png", "https://x.io/img"), "https://x.io/img/a.png");
        assert_eq!(resolve_image_url("/static/a.png", "https://x.io/img"), "/static/a.png");
    }
}
