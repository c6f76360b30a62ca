use ansi_to_html::Esc;

use crate::models::Paste;

/// The home page, with the submission form and both listings.
pub const INDEX_PAGE: &str = include_str!("../assets/index.html");

/// Render a full HTML page for a paste.
pub fn paste_page(paste: &Paste) -> String {
    let title = Esc(paste.title.as_str());

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>body{{font-family:sans-serif;max-width:60rem;margin:2rem auto}}\
         pre{{background:#f4f4f4;padding:1rem;overflow:auto}}\
         dl{{display:grid;grid-template-columns:max-content auto;gap:.25rem 1rem}}</style>\n\
         </head>\n\
         <body>\n\
         <p><a href=\"/\">new paste</a></p>\n\
         <h1>{title}</h1>\n\
         <dl>\n\
         <dt>id</dt><dd>{id}</dd>\n\
         <dt>syntax</dt><dd>{syntax}</dd>\n\
         <dt>expires</dt><dd>{expires}</dd>\n\
         <dt>visibility</dt><dd>{visibility}</dd>\n\
         <dt>created</dt><dd>{created}</dd>\n\
         </dl>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        id = Esc(paste.id.as_str()),
        syntax = Esc(paste.syntax.as_str()),
        expires = Esc(paste.expires.as_str()),
        visibility = Esc(paste.visibility.as_str()),
        created = paste.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        body = render_content(&paste.content, &paste.syntax),
    )
}

/// Render paste content according to its syntax tag.
fn render_content(content: &str, syntax: &str) -> String {
    match syntax {
        // raw HTML in the source is escaped by the default options
        "markdown" | "md" => format!("<article>{}</article>", markdown::to_html(content)),
        "ansi" => match ansi_to_html::convert_escaped(content) {
            Ok(html) => format!("<pre>{html}</pre>"),
            Err(_) => plain(content, syntax),
        },
        _ => plain(content, syntax),
    }
}

fn plain(content: &str, syntax: &str) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>",
        Esc(syntax),
        Esc(content)
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn paste(content: &str, syntax: &str) -> Paste {
        Paste {
            id: "0123abcd".to_owned(),
            content: content.to_owned(),
            title: "<script>alert(1)</script>".to_owned(),
            syntax: syntax.to_owned(),
            expires: "never".to_owned(),
            visibility: "public".to_owned(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
        }
    }

    #[test]
    fn page_shows_metadata_and_escapes_text() {
        let page = paste_page(&paste("if a < b && c > d {}", "rust"));

        assert!(page.contains("<title>&lt;script&gt;alert(1)&lt;/script&gt;</title>"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("a &lt; b &amp;&amp; c &gt; d"));
        assert!(page.contains("class=\"language-rust\""));
        assert!(page.contains("0123abcd"));
        assert!(page.contains("2024-05-06 07:08:09 UTC"));
    }

    #[test]
    fn markdown_is_rendered_without_raw_html() {
        let page = paste_page(&paste("# Heading\n\n<img src=x onerror=alert(1)>", "markdown"));

        assert!(page.contains("<h1>Heading</h1>"));
        assert!(!page.contains("<img"));
    }

    #[test]
    fn ansi_colors_become_html() {
        let body = render_content("\x1b[1mbold\x1b[0m <tag>", "ansi");

        assert!(body.contains("<b>bold</b>"));
        assert!(body.contains("&lt;tag&gt;"));
        assert!(!body.contains('\x1b'));
    }

    #[test]
    fn index_page_posts_to_api() {
        assert!(INDEX_PAGE.contains("/api/paste"));
        assert!(INDEX_PAGE.contains("/api/recent"));
        assert!(INDEX_PAGE.contains("/api/top"));
    }
}
