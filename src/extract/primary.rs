use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::domain::ExtractedArticle;
use crate::extract::summarize::{summarize, SUMMARY_SENTENCES};
use crate::extract::text::{collapse_whitespace, stopword_count, truncate_summary};
use crate::extract::{attr_value, first_attr, resolve_url, selector};

/// Elements that never carry article text
const BOILERPLATE_TAGS: &str =
    "script, style, noscript, template, nav, header, footer, aside, form, iframe, svg, button, select";

/// Containers exempt from class/id based stripping
const PROTECTED_TAGS: &[&str] = &["html", "head", "body", "article", "main"];

/// A paragraph needs this many stopwords to count as prose
const MIN_PARAGRAPH_STOPWORDS: usize = 3;

/// Declared pixel area below which an `<img>` is treated as an icon
const MIN_IMAGE_AREA: u64 = 5_000;

fn boilerplate_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(^|[\s_-])(comments?|share|sharing|social|related|promo|advert|ads?|sponsor(ed)?|cookie|consent|newsletter|subscribe|sidebar|menu|breadcrumbs?|footer|nav|popup|modal)($|[\s_-])",
        )
        .expect("boilerplate pattern is valid")
    })
}

/// Full-document analysis of an already fetched page.
///
/// `base_url` is the final URL of the page; relative image URLs resolve
/// against it. Returns `None` when no title and no summary could be found.
pub fn extract_primary_from_html(html: &str, base_url: &str) -> Option<ExtractedArticle> {
    let mut document = Html::parse_document(html);

    let title = extract_title(&document);
    let meta_image = metadata_image(&document, base_url);

    strip_boilerplate(&mut document);

    let top_node = top_node(&document);
    let paragraphs = match top_node {
        Some(node) => paragraphs_in(node),
        None => Vec::new(),
    };

    let top_image = meta_image.or_else(|| {
        let scope = top_node.unwrap_or_else(|| document.root_element());
        largest_image(scope, base_url)
    });

    let summary = truncate_summary(&summarize(&title, &paragraphs, SUMMARY_SENTENCES));

    if title.is_empty() && summary.is_empty() {
        debug!(url = base_url, "primary extraction found no content");
        return None;
    }

    debug!(
        url = base_url,
        paragraphs = paragraphs.len(),
        has_image = top_image.is_some(),
        "primary extraction succeeded"
    );

    Some(ExtractedArticle::new(title, summary).with_top_image(top_image))
}

fn extract_title(document: &Html) -> String {
    first_attr(document, "meta[property='og:title']", "content")
        .or_else(|| first_attr(document, "meta[name='og:title']", "content"))
        .or_else(|| element_text(document, "title"))
        .or_else(|| element_text(document, "h1"))
        .map(|t| collapse_whitespace(&t))
        .unwrap_or_default()
}

fn element_text(document: &Html, css: &str) -> Option<String> {
    document
        .select(&selector(css))
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn metadata_image(document: &Html, base_url: &str) -> Option<String> {
    [
        ("meta[property='og:image']", "content"),
        ("meta[name='og:image']", "content"),
        ("meta[name='twitter:image']", "content"),
        ("meta[property='twitter:image']", "content"),
        ("link[rel='image_src']", "href"),
    ]
    .iter()
    .find_map(|(css, attr)| first_attr(document, css, attr))
    .and_then(|src| resolve_url(base_url, &src))
}

fn strip_boilerplate(document: &mut Html) {
    let mut doomed: Vec<_> = document
        .select(&selector(BOILERPLATE_TAGS))
        .map(|el| el.id())
        .collect();

    let marker = boilerplate_marker();
    doomed.extend(
        document
            .select(&selector("[class], [id]"))
            .filter(|el| !PROTECTED_TAGS.contains(&el.value().name()))
            .filter(|el| {
                let class = el.value().attr("class").unwrap_or_default();
                let id = el.value().attr("id").unwrap_or_default();
                marker.is_match(class) || marker.is_match(id)
            })
            .map(|el| el.id()),
    );

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// The container whose paragraphs carry the most prose.
///
/// Each prose paragraph credits its parent with its score and its
/// grandparent with half of it. Only nodes still attached under the root
/// are walked; `Html::select` would also visit detached boilerplate.
fn top_node(document: &Html) -> Option<ElementRef<'_>> {
    let mut scores = HashMap::new();

    for p in document.root_element().select(&selector("p")) {
        let text = p.text().collect::<String>();
        let stopwords = stopword_count(&text);
        if stopwords < MIN_PARAGRAPH_STOPWORDS {
            continue;
        }
        let score = stopwords as f64;

        if let Some(parent) = p.parent() {
            *scores.entry(parent.id()).or_insert(0.0) += score;
            if let Some(grandparent) = parent.parent() {
                *scores.entry(grandparent.id()).or_insert(0.0) += score / 2.0;
            }
        }
    }

    scores
        .into_iter()
        .max_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.0.cmp(&a.0))
        })
        .and_then(|(id, _)| document.tree.get(id))
        .and_then(ElementRef::wrap)
}

fn paragraphs_in(node: ElementRef<'_>) -> Vec<String> {
    node.select(&selector("p"))
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|text| stopword_count(text) >= MIN_PARAGRAPH_STOPWORDS)
        .collect()
}

fn largest_image(scope: ElementRef<'_>, base_url: &str) -> Option<String> {
    scope
        .select(&selector("img"))
        .filter_map(|img| {
            let src = attr_value(img, "src")?;
            let area = dimension(img, "width")? * dimension(img, "height")?;
            (area >= MIN_IMAGE_AREA).then_some((area, src))
        })
        .fold(None, |best: Option<(u64, String)>, (area, src)| match best {
            Some((best_area, _)) if best_area >= area => best,
            _ => Some((area, src)),
        })
        .and_then(|(_, src)| resolve_url(base_url, &src))
}

fn dimension(img: ElementRef<'_>, attr: &str) -> Option<u64> {
    img.value()
        .attr(attr)?
        .trim()
        .trim_end_matches("px")
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Acme unveils faster chips | Example Times</title>
  <meta property="og:title" content="Acme unveils faster chips">
  <meta property="og:image" content="/images/chip-hero.jpg">
</head>
<body>
  <header><nav><a href="/">Home</a> <a href="/tech">Tech</a> and the rest of the menu</nav></header>
  <div class="share-bar"><p>Share this on all of the social networks that you like to use</p></div>
  <article>
    <h1>Acme unveils faster chips</h1>
    <p>Acme on Monday unveiled a new line of chips that it says are twice as fast as the previous generation.</p>
    <p>The company said the chips will ship to cloud providers in the first quarter of next year.</p>
    <p>Analysts said the launch puts pressure on rivals that have struggled with supply.</p>
  </article>
  <aside><p>Related: read all of our other stories about the chips that are in the news</p></aside>
  <footer><p>Copyright and all of the legal text that is at the bottom of the page</p></footer>
</body>
</html>"#;

    #[test]
    fn test_extracts_title_summary_and_meta_image() {
        let article =
            extract_primary_from_html(ARTICLE_PAGE, "https://times.example/tech/acme").unwrap();

        assert_eq!(article.title, "Acme unveils faster chips");
        assert!(article.summary.starts_with("Acme on Monday unveiled"));
        assert!(article.summary.contains("first quarter"));
        assert_eq!(
            article.top_image.as_deref(),
            Some("https://times.example/images/chip-hero.jpg")
        );
    }

    #[test]
    fn test_boilerplate_not_in_summary() {
        let article =
            extract_primary_from_html(ARTICLE_PAGE, "https://times.example/tech/acme").unwrap();

        assert!(!article.summary.contains("Share this"));
        assert!(!article.summary.contains("Related"));
        assert!(!article.summary.contains("Copyright"));
    }

    #[test]
    fn test_stripped_comments_never_win_over_short_article() {
        let comment = "<p>I think that the writer of this is wrong and they should have been more careful with the facts.</p>";
        let html = format!(
            r#"<html><head><title>Council vote</title></head><body>
            <article><p>The council voted on the new budget for the city on Tuesday night.</p></article>
            <div class="comments">{}</div></body></html>"#,
            comment.repeat(6)
        );

        let article = extract_primary_from_html(&html, "https://e.example/council").unwrap();

        assert!(article.summary.starts_with("The council voted"));
        assert!(!article.summary.contains("writer of this"));
    }

    #[test]
    fn test_title_falls_back_to_title_tag() {
        let html = "<html><head><title> Plain   title </title></head><body></body></html>";
        let article = extract_primary_from_html(html, "https://e.example/").unwrap();

        assert_eq!(article.title, "Plain title");
        assert_eq!(article.summary, "");
        assert_eq!(article.top_image, None);
    }

    #[test]
    fn test_empty_page_is_absent() {
        assert!(extract_primary_from_html("", "https://e.example/").is_none());
        assert!(extract_primary_from_html(
            "<html><body><div id=\"app\"></div><script>render()</script></body></html>",
            "https://e.example/"
        )
        .is_none());
    }

    #[test]
    fn test_largest_content_image_when_no_metadata() {
        let html = r#"<html><head><title>Story</title></head><body>
            <div class="story">
              <img src="/icon.png" width="16" height="16">
              <img src="/small.jpg" width="200" height="100">
              <img src="/large.jpg" width="800" height="450">
              <p>This is the body of the story and it has enough words to be prose.</p>
            </div></body></html>"#;

        let article = extract_primary_from_html(html, "https://e.example/news/1").unwrap();
        assert_eq!(article.top_image.as_deref(), Some("https://e.example/large.jpg"));
    }

    #[test]
    fn test_long_summary_is_truncated() {
        let sentence = "This sentence is one of the many that make up the very long body of the article.";
        let body: String = (0..12).map(|_| format!("<p>{}</p>", sentence)).collect();
        let html = format!("<html><head><title>Long</title></head><body><article>{}</article></body></html>", body);

        let article = extract_primary_from_html(&html, "https://e.example/").unwrap();
        assert_eq!(article.summary.chars().count(), 303);
        assert!(article.summary.ends_with("..."));
    }
}
