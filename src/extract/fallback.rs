use dom_smoothie::{Config, Readability};
use tracing::debug;

use crate::domain::ExtractedArticle;
use crate::extract::text::{collapse_whitespace, truncate_summary};

/// Upper bound on elements the readability pass will walk
const MAX_ELEMENTS_TO_PARSE: usize = 9000;

/// Readability (via dom_smoothie) over the page HTML.
///
/// Never fails: a page it cannot read comes back with an empty title and
/// summary. `top_image` is always `None` on this path.
pub fn extract_fallback(html: &str, url: Option<&str>) -> ExtractedArticle {
    let cfg = Config {
        max_elements_to_parse: MAX_ELEMENTS_TO_PARSE,
        ..Default::default()
    };

    let parsed = Readability::new(html, url, Some(cfg))
        .map_err(|e| e.to_string())
        .and_then(|mut readability| readability.parse().map_err(|e| e.to_string()));

    match parsed {
        Ok(article) => {
            let title = collapse_whitespace(&article.title);
            let summary = truncate_summary(&collapse_whitespace(&article.text_content));
            debug!(url, title_len = title.len(), summary_len = summary.len(), "readability fallback done");
            ExtractedArticle::new(title, summary)
        }
        Err(e) => {
            debug!(url, "readability fallback failed: {}", e);
            ExtractedArticle::new(String::new(), String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORUM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Council approves new park</title></head>
<body>
  <div id="layout">
    <div id="menu"><a href="/">Home</a> | <a href="/city">City</a></div>
    <div id="story-body">
      <p>The city council voted on Tuesday to approve a new park along the river, ending a debate that lasted more than two years.</p>
      <p>Construction is expected to begin in the spring, and officials said the park should open to the public by the end of next summer.</p>
      <p>Residents who spoke at the meeting were largely in favour of the plan, although some raised concerns about parking and traffic in the area.</p>
      <p>The project will be paid for with a mix of state grants and money set aside in last year's budget, according to the city's finance director.</p>
      <p>Council members said they would hold further public sessions this winter so that residents can comment on the final design of the playgrounds and trails.</p>
    </div>
  </div>
</body>
</html>"#;

    #[test]
    fn test_fallback_reads_main_content() {
        let article = extract_fallback(FORUM_PAGE, Some("https://city.example/news/park"));

        assert!(article.title.contains("Council approves new park"));
        assert!(article.summary.contains("city council voted"));
        assert!(article.summary.chars().count() <= 303);
        assert_eq!(article.top_image, None);
    }

    #[test]
    fn test_fallback_never_sets_image() {
        let html = FORUM_PAGE.replace(
            "<head>",
            "<head><meta property=\"og:image\" content=\"https://city.example/park.jpg\">",
        );
        let article = extract_fallback(&html, None);
        assert_eq!(article.top_image, None);
    }

    #[test]
    fn test_unreadable_page_gives_empty_article() {
        let article = extract_fallback("", None);
        assert!(article.summary.is_empty());
        assert_eq!(article.top_image, None);
    }
}
