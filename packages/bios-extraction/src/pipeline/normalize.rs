//! Text normalization: raw markup or text → ordered text fragments.
//!
//! HTML is parsed into a DOM with the `scraper` crate. Invisible content
//! (scripts, styles, hidden elements) is dropped, navigation chrome is kept but
//! flagged, and text is grouped into one fragment per block-level element so
//! table cells and list items stay separate. Plain text becomes one fragment
//! per non-empty line.
//!
//! Fragment order always follows document order.

use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::ops::Deref;
use tracing::debug;

use super::vocabulary::is_boilerplate_line;
use crate::types::candidate::TextFragment;
use crate::types::model::PageContent;

/// Elements whose content never reaches the reader.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "head", "iframe", "object", "canvas",
];

/// Elements that start a new fragment.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "details", "dialog",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Elements that are navigation chrome by definition.
const BOILERPLATE_TAGS: &[&str] = &["nav", "header", "footer", "aside"];

/// id/class prefixes that mark navigation chrome.
const BOILERPLATE_HINTS: &[&str] = &[
    "nav",
    "menu",
    "footer",
    "breadcrumb",
    "cookie",
    "sidebar",
    "site-header",
];

/// Turns page content into `TextFragment`s.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize the whole page. Never returns an empty vector.
    pub fn normalize(&self, content: &PageContent) -> Vec<TextFragment> {
        let fragments = match content {
            PageContent::Html(html) => {
                let document = Html::parse_document(html);
                let mut collector = Collector::default();
                collector.walk(document.root_element(), false);
                collector.finish()
            }
            PageContent::Text(text) => Self::normalize_lines(text),
        };

        if fragments.is_empty() {
            debug!("No fragments survived normalization; using whole document");
            return vec![Self::whole_document(content)];
        }

        debug!(fragments = fragments.len(), "Normalized page");
        fragments
    }

    /// Normalize only the content under the first selector that matches.
    ///
    /// Selectors are tried in order; all matches of the first matching
    /// selector are used, in document order, skipping matches nested inside
    /// an earlier match. Returns `None` for plain text, when nothing matches,
    /// or when the matched region has no text.
    pub fn normalize_region(
        &self,
        content: &PageContent,
        selectors: &[&str],
    ) -> Option<Vec<TextFragment>> {
        let PageContent::Html(html) = content else {
            return None;
        };
        if selectors.is_empty() {
            return None;
        }

        let document = Html::parse_document(html);
        for raw in selectors {
            let selector = match Selector::parse(raw) {
                Ok(s) => s,
                Err(e) => {
                    debug!(selector = %raw, error = ?e, "Skipping invalid region selector");
                    continue;
                }
            };

            let matches: Vec<ElementRef<'_>> = document.select(&selector).collect();
            if matches.is_empty() {
                continue;
            }

            let mut collector = Collector::default();
            let mut taken = Vec::new();
            for element in matches {
                let node = element.deref();
                if node.ancestors().any(|a| taken.contains(&a.id())) {
                    continue;
                }
                taken.push(node.id());
                collector.flush();
                collector.walk(element, is_boilerplate(element.value()));
            }

            let fragments = collector.finish();
            debug!(selector = %raw, fragments = fragments.len(), "Narrowed to region");
            return if fragments.is_empty() {
                None
            } else {
                Some(fragments)
            };
        }

        None
    }

    fn normalize_lines(text: &str) -> Vec<TextFragment> {
        text.lines()
            .map(collapse_whitespace)
            .filter(|line| !line.is_empty() && !is_boilerplate_line(line))
            .enumerate()
            .map(|(position, line)| TextFragment::new(line, position))
            .collect()
    }

    fn whole_document(content: &PageContent) -> TextFragment {
        let text = match content {
            PageContent::Html(html) => {
                let document = Html::parse_document(html);
                let joined = document.root_element().text().collect::<Vec<_>>().join(" ");
                collapse_whitespace(&joined)
            }
            PageContent::Text(text) => collapse_whitespace(text),
        };
        TextFragment::new(text, 0)
    }
}

/// Accumulates inline text and emits a fragment at each block boundary.
#[derive(Default)]
struct Collector {
    fragments: Vec<TextFragment>,
    buffer: String,
    saw_content: bool,
    saw_boilerplate: bool,
}

impl Collector {
    fn walk(&mut self, element: ElementRef<'_>, boilerplate: bool) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push(text, boilerplate),
                Node::Element(el) => {
                    let Some(child_ref) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = el.name();
                    if SKIP_TAGS.contains(&name) || is_hidden(el) {
                        continue;
                    }
                    if name == "br" {
                        self.flush();
                        continue;
                    }

                    let block = BLOCK_TAGS.contains(&name);
                    if block {
                        self.flush();
                    }
                    self.walk(child_ref, boilerplate || is_boilerplate(el));
                    if block {
                        self.flush();
                    }
                }
                _ => {}
            }
        }
    }

    fn push(&mut self, text: &str, boilerplate: bool) {
        if text.trim().is_empty() {
            self.buffer.push(' ');
            return;
        }
        self.buffer.push_str(text);
        if boilerplate {
            self.saw_boilerplate = true;
        } else {
            self.saw_content = true;
        }
    }

    fn flush(&mut self) {
        let text = collapse_whitespace(&self.buffer);
        if !text.is_empty() {
            let boilerplate = self.saw_boilerplate && !self.saw_content;
            let position = self.fragments.len();
            self.fragments
                .push(TextFragment::new(text, position).with_boilerplate(boilerplate));
        }
        self.buffer.clear();
        self.saw_content = false;
        self.saw_boilerplate = false;
    }

    fn finish(mut self) -> Vec<TextFragment> {
        self.flush();
        self.fragments
    }
}

fn is_hidden(el: &Element) -> bool {
    if el.attr("hidden").is_some() {
        return true;
    }
    if el
        .attr("aria-hidden")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    {
        return true;
    }
    if el.name() == "input" && el.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")) {
        return true;
    }
    el.attr("style").is_some_and(|style| {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        style.contains("display:none") || style.contains("visibility:hidden")
    })
}

fn is_boilerplate(el: &Element) -> bool {
    if BOILERPLATE_TAGS.contains(&el.name()) {
        return true;
    }
    if el
        .attr("role")
        .is_some_and(|r| r.eq_ignore_ascii_case("navigation"))
    {
        return true;
    }
    let hinted = |name: &str| {
        let name = name.to_lowercase();
        BOILERPLATE_HINTS.iter().any(|h| name.starts_with(h))
    };
    el.id().is_some_and(hinted) || el.classes().any(hinted)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
