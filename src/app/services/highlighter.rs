//! Keyword highlighting over the rendered content tree.
//!
//! A pass snapshots the text leaves under the content root first, then
//! rewrites each leaf that contains a keyword into plain text fragments and
//! highlight spans. Leaves without keywords are never touched, and text
//! already inside a highlight span is skipped, so a pass cannot re-enter its
//! own output.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use super::palette::{ColorAssigner, HIGHLIGHT_CLASS};
use crate::app::domain::content::{ContentTree, NodeId};

/// A keyword compiled for literal, case-insensitive matching.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pub index: usize,
    pub keyword: String,
    regex: Regex,
}

impl KeywordMatcher {
    /// The keyword is escaped, so `a.b` only ever matches the text `a.b`.
    /// Case folding is Unicode-aware: `École` matches `école`.
    pub fn new(index: usize, keyword: &str) -> Option<Self> {
        if keyword.is_empty() {
            return None;
        }
        match RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self {
                index,
                keyword: keyword.to_string(),
                regex,
            }),
            Err(e) => {
                warn!("Skipping keyword \"{}\": {}", keyword, e);
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    Plain(&'t str),
    Keyword { text: &'t str, index: usize },
}

impl Segment<'_> {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(text) => text,
            Segment::Keyword { text, .. } => text,
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, Segment::Keyword { .. })
    }
}

/// Counters for one highlight pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightStats {
    pub nodes_scanned: usize,
    pub nodes_rewritten: usize,
    pub spans_created: usize,
}

pub struct TextHighlighter {
    matchers: Vec<KeywordMatcher>,
    colors: ColorAssigner,
}

impl TextHighlighter {
    pub fn new(keywords: &[String], colors: ColorAssigner) -> Self {
        let matchers = keywords
            .iter()
            .enumerate()
            .filter_map(|(index, keyword)| KeywordMatcher::new(index, keyword))
            .collect();
        Self { matchers, colors }
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Quick test used to pick the leaves worth rewriting. Uses the same
    /// matchers as `segment`, so both agree on case folding.
    fn mentions_keyword(&self, text: &str) -> bool {
        self.matchers.iter().any(|m| m.regex.is_match(text))
    }

    /// Split `text` into plain and keyword segments.
    ///
    /// Keywords are applied in list order over the original text. A match
    /// that overlaps a region claimed by an earlier keyword is dropped, so
    /// list order decides which keyword wins an overlap. Segments come back
    /// in text order and concatenate to `text`.
    pub fn segment<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut claimed: Vec<(usize, usize, usize)> = Vec::new();
        for matcher in &self.matchers {
            for found in matcher.regex.find_iter(text) {
                let (start, end) = (found.start(), found.end());
                if start == end {
                    continue;
                }
                let overlaps = claimed.iter().any(|&(s, e, _)| start < e && s < end);
                if !overlaps {
                    claimed.push((start, end, matcher.index));
                }
            }
        }
        claimed.sort_by_key(|&(start, _, _)| start);

        let mut segments = Vec::with_capacity(claimed.len() * 2 + 1);
        let mut cursor = 0;
        for (start, end, index) in claimed {
            if start > cursor {
                segments.push(Segment::Plain(&text[cursor..start]));
            }
            segments.push(Segment::Keyword {
                text: &text[start..end],
                index,
            });
            cursor = end;
        }
        if cursor < text.len() {
            segments.push(Segment::Plain(&text[cursor..]));
        }
        segments
    }

    /// Rewrite the text leaves under `root`.
    pub fn apply(&self, tree: &mut ContentTree, root: NodeId) -> HighlightStats {
        let mut stats = HighlightStats::default();
        if self.is_empty() {
            return stats;
        }

        // Snapshot before mutating so fresh spans are never visited
        let targets: Vec<(NodeId, String)> = tree
            .text_nodes(root)
            .into_iter()
            .filter(|&node| !inside_highlight(tree, root, node))
            .filter_map(|node| tree.text(node).map(|text| (node, text.to_string())))
            .collect();
        stats.nodes_scanned = targets.len();

        for (node, text) in targets {
            if !self.mentions_keyword(&text) {
                continue;
            }
            let segments = self.segment(&text);
            if !segments.iter().any(Segment::is_keyword) {
                continue;
            }

            let mut replacement = Vec::with_capacity(segments.len());
            for segment in &segments {
                match segment {
                    Segment::Plain(plain) => replacement.push(tree.create_text(plain)),
                    Segment::Keyword { text, index } => {
                        let class = self.colors.class_for(*index);
                        let span = tree.create_element_with_classes("span", &[HIGHLIGHT_CLASS, &class]);
                        let inner = tree.create_text(text);
                        tree.append_child(span, inner);
                        replacement.push(span);
                        stats.spans_created += 1;
                    }
                }
            }
            if tree.replace_with(node, replacement) {
                stats.nodes_rewritten += 1;
            }
        }
        stats
    }
}

fn inside_highlight(tree: &ContentTree, root: NodeId, node: NodeId) -> bool {
    let mut current = tree.parent(node);
    while let Some(id) = current {
        if tree.has_class(id, HIGHLIGHT_CLASS) {
            return true;
        }
        if id == root {
            return false;
        }
        current = tree.parent(id);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    fn highlighter(list: &[&str], palette: usize) -> TextHighlighter {
        TextHighlighter::new(&keywords(list), ColorAssigner::new(palette))
    }

    fn paragraph_tree(texts: &[&str]) -> (ContentTree, NodeId) {
        let mut tree = ContentTree::new("div");
        let root = tree.root();
        for text in texts {
            let p = tree.create_element("p");
            let t = tree.create_text(text);
            tree.append_child(p, t);
            tree.append_child(root, p);
        }
        tree.take_mutations();
        (tree, root)
    }

    fn spans(tree: &ContentTree, root: NodeId) -> Vec<(String, String)> {
        tree.find_all_by_class(root, HIGHLIGHT_CLASS)
            .into_iter()
            .map(|span| {
                let class = match tree.kind(span) {
                    crate::app::domain::content::NodeKind::Element { classes, .. } => classes[1].clone(),
                    _ => String::new(),
                };
                (tree.text_content(span), class)
            })
            .collect()
    }

    #[test]
    fn test_segment_literal_matching() {
        let h = highlighter(&["a.b"], 8);
        let segments = h.segment("a.b and axb");
        assert_eq!(
            segments,
            vec![
                Segment::Keyword { text: "a.b", index: 0 },
                Segment::Plain(" and axb"),
            ]
        );
    }

    #[test]
    fn test_segment_folds_non_ascii_case() {
        let h = highlighter(&["École", "ПРИВЕТ"], 8);
        let segments = h.segment("l'école dit привет");
        assert_eq!(
            segments,
            vec![
                Segment::Plain("l'"),
                Segment::Keyword { text: "école", index: 0 },
                Segment::Plain(" dit "),
                Segment::Keyword { text: "привет", index: 1 },
            ]
        );
    }

    #[test]
    fn test_apply_rewrites_non_ascii_leaf() {
        let h = highlighter(&["Straße"], 8);
        let (mut tree, root) = paragraph_tree(&["die STRASSE und die straße"]);
        let stats = h.apply(&mut tree, root);
        assert_eq!(stats.nodes_rewritten, 1);
        assert_eq!(
            spans(&tree, root),
            vec![("straße".to_string(), "keyword-highlight-0".to_string())]
        );
        assert_eq!(tree.text_content(root), "die STRASSE und die straße");
    }

    #[test]
    fn test_segment_regex_metacharacters() {
        let h = highlighter(&["c++", "(x)", "$5"], 8);
        let segments = h.segment("c++ costs $5 (x) ccc");
        let matched: Vec<&str> = segments
            .iter()
            .filter(|s| s.is_keyword())
            .map(|s| s.text())
            .collect();
        assert_eq!(matched, vec!["c++", "$5", "(x)"]);
    }

    #[test]
    fn test_segment_case_insensitive_preserves_case() {
        let h = highlighter(&["Test"], 8);
        let segments = h.segment("this is a test case");
        assert_eq!(segments[1], Segment::Keyword { text: "test", index: 0 });
    }

    #[test]
    fn test_segment_multiple_occurrences() {
        let h = highlighter(&["rust"], 8);
        let segments = h.segment("Rust and rust and RUST");
        let matched: Vec<&str> = segments
            .iter()
            .filter(|s| s.is_keyword())
            .map(|s| s.text())
            .collect();
        assert_eq!(matched, vec!["Rust", "rust", "RUST"]);
    }

    #[test]
    fn test_segment_earlier_keyword_wins_overlap() {
        let h = highlighter(&["rust", "rust book"], 8);
        assert_eq!(
            h.segment("the rust book"),
            vec![
                Segment::Plain("the "),
                Segment::Keyword { text: "rust", index: 0 },
                Segment::Plain(" book"),
            ]
        );

        let h = highlighter(&["abc", "bcd"], 8);
        assert_eq!(
            h.segment("xabcdx"),
            vec![
                Segment::Plain("x"),
                Segment::Keyword { text: "abc", index: 0 },
                Segment::Plain("dx"),
            ]
        );
    }

    #[test]
    fn test_segment_orders_by_position_not_keyword() {
        let h = highlighter(&["world", "hello"], 8);
        assert_eq!(
            h.segment("hello world"),
            vec![
                Segment::Keyword { text: "hello", index: 1 },
                Segment::Plain(" "),
                Segment::Keyword { text: "world", index: 0 },
            ]
        );
    }

    #[test]
    fn test_segment_concatenates_to_input() {
        let h = highlighter(&["ab", "b", "ca"], 8);
        let text = "abcabcab b ca";
        let joined: String = h.segment(text).iter().map(|s| s.text()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_segment_multibyte_text() {
        let h = highlighter(&["RUST"], 8);
        assert_eq!(
            h.segment("Grüße, rust!"),
            vec![
                Segment::Plain("Grüße, "),
                Segment::Keyword { text: "rust", index: 0 },
                Segment::Plain("!"),
            ]
        );
    }

    #[test]
    fn test_empty_keywords_are_ignored() {
        let h = highlighter(&["", "x"], 8);
        assert_eq!(h.segment("axa")[1], Segment::Keyword { text: "x", index: 1 });
        assert!(highlighter(&[""], 8).is_empty());
    }

    #[test]
    fn test_apply_wraps_matches_in_spans() {
        let (mut tree, root) = paragraph_tree(&["a.b and axb"]);
        let stats = highlighter(&["a.b"], 8).apply(&mut tree, root);
        assert_eq!(stats.nodes_rewritten, 1);
        assert_eq!(stats.spans_created, 1);
        assert_eq!(
            tree.to_html(root),
            "<div><p><span class=\"keyword-highlight keyword-highlight-0\">a.b</span> and axb</p></div>"
        );
    }

    #[test]
    fn test_apply_color_cycling() {
        let (mut tree, root) = paragraph_tree(&["k0 k1 k2 k3"]);
        highlighter(&["k0", "k1", "k2", "k3"], 3).apply(&mut tree, root);
        let found = spans(&tree, root);
        assert_eq!(found.len(), 4);
        assert_eq!(found[3].0, "k3");
        assert_eq!(found[3].1, found[0].1);
        assert_eq!(found[2].1, "keyword-highlight-2");
    }

    #[test]
    fn test_apply_leaves_unmatched_nodes_untouched() {
        let (mut tree, root) = paragraph_tree(&["nothing here", "rust here"]);
        let before = tree.text_nodes(root);
        let stats = highlighter(&["rust"], 8).apply(&mut tree, root);
        let after = tree.text_nodes(root);
        assert_eq!(stats.nodes_scanned, 2);
        assert_eq!(stats.nodes_rewritten, 1);
        assert_eq!(before[0], after[0]);
        assert_eq!(tree.parent(before[0]), tree.parent(after[0]));
    }

    #[test]
    fn test_apply_without_keywords_records_no_mutations() {
        let (mut tree, root) = paragraph_tree(&["rust"]);
        let stats = highlighter(&[], 8).apply(&mut tree, root);
        assert_eq!(stats, HighlightStats::default());
        assert!(!tree.has_pending_mutations());
    }

    #[test]
    fn test_apply_twice_on_fresh_render_gives_same_text() {
        let texts = ["The Rust book", "rust, RUST and rusty", "nothing"];
        let h = highlighter(&["rust", "book"], 8);

        let (mut first, root1) = paragraph_tree(&texts);
        h.apply(&mut first, root1);
        let (mut second, root2) = paragraph_tree(&texts);
        h.apply(&mut second, root2);

        assert_eq!(first.text_content(root1), second.text_content(root2));
        assert_eq!(first.to_html(root1), second.to_html(root2));
        assert_eq!(first.text_content(root1), texts.concat());
    }

    #[test]
    fn test_apply_does_not_rewrap_own_output() {
        let (mut tree, root) = paragraph_tree(&["rust and more rust"]);
        let h = highlighter(&["rust"], 8);
        let first = h.apply(&mut tree, root);
        let html = tree.to_html(root);
        tree.take_mutations();

        let second = h.apply(&mut tree, root);
        assert_eq!(first.spans_created, 2);
        assert_eq!(second.spans_created, 0);
        assert_eq!(second.nodes_rewritten, 0);
        assert_eq!(tree.to_html(root), html);
        assert!(!tree.has_pending_mutations());
    }

    #[test]
    fn test_apply_records_one_mutation_per_rewritten_leaf() {
        let (mut tree, root) = paragraph_tree(&["rust", "plain", "more rust"]);
        highlighter(&["rust"], 8).apply(&mut tree, root);
        let records = tree.take_mutations();
        let replacements = records.iter().filter(|r| !r.removed.is_empty()).count();
        assert_eq!(replacements, 2);
    }

    #[test]
    fn test_apply_only_under_root() {
        let mut tree = ContentTree::new("div");
        let outside = tree.create_element("p");
        let outside_text = tree.create_text("rust outside");
        let section = tree.create_element("section");
        let inside_text = tree.create_text("rust inside");
        tree.append_child(tree.root(), outside);
        tree.append_child(outside, outside_text);
        tree.append_child(tree.root(), section);
        tree.append_child(section, inside_text);

        highlighter(&["rust"], 8).apply(&mut tree, section);
        assert_eq!(tree.parent(outside_text), Some(outside));
        assert_eq!(tree.find_all_by_class(section, HIGHLIGHT_CLASS).len(), 1);
    }
}
