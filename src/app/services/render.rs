//! Markdown to reading-view rendering.
//!
//! Builds the same container layout the host's preview uses, so the plugin
//! finds its content root the same way in both.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use tracing::trace;

use crate::app::domain::content::{ContentTree, NodeId};

pub const PREVIEW_VIEW_CLASS: &str = "markdown-preview-view";
pub const PREVIEW_SECTION_CLASS: &str = "markdown-preview-section";

/// Alt text of an image being collected; nested inline tags are flattened.
struct ImageAlt {
    node: NodeId,
    depth: usize,
    alt: String,
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Render `markdown` into a fresh tree shaped like the host's reading view.
/// The returned tree has an empty mutation log.
pub fn render_reading_view(markdown: &str) -> ContentTree {
    let mut tree = ContentTree::new("div");
    let view = tree.create_element_with_classes("div", &[PREVIEW_VIEW_CLASS]);
    let section = tree.create_element_with_classes("div", &[PREVIEW_SECTION_CLASS]);
    tree.append_child(tree.root(), view);
    tree.append_child(view, section);
    render_into(&mut tree, section, markdown);
    tree.take_mutations();
    tree
}

/// Append the rendered blocks of `markdown` under `parent`.
pub fn render_into(tree: &mut ContentTree, parent: NodeId, markdown: &str) {
    let mut stack: Vec<NodeId> = vec![parent];
    let mut image: Option<ImageAlt> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        if let Some(img) = image.as_mut() {
            let finished = match event {
                Event::Start(_) => {
                    img.depth += 1;
                    false
                }
                Event::End(_) if img.depth > 0 => {
                    img.depth -= 1;
                    false
                }
                Event::End(_) => true,
                Event::Text(text) | Event::Code(text) => {
                    img.alt.push_str(&text);
                    false
                }
                _ => false,
            };
            if finished {
                if let Some(done) = image.take() {
                    tree.set_attr(done.node, "alt", &done.alt);
                }
            }
            continue;
        }

        let top = stack.last().copied().unwrap_or(parent);
        match event {
            Event::Start(Tag::Image { dest_url, title, .. }) => {
                let img = tree.create_element("img");
                tree.set_attr(img, "src", &dest_url);
                if !title.is_empty() {
                    tree.set_attr(img, "title", &title);
                }
                tree.append_child(top, img);
                image = Some(ImageAlt {
                    node: img,
                    depth: 0,
                    alt: String::new(),
                });
            }
            Event::Start(tag) => {
                let node = open_tag(tree, top, tag);
                stack.push(node);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Event::Text(text) => append_text(tree, top, &text),
            Event::Code(code) => {
                let el = tree.create_element("code");
                let t = tree.create_text(&code);
                tree.append_child(el, t);
                tree.append_child(top, el);
            }
            Event::SoftBreak => append_text(tree, top, "\n"),
            Event::HardBreak => {
                let br = tree.create_element("br");
                tree.append_child(top, br);
            }
            Event::Rule => {
                let hr = tree.create_element("hr");
                tree.append_child(top, hr);
            }
            Event::TaskListMarker(checked) => {
                let input = tree.create_element("input");
                tree.set_attr(input, "type", "checkbox");
                tree.set_attr(input, "disabled", "");
                if checked {
                    tree.set_attr(input, "checked", "");
                }
                tree.append_child(top, input);
            }
            other => trace!("Skipping markdown event {:?}", other),
        }
    }
}

/// Create the element(s) for `tag` under `parent` and return the node that
/// receives its content.
fn open_tag(tree: &mut ContentTree, parent: NodeId, tag: Tag<'_>) -> NodeId {
    let (outer, inner) = match tag {
        Tag::Paragraph => single(tree, "p"),
        Tag::Heading { level, .. } => single(tree, heading_tag(level)),
        Tag::BlockQuote(_) => single(tree, "blockquote"),
        Tag::CodeBlock(kind) => {
            let pre = tree.create_element("pre");
            let code = tree.create_element("code");
            if let CodeBlockKind::Fenced(lang) = kind {
                let lang = lang.split_whitespace().next().unwrap_or("");
                if !lang.is_empty() {
                    tree.add_class(code, &format!("language-{}", lang));
                }
            }
            tree.append_child(pre, code);
            (pre, code)
        }
        Tag::List(Some(start)) => {
            let ol = tree.create_element("ol");
            if start != 1 {
                tree.set_attr(ol, "start", &start.to_string());
            }
            (ol, ol)
        }
        Tag::List(None) => single(tree, "ul"),
        Tag::Item => single(tree, "li"),
        Tag::Table(_) => single(tree, "table"),
        Tag::TableHead => {
            let thead = tree.create_element("thead");
            let tr = tree.create_element("tr");
            tree.append_child(thead, tr);
            (thead, tr)
        }
        Tag::TableRow => single(tree, "tr"),
        Tag::TableCell => single(tree, "td"),
        Tag::Emphasis => single(tree, "em"),
        Tag::Strong => single(tree, "strong"),
        Tag::Strikethrough => single(tree, "del"),
        Tag::Link { dest_url, title, .. } => {
            let a = tree.create_element("a");
            tree.set_attr(a, "href", &dest_url);
            if !title.is_empty() {
                tree.set_attr(a, "title", &title);
            }
            (a, a)
        }
        _ => single(tree, "div"),
    };
    tree.append_child(parent, outer);
    inner
}

fn single(tree: &mut ContentTree, tag: &str) -> (NodeId, NodeId) {
    let el = tree.create_element(tag);
    (el, el)
}

/// Append text under `parent`, merging into a trailing text node so each
/// run of inline text stays one leaf.
fn append_text(tree: &mut ContentTree, parent: NodeId, text: &str) {
    let last_text = tree
        .children(parent)
        .last()
        .copied()
        .filter(|&child| tree.text(child).is_some());
    match last_text {
        Some(node) => tree.push_text(node, text),
        None => {
            let node = tree.create_text(text);
            tree.append_child(parent, node);
        }
    }
}
