//! Allowlist sanitization for pasted markup.
//!
//! Markup is parsed into a detached `FragmentTree`, filtered against the
//! fixed `SanitizationPolicy`, and serialized again. Disallowed elements are
//! unwrapped, not deleted: their children take their place and are scanned
//! in turn, so text inside unknown wrappers survives.

mod tree;

pub use tree::{
    ArenaNode, FragmentTree, NodeId, NodeKind, escape_attr, escape_text, is_void_element,
};

/// The process-wide allowlist.
pub struct SanitizationPolicy {
    pub tags: &'static [&'static str],
    pub attributes: &'static [&'static str],
    pub url_attributes: &'static [&'static str],
    pub url_prefixes: &'static [&'static str],
}

pub static POLICY: SanitizationPolicy = SanitizationPolicy {
    tags: &[
        "a", "b", "blockquote", "br", "code", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i",
        "img", "li", "ol", "p", "pre", "s", "span", "strike", "strong", "sub", "sup", "table",
        "tbody", "td", "tfoot", "th", "thead", "tr", "u", "ul",
    ],
    attributes: &[
        "href", "src", "alt", "title", "target", "rel", "colspan", "rowspan",
    ],
    url_attributes: &["href", "src"],
    url_prefixes: &["http:", "https:", "mailto:", "tel:", "/", "#"],
};

impl SanitizationPolicy {
    pub fn allows_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    pub fn allows_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Accepts empty values and values starting with an allowed scheme or
    /// a relative prefix. Scheme matching ignores case.
    pub fn is_safe_url(&self, value: &str) -> bool {
        let value = value.trim_start();
        if value.is_empty() {
            return true;
        }
        self.url_prefixes.iter().any(|prefix| {
            value
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
    }

    fn keeps_attribute(&self, name: &str, value: &str) -> bool {
        if !self.allows_attribute(name) {
            return false;
        }
        if self.url_attributes.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            return self.is_safe_url(value);
        }
        true
    }
}

/// Filter markup against the allowlist.
///
/// The output contains no element outside `POLICY.tags`, no attribute
/// outside `POLICY.attributes`, and every kept `href`/`src` passes
/// `is_safe_url`. Comments are dropped.
pub fn sanitize(markup: &str) -> String {
    let mut tree = FragmentTree::parse(markup);
    filter_children(&mut tree, FragmentTree::ROOT, &POLICY);
    tree.to_html()
}

fn filter_children(tree: &mut FragmentTree, root: NodeId, policy: &SanitizationPolicy) {
    // Explicit stack of (parent, next child index); nesting depth is
    // unbounded in pasted markup.
    let mut stack = vec![(root, 0usize)];
    while let Some((parent, i)) = stack.pop() {
        let Some(&child) = tree.node(parent).children.get(i) else {
            continue;
        };
        match &mut tree.node_mut(child).kind {
            NodeKind::Element { name, attrs } => {
                if !policy.allows_tag(name) {
                    tracing::trace!(tag = %name, "unwrapping disallowed element");
                    // Splice the grandchildren in place and rescan from the
                    // same index, so they are filtered as our own children.
                    let grandchildren = std::mem::take(&mut tree.node_mut(child).children);
                    tree.node_mut(parent).children.splice(i..=i, grandchildren);
                    stack.push((parent, i));
                    continue;
                }
                attrs.retain(|(attr, value)| policy.keeps_attribute(attr, value));
                stack.push((parent, i + 1));
                stack.push((child, 0));
            }
            NodeKind::Text(_) => stack.push((parent, i + 1)),
            NodeKind::Root | NodeKind::Other => {
                tree.node_mut(parent).children.remove(i);
                stack.push((parent, i));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_unwrapped_to_text() {
        let out = sanitize("<div><script>alert(1)</script><p>hi</p></div>");
        assert!(!out.contains("<script"));
        assert!(!out.contains("<div"));
        insta::assert_snapshot!(out, @"alert(1)<p>hi</p>");
    }

    #[test]
    fn test_javascript_href_is_stripped() {
        insta::assert_snapshot!(
            sanitize(r#"<a href="javascript:alert(1)">x</a>"#),
            @"<a>x</a>"
        );
        insta::assert_snapshot!(
            sanitize(r#"<a href="  JavaScript:alert(1)">x</a>"#),
            @"<a>x</a>"
        );
    }

    #[test]
    fn test_safe_href_is_preserved() {
        assert_eq!(
            sanitize(r#"<a href="https://example.com">x</a>"#),
            r#"<a href="https://example.com">x</a>"#
        );
        assert_eq!(
            sanitize(r##"<a href="#top">x</a>"##),
            r##"<a href="#top">x</a>"##
        );
    }

    #[test]
    fn test_disallowed_attributes_removed() {
        insta::assert_snapshot!(
            sanitize(r#"<p class="x" style="color:red" onclick="evil()" title="t">a</p>"#),
            @r#"<p title="t">a</p>"#
        );
    }

    #[test]
    fn test_unsafe_img_src_removed() {
        insta::assert_snapshot!(
            sanitize(r#"<img src="data:image/png;base64,AAAA" alt="pic">"#),
            @r#"<img alt="pic">"#
        );
        insta::assert_snapshot!(
            sanitize(r#"<img src="/a.png">"#),
            @r#"<img src="/a.png">"#
        );
    }

    #[test]
    fn test_nested_disallowed_wrappers_keep_order() {
        let out = sanitize("<div>one<section><b>two</b><font>three</font></section>four</div>");
        assert_eq!(out, "one<b>two</b>threefour");
    }

    #[test]
    fn test_text_is_escaped_not_reparsed() {
        let out = sanitize("<p>&lt;script&gt;x&lt;/script&gt;</p>");
        assert_eq!(out, "<p>&lt;script&gt;x&lt;/script&gt;</p>");
    }

    #[test]
    fn test_comments_dropped() {
        assert_eq!(sanitize("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_allowed_tags_preserved() {
        let input = "<h2>T</h2><ul><li><strong>a</strong></li></ul><blockquote>q</blockquote>";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_url_predicate() {
        assert!(POLICY.is_safe_url(""));
        assert!(POLICY.is_safe_url("HTTPS://x"));
        assert!(POLICY.is_safe_url("mailto:a@b.c"));
        assert!(POLICY.is_safe_url("tel:123"));
        assert!(POLICY.is_safe_url("/relative"));
        assert!(!POLICY.is_safe_url("javascript:x"));
        assert!(!POLICY.is_safe_url("vbscript:x"));
        assert!(!POLICY.is_safe_url("relative/path"));
        assert!(!POLICY.is_safe_url("ht"));
    }

    #[test]
    fn test_output_only_contains_allowed_elements() {
        let input = r#"<html><body><iframe src="x"></iframe><object><embed></object>
            <form><input value="v"><button>b</button></form><em>ok</em></body></html>"#;
        let out = sanitize(input);
        let tree = FragmentTree::parse(&out);
        let mut stack = vec![FragmentTree::ROOT];
        while let Some(id) = stack.pop() {
            let node = tree.node(id);
            if let NodeKind::Element { name, attrs } = &node.kind {
                assert!(POLICY.allows_tag(name), "unexpected <{name}> in {out}");
                for (attr, _) in attrs {
                    assert!(POLICY.allows_attribute(attr));
                }
            }
            stack.extend(node.children.iter().copied());
        }
        assert!(out.contains("<em>ok</em>"));
    }

    #[test]
    fn test_deeply_nested_markup_on_small_stack() {
        const DEPTH: usize = 100_000;
        let input = format!("{}x{}", "<span>".repeat(DEPTH), "</span>".repeat(DEPTH));
        let out = std::thread::Builder::new()
            .stack_size(1024 * 1024)
            .spawn(move || sanitize(&input))
            .unwrap()
            .join()
            .unwrap();
        assert!(out.contains('x'));
        assert!(out.starts_with("<span><span>"));
        assert_eq!(
            out.matches("<span>").count(),
            out.matches("</span>").count()
        );
    }

    #[test]
    fn test_deeply_nested_disallowed_wrappers_unwrap() {
        const DEPTH: usize = 5_000;
        let open = "<div>".repeat(DEPTH);
        let close = "</div>".repeat(DEPTH);
        let input = format!("{open}<b>y</b>{close}");
        let out = std::thread::Builder::new()
            .stack_size(1024 * 1024)
            .spawn(move || sanitize(&input))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(out, "<b>y</b>");
    }
}
