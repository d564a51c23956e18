//! Tag resolution: turn DocTags markup into Markdown fragments.
//!
//! A tag is `<name attrs>content</name>`, where `name` is a run of word
//! characters, anything after whitespace inside the opening tag is ignored,
//! and `content` stops at the *first* `</name>` that follows. A tag is
//! resolvable once its content holds no complete inner tag pair; it is then
//! replaced according to the [`RuleTable`].
//!
//! One pass scans left to right with a stack of open tags and replaces every
//! resolvable tag it meets. Passes repeat until one makes no substitution, so
//! nesting resolves innermost first, one level per pass, without recursion.
//! Every substitution deletes an opening and a closing tag and the default
//! rules never insert a `<`, so the number of passes is bounded by the
//! number of `<` in the input. That bound is also enforced, for custom rules
//! whose output contains markup.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use tracing::{debug, warn};

/// A closing tag, or an opening tag with optional attributes.
static RE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</\w+>|<\w+(?:\s[^<>]*)?>").unwrap());

/// What a resolved tag becomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagRule {
    /// Content unchanged.
    Passthrough,
    /// Marker placed before the content (headings, bullets).
    Prefix(String),
    /// Marker placed on both sides of the content (emphasis).
    Wrap(String),
    /// Fixed text; the content is discarded (horizontal rules).
    Replace(String),
    /// Nothing at all.
    Drop,
}

impl TagRule {
    pub fn apply(&self, content: &str) -> String {
        match self {
            TagRule::Passthrough => content.to_string(),
            TagRule::Prefix(p) => format!("{p}{content}"),
            TagRule::Wrap(w) => format!("{w}{content}{w}"),
            TagRule::Replace(s) => s.clone(),
            TagRule::Drop => String::new(),
        }
    }
}

/// Per-tag-name replacement rules with a fallback for unknown names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    rules: HashMap<String, TagRule>,
    fallback: TagRule,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::empty()
            .with_rule("section_header_level_1", TagRule::Prefix("# ".into()))
            .with_rule("section_header_level_2", TagRule::Prefix("## ".into()))
            .with_rule("text", TagRule::Passthrough)
            .with_rule("caption", TagRule::Wrap("_".into()))
            .with_rule("page_break", TagRule::Replace("---".into()))
            .with_rule("unordered_list", TagRule::Passthrough)
            .with_rule("list_item", TagRule::Prefix("- ".into()))
            .with_rule("picture", TagRule::Drop)
            .with_rule("page_footer", TagRule::Drop)
    }
}

impl RuleTable {
    /// A table with no rules: every tag falls through to its content.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
            fallback: TagRule::Passthrough,
        }
    }

    /// Add or replace the rule for `tag`.
    pub fn with_rule(mut self, tag: impl Into<String>, rule: TagRule) -> Self {
        self.rules.insert(tag.into(), rule);
        self
    }

    /// Rule used for tag names not in the table.
    pub fn with_fallback(mut self, rule: TagRule) -> Self {
        self.fallback = rule;
        self
    }

    pub fn rule_for(&self, tag: &str) -> &TagRule {
        self.rules.get(tag).unwrap_or(&self.fallback)
    }
}

/// Resolve all complete tags in `input`, repeating passes until stable.
///
/// Residual markup (unterminated or stray tags) is left in place; see
/// [`crate::pipeline::postprocess`] for the cleanup.
pub fn resolve_tags(input: &str, rules: &RuleTable) -> String {
    let max_passes = input.bytes().filter(|&b| b == b'<').count() + 1;
    let mut current = input.to_string();

    for pass in 1..=max_passes {
        let (next, substitutions) = resolve_pass(&current, rules);
        if substitutions == 0 {
            if pass > 1 {
                debug!("Tag resolution settled after {} passes", pass);
            }
            return current;
        }
        current = next;
    }

    warn!(
        "Tag resolution stopped after {} passes; the rule table keeps producing tags",
        max_passes
    );
    current
}

#[derive(Debug)]
struct OpenTag<'a> {
    name: &'a str,
    start: usize,
    content_start: usize,
    /// A complete tag pair lies inside this one.
    enclosing: bool,
}

#[derive(Debug)]
struct Resolvable<'a> {
    name: &'a str,
    span: Range<usize>,
    content: Range<usize>,
}

/// One left-to-right scan. Returns the rewritten text and the number of
/// tags replaced.
fn resolve_pass(input: &str, rules: &RuleTable) -> (String, usize) {
    let mut open: Vec<OpenTag> = Vec::new();
    let mut ready: Vec<Resolvable> = Vec::new();

    for tag in RE_TAG.find_iter(input) {
        let text = tag.as_str();

        if let Some(name) = text.strip_prefix("</").and_then(|t| t.strip_suffix('>')) {
            // The nearest unclosed tag of that name ends here; stray closers
            // are left for the residual-markup cleanup.
            let Some(idx) = open.iter().rposition(|o| o.name == name) else {
                continue;
            };
            let matched = &open[idx];
            if !matched.enclosing {
                ready.push(Resolvable {
                    name: matched.name,
                    span: matched.start..tag.end(),
                    content: matched.content_start..tag.start(),
                });
            }
            // Tags opened after it are unterminated within its content.
            open.truncate(idx);
            for outer in open.iter_mut().rev() {
                if outer.enclosing {
                    break;
                }
                outer.enclosing = true;
            }
        } else {
            let name = text[1..]
                .split(|c: char| c.is_whitespace() || c == '>')
                .next()
                .unwrap_or_default();
            open.push(OpenTag {
                name,
                start: tag.start(),
                content_start: tag.end(),
                enclosing: false,
            });
        }
    }

    // Resolvable tags never overlap and arrive in input order.
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    for tag in &ready {
        out.push_str(&input[pos..tag.span.start]);
        let content = input[tag.content.clone()].trim();
        out.push_str(&rules.rule_for(tag.name).apply(content));
        pos = tag.span.end;
    }
    out.push_str(&input[pos..]);
    (out, ready.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(input: &str) -> String {
        resolve_tags(input, &RuleTable::default())
    }

    #[test]
    fn test_table_rules() {
        assert_eq!(
            resolve("<section_header_level_1>Intro</section_header_level_1>"),
            "# Intro"
        );
        assert_eq!(
            resolve("<section_header_level_2>Scope</section_header_level_2>"),
            "## Scope"
        );
        assert_eq!(resolve("<text>plain</text>"), "plain");
        assert_eq!(resolve("<caption>Figure 1</caption>"), "_Figure 1_");
        assert_eq!(resolve("<page_break></page_break>"), "---");
        assert_eq!(resolve("<list_item>one</list_item>"), "- one");
        assert_eq!(resolve("<picture>chart</picture>"), "");
        assert_eq!(resolve("<page_footer>Page 3</page_footer>"), "");
    }

    #[test]
    fn test_unknown_tag_falls_through() {
        assert_eq!(resolve("<foo>bar</foo>"), "bar");
    }

    #[test]
    fn test_attributes_ignored() {
        assert_eq!(
            resolve(r#"<caption loc="1,2,3,4">Table 2</caption>"#),
            "_Table 2_"
        );
    }

    #[test]
    fn test_inner_content_trimmed() {
        assert_eq!(resolve("<list_item>\n   spaced  \n</list_item>"), "- spaced");
    }

    #[test]
    fn test_nested_list() {
        let input = "<unordered_list>\n<list_item>a</list_item>\n<list_item>b</list_item>\n</unordered_list>";
        assert_eq!(resolve(input), "- a\n- b");
    }

    #[test]
    fn test_repeated_same_name_nesting() {
        // The inner pair resolves first; the leftover outer pair needs a
        // second pass.
        let (once, _) = resolve_pass("<text><text>a</text></text>", &RuleTable::default());
        assert_eq!(once, "<text>a</text>");
        assert_eq!(resolve("<text><text>a</text></text>"), "a");
    }

    #[test]
    fn test_one_level_per_pass() {
        let rules = RuleTable::default();
        let (once, n) = resolve_pass("<list_item><caption>c</caption></list_item>", &rules);
        assert_eq!((once.as_str(), n), ("<list_item>_c_</list_item>", 1));
        let (twice, n) = resolve_pass(&once, &rules);
        assert_eq!((twice.as_str(), n), ("- _c_", 1));
    }

    #[test]
    fn test_siblings_resolve_in_one_pass() {
        let (out, n) = resolve_pass("<text>a</text> <caption>b</caption>", &RuleTable::default());
        assert_eq!(out, "a _b_");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let depth = 2000;
        let mut input = String::new();
        for i in 0..depth {
            input.push_str(&format!("<t{i}>"));
        }
        input.push('x');
        for i in (0..depth).rev() {
            input.push_str(&format!("</t{i}>"));
        }
        assert_eq!(resolve(&input), "x");
    }

    #[test]
    fn test_crossed_tags_terminate() {
        let rules = RuleTable::default();
        assert_eq!(resolve_pass("<a><b>x</a>y</b>", &rules).0, "<b>xy</b>");
        assert_eq!(resolve("<a><b>x</a>y</b>"), "xy");
    }

    #[test]
    fn test_runaway_rule_is_bounded() {
        let rules = RuleTable::empty().with_rule("t", TagRule::Replace("<t>again</t>".into()));
        assert_eq!(resolve_tags("<t>x</t>", &rules), "<t>again</t>");
    }

    #[test]
    fn test_five_levels_match_pass_by_pass_flattening() {
        let nested = "<unordered_list><list_item><caption><text><foo>deep</foo></text></caption></list_item></unordered_list>";

        let mut stepwise = nested.to_string();
        for (from, to) in [
            ("<foo>deep</foo>", "deep"),
            ("<text>deep</text>", "deep"),
            ("<caption>deep</caption>", "_deep_"),
            ("<list_item>_deep_</list_item>", "- _deep_"),
            ("<unordered_list>- _deep_</unordered_list>", "- _deep_"),
        ] {
            assert!(stepwise.contains(from), "missing {from} in {stepwise}");
            stepwise = stepwise.replace(from, to);
        }

        assert_eq!(resolve(nested), stepwise);
    }

    #[test]
    fn test_unterminated_tag_left_in_place() {
        assert_eq!(
            resolve("<section_header_level_1>Title"),
            "<section_header_level_1>Title"
        );
    }

    #[test]
    fn test_unterminated_outer_with_complete_inner() {
        assert_eq!(resolve("<a>x <caption>c</caption>"), "<a>x _c_");
    }

    #[test]
    fn test_stray_closing_tags_terminate() {
        let out = resolve("</text></text><text>ok</text></text>");
        assert_eq!(out, "</text></text>ok</text>");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(resolve("just words, 3 < 4 and 5 > 2"), "just words, 3 < 4 and 5 > 2");
    }

    #[test]
    fn test_custom_rules() {
        let rules = RuleTable::default()
            .with_rule("title", TagRule::Prefix("# ".into()))
            .with_fallback(TagRule::Drop);
        assert_eq!(resolve_tags("<title>Paper</title>", &rules), "# Paper");
        assert_eq!(resolve_tags("<formula>x^2</formula>", &rules), "");
    }
}
