// Chunk: docs/chunks/selector_rules - Selector compilation into per-node rule chains

//! The selector compiler.
//!
//! Highlighting rules are written as selectors: whitespace-separated paths of
//! node names, innermost name last. A step is a plain name, a `*` wildcard,
//! or a JSON-quoted string (for node names containing selector syntax). A
//! path may end in `/...` to mark the rule as inherited by descendants, or in
//! `!` to mark the node opaque.
//!
//! ```text
//! selector := path (' '+ path)*
//! path     := step ('/' step)* ('/' '...' | '!')?
//! step     := '*' | unquoted-name | '"' json-string '"'
//! ```
//!
//! [`style_tags`] compiles a selector table into [`Rule`] records filed under
//! each path's innermost name and returns a [`PropSource`]; attaching it with
//! [`NodeSet::extend`](canopy_tree::NodeSet::extend) is the language
//! configuration step that makes the rules visible to the highlighter.
//!
//! Rules for the same name are chained in decreasing context-depth order, so
//! more specific rules are tried first; on equal depth, later-defined rules
//! precede earlier ones.

use crate::tag::Tag;
use canopy_tree::{NodeProp, PropSource, TreeCursor};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Error from [`style_tags`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A selector path failed the grammar: empty innermost segment, stray
    /// `!` or `/...`, unterminated quote, or a bad quoted string.
    #[error("invalid selector path: {path}")]
    InvalidPath { path: String },
}

/// How a rule's classes apply to the node tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Apply to the matched node only.
    Normal,
    /// Apply to the matched node and every descendant.
    Inherit,
    /// Apply to the matched node and suppress all deeper styling.
    Opaque,
}

/// A compiled selector path, filed under its innermost node name.
#[derive(Debug, Clone)]
pub struct Rule {
    tags: Vec<Tag>,
    mode: Mode,
    /// Ancestor names that must match bottom-up, starting from the node's
    /// direct parent. `None` is a wildcard step.
    context: Vec<Option<String>>,
    /// Alternative rules for the same name, in decreasing depth order.
    next: Option<Box<Rule>>,
}

impl Rule {
    /// The tags this rule applies.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// The rule's mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether this rule suppresses deeper styling.
    pub fn opaque(&self) -> bool {
        self.mode == Mode::Opaque
    }

    /// Whether this rule propagates to descendants.
    pub fn inherit(&self) -> bool {
        self.mode == Mode::Inherit
    }

    /// The required ancestor context, nearest parent first.
    pub fn context(&self) -> &[Option<String>] {
        &self.context
    }

    /// The next alternative rule for the same node name.
    pub fn next(&self) -> Option<&Rule> {
        self.next.as_deref()
    }

    fn depth(&self) -> usize {
        self.context.len()
    }
}

/// The step tokenizer: a JSON-quoted string, or a run of characters that are
/// neither `/` nor `!`.
fn step_regex() -> &'static Regex {
    static STEP: OnceLock<Regex> = OnceLock::new();
    STEP.get_or_init(|| {
        Regex::new(r#"^"(?:[^"\\]|\\.)*"|^[^/!]+"#).expect("step regex is valid")
    })
}

/// The node prop under which compiled rule chains are attached.
pub(crate) fn rule_prop() -> &'static NodeProp<Rule> {
    static RULE_PROP: OnceLock<NodeProp<Rule>> = OnceLock::new();
    RULE_PROP.get_or_init(NodeProp::new)
}

/// Compiles a selector table into a [`PropSource`] attaching rule chains to
/// node types by name.
///
/// Each entry maps a selector (one or more paths) to the tags its matched
/// nodes receive. Entry order matters only for equal-depth paths filed under
/// the same innermost name: later entries are tried first.
///
/// # Errors
///
/// Returns [`PathError::InvalidPath`] when a path fails the selector
/// grammar.
pub fn style_tags(specs: &[(&str, &[Tag])]) -> Result<PropSource, PathError> {
    let mut by_name: FxHashMap<String, Rule> = FxHashMap::default();
    for (selector, tags) in specs {
        for path in selector.split_whitespace() {
            let (mut pieces, mode) = parse_path(path)?;
            let innermost = match pieces.pop() {
                Some(Some(name)) if !name.is_empty() => name,
                _ => {
                    return Err(PathError::InvalidPath {
                        path: path.to_string(),
                    })
                }
            };
            // `pieces` is outermost-first; context wants nearest parent
            // first.
            pieces.reverse();
            let rule = Rule {
                tags: tags.to_vec(),
                mode,
                context: pieces,
                next: None,
            };
            let chain = by_name.remove(&innermost);
            by_name.insert(innermost, file_rule(rule, chain));
        }
    }

    tracing::debug!(names = by_name.len(), "compiled style selectors");
    Ok(rule_prop().add(move |node_type| by_name.get(node_type.name()).cloned()))
}

/// Parses one path into its steps (outermost first, `None` = wildcard) and
/// mode.
fn parse_path(path: &str) -> Result<(Vec<Option<String>>, Mode), PathError> {
    let invalid = || PathError::InvalidPath {
        path: path.to_string(),
    };
    let mut pieces: Vec<Option<String>> = Vec::new();
    let mut mode = Mode::Normal;
    let mut pos = 0;
    loop {
        let rest = &path[pos..];
        if rest == "..." && pos > 0 {
            mode = Mode::Inherit;
            break;
        }
        let step = step_regex().find(rest).ok_or_else(invalid)?.as_str();
        pieces.push(if step == "*" {
            None
        } else if step.starts_with('"') {
            Some(serde_json::from_str::<String>(step).map_err(|_| invalid())?)
        } else {
            Some(step.to_string())
        });
        pos += step.len();
        if pos == path.len() {
            break;
        }
        let separator = path.as_bytes()[pos];
        pos += 1;
        if pos == path.len() && separator == b'!' {
            mode = Mode::Opaque;
            break;
        }
        if separator != b'/' {
            return Err(invalid());
        }
    }
    Ok((pieces, mode))
}

/// Inserts `rule` into `chain`, keeping decreasing depth order. On equal
/// depth the new rule goes first, so later definitions win ties.
fn file_rule(mut rule: Rule, chain: Option<Rule>) -> Rule {
    match chain {
        None => rule,
        Some(mut head) => {
            if head.depth() <= rule.depth() {
                rule.next = Some(Box::new(head));
                rule
            } else {
                let tail = head.next.take().map(|b| *b);
                head.next = Some(Box::new(file_rule(rule, tail)));
                head
            }
        }
    }
}

/// Returns the rule that applies to the cursor's current node: the first
/// rule in the node type's chain whose ancestor context matches the cursor's
/// path, if any.
pub fn get_style_tags(cursor: &TreeCursor) -> Option<&'static Rule> {
    let mut rule = cursor.node_type().prop(rule_prop());
    while let Some(r) = rule {
        if r.context.is_empty() || cursor_matches_context(cursor, &r.context) {
            return Some(r);
        }
        rule = r.next.as_deref();
    }
    None
}

fn cursor_matches_context(cursor: &TreeCursor, context: &[Option<String>]) -> bool {
    if context.len() + 1 > cursor.depth() {
        return false;
    }
    context.iter().enumerate().all(|(i, step)| match step {
        None => true,
        Some(name) => cursor
            .ancestor_type(i + 1)
            .is_some_and(|t| t.name() == name.as_str()),
    })
}
