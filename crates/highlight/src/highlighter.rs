// Chunk: docs/chunks/highlight_traversal - Cursor-driven span emission over syntax trees

//! The tree highlighter.
//!
//! [`highlight_tree`] walks a parse tree over a byte range and emits
//! `(from, to, classes)` spans for every styled stretch of text, in strict
//! position order. Styling comes from the rule chains attached to node types
//! (see [`style_tags`](crate::style_tags)) resolved through a
//! [`StyleMatcher`].
//!
//! The walk keeps a stack of node-type names indexed by depth for ancestor
//! context matching, accumulates classes from `Inherit`-mode rules,
//! suppresses everything below an `Opaque` node, and dispatches into mounted
//! inner languages — either wholesale (the mounted tree replaces the
//! subtree) or interleaved through an overlay of byte ranges.
//!
//! Span coalescing lives in one small state machine ([`SpanBuilder`]): a
//! span materializes only when the class string changes, is non-empty, and
//! covers a positive length, so adjacent same-class regions merge and
//! un-styled text produces nothing.
//!
//! All offsets are byte offsets. Highlighting is total: unknown node types,
//! unmatched tags and missing rules simply produce no styling.

use crate::selector::{rule_prop, Mode};
use crate::style::StyleMatcher;
use canopy_tree::{NodeType, Tree, TreeCursor};
use std::ops::{Bound, RangeBounds};

/// Emits spans for every styled stretch of `tree` within `range`.
///
/// `emit` is called with `(from, to, classes)` triples in strictly
/// increasing position order; consecutive calls never share a class string,
/// and every span lies within the requested range. An unbounded range end
/// means the whole tree.
pub fn highlight_tree(
    tree: &Tree,
    matcher: &dyn StyleMatcher,
    range: impl RangeBounds<usize>,
    mut emit: impl FnMut(usize, usize, &str),
) {
    let (from, to) = resolve_range(&range, tree.length());
    if from >= to {
        return;
    }
    tracing::trace!(from, to, "highlighting tree range");

    let mut highlighter = Highlighter {
        builder: SpanBuilder {
            at: from,
            class: String::new(),
            emit: &mut emit,
        },
        matcher,
        stack: Vec::new(),
    };
    let mut cursor = tree.cursor();
    highlighter.highlight_range(&mut cursor, from, to, "", 0, tree.node_type());
    highlighter.builder.flush(to);
}

/// Re-emits the text of `range` as consecutive chunks: styled and un-styled
/// runs go to `put_text(text, classes)` (classes is `""` for un-styled
/// text), line breaks go to `put_break()`. Concatenating the chunks with a
/// newline per break reproduces the text of the range.
pub fn highlight_code(
    code: &str,
    tree: &Tree,
    matcher: &dyn StyleMatcher,
    range: impl RangeBounds<usize>,
    mut put_text: impl FnMut(&str, &str),
    mut put_break: impl FnMut(),
) {
    let (from, to) = resolve_range(&range, code.len());
    if from >= to {
        return;
    }
    let mut writer = CodeWriter {
        code,
        pos: from,
        put_text: &mut put_text,
        put_break: &mut put_break,
    };
    highlight_tree(tree, matcher, from..to, |span_from, span_to, classes| {
        writer.write_to(span_from, "");
        writer.write_to(span_to, classes);
    });
    writer.write_to(to, "");
}

fn resolve_range(range: &impl RangeBounds<usize>, length: usize) -> (usize, usize) {
    let from = match range.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n + 1,
        Bound::Unbounded => 0,
    };
    let to = match range.end_bound() {
        Bound::Included(&n) => n + 1,
        Bound::Excluded(&n) => n,
        Bound::Unbounded => length,
    };
    (from, to)
}

/// The span coalescing state machine. `at` is the emission cursor, `class`
/// the currently open class string.
struct SpanBuilder<'a> {
    at: usize,
    class: String,
    emit: &'a mut dyn FnMut(usize, usize, &str),
}

impl SpanBuilder<'_> {
    /// Closes the open span at `at` if `class` differs from it, then opens
    /// `class` from there. Redundant calls (same class, or a position not
    /// past the cursor) are no-ops.
    fn start_span(&mut self, at: usize, class: &str) {
        if class != self.class {
            self.flush(at);
            if at > self.at {
                self.at = at;
            }
            self.class.clear();
            self.class.push_str(class);
        }
    }

    /// Emits the open span up to `to`, if it has a class and positive
    /// length.
    fn flush(&mut self, to: usize) {
        if to > self.at && !self.class.is_empty() {
            (self.emit)(self.at, to, &self.class);
        }
    }
}

struct Highlighter<'a> {
    builder: SpanBuilder<'a>,
    matcher: &'a dyn StyleMatcher,
    /// Node-type names by depth. Entries above the current depth are stale;
    /// the live prefix is defined by the traversal depth.
    stack: Vec<NodeType>,
}

impl Highlighter<'_> {
    fn highlight_range(
        &mut self,
        cursor: &mut TreeCursor,
        from: usize,
        to: usize,
        inherited: &str,
        depth: usize,
        scope: NodeType,
    ) {
        let (start, end) = (cursor.from(), cursor.to());
        if start >= to || end <= from {
            return;
        }
        let node_type = cursor.node_type();
        if depth < self.stack.len() {
            self.stack[depth] = node_type;
        } else {
            debug_assert_eq!(depth, self.stack.len());
            self.stack.push(node_type);
        }
        let scope = if node_type.is_top() { node_type } else { scope };

        let mut cls = inherited.to_string();
        let mut inherited = inherited.to_string();
        let mut opaque = false;

        // Rules for the same name are alternatives: the first one whose
        // context matches is applied, the rest of the chain is ignored.
        let mut rule = node_type.prop(rule_prop());
        while let Some(r) = rule {
            if r.context().is_empty() || self.match_context(r.context(), depth) {
                let mut tag_cls = String::new();
                for &tag in r.tags() {
                    if let Some(class) = self.matcher.matched_class(tag, scope) {
                        if !tag_cls.is_empty() {
                            tag_cls.push(' ');
                        }
                        tag_cls.push_str(&class);
                    }
                }
                if !tag_cls.is_empty() {
                    if !cls.is_empty() {
                        cls.push(' ');
                    }
                    cls.push_str(&tag_cls);
                    if r.mode() == Mode::Inherit {
                        if !inherited.is_empty() {
                            inherited.push(' ');
                        }
                        inherited.push_str(&tag_cls);
                    }
                }
                if r.mode() == Mode::Opaque {
                    opaque = true;
                }
                break;
            }
            rule = r.next();
        }

        self.builder.start_span(from.max(start), &cls);
        if opaque {
            return;
        }

        let mounted = cursor.tree().mounted().cloned();
        if let Some(mounted) = mounted {
            let inner_scope = mounted.tree.node_type();
            match mounted.overlay {
                None => {
                    // Full mount: the inner tree stands in for this node's
                    // subtree. The inner language starts with a clean
                    // inherited class.
                    let mut inner = mounted.tree.cursor_at(start);
                    self.highlight_range(
                        &mut inner,
                        from.max(start),
                        to.min(end),
                        "",
                        depth,
                        inner_scope,
                    );
                    let inner_end = end.min(start + mounted.tree.length());
                    self.builder.start_span(to.min(inner_end), &cls);
                }
                Some(overlay) => {
                    // Overlay mount: interleave this node's own children
                    // (the outer language) with the mounted tree over the
                    // overlay ranges.
                    let mut pos = start;
                    let has_child = cursor.first_child();
                    let mut index = 0;
                    loop {
                        let next = overlay.get(index);
                        let next_pos = next.map_or(end, |r| r.from + start);
                        let range_from = from.max(pos);
                        let range_to = to.min(next_pos);
                        if range_from < range_to && has_child {
                            while cursor.from() < range_to {
                                self.highlight_range(
                                    cursor,
                                    range_from,
                                    range_to,
                                    &inherited,
                                    depth + 1,
                                    scope,
                                );
                                self.builder.start_span(range_to.min(cursor.to()), &cls);
                                if cursor.to() >= next_pos || !cursor.next_sibling() {
                                    break;
                                }
                            }
                        }
                        let Some(next) = next else { break };
                        if next.from + start > to {
                            break;
                        }
                        // Clamp so a malformed overlay cannot escape the
                        // node.
                        pos = (next.to + start).min(end);
                        if pos > from {
                            let inner_from = from.max(next.from + start);
                            let inner_to = to.min(pos);
                            if inner_from < inner_to {
                                let mut inner = mounted.tree.cursor_at(start);
                                self.highlight_range(
                                    &mut inner,
                                    inner_from,
                                    inner_to,
                                    "",
                                    depth,
                                    inner_scope,
                                );
                            }
                            self.builder.start_span(to.min(pos), &cls);
                        }
                        index += 1;
                    }
                    if has_child {
                        cursor.parent();
                    }
                }
            }
        } else if cursor.first_child() {
            loop {
                if cursor.to() > from {
                    if cursor.from() >= to {
                        break;
                    }
                    self.highlight_range(cursor, from, to, &inherited, depth + 1, scope);
                    self.builder.start_span(to.min(cursor.to()), &cls);
                }
                if !cursor.next_sibling() {
                    break;
                }
            }
            cursor.parent();
        }
    }

    /// A context of length `L` requires `L <= depth - 1` and matches each
    /// non-wildcard step against the stack, walking up from the direct
    /// parent.
    fn match_context(&self, context: &[Option<String>], depth: usize) -> bool {
        if context.len() + 1 > depth {
            return false;
        }
        context.iter().enumerate().all(|(i, step)| match step {
            None => true,
            Some(name) => self.stack[depth - 1 - i].name() == name.as_str(),
        })
    }
}

/// Splits span/gap text at line breaks for [`highlight_code`].
struct CodeWriter<'a> {
    code: &'a str,
    pos: usize,
    put_text: &'a mut dyn FnMut(&str, &str),
    put_break: &'a mut dyn FnMut(),
}

impl CodeWriter<'_> {
    fn write_to(&mut self, to: usize, classes: &str) {
        if to <= self.pos {
            return;
        }
        let text = &self.code[self.pos..to];
        let mut i = 0;
        loop {
            match text[i..].find('\n') {
                Some(offset) => {
                    if offset > 0 {
                        (self.put_text)(&text[i..i + offset], classes);
                    }
                    (self.put_break)();
                    i += offset + 1;
                }
                None => {
                    if i < text.len() {
                        (self.put_text)(&text[i..], classes);
                    }
                    break;
                }
            }
        }
        self.pos = to;
    }
}
