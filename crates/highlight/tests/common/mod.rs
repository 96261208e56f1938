//! Shared test support: a small lisp-ish toy language and an outer wrapper
//! language that mounts it.
//!
//! The toy grammar: lowercase identifiers, capitalized local identifiers,
//! `"…"` strings with `\x` escapes, `(...)` lists, `{...}` arrays (styled as
//! one opaque atom), `{{ key => form ... }}` maps, `<...*emph*...>` tags
//! whose contents inherit the literal style, and `;` line comments.
//!
//! The parser can lex across a list of byte ranges while reporting host
//! offsets, which is how an overlay-mounted inner tree (whose nodes may span
//! the gaps between mount holes) is produced for the tests.

#![allow(dead_code)]

use canopy_highlight::{style_tags, tags, StyleMatcher};
use canopy_tree::{NodeSet, NodeType, Tree};
use std::ops::RangeBounds;
use std::sync::OnceLock;

// =============================================================================
// Toy language definition
// =============================================================================

pub struct ToyLanguage {
    pub set: NodeSet,
    pub document: NodeType,
    pub identifier: NodeType,
    pub local_identifier: NodeType,
    pub string: NodeType,
    pub escape: NodeType,
    pub comment: NodeType,
    pub list: NodeType,
    pub lparen: NodeType,
    pub rparen: NodeType,
    pub array: NodeType,
    pub lbrace: NodeType,
    pub rbrace: NodeType,
    pub map: NodeType,
    pub lmap: NodeType,
    pub rmap: NodeType,
    pub key: NodeType,
    pub arrow: NodeType,
    pub tag: NodeType,
    pub langle: NodeType,
    pub rangle: NodeType,
    pub emphasis: NodeType,
    pub text: NodeType,
}

pub fn toy() -> &'static ToyLanguage {
    static TOY: OnceLock<ToyLanguage> = OnceLock::new();
    TOY.get_or_init(|| {
        let t = tags();
        let set = NodeSet::new([
            NodeType::define_top("Document"),
            NodeType::define("Identifier"),
            NodeType::define("LocalIdentifier"),
            NodeType::define("String"),
            NodeType::define("Escape"),
            NodeType::define("Comment"),
            NodeType::define("List"),
            NodeType::define("("),
            NodeType::define(")"),
            NodeType::define("Array"),
            NodeType::define("{"),
            NodeType::define("}"),
            NodeType::define("Map"),
            NodeType::define("{{"),
            NodeType::define("}}"),
            NodeType::define("Key"),
            NodeType::define("=>"),
            NodeType::define("Tag"),
            NodeType::define("<"),
            NodeType::define(">"),
            NodeType::define("Emphasis"),
            NodeType::define("Text"),
        ]);
        let set = set.extend(&[style_tags(&[
            ("Identifier", &[t.variable_name]),
            ("LocalIdentifier", &[t.local.apply(t.variable_name)]),
            ("String", &[t.string]),
            ("Escape", &[t.escape]),
            ("Comment", &[t.line_comment]),
            ("\"(\" \")\"", &[t.paren]),
            ("Array!", &[t.atom]),
            ("\"{\" \"}\"", &[t.brace]),
            ("\"{{\" \"}}\"", &[t.brace]),
            ("Key/Identifier", &[t.property_name]),
            ("\"=>\"", &[t.definition_operator]),
            ("Tag/...", &[t.literal]),
            ("\"<\" \">\"", &[t.angle_bracket]),
            ("Emphasis", &[t.emphasis]),
        ])
        .expect("toy selectors are valid")]);

        let named = |name: &str| set.type_named(name).expect("toy type exists");
        ToyLanguage {
            document: named("Document"),
            identifier: named("Identifier"),
            local_identifier: named("LocalIdentifier"),
            string: named("String"),
            escape: named("Escape"),
            comment: named("Comment"),
            list: named("List"),
            lparen: named("("),
            rparen: named(")"),
            array: named("Array"),
            lbrace: named("{"),
            rbrace: named("}"),
            map: named("Map"),
            lmap: named("{{"),
            rmap: named("}}"),
            key: named("Key"),
            arrow: named("=>"),
            tag: named("Tag"),
            langle: named("<"),
            rangle: named(">"),
            emphasis: named("Emphasis"),
            text: named("Text"),
            set,
        }
    })
}

// =============================================================================
// Toy parser
// =============================================================================

/// Parses a whole document.
pub fn parse(text: &str) -> Tree {
    parse_ranges(text, &[(0, text.len())], text.len())
}

/// Parses only the given ranges of `text`, producing a document of `length`
/// whose node positions are host offsets. Tokens continue across range
/// boundaries.
pub fn parse_ranges(text: &str, ranges: &[(usize, usize)], length: usize) -> Tree {
    let lang = toy();
    let mut s = Scanner::new(text, ranges);
    let mut children = Vec::new();
    loop {
        skip_trivia(&mut s);
        if s.peek().is_none() {
            break;
        }
        match parse_form(&mut s) {
            Some((pos, tree)) => children.push((pos, tree)),
            // Stray terminator at the top level.
            None => {
                s.bump();
            }
        }
    }
    node(lang.document, 0, length, children)
}

struct Scanner {
    /// `(host offset, char)` for every char inside the parsed ranges.
    chars: Vec<(usize, char)>,
    index: usize,
    end: usize,
}

impl Scanner {
    fn new(text: &str, ranges: &[(usize, usize)]) -> Scanner {
        let mut chars = Vec::new();
        for &(from, to) in ranges {
            for (i, ch) in text[from..to].char_indices() {
                chars.push((from + i, ch));
            }
        }
        Scanner {
            chars,
            index: 0,
            end: ranges.last().map_or(0, |r| r.1),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|&(_, c)| c)
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.index + 1).map(|&(_, c)| c)
    }

    fn pos(&self) -> usize {
        self.chars.get(self.index).map_or(self.end, |&(p, _)| p)
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.chars.get(self.index).copied();
        if next.is_some() {
            self.index += 1;
        }
        next
    }
}

/// Builds a tree from host-offset children.
fn node(ty: NodeType, from: usize, to: usize, children: Vec<(usize, Tree)>) -> Tree {
    Tree::new(
        ty,
        to - from,
        children
            .into_iter()
            .map(|(pos, child)| (pos - from, child))
            .collect(),
    )
}

fn skip_trivia(s: &mut Scanner) {
    while matches!(s.peek(), Some(' ' | '\n' | '\t')) {
        s.bump();
    }
}

/// Parses one form. Returns `None` (consuming nothing) at end of input or on
/// a closing delimiter, which the enclosing form handles.
fn parse_form(s: &mut Scanner) -> Option<(usize, Tree)> {
    let lang = toy();
    skip_trivia(s);
    match s.peek()? {
        ')' | '}' | '>' => None,
        ';' => Some(parse_comment(s)),
        '"' => Some(parse_string(s)),
        '(' => Some(parse_list(s)),
        '{' if s.peek2() == Some('{') => Some(parse_map(s)),
        '{' => Some(parse_array(s)),
        '<' => Some(parse_tag(s)),
        c if c.is_ascii_lowercase() => Some(parse_identifier(s)),
        c if c.is_ascii_uppercase() => {
            let (start, _) = s.bump().expect("peeked");
            let mut end = start + 1;
            while s.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
                let (p, _) = s.bump().expect("peeked");
                end = p + 1;
            }
            Some((start, node(lang.local_identifier, start, end, Vec::new())))
        }
        _ => {
            // Unknown character; skip it and carry on.
            s.bump();
            parse_form(s)
        }
    }
}

fn parse_identifier(s: &mut Scanner) -> (usize, Tree) {
    let lang = toy();
    let (start, _) = s.bump().expect("peeked");
    let mut end = start + 1;
    while s.peek().is_some_and(|c| c.is_ascii_lowercase()) {
        let (p, _) = s.bump().expect("peeked");
        end = p + 1;
    }
    (start, node(lang.identifier, start, end, Vec::new()))
}

fn parse_comment(s: &mut Scanner) -> (usize, Tree) {
    let lang = toy();
    let (start, _) = s.bump().expect("peeked");
    let mut end = start + 1;
    while s.peek().is_some_and(|c| c != '\n') {
        let (p, _) = s.bump().expect("peeked");
        end = p + 1;
    }
    (start, node(lang.comment, start, end, Vec::new()))
}

fn parse_string(s: &mut Scanner) -> (usize, Tree) {
    let lang = toy();
    let (start, _) = s.bump().expect("peeked");
    let mut end = start + 1;
    let mut escapes = Vec::new();
    while let Some((p, c)) = s.bump() {
        end = p + 1;
        match c {
            '\\' => {
                if let Some((p2, _)) = s.bump() {
                    end = p2 + 1;
                    escapes.push((p, node(lang.escape, p, p2 + 1, Vec::new())));
                }
            }
            '"' => break,
            _ => {}
        }
    }
    (start, node(lang.string, start, end, escapes))
}

fn parse_list(s: &mut Scanner) -> (usize, Tree) {
    let lang = toy();
    parse_delimited(s, lang.list, lang.lparen, lang.rparen, ')')
}

fn parse_array(s: &mut Scanner) -> (usize, Tree) {
    let lang = toy();
    parse_delimited(s, lang.array, lang.lbrace, lang.rbrace, '}')
}

fn parse_delimited(
    s: &mut Scanner,
    container: NodeType,
    open: NodeType,
    close: NodeType,
    closer: char,
) -> (usize, Tree) {
    let (start, _) = s.bump().expect("peeked");
    let mut children = vec![(start, Tree::leaf(open, 1))];
    let mut end = start + 1;
    loop {
        skip_trivia(s);
        match s.peek() {
            None => break,
            Some(c) if c == closer => {
                let (p, _) = s.bump().expect("peeked");
                children.push((p, Tree::leaf(close, 1)));
                end = p + 1;
                break;
            }
            _ => match parse_form(s) {
                Some((pos, tree)) => {
                    end = pos + tree.length();
                    children.push((pos, tree));
                }
                None => break,
            },
        }
    }
    (start, node(container, start, end, children))
}

fn parse_map(s: &mut Scanner) -> (usize, Tree) {
    let lang = toy();
    let (start, _) = s.bump().expect("peeked");
    s.bump();
    let mut children = vec![(start, Tree::leaf(lang.lmap, 2))];
    let mut end = start + 2;
    loop {
        skip_trivia(s);
        match s.peek() {
            None => break,
            Some('}') if s.peek2() == Some('}') => {
                let (p, _) = s.bump().expect("peeked");
                s.bump();
                children.push((p, Tree::leaf(lang.rmap, 2)));
                end = p + 2;
                break;
            }
            Some(c) if c.is_ascii_lowercase() => {
                let (key_pos, ident) = parse_identifier(s);
                let key_end = key_pos + ident.length();
                children.push((
                    key_pos,
                    node(lang.key, key_pos, key_end, vec![(key_pos, ident)]),
                ));
                end = key_end;
                skip_trivia(s);
                if s.peek() == Some('=') && s.peek2() == Some('>') {
                    let (p, _) = s.bump().expect("peeked");
                    s.bump();
                    children.push((p, Tree::leaf(lang.arrow, 2)));
                    end = p + 2;
                }
                if let Some((pos, tree)) = parse_form(s) {
                    end = pos + tree.length();
                    children.push((pos, tree));
                }
            }
            _ => match parse_form(s) {
                Some((pos, tree)) => {
                    end = pos + tree.length();
                    children.push((pos, tree));
                }
                None => break,
            },
        }
    }
    (start, node(lang.map, start, end, children))
}

fn parse_tag(s: &mut Scanner) -> (usize, Tree) {
    let lang = toy();
    let (start, _) = s.bump().expect("peeked");
    let mut children = vec![(start, Tree::leaf(lang.langle, 1))];
    let mut end = start + 1;
    loop {
        match s.peek() {
            None => break,
            Some('>') => {
                let (p, _) = s.bump().expect("peeked");
                children.push((p, Tree::leaf(lang.rangle, 1)));
                end = p + 1;
                break;
            }
            Some('*') => {
                let (emph_start, _) = s.bump().expect("peeked");
                let mut emph_end = emph_start + 1;
                while let Some(c) = s.peek() {
                    if c == '>' {
                        break;
                    }
                    let (p, _) = s.bump().expect("peeked");
                    emph_end = p + 1;
                    if c == '*' {
                        break;
                    }
                }
                children.push((
                    emph_start,
                    node(lang.emphasis, emph_start, emph_end, Vec::new()),
                ));
                end = emph_end;
            }
            Some(_) => {
                let text_start = s.pos();
                let mut text_end = text_start;
                while let Some(c) = s.peek() {
                    if c == '*' || c == '>' {
                        break;
                    }
                    let (p, _) = s.bump().expect("peeked");
                    text_end = p + 1;
                }
                children.push((text_start, node(lang.text, text_start, text_end, Vec::new())));
                end = text_end;
            }
        }
    }
    (start, node(lang.tag, start, end, children))
}

// =============================================================================
// Wrapper language (mount host)
// =============================================================================

pub struct WrapperLanguage {
    pub set: NodeSet,
    pub wrapper: NodeType,
    pub lbrace: NodeType,
    pub rbrace: NodeType,
}

pub fn wrapper() -> &'static WrapperLanguage {
    static WRAPPER: OnceLock<WrapperLanguage> = OnceLock::new();
    WRAPPER.get_or_init(|| {
        let t = tags();
        let set = NodeSet::new([
            NodeType::define_top("Wrapper"),
            NodeType::define("{"),
            NodeType::define("}"),
        ]);
        let set = set.extend(&[
            style_tags(&[("\"{\" \"}\"", &[t.meta])]).expect("wrapper selectors are valid")
        ]);
        WrapperLanguage {
            wrapper: set.type_named("Wrapper").expect("type exists"),
            lbrace: set.type_named("{").expect("type exists"),
            rbrace: set.type_named("}").expect("type exists"),
            set,
        }
    })
}

/// Parses the wrapper language: braces are structure, everything else at
/// brace depth one is an interpolation hole for the inner language. Returns
/// the (unmounted) outer tree and the hole ranges.
pub fn parse_wrapper(text: &str) -> (Tree, Vec<(usize, usize)>) {
    let lang = wrapper();
    let mut children = Vec::new();
    let mut holes = Vec::new();
    let mut depth = 0usize;
    let mut hole_start = None;
    for (pos, ch) in text.char_indices() {
        match ch {
            '{' => {
                children.push((pos, Tree::leaf(lang.lbrace, 1)));
                depth += 1;
                if depth == 2 {
                    hole_start = Some(pos + 1);
                }
            }
            '}' => {
                if let Some(start) = hole_start.take() {
                    holes.push((start, pos));
                }
                children.push((pos, Tree::leaf(lang.rbrace, 1)));
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }
    (Tree::new(lang.wrapper, text.len(), children), holes)
}

// =============================================================================
// Span collection and invariants
// =============================================================================

pub fn collect_spans(
    tree: &Tree,
    matcher: &dyn StyleMatcher,
    range: impl RangeBounds<usize>,
) -> Vec<(usize, usize, String)> {
    let mut spans = Vec::new();
    canopy_highlight::highlight_tree(tree, matcher, range, |from, to, classes| {
        spans.push((from, to, classes.to_string()));
    });
    spans
}

/// Checks the span emission invariants: in-range, positive length, sorted,
/// disjoint, and no two touching spans with the same class.
pub fn check_span_invariants(spans: &[(usize, usize, String)], from: usize, to: usize) {
    for (span_from, span_to, classes) in spans {
        assert!(span_from < span_to, "span {span_from}..{span_to} has positive length");
        assert!(
            *span_from >= from && *span_to <= to,
            "span {span_from}..{span_to} lies within {from}..{to}"
        );
        assert!(!classes.is_empty(), "span {span_from}..{span_to} has a class");
    }
    for pair in spans.windows(2) {
        let (a_from, a_to, a_classes) = &pair[0];
        let (b_from, _, b_classes) = &pair[1];
        assert!(a_to <= b_from, "spans {a_from}..{a_to} and {b_from}.. are disjoint and sorted");
        if a_to == b_from {
            assert_ne!(
                a_classes, b_classes,
                "touching spans at {a_to} must differ in class"
            );
        }
    }
}

/// Convenience for asserting an expected span sequence.
pub fn assert_spans(actual: &[(usize, usize, String)], expected: &[(usize, usize, &str)]) {
    let expected: Vec<(usize, usize, String)> = expected
        .iter()
        .map(|&(f, t, c)| (f, t, c.to_string()))
        .collect();
    assert_eq!(actual, &expected[..]);
}
