// Chunk: docs/chunks/tag_vocabulary - The closed tag vocabulary and class preset

//! The standard tag vocabulary.
//!
//! [`tags()`] exposes the closed, hierarchical set of highlighting categories
//! languages are expected to use: comments, names, literals, keywords,
//! operators, punctuation, document content, and change/meta categories,
//! plus the six standard modifiers. Language authors pick from this
//! vocabulary in their [`style_tags`](crate::style_tags) tables; theme
//! authors map it to classes, relying on the parent chains for fallback
//! (a theme that styles `comment` covers `line_comment` too).
//!
//! [`class_highlighter()`] is the preset style mapping each category to a
//! stable `cmt-` class name, for hosts that style via CSS.

use crate::style::{HighlightStyle, StyleOptions, StyleSpec};
use crate::tag::{Modifier, Tag};
use std::sync::OnceLock;

/// The standard highlighting tags.
///
/// Obtained from [`tags()`]. Fields are grouped by their parent: e.g.
/// `line_comment`, `block_comment` and `doc_comment` are children of
/// `comment`, and all the bracket tags are children of `bracket`, itself a
/// child of `punctuation`.
#[allow(missing_docs)]
pub struct Tags {
    // Comments.
    pub comment: Tag,
    pub line_comment: Tag,
    pub block_comment: Tag,
    pub doc_comment: Tag,

    // Names.
    pub name: Tag,
    pub variable_name: Tag,
    pub type_name: Tag,
    pub tag_name: Tag,
    pub property_name: Tag,
    pub attribute_name: Tag,
    pub class_name: Tag,
    pub label_name: Tag,
    pub namespace: Tag,
    pub macro_name: Tag,

    // Literals.
    pub literal: Tag,
    pub string: Tag,
    pub doc_string: Tag,
    pub character: Tag,
    pub attribute_value: Tag,
    pub number: Tag,
    pub integer: Tag,
    pub float: Tag,
    pub bool: Tag,
    pub regexp: Tag,
    pub escape: Tag,
    pub color: Tag,
    pub url: Tag,

    // Keywords. `self_keyword` is the tag for `self`/`this`-style keywords.
    pub keyword: Tag,
    pub self_keyword: Tag,
    pub null: Tag,
    pub atom: Tag,
    pub unit: Tag,
    pub modifier: Tag,
    pub operator_keyword: Tag,
    pub control_keyword: Tag,
    pub definition_keyword: Tag,
    pub module_keyword: Tag,

    // Operators.
    pub operator: Tag,
    pub deref_operator: Tag,
    pub arithmetic_operator: Tag,
    pub logic_operator: Tag,
    pub bitwise_operator: Tag,
    pub compare_operator: Tag,
    pub update_operator: Tag,
    pub definition_operator: Tag,
    pub type_operator: Tag,
    pub control_operator: Tag,

    // Punctuation.
    pub punctuation: Tag,
    pub separator: Tag,
    pub bracket: Tag,
    pub angle_bracket: Tag,
    pub square_bracket: Tag,
    pub paren: Tag,
    pub brace: Tag,

    // Document content.
    pub content: Tag,
    pub heading: Tag,
    pub heading1: Tag,
    pub heading2: Tag,
    pub heading3: Tag,
    pub heading4: Tag,
    pub heading5: Tag,
    pub heading6: Tag,
    pub content_separator: Tag,
    pub list: Tag,
    pub quote: Tag,
    pub emphasis: Tag,
    pub strong: Tag,
    pub link: Tag,
    pub monospace: Tag,
    pub strikethrough: Tag,

    // Changes.
    pub inserted: Tag,
    pub deleted: Tag,
    pub changed: Tag,

    // Oddballs.
    pub invalid: Tag,
    pub meta: Tag,
    pub document_meta: Tag,
    pub annotation: Tag,
    pub processing_instruction: Tag,

    // Modifiers.
    pub definition: Modifier,
    pub constant: Modifier,
    pub function: Modifier,
    pub standard: Modifier,
    pub local: Modifier,
    pub special: Modifier,
}

/// The standard tag vocabulary. Built once; every call returns the same
/// tags.
pub fn tags() -> &'static Tags {
    static TAGS: OnceLock<Tags> = OnceLock::new();
    TAGS.get_or_init(build_tags)
}

fn build_tags() -> Tags {
    let t = |name, parent| Tag::define_inner(Some(name), parent);

    let comment = t("comment", None);
    let name = t("name", None);
    let literal = t("literal", None);
    let string = t("string", Some(literal));
    let number = t("number", Some(literal));
    let keyword = t("keyword", None);
    let operator = t("operator", None);
    let punctuation = t("punctuation", None);
    let bracket = t("bracket", Some(punctuation));
    let content = t("content", None);
    let heading = t("heading", Some(content));
    let meta = t("meta", None);
    let type_name = t("typeName", Some(name));

    Tags {
        comment,
        line_comment: t("lineComment", Some(comment)),
        block_comment: t("blockComment", Some(comment)),
        doc_comment: t("docComment", Some(comment)),

        name,
        variable_name: t("variableName", Some(name)),
        type_name,
        tag_name: t("tagName", Some(type_name)),
        property_name: t("propertyName", Some(name)),
        attribute_name: t("attributeName", Some(name)),
        class_name: t("className", Some(name)),
        label_name: t("labelName", Some(name)),
        namespace: t("namespace", Some(name)),
        macro_name: t("macroName", Some(name)),

        literal,
        string,
        doc_string: t("docString", Some(string)),
        character: t("character", Some(string)),
        attribute_value: t("attributeValue", Some(string)),
        number,
        integer: t("integer", Some(number)),
        float: t("float", Some(number)),
        bool: t("bool", Some(literal)),
        regexp: t("regexp", Some(literal)),
        escape: t("escape", Some(literal)),
        color: t("color", Some(literal)),
        url: t("url", Some(literal)),

        keyword,
        self_keyword: t("self", Some(keyword)),
        null: t("null", Some(keyword)),
        atom: t("atom", Some(keyword)),
        unit: t("unit", Some(keyword)),
        modifier: t("modifier", Some(keyword)),
        operator_keyword: t("operatorKeyword", Some(keyword)),
        control_keyword: t("controlKeyword", Some(keyword)),
        definition_keyword: t("definitionKeyword", Some(keyword)),
        module_keyword: t("moduleKeyword", Some(keyword)),

        operator,
        deref_operator: t("derefOperator", Some(operator)),
        arithmetic_operator: t("arithmeticOperator", Some(operator)),
        logic_operator: t("logicOperator", Some(operator)),
        bitwise_operator: t("bitwiseOperator", Some(operator)),
        compare_operator: t("compareOperator", Some(operator)),
        update_operator: t("updateOperator", Some(operator)),
        definition_operator: t("definitionOperator", Some(operator)),
        type_operator: t("typeOperator", Some(operator)),
        control_operator: t("controlOperator", Some(operator)),

        punctuation,
        separator: t("separator", Some(punctuation)),
        bracket,
        angle_bracket: t("angleBracket", Some(bracket)),
        square_bracket: t("squareBracket", Some(bracket)),
        paren: t("paren", Some(bracket)),
        brace: t("brace", Some(bracket)),

        content,
        heading,
        heading1: t("heading1", Some(heading)),
        heading2: t("heading2", Some(heading)),
        heading3: t("heading3", Some(heading)),
        heading4: t("heading4", Some(heading)),
        heading5: t("heading5", Some(heading)),
        heading6: t("heading6", Some(heading)),
        content_separator: t("contentSeparator", Some(content)),
        list: t("list", Some(content)),
        quote: t("quote", Some(content)),
        emphasis: t("emphasis", Some(content)),
        strong: t("strong", Some(content)),
        link: t("link", Some(content)),
        monospace: t("monospace", Some(content)),
        strikethrough: t("strikethrough", Some(content)),

        inserted: t("inserted", None),
        deleted: t("deleted", None),
        changed: t("changed", None),

        invalid: t("invalid", None),
        meta,
        document_meta: t("documentMeta", Some(meta)),
        annotation: t("annotation", Some(meta)),
        processing_instruction: t("processingInstruction", Some(meta)),

        definition: Tag::define_modifier(),
        constant: Tag::define_modifier(),
        function: Tag::define_modifier(),
        standard: Tag::define_modifier(),
        local: Tag::define_modifier(),
        special: Tag::define_modifier(),
    }
}

/// The preset style mapping each vocabulary tag to a stable `cmt-` class.
///
/// Most tags map to `cmt-<tagname>` through the fallback chains; a handful
/// of composite mappings exist (e.g. `regexp`, `escape` and
/// `special(string)` all resolve to `cmt-string2`).
pub fn class_highlighter() -> &'static HighlightStyle {
    static STYLE: OnceLock<HighlightStyle> = OnceLock::new();
    STYLE.get_or_init(|| {
        let t = tags();
        HighlightStyle::define(
            [
                StyleSpec::new([t.link], "cmt-link"),
                StyleSpec::new([t.heading], "cmt-heading"),
                StyleSpec::new([t.emphasis], "cmt-emphasis"),
                StyleSpec::new([t.strong], "cmt-strong"),
                StyleSpec::new([t.keyword], "cmt-keyword"),
                StyleSpec::new([t.atom], "cmt-atom"),
                StyleSpec::new([t.bool], "cmt-bool"),
                StyleSpec::new([t.url], "cmt-url"),
                StyleSpec::new([t.label_name], "cmt-labelName"),
                StyleSpec::new([t.inserted], "cmt-inserted"),
                StyleSpec::new([t.deleted], "cmt-deleted"),
                StyleSpec::new([t.literal], "cmt-literal"),
                StyleSpec::new([t.string], "cmt-string"),
                StyleSpec::new([t.number], "cmt-number"),
                StyleSpec::new(
                    [t.regexp, t.escape, t.special.apply(t.string)],
                    "cmt-string2",
                ),
                StyleSpec::new([t.variable_name], "cmt-variableName"),
                StyleSpec::new(
                    [t.local.apply(t.variable_name)],
                    "cmt-variableName cmt-local",
                ),
                StyleSpec::new(
                    [t.definition.apply(t.variable_name)],
                    "cmt-variableName cmt-definition",
                ),
                StyleSpec::new([t.special.apply(t.variable_name)], "cmt-variableName2"),
                StyleSpec::new(
                    [t.definition.apply(t.property_name)],
                    "cmt-propertyName cmt-definition",
                ),
                StyleSpec::new([t.type_name], "cmt-typeName"),
                StyleSpec::new([t.namespace], "cmt-namespace"),
                StyleSpec::new([t.class_name], "cmt-className"),
                StyleSpec::new([t.macro_name], "cmt-macroName"),
                StyleSpec::new([t.property_name], "cmt-propertyName"),
                StyleSpec::new([t.operator], "cmt-operator"),
                StyleSpec::new([t.comment], "cmt-comment"),
                StyleSpec::new([t.meta], "cmt-meta"),
                StyleSpec::new([t.invalid], "cmt-invalid"),
                StyleSpec::new([t.punctuation], "cmt-punctuation"),
            ],
            StyleOptions::default(),
        )
    })
}
