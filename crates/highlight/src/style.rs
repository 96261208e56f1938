// Chunk: docs/chunks/style_resolution - Tag-to-class resolution with scope and fallback

//! Highlight styles.
//!
//! A [`HighlightStyle`] maps tags to class strings. Lookup walks the tag's
//! fallback chain, so a style that only mentions `comment` also covers
//! `lineComment`; results (including misses) are memoized by tag id, and the
//! cache is monotonic — once resolved, a tag's class never changes.
//!
//! A style may be *scoped* to one language's top node type, in which case it
//! only answers for that language, and may carry an `all` class added to
//! every token it styles.
//!
//! [`HighlightStyle::combined_match`] merges several styles into one
//! [`StyleMatcher`], concatenating each style's answer in order. This is how
//! a host highlights a document containing mounted languages with
//! per-language styles.

use crate::tag::Tag;
use canopy_tree::NodeType;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// The seam between the highlighter and style resolution: anything that can
/// answer "which class does this tag get, in this language scope?".
pub trait StyleMatcher {
    /// Resolves `tag` to a class string, or `None` when this matcher has no
    /// styling for it. `scope` is the top node type of the language the tag
    /// occurred in.
    fn matched_class(&self, tag: Tag, scope: NodeType) -> Option<String>;
}

/// One entry of a style definition: a set of tags and the class they map to.
#[derive(Debug, Clone)]
pub struct StyleSpec {
    tags: Vec<Tag>,
    class: Option<String>,
}

impl StyleSpec {
    /// Maps `tags` to an explicit class string.
    pub fn new(tags: impl Into<Vec<Tag>>, class: impl Into<String>) -> StyleSpec {
        StyleSpec {
            tags: tags.into(),
            class: Some(class.into()),
        }
    }

    /// Maps `tags` to a freshly synthesized, process-unique class name.
    /// Useful when the caller registers the actual styling (CSS or
    /// otherwise) elsewhere and only needs a stable name here.
    pub fn synthesized(tags: impl Into<Vec<Tag>>) -> StyleSpec {
        StyleSpec {
            tags: tags.into(),
            class: None,
        }
    }
}

/// Options for [`HighlightStyle::define`].
#[derive(Debug, Clone, Default)]
pub struct StyleOptions {
    /// Restricts the style to the language whose top node type this is.
    pub scope: Option<NodeType>,
    /// A class added to every token this style matches.
    pub all: Option<String>,
}

/// A tag-to-class style map.
pub struct HighlightStyle {
    /// Seeded from the specs at construction; extended by memoized lookups
    /// (`None` records a known miss). Monotonic.
    map: Mutex<FxHashMap<u32, Option<String>>>,
    scope: Option<NodeType>,
    all: Option<String>,
}

static NEXT_CLASS: AtomicUsize = AtomicUsize::new(1);

fn synthesized_class() -> String {
    format!("hl-{}", NEXT_CLASS.fetch_add(1, Ordering::Relaxed))
}

impl HighlightStyle {
    /// Builds a style from [`StyleSpec`] entries. Later entries override
    /// earlier ones for the same tag.
    pub fn define(
        specs: impl IntoIterator<Item = StyleSpec>,
        options: StyleOptions,
    ) -> HighlightStyle {
        let mut map = FxHashMap::default();
        for spec in specs {
            let class = spec.class.unwrap_or_else(synthesized_class);
            let class = match &options.all {
                Some(all) => format!("{class} {all}"),
                None => class,
            };
            for tag in spec.tags {
                map.insert(tag.id(), Some(class.clone()));
            }
        }
        HighlightStyle {
            map: Mutex::new(map),
            scope: options.scope,
            all: options.all,
        }
    }

    /// The language scope this style is restricted to, if any.
    pub fn scope(&self) -> Option<NodeType> {
        self.scope
    }

    /// Builds a matcher over several styles. Each tag resolves to the
    /// space-joined concatenation of every style's non-null answer, in style
    /// order.
    ///
    /// When none of the styles is scoped the combined result is cached by
    /// tag id; with scoped styles the scope is part of the key and rarely
    /// repeats, so no cache is kept.
    pub fn combined_match<'a>(styles: &'a [&'a HighlightStyle]) -> CombinedMatcher<'a> {
        let cache = styles
            .iter()
            .all(|s| s.scope.is_none())
            .then(|| Mutex::new(FxHashMap::default()));
        CombinedMatcher { styles, cache }
    }
}

impl StyleMatcher for HighlightStyle {
    fn matched_class(&self, tag: Tag, scope: NodeType) -> Option<String> {
        if let Some(own) = self.scope {
            if own != scope {
                return None;
            }
        }
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = map.get(&tag.id()) {
            return cached.clone();
        }
        // Walk the fallback chain; the first entry (positive or negative)
        // wins. Misses fall through to the style's `all` class.
        let resolved = match tag
            .set()
            .iter()
            .find_map(|ancestor| map.get(&ancestor.id()).cloned())
        {
            Some(entry) => entry,
            None => self.all.clone(),
        };
        map.insert(tag.id(), resolved.clone());
        resolved
    }
}

/// A matcher over several styles; see [`HighlightStyle::combined_match`].
pub struct CombinedMatcher<'a> {
    styles: &'a [&'a HighlightStyle],
    cache: Option<Mutex<FxHashMap<u32, Option<String>>>>,
}

impl StyleMatcher for CombinedMatcher<'_> {
    fn matched_class(&self, tag: Tag, scope: NodeType) -> Option<String> {
        if let Some(cache) = &self.cache {
            let cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.get(&tag.id()) {
                return cached.clone();
            }
        }
        let mut result: Option<String> = None;
        for style in self.styles {
            if let Some(class) = style.matched_class(tag, scope) {
                match &mut result {
                    Some(joined) => {
                        joined.push(' ');
                        joined.push_str(&class);
                    }
                    None => result = Some(class),
                }
            }
        }
        if let Some(cache) = &self.cache {
            cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(tag.id(), result.clone());
        }
        result
    }
}
