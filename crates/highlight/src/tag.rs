// Chunk: docs/chunks/tag_algebra - Tags, modifiers, and canonical interning

//! The tag algebra.
//!
//! A [`Tag`] names a highlighting category. Tags form a forest: a tag defined
//! with a parent is more specific than the parent, and a style that has no
//! entry for a tag falls back along the parent chain. The chain is
//! precomputed as the tag's *set*: an ordered list starting at the tag itself
//! and ending at its most general ancestor, with specificity decreasing along
//! the list.
//!
//! A [`Modifier`] expresses an orthogonal attribute (such as "definition" or
//! "local") that can be applied to any unmodified tag. Modifier application
//! interns its result, so it is idempotent and commutative: applying the same
//! modifiers to the same base in any order yields the *same* tag, by
//! identity.
//!
//! Tags live for the process lifetime. `Tag` is a `Copy` handle; equality is
//! reference identity on the interned data.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use thiserror::Error;

static NEXT_TAG_ID: AtomicU32 = AtomicU32::new(0);
static NEXT_MODIFIER_ID: AtomicU32 = AtomicU32::new(0);

/// Serializes interning so a `(base, modifiers)` pair is only ever allocated
/// once. Taken at the non-recursive entry point only.
static INTERN_LOCK: Mutex<()> = Mutex::new(());

/// Error from [`Tag::define`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TagError {
    /// The parent passed to [`Tag::define`] is a modified tag.
    #[error("modified tags cannot be used as a parent")]
    InvalidParent,
}

struct TagData {
    id: u32,
    /// Present for the named vocabulary tags; used for display only.
    name: Option<&'static str>,
    /// The unmodified tag this one was derived from.
    base: Option<Tag>,
    /// Modifiers applied to `base`, in ascending-id order.
    modified: Vec<Modifier>,
    /// Fallback chain, starting with this tag itself. Filled once, right
    /// after allocation.
    set: OnceLock<Vec<Tag>>,
}

/// A highlighting category.
#[derive(Clone, Copy)]
pub struct Tag {
    data: &'static TagData,
}

impl Tag {
    /// Defines a new tag, optionally as a child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidParent`] when `parent` is a modified tag;
    /// only unmodified tags can be given children.
    pub fn define(parent: Option<Tag>) -> Result<Tag, TagError> {
        if parent.is_some_and(|p| p.base().is_some()) {
            return Err(TagError::InvalidParent);
        }
        Ok(Self::define_inner(None, parent))
    }

    /// Allocates a new modifier.
    pub fn define_modifier() -> Modifier {
        Modifier {
            data: Box::leak(Box::new(ModifierData {
                id: NEXT_MODIFIER_ID.fetch_add(1, Ordering::Relaxed),
                instances: Mutex::new(Vec::new()),
            })),
        }
    }

    /// Infallible definition for callers that guarantee an unmodified parent
    /// (the vocabulary builder).
    pub(crate) fn define_inner(name: Option<&'static str>, parent: Option<Tag>) -> Tag {
        debug_assert!(parent.is_none_or(|p| p.base().is_none()));
        let tag = Self::alloc(name, None, Vec::new());
        let mut set = vec![tag];
        if let Some(parent) = parent {
            set.extend_from_slice(parent.set());
        }
        tag.data.set.set(set).expect("fresh tag has no set");
        tag
    }

    fn alloc(name: Option<&'static str>, base: Option<Tag>, modified: Vec<Modifier>) -> Tag {
        Tag {
            data: Box::leak(Box::new(TagData {
                id: NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed),
                name,
                base,
                modified,
                set: OnceLock::new(),
            })),
        }
    }

    /// A process-unique id, usable as a cache key.
    pub fn id(&self) -> u32 {
        self.data.id
    }

    /// The fallback chain: this tag first, most general ancestor last.
    pub fn set(&self) -> &'static [Tag] {
        self.data
            .set
            .get()
            .expect("tag set is filled at construction")
    }

    /// The unmodified tag this one was derived from, if this tag is
    /// modified.
    pub fn base(&self) -> Option<Tag> {
        self.data.base
    }

    /// The modifiers applied to [`base`](Self::base), in canonical order.
    pub fn modifiers(&self) -> &'static [Modifier] {
        &self.data.modified
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data)
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.id.hash(state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.data.name, self.data.base) {
            (Some(name), _) => write!(f, "{name}"),
            (None, Some(base)) => {
                for m in &self.data.modified {
                    write!(f, "mod{}(", m.data.id)?;
                }
                write!(f, "{base:?}")?;
                for _ in &self.data.modified {
                    write!(f, ")")?;
                }
                Ok(())
            }
            (None, None) => write!(f, "tag{}", self.data.id),
        }
    }
}

struct ModifierData {
    id: u32,
    /// Every modified tag this modifier participates in.
    instances: Mutex<Vec<Tag>>,
}

/// An orthogonal attribute applicable to tags.
///
/// Created with [`Tag::define_modifier`]. Application is idempotent and
/// commutative; see the module docs.
#[derive(Clone, Copy)]
pub struct Modifier {
    data: &'static ModifierData,
}

impl Modifier {
    /// Applies this modifier to `tag`, returning the canonical tag for the
    /// resulting `(base, modifier-set)` pair.
    pub fn apply(&self, tag: Tag) -> Tag {
        if tag.modifiers().contains(self) {
            return tag;
        }
        let base = tag.base().unwrap_or(tag);
        let mut mods: Vec<Modifier> = tag.modifiers().to_vec();
        mods.push(*self);
        mods.sort_by_key(|m| m.data.id);
        let _guard = INTERN_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Self::get(base, &mods)
    }

    /// Returns the interned tag for `(base, mods)`, allocating it (and any
    /// smaller-subset tags its fallback chain needs) on first use.
    ///
    /// The new tag is registered in every member modifier's instance table
    /// *before* its set is built, so the recursive call for the full subset
    /// resolves to the tag itself and the chain starts with it.
    fn get(base: Tag, mods: &[Modifier]) -> Tag {
        if mods.is_empty() {
            return base;
        }
        {
            let instances = mods[0]
                .data
                .instances
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(&existing) = instances
                .iter()
                .find(|t| t.base() == Some(base) && t.modifiers() == mods)
            {
                return existing;
            }
        }

        let tag = Tag::alloc(None, Some(base), mods.to_vec());
        for m in mods {
            m.data
                .instances
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(tag);
        }

        let configs = nonempty_subsets(mods);
        let mut set = Vec::with_capacity(base.set().len() * configs.len() + 1);
        for &ancestor in base.set() {
            for config in &configs {
                set.push(Self::get(ancestor, config));
            }
        }
        set.push(base);
        tag.data.set.set(set).expect("fresh tag has no set");
        tag
    }
}

impl PartialEq for Modifier {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data)
    }
}

impl Eq for Modifier {}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifier({})", self.data.id)
    }
}

/// Every non-empty subset of `mods`, largest subsets first. The ordering is
/// the source of fallback determinism for modified tags.
fn nonempty_subsets(mods: &[Modifier]) -> Vec<Vec<Modifier>> {
    fn subsets(mods: &[Modifier]) -> Vec<Vec<Modifier>> {
        match mods.split_first() {
            None => vec![Vec::new()],
            Some((&first, rest)) => {
                let mut out = Vec::new();
                for sub in subsets(rest) {
                    let mut with = Vec::with_capacity(sub.len() + 1);
                    with.push(first);
                    with.extend_from_slice(&sub);
                    out.push(with);
                    out.push(sub);
                }
                out
            }
        }
    }
    let mut out: Vec<_> = subsets(mods).into_iter().filter(|s| !s.is_empty()).collect();
    out.sort_by_key(|s| std::cmp::Reverse(s.len()));
    out
}
