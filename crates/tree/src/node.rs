// Chunk: docs/chunks/tree_model - Node types, node props, and language configuration

//! Node types and per-type properties.
//!
//! A language is described by a set of [`NodeType`]s. Node types are interned
//! for the lifetime of the process, so a `NodeType` is a cheap `Copy` handle
//! and two handles are the same type exactly when they point at the same
//! interned data.
//!
//! Arbitrary per-type data is attached through [`NodeProp`] keys. Props are
//! not added to a type in place: a [`NodeSet`] is extended with one or more
//! [`PropSource`]s during language configuration, producing a new set whose
//! types carry the additional props. Types that no source touches are reused
//! as-is.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_PROP_ID: AtomicU32 = AtomicU32::new(0);

struct NodeTypeData {
    name: String,
    top: bool,
    props: Vec<(u32, Arc<dyn Any + Send + Sync>)>,
}

/// A node type in a language's grammar.
///
/// Handles are `Copy`; equality is reference identity on the interned data.
/// The data lives for the process lifetime, so prop lookups hand out
/// `'static` references.
#[derive(Clone, Copy)]
pub struct NodeType {
    data: &'static NodeTypeData,
}

impl NodeType {
    /// Defines a new (non-top) node type with the given name.
    pub fn define(name: impl Into<String>) -> NodeType {
        Self::alloc(name.into(), false)
    }

    /// Defines a new top node type (the root of a language).
    pub fn define_top(name: impl Into<String>) -> NodeType {
        Self::alloc(name.into(), true)
    }

    fn alloc(name: String, top: bool) -> NodeType {
        NodeType {
            data: Box::leak(Box::new(NodeTypeData {
                name,
                top,
                props: Vec::new(),
            })),
        }
    }

    /// The name of this node type.
    pub fn name(&self) -> &'static str {
        &self.data.name
    }

    /// Whether this type is the top node of a language.
    pub fn is_top(&self) -> bool {
        self.data.top
    }

    /// Looks up the value attached to this type under `prop`, if any.
    pub fn prop<T: Send + Sync + 'static>(&self, prop: &NodeProp<T>) -> Option<&'static T> {
        let data: &'static NodeTypeData = self.data;
        data.props
            .iter()
            .find(|(id, _)| *id == prop.id)
            .and_then(|(_, value)| value.downcast_ref::<T>())
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data)
    }
}

impl Eq for NodeType {}

impl Hash for NodeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.data as *const NodeTypeData as usize).hash(state);
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeType({})", self.data.name)
    }
}

/// A typed key for attaching data to node types.
///
/// Each `NodeProp` has a distinct id; the value type is checked at lookup
/// time, so a prop created for `T` can only ever yield `T` values.
pub struct NodeProp<T> {
    id: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> NodeProp<T> {
    /// Allocates a fresh prop key.
    pub fn new() -> NodeProp<T> {
        NodeProp {
            id: NEXT_PROP_ID.fetch_add(1, Ordering::Relaxed),
            _marker: PhantomData,
        }
    }

    /// Builds a [`PropSource`] that attaches `source(type)` under this prop
    /// for every type the function returns a value for.
    pub fn add(
        &self,
        source: impl Fn(NodeType) -> Option<T> + Send + Sync + 'static,
    ) -> PropSource {
        let id = self.id;
        PropSource {
            prop_id: id,
            source: Box::new(move |node_type| {
                source(node_type).map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
            }),
        }
    }
}

impl<T: Send + Sync + 'static> Default for NodeProp<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A pending prop attachment, consumed by [`NodeSet::extend`].
pub struct PropSource {
    prop_id: u32,
    #[allow(clippy::type_complexity)]
    source: Box<dyn Fn(NodeType) -> Option<Arc<dyn Any + Send + Sync>> + Send + Sync>,
}

/// The set of node types making up a language.
#[derive(Clone)]
pub struct NodeSet {
    types: Vec<NodeType>,
}

impl NodeSet {
    /// Creates a node set from the given types.
    pub fn new(types: impl IntoIterator<Item = NodeType>) -> NodeSet {
        NodeSet {
            types: types.into_iter().collect(),
        }
    }

    /// Returns a new set in which every type that one of `sources` produces
    /// a value for carries that value as an additional prop.
    ///
    /// Types no source touches are shared with the original set (handle
    /// equality is preserved for them). Touched types are re-interned, so a
    /// language should be configured once and the extended set's types used
    /// everywhere afterwards.
    pub fn extend(&self, sources: &[PropSource]) -> NodeSet {
        NodeSet {
            types: self
                .types
                .iter()
                .map(|&node_type| {
                    let added: Vec<_> = sources
                        .iter()
                        .filter_map(|s| (s.source)(node_type).map(|v| (s.prop_id, v)))
                        .collect();
                    if added.is_empty() {
                        node_type
                    } else {
                        let mut props = node_type.data.props.clone();
                        props.extend(added);
                        NodeType {
                            data: Box::leak(Box::new(NodeTypeData {
                                name: node_type.data.name.clone(),
                                top: node_type.data.top,
                                props,
                            })),
                        }
                    }
                })
                .collect(),
        }
    }

    /// Finds a type by name.
    pub fn type_named(&self, name: &str) -> Option<NodeType> {
        self.types.iter().copied().find(|t| t.name() == name)
    }

    /// All types in this set.
    pub fn types(&self) -> &[NodeType] {
        &self.types
    }
}
