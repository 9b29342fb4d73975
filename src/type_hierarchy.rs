//! Pluggable type resolution.
//!
//! A [`TypeHierarchy`] hands out fresh [`TypeResolver`]s, one per column. A
//! resolver folds observed values into the most specific type that accepts
//! all of them.
//!
//! [`TreeTypeHierarchy`] encodes such a lattice as a tree stored in an arena:
//! every node owns a type and a predicate, the root accepts every value and a
//! child accepts a subset of what its parent accepts. Resolving is then a walk
//! down the tree for the first value and a climb towards the root for every
//! value the current node rejects.

use std::{fmt, sync::Arc};

use crate::error::{GuessResult, ensure_arg};

pub trait TypeResolver<V, T> {
    /// Folds one observed cell into the resolver; `None` is a missing value.
    fn accept(&mut self, value: Option<&V>);

    fn most_specific_type(&self) -> T;

    /// True once at least one non-missing value was accepted.
    fn has_type(&self) -> bool;

    /// True when no further refinement is possible. Monotonic.
    fn reached_top(&self) -> bool;
}

pub trait TypeHierarchy<V, T> {
    type Resolver: TypeResolver<V, T>;

    fn create_resolver(&self) -> Self::Resolver;
}

type Predicate<V> = Box<dyn Fn(&V) -> bool + Send + Sync>;

struct Node<V, T> {
    ty: T,
    test: Predicate<V>,
    parent: Option<usize>,
    children: Vec<usize>,
}

struct Tree<V, T> {
    nodes: Vec<Node<V, T>>,
    is_missing: Predicate<V>,
}

impl<V, T> Tree<V, T> {
    fn accepts(&self, node: usize, value: &V) -> bool {
        (self.nodes[node].test)(value)
    }

    fn deepest_accepting_from(&self, mut node: usize, value: &V) -> usize {
        while let Some(&child) = self.nodes[node]
            .children
            .iter()
            .find(|&&child| self.accepts(child, value))
        {
            node = child;
        }
        node
    }

    fn climb_until_accepting(&self, mut node: usize, value: &V) -> usize {
        while !self.accepts(node, value) {
            match self.nodes[node].parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
        node
    }
}

/// Handle to a node of a hierarchy under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// Builder for [`TreeTypeHierarchy`].
pub struct TreeTypeHierarchyBuilder<V, T> {
    nodes: Vec<Node<V, T>>,
    is_missing: Predicate<V>,
}

impl<V, T> TreeTypeHierarchyBuilder<V, T>
where
    V: 'static,
{
    /// Starts a hierarchy whose root type accepts every value.
    pub fn new(top: T) -> Self {
        Self {
            nodes: vec![Node {
                ty: top,
                test: Box::new(|_: &V| true),
                parent: None,
                children: Vec::new(),
            }],
            is_missing: Box::new(|_: &V| false),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Adds `ty` below `parent`. Children are tried in insertion order.
    pub fn add_child<F>(&mut self, parent: NodeId, ty: T, test: F) -> NodeId
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let id = self.nodes.len();
        self.nodes.push(Node {
            ty,
            test: Box::new(test),
            parent: Some(parent.0),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        NodeId(id)
    }

    /// Values matching `is_missing` are treated like absent cells.
    pub fn missing_when<F>(mut self, is_missing: F) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.is_missing = Box::new(is_missing);
        self
    }

    pub fn build(self) -> TreeTypeHierarchy<V, T> {
        TreeTypeHierarchy {
            tree: Arc::new(Tree {
                nodes: self.nodes,
                is_missing: self.is_missing,
            }),
        }
    }
}

pub struct TreeTypeHierarchy<V, T> {
    tree: Arc<Tree<V, T>>,
}

impl<V, T> Clone for TreeTypeHierarchy<V, T> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
        }
    }
}

impl<V, T: fmt::Debug> fmt::Debug for TreeTypeHierarchy<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.tree.nodes.iter().map(|n| &n.ty))
            .finish()
    }
}

impl<V, T> TreeTypeHierarchy<V, T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn top_type(&self) -> &T {
        &self.tree.nodes[0].ty
    }

    /// All types of the hierarchy in insertion order, root first.
    pub fn types(&self) -> impl Iterator<Item = &T> {
        self.tree.nodes.iter().map(|n| &n.ty)
    }

    /// Derives the hierarchy over the types themselves: each node accepts its
    /// own type and every type below it. Resolving a sequence of types yields
    /// their least common ancestor, which is how specs of several sources are
    /// combined.
    pub fn type_lattice(&self) -> TreeTypeHierarchy<T, T> {
        let nodes = &self.tree.nodes;
        let subtree = |root: usize| {
            let mut members = Vec::new();
            let mut stack = vec![root];
            while let Some(idx) = stack.pop() {
                members.push(nodes[idx].ty.clone());
                stack.extend(nodes[idx].children.iter().copied());
            }
            members
        };
        let lattice = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let members = subtree(idx);
                let test: Predicate<T> = if node.parent.is_none() {
                    Box::new(|_: &T| true)
                } else {
                    Box::new(move |ty: &T| members.contains(ty))
                };
                Node {
                    ty: node.ty.clone(),
                    test,
                    parent: node.parent,
                    children: node.children.clone(),
                }
            })
            .collect();
        TreeTypeHierarchy {
            tree: Arc::new(Tree {
                nodes: lattice,
                is_missing: Box::new(|_: &T| false),
            }),
        }
    }

    /// Common ancestor of `types`, `None` for an empty input.
    pub fn common_type<'a, I>(&self, types: I) -> GuessResult<Option<T>>
    where
        I: IntoIterator<Item = &'a T>,
    {
        let lattice = self.type_lattice();
        let mut resolver = lattice.create_resolver();
        for ty in types {
            ensure_arg!(
                self.types().any(|known| known == ty),
                "Type is not part of the hierarchy"
            );
            resolver.accept(Some(ty));
        }
        Ok(resolver.has_type().then(|| resolver.most_specific_type()))
    }
}

impl<V, T: Clone> TypeHierarchy<V, T> for TreeTypeHierarchy<V, T> {
    type Resolver = TreeTypeResolver<V, T>;

    fn create_resolver(&self) -> Self::Resolver {
        TreeTypeResolver {
            tree: Arc::clone(&self.tree),
            current: None,
        }
    }
}

pub struct TreeTypeResolver<V, T> {
    tree: Arc<Tree<V, T>>,
    current: Option<usize>,
}

impl<V, T: Clone> TypeResolver<V, T> for TreeTypeResolver<V, T> {
    fn accept(&mut self, value: Option<&V>) {
        let Some(value) = value else {
            return;
        };
        if (self.tree.is_missing)(value) {
            return;
        }
        let next = match self.current {
            None => self.tree.deepest_accepting_from(0, value),
            Some(node) => self.tree.climb_until_accepting(node, value),
        };
        self.current = Some(next);
    }

    fn most_specific_type(&self) -> T {
        self.tree.nodes[self.current.unwrap_or(0)].ty.clone()
    }

    fn has_type(&self) -> bool {
        self.current.is_some()
    }

    fn reached_top(&self) -> bool {
        self.current == Some(0)
    }
}
