//! OSC address space and message dispatching.
//!
//! The address space is a tree of named nodes:
//! - containers: internal nodes, one per path segment;
//! - methods: leaves holding the full address, a type-tag signature
//!   and a caller-supplied handler.
//!
//! Registration creates missing containers on the way down and installs
//! (or overwrites) the method at the last segment. Matching walks the
//! tree segment by segment, keeping every container whose name matches
//! the pattern segment (brace expansion + glob), then collects the
//! methods under the surviving containers whose name matches the last
//! segment and whose signature accepts the message's type tags.
//!
//! Children keep **registration order**; overwriting a method keeps its
//! original position. Match results follow that order, depth first.
//!
//! The tree sits behind an `RwLock`: any number of concurrent matches,
//! one registration at a time, and a registration is applied in full
//! before readers can see it. Matches hand out `Arc<Method<H>>`
//! snapshots that stay valid however the tree changes afterwards.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::error::{OscError, Result};
use crate::pattern::{is_valid_name, split_address, SegmentMatcher};

/// Signature accepting any type tags.
pub const TYPETAGS_ANY: &str = "*";

/// A registered handler (tree leaf).
pub struct Method<H> {
    address: String,
    typetags: String,
    handler: H,
}

impl<H> Method<H> {
    /// Full address the method was registered under.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Declared type tags (`"*"` for any).
    pub fn typetags(&self) -> &str {
        &self.typetags
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Whether a message with `typetags` may be delivered here.
    ///
    /// `None` skips the check. Otherwise the signature must be `"*"` or
    /// equal the tags exactly; there is no coercion between types.
    pub fn accepts(&self, typetags: Option<&str>) -> bool {
        match typetags {
            None => true,
            Some(tags) => self.typetags == TYPETAGS_ANY || self.typetags == tags,
        }
    }
}

impl<H> fmt::Debug for Method<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("address", &self.address)
            .field("typetags", &self.typetags)
            .finish_non_exhaustive()
    }
}

enum Node<H> {
    Container(Container<H>),
    Method(Arc<Method<H>>),
}

struct Container<H> {
    /// Address of this container, `""` for the root.
    path: String,
    children: IndexMap<String, Node<H>>,
}

impl<H> Container<H> {
    fn new(path: String) -> Self {
        Container {
            path,
            children: IndexMap::new(),
        }
    }

    /// Children whose name matches `segment`, in registration order.
    fn matching(&self, segment: &SegmentMatcher) -> Vec<&Node<H>> {
        match segment.as_literal() {
            Some(name) => self.children.get(name).into_iter().collect(),
            None => self
                .children
                .iter()
                .filter(|(name, _)| segment.is_match(name))
                .map(|(_, node)| node)
                .collect(),
        }
    }

    fn collect_methods(&self, out: &mut Vec<Arc<Method<H>>>) {
        for node in self.children.values() {
            match node {
                Node::Container(c) => c.collect_methods(out),
                Node::Method(m) => out.push(Arc::clone(m)),
            }
        }
    }
}

/// Switches for [`AddressSpace::match_pattern_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Glob wildcards (`*`, `?`, `[...]`); off means literal segments.
    pub glob: bool,

    /// `{a,b}` alternation, applied before glob matching.
    pub braces: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            glob: true,
            braces: true,
        }
    }
}

/// An OSC address space: the root of a tree of containers and methods.
///
/// Each instance is independent; share one between tasks with `Arc`.
pub struct AddressSpace<H> {
    root: RwLock<Container<H>>,
}

impl<H> Default for AddressSpace<H> {
    fn default() -> Self {
        AddressSpace {
            root: RwLock::new(Container::new(String::new())),
        }
    }
}

impl<H> AddressSpace<H> {
    /// Create a new, empty address space.
    pub fn new() -> Self {
        AddressSpace::default()
    }

    /// Register `handler` at `address` accepting `typetags` (`"*"` for any).
    ///
    /// Every segment must be a valid node name. Fails with
    /// [`OscError::Address`] if the address is malformed, if a segment on
    /// the way down is already a method, or if the last segment is already
    /// a container. A failed call leaves the tree untouched.
    pub fn register(
        &self,
        handler: H,
        address: &str,
        typetags: &str,
    ) -> Result<Arc<Method<H>>> {
        let parts = split_address(address)?;
        if let Some(bad) = parts.iter().find(|p| !is_valid_name(p)) {
            return Err(OscError::Address(format!(
                "invalid characters in segment {:?} of {:?}",
                bad, address
            )));
        }
        let Some((leaf, branches)) = parts.split_last() else {
            return Err(OscError::Address(format!("no path segments in {:?}", address)));
        };

        let mut root = self.write();
        check_path(&root, branches, leaf, address)?;

        let mut node: &mut Container<H> = &mut *root;
        for name in branches {
            let path = format!("{}/{}", node.path, name);
            let child = node
                .children
                .entry(name.to_string())
                .or_insert_with(|| Node::Container(Container::new(path)));
            node = match child {
                Node::Container(c) => c,
                Node::Method(_) => {
                    return Err(OscError::Address(format!(
                        "{:?} passes through a method",
                        address
                    )))
                }
            };
        }

        let method = Arc::new(Method {
            address: address.to_string(),
            typetags: typetags.to_string(),
            handler,
        });
        node.children
            .insert(leaf.to_string(), Node::Method(Arc::clone(&method)));

        Ok(method)
    }

    /// Register `handler` at `address` accepting any type tags.
    pub fn register_any(&self, handler: H, address: &str) -> Result<Arc<Method<H>>> {
        self.register(handler, address, TYPETAGS_ANY)
    }

    /// Find the methods matching `pattern`, with glob and brace matching on.
    ///
    /// With `typetags` given, only methods declared for exactly those tags
    /// (or for any tags) are returned.
    pub fn match_pattern(
        &self,
        pattern: &str,
        typetags: Option<&str>,
    ) -> Result<Vec<Arc<Method<H>>>> {
        self.match_pattern_with(pattern, typetags, MatchOptions::default())
    }

    pub fn match_pattern_with(
        &self,
        pattern: &str,
        typetags: Option<&str>,
        options: MatchOptions,
    ) -> Result<Vec<Arc<Method<H>>>> {
        let parts = split_address(pattern)?;
        let Some((leaf, branches)) = parts.split_last() else {
            return Err(OscError::Address(format!("no path segments in {:?}", pattern)));
        };

        let root = self.read();
        let mut frontier: Vec<&Container<H>> = vec![&*root];

        for segment in branches {
            let matcher = SegmentMatcher::compile(segment, options.glob, options.braces);
            frontier = frontier
                .into_iter()
                .flat_map(|c| c.matching(&matcher))
                .filter_map(|node| match node {
                    Node::Container(c) => Some(c),
                    Node::Method(_) => None,
                })
                .collect();

            if frontier.is_empty() {
                return Ok(Vec::new());
            }
        }

        let matcher = SegmentMatcher::compile(leaf, options.glob, options.braces);
        let results = frontier
            .into_iter()
            .flat_map(|c| c.matching(&matcher))
            .filter_map(|node| match node {
                Node::Method(m) if m.accepts(typetags) => Some(Arc::clone(m)),
                _ => None,
            })
            .collect();

        Ok(results)
    }

    /// Remove every node.
    pub fn clear(&self) {
        self.write().children.clear();
    }

    /// All registered methods, depth first in registration order.
    pub fn methods(&self) -> Vec<Arc<Method<H>>> {
        let mut out = Vec::new();
        self.read().collect_methods(&mut out);
        out
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().children.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Container<H>> {
        self.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Container<H>> {
        self.root.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reject registrations that would turn a method into a container or
/// the other way round, before anything is inserted.
fn check_path<H>(root: &Container<H>, branches: &[&str], leaf: &str, address: &str) -> Result<()> {
    let mut node = root;

    for name in branches {
        match node.children.get(*name) {
            None => return Ok(()),
            Some(Node::Container(c)) => node = c,
            Some(Node::Method(m)) => {
                return Err(OscError::Address(format!(
                    "{:?} passes through method {:?}",
                    address,
                    m.address()
                )))
            }
        }
    }

    match node.children.get(leaf) {
        Some(Node::Container(c)) => Err(OscError::Address(format!(
            "{:?} is already a container ({})",
            address, c.path
        ))),
        _ => Ok(()),
    }
}
