use crate::arena::Arena;
use crate::splay_tree::node::Node;
use crate::splay_tree::tree::{self, Nodes};
use crate::splay_tree::{Config, Handle, Result};
use log::{debug, trace};
use std::cmp::Ordering;

/// An ordered container of borrowed values implemented using a splay tree.
///
/// The order is defined by a comparator supplied at construction. Values that compare equal are
/// kept, and a newly inserted value is always placed after the values it ties with, so equal
/// values are traversed in insertion order. Insertion and a successful `find` splay the accessed
/// node to the root; a `find` that misses leaves the tree untouched. Traversal never restructures
/// the tree.
///
/// Nodes live in an arena owned by the tree and are addressed by `Handle`s. A handle stays valid
/// until its node is deleted or the tree is cleared; a handle to a deleted node is treated as
/// absent until its slot is reused by a later insertion.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplayTree;
///
/// let values = [3, 4, 1, 2];
/// let mut tree = SplayTree::new(|a: &i32, b: &i32| a.cmp(b));
/// for value in &values {
///     tree.insert(value);
/// }
///
/// assert_eq!(tree.len(), 4);
/// assert_eq!(tree.first().and_then(|handle| tree.get(handle)), Some(&1));
/// assert_eq!(tree.contents(), vec![&1, &2, &3, &4]);
///
/// let found = tree.find(&2).unwrap();
/// assert_eq!(tree.root(), Some(found));
///
/// assert_eq!(tree.delete(&2), Some(&2));
/// assert_eq!(tree.delete(&2), None);
/// ```
pub struct SplayTree<'a, T, C> {
    nodes: Nodes<'a, T>,
    root: Option<Handle>,
    comparator: C,
    len: usize,
    config: Config,
}

impl<'a, T> SplayTree<'a, T, fn(&T, &T) -> Ordering>
where
    T: Ord,
{
    /// Constructs a new, empty tree ordered by `T`'s `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let values = ["b", "a"];
    /// let mut tree = SplayTree::natural();
    /// tree.insert(&values[0]);
    /// tree.insert(&values[1]);
    /// assert_eq!(tree.contents(), vec![&"a", &"b"]);
    /// ```
    pub fn natural() -> Self {
        Self::new(T::cmp)
    }
}

impl<'a, T, C> SplayTree<'a, T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Constructs a new, empty tree ordered by `comparator`. The comparator must define a
    /// consistent total order over every value ever inserted.
    pub fn new(comparator: C) -> Self {
        Self::with_config(comparator, Config::default())
    }

    /// Constructs a new, empty tree with explicit construction parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::{Config, SplayTree};
    ///
    /// let config = Config::default().verify_invariants(true);
    /// let mut tree = SplayTree::with_config(|a: &u8, b: &u8| a.cmp(b), config);
    /// tree.insert(&1);
    /// assert_eq!(tree.delete(&1), Some(&1));
    /// ```
    pub fn with_config(comparator: C, config: Config) -> Self {
        SplayTree {
            nodes: Arena::new(config.get_chunk_size()),
            root: None,
            comparator,
            len: 0,
            config,
        }
    }

    /// Inserts a value and returns the handle of its node, which becomes the root. Allocation
    /// failure is reported instead of aborting.
    pub fn try_insert(&mut self, value: &'a T) -> Result<Handle> {
        let mut parent = None;
        let mut is_left = false;
        let mut curr = self.root;
        while let Some(entry) = curr {
            let node = &self.nodes[entry];
            parent = Some(entry);
            is_left = (self.comparator)(value, node.value) == Ordering::Less;
            curr = if is_left { node.left } else { node.right };
        }

        let new_node = self.nodes.try_allocate(Node::new(value, parent))?;
        if let Some(parent) = parent {
            if is_left {
                self.nodes[parent].left = Some(new_node);
            } else {
                self.nodes[parent].right = Some(new_node);
            }
        }

        tree::splay(&mut self.nodes, new_node);
        self.root = Some(new_node);
        self.len += 1;
        trace!("inserted node {:?}, tree now holds {} nodes", new_node, self.len);
        Ok(new_node)
    }

    /// Inserts a value and returns the handle of its node, which becomes the root.
    ///
    /// # Panics
    ///
    /// Panics if the node cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::natural();
    /// let handle = tree.insert(&5);
    /// assert_eq!(tree.root(), Some(handle));
    /// assert_eq!(tree.get(handle), Some(&5));
    /// ```
    pub fn insert(&mut self, value: &'a T) -> Handle {
        self.try_insert(value)
            .unwrap_or_else(|error| panic!("Error: {}", error))
    }

    /// Returns the handle of a node whose value compares equal to `value` and splays it to the
    /// root. Returns `None` without restructuring the tree if there is no such node.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::natural();
    /// let one = tree.insert(&1);
    /// tree.insert(&2);
    ///
    /// assert_eq!(tree.find(&1), Some(one));
    /// assert_eq!(tree.root(), Some(one));
    /// assert_eq!(tree.find(&3), None);
    /// assert_eq!(tree.root(), Some(one));
    /// ```
    pub fn find(&mut self, value: &T) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(entry) = curr {
            let (ordering, left, right) = {
                let node = &self.nodes[entry];
                ((self.comparator)(value, node.value), node.left, node.right)
            };
            curr = match ordering {
                Ordering::Less => left,
                Ordering::Greater => right,
                Ordering::Equal => {
                    tree::splay(&mut self.nodes, entry);
                    self.root = Some(entry);
                    return Some(entry);
                },
            };
        }
        None
    }

    /// Removes a node whose value compares equal to `value` and returns the stored value. Returns
    /// `None` and leaves the tree unchanged if there is no such node.
    pub fn delete(&mut self, value: &T) -> Option<&'a T> {
        let handle = self.find(value);
        self.delete_by_handle(handle)
    }

    /// Removes the node at `handle` and returns its value. Returns `None` if `handle` is `None` or
    /// refers to a node that was already deleted.
    ///
    /// # Panics
    ///
    /// Panics if the tree was configured to verify invariants and the deletion left it
    /// inconsistent.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::natural();
    /// let handle = tree.insert(&1);
    /// tree.insert(&2);
    ///
    /// assert_eq!(tree.delete_by_handle(Some(handle)), Some(&1));
    /// assert_eq!(tree.delete_by_handle(Some(handle)), None);
    /// assert_eq!(tree.delete_by_handle(None), None);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn delete_by_handle(&mut self, handle: Option<Handle>) -> Option<&'a T> {
        let handle = handle?;
        self.nodes.get(handle)?;

        tree::splay(&mut self.nodes, handle);
        self.root = tree::splice(&mut self.nodes, handle);
        let node = self.nodes.free(handle)?;
        self.len -= 1;
        trace!("deleted node {:?}, tree now holds {} nodes", handle, self.len);

        if self.config.get_verify_invariants() {
            debug!("validating splay tree of {} nodes", self.len);
            if let Err(error) = self.validate() {
                panic!("Error: splay tree invariant violated: {}", error);
            }
        }
        Some(node.value)
    }

    /// Checks every structural invariant of the tree: ordering under the comparator, symmetric
    /// parent links, a parentless root, and a node count equal to `len`. Never called by the other
    /// operations unless the tree was configured to verify invariants.
    pub fn validate(&self) -> Result<()> {
        tree::validate(&self.nodes, self.root, self.len, &self.comparator)
    }
}

impl<'a, T, C> SplayTree<'a, T, C> {
    /// Returns the value stored at `handle`, or `None` if the node was deleted.
    pub fn get(&self, handle: Handle) -> Option<&'a T> {
        self.nodes.get(handle).map(|node| node.value)
    }

    /// Returns the handle of the current root.
    pub fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns the handle of the least node. Does not restructure the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::natural();
    /// assert_eq!(tree.first(), None);
    /// let one = tree.insert(&1);
    /// tree.insert(&3);
    /// assert_eq!(tree.first(), Some(one));
    /// ```
    pub fn first(&self) -> Option<Handle> {
        self.root.map(|root| tree::leftmost(&self.nodes, root))
    }

    /// Returns the handle of the greatest node. Does not restructure the tree.
    pub fn last(&self) -> Option<Handle> {
        self.root.map(|root| tree::rightmost(&self.nodes, root))
    }

    /// Returns the handle of the in-order successor of `handle`, or `None` if `handle` is the last
    /// node or was deleted. Does not restructure the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::natural();
    /// let one = tree.insert(&1);
    /// let two = tree.insert(&2);
    /// assert_eq!(tree.next(one), Some(two));
    /// assert_eq!(tree.next(two), None);
    /// ```
    pub fn next(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle)?;
        tree::successor(&self.nodes, handle)
    }

    /// Returns the handle of the in-order predecessor of `handle`, or `None` if `handle` is the
    /// first node or was deleted. Does not restructure the tree.
    pub fn prev(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle)?;
        tree::predecessor(&self.nodes, handle)
    }

    /// Returns every value in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::natural();
    /// assert!(tree.contents().is_empty());
    /// tree.insert(&2);
    /// tree.insert(&1);
    /// assert_eq!(tree.contents(), vec![&1, &2]);
    /// ```
    pub fn contents(&self) -> Vec<&'a T> {
        let mut ret = Vec::with_capacity(self.len);
        ret.extend(self.iter());
        ret
    }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every value. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns an iterator over the values in ascending order. The iterator keeps its own stack
    /// and never restructures the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayTree;
    ///
    /// let mut tree = SplayTree::natural();
    /// tree.insert(&2);
    /// tree.insert(&1);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, 'a, T> {
        Iter {
            nodes: &self.nodes,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

impl<'t, 'a, T, C> IntoIterator for &'t SplayTree<'a, T, C> {
    type IntoIter = Iter<'t, 'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `SplayTree<T, C>`.
///
/// This iterator traverses the values of the tree in-order.
pub struct Iter<'t, 'a, T> {
    nodes: &'t Nodes<'a, T>,
    current: Option<Handle>,
    stack: Vec<Handle>,
}

impl<'t, 'a, T> Iterator for Iter<'t, 'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        while let Some(entry) = self.current {
            self.current = nodes[entry].left;
            self.stack.push(entry);
        }
        let entry = self.stack.pop()?;
        let node = &nodes[entry];
        self.current = node.right;
        Some(node.value)
    }
}
