use crate::arena::{Arena, Entry};
use crate::splay_tree::node::Node;
use crate::splay_tree::{Error, Result};
use std::cmp::Ordering;

pub type Nodes<'a, T> = Arena<Node<'a, T>>;

// Promotes `child` into its parent's slot. The displaced inner subtree of `child` moves to the
// slot that `child` vacated under the old parent.
fn rotate<T>(nodes: &mut Nodes<T>, child: Entry) {
    let parent = nodes[child]
        .parent
        .expect("Expected rotated node to have a parent.");
    let grand = nodes[parent].parent;

    if nodes[parent].left == Some(child) {
        let inner = nodes[child].right;
        nodes[parent].left = inner;
        if let Some(inner) = inner {
            nodes[inner].parent = Some(parent);
        }
        nodes[child].right = Some(parent);
    } else {
        let inner = nodes[child].left;
        nodes[parent].right = inner;
        if let Some(inner) = inner {
            nodes[inner].parent = Some(parent);
        }
        nodes[child].left = Some(parent);
    }

    nodes[parent].parent = Some(child);
    nodes[child].parent = grand;
    if let Some(grand) = grand {
        if nodes[grand].left == Some(parent) {
            nodes[grand].left = Some(child);
        } else {
            nodes[grand].right = Some(child);
        }
    }
}

/// Rotates `x` up until it has no parent. The caller is responsible for recording `x` as the new
/// root.
pub fn splay<T>(nodes: &mut Nodes<T>, x: Entry) {
    while let Some(p) = nodes[x].parent {
        match nodes[p].parent {
            // zig
            None => rotate(nodes, x),
            Some(g) => {
                let x_is_left = nodes[p].left == Some(x);
                let p_is_left = nodes[g].left == Some(p);
                if x_is_left == p_is_left {
                    // zig-zig
                    rotate(nodes, p);
                    rotate(nodes, x);
                } else {
                    // zig-zag
                    rotate(nodes, x);
                    rotate(nodes, x);
                }
            },
        }
    }
}

pub fn leftmost<T>(nodes: &Nodes<T>, mut curr: Entry) -> Entry {
    while let Some(left) = nodes[curr].left {
        curr = left;
    }
    curr
}

pub fn rightmost<T>(nodes: &Nodes<T>, mut curr: Entry) -> Entry {
    while let Some(right) = nodes[curr].right {
        curr = right;
    }
    curr
}

/// Returns the in-order successor of `entry`: either the leftmost node of its right subtree or
/// the closest ancestor that has `entry` in its left subtree.
pub fn successor<T>(nodes: &Nodes<T>, mut entry: Entry) -> Option<Entry> {
    if let Some(right) = nodes[entry].right {
        return Some(leftmost(nodes, right));
    }
    while let Some(parent) = nodes[entry].parent {
        if nodes[parent].left == Some(entry) {
            return Some(parent);
        }
        entry = parent;
    }
    None
}

pub fn predecessor<T>(nodes: &Nodes<T>, mut entry: Entry) -> Option<Entry> {
    if let Some(left) = nodes[entry].left {
        return Some(rightmost(nodes, left));
    }
    while let Some(parent) = nodes[entry].parent {
        if nodes[parent].right == Some(entry) {
            return Some(parent);
        }
        entry = parent;
    }
    None
}

/// Replaces the root `node` by the splice of its two subtrees and returns the new root. The
/// removed node keeps stale links and must be freed by the caller.
pub fn splice<T>(nodes: &mut Nodes<T>, node: Entry) -> Option<Entry> {
    let new_root = match (nodes[node].left, nodes[node].right) {
        (None, right) => right,
        (left, None) => left,
        (Some(left), Some(right)) => {
            let x = leftmost(nodes, right);
            if x != right {
                let x_parent = nodes[x]
                    .parent
                    .expect("Expected successor below the right child to have a parent.");
                let x_right = nodes[x].right;
                nodes[x_parent].left = x_right;
                if let Some(x_right) = x_right {
                    nodes[x_right].parent = Some(x_parent);
                }
                nodes[x].right = Some(right);
                nodes[right].parent = Some(x);
            }
            nodes[x].left = Some(left);
            nodes[left].parent = Some(x);
            Some(x)
        },
    };

    if let Some(new_root) = new_root {
        nodes[new_root].parent = None;
    }
    new_root
}

/// Checks ordering, parent links, and the node count of the tree rooted at `root`.
///
/// Every value in a left subtree must compare less than or equal to each ancestor it descends left
/// from, and every value in a right subtree must compare greater than or equal to each ancestor it
/// descends right from. Ties are inserted to the right, but splaying can rotate an earlier equal
/// value into the left subtree of a later one, so neither bound is strict. The walk uses an
/// explicit stack, so it is safe on degenerate trees.
pub fn validate<'a, T, C>(
    nodes: &Nodes<'a, T>,
    root: Option<Entry>,
    len: usize,
    comparator: &C,
) -> Result<()>
where
    C: Fn(&T, &T) -> Ordering,
{
    let root = match root {
        Some(root) => root,
        None if len == 0 => return Ok(()),
        None => {
            return Err(Error::SizeMismatch {
                expected: len,
                reachable: 0,
            })
        },
    };
    match nodes.get(root) {
        Some(node) if node.parent.is_none() => {},
        Some(_) => return Err(Error::RootHasParent),
        None => return Err(Error::BrokenParentLink),
    }

    let mut reachable = 0;
    let mut stack: Vec<(Entry, Option<&'a T>, Option<&'a T>)> = vec![(root, None, None)];
    while let Some((entry, lower, upper)) = stack.pop() {
        let node = &nodes[entry];
        reachable += 1;
        if reachable > len {
            return Err(Error::SizeMismatch {
                expected: len,
                reachable,
            });
        }

        if let Some(lower) = lower {
            if comparator(node.value, lower) == Ordering::Less {
                return Err(Error::OutOfOrder);
            }
        }
        if let Some(upper) = upper {
            if comparator(node.value, upper) == Ordering::Greater {
                return Err(Error::OutOfOrder);
            }
        }

        for &(child, is_left) in &[(node.left, true), (node.right, false)] {
            let child = match child {
                Some(child) => child,
                None => continue,
            };
            match nodes.get(child) {
                Some(child_node) if child_node.parent == Some(entry) => {},
                _ => return Err(Error::BrokenParentLink),
            }
            if is_left {
                stack.push((child, lower, Some(node.value)));
            } else {
                stack.push((child, Some(node.value), upper));
            }
        }
    }

    if reachable != len {
        return Err(Error::SizeMismatch {
            expected: len,
            reachable,
        });
    }
    Ok(())
}
