use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A single node of the ephemeral binary search tree (component C1).
///
/// `left`/`right` own their subtrees; `parent` is a weak back-reference
/// used only to walk upward during predecessor/successor and transplant —
/// it is never used to extend a node's lifetime (§4, "Cyclic parent
/// pointers" in DESIGN.md). Every higher engine in this crate (fat-node,
/// node-copying, full-persistent) keeps its own node type, but each of
/// them embeds a `Bst` of this shape per mutable field to hold that
/// field's version history.
pub struct Node<T> {
    pub key: T,
    pub left: Option<NodeRef<T>>,
    pub right: Option<NodeRef<T>>,
    pub parent: Option<Weak<RefCell<Node<T>>>>,
}

pub type NodeRef<T> = Rc<RefCell<Node<T>>>;

impl<T> Node<T> {
    pub fn new(key: T) -> NodeRef<T> {
        Rc::new(RefCell::new(Node {
            key,
            left: None,
            right: None,
            parent: None,
        }))
    }
}

pub(super) fn parent_of<T>(node: &NodeRef<T>) -> Option<NodeRef<T>> {
    node.borrow().parent.as_ref().and_then(Weak::upgrade)
}

pub(super) fn is_left_child<T>(node: &NodeRef<T>, parent: &NodeRef<T>) -> bool {
    match &parent.borrow().left {
        Some(l) => Rc::ptr_eq(l, node),
        None => false,
    }
}
