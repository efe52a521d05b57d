use crate::arena::Entry;

pub struct Node<'a, T> {
    pub value: &'a T,
    pub parent: Option<Entry>,
    pub left: Option<Entry>,
    pub right: Option<Entry>,
}

impl<'a, T> Node<'a, T> {
    pub fn new(value: &'a T, parent: Option<Entry>) -> Self {
        Node {
            value,
            parent,
            left: None,
            right: None,
        }
    }
}
