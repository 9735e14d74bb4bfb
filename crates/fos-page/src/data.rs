//! Page data bag
//!
//! A flat string map shared by identity between a page and everyone its
//! events are fired at. Cloning a `PageData` clones the handle, not the map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct PageData(Rc<RefCell<HashMap<String, String>>>);

impl PageData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    /// Insert a value, returning the previous one
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.0.borrow_mut().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.0.borrow().clone()
    }

    /// Whether both handles share the same map
    pub fn ptr_eq(&self, other: &PageData) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<HashMap<String, String>> for PageData {
    fn from(map: HashMap<String, String>) -> Self {
        Self(Rc::new(RefCell::new(map)))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PageData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<HashMap<_, _>>()
            .into()
    }
}

impl fmt::Debug for PageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.borrow().iter()).finish()
    }
}
