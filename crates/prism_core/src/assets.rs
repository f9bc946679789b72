use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use uuid::Uuid;

// It's just a unique id. Efficient to copy, typed so a texture handle can't
// be used to look up a material.
pub struct Handle<T> {
    pub id: Uuid,
    marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn new() -> Self {
        Self::from_id(Uuid::new_v4())
    }

    pub fn from_id(id: Uuid) -> Self {
        Self {
            id,
            marker: PhantomData,
        }
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

// Implemented by hand so `T` doesn't need to be Hash itself
impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Storage for one asset type, keyed by handle.
pub struct Assets<T> {
    storage: HashMap<Uuid, T>,
}

impl<T> Default for Assets<T> {
    fn default() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for Assets<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assets").field("len", &self.storage.len()).finish()
    }
}

impl<T> Assets<T> {
    pub fn add(&mut self, asset: T) -> Handle<T> {
        let handle = Handle::new();
        self.storage.insert(handle.id, asset);
        handle
    }

    pub fn insert(&mut self, handle: Handle<T>, asset: T) -> Option<T> {
        self.storage.insert(handle.id, asset)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.storage.get(&handle.id)
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.storage.get_mut(&handle.id)
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.storage.contains_key(&handle.id)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.storage.iter().map(|(id, asset)| (Handle::from_id(*id), asset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_resolve() {
        let mut assets = Assets::default();
        let a = assets.add("a");
        let b = assets.add("b");

        assert_ne!(a, b);
        assert_eq!(assets.get(a), Some(&"a"));
        assert_eq!(assets.len(), 2);

        *assets.get_mut(b).unwrap() = "c";
        assert_eq!(assets.get(b), Some(&"c"));
    }

    #[test]
    fn insert_at_reserved_handle() {
        let mut assets: Assets<u32> = Assets::default();
        let handle = Handle::new();
        assert!(!assets.contains(handle));
        assets.insert(handle, 7);
        assert_eq!(assets.get(handle), Some(&7));
    }
}
