//! Typed resources shared by every state of an application.
//!
//! Configuration that states need while building (weapon parameters, game
//! settings) is inserted once and read through [`crate::Context::resource`].

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use crate::core::{Error, Result};

#[derive(Default)]
pub struct Resources {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value`, returning the previous value of the same type.
    pub fn insert<T: Any>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Like [`Resources::get`], failing with [`Error::MissingResource`].
    pub fn require<T: Any>(&self) -> Result<&T> {
        self.get::<T>()
            .ok_or(Error::MissingResource(type_name::<T>()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Lives(u8);

    #[test]
    fn insert_get_replace() {
        let mut res = Resources::new();
        assert!(res.insert(Lives(3)).is_none());
        assert_eq!(res.get::<Lives>(), Some(&Lives(3)));
        assert_eq!(res.insert(Lives(2)), Some(Lives(3)));
        assert_eq!(res.len(), 1);
    }

    #[test]
    fn missing_resource_names_the_type() {
        let res = Resources::new();
        match res.require::<Lives>() {
            Err(Error::MissingResource(name)) => assert!(name.ends_with("Lives")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
