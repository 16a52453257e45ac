use std::fmt;

use ordermap::OrderMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PosetError;
use crate::relation_store::RelationStore;

/// Identifier of a poset. Allocated in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosetId(pub u64);

impl fmt::Display for PosetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Owns every live poset.
///
/// The flag-returning methods (`insert`, `add`, ...) never fail loudly: any
/// unmet precondition yields `false` and leaves all state untouched. The
/// `try_` variants report the reason instead. Each call emits a `debug`
/// event with its arguments and outcome.
///
/// Names are taken as `impl Into<Option<&str>>`; a `None` name behaves
/// like a name that is not in the poset.
#[derive(Debug, Default)]
pub struct Registry {
    posets: OrderMap<PosetId, RelationStore>,
    next: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live posets.
    pub fn len(&self) -> usize {
        self.posets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posets.is_empty()
    }

    pub fn contains(&self, id: PosetId) -> bool {
        self.posets.contains_key(&id)
    }

    /// Live ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = PosetId> + '_ {
        self.posets.keys().copied()
    }

    pub fn get(&self, id: PosetId) -> Option<&RelationStore> {
        self.posets.get(&id)
    }

    pub fn create(&mut self) -> PosetId {
        let id = PosetId(self.next);
        self.next += 1;
        self.posets.insert(id, RelationStore::new());
        debug!(poset = %id, "poset created");
        id
    }

    pub fn destroy(&mut self, id: PosetId) {
        report("destroy", id, &[], self.try_destroy(id));
    }

    pub fn try_destroy(&mut self, id: PosetId) -> Result<(), PosetError> {
        self.posets.remove(&id).map(drop).ok_or(PosetError::UnknownPoset(id))
    }

    /// Element count, 0 for an unknown poset.
    pub fn size(&self, id: PosetId) -> usize {
        report("size", id, &[], self.try_size(id)).unwrap_or(0)
    }

    pub fn try_size(&self, id: PosetId) -> Result<usize, PosetError> {
        Ok(self.store(id)?.len())
    }

    /// Empties the poset but keeps it registered.
    pub fn clear(&mut self, id: PosetId) {
        report("clear", id, &[], self.try_clear(id));
    }

    pub fn try_clear(&mut self, id: PosetId) -> Result<(), PosetError> {
        self.store_mut(id)?.clear();
        Ok(())
    }

    pub fn insert<'a>(&mut self, id: PosetId, name: impl Into<Option<&'a str>>) -> bool {
        let name = name.into();
        report("insert", id, &[name], self.try_insert(id, name)).is_some()
    }

    pub fn try_insert<'a>(
        &mut self,
        id: PosetId,
        name: impl Into<Option<&'a str>>,
    ) -> Result<(), PosetError> {
        let name = name.into();
        let store = self.store_mut(id)?;
        store.insert(name.ok_or(PosetError::MissingName)?)?;
        Ok(())
    }

    pub fn remove<'a>(&mut self, id: PosetId, name: impl Into<Option<&'a str>>) -> bool {
        let name = name.into();
        report("remove", id, &[name], self.try_remove(id, name)).is_some()
    }

    pub fn try_remove<'a>(
        &mut self,
        id: PosetId,
        name: impl Into<Option<&'a str>>,
    ) -> Result<(), PosetError> {
        let name = name.into();
        let store = self.store_mut(id)?;
        store.remove(name.ok_or(PosetError::MissingName)?)?;
        Ok(())
    }

    pub fn add<'a>(
        &mut self,
        id: PosetId,
        v1: impl Into<Option<&'a str>>,
        v2: impl Into<Option<&'a str>>,
    ) -> bool {
        let (v1, v2) = (v1.into(), v2.into());
        report("add", id, &[v1, v2], self.try_add(id, v1, v2)).is_some()
    }

    pub fn try_add<'a>(
        &mut self,
        id: PosetId,
        v1: impl Into<Option<&'a str>>,
        v2: impl Into<Option<&'a str>>,
    ) -> Result<(), PosetError> {
        let store = self.store_mut(id)?;
        let (v1, v2) = names(v1.into(), v2.into())?;
        store.add(v1, v2)?;
        Ok(())
    }

    pub fn del<'a>(
        &mut self,
        id: PosetId,
        v1: impl Into<Option<&'a str>>,
        v2: impl Into<Option<&'a str>>,
    ) -> bool {
        let (v1, v2) = (v1.into(), v2.into());
        report("del", id, &[v1, v2], self.try_del(id, v1, v2)).is_some()
    }

    pub fn try_del<'a>(
        &mut self,
        id: PosetId,
        v1: impl Into<Option<&'a str>>,
        v2: impl Into<Option<&'a str>>,
    ) -> Result<(), PosetError> {
        let store = self.store_mut(id)?;
        let (v1, v2) = names(v1.into(), v2.into())?;
        store.del(v1, v2)?;
        Ok(())
    }

    /// Whether `v1` precedes `v2`; false whenever either cannot be resolved.
    pub fn test<'a>(
        &self,
        id: PosetId,
        v1: impl Into<Option<&'a str>>,
        v2: impl Into<Option<&'a str>>,
    ) -> bool {
        let (v1, v2) = (v1.into(), v2.into());
        report("test", id, &[v1, v2], self.try_test(id, v1, v2)).unwrap_or(false)
    }

    pub fn try_test<'a>(
        &self,
        id: PosetId,
        v1: impl Into<Option<&'a str>>,
        v2: impl Into<Option<&'a str>>,
    ) -> Result<bool, PosetError> {
        let store = self.store(id)?;
        let (v1, v2) = names(v1.into(), v2.into())?;
        Ok(store.test(v1, v2)?)
    }

    fn store(&self, id: PosetId) -> Result<&RelationStore, PosetError> {
        self.posets.get(&id).ok_or(PosetError::UnknownPoset(id))
    }

    fn store_mut(&mut self, id: PosetId) -> Result<&mut RelationStore, PosetError> {
        self.posets.get_mut(&id).ok_or(PosetError::UnknownPoset(id))
    }
}

fn names<'a>(v1: Option<&'a str>, v2: Option<&'a str>) -> Result<(&'a str, &'a str), PosetError> {
    match (v1, v2) {
        (Some(v1), Some(v2)) => Ok((v1, v2)),
        _ => Err(PosetError::MissingName),
    }
}

fn report<T: fmt::Debug>(
    op: &'static str,
    id: PosetId,
    args: &[Option<&str>],
    result: Result<T, PosetError>,
) -> Option<T> {
    match &result {
        Ok(value) => debug!(op, poset = %id, ?args, ?value, "ok"),
        Err(err) => debug!(op, poset = %id, ?args, %err, "rejected"),
    }
    result.ok()
}
