use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Typed handle into the [`Blackboard`].
///
/// Keys are plain integers under the hood; the type parameter pins the value
/// type at compile time so readers and writers cannot silently disagree.
/// Declare them as constants next to the subsystem that owns them:
///
/// ```
/// use pickplace_core::BbKey;
/// const OBJECT_IN_HAND: BbKey<bool> = BbKey::new(0x10);
/// ```
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    id: u64,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(self) -> u64 {
        self.id
    }
}

/// Keyed state shared by every node of one tree.
///
/// Absence of a key is a first-class outcome: `get` returns `None` rather
/// than erroring, and condition nodes treat "absent" differently from
/// "present but false". There is no interior locking; the store is only
/// touched from the tick context, and deployments ticking several trees
/// against one store must add their own mutual exclusion.
#[derive(Default)]
pub struct Blackboard {
    entries: BTreeMap<u64, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.entries.contains_key(&key.id)
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        self.entries.insert(key.id, Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let entry = self.entries.get(&key.id)?;
        entry.downcast_ref::<T>().or_else(|| {
            panic!(
                "blackboard type mismatch for key id={} (stored type differs from requested)",
                key.id
            )
        })
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let entry = self.entries.get_mut(&key.id)?;
        entry.downcast_mut::<T>().or_else(|| {
            panic!(
                "blackboard type mismatch for key id={} (stored type differs from requested)",
                key.id
            )
        })
    }

    /// Erase one entry, returning the stored value if it was present.
    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let entry = self.entries.remove(&key.id)?;
        entry.downcast::<T>().map(|b| *b).ok().or_else(|| {
            panic!(
                "blackboard type mismatch for key id={} (stored type differs from requested)",
                key.id
            )
        })
    }

    /// Erase every entry. Tests use this to re-run a tree from a clean slate.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
