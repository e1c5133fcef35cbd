//! Bounded entity collections with oldest-first eviction
//!
//! Ids are allocated monotonically, so the smallest id is the oldest entity.

/// An entity that lives in a capped population
pub trait Aged {
    fn id(&self) -> u32;

    /// Pinned entities are never evicted
    fn is_pinned(&self) -> bool {
        false
    }
}

/// What happened when an entity was offered to a capped population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Inserted,
    /// Inserted after evicting the entity with this id
    Evicted(u32),
    /// Cap reached and every entity is pinned (or cap is zero)
    Rejected,
}

impl Admission {
    pub fn accepted(self) -> bool {
        !matches!(self, Admission::Rejected)
    }
}

/// Index of the oldest non-pinned entity
pub fn oldest_unpinned<T: Aged>(items: &[T]) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_pinned())
        .min_by_key(|(_, item)| item.id())
        .map(|(idx, _)| idx)
}

/// Push `item`, evicting oldest non-pinned entities until under `cap`
///
/// Keeps `items.len() <= cap` as long as it held on entry.
pub fn insert_capped<T: Aged>(items: &mut Vec<T>, item: T, cap: usize) -> Admission {
    if cap == 0 {
        return Admission::Rejected;
    }
    let mut evicted = None;
    while items.len() >= cap {
        match oldest_unpinned(items) {
            Some(idx) => {
                let gone = items.remove(idx);
                log::debug!("Population cap {} reached, evicted #{}", cap, gone.id());
                evicted = Some(gone.id());
            }
            None => return Admission::Rejected,
        }
    }
    items.push(item);
    match evicted {
        Some(id) => Admission::Evicted(id),
        None => Admission::Inserted,
    }
}
