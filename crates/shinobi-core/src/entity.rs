use std::fmt;

/// A generational entity handle: slot index plus the generation it was issued for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Create an entity from raw parts (mainly for testing).
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Pack into 64 bits, generation in the high half.
    pub fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    pub fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Issues entity handles and recycles freed slots with a bumped generation.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_list: Vec<u32>,
    len: usize,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity, reusing a freed slot if available.
    pub fn allocate(&mut self) -> Entity {
        self.len += 1;
        match self.free_list.pop() {
            Some(index) => {
                self.alive[index as usize] = true;
                Entity::from_raw(index, self.generations[index as usize])
            }
            None => {
                let index = self.generations.len() as u32;
                self.generations.push(0);
                self.alive.push(true);
                Entity::from_raw(index, 0)
            }
        }
    }

    /// Free an entity. Returns `false` for stale or already freed handles.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let idx = entity.index as usize;
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(entity.index);
        self.len -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.index as usize;
        idx < self.alive.len() && self.alive[idx] && self.generations[idx] == entity.generation
    }

    /// Number of currently alive entities.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_sequential() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        let e1 = alloc.allocate();
        assert_eq!(e0.index(), 0);
        assert_eq!(e1.index(), 1);
        assert_eq!(alloc.len(), 2);
    }

    #[test]
    fn freed_slot_reused_with_new_generation() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert!(alloc.deallocate(e0));
        let reused = alloc.allocate();
        assert_eq!(reused.index(), 0);
        assert_eq!(reused.generation(), 1);
        assert!(!alloc.is_alive(e0));
        assert!(alloc.is_alive(reused));
    }

    #[test]
    fn double_free_is_rejected() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.deallocate(e));
        assert!(!alloc.deallocate(e));
        assert!(alloc.is_empty());
    }

    #[test]
    fn bits_round_trip() {
        let e = Entity::from_raw(7, 3);
        assert_eq!(Entity::from_bits(e.to_bits()), e);
    }
}
