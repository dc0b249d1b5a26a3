use std::marker::PhantomData;

/// Index into an [`AssetCache`](super::AssetCache) slot.
///
/// Handles carry a generation so a handle to a released slot never aliases
/// whatever gets stored there afterwards.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

// Manually implement Clone/Copy without requiring T: Clone
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> Handle<T> {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_copy() {
        let h1: Handle<String> = Handle::new(5, 0);
        let h2 = h1;
        let h3 = h1;
        assert_eq!(h1.index(), h2.index());
        assert_eq!(h1, h3);
    }

    #[test]
    fn generation_distinguishes_handles() {
        let a: Handle<u8> = Handle::new(1, 0);
        let b: Handle<u8> = Handle::new(1, 1);
        assert_ne!(a, b);
    }
}
