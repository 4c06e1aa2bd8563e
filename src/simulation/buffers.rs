/// Ping-pong pair of equally shaped simulation buffers.
///
/// `read` is the only record of which slot is the front buffer; the write
/// slot is always derived from it, so read and write can never alias.
pub struct BufferSet<T> {
    /// Slot 0 = A (ping), slot 1 = B (pong)
    slots: [T; 2],
    /// Which slot is the current input
    read: usize,
}

/// Logical buffer label
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }

    fn from_index(index: usize) -> Self {
        if index == 0 {
            Slot::A
        } else {
            Slot::B
        }
    }
}

impl<T> BufferSet<T> {
    /// Create a set reading from `a` and writing to `b`
    pub fn new(a: T, b: T) -> Self {
        Self {
            slots: [a, b],
            read: 0,
        }
    }

    /// Slot currently designated as input
    pub fn read_slot(&self) -> Slot {
        Slot::from_index(self.read)
    }

    /// Slot currently designated as output
    pub fn write_slot(&self) -> Slot {
        Slot::from_index(1 - self.read)
    }

    /// Current front buffer
    pub fn read(&self) -> &T {
        &self.slots[self.read]
    }

    /// Current back buffer
    pub fn write(&self) -> &T {
        &self.slots[1 - self.read]
    }

    /// Get (input, output) for the next kernel invocation
    pub fn io_mut(&mut self) -> (&T, &mut T) {
        let (a, b) = self.slots.split_at_mut(1);
        if self.read == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    /// Mutable access to the front buffer, for re-seeding
    pub fn read_mut(&mut self) -> &mut T {
        &mut self.slots[self.read]
    }

    /// Exchange roles. Handles move, contents do not.
    pub fn swap(&mut self) {
        self.read = 1 - self.read;
    }

    /// Return to reading from A
    pub fn reset(&mut self) {
        self.read = 0;
    }

    pub fn get(&self, slot: Slot) -> &T {
        &self.slots[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_designation() {
        let set = BufferSet::new("a", "b");
        assert_eq!(set.read_slot(), Slot::A);
        assert_eq!(set.write_slot(), Slot::B);
        assert_eq!(*set.read(), "a");
        assert_eq!(*set.write(), "b");
    }

    #[test]
    fn test_swap_exchanges_roles() {
        let mut set = BufferSet::new("a", "b");
        set.swap();
        assert_eq!(*set.read(), "b");
        assert_eq!(*set.write(), "a");
    }

    #[test]
    fn test_double_swap_is_identity() {
        let mut set = BufferSet::new(1, 2);
        let before = (set.read_slot(), *set.read());
        set.swap();
        set.swap();
        assert_eq!((set.read_slot(), *set.read()), before);
    }

    #[test]
    fn test_read_and_write_never_alias() {
        let mut set = BufferSet::new(vec![0u8; 4], vec![0u8; 4]);
        for _ in 0..5 {
            let (input, output) = set.io_mut();
            assert_ne!(input.as_ptr(), output.as_ptr());
            assert_ne!(set.read_slot(), set.write_slot());
            set.swap();
        }
    }

    #[test]
    fn test_io_mut_writes_back_buffer() {
        let mut set = BufferSet::new(0, 0);
        {
            let (_, output) = set.io_mut();
            *output = 7;
        }
        assert_eq!(*set.get(Slot::B), 7);
        set.swap();
        assert_eq!(*set.read(), 7);
    }

    #[test]
    fn test_reset() {
        let mut set = BufferSet::new('a', 'b');
        set.swap();
        set.reset();
        assert_eq!(set.read_slot(), Slot::A);
    }
}
