use std::cell::Cell;
use std::ops;


// Value that remembers whether it has been written since the last `take_dirt` call. Used to
// decide whether the board has to be redrawn.
#[derive(Clone, Debug)]
pub struct Dirty<T> {
    value: T,
    dirty: Cell<bool>,
}

impl<T> Dirty<T> {
    // Fresh values are dirty: nothing has been drawn yet.
    pub fn new(value: T) -> Self { Self { value, dirty: Cell::new(true) } }

    pub fn get_mut(&mut self) -> &mut T {
        self.dirty.set(true);
        &mut self.value
    }

    pub fn take_dirt(&self) -> bool { self.dirty.replace(false) }
}

impl<T: PartialEq> Dirty<T> {
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.dirty.set(true);
        }
    }
}

impl<T> ops::Deref for Dirty<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target { &self.value }
}
// Don't implement `DerefMut`. A call to `get_mut` stresses the fact that it sets the dirty flag.
