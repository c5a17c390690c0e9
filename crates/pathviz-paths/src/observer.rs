use pathviz_core::{Pos, Role};

/// A role the engine just wrote to a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleChange {
    pub pos: Pos,
    pub role: Role,
}

/// Receives role changes synchronously, right after each grid mutation.
pub trait SearchObserver {
    fn role_changed(&mut self, change: RoleChange);
}

/// Discards every change.
impl SearchObserver for () {
    #[inline]
    fn role_changed(&mut self, _change: RoleChange) {}
}

/// Records every change in order.
impl SearchObserver for Vec<RoleChange> {
    #[inline]
    fn role_changed(&mut self, change: RoleChange) {
        self.push(change);
    }
}

impl<T: SearchObserver + ?Sized> SearchObserver for &mut T {
    #[inline]
    fn role_changed(&mut self, change: RoleChange) {
        (**self).role_changed(change);
    }
}
