use crate::Idx;

/// A dense handle into the class-definition arena owned by the semantic
/// analyzer. Class types carry a `DefId` rather than a pointer, so the
/// inheritance/field graph can be cyclic (`class Foo { Bar b; }` / `class
/// Bar { Foo f; }`) without unsafe code or `Rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefId(pub u32);

impl Idx for DefId {
    fn from_usize(idx: usize) -> Self {
        DefId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl DefId {
    /// Placeholder id used before a forward-declared class is resolved.
    pub const DUMMY: DefId = DefId(u32::MAX);

    pub fn is_dummy(self) -> bool {
        self == Self::DUMMY
    }
}
