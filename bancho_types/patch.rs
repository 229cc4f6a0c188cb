/// A field in a partial update: either left untouched or set to a value.
///
/// `Unset` never collides with a legitimate value, so `Patch<bool>` can carry
/// `false` and `Patch<Option<T>>` can carry an explicit `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Unset,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset => None,
        }
    }

    /// Returns the new value when set, otherwise `current`.
    pub fn apply(self, current: T) -> T {
        match self {
            Patch::Set(value) => value,
            Patch::Unset => current,
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}
