//! Deciding how many items of a list fit into a space of limited height.
//!
//! Items are laid out one after another, each taking up the size reported for
//! it.  Layout stops at the first item that would not fit; that item and all
//! after it are hidden, and the number of hidden items is reported so that the
//! caller can offer a way to see them all.

/// Result of laying out a list of items in a limited space
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Fit {
    /// Number of leading items that fit
    pub(crate) shown: usize,
    /// Number of items after those that did not fit
    pub(crate) hidden: usize,
}

impl Fit {
    pub(crate) fn is_overflowing(&self) -> bool {
        self.hidden > 0
    }

    /// The items that fit, i.e., the first `shown` elements of `items`
    pub(crate) fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(..self.shown).unwrap_or(items)
    }

    /// Text for the "show everything" affordance, if anything was hidden
    pub(crate) fn more_label(&self) -> Option<String> {
        self.is_overflowing().then(|| format!("+{} more", self.hidden))
    }
}

/// Lay out `items` in a space of height `capacity`
pub(crate) fn fit<T, F>(capacity: u16, items: &[T], size_of: F) -> Fit
where
    F: Fn(&T) -> u16,
{
    let mut used = 0u16;
    let shown = items
        .iter()
        .take_while(|item| match used.checked_add(size_of(*item)) {
            Some(total) if total <= capacity => {
                used = total;
                true
            }
            _ => false,
        })
        .count();
    Fit {
        shown,
        hidden: items.len() - shown,
    }
}

/// A [`Fit`] that is only recomputed when the available space or the list of
/// items changes.
///
/// Changes to the list are detected by a revision number supplied by the
/// caller, which must differ whenever the items may have changed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct OverflowLayout {
    key: Option<(u16, u64)>,
    fit: Fit,
}

impl OverflowLayout {
    pub(crate) fn ensure<T, F>(
        &mut self,
        capacity: u16,
        revision: u64,
        items: &[T],
        size_of: F,
    ) -> Fit
    where
        F: Fn(&T) -> u16,
    {
        let key = (capacity, revision);
        if self.key != Some(key) {
            self.fit = fit(capacity, items, size_of);
            self.key = Some(key);
        }
        self.fit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_capacity() {
        let items = ["a", "b", "c", "d", "e"];
        let f = fit(3, &items, |_| 1);
        assert_eq!(f, Fit { shown: 3, hidden: 2 });
        assert_eq!(f.visible(&items), ["a", "b", "c"]);
        assert_eq!(f.more_label().as_deref(), Some("+2 more"));
    }

    #[test]
    fn test_everything_fits() {
        let items = [1u16, 1];
        let f = fit(5, &items, |&n| n);
        assert_eq!(f, Fit { shown: 2, hidden: 0 });
        assert!(!f.is_overflowing());
        assert_eq!(f.more_label(), None);
        assert_eq!(f.visible(&items), items);
    }

    #[test]
    fn test_stops_at_first_misfit() {
        // The third item would fit on its own, but layout stops at the second
        let items = [2u16, 3, 1];
        let f = fit(4, &items, |&n| n);
        assert_eq!(f, Fit { shown: 1, hidden: 2 });
    }

    #[test]
    fn test_zero_capacity() {
        let items = ['x', 'y'];
        assert_eq!(fit(0, &items, |_| 1), Fit { shown: 0, hidden: 2 });
        assert_eq!(fit(0, &items, |_| 0), Fit { shown: 2, hidden: 0 });
    }

    #[test]
    fn test_empty() {
        let items: [u16; 0] = [];
        assert_eq!(fit(3, &items, |&n| n), Fit::default());
    }

    #[test]
    fn test_no_overflow_on_huge_sizes() {
        let items = [u16::MAX, 1];
        assert_eq!(fit(u16::MAX, &items, |&n| n), Fit { shown: 1, hidden: 1 });
    }

    #[test]
    fn test_layout_recomputes_on_resize() {
        let items = [1u16; 6];
        let mut layout = OverflowLayout::default();
        assert_eq!(layout.ensure(4, 0, &items, |&n| n), Fit { shown: 4, hidden: 2 });
        assert_eq!(layout.ensure(2, 0, &items, |&n| n), Fit { shown: 2, hidden: 4 });
        assert_eq!(layout.ensure(10, 0, &items, |&n| n), Fit { shown: 6, hidden: 0 });
    }

    #[test]
    fn test_layout_recomputes_on_new_revision() {
        let mut layout = OverflowLayout::default();
        assert_eq!(layout.ensure(3, 1, &[1u16; 5], |&n| n), Fit { shown: 3, hidden: 2 });
        // Same revision: the cached layout is reused
        assert_eq!(layout.ensure(3, 1, &[1u16; 2], |&n| n), Fit { shown: 3, hidden: 2 });
        assert_eq!(layout.ensure(3, 2, &[1u16; 2], |&n| n), Fit { shown: 2, hidden: 0 });
    }
}
