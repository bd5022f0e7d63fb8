/// A set backed by a `Vec`, for the handful of alias names a struct node carries.
///
/// Iteration follows first insertion, which is the order names are printed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VecSet<T> {
    elements: Vec<T>,
}

impl<T> Default for VecSet<T> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
        }
    }
}

impl<T> VecSet<T> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T: PartialEq> VecSet<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.elements.contains(value)
    }

    /// Returns true iff the value was already in the set.
    pub fn insert(&mut self, value: T) -> bool {
        let present = self.contains(&value);

        if !present {
            self.elements.push(value);
        }

        present
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.iter().any(|value| other.contains(value))
    }
}

impl<T: PartialEq + Clone> VecSet<T> {
    /// Appends the elements of `other` this set lacks, in `other`'s order.
    pub fn union_with(&mut self, other: &Self) {
        self.extend(other.iter().cloned());
    }
}

impl<T: PartialEq> Extend<T> for VecSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: PartialEq> FromIterator<T> for VecSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = VecSet::default();
        set.extend(iter);
        set
    }
}

impl<'a, T> IntoIterator for &'a VecSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::VecSet;

    #[test]
    fn insert_reports_duplicates() {
        let mut set = VecSet::default();

        assert!(!set.insert("P"));
        assert!(set.insert("P"));
        assert!(!set.insert("Q"));
        assert_eq!(set.as_slice(), &["P", "Q"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn union_keeps_first_seen_order() {
        let mut left: VecSet<_> = ["Q", "P"].into_iter().collect();
        let right: VecSet<_> = ["P", "R"].into_iter().collect();

        left.union_with(&right);

        assert_eq!(left.as_slice(), &["Q", "P", "R"]);
        assert!(left.intersects(&right));
    }

    #[test]
    fn empty_sets_meet_nothing() {
        let empty: VecSet<&str> = VecSet::default();
        let full: VecSet<_> = ["P"].into_iter().collect();

        assert!(empty.is_empty());
        assert!(!empty.intersects(&full));
        assert!(!full.intersects(&empty));
    }
}
