use bitflags::bitflags;

bitflags! {
    pub struct UnificationMode : u8 {
        /// Instructs the unifier to solve two types for equality, merging them in place.
        ///
        /// For example, { x : Int }a ~ { x : Int, y : Str } merges both records into one node.
        const EQ = 1 << 0;
        /// Instructs the unifier to treat the left-hand side as a generic scheme: it is copied
        /// while being unified, so only the right-hand side is refined.
        ///
        /// Non-generic nodes reached from the left-hand side fall back to [`UnificationMode::EQ`].
        const FRESH = 1 << 1;
        /// Instructs the unifier to only probe compatibility. Nothing is merged, copied or
        /// compacted; the answer is "maybe" rather than "yes".
        const TRIAL = 1 << 2;
    }
}

impl UnificationMode {
    pub fn is_fresh(&self) -> bool {
        debug_assert!(self.bits().count_ones() == 1, "modes are exclusive");
        self.contains(UnificationMode::FRESH)
    }

    /// The mode used once a fresh-unification reaches a non-generic node or one it has already
    /// copied.
    pub fn as_eq(self) -> Self {
        (self - UnificationMode::FRESH - UnificationMode::TRIAL) | UnificationMode::EQ
    }

    pub fn pretty_print(&self) -> &str {
        if self.contains(UnificationMode::EQ) {
            "~"
        } else if self.contains(UnificationMode::FRESH) {
            "~fresh"
        } else if self.contains(UnificationMode::TRIAL) {
            "~?"
        } else {
            unreachable!("Bad mode!")
        }
    }
}
