//! Edge tag taxonomy.
//!
//! Every control-flow edge (and every inlining frame) carries an [`EdgeTag`]
//! naming its semantic role. Tags are bit flags: one specific-role bit,
//! optionally OR-ed with one or more *category* bits. The four categories
//! (before-call-site, after-call-site, inherited, old-value) are orthogonal
//! to the specific roles, so "is this edge in category C" is a single mask
//! test ([`EdgeTag::in_category`]) instead of an enumeration of roles.
//!
//! Composite tags like [`EdgeTag::AFTER_NEW_OBJ`] carry both their specific
//! bit and the relevant category bit simultaneously.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Semantic role of a control-flow edge.
    #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    pub struct EdgeTag: u32 {
        // Category bits, orthogonal to the specific roles below.
        const BEFORE_MASK = 1 << 0;
        const AFTER_MASK = 1 << 1;
        const INHERITED_MASK = 1 << 2;
        const OLD_MASK = 1 << 3;

        // Specific roles.
        const FALL_THROUGH = 1 << 4;
        const BRANCH = 1 << 5;
        const TRUE_EDGE = 1 << 6;
        const FALSE_EDGE = 1 << 7;
        const SWITCH_CASE = 1 << 8;
        const ENTRY = 1 << 9;
        const EXIT = 1 << 10;
        const RETURN = 1 << 11;
        const END_FINALLY = 1 << 12;
        const FINALLY = 1 << 13;
        const FAULT = 1 << 14;
        const REQUIRES = 1 << 15;
        const ASSUME = 1 << 16;
        const ASSERT = 1 << 17;
        const INVARIANT = 1 << 18;
        const CALL = 1 << 19;
        const NEW_OBJ = 1 << 20;
        const OLD_BEGIN_ROLE = 1 << 21;
        const OLD_END_ROLE = 1 << 22;
        const INHERITED_ROLE = 1 << 23;
        /// Extra contract chained onto an existing contract subroutine's exit.
        const EXTRA = 1 << 24;

        // Composite roles: specific bit plus category bit.
        const BEFORE_CALL = Self::CALL.bits() | Self::BEFORE_MASK.bits();
        const AFTER_CALL = Self::CALL.bits() | Self::AFTER_MASK.bits();
        const BEFORE_NEW_OBJ = Self::NEW_OBJ.bits() | Self::BEFORE_MASK.bits();
        const AFTER_NEW_OBJ = Self::NEW_OBJ.bits() | Self::AFTER_MASK.bits();
        const OLD_BEGIN = Self::OLD_BEGIN_ROLE.bits() | Self::OLD_MASK.bits();
        const OLD_END = Self::OLD_END_ROLE.bits() | Self::OLD_MASK.bits();
        const INHERITED = Self::INHERITED_ROLE.bits() | Self::INHERITED_MASK.bits();
    }
}

impl EdgeTag {
    /// Does this tag belong to `category`? `category` is one of the four
    /// category masks; the test is `self & category == category`.
    ///
    /// All higher-level context classification is expressed in terms of
    /// this primitive plus the specific [`EdgeTag::ENTRY`]/[`EdgeTag::EXIT`]
    /// roles.
    pub const fn in_category(self, category: EdgeTag) -> bool {
        self.bits() & category.bits() == category.bits()
    }
}

impl fmt::Display for EdgeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str("+")?;
            }
            first = false;
            f.write_str(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn composite_carries_role_and_category() {
        assert!(EdgeTag::AFTER_NEW_OBJ.contains(EdgeTag::NEW_OBJ));
        assert!(EdgeTag::AFTER_NEW_OBJ.contains(EdgeTag::AFTER_MASK));
        assert!(EdgeTag::BEFORE_CALL.contains(EdgeTag::CALL));
        assert!(EdgeTag::BEFORE_CALL.contains(EdgeTag::BEFORE_MASK));
    }

    #[test]
    fn category_test_rejects_unrelated_categories() {
        let tag = EdgeTag::AFTER_NEW_OBJ;
        assert!(tag.in_category(EdgeTag::AFTER_MASK));
        assert!(!tag.in_category(EdgeTag::BEFORE_MASK));
        assert!(!tag.in_category(EdgeTag::INHERITED_MASK));
        assert!(!tag.in_category(EdgeTag::OLD_MASK));
    }

    #[test]
    fn plain_role_is_in_no_category() {
        let tag = EdgeTag::FALL_THROUGH;
        assert!(!tag.in_category(EdgeTag::BEFORE_MASK));
        assert!(!tag.in_category(EdgeTag::AFTER_MASK));
        assert!(!tag.in_category(EdgeTag::INHERITED_MASK));
        assert!(!tag.in_category(EdgeTag::OLD_MASK));
    }

    #[test]
    fn old_value_roles_are_in_old_category() {
        assert!(EdgeTag::OLD_BEGIN.in_category(EdgeTag::OLD_MASK));
        assert!(EdgeTag::OLD_END.in_category(EdgeTag::OLD_MASK));
        assert!(EdgeTag::INHERITED.in_category(EdgeTag::INHERITED_MASK));
    }

    #[test]
    fn display_names_are_stable() {
        assert_eq!(EdgeTag::ENTRY.to_string(), "ENTRY");
        assert_eq!(EdgeTag::empty().to_string(), "none");
        assert_eq!(EdgeTag::BEFORE_CALL.to_string(), "BEFORE_MASK+CALL");
    }
}
