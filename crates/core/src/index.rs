//! Index arguments and bounds validation
//!
//! List operations accept any [`ListIndex`] so callers can pass signed
//! indices. Negative values are rejected with `NegativeIndex`, then the
//! non-negative index is checked against the bound that applies to the call:
//!
//! - read/replace/remove/move/swap: `[0, len)`
//! - insert: `[0, len]`

use crate::error::{StrataError, StrataResult};

/// A value usable as a list index
pub trait ListIndex: Copy {
    /// Resolve into a non-negative offset
    fn to_offset(self) -> StrataResult<usize>;
}

impl ListIndex for usize {
    fn to_offset(self) -> StrataResult<usize> {
        Ok(self)
    }
}

impl ListIndex for u32 {
    fn to_offset(self) -> StrataResult<usize> {
        Ok(usize::try_from(self).unwrap_or(usize::MAX))
    }
}

macro_rules! impl_signed_index {
    ($($ty:ty),*) => {
        $(
            impl ListIndex for $ty {
                fn to_offset(self) -> StrataResult<usize> {
                    if self < 0 {
                        return Err(StrataError::NegativeIndex { index: self as i64 });
                    }
                    // Saturate so the bounds check reports the real length.
                    Ok(usize::try_from(self).unwrap_or(usize::MAX))
                }
            }
        )*
    };
}

impl_signed_index!(i32, i64, isize);

/// Validate an index for element access (`[0, len)`)
pub fn check_element_index<I: ListIndex>(index: I, len: usize) -> StrataResult<usize> {
    let offset = index.to_offset()?;
    if offset >= len {
        return Err(StrataError::IndexOutOfBounds { index: offset, len });
    }
    Ok(offset)
}

/// Validate an index for insertion (`[0, len]`)
pub fn check_insert_index<I: ListIndex>(index: I, len: usize) -> StrataResult<usize> {
    let offset = index.to_offset()?;
    if offset > len {
        return Err(StrataError::IndexOutOfBounds {
            index: offset,
            len: len + 1,
        });
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_negative_is_reported_before_bounds() {
        let err = check_element_index(-1, 0).unwrap_err();
        assert!(matches!(err, StrataError::NegativeIndex { index: -1 }));
    }

    #[test]
    fn test_element_bound_is_exclusive() {
        assert_eq!(check_element_index(2usize, 3).unwrap(), 2);
        let err = check_element_index(3usize, 3).unwrap_err();
        assert!(matches!(err, StrataError::IndexOutOfBounds { index: 3, len: 3 }));
    }

    #[test]
    fn test_insert_bound_allows_tail() {
        assert_eq!(check_insert_index(3, 3).unwrap(), 3);
        let err = check_insert_index(4, 3).unwrap_err();
        assert!(matches!(err, StrataError::IndexOutOfBounds { index: 4, len: 4 }));
        assert!(check_insert_index(-1, 3).is_err());
    }

    #[test]
    fn test_huge_index_reports_real_length() {
        let err = check_element_index(i64::MAX, 3).unwrap_err();
        assert!(matches!(err, StrataError::IndexOutOfBounds { len: 3, .. }));
        assert!(err.to_string().ends_with("(must be less than 3)"));

        let err = check_insert_index(isize::MAX, 3).unwrap_err();
        assert!(matches!(err, StrataError::IndexOutOfBounds { len: 4, .. }));
        let err = check_element_index(u32::MAX, 0).unwrap_err();
        assert!(matches!(err, StrataError::IndexOutOfBounds { len: 0, .. }));
    }

    proptest! {
        #[test]
        fn prop_element_index_ok_iff_in_range(i in -50i64..50, len in 0usize..20) {
            let ok = check_element_index(i, len).is_ok();
            prop_assert_eq!(ok, i >= 0 && (i as usize) < len);
        }

        #[test]
        fn prop_insert_index_ok_iff_in_range(i in -50i64..50, len in 0usize..20) {
            let ok = check_insert_index(i, len).is_ok();
            prop_assert_eq!(ok, i >= 0 && (i as usize) <= len);
        }
    }
}
