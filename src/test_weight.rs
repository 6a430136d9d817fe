// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

#[cfg(test)]
mod tests {
    use crate::weight::PathWeight;

    #[test]
    fn test_checked_add_within_range() {
        let a = PathWeight::new(40);
        let b = PathWeight::new(2);
        assert_eq!(a.checked_add(b), Some(PathWeight::new(42)));
    }

    #[test]
    fn test_checked_add_overflow_is_none() {
        let max = PathWeight::new(i64::MAX);
        assert_eq!(max.checked_add(PathWeight::ONE), None);
    }

    #[test]
    fn test_zero_and_one_constants() {
        assert_eq!(PathWeight::ZERO.get(), 0);
        assert_eq!(PathWeight::ONE.get(), 1);
    }

    #[test]
    fn test_ordering_matches_underlying_value() {
        assert!(PathWeight::new(1) < PathWeight::new(2));
        assert!(PathWeight::new(-1) < PathWeight::ZERO);
    }

    #[test]
    fn test_display_matches_decimal_value() {
        assert_eq!(PathWeight::new(1234).to_string(), "1234");
    }
}
