use proptest::prelude::*;
use zerosim_math::transcendental;
use zerosim_math::{ErrorKind, FixedPointValue, MAX_VALUE, SCALE};

// Property 1: decimal round-trip is exact for every raw value
proptest! {
    #[test]
    fn prop_decimal_roundtrip(raw in any::<u128>()) {
        let v = FixedPointValue::from_raw(raw);
        let s = v.to_decimal_string();
        let back = FixedPointValue::from_decimal_string(&s).unwrap();
        prop_assert_eq!(back, v);
    }
}

// Property 2: add is exact inside the range and fails outside it
proptest! {
    #[test]
    fn prop_add_exact_or_overflow(a in any::<u128>(), b in any::<u128>()) {
        let result = FixedPointValue::from_raw(a).checked_add(FixedPointValue::from_raw(b));
        match a.checked_add(b) {
            Some(sum) => prop_assert_eq!(result.unwrap().raw(), sum),
            None => prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::Overflow),
        }
    }
}

// Property 3: sub never wraps
proptest! {
    #[test]
    fn prop_sub_never_wraps(a in any::<u128>(), b in any::<u128>()) {
        let result = FixedPointValue::from_raw(a).checked_sub(FixedPointValue::from_raw(b));
        if a >= b {
            prop_assert_eq!(result.unwrap().raw(), a - b);
        } else {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::Overflow);
        }
    }
}

// Property 4: division by zero always fails the same way
proptest! {
    #[test]
    fn prop_div_by_zero(a in any::<u128>()) {
        let err = FixedPointValue::from_raw(a).checked_div(FixedPointValue::ZERO).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::ZeroDivision);
    }
}

// Property 5: mul is commutative and never exceeds MAX_VALUE
proptest! {
    #[test]
    fn prop_mul_commutative(a in any::<u128>(), b in 0u128..(1000 * SCALE)) {
        let x = FixedPointValue::from_raw(a);
        let y = FixedPointValue::from_raw(b);
        let xy = x.checked_mul(y);
        let yx = y.checked_mul(x);
        prop_assert_eq!(xy.clone(), yx);
        if let Ok(v) = xy {
            prop_assert!(v.raw() <= MAX_VALUE);
        }
    }
}

// Property 6: mul by one and div by one are identities
proptest! {
    #[test]
    fn prop_one_is_identity(a in 0u128..(u128::MAX / SCALE)) {
        let x = FixedPointValue::from_raw(a);
        prop_assert_eq!(x.checked_mul(FixedPointValue::ONE).unwrap(), x);
        prop_assert_eq!(x.checked_div(FixedPointValue::ONE).unwrap(), x);
    }
}

// Property 7: sigmoid stays in [0.5, 1] and tanh in [0, 1] for all inputs
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_squashing_functions_bounded(raw in 0u128..(100 * SCALE)) {
        let x = FixedPointValue::from_raw(raw);
        let s = transcendental::sigmoid(x, 30).unwrap();
        prop_assert!(s.raw() >= SCALE / 2 && s.raw() <= SCALE);
        let t = transcendental::tanh(x, 30).unwrap();
        prop_assert!(t.raw() <= SCALE);
    }
}

// Property 8: sqrt of a perfect square recovers the root
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_sqrt_perfect_square(n in 1u128..1000) {
        let square = FixedPointValue::from_integer(n * n).unwrap();
        let root = transcendental::sqrt(square, 40).unwrap();
        prop_assert_eq!(root, FixedPointValue::from_integer(n).unwrap());
    }
}
