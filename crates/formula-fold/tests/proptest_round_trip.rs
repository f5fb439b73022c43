#![allow(unexpected_cfgs)]

use formula_fold::reverse::normalize_body;
use formula_fold::{fold, switch_mode, unfold, Mode};
use proptest::prelude::*;

#[cfg(fuzzing)]
const CASES: u32 = 1024;
#[cfg(not(fuzzing))]
const CASES: u32 = 64;

const FUNCTIONS: &[&str] = &[
    "SUM",
    "IF",
    "AND",
    "OR",
    "NOT",
    "LET",
    "IFS",
    "SWITCH",
    "MAX",
    "CONCATENATE",
    "VLOOKUP",
    "LEN",
    "IFERROR",
];

const OPERATORS: &[&str] = &["+", "-", "*", "/", "&", "=", "<>", ">=", "<", " "];

fn leaf() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "A1",
        "$B$2",
        "Sheet1!C3",
        "A1:B5",
        "1",
        "2.5",
        r#""x""#,
        r#""A1""#,
        r#""a // b""#,
        r#""He said ""hi""""#,
        r##""# note""##,
        "#N/A",
        "has_Price",
        "TRUE",
        "NOW()",
    ])
    .prop_map(str::to_string)
}

fn formula_body() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(OPERATORS), inner.clone())
                .prop_map(|(lhs, op, rhs)| format!("{lhs}{op}{rhs}")),
            (
                prop::sample::select(FUNCTIONS),
                prop::collection::vec(prop::option::weighted(0.85, inner), 1..6),
            )
                .prop_map(|(name, args)| {
                    let args: Vec<String> =
                        args.into_iter().map(Option::unwrap_or_default).collect();
                    format!("{name}({})", args.join(","))
                }),
        ]
    })
}

fn canonical(body: &str) -> String {
    format!("={}", normalize_body(body))
}

fn mode_id() -> impl Strategy<Value = &'static str> {
    prop::sample::select(Mode::all().iter().map(|mode| mode.id()).collect::<Vec<_>>())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: CASES,
        max_shrink_iters: 0,
        .. ProptestConfig::default()
    })]

    #[test]
    fn fold_then_unfold_is_lossless(body in formula_body(), mode in mode_id()) {
        let folded = fold(mode, &format!("={body}")).unwrap();
        let unfolded = unfold(mode, &folded).unwrap();
        prop_assert_eq!(unfolded, canonical(&body), "folded:\n{}", folded);
    }

    #[test]
    fn unfolded_output_is_a_fixed_point(body in formula_body(), mode in mode_id()) {
        let first = unfold(mode, &fold(mode, &format!("={body}")).unwrap()).unwrap();
        let second = unfold(mode, &fold(mode, &first).unwrap()).unwrap();
        prop_assert_eq!(second, first);
    }

    #[test]
    fn switching_modes_preserves_the_formula(
        body in formula_body(),
        from in mode_id(),
        to in mode_id(),
    ) {
        let folded = fold(from, &format!("={body}")).unwrap();
        let switched = switch_mode(&folded, from, to).unwrap();
        let unfolded = unfold(to, &switched).unwrap();
        prop_assert_eq!(unfolded, canonical(&body));
    }

    #[test]
    fn quiet_modes_emit_no_comment_lines(body in formula_body()) {
        for id in ["p", "c"] {
            let folded = fold(id, &format!("={body}")).unwrap();
            prop_assert!(
                folded.lines().all(|line| !line.trim_start().starts_with("//")),
                "{}", folded
            );
        }
    }
}
