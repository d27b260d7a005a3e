pub mod dice;
pub mod error;
mod parser;
pub mod roll;
pub mod solver;

/// Hard caps keeping a single roll bounded
pub mod limits {
    pub const MAX_DICE_AMOUNT: u64 = 5000;
    pub const MAX_DICE_SIDES: u64 = 5000;
    /// Extra throws a single die may trigger through explode, re-roll or unique
    pub const MAX_ITERATIONS: usize = 1000;
}

#[cfg(test)]
mod tests {
    use crate::dice::Die;
    use crate::dice::FudgeDice;
    use crate::error::Error;
    use crate::roll::Source;
    use crate::solver::Solver;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    pub struct MockIter<'a, T: Iterator<Item = i64>> {
        pub iter: &'a mut T,
    }

    impl<T: Iterator<Item = i64>> Source for MockIter<'_, T> {
        fn integer(&mut self, min: i64, max: i64) -> i64 {
            match self.iter.next() {
                Some(value) => {
                    if value < min || value > max {
                        panic!("Tried to return {} for a {}..={} dice", value, min, max)
                    }
                    value
                }
                None => panic!("Iterator out of values"),
            }
        }
    }

    #[test]
    fn fudge_notation_is_required() {
        for notation in ["", "   "] {
            assert!(matches!(
                FudgeDice::new(notation, None, 4, None),
                Err(Error::MissingArgument("notation"))
            ));
        }
    }

    #[test]
    fn fudge_non_blanks_domain() {
        for non_blanks in [0, 3, -1, 6] {
            assert!(matches!(
                FudgeDice::new("4dF", Some(non_blanks), 4, None),
                Err(Error::Range(_))
            ));
        }
    }

    #[test]
    fn fudge_qty_must_be_positive() {
        for qty in [0, -1, -42] {
            assert!(matches!(
                FudgeDice::new("4dF", None, qty, None),
                Err(Error::Type(_))
            ));
        }
    }

    #[test]
    fn fudge_properties() {
        let die = FudgeDice::new("4dF.1", Some(1), 4, None).unwrap();
        assert_eq!("4dF.1", die.to_string());
        assert_eq!("4dF.1", die.notation());
        assert_eq!(1, die.non_blanks());
        assert_eq!(-1, die.min());
        assert_eq!(1, die.max());
        assert_eq!(0.0, die.average());
        assert_eq!("F.1", die.sides().to_string());
    }

    #[test]
    fn fudge_roll_length_matches_qty() {
        for qty in [1, 4, 17] {
            let die = FudgeDice::new("dF", None, qty, None).unwrap();
            let results = die.roll_with(&mut StdRng::seed_from_u64(7));
            assert_eq!(qty as usize, results.len());
            assert!(results.iter().all(|r| (-1..=1).contains(&r.value())));
        }
    }

    #[test]
    fn fudge_json() {
        let die = FudgeDice::new("4dF", None, 4, None).unwrap();
        assert_eq!(
            json!({
                "average": 0,
                "max": 1,
                "min": -1,
                "modifiers": null,
                "name": "fudge",
                "notation": "4dF",
                "qty": 4,
                "sides": "F.2",
                "type": "die",
            }),
            serde_json::to_value(&die).unwrap()
        );
    }

    #[test]
    fn solve_explode_and_keep() {
        let solver = Solver::new("3d6!!>=5kh2").unwrap();
        assert_eq!("3d6!!>=5kh2", solver.as_str());
        let mut rolls = vec![5, 2, 6, 3, 5, 1].into_iter();
        let results = solver.solve_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!("[8!!, 2d, 12!!]", results.to_string());
        assert_eq!(20, results.get_total());
    }

    #[test]
    fn solve_fudge() {
        let solver = Solver::new("4dF.2").unwrap();
        let mut rolls = vec![1, 2, 3, 3].into_iter();
        let results = solver.solve_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!("[-1, 0, 1, 1]", results.to_string());
        assert_eq!(1, results.get_total());
    }

    #[test]
    fn solve_target_pool() {
        let err = Solver::new("6d10>=8f1").unwrap_err();
        assert!(matches!(err, Error::Pest(_)));

        let solver = Solver::new("6d10>=8f=1").unwrap();
        let mut rolls = vec![8, 1, 10, 4, 7, 9].into_iter();
        let results = solver.solve_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!("[8*, 1_, 10*, 4, 7, 9*]", results.to_string());
        assert_eq!(2, results.get_total());
    }

    #[test]
    fn solve_with_rng() {
        let solver = Solver::new("10d20").unwrap();
        let first = solver.solve_with(&mut StdRng::seed_from_u64(42));
        let second = solver.solve_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert_eq!(10, first.len());
        assert!((10..=200).contains(&solver.solve().get_total()));
    }

    #[test]
    fn results_json() {
        let solver = Solver::new("2d6dl1").unwrap();
        let mut rolls = vec![2, 5].into_iter();
        let results = solver.solve_with_source(&mut MockIter { iter: &mut rolls });
        assert_eq!(
            json!([
                {
                    "calculationValue": 2,
                    "initialValue": 2,
                    "modifierFlags": "d",
                    "modifiers": ["drop"],
                    "type": "result",
                    "useInTotal": false,
                    "value": 2,
                },
                {
                    "calculationValue": 5,
                    "initialValue": 5,
                    "modifierFlags": "",
                    "modifiers": [],
                    "type": "result",
                    "useInTotal": true,
                    "value": 5,
                },
            ]),
            serde_json::to_value(&results).unwrap()
        );
    }
}
