#[cfg(test)]
mod tests {
    use crate::Simulation::operating_point::solve_volume_fraction;
    use crate::Simulation::orchestrator::{
        run_simulation, run_simulation_with_profile, stripped_organic_cu,
    };
    use crate::Simulation::scenarios::{StageCounts, stage_counts};
    use crate::Simulation::sensitivity::{
        STABLE_PROCESS_MESSAGE, analyze_sensitivity, parameter_responses,
    };
    use crate::errors::SxError;
    use crate::process_inputs::ProcessInputs;
    use crate::settings::{InputDefaults, SolverSettings};
    use approx::assert_relative_eq;

    fn plant() -> ProcessInputs {
        ProcessInputs::new()
            .with("plsCu", 4.0)
            .with("oaRatio", 1.0)
            .with("mef1e", 95.0)
            .with("mef2e", 95.0)
            .with("mef3e", 95.0)
            .with("mef1s", 95.0)
    }

    fn one_strip_three_ext() -> StageCounts {
        StageCounts::new(1, 3)
    }

    #[test]
    fn test_stripped_organic() {
        let d = InputDefaults::default();
        let inputs = plant();
        assert_relative_eq!(
            stripped_organic_cu(&inputs, 10.34, 1, &d),
            10.34 * 0.85 * 0.24,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            stripped_organic_cu(&inputs, 10.34, 2, &d),
            10.34 * 0.85 * 0.24 * 0.24,
            epsilon = 1e-12
        );
        let inputs = inputs.with("sr", 50.0).with("mef2s", 50.0);
        assert_relative_eq!(
            stripped_organic_cu(&inputs, 10.0, 2, &d),
            10.0 * 0.5 * 0.6 * 0.24,
            epsilon = 1e-12
        );
        assert_eq!(stripped_organic_cu(&inputs, 10.0, 0, &d), 5.0);
    }

    #[test]
    fn test_end_to_end_three_stage_plant() {
        let settings = SolverSettings::default();
        let inputs = plant().with("sr", 35.0);
        let counts = stage_counts("C").unwrap();
        assert_eq!(counts, one_strip_three_ext());
        let res = run_simulation(&inputs, 20.0, counts, &settings).unwrap();
        assert_relative_eq!(res.max_loading, 10.34, epsilon = 1e-12);
        assert_eq!(res.avg_feed_cu, 4.0);
        assert!(res.extraction_recovery > 90.0, "{:?}", res);
        assert!(res.raffinate_cu < 0.5, "{:?}", res);

        let single = run_simulation(&inputs, 20.0, StageCounts::new(1, 1), &settings).unwrap();
        assert!(single.extraction_recovery < res.extraction_recovery);
    }

    #[test]
    fn test_default_target_plant() {
        let res = run_simulation(&plant(), 20.0, one_strip_three_ext(), &SolverSettings::default())
            .unwrap();
        // the stripped organic limits how low the raffinate can go
        assert_relative_eq!(res.stripped_organic_cu, 2.10936, epsilon = 1e-9);
        assert!(res.extraction_recovery > 70.0 && res.extraction_recovery < 85.0);
        assert!(res.raffinate_cu > 0.6);
        assert!(res.stripping_recovery > 0.0 && res.stripping_recovery <= 100.0);
        assert_relative_eq!(
            res.stripping_ratio,
            res.loaded_organic_cu / res.max_loading * 100.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            res.net_transfer,
            (res.loaded_organic_cu - res.stripped_organic_cu) / 20.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_more_extraction_stages_recover_more() {
        let settings = SolverSettings::default();
        let mut previous = -1.0;
        for n in 1..=4 {
            let res = run_simulation(&plant(), 20.0, StageCounts::new(1, n), &settings).unwrap();
            assert!(res.extraction_recovery > previous, "{} stages", n);
            previous = res.extraction_recovery;
        }
    }

    #[test]
    fn test_efficiency_80_to_100_does_not_reduce_recovery() {
        let settings = SolverSettings::default();
        let run = |eff: f64| {
            let inputs = plant()
                .with("mef1e", eff)
                .with("mef2e", eff)
                .with("mef3e", eff);
            run_simulation(&inputs, 20.0, one_strip_three_ext(), &settings)
                .unwrap()
                .extraction_recovery
        };
        assert!(run(100.0) >= run(80.0));
        assert!(run(90.0) >= run(80.0));
    }

    #[test]
    fn test_deterministic() {
        let settings = SolverSettings::default();
        let a = run_simulation(&plant(), 17.3, one_strip_three_ext(), &settings).unwrap();
        let b = run_simulation(&plant(), 17.3, one_strip_three_ext(), &settings).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_volume_fraction() {
        let settings = SolverSettings::default();
        for v in [0.0, -5.0, f64::NAN] {
            let err = run_simulation(&plant(), v, one_strip_three_ext(), &settings).unwrap_err();
            assert!(matches!(err, SxError::InvalidInput(_)), "{}", v);
        }
    }

    #[test]
    fn test_zero_oa_ratio_is_a_computation_error() {
        let inputs = plant().with("oaRatio", 0.0);
        let err = run_simulation(&inputs, 20.0, one_strip_three_ext(), &SolverSettings::default())
            .unwrap_err();
        assert!(matches!(err, SxError::UnexpectedComputation(_)));
    }

    #[test]
    fn test_missing_feed_and_empty_circuit_are_invalid() {
        let settings = SolverSettings::default();
        let no_feed = ProcessInputs::new().with("oaRatio", 1.0);
        assert!(matches!(
            run_simulation(&no_feed, 20.0, one_strip_three_ext(), &settings),
            Err(SxError::InvalidInput(_))
        ));
        assert!(matches!(
            run_simulation(&plant(), 20.0, StageCounts::new(1, 0), &settings),
            Err(SxError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_feed_gives_zero_recovery() {
        let inputs = plant().with("plsCu", 0.0);
        let res = run_simulation(&inputs, 20.0, one_strip_three_ext(), &SolverSettings::default())
            .unwrap();
        assert_eq!(res.avg_feed_cu, 0.0);
        assert_eq!(res.extraction_recovery, 0.0);
        assert!(res.stripping_recovery >= 0.0);
    }

    #[test]
    fn test_profile_is_consistent_with_result() {
        let (res, circuit) = run_simulation_with_profile(
            &plant(),
            20.0,
            one_strip_three_ext(),
            &SolverSettings::default(),
        )
        .unwrap();
        assert_eq!(circuit.organic_out.len(), 3);
        assert_eq!(circuit.loaded_organic_cu, res.loaded_organic_cu);
        assert_eq!(circuit.raffinate_cu, res.raffinate_cu);
        assert_eq!(circuit.stage_stats.unconverged, 0);
    }

    #[test]
    fn test_solve_volume_fraction_hits_target() {
        let settings = SolverSettings::default();
        for target in [30.0, 40.0, 50.0, 60.0] {
            let inputs = plant().with("sr", target);
            let point = solve_volume_fraction(&inputs, one_strip_three_ext(), &settings).unwrap();
            assert!(point.volume_fraction >= 1.0 && point.volume_fraction <= 100.0);
            let check =
                run_simulation(&inputs, point.volume_fraction, one_strip_three_ext(), &settings)
                    .unwrap();
            assert!(
                (check.stripping_ratio - target).abs() < 0.01,
                "target {} got {}",
                target,
                check.stripping_ratio
            );
        }
    }

    #[test]
    fn test_unreachable_target_is_a_convergence_error() {
        let settings = SolverSettings::default();
        // between 1 and 100 %v/v this plant runs at stripping ratios of roughly 9% to 62%
        for target in [85.0, 70.0, 5.0] {
            let inputs = plant().with("sr", target);
            let err = solve_volume_fraction(&inputs, one_strip_three_ext(), &settings).unwrap_err();
            match err {
                SxError::Convergence { target: t, achieved, .. } => {
                    assert_eq!(t, target);
                    assert!((achieved - target).abs() > 0.01);
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_target_ratio_falls_back_to_the_default() {
        // without "sr" the search aims at the 85% default, out of this plant's reach
        let mut settings = SolverSettings::default();
        let err = solve_volume_fraction(&plant(), one_strip_three_ext(), &settings).unwrap_err();
        assert!(matches!(err, SxError::Convergence { target, .. } if target == 85.0));

        settings.defaults.target_stripping_ratio = 40.0;
        let point = solve_volume_fraction(&plant(), one_strip_three_ext(), &settings).unwrap();
        assert!((point.achieved_ratio - 40.0).abs() <= settings.optimizer.ratio_tolerance);
    }

    #[test]
    fn test_search_reports_input_errors_before_searching() {
        let settings = SolverSettings::default();
        let err = solve_volume_fraction(
            &plant().with("oaRatio", 0.0).with("sr", 40.0),
            one_strip_three_ext(),
            &settings,
        )
        .unwrap_err();
        assert!(matches!(err, SxError::UnexpectedComputation(_)));

        let no_feed = ProcessInputs::new().with("oaRatio", 1.0).with("sr", 40.0);
        let err = solve_volume_fraction(&no_feed, one_strip_three_ext(), &settings).unwrap_err();
        assert!(matches!(err, SxError::InvalidInput(ref m) if m.contains("PLS copper")));

        let err = solve_volume_fraction(&plant(), StageCounts::new(1, 0), &settings).unwrap_err();
        assert!(matches!(err, SxError::InvalidInput(_)));
    }

    #[test]
    fn test_sensitivity_reports_both_parameters() {
        let settings = SolverSettings::default();
        let inputs = plant();
        let base = run_simulation(&inputs, 20.0, one_strip_three_ext(), &settings).unwrap();
        let responses = parameter_responses(&inputs, &base, 20.0, one_strip_three_ext(), &settings);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].key, "oaRatio");
        assert_eq!(responses[1].key, "plsCu");
        let recs = analyze_sensitivity(&inputs, &base, 20.0, one_strip_three_ext(), &settings);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("extraction O/A ratio"));
        assert!(recs[0].starts_with("Recommendation: a 5% increase"));
        assert!(recs[1].contains("primary PLS copper concentration"));
        // base inputs untouched
        assert_eq!(inputs, plant());
    }

    #[test]
    fn test_sensitivity_stable_statement() {
        let mut settings = SolverSettings::default();
        let inputs = plant();
        let base = run_simulation(&inputs, 20.0, one_strip_three_ext(), &settings).unwrap();
        settings.sensitivity.threshold = 50.0;
        let recs = analyze_sensitivity(&inputs, &base, 20.0, one_strip_three_ext(), &settings);
        assert_eq!(recs, vec![STABLE_PROCESS_MESSAGE.to_string()]);

        // tracked parameters absent or zero are skipped
        let settings = SolverSettings::default();
        let inputs = ProcessInputs::new()
            .with("plsCu1", 4.0)
            .with("plsFlow1", 1.0)
            .with("oaRatio", 0.0);
        let responses = parameter_responses(&inputs, &base, 20.0, one_strip_three_ext(), &settings);
        assert!(responses.is_empty());
    }
}
