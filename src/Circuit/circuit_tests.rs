#[cfg(test)]
mod tests {
    use crate::Circuit::cascade::{BackwardPassKind, blend_feed, solve_circuit};
    use crate::Circuit::isotherm::max_organic_loading;
    use crate::Circuit::stage::solve_stage;
    use crate::process_inputs::{FeedStream, ProcessInputs};
    use crate::settings::SolverSettings;
    use approx::assert_relative_eq;

    // stripped organic of a single 95% strip stage at SR 85%, v/v 20
    const SO_CU: f64 = 10.34 * 0.85 * (1.0 - 0.95 * 0.8);

    fn base_inputs() -> ProcessInputs {
        ProcessInputs::new().with("plsCu", 4.0).with("oaRatio", 1.0)
    }

    #[test]
    fn test_blend_feed() {
        let streams = vec![
            FeedStream { cu: 5.0, flow: 100.0 },
            FeedStream { cu: 2.0, flow: 50.0 },
            FeedStream { cu: 9.0, flow: 0.0 },
            FeedStream { cu: 7.0, flow: -10.0 },
        ];
        assert_relative_eq!(blend_feed(&streams), 4.0, epsilon = 1e-12);
        assert_eq!(blend_feed(&[]), 0.0);
        assert_eq!(blend_feed(&[FeedStream { cu: 3.0, flow: 0.0 }]), 0.0);
    }

    #[test]
    fn test_blended_feed_reaches_circuit() {
        let inputs = ProcessInputs::new()
            .with("plsCu1", 5.0)
            .with("plsFlow1", 100.0)
            .with("plsCu2", 2.0)
            .with("plsFlow2", 50.0);
        let res = solve_circuit(&inputs, SO_CU, 10.34, 1.0, 3, &SolverSettings::default());
        assert_relative_eq!(res.avg_feed_cu, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_stage_circuit_is_single_stage() {
        let settings = SolverSettings::default();
        let res = solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, 1, &settings);
        let stage = solve_stage(4.0, SO_CU, 10.34, 1.0, 95.0, &settings.stage);
        assert_eq!(res.raffinate_cu, stage.aqueous_out);
        assert_eq!(res.loaded_organic_cu, stage.organic_out);
        assert_eq!(res.avg_feed_cu, 4.0);
        assert_eq!(res.organic_out.len(), 1);
    }

    #[test]
    fn test_zero_stages_pass_through() {
        let res = solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, 0, &SolverSettings::default());
        assert_eq!(res.raffinate_cu, 4.0);
        assert_eq!(res.loaded_organic_cu, SO_CU);
        assert_eq!(res.passes, 0);
        assert_eq!(res.balance_error, 0.0);
    }

    #[test]
    fn test_fixed_number_of_passes_and_profiles() {
        let settings = SolverSettings::default();
        let res = solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, 3, &settings);
        assert_eq!(res.passes, settings.circuit.outer_passes);
        assert_eq!(res.organic_out.len(), 3);
        assert_eq!(res.aqueous_in.len(), 3);
        assert_eq!(res.aqueous_out.len(), 3);
        assert!(res.organic_out.iter().all(|&x| x >= 0.0));
        assert!(res.aqueous_in.iter().all(|&x| x >= 0.0));
        assert!(res.raffinate_cu >= 0.0);
        assert_eq!(res.loaded_organic_cu, res.organic_out[2]);
        // feed enters the last stage
        assert_eq!(res.aqueous_in[2], 4.0);
        // organic loads along the cascade
        assert!(res.organic_out[2] > res.organic_out[0]);
        assert!(res.raffinate_cu < 4.0);
        assert_eq!(res.stage_stats.unconverged, 0);
        assert!(res.stage_stats.max_iterations <= settings.stage.max_iterations);
    }

    #[test]
    fn test_single_pass_reports_finite_change() {
        let mut settings = SolverSettings::default();
        settings.circuit.outer_passes = 1;
        let res = solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, 3, &settings);
        assert_eq!(res.passes, 1);
        assert!(res.pass_change.is_finite());
        // measured from the feed and the stripped organic the circuit starts from
        let expected = (res.raffinate_cu - 4.0)
            .abs()
            .max((res.loaded_organic_cu - SO_CU).abs());
        assert_eq!(res.pass_change, expected);
        assert!(res.pass_change > 0.0);
    }

    #[test]
    fn test_more_stages_lower_raffinate() {
        let settings = SolverSettings::default();
        let raffinates: Vec<f64> = (1..=4)
            .map(|n| solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, n, &settings).raffinate_cu)
            .collect();
        for w in raffinates.windows(2) {
            assert!(w[1] < w[0], "{:?}", raffinates);
        }
    }

    #[test]
    fn test_long_run_converges_to_balanced_steady_state() {
        let mut settings = SolverSettings::default();
        settings.circuit.outer_passes = 60;
        let res = solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, 3, &settings);
        assert!(res.pass_change < 1e-9, "pass change {:e}", res.pass_change);
        assert!(res.balance_error.abs() < 1e-9, "balance {:e}", res.balance_error);
    }

    #[test]
    fn test_backward_variants_agree_at_steady_state() {
        let mut settings = SolverSettings::default();
        settings.circuit.outer_passes = 60;
        for n in 1..=4 {
            settings.circuit.backward_pass = BackwardPassKind::StageResolve;
            let a = solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, n, &settings);
            settings.circuit.backward_pass = BackwardPassKind::ClosedForm;
            let b = solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, n, &settings);
            assert_relative_eq!(a.raffinate_cu, b.raffinate_cu, epsilon = 1e-8);
            assert_relative_eq!(a.loaded_organic_cu, b.loaded_organic_cu, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_closed_form_closes_balance_every_pass() {
        let mut settings = SolverSettings::default();
        settings.circuit.backward_pass = BackwardPassKind::ClosedForm;
        let res = solve_circuit(&base_inputs(), SO_CU, 10.34, 1.0, 3, &settings);
        assert!(res.balance_error.abs() < 1e-12);
    }

    #[test]
    fn test_efficiency_never_hurts_extraction() {
        let settings = SolverSettings::default();
        let mut previous = f64::INFINITY;
        for eff in [80.0, 85.0, 90.0, 95.0, 100.0] {
            let inputs = base_inputs()
                .with("mef1e", eff)
                .with("mef2e", eff)
                .with("mef3e", eff);
            let res = solve_circuit(&inputs, SO_CU, 10.34, 1.0, 3, &settings);
            assert!(res.raffinate_cu <= previous, "eff {}", eff);
            previous = res.raffinate_cu;
        }
    }

    #[test]
    fn test_no_extractant_extracts_nothing() {
        let res = solve_circuit(&base_inputs(), 0.0, max_organic_loading(0.0), 1.0, 3, &SolverSettings::default());
        assert_eq!(res.loaded_organic_cu, 0.0);
        assert_eq!(res.raffinate_cu, 4.0);
    }
}
