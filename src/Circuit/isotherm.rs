//! Langmuir-type copper isotherm of a hydroxyoxime extractant.
use nalgebra::DVector;

/// copper capacity of the organic phase per %v/v of extractant, g/L
pub const EXTRACTANT_CAPACITY: f64 = 0.517;
/// aqueous concentration at which the organic reaches half of its capacity, g/L
pub const HALF_SATURATION_CU: f64 = 2.5;

/// maximum organic loading (AML) for a given extractant volume fraction
pub fn max_organic_loading(volume_fraction: f64) -> f64 {
    volume_fraction * EXTRACTANT_CAPACITY
}

/// Equilibrium copper in the organic phase for a given aqueous copper concentration.
/// Returns 0 when either argument is not positive; otherwise strictly below `max_loading`.
pub fn equilibrium_organic_cu(aqueous_cu: f64, max_loading: f64) -> f64 {
    if aqueous_cu <= 0.0 || max_loading <= 0.0 {
        return 0.0;
    }
    max_loading * aqueous_cu / (HALF_SATURATION_CU + aqueous_cu)
}

/// d(org_eq)/d(aq). Negative aqueous values take the right-hand slope at zero.
pub fn equilibrium_slope(aqueous_cu: f64, max_loading: f64) -> f64 {
    if max_loading <= 0.0 {
        return 0.0;
    }
    let aq = aqueous_cu.max(0.0);
    max_loading * HALF_SATURATION_CU / ((HALF_SATURATION_CU + aq) * (HALF_SATURATION_CU + aq))
}

/// Samples the isotherm at `n_points` evenly spaced aqueous concentrations in `[0, aq_max]`.
/// Returns (aqueous, organic) vectors of equal length.
pub fn equilibrium_curve(
    aq_max: f64,
    n_points: usize,
    max_loading: f64,
) -> (DVector<f64>, DVector<f64>) {
    let aq = match n_points {
        0 => DVector::zeros(0),
        1 => DVector::from_element(1, 0.0),
        _ => {
            let step = aq_max / (n_points - 1) as f64;
            DVector::from_fn(n_points, |i, _| i as f64 * step)
        }
    };
    let org = aq.map(|x| equilibrium_organic_cu(x, max_loading));
    (aq, org)
}
