//! Limits and switches for a linting session.

/// Configuration shared by all checks.
///
/// ~~~
/// let cfg = simpnf::Config::default();
/// assert_eq!(cfg.discharge_depth, 2);
/// assert!(!cfg.eta);
/// ~~~
#[derive(Clone, Debug)]
pub struct Config {
    /// maximal number of rewriting steps per normalisation
    pub simp_steps: usize,
    /// maximal number of kernel steps (reduction, conversion, unification) per check
    pub kernel_steps: usize,
    /// maximal nesting of side condition discharging
    pub discharge_depth: usize,
    /// check convertibility modulo eta
    pub eta: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simp_steps: 10_000,
            kernel_steps: 100_000,
            discharge_depth: 2,
            eta: false,
        }
    }
}
