/// Running mean/variance over every valid sample seen this session (Welford).
///
/// Never reset. Once enough history has accumulated, short transients barely
/// move the gain window, and long sessions adapt slowly to a change of regime.
#[derive(Clone, Debug, Default)]
pub struct RunningStats {
    n: u64,
    mean: f64,
    m2: f64,
}
impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.n += 1;
        let delta = value - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }
    /// Feed a column; absent and non-finite entries are skipped without counting.
    pub fn observe<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        for value in values.into_iter().flatten() {
            self.push(value);
        }
    }
    pub fn count(&self) -> u64 {
        self.n
    }
    pub fn mean_value(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.mean
        }
    }
    /// Sample variance, `M2 / (n - 1)`.
    pub fn variance(&self) -> f64 {
        if self.n > 1 {
            self.m2 / (self.n - 1) as f64
        } else {
            0.0
        }
    }
    pub fn std_value(&self) -> f64 {
        self.variance().sqrt()
    }
}
