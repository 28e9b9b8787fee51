//! Simple Moving Average (SMA) over a nullable close series.
//!
//! A value is produced only when the trailing window holds `period` real
//! closes; any gap inside the window leaves the output undefined. First
//! defined value is at index `period - 1`.

/// Trailing simple moving average with a fixed window.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of leading values that can never be defined.
    pub fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    pub fn compute(&self, closes: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut window = RollingWindow::new(self.period);
        closes.iter().map(|c| window.push(*c)).collect()
    }
}

/// Fixed-size sliding window over the last `period` slots.
///
/// The mean is summed from the slots on every push, so error never carries
/// across windows, and a window holding one repeated value returns that value
/// exactly.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    period: usize,
    slots: Vec<Option<f64>>,
    head: usize,
    filled: usize,
    valid: usize,
    run_value: Option<f64>,
    run_len: usize,
}

impl RollingWindow {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "window period must be >= 1");
        Self {
            period,
            slots: vec![None; period],
            head: 0,
            filled: 0,
            valid: 0,
            run_value: None,
            run_len: 0,
        }
    }

    /// Push the next value and return the mean of the full window, if defined.
    pub fn push(&mut self, value: Option<f64>) -> Option<f64> {
        if self.filled == self.period {
            if self.slots[self.head].is_some() {
                self.valid -= 1;
            }
        } else {
            self.filled += 1;
        }

        self.slots[self.head] = value;
        if value.is_some() {
            self.valid += 1;
        }
        self.head = (self.head + 1) % self.period;

        match value {
            Some(v) if self.run_value == Some(v) => self.run_len += 1,
            Some(_) => self.run_len = 1,
            None => self.run_len = 0,
        }
        self.run_value = value;

        if self.valid < self.period {
            return None;
        }
        if self.run_len >= self.period {
            return self.run_value;
        }
        let sum: f64 = self.slots.iter().flatten().sum();
        Some(sum / self.period as f64)
    }
}
