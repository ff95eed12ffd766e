//! Adam optimizer.

/// Adam: adaptive moment estimation
///
/// ```text
/// m_t = β1 m_{t-1} + (1 - β1) g
/// v_t = β2 v_{t-1} + (1 - β2) g²
/// θ  -= lr m̂_t / (sqrt(v̂_t) + ε)
/// ```
/// with bias-corrected `m̂_t = m_t / (1 - β1^t)` and `v̂_t = v_t / (1 - β2^t)`.
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    /// First moment estimates, allocated on the first step
    m: Option<Vec<f64>>,
    /// Second moment estimates
    v: Option<Vec<f64>>,
    t: usize,
}

impl Adam {
    /// Adam with β1 = 0.9, β2 = 0.999, ε = 1e-8
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            m: None,
            v: None,
            t: 0,
        }
    }

    #[must_use]
    pub fn with_beta1(mut self, beta1: f64) -> Self {
        self.beta1 = beta1;
        self
    }

    #[must_use]
    pub fn with_beta2(mut self, beta2: f64) -> Self {
        self.beta2 = beta2;
        self
    }

    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Steps taken since construction or the last reset
    pub fn steps(&self) -> usize {
        self.t
    }

    /// Apply one update to `params` in place
    ///
    /// # Panics
    ///
    /// Panics if `params` and `grads` differ in length.
    pub fn step(&mut self, params: &mut [f64], grads: &[f64]) {
        assert_eq!(params.len(), grads.len(), "parameter/gradient length mismatch");

        let n = params.len();
        if self.m.as_ref().is_none_or(|m| m.len() != n) {
            self.m = Some(vec![0.0; n]);
            self.v = Some(vec![0.0; n]);
            self.t = 0;
        }
        self.t += 1;

        let (Some(m), Some(v)) = (self.m.as_mut(), self.v.as_mut()) else {
            return;
        };

        let t = self.t as i32;
        let bias1 = 1.0 - self.beta1.powi(t);
        let bias2 = 1.0 - self.beta2.powi(t);

        for i in 0..n {
            let g = grads[i];
            m[i] = self.beta1 * m[i] + (1.0 - self.beta1) * g;
            v[i] = self.beta2 * v[i] + (1.0 - self.beta2) * g * g;
            let m_hat = m[i] / bias1;
            let v_hat = v[i] / bias2;
            params[i] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }

    /// Forget moment estimates and the step counter
    pub fn reset(&mut self) {
        self.m = None;
        self.v = None;
        self.t = 0;
    }
}
