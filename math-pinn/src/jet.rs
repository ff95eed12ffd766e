//! Second-order forward-mode jets
//!
//! A [`Jet`] carries a value together with its first and second derivative
//! with respect to a single scalar input. Arithmetic on jets applies the
//! chain and product rules truncated at second order, so running a function
//! on `Jet::variable(x)` yields `(f(x), f'(x), f''(x))`.

use std::ops::{Add, Mul, Neg, Sub};

/// Truncated Taylor triple `(value, d/dx, d²/dx²)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Jet {
    pub v: f64,
    pub d1: f64,
    pub d2: f64,
}

impl Jet {
    pub const fn new(v: f64, d1: f64, d2: f64) -> Self {
        Self { v, d1, d2 }
    }

    /// The independent variable at `x`: `(x, 1, 0)`
    pub const fn variable(x: f64) -> Self {
        Self::new(x, 1.0, 0.0)
    }

    /// A constant: `(c, 0, 0)`
    pub const fn constant(c: f64) -> Self {
        Self::new(c, 0.0, 0.0)
    }

    /// Apply a scalar function given its value and first two derivatives at `self.v`
    ///
    /// (g∘a)' = g'(a) a', (g∘a)'' = g'(a) a'' + g''(a) a'²
    #[inline]
    pub fn compose(self, g: f64, dg: f64, d2g: f64) -> Self {
        Self::new(g, dg * self.d1, dg * self.d2 + d2g * self.d1 * self.d1)
    }

    pub fn tanh(self) -> Self {
        let t = self.v.tanh();
        let s = 1.0 - t * t;
        self.compose(t, s, -2.0 * t * s)
    }

    pub fn exp(self) -> Self {
        let e = self.v.exp();
        self.compose(e, e, e)
    }

    pub fn powi(self, n: i32) -> Self {
        let nf = f64::from(n);
        let d2 = if n == 0 || n == 1 {
            0.0
        } else {
            nf * (nf - 1.0) * self.v.powi(n - 2)
        };
        let d1 = if n == 0 { 0.0 } else { nf * self.v.powi(n - 1) };
        self.compose(self.v.powi(n), d1, d2)
    }

    pub fn is_finite(&self) -> bool {
        self.v.is_finite() && self.d1.is_finite() && self.d2.is_finite()
    }
}

impl Add for Jet {
    type Output = Jet;

    fn add(self, rhs: Jet) -> Jet {
        Jet::new(self.v + rhs.v, self.d1 + rhs.d1, self.d2 + rhs.d2)
    }
}

impl Sub for Jet {
    type Output = Jet;

    fn sub(self, rhs: Jet) -> Jet {
        Jet::new(self.v - rhs.v, self.d1 - rhs.d1, self.d2 - rhs.d2)
    }
}

impl Neg for Jet {
    type Output = Jet;

    fn neg(self) -> Jet {
        Jet::new(-self.v, -self.d1, -self.d2)
    }
}

impl Mul for Jet {
    type Output = Jet;

    fn mul(self, rhs: Jet) -> Jet {
        Jet::new(
            self.v * rhs.v,
            self.d1 * rhs.v + self.v * rhs.d1,
            self.d2 * rhs.v + 2.0 * self.d1 * rhs.d1 + self.v * rhs.d2,
        )
    }
}

impl Mul<f64> for Jet {
    type Output = Jet;

    fn mul(self, rhs: f64) -> Jet {
        Jet::new(self.v * rhs, self.d1 * rhs, self.d2 * rhs)
    }
}

impl Add<f64> for Jet {
    type Output = Jet;

    fn add(self, rhs: f64) -> Jet {
        Jet::new(self.v + rhs, self.d1, self.d2)
    }
}
