//! Gauss-Legendre quadrature rules

use crate::error::{Error, Result};

/// Highest supported quadrature order
pub const MAX_ORDER: usize = 100;

const NEWTON_TOLERANCE: f64 = 1e-15;
const NEWTON_MAX_ITERATIONS: usize = 100;

/// Nodes and weights of an order-n Gauss-Legendre rule on [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 || order > MAX_ORDER {
            return Err(Error::InvalidGlqOrder(order));
        }
        let mut nodes = vec![0.0; order];
        let mut weights = vec![0.0; order];
        let n = order as f64;
        // Roots are symmetric, so only the positive half is computed
        for i in 0..order.div_ceil(2) {
            let mut x = (std::f64::consts::PI * (i as f64 + 0.75) / (n + 0.5)).cos();
            let mut derivative = legendre(order, x).1;
            for _ in 0..NEWTON_MAX_ITERATIONS {
                let (value, slope) = legendre(order, x);
                derivative = slope;
                let step = value / slope;
                x -= step;
                if step.abs() < NEWTON_TOLERANCE {
                    derivative = legendre(order, x).1;
                    break;
                }
            }
            let weight = 2.0 / ((1.0 - x * x) * derivative * derivative);
            nodes[i] = x;
            nodes[order - 1 - i] = -x;
            weights[i] = weight;
            weights[order - 1 - i] = weight;
        }
        if order % 2 == 1 {
            nodes[order / 2] = 0.0;
        }
        Ok(Self { nodes, weights })
    }

    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Nodes mapped from [-1, 1] onto [lower, upper]
    pub fn scaled_nodes(&self, lower: f64, upper: f64) -> Vec<f64> {
        let half = 0.5 * (upper - lower);
        let mid = 0.5 * (upper + lower);
        self.nodes.iter().map(|&x| half * x + mid).collect()
    }

    /// Integrate `f` over [lower, upper]
    pub fn integrate<F: Fn(f64) -> f64>(&self, lower: f64, upper: f64, f: F) -> f64 {
        let sum: f64 = self
            .scaled_nodes(lower, upper)
            .into_iter()
            .zip(&self.weights)
            .map(|(x, w)| w * f(x))
            .sum();
        0.5 * (upper - lower) * sum
    }
}

// Legendre polynomial P_n(x) and its derivative via the three-term recurrence
fn legendre(order: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=order {
        let k = k as f64;
        let next = ((2.0 * k - 1.0) * x * p - (k - 1.0) * p_prev) / k;
        p_prev = p;
        p = next;
    }
    if order == 0 {
        return (1.0, 0.0);
    }
    let n = order as f64;
    let derivative = n * (x * p - p_prev) / (x * x - 1.0);
    (p, derivative)
}
