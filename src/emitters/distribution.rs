// Copyright @yucwang 2026

use crate::math::constants::{Float, PI, Vector2f};

// Poles of the lat-long mapping: below this sin(theta) the solid-angle
// Jacobian would blow up, so the denominator is clamped instead.
const SIN_THETA_MIN: Float = 1e-4;

/// Piecewise-constant 2D distribution over an equirectangular image,
/// sampled proportional to per-pixel weight. Stores one normalized CDF per
/// row (`conditional_cdf`, row-major) and one normalized CDF over the rows
/// (`marginal_cdf`). Rows whose weights sum to zero fall back to a uniform
/// CDF so sampling never divides by zero.
pub struct EnvDistribution {
    width: usize,
    height: usize,
    marginal_cdf: Vec<Float>,
    conditional_cdf: Vec<Float>,
}

impl EnvDistribution {
    /// Build from row-major per-pixel weights (`weights.len() == w * h`).
    pub fn from_weights(width: usize, height: usize, weights: &[Float]) -> Self {
        assert_eq!(weights.len(), width * height);

        let mut conditional_cdf = vec![0.0; width * height];
        let mut row_sums = vec![0.0; height];

        for y in 0..height {
            let row = &weights[y * width..(y + 1) * width];
            let out = &mut conditional_cdf[y * width..(y + 1) * width];

            let mut running = 0.0;
            for (x, w) in row.iter().enumerate() {
                running += w.max(0.0);
                out[x] = running;
            }
            row_sums[y] = running;

            if running > 0.0 {
                for v in out.iter_mut() {
                    *v /= running;
                }
            } else {
                for (x, v) in out.iter_mut().enumerate() {
                    *v = (x + 1) as Float / width as Float;
                }
            }
            out[width - 1] = 1.0;
        }

        let total: Float = row_sums.iter().sum();
        let mut marginal_cdf = vec![0.0; height];
        let mut running = 0.0;
        for y in 0..height {
            running += row_sums[y];
            marginal_cdf[y] = running;
        }
        if total > 0.0 {
            for v in marginal_cdf.iter_mut() {
                *v /= total;
            }
        } else {
            for (y, v) in marginal_cdf.iter_mut().enumerate() {
                *v = (y + 1) as Float / height as Float;
            }
        }
        marginal_cdf[height - 1] = 1.0;

        Self { width, height, marginal_cdf, conditional_cdf }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn marginal_cdf(&self) -> &[Float] {
        &self.marginal_cdf
    }

    pub fn conditional_row(&self, y: usize) -> &[Float] {
        &self.conditional_cdf[y * self.width..(y + 1) * self.width]
    }

    fn row_prob(&self, y: usize) -> Float {
        let prev = if y > 0 { self.marginal_cdf[y - 1] } else { 0.0 };
        (self.marginal_cdf[y] - prev).max(0.0)
    }

    fn col_prob(&self, x: usize, y: usize) -> Float {
        let row = self.conditional_row(y);
        let prev = if x > 0 { row[x - 1] } else { 0.0 };
        (row[x] - prev).max(0.0)
    }

    /// Solid-angle density of the texel `(x, y)` under the lat-long mapping.
    fn pdf_at(&self, x: usize, y: usize) -> Float {
        let v = (y as Float + 0.5) / self.height as Float;
        let sin_theta = (v * PI).sin().max(SIN_THETA_MIN);
        let discrete = self.row_prob(y) * self.col_prob(x, y);
        discrete * (self.width * self.height) as Float / (2.0 * PI * PI * sin_theta)
    }

    /// Draw a UV proportional to the weights. Returns the pixel-center UV
    /// and its solid-angle pdf.
    pub fn sample(&self, u1: Float, u2: Float) -> (Vector2f, Float) {
        let y = self
            .marginal_cdf
            .partition_point(|&c| c < u2)
            .min(self.height - 1);
        let x = self
            .conditional_row(y)
            .partition_point(|&c| c < u1)
            .min(self.width - 1);

        let uv = Vector2f::new(
            (x as Float + 0.5) / self.width as Float,
            (y as Float + 0.5) / self.height as Float,
        );
        (uv, self.pdf_at(x, y))
    }

    /// Solid-angle pdf of an arbitrary UV, without sampling. Agrees with the
    /// pdf returned by [`sample`](Self::sample) for the same UV.
    pub fn pdf(&self, uv: &Vector2f) -> Float {
        let x = ((uv.x * self.width as Float) as usize).min(self.width - 1);
        let y = ((uv.y * self.height as Float) as usize).min(self.height - 1);
        self.pdf_at(x, y)
    }
}
