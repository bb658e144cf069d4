//! MNA matrix assembly and dense solving.

/// MNA matrix system Ax = z.
#[derive(Debug, Clone)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
}

impl MnaMatrix {
    /// Create a zeroed system with `size` unknowns.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            size,
        }
    }

    /// Clear the matrix and vectors to zero.
    pub fn clear(&mut self) {
        self.a.fill(0.0);
        self.z.fill(0.0);
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.z[row] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: usize, n2: usize, g: f64) {
        self.add(n1, n1, g);
        self.add(n2, n2, g);
        self.add(n1, n2, -g);
        self.add(n2, n1, -g);
    }

    /// Stamp a current source between two nodes.
    /// Current flows from n+ to n- through the source.
    pub fn stamp_current_source(&mut self, n_pos: usize, n_neg: usize, current: f64) {
        self.add_source(n_pos, -current);
        self.add_source(n_neg, current);
    }

    /// Stamp an ideal voltage source between two nodes with branch current at index br.
    /// V[n+] - V[n-] = E
    pub fn stamp_voltage_source(&mut self, n_pos: usize, n_neg: usize, br: usize, voltage: f64) {
        self.add(br, n_pos, 1.0);
        self.add(n_pos, br, 1.0);
        self.add(br, n_neg, -1.0);
        self.add(n_neg, br, -1.0);
        self.add_source(br, voltage);
    }

    /// Tie every unknown weakly to ground and pin unknown 0 at 0 V.
    ///
    /// Adds `gmin` on the whole diagonal, then replaces row 0 with the
    /// identity row and clears its source entry. Column 0 is cleared as well:
    /// its terms multiply a known zero, and without them no other row can be
    /// pivoted into row 0's place, so the ground unknown solves to exactly 0.
    pub fn normalize_ground(&mut self, gmin: f64) {
        let n = self.size;
        if n == 0 {
            return;
        }
        for i in 0..n {
            self.add(i, i, gmin);
        }
        self.a[..n].fill(0.0);
        for i in 1..n {
            self.a[i * n] = 0.0;
        }
        self.a[0] = 1.0;
        self.z[0] = 0.0;
    }

    /// Solve Ax = z by Gaussian elimination with partial pivoting.
    ///
    /// Works on copies, so the assembled system is left intact. A column whose
    /// largest remaining entry is below `pivot_threshold` is treated as a free
    /// variable and solved as 0 instead of failing; floating sub-networks
    /// therefore solve without raising an error.
    pub fn solve(&self, pivot_threshold: f64) -> Vec<f64> {
        let n = self.size;
        let mut a = self.a.clone();
        let mut b = self.z.clone();

        for k in 0..n {
            // Find pivot
            let mut max_val = a[k * n + k].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = a[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < pivot_threshold {
                continue;
            }

            // Swap rows if needed
            if max_row != k {
                for j in 0..n {
                    a.swap(k * n + j, max_row * n + j);
                }
                b.swap(k, max_row);
            }

            // Eliminate
            let pivot = a[k * n + k];
            for i in (k + 1)..n {
                let factor = a[i * n + k] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in k..n {
                    a[i * n + j] -= factor * a[k * n + j];
                }
                b[i] -= factor * b[k];
            }
        }

        // Back substitution
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let diag = a[i * n + i];
            if diag.abs() < pivot_threshold {
                continue;
            }
            let mut sum = b[i];
            for j in (i + 1)..n {
                sum -= a[i * n + j] * x[j];
            }
            x[i] = sum / diag;
        }

        x
    }
}
