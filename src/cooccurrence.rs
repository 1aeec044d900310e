//! Method × method co-occurrence counts.
//!
//! Computed as `Aᵀ·A` over the binary incidence matrix `A`: entry (i, j) is
//! the number of papers using both methods. The diagonal of that product is
//! the per-method total; it is lifted out into [`MethodTotals`] and the
//! matrix itself answers `None` for self pairs.

use crate::incidence::{IncidenceMatrix, MethodTotals};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CooccurrenceMatrix {
    methods: Vec<String>,
    index: HashMap<String, usize>,
    /// Row-major `n × n` counts; the diagonal is always zero and never read.
    counts: Vec<u32>,
}

impl CooccurrenceMatrix {
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn contains(&self, method: &str) -> bool {
        self.index.contains_key(method)
    }

    /// Number of papers using both methods. `None` for self pairs and
    /// unknown methods.
    pub fn get(&self, a: &str, b: &str) -> Option<u32> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        if i == j {
            return None;
        }
        Some(self.counts[i * self.methods.len() + j])
    }
}

/// Build the co-occurrence matrix and method totals from an incidence matrix.
pub fn compute(incidence: &IncidenceMatrix) -> (CooccurrenceMatrix, MethodTotals) {
    let n = incidence.method_count();
    let mut product = vec![0u32; n * n];

    // Each paper contributes 1 to every (i, j) pair of its methods, including
    // i == j; this is the Boolean AND-then-sum of Aᵀ·A.
    for row in 0..incidence.paper_count() {
        let cols = incidence.row(row);
        for &i in cols {
            for &j in cols {
                product[i * n + j] += 1;
            }
        }
    }

    let methods = incidence.methods().to_vec();
    let totals: MethodTotals = methods
        .iter()
        .enumerate()
        .map(|(i, m)| (m.clone(), product[i * n + i] as usize))
        .collect();

    for i in 0..n {
        product[i * n + i] = 0;
    }

    let index = methods
        .iter()
        .enumerate()
        .map(|(i, m)| (m.clone(), i))
        .collect();

    tracing::info!(methods = n, "built co-occurrence matrix");

    (
        CooccurrenceMatrix {
            methods,
            index,
            counts: product,
        },
        totals,
    )
}
