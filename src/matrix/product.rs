// src/matrix/product.rs

//! Full Cartesian product of the selections.

use crate::matrix::pairwise::advance;

/// Every index tuple over axes of the given sizes, in lexicographic order
/// (last axis varies fastest).
pub fn product_rows(sizes: &[usize]) -> Vec<Vec<usize>> {
    if sizes.contains(&0) {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut row = vec![0; sizes.len()];
    loop {
        rows.push(row.clone());
        if !advance(&mut row, sizes) {
            break;
        }
    }
    rows
}
