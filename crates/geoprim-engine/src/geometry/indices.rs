/// Triangle indices for a fan of `n` points anchored at index 0.
///
/// Emits `(0, i - 1, i)` for `i in 2..n`, then the closing `(0, n - 1, 1)`.
/// Callers guarantee `n <= u16::MAX + 1`.
pub fn build_fan_indices(n: usize) -> Vec<u16> {
    if n < 2 {
        return Vec::new();
    }

    let mut indices = Vec::with_capacity(3 * (n - 1));
    for i in 2..n {
        indices.extend_from_slice(&[0, (i - 1) as u16, i as u16]);
    }
    indices.extend_from_slice(&[0, (n - 1) as u16, 1]);
    indices
}

/// Sequential indices `[0, 1, ..., n - 1]` for line loops and line lists.
pub fn build_loop_indices(n: usize) -> Vec<u16> {
    (0..n).map(|i| i as u16).collect()
}
