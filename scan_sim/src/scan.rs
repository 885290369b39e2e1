// =============================================================================
// SCAN-AND-TRUNCATE
// =============================================================================

/// Counts how many consecutive targets `1, 2, 3, ...` can be found in order.
///
/// Each search starts right after the previous match; the matched element and
/// everything before it are consumed. The first target that cannot be found
/// stops the scan and the result is the number of targets matched so far.
///
/// For a sequence built from `(n, m)` the result lies in `[0, n]`.
pub fn scan_and_truncate(sequence: &[u32]) -> u32 {
    let mut start = 0;
    let mut target: u32 = 1;

    loop {
        match sequence[start..].iter().position(|&value| value == target) {
            Some(offset) => {
                start += offset + 1;
                target += 1;
            }
            None => return target - 1,
        }
    }
}
