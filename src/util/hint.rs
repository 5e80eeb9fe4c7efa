#[inline]
#[cold]
const fn cold_path() {}

/// Branch hint for conditions that rarely hold, e.g. empty or degenerate
/// inputs.
#[inline]
pub const fn unlikely(b: bool) -> bool {
    if b {
        cold_path();
    }

    b
}
