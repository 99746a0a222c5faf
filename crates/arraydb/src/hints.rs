/// Marks the branch taken when `b` is true as cold.
#[inline(always)]
pub(crate) fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}

#[inline(always)]
#[cold]
fn cold() {}
