/// How samples outside the image are produced during convolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BorderMode {
    /// Out-of-range samples read as zero.
    #[default]
    Zero,
    /// Out-of-range samples mirror the image about its edge, repeating the
    /// edge pixel: `... 1 0 | 0 1 ...`.
    Mirror,
}

/// Maps a possibly out-of-range index to an in-range one.
///
/// Returns `None` when the sample should read as zero.
pub fn map_index(i: isize, len: usize, mode: BorderMode) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if i >= 0 && (i as usize) < len {
        return Some(i as usize);
    }
    match mode {
        BorderMode::Zero => None,
        BorderMode::Mirror => {
            let period = 2 * len as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                Some(r)
            } else {
                Some(2 * len - 1 - r)
            }
        }
    }
}
