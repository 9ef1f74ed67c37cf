pub const QUESTIONS_PER_PAGE: usize = 10;

/// One fixed-size window of an already-ordered selection. Pages are 1-based;
/// anything out of range (including page 0) comes back empty.
pub fn page_window<T: Clone>(selection: &[T], page: i64) -> Vec<T> {
    if page < 1 {
        return Vec::new();
    }
    let start = (page as usize - 1).saturating_mul(QUESTIONS_PER_PAGE);
    selection
        .iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .cloned()
        .collect()
}
