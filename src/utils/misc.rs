/// Indexing counted back from the newest element.
pub trait FromEnd<T> {
    fn from_end(&self, n: usize) -> Option<&T>;
}

impl<T> FromEnd<T> for [T] {
    fn from_end(&self, n: usize) -> Option<&T> {
        self.len().checked_sub(1 + n).and_then(|index| self.get(index))
    }
}

/// Upper median, the element a quickselect for `len / 2` lands on.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    values.sort_by(f64::total_cmp);
    values.get(values.len() / 2).copied()
}
