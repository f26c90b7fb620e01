/// Host timestamp in milliseconds (wall clock or `performance.now()`).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Timestamp(pub f64);

impl Timestamp {
    pub const ZERO: Self = Self(0.0);

    pub fn millis(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier` (negative if `earlier` is later).
    pub fn since(self, earlier: Self) -> f64 {
        self.0 - earlier.0
    }
}
