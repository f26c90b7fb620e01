use foundation::time::Timestamp;

/// One animation tick as seen by the renderer.
///
/// The timestamp comes from the host's frame driver; the index only counts
/// ticks that were actually drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based tick index.
    pub index: u64,
    pub now: Timestamp,
}

impl Frame {
    pub fn new(index: u64, now: Timestamp) -> Self {
        Self { index, now }
    }

    pub fn next(self, now: Timestamp) -> Self {
        Self::new(self.index + 1, now)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Timestamp;

    #[test]
    fn next_advances_index_and_takes_new_time() {
        let f0 = Frame::new(0, Timestamp(16.0));
        let f1 = f0.next(Timestamp(33.0));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.now, Timestamp(33.0));
        assert_eq!(f0, Frame::new(0, Timestamp(16.0)));
    }
}
