use crate::normalize::{FrameRecord, RECORD_WIDTH};

/// Number of frame records collected before one classification.
pub const WINDOW_LEN: usize = 30;

/// Concatenate records in arrival order into one flat feature vector.
pub fn flatten_records(records: &[FrameRecord]) -> Vec<f32> {
    let mut flat = Vec::with_capacity(records.len() * RECORD_WIDTH);
    for record in records {
        flat.extend_from_slice(record.as_slice());
    }
    flat
}

/// Batch window of frame records. Fills to exactly `WINDOW_LEN`, then the
/// trigger consumes it whole and collection restarts empty. It never drops
/// the oldest record to stay open; this is not a ring buffer.
#[derive(Debug, Default)]
pub struct SlidingWindow {
    records: Vec<FrameRecord>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(WINDOW_LEN),
        }
    }

    /// Append one record. Returns true when the window just reached
    /// capacity. Pushing past capacity is a caller bug; the record is
    /// dropped rather than growing the window.
    pub fn push(&mut self, record: FrameRecord) -> bool {
        debug_assert!(self.records.len() < WINDOW_LEN, "push into a full window");
        if self.records.len() < WINDOW_LEN {
            self.records.push(record);
        }
        self.is_full()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() == WINDOW_LEN
    }

    /// Flat view of the whole window, `WINDOW_LEN * RECORD_WIDTH` floats in
    /// arrival order. Only meaningful on a full window.
    pub fn flatten(&self) -> Vec<f32> {
        debug_assert!(self.is_full(), "flatten of a partial window");
        flatten_records(&self.records)
    }

    /// Atomically consume the buffered records, leaving the window empty
    /// with its capacity reserved for the next batch.
    pub fn take_frames(&mut self) -> Vec<FrameRecord> {
        std::mem::replace(&mut self.records, Vec::with_capacity(WINDOW_LEN))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
