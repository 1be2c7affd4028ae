//! Output metering from the render path to the UI.
//!
//! The renderer pushes one [`MeterFrame`] per rendered block into an `rtrb`
//! ring. When the UI falls behind the ring fills up and new frames are
//! dropped; the renderer never waits.

use rtrb::{Consumer, Producer, RingBuffer};

/// Enough frames for a couple of seconds of small device blocks.
pub const METER_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeterFrame {
    pub peak_left: f32,
    pub peak_right: f32,
    /// Voices that produced output in this block.
    pub running: u16,
}

impl MeterFrame {
    pub fn from_block(left: &[f32], right: &[f32], running: usize) -> Self {
        let peak = |buffer: &[f32]| buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        Self {
            peak_left: peak(left),
            peak_right: peak(right),
            running: running.min(u16::MAX as usize) as u16,
        }
    }
}

pub fn meter_channel() -> (Producer<MeterFrame>, Consumer<MeterFrame>) {
    RingBuffer::new(METER_CAPACITY)
}

/// UI-side reader that keeps decaying peak levels between frames.
pub struct MeterReader {
    rx: Consumer<MeterFrame>,
    left: f32,
    right: f32,
    running: u16,
    decay: f32,
}

impl MeterReader {
    /// `decay` is the per-poll multiplier applied before new frames are merged.
    pub fn new(rx: Consumer<MeterFrame>, decay: f32) -> Self {
        Self {
            rx,
            left: 0.0,
            right: 0.0,
            running: 0,
            decay: decay.clamp(0.0, 1.0),
        }
    }

    /// Read from a new ring, keeping the held levels.
    pub fn reconnect(&mut self, rx: Consumer<MeterFrame>) {
        self.rx = rx;
    }

    /// Drain everything queued and return the held levels.
    pub fn poll(&mut self) -> MeterFrame {
        self.left *= self.decay;
        self.right *= self.decay;

        while let Ok(frame) = self.rx.pop() {
            self.left = self.left.max(frame.peak_left);
            self.right = self.right.max(frame.peak_right);
            self.running = frame.running;
        }

        MeterFrame {
            peak_left: self.left,
            peak_right: self.right,
            running: self.running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_peaks_are_absolute() {
        let frame = MeterFrame::from_block(&[0.1, -0.6, 0.2], &[0.0, 0.3, -0.35], 7);
        assert_eq!(frame.peak_left, 0.6);
        assert_eq!(frame.peak_right, 0.35);
        assert_eq!(frame.running, 7);
    }

    #[test]
    fn full_ring_drops_new_frames() {
        let (mut tx, _rx) = meter_channel();
        for _ in 0..METER_CAPACITY {
            assert!(tx.push(MeterFrame::default()).is_ok());
        }
        assert!(tx.push(MeterFrame::default()).is_err());
    }

    #[test]
    fn reader_holds_then_decays() {
        let (mut tx, rx) = meter_channel();
        let mut reader = MeterReader::new(rx, 0.5);

        let _ = tx.push(MeterFrame {
            peak_left: 0.8,
            peak_right: 0.4,
            running: 3,
        });
        let _ = tx.push(MeterFrame {
            peak_left: 0.2,
            peak_right: 0.1,
            running: 4,
        });

        let first = reader.poll();
        assert_eq!(first.peak_left, 0.8);
        assert_eq!(first.running, 4);

        let second = reader.poll();
        assert_eq!(second.peak_left, 0.4);
        assert_eq!(second.peak_right, 0.2);
    }
}
