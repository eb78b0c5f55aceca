use crossbeam_channel::Receiver;
use std::collections::VecDeque;

use super::decoder::DecodedVideoFrame;

/// Frames later than this behind the clock are dropped (seconds)
const DROP_THRESHOLD: f64 = 0.02;
/// Frames up to this far ahead of the clock are shown (seconds)
const HOLD_THRESHOLD: f64 = 0.02;
/// After a seek, frames this far before the target still count as landed
const SEEK_TOLERANCE: f64 = 0.5;

/// Buffers decoded frames and releases each one when the clock reaches it.
pub struct VideoFrameQueue {
    receiver: Receiver<DecodedVideoFrame>,
    buffer: VecDeque<DecodedVideoFrame>,
    max_buffer_size: usize,
}

impl VideoFrameQueue {
    pub fn new(receiver: Receiver<DecodedVideoFrame>, max_buffer_size: usize) -> Self {
        Self {
            receiver,
            buffer: VecDeque::with_capacity(max_buffer_size),
            max_buffer_size,
        }
    }

    fn receive_frames(&mut self) {
        while self.buffer.len() < self.max_buffer_size {
            match self.receiver.try_recv() {
                Ok(frame) => self.buffer.push_back(frame),
                Err(_) => break,
            }
        }
    }

    fn drop_before(&mut self, time: f64) {
        while self.buffer.front().is_some_and(|frame| frame.pts < time) {
            self.buffer.pop_front();
        }
    }

    /// Next frame to present at `clock_time`, or `None` if the current one
    /// should stay on screen.
    pub fn next_frame(&mut self, clock_time: f64) -> Option<DecodedVideoFrame> {
        self.receive_frames();
        self.drop_before(clock_time - DROP_THRESHOLD);

        if self
            .buffer
            .front()
            .is_some_and(|frame| frame.pts <= clock_time + HOLD_THRESHOLD)
        {
            self.buffer.pop_front()
        } else {
            None
        }
    }

    /// First frame at or near a seek target; looser than `next_frame`.
    pub fn first_frame_after_seek(&mut self, seek_target: f64) -> Option<DecodedVideoFrame> {
        self.receive_frames();
        self.drop_before(seek_target - SEEK_TOLERANCE);
        self.buffer.pop_front()
    }

    /// Drop everything buffered or in flight.
    pub fn clear(&mut self) {
        self.buffer.clear();
        while self.receiver.try_recv().is_ok() {}
    }

    /// True once nothing is buffered or waiting in the channel.
    pub fn is_drained(&self) -> bool {
        self.buffer.is_empty() && self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, Sender};

    fn frame(pts: f64) -> DecodedVideoFrame {
        DecodedVideoFrame {
            rgba: vec![0; 4],
            width: 1,
            height: 1,
            pts,
        }
    }

    fn queue_with(pts: &[f64]) -> (Sender<DecodedVideoFrame>, VideoFrameQueue) {
        let (sender, receiver) = bounded(16);
        for &p in pts {
            sender.send(frame(p)).unwrap();
        }
        (sender, VideoFrameQueue::new(receiver, 16))
    }

    #[test]
    fn holds_frames_ahead_of_clock() {
        let (_tx, mut queue) = queue_with(&[1.0]);
        assert!(queue.next_frame(0.5).is_none());
        assert_eq!(queue.next_frame(1.0).map(|f| f.pts), Some(1.0));
        assert!(queue.is_drained());
    }

    #[test]
    fn drops_late_frames() {
        let (_tx, mut queue) = queue_with(&[0.0, 0.04, 0.08, 0.12]);
        assert_eq!(queue.next_frame(0.09).map(|f| f.pts), Some(0.08));
        assert!(queue.next_frame(0.09).is_none());
        assert_eq!(queue.next_frame(0.12).map(|f| f.pts), Some(0.12));
    }

    #[test]
    fn seek_accepts_frame_near_target() {
        let (_tx, mut queue) = queue_with(&[1.0, 9.8, 10.2]);
        assert_eq!(queue.first_frame_after_seek(10.0).map(|f| f.pts), Some(9.8));
    }

    #[test]
    fn clear_drains_channel() {
        let (_tx, mut queue) = queue_with(&[1.0, 2.0]);
        queue.clear();
        assert!(queue.is_drained());
        assert!(queue.first_frame_after_seek(0.0).is_none());
    }
}
