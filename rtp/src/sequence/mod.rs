
use std::fmt;
use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};
use std::sync::Arc;

/// Sequencer generates sequential sequence numbers for building RTP packets
pub trait Sequencer: fmt::Debug {
    fn next_sequence_number(&self) -> u16;
    fn roll_over_count(&self) -> u64;
    fn clone_to(&self) -> Box<dyn Sequencer + Send + Sync>;
}

impl Clone for Box<dyn Sequencer + Send + Sync> {
    fn clone(&self) -> Box<dyn Sequencer + Send + Sync> {
        self.clone_to()
    }
}

/// new_random_sequencer returns a new sequencer starting from a random sequence
/// number
pub fn new_random_sequencer() -> impl Sequencer {
    let c = Counters {
        sequence_number: AtomicU16::new(rand::random::<u16>()),
        roll_over_count: AtomicU64::new(0),
    };
    SequencerImpl(Arc::new(c))
}

/// new_fixed_sequencer returns a new sequencer whose first emitted sequence
/// number is `s`
pub fn new_fixed_sequencer(s: u16) -> impl Sequencer {
    let c = Counters {
        sequence_number: AtomicU16::new(s.wrapping_sub(1)),
        roll_over_count: AtomicU64::new(0),
    };
    SequencerImpl(Arc::new(c))
}

#[derive(Debug)]
struct Counters {
    sequence_number: AtomicU16,
    roll_over_count: AtomicU64,
}

/// Clones share the same counters.
#[derive(Debug, Clone)]
struct SequencerImpl(Arc<Counters>);

impl Sequencer for SequencerImpl {
    /// next_sequence_number increments and returns a new sequence number for
    /// building RTP packets
    fn next_sequence_number(&self) -> u16 {
        let previous = self.0.sequence_number.fetch_add(1, Ordering::SeqCst);
        let sequence_number = previous.wrapping_add(1);
        if sequence_number == 0 {
            self.0.roll_over_count.fetch_add(1, Ordering::SeqCst);
        }
        sequence_number
    }

    /// roll_over_count returns the amount of times the 16bit sequence number
    /// has wrapped
    fn roll_over_count(&self) -> u64 {
        self.0.roll_over_count.load(Ordering::SeqCst)
    }

    fn clone_to(&self) -> Box<dyn Sequencer + Send + Sync> {
        Box::new(self.clone())
    }
}
