use std::collections::VecDeque;
use std::time::Duration;

/// Maximum number of committed log lines kept for display.
pub const LOG_CAPACITY: usize = 400;
/// Delay between the first pending line and the batched flush.
pub const LOG_FLUSH_DELAY: Duration = Duration::from_millis(100);

/// Identifies one scheduled flush. A timer that fires with a ticket that is no
/// longer scheduled (after a flush or a reset) does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlushTicket(u64);

/// Two-phase log buffer: lines land in `pending` and move to `committed` in
/// arrival order when the single scheduled flush runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogAggregator {
    committed: VecDeque<String>,
    pending: Vec<String>,
    scheduled: Option<FlushTicket>,
    next_ticket: u64,
    capacity: usize,
}

impl Default for LogAggregator {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl LogAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            committed: VecDeque::with_capacity(capacity),
            pending: Vec::new(),
            scheduled: None,
            next_ticket: 1,
            capacity,
        }
    }

    /// Clears both buffers. Any outstanding ticket becomes inert.
    pub fn reset(&mut self) {
        self.committed.clear();
        self.pending.clear();
        self.scheduled = None;
    }

    /// Queues a line. Returns a ticket when the caller must schedule a flush;
    /// `None` means one is already scheduled.
    pub fn append(&mut self, line: impl Into<String>) -> Option<FlushTicket> {
        self.pending.push(line.into());
        if self.scheduled.is_some() {
            return None;
        }
        let ticket = FlushTicket(self.next_ticket);
        self.next_ticket += 1;
        self.scheduled = Some(ticket);
        Some(ticket)
    }

    /// Runs the flush for `ticket` if it is still the scheduled one.
    pub fn flush_due(&mut self, ticket: FlushTicket) -> Option<String> {
        if self.scheduled != Some(ticket) {
            return None;
        }
        Some(self.flush())
    }

    /// Moves pending lines into the committed window and returns the text to render.
    pub fn flush(&mut self) -> String {
        self.committed.extend(self.pending.drain(..));
        let overflow = self.committed.len().saturating_sub(self.capacity);
        self.committed.drain(..overflow);
        self.scheduled = None;
        self.text()
    }

    pub fn force_flush(&mut self) -> String {
        self.flush()
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.committed.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line);
        }
        out
    }

    pub fn committed(&self) -> impl Iterator<Item = &str> {
        self.committed.iter().map(String::as_str)
    }

    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_flush_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }
}
