/// Shared context for one evaluation cycle.
///
/// `tick` is a monotonically increasing cycle counter; `period_seconds` is
/// the configured spacing between cycles. Nodes must not block within a
/// tick: anything longer than a cycle is represented as a running status
/// and re-polled on the next pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub period_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, period_seconds: f32) -> Self {
        Self {
            tick,
            period_seconds,
        }
    }
}
