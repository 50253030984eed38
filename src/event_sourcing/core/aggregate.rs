// ============================================================================
// Aggregate Root Pattern
// ============================================================================
//
// Key Principles:
// 1. Commands are validated before emitting events
// 2. Events represent facts that have already happened
// 3. Aggregates enforce business invariants
// 4. All state changes flow through `apply_event`
//
// Aggregates here are persisted as snapshots (the current state), and the
// events they emit feed the activity log rather than a replay store.
//
// ============================================================================

/// Generic Aggregate trait
///
/// Type Parameters:
/// - `Event`: The domain event type for this aggregate
/// - `Command`: The command type for this aggregate
/// - `Error`: The error type for business rule violations
pub trait Aggregate: Sized + Send + Sync {
    type Event;
    type Command;
    type Error;

    /// Handle command and emit events (business logic). Emitting no events
    /// means the command is a no-op for the current state.
    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Apply an event to update state
    fn apply_event(&mut self, event: &Self::Event);

    fn aggregate_id(&self) -> &str;

    /// Handle a command and apply whatever it emits
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.handle_command(command)?;
        for event in &events {
            self.apply_event(event);
        }
        Ok(events)
    }
}
