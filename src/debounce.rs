use tokio::time::{Duration, Instant};

#[derive(Debug)]
struct PendingValue<T> {
    value: T,
    fire_at: Instant,
}

/// Holds back the latest value until no new value has arrived for the quiet
/// period. Pushing again re-arms the timer and discards the older value;
/// cancelling or dropping discards it without firing.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<PendingValue<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some(PendingValue {
            value,
            fire_at: Instant::now() + self.quiet,
        });
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.fire_at)
    }

    /// Takes the value if its quiet period has already elapsed.
    pub fn poll_ready(&mut self) -> Option<T> {
        let fire_at = self.deadline()?;
        if Instant::now() < fire_at {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    /// Waits out the quiet period and takes the value. Returns `None` right
    /// away when nothing is pending. Dropping the future before it completes
    /// leaves the pending value in place.
    pub async fn settled(&mut self) -> Option<T> {
        let fire_at = self.deadline()?;
        tokio::time::sleep_until(fire_at).await;
        self.pending.take().map(|pending| pending.value)
    }
}
