use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Tracks whether a view is still mounted, and which of its requests may still touch its state.
///
/// Generations are unique across the whole process, so a response that outlives
/// its view can never be mistaken for one issued by the view that replaced it.
#[derive(Debug)]
pub struct Lifetime {
    generation: u64,
    active: bool,
}

impl Lifetime {
    pub fn new() -> Lifetime {
        Lifetime {
            generation: next_generation(),
            active: false,
        }
    }

    /// Start a new span of validity, anything issued before this is now stale.
    pub fn begin(&mut self) -> u64 {
        self.generation = next_generation();
        self.active = true;
        self.generation
    }

    pub fn end(&mut self) {
        self.generation = next_generation();
        self.active = false;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.active && self.generation == generation
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Lifetime::new()
    }
}
