/// Setup state of a globe.
///
/// The globe waits in `Loading` until the world dataset settles. Success moves
/// it to `Running` for good. A failed load is recorded but the globe stays in
/// `Loading`: it never draws, and later completions are ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Loading { failed: bool },
    Running,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Loading { failed: false }
    }
}

impl Lifecycle {
    /// Loading → Running. Returns false if the load already settled.
    pub fn start(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = Lifecycle::Running;
        true
    }

    /// Records a setup failure. Returns false if the load already settled.
    pub fn fail(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = Lifecycle::Loading { failed: true };
        true
    }

    /// Still waiting on a load that has neither succeeded nor failed.
    pub fn is_pending(self) -> bool {
        self == Lifecycle::Loading { failed: false }
    }

    pub fn is_loading(self) -> bool {
        matches!(self, Lifecycle::Loading { .. })
    }

    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }

    pub fn has_failed(self) -> bool {
        self == Lifecycle::Loading { failed: true }
    }

    pub fn name(self) -> &'static str {
        match self {
            Lifecycle::Loading { failed: false } => "loading",
            Lifecycle::Loading { failed: true } => "loading (setup failed)",
            Lifecycle::Running => "running",
        }
    }
}
