/// Desktop-session reading of user inactivity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleReading {
    pub idle_secs: u64,
    pub screen_locked: bool,
}

pub trait IdleProbe: Send + Sync {
    /// `None` when the platform cannot measure inactivity.
    fn read_idle(&self) -> Option<IdleReading>;
}
