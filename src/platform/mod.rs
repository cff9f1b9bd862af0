pub mod types;

pub use types::{IdleProbe, IdleReading};

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxIdleProbe as NativeIdleProbe;

/// Platforms without a probe defer to the browser-reported idle state.
#[cfg(not(target_os = "linux"))]
#[derive(Default)]
pub struct NativeIdleProbe;

#[cfg(not(target_os = "linux"))]
impl NativeIdleProbe {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_os = "linux"))]
impl IdleProbe for NativeIdleProbe {
    fn read_idle(&self) -> Option<IdleReading> {
        None
    }
}

/// Probe that never has a reading.
pub struct NoIdleProbe;

impl IdleProbe for NoIdleProbe {
    fn read_idle(&self) -> Option<IdleReading> {
        None
    }
}
