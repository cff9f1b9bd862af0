use super::{IdleProbe, IdleReading};
use x11rb::connection::Connection;
use x11rb::protocol::screensaver::{self, State};
use x11rb::protocol::xproto::Window;

pub struct LinuxIdleProbe {
    conn: Option<x11rb::rust_connection::RustConnection>,
    root: Window,
}

impl Default for LinuxIdleProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxIdleProbe {
    pub fn new() -> Self {
        match x11rb::connect(None) {
            Ok((conn, screen_num)) => {
                let Some(root) = conn
                    .setup()
                    .roots
                    .get(screen_num)
                    .map(|screen| screen.root)
                else {
                    log::warn!("Invalid screen number {screen_num}. OS idle probing disabled.");
                    return Self { conn: None, root: 0 };
                };
                Self { conn: Some(conn), root }
            }
            Err(e) => {
                // Wayland or headless: fall back to the browser's idle reports
                log::warn!("Failed to connect to X server: {e}. OS idle probing disabled.");
                Self { conn: None, root: 0 }
            }
        }
    }
}

impl IdleProbe for LinuxIdleProbe {
    fn read_idle(&self) -> Option<IdleReading> {
        let conn = self.conn.as_ref()?;

        let info = screensaver::query_info(conn, self.root).ok()?.reply().ok()?;

        Some(IdleReading {
            idle_secs: u64::from(info.ms_since_user_input / 1000),
            screen_locked: u8::from(info.state) == u8::from(State::ON),
        })
    }
}
