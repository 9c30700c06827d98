//! Status text projection for the display.

use core::fmt::Write;

use crate::connectivity::LinkStatus;
use crate::touch::TouchState;

pub const STATUS_NO_WIFI: &str = "No WiFi";
pub const STATUS_CONNECTING: &str = "WiFi connecting....";
pub const STATUS_ONLINE: &str = "W-Osc";
pub const TOUCH_PROMPT: &str = "Touch a pad!";

/// The two display lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub status: &'static str,
    pub touch: heapless::String<24>,
}

/// Pure projection of loop state into display text.
pub struct StatusPresenter;

impl StatusPresenter {
    pub fn render(link: LinkStatus, touch: &TouchState) -> StatusView {
        let status = match link {
            LinkStatus::Disconnected => STATUS_NO_WIFI,
            LinkStatus::Reconnecting => STATUS_CONNECTING,
            LinkStatus::Connected => STATUS_ONLINE,
        };

        let mut text = heapless::String::new();
        match touch.active_channel() {
            None => {
                let _ = text.push_str(TOUCH_PROMPT);
            }
            Some(channel) => {
                // "Touched pad #12!" is 16 bytes; fits.
                let _ = write!(text, "Touched pad #{}!", channel.pad_number());
            }
        }

        StatusView { status, touch: text }
    }
}
