//! Layout management and calculations

use ratatui::layout::Rect;

/// Screen regions of the app shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub nav: Option<Rect>,
    pub body: Rect,
    pub status: Rect,
}

/// Manages layout calculations and constraints for the UI
pub struct LayoutManager;

impl LayoutManager {
    /// Split the screen into nav bar (signed-in only), body and status bar
    #[must_use]
    pub fn main_layout(area: Rect, with_nav: bool) -> AppLayout {
        let nav_height = u16::from(with_nav && area.height > 2);
        let status_height = u16::from(area.height > 1);
        let body_height = area.height.saturating_sub(nav_height + status_height);

        AppLayout {
            nav: (nav_height > 0).then(|| Rect::new(area.x, area.y, area.width, nav_height)),
            body: Rect::new(area.x, area.y + nav_height, area.width, body_height),
            status: Rect::new(area.x, area.y + nav_height + body_height, area.width, status_height),
        }
    }
}
