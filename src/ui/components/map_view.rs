//! Map panel for a task location
//!
//! A terminal cannot draw map tiles, so the panel shows the centre, zoom and
//! marker, plus a link that opens the same view in a browser.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::constants::DEFAULT_MAP_ZOOM;
use crate::entities::GeoPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub marker: GeoPoint,
}

impl MapView {
    /// Map centred on `point` with a marker there
    pub fn centered_on(point: GeoPoint) -> Self {
        Self {
            center: point,
            zoom: DEFAULT_MAP_ZOOM,
            marker: point,
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn link(&self) -> String {
        format!(
            "https://www.google.com/maps/@?api=1&map_action=map&center={},{}&zoom={}",
            self.center.lat, self.center.lng, self.zoom
        )
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("📍 ", Style::default().fg(Color::Red)),
                Span::raw(self.marker.to_string()),
            ]),
            Line::from(Span::styled(format!("Zoom {}", self.zoom), Style::default().fg(Color::Gray))),
            Line::from(Span::styled(self.link(), Style::default().fg(Color::Blue))),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Map ");
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
