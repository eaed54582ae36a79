//! Log panel listing recent log lines, newest first

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Clear, List, ListItem},
    Frame,
};

use super::common;
use crate::constants::DIALOG_TITLE_LOGS;
use crate::logger::Logger;

pub struct LogsDialog;

impl LogsDialog {
    pub fn render(f: &mut Frame, area: Rect, logger: &Logger) {
        let width = area.width.saturating_mul(8) / 10;
        let height = area.height.saturating_mul(8) / 10;
        let dialog_area = common::centered_rect(width, height, area);

        let items: Vec<ListItem> = logger
            .get_logs()
            .into_iter()
            .map(|line| {
                let color = if line.contains("ERROR") {
                    Color::Red
                } else if line.contains("WARN") {
                    Color::Yellow
                } else {
                    Color::White
                };
                ListItem::new(line).style(Style::default().fg(color))
            })
            .collect();

        f.render_widget(Clear, dialog_area);
        f.render_widget(
            List::new(items).block(common::create_dialog_block(DIALOG_TITLE_LOGS, Color::Cyan)),
            dialog_area,
        );
    }
}
