//! Turns [`Counts`] into the dashboard page. Pure formatting, no I/O.

use super::counts::Counts;

const PAGE_TEMPLATE: &str = include_str!("dashboard.html");

pub const OK_COLOR: &str = "#26392f";

pub const WARN_COLOR: &str = "red";

/// When a cell switches from normal to alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    AtLeast(usize),
    Above(usize),
}

impl Threshold {
    pub fn is_alert(self, value: usize) -> bool {
        match self {
            Threshold::AtLeast(limit) => value >= limit,
            Threshold::Above(limit) => value > limit,
        }
    }
}

pub const ALL_THRESHOLD: Threshold = Threshold::AtLeast(10);
pub const ASSIGNED_THRESHOLD: Threshold = Threshold::Above(0);
pub const MINE_THRESHOLD: Threshold = Threshold::Above(1);
pub const APPROVED_THRESHOLD: Threshold = Threshold::Above(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub label: &'static str,
    pub value: usize,
    pub threshold: Threshold,
}

impl Cell {
    pub fn is_alert(&self) -> bool {
        self.threshold.is_alert(self.value)
    }

    pub fn class(&self) -> &'static str {
        if self.is_alert() { "warn" } else { "ok" }
    }

    fn to_html(self) -> String {
        format!(
            r#"      <div class="grid-item {}" title="{}">{}</div>"#,
            self.class(),
            self.label,
            self.value
        )
    }
}

/// Grid order: top-left, top-right, bottom-left, bottom-right.
pub fn cells(counts: &Counts) -> [Cell; 4] {
    [
        Cell {
            label: "Open pull requests",
            value: counts.all,
            threshold: ALL_THRESHOLD,
        },
        Cell {
            label: "Awaiting my review",
            value: counts.assigned_to_me,
            threshold: ASSIGNED_THRESHOLD,
        },
        Cell {
            label: "My pull requests",
            value: counts.my_pull_requests,
            threshold: MINE_THRESHOLD,
        },
        Cell {
            label: "My approved pull requests",
            value: counts.my_approved_pull_requests,
            threshold: APPROVED_THRESHOLD,
        },
    ]
}

pub fn render_page(counts: &Counts, refresh_secs: u64) -> String {
    let cells_html = cells(counts)
        .into_iter()
        .map(Cell::to_html)
        .collect::<Vec<_>>()
        .join("\n");

    PAGE_TEMPLATE
        .replace("{refresh_secs}", &refresh_secs.to_string())
        .replace("{ok_color}", OK_COLOR)
        .replace("{warn_color}", WARN_COLOR)
        .replace("{cells}", &cells_html)
}
