//! Human-readable renderings of [`ManagerStats`].

use std::fmt;

use dish_core::stats::percent;
use dish_core::{ManagerStats, ShelfKind, ShelfSnapshot};

/// One-line progress report: occupancy per shelf, totals and rates.
pub fn current(stats: &ManagerStats) -> String {
    let t = &stats.totals;
    format!(
        "shelves: {} | orders: received={} delivered={} wasted={} expired={} | delivery rate {:.1}%, waste rate {:.1}%",
        stats
            .shelves()
            .iter()
            .map(|s| format!("{}={}/{}", s.kind, s.current, s.capacity))
            .collect::<Vec<_>>()
            .join(" "),
        t.received,
        t.delivered,
        t.wasted,
        t.expired,
        stats.delivery_rate(),
        stats.waste_rate(),
    )
}

/// Multi-line end-of-run summary.
pub fn final_summary(stats: &ManagerStats) -> String {
    FinalSummary(stats).to_string()
}

struct FinalSummary<'a>(&'a ManagerStats);

impl fmt::Display for FinalSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.0.totals;
        writeln!(f, "FINAL SIMULATION RESULTS")?;
        writeln!(f, "========================")?;
        writeln!(f, "ORDERS")?;
        writeln!(f, "  received:  {}", t.received)?;
        writeln!(f, "  delivered: {} ({:.1}%)", t.delivered, percent(t.delivered, t.received))?;
        writeln!(f, "  wasted:    {} ({:.1}%)", t.wasted, percent(t.wasted, t.received))?;
        writeln!(f, "  expired:   {} ({:.1}%)", t.expired, percent(t.expired, t.received))?;
        for shelf in self.0.shelves() {
            write_shelf(f, shelf)?;
        }
        write!(f, "========================")
    }
}

fn write_shelf(f: &mut fmt::Formatter<'_>, shelf: &ShelfSnapshot) -> fmt::Result {
    let heading = match shelf.kind {
        ShelfKind::Hot => "HOT SHELF",
        ShelfKind::Cold => "COLD SHELF",
        ShelfKind::Frozen => "FROZEN SHELF",
        ShelfKind::Overflow => "OVERFLOW SHELF",
    };
    let s = &shelf.stats;
    writeln!(f, "{heading} (capacity {})", shelf.capacity)?;
    writeln!(f, "  added:     {}", s.orders_added)?;
    writeln!(f, "  delivered: {}", s.orders_delivered)?;
    writeln!(f, "  wasted:    {}", s.orders_wasted)?;
    writeln!(f, "  peak:      {}", s.peak_usage)
}
