mod aggregate_ops;
mod demand_history;
mod demand_record;
mod event;
mod hex_summary;

pub use aggregate_ops::aggregate_events;
pub use demand_history::DemandHistory;
pub use demand_record::{
    read_demand_csv, slot_of, slot_start, write_demand_csv, DemandRecord, DemandRow, Slot,
    SLOT_SECONDS,
};
pub use event::Event;
pub use hex_summary::{summarize_cells, write_summary_csv, HexSummary};
