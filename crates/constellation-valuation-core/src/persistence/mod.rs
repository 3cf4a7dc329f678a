pub mod snapshot;

pub use snapshot::{
    export_snapshot, import_snapshot, snapshot_from_value, ScenarioSnapshot,
    SNAPSHOT_FORMAT_VERSION,
};
