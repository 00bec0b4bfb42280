//! Flat JSON snapshots of the open-position ledger
//!
//! Crash recovery only: the snapshot is the `id -> position` map and nothing
//! else. A round trip reproduces every position field exactly.

use std::collections::HashMap;
use std::path::Path;

use crate::risk::Position;

/// Write the active positions to `path` as pretty-printed JSON.
pub fn save_snapshot(
    path: impl AsRef<Path>,
    positions: &HashMap<String, Position>,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(positions)?;
    std::fs::write(path.as_ref(), json)?;
    tracing::debug!(count = positions.len(), path = %path.as_ref().display(), "snapshot saved");
    Ok(())
}

/// Load a snapshot written by [`save_snapshot`].
///
/// A missing file is an empty ledger, so a fresh session starts cleanly.
pub fn load_snapshot(path: impl AsRef<Path>) -> anyhow::Result<HashMap<String, Position>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskConfig;
    use crate::risk::{Direction, PositionRiskManager};
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_round_trip() {
        let mut manager = PositionRiskManager::new(RiskConfig::default());
        manager.register_position(
            "ORD-1",
            "NIFTY",
            Direction::Long,
            200,
            dec!(1000),
            dec!(950),
            Some(dec!(1100)),
        );
        manager.register_position(
            "ORD-2",
            "BANKNIFTY",
            Direction::Short,
            50,
            dec!(45000.25),
            dec!(45500.75),
            None,
        );
        manager.update_position("ORD-1", dec!(1012.40));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("positions.json");

        save_snapshot(&path, manager.active_positions()).unwrap();
        let restored = load_snapshot(&path).unwrap();

        assert_eq!(&restored, manager.active_positions());
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let restored = load_snapshot(dir.path().join("absent.json")).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("positions.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_snapshot(&path).is_err());
    }
}
