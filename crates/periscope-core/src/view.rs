//! Which sideband panel the consumer is currently looking at.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Active sideband view.
///
/// The screenshot fetcher reads this on every tick: screenshots are only
/// downloaded while the visual view is active.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum View {
    /// Execution blocks (code, tool output)
    #[default]
    Blocks,
    /// Live screenshot of the backend's browser/desktop
    Screenshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_blocks() {
        assert_eq!(View::default(), View::Blocks);
    }

    #[test]
    fn test_parse_from_name() {
        assert_eq!("screenshot".parse::<View>().unwrap(), View::Screenshot);
        assert!("browser".parse::<View>().is_err());
    }
}
