use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::array::ChunkShape;

/// The identifier for the `regular` chunk grid.
pub const IDENTIFIER: &str = "regular";

/// Configuration parameters for a `regular` chunk grid.
///
/// Every element of `chunk_shape` must be non-zero.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug, Display)]
#[serde(deny_unknown_fields)]
#[display(
    "regular chunk grid {}",
    serde_json::to_string(self).unwrap_or_default()
)]
pub struct RegularChunkGridConfiguration {
    /// The chunk shape.
    pub chunk_shape: ChunkShape,
}

impl From<ChunkShape> for RegularChunkGridConfiguration {
    fn from(chunk_shape: ChunkShape) -> Self {
        Self { chunk_shape }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_configuration() {
        assert!(serde_json::from_str::<RegularChunkGridConfiguration>(
            r#"{"chunk_shape": [1, 2, 3]}"#
        )
        .is_ok());
        assert!(serde_json::from_str::<RegularChunkGridConfiguration>(
            r#"{"chunk_shape": [1, 0, 3]}"#
        )
        .is_err());
        assert!(
            serde_json::from_str::<RegularChunkGridConfiguration>(r#"{"chunk_shape": [-1]}"#)
                .is_err()
        );
    }
}
