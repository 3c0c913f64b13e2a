//! 固定レベル数のカタログ実装
//!
//! 本番ではレベルデータサービスがレベルの有効性を判定します。この実装は
//! 設定された最大レベル番号までを有効とみなします。

use async_trait::async_trait;

use crate::domain::{LevelCatalog, LevelNumber};

/// Level catalog accepting levels `1..=highest`.
pub struct FixedLevelCatalog {
    highest: u32,
}

impl FixedLevelCatalog {
    /// Create a catalog accepting levels up to and including `highest`.
    pub fn new(highest: u32) -> Self {
        Self { highest }
    }
}

#[async_trait]
impl LevelCatalog for FixedLevelCatalog {
    async fn contains(&self, level: LevelNumber) -> bool {
        level.value() <= self.highest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(number: u32) -> LevelNumber {
        LevelNumber::new(number).unwrap()
    }

    #[tokio::test]
    async fn test_contains_levels_within_range() {
        // テスト項目: 1 から最大レベルまでが有効と判定される
        // given (前提条件):
        let catalog = FixedLevelCatalog::new(5);

        // then (期待する結果):
        assert!(catalog.contains(level(1)).await);
        assert!(catalog.contains(level(5)).await);
    }

    #[tokio::test]
    async fn test_rejects_level_beyond_highest() {
        // テスト項目: 最大レベルを超える番号は無効と判定される
        // given (前提条件):
        let catalog = FixedLevelCatalog::new(5);

        // then (期待する結果):
        assert!(!catalog.contains(level(6)).await);
    }
}
