//! 対局ルール（VariantConfig）
//!
//! 盤の大きさ・成りの段・強制成り・持ち駒の可否・初期配置をまとめた設定。
//! 指し手生成はすべてこの設定を引数として受け取る。

use serde::{Deserialize, Serialize};

use super::{Color, PieceKind, Promotion, Square};
use crate::error::VariantError;

/// ルールの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 5x5 五五将棋
    Mini,
    /// 9x9 本将棋
    Standard,
    /// 12x12 中将棋
    Chu,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Mini, Variant::Standard, Variant::Chu];

    pub const fn config(self) -> &'static VariantConfig {
        match self {
            Variant::Mini => &VariantConfig::MINI,
            Variant::Standard => &VariantConfig::STANDARD,
            Variant::Chu => &VariantConfig::CHU,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Variant::Mini => "mini",
            Variant::Standard => "standard",
            Variant::Chu => "chu",
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mini" | "minishogi" | "5x5" => Ok(Variant::Mini),
            "standard" | "shogi" | "9x9" => Ok(Variant::Standard),
            "chu" | "chushogi" | "12x12" => Ok(Variant::Chu),
            _ => Err(VariantError::Unknown(s.to_string())),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 1 つのルールの静的な設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantConfig {
    pub variant: Variant,
    /// 盤の一辺
    pub size: u8,
    /// 敵陣の段数
    pub promotion_ranks: u8,
    /// 行き所のない駒の強制成りを適用するか
    pub forced_promotion: bool,
    /// 持ち駒を打てるか
    pub drops: bool,
    /// 初期配置（SFEN 盤面部）
    pub layout: &'static str,
    /// `UCI_Variant` に渡す名前
    pub oracle_name: &'static str,
}

impl VariantConfig {
    pub const MINI: VariantConfig = VariantConfig {
        variant: Variant::Mini,
        size: 5,
        promotion_ranks: 1,
        forced_promotion: true,
        drops: true,
        layout: "rbsgk/4p/5/P4/KGSBR",
        oracle_name: "minishogi",
    };

    pub const STANDARD: VariantConfig = VariantConfig {
        variant: Variant::Standard,
        size: 9,
        promotion_ranks: 3,
        forced_promotion: true,
        drops: true,
        layout: "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL",
        oracle_name: "shogi",
    };

    pub const CHU: VariantConfig = VariantConfig {
        variant: Variant::Chu,
        size: 12,
        promotion_ranks: 4,
        forced_promotion: false,
        drops: false,
        layout: concat!(
            "lfcsgekgscfl/a1b1txot1b1a/mvrhdqydhrvm/pppppppppppp/3i4i3/12/",
            "12/3I4I3/PPPPPPPPPPPP/MVRHDYQDHRVM/A1B1TOXT1B1A/LFCSGKEGSCFL",
        ),
        oracle_name: "chushogi",
    };

    /// 盤の大きさからルールを推定する
    pub fn for_size(size: usize) -> Option<&'static VariantConfig> {
        Variant::ALL
            .into_iter()
            .map(Variant::config)
            .find(|cfg| cfg.size as usize == size)
    }

    /// このルールで使う駒種か
    pub fn supports(&self, kind: PieceKind) -> bool {
        match self.variant {
            Variant::Mini | Variant::Standard => kind.code() <= PieceKind::Lance.code(),
            Variant::Chu => kind != PieceKind::Knight,
        }
    }

    /// 相手側の端からの距離（0 が最奥段）
    #[inline]
    pub const fn depth_from_far_edge(&self, row: u8, color: Color) -> u8 {
        match color {
            Color::White => row,
            Color::Black => self.size - 1 - row,
        }
    }

    /// 敵陣か
    #[inline]
    pub const fn in_promotion_zone(&self, sq: Square, color: Color) -> bool {
        self.depth_from_far_edge(sq.row, color) < self.promotion_ranks
    }

    /// 行 `row` に不成で置くと動けなくなる駒か
    ///
    /// 歩・香は最奥段、桂は奥の二段。
    pub const fn is_dead_end(&self, kind: PieceKind, row: u8, color: Color) -> bool {
        let depth = self.depth_from_far_edge(row, color);
        match kind {
            PieceKind::Pawn | PieceKind::Lance => depth == 0,
            PieceKind::Knight => depth <= 1,
            _ => false,
        }
    }

    /// 強制成りの対象か
    pub const fn must_promote(
        &self,
        kind: PieceKind,
        promotion: Promotion,
        row: u8,
        color: Color,
    ) -> bool {
        self.forced_promotion
            && matches!(promotion, Promotion::Unpromoted)
            && self.is_dead_end(kind, row, color)
    }
}
