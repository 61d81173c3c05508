//! Textual signals derived from the latest indicator values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classification of the latest indicator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// DIF above DEA with a positive histogram
    BullishMomentum,
    /// DIF below DEA with a negative histogram
    BearishMomentum,
    /// %J below the oversold threshold
    Oversold,
    /// %J above the overbought threshold
    Overbought,
}

impl Signal {
    /// Text shown when no signal fires.
    pub const NONE_TEXT: &'static str = "no clear signal";

    pub fn text(&self) -> &'static str {
        match self {
            Signal::BullishMomentum => "bullish momentum",
            Signal::BearishMomentum => "bearish momentum",
            Signal::Oversold => "oversold",
            Signal::Overbought => "overbought",
        }
    }

    /// Whether the signal leans bullish.
    pub fn is_bullish(&self) -> bool {
        matches!(self, Signal::BullishMomentum | Signal::Oversold)
    }

    /// Join signals for display, falling back to [`Signal::NONE_TEXT`].
    pub fn describe(signals: &[Signal]) -> String {
        if signals.is_empty() {
            return Self::NONE_TEXT.to_string();
        }
        signals
            .iter()
            .map(Signal::text)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(Signal::describe(&[]), "no clear signal");
        assert_eq!(
            Signal::describe(&[Signal::BullishMomentum, Signal::Oversold]),
            "bullish momentum, oversold"
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Signal::BearishMomentum).unwrap();
        assert_eq!(json, "\"bearish_momentum\"");
    }
}
