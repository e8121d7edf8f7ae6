//! Placement order tokens
//!
//! The order in which symbols appear along the loop is given as a list of
//! tokens: `B` for the battery plus the component names (`R1`, `C2`, ...).
//! It only affects drawing; the physics always sums the series totals.
//!
//! Validation happens here, at the boundary. Everything downstream takes a
//! [`PlacementOrder`] and can assume the battery appears exactly once and
//! every token is known and unique.

use std::collections::HashSet;

use thiserror::Error;

use crate::circuit::CircuitPhysics;
use crate::layout::SymbolKind;

/// Token naming the battery
pub const BATTERY_TOKEN: &str = "B";

/// Reasons a user-supplied order is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order must include exactly one 'B', found {0}")]
    BatteryCount(usize),

    #[error("unknown token '{0}'")]
    UnknownToken(String),

    #[error("token '{0}' used more than once")]
    DuplicateToken(String),
}

/// One entry of a placement order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementToken {
    pub name: String,
    pub kind: SymbolKind,
}

impl PlacementToken {
    fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Validated sequence of placement tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOrder {
    tokens: Vec<PlacementToken>,
}

impl PlacementOrder {
    /// Battery first, then resistors, then capacitors
    pub fn default_for(circuit: &CircuitPhysics) -> Self {
        Self {
            tokens: available_tokens(circuit),
        }
    }

    /// Parse a whitespace-separated order such as `"B R1 R2 C1"`
    ///
    /// A blank string yields the default order. Tokens left out are appended
    /// in default order.
    pub fn parse(text: &str, circuit: &CircuitPhysics) -> Result<Self, OrderError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(Self::default_for(circuit));
        }
        Self::from_tokens(tokens.as_slice(), circuit)
    }

    /// Validate an explicit token list against the circuit's components
    pub fn from_tokens<S: AsRef<str>>(
        tokens: &[S],
        circuit: &CircuitPhysics,
    ) -> Result<Self, OrderError> {
        let batteries = tokens
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| *t == BATTERY_TOKEN)
            .count();
        if batteries != 1 {
            return Err(OrderError::BatteryCount(batteries));
        }

        let available = available_tokens(circuit);
        let mut seen = HashSet::new();
        let mut ordered = Vec::with_capacity(available.len());

        for raw in tokens {
            let raw = raw.as_ref();
            let token = available
                .iter()
                .find(|t| t.name == raw)
                .ok_or_else(|| OrderError::UnknownToken(raw.to_string()))?;
            if !seen.insert(raw) {
                return Err(OrderError::DuplicateToken(raw.to_string()));
            }
            ordered.push(token.clone());
        }

        for token in &available {
            if !seen.contains(token.name.as_str()) {
                ordered.push(token.clone());
            }
        }

        Ok(Self { tokens: ordered })
    }

    pub fn tokens(&self) -> &[PlacementToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false for a validated order; the battery is mandatory
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token names joined by spaces
    pub fn to_order_string(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn available_tokens(circuit: &CircuitPhysics) -> Vec<PlacementToken> {
    std::iter::once(PlacementToken::new(BATTERY_TOKEN, SymbolKind::Battery))
        .chain(
            circuit
                .resistors()
                .iter()
                .map(|r| PlacementToken::new(&r.name, SymbolKind::Resistor)),
        )
        .chain(
            circuit
                .capacitors()
                .iter()
                .map(|c| PlacementToken::new(&c.name, SymbolKind::Capacitor)),
        )
        .collect()
}
