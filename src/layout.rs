//! Arc-length layout of component symbols along the loop
//!
//! Symbols are spread evenly over the middle of the path, away from the first
//! and last stretch of arc length where the loop turns its corners.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Path, Point2D};
use crate::order::PlacementOrder;

/// Which symbol a placement draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Battery,
    Resistor,
    Capacitor,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Battery => "battery",
            SymbolKind::Resistor => "resistor",
            SymbolKind::Capacitor => "capacitor",
        })
    }
}

/// Portion of the path (as fractions of its length) that symbols may occupy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutFractions {
    pub start: f64,
    pub end: f64,
}

impl Default for LayoutFractions {
    fn default() -> Self {
        Self {
            start: 0.08,
            end: 0.92,
        }
    }
}

/// A symbol pinned to the path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentPlacement {
    pub token: String,
    pub kind: SymbolKind,
    pub anchor_arc_length: f64,
    pub position: Point2D,
    pub tangent: Point2D,
}

/// Arc lengths of `n` evenly spaced symbol centers
///
/// A single symbol sits halfway between the two bounds; two or more span them
/// inclusively.
pub fn centers_along_path(total_length: f64, n: usize, fractions: LayoutFractions) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let a = total_length * fractions.start;
    let b = total_length * fractions.end;
    if n == 1 {
        return vec![(a + b) / 2.0];
    }

    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + i as f64 * step).collect()
}

/// Pair each token of `order` with an anchor on `path`
pub fn place_components(
    path: &Path,
    order: &PlacementOrder,
    fractions: LayoutFractions,
) -> Vec<ComponentPlacement> {
    let anchors = centers_along_path(path.total_length(), order.len(), fractions);

    order
        .tokens()
        .iter()
        .zip(anchors)
        .map(|(token, s)| {
            let sample = path.position_at(s);
            tracing::debug!(
                token = %token.name,
                s,
                x = sample.position.x,
                y = sample.position.y,
                "placed symbol"
            );
            ComponentPlacement {
                token: token.name.clone(),
                kind: token.kind,
                anchor_arc_length: s,
                position: sample.position,
                tangent: sample.tangent,
            }
        })
        .collect()
}

/// One line per placement: token, kind, anchor, position and tangent
pub fn placement_table(placements: &[ComponentPlacement]) -> String {
    placements
        .iter()
        .map(|p| {
            format!(
                "{} {} s={:.2} at ({:.2}, {:.2}) dir ({:.2}, {:.2})",
                p.token,
                p.kind,
                p.anchor_arc_length,
                p.position.x,
                p.position.y,
                p.tangent.x,
                p.tangent.y
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Capacitor, CircuitPhysics, Resistor};
    use crate::geometry::RectLoopTemplate;

    #[test]
    fn no_symbols_no_anchors() {
        assert!(centers_along_path(720.0, 0, LayoutFractions::default()).is_empty());
    }

    #[test]
    fn single_symbol_sits_at_midpoint() {
        let centers = centers_along_path(720.0, 1, LayoutFractions::default());
        assert_eq!(centers.len(), 1);
        assert!((centers[0] - 360.0).abs() < 1e-9);

        let centers = centers_along_path(
            100.0,
            1,
            LayoutFractions {
                start: 0.2,
                end: 0.4,
            },
        );
        assert!((centers[0] - 30.0).abs() < 1e-12);
    }

    #[test]
    fn many_symbols_span_the_bounds() {
        let total = 720.0;
        for n in 2..12 {
            let centers = centers_along_path(total, n, LayoutFractions::default());
            assert_eq!(centers.len(), n);
            assert!((centers[0] - 0.08 * total).abs() < 1e-9);
            assert!((centers[n - 1] - 0.92 * total).abs() < 1e-9);
            assert!(centers.windows(2).all(|w| w[1] > w[0]));
        }
    }

    #[test]
    fn two_symbols_use_both_ends() {
        let centers = centers_along_path(100.0, 2, LayoutFractions::default());
        assert_eq!(centers, vec![8.0, 92.0]);
    }

    #[test]
    fn placements_follow_order() {
        let circuit = CircuitPhysics::new(
            9.0,
            Resistor::numbered(&[3.0, 2.0]),
            Capacitor::numbered(&[0.01]),
        );
        let order = PlacementOrder::parse("C1 B R2 R1", &circuit).unwrap();
        let path = RectLoopTemplate::default().mid_path();

        let placements = place_components(&path, &order, LayoutFractions::default());

        let tokens: Vec<_> = placements.iter().map(|p| p.token.as_str()).collect();
        assert_eq!(tokens, ["C1", "B", "R2", "R1"]);
        assert_eq!(placements[0].kind, SymbolKind::Capacitor);
        assert_eq!(placements[1].kind, SymbolKind::Battery);
        assert_eq!(placements[3].kind, SymbolKind::Resistor);

        for placement in &placements {
            let sample = path.position_at(placement.anchor_arc_length);
            assert_eq!(placement.position, sample.position);
            assert_eq!(placement.tangent, sample.tangent);
        }
    }

    #[test]
    fn lone_battery_lands_opposite_the_start_corner() {
        let circuit = CircuitPhysics::new(9.0, vec![], vec![]);
        let order = PlacementOrder::default_for(&circuit);
        let path = RectLoopTemplate::default().mid_path();

        let placements = place_components(&path, &order, LayoutFractions::default());

        // Half of a 720 loop starting bottom-left is the top-right corner
        assert_eq!(placements.len(), 1);
        assert!((placements[0].anchor_arc_length - 360.0).abs() < 1e-9);
        assert!(placements[0].position.distance_to(Point2D::new(90.0, 90.0)) < 1e-9);
    }

    #[test]
    fn default_scenario_layout() {
        let circuit = CircuitPhysics::new(
            9.0,
            Resistor::numbered(&[3.0, 2.0, 5.0]),
            Capacitor::numbered(&[0.01, 0.02]),
        );
        let order = PlacementOrder::default_for(&circuit);
        let path = RectLoopTemplate::default().mid_path();

        let placements = place_components(&path, &order, LayoutFractions::default());

        insta::assert_snapshot!(placement_table(&placements), @r"
        B battery s=57.60 at (-90.00, -32.40) dir (0.00, 1.00)
        R1 resistor s=178.56 at (-90.00, 88.56) dir (0.00, 1.00)
        R2 resistor s=299.52 at (29.52, 90.00) dir (1.00, 0.00)
        R3 resistor s=420.48 at (90.00, 29.52) dir (0.00, -1.00)
        C1 capacitor s=541.44 at (88.56, -90.00) dir (-1.00, 0.00)
        C2 capacitor s=662.40 at (-32.40, -90.00) dir (-1.00, 0.00)
        ");
    }
}
