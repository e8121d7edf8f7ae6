//! Properties of the assembled loop, checked through the public API.

use rand::SeedableRng;
use rand::rngs::StdRng;

use rcloop::animation::{AnimationLoop, StopCondition, StopReason};
use rcloop::circuit::{Capacitor, CircuitPhysics, Resistor};
use rcloop::config::ScenarioConfig;
use rcloop::geometry::{Path, Point2D, RectLoopTemplate};
use rcloop::order::{OrderError, PlacementOrder};
use rcloop::render::RecordingRenderer;

fn rc_circuit() -> CircuitPhysics {
    CircuitPhysics::new(
        9.0,
        Resistor::numbered(&[3.0, 2.0, 5.0]),
        Capacitor::numbered(&[0.01, 0.02]),
    )
}

#[test]
fn resistive_current_is_constant() {
    let circuit = CircuitPhysics::new(9.0, Resistor::numbered(&[3.0, 2.0, 5.0]), vec![]);

    assert_eq!(circuit.req(), 10.0);
    for t in [0.0, 0.1, 1.0, 100.0] {
        assert!((circuit.current(t) - 0.9).abs() < 1e-12);
    }
}

#[test]
fn rc_current_decays_by_one_time_constant() {
    let circuit = rc_circuit();
    let tau = circuit.tau().unwrap();

    assert!((circuit.ceq().unwrap() - 1.0 / 150.0).abs() < 1e-12);
    assert!((tau - 10.0 / 150.0).abs() < 1e-12);
    assert!((circuit.current(0.0) - 0.9).abs() < 1e-12);
    assert!((circuit.current(tau) - 0.9 / std::f64::consts::E).abs() < 1e-12);

    let samples: Vec<f64> = (0..50).map(|i| circuit.current(i as f64 * 0.01)).collect();
    assert!(samples.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn path_is_continuous_across_corners() {
    let path = RectLoopTemplate::default().mid_path();
    let mut boundary = 0.0;

    for len in &path.segment_lengths()[..path.segment_lengths().len() - 1] {
        boundary += len;
        let before = path.position_at(boundary - 1e-9).position;
        let after = path.position_at(boundary + 1e-9).position;
        assert!(before.distance_to(after) < 1e-6, "gap at s={boundary}");
    }
}

#[test]
fn tangents_are_unit_length() {
    let path = Path::new(vec![
        Point2D::new(0.0, 0.0),
        Point2D::new(3.0, 4.0),
        Point2D::new(3.0, 4.0),
        Point2D::new(-2.0, 4.0),
    ])
    .unwrap();

    let mut s = 0.0;
    while s < path.total_length() {
        let tangent = path.position_at(s).tangent;
        assert!((tangent.magnitude() - 1.0).abs() < 1e-12, "s={s}");
        s += 0.25;
    }
}

#[test]
fn order_contract_holds() {
    let circuit = rc_circuit();

    assert_eq!(
        PlacementOrder::parse("R1 C1", &circuit),
        Err(OrderError::BatteryCount(0))
    );
    assert_eq!(
        PlacementOrder::parse("B R1 B", &circuit),
        Err(OrderError::BatteryCount(2))
    );
    assert_eq!(
        PlacementOrder::parse("B R4", &circuit),
        Err(OrderError::UnknownToken("R4".to_string()))
    );
    assert_eq!(
        PlacementOrder::parse("B C2 C2", &circuit),
        Err(OrderError::DuplicateToken("C2".to_string()))
    );
    assert_eq!(
        PlacementOrder::parse("C2 B", &circuit)
            .unwrap()
            .to_order_string(),
        "C2 B R1 R2 R3 C1"
    );
}

#[test]
fn seeded_runs_are_reproducible() {
    let config = ScenarioConfig {
        resistors: vec![3.0, 2.0, 5.0],
        capacitors: vec![0.01, 0.02],
        ..ScenarioConfig::default()
    };
    let circuit = config.circuit();
    let order = config.placement_order(&circuit).unwrap();

    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut anim = AnimationLoop::from_config(&config, &order, &mut rng);
        let summary = anim
            .run(&mut RecordingRenderer::new(), &StopCondition::after_ticks(30))
            .unwrap();
        assert_eq!(summary.stop_reason, StopReason::TickLimit);
        anim.field().electrons().to_vec()
    };

    assert_eq!(run(5), run(5));
    assert_ne!(run(5), run(6));
}
