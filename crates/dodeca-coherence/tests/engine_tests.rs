//! End-to-end pipeline tests over the canonical sample organization.

mod common;

use common::{config_with_face_values, sample_config, uniform_config, value_for_energy};
use dodeca_coherence::analysis::shadow::ShadowSeverity;
use dodeca_coherence::analysis::spectral::BalanceClassification;
use dodeca_coherence::analysis::{BreathStatus, ShadowPattern};
use dodeca_coherence::engine::Dodecahedron;
use dodeca_coherence::error::EngineError;
use dodeca_coherence::shared::SharedDodecahedron;
use dodeca_coherence::tuning::{TuningConstants, TuningUpdate};
use dodeca_coherence::octave::{FaceProgressions, OctaveKpis};
use dodeca_coherence::model::{Direction, Kpi};

#[test]
fn engine_initializes_with_the_fixed_topology() {
    let engine = Dodecahedron::new(sample_config(), None).unwrap();
    assert_eq!(engine.faces().len(), 12);
    assert_eq!(engine.edges().len(), 30);
    assert_eq!(engine.vertices().len(), 20);
    // 60 elemental KPIs plus 30 edge KPIs.
    assert_eq!(engine.kpi_count(), 90);
}

#[test]
fn malformed_topology_is_fatal() {
    let mut config = sample_config();
    config.edges.pop();
    assert!(matches!(
        Dodecahedron::new(config, None),
        Err(EngineError::Configuration(_))
    ));

    let mut config = sample_config();
    config.faces[0].elemental_kpis.pop();
    assert!(Dodecahedron::new(config, None).is_err());

    let mut config = sample_config();
    config.vertices[3].face_ids = [1, 6, 11];
    assert!(Dodecahedron::new(config, None).is_err());
}

#[test]
fn recalculate_is_idempotent() {
    let mut engine = Dodecahedron::new(sample_config(), None).unwrap();
    let first = serde_json::to_value(engine.metrics()).unwrap();
    engine.recalculate();
    let second = serde_json::to_value(engine.metrics()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_kpi_aborts_without_mutating_state() {
    let mut engine = Dodecahedron::new(sample_config(), None).unwrap();
    let generation = engine.generation();
    let coherence = engine.metrics().coherence;

    let result = engine.update_kpi("NO_SUCH_KPI", 50.0);
    assert!(matches!(result, Err(EngineError::KpiNotFound(_))));
    assert_eq!(engine.generation(), generation);
    assert_eq!(engine.metrics().coherence, coherence);
}

#[test]
fn kpi_update_propagates_through_the_whole_pipeline() {
    let mut engine = Dodecahedron::new(uniform_config(70.0), None).unwrap();
    let before = engine.metrics().coherence;

    // Collapse one face.
    for k in 1..=5 {
        engine.update_kpi(&format!("F3_K{k}"), 0.0).unwrap();
    }
    let after = engine.metrics().coherence;
    assert!(after < before);

    // The collapsed face is now the critical one.
    assert_eq!(engine.metrics().dominant_mode.critical_face.id, 3);
}

#[test]
fn action_plan_targets_the_lowest_kpi_and_restores_state() {
    let mut engine = Dodecahedron::new(sample_config(), None).unwrap();
    engine.update_kpi("F8_K2", 3.0).unwrap();

    let plan = engine.metrics().action_plan.clone();
    let target = plan.target_kpi.expect("a critical KPI exists");
    assert_eq!(target.id, "F8_K2");
    assert_eq!(plan.target_value, Some(100.0));
    // Driving the worst KPI to target can only help.
    assert!(plan.expected_impact > 0.0);

    // The impact simulation must not leave the value mutated.
    assert_eq!(engine.kpi("F8_K2").unwrap().value(), 3.0);
}

#[test]
fn edge_kpi_updates_flow_into_edge_tension() {
    let mut engine = Dodecahedron::new(uniform_config(70.0), None).unwrap();
    let before = engine.edge("E1-2").unwrap().tension();
    engine.update_kpi("E1-2_K", 0.0).unwrap();
    let after = engine.edge("E1-2").unwrap().tension();
    assert!(after > before);
}

#[test]
fn balanced_breath_on_a_uniform_organization() {
    let engine = Dodecahedron::new(uniform_config(65.0), None).unwrap();
    let breath = engine.breath_analysis();
    assert_eq!(breath.overall.status, BreathStatus::Excellent);
    assert_eq!(breath.overall.critical_count, 0);
    assert_eq!(breath.overall.balanced_axes, 6);
}

#[test]
fn being_action_balance_end_to_end() {
    // Reception faces at energy 0.9, projection faces at 0.2.
    let mut values = [0.0; 12];
    for face in [1usize, 2, 3, 9, 10, 12] {
        values[face - 1] = value_for_energy(0.9);
    }
    for face in [11usize, 7, 8, 4, 5, 6] {
        values[face - 1] = value_for_energy(0.2);
    }
    let engine = Dodecahedron::new(config_with_face_values(values), None).unwrap();
    let balance = &engine.spectral_analysis().diagnostics.being_action_balance;
    assert!((balance.score - 4.5).abs() < 1e-9);
    assert_eq!(balance.classification, BalanceClassification::OverInhaling);
}

#[test]
fn brittle_profit_shadow_detected_with_capped_penalty() {
    let mut values = [value_for_energy(0.5); 12];
    values[0] = value_for_energy(0.85); // hot financial capital
    values[11] = value_for_energy(0.15); // cold risk & resilience
    let engine = Dodecahedron::new(config_with_face_values(values), None).unwrap();

    let shadow = engine.shadow_analysis();
    let pattern = shadow
        .detected_patterns
        .iter()
        .find(|p| p.pattern == ShadowPattern::BrittleProfit)
        .expect("brittle profit fires");
    assert_eq!(pattern.severity, ShadowSeverity::Critical);
    assert_eq!(pattern.affected_face_names[0], "Financial Capital");
    assert!(*shadow.penalties.get(&1).unwrap() <= 0.9);

    // Diagnostic only: the hot face keeps its energy within this pass.
    assert!(engine.face(1).unwrap().energy() > 0.8);
}

#[test]
fn tuning_updates_are_clamped_and_recalculated() {
    let mut engine = Dodecahedron::new(sample_config(), None).unwrap();
    let generation = engine.generation();
    engine.set_tuning(&TuningUpdate {
        alpha: Some(5.0),
        kappa: Some(0.0),
        ..TuningUpdate::default()
    });
    assert_eq!(engine.tuning().alpha, 1.0);
    assert_eq!(engine.tuning().kappa, 1.0);
    assert!(engine.generation() > generation);
}

#[test]
fn rename_face_is_reflected_in_derived_output() {
    let mut engine = Dodecahedron::new(sample_config(), None).unwrap();
    engine.rename_face(3, "People & Culture").unwrap();
    assert_eq!(engine.face(3).unwrap().name, "People & Culture");
    assert!(matches!(
        engine.rename_face(13, "Nope"),
        Err(EngineError::FaceNotFound(13))
    ));
}

#[test]
fn octave_progression_installs_ball_and_pillars() {
    let mut engine = Dodecahedron::new(sample_config(), None).unwrap();

    let mut progressions = FaceProgressions::new();
    let ball = Kpi::new("F1_O2_BALL", "Runway Months", Direction::Increasing)
        .with_bounds(0.0, 24.0)
        .with_value(18.0);
    let pillars = (1..=5)
        .map(|p| {
            Kpi::new(
                format!("F1_O2_P{p}"),
                format!("Structure pillar {p}"),
                Direction::Increasing,
            )
            .with_bounds(0.0, 100.0)
            .with_value(80.0)
        })
        .collect();
    progressions.insert(
        1,
        [(2u8, OctaveKpis { ball, pillars })].into_iter().collect(),
    );
    engine.set_progressions(progressions);

    assert!(matches!(
        engine.set_face_octave_level(1, 9),
        Err(EngineError::Range(_))
    ));

    engine.set_face_octave_level(1, 2).unwrap();
    let face = engine.face(1).unwrap();
    assert_eq!(face.current_octave(), 2);
    assert!(face.ball_kpi().is_some());
    assert_eq!(face.pillar_kpis().len(), 5);
    assert!(face.octave_coherence() > 0.0);

    // The octave KPIs are live in the registry.
    engine.update_kpi("F1_O2_BALL", 24.0).unwrap();
    assert_eq!(engine.kpi("F1_O2_BALL").unwrap().value(), 24.0);

    // Pentagram analysis becomes available for the face.
    let pentagram = engine.pentagram_analysis(1).unwrap();
    assert!(pentagram.local_coherence > 0.0);
    assert!((pentagram.pillar_symmetry - 1.0).abs() < 1e-9);
}

#[test]
fn pentagram_analysis_requires_an_active_octave() {
    let engine = Dodecahedron::new(sample_config(), None).unwrap();
    assert!(matches!(
        engine.pentagram_analysis(1),
        Err(EngineError::Configuration(_))
    ));
}

#[test]
fn snapshot_preserves_the_consumer_contract() {
    let engine = Dodecahedron::new(sample_config(), None).unwrap();
    let value = serde_json::to_value(engine.snapshot()).unwrap();

    assert!(value.get("globalMetrics").is_some());
    assert!(value["globalMetrics"].get("coherenceStatus").is_some());
    assert!(value.get("dominantMode").is_some());
    assert!(value.get("actionPlan").is_some());
    assert!(value.get("spectralAnalysis").is_some());
    assert!(value.get("shadowAnalysis").is_some());
    assert!(value.get("breathAnalysis").is_some());
    assert!(value.get("tuningConstants").is_some());
    assert_eq!(value["faces"].as_array().unwrap().len(), 12);
    assert_eq!(value["edges"].as_array().unwrap().len(), 30);
    assert_eq!(value["vertices"].as_array().unwrap().len(), 20);

    let face = &value["faces"][0];
    assert!(face.get("faceEnergy").is_some());
    assert!(face.get("harmonicResonance").is_some());
    assert!(face.get("elementalKpis").is_some());

    let stats = &value["statistics"];
    assert_eq!(stats["totalKpis"], 90);
}

#[test]
fn global_coherence_blends_faces_edges_and_vertices() {
    // A uniform healthy organization with full-health edge KPIs: energies
    // 0.8, zero tension, full vertex coherence.
    let engine = Dodecahedron::new(uniform_config(value_for_energy(0.8)), None).unwrap();
    let expected = 0.4 * 0.8 + 0.3 * 1.0 + 0.3 * 1.0;
    assert!((engine.metrics().coherence - expected).abs() < 1e-9);
}

#[test]
fn shared_handle_serializes_writers_and_serves_readers() {
    let shared = SharedDodecahedron::new(sample_config(), Some(TuningConstants::balanced()))
        .unwrap();
    let before = shared.snapshot().global_metrics.coherence;

    shared.update_kpi("F1_K1", 5.0).unwrap();
    let after = shared.snapshot().global_metrics.coherence;
    assert_ne!(before, after);

    let handle = shared.clone();
    let worker = std::thread::spawn(move || handle.snapshot().global_metrics.coherence);
    let from_thread = worker.join().unwrap();
    assert_eq!(from_thread, after);
}
