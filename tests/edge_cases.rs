//! Edge case and boundary condition tests for the tractor core

use rs_tractor::{
    decode, encode_telemetry,
    hal::{MockBody, MockClock, MockOpener},
    protocol::{guarded, sequential},
    traits::Clock,
    Config, DecodeTable, Direction, Gear, InputMode, LinkCommand, LinkConfig, RoundOutcome,
    SessionConfig, SimConfig, Simulation, VehicleConfig, VehicleController, Vec2,
};

// ============================================================================
// Boundary Value Tests
// ============================================================================

#[test]
fn telemetry_boundaries() {
    assert_eq!(encode_telemetry(0), 0);
    assert_eq!(encode_telemetry(255), 255);
    assert_eq!(encode_telemetry(256), 255);
    assert_eq!(encode_telemetry(300), 255);
    assert_eq!(encode_telemetry(u32::MAX), 255);
}

#[test]
fn zero_dt_changes_nothing() {
    let mut c = VehicleController::new(MockBody::new(), VehicleConfig::default());
    c.request_gear(Gear::Forward);
    c.set_move_dir(Vec2::new(1.0, 0.0));
    let v = c.physics_tick(0.0).unwrap();
    assert_eq!(c.current_speed(), 0.0);
    assert_eq!(v, Vec2::ZERO);
    assert_eq!(c.target_speed(), 50.0);
}

#[test]
fn negative_and_nan_dt_are_ignored() {
    let mut c = VehicleController::new(MockBody::new(), VehicleConfig::default());
    c.request_gear(Gear::Forward);
    c.physics_tick(1.0).unwrap();
    c.physics_tick(-5.0).unwrap();
    c.physics_tick(f32::NAN).unwrap();
    c.physics_tick(f32::INFINITY).unwrap();
    assert_eq!(c.current_speed(), 5.0);
}

#[test]
fn zero_move_vector_yields_zero_velocity_at_speed() {
    let mut c = VehicleController::new(MockBody::new(), VehicleConfig::default());
    c.request_gear(Gear::Forward);
    c.physics_tick(4.0).unwrap();
    assert_eq!(c.current_speed(), 20.0);
    assert_eq!(c.body().velocity, Vec2::ZERO);
    assert!(!c.snapshot().moving);
}

#[test]
fn zero_speed_caps_hold_vehicle() {
    let config = VehicleConfig::default()
        .with_max_speed(-10.0)
        .with_acceleration_rate(-1.0);
    assert_eq!(config.max_speed, 0.0);
    assert_eq!(config.acceleration_rate, 0.0);

    let mut c = VehicleController::new(MockBody::new(), config);
    c.request_gear(Gear::Forward);
    c.set_move_dir(Vec2::new(1.0, 0.0));
    c.physics_tick(10.0).unwrap();
    assert_eq!(c.current_speed(), 0.0);
}

#[test]
fn speed_above_new_cap_ramps_down() {
    let mut c = VehicleController::new(MockBody::new(), VehicleConfig::default());
    c.request_gear(Gear::Forward);
    c.physics_tick(6.0).unwrap();
    assert_eq!(c.current_speed(), 30.0);

    // reverse cap is 25: ramp down towards it, never below
    c.request_gear(Gear::Reverse);
    c.physics_tick(0.5).unwrap();
    assert_eq!(c.current_speed(), 27.5);
    c.physics_tick(10.0).unwrap();
    assert_eq!(c.current_speed(), 25.0);
}

// ============================================================================
// Direction Priority Tests
// ============================================================================

#[test]
fn x_axis_wins_ties() {
    assert_eq!(Direction::from_vector(Vec2::new(1.0, 1.0)), Some(Direction::Right));
    assert_eq!(Direction::from_vector(Vec2::new(-0.1, -5.0)), Some(Direction::Left));
    assert_eq!(Direction::from_vector(Vec2::new(0.0, -0.1)), Some(Direction::Down));
    assert_eq!(Direction::from_vector(Vec2::ZERO), None);
}

// ============================================================================
// Decode Table Edge Cases
// ============================================================================

#[test]
fn every_byte_decodes() {
    for table in [DecodeTable::Guarded, DecodeTable::Sequential] {
        for gear in [Gear::Neutral, Gear::Forward, Gear::Reverse, Gear::Brake] {
            for byte in 0..=u8::MAX {
                let _ = decode(table, byte, gear);
            }
        }
    }
}

#[test]
fn guarded_gear_bytes_ignore_current_gear() {
    for gear in [Gear::Neutral, Gear::Forward, Gear::Reverse, Gear::Brake] {
        assert_eq!(
            decode(DecodeTable::Guarded, guarded::BRAKE, gear),
            LinkCommand::SetGear(Gear::Brake)
        );
        assert_eq!(
            decode(DecodeTable::Guarded, guarded::NEUTRAL, gear),
            LinkCommand::SetGear(Gear::Neutral)
        );
    }
}

#[test]
fn guarded_multi_bit_bytes_are_ignored() {
    let byte = guarded::RIGHT | guarded::UP;
    assert_eq!(
        decode(DecodeTable::Guarded, byte, Gear::Forward),
        LinkCommand::Ignore
    );
}

#[test]
fn sequential_zero_is_fallback() {
    assert_eq!(
        decode(DecodeTable::Sequential, 0, Gear::Forward),
        LinkCommand::Fallback
    );
    assert_eq!(
        decode(DecodeTable::Sequential, sequential::NEUTRAL + 1, Gear::Brake),
        LinkCommand::Fallback
    );
}

#[test]
fn table_names_parse() {
    assert_eq!(DecodeTable::from_text("bitflag"), Some(DecodeTable::Guarded));
    assert_eq!(DecodeTable::from_text("sequence"), Some(DecodeTable::Sequential));
    assert_eq!(DecodeTable::from_text("morse"), None);
}

// ============================================================================
// Scheduler Edge Cases
// ============================================================================

#[test]
fn clock_driven_round_with_dead_link() {
    let config = Config::default()
        .with_link(LinkConfig::default().with_port("COM99"))
        .with_vehicle(VehicleConfig::default().with_input_mode(InputMode::Link))
        .with_session(SessionConfig::default().with_round_seconds(1.0))
        .with_sim(SimConfig::default().with_physics_step_ms(10));

    let opener = MockOpener::new();
    opener.set_available(false);
    let mut sim = Simulation::new(MockBody::new(), Some(opener), &config);
    let mut clock = MockClock::new();

    let mut outcome = None;
    for frame in 0..100 {
        if frame % 10 == 0 {
            sim.on_item_collected();
        }
        if let Some(o) = sim.advance(clock.now_ms()).unwrap().outcome {
            outcome = Some(o);
            break;
        }
        clock.advance(16);
    }

    assert_eq!(outcome, Some(RoundOutcome::Finished { collected: 7 }));
    let link = sim.link().unwrap();
    assert!(link.last_error().unwrap().contains("COM99"));
    assert_eq!(link.stats().opens, 0);
}

#[test]
fn huge_clock_jump_is_capped() {
    let mut sim: Simulation<MockBody, MockOpener> =
        Simulation::new(MockBody::new(), None, &Config::default());
    sim.vehicle_mut().request_gear(Gear::Forward);

    sim.advance(0).unwrap();
    let report = sim.advance(u64::MAX / 2).unwrap();
    assert_eq!(report.physics_steps, 5);
    // five 20ms steps at 5 units/s
    assert!((sim.vehicle().current_speed() - 0.5).abs() < 1e-4);
}
