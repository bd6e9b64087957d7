use proptest::prelude::*;
use tv_controls::*;

fn controller() -> VoltageController {
    VoltageController::new(ControllerConfig::default()).unwrap()
}

fn unthrottled(temperature: i32) -> Sample {
    Sample::new(temperature, 3890)
}

#[test]
fn scenario_a_linear_target() {
    let ctl = controller();
    let sample = unthrottled(85);
    assert_eq!(ctl.clock_pct(sample.clock_mhz), 100);
    assert_eq!(ctl.target_for(&sample), 780);
}

#[test]
fn scenario_b_rise_from_off() {
    let ctl = controller();
    let sample = unthrottled(85);
    let mut state = ControllerState::default();

    let mut voltages = Vec::new();
    for _ in 0..6 {
        let (next, target) = ctl.step(&sample, &state);
        assert_eq!(target, 780);
        voltages.push(next.voltage);
        state = next;
    }
    assert_eq!(voltages, vec![550, 600, 650, 700, 750, 800]);

    // Above target now: the hold armed on the last rise must expire first.
    assert_eq!(state.hold_countdown, ctl.hold_for(780));
    for expected_hold in (1..ctl.hold_for(780)).rev() {
        let (next, _) = ctl.step(&sample, &state);
        assert_eq!(next.voltage, 800);
        assert_eq!(next.hold_countdown, expected_hold);
        state = next;
    }
    let (next, _) = ctl.step(&sample, &state);
    assert_eq!(next.voltage, 750);
}

#[test]
fn scenario_c_hold_from_max() {
    let ctl = controller();
    let hot = unthrottled(110);
    let cold = unthrottled(30);

    let mut state = ControllerState {
        voltage: 1200,
        hold_countdown: 0,
    };
    let (at_max, target) = ctl.step(&hot, &state);
    assert_eq!(target, 1200);
    assert_eq!(at_max.voltage, 1200);
    assert_eq!(at_max.hold_countdown, 20);
    state = at_max;

    let mut cycles_at_max = 0;
    loop {
        let (next, target) = ctl.step(&cold, &state);
        assert_eq!(target, 0);
        if next.voltage < state.voltage {
            assert_eq!(next.voltage, 1150);
            break;
        }
        cycles_at_max += 1;
        state = next;
    }
    assert_eq!(cycles_at_max, 19);
}

#[test]
fn cooling_walks_down_to_off() {
    let ctl = controller();
    let cold = unthrottled(30);
    let mut state = ControllerState {
        voltage: 700,
        hold_countdown: 0,
    };
    let mut seen = Vec::new();
    for _ in 0..10 {
        let (next, _) = ctl.step(&cold, &state);
        seen.push(next.voltage);
        state = next;
    }
    // hold_for(0) is 0, so every cycle steps down.
    assert_eq!(seen, vec![650, 600, 550, 500, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn throttle_still_rate_limited() {
    let ctl = controller();
    let throttled = Sample::new(20, 0);
    let (next, target) = ctl.step(&throttled, &ControllerState::default());
    assert_eq!(target, 1200);
    assert_eq!(next.voltage, 550);
}

fn valid_state() -> impl Strategy<Value = ControllerState> {
    let voltage = prop_oneof![Just(0), 500i32..=1200];
    (voltage, 0u32..40).prop_map(|(voltage, hold_countdown)| ControllerState {
        voltage,
        hold_countdown,
    })
}

fn any_sample() -> impl Strategy<Value = Sample> {
    (-20i32..140, 0i32..5000).prop_map(|(t, c)| Sample::new(t, c))
}

proptest! {
    #[test]
    fn range_invariant_holds(
        start in valid_state(),
        samples in prop::collection::vec(any_sample(), 1..60),
    ) {
        let ctl = controller();
        let mut state = start;
        for sample in &samples {
            let (next, _) = ctl.step(sample, &state);
            prop_assert!(next.voltage == 0 || (500..=1200).contains(&next.voltage));
            state = next;
        }
    }

    #[test]
    fn step_is_bounded_away_from_off(
        start in valid_state(),
        samples in prop::collection::vec(any_sample(), 1..60),
    ) {
        let ctl = controller();
        let mut state = start;
        for sample in &samples {
            let (next, _) = ctl.step(sample, &state);
            if state.voltage != 0 && next.voltage != 0 {
                prop_assert!((next.voltage - state.voltage).abs() <= 50);
            }
            if state.voltage == 0 && next.voltage != 0 {
                prop_assert_eq!(next.voltage, 550);
            }
            state = next;
        }
    }

    #[test]
    fn throttle_overrides_temperature(temperature in -50i32..200, clock in 0i32..39) {
        let ctl = controller();
        prop_assert_eq!(ctl.target_for(&Sample::new(temperature, clock)), 1200);
    }

    #[test]
    fn throttle_threshold_is_inclusive(temperature in -50i32..200, pct in 0i32..=100) {
        let ctl = VoltageController::new(ControllerConfig {
            throttling_factor_pct: 50,
            clocks_max_mhz: 100,
            ..ControllerConfig::default()
        })
        .unwrap();
        let target = ctl.target_for(&Sample::new(temperature, pct));
        if pct <= 50 {
            prop_assert_eq!(target, 1200);
        } else if temperature < 75 {
            prop_assert_eq!(target, 0);
        }
    }

    #[test]
    fn hold_blocks_decrease(voltage in 550i32..=1200, hold in 2u32..30, temperature in -20i32..75) {
        let ctl = controller();
        let cold = unthrottled(temperature);
        let mut state = ControllerState { voltage, hold_countdown: hold };
        for i in 1..hold {
            let (next, _) = ctl.step(&cold, &state);
            prop_assert_eq!(next.voltage, voltage);
            prop_assert_eq!(next.hold_countdown, hold - i);
            state = next;
        }
        let (next, _) = ctl.step(&cold, &state);
        prop_assert!(next.voltage < voltage);
    }

    #[test]
    fn at_rest_rearms_hold(temperature in 75i32..=100, hold in 0u32..30, cycles in 1usize..10) {
        let ctl = controller();
        let sample = unthrottled(temperature);
        let target = ctl.target_for(&sample);
        let mut state = ControllerState { voltage: target, hold_countdown: hold };
        for _ in 0..cycles {
            let (next, t) = ctl.step(&sample, &state);
            prop_assert_eq!(t, target);
            prop_assert_eq!(next.voltage, target);
            prop_assert_eq!(next.hold_countdown, ctl.hold_for(target));
            state = next;
        }
    }
}
