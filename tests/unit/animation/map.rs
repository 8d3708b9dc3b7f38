use super::*;

#[test]
fn clamps_outside_domain() {
    let d = Domain::new(0.2, 0.6);
    assert_eq!(map_range(-5.0, d, &10.0, &20.0), 10.0);
    assert_eq!(map_range(0.2, d, &10.0, &20.0), 10.0);
    assert_eq!(map_range(0.6, d, &10.0, &20.0), 20.0);
    assert_eq!(map_range(7.0, d, &10.0, &20.0), 20.0);
}

#[test]
fn midpoint_is_exact() {
    let d = Domain::new(0.25, 0.75);
    assert_eq!(map_range(0.5, d, &0.0, &1.0), 0.5);
    assert_eq!(map_range(0.5, d, &-7.5, &7.5), 0.0);
}

#[test]
fn non_decreasing_for_increasing_output() {
    let d = Domain::new(0.1, 0.9);
    let mut prev = f64::NEG_INFINITY;
    for i in 0..=200 {
        let v = -0.5 + (i as f64) * 0.01;
        let out = map_range(v, d, &3.0, &8.0);
        assert!(out >= prev, "v={v} out={out} prev={prev}");
        prev = out;
    }
}

#[test]
fn reversed_output_interpolates_downward() {
    let d = Domain::unit();
    assert_eq!(map_range(0.0, d, &100.0, &0.0), 100.0);
    assert_eq!(map_range(0.25, d, &100.0, &0.0), 75.0);
    assert_eq!(map_range(1.0, d, &100.0, &0.0), 0.0);
}

#[test]
fn zero_width_domain_is_a_step() {
    let d = Domain::new(0.5, 0.5);
    assert_eq!(map_range(0.49, d, &0.0, &1.0), 0.0);
    assert_eq!(map_range(0.5, d, &0.0, &1.0), 1.0);
}

#[test]
fn nan_maps_to_first_output() {
    assert_eq!(map_range(f64::NAN, Domain::unit(), &2.0, &4.0), 2.0);
}

#[test]
fn compound_outputs_map_component_wise() {
    let (opacity, y, scale) = map_range(
        0.5,
        Domain::unit(),
        &(0.0_f64, 100.0_f64, 0.8_f64),
        &(1.0_f64, 0.0_f64, 1.0_f64),
    );
    assert_eq!(opacity, 0.5);
    assert_eq!(y, 50.0);
    assert!((scale - 0.9).abs() < 1e-12);
}

#[test]
fn multi_stop_gradient() {
    let stops = [0.0, 10.0, 0.0];
    assert_eq!(map_stops(0.0, Domain::unit(), &stops), Some(0.0));
    assert_eq!(map_stops(0.25, Domain::unit(), &stops), Some(5.0));
    assert_eq!(map_stops(0.5, Domain::unit(), &stops), Some(10.0));
    assert_eq!(map_stops(0.75, Domain::unit(), &stops), Some(5.0));
    assert_eq!(map_stops(1.0, Domain::unit(), &stops), Some(0.0));
    assert_eq!(map_stops::<f64>(0.5, Domain::unit(), &[]), None);
    assert_eq!(map_stops(0.9, Domain::unit(), &[3.0]), Some(3.0));
}

#[test]
fn mapping_validates_and_samples() {
    assert!(RangeMapping::<f64>::new(Domain::unit(), vec![]).is_err());
    assert!(RangeMapping::pair(Domain::new(f64::NAN, 1.0), 0.0, 1.0).is_err());

    let m = RangeMapping::pair(Domain::new(-0.5, 0.5), 7.5, -7.5).unwrap();
    assert_eq!(m.sample(-0.5), 7.5);
    assert_eq!(m.sample(0.0), 0.0);
    assert_eq!(m.sample(0.5), -7.5);
}

#[test]
fn colors_lerp_per_channel() {
    let a = Rgba8::rgba(0, 0, 0, 0);
    let b = Rgba8::rgba(200, 100, 50, 255);
    assert_eq!(
        map_range(0.5, Domain::unit(), &a, &b),
        Rgba8::rgba(100, 50, 25, 128)
    );
}
