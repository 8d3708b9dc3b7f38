use super::*;

#[test]
fn drifts_by_speed_fraction() {
    let p = Parallax::new(ParallaxConfig::default()).unwrap();
    assert_eq!(p.offset_y_pct(0.0), 0.0);
    assert_eq!(p.offset_y_pct(0.5), 25.0);
    assert_eq!(p.offset_y_pct(1.0), 50.0);
    assert_eq!(p.offset_y_pct(3.0), 50.0);
}

#[test]
fn negative_speed_moves_up() {
    let p = Parallax::new(ParallaxConfig {
        speed: -0.2,
        ..ParallaxConfig::default()
    })
    .unwrap();
    assert_eq!(p.offset_y_pct(1.0), -20.0);
}

#[test]
fn non_finite_speed_is_rejected() {
    assert!(
        Parallax::new(ParallaxConfig {
            speed: f64::NAN,
            ..ParallaxConfig::default()
        })
        .is_err()
    );
}
