use super::*;

#[test]
fn bar_catches_up_smoothly() {
    let mut bar = ProgressBar::new(0.0, SpringConfig::progress_indicator()).unwrap();
    bar.update(1.0);
    bar.tick(1.0 / 60.0);
    let early = bar.scale_x();
    assert!(early > 0.0 && early < 0.5, "early={early}");

    for _ in 0..600 {
        bar.tick(1.0 / 60.0);
    }
    assert!(bar.is_settled());
    assert_eq!(bar.scale_x(), 1.0);
}

#[test]
fn scale_is_clamped() {
    let mut bar = ProgressBar::new(0.0, SpringConfig::tilt()).unwrap();
    bar.update(1.0);
    let mut max = 0.0f64;
    for _ in 0..120 {
        bar.tick(1.0 / 60.0);
        max = max.max(bar.scale_x());
    }
    assert!(max <= 1.0);
}
