use super::*;

fn hub() -> ScrollHub {
    let mut page = Page::new(Viewport::new(1000.0, 800.0).unwrap(), 3000.0).unwrap();
    page.insert_element("cards", ElementRect::new(1600.0, 400.0).unwrap());
    ScrollHub::new(page)
}

fn reveal_offsets() -> ScrollOffsets {
    ScrollOffsets::new(OffsetEdge::new(0.0, 0.9), OffsetEdge::new(0.0, 0.3))
}

#[test]
fn missing_element_is_a_config_fault() {
    let mut h = hub();
    let err = h
        .attach(
            ProgressTarget::Element("nope".to_string()),
            ScrollOffsets::default(),
        )
        .unwrap_err();
    assert!(matches!(err, ScrollFxError::Config(_)));
    assert_eq!(h.source_count(), 0);
}

#[test]
fn element_progress_follows_trigger_lines() {
    let mut h = hub();
    let handle = h
        .attach(ProgressTarget::Element("cards".to_string()), reveal_offsets())
        .unwrap();
    // start: 1600 - 0.9 * 800 = 880, end: 1600 - 0.3 * 800 = 1360
    h.on_scroll(0.0);
    assert_eq!(h.progress(handle).unwrap(), 0.0);
    h.on_scroll(880.0);
    assert_eq!(h.progress(handle).unwrap(), 0.0);
    h.on_scroll(1120.0);
    assert_eq!(h.progress(handle).unwrap(), 0.5);
    h.on_scroll(1360.0);
    assert_eq!(h.progress(handle).unwrap(), 1.0);
    h.on_scroll(2000.0);
    assert_eq!(h.progress(handle).unwrap(), 1.0);
    // scrolling back reverses progress
    h.on_scroll(1000.0);
    assert_eq!(h.progress(handle).unwrap(), 0.25);
}

#[test]
fn default_offsets_track_the_visible_span() {
    let mut h = hub();
    let handle = h
        .attach(
            ProgressTarget::Element("cards".to_string()),
            ScrollOffsets::default(),
        )
        .unwrap();
    // start: 1600 - 800 = 800, end: 2000 - 0 = 2000
    h.on_scroll(1400.0);
    assert_eq!(h.progress(handle).unwrap(), 0.5);
}

#[test]
fn resize_recomputes() {
    let mut h = hub();
    let handle = h
        .attach(ProgressTarget::Element("cards".to_string()), reveal_offsets())
        .unwrap();
    h.on_scroll(1120.0);
    assert_eq!(h.progress(handle).unwrap(), 0.5);
    // start: 1600 - 900 = 700, end: 1600 - 300 = 1300
    h.on_resize(Viewport::new(1000.0, 1000.0).unwrap());
    assert_eq!(h.progress(handle).unwrap(), 0.7);
}

#[test]
fn coinciding_edges_step() {
    let mut h = hub();
    let handle = h
        .attach(
            ProgressTarget::Element("cards".to_string()),
            ScrollOffsets::new(OffsetEdge::START_START, OffsetEdge::START_START),
        )
        .unwrap();
    h.on_scroll(1599.0);
    assert_eq!(h.progress(handle).unwrap(), 0.0);
    h.on_scroll(1600.0);
    assert_eq!(h.progress(handle).unwrap(), 1.0);
}

#[test]
fn document_sampler_is_shared_and_torn_down_on_last_detach() {
    let mut h = hub();
    assert!(!h.document_sampler_live());
    let a = h
        .attach(ProgressTarget::WholeDocument, ScrollOffsets::default())
        .unwrap();
    let b = h
        .attach(ProgressTarget::WholeDocument, ScrollOffsets::default())
        .unwrap();
    assert!(h.document_sampler_live());

    h.on_scroll(1100.0);
    assert_eq!(h.progress(a).unwrap(), 0.5);
    assert_eq!(h.progress(b).unwrap(), 0.5);

    h.detach(a).unwrap();
    assert!(h.document_sampler_live());
    h.detach(b).unwrap();
    assert!(!h.document_sampler_live());
    assert_eq!(h.source_count(), 0);
}

#[test]
fn stale_handles_are_rejected() {
    let mut h = hub();
    let a = h
        .attach(ProgressTarget::WholeDocument, ScrollOffsets::default())
        .unwrap();
    h.detach(a).unwrap();
    assert!(h.detach(a).is_err());
    assert!(h.progress(a).is_err());

    // slot reuse must not revive the old handle
    let b = h
        .attach(ProgressTarget::WholeDocument, ScrollOffsets::default())
        .unwrap();
    assert_ne!(a, b);
    assert!(h.progress(a).is_err());
    assert!(h.progress(b).is_ok());
}

#[test]
fn removed_element_keeps_last_value() {
    let mut h = hub();
    let handle = h
        .attach(ProgressTarget::Element("cards".to_string()), reveal_offsets())
        .unwrap();
    h.on_scroll(1120.0);
    h.remove_element("cards");
    h.on_scroll(2000.0);
    assert_eq!(h.progress(handle).unwrap(), 0.5);
}

#[test]
fn non_finite_offsets_are_rejected() {
    let mut h = hub();
    let err = h
        .attach(
            ProgressTarget::Element("cards".to_string()),
            ScrollOffsets::new(OffsetEdge::new(f64::NAN, 0.0), OffsetEdge::END_START),
        )
        .unwrap_err();
    assert!(matches!(err, ScrollFxError::Validation(_)));
}
