use super::*;

fn page() -> Page {
    Page::new(Viewport::new(1000.0, 800.0).unwrap(), 3000.0).unwrap()
}

#[test]
fn scroll_is_clamped_to_scrollable_range() {
    let mut p = page();
    assert_eq!(p.max_scroll(), 2200.0);
    p.set_scroll_y(-10.0);
    assert_eq!(p.scroll_y(), 0.0);
    p.set_scroll_y(99_999.0);
    assert_eq!(p.scroll_y(), 2200.0);
    p.set_scroll_y(f64::NAN);
    assert_eq!(p.scroll_y(), 2200.0);
}

#[test]
fn document_progress_spans_top_to_bottom() {
    let mut p = page();
    assert_eq!(p.document_progress(), 0.0);
    p.set_scroll_y(1100.0);
    assert_eq!(p.document_progress(), 0.5);
    p.set_scroll_y(2200.0);
    assert_eq!(p.document_progress(), 1.0);
}

#[test]
fn short_document_reports_zero_progress() {
    let p = Page::new(Viewport::new(1000.0, 800.0).unwrap(), 500.0).unwrap();
    assert_eq!(p.max_scroll(), 0.0);
    assert_eq!(p.document_progress(), 0.0);
}

#[test]
fn resizing_reclamps_scroll() {
    let mut p = page();
    p.set_scroll_y(2200.0);
    p.set_viewport(Viewport::new(1000.0, 1000.0).unwrap());
    assert_eq!(p.scroll_y(), 2000.0);
    p.set_document_height(1500.0).unwrap();
    assert_eq!(p.scroll_y(), 500.0);
    assert!(p.set_document_height(-1.0).is_err());
}

#[test]
fn elements_register_and_remove() {
    let mut p = page();
    let rect = ElementRect::new(1600.0, 400.0).unwrap();
    p.insert_element("hero", rect);
    assert_eq!(p.element("hero"), Some(rect));
    assert_eq!(p.remove_element("hero"), Some(rect));
    assert_eq!(p.element("hero"), None);
    assert!(ElementRect::new(0.0, -1.0).is_err());
}
