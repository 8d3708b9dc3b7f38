use super::*;

#[test]
fn frame_paint_keeps_dimensions() {
    let frame = DecodedFrame::solid(4, 3, [1, 2, 3, 255]).unwrap();
    let paint = FramePaint::new(&frame).unwrap();
    assert_eq!((paint.width, paint.height), (4.0, 3.0));
    let vello_cpu::ImageSource::Pixmap(p) = &paint.image.image else {
        panic!("expected pixmap source");
    };
    assert_eq!((p.width(), p.height()), (4, 3));
}

#[test]
fn oversized_frame_is_a_render_error() {
    let frame = DecodedFrame::solid(70_000, 1, [0, 0, 0, 255]).unwrap();
    assert!(matches!(
        FramePaint::new(&frame),
        Err(ScrollFxError::Render(_))
    ));
}

#[test]
fn circle_converts_to_closed_path() {
    let path = shape_to_cpu(&kurbo::Circle::new((10.0, 10.0), 5.0));
    let els = path.elements();
    assert!(matches!(els.first(), Some(vello_cpu::kurbo::PathEl::MoveTo(_))));
    assert!(matches!(els.last(), Some(vello_cpu::kurbo::PathEl::ClosePath)));
}

#[test]
fn affine_coefficients_survive() {
    let a = Affine::translate((3.0, -2.0)) * Affine::scale(2.0);
    assert_eq!(affine_to_cpu(a).as_coeffs(), a.as_coeffs());
}
