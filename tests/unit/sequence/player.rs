use super::*;
use crate::foundation::error::ScrollFxError;
use crate::sequence::frames::DecodedFrame;
use crate::sequence::loader::MemoryLoader;

const BG: [u8; 4] = [0x0a, 0x0f, 0x25, 0xff];
const BLUE: [u8; 4] = [0x00, 0x66, 0xff, 0xff];
const RED: [u8; 4] = [0xff, 0x00, 0x00, 0xff];

fn vp() -> Viewport {
    Viewport::new(200.0, 100.0).unwrap()
}

fn loader_with(total: u32, missing: &[u32]) -> MemoryLoader {
    let mut loader = MemoryLoader::new();
    for i in (1..=total).filter(|i| !missing.contains(i)) {
        loader.insert_decoded(i, DecodedFrame::solid(16, 9, RED).unwrap());
    }
    loader
}

fn player(total: u32, missing: &[u32]) -> FramePlayer {
    let mut p = FramePlayer::create(
        total,
        Box::new(loader_with(total, missing)),
        PlayerOpts::default(),
    )
    .unwrap();
    p.attach_surface(Surface::new(vp()).unwrap());
    p
}

fn center(p: &FramePlayer) -> [u8; 4] {
    p.surface().unwrap().pixel(100, 50).unwrap()
}

fn corner(p: &FramePlayer) -> [u8; 4] {
    p.surface().unwrap().pixel(1, 1).unwrap()
}

#[test]
fn progress_maps_to_rounded_index() {
    assert_eq!(frame_index_for(0.0, 120), 1);
    assert_eq!(frame_index_for(1.0, 120), 120);
    assert_eq!(frame_index_for(0.5, 120), 61);
    assert_eq!(frame_index_for(0.5, 4), 3);
    assert_eq!(frame_index_for(-2.0, 10), 1);
    assert_eq!(frame_index_for(7.0, 10), 10);
    assert_eq!(frame_index_for(f64::NAN, 10), 1);
    assert_eq!(frame_index_for(0.7, 1), 1);
}

#[test]
fn zero_frames_is_rejected() {
    let err = FramePlayer::create(0, Box::new(MemoryLoader::new()), PlayerOpts::default())
        .unwrap_err();
    assert!(matches!(err, ScrollFxError::Validation(_)));
}

#[test]
fn default_caption_names_frame_files() {
    assert_eq!(
        PlayerOpts::default().caption_text(),
        "Replace with sequence/NNNN.webp"
    );
}

#[test]
fn without_surface_only_index_is_tracked() {
    let mut p = FramePlayer::create(10, Box::new(MemoryLoader::new()), PlayerOpts::default())
        .unwrap();
    assert!(!p.set_progress(1.0, vp()).unwrap());
    assert_eq!(p.current_index(), 10);
    assert_eq!(p.last_drawn(), None);
}

#[test]
fn placeholder_until_ready_then_frame() {
    let mut p = player(5, &[]);
    assert!(p.set_progress(0.0, vp()).unwrap());
    assert_eq!(
        p.last_drawn(),
        Some(DrawnFrame {
            index: 1,
            kind: DrawKind::Placeholder
        })
    );
    assert_eq!(center(&p), BLUE);
    assert_eq!(corner(&p), BG);

    assert!(p.pump(vp()).unwrap());
    assert!(p.is_ready());
    assert_eq!(p.last_drawn().map(|d| d.kind), Some(DrawKind::Frame));
    assert_eq!(center(&p), RED);
    assert_eq!(corner(&p), RED);

    // readiness is only reported once
    assert!(!p.pump(vp()).unwrap());
}

#[test]
fn redraws_only_on_index_change() {
    let mut p = player(5, &[]);
    p.pump(vp()).unwrap();
    assert!(p.set_progress(0.5, vp()).unwrap());
    assert_eq!(p.current_index(), 3);
    assert!(!p.set_progress(0.55, vp()).unwrap());
    assert!(p.set_progress(1.0, vp()).unwrap());
    assert_eq!(p.last_drawn().map(|d| d.index), Some(5));
}

#[test]
fn failed_frame_draws_placeholder() {
    let mut p = player(5, &[3]);
    p.pump(vp()).unwrap();
    assert_eq!(p.sequence().failed(), 1);

    p.set_progress(0.5, vp()).unwrap();
    assert_eq!(
        p.last_drawn(),
        Some(DrawnFrame {
            index: 3,
            kind: DrawKind::Placeholder
        })
    );
    assert_eq!(center(&p), BLUE);

    p.set_progress(0.75, vp()).unwrap();
    assert_eq!(p.last_drawn().map(|d| d.kind), Some(DrawKind::Frame));
}

#[test]
fn resize_forces_redraw_at_new_size() {
    let mut p = player(3, &[]);
    p.pump(vp()).unwrap();
    let bigger = Viewport::new(320.0, 240.0).unwrap();
    assert!(p.on_resize(bigger).unwrap());
    let s = p.surface().unwrap();
    assert_eq!((s.width(), s.height()), (320, 240));
    assert_eq!(s.pixel(319, 239), Some(RED));
}

#[test]
fn batched_loads_become_ready_across_pumps() {
    let loader = loader_with(4, &[]).with_batch(3);
    let mut p = FramePlayer::create(4, Box::new(loader), PlayerOpts::default()).unwrap();
    p.attach_surface(Surface::new(vp()).unwrap());
    assert!(!p.pump(vp()).unwrap());
    assert_eq!(p.sequence().completed(), 3);
    assert!(p.pump(vp()).unwrap());
    assert!(p.is_ready());
}

#[test]
fn wait_until_ready_drains_the_loader() {
    let loader = loader_with(6, &[2]).with_batch(1);
    let mut p = FramePlayer::create(6, Box::new(loader), PlayerOpts::default()).unwrap();
    p.attach_surface(Surface::new(vp()).unwrap());
    assert!(p.wait_until_ready(Duration::from_secs(1), vp()).unwrap());
    assert_eq!(p.last_drawn().map(|d| d.kind), Some(DrawKind::Frame));
}

#[test]
fn attaching_a_surface_resets_last_drawn() {
    let mut p = player(2, &[]);
    p.set_progress(0.0, vp()).unwrap();
    let s = p.detach_surface().unwrap();
    assert_eq!(p.last_drawn(), None);
    p.attach_surface(s);
    assert!(p.set_progress(0.0, vp()).unwrap());
    assert!(p.destroy().is_some());
}

fn non_background_in_rows(p: &FramePlayer, rows: std::ops::Range<u32>) -> usize {
    let s = p.surface().unwrap();
    rows.flat_map(|y| (0..s.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| s.pixel(x, y).unwrap() != BG)
        .count()
}

#[test]
fn placeholder_labels_frame_index_and_caption_by_default() {
    let wide = Viewport::new(1280.0, 720.0).unwrap();
    let mut p = FramePlayer::create(120, Box::new(MemoryLoader::new()), PlayerOpts::default())
        .unwrap();
    p.attach_surface(Surface::new(wide).unwrap());
    assert!(p.wait_until_ready(Duration::from_secs(1), wide).unwrap());
    p.set_progress(0.0, wide).unwrap();
    assert_eq!(
        p.last_drawn(),
        Some(DrawnFrame {
            index: 1,
            kind: DrawKind::Placeholder
        })
    );

    // circle (r = 52) ends at row 412; label baseline at 460, caption baseline at 500
    assert_eq!(non_background_in_rows(&p, 414..418), 0);
    assert!(non_background_in_rows(&p, 420..470) > 0);
    assert!(non_background_in_rows(&p, 480..505) > 0);

    let s = p.surface().unwrap();
    let white_in_label = (420..470)
        .flat_map(|y| (0..s.width()).map(move |x| (x, y)))
        .any(|(x, y)| s.pixel(x, y) == Some([0xff, 0xff, 0xff, 0xff]));
    assert!(white_in_label);
}

#[test]
fn placeholder_label_is_centered_horizontally() {
    let wide = Viewport::new(1280.0, 720.0).unwrap();
    let mut p = player(3, &[1, 2, 3]);
    p.on_resize(wide).unwrap();
    let s = p.surface().unwrap();
    let columns: Vec<u32> = (0..s.width())
        .filter(|&x| (420..470).any(|y| s.pixel(x, y).unwrap() != BG))
        .collect();
    let (first, last) = (columns[0], columns[columns.len() - 1]);
    let mid = f64::from(first + last) / 2.0;
    assert!((mid - 640.0).abs() <= 8.0, "label spans {first}..={last}");
}

#[test]
fn custom_label_painter_replaces_bundled_font() {
    let mut p = player(2, &[]);
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/fonts/DejaVuSans.ttf");
    p.set_label_painter(LabelPainter::from_path(&path).unwrap());
    assert_eq!(p.last_drawn(), None);
    assert!(p.set_progress(0.0, vp()).unwrap());
}
