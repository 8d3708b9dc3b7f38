use super::*;
use crate::animation::spring::SpringConfig;
use crate::foundation::core::Rect;
use crate::scene::config::{ParallaxDef, SequenceDef, TiltCardDef, WordRevealDef};
use crate::scroll::page::ElementRect;
use crate::sequence::frames::DecodedFrame;
use crate::sequence::loader::MemoryLoader;
use crate::sequence::player::{DrawKind, PlayerOpts};

fn base_config() -> SceneConfig {
    let mut cfg = SceneConfig {
        viewport: Viewport::new(400.0, 200.0).unwrap(),
        document_height: 1200.0,
        progress_bar: Some(SpringConfig::progress_indicator()),
        ..SceneConfig::default()
    };
    cfg.elements
        .insert("about".to_string(), ElementRect::new(400.0, 200.0).unwrap());
    cfg.word_reveals.push(WordRevealDef {
        element: Some("about".to_string()),
        text: "one two three four".to_string(),
        config: Default::default(),
    });
    cfg.parallax.push(ParallaxDef {
        element: "about".to_string(),
        config: Default::default(),
    });
    cfg.tilt_cards.push(TiltCardDef {
        name: "card".to_string(),
        bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
        config: Default::default(),
    });
    cfg
}

fn with_sequence(frames: u32) -> (SceneConfig, MemoryLoader) {
    let mut cfg = base_config();
    cfg.sequence = Some(SequenceDef {
        frame_count: frames,
        player: PlayerOpts::default(),
    });
    let mut loader = MemoryLoader::new();
    for i in 1..=frames {
        loader.insert_decoded(i, DecodedFrame::solid(4, 2, [0, 255, 0, 255]).unwrap());
    }
    (cfg, loader)
}

#[test]
fn scroll_updates_every_unit() {
    let mut scene = Scene::with_loader(&base_config(), Box::new(MemoryLoader::new())).unwrap();
    let s = scene.snapshot().unwrap();
    assert_eq!(s.document_progress, 0.0);
    assert_eq!(s.word_reveals[0].progress, 0.0);

    // element spans scroll 200 (top at viewport bottom) to 600 (bottom at viewport top)
    scene.scroll_to(400.0).unwrap();
    let s = scene.snapshot().unwrap();
    assert_eq!(s.document_progress, 0.4);
    assert_eq!(s.word_reveals[0].progress, 0.5);
    let overlays: Vec<f64> = s.word_reveals[0]
        .words
        .iter()
        .map(|w| w.overlay_opacity)
        .collect();
    assert_eq!(overlays, vec![1.0, 1.0, 0.0, 0.0]);
    assert_eq!(s.parallax[0].offset_y_pct, 25.0);
}

#[test]
fn word_reveal_without_element_follows_document_progress() {
    let mut cfg = base_config();
    cfg.word_reveals[0].element = None;
    let mut scene = Scene::with_loader(&cfg, Box::new(MemoryLoader::new())).unwrap();
    let s = scene.snapshot().unwrap();
    assert_eq!(s.word_reveals[0].element, None);
    assert!(s.word_reveals[0].words.iter().all(|w| w.overlay_opacity == 0.0));

    // max scroll is 1000; progress 0.6 covers tokens 0 and 1 and 40% of token 2
    scene.scroll_to(600.0).unwrap();
    let s = scene.snapshot().unwrap();
    assert_eq!(s.word_reveals[0].progress, s.document_progress);
    let overlays: Vec<f64> = s.word_reveals[0]
        .words
        .iter()
        .map(|w| w.overlay_opacity)
        .collect();
    assert_eq!(overlays[..2], [1.0, 1.0]);
    assert!((overlays[2] - 0.4).abs() < 1e-9);
    assert_eq!(overlays[3], 0.0);

    scene.scroll_to(1000.0).unwrap();
    let s = scene.snapshot().unwrap();
    assert!(s.word_reveals[0].words.iter().all(|w| w.overlay_opacity == 1.0));
    scene.destroy().unwrap();
}

#[test]
fn progress_bar_catches_up_over_ticks() {
    let mut scene = Scene::with_loader(&base_config(), Box::new(MemoryLoader::new())).unwrap();
    scene.scroll_to(1000.0).unwrap();
    assert_eq!(scene.snapshot().unwrap().progress_bar, Some(0.0));
    for _ in 0..240 {
        scene.tick(1.0 / 60.0).unwrap();
    }
    let bar = scene.snapshot().unwrap().progress_bar.unwrap();
    assert!((bar - 1.0).abs() < 1e-3, "bar = {bar}");
    assert!((scene.snapshot().unwrap().time - 4.0).abs() < 1e-9);
}

#[test]
fn pointer_events_reach_cards() {
    let mut scene = Scene::with_loader(&base_config(), Box::new(MemoryLoader::new())).unwrap();
    scene.pointer("card", PointerEvent::Move { x: 0.0, y: 0.0 }).unwrap();
    scene.pointer("card", PointerEvent::Click).unwrap();
    for _ in 0..180 {
        scene.tick(1.0 / 60.0).unwrap();
    }
    let s = scene.snapshot().unwrap();
    let card = &s.tilt_cards["card"];
    assert!(card.frame.hovered);
    assert_eq!(card.clicks, 1);
    assert!((card.frame.rotate_x_deg - 7.5).abs() < 0.05);
    assert!((card.frame.rotate_y_deg + 7.5).abs() < 0.05);

    let err = scene.pointer("nope", PointerEvent::Enter).unwrap_err();
    assert!(matches!(err, ScrollFxError::Config(_)));
}

#[test]
fn sequence_follows_document_progress() {
    let (cfg, loader) = with_sequence(9);
    let mut scene = Scene::with_loader(&cfg, Box::new(loader)).unwrap();
    let s = scene.snapshot().unwrap().sequence.unwrap();
    assert_eq!(s.current_index, 1);
    assert_eq!(s.last_drawn.map(|d| d.kind), Some(DrawKind::Placeholder));

    assert!(scene.wait_for_frames(Duration::from_secs(1)).unwrap());
    scene.scroll_to_progress(0.5).unwrap();
    let s = scene.snapshot().unwrap().sequence.unwrap();
    assert!(s.ready);
    assert_eq!(s.current_index, 5);
    assert_eq!(s.last_drawn.map(|d| d.kind), Some(DrawKind::Frame));

    let frame = scene.frame().unwrap();
    assert_eq!((frame.width, frame.height), (400, 200));
    assert_eq!(&frame.data[..4], &[0, 255, 0, 255]);
}

#[test]
fn resize_repaints_at_new_size() {
    let (cfg, loader) = with_sequence(3);
    let mut scene = Scene::with_loader(&cfg, Box::new(loader)).unwrap();
    scene.tick(0.0).unwrap();
    scene.resize(Viewport::new(300.0, 300.0).unwrap()).unwrap();
    let frame = scene.frame().unwrap();
    assert_eq!((frame.width, frame.height), (300, 300));
}

#[test]
fn timeline_produces_a_snapshot_per_step() {
    let mut cfg = base_config();
    cfg.timeline = vec![
        TimelineStep {
            advance: 0.0,
            action: TimelineAction::Scroll { y: 600.0 },
        },
        TimelineStep {
            advance: 0.5,
            action: TimelineAction::Wait,
        },
    ];
    let mut scene = Scene::with_loader(&cfg, Box::new(MemoryLoader::new())).unwrap();
    let snaps = scene.run_timeline().unwrap();
    assert_eq!(snaps.len(), 2);
    assert_eq!(snaps[0].scroll_y, 600.0);
    assert!((snaps[1].time - 0.5).abs() < 1e-9);
    assert!(snaps[1].progress_bar.unwrap() > snaps[0].progress_bar.unwrap());
    let json = serde_json::to_string(&snaps[1]).unwrap();
    assert!(json.contains("\"rotate_x_deg\""));
}

#[test]
fn huge_timeline_advance_finishes() {
    let mut cfg = base_config();
    cfg.timeline = vec![
        TimelineStep {
            advance: 0.0,
            action: TimelineAction::Scroll { y: 1000.0 },
        },
        TimelineStep {
            advance: 1e9,
            action: TimelineAction::Wait,
        },
    ];
    let mut scene = Scene::with_loader(&cfg, Box::new(MemoryLoader::new())).unwrap();
    let snaps = scene.run_timeline().unwrap();
    assert!((snaps[1].time - 1e9).abs() < 1e-3);
    assert_eq!(snaps[1].progress_bar, Some(1.0));
}

#[test]
fn destroy_releases_all_sources() {
    let (cfg, loader) = with_sequence(2);
    let scene = Scene::with_loader(&cfg, Box::new(loader)).unwrap();
    assert!(scene.hub().document_sampler_live());
    scene.destroy().unwrap();
}
