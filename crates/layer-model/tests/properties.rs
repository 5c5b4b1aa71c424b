use proptest::option;
use proptest::prelude::*;

use reelkit_layer_model::invariants::check;
use reelkit_layer_model::{
    replace_layer_media, rotate_layer_90, update_layer, AudioProps, Bounds, ChatBubbleProps,
    ImageProps, Layer, LayerError, LayerPatch, LayerProps, Position, RedditStoryProps, Size,
    TextProps, VideoProps,
};

const LIST_TOTAL: u32 = 600;

fn arb_props() -> impl Strategy<Value = LayerProps> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(|s| LayerProps::Video(VideoProps::new(s))),
        "[a-z]{1,8}".prop_map(|s| LayerProps::Image(ImageProps::new(s))),
        "[a-z]{1,8}".prop_map(|s| LayerProps::Audio(AudioProps::new(s))),
        "[a-z]{1,8}".prop_map(|s| LayerProps::ChatBubble(ChatBubbleProps::new(s))),
        "[a-z]{1,8}".prop_map(|s| LayerProps::RedditStory(RedditStoryProps::new(s))),
        "[a-z]{1,8}".prop_map(|s| LayerProps::Text(TextProps::new(s))),
    ]
}

/// `(total, start, end)` with `0 <= start < end <= total`.
fn arb_timing() -> impl Strategy<Value = (u32, u32, u32)> {
    (1u32..2_000)
        .prop_flat_map(|total| (Just(total), 0..total))
        .prop_flat_map(|(total, start)| (Just(total), Just(start), (start + 1)..=total))
}

fn arb_layer() -> impl Strategy<Value = (Layer, Bounds)> {
    (arb_timing(), arb_props(), 0.0f64..=1.0, 0u16..360).prop_map(
        |((total, start, end), props, opacity, rotation)| {
            let mut layer = Layer::new("target", start, end, props);
            layer.opacity = opacity;
            layer.rotation = rotation;
            (layer, Bounds::new(total))
        },
    )
}

fn arb_patch() -> impl Strategy<Value = LayerPatch> {
    let shared = (
        option::of(-500i64..3_000),
        option::of(-500i64..3_000),
        option::of(-10.0f64..10.0),
        option::of(-1_000i64..1_000),
    );
    let playback = (
        option::of(-2.0f64..3.0),
        option::of(any::<bool>()),
        option::of(-1.0f64..10.0),
        option::of(-100i64..5_000),
        option::of(-100i64..5_000),
    );
    let styled = (
        option::of((-300.0f64..300.0, -300.0f64..300.0)),
        option::of((-50.0f64..300.0, -50.0f64..300.0)),
        option::of(-1.0f64..5.0),
        option::of(-100i64..200),
        option::of(-100i64..400),
    );

    (shared, playback, styled).prop_map(
        |(
            (start_frame, end_frame, opacity, rotation),
            (volume, looping, playback_rate, fade_in, fade_out),
            (position, size, avatar_scale, bubble_font_size, font_size),
        )| LayerPatch {
            start_frame,
            end_frame,
            opacity,
            rotation,
            volume,
            looping,
            playback_rate,
            fade_in,
            fade_out,
            position: position.map(|(x, y)| Position::new(x, y)),
            size: size.map(|(w, h)| Size::new(w, h)),
            avatar_scale,
            bubble_font_size,
            font_size,
            ..Default::default()
        },
    )
}

fn arb_layer_list() -> impl Strategy<Value = Vec<Layer>> {
    let entry = (0u32..LIST_TOTAL)
        .prop_flat_map(|start| (Just(start), (start + 1)..=LIST_TOTAL))
        .prop_flat_map(|(start, end)| (Just(start), Just(end), arb_props()));
    prop::collection::vec(entry, 1..6).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (start, end, props))| Layer::new(format!("layer-{i}"), start, end, props))
            .collect()
    })
}

fn without_media(layer: &Layer) -> Layer {
    let mut out = layer.clone();
    match &mut out.props {
        LayerProps::Video(p) => p.src.clear(),
        LayerProps::Image(p) => p.src.clear(),
        LayerProps::Audio(p) => p.src.clear(),
        LayerProps::ChatBubble(p) => p.avatar_url = None,
        LayerProps::RedditStory(_) | LayerProps::Text(_) => {}
    }
    out
}

proptest! {
    #[test]
    fn updates_preserve_invariants((layer, bounds) in arb_layer(), patch in arb_patch()) {
        let kind = layer.kind();
        match update_layer(&[layer], "target", &patch, bounds) {
            Ok(list) => {
                let updated = &list[0];
                prop_assert!(updated.start_frame < updated.end_frame);
                prop_assert!(updated.end_frame <= bounds.total_frames);
                let issues = check(updated, bounds);
                prop_assert!(issues.is_empty(), "issues: {:?}", issues);
            }
            Err(LayerError::InvalidFieldForKind { .. }) => {
                prop_assert!(patch.first_illegal_field(kind).is_some());
            }
            Err(LayerError::InvalidTiming { .. }) => {
                let inverted = matches!(
                    (patch.start_frame, patch.end_frame),
                    (Some(start), Some(end)) if start >= end
                );
                prop_assert!(inverted);
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    #[test]
    fn clamping_is_idempotent((layer, bounds) in arb_layer(), patch in arb_patch()) {
        if let Ok(once) = update_layer(&[layer], "target", &patch, bounds) {
            let twice = update_layer(&once, "target", &patch, bounds).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn replacing_media_changes_only_the_reference(
        (layer, _bounds) in arb_layer(),
        url in "https://cdn\\.example/[a-z0-9]{1,12}\\.(mp4|png|mp3)",
    ) {
        match replace_layer_media(&layer, &url) {
            Ok(replaced) => {
                prop_assert_eq!(replaced.media_ref(), Some(url.as_str()));
                prop_assert_eq!(without_media(&replaced), without_media(&layer));
            }
            Err(err) => {
                prop_assert!(layer.media_ref().is_none());
                let is_kind_error = matches!(err, LayerError::InvalidFieldForKind { .. });
                prop_assert!(is_kind_error);
            }
        }
    }

    #[test]
    fn updates_never_reorder(
        layers in arb_layer_list(),
        pick in any::<prop::sample::Index>(),
        patch in arb_patch(),
    ) {
        let target = layers[pick.index(layers.len())].id.clone();
        if let Ok(updated) = update_layer(&layers, &target, &patch, Bounds::new(LIST_TOTAL)) {
            prop_assert_eq!(updated.len(), layers.len());
            for (before, after) in layers.iter().zip(&updated) {
                prop_assert_eq!(&before.id, &after.id);
                if before.id != target {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn four_quarter_turns_restore_rotation((layer, bounds) in arb_layer()) {
        let original = layer.rotation;
        let mut list = vec![layer];
        for _ in 0..4 {
            list = rotate_layer_90(&list, "target", bounds).unwrap();
        }
        prop_assert_eq!(list[0].rotation, original);
    }
}
