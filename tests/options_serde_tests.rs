use chartcore::ChartOptions;
use chartcore::core::Easing;
use chartcore::interaction::{DistanceAxis, SelectionMode};
use chartcore::layout::AxisOptions;

#[test]
fn empty_json_yields_full_defaults() {
    let options: ChartOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options.animation.duration_ms, 1000.0);
    assert_eq!(options.animation.easing, Easing::EaseOutQuart);
    assert_eq!(options.interaction.mode, SelectionMode::Nearest);
    assert!(options.interaction.intersect);
    assert_eq!(options.interaction.axis, DistanceAxis::Xy);
    assert_eq!(options.hit_radius, 4.0);
    assert_eq!(options.tooltip.padding, 6.0);
    assert_eq!(options.tooltip.caret_size, 5.0);
    assert_eq!(options.layout_padding.left, 0.0);
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let options: ChartOptions = serde_json::from_str(
        r#"{
            "animation": { "duration_ms": 250.0 },
            "interaction": { "mode": "Index", "intersect": false }
        }"#,
    )
    .unwrap();
    assert_eq!(options.animation.duration_ms, 250.0);
    assert_eq!(options.animation.easing, Easing::EaseOutQuart);
    assert_eq!(options.interaction.mode, SelectionMode::Index);
    assert!(!options.interaction.intersect);
    assert_eq!(options.hit_radius, 4.0);
}

#[test]
fn chart_options_round_trip_preserves_everything() {
    let mut options = ChartOptions::default();
    options.animation.duration_ms = 400.0;
    options.animation.easing = Easing::EaseOutBounce;
    options.interaction.mode = SelectionMode::Dataset;
    options.interaction.axis = DistanceAxis::X;
    options.hit_radius = 9.0;
    options.tooltip.padding = 10.0;
    options.layout_padding.top = 12.0;

    let json = serde_json::to_string(&options).unwrap();
    let back: ChartOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn axis_options_defaults_match_documented_values() {
    let options: AxisOptions = serde_json::from_str("{}").unwrap();
    assert!(options.display);
    assert_eq!(options.min_rotation_deg, 0.0);
    assert_eq!(options.max_rotation_deg, 50.0);
    assert_eq!(options.tick_mark_length_px, 10.0);
    assert_eq!(options.max_ticks, 11);
    assert_eq!(options.tick_font.size_px, 12.0);
    assert_eq!(options.title, None);
}

#[test]
fn axis_options_round_trip() {
    let mut options = AxisOptions::default();
    options.max_rotation_deg = 90.0;
    options.title = Some("Revenue".to_owned());

    let json = serde_json::to_string(&options).unwrap();
    let back: AxisOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}
