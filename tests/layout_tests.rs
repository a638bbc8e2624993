//! Layout tests — small scores built from JSON, checked through the draw
//! calls and the public layout state.

use pretty_assertions::assert_eq;
use scorelayout::renderer::{tuplet_label, BarRenderer};
use scorelayout::{
    render_score_to_svg, BarId, DrawOp, LayoutError, MusicFontSymbol, RecordingCanvas, RenderSettings,
    Score, ScoreLayout, StaveProfile,
};
use serde_json::{json, Value};

fn score_from(value: Value) -> Score {
    serde_json::from_value(value).expect("fixture should match the model")
}

/// One piano track with one bar per entry of `bars`.
fn piano(bars: Vec<Value>) -> Score {
    let master_bars: Vec<Value> = bars.iter().map(|_| json!({})).collect();
    let bars: Vec<Value> = bars
        .into_iter()
        .map(|beats| json!({ "voices": [{ "beats": beats }] }))
        .collect();
    score_from(json!({
        "masterBars": master_bars,
        "tracks": [{ "staves": [{ "bars": bars }] }]
    }))
}

fn beat(duration: &str, pitches: &[i32]) -> Value {
    let notes: Vec<Value> = pitches.iter().map(|p| json!({ "pitch": p })).collect();
    json!({ "duration": duration, "notes": notes })
}

fn triplet(duration: &str, pitch: i32) -> Value {
    json!({
        "duration": duration,
        "tupletNumerator": 3,
        "tupletDenominator": 2,
        "notes": [{ "pitch": pitch }]
    })
}

fn first_bar(index: usize) -> BarId {
    BarId {
        track: 0,
        staff: 0,
        index,
    }
}

fn paint(layout: &mut ScoreLayout<'_>) -> RecordingCanvas {
    let mut canvas = RecordingCanvas::new();
    layout.paint(&mut canvas);
    canvas
}

/// Stems as (x, root y, tip y).
fn stems(canvas: &RecordingCanvas) -> Vec<(f64, f64, f64)> {
    canvas
        .stroked_paths()
        .into_iter()
        .filter(|p| p.len() == 2 && (p[0].0 - p[1].0).abs() < 1e-9)
        .map(|p| (p[0].0, p[0].1, p[1].1))
        .collect()
}

fn renderer<'l, 'a>(layout: &'l ScoreLayout<'a>, id: BarId) -> &'l BarRenderer<'a> {
    layout
        .renderer_for_bar("score", id)
        .expect("bar should have a score renderer")
}

#[test]
fn four_quarters_have_no_beam_groups() {
    let score = piano(vec![json!([
        beat("quarter", &[67]),
        beat("quarter", &[69]),
        beat("quarter", &[71]),
        beat("quarter", &[72]),
    ])]);
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();

    assert_eq!(renderer(&layout, first_bar(0)).base.helpers.beam_groups().count(), 0);
    let canvas = paint(&mut layout);
    assert_eq!(stems(&canvas).len(), 4);
    assert!(canvas.filled_paths().is_empty(), "no beams expected");
}

#[test]
fn two_eighths_and_a_quarter() {
    let score = piano(vec![json!([
        beat("eighth", &[67]),
        beat("eighth", &[69]),
        beat("quarter", &[71]),
        beat("half", &[72]),
    ])]);
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();

    let helpers = &renderer(&layout, first_bar(0)).base.helpers;
    let groups: Vec<usize> = helpers.beam_groups().map(|h| h.beats.len()).collect();
    assert_eq!(groups, vec![2]);
    assert_eq!(helpers.helper_for_beat(0, 2).map(|h| h.beats.len()), Some(1));

    let canvas = paint(&mut layout);
    assert_eq!(stems(&canvas).len(), 4);
    assert_eq!(canvas.filled_paths().len(), 1, "one beam bar");
    assert_eq!(canvas.count_symbol(MusicFontSymbol::Flag8thUp), 0);
}

#[test]
fn stems_end_on_the_beam_line() {
    let score = piano(vec![json!([
        beat("sixteenth", &[60]),
        beat("sixteenth", &[64]),
        beat("sixteenth", &[67]),
        beat("sixteenth", &[72]),
        beat("sixteenth", &[84]),
        beat("sixteenth", &[79]),
        beat("sixteenth", &[77]),
        beat("sixteenth", &[76]),
        beat("half", &[72]),
    ])]);
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();
    assert_eq!(renderer(&layout, first_bar(0)).base.helpers.beam_groups().count(), 2);

    let canvas = paint(&mut layout);
    let stems = stems(&canvas);
    assert_eq!(stems.len(), 9);
    for group in [&stems[0..4], &stems[4..8]] {
        let (x0, _, y0) = group[0];
        let (xn, _, yn) = group[group.len() - 1];
        for &(x, _, y) in group {
            let expected = y0 + (yn - y0) * (x - x0) / (xn - x0);
            assert!((y - expected).abs() < 1e-6, "stem at {x} ends at {y}, beam at {expected}");
        }
    }
    // the low group points up, the high group down
    assert!(stems[0].2 < stems[0].1);
    assert!(stems[4].2 > stems[4].1);
}

#[test]
fn triplet_gets_one_bracket() {
    let score = piano(vec![json!([
        triplet("eighth", 67),
        triplet("eighth", 69),
        triplet("eighth", 71),
        beat("quarter", &[72]),
        beat("half", &[72]),
    ])]);
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();

    let bar = renderer(&layout, first_bar(0));
    let tuplets: Vec<usize> = bar.base.helpers.tuplet_groups[0]
        .iter()
        .map(|g| g.beats.len())
        .collect();
    assert_eq!(tuplets, vec![3]);

    let canvas = paint(&mut layout);
    assert_eq!(canvas.texts().iter().filter(|t| **t == "3").count(), 1);
    let brackets = canvas.stroked_paths().into_iter().filter(|p| p.len() == 6).count();
    assert_eq!(brackets, 1);
}

#[test]
fn tuplet_labels() {
    assert_eq!(tuplet_label(2, 3), "2");
    assert_eq!(tuplet_label(3, 2), "3");
    assert_eq!(tuplet_label(5, 3), "5:3");
}

#[test]
fn malformed_tuplet_is_plain() {
    let score = piano(vec![json!([
        { "duration": "quarter", "tupletNumerator": 0, "tupletDenominator": 3, "notes": [{ "pitch": 67 }] },
        beat("quarter", &[67]),
        beat("half", &[67]),
    ])]);
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();
    let bar = renderer(&layout, first_bar(0));
    assert!(bar.base.helpers.tuplet_groups.iter().all(|g| g.is_empty()));
    let canvas = paint(&mut layout);
    assert!(canvas.texts().iter().all(|t| !t.contains(':')));
}

#[test]
fn oversized_tuplet_renders_as_plain() {
    let score = piano(vec![json!([{
        "duration": "whole",
        "tupletNumerator": 3,
        "tupletDenominator": 2000000,
        "notes": [{ "pitch": 67 }]
    }])]);
    let settings = RenderSettings::default();
    let documents = render_score_to_svg(&score, &settings).expect("render should not fail");
    assert_eq!(documents.len(), 1);

    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();
    let bar = renderer(&layout, first_bar(0));
    assert!(bar.base.helpers.tuplet_groups.iter().all(|g| g.is_empty()));
}

#[test]
fn accidentals_reset_every_bar() {
    let score = piano(vec![
        json!([
            beat("quarter", &[73]),
            beat("quarter", &[73]),
            beat("half", &[73]),
        ]),
        json!([beat("whole", &[73])]),
    ]);
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();
    let canvas = paint(&mut layout);
    assert_eq!(canvas.count_symbol(MusicFontSymbol::AccidentalSharp), 2);
}

#[test]
fn overflow_is_shared_by_every_staff() {
    let score = score_from(json!({
        "masterBars": [{}],
        "tracks": [
            { "staves": [{ "bars": [{ "voices": [{ "beats": [beat("whole", &[60])] }] }] }] },
            { "staves": [{ "bars": [{ "voices": [{ "beats": [beat("whole", &[100])] }] }] }] }
        ]
    }));
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();

    let high = renderer(
        &layout,
        BarId {
            track: 1,
            staff: 0,
            index: 0,
        },
    )
    .base
    .top_overflow();
    let group = &layout.groups[0];
    assert!(high > 0.0);
    assert_eq!(group.staves[0].top_spacing, high);
    assert_eq!(group.staves[1].top_spacing, high);
    assert_eq!(group.staves[0].bottom_spacing, group.staves[1].bottom_spacing);
}

#[test]
fn whole_rest_bars_keep_their_nominal_height() {
    let rest = || json!([{ "duration": "whole" }]);
    let score = piano(vec![rest(), rest()]);
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();

    // four line gaps of 9, the bar number band of 13 above, padding of 10 below
    for index in 0..2 {
        let bar = renderer(&layout, first_bar(index));
        assert!(bar.base.show_bar_number);
        assert_eq!(bar.base.height, 59.0);
        assert_eq!(bar.base.top_overflow(), 0.0);
        assert_eq!(bar.base.bottom_overflow(), 0.0);
    }
    assert_eq!(layout.groups[0].height(), 59.0);
}

#[test]
fn bar_numbers_fit_in_the_top_padding() {
    let score = piano(vec![json!([{ "duration": "whole" }])]);
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();
    let canvas = paint(&mut layout);
    let number = canvas
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::FillText { text, y, .. } if text == "1" => Some(*y),
            _ => None,
        })
        .expect("bar number should be drawn");
    // baseline two units above the top staff line, with no margin above it
    assert_eq!(number, 11.0);
}

#[test]
fn beat_text_is_drawn_once_per_staff() {
    let score = score_from(json!({
        "masterBars": [{}],
        "tracks": [{ "staves": [{
            "tuning": [64, 59, 55, 50, 45, 40],
            "bars": [{ "voices": [{ "beats": [{
                "duration": "whole",
                "text": "Intro",
                "notes": [{ "pitch": 64, "string": 1, "fret": 0 }]
            }] }] }]
        }] }]
    }));
    let settings = RenderSettings::default();
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();

    let score_bar = renderer(&layout, first_bar(0));
    assert!(score_bar.base.is_top_of_staff);
    let tab_bar = layout
        .renderer_for_bar("tab", first_bar(0))
        .expect("guitar staff should have a tab row");
    assert!(!tab_bar.base.is_top_of_staff);

    let canvas = paint(&mut layout);
    let count = canvas.texts().iter().filter(|t| **t == "Intro").count();
    assert_eq!(count, 1);
}

#[test]
fn systems_cover_the_range_in_order() {
    let bars: Vec<Value> = (0..16)
        .map(|_| {
            json!([
                beat("eighth", &[67]),
                beat("eighth", &[69]),
                beat("quarter", &[71]),
                beat("half", &[72]),
            ])
        })
        .collect();
    let score = piano(bars);
    let settings = RenderSettings {
        width: 500.0,
        start_bar: 3,
        bar_count: 12,
        ..RenderSettings::default()
    };
    let mut layout = ScoreLayout::new(&score, &settings);
    layout.do_layout().unwrap();
    let units = layout.paint(&mut RecordingCanvas::new());

    let ranges: Vec<(usize, usize)> = units
        .iter()
        .filter_map(|u| u.first_bar.zip(u.last_bar))
        .collect();
    assert!(ranges.len() > 1);
    assert_eq!(ranges.first().map(|r| r.0), Some(2));
    assert_eq!(ranges.last().map(|r| r.1), Some(13));
    assert!(ranges.windows(2).all(|w| w[1].0 == w[0].1 + 1));

    let json = serde_json::to_value(&units[0]).unwrap();
    assert!(json.get("firstBar").is_some());
    assert!(json.get("lastBar").is_some());
}

#[test]
fn tab_profile_on_piano_is_an_error() {
    let score = piano(vec![json!([beat("whole", &[60])])]);
    let settings = RenderSettings {
        stave_profile: StaveProfile::Tab,
        ..RenderSettings::default()
    };
    let err = render_score_to_svg(&score, &settings).unwrap_err();
    assert!(matches!(err, LayoutError::NoMatchingFactory { track: 0, staff: 0 }));
}

#[test]
fn staff_missing_a_bar_is_an_error() {
    let mut score = piano(vec![
        json!([beat("whole", &[60])]),
        json!([beat("whole", &[62])]),
    ]);
    score.tracks[0].staves[0].bars.pop();
    let err = render_score_to_svg(&score, &RenderSettings::default()).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::MissingBar {
            track: 0,
            staff: 0,
            index: 1
        }
    ));
    assert_eq!(err.to_string(), "staff 0 of track 0 has no bar 1");
}

#[test]
fn invalid_json_is_reported() {
    let err = scorelayout::score_from_json("{ \"masterBars\": 3 }").unwrap_err();
    assert!(matches!(err, LayoutError::Json(_)));
}
